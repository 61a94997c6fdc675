//! EIP-712 signing helpers for channel subscription actions.
//!
//! These functions build the three inputs of a typed-data signature (domain,
//! type schema, message) and hand them to an external [`TypedDataSigner`].
//!
//! # Example
//!
//! ```
//! use epns_lib::signing::{action_types, get_domain_information, get_subscription_message};
//! use epns_lib::signing::ChannelAction;
//!
//! let domain = get_domain_information(42, None);
//! let types = action_types(ChannelAction::Subscribe);
//! let message = get_subscription_message("0xchannel", "0xuser", ChannelAction::Subscribe);
//!
//! assert_eq!(domain.name, "EPNS COMM V1");
//! assert!(types.contains_key("Subscribe"));
//! assert_eq!(message.action, ChannelAction::Subscribe);
//! ```

mod signer;
mod types;

pub use signer::{PresignedSigner, TypedDataSigner};
pub use types::{
    ChannelAction, DomainDescriptor, Signature, SubscriptionMessage, TypeSchema, TypedData,
    TypedField, DOMAIN_NAME,
};

use crate::config::DEFAULT_COMMUNICATOR_CONTRACT;
use crate::Result;

/// Build the signing domain.
///
/// `verifying_contract` falls back to the default communicator contract when
/// it is `None` or empty.
pub fn get_domain_information(chain_id: u64, verifying_contract: Option<&str>) -> DomainDescriptor {
    let verifying_contract = verifying_contract
        .filter(|address| !address.is_empty())
        .unwrap_or(DEFAULT_COMMUNICATOR_CONTRACT);

    DomainDescriptor {
        name: DOMAIN_NAME.to_string(),
        chain_id,
        verifying_contract: verifying_contract.to_string(),
    }
}

/// Build the message a user signs to subscribe to or unsubscribe from a channel.
pub fn get_subscription_message(
    channel_address: &str,
    user_address: &str,
    action: impl Into<ChannelAction>,
) -> SubscriptionMessage {
    SubscriptionMessage {
        channel: channel_address.to_string(),
        user: user_address.to_string(),
        action: action.into(),
    }
}

/// EIP-712 struct definitions for `action`.
pub fn action_types(action: ChannelAction) -> TypeSchema {
    let fields = vec![
        TypedField::new("channel", "address"),
        TypedField::new(action.user_field(), "address"),
        TypedField::new("action", "string"),
    ];
    TypeSchema::from([(action.primary_type().to_string(), fields)])
}

/// Look up the type schema by table key (`"subscribe"` or `"unsubscribe"`).
pub fn action_types_by_key(key: &str) -> Option<TypeSchema> {
    [ChannelAction::Subscribe, ChannelAction::Unsubscribe]
        .into_iter()
        .find(|action| action.type_key() == key)
        .map(action_types)
}

/// Sign `message` with `signer`.
///
/// Signer failures are returned unchanged.
pub async fn sign_message<S>(
    signer: &S,
    domain: &DomainDescriptor,
    types: &TypeSchema,
    message: &SubscriptionMessage,
) -> Result<Signature>
where
    S: TypedDataSigner + ?Sized,
{
    signer.sign_typed_data(domain, types, message).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockSigner;
    use crate::EpnsError;
    use serde_json::json;

    #[test]
    fn test_domain_uses_default_contract() {
        let domain = get_domain_information(42, None);
        assert_eq!(domain.name, DOMAIN_NAME);
        assert_eq!(domain.chain_id, 42);
        assert_eq!(domain.verifying_contract, DEFAULT_COMMUNICATOR_CONTRACT);

        let domain = get_domain_information(1, Some(""));
        assert_eq!(domain.verifying_contract, DEFAULT_COMMUNICATOR_CONTRACT);
    }

    #[test]
    fn test_domain_keeps_explicit_contract() {
        let domain = get_domain_information(1, Some("0xAbC0000000000000000000000000000000000001"));
        assert_eq!(
            domain.verifying_contract,
            "0xAbC0000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_subscribe_message_uses_subscriber_key() {
        let message = get_subscription_message("0xchan", "0xuser", ChannelAction::Subscribe);
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"channel": "0xchan", "subscriber": "0xuser", "action": "Subscribe"})
        );
    }

    #[test]
    fn test_other_labels_use_unsubscriber_key() {
        for label in ["Unsubscribe", "Leave", ""] {
            let message = get_subscription_message("0xchan", "0xuser", label);
            let value = serde_json::to_value(&message).unwrap();
            assert_eq!(value["unsubscriber"], "0xuser");
            assert!(value.get("subscriber").is_none());
        }
    }

    #[test]
    fn test_action_types_table() {
        let subscribe = action_types_by_key("subscribe").unwrap();
        assert_eq!(
            serde_json::to_value(&subscribe).unwrap(),
            json!({"Subscribe": [
                {"name": "channel", "type": "address"},
                {"name": "subscriber", "type": "address"},
                {"name": "action", "type": "string"}
            ]})
        );

        let unsubscribe = action_types_by_key("unsubscribe").unwrap();
        assert_eq!(unsubscribe["Unsubscribe"][1].name, "unsubscriber");

        assert!(action_types_by_key("Subscribe").is_none());
    }

    #[tokio::test]
    async fn test_sign_message_delegates_to_signer() {
        let signer = MockSigner::new("0xsig");
        let domain = get_domain_information(5, None);
        let types = action_types(ChannelAction::Subscribe);
        let message = get_subscription_message("0xchan", "0xuser", ChannelAction::Subscribe);

        let signature = sign_message(&signer, &domain, &types, &message).await.unwrap();
        assert_eq!(signature.as_str(), "0xsig");
        assert_eq!(signer.calls(), 1);
        assert_eq!(signer.last_message(), Some(message));
    }

    #[tokio::test]
    async fn test_sign_message_propagates_signer_error() {
        let signer = MockSigner::failing("user rejected");
        let domain = get_domain_information(5, None);
        let types = action_types(ChannelAction::Unsubscribe);
        let message = get_subscription_message("0xchan", "0xuser", ChannelAction::Unsubscribe);

        let err = sign_message(&signer, &domain, &types, &message)
            .await
            .unwrap_err();
        assert!(matches!(err, EpnsError::Signer(ref msg) if msg == "user rejected"));
    }

    #[tokio::test]
    async fn test_presigned_signer_returns_given_signature() {
        let signer = PresignedSigner::new("0xfeed");
        let message = get_subscription_message("0xchan", "0xuser", ChannelAction::Subscribe);
        let signature = sign_message(
            &signer,
            &get_domain_information(1, None),
            &action_types(message.action),
            &message,
        )
        .await
        .unwrap();
        assert_eq!(signature, Signature::new("0xfeed"));
    }
}
