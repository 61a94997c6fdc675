//! EIP-712 payload types for channel subscription actions.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Signing domain name used by the EPNS communicator contract.
pub const DOMAIN_NAME: &str = "EPNS COMM V1";

/// A channel subscription action.
///
/// Serializes as `"Subscribe"` / `"Unsubscribe"`, the value placed in the
/// signed message's `action` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelAction {
    /// Opt into a channel.
    Subscribe,
    /// Opt out of a channel.
    Unsubscribe,
}

impl ChannelAction {
    /// Label carried in the message's `action` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "Subscribe",
            Self::Unsubscribe => "Unsubscribe",
        }
    }

    /// Key of this action in the type-schema table.
    pub fn type_key(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }

    /// EIP-712 primary type name.
    pub fn primary_type(&self) -> &'static str {
        self.as_str()
    }

    /// Message field carrying the user address.
    pub fn user_field(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscriber",
            Self::Unsubscribe => "unsubscriber",
        }
    }

    /// Backend endpoint (relative to `/channels/`) accepting the signed action.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe_offchain",
            Self::Unsubscribe => "unsubscribe_offchain",
        }
    }
}

/// Only `"Subscribe"` selects [`ChannelAction::Subscribe`]; every other label
/// is treated as an unsubscribe.
impl From<&str> for ChannelAction {
    fn from(label: &str) -> Self {
        if label == "Subscribe" {
            Self::Subscribe
        } else {
            Self::Unsubscribe
        }
    }
}

impl std::fmt::Display for ChannelAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EIP-712 domain descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDescriptor {
    /// Always [`DOMAIN_NAME`].
    pub name: String,
    /// Chain the signature is valid on.
    pub chain_id: u64,
    /// Contract verifying the signature.
    pub verifying_contract: String,
}

/// Message signed to opt in or out of a channel.
///
/// The user address is serialized under `subscriber` or `unsubscriber`
/// depending on [`action`](Self::action).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionMessage {
    /// Channel address.
    pub channel: String,
    /// Address of the user opting in or out.
    pub user: String,
    /// The action being authorized.
    pub action: ChannelAction,
}

impl Serialize for SubscriptionMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("channel", &self.channel)?;
        map.serialize_entry(self.action.user_field(), &self.user)?;
        map.serialize_entry("action", &self.action)?;
        map.end()
    }
}

/// One member of an EIP-712 struct type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    /// Member name.
    pub name: String,
    /// Solidity type (`address`, `string`, `uint256`, ...).
    #[serde(rename = "type")]
    pub kind: String,
}

impl TypedField {
    /// Create a field.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// EIP-712 type definitions keyed by struct name.
pub type TypeSchema = BTreeMap<String, Vec<TypedField>>;

/// Opaque signature returned by a [`TypedDataSigner`](super::TypedDataSigner).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub String);

impl Signature {
    /// Wrap a signature string (usually `0x`-prefixed hex).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the signature as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Signature {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Signature {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete `eth_signTypedData_v4` document.
///
/// Wallets that take a single JSON payload expect this shape; the
/// `EIP712Domain` type is added to the action's schema.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Struct definitions including `EIP712Domain`.
    pub types: TypeSchema,
    /// Name of the struct being signed.
    pub primary_type: String,
    /// Signing domain.
    pub domain: DomainDescriptor,
    /// The message.
    pub message: SubscriptionMessage,
}

impl TypedData {
    /// Assemble a document from its parts.
    pub fn new(domain: DomainDescriptor, types: &TypeSchema, message: SubscriptionMessage) -> Self {
        let mut all_types = types.clone();
        all_types.insert(
            "EIP712Domain".to_string(),
            vec![
                TypedField::new("name", "string"),
                TypedField::new("chainId", "uint256"),
                TypedField::new("verifyingContract", "address"),
            ],
        );
        Self {
            types: all_types,
            primary_type: message.action.primary_type().to_string(),
            domain,
            message,
        }
    }
}
