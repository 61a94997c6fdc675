//! EPNS backend channel API client.
//!
//! Reads channel metadata and subscriber lists, and submits signed
//! subscribe/unsubscribe requests to the `/channels/*` endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use epns_lib::{ChannelClient, ClientConfig, OptOptions};
//!
//! let client = ChannelClient::new(ClientConfig::kovan())?;
//!
//! if let Some(channel) = client.get_channel_by_address("0xchannel").await? {
//!     println!("{}", channel["name"]);
//! }
//!
//! let subscribed = client.is_user_subscribed("0xuser", "0xchannel").await?;
//!
//! let outcome = client
//!     .opt_in(&wallet, "0xchannel", 42, "0xuser", &OptOptions::default())
//!     .await;
//! println!("{}: {}", outcome.is_success(), outcome.message());
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::signing::{
    action_types, get_domain_information, get_subscription_message, sign_message, ChannelAction,
    Signature, SubscriptionMessage, TypedDataSigner,
};
use crate::{EpnsError, Result};

/// Message returned by a successful opt-in or opt-out.
///
/// Both actions report the same text; clients match on it verbatim.
pub const OPT_SUCCESS_MESSAGE: &str = "sucesfully opted into channel";

/// Channel metadata as returned by the backend, passed through untouched.
pub type ChannelRecord = serde_json::Value;

/// Callback run after the backend accepts an opt-in or opt-out.
pub type SuccessCallback = Arc<dyn Fn() + Send + Sync>;

/// Result of an opt-in or opt-out.
///
/// Serializes as `{"status": "success" | "error", "message": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionOutcome {
    /// The backend accepted the signed request.
    Success {
        /// Human readable confirmation.
        message: String,
    },
    /// Signing or submission failed.
    Error {
        /// Display text of the underlying error.
        message: String,
    },
}

impl ActionOutcome {
    /// The standard success outcome.
    pub fn success() -> Self {
        Self::Success {
            message: OPT_SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Whether the action went through.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The outcome message.
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Error { message } => message,
        }
    }
}

impl From<Result<()>> for ActionOutcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(err) => Self::Error {
                message: err.to_string(),
            },
        }
    }
}

/// Per-call overrides for [`ChannelClient::opt_in`] and [`ChannelClient::opt_out`].
///
/// Unset fields fall back to the client's [`ClientConfig`].
#[derive(Clone, Default)]
pub struct OptOptions {
    /// Backend to submit to instead of the configured one.
    pub base_api_url: Option<String>,
    /// Verifying contract for the signing domain.
    pub verifying_contract_address: Option<String>,
    /// Invoked once after a successful submission.
    pub on_success: Option<SuccessCallback>,
}

impl OptOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit to a different backend.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_api_url = Some(url.into());
        self
    }

    /// Sign against a different verifying contract.
    pub fn with_verifying_contract(mut self, address: impl Into<String>) -> Self {
        self.verifying_contract_address = Some(address.into());
        self
    }

    /// Register a callback for successful submissions.
    pub fn on_success(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for OptOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptOptions")
            .field("base_api_url", &self.base_api_url)
            .field("verifying_contract_address", &self.verifying_contract_address)
            .field("on_success", &self.on_success.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    op: &'static str,
}

#[derive(Serialize)]
struct SubscribersRequest<'a> {
    channel: &'a str,
    op: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionRequest<'a> {
    signature: &'a Signature,
    message: &'a SubscriptionMessage,
    op: &'static str,
    chain_id: u64,
    contract_address: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    channels: Option<Vec<ChannelRecord>>,
}

#[derive(Deserialize)]
struct SubscribersResponse {
    #[serde(default)]
    subscribers: Option<Vec<String>>,
}

/// Case-insensitive address membership.
pub fn contains_address(addresses: &[String], address: &str) -> bool {
    let target = address.to_lowercase();
    addresses.iter().any(|candidate| candidate.to_lowercase() == target)
}

fn channels_url(base_api_url: &str, endpoint: &str) -> String {
    format!("{}/channels/{}", base_api_url.trim_end_matches('/'), endpoint)
}

/// Client for the EPNS channel endpoints.
///
/// Stateless apart from the pooled HTTP client; clone or share it freely.
#[derive(Clone, Debug)]
pub struct ChannelClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ChannelClient {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EpnsError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create a client for the default backend.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        base_api_url: &str,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let url = channels_url(base_api_url, endpoint);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| EpnsError::from_reqwest(e, &url, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EpnsError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.post(&self.config.base_api_url, endpoint, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| {
                EpnsError::Serialization(format!("failed to parse {endpoint} response: {e}"))
            })
    }

    /// Look up a channel by address.
    ///
    /// Returns `Ok(None)` when the backend knows no such channel. Transport
    /// and backend failures are returned as errors.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn get_channel_by_address(
        &self,
        channel_address: &str,
    ) -> Result<Option<ChannelRecord>> {
        let body = SearchRequest {
            query: channel_address,
            op: "read",
        };

        let response: SearchResponse = self
            .post_json("search", &body)
            .await
            .inspect_err(|err| warn!(error = %err, "channel lookup failed"))?;

        Ok(response
            .channels
            .and_then(|channels| channels.into_iter().next())
            .filter(|channel| !channel.is_null()))
    }

    /// List the addresses subscribed to a channel, as stored by the backend.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn get_subscribers(&self, channel_address: &str) -> Result<Vec<String>> {
        let body = SubscribersRequest {
            channel: channel_address,
            op: "read",
        };

        let response: SubscribersResponse = self.post_json("get_subscribers", &body).await?;
        Ok(response.subscribers.unwrap_or_default())
    }

    /// Check whether `user_address` is subscribed to `channel_address`.
    ///
    /// Addresses are compared case-insensitively, so checksummed and
    /// lower-case forms match.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn is_user_subscribed(
        &self,
        user_address: &str,
        channel_address: &str,
    ) -> Result<bool> {
        let subscribers = self.get_subscribers(channel_address).await?;
        Ok(contains_address(&subscribers, user_address))
    }

    /// Opt `user_address` into a channel with an off-chain signed message.
    ///
    /// Never fails: signing and submission errors are reported through
    /// [`ActionOutcome::Error`]. `options.on_success` runs once on success.
    pub async fn opt_in<S>(
        &self,
        signer: &S,
        channel_address: &str,
        chain_id: u64,
        user_address: &str,
        options: &OptOptions,
    ) -> ActionOutcome
    where
        S: TypedDataSigner + ?Sized,
    {
        self.run_action(
            signer,
            ChannelAction::Subscribe,
            channel_address,
            chain_id,
            user_address,
            options,
        )
        .await
    }

    /// Opt `user_address` out of a channel. See [`opt_in`](Self::opt_in).
    pub async fn opt_out<S>(
        &self,
        signer: &S,
        channel_address: &str,
        chain_id: u64,
        user_address: &str,
        options: &OptOptions,
    ) -> ActionOutcome
    where
        S: TypedDataSigner + ?Sized,
    {
        self.run_action(
            signer,
            ChannelAction::Unsubscribe,
            channel_address,
            chain_id,
            user_address,
            options,
        )
        .await
    }

    async fn run_action<S>(
        &self,
        signer: &S,
        action: ChannelAction,
        channel_address: &str,
        chain_id: u64,
        user_address: &str,
        options: &OptOptions,
    ) -> ActionOutcome
    where
        S: TypedDataSigner + ?Sized,
    {
        let result = self
            .submit_action(signer, action, channel_address, chain_id, user_address, options)
            .await;

        match &result {
            Ok(()) => {
                if let Some(callback) = &options.on_success {
                    callback();
                }
            }
            Err(err) => warn!(
                %action,
                channel = channel_address,
                error = %err,
                "channel action failed"
            ),
        }

        result.into()
    }

    /// Sign and submit a subscription action, returning the typed error on failure.
    ///
    /// This is the fallible core of [`opt_in`](Self::opt_in) and
    /// [`opt_out`](Self::opt_out); it does not run `options.on_success`.
    #[tracing::instrument(skip(self, signer, options), level = "debug")]
    pub async fn submit_action<S>(
        &self,
        signer: &S,
        action: ChannelAction,
        channel_address: &str,
        chain_id: u64,
        user_address: &str,
        options: &OptOptions,
    ) -> Result<()>
    where
        S: TypedDataSigner + ?Sized,
    {
        let contract = options
            .verifying_contract_address
            .as_deref()
            .filter(|address| !address.is_empty())
            .unwrap_or(self.config.communicator_contract.as_str());
        let domain = get_domain_information(chain_id, Some(contract));
        let types = action_types(action);
        let message = get_subscription_message(channel_address, user_address, action);
        debug!(?types, ?message, "built typed data");

        let signature = sign_message(signer, &domain, &types, &message).await?;
        debug!(signature_len = signature.as_str().len(), "message signed");

        let body = ActionRequest {
            signature: &signature,
            message: &message,
            op: "write",
            chain_id,
            contract_address: &domain.verifying_contract,
        };
        let base_api_url = options
            .base_api_url
            .as_deref()
            .unwrap_or(self.config.base_api_url.as_str());

        self.post(base_api_url, action.endpoint(), &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockSigner;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_value(ActionOutcome::success()).unwrap(),
            json!({"status": "success", "message": "sucesfully opted into channel"})
        );

        let err = ActionOutcome::from(Err::<(), _>(EpnsError::signer("denied")));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "message": "signer error: denied"})
        );
        assert!(!err.is_success());
        assert_eq!(err.message(), "signer error: denied");
    }

    #[test]
    fn test_channels_url() {
        assert_eq!(
            channels_url("https://backend/apis/", "search"),
            "https://backend/apis/channels/search"
        );
        assert_eq!(
            channels_url("http://localhost:3000", "subscribe_offchain"),
            "http://localhost:3000/channels/subscribe_offchain"
        );
    }

    #[test]
    fn test_contains_address_ignores_case() {
        let list = vec!["0xABC".to_string(), "0xdef".to_string()];
        assert!(contains_address(&list, "0xabc"));
        assert!(contains_address(&list, "0XDEF"));
        assert!(!contains_address(&list, "0xab"));
        assert!(!contains_address(&[], "0xabc"));
    }

    #[test]
    fn test_action_request_shape() {
        let signature = Signature::new("0xsig");
        let message = get_subscription_message("0xchan", "0xuser", ChannelAction::Subscribe);
        let body = ActionRequest {
            signature: &signature,
            message: &message,
            op: "write",
            chain_id: 42,
            contract_address: "0xcomm",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "signature": "0xsig",
                "message": {"channel": "0xchan", "subscriber": "0xuser", "action": "Subscribe"},
                "op": "write",
                "chainId": 42,
                "contractAddress": "0xcomm"
            })
        );
    }

    #[test]
    fn test_options_debug_hides_callback() {
        let options = OptOptions::new().with_base_url("http://x").on_success(|| {});
        let rendered = format!("{options:?}");
        assert!(rendered.contains("<callback>"));
        assert!(rendered.contains("http://x"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = ChannelClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, EpnsError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_signer_failure_becomes_error_outcome() {
        let client = ChannelClient::with_defaults().unwrap();
        let signer = MockSigner::failing("user rejected request");
        let called = Arc::new(AtomicUsize::new(0));
        let counter = called.clone();
        let options = OptOptions::new().on_success(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = client.opt_in(&signer, "0xchan", 42, "0xuser", &options).await;

        assert_eq!(
            outcome,
            ActionOutcome::Error {
                message: "signer error: user rejected request".into()
            }
        );
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_domain_uses_option_contract_over_config() {
        let client =
            ChannelClient::new(ClientConfig::default().with_communicator_contract("0xconfigured"))
                .unwrap();
        let signer = MockSigner::failing("stop before network");

        client
            .opt_out(&signer, "0xchan", 1, "0xuser", &OptOptions::default())
            .await;
        assert_eq!(signer.last_domain().unwrap().verifying_contract, "0xconfigured");

        let options = OptOptions::new().with_verifying_contract("0xoverride");
        client.opt_out(&signer, "0xchan", 1, "0xuser", &options).await;
        assert_eq!(signer.last_domain().unwrap().verifying_contract, "0xoverride");
        assert_eq!(signer.last_message().unwrap().action, ChannelAction::Unsubscribe);
    }

    #[tokio::test]
    async fn test_empty_contract_override_uses_configured_contract() {
        let client =
            ChannelClient::new(ClientConfig::default().with_communicator_contract("0xconfigured"))
                .unwrap();
        let signer = MockSigner::failing("stop before network");

        let options = OptOptions::new().with_verifying_contract("");
        let outcome = client.opt_in(&signer, "0xchan", 42, "0xuser", &options).await;

        assert!(!outcome.is_success());
        assert_eq!(signer.last_domain().unwrap().verifying_contract, "0xconfigured");
    }

    #[tokio::test]
    async fn test_unreachable_backend_becomes_error_outcome() {
        let client =
            ChannelClient::new(ClientConfig::new("http://127.0.0.1:1").with_timeout(2)).unwrap();
        let signer = MockSigner::new("0xsig");

        let outcome = client
            .opt_in(&signer, "0xchan", 42, "0xuser", &OptOptions::default())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(signer.calls(), 1);
    }

    proptest! {
        #[test]
        fn membership_survives_case_changes(hex in "[0-9a-fA-F]{40}") {
            let address = format!("0x{hex}");
            let stored = vec![address.to_uppercase()];
            prop_assert!(contains_address(&stored, &address.to_lowercase()));
            prop_assert!(contains_address(&stored, &address));
        }
    }
}
