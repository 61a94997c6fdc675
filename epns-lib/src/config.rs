//! Client configuration.
//!
//! # Environment Variables
//!
//! [`ClientConfig::from_env`] starts from the defaults and applies:
//!
//! - `EPNS_BASE_URL` - backend API base URL
//! - `EPNS_COMMUNICATOR_CONTRACT` - EIP-712 verifying contract
//! - `EPNS_TIMEOUT_SECS` - request timeout in seconds
//!
//! # Example
//!
//! ```
//! use epns_lib::ClientConfig;
//!
//! let config = ClientConfig::new("https://backend.example/apis").with_timeout(10);
//! assert_eq!(config.timeout_secs, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::{EpnsError, Result};

/// Default EPNS backend API.
pub const DEFAULT_BASE_URL: &str = "https://backend-kovan.epns.io/apis";

/// Default EPNS communicator contract used as the EIP-712 verifying contract.
pub const DEFAULT_COMMUNICATOR_CONTRACT: &str = "0x87da9Af1899ad477C67FeA31ce89c1d2435c77DC";

/// Environment variable overriding [`ClientConfig::base_api_url`].
pub const ENV_BASE_URL: &str = "EPNS_BASE_URL";
/// Environment variable overriding [`ClientConfig::communicator_contract`].
pub const ENV_COMMUNICATOR_CONTRACT: &str = "EPNS_COMMUNICATOR_CONTRACT";
/// Environment variable overriding [`ClientConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "EPNS_TIMEOUT_SECS";

/// Configuration for [`ChannelClient`](crate::ChannelClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL (e.g., `https://backend-kovan.epns.io/apis`).
    #[serde(default = "default_base_url")]
    pub base_api_url: String,

    /// Communicator contract used in the signing domain when a call does not
    /// override it.
    #[serde(default = "default_communicator_contract")]
    pub communicator_contract: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_communicator_contract() -> String {
    DEFAULT_COMMUNICATOR_CONTRACT.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_api_url: default_base_url(),
            communicator_contract: default_communicator_contract(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given backend, other fields defaulted.
    pub fn new(base_api_url: impl Into<String>) -> Self {
        Self {
            base_api_url: base_api_url.into(),
            ..Self::default()
        }
    }

    /// Configuration for the public Kovan backend.
    pub fn kovan() -> Self {
        Self::default()
    }

    /// Load configuration from `EPNS_*` environment variables.
    ///
    /// Unset or empty variables keep their default. A timeout that is not a
    /// positive integer is rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_api_url = url;
        }
        if let Some(contract) = get(ENV_COMMUNICATOR_CONTRACT) {
            config.communicator_contract = contract;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    EpnsError::InvalidConfig(format!(
                        "{ENV_TIMEOUT_SECS}={raw} is not a positive integer"
                    ))
                })?;
        }

        Ok(config)
    }

    /// Set the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_api_url = url.into();
        self
    }

    /// Set the default communicator contract.
    pub fn with_communicator_contract(mut self, contract: impl Into<String>) -> Self {
        self.communicator_contract = contract.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Check that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EpnsError::InvalidConfig(format!(
                "base API URL must be http(s): {}",
                self.base_api_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(EpnsError::InvalidConfig("timeout must be non-zero".into()));
        }
        Ok(())
    }
}
