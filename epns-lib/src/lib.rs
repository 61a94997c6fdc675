//! EPNS channel client library.
//!
//! This crate stays stateless: it formats requests for the EPNS backend and
//! delegates signing to callers through the [`TypedDataSigner`] trait.
//!
//! # Features
//!
//! - **Channel queries**: Look up channels and list their subscribers
//! - **Subscription checks**: Case-insensitive subscriber membership
//! - **Off-chain opt-in/opt-out**: EIP-712 signed subscription actions
//!
//! # Example
//!
//! ```ignore
//! use epns_lib::{ChannelClient, ClientConfig, OptOptions};
//!
//! let client = ChannelClient::new(ClientConfig::from_env()?)?;
//! let outcome = client
//!     .opt_in(&wallet, "0xchannel", 42, "0xuser", &OptOptions::default())
//!     .await;
//! assert!(outcome.is_success());
//! ```

pub mod channels;
pub mod config;
pub mod errors;
pub mod prelude;
pub mod signing;

/// Test utilities for signing and submission tests.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use channels::{ActionOutcome, ChannelClient, ChannelRecord, OptOptions};
pub use config::ClientConfig;
pub use errors::{EpnsError, EpnsErrorCode};
pub use signing::{PresignedSigner, TypedDataSigner};

/// Common result alias for EPNS operations.
pub type Result<T> = std::result::Result<T, EpnsError>;
