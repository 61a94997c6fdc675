//! CLI command implementations

pub mod channel;
pub mod opt;
pub mod subscribers;
pub mod typed_data;

use anyhow::{Context, Result};
use epns_lib::{ChannelClient, ClientConfig};

/// Build the client configuration: defaults, then `EPNS_*` env, then flags.
pub fn resolve_config(
    base_url: Option<String>,
    contract: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Invalid EPNS_* environment")?;
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    if let Some(contract) = contract {
        config = config.with_communicator_contract(contract);
    }
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(secs);
    }
    Ok(config)
}

/// Create a channel client from a resolved configuration.
pub fn client(config: &ClientConfig) -> Result<ChannelClient> {
    ChannelClient::new(config.clone()).context("Failed to create channel client")
}
