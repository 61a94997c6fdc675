//! Channel command - look up channel metadata

use anyhow::Result;
use epns_lib::ClientConfig;

use crate::ui;

#[tracing::instrument(skip(config))]
pub async fn run(config: &ClientConfig, address: &str, verbose: bool) -> Result<()> {
    ui::header("Channel Lookup");

    if verbose {
        ui::info(&format!("Backend: {}", config.base_api_url));
    }

    let client = super::client(config)?;
    let spinner = ui::spinner("Searching channels...");
    let result = client.get_channel_by_address(address).await;
    spinner.finish_and_clear();

    match result? {
        Some(channel) => {
            ui::success("Channel found");
            ui::separator();
            ui::json(&channel);
        }
        None => ui::info(&format!("No channel registered at {}", address)),
    }

    Ok(())
}
