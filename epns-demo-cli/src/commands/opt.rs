//! Opt-in / opt-out commands - submit an externally produced signature

use anyhow::{bail, Result};
use epns_lib::signing::ChannelAction;
use epns_lib::{ClientConfig, OptOptions, PresignedSigner};

use crate::ui;

#[tracing::instrument(skip(config, signature))]
pub async fn run(
    config: &ClientConfig,
    action: ChannelAction,
    channel: &str,
    user: &str,
    chain_id: u64,
    signature: &str,
) -> Result<()> {
    ui::header(match action {
        ChannelAction::Subscribe => "Opt In",
        ChannelAction::Unsubscribe => "Opt Out",
    });

    let client = super::client(config)?;
    let signer = PresignedSigner::new(signature);
    let options =
        OptOptions::new().on_success(|| tracing::info!("backend accepted signed action"));

    let spinner = ui::spinner("Submitting signed message...");
    let outcome = match action {
        ChannelAction::Subscribe => {
            client.opt_in(&signer, channel, chain_id, user, &options).await
        }
        ChannelAction::Unsubscribe => {
            client.opt_out(&signer, channel, chain_id, user, &options).await
        }
    };
    spinner.finish_and_clear();

    if outcome.is_success() {
        ui::success(outcome.message());
        Ok(())
    } else {
        ui::error(outcome.message());
        bail!("{} failed", action)
    }
}
