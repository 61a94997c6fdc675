//! Subscriber commands - list subscribers and check membership

use anyhow::Result;
use epns_lib::ClientConfig;

use crate::ui;

#[tracing::instrument(skip(config))]
pub async fn list(config: &ClientConfig, channel: &str) -> Result<()> {
    ui::header("Channel Subscribers");

    let client = super::client(config)?;
    let spinner = ui::spinner("Fetching subscribers...");
    let result = client.get_subscribers(channel).await;
    spinner.finish_and_clear();

    let subscribers = result?;
    if subscribers.is_empty() {
        ui::info("No subscribers");
        return Ok(());
    }

    ui::success(&format!("{} subscriber(s)", subscribers.len()));
    ui::separator();
    for subscriber in &subscribers {
        println!("  {}", subscriber);
    }

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn check(config: &ClientConfig, user: &str, channel: &str) -> Result<()> {
    ui::header("Subscription Status");

    let client = super::client(config)?;
    let subscribed = client.is_user_subscribed(user, channel).await?;

    ui::key_value("User", user);
    ui::key_value("Channel", channel);
    if subscribed {
        ui::success("Subscribed");
    } else {
        ui::info("Not subscribed");
    }

    Ok(())
}
