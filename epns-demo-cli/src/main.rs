//! EPNS Demo CLI
//!
//! Command-line interface for querying EPNS channels and submitting signed
//! opt-in/opt-out requests.

use anyhow::Result;
use clap::{Parser, Subcommand};
use epns_lib::signing::ChannelAction;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "epns-demo")]
#[command(about = "EPNS Demo CLI - Query channels and manage subscriptions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend API base URL (can also be set via EPNS_BASE_URL env var)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Communicator contract for the signing domain (or EPNS_COMMUNICATOR_CONTRACT)
    #[arg(long, global = true)]
    contract: Option<String>,

    /// Request timeout in seconds (or EPNS_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a channel by address
    Channel {
        /// Channel address
        address: String,
    },

    /// List the subscribers of a channel
    Subscribers {
        /// Channel address
        channel: String,
    },

    /// Check whether a user is subscribed to a channel
    IsSubscribed {
        /// User address
        user: String,

        /// Channel address
        channel: String,
    },

    /// Print the EIP-712 typed data to sign for an opt-in or opt-out
    TypedData {
        /// Channel address
        channel: String,

        /// User address
        user: String,

        /// Chain ID of the signing domain
        #[arg(long)]
        chain_id: u64,

        /// Build the unsubscribe payload instead of subscribe
        #[arg(long)]
        unsubscribe: bool,
    },

    /// Opt into a channel with a signature produced elsewhere
    OptIn {
        /// Channel address
        channel: String,

        /// User address
        user: String,

        /// Chain ID of the signing domain
        #[arg(long)]
        chain_id: u64,

        /// EIP-712 signature over the `typed-data` output
        #[arg(long)]
        signature: String,
    },

    /// Opt out of a channel with a signature produced elsewhere
    OptOut {
        /// Channel address
        channel: String,

        /// User address
        user: String,

        /// Chain ID of the signing domain
        #[arg(long)]
        chain_id: u64,

        /// EIP-712 signature over the `typed-data --unsubscribe` output
        #[arg(long)]
        signature: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("epns_demo_cli=debug,epns_lib=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("epns_demo_cli=info,epns_lib=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let config = commands::resolve_config(cli.base_url, cli.contract, cli.timeout)?;
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Channel { address } => {
            commands::channel::run(&config, &address, cli.verbose).await?;
        }
        Commands::Subscribers { channel } => {
            commands::subscribers::list(&config, &channel).await?;
        }
        Commands::IsSubscribed { user, channel } => {
            commands::subscribers::check(&config, &user, &channel).await?;
        }
        Commands::TypedData {
            channel,
            user,
            chain_id,
            unsubscribe,
        } => {
            let action = if unsubscribe {
                ChannelAction::Unsubscribe
            } else {
                ChannelAction::Subscribe
            };
            commands::typed_data::run(&config, &channel, &user, chain_id, action)?;
        }
        Commands::OptIn {
            channel,
            user,
            chain_id,
            signature,
        } => {
            commands::opt::run(
                &config,
                ChannelAction::Subscribe,
                &channel,
                &user,
                chain_id,
                &signature,
            )
            .await?;
        }
        Commands::OptOut {
            channel,
            user,
            chain_id,
            signature,
        } => {
            commands::opt::run(
                &config,
                ChannelAction::Unsubscribe,
                &channel,
                &user,
                chain_id,
                &signature,
            )
            .await?;
        }
    }

    Ok(())
}
