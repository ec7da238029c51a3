//! The `rollup-sync` binary.

use clap::{Parser, Subcommand};
use rollup_sync_node::{commands, RollupClientArgs, RollupSyncNode, RollupSyncNodeConfig};

/// Keeps a local L2 chain in sync with the canonical transaction chain and batches it back to L1.
#[derive(Debug, Parser)]
#[command(name = "rollup-sync", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs the node until interrupted.
    Run(Box<RollupSyncNodeConfig>),
    /// Decodes a hex encoded `appendSequencerBatch` payload.
    DecodeBatch {
        /// The hex encoded payload.
        input: String,
    },
    /// Prints the latest state of the data transport service.
    Status(RollupClientArgs),
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing_subscriber()?;

    match Cli::parse().command {
        Command::Run(config) => {
            let node = RollupSyncNode::launch(*config).await?;
            node.run_until(async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!(target: "rollup_sync::node", ?err, "Failed to listen for ctrl-c");
                }
            })
            .await?;
        }
        Command::DecodeBatch { input } => {
            let batch = commands::decode_batch(&input)?;
            print!("{}", commands::format_batch(&batch));
        }
        Command::Status(args) => {
            let status = commands::status(&args.client()?).await?;
            println!("{status}");
        }
    }
    Ok(())
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
fn init_tracing_subscriber() -> eyre::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}
