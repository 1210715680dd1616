//! Stampkit CLI
//!
//! Command-line interface for publishing Swarm feed updates funded by a
//! single reserve key.

use anyhow::Result;
use clap::{Parser, Subcommand};
use stampkit_lib::resolvers::{GatewayConfig, RpcConfig};
use stampkit_lib::Config;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "stampkit")]
#[command(about = "Stampkit - publish Swarm feed updates from one reserve key", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Storage gateway URL (overrides STAMPKIT_GATEWAY_URL)
    #[arg(long, global = true)]
    gateway: Option<String>,

    /// JSON-RPC endpoint (overrides STAMPKIT_RPC_URL)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Lookup timeout in seconds (overrides STAMPKIT_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the address that owns a feed
    Address {
        /// Reserve key (defaults to STAMPKIT_PRIVATE_KEY)
        #[arg(long)]
        key: Option<String>,

        /// Show the address of this project's key instead
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Derive the identity of a project
    Project {
        /// Project name
        name: String,

        /// Reserve key (defaults to STAMPKIT_PRIVATE_KEY)
        #[arg(long)]
        key: Option<String>,

        /// Also print the derived private key
        #[arg(long)]
        reveal: bool,
    },

    /// Look up the depth of a postage batch
    Depth {
        /// Batch id (defaults to STAMPKIT_BATCH_ID)
        #[arg(short, long)]
        batch_id: Option<String>,
    },

    /// Ask the gateway for the next writable feed index
    NextIndex {
        /// Feed owner address
        #[arg(long, conflicts_with_all = ["key", "project"])]
        owner: Option<String>,

        /// Reserve key (defaults to STAMPKIT_PRIVATE_KEY)
        #[arg(long)]
        key: Option<String>,

        /// Look up the feed of this project's key
        #[arg(short, long)]
        project: Option<String>,

        /// Feed topic, 64 hex characters
        #[arg(long, conflicts_with = "topic_name")]
        topic: Option<String>,

        /// Feed topic as a name, hashed with keccak256
        #[arg(long)]
        topic_name: Option<String>,
    },

    /// Plan a feed update and hand it off for signing
    FeedUpdate {
        /// Content reference, 64 or 128 hex characters
        #[arg(short, long)]
        reference: String,

        /// Reserve key (defaults to STAMPKIT_PRIVATE_KEY)
        #[arg(long)]
        key: Option<String>,

        /// Batch id (defaults to STAMPKIT_BATCH_ID)
        #[arg(short, long)]
        batch_id: Option<String>,

        /// Sign with this project's key (defaults to STAMPKIT_PROJECT)
        #[arg(short, long)]
        project: Option<String>,

        /// Feed topic, 64 hex characters
        #[arg(long, conflicts_with = "topic_name")]
        topic: Option<String>,

        /// Feed topic as a name, hashed with keccak256
        #[arg(long)]
        topic_name: Option<String>,

        /// Batch depth; looked up on the ledger when omitted
        #[arg(long)]
        depth: Option<u8>,

        /// Feed index; looked up on the gateway when omitted
        #[arg(long)]
        index: Option<u64>,

        /// Write the signing request to FILE, or stdout with `-`
        #[arg(long, value_name = "FILE")]
        handoff: Option<String>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Environment configuration with the global flags applied.
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        let timeout = self.timeout.unwrap_or(config.gateway.timeout_secs);
        if let Some(url) = &self.gateway {
            config.gateway = GatewayConfig::new(url.clone());
        }
        if let Some(url) = &self.rpc {
            config.rpc = RpcConfig::new(url.clone());
        }
        Ok(config.with_timeout(timeout))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so that stdout stays machine-readable
    let filter = if cli.verbose {
        "stampkit=debug,stampkit_lib=debug"
    } else {
        "stampkit=info,stampkit_lib=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config()?;
    tracing::debug!(?config, "configuration loaded");

    // Dispatch commands
    match cli.command {
        Commands::Address { key, project } => {
            commands::address::run(&config, key, project, cli.verbose)?;
        }
        Commands::Project { name, key, reveal } => {
            commands::project::run(&config, &name, key, reveal)?;
        }
        Commands::Depth { batch_id } => {
            commands::depth::run(&config, batch_id, cli.verbose).await?;
        }
        Commands::NextIndex {
            owner,
            key,
            project,
            topic,
            topic_name,
        } => {
            let owner = commands::index::OwnerArgs {
                owner,
                key,
                project,
            };
            commands::index::run(&config, owner, topic, topic_name, cli.verbose).await?;
        }
        Commands::FeedUpdate {
            reference,
            key,
            batch_id,
            project,
            topic,
            topic_name,
            depth,
            index,
            handoff,
            json,
        } => {
            let args = commands::feed::FeedArgs {
                reference,
                key,
                batch_id,
                project,
                topic,
                topic_name,
                depth,
                index,
                handoff,
                json,
            };
            commands::feed::run(&config, args, cli.verbose).await?;
        }
    }

    Ok(())
}
