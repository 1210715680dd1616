//! Depth command - look up the depth of a postage batch

use anyhow::{Context, Result};
use stampkit_lib::resolvers::BatchDepthResolver;
use stampkit_lib::{BatchId, Config, Lookup, DEFAULT_BATCH_DEPTH};

use crate::ui;

#[tracing::instrument(skip(config))]
pub async fn run(config: &Config, batch_id: Option<String>, verbose: bool) -> Result<()> {
    let batch_id = match batch_id {
        Some(raw) => BatchId::from_hex(&raw).context("invalid --batch-id")?,
        None => config.batch_id()?,
    };

    if verbose {
        ui::info(&format!("RPC endpoint: {}", config.rpc.rpc_url));
        ui::info(&format!("Contract: {}", config.rpc.contract));
    }

    let resolver = BatchDepthResolver::new(config.rpc.clone())?;
    let spinner = ui::spinner("Querying batch depth...");
    let lookup = resolver.resolve_depth(&batch_id).await;
    spinner.finish_and_clear();

    match lookup {
        Lookup::Found(depth) => {
            ui::success(&format!("Batch {} has depth {}", batch_id, depth));
        }
        Lookup::Absent { reason } => {
            ui::warning(&format!("Depth unavailable: {}", reason));
            ui::info(&format!(
                "A feed update would fall back to depth {}",
                DEFAULT_BATCH_DEPTH
            ));
        }
    }
    Ok(())
}
