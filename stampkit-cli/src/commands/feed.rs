//! Feed-update command - plan a feed update and hand it off for signing
//!
//! The complete request, including both private keys, is written as JSON
//! for the stamping library to sign and upload. Without a handoff target
//! the command only prints the plan.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use stampkit_lib::keys::address_path_segment;
use stampkit_lib::{
    BatchDepth, BatchId, Config, FeedIndex, FeedUpdateOrchestrator, FeedUpdatePlan,
    FeedUpdateRequest, FeedWriter, Provenance, StampkitError,
};
use thiserror::Error;

use crate::ui;

/// Errors raised while handing a request off.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("failed to encode handoff document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write handoff file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<HandoffError> for StampkitError {
    fn from(e: HandoffError) -> Self {
        StampkitError::Write(e.to_string())
    }
}

/// Where the handoff document goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandoffTarget {
    Stdout,
    File(PathBuf),
}

impl HandoffTarget {
    /// `-` means stdout; anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "-" => Self::Stdout,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

/// Hands requests to the stamping library as JSON documents.
pub struct HandoffWriter {
    target: HandoffTarget,
}

impl HandoffWriter {
    pub fn new(target: HandoffTarget) -> Self {
        Self { target }
    }

    async fn write(&self, request: &FeedUpdateRequest) -> std::result::Result<(), HandoffError> {
        let document = serde_json::to_string_pretty(&request.to_handoff_json())?;
        match &self.target {
            HandoffTarget::Stdout => {
                println!("{}", document);
                Ok(())
            }
            HandoffTarget::File(path) => {
                tokio::fs::write(path, document.as_bytes())
                    .await
                    .map_err(|source| HandoffError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

#[async_trait]
impl FeedWriter for HandoffWriter {
    async fn write_feed_update(&self, request: &FeedUpdateRequest) -> stampkit_lib::Result<()> {
        self.write(request).await?;
        tracing::info!(handoff = ?self.target, "feed update handed off");
        Ok(())
    }
}

/// Command-line inputs for `feed-update`.
pub struct FeedArgs {
    pub reference: String,
    pub key: Option<String>,
    pub batch_id: Option<String>,
    pub project: Option<String>,
    pub topic: Option<String>,
    pub topic_name: Option<String>,
    pub depth: Option<u8>,
    pub index: Option<u64>,
    pub handoff: Option<String>,
    pub json: bool,
}

#[tracing::instrument(skip_all)]
pub async fn run(config: &Config, args: FeedArgs, verbose: bool) -> Result<()> {
    // Every input is validated here, before any lookup goes out.
    let topic = super::topic(config, args.topic, args.topic_name)?;
    let mut config = config.clone();
    if let Some(key) = args.key {
        config.private_key = Some(key);
    }
    if let Some(batch_id) = args.batch_id {
        BatchId::from_hex(&batch_id).context("invalid --batch-id")?;
        config.batch_id = Some(batch_id);
    }
    if args.project.is_some() {
        config.project = args.project;
    }
    if let Some(depth) = args.depth {
        config.depth = Some(BatchDepth(depth));
    }
    if let Some(index) = args.index {
        config.feed_index = Some(FeedIndex(index));
    }
    let params = config.feed_params(&args.reference)?.with_topic(topic);

    let target = args.handoff.as_deref().map(HandoffTarget::parse);
    let quiet = args.json || target == Some(HandoffTarget::Stdout);

    if verbose && !quiet {
        ui::info(&format!("Gateway: {}", config.gateway.api_url));
        ui::info(&format!("RPC endpoint: {}", config.rpc.rpc_url));
    }

    let orchestrator = FeedUpdateOrchestrator::from_config(&config)?;
    let spinner = ui::spinner("Resolving batch depth and feed index...");
    let plan = match &target {
        Some(target) => {
            let writer = HandoffWriter::new(target.clone());
            orchestrator.execute(params, &writer).await
        }
        None => orchestrator.plan(params).await,
    };
    spinner.finish_and_clear();
    let plan = plan?;

    for warning in plan.warnings() {
        ui::warning(&warning);
    }

    if args.json {
        if target != Some(HandoffTarget::Stdout) {
            ui::json(&summary_json(&plan));
        }
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    print_summary(&plan);
    match target {
        Some(HandoffTarget::File(path)) => {
            ui::success(&format!("Handoff written to {}", path.display()));
        }
        Some(HandoffTarget::Stdout) => {}
        None => ui::info("Dry run: pass --handoff FILE (or -) to hand the update off"),
    }
    Ok(())
}

fn provenance_label(provenance: &Provenance) -> &'static str {
    match provenance {
        Provenance::Explicit => "explicit",
        Provenance::Resolved => "resolved",
        Provenance::Fallback { .. } => "fallback",
    }
}

/// Plan summary without key material.
pub fn summary_json(plan: &FeedUpdatePlan) -> serde_json::Value {
    let request = &plan.request;
    json!({
        "owner": address_path_segment(&request.owner()),
        "reserveOwner": address_path_segment(&request.reserve_key.address()),
        "project": request.project.as_ref().map(|slug| slug.as_str()),
        "reference": request.reference.to_string(),
        "topic": request.topic.to_string(),
        "batchId": request.batch_id.to_string(),
        "feedIndex": request.index.0,
        "feedIndexSource": provenance_label(&plan.index_source),
        "depth": request.depth.0,
        "depthSource": provenance_label(&plan.depth_source),
        "gatewayUrl": request.gateway_url,
        "warnings": plan.warnings(),
    })
}

fn print_summary(plan: &FeedUpdatePlan) {
    let request = &plan.request;
    ui::header("Feed Update");
    if let Some(slug) = &request.project {
        ui::key_value("Project", slug.as_str());
    }
    ui::key_value("Owner", &request.owner().to_string());
    ui::key_value("Reserve", &request.reserve_key.address().to_string());
    ui::key_value("Topic", &request.topic.to_string());
    ui::key_value("Reference", &request.reference.to_string());
    ui::separator();
    ui::key_value(
        "Index",
        &format!("{} ({})", request.index, provenance_label(&plan.index_source)),
    );
    ui::key_value(
        "Depth",
        &format!("{} ({})", request.depth, provenance_label(&plan.depth_source)),
    );
    ui::key_value("Batch", &request.batch_id.to_string());
}
