//! Feed update orchestration.
//!
//! Decides which key signs a feed update, which index it is written at and
//! which batch depth is declared, then hands the complete request to a
//! [`FeedWriter`]. The writer is the boundary to the external stamping
//! library, which performs the signing and upload.
//!
//! The reserve key always pays for storage (it owns the batch). The signer
//! key owns the feed: it is the project key when a project is named and the
//! reserve key otherwise. Index resolution targets the signer's address.
//!
//! Depth and index resolution are independent and run concurrently.
//!
//! Two invocations racing on the same owner and topic can both resolve the
//! same next index. Nothing here detects that; the later write wins.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::json;

use crate::config::Config;
use crate::keys::{address_path_segment, PrivateKey};
use crate::project::{ProjectIdentity, ProjectSlug};
use crate::resolvers::{BatchDepthResolver, DepthSource, FeedIndexResolver, IndexSource};
use crate::types::{
    BatchDepth, BatchId, FeedIndex, FeedTopic, Lookup, Reference, DEFAULT_BATCH_DEPTH,
    FALLBACK_FEED_INDEX,
};
use crate::Result;

/// Caller-supplied inputs for one feed update.
#[derive(Clone, Debug)]
pub struct FeedUpdateParams {
    /// Key that owns the batch and funds storage.
    pub reserve_key: PrivateKey,
    /// Free-text project name; the feed is signed by the project key when set.
    pub project: Option<String>,
    /// Content the feed should point at.
    pub reference: Reference,
    /// Batch used to stamp the update.
    pub batch_id: BatchId,
    /// Feed topic.
    pub topic: FeedTopic,
    /// Explicit depth; resolved from the ledger when `None`.
    pub depth: Option<BatchDepth>,
    /// Explicit index; resolved from the gateway when `None`.
    pub index: Option<FeedIndex>,
}

impl FeedUpdateParams {
    /// Create params with the default topic and nothing explicit.
    pub fn new(reserve_key: PrivateKey, reference: Reference, batch_id: BatchId) -> Self {
        Self {
            reserve_key,
            project: None,
            reference,
            batch_id,
            topic: FeedTopic::default(),
            depth: None,
            index: None,
        }
    }

    /// Sign with the key derived for `name`.
    pub fn with_project(mut self, name: impl Into<String>) -> Self {
        self.project = Some(name.into());
        self
    }

    /// Set the topic.
    pub fn with_topic(mut self, topic: FeedTopic) -> Self {
        self.topic = topic;
        self
    }

    /// Use this depth instead of asking the ledger.
    pub fn with_depth(mut self, depth: BatchDepth) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Use this index instead of asking the gateway.
    pub fn with_index(mut self, index: FeedIndex) -> Self {
        self.index = Some(index);
        self
    }
}

/// A fully specified feed write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedUpdateRequest {
    /// Key that owns the batch and stamps the chunks.
    pub reserve_key: PrivateKey,
    /// Key that owns and signs the feed.
    pub signer_key: PrivateKey,
    /// Slug of the project whose key signs, if any.
    pub project: Option<ProjectSlug>,
    /// Content reference written to the feed.
    pub reference: Reference,
    /// Index the update is written at.
    pub index: FeedIndex,
    /// Depth declared for the batch.
    pub depth: BatchDepth,
    /// Feed topic.
    pub topic: FeedTopic,
    /// Batch used to stamp the update.
    pub batch_id: BatchId,
    /// Gateway the update is uploaded through.
    pub gateway_url: String,
}

impl FeedUpdateRequest {
    /// Address that owns the feed.
    pub fn owner(&self) -> Address {
        self.signer_key.address()
    }

    /// Whether the feed is signed by a key other than the reserve key.
    pub fn uses_project_key(&self) -> bool {
        self.signer_key != self.reserve_key
    }

    /// JSON document handed to the stamping library.
    ///
    /// Contains both private keys. `signerKey` is null when the feed is
    /// signed by the reserve key.
    pub fn to_handoff_json(&self) -> serde_json::Value {
        json!({
            "reserveKey": self.reserve_key.to_hex(),
            "signerKey": self.uses_project_key().then(|| self.signer_key.to_hex()),
            "owner": address_path_segment(&self.owner()),
            "project": self.project.as_ref().map(ProjectSlug::as_str),
            "reference": self.reference.to_string(),
            "feedIndex": self.index.0,
            "feedIndexHex": self.index.to_hex(),
            "depth": self.depth.0,
            "topic": self.topic.to_string(),
            "batchId": self.batch_id.to_string(),
            "gatewayUrl": self.gateway_url,
        })
    }
}

/// Where a number in the request came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Supplied by the caller.
    Explicit,
    /// Resolved from the external service.
    Resolved,
    /// The service gave no answer; the documented fallback was used.
    Fallback {
        /// Why resolution failed.
        reason: String,
    },
}

impl Provenance {
    /// Whether a fallback value was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// A request plus how each of its numbers was obtained.
#[derive(Clone, Debug)]
pub struct FeedUpdatePlan {
    /// The request to write.
    pub request: FeedUpdateRequest,
    /// Origin of `request.depth`.
    pub depth_source: Provenance,
    /// Origin of `request.index`.
    pub index_source: Provenance,
}

impl FeedUpdatePlan {
    /// Human-readable warnings, one per fallback.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Provenance::Fallback { reason } = &self.depth_source {
            warnings.push(format!(
                "batch depth could not be resolved ({}); using default depth {}",
                reason, self.request.depth
            ));
        }
        if let Provenance::Fallback { reason } = &self.index_source {
            warnings.push(format!(
                "feed index could not be resolved ({}); writing at index {}",
                reason, self.request.index
            ));
        }
        warnings
    }
}

/// Boundary to the external stamping library.
#[async_trait]
pub trait FeedWriter: Send + Sync {
    /// Sign and transmit the feed update.
    async fn write_feed_update(&self, request: &FeedUpdateRequest) -> Result<()>;
}

/// Resolves missing parameters and emits feed write requests.
pub struct FeedUpdateOrchestrator<D, I> {
    depth: D,
    index: I,
    gateway_url: String,
}

impl FeedUpdateOrchestrator<BatchDepthResolver, FeedIndexResolver> {
    /// Build the orchestrator with the network resolvers from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            BatchDepthResolver::new(config.rpc.clone())?,
            FeedIndexResolver::new(config.gateway.clone())?,
            config.gateway.api_url.clone(),
        ))
    }
}

impl<D, I> FeedUpdateOrchestrator<D, I>
where
    D: DepthSource,
    I: IndexSource,
{
    /// Create an orchestrator over the given sources.
    pub fn new(depth: D, index: I, gateway_url: impl Into<String>) -> Self {
        Self {
            depth,
            index,
            gateway_url: gateway_url.into(),
        }
    }

    /// Work out the complete request without writing it.
    ///
    /// Fails only on an invalid project name or a failed key derivation,
    /// both before any network call.
    #[tracing::instrument(
        skip(self, params),
        fields(batch_id = %params.batch_id, topic = %params.topic)
    )]
    pub async fn plan(&self, params: FeedUpdateParams) -> Result<FeedUpdatePlan> {
        let (signer_key, project) = match params.project.as_deref() {
            Some(name) => {
                let identity = ProjectIdentity::derive(&params.reserve_key, name)?;
                tracing::debug!(
                    slug = %identity.slug,
                    owner = %identity.address(),
                    "signing with project key"
                );
                (identity.key, Some(identity.slug))
            }
            None => (params.reserve_key.clone(), None),
        };
        let owner = signer_key.address();

        let depth = async {
            match params.depth {
                Some(depth) => (depth, Provenance::Explicit),
                None => match self.depth.resolve_depth(&params.batch_id).await {
                    Lookup::Found(depth) => (depth, Provenance::Resolved),
                    Lookup::Absent { reason } => {
                        tracing::warn!(
                            %reason,
                            fallback = DEFAULT_BATCH_DEPTH.0,
                            "batch depth unresolved"
                        );
                        (DEFAULT_BATCH_DEPTH, Provenance::Fallback { reason })
                    }
                },
            }
        };

        let index = async {
            match params.index {
                Some(index) => (index, Provenance::Explicit),
                None => match self.index.resolve_next_index(&owner, &params.topic).await {
                    Lookup::Found(index) => (index, Provenance::Resolved),
                    Lookup::Absent { reason } => {
                        tracing::warn!(
                            %reason,
                            fallback = FALLBACK_FEED_INDEX.0,
                            "feed index unresolved"
                        );
                        (FALLBACK_FEED_INDEX, Provenance::Fallback { reason })
                    }
                },
            }
        };

        let ((depth, depth_source), (index, index_source)) = tokio::join!(depth, index);
        tracing::info!(%owner, depth = depth.0, index = index.0, "feed update planned");

        Ok(FeedUpdatePlan {
            request: FeedUpdateRequest {
                reserve_key: params.reserve_key,
                signer_key,
                project,
                reference: params.reference,
                index,
                depth,
                topic: params.topic,
                batch_id: params.batch_id,
                gateway_url: self.gateway_url.clone(),
            },
            depth_source,
            index_source,
        })
    }

    /// Plan the update and hand it to `writer`.
    pub async fn execute<W>(&self, params: FeedUpdateParams, writer: &W) -> Result<FeedUpdatePlan>
    where
        W: FeedWriter + ?Sized,
    {
        let plan = self.plan(params).await?;
        writer.write_feed_update(&plan.request).await?;
        Ok(plan)
    }
}
