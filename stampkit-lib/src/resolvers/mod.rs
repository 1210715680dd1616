//! Read-only lookups against external services.
//!
//! Two services feed numbers into a feed update:
//!
//! - **JSON-RPC node** - the depth of a postage batch ([`BatchDepthResolver`])
//! - **Storage gateway** - the next index of a feed ([`FeedIndexResolver`])
//!
//! Both answer with a [`Lookup`]: each query is attempted once with a short
//! timeout and any failure is reported as `Absent` so the caller can fall
//! back. The [`DepthSource`] and [`IndexSource`] traits let the orchestrator
//! run against other implementations in tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stampkit_lib::resolvers::{BatchDepthResolver, FeedIndexResolver, GatewayConfig, RpcConfig};
//!
//! let depth = BatchDepthResolver::new(RpcConfig::gnosis())?
//!     .resolve_depth(&batch_id)
//!     .await;
//! let index = FeedIndexResolver::new(GatewayConfig::local())?
//!     .resolve_next_index(&owner, &FeedTopic::default())
//!     .await;
//! ```

mod config;
mod depth;
mod feed_index;

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::types::{BatchDepth, BatchId, FeedIndex, FeedTopic, Lookup};

pub use config::{
    GatewayConfig, RpcConfig, DEFAULT_GATEWAY_URL, DEFAULT_RPC_URL, DEFAULT_TIMEOUT_SECS,
    GNOSIS_CHAIN_ID, POSTAGE_STAMP_CONTRACT,
};
pub use depth::{call_data, selector, BatchDepthResolver, BATCH_DEPTH_SIGNATURE};
pub use feed_index::{FeedIndexResolver, FeedState, CURRENT_INDEX_HEADER, NEXT_INDEX_HEADER};

/// Anything that can report the depth of a batch.
#[async_trait]
pub trait DepthSource: Send + Sync {
    /// Resolve the depth of `batch_id`.
    async fn resolve_depth(&self, batch_id: &BatchId) -> Lookup<BatchDepth>;
}

/// Anything that can report the next index of a feed.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Resolve the next writable index for `owner` and `topic`.
    async fn resolve_next_index(&self, owner: &Address, topic: &FeedTopic) -> Lookup<FeedIndex>;
}

#[async_trait]
impl DepthSource for BatchDepthResolver {
    async fn resolve_depth(&self, batch_id: &BatchId) -> Lookup<BatchDepth> {
        BatchDepthResolver::resolve_depth(self, batch_id).await
    }
}

#[async_trait]
impl IndexSource for FeedIndexResolver {
    async fn resolve_next_index(&self, owner: &Address, topic: &FeedTopic) -> Lookup<FeedIndex> {
        FeedIndexResolver::resolve_next_index(self, owner, topic).await
    }
}
