//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use stampkit_lib::prelude::*;
//! ```

// Core types
pub use crate::types::{BatchDepth, BatchId, FeedIndex, FeedTopic, Lookup, Reference};
pub use crate::{Address, Config};

// Error handling
pub use crate::errors::{StampkitError, StampkitErrorCode};
pub use crate::Result;

// Keys
pub use crate::keys::{address_of, PrivateKey};
pub use crate::project::{ProjectIdentity, ProjectSlug};

// Resolvers
pub use crate::resolvers::{
    BatchDepthResolver, DepthSource, FeedIndexResolver, GatewayConfig, IndexSource, RpcConfig,
};

// Orchestration
pub use crate::feed::{
    FeedUpdateOrchestrator, FeedUpdateParams, FeedUpdatePlan, FeedUpdateRequest, FeedWriter,
};
