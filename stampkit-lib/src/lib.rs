//! Stampkit library.
//!
//! Everything needed to publish a Swarm feed update funded by a single
//! reserve key, short of the signing and upload themselves.
//!
//! # Features
//!
//! - **Addresses**: derive the 20-byte owner address of a secp256k1 key
//! - **Project keys**: derive a per-project signing key from the reserve key
//! - **Batch depth**: read the depth of a postage batch from the ledger
//! - **Feed index**: ask a storage gateway for the next writable index
//! - **Orchestration**: assemble a complete feed write and hand it to a
//!   [`FeedWriter`]
//!
//! Lookups never fail a feed update. When the ledger or the gateway cannot
//! answer, the documented fallbacks (depth 20, index 0) are used and the
//! plan reports it.
//!
//! # Example
//!
//! ```
//! use stampkit_lib::{ProjectIdentity, PrivateKey};
//!
//! let reserve = PrivateKey::from_hex(
//!     "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
//! )
//! .unwrap();
//! let project = ProjectIdentity::derive(&reserve, "My Blog").unwrap();
//!
//! assert_eq!(project.slug.as_str(), "my-blog");
//! assert_ne!(project.address(), reserve.address());
//! ```

pub mod config;
pub mod encoding;
pub mod errors;
pub mod feed;
pub mod keys;
pub mod prelude;
pub mod project;
pub mod resolvers;
pub mod types;

/// Test doubles and fixtures.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use errors::{StampkitError, StampkitErrorCode};
pub use feed::{
    FeedUpdateOrchestrator, FeedUpdateParams, FeedUpdatePlan, FeedUpdateRequest, FeedWriter,
    Provenance,
};
pub use keys::{address_of, address_of_hex, PrivateKey};
pub use project::{derive_project_key, normalize_slug, ProjectIdentity, ProjectSlug};
pub use types::{
    BatchDepth, BatchId, FeedIndex, FeedTopic, Lookup, Reference, DEFAULT_BATCH_DEPTH,
    FALLBACK_FEED_INDEX,
};

/// Re-exported so callers can name addresses without a direct dependency.
pub use alloy_primitives::Address;

/// Common result alias for stampkit operations.
pub type Result<T> = std::result::Result<T, StampkitError>;
