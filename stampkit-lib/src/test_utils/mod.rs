//! Test utilities for stampkit.
//!
//! In-memory stand-ins for the network lookups and the stamping library,
//! plus fixtures with known key and address vectors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stampkit_lib::test_utils::{test_reserve_key, RecordingWriter, StaticDepth, StaticIndex};
//!
//! let orchestrator = FeedUpdateOrchestrator::new(
//!     StaticDepth::new(Lookup::Found(BatchDepth(22))),
//!     StaticIndex::new(Lookup::Found(FeedIndex(4))),
//!     "http://localhost:1633",
//! );
//! let writer = RecordingWriter::new();
//! orchestrator.execute(params, &writer).await?;
//! assert_eq!(writer.requests().len(), 1);
//! ```

mod fixtures;
mod mocks;

pub use fixtures::{
    test_batch_id, test_reference, test_reserve_key, KNOWN_ADDRESS, KNOWN_KEY,
    MY_BLOG_ADDRESS, MY_BLOG_KEY,
};

pub use mocks::{RecordingWriter, StaticDepth, StaticIndex};
