//! In-memory sources and writers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::feed::{FeedUpdateRequest, FeedWriter};
use crate::resolvers::{DepthSource, IndexSource};
use crate::types::{BatchDepth, BatchId, FeedIndex, FeedTopic, Lookup};
use crate::{Result, StampkitError};

/// Depth source that always gives the same answer.
pub struct StaticDepth {
    answer: Lookup<BatchDepth>,
    calls: AtomicUsize,
}

impl StaticDepth {
    /// Answer every lookup with `answer`.
    pub fn new(answer: Lookup<BatchDepth>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DepthSource for StaticDepth {
    async fn resolve_depth(&self, _batch_id: &BatchId) -> Lookup<BatchDepth> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

/// Index source that always gives the same answer and records who asked.
pub struct StaticIndex {
    answer: Lookup<FeedIndex>,
    owners: Mutex<Vec<Address>>,
}

impl StaticIndex {
    /// Answer every lookup with `answer`.
    pub fn new(answer: Lookup<FeedIndex>) -> Self {
        Self {
            answer,
            owners: Mutex::new(Vec::new()),
        }
    }

    /// Owners looked up, in order.
    pub fn owners(&self) -> Vec<Address> {
        self.owners.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IndexSource for StaticIndex {
    async fn resolve_next_index(&self, owner: &Address, _topic: &FeedTopic) -> Lookup<FeedIndex> {
        if let Ok(mut owners) = self.owners.lock() {
            owners.push(*owner);
        }
        self.answer.clone()
    }
}

/// Writer that keeps every request instead of sending it.
#[derive(Default)]
pub struct RecordingWriter {
    requests: Mutex<Vec<FeedUpdateRequest>>,
    failure: Option<String>,
}

impl RecordingWriter {
    /// A writer that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that records and then rejects every request.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<FeedUpdateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FeedWriter for RecordingWriter {
    async fn write_feed_update(&self, request: &FeedUpdateRequest) -> Result<()> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.failure {
            Some(message) => Err(StampkitError::Write(message.clone())),
            None => Ok(()),
        }
    }
}
