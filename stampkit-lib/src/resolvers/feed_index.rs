//! Next feed index lookup against a storage gateway.
//!
//! `GET {gateway}/feeds/{owner}/{topic}` reports the state of a feed. The
//! answer is reduced to a [`FeedState`] before anything else looks at it:
//!
//! 1. `404` means the feed was never written; the next index is 0.
//! 2. A next-index value (`swarm-feed-index-next` header, or `feedIndexNext`
//!    in a JSON body) is used as is.
//! 3. A current-index value (`swarm-feed-index` header, or `feedIndex` in a
//!    JSON body) yields current + 1.
//! 4. Anything else is unknown and the caller must fall back.
//!
//! Some gateways only report the last written index. Returning that value
//! unchanged would overwrite the latest update, so rule 3 always adds one.

use std::time::Duration;

use alloy_primitives::Address;
use reqwest::StatusCode;
use serde_json::Value;

use super::config::GatewayConfig;
use crate::keys::address_path_segment;
use crate::types::{FeedIndex, FeedTopic, Lookup};
use crate::{Result, StampkitError};

/// Header carrying the next writable index.
pub const NEXT_INDEX_HEADER: &str = "swarm-feed-index-next";

/// Header carrying the last written index.
pub const CURRENT_INDEX_HEADER: &str = "swarm-feed-index";

/// Feed state as reported by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedState {
    /// The gateway has no update for this owner and topic.
    NeverWritten,
    /// The gateway reported the next writable index.
    Next(FeedIndex),
    /// The gateway reported only the last written index.
    Current(FeedIndex),
    /// The response carried no usable index.
    Unknown,
}

impl FeedState {
    /// Reduce a successful response to a feed state.
    ///
    /// Unparseable values are treated as missing.
    pub fn from_signals(
        next_header: Option<&str>,
        current_header: Option<&str>,
        body: &[u8],
    ) -> Self {
        let json = serde_json::from_slice::<Value>(body).ok();
        let body_field = |name: &str| {
            json.as_ref()
                .and_then(|v| v.get(name))
                .and_then(index_from_json)
        };

        let next = next_header
            .and_then(FeedIndex::from_hex)
            .or_else(|| body_field("feedIndexNext"));
        if let Some(index) = next {
            return Self::Next(index);
        }

        let current = current_header
            .and_then(FeedIndex::from_hex)
            .or_else(|| body_field("feedIndex"));
        match current {
            Some(index) => Self::Current(index),
            None => Self::Unknown,
        }
    }

    /// The index to write next, if the state determines one.
    pub fn next_index(&self) -> Lookup<FeedIndex> {
        match self {
            Self::NeverWritten => Lookup::Found(FeedIndex(0)),
            Self::Next(index) => Lookup::Found(*index),
            Self::Current(index) => match index.next() {
                Some(next) => Lookup::Found(next),
                None => Lookup::absent("current feed index is at the maximum value"),
            },
            Self::Unknown => Lookup::absent("gateway response carried no feed index"),
        }
    }
}

/// Index values in JSON bodies are hex strings, or plain integers.
fn index_from_json(value: &Value) -> Option<FeedIndex> {
    match value {
        Value::String(s) => FeedIndex::from_hex(s),
        Value::Number(n) => n.as_u64().map(FeedIndex),
        _ => None,
    }
}

/// Queries a storage gateway for feed state.
pub struct FeedIndexResolver {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl FeedIndexResolver {
    /// Create a new resolver with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StampkitError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the feed lookup URL for an owner and topic.
    pub fn feed_url(&self, owner: &Address, topic: &FeedTopic) -> String {
        format!(
            "{}/feeds/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            address_path_segment(owner),
            topic
        )
    }

    /// Resolve the next writable index, folding every failure into `Absent`.
    #[tracing::instrument(skip(self), fields(owner = %owner, topic = %topic))]
    pub async fn resolve_next_index(
        &self,
        owner: &Address,
        topic: &FeedTopic,
    ) -> Lookup<FeedIndex> {
        match self.query_state(owner, topic).await {
            Ok(state) => {
                tracing::debug!(?state, "feed state reported by gateway");
                state.next_index()
            }
            Err(e) => {
                tracing::debug!(error = %e, "feed lookup failed");
                Lookup::absent(e.to_string())
            }
        }
    }

    /// Query the gateway, keeping transport errors and unexpected statuses.
    pub async fn query_state(&self, owner: &Address, topic: &FeedTopic) -> Result<FeedState> {
        let url = self.feed_url(owner, topic);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(FeedState::NeverWritten);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StampkitError::Transport(format!(
                "feed lookup failed ({}): {}",
                status.as_u16(),
                text
            )));
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let next = header(NEXT_INDEX_HEADER);
        let current = header(CURRENT_INDEX_HEADER);

        let body = response.bytes().await.map_err(|e| {
            StampkitError::Transport(format!("Failed to read feed response: {}", e))
        })?;

        Ok(FeedState::from_signals(
            next.as_deref(),
            current.as_deref(),
            &body,
        ))
    }

    /// Map reqwest errors to StampkitError.
    fn map_reqwest_error(&self, e: reqwest::Error) -> StampkitError {
        if e.is_timeout() {
            StampkitError::ConnectionTimeout {
                operation: "feed lookup".to_string(),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            StampkitError::ConnectionFailed {
                target: self.config.api_url.clone(),
                reason: e.to_string(),
            }
        } else {
            StampkitError::Transport(format!("feed lookup failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url() {
        let resolver = FeedIndexResolver::new(GatewayConfig::new("http://gw.example/")).unwrap();
        let owner = Address::repeat_byte(0xAB);
        let url = resolver.feed_url(&owner, &FeedTopic::default());
        assert_eq!(
            url,
            format!("http://gw.example/feeds/{}/{}", "ab".repeat(20), "0".repeat(64))
        );
    }

    #[test]
    fn test_next_header_wins() {
        let state =
            FeedState::from_signals(Some("0000000000000007"), Some("0000000000000003"), b"");
        assert_eq!(state, FeedState::Next(FeedIndex(7)));
        assert_eq!(state.next_index(), Lookup::Found(FeedIndex(7)));
    }

    #[test]
    fn test_current_only_adds_one() {
        let state = FeedState::from_signals(None, Some("0000000000000004"), b"binary payload");
        assert_eq!(state, FeedState::Current(FeedIndex(4)));
        assert_eq!(state.next_index(), Lookup::Found(FeedIndex(5)));
    }

    #[test]
    fn test_hex_values_are_base_16() {
        let state = FeedState::from_signals(Some("000000000000001a"), None, b"");
        assert_eq!(state.next_index(), Lookup::Found(FeedIndex(26)));
    }

    #[test]
    fn test_body_fields() {
        let state = FeedState::from_signals(None, None, br#"{"feedIndex":"0a"}"#);
        assert_eq!(state.next_index(), Lookup::Found(FeedIndex(11)));

        let body = br#"{"feedIndex":"0a","feedIndexNext":"0b"}"#;
        let state = FeedState::from_signals(None, None, body);
        assert_eq!(state, FeedState::Next(FeedIndex(11)));

        let state = FeedState::from_signals(None, None, br#"{"feedIndexNext":12}"#);
        assert_eq!(state, FeedState::Next(FeedIndex(12)));
    }

    #[test]
    fn test_next_in_body_beats_current_header() {
        let state = FeedState::from_signals(None, Some("02"), br#"{"feedIndexNext":"09"}"#);
        assert_eq!(state, FeedState::Next(FeedIndex(9)));
    }

    #[test]
    fn test_unknown_and_overflow() {
        let state = FeedState::from_signals(Some("zz"), None, b"{}");
        assert_eq!(state, FeedState::Unknown);
        assert!(!state.next_index().is_found());

        let state = FeedState::Current(FeedIndex(u64::MAX));
        assert!(!state.next_index().is_found());
    }

    #[test]
    fn test_never_written_starts_at_zero() {
        assert_eq!(FeedState::NeverWritten.next_index(), Lookup::Found(FeedIndex(0)));
    }
}
