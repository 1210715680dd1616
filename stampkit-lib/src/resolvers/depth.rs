//! Batch depth lookup over JSON-RPC.
//!
//! Issues a single read-only `eth_call` of `batchDepth(bytes32)` against the
//! postage stamp contract. The lookup never fails: a revert, an unknown batch,
//! a malformed answer and every transport error all come back as
//! [`Lookup::Absent`], and the caller falls back to the default depth.
//!
//! # Example
//!
//! ```rust,ignore
//! use stampkit_lib::resolvers::{BatchDepthResolver, RpcConfig};
//!
//! let resolver = BatchDepthResolver::new(RpcConfig::gnosis())?;
//! match resolver.resolve_depth(&batch_id).await {
//!     Lookup::Found(depth) => println!("depth {}", depth),
//!     Lookup::Absent { reason } => println!("unknown: {}", reason),
//! }
//! ```

use std::time::Duration;

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

use super::config::RpcConfig;
use crate::types::{BatchDepth, BatchId, Lookup};
use crate::{Result, StampkitError};

/// Solidity signature of the depth getter.
pub const BATCH_DEPTH_SIGNATURE: &str = "batchDepth(bytes32)";

/// Reads batch depths from the postage stamp contract.
pub struct BatchDepthResolver {
    config: RpcConfig,
    client: reqwest::Client,
}

impl BatchDepthResolver {
    /// Create a new resolver with the given configuration.
    pub fn new(config: RpcConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StampkitError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create a resolver for the public Gnosis Chain endpoint.
    pub fn gnosis() -> Result<Self> {
        Self::new(RpcConfig::gnosis())
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Resolve the depth of `batch_id`, folding every failure into `Absent`.
    #[tracing::instrument(skip(self), fields(batch_id = %batch_id, rpc = %self.config.rpc_url))]
    pub async fn resolve_depth(&self, batch_id: &BatchId) -> Lookup<BatchDepth> {
        match self.query_depth(batch_id).await {
            Ok(Some(depth)) => {
                tracing::debug!(depth = depth.0, "batch depth resolved");
                Lookup::Found(depth)
            }
            Ok(None) => Lookup::absent("batch not found on the ledger"),
            Err(e) => {
                tracing::debug!(error = %e, "batch depth lookup failed");
                Lookup::absent(e.to_string())
            }
        }
    }

    /// Query the contract, keeping transport and protocol errors.
    ///
    /// Returns `Ok(None)` when the contract reports no batch: an empty
    /// return value or a depth of zero, which a live batch cannot have.
    pub async fn query_depth(&self, batch_id: &BatchId) -> Result<Option<BatchDepth>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_call",
            params: (
                CallParams {
                    to: format!("0x{}", hex::encode(self.config.contract.as_slice())),
                    data: call_data(batch_id),
                },
                "latest",
            ),
        };

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StampkitError::Transport(format!(
                "rpc request failed ({}): {}",
                status.as_u16(),
                text
            )));
        }

        let body: JsonRpcResponse = response.json().await.map_err(|e| {
            StampkitError::Serialization(format!("Failed to parse JSON-RPC response: {}", e))
        })?;

        if let Some(error) = body.error {
            return Err(StampkitError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = body.result.ok_or_else(|| {
            StampkitError::Serialization("JSON-RPC response has neither result nor error".into())
        })?;
        decode_depth(&result)
    }

    /// Map reqwest errors to StampkitError.
    fn map_reqwest_error(&self, e: reqwest::Error) -> StampkitError {
        if e.is_timeout() {
            StampkitError::ConnectionTimeout {
                operation: "eth_call batchDepth".to_string(),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            StampkitError::ConnectionFailed {
                target: self.config.rpc_url.clone(),
                reason: e.to_string(),
            }
        } else {
            StampkitError::Transport(format!("rpc request failed: {}", e))
        }
    }
}

/// Four-byte function selector of `batchDepth(bytes32)`.
pub fn selector() -> [u8; 4] {
    let hash = keccak256(BATCH_DEPTH_SIGNATURE.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// ABI-encoded call data: selector followed by the batch id word.
pub fn call_data(batch_id: &BatchId) -> String {
    format!(
        "0x{}{}",
        hex::encode(selector()),
        hex::encode(batch_id.as_bytes())
    )
}

/// Decode a `uint8` return word.
fn decode_depth(result: &str) -> Result<Option<BatchDepth>> {
    let digits = crate::encoding::strip_prefix(result);
    if digits.is_empty() {
        return Ok(None);
    }

    let word = crate::encoding::decode_fixed::<32>(digits).map_err(|reason| {
        StampkitError::Serialization(format!("unexpected eth_call result: {}", reason))
    })?;
    if word[..31].iter().any(|b| *b != 0) {
        return Err(StampkitError::Serialization(format!(
            "eth_call result does not fit in uint8: 0x{}",
            digits
        )));
    }

    match word[31] {
        0 => Ok(None),
        depth => Ok(Some(BatchDepth(depth))),
    }
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallParams, &'static str),
}

#[derive(Serialize)]
struct CallParams {
    to: String,
    data: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
