//! Configuration types for the external-service resolvers.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Storage-allocation (postage stamp) contract on Gnosis Chain.
pub const POSTAGE_STAMP_CONTRACT: Address = address!("45a1502382541cd610cc9068e88727426b696293");

/// Gnosis Chain id.
pub const GNOSIS_CHAIN_ID: u64 = 100;

/// Public Gnosis Chain JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://rpc.gnosischain.com";

/// Local storage gateway API.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:1633";

/// Request timeout shared by both resolvers, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_contract() -> Address {
    POSTAGE_STAMP_CONTRACT
}

/// Configuration for the JSON-RPC batch depth lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Contract answering `batchDepth(bytes32)`.
    #[serde(default = "default_contract")]
    pub contract: Address,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RpcConfig {
    /// Create a new RPC configuration against the default contract.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract: default_contract(),
            timeout_secs: default_timeout(),
        }
    }

    /// Create config for the public Gnosis Chain endpoint.
    pub fn gnosis() -> Self {
        Self::new(DEFAULT_RPC_URL)
    }

    /// Set the contract address.
    pub fn with_contract(mut self, contract: Address) -> Self {
        self.contract = contract;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::gnosis()
    }
}

/// Configuration for the storage gateway feed lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API base URL (e.g., `http://localhost:1633`).
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Create a new gateway configuration.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Create config for a gateway on the local machine.
    pub fn local() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::local()
    }
}
