//! Process configuration.
//!
//! A [`Config`] is built once at process entry and passed by reference to
//! every component. Nothing in this crate reads the environment except
//! [`Config::from_env`], which only the binary calls.
//!
//! # Environment Variables
//!
//! - `STAMPKIT_PRIVATE_KEY` - reserve key, 64 hex characters
//! - `STAMPKIT_BATCH_ID` - postage batch id, 64 hex characters
//! - `STAMPKIT_PROJECT` - project name (optional)
//! - `STAMPKIT_TOPIC` - feed topic, 64 hex characters (default: zero topic)
//! - `STAMPKIT_DEPTH` - explicit batch depth (optional)
//! - `STAMPKIT_FEED_INDEX` - explicit feed index (optional)
//! - `STAMPKIT_GATEWAY_URL` - storage gateway API (default: `http://localhost:1633`)
//! - `STAMPKIT_RPC_URL` - JSON-RPC endpoint (default: public Gnosis Chain RPC)
//! - `STAMPKIT_TIMEOUT_SECS` - lookup timeout in seconds (default: 5)
//!
//! Identifiers are kept as text and validated when first used, so an
//! unrelated malformed variable does not break commands that ignore it.

use std::fmt;
use std::str::FromStr;

use crate::feed::FeedUpdateParams;
use crate::keys::PrivateKey;
use crate::resolvers::{GatewayConfig, RpcConfig};
use crate::types::{BatchDepth, BatchId, FeedIndex, FeedTopic, Reference};
use crate::{Result, StampkitError};

/// Environment variable holding the reserve key.
pub const ENV_PRIVATE_KEY: &str = "STAMPKIT_PRIVATE_KEY";
/// Environment variable holding the batch id.
pub const ENV_BATCH_ID: &str = "STAMPKIT_BATCH_ID";
/// Environment variable holding the project name.
pub const ENV_PROJECT: &str = "STAMPKIT_PROJECT";
/// Environment variable holding the feed topic.
pub const ENV_TOPIC: &str = "STAMPKIT_TOPIC";
/// Environment variable holding an explicit depth.
pub const ENV_DEPTH: &str = "STAMPKIT_DEPTH";
/// Environment variable holding an explicit feed index.
pub const ENV_FEED_INDEX: &str = "STAMPKIT_FEED_INDEX";
/// Environment variable holding the gateway URL.
pub const ENV_GATEWAY_URL: &str = "STAMPKIT_GATEWAY_URL";
/// Environment variable holding the RPC URL.
pub const ENV_RPC_URL: &str = "STAMPKIT_RPC_URL";
/// Environment variable holding the lookup timeout.
pub const ENV_TIMEOUT_SECS: &str = "STAMPKIT_TIMEOUT_SECS";

/// Everything a command needs to know about its environment.
#[derive(Clone, Default)]
pub struct Config {
    /// Reserve key as supplied.
    pub private_key: Option<String>,
    /// Batch id as supplied.
    pub batch_id: Option<String>,
    /// Project name as supplied.
    pub project: Option<String>,
    /// Topic as supplied; the zero topic when unset.
    pub topic: Option<String>,
    /// Explicit depth.
    pub depth: Option<BatchDepth>,
    /// Explicit feed index.
    pub feed_index: Option<FeedIndex>,
    /// Storage gateway settings.
    pub gateway: GatewayConfig,
    /// JSON-RPC settings.
    pub rpc: RpcConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            private_key: var(ENV_PRIVATE_KEY),
            batch_id: var(ENV_BATCH_ID),
            project: var(ENV_PROJECT),
            topic: var(ENV_TOPIC),
            depth: parse_number::<u8>(ENV_DEPTH, var(ENV_DEPTH))?.map(BatchDepth),
            feed_index: parse_number::<u64>(ENV_FEED_INDEX, var(ENV_FEED_INDEX))?.map(FeedIndex),
            ..Self::default()
        };

        if let Some(url) = var(ENV_GATEWAY_URL) {
            config.gateway = GatewayConfig::new(url);
        }
        if let Some(url) = var(ENV_RPC_URL) {
            config.rpc = RpcConfig::new(url);
        }
        if let Some(secs) = parse_number::<u64>(ENV_TIMEOUT_SECS, var(ENV_TIMEOUT_SECS))? {
            config = config.with_timeout(secs);
        }

        Ok(config)
    }

    /// Set the timeout of both lookups.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.gateway = self.gateway.with_timeout(secs);
        self.rpc = self.rpc.with_timeout(secs);
        self
    }

    /// The reserve key, validated.
    pub fn reserve_key(&self) -> Result<PrivateKey> {
        let raw = self.private_key.as_deref().ok_or_else(|| {
            StampkitError::Config(format!("no private key given (set {})", ENV_PRIVATE_KEY))
        })?;
        PrivateKey::from_hex(raw)
    }

    /// The batch id, validated.
    pub fn batch_id(&self) -> Result<BatchId> {
        let raw = self.batch_id.as_deref().ok_or_else(|| {
            StampkitError::Config(format!("no batch id given (set {})", ENV_BATCH_ID))
        })?;
        BatchId::from_hex(raw)
    }

    /// The feed topic, validated; the zero topic when unset.
    pub fn topic(&self) -> Result<FeedTopic> {
        match self.topic.as_deref() {
            Some(raw) => FeedTopic::from_hex(raw),
            None => Ok(FeedTopic::default()),
        }
    }

    /// Validate everything a feed update needs and assemble its params.
    ///
    /// All inputs are checked here, before any network call.
    pub fn feed_params(&self, reference: &str) -> Result<FeedUpdateParams> {
        let reference = Reference::from_hex(reference)?;
        let mut params = FeedUpdateParams::new(self.reserve_key()?, reference, self.batch_id()?)
            .with_topic(self.topic()?);
        params.project = self.project.clone();
        params.depth = self.depth;
        params.index = self.feed_index;
        Ok(params)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("batch_id", &self.batch_id)
            .field("project", &self.project)
            .field("topic", &self.topic)
            .field("depth", &self.depth)
            .field("feed_index", &self.feed_index)
            .field("gateway", &self.gateway)
            .field("rpc", &self.rpc)
            .finish()
    }
}

fn parse_number<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| {
                    StampkitError::Config(format!("{} is not a valid number: {:?}", name, raw))
                })
        })
        .transpose()
}
