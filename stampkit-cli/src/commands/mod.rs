//! CLI command implementations

pub mod address;
pub mod depth;
pub mod feed;
pub mod index;
pub mod project;

use anyhow::{Context, Result};
use stampkit_lib::{Config, FeedTopic, PrivateKey, ProjectIdentity};

/// The key given on the command line, or the configured reserve key.
pub fn reserve_key(config: &Config, key: Option<String>) -> Result<PrivateKey> {
    match key {
        Some(raw) => PrivateKey::from_hex(&raw).context("invalid --key"),
        None => Ok(config.reserve_key()?),
    }
}

/// The signing key: the project key when a project is named.
pub fn signer_key(reserve: &PrivateKey, project: Option<&str>) -> Result<PrivateKey> {
    match project {
        Some(name) => Ok(ProjectIdentity::derive(reserve, name)?.key),
        None => Ok(reserve.clone()),
    }
}

/// Pick the topic from `--topic`, `--topic-name` or the configuration.
pub fn topic(
    config: &Config,
    topic: Option<String>,
    topic_name: Option<String>,
) -> Result<FeedTopic> {
    match (topic, topic_name) {
        (Some(_), Some(_)) => anyhow::bail!("--topic and --topic-name are mutually exclusive"),
        (Some(raw), None) => FeedTopic::from_hex(&raw).context("invalid --topic"),
        (None, Some(name)) => Ok(FeedTopic::from_name(&name)),
        (None, None) => Ok(config.topic()?),
    }
}
