//! Next-index command - ask the gateway where the next update goes

use std::str::FromStr;

use anyhow::{Context, Result};
use stampkit_lib::resolvers::FeedIndexResolver;
use stampkit_lib::{Address, Config, Lookup, FALLBACK_FEED_INDEX};

use crate::ui;

/// Who owns the feed being looked up.
pub struct OwnerArgs {
    pub owner: Option<String>,
    pub key: Option<String>,
    pub project: Option<String>,
}

impl OwnerArgs {
    fn resolve(self, config: &Config) -> Result<Address> {
        match self.owner {
            Some(raw) => Address::from_str(raw.trim()).context("invalid --owner"),
            None => {
                let reserve = super::reserve_key(config, self.key)?;
                Ok(super::signer_key(&reserve, self.project.as_deref())?.address())
            }
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn run(
    config: &Config,
    owner: OwnerArgs,
    topic: Option<String>,
    topic_name: Option<String>,
    verbose: bool,
) -> Result<()> {
    let owner = owner.resolve(config)?;
    let topic = super::topic(config, topic, topic_name)?;

    let resolver = FeedIndexResolver::new(config.gateway.clone())?;
    if verbose {
        ui::info(&format!("Feed URL: {}", resolver.feed_url(&owner, &topic)));
    }

    let spinner = ui::spinner("Querying feed state...");
    let lookup = resolver.resolve_next_index(&owner, &topic).await;
    spinner.finish_and_clear();

    match lookup {
        Lookup::Found(index) => {
            ui::success(&format!("Next index for {}: {}", owner, index));
        }
        Lookup::Absent { reason } => {
            ui::warning(&format!("Feed index unavailable: {}", reason));
            ui::info(&format!(
                "A feed update would fall back to index {}",
                FALLBACK_FEED_INDEX
            ));
        }
    }
    Ok(())
}
