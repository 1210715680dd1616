//! Project command - derive the identity of a named project

use anyhow::Result;
use stampkit_lib::{Config, ProjectIdentity};

use crate::ui;

#[tracing::instrument(skip(config, key))]
pub fn run(config: &Config, name: &str, key: Option<String>, reveal: bool) -> Result<()> {
    let reserve = super::reserve_key(config, key)?;
    let identity = ProjectIdentity::derive(&reserve, name)?;
    tracing::debug!(slug = %identity.slug, "project derived");

    ui::header("Project Identity");
    ui::key_value("Name", name);
    ui::key_value("Slug", identity.slug.as_str());
    ui::key_value("Address", &identity.address().to_string());
    ui::key_value("Reserve address", &reserve.address().to_string());

    if reveal {
        ui::separator();
        ui::warning("The project key below can sign updates to this feed. Keep it secret.");
        ui::key_value("Private key", &identity.key.to_hex());
    }
    Ok(())
}
