//! Address command - print the address that owns a feed

use anyhow::Result;
use stampkit_lib::keys::address_path_segment;
use stampkit_lib::{address_of, Config};

use crate::ui;

#[tracing::instrument(skip(config, key))]
pub fn run(
    config: &Config,
    key: Option<String>,
    project: Option<String>,
    verbose: bool,
) -> Result<()> {
    let reserve = super::reserve_key(config, key)?;
    let signer = super::signer_key(&reserve, project.as_deref())?;
    let address = address_of(&signer);

    if !verbose {
        println!("{}", address);
        return Ok(());
    }

    ui::header("Feed Owner");
    ui::key_value("Address", &address.to_string());
    ui::key_value("Path form", &address_path_segment(&address));
    if project.is_some() {
        ui::key_value("Reserve address", &address_of(&reserve).to_string());
    }
    Ok(())
}
