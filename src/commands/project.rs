//! # Project Command Implementation
//!
//! Resolves a single repository by its full name and prints its record, or
//! `null` when the repository's declaration excludes it. The name exclusion
//! list does not apply here.

use anyhow::Result;
use clap::Args;

use crate::commands::common::{open_output, write_pretty, RunArgs, Settings};
use codeinventory::suggestions;

/// Build the inventory record of a single repository
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Full repository name, e.g. `GSA/ProductOne`.
    #[arg(value_name = "OWNER/NAME")]
    pub repository: String,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Execute the `project` command.
pub fn execute(args: ProjectArgs) -> Result<()> {
    let settings = Settings::load(&args.run, None, &[])?;
    let org = args
        .repository
        .split_once('/')
        .map(|(owner, _)| owner.to_string())
        .or_else(|| settings.org.clone())
        .unwrap_or_default();

    let provider = settings.provider()?;
    let record = settings
        .inventory(&provider, &org)
        .project(&args.repository)
        .map_err(suggestions::explain)?;

    let mut out = open_output(None)?;
    write_pretty(&mut *out, &record)
}
