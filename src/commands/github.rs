//! # Github Command Implementation
//!
//! Builds the inventory of every repository in an organization and prints
//! it as a pretty JSON array, or as one compact record per line with
//! `--stream`.
//!
//! ```bash
//! codeinventory github GSA --exclude ProductOne --override laborHours=0
//! codeinventory github GSA --stream > inventory.ndjson
//! ```

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use crate::commands::common::{open_output, write_pretty, RunArgs, Settings};
use codeinventory::record::InventoryRecord;
use codeinventory::suggestions;

/// Build the inventory of every repository in an organization
#[derive(Args, Debug)]
pub struct GithubArgs {
    /// Organization login, e.g. `GSA`. Falls back to `org` in the config file.
    #[arg(value_name = "ORG")]
    pub org: Option<String>,

    /// Leave out a repository by its short name. Repeatable.
    #[arg(short = 'x', long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Print one compact JSON record per line as each repository completes.
    #[arg(long, conflicts_with = "parallel")]
    pub stream: bool,

    /// Resolve repositories concurrently. Output order is unchanged.
    #[arg(long)]
    pub parallel: bool,

    /// Write the output to FILE instead of stdout. A failed run leaves an
    /// existing FILE untouched unless `--stream` is given.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Execute the `github` command.
pub fn execute(args: GithubArgs) -> Result<()> {
    let settings = Settings::load(&args.run, args.org.as_deref(), &args.exclude)?;
    let org = settings.org.clone().ok_or_else(suggestions::org_missing)?;
    let provider = settings.provider()?;
    let inventory = settings.inventory(&provider, &org);

    if args.stream {
        let mut out = open_output(args.output.as_deref())?;
        let mut write_error = None;
        let records = inventory
            .build_with(|record| match write_line(&mut *out, record) {
                Ok(()) => ControlFlow::Continue(()),
                Err(error) => {
                    write_error = Some(error);
                    ControlFlow::Break(())
                }
            })
            .map_err(suggestions::explain)?;
        if let Some(error) = write_error {
            return Err(error).context("Failed to write streamed record");
        }
        info!("Streamed {} records", records.len());
        return Ok(());
    }

    let records = if args.parallel {
        inventory.build_parallel()
    } else {
        inventory.build()
    }
    .map_err(suggestions::explain)?;

    // Only a complete inventory replaces an existing output file.
    let mut out = open_output(args.output.as_deref())?;
    write_pretty(&mut *out, &records)
}

fn write_line(out: &mut dyn Write, record: &InventoryRecord) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    out.flush()
}
