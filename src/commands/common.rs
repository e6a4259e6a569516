//! Settings and output shared by the inventory commands
//!
//! Run settings are layered: command-line flag, then environment variable
//! (clap's `env` attribute folds these two together), then the configuration
//! file, then the built-in default.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use serde::Serialize;

use codeinventory::config::Config;
use codeinventory::defaults::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_CONFIG_FILENAME, TOKEN_ENV};
use codeinventory::exclusion::ExclusionFilter;
use codeinventory::inventory::{InvalidDeclarationPolicy, Inventory};
use codeinventory::overrides::Overrides;
use codeinventory::provider::github::GitHubProvider;
use codeinventory::suggestions;

/// Options every inventory command accepts.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the run configuration file.
    ///
    /// Defaults to `codeinventory.yaml` in the working directory, if present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub API root, for GitHub Enterprise installations.
    #[arg(long, value_name = "URL", env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Access token used for every API request.
    #[arg(long, value_name = "TOKEN", env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Override a field for every repository, e.g. `contact.email=team@example.gov`.
    ///
    /// The value is read as YAML: `0` is a number, `[a, b]` a list.
    #[arg(long = "override", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// YAML or JSON file of overrides, applied before any `--override`.
    #[arg(long, value_name = "FILE")]
    pub overrides_file: Option<PathBuf>,

    /// Leave out repositories whose declaration file does not parse instead
    /// of failing.
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Fully layered settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub org: Option<String>,
    pub api_url: String,
    pub token: Option<String>,
    pub overrides: Overrides,
    pub exclusions: ExclusionFilter,
    pub policy: InvalidDeclarationPolicy,
}

impl Settings {
    /// Layers `args`, the positional org and `--exclude` names over the
    /// configuration file.
    pub fn load(args: &RunArgs, org: Option<&str>, exclude: &[String]) -> Result<Self> {
        let config = load_config(args.config.as_deref())?;

        let mut overrides = config.overrides;
        if let Some(path) = &args.overrides_file {
            overrides.merge(Overrides::from_file(path).map_err(suggestions::explain)?);
        }
        for entry in &args.overrides {
            overrides
                .apply_assignment(entry)
                .map_err(suggestions::explain)?;
        }

        let policy = if args.skip_invalid {
            InvalidDeclarationPolicy::Skip
        } else {
            config.on_invalid_declaration
        };

        Ok(Self {
            org: org.map(str::to_string).or(config.org),
            api_url: args
                .api_url
                .clone()
                .or(config.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: args.token.clone(),
            overrides,
            exclusions: ExclusionFilter::new(config.exclude.into_iter().chain(exclude.iter().cloned())),
            policy,
        })
    }

    pub fn provider(&self) -> Result<GitHubProvider> {
        GitHubProvider::new(&self.api_url, self.token.as_deref())
            .with_context(|| format!("Invalid API URL: {}", self.api_url))
    }

    /// The builder for this run, minus the organization check.
    pub fn inventory<'a>(&self, provider: &'a GitHubProvider, org: &str) -> Inventory<'a> {
        Inventory::new(provider, org)
            .with_overrides(self.overrides.clone())
            .with_exclusions(self.exclusions.clone())
            .with_invalid_declaration_policy(self.policy)
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) if !path.exists() => return Err(suggestions::config_not_found(path)),
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !default.exists() {
                return Ok(Config::default());
            }
            default
        }
    };

    debug!("Reading configuration from {}", path.display());
    Config::from_file(&path).map_err(suggestions::explain)
}

/// Where JSON output goes: a file given with `--output`, or stdout.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_pretty<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
