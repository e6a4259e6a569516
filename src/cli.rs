//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::commands;

/// Code Inventory - Build a code inventory for a GitHub organization
#[derive(Parser, Debug)]
#[command(name = "codeinventory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(long, global = true, value_name = "LEVEL", value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the inventory of every repository in an organization
    Github(commands::github::GithubArgs),

    /// Build the inventory record of a single repository
    Project(commands::project::ProjectArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level);

        match self.command {
            Commands::Github(args) => commands::github::execute(args),
            Commands::Project(args) => commands::project::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Logs go to stderr so stdout only ever carries JSON.
fn init_logging(level: LogLevel) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level.as_filter());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(level, LogLevel::Debug | LogLevel::Trace))
        .target(env_logger::Target::Stderr)
        .init();
}
