//! # Run Configuration
//!
//! Settings for one inventory run can be kept in a `codeinventory.yaml` file
//! (JSON is accepted too):
//!
//! ```yaml
//! org: GSA
//! api_url: https://api.github.com
//! exclude: [ProductOne]
//! overrides:
//!   contact:
//!     email: team@example.gov
//! on_invalid_declaration: skip
//! ```
//!
//! Every key is optional. Command-line flags and environment variables take
//! precedence over the file; the CLI does that layering.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::inventory::InvalidDeclarationPolicy;
use crate::overrides::Overrides;
use crate::suggestions::find_similar;

/// Keys accepted at the top level of the configuration file.
pub const CONFIG_KEYS: [&str; 5] = ["org", "api_url", "exclude", "overrides", "on_invalid_declaration"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Organization to inventory.
    #[serde(default)]
    pub org: Option<String>,
    /// API root, for GitHub Enterprise installations.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Short names of repositories to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub overrides: Overrides,
    #[serde(default)]
    pub on_invalid_declaration: InvalidDeclarationPolicy,
}

impl Config {
    /// Parses a configuration document. An empty document is the default
    /// configuration.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|error| config_error(&error.to_string()))?;
        if document.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(document).map_err(|error| config_error(&error.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|error| match error {
            Error::ConfigParse { message, hint } => Error::ConfigParse {
                message: format!("{}: {}", path.display(), message),
                hint,
            },
            other => other,
        })
    }
}

fn config_error(message: &str) -> Error {
    let hint = unknown_field(message).map(|field| match find_similar(field, &CONFIG_KEYS) {
        Some(similar) => format!("Did you mean '{similar}'?"),
        None => format!("Valid keys are: {}", CONFIG_KEYS.join(", ")),
    });
    Error::ConfigParse {
        message: message.to_string(),
        hint,
    }
}

/// Pulls the offending key out of serde's "unknown field `x`" message.
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.split_once("unknown field `")?.1;
    rest.split_once('`').map(|(field, _)| field)
}
