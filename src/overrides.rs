//! Caller-supplied override values
//!
//! Overrides have the same shape as a declaration file and beat both the
//! declaration and the platform defaults for every repository in the run.
//! They can come from a YAML/JSON file, from the run configuration, or from
//! `KEY=VALUE` pairs on the command line, where `KEY` is a dotted path:
//!
//! ```
//! use codeinventory::overrides::Overrides;
//! use serde_json::json;
//!
//! let mut overrides = Overrides::new();
//! overrides.apply_assignment("contact.email=team@example.gov").unwrap();
//! overrides.apply_assignment("laborHours=0").unwrap();
//!
//! assert_eq!(overrides.get(&["contact", "email"]), Some(&json!("team@example.gov")));
//! assert_eq!(overrides.get(&["laborHours"]), Some(&json!(0)));
//! ```
//!
//! Top-level keys containing dots are expanded, so a flat
//! `{"contact.email": "..."}` and a nested `{"contact": {"email": "..."}}`
//! mean the same thing.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::value::{dig_present, from_yaml, insert_path, merge_into, parse_key_path};

/// Override values applied identically to every repository.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Overrides {
    values: Map<String, Value>,
}

impl From<Map<String, Value>> for Overrides {
    fn from(map: Map<String, Value>) -> Self {
        let mut values = Map::new();
        for (key, value) in map {
            let path = parse_key_path(&key);
            if path.len() > 1 {
                let mut nested = Map::new();
                insert_path(&mut nested, &path, value);
                merge_into(&mut values, nested);
            } else {
                let mut single = Map::new();
                single.insert(key, value);
                merge_into(&mut values, single);
            }
        }
        Self { values }
    }
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads overrides from a YAML or JSON file whose root is a mapping.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|error| match error {
            Error::ConfigParse { message, hint } => Error::ConfigParse {
                message: format!("{}: {}", path.display(), message),
                hint,
            },
            other => other,
        })
    }

    /// Parses overrides from YAML (which includes JSON).
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let root: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
                message: format!("invalid overrides: {e}"),
                hint: None,
            })?;

        match from_yaml(root) {
            Value::Object(map) => Ok(map.into()),
            Value::Null => Ok(Self::new()),
            _ => Err(Error::ConfigParse {
                message: "overrides must be a mapping".to_string(),
                hint: Some("Use keys such as 'description' or 'contact: {email: ...}'".to_string()),
            }),
        }
    }

    /// Applies one `KEY=VALUE` assignment.
    ///
    /// `VALUE` is read as YAML when it is a number, a boolean, `~`/`null`,
    /// a quoted string or a bracketed list or mapping, so `0` is a number and
    /// `[a, b]` a list. Anything else is kept verbatim as a string, including
    /// text YAML would read as a mapping (`Tools: for data`) or a comment
    /// (`#1 tool`).
    pub fn apply_assignment(&mut self, entry: &str) -> Result<()> {
        let (key, raw) = entry.split_once('=').ok_or_else(|| Error::InvalidOverride {
            entry: entry.to_string(),
            message: "expected KEY=VALUE".to_string(),
        })?;

        let path = parse_key_path(key.trim());
        if path.is_empty() {
            return Err(Error::InvalidOverride {
                entry: entry.to_string(),
                message: "key is empty".to_string(),
            });
        }

        self.set(&path, parse_scalar(raw));
        Ok(())
    }

    /// Sets the value at `path`, replacing whatever was there.
    pub fn set<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        insert_path(&mut self.values, path, value);
    }

    /// The override at `path`. An explicit `null` counts as not overridden.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        dig_present(&self.values, path)
    }

    /// Layers `other` on top of these overrides.
    pub fn merge(&mut self, other: Overrides) {
        merge_into(&mut self.values, other.values);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

}

const NULL_LITERALS: &[&str] = &["~", "null", "Null", "NULL"];

fn parse_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();
    let verbatim = Value::String(trimmed.to_string());
    if trimmed.is_empty() {
        return verbatim;
    }

    let Ok(parsed) = serde_yaml::from_str::<Value>(trimmed) else {
        return verbatim;
    };
    match parsed {
        Value::Null if NULL_LITERALS.contains(&trimmed) => Value::Null,
        Value::Bool(_) | Value::Number(_) => parsed,
        Value::String(_) if trimmed.starts_with(['"', '\'']) => parsed,
        Value::Array(_) if trimmed.starts_with('[') => parsed,
        Value::Object(_) if trimmed.starts_with('{') => parsed,
        _ => verbatim,
    }
}
