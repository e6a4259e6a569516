//! # Inventory Declarations
//!
//! A repository may describe itself by committing a declaration file at its
//! root. This module finds that file, fetches it, and parses it into a
//! [`Declaration`].
//!
//! ## Lookup
//!
//! Empty repositories (size zero) are never inspected. Otherwise the root
//! directory is listed once and the first entry whose name is one of
//! [`DECLARATION_FILENAMES`] is taken, in listing order. There is no second
//! probe for other candidates.
//!
//! ## Format
//!
//! Files ending in `.yml` are YAML, files ending in `.json` are JSON. A
//! leading UTF-8 byte-order mark is stripped first. The document root must be
//! a mapping; anything else is an [`Error::DeclarationParse`].
//!
//! ```yaml
//! name: Product One
//! description: Does the first thing
//! permissions:
//!   licenses:
//!     - URL: https://example.gov/LICENSE
//!       name: CC0-1.0
//!   usageType: openSource
//! tags: [one, two]
//! contact:
//!   email: product-one@example.gov
//! laborHours: 120
//! codeinventory:
//!   exclude: false
//! ```
//!
//! Keys the resolver does not know about are kept and ignored.

use log::debug;
use serde_json::{Map, Value};

use crate::defaults::DECLARATION_FILENAMES;
use crate::error::{Error, Result};
use crate::provider::{Lookup, Repository, RepositoryProvider};
use crate::value::{dig, dig_present, from_yaml};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Directory path of the repository root, as passed to the provider.
const ROOT: &str = "";

/// The parsed content of one repository's declaration file.
///
/// A repository without a declaration has an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    document: Map<String, Value>,
    source: Option<String>,
}

impl Declaration {
    /// A declaration with no keys, as for a repository without a file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an already-parsed document.
    pub fn from_map(document: Map<String, Value>) -> Self {
        Self {
            document,
            source: None,
        }
    }

    /// Parses declaration `bytes` in the given format.
    ///
    /// `repository` and `file` only label the error.
    pub fn parse(
        repository: &str,
        file: &str,
        format: DeclarationFormat,
        bytes: &[u8],
    ) -> Result<Self> {
        let invalid = |message: String| Error::DeclarationParse {
            repository: repository.to_string(),
            file: file.to_string(),
            message,
        };

        let bytes = strip_bom(bytes);
        let root: Value = match format {
            DeclarationFormat::Yaml => {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_slice(bytes).map_err(|e| invalid(e.to_string()))?;
                if !yaml.is_mapping() {
                    return Err(invalid(format!(
                        "top-level value is {}, expected a mapping",
                        yaml_kind(&yaml)
                    )));
                }
                from_yaml(yaml)
            }
            DeclarationFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| invalid(e.to_string()))?
            }
        };

        match root {
            Value::Object(document) => Ok(Self {
                document,
                source: Some(file.to_string()),
            }),
            other => Err(invalid(format!(
                "top-level value is {}, expected a mapping",
                json_kind(&other)
            ))),
        }
    }

    /// The value at `path`, with `null` treated as absent.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        dig_present(&self.document, path)
    }

    /// The value at `path` exactly as declared, `null` included.
    pub fn get_raw<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        dig(&self.document, path)
    }

    /// Name of the file this declaration was read from, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

/// Serialization format of a declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Yaml,
    Json,
}

impl DeclarationFormat {
    /// Picks the format from the file suffix.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".yml") || name.ends_with(".yaml") {
            Some(DeclarationFormat::Yaml)
        } else if name.ends_with(".json") {
            Some(DeclarationFormat::Json)
        } else {
            None
        }
    }
}

/// Removes a leading UTF-8 byte-order mark.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Whether `name` is one of the recognised declaration filenames.
pub fn is_declaration_file(name: &str) -> bool {
    DECLARATION_FILENAMES.contains(&name)
}

/// Loads the declaration of `repo`, or an empty one if it has none.
///
/// Performs at most two provider calls: one directory listing and one file
/// fetch. Empty repositories cost none.
pub fn load(provider: &dyn RepositoryProvider, repo: &Repository) -> Result<Declaration> {
    if repo.is_empty() {
        debug!("{} is empty; no declaration lookup", repo.full_name);
        return Ok(Declaration::empty());
    }

    let entries = match provider.list_directory(repo, ROOT)? {
        Lookup::Found(entries) => entries,
        Lookup::NotFound => {
            debug!("{} has no readable root directory", repo.full_name);
            return Ok(Declaration::empty());
        }
    };

    let Some(entry) = entries.iter().find(|entry| is_declaration_file(&entry.name)) else {
        debug!("{} has no declaration file", repo.full_name);
        return Ok(Declaration::empty());
    };

    let Some(format) = DeclarationFormat::from_file_name(&entry.name) else {
        return Ok(Declaration::empty());
    };

    let bytes = match provider.fetch_file_bytes(repo, &entry.path)? {
        Lookup::Found(bytes) => bytes,
        Lookup::NotFound => {
            debug!("{} vanished from {}", entry.path, repo.full_name);
            return Ok(Declaration::empty());
        }
    };

    debug!("{}: read declaration from {}", repo.full_name, entry.name);
    Declaration::parse(&repo.full_name, &entry.name, format, &bytes)
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
