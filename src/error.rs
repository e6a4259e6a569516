//! # Error Handling
//!
//! This module defines the centralized error type for the `codeinventory`
//! library. It uses the `thiserror` library to build a single `Error` enum
//! covering every failure that can abort an inventory run, with messages
//! that name the repository, file, or URL involved.
//!
//! ## Key Components
//!
//! - **`Error`**: All failures surfaced by the library. Each variant carries
//!   enough context to tell the user which repository or request failed.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Not-found conditions are deliberately absent from this enum. A missing
//! declaration file or a repository without a license is an ordinary outcome,
//! reported through [`crate::provider::Lookup`] and resolved to "no value at
//! this tier" by the resolver.

use thiserror::Error;

/// Main error type for code inventory operations
#[derive(Error, Debug)]
pub enum Error {
    /// A declaration file exists but does not parse to a mapping.
    ///
    /// This is fatal for the repository it belongs to. Whether it also aborts
    /// the whole run depends on the builder's
    /// [`InvalidDeclarationPolicy`](crate::inventory::InvalidDeclarationPolicy).
    #[error("Invalid inventory declaration {file} in {repository}: {message}")]
    DeclarationParse {
        repository: String,
        file: String,
        message: String,
    },

    /// The hosting API rejected our credentials (401/403).
    #[error("Authentication failed for {url}: {message}")]
    Authentication { url: String, message: String },

    /// The request never produced an HTTP response.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The hosting API answered with a status we do not handle.
    #[error("Unexpected response from {url}: HTTP {status} - {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// A repository requested by full name does not exist or is not visible.
    #[error("Repository not found: {name}")]
    RepositoryNotFound { name: String },

    /// The run configuration file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An override entry is malformed.
    #[error("Invalid override '{entry}': {message}")]
    InvalidOverride { entry: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_declaration_parse() {
        let error = Error::DeclarationParse {
            repository: "GSA/ProductOne".to_string(),
            file: ".codeinventory.yml".to_string(),
            message: "top-level value is a sequence, expected a mapping".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid inventory declaration"));
        assert!(display.contains("GSA/ProductOne"));
        assert!(display.contains(".codeinventory.yml"));
        assert!(display.contains("expected a mapping"));
    }

    #[test]
    fn test_error_display_authentication() {
        let error = Error::Authentication {
            url: "https://api.github.com/orgs/GSA/repos".to_string(),
            message: "Bad credentials".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Authentication failed"));
        assert!(display.contains("Bad credentials"));
    }

    #[test]
    fn test_error_display_api() {
        let error = Error::Api {
            url: "https://api.github.com/orgs/GSA".to_string(),
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("HTTP 502"));
        assert!(display.contains("Bad Gateway"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "unknown field `orgs`".to_string(),
            hint: Some("Did you mean 'org'?".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Did you mean 'org'?"));
    }

    #[test]
    fn test_error_display_config_parse_without_hint() {
        let error = Error::ConfigParse {
            message: "expected a mapping".to_string(),
            hint: None,
        };
        assert!(!format!("{}", error).contains("hint:"));
    }

    #[test]
    fn test_error_display_invalid_override() {
        let error = Error::InvalidOverride {
            entry: "laborHours".to_string(),
            message: "expected KEY=VALUE".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid override 'laborHours'"));
        assert!(display.contains("expected KEY=VALUE"));
    }

    #[test]
    fn test_error_from_url_parse_error() {
        let error: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(format!("{}", error).contains("URL parsing error"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }
}
