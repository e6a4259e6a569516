//! Default values for codeinventory.
//!
//! This module provides centralized default values used across the library
//! and the CLI, ensuring consistency and avoiding duplication.

/// GitHub's public REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Run configuration file picked up from the working directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "codeinventory.yaml";

/// Declaration filenames recognised at a repository's root.
///
/// The first of these found in directory-listing order is used.
pub const DECLARATION_FILENAMES: [&str; 4] = [
    ".codeinventory.yml",
    "codeinventory.yml",
    ".codeinventory.json",
    "codeinventory.json",
];

/// Environment variable holding the access token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the API root (GitHub Enterprise).
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// REST API version requested on every call.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Items requested per page on listing endpoints (GitHub's maximum).
pub const PAGE_SIZE: u32 = 100;

pub const USER_AGENT: &str = concat!("codeinventory/", env!("CARGO_PKG_VERSION"));
