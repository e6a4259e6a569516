//! # Repository Data Providers
//!
//! The inventory engine never talks to a hosting platform directly. Everything
//! it needs, including repository listings, top-level directory contents, file
//! bytes, license data and organization details, comes through the
//! [`RepositoryProvider`] trait defined here.
//!
//! ## Implementations
//!
//! - **[`github::GitHubProvider`]**: talks to the GitHub REST API (or a GitHub
//!   Enterprise instance) over blocking HTTP. Used by the CLI.
//! - **[`memory::MemoryProvider`]**: serves a fixed, in-memory organization and
//!   records every call it receives. Used by tests and benchmarks to check
//!   which requests the engine makes, not just what it returns.
//!
//! ## Not found is not an error
//!
//! Several lookups can legitimately miss: a repository without a license, a
//! declaration file that disappeared between listing and fetch. Those return
//! [`Lookup::NotFound`] instead of an error, so the resolver can fall through
//! to the next tier without inspecting error variants.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod github;
pub mod memory;

/// The outcome of a provider lookup that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The resource exists.
    Found(T),
    /// The platform reported that the resource does not exist.
    NotFound,
}

impl<T> Lookup<T> {
    /// Converts into an `Option`, discarding the not-found marker.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

/// The account that owns a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// License information as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// SPDX identifier such as `MIT` or `NOASSERTION`.
    #[serde(default)]
    pub spdx_id: Option<String>,
    /// URL of the license description on the platform.
    #[serde(default)]
    pub url: Option<String>,
}

/// A snapshot of one repository as returned by the platform's listing.
///
/// Field names follow the GitHub REST API so listings deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Short name, e.g. `ProductOne`.
    pub name: String,
    /// Qualified name, e.g. `GSA/ProductOne`.
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Size in kilobytes; zero for a repository without any commits.
    #[serde(default)]
    pub size: u64,
    pub html_url: String,
    pub owner: Owner,
}

impl Repository {
    /// Creates a public, non-empty repository snapshot owned by `owner`.
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            full_name: format!("{owner}/{name}"),
            private: false,
            description: None,
            topics: Vec::new(),
            size: 1,
            html_url: format!("https://github.com/{owner}/{name}"),
            owner: Owner {
                login: owner.to_string(),
            },
        }
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// A repository with no content at all. The platform reports size zero.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
}

impl DirectoryEntry {
    /// An entry at the repository root, where name and path coincide.
    pub fn root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
        }
    }
}

/// Organization details. Only the contact email feeds the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Everything the inventory engine needs from a hosting platform.
///
/// Implementations own pagination, authentication and transport. Any error
/// they return aborts the run; legitimate misses are reported as
/// [`Lookup::NotFound`].
pub trait RepositoryProvider: Send + Sync {
    /// Lists every repository of `org`, fully paginated, in platform order.
    fn list_organization_repositories(&self, org: &str) -> Result<Vec<Repository>>;

    /// Looks up a single repository by its qualified name (`owner/name`).
    fn repository(&self, full_name: &str) -> Result<Lookup<Repository>>;

    /// Lists the entries of `path` in `repo`. The root is the empty path.
    fn list_directory(&self, repo: &Repository, path: &str) -> Result<Lookup<Vec<DirectoryEntry>>>;

    /// Fetches the raw bytes of the file at `path` in `repo`.
    fn fetch_file_bytes(&self, repo: &Repository, path: &str) -> Result<Lookup<Vec<u8>>>;

    /// Fetches the license the platform detected for `repo`.
    fn fetch_license(&self, repo: &Repository) -> Result<Lookup<License>>;

    /// Fetches the organization's public profile.
    fn fetch_organization(&self, org: &str) -> Result<Organization>;
}
