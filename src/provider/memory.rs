//! In-memory repository provider
//!
//! `MemoryProvider` serves a fixed organization from memory and keeps a log
//! of every call made against it. Tests use the log to check the engine's I/O
//! behaviour (an excluded repository is never fetched, an empty repository
//! never lists its directory), and benchmarks use it to measure resolution
//! without network noise.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{DirectoryEntry, License, Lookup, Organization, Repository, RepositoryProvider};
use crate::error::{Error, Result};

/// A call received by [`MemoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderCall {
    ListRepositories { org: String },
    Repository { full_name: String },
    ListDirectory { repository: String, path: String },
    FetchFile { repository: String, path: String },
    FetchLicense { repository: String },
    FetchOrganization { org: String },
}

impl ProviderCall {
    /// The qualified repository name this call concerns, if any.
    pub fn repository(&self) -> Option<&str> {
        match self {
            ProviderCall::Repository { full_name } => Some(full_name),
            ProviderCall::ListDirectory { repository, .. }
            | ProviderCall::FetchFile { repository, .. }
            | ProviderCall::FetchLicense { repository } => Some(repository),
            ProviderCall::ListRepositories { .. } | ProviderCall::FetchOrganization { .. } => None,
        }
    }
}

/// A provider backed entirely by in-memory data.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    repositories: Vec<Repository>,
    organizations: HashMap<String, Organization>,
    files: HashMap<String, Vec<(String, Vec<u8>)>>,
    licenses: HashMap<String, License>,
    failures: Vec<ProviderCall>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an organization and its public contact email.
    pub fn with_organization(mut self, login: &str, email: Option<&str>) -> Self {
        self.organizations.insert(
            login.to_string(),
            Organization {
                login: login.to_string(),
                email: email.map(str::to_string),
            },
        );
        self
    }

    /// Appends a repository. Listing order is insertion order.
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repositories.push(repository);
        self
    }

    /// Adds a file at the root of the repository named `full_name`.
    ///
    /// Files are listed in insertion order.
    pub fn with_file(mut self, full_name: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files
            .entry(full_name.to_string())
            .or_default()
            .push((path.to_string(), content.into()));
        self
    }

    /// Sets the license the platform reports for `full_name`.
    pub fn with_license(mut self, full_name: &str, license: License) -> Self {
        self.licenses.insert(full_name.to_string(), license);
        self
    }

    /// Makes `call` fail with a network error when it is received.
    pub fn with_failure(mut self, call: ProviderCall) -> Self {
        self.failures.push(call);
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls received that concern the repository `full_name`.
    pub fn calls_for(&self, full_name: &str) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.repository() == Some(full_name))
            .collect()
    }

    /// Forgets all recorded calls.
    pub fn reset_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: ProviderCall) -> Result<()> {
        let failing = self.failures.contains(&call);
        let description = format!("{call:?}");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        if failing {
            return Err(Error::Network {
                url: format!("memory://{description}"),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl RepositoryProvider for MemoryProvider {
    fn list_organization_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        self.record(ProviderCall::ListRepositories {
            org: org.to_string(),
        })?;
        Ok(self
            .repositories
            .iter()
            .filter(|repo| repo.owner.login == org)
            .cloned()
            .collect())
    }

    fn repository(&self, full_name: &str) -> Result<Lookup<Repository>> {
        self.record(ProviderCall::Repository {
            full_name: full_name.to_string(),
        })?;
        Ok(self
            .repositories
            .iter()
            .find(|repo| repo.full_name == full_name)
            .cloned()
            .into())
    }

    fn list_directory(&self, repo: &Repository, path: &str) -> Result<Lookup<Vec<DirectoryEntry>>> {
        self.record(ProviderCall::ListDirectory {
            repository: repo.full_name.clone(),
            path: path.to_string(),
        })?;

        if !self.repositories.iter().any(|r| r.full_name == repo.full_name) {
            return Ok(Lookup::NotFound);
        }

        let entries = self
            .files
            .get(&repo.full_name)
            .map(|files| {
                files
                    .iter()
                    .map(|(name, _)| DirectoryEntry::root(name))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Lookup::Found(entries))
    }

    fn fetch_file_bytes(&self, repo: &Repository, path: &str) -> Result<Lookup<Vec<u8>>> {
        self.record(ProviderCall::FetchFile {
            repository: repo.full_name.clone(),
            path: path.to_string(),
        })?;
        Ok(self
            .files
            .get(&repo.full_name)
            .and_then(|files| files.iter().find(|(name, _)| name == path))
            .map(|(_, content)| content.clone())
            .into())
    }

    fn fetch_license(&self, repo: &Repository) -> Result<Lookup<License>> {
        self.record(ProviderCall::FetchLicense {
            repository: repo.full_name.clone(),
        })?;
        Ok(self.licenses.get(&repo.full_name).cloned().into())
    }

    fn fetch_organization(&self, org: &str) -> Result<Organization> {
        self.record(ProviderCall::FetchOrganization {
            org: org.to_string(),
        })?;
        Ok(self.organizations.get(org).cloned().unwrap_or_else(|| Organization {
            login: org.to_string(),
            email: None,
        }))
    }
}
