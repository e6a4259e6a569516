//! Inventory building
//!
//! [`Inventory`] drives one run over an organization:
//!
//! 1. list the organization's repositories,
//! 2. drop repositories excluded by name, before any of their files are read,
//! 3. load each remaining repository's declaration,
//! 4. drop repositories whose declaration excludes them,
//! 5. resolve every field and collect the records in listing order.
//!
//! ```
//! use codeinventory::inventory::Inventory;
//! use codeinventory::provider::memory::MemoryProvider;
//! use codeinventory::provider::Repository;
//!
//! let provider = MemoryProvider::new()
//!     .with_organization("GSA", Some("gsa@example.gov"))
//!     .with_repository(Repository::new("GSA", "ProductOne"));
//!
//! let records = Inventory::new(&provider, "GSA").build().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].contact.email, "gsa@example.gov");
//! ```

use std::ops::ControlFlow;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::declaration::{self, Declaration};
use crate::error::{Error, Result};
use crate::exclusion::{declares_exclusion, ExclusionFilter};
use crate::overrides::Overrides;
use crate::provider::{Lookup, Repository, RepositoryProvider};
use crate::record::InventoryRecord;
use crate::resolve::FieldResolver;

/// What to do when a repository's declaration file does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDeclarationPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Leave the repository out and log a warning.
    Skip,
}

/// Builds inventory records for one organization.
pub struct Inventory<'a> {
    provider: &'a dyn RepositoryProvider,
    org: String,
    overrides: Overrides,
    exclusions: ExclusionFilter,
    policy: InvalidDeclarationPolicy,
}

impl<'a> Inventory<'a> {
    pub fn new(provider: &'a dyn RepositoryProvider, org: &str) -> Self {
        Self {
            provider,
            org: org.to_string(),
            overrides: Overrides::new(),
            exclusions: ExclusionFilter::default(),
            policy: InvalidDeclarationPolicy::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionFilter) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_invalid_declaration_policy(mut self, policy: InvalidDeclarationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// Builds the full inventory, one record per included repository.
    pub fn build(&self) -> Result<Vec<InventoryRecord>> {
        self.build_with(|_| ControlFlow::Continue(()))
    }

    /// Like [`build`](Self::build), calling `on_record` as each record is
    /// completed.
    ///
    /// Returning [`ControlFlow::Break`] stops the run: no further repository
    /// is fetched and the records gathered so far, the breaking one included,
    /// are returned. On failure, `on_record` may already have seen records
    /// for repositories listed before the failing one.
    pub fn build_with<F>(&self, mut on_record: F) -> Result<Vec<InventoryRecord>>
    where
        F: FnMut(&InventoryRecord) -> ControlFlow<()>,
    {
        let repos = self.included_repositories()?;
        let resolver = FieldResolver::new(self.provider, &self.overrides);

        let mut records = Vec::with_capacity(repos.len());
        for repo in &repos {
            let Some(record) = self.process(&resolver, repo)? else {
                continue;
            };
            let flow = on_record(&record);
            records.push(record);
            if flow.is_break() {
                info!("{}: stopped after {}", self.org, repo.full_name);
                return Ok(records);
            }
        }

        info!("{}: {} records", self.org, records.len());
        Ok(records)
    }

    /// Builds the inventory with repositories resolved concurrently.
    ///
    /// Records come back in listing order. If several repositories fail, the
    /// error of the first one in listing order is returned.
    pub fn build_parallel(&self) -> Result<Vec<InventoryRecord>> {
        let repos = self.included_repositories()?;
        let resolver = FieldResolver::new(self.provider, &self.overrides);

        let results: Vec<Result<Option<InventoryRecord>>> = repos
            .par_iter()
            .map(|repo| self.process(&resolver, repo))
            .collect();

        let mut records = Vec::with_capacity(results.len());
        for result in results {
            if let Some(record) = result? {
                records.push(record);
            }
        }

        info!("{}: {} records", self.org, records.len());
        Ok(records)
    }

    /// Resolves a single repository by its full name, e.g. `GSA/ProductOne`.
    ///
    /// The name exclusion list does not apply; a declaration that excludes the
    /// repository still yields `None`.
    pub fn project(&self, full_name: &str) -> Result<Option<InventoryRecord>> {
        let repo = match self.provider.repository(full_name)? {
            Lookup::Found(repo) => repo,
            Lookup::NotFound => {
                return Err(Error::RepositoryNotFound {
                    name: full_name.to_string(),
                })
            }
        };
        let resolver = FieldResolver::new(self.provider, &self.overrides);
        self.process(&resolver, &repo)
    }

    fn included_repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = self.provider.list_organization_repositories(&self.org)?;
        let listed = repos.len();
        self.exclusions.retain_included(&mut repos);
        info!(
            "{}: {} repositories listed, {} excluded by name",
            self.org,
            listed,
            listed - repos.len()
        );
        Ok(repos)
    }

    fn process(
        &self,
        resolver: &FieldResolver<'_>,
        repo: &Repository,
    ) -> Result<Option<InventoryRecord>> {
        let Some(declaration) = self.load_declaration(repo)? else {
            return Ok(None);
        };

        if declares_exclusion(&declaration) {
            debug!("{}: excluded by declaration", repo.full_name);
            return Ok(None);
        }

        let record = resolver.resolve(repo, &declaration)?;
        debug!("{}: resolved", repo.full_name);
        Ok(Some(record))
    }

    fn load_declaration(&self, repo: &Repository) -> Result<Option<Declaration>> {
        match declaration::load(self.provider, repo) {
            Ok(declaration) => Ok(Some(declaration)),
            Err(error @ Error::DeclarationParse { .. })
                if self.policy == InvalidDeclarationPolicy::Skip =>
            {
                warn!("Skipping {}: {}", repo.full_name, error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
