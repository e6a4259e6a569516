//! Repository exclusion rules
//!
//! A repository is left out of the inventory for one of two reasons:
//!
//! 1. **By name**: the caller listed its short name. This is checked right
//!    after listing, before any of the repository's files are fetched.
//! 2. **By declaration**: its declaration sets `codeinventory.exclude` to a
//!    truthy value. The declaration has to be fetched to know this.
//!
//! Overrides play no part here; nothing can bring an excluded repository back.

use std::collections::BTreeSet;

use log::{debug, warn};
use serde_json::Value;

use crate::declaration::Declaration;
use crate::provider::Repository;

/// Path of the self-exclusion flag inside a declaration.
pub const EXCLUDE_FLAG: [&str; 2] = ["codeinventory", "exclude"];

/// Caller-supplied repository names to leave out of the inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilter {
    names: BTreeSet<String>,
}

impl ExclusionFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `repo`'s short name is on the exclusion list.
    pub fn excludes_name(&self, repo: &Repository) -> bool {
        self.names.contains(&repo.name)
    }

    /// Drops excluded repositories in place, keeping the rest in order.
    pub fn retain_included(&self, repos: &mut Vec<Repository>) {
        if self.names.is_empty() {
            return;
        }
        repos.retain(|repo| {
            let excluded = self.excludes_name(repo);
            if excluded {
                debug!("{}: excluded by name", repo.full_name);
            }
            !excluded
        });
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Whether `declaration` asks for its repository to be left out.
///
/// The flag is truthy unless it is missing, `null` or `false`. Values that
/// are not booleans still count but are reported, since `exclude: "no"`
/// is almost certainly a mistake.
pub fn declares_exclusion(declaration: &Declaration) -> bool {
    match declaration.get_raw(&EXCLUDE_FLAG) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Bool(true)) => true,
        Some(other) => {
            warn!(
                "{}: non-boolean codeinventory.exclude value {} treated as true",
                declaration.source().unwrap_or("declaration"),
                other
            );
            true
        }
    }
}
