//! # Code Inventory Library
//!
//! This library builds a code inventory for the repositories of a GitHub
//! organization: one metadata record per repository, merged from the
//! platform's own metadata, an optional declaration file committed to the
//! repository, and caller-supplied overrides. It backs the `codeinventory`
//! command-line tool but works against any [`provider::RepositoryProvider`].
//!
//! ## Quick Example
//!
//! ```
//! use codeinventory::exclusion::ExclusionFilter;
//! use codeinventory::inventory::Inventory;
//! use codeinventory::overrides::Overrides;
//! use codeinventory::provider::memory::MemoryProvider;
//! use codeinventory::provider::Repository;
//! use serde_json::json;
//!
//! let provider = MemoryProvider::new()
//!     .with_organization("GSA", Some("gsa@example.gov"))
//!     .with_repository(Repository::new("GSA", "ProductOne").with_topics(["topic1"]))
//!     .with_repository(Repository::new("GSA", "ProductTwo").with_private(true))
//!     .with_repository(Repository::new("GSA", "Scratch"))
//!     .with_file("GSA/ProductOne", ".codeinventory.yml", "laborHours: 120\n");
//!
//! let mut overrides = Overrides::new();
//! overrides.apply_assignment("organization=GSA TTS").unwrap();
//!
//! let records = Inventory::new(&provider, "GSA")
//!     .with_overrides(overrides)
//!     .with_exclusions(ExclusionFilter::new(["Scratch"]))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].labor_hours, json!(120));
//! assert_eq!(records[1].tags, json!(["GSA"]));
//! assert_eq!(records[1].repository_url, json!(null));
//! ```
//!
//! ## Core Concepts
//!
//! - **Providers (`provider`)**: the only way the library reaches the hosting
//!   platform. Lookups that can miss return [`provider::Lookup`].
//! - **Declarations (`declaration`)**: the optional `.codeinventory.yml` /
//!   `codeinventory.json` file at a repository's root.
//! - **Overrides (`overrides`)**: values that win over everything else.
//! - **Resolution (`resolve`)**: per-field precedence chains of override,
//!   declaration and platform default.
//! - **Exclusion (`exclusion`)**: dropping repositories by name or by their
//!   own declaration.
//! - **Building (`inventory`)**: the run itself, sequential or parallel.

pub mod config;
pub mod declaration;
pub mod defaults;
pub mod error;
pub mod exclusion;
pub mod inventory;
pub mod overrides;
pub mod provider;
pub mod record;
pub mod resolve;
pub mod suggestions;
pub mod value;
