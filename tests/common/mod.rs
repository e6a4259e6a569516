//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let provider = fixtures::gsa();
//!     let records = Inventory::new(&provider, "GSA").build().unwrap();
//! }
//! ```

use assert_fs::prelude::*;
use std::env;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::fixtures;
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// In-memory organizations used across the scenario tests.
#[allow(dead_code)]
pub mod fixtures {
    use codeinventory::provider::memory::MemoryProvider;
    use codeinventory::provider::{License, Repository};

    pub const ORG: &str = "GSA";
    pub const ORG_EMAIL: &str = "gsa@example.gov";

    /// `ProductOne` is public with three topics, `ProductTwo` is private with
    /// none. Neither has a declaration file.
    pub fn gsa() -> MemoryProvider {
        MemoryProvider::new()
            .with_organization(ORG, Some(ORG_EMAIL))
            .with_repository(
                Repository::new(ORG, "ProductOne")
                    .with_description("The first product")
                    .with_topics(["topic1", "topic2", "topic3"]),
            )
            .with_repository(Repository::new(ORG, "ProductTwo").with_private(true))
            .with_file(ORG_FULL_ONE, "README.md", "# ProductOne\n")
            .with_license(ORG_FULL_ONE, mit())
    }

    pub const ORG_FULL_ONE: &str = "GSA/ProductOne";
    pub const ORG_FULL_TWO: &str = "GSA/ProductTwo";

    pub fn mit() -> License {
        License {
            spdx_id: Some("MIT".to_string()),
            url: Some("https://api.github.com/licenses/mit".to_string()),
        }
    }

    /// An organization of `count` public repositories named `repo-000`...
    pub fn numbered(count: usize) -> MemoryProvider {
        (0..count).fold(
            MemoryProvider::new().with_organization(ORG, Some(ORG_EMAIL)),
            |provider, i| provider.with_repository(Repository::new(ORG, &format!("repo-{i:03}"))),
        )
    }
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary working directory with an optional `codeinventory.yaml`.
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_config("org: GSA\n");
/// fixture.command().arg("github").assert().failure();
/// ```
#[allow(dead_code)]
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `codeinventory.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("codeinventory.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `codeinventory` command running in this fixture's directory, with
    /// the GitHub environment variables cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("codeinventory");
        cmd.current_dir(self.path())
            .env_remove("GITHUB_TOKEN")
            .env_remove("GITHUB_API_URL")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
