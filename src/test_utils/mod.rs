//! Test utilities for showyourwork
//!
//! Helpers shared by unit tests and the integration test suite:
//! - [`init_test_logging`] for opt-in tracing output
//! - [`StaticRepoInfo`] to resolve configurations without a git checkout
//! - [`ProjectFixture`] and [`ConfigFixture`] for throwaway article repositories
//!
//! # Example
//!
//! ```rust,no_run
//! use showyourwork::test_utils::{ConfigFixture, ProjectFixture};
//!
//! let project = ProjectFixture::new().unwrap();
//! project.write_config(&ConfigFixture::with_sync()).unwrap();
//! assert!(project.file_exists("showyourwork.yml"));
//! ```

pub mod fixtures;

pub use fixtures::{ConfigFixture, ProjectFixture};

use anyhow::Result;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::git::{RepoInfo, RepoMetadata};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run silently.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// [`RepoInfo`] returning fixed metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticRepoInfo {
    metadata: RepoMetadata,
}

impl StaticRepoInfo {
    /// Always reports `metadata`.
    pub fn new(metadata: RepoMetadata) -> Self {
        Self { metadata }
    }

    /// Metadata of a typical GitHub-hosted article on `main`.
    pub fn github(owner: &str, repo: &str) -> Self {
        Self::new(RepoMetadata {
            sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
            url: format!("https://github.com/{owner}/{repo}"),
            slug: format!("{owner}/{repo}"),
            branch: "main".to_string(),
            tag: None,
        })
    }
}

impl RepoInfo for StaticRepoInfo {
    fn metadata(&self) -> Result<RepoMetadata> {
        Ok(self.metadata.clone())
    }
}
