//! showyourwork - configuration core for reproducible articles
//!
//! An article repository holds a manuscript, the scripts that produce its
//! figures and the data they read. The build workflow regenerates everything
//! from source and typesets the result; this crate prepares the configuration
//! that workflow runs on.
//!
//! # Responsibilities
//!
//! - Load `showyourwork.yml` (a template) and the `zenodo.yml` overlay
//! - Normalize hand-written YAML into a canonical tree
//! - Fill in defaults for every recognized option and validate the result
//! - Record per-run metadata: git state, CI detection, cache records, stamp
//! - Compute transitive closures of the user-declared file dependencies
//!
//! The crate never runs a build step, typesets or talks to the network.
//!
//! # Core Modules
//!
//! - [`config`] - loading, normalization, defaults and validation
//! - [`dependencies`] - dependency map and transitive closure
//! - [`core`] - error types and user-facing error rendering
//! - [`git`] - repository metadata via the system git command
//! - [`paths`] - article and workflow directory layouts
//! - [`cli`] - the `syw` command-line front end
//! - [`utils`] - file system and platform helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use showyourwork::config::{RunEnv, RunType, resolve};
//! use showyourwork::config::resolver::ResolveContext;
//! use showyourwork::git::GitRepo;
//! use showyourwork::paths::ProjectPaths;
//!
//! # fn example() -> anyhow::Result<()> {
//! let paths = ProjectPaths::new(".", "/opt/showyourwork");
//! let env = RunEnv::from_env().with_run_type(RunType::Preprocess);
//! let repo = GitRepo::new(".");
//! let ctx = ResolveContext {
//!     paths: &paths,
//!     env: &env,
//!     repo: &repo,
//!     tool_version: "0.4.3",
//! };
//!
//! let config = resolve(RunType::Preprocess, &ctx)?;
//! println!("Manuscript: {}", config["ms_tex"]);
//! # Ok(())
//! # }
//! ```

// Configuration
pub mod config;
pub mod dependencies;

// Infrastructure
pub mod cli;
pub mod constants;
pub mod core;
pub mod git;
pub mod paths;
pub mod utils;

// Test utilities (available for integration tests)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
