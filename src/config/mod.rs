//! Build configuration for showyourwork articles
//!
//! An article is configured by `showyourwork.yml` in the repository root,
//! optionally overlaid by `zenodo.yml`, which archival tooling maintains.
//! This module turns those files into the single resolved configuration the
//! rest of the pipeline reads.
//!
//! # Pipeline
//!
//! 1. [`loader::render_config`] renders the template, parses it, merges the
//!    overlay and records the merged document.
//! 2. [`normalize()`] brings every value into canonical form: lists of
//!    single-key mappings become mappings, tags disappear, keys are strings.
//! 3. [`resolver::parse_config`] fills in defaults from the
//!    [option table](options::option_table), validates cross-field
//!    constraints, adds internal fields and refreshes per-run metadata.
//! 4. [`resolver::persist_resolved`] writes `.showyourwork/config.json` for
//!    the later stages, which read it back with [`resolver::load_resolved`].
//!
//! # Modules
//!
//! - [`normalize`](mod@normalize) - canonical form of YAML values
//! - [`loader`] - template rendering and overlay merge
//! - [`options`] - declarative option table
//! - [`resolver`] - default filling, validation and derived fields
//! - [`sync`] - the `sync` section and its placement rules
//! - [`cache_state`] - per-branch cache records
//! - [`stamp`] - stamp text and version label
//! - [`env`] - run type and CI detection
//! - [`edit`] - scoped read-modify-write of YAML files
//!
//! # Example
//!
//! ```yaml
//! manuscript_name: ms
//! dependencies:
//!   - src/scripts/plot.py:
//!       - src/data/results.dat
//! sync:
//!   id: 63d2a1b0f3
//!   push:
//!     - src/tex/ms.tex
//!   pull:
//!     - src/tex/bib.bib
//! stamp:
//!   url:
//!     enabled: true
//! ```

pub mod cache_state;
pub mod edit;
pub mod env;
pub mod loader;
pub mod normalize;
pub mod options;
pub mod resolver;
pub mod stamp;
pub mod sync;

/// A configuration tree in canonical form.
pub type Config = serde_json::Map<String, serde_json::Value>;

/// Top-level key that disables the `zenodo.yml` overlay when false.
pub const OVERLAY_TOGGLE: &str = "cache_on_zenodo";

pub use cache_state::{CacheBranchState, branch_state, ensure_branch_state, record_branch_state};
pub use edit::edit_yaml;
pub use env::{RunEnv, RunType};
pub use loader::render_config;
pub use normalize::{normalize, normalize_json};
pub use resolver::{ResolveContext, load_resolved, parse_config, persist_resolved, resolve};
pub use stamp::{Stamp, stamp_text, stamp_version};
pub use sync::SyncSpec;
