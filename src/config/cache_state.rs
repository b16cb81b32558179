//! Per-branch cache bookkeeping.
//!
//! Build outputs can be cached in an external archive and restored in a
//! sandbox; both collaborators key their identifiers by git branch under the
//! `cache` section:
//!
//! ```yaml
//! cache:
//!   main:
//!     external_archive_id: "10.5281/zenodo.1234"
//!     sandbox_flag: null
//! ```
//!
//! The resolver only guarantees that the record for the current branch
//! exists. Filling in the identifiers is up to the collaborators, which use
//! [`record_branch_state`] to persist them in the overlay file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use super::Config;
use super::edit::edit_yaml;
use crate::core::SywError;

const ARCHIVE_KEY: &str = "external_archive_id";
const SANDBOX_KEY: &str = "sandbox_flag";

/// Cache identifiers of one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheBranchState {
    /// Identifier of the archived cache deposit
    pub external_archive_id: Option<String>,
    /// Sandbox state; shape decided by the sandbox collaborator
    pub sandbox_flag: Option<Value>,
}

/// Makes sure `cache.<branch>` exists with both fields present.
///
/// Missing fields are set to null; existing values are never touched.
pub fn ensure_branch_state(config: &mut Config, branch: &str) -> Result<()> {
    let cache = config.entry("cache").or_insert_with(|| Value::Object(Map::new()));
    if cache.is_null() {
        *cache = Value::Object(Map::new());
    }
    let Value::Object(cache) = cache else {
        return Err(SywError::config("The `cache` field must be a mapping.").into());
    };

    let record = cache.entry(branch).or_insert_with(|| Value::Object(Map::new()));
    if record.is_null() {
        *record = Value::Object(Map::new());
    }
    let Value::Object(record) = record else {
        return Err(SywError::config(format!("The `cache.{branch}` field must be a mapping.")).into());
    };

    record.entry(ARCHIVE_KEY).or_insert(Value::Null);
    record.entry(SANDBOX_KEY).or_insert(Value::Null);
    Ok(())
}

/// Typed read of `cache.<branch>`, if recorded.
pub fn branch_state(config: &Config, branch: &str) -> Option<CacheBranchState> {
    let record = config.get("cache")?.get(branch)?;
    serde_json::from_value(record.clone()).ok()
}

/// Persists the identifiers of `branch` into an overlay YAML file.
///
/// Other branches and unrelated keys in the file are preserved. The next
/// configuration render picks the values up.
pub fn record_branch_state(overlay: &Path, branch: &str, state: &CacheBranchState) -> Result<()> {
    debug!("Recording cache state for branch {branch} in {}", overlay.display());
    let record = serde_yaml::to_value(state)?;

    edit_yaml(overlay, |contents| {
        let Some(root) = contents.as_mapping_mut() else {
            return Err(SywError::config(format!(
                "The top level of `{}` must be a mapping.",
                overlay.display()
            ))
            .into());
        };

        let cache = root
            .entry("cache".into())
            .or_insert_with(|| serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
        if cache.is_null() {
            *cache = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
        }
        let Some(cache) = cache.as_mapping_mut() else {
            return Err(SywError::config("The `cache` field must be a mapping.").into());
        };
        cache.insert(branch.into(), record);
        Ok(())
    })
}
