//! The `sync` section: files exchanged with a collaborative editing service.
//!
//! The service itself is an external collaborator. This module only makes
//! sure the section is well-formed before anybody acts on it: `push` and
//! `pull` are lists of files below the manuscript source directory
//! (`src/tex`), and no file may appear in both.

use anyhow::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

use super::Config;
use crate::core::SywError;
use crate::paths::UserPaths;
use crate::utils::fs::{relative_to_root, to_posix};

/// Typed view of the `sync` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSpec {
    /// Project identifier on the editing service
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    /// Whether CI runs synchronize automatically
    pub auto_sync: bool,
    /// Files uploaded to the service
    pub push: Vec<String>,
    /// Files downloaded from the service
    pub pull: Vec<String>,
}

impl Default for SyncSpec {
    fn default() -> Self {
        Self {
            id: None,
            auto_sync: true,
            push: Vec::new(),
            pull: Vec::new(),
        }
    }
}

impl SyncSpec {
    /// Reads the `sync` section of a resolved configuration.
    ///
    /// A missing section yields the defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.get("sync") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(section) => serde_json::from_value(section.clone()).map_err(|e| {
                anyhow::Error::from(SywError::config(format!("The `sync` section is malformed: {e}")))
            }),
        }
    }

    /// Checks the placement and disjointness invariants.
    ///
    /// Relative entries are resolved against the repository root, where the
    /// pipeline runs.
    pub fn validate(&self, paths: &UserPaths) -> Result<()> {
        let push = resolve_under_tex(&self.push, paths)?;
        let pull = resolve_under_tex(&self.pull, paths)?;

        if push.intersection(&pull).next().is_some() {
            return Err(SywError::config(
                "One or more files are listed in both `sync.push` and `sync.pull`, \
                 which is not supported.",
            )
            .into());
        }
        Ok(())
    }
}

/// Coerces a `sync.push`/`sync.pull` entry: absent or null becomes an empty
/// list, anything other than a list is rejected.
pub fn file_list(field: &str, value: Option<Value>) -> Result<Value> {
    match value {
        None | Some(Value::Null) => Ok(Value::Array(Vec::new())),
        Some(Value::Array(items)) => Ok(Value::Array(items)),
        Some(_) => Err(SywError::config(format!("The `{field}` field must be a list.")).into()),
    }
}

/// Coerces `sync.id`: numeric and boolean ids become strings.
///
/// Project ids made only of digits are read by YAML as numbers.
pub fn project_id(field: &str, value: Option<Value>) -> Result<Value> {
    match value {
        None | Some(Value::Null) => Ok(Value::Null),
        Some(value) => id_string(&value)
            .map(Value::String)
            .ok_or_else(|| anyhow::Error::from(SywError::config(format!("The `{field}` field must be a string.")))),
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => id_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a scalar project id")),
    }
}

/// Resolves every entry to its path relative to `src/tex`.
fn resolve_under_tex(files: &[String], paths: &UserPaths) -> Result<BTreeSet<String>> {
    files
        .iter()
        .map(|file| {
            relative_to_root(&paths.repo, &paths.tex, Path::new(file))
                .map(|relative| to_posix(&relative))
                .ok_or_else(|| {
                    anyhow::Error::from(SywError::config(format!(
                        "Files specified in `sync.push` and `sync.pull` must be located \
                         under the `src/tex` directory (offending entry: `{file}`)."
                    )))
                })
        })
        .collect()
}
