//! User-declared file dependencies.
//!
//! The `dependencies` section lists, for each script or data file, the files
//! it needs:
//!
//! ```yaml
//! dependencies:
//!   src/scripts/plot.py:
//!     - src/data/results.dat
//!   src/data/results.dat: src/scripts/simulate.py
//! ```
//!
//! The orchestrator consults the transitive closure of this map when it
//! prunes cached steps from the build graph.

pub mod closure;

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::core::SywError;

pub use closure::{DependencyClosure, closure, closure_map};

/// File to direct dependencies, in declaration order.
pub type DependencyMap = BTreeMap<String, Vec<String>>;

/// Reads the `dependencies` section of a configuration.
///
/// A single string value is a one-element list and null is an empty list.
/// A missing section is an empty map.
pub fn dependency_map_from_config(config: &Config) -> Result<DependencyMap> {
    let section = match config.get("dependencies") {
        None | Some(Value::Null) => return Ok(DependencyMap::new()),
        Some(Value::Object(section)) => section,
        Some(_) => return Err(SywError::config("The `dependencies` field must be a mapping.").into()),
    };

    let mut map = DependencyMap::new();
    for (file, deps) in section {
        let deps = match deps {
            Value::Null => Vec::new(),
            Value::String(dep) => vec![dep.clone()],
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| invalid_entry(file))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(invalid_entry(file)),
        };
        map.insert(file.clone(), deps);
    }
    Ok(map)
}

fn invalid_entry(file: &str) -> anyhow::Error {
    SywError::config(format!(
        "Dependencies of `{file}` must be a file name or a list of file names."
    ))
    .into()
}
