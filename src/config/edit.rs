//! Scoped read-modify-write of YAML files.
//!
//! [`edit_yaml`] loads a YAML document (or starts from an empty mapping when
//! the file does not exist), hands a mutable view to a closure and writes the
//! document back afterwards. The write happens on every exit path: when the
//! closure fails, the file is still written and the closure's error is the
//! one returned.

use anyhow::Result;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

use crate::utils::fs::{read_text_file, write_yaml_file};

/// Edits the YAML file at `path` in place.
///
/// An empty or missing file is presented to the closure as an empty mapping.
///
/// # Examples
///
/// ```rust,no_run
/// use showyourwork::config::edit_yaml;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// edit_yaml(Path::new("zenodo.yml"), |contents| {
///     if let Some(mapping) = contents.as_mapping_mut() {
///         mapping.insert("cache_on_zenodo".into(), true.into());
///     }
///     Ok(())
/// })?;
/// # Ok(())
/// # }
/// ```
pub fn edit_yaml<T, F>(path: &Path, edit: F) -> Result<T>
where
    F: FnOnce(&mut Value) -> Result<T>,
{
    let mut contents = if path.exists() {
        let text = read_text_file(path)?;
        if text.trim().is_empty() {
            Value::Mapping(Mapping::new())
        } else {
            match serde_yaml::from_str::<Value>(&text)? {
                Value::Null => Value::Mapping(Mapping::new()),
                value => value,
            }
        }
    } else {
        Value::Mapping(Mapping::new())
    };

    let outcome = edit(&mut contents);

    debug!("Writing back {}", path.display());
    let written = write_yaml_file(path, &contents);

    let value = outcome?;
    written?;
    Ok(value)
}
