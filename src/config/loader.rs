//! Loading of the user configuration sources.
//!
//! `showyourwork.yml` is a template: it is rendered with Tera before being
//! parsed, so users can compute values or include conditionals. The archival
//! overlay `zenodo.yml` is plain YAML written by tooling; when present (and
//! not disabled with `cache_on_zenodo: false`) its top-level keys replace
//! those of the primary file. The merged document is written to
//! `.showyourwork/showyourwork.yml`, which the orchestrator reads as its
//! config file.

use anyhow::{Context, Result};
use serde_yaml::Value as YamlValue;
use std::path::Path;
use tera::Tera;
use tracing::{debug, info};

use super::normalize::{is_falsy_json, normalize};
use super::{Config, OVERLAY_TOGGLE};
use crate::constants::{CONFIG_FILE, ZENODO_FILE};
use crate::core::SywError;
use crate::paths::UserPaths;
use crate::utils::fs::{read_text_file, write_yaml_file};

/// Renders, parses and merges the configuration sources found in `cwd`.
///
/// Returns the merged configuration before any defaults are applied and
/// records it under the scratch directory of `paths`.
///
/// # Errors
///
/// - I/O error when `showyourwork.yml` is missing or unreadable
/// - [`tera::Error`] when the template does not render
/// - [`serde_yaml::Error`] when the rendered text or the overlay is not YAML
/// - [`SywError::ConfigError`] when a source is not a mapping
pub fn render_config(cwd: &Path, paths: &UserPaths) -> Result<Config> {
    let source = cwd.join(CONFIG_FILE);
    let template = read_text_file(&source)?;

    let rendered = render_template(&template)?;
    let mut config = parse_source(&rendered, CONFIG_FILE)?;

    let use_overlay = config.get(OVERLAY_TOGGLE).is_none_or(|toggle| !is_falsy_json(toggle));
    let overlay_path = cwd.join(ZENODO_FILE);
    if use_overlay && overlay_path.exists() {
        debug!("Merging {} into the configuration", overlay_path.display());
        let overlay = parse_source(&read_text_file(&overlay_path)?, ZENODO_FILE)?;
        config.extend(overlay);
    }

    let merged_path = paths.temp.join(CONFIG_FILE);
    write_yaml_file(&merged_path, &config)
        .with_context(|| format!("Failed to record merged configuration at {}", merged_path.display()))?;
    info!("Rendered configuration written to {}", merged_path.display());

    Ok(config)
}

/// Renders a configuration template with an empty context.
pub fn render_template(template: &str) -> Result<String> {
    let mut tera = Tera::default();
    Ok(tera.render_str(template, &tera::Context::new())?)
}

/// Parses one YAML source into a canonical mapping.
fn parse_source(text: &str, name: &str) -> Result<Config> {
    if text.trim().is_empty() {
        return Ok(Config::new());
    }
    let raw: YamlValue = serde_yaml::from_str(text)?;
    match normalize(&raw)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(SywError::config(format!("The top level of `{name}` must be a mapping.")).into()),
    }
}
