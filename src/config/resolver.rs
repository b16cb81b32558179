//! Default filling, validation and derived fields.
//!
//! Resolution happens in two stages with different lifetimes:
//!
//! 1. **Preprocessing** ([`RunType::Preprocess`]) applies the option table,
//!    validates the result and records the internal fields the rest of the
//!    pipeline relies on. The outcome is persisted as JSON.
//! 2. **Every run**, including preprocessing, re-derives the fields that
//!    depend on the moment of execution: repository metadata, CI detection,
//!    the current branch's cache record and the stamp. Later stages load the
//!    persisted JSON and only run this step, so switching branches or
//!    committing between builds is reflected even when preprocessing is
//!    skipped.
//!
//! Any validation failure aborts before anything is written.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Config;
use super::cache_state::ensure_branch_state;
use super::env::{RunEnv, RunType};
use super::loader::render_config;
use super::options::{apply_options, option_table};
use super::stamp::{Stamp, stamp_text, stamp_version};
use super::sync::SyncSpec;
use crate::constants::{STYLESHEET, STYLESHEET_META_FILE};
use crate::core::SywError;
use crate::git::RepoInfo;
use crate::paths::{ProjectPaths, UserPaths};
use crate::utils::fs::{read_json_file, to_posix, write_json_file};

/// Everything resolution needs besides the configuration itself.
pub struct ResolveContext<'a> {
    /// Article and workflow layout
    pub paths: &'a ProjectPaths,
    /// CI settings read from the environment
    pub env: &'a RunEnv,
    /// Source of repository metadata
    pub repo: &'a dyn RepoInfo,
    /// Version of the tool, shown on the stamp
    pub tool_version: &'a str,
}

/// Resolves `raw` for the given run type.
///
/// During preprocessing every recognized option is defaulted and validated
/// and the internal fields are added; other run types expect an already
/// resolved configuration and only refresh the per-run fields.
///
/// # Errors
///
/// [`SywError::ConfigError`] for any invalid option.
pub fn parse_config(run_type: RunType, raw: Config, ctx: &ResolveContext<'_>) -> Result<Config> {
    let mut config = raw;

    if run_type == RunType::Preprocess {
        info!("Resolving configuration defaults");
        apply_options(&mut config, &option_table(ctx.paths))?;
        SyncSpec::from_config(&config)?.validate(&ctx.paths.user)?;
        add_internal_fields(&mut config, ctx.paths)?;
    }

    apply_every_run(&mut config, ctx)?;
    Ok(config)
}

/// Records the internal settings computed once per preprocessing run.
fn add_internal_fields(config: &mut Config, paths: &ProjectPaths) -> Result<()> {
    let name = match config.get("manuscript_name") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return Err(SywError::config("Setting `manuscript_name` must be a string.").into()),
    };

    let tex_dir = repo_relative(&paths.user.tex, &paths.user.repo);
    let config_json = repo_relative(&paths.user.config_json(), &paths.user.repo);
    let tex_files = support_files(&paths.tool.tex_resources())?;

    let script_extensions: Vec<Value> = config
        .get("script_run_commands")
        .and_then(Value::as_object)
        .map(|commands| commands.keys().cloned().map(Value::String).collect())
        .unwrap_or_default();

    let fields = [
        ("user_abspath", json!(to_posix(&paths.user.repo))),
        ("workflow_abspath", json!(to_posix(&paths.tool.workflow))),
        ("tex_files_in", json!(tex_files)),
        ("ms_tex", json!(format!("{tex_dir}/{name}.tex"))),
        ("ms_pdf", json!(format!("{name}.pdf"))),
        ("config_json", json!(config_json)),
        ("stylesheet", json!(STYLESHEET)),
        ("stylesheet_meta_file", json!(STYLESHEET_META_FILE)),
        ("script_extensions", Value::Array(script_extensions)),
        // Populated by later pipeline stages
        ("tree", json!({"figures": {}})),
        ("cached_deps", json!([])),
        ("dag_dependencies", json!({})),
        ("dag_dependencies_recursive", json!({})),
        ("labels", json!({})),
    ];

    for (key, value) in fields {
        config.insert(key.to_string(), value);
    }
    Ok(())
}

/// Bundled LaTeX support files, sorted.
fn support_files(dir: &Path) -> Result<Vec<String>> {
    let pattern = format!("{}/*", glob::Pattern::escape(&to_posix(dir)));
    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))? {
        let path = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        files.push(to_posix(&path));
    }
    files.sort();
    debug!("Found {} support files in {}", files.len(), dir.display());
    Ok(files)
}

fn repo_relative(path: &Path, repo: &Path) -> String {
    to_posix(path.strip_prefix(repo).unwrap_or(path))
}

/// Refreshes the fields that depend on the current checkout and environment.
pub fn apply_every_run(config: &mut Config, ctx: &ResolveContext<'_>) -> Result<()> {
    let metadata = ctx.repo.metadata()?;
    debug!("Repository metadata: {:?}", metadata);

    let url = metadata.url.clone();
    let branch = metadata.branch.clone();

    config.insert("git_sha".into(), json!(metadata.sha));
    config.insert("git_url".into(), json!(metadata.url));
    config.insert("git_slug".into(), json!(metadata.slug));
    config.insert("git_branch".into(), json!(metadata.branch));
    config.insert("git_tag".into(), json!(metadata.tag));
    config.insert("github_actions".into(), json!(ctx.env.ci));
    config.insert("github_runid".into(), json!(ctx.env.ci_run_id));

    ensure_branch_state(config, &branch)?;

    let stamp = config.entry("stamp").or_insert_with(|| Value::Object(Map::new()));
    if stamp.is_null() {
        *stamp = Value::Object(Map::new());
    }
    let Value::Object(stamp) = stamp else {
        return Err(SywError::config("The `stamp` field must be a mapping.").into());
    };

    let settings: Stamp = serde_json::from_value(Value::Object(stamp.clone())).map_err(|e| {
        anyhow::Error::from(SywError::config(format!("The `stamp` section is malformed: {e}")))
    })?;

    stamp.insert(
        "text".into(),
        json!(stamp_text(&url, settings.url.enabled, settings.url.maxlen)),
    );
    stamp.insert("version".into(), json!(stamp_version(ctx.tool_version)));
    Ok(())
}

/// Writes the resolved configuration for later stages.
pub fn persist_resolved(config: &Config, paths: &UserPaths) -> Result<PathBuf> {
    let target = paths.config_json();
    write_json_file(&target, config, true)?;
    info!("Resolved configuration written to {}", target.display());
    Ok(target)
}

/// Loads a configuration previously written by [`persist_resolved`].
pub fn load_resolved(paths: &UserPaths) -> Result<Config> {
    let source = paths.config_json();
    if !source.exists() {
        return Err(SywError::ConfigNotFound {
            path: source.display().to_string(),
        }
        .into());
    }
    read_json_file(&source)
}

/// Runs the full resolution for one invocation.
///
/// Preprocessing renders the user sources and persists the result; other
/// run types start from the persisted configuration.
pub fn resolve(run_type: RunType, ctx: &ResolveContext<'_>) -> Result<Config> {
    let user = &ctx.paths.user;

    let raw = if run_type == RunType::Preprocess {
        render_config(&user.repo, user)?
    } else {
        load_resolved(user)?
    };

    let config = parse_config(run_type, raw, ctx)?;
    if run_type == RunType::Preprocess {
        persist_resolved(&config, user)?;
    }
    Ok(config)
}
