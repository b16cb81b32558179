//! Table of recognized configuration options and their defaults.
//!
//! Each [`OptionSpec`] names a dotted path into the configuration and the
//! rule applied there during preprocessing. Entries are applied in table
//! order, so a section is normalized before the defaults of its children are
//! filled in.

use anyhow::Result;
use serde_json::{Map, Value, json};

use super::Config;
use super::normalize::normalize_json;
use super::stamp::Stamp;
use super::sync::{file_list, project_id};
use crate::core::SywError;
use crate::paths::ProjectPaths;
use crate::utils::fs::to_posix;

/// Computes the final value of an option from its current value.
///
/// Receives the dotted option name for error messages.
pub type Validator = fn(&str, Option<Value>) -> Result<Value>;

/// What to do with one option.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Insert the value when the option is absent.
    Default(Value),
    /// Start from these entries and let the user's entries override them.
    MergeDefaults(Map<String, Value>),
    /// Normalize the section; an absent or falsy section becomes `{}`.
    Normalize,
    /// Replace the option with the validator's result.
    Custom(Validator),
}

/// One entry of the option table.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    /// Dotted path, e.g. `stamp.url.maxlen`
    pub path: &'static str,
    /// Rule applied at that path
    pub rule: Rule,
}

impl OptionSpec {
    fn new(path: &'static str, rule: Rule) -> Self {
        Self { path, rule }
    }
}

/// Builds the option table for a project.
///
/// The only layout-dependent default is the Python run command, which points
/// matplotlib at the `matplotlibrc` in the scripts directory. Stamp defaults
/// come from [`Stamp::default`].
pub fn option_table(paths: &ProjectPaths) -> Vec<OptionSpec> {
    use Rule::{Custom, Default, MergeDefaults, Normalize};

    let python = format!("MATPLOTLIBRC={} python {{script}}", to_posix(&paths.user.scripts));
    let stamp = Stamp::default();

    vec![
        OptionSpec::new("version", Default(Value::Null)),
        OptionSpec::new("verbose", Default(json!(false))),
        OptionSpec::new("manuscript_name", Default(json!("ms"))),
        OptionSpec::new("script_run_commands", Normalize),
        OptionSpec::new("script_run_commands.py", Default(json!(python))),
        OptionSpec::new("dependencies", Normalize),
        OptionSpec::new("datasets", Normalize),
        OptionSpec::new("sync", Normalize),
        OptionSpec::new("sync.id", Custom(project_id)),
        OptionSpec::new("sync.auto_sync", Default(json!(true))),
        OptionSpec::new("sync.push", Custom(file_list)),
        OptionSpec::new("sync.pull", Custom(file_list)),
        OptionSpec::new("require_inputs_present", Default(json!(true))),
        OptionSpec::new("run_cached_rules_on_ci", Default(json!(false))),
        OptionSpec::new("dag", Normalize),
        OptionSpec::new("dag.render", Default(json!(false))),
        OptionSpec::new("dag.group_by_type", Default(json!(false))),
        OptionSpec::new("dag.engine", Default(json!("sfdp"))),
        OptionSpec::new("dag.node_style", MergeDefaults(object(json!({"shape": "box", "penwidth": 2, "width": 1})))),
        OptionSpec::new("dag.graph_style", MergeDefaults(object(json!({"ranksep": 1, "nodesep": 0.65})))),
        OptionSpec::new("dag.ignore_files", Custom(string_list)),
        OptionSpec::new("typesetting_args", Custom(typesetting_args)),
        OptionSpec::new("synctex", Default(json!(true))),
        OptionSpec::new("optimize_caching", Default(json!(false))),
        OptionSpec::new("stamp", Normalize),
        OptionSpec::new("stamp.enabled", Default(json!(stamp.enabled))),
        OptionSpec::new("stamp.size", Default(json!(stamp.size))),
        OptionSpec::new("stamp.xpos", Default(json!(stamp.xpos))),
        OptionSpec::new("stamp.ypos", Default(json!(stamp.ypos))),
        OptionSpec::new("stamp.angle", Default(json!(stamp.angle))),
        OptionSpec::new("stamp.url", Normalize),
        OptionSpec::new("stamp.url.enabled", Default(json!(stamp.url.enabled))),
        OptionSpec::new("stamp.url.maxlen", Default(json!(stamp.url.maxlen))),
        OptionSpec::new("margin_icons", Normalize),
        OptionSpec::new("margin_icons.monochrome", Default(json!(false))),
        OptionSpec::new("margin_icons.colors", Normalize),
        OptionSpec::new("margin_icons.colors.github", Default(json!("0.12,0.47,0.71"))),
        OptionSpec::new("margin_icons.colors.sandbox", Default(json!("0.80,0.14,0.19"))),
        OptionSpec::new("margin_icons.colors.cache", Default(json!("0.12,0.47,0.71"))),
        OptionSpec::new("margin_icons.colors.dataset", Default(json!("0.12,0.47,0.71"))),
        OptionSpec::new("cache", Default(json!({}))),
    ]
}

/// Applies every entry of `table` to `config`, in order.
pub fn apply_options(config: &mut Config, table: &[OptionSpec]) -> Result<()> {
    for spec in table {
        let (parents, key) = match spec.path.rsplit_once('.') {
            Some((parents, key)) => (Some(parents), key),
            None => (None, spec.path),
        };
        let section = match parents {
            Some(parents) => section_mut(config, parents)?,
            None => &mut *config,
        };

        match &spec.rule {
            Rule::Default(value) => {
                section.entry(key).or_insert_with(|| value.clone());
            }
            Rule::MergeDefaults(defaults) => {
                let mut merged = defaults.clone();
                match section.remove(key) {
                    None | Some(Value::Null) => {}
                    Some(user) => match normalize_json(&user)? {
                        Value::Object(user) => merged.extend(user),
                        _ => return Err(not_a_mapping(spec.path)),
                    },
                }
                section.insert(key.to_string(), Value::Object(merged));
            }
            Rule::Normalize => {
                let normalized = match section.remove(key) {
                    None => Value::Object(Map::new()),
                    Some(value) => normalize_json(&value)?,
                };
                section.insert(key.to_string(), normalized);
            }
            Rule::Custom(validate) => {
                let value = validate(spec.path, section.remove(key))?;
                section.insert(key.to_string(), value);
            }
        }
    }
    Ok(())
}

/// Walks to the mapping at a dotted path, creating missing levels.
fn section_mut<'a>(config: &'a mut Config, dotted: &str) -> Result<&'a mut Config> {
    let mut current = config;
    let mut walked = String::new();
    for part in dotted.split('.') {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(part);

        let entry = current.entry(part).or_insert_with(|| Value::Object(Map::new()));
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return Err(not_a_mapping(&walked)),
        };
    }
    Ok(current)
}

fn not_a_mapping(path: &str) -> anyhow::Error {
    SywError::config(format!("The `{path}` field must be a mapping.")).into()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Absent or null becomes `[]`, a single string becomes a one-element list.
fn string_list(_field: &str, value: Option<Value>) -> Result<Value> {
    Ok(match value {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(Value::String(s)) => Value::Array(vec![Value::String(s)]),
        Some(other) => other,
    })
}

/// Extra command-line arguments for the typesetting toolchain.
fn typesetting_args(field: &str, value: Option<Value>) -> Result<Value> {
    match value {
        None => Ok(Value::Array(Vec::new())),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(Value::Array(items)),
        Some(_) => Err(SywError::config(format!("Setting `{field}` must be a list of strings.")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(config: Value) -> Result<Value> {
        let paths = ProjectPaths::new("/work/article", "/opt/showyourwork");
        let mut config = object(config);
        apply_options(&mut config, &option_table(&paths))?;
        Ok(Value::Object(config))
    }

    #[test]
    fn test_empty_config_defaults() {
        let config = apply(json!({})).unwrap();
        assert_eq!(config["manuscript_name"], "ms");
        assert_eq!(config["stamp"]["enabled"], true);
        assert_eq!(config["stamp"]["url"]["maxlen"], 40);
        assert_eq!(config["stamp"]["angle"], -20.0);
        assert_eq!(config["dag"]["engine"], "sfdp");
        assert_eq!(config["dag"]["node_style"], json!({"shape": "box", "penwidth": 2, "width": 1}));
        assert_eq!(config["synctex"], true);
        assert_eq!(config["sync"], json!({"id": null, "auto_sync": true, "push": [], "pull": []}));
        assert_eq!(config["typesetting_args"], json!([]));
        assert_eq!(config["margin_icons"]["colors"]["sandbox"], "0.80,0.14,0.19");
        assert_eq!(
            config["script_run_commands"]["py"],
            "MATPLOTLIBRC=/work/article/src/scripts python {script}"
        );
        assert_eq!(config["cache"], json!({}));
    }

    #[test]
    fn test_user_values_are_kept() {
        let config = apply(json!({
            "manuscript_name": "paper",
            "stamp": {"angle": 10, "url": {"enabled": true}},
            "script_run_commands": {"py": "python {script}", "R": "Rscript {script}"},
        }))
        .unwrap();
        assert_eq!(config["manuscript_name"], "paper");
        assert_eq!(config["stamp"]["angle"], 10);
        assert_eq!(config["stamp"]["size"], 0.75);
        assert_eq!(config["stamp"]["url"], json!({"enabled": true, "maxlen": 40}));
        assert_eq!(config["script_run_commands"]["py"], "python {script}");
    }

    #[test]
    fn test_style_overrides_merge_with_defaults() {
        let config = apply(json!({"dag": {"graph_style": [{"ranksep": 2}, {"splines": "ortho"}]}})).unwrap();
        assert_eq!(config["dag"]["graph_style"], json!({"ranksep": 2, "nodesep": 0.65, "splines": "ortho"}));
    }

    #[test]
    fn test_null_sections_become_mappings() {
        let config = apply(json!({"stamp": null, "dependencies": null, "dag": {"ignore_files": null}})).unwrap();
        assert_eq!(config["stamp"]["enabled"], true);
        assert_eq!(config["dependencies"], json!({}));
        assert_eq!(config["dag"]["ignore_files"], json!([]));
    }

    #[test]
    fn test_ignore_files_string_is_wrapped() {
        let config = apply(json!({"dag": {"ignore_files": "src/data/*.dat"}})).unwrap();
        assert_eq!(config["dag"]["ignore_files"], json!(["src/data/*.dat"]));
    }

    #[test]
    fn test_typesetting_args_validation() {
        let config = apply(json!({"typesetting_args": ["--keep-logs"]})).unwrap();
        assert_eq!(config["typesetting_args"], json!(["--keep-logs"]));

        for bad in [json!("--keep-logs"), json!(["--keep-logs", 3]), json!(null)] {
            let err = apply(json!({"typesetting_args": bad})).unwrap_err();
            assert!(matches!(err.downcast_ref::<SywError>(), Some(SywError::ConfigError { .. })));
        }
    }

    #[test]
    fn test_sync_push_must_be_a_list() {
        let err = apply(json!({"sync": {"push": "src/tex/ms.tex"}})).unwrap_err();
        assert!(err.to_string().contains("`sync.push` field must be a list"));
    }

    #[test]
    fn test_scalar_section_is_rejected() {
        let err = apply(json!({"stamp": {"url": 5}})).unwrap_err();
        assert!(err.to_string().contains("`stamp.url`"));
    }

    #[test]
    fn test_idempotent() {
        let once = apply(json!({"dag": {"node_style": {"shape": "ellipse"}}, "sync": {"push": ["src/tex/a.tex"]}})).unwrap();
        let twice = apply(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}
