//! Conversion of raw YAML values into the canonical configuration form.
//!
//! YAML written by hand is inconsistent about hyphens: the same section may
//! appear as a mapping in one article and as a list of one-key mappings in
//! another, and tagged variants such as `!!omap` show up occasionally. The
//! normalizer runs once, right after parsing, and produces a tree in which
//! every value is a scalar, a sequence or a plain mapping with string keys.
//! Nothing downstream ever sees a raw [`serde_yaml::Value`].
//!
//! # Rules
//!
//! - A falsy top-level value (null, `false`, `0`, `""`, empty collection)
//!   becomes an empty mapping.
//! - Every mapping-shaped element of a sequence is merged, left to right, into
//!   one mapping; later keys override earlier ones. If the sequence also holds
//!   other elements the result is `[merged, others...]` (the merged mapping is
//!   omitted when empty), otherwise it is the merged mapping alone.
//! - A sequence nested directly inside a sequence keeps its shape; its
//!   elements are never merged into the enclosing mapping.
//! - An empty sequence stays an empty sequence.
//! - Tags are dropped; the tagged value is normalized in place.
//! - Mapping keys are converted to strings.
//! - Nesting deeper than [`MAX_NORMALIZE_DEPTH`] is rejected with
//!   [`SywError::ConfigError`].
//!
//! The transformation is idempotent.

use anyhow::Result;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

use crate::constants::MAX_NORMALIZE_DEPTH;
use crate::core::SywError;

/// Normalizes a raw YAML value with the default depth limit.
///
/// # Examples
///
/// ```rust
/// use showyourwork::config::normalize;
///
/// # fn example() -> anyhow::Result<()> {
/// let raw: serde_yaml::Value = serde_yaml::from_str("scripts:\n  - py: python {script}\n  - R: Rscript {script}\n")?;
/// let config = normalize(&raw)?;
/// assert_eq!(config["scripts"]["R"], "Rscript {script}");
/// # Ok(())
/// # }
/// ```
pub fn normalize(value: &YamlValue) -> Result<Value> {
    normalize_with_depth(value, 0, MAX_NORMALIZE_DEPTH)
}

/// Normalizes a value that is already in JSON form.
///
/// Used for sections of a configuration that did not come straight from a
/// YAML parse, such as a resolved configuration read back from disk.
pub fn normalize_json(value: &Value) -> Result<Value> {
    normalize(&serde_yaml::to_value(value)?)
}

/// Normalizes `value`, treating it as sitting at nesting level `depth`.
pub fn normalize_with_depth(value: &YamlValue, depth: usize, max_depth: usize) -> Result<Value> {
    if depth == 0 && is_falsy(value) {
        return Ok(Value::Object(Map::new()));
    }
    if depth > max_depth {
        return Err(depth_exceeded(max_depth));
    }

    match value {
        YamlValue::Tagged(tagged) => normalize_with_depth(&tagged.value, depth, max_depth),
        YamlValue::Mapping(mapping) => {
            Ok(Value::Object(normalize_entries(mapping, depth, max_depth)?))
        }
        YamlValue::Sequence(items) => normalize_sequence(items, depth, max_depth),
        scalar => Ok(scalar_to_json(scalar)),
    }
}

/// Converts a mapping's keys to strings and normalizes its values one level down.
fn normalize_entries(
    mapping: &serde_yaml::Mapping,
    depth: usize,
    max_depth: usize,
) -> Result<Map<String, Value>> {
    let mut result = Map::new();
    for (key, value) in mapping {
        result.insert(key_to_string(key)?, normalize_with_depth(value, depth + 1, max_depth)?);
    }
    Ok(result)
}

fn normalize_sequence(items: &[YamlValue], depth: usize, max_depth: usize) -> Result<Value> {
    if items.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    let mut merged = Map::new();
    let mut others = Vec::new();

    for item in items {
        match mapping_parts(item) {
            // Mapping elements belong to the same level as the sequence itself
            Some(parts) => {
                for mapping in parts {
                    merged.extend(normalize_entries(mapping, depth, max_depth)?);
                }
            }
            None => others.push(normalize_element(item, depth + 1, max_depth)?),
        }
    }

    if others.is_empty() {
        return Ok(Value::Object(merged));
    }

    let mut result = Vec::with_capacity(others.len() + 1);
    if !merged.is_empty() {
        result.push(Value::Object(merged));
    }
    result.extend(others);
    Ok(Value::Array(result))
}

/// Mappings a sequence element contributes to the merge, if it is
/// mapping-shaped.
///
/// Plain mappings qualify, and so do tagged values holding a mapping or a
/// list of single-key mappings (`!!omap`, `!!pairs`).
fn mapping_parts(item: &YamlValue) -> Option<Vec<&serde_yaml::Mapping>> {
    match item {
        YamlValue::Mapping(mapping) => Some(vec![mapping]),
        YamlValue::Tagged(tagged) => match untag(&tagged.value) {
            YamlValue::Mapping(mapping) => Some(vec![mapping]),
            YamlValue::Sequence(pairs) if !pairs.is_empty() => pairs
                .iter()
                .map(|pair| match untag(pair) {
                    YamlValue::Mapping(mapping) if mapping.len() == 1 => Some(mapping),
                    _ => None,
                })
                .collect(),
            _ => None,
        },
        _ => None,
    }
}

/// Canonical form of a sequence element that is kept as an element.
///
/// Nested sequences keep their shape and are never merged into a mapping;
/// mappings inside them are normalized like any other mapping.
fn normalize_element(item: &YamlValue, depth: usize, max_depth: usize) -> Result<Value> {
    if depth > max_depth {
        return Err(depth_exceeded(max_depth));
    }

    match untag(item) {
        YamlValue::Sequence(inner) => inner
            .iter()
            .map(|element| normalize_element(element, depth + 1, max_depth))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        YamlValue::Mapping(mapping) => Ok(Value::Object(normalize_entries(mapping, depth, max_depth)?)),
        scalar => Ok(scalar_to_json(scalar)),
    }
}

fn depth_exceeded(max_depth: usize) -> anyhow::Error {
    SywError::config(format!(
        "Maximum nesting depth of {max_depth} exceeded. \
         Check the config for recursive structures."
    ))
    .into()
}

fn untag(value: &YamlValue) -> &YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn is_falsy(value: &YamlValue) -> bool {
    match value {
        YamlValue::Null => true,
        YamlValue::Bool(b) => !b,
        YamlValue::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        YamlValue::String(s) => s.is_empty(),
        YamlValue::Sequence(items) => items.is_empty(),
        YamlValue::Mapping(mapping) => mapping.is_empty(),
        YamlValue::Tagged(tagged) => is_falsy(&tagged.value),
    }
}

/// Whether a canonical value counts as false: null, `false`, zero, or an
/// empty string or collection.
pub(crate) fn is_falsy_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn key_to_string(key: &YamlValue) -> Result<String> {
    match untag(key) {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        other => Err(SywError::config(format!(
            "Mapping keys must be scalars, found `{}`.",
            serde_yaml::to_string(other).unwrap_or_default().trim()
        ))
        .into()),
    }
}

fn scalar_to_json(value: &YamlValue) -> Value {
    match value {
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                // NaN and infinities have no JSON representation
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or_else(|| Value::String(n.to_string()), Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(text: &str) -> YamlValue {
        serde_yaml::from_str(text).unwrap()
    }

    /// Mapping nested `levels` deep with a scalar leaf at depth `levels`.
    fn nested(levels: usize) -> YamlValue {
        let mut value = YamlValue::from(1);
        for _ in 0..levels {
            let mut mapping = serde_yaml::Mapping::new();
            mapping.insert("a".into(), value);
            value = YamlValue::Mapping(mapping);
        }
        value
    }

    fn renormalize(value: &Value) -> Value {
        normalize(&serde_yaml::to_value(value).unwrap()).unwrap()
    }

    #[test]
    fn test_falsy_top_level_is_empty_mapping() {
        for text in ["null", "false", "0", "''", "[]", "{}"] {
            assert_eq!(normalize(&yaml(text)).unwrap(), json!({}), "input: {text}");
        }
    }

    #[test]
    fn test_plain_mapping_is_unchanged() {
        let value = normalize(&yaml("ms_name: paper\nverbose: true\nstamp:\n  size: 0.5\n")).unwrap();
        assert_eq!(value, json!({"ms_name": "paper", "verbose": true, "stamp": {"size": 0.5}}));
    }

    #[test]
    fn test_list_of_mappings_is_merged() {
        let value = normalize(&yaml(
            "dependencies:\n  - src/scripts/a.py:\n      - src/data/a.dat\n  - src/scripts/b.py:\n      - src/data/b.dat\n",
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({"dependencies": {
                "src/scripts/a.py": ["src/data/a.dat"],
                "src/scripts/b.py": ["src/data/b.dat"],
            }})
        );
    }

    #[test]
    fn test_later_keys_override_earlier_ones() {
        let value = normalize(&yaml("x:\n  - k: first\n  - k: second\n")).unwrap();
        assert_eq!(value, json!({"x": {"k": "second"}}));
    }

    #[test]
    fn test_mixed_list_keeps_merged_mapping_first() {
        let value = normalize(&yaml("x:\n  - plain\n  - k: v\n  - 3\n  - j: w\n")).unwrap();
        assert_eq!(value, json!({"x": [{"k": "v", "j": "w"}, "plain", 3]}));
    }

    #[test]
    fn test_nested_lists_are_not_merged() {
        let value = normalize(&yaml("x:\n  - - a: 1\n  - - a: 2\n")).unwrap();
        assert_eq!(value, json!({"x": [[{"a": 1}], [{"a": 2}]]}));
        assert_eq!(renormalize(&value), value);
    }

    #[test]
    fn test_nested_list_beside_mappings() {
        let value = normalize(&yaml("x:\n  - k: v\n  - - 1\n    - 2: two\n")).unwrap();
        assert_eq!(value, json!({"x": [{"k": "v"}, [1, {"2": "two"}]]}));
    }

    #[test]
    fn test_tagged_pairs_element_is_merged() {
        let value = normalize(&yaml("x:\n  - !ordered\n    - a: 1\n    - b: 2\n  - c: 3\n")).unwrap();
        assert_eq!(value, json!({"x": {"a": 1, "b": 2, "c": 3}}));
    }

    #[test]
    fn test_list_without_mappings_is_kept() {
        let value = normalize(&yaml("push:\n  - src/tex/a.tex\n  - src/tex/b.tex\n")).unwrap();
        assert_eq!(value, json!({"push": ["src/tex/a.tex", "src/tex/b.tex"]}));
    }

    #[test]
    fn test_empty_nested_list_stays_a_list() {
        let value = normalize(&yaml("push: []\n")).unwrap();
        assert_eq!(value, json!({"push": []}));
    }

    #[test]
    fn test_tags_are_dropped() {
        let value = normalize(&yaml("x: !ordered\n  - a: 1\n  - b: 2\ny: !custom 5\n")).unwrap();
        assert_eq!(value, json!({"x": {"a": 1, "b": 2}, "y": 5}));
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let value = normalize(&yaml("1: one\ntrue: yes\n")).unwrap();
        assert_eq!(value, json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn test_depth_limit() {
        assert!(normalize(&nested(30)).is_ok());

        let err = normalize(&nested(31)).unwrap_err();
        assert!(matches!(err.downcast_ref::<SywError>(), Some(SywError::ConfigError { .. })));
    }

    #[test]
    fn test_list_of_mappings_does_not_add_depth() {
        // The mapping inside the list sits at the same level as the list
        let mut value = nested(29);
        value = YamlValue::Sequence(vec![value]);
        let mut mapping = serde_yaml::Mapping::new();
        mapping.insert("top".into(), value);
        assert!(normalize(&YamlValue::Mapping(mapping)).is_ok());
    }

    #[test]
    fn test_normalize_json_merges_lists() {
        let value = normalize_json(&json!([{"a": 1}, {"b": 2}])).unwrap();
        assert_eq!(value, json!({"a": 1, "b": 2}));
        assert_eq!(normalize_json(&Value::Null).unwrap(), json!({}));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "a: 1\nb: [1, 2, {c: 3}]\n",
            "x:\n  - 5\n  - - k: v\n",
            "deps:\n  - f: [g, h]\n  - g: h\n",
            "s: !ordered\n  - a: [1, {b: 2}]\n",
            "empty: []\nnone: null\n",
        ];
        for text in inputs {
            let once = normalize(&yaml(text)).unwrap();
            assert_eq!(renormalize(&once), once, "input: {text}");
        }
    }
}
