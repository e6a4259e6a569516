//! Nested access over generic metadata trees
//!
//! Declarations and overrides are free-form documents, so they are held as
//! `serde_json::Value` trees. This module provides the path-based helpers the
//! rest of the crate uses to read and write them without panicking on
//! missing intermediate keys.
//!
//! Paths are written in dot notation (`permissions.usageType`). A backslash
//! escapes a literal dot (`foo\.bar` is the single key `foo.bar`).

use serde_json::{Map, Value};

/// Split a dotted key path into its segments.
///
/// Empty segments are dropped, so `"a..b"` and `".a.b"` both yield `["a", "b"]`.
///
/// ```
/// use codeinventory::value::parse_key_path;
///
/// assert_eq!(parse_key_path("contact.email"), vec!["contact", "email"]);
/// assert_eq!(parse_key_path(r"odd\.key"), vec!["odd.key"]);
/// ```
pub fn parse_key_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for ch in path.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '.' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if escaped {
        current.push('\\');
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Walk `path` through nested mappings, returning `None` as soon as a key is
/// missing or an intermediate value is not a mapping.
pub fn dig<'a, S: AsRef<str>>(map: &'a Map<String, Value>, path: &[S]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = map.get(first.as_ref())?;
    for key in rest {
        current = current.as_object()?.get(key.as_ref())?;
    }
    Some(current)
}

/// Like [`dig`], but treats an explicit `null` the same as a missing key.
///
/// This is the presence test used by the precedence chain: `0`, `""`,
/// `false` and `[]` all count as present.
pub fn dig_present<'a, S: AsRef<str>>(
    map: &'a Map<String, Value>,
    path: &[S],
) -> Option<&'a Value> {
    dig(map, path).filter(|value| !value.is_null())
}

/// Store `value` at `path`, creating intermediate mappings as needed.
///
/// An intermediate value that is not a mapping is replaced by one.
/// An empty path leaves `map` untouched.
pub fn insert_path<S: AsRef<str>>(map: &mut Map<String, Value>, path: &[S], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = map;
    for key in parents {
        let slot = current
            .entry(key.as_ref().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(inner) = slot else {
            return;
        };
        current = inner;
    }

    current.insert(last.as_ref().to_string(), value);
}

/// Convert a parsed YAML document into a JSON tree.
///
/// YAML allows mapping keys of any type while JSON only has string keys.
/// Boolean and numeric keys are stringified; null and compound keys
/// (`~: x`, `[a]: x`) are dropped. Tags are discarded and the tagged value
/// kept. Numbers JSON cannot represent (`.nan`, `.inf`) become `null`.
///
/// ```
/// use codeinventory::value::from_yaml;
/// use serde_json::json;
///
/// let yaml: serde_yaml::Value = serde_yaml::from_str("name: x\n~: nothing\n1: one\n").unwrap();
/// assert_eq!(from_yaml(yaml), json!({"name": "x", "1": "one"}));
/// ```
pub fn from_yaml(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => serde_json::to_value(&number).unwrap_or(Value::Null),
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(from_yaml).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .filter_map(|(key, value)| Some((mapping_key(key)?, from_yaml(value))))
                .collect(),
        ),
        Yaml::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn mapping_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(text) => Some(text),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Deep-merge `overlay` into `base`: nested mappings merge key by key,
/// everything else in `overlay` replaces what `base` had.
pub fn merge_into(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_parse_key_path_simple() {
        assert_eq!(parse_key_path("name"), vec!["name"]);
        assert_eq!(
            parse_key_path("permissions.usageType"),
            vec!["permissions", "usageType"]
        );
    }

    #[test]
    fn test_parse_key_path_skips_empty_segments() {
        assert_eq!(parse_key_path(".a..b."), vec!["a", "b"]);
        assert!(parse_key_path("").is_empty());
    }

    #[test]
    fn test_parse_key_path_escaped_dot() {
        assert_eq!(parse_key_path(r"a\.b.c"), vec!["a.b", "c"]);
    }

    #[test]
    fn test_parse_key_path_trailing_backslash_kept() {
        assert_eq!(parse_key_path(r"a\"), vec![r"a\"]);
    }

    #[test]
    fn test_dig_nested() {
        let doc = map(json!({"contact": {"email": "a@b.gov"}}));
        assert_eq!(dig(&doc, &["contact", "email"]), Some(&json!("a@b.gov")));
    }

    #[test]
    fn test_dig_missing_intermediate() {
        let doc = map(json!({"contact": "not a map"}));
        assert_eq!(dig(&doc, &["contact", "email"]), None);
        assert_eq!(dig(&doc, &["permissions", "licenses"]), None);
    }

    #[test]
    fn test_dig_empty_path() {
        let doc = map(json!({"a": 1}));
        let empty: [&str; 0] = [];
        assert_eq!(dig(&doc, &empty), None);
    }

    #[test]
    fn test_dig_present_treats_null_as_missing() {
        let doc = map(json!({"laborHours": null, "tags": [], "count": 0}));
        assert_eq!(dig_present(&doc, &["laborHours"]), None);
        assert_eq!(dig_present(&doc, &["tags"]), Some(&json!([])));
        assert_eq!(dig_present(&doc, &["count"]), Some(&json!(0)));
    }

    #[test]
    fn test_insert_path_creates_intermediates() {
        let mut doc = Map::new();
        insert_path(&mut doc, &["permissions", "usageType"], json!("openSource"));
        assert_eq!(
            Value::Object(doc),
            json!({"permissions": {"usageType": "openSource"}})
        );
    }

    #[test]
    fn test_insert_path_replaces_scalar_intermediate() {
        let mut doc = map(json!({"contact": "x"}));
        insert_path(&mut doc, &["contact", "email"], json!("a@b.gov"));
        assert_eq!(Value::Object(doc), json!({"contact": {"email": "a@b.gov"}}));
    }

    #[test]
    fn test_merge_into_is_deep() {
        let mut base = map(json!({"permissions": {"usageType": "openSource"}, "tags": ["a"]}));
        let overlay = map(json!({"permissions": {"exemptionText": "x"}, "tags": ["b"]}));
        merge_into(&mut base, overlay);
        assert_eq!(
            Value::Object(base),
            json!({
                "permissions": {"usageType": "openSource", "exemptionText": "x"},
                "tags": ["b"]
            })
        );
    }

    fn yaml(text: &str) -> Value {
        from_yaml(serde_yaml::from_str(text).unwrap())
    }

    #[test]
    fn test_from_yaml_drops_null_keys() {
        assert_eq!(
            yaml("name: x\n~: nothing\ncontact:\n  null: y\n  email: a@b.gov\n"),
            json!({"name": "x", "contact": {"email": "a@b.gov"}})
        );
    }

    #[test]
    fn test_from_yaml_stringifies_scalar_keys() {
        assert_eq!(
            yaml("1: one\ntrue: yes\n? [a, b]\n: compound\n"),
            json!({"1": "one", "true": "yes"})
        );
    }

    #[test]
    fn test_from_yaml_keeps_scalars() {
        assert_eq!(
            yaml("n: 3\nf: 1.5\nb: false\ns: text\nl: [1, two]\nz: ~\n"),
            json!({"n": 3, "f": 1.5, "b": false, "s": "text", "l": [1, "two"], "z": null})
        );
        assert_eq!(yaml("x: .nan\n"), json!({"x": null}));
    }
}
