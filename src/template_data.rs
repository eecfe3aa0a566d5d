//! Template-key references and the key catalog offered when authoring fields.
//!
//! A text or image value is either a literal or a dot path such as `employee.name`
//! into the data record being baked. Lookups never fail: a path that does not lead to
//! a scalar resolves to the value string itself.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

/// Catalog entry meaning "type a literal instead of picking a key"
pub const CUSTOM_TEXT_KEY: &str = "<Custom Text>";

const FALLBACK_KEYS: [&str; 2] = ["fallback.key1", "fallback.key2"];

/// Walks `path` through nested objects; array segments are indices
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(record, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Resolves an element value against a data record
pub fn resolve(record: &Value, value: &str) -> String {
    match lookup(record, value) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => {
            warn!("template key '{value}' points at a {} value; using it literally", kind_of(other));
            value.to_string()
        }
        None => {
            debug!("'{value}' is not a template key; using it literally");
            value.to_string()
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Every leaf key in `data` as a dot path.
///
/// Lists are transparent: their objects contribute keys under the list's own prefix.
pub fn flatten_keys(data: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(data, "", &mut keys);
    keys
}

fn collect_keys(data: &Value, prefix: &str, keys: &mut Vec<String>) {
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                let path = format!("{prefix}{key}");
                match value {
                    Value::Object(_) | Value::Array(_) => collect_keys(value, &format!("{path}."), keys),
                    _ => keys.push(path),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if matches!(item, Value::Object(_) | Value::Array(_)) {
                    collect_keys(item, prefix, keys);
                }
            }
        }
        _ => {}
    }
}

/// Keys offered by the text property panel, [`CUSTOM_TEXT_KEY`] first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCatalog {
    keys: Vec<String>,
}

impl KeyCatalog {
    /// Builds a catalog from flattened keys, dropping duplicates
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let mut catalog = vec![CUSTOM_TEXT_KEY.to_string()];
        for key in keys {
            if !catalog.contains(&key) {
                catalog.push(key);
            }
        }
        Self { keys: catalog }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_KEYS.iter().map(|key| key.to_string()))
    }

    /// Reads a key file; a missing or broken file yields the fallback catalog
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!("template keys file {} unreadable ({err}); using fallback keys", path.display());
                return Self::fallback();
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(data) => Self::new(flatten_keys(&data)),
            Err(err) => {
                warn!("template keys file {} is not valid JSON ({err}); using fallback keys", path.display());
                Self::fallback()
            }
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// True for keys that can be picked, excluding the custom-text entry
    pub fn is_key(&self, value: &str) -> bool {
        value != CUSTOM_TEXT_KEY && self.keys.iter().any(|key| key == value)
    }
}

impl Default for KeyCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn resolves_nested_paths_and_falls_back() {
        let record = json!({
            "employee": {"name": "Ada", "age": 36, "active": true, "tags": ["a", "b"]},
            "logo": "logos/acme.png"
        });
        assert_eq!(resolve(&record, "employee.name"), "Ada");
        assert_eq!(resolve(&record, "employee.age"), "36");
        assert_eq!(resolve(&record, "employee.active"), "true");
        assert_eq!(resolve(&record, "employee.tags.1"), "b");
        assert_eq!(resolve(&record, "logo"), "logos/acme.png");
        assert_eq!(resolve(&record, "employee"), "employee");
        assert_eq!(resolve(&record, "employee.missing"), "employee.missing");
        assert_eq!(resolve(&record, "Dear customer,"), "Dear customer,");
        assert_eq!(resolve(&record, ""), "");
    }

    #[test]
    fn flattening_passes_through_lists() {
        let data = json!({
            "company": {"name": "x", "address": {"city": "y"}},
            "items": [{"sku": 1}, {"sku": 2, "qty": 3}],
            "plain": [1, 2]
        });
        assert_eq!(
            flatten_keys(&data),
            vec!["company.name", "company.address.city", "items.sku", "items.sku", "items.qty"]
        );
    }

    #[test]
    fn catalog_dedups_and_leads_with_custom_text() {
        let catalog = KeyCatalog::new(["b".to_string(), CUSTOM_TEXT_KEY.to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(catalog.keys(), &[CUSTOM_TEXT_KEY, "b", "a"]);
        assert!(catalog.is_key("a"));
        assert!(!catalog.is_key(CUSTOM_TEXT_KEY));
    }

    #[test]
    fn broken_key_file_uses_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert_eq!(KeyCatalog::load(file.path()), KeyCatalog::fallback());

        let missing = file.path().with_extension("missing");
        assert_eq!(KeyCatalog::load(&missing).keys().len(), 3);
    }
}
