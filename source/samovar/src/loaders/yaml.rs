//! YAML decoding.
//!
//! Multi-document files produce one property set per non-empty document.
//! Nested mappings are flattened to dotted keys and sequences to `key[i]`
//! entries, so every value lands as a flat string property.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::environment::PropertySet;
use crate::error::{ConfigError, Result};
use crate::loader::PropertySetLoader;

pub struct YamlLoader;

impl PropertySetLoader for YamlLoader {
    fn extensions(&self) -> &[&str] {
        &["yml", "yaml"]
    }

    fn load(&self, name: &str, content: &str) -> Result<Vec<PropertySet>> {
        let mut sets = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|err| ConfigError::Load {
                resource: name.to_string(),
                source: Box::new(err),
            })?;
            if value.is_null() {
                continue;
            }
            if !value.is_mapping() {
                return Err(ConfigError::Load {
                    resource: name.to_string(),
                    source: "top-level YAML node must be a mapping".into(),
                });
            }
            let mut entries = IndexMap::new();
            flatten(&value, "", &mut entries);
            if entries.is_empty() {
                continue;
            }
            sets.push(PropertySet::with_entries(name, entries));
        }
        if sets.len() > 1 {
            for (index, set) in sets.iter_mut().enumerate() {
                set.set_name(format!("{name} (document #{index})"));
            }
        }
        Ok(sets)
    }
}

fn flatten(value: &Value, prefix: &str, entries: &mut IndexMap<String, String>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let key = scalar_key(key);
                let full = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, &full, entries);
            }
        }
        Value::Sequence(sequence) => {
            for (index, child) in sequence.iter().enumerate() {
                flatten(child, &format!("{prefix}[{index}]"), entries);
            }
        }
        Value::Tagged(tagged) => flatten(&tagged.value, prefix, entries),
        Value::Null => {
            entries.insert(prefix.to_string(), String::new());
        }
        Value::Bool(value) => {
            entries.insert(prefix.to_string(), value.to_string());
        }
        Value::Number(value) => {
            entries.insert(prefix.to_string(), value.to_string());
        }
        Value::String(value) => {
            entries.insert(prefix.to_string(), value.clone());
        }
    }
}

fn scalar_key(key: &Value) -> String {
    match key {
        Value::String(key) => key.clone(),
        Value::Number(key) => key.to_string(),
        Value::Bool(key) => key.to_string(),
        other => format!("{other:?}"),
    }
}
