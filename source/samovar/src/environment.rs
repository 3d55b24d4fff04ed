//! The mutable environment the engine ultimately populates.
//!
//! An [`Environment`] is an ordered list of named property sets plus the
//! active/default profile lists. The list order is the precedence order:
//! sources added later override sources added earlier, so a lookup scans the
//! list back to front.

use indexmap::IndexMap;

/// Name of the well-known lowest-precedence property source.
pub const DEFAULT_PROPERTIES: &str = "defaultProperties";

/// A named, insertion-ordered set of string properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySet {
    name: String,
    entries: IndexMap<String, String>,
}

impl PropertySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn with_entries<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered property sources plus profile state.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    sources: Vec<PropertySet>,
    active_profiles: Vec<String>,
    default_profiles: Vec<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source at the end of the list, which is the highest
    /// precedence position.
    pub fn add_last(&mut self, set: PropertySet) {
        self.sources.push(set);
    }

    pub fn sources(&self) -> &[PropertySet] {
        &self.sources
    }

    pub fn source(&self, name: &str) -> Option<&PropertySet> {
        self.sources.iter().find(|set| set.name() == name)
    }

    /// Look a key up across all sources, later sources overriding earlier
    /// ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sources.iter().rev().find_map(|set| set.get(key))
    }

    /// Demote the named source to the front (lowest precedence) of the list.
    /// Returns `false` when no source carries that name.
    pub fn move_to_front(&mut self, name: &str) -> bool {
        match self.sources.iter().position(|set| set.name() == name) {
            Some(index) => {
                let set = self.sources.remove(index);
                self.sources.insert(0, set);
                true
            }
            None => false,
        }
    }

    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    pub fn set_active_profiles(&mut self, profiles: Vec<String>) {
        self.active_profiles = profiles;
    }

    pub fn default_profiles(&self) -> &[String] {
        &self.default_profiles
    }

    pub fn set_default_profiles(&mut self, profiles: Vec<String>) {
        self.default_profiles = profiles;
    }
}
