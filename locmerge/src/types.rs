//! Core, format-agnostic types for locmerge.
//! Parsers decode into these; the merger and converter consume them.

use std::{collections::HashMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use serde_json::Value;

use crate::{error::Error, key::eq_ignore_case};

/// The contents of one resource file: property name to localized value.
///
/// Properties keep the order they were read in. String values are the
/// localized strings; other JSON values (such as the `""` header array some
/// generators emit) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceEntry {
    properties: Vec<(String, Value)>,
}

impl ResourceEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing the value in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns the string value of a property, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of properties, blank-named ones included.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties whose name is not blank.
    pub fn usable(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(name, _)| !name.trim().is_empty())
    }

    pub fn usable_count(&self) -> usize {
        self.usable().count()
    }

    /// An entry without a single usable property contributes nothing to a catalog.
    pub fn is_blank(&self) -> bool {
        self.usable_count() == 0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ResourceEntry {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut entry = ResourceEntry::new();
        for (name, value) in iter {
            entry.insert(name, value);
        }
        entry
    }
}

impl Serialize for ResourceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (name, value) in &self.properties {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResourceEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = ResourceEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a flat object of localized strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entry = ResourceEntry::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    entry.insert(name, value);
                }
                Ok(entry)
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// Canonical key to resource entry, in discovery order.
///
/// Built once by a walk; afterwards it is only read.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    entries: Vec<(String, ResourceEntry)>,
    index: HashMap<String, usize>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry; a key that is already present is rejected.
    pub(crate) fn try_insert(&mut self, key: String, entry: ResourceEntry) -> Result<(), Error> {
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateResource(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, entry));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a table in iteration order. Later duplicates of a key are dropped.
impl FromIterator<(String, ResourceEntry)> for ResourceTable {
    fn from_iter<T: IntoIterator<Item = (String, ResourceEntry)>>(iter: T) -> Self {
        let mut table = ResourceTable::new();
        for (key, entry) in iter {
            if let Err(e) = table.try_insert(key, entry) {
                tracing::debug!(error = %e, "dropping later duplicate");
            }
        }
        table
    }
}

/// Every canonical key seen during a walk, whether or not its file parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownKeysIndex {
    keys: Vec<String>,
}

impl KnownKeysIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// All known keys whose last path segment equals `base_name`, ignoring case.
    pub fn find_by_base_name(&self, base_name: &str) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|key| eq_ignore_case(base_name_of(key), base_name))
            .map(String::as_str)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownKeysIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        KnownKeysIndex {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Last `/`-separated segment of a canonical key.
pub fn base_name_of(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
