//! The master translation catalog (`translations/main.i18n.json`).
//!
//! ```json
//! {
//!   "copyright": ["..."],
//!   "version": "1.0.0.0",
//!   "contents": { "<key>": { "<prop>": "<value>" } }
//! }
//! ```
//!
//! `contents` is kept as an ordered list of `(key, entry)` pairs. Its order is
//! what reviewers diff, and it may hold the same key more than once: merging
//! appends, it never replaces.

use std::{
    fmt,
    io::{BufRead, Write},
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{error::Error, traits::Parser, types::ResourceEntry};

pub const CATALOG_VERSION: &str = "1.0.0.0";

/// Header lines written into generated catalogs.
pub const GENERATED_COPYRIGHT: [&str; 5] = [
    "--------------------------------------------------------------------------------------------",
    "Copyright (c) Microsoft Corporation. All rights reserved.",
    "Licensed under the MIT License. See License.txt in the project root for license information.",
    "--------------------------------------------------------------------------------------------",
    "Do not edit this file. It is machine generated.",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterCatalog {
    #[serde(default)]
    pub copyright: Vec<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub contents: Contents,
}

fn default_version() -> String {
    CATALOG_VERSION.to_string()
}

impl Default for MasterCatalog {
    fn default() -> Self {
        Self::generated()
    }
}

impl MasterCatalog {
    /// An empty catalog carrying the machine-generated header.
    pub fn generated() -> Self {
        Self {
            copyright: GENERATED_COPYRIGHT.iter().map(|s| s.to_string()).collect(),
            version: CATALOG_VERSION.to_string(),
            contents: Contents::default(),
        }
    }
}

impl Parser for MasterCatalog {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Json)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, self).map_err(Error::Json)
    }
}

/// Ordered, duplicate-tolerant `contents` of a catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contents {
    entries: Vec<(String, ResourceEntry)>,
}

impl Contents {
    /// Adds `entry` after the current last child, even if `key` is already present.
    pub fn append(&mut self, key: impl Into<String>, entry: ResourceEntry) {
        self.entries.push((key.into(), entry));
    }

    /// First entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// How many times `key` occurs.
    pub fn occurrences(&self, key: &str) -> usize {
        self.entries.iter().filter(|(k, _)| k == key).count()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn last_key(&self) -> Option<&str> {
        self.entries.last().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Contents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Contents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ContentsVisitor;

        impl<'de> Visitor<'de> for ContentsVisitor {
            type Value = Contents;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of resource entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut contents = Contents::default();
                while let Some((key, entry)) = access.next_entry::<String, ResourceEntry>()? {
                    contents.append(key, entry);
                }
                Ok(contents)
            }
        }

        deserializer.deserialize_map(ContentsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &str = r#"{
        "copyright": ["header"],
        "version": "1.0.0.0",
        "contents": {
            "zeta/last": { "b": "B", "a": "A" },
            "alpha/first": { "x": "X" }
        }
    }"#;

    #[test]
    fn test_parse_keeps_contents_order() {
        let catalog = MasterCatalog::from_str(MAIN).unwrap();
        assert_eq!(catalog.copyright, vec!["header"]);
        assert_eq!(catalog.version, "1.0.0.0");
        assert_eq!(
            catalog.contents.keys().collect::<Vec<_>>(),
            vec!["zeta/last", "alpha/first"]
        );
        let names: Vec<&str> = catalog
            .contents
            .get("zeta/last")
            .unwrap()
            .iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let json = r#"{"copyright": [], "version": "1.0.0.0",
            "contents": {"a": {"k": "1"}, "a": {"k": "2"}}}"#;
        let catalog = MasterCatalog::from_str(json).unwrap();
        assert_eq!(catalog.contents.occurrences("a"), 2);
        assert_eq!(catalog.contents.get("a").unwrap().get_str("k"), Some("1"));

        let mut out = Vec::new();
        catalog.to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\"a\":").count(), 2);
    }

    #[test]
    fn test_append_goes_after_last_child() {
        let mut catalog = MasterCatalog::from_str(MAIN).unwrap();
        catalog
            .contents
            .append("new/key", [("p", "v")].into_iter().collect());
        assert_eq!(catalog.contents.last_key(), Some("new/key"));
        assert_eq!(catalog.contents.len(), 3);
    }

    #[test]
    fn test_generated_header() {
        let catalog = MasterCatalog::generated();
        assert_eq!(catalog.copyright.len(), 5);
        assert_eq!(catalog.version, CATALOG_VERSION);
        assert!(catalog.contents.is_empty());
    }

    #[test]
    fn test_missing_contents_is_rejected_only_when_malformed() {
        let catalog = MasterCatalog::from_str(r#"{"copyright": [], "version": "2"}"#).unwrap();
        assert!(catalog.contents.is_empty());
        assert!(MasterCatalog::from_str(r#"{"contents": []}"#).is_err());
    }
}
