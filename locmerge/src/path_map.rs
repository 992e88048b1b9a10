//! Historical path renames.
//!
//! A [`PathMap`] rewrites canonical keys of resources whose source file moved,
//! so the moved file keeps reconciling with the key the catalog already uses.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, key::eq_ignore_case, traits::Parser};

/// Marker prefixed to a rename candidate that needs a human decision.
pub const AMBIGUITY_SENTINEL: &str = "****-";

/// One rename rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mapping {
    pub from: String,
    pub to: String,
}

impl Mapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether this rule was flagged as one of several candidates for a file.
    pub fn is_ambiguous(&self) -> bool {
        self.from.starts_with(AMBIGUITY_SENTINEL)
    }
}

/// Ordered rename rules; the first rule whose `from` matches wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PathMap {
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

impl Parser for PathMap {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Json)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, self).map_err(Error::Json)
    }
}

impl FromIterator<Mapping> for PathMap {
    fn from_iter<T: IntoIterator<Item = Mapping>>(iter: T) -> Self {
        PathMap {
            mappings: iter.into_iter().collect(),
        }
    }
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    /// Returns the `to` of the first rule whose `from` equals `path` ignoring
    /// case, or `path` itself. Matching is exact; there are no wildcards.
    pub fn map<'a>(&'a self, path: &'a str) -> &'a str {
        self.mappings
            .iter()
            .find(|mapping| eq_ignore_case(&mapping.from, path))
            .map_or(path, |mapping| mapping.to.as_str())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Loads a map if one is available.
    ///
    /// A missing file means no remapping. An unreadable or malformed file is
    /// reported and also treated as no remapping.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<PathMap> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no path map found, keys are used as-is");
            return None;
        }
        match PathMap::read_from(path) {
            Ok(map) => {
                tracing::info!(path = %path.display(), rules = map.len(), "loaded path map");
                Some(map)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable path map");
                None
            }
        }
    }

    /// Replaces whatever is at `path` with this map.
    pub fn write_replacing<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        self.write_to(path)
    }
}
