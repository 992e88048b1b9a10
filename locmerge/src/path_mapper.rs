//! Rename discovery.
//!
//! Cross-references a source tree against the keys of a previous resource walk
//! and proposes a [`PathMap`] that sends each historical key to the place its
//! source file lives now. Matching is by base name only, so one source file can
//! match several historical keys. The mapper does not guess between them: every
//! candidate after the first is flagged with [`AMBIGUITY_SENTINEL`] for a human
//! to resolve before the map is used.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{
    error::Error,
    key::{KeyCase, KeyDeriver, eq_ignore_case},
    path_map::{AMBIGUITY_SENTINEL, Mapping, PathMap},
    types::KnownKeysIndex,
};

pub struct PathMapper<'a> {
    source_root: PathBuf,
    known_keys: &'a KnownKeysIndex,
    deriver: KeyDeriver,
}

impl<'a> PathMapper<'a> {
    pub fn new(source_root: impl Into<PathBuf>, known_keys: &'a KnownKeysIndex) -> Self {
        let source_root = source_root.into();
        let deriver = KeyDeriver::retaining_root_name(&source_root, KeyCase::Preserve);
        Self {
            source_root,
            known_keys,
            deriver,
        }
    }

    pub fn with_key_case(mut self, case: KeyCase) -> Self {
        self.deriver = KeyDeriver::retaining_root_name(&self.source_root, case);
        self
    }

    /// Proposes rename rules for every source file below the root's subdirectories.
    pub fn discover(&self) -> PathMap {
        let mut map = PathMap::new();
        let walker = WalkDir::new(&self.source_root)
            .min_depth(2)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            });

        for next in walker {
            let dent = match next {
                Ok(dent) => dent,
                Err(e) => {
                    tracing::error!(error = %e, "cannot read source directory");
                    continue;
                }
            };
            if dent.file_type().is_dir() {
                continue;
            }
            for mapping in self.candidates_for(dent.path()) {
                map.push(mapping);
            }
        }

        let ambiguous = map.mappings.iter().filter(|m| m.is_ambiguous()).count();
        tracing::info!(
            source = %self.source_root.display(),
            rules = map.len(),
            ambiguous,
            "rename discovery finished"
        );
        map
    }

    /// Rename candidates for one source file.
    pub fn candidates_for(&self, path: &Path) -> Vec<Mapping> {
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let current = match self.deriver.derive(path, &extension) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "no canonical key, skipping");
                return Vec::new();
            }
        };
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.known_keys
            .find_by_base_name(&stem)
            .into_iter()
            .filter(|known| !eq_ignore_case(known, &current))
            .enumerate()
            .map(|(i, known)| {
                let from = if i == 0 {
                    known.to_string()
                } else {
                    format!("{AMBIGUITY_SENTINEL}{known}")
                };
                Mapping::new(from, current.clone())
            })
            .collect()
    }

    /// Discovers the map and writes it to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<PathMap, Error> {
        let map = self.discover();
        map.write_replacing(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "wrote path map");
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// source").unwrap();
    }

    #[test]
    fn test_moved_file_yields_one_rule() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sql");
        touch(&source, "workbench/parts/query/queryEditor.ts");

        let known: KnownKeysIndex = ["sql/parts/query/queryEditor"].into_iter().collect();
        let map = PathMapper::new(&source, &known).discover();
        assert_eq!(
            map.mappings,
            vec![Mapping::new(
                "sql/parts/query/queryEditor",
                "sql/workbench/parts/query/queryEditor"
            )]
        );
    }

    #[test]
    fn test_unmoved_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sql");
        touch(&source, "parts/Editor.ts");

        let known: KnownKeysIndex = ["SQL/parts/editor"].into_iter().collect();
        let map = PathMapper::new(&source, &known).discover();
        assert!(map.is_empty());
    }

    #[test]
    fn test_ambiguous_matches_flag_all_but_first() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sql");
        touch(&source, "new/foo.ts");

        let known: KnownKeysIndex = ["sql/old/foo", "sql/older/Foo"].into_iter().collect();
        let map = PathMapper::new(&source, &known).discover();
        assert_eq!(
            map.mappings,
            vec![
                Mapping::new("sql/old/foo", "sql/new/foo"),
                Mapping::new("****-sql/older/Foo", "sql/new/foo"),
            ]
        );
        assert!(!map.mappings[0].is_ambiguous());
        assert!(map.mappings[1].is_ambiguous());
    }

    #[test]
    fn test_matching_key_does_not_count_toward_ambiguity() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sql");
        touch(&source, "new/foo.ts");

        let known: KnownKeysIndex = ["sql/new/foo", "sql/old/foo"].into_iter().collect();
        let map = PathMapper::new(&source, &known).discover();
        assert_eq!(map.mappings, vec![Mapping::new("sql/old/foo", "sql/new/foo")]);
    }

    #[test]
    fn test_files_directly_in_source_root_are_ignored() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sql");
        touch(&source, "foo.ts");

        let known: KnownKeysIndex = ["sql/old/foo"].into_iter().collect();
        assert!(PathMapper::new(&source, &known).discover().is_empty());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sql");
        touch(&source, "b/bar.ts");
        let out = dir.path().join("mapping.json");
        fs::write(&out, "old").unwrap();

        let known: KnownKeysIndex = ["sql/a/bar"].into_iter().collect();
        let written = PathMapper::new(&source, &known).write(&out).unwrap();
        let reloaded = PathMap::load_optional(&out).unwrap();
        assert_eq!(reloaded, written);
        assert_eq!(reloaded.map("sql/a/bar"), "sql/b/bar");
    }
}
