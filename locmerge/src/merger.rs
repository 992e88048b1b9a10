//! Folds a resource table into the master catalog.
//!
//! Merging is append-only. Each non-empty resource is added after the current
//! last child of `contents`; existing children are never replaced or moved. A
//! second merge of the same table therefore adds every key a second time.
//! The result goes to `<master>.output`; the master itself is left alone.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{
    error::Error,
    formats::MasterCatalog,
    traits::Parser,
    types::{ResourceEntry, ResourceTable},
};

/// Appended to the master catalog path to name the merge output.
pub const OUTPUT_SUFFIX: &str = ".output";

/// Location of the master catalog inside a language pack.
pub const MASTER_CATALOG: &str = "translations/main.i18n.json";

pub struct CatalogMerger {
    master: PathBuf,
}

impl CatalogMerger {
    pub fn new(master: impl Into<PathBuf>) -> Self {
        Self {
            master: master.into(),
        }
    }

    /// Merger for the master catalog of a language pack folder.
    pub fn for_language_pack(langpack_dir: &Path) -> Self {
        Self::new(langpack_dir.join(MASTER_CATALOG))
    }

    pub fn master(&self) -> &Path {
        &self.master
    }

    pub fn output_path(&self) -> PathBuf {
        let mut path = self.master.clone().into_os_string();
        path.push(OUTPUT_SUFFIX);
        PathBuf::from(path)
    }

    /// Loads the master catalog, appends `table` and writes `<master>.output`.
    ///
    /// Nothing is written when the master is missing or unreadable.
    pub fn merge(&self, table: &ResourceTable) -> Result<PathBuf, Error> {
        if !self.master.is_file() {
            return Err(Error::MissingCatalog(self.master.clone()));
        }
        let mut catalog = MasterCatalog::read_from(&self.master)?;
        let appended = merge_into(&mut catalog, table);

        let output = self.output_path();
        if output.exists() {
            std::fs::remove_file(&output)?;
        }
        catalog.write_to(&output)?;
        tracing::info!(
            master = %self.master.display(),
            output = %output.display(),
            appended,
            total = catalog.contents.len(),
            "merged resources into catalog"
        );
        Ok(output)
    }
}

/// Appends every non-empty entry of `table`, in table order. Returns how many
/// entries were appended.
pub fn merge_into(catalog: &mut MasterCatalog, table: &ResourceTable) -> usize {
    let mut appended = 0;
    for (key, entry) in table.iter() {
        if entry.is_blank() {
            tracing::debug!(key = %key, "skipping empty resource");
            continue;
        }
        catalog.contents.append(key, catalog_entry(entry));
        appended += 1;
    }
    appended
}

/// The usable properties of `entry`; values that are not strings become `null`.
fn catalog_entry(entry: &ResourceEntry) -> ResourceEntry {
    entry
        .usable()
        .map(|(name, value)| {
            let value = match value {
                Value::String(_) => value.clone(),
                _ => Value::Null,
            };
            (name.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn entry(pairs: &[(&str, Value)]) -> ResourceEntry {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn table(items: Vec<(&str, ResourceEntry)>) -> ResourceTable {
        items
            .into_iter()
            .map(|(key, entry)| (key.to_string(), entry))
            .collect()
    }

    #[test]
    fn test_empty_entries_are_skipped() {
        let mut catalog = MasterCatalog::generated();
        let table = table(vec![
            ("none", ResourceEntry::new()),
            ("blank", entry(&[("", json!(["header"]))])),
            ("one", entry(&[("title", json!("Title"))])),
        ]);

        assert_eq!(merge_into(&mut catalog, &table), 1);
        assert_eq!(catalog.contents.keys().collect::<Vec<_>>(), vec!["one"]);
    }

    #[test]
    fn test_blank_properties_are_dropped_and_non_strings_nulled() {
        let mut catalog = MasterCatalog::generated();
        let table = table(vec![(
            "sql/editor",
            entry(&[
                ("", json!(["header"])),
                ("run", json!("Run")),
                ("count", json!(3)),
            ]),
        )]);

        merge_into(&mut catalog, &table);
        let merged = catalog.contents.get("sql/editor").unwrap();
        assert_eq!(
            serde_json::to_value(merged).unwrap(),
            json!({"run": "Run", "count": null})
        );
    }

    #[test]
    fn test_merge_appends_after_existing_children() {
        let mut catalog = MasterCatalog::generated();
        catalog
            .contents
            .append("existing", entry(&[("k", json!("v"))]));
        let table = table(vec![
            ("z/new", entry(&[("k", json!("z"))])),
            ("a/new", entry(&[("k", json!("a"))])),
        ]);

        merge_into(&mut catalog, &table);
        assert_eq!(
            catalog.contents.keys().collect::<Vec<_>>(),
            vec!["existing", "z/new", "a/new"]
        );
    }

    #[test]
    fn test_merging_twice_duplicates_keys() {
        let mut catalog = MasterCatalog::generated();
        let table = table(vec![("sql/a", entry(&[("k", json!("v"))]))]);

        merge_into(&mut catalog, &table);
        merge_into(&mut catalog, &table);
        assert_eq!(catalog.contents.occurrences("sql/a"), 2);
    }

    #[test]
    fn test_merge_writes_output_next_to_master() {
        let dir = TempDir::new().unwrap();
        let master = dir.path().join("main.i18n.json");
        fs::write(
            &master,
            r#"{"copyright": ["c"], "version": "1.0.0.0", "contents": {"old": {"k": "v"}}}"#,
        )
        .unwrap();
        let original = fs::read_to_string(&master).unwrap();

        let table = table(vec![("new", entry(&[("k", json!("n"))]))]);
        let output = CatalogMerger::new(&master).merge(&table).unwrap();

        assert_eq!(output, dir.path().join("main.i18n.json.output"));
        assert_eq!(fs::read_to_string(&master).unwrap(), original);
        let merged = MasterCatalog::read_from(&output).unwrap();
        assert_eq!(merged.copyright, vec!["c"]);
        assert_eq!(merged.contents.keys().collect::<Vec<_>>(), vec!["old", "new"]);
    }

    #[test]
    fn test_missing_master_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let merger = CatalogMerger::for_language_pack(dir.path());
        let err = merger.merge(&ResourceTable::new()).unwrap_err();
        assert!(matches!(err, Error::MissingCatalog(_)));
        assert!(!merger.output_path().exists());
    }

    #[test]
    fn test_malformed_master_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let master = dir.path().join("main.i18n.json");
        fs::write(&master, "{ nope").unwrap();
        let merger = CatalogMerger::new(&master);
        assert!(matches!(
            merger.merge(&ResourceTable::new()),
            Err(Error::Json(_))
        ));
        assert!(!merger.output_path().exists());
    }
}
