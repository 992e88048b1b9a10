//! XLIFF to catalog JSON conversion.
//!
//! Every `<file>` group of every walked XLIFF document becomes one catalog
//! file `<name>.i18n.json`, where `<name>` is the last segment of the group's
//! `original` attribute. Units without a target are left out of the output.
//! A group that cannot be collapsed (for example two units with the same id) is
//! reported and skipped; the remaining groups are still converted. When two
//! groups map to the same file name, the first one wins and the later one is
//! reported.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    formats::{FileGroup, MasterCatalog, XliffDocument},
    reader::XliffTable,
    traits::Parser,
    types::{ResourceEntry, base_name_of},
};

/// Suffix of converted files.
pub const OUTPUT_EXTENSION: &str = ".i18n.json";

/// A group that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailure {
    pub group: String,
    pub message: String,
}

/// What one conversion pass did.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ConversionFailure>,
}

pub struct XliffToJsonConverter {
    destination: PathBuf,
}

impl XliffToJsonConverter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Converts every group of every document and writes one file per group.
    ///
    /// Only failing to create the destination folder aborts the pass.
    pub fn convert(&self, documents: &XliffTable) -> Result<ConversionReport, Error> {
        std::fs::create_dir_all(&self.destination)?;

        let mut report = ConversionReport::default();
        // output path -> `original` of the group that claimed it
        let mut claimed: HashMap<PathBuf, String> = HashMap::new();
        for (key, document) in documents {
            tracing::debug!(key = %key, groups = document.files.len(), "converting");
            for group in &document.files {
                match self.write_group(group, &mut claimed) {
                    Ok(path) => report.written.push(path),
                    Err(e) => {
                        tracing::error!(group = %group.original, source = %key, error = %e, "failed to convert");
                        report.failures.push(ConversionFailure {
                            group: group.original.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            written = report.written.len(),
            failed = report.failures.len(),
            destination = %self.destination.display(),
            "conversion finished"
        );
        Ok(report)
    }

    fn write_group(
        &self,
        group: &FileGroup,
        claimed: &mut HashMap<PathBuf, String>,
    ) -> Result<PathBuf, Error> {
        let path = self.output_path(&group.original);
        if let Some(first) = claimed.get(&path) {
            return Err(Error::OutputCollision {
                path,
                first: first.clone(),
            });
        }
        let catalog = convert_group(group)?;
        if path.exists() {
            tracing::debug!(path = %path.display(), group = %group.original, "replacing converted file");
        }
        catalog.write_to(&path)?;
        claimed.insert(path.clone(), group.original.clone());
        Ok(path)
    }

    /// Where the catalog for a group with the given `original` is written.
    pub fn output_path(&self, original: &str) -> PathBuf {
        let normalized = original.replace('\\', "/");
        let name = base_name_of(&normalized);
        self.destination.join(format!("{name}{OUTPUT_EXTENSION}"))
    }
}

/// Builds the catalog for one group: `contents = { original: entry }`.
pub fn convert_group(group: &FileGroup) -> Result<MasterCatalog, Error> {
    let entry = without_nulls(group.collapse()?);
    let mut catalog = MasterCatalog::generated();
    catalog.contents.append(group.original.clone(), entry);
    Ok(catalog)
}

/// Converts all groups of a document in memory, failing on the first bad group.
pub fn convert_document(document: &XliffDocument) -> Result<Vec<MasterCatalog>, Error> {
    document.files.iter().map(convert_group).collect()
}

fn without_nulls(entry: ResourceEntry) -> ResourceEntry {
    entry
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
