//! Resource discovery: walks a tree and builds the canonical key table.
//!
//! Directories are visited in pre-order. Within one directory all files come
//! first (sorted by name), then the subdirectories (sorted by name). That order
//! is the insertion order of the [`ResourceTable`] and, through the merger, the
//! order in which new entries land in the master catalog.
//!
//! A file that cannot be read or parsed abandons the rest of its directory,
//! files and subdirectories alike. Other directories are unaffected.

use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::{
    error::Error,
    formats::{ParsedResource, ResourceFormat, ResourceParser, XliffDocument},
    key::{KeyDeriver, ends_with_ignore_case},
    path_map::PathMap,
    read_options::WalkOptions,
    traits::read_decoded,
    types::{KnownKeysIndex, ResourceTable},
};

/// Parsed XLIFF documents by canonical key, in discovery order.
pub type XliffTable = Vec<(String, XliffDocument)>;

/// A directory whose walk was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkFailure {
    pub directory: PathBuf,
    pub message: String,
}

/// Everything one walk produced.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub table: ResourceTable,
    pub known_keys: KnownKeysIndex,
    pub documents: XliffTable,
    pub failures: Vec<WalkFailure>,
}

pub struct ResourceReader {
    root: PathBuf,
    options: WalkOptions,
    deriver: KeyDeriver,
    path_map: Option<PathMap>,
}

impl ResourceReader {
    pub fn new(root: impl Into<PathBuf>, options: WalkOptions) -> Self {
        let root = root.into();
        let deriver = KeyDeriver::new(&root, &options.prefix, options.key_case);
        Self {
            root,
            options,
            deriver,
            path_map: None,
        }
    }

    /// Rewrites every derived key through `path_map`, when one is given.
    pub fn with_path_map(mut self, path_map: Option<PathMap>) -> Self {
        self.path_map = path_map;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Walks the tree, parsing resources as `format`.
    pub fn read(&self, format: ResourceFormat) -> Result<WalkOutput, Error> {
        self.read_with(&format)
    }

    /// Walks the tree with any parser.
    pub fn read_with<P: ResourceParser>(&self, parser: &P) -> Result<WalkOutput, Error> {
        if !self.root.is_dir() {
            return Err(Error::config(format!(
                "resource directory {} does not exist",
                self.root.display()
            )));
        }

        let mut output = WalkOutput::default();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by(files_before_directories)
            .into_iter();

        while let Some(next) = walker.next() {
            let dent = match next {
                Ok(dent) => dent,
                Err(e) => {
                    let directory = e.path().unwrap_or(&self.root).to_path_buf();
                    tracing::error!(dir = %directory.display(), error = %e, "cannot read directory");
                    output.failures.push(WalkFailure {
                        directory,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            // Files directly under the root sit above the prefix folder.
            if dent.file_type().is_dir() || dent.depth() < 2 {
                continue;
            }
            if !ends_with_ignore_case(&dent.file_name().to_string_lossy(), &self.options.extension)
            {
                continue;
            }

            if let Err(e) = self.visit_file(dent.path(), parser, &mut output) {
                let directory = dent
                    .path()
                    .parent()
                    .unwrap_or(&self.root)
                    .to_path_buf();
                tracing::error!(
                    dir = %directory.display(),
                    file = %dent.path().display(),
                    error = %e,
                    "skipping the rest of this directory"
                );
                output.failures.push(WalkFailure {
                    directory,
                    message: e.to_string(),
                });
                walker.skip_current_dir();
            }
        }

        tracing::info!(
            root = %self.root.display(),
            resources = output.table.len(),
            documents = output.documents.len(),
            keys = output.known_keys.len(),
            failures = output.failures.len(),
            "resource walk finished"
        );
        Ok(output)
    }

    fn visit_file<P: ResourceParser>(
        &self,
        path: &Path,
        parser: &P,
        output: &mut WalkOutput,
    ) -> Result<(), Error> {
        let key = match self.deriver.derive(path, &self.options.extension) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "no canonical key, skipping");
                return Ok(());
            }
        };
        let key = match &self.path_map {
            Some(map) => map.map(&key).to_string(),
            None => key,
        };
        tracing::debug!(file = %path.display(), key = %key, "resource");
        output.known_keys.record(key.clone());

        let text = read_decoded(path)?;
        match parser.parse(&text) {
            Ok(ParsedResource::Json(entry)) if entry.is_empty() => {
                tracing::debug!(key = %key, "empty resource file");
            }
            Ok(ParsedResource::Json(entry)) => output.table.try_insert(key, entry)?,
            Ok(ParsedResource::Xliff(document)) => output.documents.push((key, document)),
            Err(Error::InvalidXliff(reason)) => {
                tracing::warn!(file = %path.display(), reason = %reason, "not an XLIFF 1.2 document, skipping");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

fn files_before_directories(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
