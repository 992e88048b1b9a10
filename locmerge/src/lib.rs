#![forbid(unsafe_code)]
//! Localization resource merge toolkit.
//!
//! Walks a source tree for localized resource files, gives each one a stable
//! canonical key, and folds them into a single master translation catalog.
//! Keys of moved files can be repaired through a [`PathMap`], and XLIFF 1.2
//! vendor drops can be converted back into the catalog's JSON shape.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locmerge::{CatalogMerger, ResourceFormat, ResourceReader, WalkOptions};
//!
//! let walk = ResourceReader::new("/repos/product", WalkOptions::new())
//!     .read(ResourceFormat::Json)?;
//! let output = CatalogMerger::for_language_pack("/repos/langpack".as_ref())
//!     .merge(&walk.table)?;
//! println!("wrote {}", output.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modes
//!
//! - **merge** (`default`): append the resource table to `main.i18n.json`,
//!   written as `main.i18n.json.output`
//! - **pathmap**: propose rename rules for files that moved in a source tree
//! - **convert**: turn every XLIFF `<file>` group into a catalog JSON file
//!
//! All I/O is synchronous and single-threaded; every run reprocesses the whole
//! tree.

pub mod config;
pub mod converter;
pub mod error;
pub mod formats;
pub mod key;
pub mod merger;
pub mod path_map;
pub mod path_mapper;
pub mod pipeline;
pub mod read_options;
pub mod reader;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    config::{Config, Mode},
    converter::{ConversionReport, XliffToJsonConverter},
    error::Error,
    formats::{
        FileGroup, MasterCatalog, ParsedResource, ResourceFormat, ResourceParser, TransUnit,
        XliffDocument,
    },
    key::{KeyCase, KeyDeriver},
    merger::CatalogMerger,
    path_map::{AMBIGUITY_SENTINEL, Mapping, PathMap},
    path_mapper::PathMapper,
    pipeline::{RunSummary, run},
    read_options::WalkOptions,
    reader::{ResourceReader, WalkOutput, XliffTable},
    types::{KnownKeysIndex, ResourceEntry, ResourceTable},
};
