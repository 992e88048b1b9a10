//! One run of the tool: validate the configuration, walk, then write the
//! output of the selected mode.

use std::path::PathBuf;

use crate::{
    config::{Config, Mode},
    converter::{ConversionFailure, XliffToJsonConverter},
    error::Error,
    merger::CatalogMerger,
    path_map::PathMap,
    path_mapper::PathMapper,
    reader::{ResourceReader, WalkFailure},
};

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files written by the run.
    pub written: Vec<PathBuf>,
    /// Entries read into the resource table (or documents, in convert mode).
    pub resources: usize,
    /// Rules in the discovered path map.
    pub mappings: usize,
    /// Directories whose walk was cut short.
    pub walk_failures: Vec<WalkFailure>,
    /// Groups that failed to convert.
    pub conversion_failures: Vec<ConversionFailure>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.walk_failures.is_empty() || !self.conversion_failures.is_empty()
    }
}

/// Runs `config`. Configuration problems are reported before any file is read.
pub fn run(config: &Config) -> Result<RunSummary, Error> {
    config.validate()?;
    let resource_dir = config
        .resource_dir
        .clone()
        .ok_or_else(|| Error::config("missing required argument --resource-dir"))?;
    tracing::info!(mode = %config.mode, resources = %resource_dir.display(), "starting run");

    match config.mode {
        Mode::Merge => run_merge(config, resource_dir),
        Mode::PathMap => run_path_map(config, resource_dir),
        Mode::Convert => run_convert(config, resource_dir),
    }
}

fn run_merge(config: &Config, resource_dir: PathBuf) -> Result<RunSummary, Error> {
    let catalog = config
        .catalog_path()
        .ok_or_else(|| Error::config("missing required argument --langpack-dir or --catalog"))?;
    let merger = CatalogMerger::new(catalog);
    if !merger.master().is_file() {
        return Err(Error::MissingCatalog(merger.master().to_path_buf()));
    }

    let path_map = config.path_mapping.as_ref().and_then(PathMap::load_optional);
    let walk = ResourceReader::new(resource_dir, config.walk.clone())
        .with_path_map(path_map)
        .read(config.mode.format())?;

    let output = merger.merge(&walk.table)?;
    Ok(RunSummary {
        written: vec![output],
        resources: walk.table.len(),
        walk_failures: walk.failures,
        ..Default::default()
    })
}

fn run_path_map(config: &Config, resource_dir: PathBuf) -> Result<RunSummary, Error> {
    let (Some(source_dir), Some(destination)) = (&config.source_dir, &config.path_mapping) else {
        return Err(Error::config(
            "path map discovery needs --source-dir and --path-mapping",
        ));
    };

    let walk = ResourceReader::new(resource_dir, config.walk.clone()).read(config.mode.format())?;
    let map = PathMapper::new(source_dir, &walk.known_keys)
        .with_key_case(config.walk.key_case)
        .write(destination)?;

    Ok(RunSummary {
        written: vec![destination.clone()],
        resources: walk.table.len(),
        mappings: map.len(),
        walk_failures: walk.failures,
        ..Default::default()
    })
}

fn run_convert(config: &Config, resource_dir: PathBuf) -> Result<RunSummary, Error> {
    let destination = config
        .output_dir
        .as_ref()
        .ok_or_else(|| Error::config("missing required argument --output-dir"))?;

    let walk = ResourceReader::new(resource_dir, config.walk.clone()).read(config.mode.format())?;
    let report = XliffToJsonConverter::new(destination).convert(&walk.documents)?;

    Ok(RunSummary {
        written: report.written,
        resources: walk.documents.len(),
        walk_failures: walk.failures,
        conversion_failures: report.failures,
        ..Default::default()
    })
}
