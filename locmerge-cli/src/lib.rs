//! CLI library for testing purposes

pub mod logging;

use std::path::PathBuf;

use clap::Parser;
use locmerge::{Config, Error, KeyCase, Mode, WalkOptions};

/// Merge localized resources into a language pack catalog.
#[derive(Parser, Debug)]
#[command(name = "locmerge", author, version, about, long_about = None)]
pub struct Cli {
    /// What to do: `default` (merge), `pathmap` or `convert`
    #[arg(long, default_value = "default", value_parser = parse_mode)]
    pub action: Mode,

    /// Root of the resource tree (XLIFF tree for `convert`)
    #[arg(long = "resource-dir")]
    pub resource_dir: Option<PathBuf>,

    /// Language pack folder containing translations/main.i18n.json
    #[arg(long = "langpack-dir")]
    pub langpack_dir: Option<PathBuf>,

    /// Master catalog to merge into, instead of the language pack default
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Path map file: applied when merging, written by `pathmap`
    #[arg(long = "path-mapping")]
    pub path_mapping: Option<PathBuf>,

    /// Source tree scanned for moved files (`pathmap`)
    #[arg(long = "source-dir")]
    pub source_dir: Option<PathBuf>,

    /// Folder that receives converted files (`convert`)
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Resource file suffix; defaults to `.i18n.json`, or `.xlf` for `convert`
    #[arg(long)]
    pub extension: Option<String>,

    /// Folder between the resource root and the keyed tree
    #[arg(long, default_value = locmerge::read_options::DEFAULT_PREFIX)]
    pub prefix: String,

    /// Lowercase every canonical key
    #[arg(long = "lowercase-keys")]
    pub lowercase_keys: bool,

    /// Log every file that is read
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| e.to_string())
}

impl Cli {
    /// Builds and validates the run configuration.
    pub fn into_config(self) -> Result<Config, Error> {
        let mut walk = WalkOptions::for_format(self.action.format()).with_prefix(self.prefix);
        if let Some(extension) = self.extension {
            walk = walk.with_extension(extension);
        }
        if self.lowercase_keys {
            walk = walk.with_key_case(KeyCase::Lower);
        }

        let config = Config {
            mode: self.action,
            resource_dir: self.resource_dir,
            langpack_dir: self.langpack_dir,
            catalog: self.catalog,
            path_mapping: self.path_mapping,
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            walk,
        };
        config.validate()?;
        Ok(config)
    }
}
