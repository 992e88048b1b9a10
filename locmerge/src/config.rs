//! Run configuration.
//!
//! A [`Config`] names the mode and the paths it needs. [`Config::validate`]
//! checks them all before anything is read or written.

use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    error::Error,
    formats::ResourceFormat,
    merger::MASTER_CATALOG,
    read_options::WalkOptions,
};

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Merge the resource tree into the master catalog.
    #[default]
    Merge,
    /// Propose a path map from a source tree.
    PathMap,
    /// Convert XLIFF documents to catalog JSON files.
    Convert,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Merge => write!(f, "default"),
            Mode::PathMap => write!(f, "pathmap"),
            Mode::Convert => write!(f, "convert"),
        }
    }
}

/// Accepts `default`/`merge`, `pathmap`/`path-map` and `convert`, ignoring case.
impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "merge" => Ok(Mode::Merge),
            "pathmap" | "path-map" | "path_map" => Ok(Mode::PathMap),
            "convert" => Ok(Mode::Convert),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

impl Mode {
    /// The resource format the mode walks.
    pub fn format(&self) -> ResourceFormat {
        match self {
            Mode::Merge | Mode::PathMap => ResourceFormat::Json,
            Mode::Convert => ResourceFormat::Xliff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    /// Root of the resource tree (XLIFF tree in convert mode).
    pub resource_dir: Option<PathBuf>,
    /// Language pack folder holding `translations/main.i18n.json`.
    pub langpack_dir: Option<PathBuf>,
    /// Explicit master catalog; takes precedence over `langpack_dir`.
    pub catalog: Option<PathBuf>,
    /// Path map to apply (merge) or to write (pathmap).
    pub path_mapping: Option<PathBuf>,
    /// Source tree scanned for moved files (pathmap).
    pub source_dir: Option<PathBuf>,
    /// Destination folder for converted files (convert).
    pub output_dir: Option<PathBuf>,
    pub walk: WalkOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl Config {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            resource_dir: None,
            langpack_dir: None,
            catalog: None,
            path_mapping: None,
            source_dir: None,
            output_dir: None,
            walk: WalkOptions::for_format(mode.format()),
        }
    }

    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    pub fn with_langpack_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.langpack_dir = Some(dir.into());
        self
    }

    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(path.into());
        self
    }

    pub fn with_path_mapping(mut self, path: impl Into<PathBuf>) -> Self {
        self.path_mapping = Some(path.into());
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_walk_options(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    /// The master catalog a merge reads.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog
            .clone()
            .or_else(|| self.langpack_dir.as_ref().map(|dir| dir.join(MASTER_CATALOG)))
    }

    /// Checks that every input the mode requires is present.
    pub fn validate(&self) -> Result<(), Error> {
        let resource_dir = require(&self.resource_dir, "--resource-dir")?;
        if !resource_dir.is_dir() {
            return Err(Error::config(format!(
                "resource directory {} does not exist",
                resource_dir.display()
            )));
        }
        if self.walk.extension.is_empty() {
            return Err(Error::config("resource extension cannot be empty"));
        }

        match self.mode {
            Mode::Merge => {
                if self.catalog_path().is_none() {
                    return Err(Error::config(
                        "missing required argument --langpack-dir or --catalog",
                    ));
                }
            }
            Mode::PathMap => {
                let source = require(&self.source_dir, "--source-dir")?;
                if !source.is_dir() {
                    return Err(Error::config(format!(
                        "source directory {} does not exist",
                        source.display()
                    )));
                }
                require(&self.path_mapping, "--path-mapping")?;
            }
            Mode::Convert => {
                require(&self.output_dir, "--output-dir")?;
            }
        }
        Ok(())
    }
}

fn require<'a>(value: &'a Option<PathBuf>, flag: &str) -> Result<&'a Path, Error> {
    match value {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.as_path()),
        _ => Err(Error::config(format!("missing required argument {flag}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("default").unwrap(), Mode::Merge);
        assert_eq!(Mode::from_str("MERGE").unwrap(), Mode::Merge);
        assert_eq!(Mode::from_str("pathmap").unwrap(), Mode::PathMap);
        assert_eq!(Mode::from_str("path-map").unwrap(), Mode::PathMap);
        assert_eq!(Mode::from_str("Convert").unwrap(), Mode::Convert);
        assert!(matches!(
            Mode::from_str("translate"),
            Err(Error::UnknownMode(m)) if m == "translate"
        ));
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [Mode::Merge, Mode::PathMap, Mode::Convert] {
            assert_eq!(Mode::from_str(&mode.to_string()).unwrap(), mode);
        }
    }

    #[test]
    fn test_convert_mode_walks_xliff() {
        let config = Config::new(Mode::Convert);
        assert_eq!(config.walk.extension, ".xlf");
        assert_eq!(Config::default().walk.extension, ".i18n.json");
    }

    #[test]
    fn test_catalog_path_prefers_explicit_catalog() {
        let config = Config::new(Mode::Merge).with_langpack_dir("/pack");
        assert_eq!(
            config.catalog_path(),
            Some(PathBuf::from("/pack/translations/main.i18n.json"))
        );
        let config = config.with_catalog("/elsewhere/main.json");
        assert_eq!(
            config.catalog_path(),
            Some(PathBuf::from("/elsewhere/main.json"))
        );
    }

    #[test]
    fn test_validate_reports_missing_inputs() {
        let dir = TempDir::new().unwrap();

        let err = Config::new(Mode::Merge).validate().unwrap_err();
        assert!(err.to_string().contains("--resource-dir"));

        let err = Config::new(Mode::Merge)
            .with_resource_dir(dir.path())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("--langpack-dir"));

        let err = Config::new(Mode::PathMap)
            .with_resource_dir(dir.path())
            .with_source_dir(dir.path())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("--path-mapping"));

        let err = Config::new(Mode::Convert)
            .with_resource_dir(dir.path())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("--output-dir"));
    }

    #[test]
    fn test_validate_rejects_missing_directories() {
        let dir = TempDir::new().unwrap();
        let err = Config::new(Mode::Merge)
            .with_resource_dir(dir.path().join("missing"))
            .with_langpack_dir(dir.path())
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("does not exist")));
    }

    #[test]
    fn test_validate_accepts_complete_configs() {
        let dir = TempDir::new().unwrap();
        Config::new(Mode::Merge)
            .with_resource_dir(dir.path())
            .with_langpack_dir(dir.path())
            .validate()
            .unwrap();
        Config::new(Mode::PathMap)
            .with_resource_dir(dir.path())
            .with_source_dir(dir.path())
            .with_path_mapping(dir.path().join("map.json"))
            .validate()
            .unwrap();
        Config::new(Mode::Convert)
            .with_resource_dir(dir.path())
            .with_output_dir(dir.path().join("out"))
            .validate()
            .unwrap();
    }
}
