//! Supported resource file formats.
//!
//! This module re-exports the main type of each format and provides
//! [`ResourceFormat`], the tag the walker uses to pick a parser, and
//! [`ParsedResource`], the tagged result every parser produces.

pub mod catalog;
pub mod json;
pub mod xliff;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub use catalog::MasterCatalog;
pub use json::JsonResource;
pub use xliff::{FileGroup, TransUnit, XliffDocument};

use crate::{error::Error, traits::Parser, types::ResourceEntry};

/// The resource formats a tree walk can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    /// Flat `{ "key": "value" }` JSON files (`.i18n.json`).
    Json,
    /// XLIFF 1.2 documents (`.xlf`).
    Xliff,
}

impl Display for ResourceFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceFormat::Json => write!(f, "json"),
            ResourceFormat::Xliff => write!(f, "xliff"),
        }
    }
}

/// Accepts `json` and `xliff`/`xlf`, ignoring case.
impl FromStr for ResourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResourceFormat::Json),
            "xliff" | "xlf" => Ok(ResourceFormat::Xliff),
            other => Err(Error::config(format!("unknown resource format `{other}`"))),
        }
    }
}

impl ResourceFormat {
    /// The file-name suffix resources of this format conventionally use.
    pub fn default_extension(&self) -> &'static str {
        match self {
            ResourceFormat::Json => ".i18n.json",
            ResourceFormat::Xliff => ".xlf",
        }
    }
}

/// One parsed resource file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResource {
    Json(ResourceEntry),
    Xliff(XliffDocument),
}

/// Turns the text of one resource file into a [`ParsedResource`].
///
/// An [`Error::InvalidXliff`] means the file is well-formed but not the
/// document shape the parser expects; the walker skips such files. Any other
/// error is treated as a failure of the directory being walked.
pub trait ResourceParser {
    fn parse(&self, text: &str) -> Result<ParsedResource, Error>;
}

impl ResourceParser for ResourceFormat {
    fn parse(&self, text: &str) -> Result<ParsedResource, Error> {
        match self {
            ResourceFormat::Json => Ok(ParsedResource::Json(JsonResource::from_str(text)?.entry)),
            ResourceFormat::Xliff => Ok(ParsedResource::Xliff(XliffDocument::from_str(text)?)),
        }
    }
}
