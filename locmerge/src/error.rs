//! All error types for the locmerge crate.
//!
//! These are returned from every fallible operation (walking, parsing, merging,
//! conversion and configuration checks).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown mode `{0}`")]
    UnknownMode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid XLIFF document: {0}")]
    InvalidXliff(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("could not find master catalog {}", .0.display())]
    MissingCatalog(PathBuf),

    #[error("resource `{0}` was discovered more than once")]
    DuplicateResource(String),

    #[error("duplicate key `{key}` in file group `{group}`")]
    DuplicateKey { group: String, key: String },

    #[error("{} was already written for file group `{first}`", .path.display())]
    OutputCollision { path: PathBuf, first: String },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a new XLIFF shape error.
    pub fn invalid_xliff(message: impl Into<String>) -> Self {
        Error::InvalidXliff(message.into())
    }
}

impl From<quick_xml::encoding::EncodingError> for Error {
    fn from(value: quick_xml::encoding::EncodingError) -> Self {
        Error::Xml(quick_xml::Error::Encoding(value))
    }
}
