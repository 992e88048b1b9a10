//! Options controlling how a resource tree is walked.

use crate::{formats::ResourceFormat, key::KeyCase};

/// Conventional subfolder between a repository root and its resource tree.
pub const DEFAULT_PREFIX: &str = "/src/";

/// Walk behavior for [`crate::ResourceReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// File-name suffix a resource must end with (compared ignoring case).
    pub extension: String,
    /// Folder between the root and the keyed tree; only its length is used.
    pub prefix: String,
    /// Case mode for derived keys.
    pub key_case: KeyCase,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::for_format(ResourceFormat::Json)
    }
}

impl WalkOptions {
    /// Creates default options (`.i18n.json` files under `/src/`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options for the given format.
    pub fn for_format(format: ResourceFormat) -> Self {
        Self {
            extension: format.default_extension().to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            key_case: KeyCase::default(),
        }
    }

    /// Sets the resource extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the prefix folder.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the key case mode.
    pub fn with_key_case(mut self, key_case: KeyCase) -> Self {
        self.key_case = key_case;
        self
    }
}
