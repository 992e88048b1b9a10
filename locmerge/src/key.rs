//! Canonical key derivation.
//!
//! A canonical key is the root-relative, extension-less, forward-slash path of a
//! resource file. Keys are derived by character offsets, not by path
//! components: the root plus its conventional prefix folder are cut from the
//! front and the extension from the back. All files of one walk therefore have
//! to live at the same root/prefix depth.

use std::{fmt, path::Path, str::FromStr};

use crate::error::Error;

/// How canonical keys treat letter case within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCase {
    /// Keys keep the case found on disk.
    #[default]
    Preserve,
    /// Keys are lowercased.
    Lower,
}

impl fmt::Display for KeyCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCase::Preserve => write!(f, "preserve"),
            KeyCase::Lower => write!(f, "lower"),
        }
    }
}

impl FromStr for KeyCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" | "sensitive" => Ok(KeyCase::Preserve),
            "lower" | "insensitive" => Ok(KeyCase::Lower),
            other => Err(Error::config(format!("unknown key case `{other}`"))),
        }
    }
}

/// Derives canonical keys from absolute file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDeriver {
    start_index: usize,
    case: KeyCase,
}

impl KeyDeriver {
    /// Keys start right after `root` followed by `prefix`.
    ///
    /// Only the lengths matter; the offset is computed once here and applied to
    /// every file.
    pub fn new(root: &Path, prefix: &str, case: KeyCase) -> Self {
        Self {
            start_index: trimmed_len(root) + prefix.len(),
            case,
        }
    }

    /// Keys keep the final directory name of `root` as their first segment.
    ///
    /// Used for source trees, where `<parent>/sql/a/b.ts` becomes `sql/a/b`.
    pub fn retaining_root_name(root: &Path, case: KeyCase) -> Self {
        let root_len = trimmed_len(root);
        let name_len = root
            .file_name()
            .map(|name| name.to_string_lossy().len())
            .unwrap_or(0);
        Self {
            start_index: root_len.saturating_sub(name_len),
            case,
        }
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn case(&self) -> KeyCase {
        self.case
    }

    /// Cuts the root prefix and `extension` from `path` and normalizes separators.
    ///
    /// `extension` is stripped by length, so callers pass the suffix they
    /// matched on (case may differ from the file name).
    pub fn derive(&self, path: &Path, extension: &str) -> Result<String, Error> {
        let full = path.to_string_lossy();
        let end = full.len().checked_sub(extension.len());
        let key = end
            .filter(|&end| end >= self.start_index)
            .and_then(|end| full.get(self.start_index..end))
            .ok_or_else(|| {
                Error::InvalidPath(format!(
                    "`{}` is too short to strip {} prefix characters and `{}`",
                    full, self.start_index, extension
                ))
            })?;

        let key = key.replace('\\', "/");
        Ok(match self.case {
            KeyCase::Preserve => key,
            KeyCase::Lower => key.to_lowercase(),
        })
    }
}

/// Length of `root` without trailing separators.
fn trimmed_len(root: &Path) -> usize {
    root.to_string_lossy()
        .trim_end_matches(['/', '\\'])
        .len()
}

/// Case-insensitive comparison used for keys, base names and extensions.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive `ends_with`.
pub fn ends_with_ignore_case(haystack: &str, suffix: &str) -> bool {
    haystack.len() >= suffix.len()
        && haystack
            .get(haystack.len() - suffix.len()..)
            .is_some_and(|tail| eq_ignore_case(tail, suffix))
}
