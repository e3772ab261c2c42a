//! Classification of source tree entries.
//! Decides from the entry's name alone whether it is mirrored, evaluated,
//! copied or left out of the output tree.

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::constants::EXCLUDE_MARKER;
use crate::error::{Error, Result};

/// What the tree walker does with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Mirrored and recursed into
    Directory,
    /// Skipped (files) or pruned (directories); still includable
    Excluded,
    /// Evaluated, then written
    Templated,
    /// Copied byte for byte
    Opaque,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntryKind::Directory => "directory",
            EntryKind::Excluded => "excluded",
            EntryKind::Templated => "templated",
            EntryKind::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// Pure name-based classifier for source entries.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    exclude: Regex,
    templated: GlobSet,
}

impl PathClassifier {
    /// Builds a classifier treating files matching any of `patterns` as templates.
    ///
    /// # Arguments
    /// * `patterns` - Glob patterns matched against the file name, e.g. `*.html`
    ///
    /// # Errors
    /// * `Error::GlobSetParseError` if a pattern is not a valid glob
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }
        let exclude = Regex::new(EXCLUDE_MARKER)
            .map_err(|e| Error::ConfigError(format!("invalid exclude marker: {e}")))?;

        Ok(Self { exclude, templated: builder.build()? })
    }

    /// Returns true if the name carries the `.dev` marker segment.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.is_match(name)
    }

    pub fn is_templated(&self, name: &str) -> bool {
        self.templated.is_match(name)
    }

    /// Classifies an entry by its file name.
    ///
    /// # Arguments
    /// * `name` - The entry's file name (not its full path)
    /// * `is_dir` - Whether the entry is a directory
    pub fn classify(&self, name: &str, is_dir: bool) -> EntryKind {
        if self.is_excluded(name) {
            EntryKind::Excluded
        } else if is_dir {
            EntryKind::Directory
        } else if self.is_templated(name) {
            EntryKind::Templated
        } else {
            EntryKind::Opaque
        }
    }
}
