//! Dependency reference types
//!
//! A `DependencyReference` records one container image reference found in a
//! scanned value file: the image name, the currently recorded tag, and where
//! in the tree it was found.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Location of an extracted reference within the scanned tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path of the file, relative to the scan root
    pub path: PathBuf,
    /// 1-based line number of the start of the match
    pub line: usize,
}

impl SourceLocation {
    /// Creates a new SourceLocation
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Returns the directory containing the file, relative to the scan root
    ///
    /// This is the `packageFileDir` template variable for post-upgrade tasks.
    pub fn package_file_dir(&self) -> String {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.to_string_lossy().replace('\\', "/")
            }
            _ => ".".to_string(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// A single dependency reference extracted from a value file
///
/// Immutable once created; consumed exactly once by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReference {
    /// Image name (the `depName` capture)
    pub name: String,
    /// Currently recorded tag (the `currentValue` capture, quotes stripped)
    pub current_value: String,
    /// Where the reference was found
    pub location: SourceLocation,
}

impl DependencyReference {
    /// Creates a new DependencyReference
    pub fn new(
        name: impl Into<String>,
        current_value: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            current_value: current_value.into(),
            location,
        }
    }
}

impl fmt::Display for DependencyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} ({})",
            self.name, self.current_value, self.location
        )
    }
}
