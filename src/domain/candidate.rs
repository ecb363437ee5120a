//! Update candidate types
//!
//! An `UpdateCandidate` pairs an extracted reference with the planned new
//! value and its semver classification. Candidates are only created for
//! references whose planned value actually differs from the recorded one;
//! the `None` classification exists so the classifier can report equality,
//! but call sites guard against building a candidate from it.

use super::DependencyReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a version change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// MAJOR segment differs, or the tags are not comparable as semver
    Major,
    /// MAJOR equal, MINOR differs
    Minor,
    /// MAJOR.MINOR equal, anything else differs (patch, prerelease, build)
    Patch,
    /// Values are equal; no candidate should be generated
    None,
}

impl UpdateType {
    /// Returns true if this classification represents an actual change
    pub fn is_update(&self) -> bool {
        !matches!(self, UpdateType::None)
    }

    /// Stable lowercase name, used for labels and output
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Major => "major",
            UpdateType::Minor => "minor",
            UpdateType::Patch => "patch",
            UpdateType::None => "none",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detection strategy that produced a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Manager {
    /// Generic regex-based extraction from value files
    CustomRegex,
    /// Platform-native workflow file detection
    #[serde(rename = "github-actions")]
    GithubActions,
}

impl Manager {
    /// Stable lowercase name, used in rule predicates and output
    pub fn as_str(&self) -> &'static str {
        match self {
            Manager::CustomRegex => "custom_regex",
            Manager::GithubActions => "github-actions",
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected update: reference, planned new value, and classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCandidate {
    /// The extracted reference being updated
    pub reference: DependencyReference,
    /// The planned new value
    pub new_value: String,
    /// Semver classification of the change
    pub update_type: UpdateType,
    /// Origin type of the versioned artifact (e.g. "docker")
    pub datasource: String,
    /// Detection strategy that produced the reference
    pub manager: Manager,
}

impl UpdateCandidate {
    /// Creates a new UpdateCandidate
    pub fn new(
        reference: DependencyReference,
        new_value: impl Into<String>,
        update_type: UpdateType,
        datasource: impl Into<String>,
        manager: Manager,
    ) -> Self {
        Self {
            reference,
            new_value: new_value.into(),
            update_type,
            datasource: datasource.into(),
            manager,
        }
    }

    /// Returns the image name
    pub fn dep_name(&self) -> &str {
        &self.reference.name
    }

    /// Returns the currently recorded value
    pub fn current_value(&self) -> &str {
        &self.reference.current_value
    }
}

impl fmt::Display for UpdateCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {} ({})",
            self.reference.name, self.reference.current_value, self.new_value, self.update_type
        )
    }
}
