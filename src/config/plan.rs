//! Bump plan supplied by the host tool
//!
//! The host automation tool queries version sources and decides the planned
//! new value per dependency; this component receives that decision as data,
//! either as `--bump name=value` pairs or as a JSON object file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from dependency name to planned new value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpPlan {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

impl BumpPlan {
    /// Creates an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plan from `name=value` CLI specs
    pub fn from_specs(specs: &[String]) -> Result<Self, ConfigError> {
        let mut plan = Self::new();
        for spec in specs {
            let (name, value) = spec.split_once('=').ok_or(ConfigError::InvalidBumpSpec {
                value: spec.clone(),
            })?;
            if name.is_empty() || value.is_empty() {
                return Err(ConfigError::InvalidBumpSpec {
                    value: spec.clone(),
                });
            }
            plan.insert(name, value);
        }
        Ok(plan)
    }

    /// Loads a plan from a JSON object file (`{"name": "newValue", ...}`)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidPlan {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidPlan {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Adds or replaces an entry
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Returns the planned new value for a dependency, if any
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Merges another plan into this one; the other plan's entries win
    pub fn merge(&mut self, other: BumpPlan) {
        self.entries.extend(other.entries);
    }

    /// Returns true if no bumps are planned
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of planned bumps
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
