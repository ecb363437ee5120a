//! Rule file loading with load-time validation
//!
//! Rule files are JSON or TOML, selected by extension. Everything that can
//! go wrong with a rule set (bad regex, missing capture group, unknown
//! template variable) is surfaced here as ConfigError, before any file is
//! scanned.

use crate::config::rules::{PackageRule, RawMatchRule, RuleSet};
use crate::error::ConfigError;
use crate::task::validate_command;
use serde::Deserialize;
use std::path::Path;

/// Raw rule file as deserialized, before pattern compilation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRuleSet {
    #[serde(default)]
    match_rules: Vec<RawMatchRule>,
    #[serde(default)]
    package_rules: Vec<PackageRule>,
}

/// Loads and compiles a rule set from a JSON or TOML file
///
/// Fails with ConfigError on unreadable files, parse errors, malformed
/// patterns and commands referencing unknown template variables.
pub fn load_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::not_found(path));
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

    let raw: RawRuleSet = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
        Some("toml") => {
            toml::from_str(&content).map_err(|e| ConfigError::parse_error(path, e.to_string()))?
        }
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    compile_rule_set(raw)
}

fn compile_rule_set(raw: RawRuleSet) -> Result<RuleSet, ConfigError> {
    let mut match_rules = Vec::with_capacity(raw.match_rules.len());
    for raw_rule in &raw.match_rules {
        match_rules.push(crate::config::MatchRule::compile(raw_rule)?);
    }

    // Validate task command templates and file filter globs up front so
    // neither can fail mid-batch during a scan
    for rule in &raw.package_rules {
        if let Some(spec) = &rule.post_upgrade_tasks {
            for command in &spec.commands {
                validate_command(&command.run)?;
            }
            for filter in &spec.file_filters {
                wax::Glob::new(filter)
                    .map_err(|e| ConfigError::invalid_pattern(filter, e.to_string()))?;
            }
        }
    }

    Ok(RuleSet {
        match_rules,
        package_rules: raw.package_rules,
    })
}
