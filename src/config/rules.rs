//! Match rules, package rules and task specifications
//!
//! Rules are static: they are parsed and compiled once at startup and stay
//! immutable for the process lifetime. A `MatchRule` finds references in
//! files; a `PackageRule` attaches effects (labels, group, post-upgrade
//! tasks) to classified update candidates.

use crate::domain::{Manager, UpdateCandidate, UpdateType};
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Default bump log file, appended to by the default post-upgrade task
pub const DEFAULT_LOG_FILE: &str = "renovate.log";

/// Default path pattern for chart value files
pub const DEFAULT_FILE_PATTERN: &str = r"^ix-dev/.*/ix_values\.yaml$";

/// Default extraction pattern: a four-space-indented `repository:` line
/// immediately followed by a four-space-indented `tag:` line (quotes optional)
pub const DEFAULT_EXTRACTION_PATTERN: &str =
    "^    repository: (?P<depName>\\S+)\\n    tag: \"?(?P<currentValue>[^\"\\n]+)\"?$";

/// Capture group names every extraction pattern must declare
pub const REQUIRED_CAPTURE_GROUPS: [&str; 2] = ["depName", "currentValue"];

/// When a candidate's post-upgrade pipeline runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Once per detected update
    #[default]
    Update,
    /// Once per batch, regardless of candidate count
    Once,
}

/// A single templated pipeline command
///
/// Deserializes from either a plain string (a regular command) or a
/// `{ run, guard }` object. A guard command's non-zero exit means "skip the
/// rest of this candidate's pipeline" rather than failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCommand")]
pub struct CommandSpec {
    /// Templated shell command line
    pub run: String,
    /// Whether a non-zero exit is the skip signal instead of a failure
    pub guard: bool,
}

impl CommandSpec {
    /// Creates a regular command
    pub fn plain(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            guard: false,
        }
    }

    /// Creates a guard command
    pub fn guard(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            guard: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommand {
    Plain(String),
    Tagged {
        run: String,
        #[serde(default)]
        guard: bool,
    },
}

impl From<RawCommand> for CommandSpec {
    fn from(raw: RawCommand) -> Self {
        match raw {
            RawCommand::Plain(run) => CommandSpec::plain(run),
            RawCommand::Tagged { run, guard } => CommandSpec { run, guard },
        }
    }
}

/// Post-upgrade task pipeline specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    /// Glob patterns evaluated against the working tree after the pipeline
    /// runs, to report which files the caller should stage
    #[serde(default)]
    pub file_filters: Vec<String>,
    /// Once per update or once per batch
    #[serde(default)]
    pub execution_mode: ExecutionMode,
    /// Commands, executed strictly in declared order
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

/// Raw, uncompiled match rule as it appears in the rule file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchRule {
    /// Anchored regex matched against the full relative file path
    pub file_pattern: String,
    /// Regex with `depName` and `currentValue` named capture groups,
    /// compiled with multi-line semantics
    pub extraction_pattern: String,
    /// Datasource assigned to extracted references
    #[serde(default = "default_datasource")]
    pub datasource: String,
    /// Manager assigned to extracted references
    #[serde(default = "default_manager")]
    pub manager: Manager,
}

fn default_datasource() -> String {
    "docker".to_string()
}

fn default_manager() -> Manager {
    Manager::CustomRegex
}

/// A compiled match rule
#[derive(Debug, Clone)]
pub struct MatchRule {
    /// Anchored path regex (full match against the relative path)
    file_pattern: Regex,
    /// Extraction regex with multi-line semantics
    extraction: Regex,
    /// Datasource assigned to extracted references
    pub datasource: String,
    /// Manager assigned to extracted references
    pub manager: Manager,
}

impl MatchRule {
    /// Compiles a raw rule, failing with ConfigError on any malformed pattern
    ///
    /// Compilation happens at load time; a bad pattern is never discovered
    /// per-file during a scan.
    pub fn compile(raw: &RawMatchRule) -> Result<Self, ConfigError> {
        // Wrap in ^(?:..)$ so path matching is always full-path
        let anchored = format!("^(?:{})$", raw.file_pattern);
        let file_pattern = Regex::new(&anchored)
            .map_err(|e| ConfigError::invalid_pattern(&raw.file_pattern, e.to_string()))?;

        let extraction = RegexBuilder::new(&raw.extraction_pattern)
            .multi_line(true)
            .build()
            .map_err(|e| ConfigError::invalid_pattern(&raw.extraction_pattern, e.to_string()))?;

        for group in REQUIRED_CAPTURE_GROUPS {
            if !extraction.capture_names().flatten().any(|n| n == group) {
                return Err(ConfigError::missing_capture_group(
                    &raw.extraction_pattern,
                    group,
                ));
            }
        }

        Ok(Self {
            file_pattern,
            extraction,
            datasource: raw.datasource.clone(),
            manager: raw.manager,
        })
    }

    /// Returns true if the relative path matches this rule (case-sensitive,
    /// anchored full-path match)
    pub fn matches_path(&self, relative_path: &str) -> bool {
        self.file_pattern.is_match(relative_path)
    }

    /// Returns the compiled extraction regex
    pub fn extraction(&self) -> &Regex {
        &self.extraction
    }
}

/// A package rule: match predicates plus effects
///
/// Empty predicate lists are wildcards for their dimension. Effects are
/// merged across all matching rules by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRule {
    /// Update types this rule applies to (empty = any)
    #[serde(default)]
    pub match_update_types: Vec<UpdateType>,
    /// Datasources this rule applies to (empty = any)
    #[serde(default)]
    pub match_datasources: Vec<String>,
    /// Managers this rule applies to (empty = any)
    #[serde(default)]
    pub match_managers: Vec<Manager>,
    /// Labels to attach to matching candidates
    #[serde(default)]
    pub labels: Vec<String>,
    /// Branch group for matching candidates
    #[serde(default)]
    pub group_name: Option<String>,
    /// Post-upgrade task pipeline for matching candidates
    #[serde(default)]
    pub post_upgrade_tasks: Option<TaskSpec>,
}

impl PackageRule {
    /// Returns true if every declared predicate matches the candidate
    pub fn matches(&self, candidate: &UpdateCandidate) -> bool {
        if !self.match_update_types.is_empty()
            && !self.match_update_types.contains(&candidate.update_type)
        {
            return false;
        }
        if !self.match_datasources.is_empty()
            && !self.match_datasources.contains(&candidate.datasource)
        {
            return false;
        }
        if !self.match_managers.is_empty() && !self.match_managers.contains(&candidate.manager) {
            return false;
        }
        true
    }
}

/// The full, compiled rule configuration
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Reference extraction rules, in declared order
    pub match_rules: Vec<MatchRule>,
    /// Package rules, evaluated in declared order
    pub package_rules: Vec<PackageRule>,
}

impl RuleSet {
    /// The built-in rule set, reproducing the source configuration:
    /// chart value files under `ix-dev/`, per-type labels, minor and patch
    /// sharing one branch group (major updates are never grouped), and a
    /// docker-scoped post-upgrade task appending bump events to the log.
    pub fn default_rules() -> Self {
        let raw = RawMatchRule {
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            extraction_pattern: DEFAULT_EXTRACTION_PATTERN.to_string(),
            datasource: default_datasource(),
            manager: default_manager(),
        };
        let match_rule = MatchRule::compile(&raw).expect("built-in match rule must compile");

        let log_task = TaskSpec {
            file_filters: vec![
                "**/ix_values.yaml".to_string(),
                format!("**/{}", DEFAULT_LOG_FILE),
            ],
            execution_mode: ExecutionMode::Update,
            commands: vec![CommandSpec::plain(format!(
                "echo \"bumping {{{{packageFileDir}}}} from {{{{currentValue}}}} to {{{{newValue}}}} ({{{{depName}}}})\" >> {}",
                DEFAULT_LOG_FILE
            ))],
        };

        let package_rules = vec![
            PackageRule {
                match_update_types: vec![UpdateType::Major],
                match_datasources: vec!["docker".to_string()],
                labels: vec!["major".to_string()],
                ..Default::default()
            },
            PackageRule {
                match_update_types: vec![UpdateType::Minor],
                match_datasources: vec!["docker".to_string()],
                labels: vec!["minor".to_string()],
                group_name: Some("updates-patch-minor".to_string()),
                ..Default::default()
            },
            PackageRule {
                match_update_types: vec![UpdateType::Patch],
                match_datasources: vec!["docker".to_string()],
                labels: vec!["patch".to_string()],
                group_name: Some("updates-patch-minor".to_string()),
                ..Default::default()
            },
            PackageRule {
                match_datasources: vec!["docker".to_string()],
                post_upgrade_tasks: Some(log_task),
                ..Default::default()
            },
        ];

        Self {
            match_rules: vec![match_rule],
            package_rules,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}
