//! Template variable substitution for pipeline commands
//!
//! Commands may reference `{{packageFileDir}}`, `{{currentValue}}`,
//! `{{newValue}}` and `{{depName}}` (triple braces are also accepted).
//! Referencing any other variable is a ConfigError; rule files are checked
//! at load time so substitution never fails mid-batch.

use crate::domain::UpdateCandidate;
use crate::error::ConfigError;
use regex::Regex;

/// Variables available to every pipeline command
pub const TEMPLATE_VARIABLES: [&str; 4] =
    ["packageFileDir", "currentValue", "newValue", "depName"];

/// Variable values for one update candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    /// Directory of the value file, relative to the scan root
    pub package_file_dir: String,
    /// Currently recorded tag
    pub current_value: String,
    /// Planned new tag
    pub new_value: String,
    /// Image name
    pub dep_name: String,
}

impl TemplateVars {
    /// Builds the variable set for a candidate
    pub fn from_candidate(candidate: &UpdateCandidate) -> Self {
        Self {
            package_file_dir: candidate.reference.location.package_file_dir(),
            current_value: candidate.reference.current_value.clone(),
            new_value: candidate.new_value.clone(),
            dep_name: candidate.reference.name.clone(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "packageFileDir" => Some(&self.package_file_dir),
            "currentValue" => Some(&self.current_value),
            "newValue" => Some(&self.new_value),
            "depName" => Some(&self.dep_name),
            _ => None,
        }
    }
}

fn variable_pattern() -> Regex {
    // Triple braces first so they are not consumed as double braces
    Regex::new(r"\{\{\{([A-Za-z][A-Za-z0-9]*)\}\}\}|\{\{([A-Za-z][A-Za-z0-9]*)\}\}")
        .expect("variable pattern must compile")
}

/// Substitutes template variables into a command string
///
/// Fails fast with ConfigError if the command references a variable that is
/// not defined for the candidate.
pub fn render(template: &str, vars: &TemplateVars) -> Result<String, ConfigError> {
    let pattern = variable_pattern();
    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;

    for captures in pattern.captures_iter(template) {
        let whole = captures.get(0).expect("capture 0 always participates");
        let name = captures
            .get(1)
            .or_else(|| captures.get(2))
            .expect("one alternative always captures")
            .as_str();

        let value = vars
            .get(name)
            .ok_or_else(|| ConfigError::undefined_variable(name, template))?;

        output.push_str(&template[cursor..whole.start()]);
        output.push_str(value);
        cursor = whole.end();
    }

    output.push_str(&template[cursor..]);
    Ok(output)
}

/// Checks that a command only references known template variables
///
/// Used by the rule loader so a bad rule set fails at startup, not per-file.
pub fn validate_command(command: &str) -> Result<(), ConfigError> {
    let pattern = variable_pattern();
    for captures in pattern.captures_iter(command) {
        let name = captures
            .get(1)
            .or_else(|| captures.get(2))
            .expect("one alternative always captures")
            .as_str();
        if !TEMPLATE_VARIABLES.contains(&name) {
            return Err(ConfigError::undefined_variable(name, command));
        }
    }
    Ok(())
}
