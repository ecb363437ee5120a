//! Reference extraction from value files
//!
//! For each match rule whose path pattern matches the file, the extraction
//! regex is applied over the whole contents with multi-line semantics; every
//! non-overlapping match yields one `DependencyReference`. A matching file
//! with no content matches is an extraction miss, not an error.

use crate::config::MatchRule;
use crate::domain::{DependencyReference, SourceLocation};
use std::path::Path;

/// An extracted reference together with the rule that produced it
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The extracted reference
    pub reference: DependencyReference,
    /// Datasource from the producing rule
    pub datasource: String,
    /// Manager from the producing rule
    pub manager: crate::domain::Manager,
}

/// Normalizes a relative path to forward slashes for pattern matching
///
/// Path patterns are written with `/` separators; matching must behave the
/// same on every platform.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Extracts dependency references from one file
///
/// `relative_path` is the file's path relative to the scan root. Rules are
/// tried in declared order; within a rule, matches are ordered by offset, so
/// the output sequence is deterministic and extraction is idempotent.
pub fn extract(
    relative_path: &Path,
    contents: &str,
    rules: &[MatchRule],
) -> Vec<Extraction> {
    let normalized = normalize_path(relative_path);
    let mut extractions = Vec::new();

    for rule in rules {
        if !rule.matches_path(&normalized) {
            continue;
        }

        for captures in rule.extraction().captures_iter(contents) {
            let (Some(name), Some(value)) =
                (captures.name("depName"), captures.name("currentValue"))
            else {
                // Both groups are validated to exist at load time; a match
                // where an optional group did not participate carries no
                // usable reference
                continue;
            };

            let whole = captures.get(0).map(|m| m.start()).unwrap_or(0);
            let line = contents[..whole].matches('\n').count() + 1;

            extractions.push(Extraction {
                reference: DependencyReference::new(
                    name.as_str(),
                    strip_quotes(value.as_str()),
                    SourceLocation::new(relative_path, line),
                ),
                datasource: rule.datasource.clone(),
                manager: rule.manager,
            });
        }
    }

    extractions
}

/// Strips one pair of surrounding double quotes, if present
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
