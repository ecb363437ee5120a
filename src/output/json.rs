//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of scan results
//! - Structured file-by-file bump/skip information
//! - Task pipeline detail in verbose mode

use crate::domain::{BumpResult, ScanSummary, SkipReason};
use crate::orchestrator::ScanResult;
use crate::output::{OutputFormatter, Verbosity};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// Scan timestamp (RFC 3339)
    scanned_at: String,
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-file results
    files: Vec<JsonFile>,
    /// Group name → member image names
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    groups: BTreeMap<String, Vec<String>>,
    /// Task pipeline detail (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tasks: Vec<JsonTask>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Total number of bumps
    bumps: usize,
    /// Total number of skips
    skips: usize,
    /// Number of value files that produced references
    files: usize,
}

/// JSON representation of one value file's results
#[derive(Serialize)]
struct JsonFile {
    /// Path of the value file, relative to the scan root
    path: String,
    /// List of bumps
    bumps: Vec<JsonBump>,
    /// List of skips (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skips: Vec<JsonSkip>,
}

/// JSON representation of a bump
#[derive(Serialize)]
struct JsonBump {
    /// Image name
    name: String,
    /// Old tag
    from: String,
    /// New tag
    to: String,
    /// Classification of the change
    update_type: String,
    /// Labels assigned by package rules
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    /// Group assigned by package rules
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
}

/// JSON representation of a skip
#[derive(Serialize)]
struct JsonSkip {
    /// Image name
    name: String,
    /// Currently recorded tag
    current: String,
    /// Skip reason
    reason: String,
}

/// JSON representation of one task pipeline
#[derive(Serialize)]
struct JsonTask {
    /// Image name the pipeline ran for
    name: String,
    /// Rendered commands, in execution order
    commands: Vec<String>,
    /// Whether a guard halted the pipeline
    skipped: bool,
    /// Files matched by the pipeline's filters
    files_changed: Vec<String>,
}

impl JsonFormatter {
    /// Convert skip reason to string
    fn skip_reason_to_string(reason: &SkipReason) -> String {
        match reason {
            SkipReason::NoPlannedUpdate => "no_planned_update".to_string(),
            SkipReason::AlreadyCurrent => "already_current".to_string(),
            SkipReason::TaskFailed(msg) => format!("task_failed: {}", msg),
        }
    }

    /// Convert file result to JSON representation
    fn file_to_json(&self, file: &crate::domain::FileScanResult) -> JsonFile {
        let bumps: Vec<JsonBump> = file
            .results
            .iter()
            .filter_map(|result| {
                if let BumpResult::Bump { candidate, effects } = result {
                    Some(JsonBump {
                        name: candidate.dep_name().to_string(),
                        from: candidate.current_value().to_string(),
                        to: candidate.new_value.clone(),
                        update_type: candidate.update_type.as_str().to_string(),
                        labels: effects.labels.iter().cloned().collect(),
                        group: effects.group_name.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();

        let skips: Vec<JsonSkip> = if self.verbosity == Verbosity::Verbose {
            file.results
                .iter()
                .filter_map(|result| {
                    if let BumpResult::Skip { reference, reason } = result {
                        Some(JsonSkip {
                            name: reference.name.clone(),
                            current: reference.current_value.clone(),
                            reason: Self::skip_reason_to_string(reason),
                        })
                    } else {
                        None
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonFile {
            path: file.path.display().to_string(),
            bumps,
            skips,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &ScanResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let tasks: Vec<JsonTask> = if self.verbosity == Verbosity::Verbose {
            result
                .task_results
                .iter()
                .map(|t| JsonTask {
                    name: t.dep_name.clone(),
                    commands: t.run.commands.iter().map(|c| c.command.clone()).collect(),
                    skipped: t.run.skipped,
                    files_changed: t
                        .run
                        .files_changed
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let output = JsonOutput {
            scanned_at: Utc::now().to_rfc3339(),
            dry_run: result.summary.dry_run,
            summary: JsonSummary {
                bumps: result.summary.total_bumps(),
                skips: result.summary.total_skips(),
                files: result.summary.files_scanned(),
            },
            files: result
                .summary
                .files
                .iter()
                .map(|f| self.file_to_json(f))
                .collect(),
            groups: result.summary.groups.clone(),
            tasks,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &ScanSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonSummary {
            bumps: summary.total_bumps(),
            skips: summary.total_skips(),
            files: summary.files_scanned(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DependencyReference, EffectSet, FileScanResult, Manager, SourceLocation, UpdateCandidate,
        UpdateType,
    };

    fn create_test_result() -> ScanResult {
        let mut summary = ScanSummary::new(false);
        let mut file = FileScanResult::new("ix-dev/stable/nginx/ix_values.yaml");

        let reference = DependencyReference::new(
            "nginx",
            "1.25.3",
            SourceLocation::new("ix-dev/stable/nginx/ix_values.yaml", 3),
        );
        let mut effects = EffectSet::new();
        effects.labels.insert("minor".to_string());
        effects.group_name = Some("updates-patch-minor".to_string());
        file.add_result(BumpResult::bump(
            UpdateCandidate::new(
                reference,
                "1.26.0",
                UpdateType::Minor,
                "docker",
                Manager::CustomRegex,
            ),
            effects,
        ));

        file.add_result(BumpResult::skip_already_current(DependencyReference::new(
            "redis",
            "7.2.4",
            SourceLocation::new("ix-dev/stable/nginx/ix_values.yaml", 7),
        )));

        summary.add_file(file);
        summary.add_group_member("updates-patch-minor", "nginx");

        ScanResult {
            summary,
            task_results: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_json_formatter_new() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        assert_eq!(formatter.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_skip_reason_to_string() {
        assert_eq!(
            JsonFormatter::skip_reason_to_string(&SkipReason::NoPlannedUpdate),
            "no_planned_update"
        );
        assert_eq!(
            JsonFormatter::skip_reason_to_string(&SkipReason::AlreadyCurrent),
            "already_current"
        );
        assert!(
            JsonFormatter::skip_reason_to_string(&SkipReason::TaskFailed("exit 2".to_string()))
                .starts_with("task_failed")
        );
    }

    #[test]
    fn test_format_json() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let result = create_test_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        // Verify it's valid JSON
        let parsed: serde_json::Value = serde_json::from_str(&output_str).unwrap();

        assert_eq!(parsed["dry_run"], false);
        assert_eq!(parsed["summary"]["bumps"], 1);
        assert_eq!(parsed["summary"]["skips"], 1);
        assert_eq!(parsed["summary"]["files"], 1);
        assert_eq!(parsed["files"][0]["path"], "ix-dev/stable/nginx/ix_values.yaml");
        assert_eq!(parsed["files"][0]["bumps"][0]["name"], "nginx");
        assert_eq!(parsed["files"][0]["bumps"][0]["from"], "1.25.3");
        assert_eq!(parsed["files"][0]["bumps"][0]["to"], "1.26.0");
        assert_eq!(parsed["files"][0]["bumps"][0]["update_type"], "minor");
        assert_eq!(
            parsed["files"][0]["bumps"][0]["group"],
            "updates-patch-minor"
        );
        assert_eq!(parsed["groups"]["updates-patch-minor"][0], "nginx");
        assert!(parsed["scanned_at"].is_string());
    }

    #[test]
    fn test_format_json_verbose_includes_skips() {
        let formatter = JsonFormatter::new(Verbosity::Verbose);
        let result = create_test_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output_str).unwrap();
        assert_eq!(parsed["files"][0]["skips"][0]["name"], "redis");
        assert_eq!(
            parsed["files"][0]["skips"][0]["reason"],
            "already_current"
        );
    }

    #[test]
    fn test_format_json_normal_omits_skips() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let result = create_test_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output_str).unwrap();
        let skips = &parsed["files"][0]["skips"];
        assert!(skips.is_null() || skips.as_array().map(|a| a.is_empty()).unwrap_or(true));
    }

    #[test]
    fn test_format_summary() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let summary = ScanSummary::new(false);
        let mut output = Vec::new();

        formatter.format_summary(&summary, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output_str).unwrap();
        assert_eq!(parsed["bumps"], 0);
        assert_eq!(parsed["skips"], 0);
    }
}
