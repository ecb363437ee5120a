//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-file bump display with colored update-type labels
//! - Skipped reference display with reasons (verbose mode)
//! - Group membership display
//! - Summary with a major/minor/patch breakdown

use crate::domain::{BumpResult, ScanSummary, SkipReason, UpdateType};
use crate::orchestrator::ScanResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    /// Get the colored update-type label
    fn colored_label(&self, update_type: UpdateType) -> String {
        if !self.color {
            return update_type.as_str().to_string();
        }
        match update_type {
            UpdateType::Major => "major".red().bold().to_string(),
            UpdateType::Minor => "minor".yellow().to_string(),
            UpdateType::Patch => "patch".green().to_string(),
            UpdateType::None => "none".dimmed().to_string(),
        }
    }

    /// Format a skip reason for display
    fn format_skip_reason(&self, reason: &SkipReason) -> String {
        match reason {
            SkipReason::NoPlannedUpdate => "no planned update".to_string(),
            SkipReason::AlreadyCurrent => "already current".to_string(),
            SkipReason::TaskFailed(msg) => format!("task failed: {}", msg),
        }
    }

    /// Calculate the maximum image name length for alignment
    fn max_name_length(&self, results: &[&BumpResult]) -> usize {
        results
            .iter()
            .map(|r| r.dep_name().len())
            .max()
            .unwrap_or(0)
    }

    /// Format all results for one value file
    fn format_file(
        &self,
        file: &crate::domain::FileScanResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let bumps: Vec<&BumpResult> = file.bumps().collect();
        let skips: Vec<&BumpResult> = file.results.iter().filter(|r| r.is_skip()).collect();

        if bumps.is_empty() && (self.verbosity != Verbosity::Verbose || skips.is_empty()) {
            return Ok(());
        }

        let prefix = self.dry_run_prefix();
        let path_display = file.path.display().to_string();
        if self.color {
            writeln!(
                writer,
                "{}{} — {} {}, {} {}",
                prefix,
                path_display.bold(),
                bumps.len().to_string().green(),
                if bumps.len() == 1 { "bump" } else { "bumps" },
                skips.len().to_string().dimmed(),
                if skips.len() == 1 { "skip" } else { "skips" }
            )?;
        } else {
            writeln!(
                writer,
                "{}{} — {} bumps, {} skips",
                prefix,
                path_display,
                bumps.len(),
                skips.len()
            )?;
        }

        let max_name_len = self.max_name_length(&bumps).max(20);
        for result in &bumps {
            if let BumpResult::Bump { candidate, effects } = result {
                let group_display = effects
                    .group_name
                    .as_deref()
                    .map(|g| format!(" ({})", g))
                    .unwrap_or_default();

                if self.color {
                    writeln!(
                        writer,
                        "  {:width$} {} {} {} [{}]{}",
                        candidate.dep_name(),
                        candidate.current_value().dimmed(),
                        "→".dimmed(),
                        candidate.new_value.bright_white().bold(),
                        self.colored_label(candidate.update_type),
                        group_display.dimmed(),
                        width = max_name_len
                    )?;
                } else {
                    writeln!(
                        writer,
                        "  {:width$} {} -> {} [{}]{}",
                        candidate.dep_name(),
                        candidate.current_value(),
                        candidate.new_value,
                        candidate.update_type,
                        group_display,
                        width = max_name_len
                    )?;
                }
            }
        }

        if self.verbosity == Verbosity::Verbose && !skips.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            let skip_max_len = self.max_name_length(&skips).max(20);
            for result in &skips {
                if let BumpResult::Skip { reference, reason } = result {
                    let reason_str = self.format_skip_reason(reason);
                    if self.color {
                        writeln!(
                            writer,
                            "  {} {}",
                            format!("{:width$}", reference.name, width = skip_max_len).dimmed(),
                            format!("({})", reason_str).dimmed()
                        )?;
                    } else {
                        writeln!(
                            writer,
                            "  {:width$} ({})",
                            reference.name,
                            reason_str,
                            width = skip_max_len
                        )?;
                    }
                }
            }
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Count bumps by update type
    fn count_by_update_type(&self, summary: &ScanSummary) -> (usize, usize, usize) {
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;

        for file in &summary.files {
            for result in file.bumps() {
                if let BumpResult::Bump { candidate, .. } = result {
                    match candidate.update_type {
                        UpdateType::Major => major += 1,
                        UpdateType::Minor => minor += 1,
                        UpdateType::Patch => patch += 1,
                        UpdateType::None => {}
                    }
                }
            }
        }

        (major, minor, patch)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &ScanResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        for file in &result.summary.files {
            self.format_file(file, writer)?;
        }

        // Group membership
        if !result.summary.groups.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Groups".bold())?;
            } else {
                writeln!(writer, "Groups:")?;
            }
            for (group, members) in &result.summary.groups {
                if self.color {
                    writeln!(
                        writer,
                        "  {}: {}",
                        group.cyan(),
                        members.join(", ").dimmed()
                    )?;
                } else {
                    writeln!(writer, "  {}: {}", group, members.join(", "))?;
                }
            }
            writeln!(writer)?;
        }

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)?;

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &ScanSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let bumps = summary.total_bumps();
        let skips = summary.total_skips();

        if self.verbosity == Verbosity::Quiet {
            if bumps > 0 {
                if self.color {
                    writeln!(writer, "{}{} {}", prefix, bumps.to_string().green(), "bumped")?;
                } else {
                    writeln!(writer, "{}{} bumped", prefix, bumps)?;
                }
            } else if self.color {
                writeln!(writer, "{}{}", prefix, "No bumps".dimmed())?;
            } else {
                writeln!(writer, "{}No bumps", prefix)?;
            }
            return Ok(());
        }

        let (major, minor, patch) = self.count_by_update_type(summary);

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;

            if bumps > 0 {
                write!(writer, "  {} reference(s) bumped", bumps.to_string().green())?;
                write!(writer, " (")?;
                let mut parts = Vec::new();
                if major > 0 {
                    parts.push(format!("{} {}", major.to_string().red(), "major"));
                }
                if minor > 0 {
                    parts.push(format!("{} {}", minor.to_string().yellow(), "minor"));
                }
                if patch > 0 {
                    parts.push(format!("{} {}", patch.to_string().green(), "patch"));
                }
                write!(writer, "{}", parts.join(", "))?;
                writeln!(writer, ")")?;
            } else {
                writeln!(writer, "  {}", "No references bumped".dimmed())?;
            }

            if skips > 0 {
                writeln!(
                    writer,
                    "  {} reference(s) skipped",
                    skips.to_string().dimmed()
                )?;
            }
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
            if bumps > 0 {
                let mut parts = Vec::new();
                if major > 0 {
                    parts.push(format!("{} major", major));
                }
                if minor > 0 {
                    parts.push(format!("{} minor", minor));
                }
                if patch > 0 {
                    parts.push(format!("{} patch", patch));
                }
                writeln!(
                    writer,
                    "  {} reference(s) bumped ({})",
                    bumps,
                    parts.join(", ")
                )?;
            } else {
                writeln!(writer, "  No references bumped")?;
            }
            writeln!(writer, "  {} reference(s) skipped", skips)?;
        }

        Ok(())
    }
}
