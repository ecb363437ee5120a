//! Scan result summary types
//!
//! Provides structures for tracking bump decisions at file and overall levels.

use super::BumpResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Bump decisions for a single scanned value file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileScanResult {
    /// Path of the file, relative to the scan root
    pub path: PathBuf,
    /// Individual reference decisions, in extraction order
    pub results: Vec<BumpResult>,
}

impl FileScanResult {
    /// Creates a new FileScanResult
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            results: Vec::new(),
        }
    }

    /// Adds a bump decision
    pub fn add_result(&mut self, result: BumpResult) {
        self.results.push(result);
    }

    /// Returns the number of bumps
    pub fn bump_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_bump()).count()
    }

    /// Returns the number of skips
    pub fn skip_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skip()).count()
    }

    /// Returns all bumps
    pub fn bumps(&self) -> impl Iterator<Item = &BumpResult> {
        self.results.iter().filter(|r| r.is_bump())
    }

    /// Returns true if any reference in this file was bumped
    pub fn has_bumps(&self) -> bool {
        self.bump_count() > 0
    }
}

/// Overall summary of a repository scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Results for each value file that produced references
    pub files: Vec<FileScanResult>,
    /// Group name → dep names, for bumps assigned to a branch group
    pub groups: BTreeMap<String, Vec<String>>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl ScanSummary {
    /// Creates a new ScanSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            files: Vec::new(),
            groups: BTreeMap::new(),
            dry_run,
        }
    }

    /// Adds a file result
    pub fn add_file(&mut self, file: FileScanResult) {
        self.files.push(file);
    }

    /// Records a group assignment for a bumped dependency
    pub fn add_group_member(&mut self, group: impl Into<String>, dep_name: impl Into<String>) {
        self.groups
            .entry(group.into())
            .or_default()
            .push(dep_name.into());
    }

    /// Returns the total number of files that produced references
    pub fn files_scanned(&self) -> usize {
        self.files.len()
    }

    /// Returns the total number of bumps across all files
    pub fn total_bumps(&self) -> usize {
        self.files.iter().map(|f| f.bump_count()).sum()
    }

    /// Returns the total number of skips across all files
    pub fn total_skips(&self) -> usize {
        self.files.iter().map(|f| f.skip_count()).sum()
    }

    /// Returns the total number of references processed
    pub fn total_references(&self) -> usize {
        self.files.iter().map(|f| f.results.len()).sum()
    }

    /// Returns true if any reference was bumped
    pub fn has_bumps(&self) -> bool {
        self.total_bumps() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DependencyReference, EffectSet, Manager, SourceLocation, UpdateCandidate, UpdateType,
    };

    fn bump_result(name: &str) -> BumpResult {
        let reference = DependencyReference::new(
            name,
            "1.0.0",
            SourceLocation::new(format!("ix-dev/stable/{}/ix_values.yaml", name), 3),
        );
        BumpResult::bump(
            UpdateCandidate::new(
                reference,
                "1.1.0",
                UpdateType::Minor,
                "docker",
                Manager::CustomRegex,
            ),
            EffectSet::new(),
        )
    }

    fn skip_result(name: &str) -> BumpResult {
        BumpResult::skip_no_planned_update(DependencyReference::new(
            name,
            "1.0.0",
            SourceLocation::new("a.yaml", 1),
        ))
    }

    #[test]
    fn test_file_scan_result_counts() {
        let mut file = FileScanResult::new("ix-dev/stable/nginx/ix_values.yaml");
        file.add_result(bump_result("nginx"));
        file.add_result(skip_result("redis"));

        assert_eq!(file.bump_count(), 1);
        assert_eq!(file.skip_count(), 1);
        assert!(file.has_bumps());
        assert_eq!(file.bumps().count(), 1);
    }

    #[test]
    fn test_file_scan_result_empty() {
        let file = FileScanResult::new("a.yaml");
        assert_eq!(file.bump_count(), 0);
        assert!(!file.has_bumps());
    }

    #[test]
    fn test_scan_summary_totals() {
        let mut summary = ScanSummary::new(false);

        let mut file_a = FileScanResult::new("ix-dev/stable/nginx/ix_values.yaml");
        file_a.add_result(bump_result("nginx"));
        summary.add_file(file_a);

        let mut file_b = FileScanResult::new("ix-dev/stable/redis/ix_values.yaml");
        file_b.add_result(skip_result("redis"));
        file_b.add_result(bump_result("redis-exporter"));
        summary.add_file(file_b);

        assert_eq!(summary.files_scanned(), 2);
        assert_eq!(summary.total_bumps(), 2);
        assert_eq!(summary.total_skips(), 1);
        assert_eq!(summary.total_references(), 3);
        assert!(summary.has_bumps());
        assert!(!summary.dry_run);
    }

    #[test]
    fn test_scan_summary_groups() {
        let mut summary = ScanSummary::new(false);
        summary.add_group_member("updates-patch-minor", "nginx");
        summary.add_group_member("updates-patch-minor", "redis");

        assert_eq!(summary.groups.len(), 1);
        assert_eq!(
            summary.groups["updates-patch-minor"],
            vec!["nginx", "redis"]
        );
    }

    #[test]
    fn test_scan_summary_dry_run_flag() {
        let summary = ScanSummary::new(true);
        assert!(summary.dry_run);
        assert!(!summary.has_bumps());
    }

    #[test]
    fn test_serde_summary_roundtrip() {
        let mut summary = ScanSummary::new(false);
        let mut file = FileScanResult::new("ix-dev/stable/nginx/ix_values.yaml");
        file.add_result(bump_result("nginx"));
        summary.add_file(file);
        summary.add_group_member("updates-patch-minor", "nginx");

        let json = serde_json::to_string(&summary).unwrap();
        let parsed: ScanSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
