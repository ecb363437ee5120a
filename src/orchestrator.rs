//! Scan orchestrator coordinating the whole bump workflow
//!
//! This module provides:
//! - Workflow coordination: walk → extract → classify → dispatch → run tasks
//! - Strictly sequential processing for deterministic log output and stable
//!   grouping (task commands mutate a shared working tree)
//! - Dry-run mode support
//! - Error handling with per-file and per-candidate continuation

use crate::classify::classify;
use crate::cli::CliArgs;
use crate::config::{load_rules, BumpPlan, ExecutionMode, RuleSet, TaskSpec};
use crate::dispatch::dispatch;
use crate::domain::{BumpResult, FileScanResult, ScanSummary, UpdateCandidate};
use crate::error::{AppError, IoError};
use crate::extract::{extract, normalize_path};
use crate::progress::Progress;
use crate::task::{RunResult, TaskRunner};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Orchestrator for coordinating the scan workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Compiled rule set, immutable for the process lifetime
    rules: RuleSet,
    /// Planned new values supplied by the host tool
    plan: BumpPlan,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct ScanResult {
    /// Scan summary with all per-file decisions
    pub summary: ScanSummary,
    /// Task pipeline results for each bumped candidate
    pub task_results: Vec<TaskOutcome>,
    /// Errors encountered during processing
    pub errors: Vec<ScanError>,
}

/// A completed task pipeline for one candidate
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TaskOutcome {
    /// Image name of the bumped candidate
    pub dep_name: String,
    /// The pipeline result
    pub run: RunResult,
}

/// Errors that can occur during a scan
#[derive(Debug)]
pub enum ScanError {
    /// A file system failure: missing scan root or an unreadable matched file
    Io(IoError),
    /// A candidate's task pipeline failed
    TaskFailed { dep_name: String, message: String },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Io(err) => write!(f, "{}", err),
            ScanError::TaskFailed { dep_name, message } => {
                write!(f, "Task pipeline failed for {}: {}", dep_name, message)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io(err) => Some(err),
            ScanError::TaskFailed { .. } => None,
        }
    }
}

impl Orchestrator {
    /// Create a new orchestrator with the given CLI arguments
    ///
    /// Loads and validates the rule set and the bump plan; any configuration
    /// problem is fatal here, before the scan starts.
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let rules = match &args.config {
            Some(path) => load_rules(path)?,
            None => RuleSet::default_rules(),
        };

        let mut plan = BumpPlan::from_specs(&args.bump)?;
        if let Some(path) = &args.plan {
            let mut file_plan = BumpPlan::load(path)?;
            // CLI specs take precedence over the plan file
            file_plan.merge(plan);
            plan = file_plan;
        }

        Ok(Self { args, rules, plan })
    }

    /// Create an orchestrator with explicit rules and plan (for testing)
    pub fn with_rules(args: CliArgs, rules: RuleSet, plan: BumpPlan) -> Self {
        Self { args, rules, plan }
    }

    /// Run the scan workflow
    pub fn run(&self) -> ScanResult {
        self.run_with_progress(!self.args.quiet && !self.args.json)
    }

    /// Run the scan workflow with optional progress display
    pub fn run_with_progress(&self, show_progress: bool) -> ScanResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = ScanSummary::new(self.args.dry_run);
        let mut task_results = Vec::new();
        let mut errors = Vec::new();

        if !self.args.path.is_dir() {
            errors.push(ScanError::Io(IoError::directory_not_found(
                &self.args.path,
            )));
            return ScanResult {
                summary,
                task_results,
                errors,
            };
        }

        // Step 1: Walk the tree and collect files matching any path pattern
        progress.spinner("Scanning value files...");
        let matched_files = self.collect_matching_files();
        progress.finish_and_clear();

        if matched_files.is_empty() {
            return ScanResult {
                summary,
                task_results,
                errors,
            };
        }

        let runner = TaskRunner::new(self.args.dry_run);
        let mut once_specs: Vec<TaskSpec> = Vec::new();

        progress.start(matched_files.len() as u64, "Processing");
        for relative in &matched_files {
            let absolute = self.args.path.join(relative);
            let contents = match std::fs::read_to_string(&absolute) {
                Ok(c) => c,
                Err(e) => {
                    errors.push(ScanError::Io(IoError::read_error(relative, e)));
                    progress.inc();
                    continue;
                }
            };

            let extractions = extract(relative, &contents, &self.rules.match_rules);
            if extractions.is_empty() {
                // Extraction miss: the path matched but the content pattern
                // found nothing
                progress.inc();
                continue;
            }

            let mut file_result = FileScanResult::new(relative.clone());
            let mut candidates: Vec<UpdateCandidate> = Vec::new();

            // Step 2: Look up the plan and classify
            for extraction in extractions {
                let reference = extraction.reference;
                match self.plan.get(&reference.name) {
                    None => file_result.add_result(BumpResult::skip_no_planned_update(reference)),
                    Some(new_value) => {
                        let update_type = classify(&reference.current_value, new_value);
                        if !update_type.is_update() {
                            file_result.add_result(BumpResult::skip_already_current(reference));
                        } else {
                            candidates.push(UpdateCandidate::new(
                                reference,
                                new_value,
                                update_type,
                                extraction.datasource,
                                extraction.manager,
                            ));
                        }
                    }
                }
            }

            // Step 3: Dispatch package rules and run task pipelines, one
            // candidate at a time
            for dispatched in dispatch(candidates, &self.rules.package_rules) {
                let candidate = dispatched.candidate;
                let effects = dispatched.effects;

                if let Some(spec) = &effects.tasks {
                    let already_ran = spec.execution_mode == ExecutionMode::Once
                        && once_specs.contains(spec);

                    if !already_ran {
                        match runner.run(&candidate, spec, &self.args.path) {
                            Ok(run) => {
                                if spec.execution_mode == ExecutionMode::Once {
                                    once_specs.push(spec.clone());
                                }
                                task_results.push(TaskOutcome {
                                    dep_name: candidate.dep_name().to_string(),
                                    run,
                                });
                            }
                            Err(e) => {
                                // Partial-failure isolation: only this
                                // candidate is marked failed
                                errors.push(ScanError::TaskFailed {
                                    dep_name: candidate.dep_name().to_string(),
                                    message: e.to_string(),
                                });
                                file_result.add_result(BumpResult::skip_task_failed(
                                    candidate.reference,
                                    e.to_string(),
                                ));
                                continue;
                            }
                        }
                    }
                }

                if let Some(group) = &effects.group_name {
                    summary.add_group_member(group, candidate.dep_name());
                }
                file_result.add_result(BumpResult::bump(candidate, effects));
            }

            summary.add_file(file_result);
            progress.inc();
        }
        progress.finish_and_clear();

        ScanResult {
            summary,
            task_results,
            errors,
        }
    }

    /// Walks the scan root and returns relative paths matching any rule,
    /// sorted for deterministic processing order
    fn collect_matching_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.args.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(&self.args.path)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                let normalized = normalize_path(&relative);
                self.rules
                    .match_rules
                    .iter()
                    .any(|rule| rule.matches_path(&normalized))
                    .then_some(relative)
            })
            .collect()
    }
}

impl ScanResult {
    /// Union of files reported changed by all task pipelines
    pub fn files_changed(&self) -> std::collections::BTreeSet<&Path> {
        self.task_results
            .iter()
            .flat_map(|t| t.run.files_changed.iter().map(PathBuf::as_path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;
    use crate::domain::{SkipReason, UpdateType};
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn write_values(root: &Path, app: &str, repository: &str, tag: &str) {
        let dir = root.join("ix-dev").join("stable").join(app);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("ix_values.yaml"),
            format!(
                "image:\n  main:\n    repository: {}\n    tag: \"{}\"\n",
                repository, tag
            ),
        )
        .unwrap();
    }

    fn args_for(root: &TempDir, extra: &[&str]) -> CliArgs {
        let mut argv = vec!["tagbump", root.path().to_str().unwrap(), "--quiet"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    fn orchestrator(root: &TempDir, extra: &[&str]) -> Orchestrator {
        Orchestrator::new(args_for(root, extra)).unwrap()
    }

    #[test]
    fn test_scan_bumps_and_logs() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");

        let result = orchestrator(&root, &["--bump", "nginx=1.26.0"]).run_with_progress(false);

        assert!(result.errors.is_empty());
        assert_eq!(result.summary.total_bumps(), 1);
        assert_eq!(result.task_results.len(), 1);

        let log = fs::read_to_string(root.path().join("renovate.log")).unwrap();
        assert_eq!(
            log,
            "bumping ix-dev/stable/nginx from 1.25.3 to 1.26.0 (nginx)\n"
        );
        assert!(result
            .task_results[0]
            .run
            .files_changed
            .contains(&PathBuf::from("renovate.log")));
    }

    #[test]
    fn test_scan_minor_is_grouped_and_labeled() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.2.3");

        let result = orchestrator(&root, &["--bump", "nginx=1.3.0"]).run_with_progress(false);

        let file = &result.summary.files[0];
        let BumpResult::Bump { candidate, effects } = &file.results[0] else {
            panic!("Expected Bump result");
        };
        assert_eq!(candidate.update_type, UpdateType::Minor);
        assert!(effects.labels.contains("minor"));
        assert_eq!(effects.group_name.as_deref(), Some("updates-patch-minor"));
        assert_eq!(
            result.summary.groups["updates-patch-minor"],
            vec!["nginx"]
        );
    }

    #[test]
    fn test_scan_major_is_ungrouped() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "2.0.0");

        let result = orchestrator(&root, &["--bump", "nginx=3.0.0"]).run_with_progress(false);

        let BumpResult::Bump { candidate, effects } = &result.summary.files[0].results[0] else {
            panic!("Expected Bump result");
        };
        assert_eq!(candidate.update_type, UpdateType::Major);
        assert!(effects.labels.contains("major"));
        assert!(effects.group_name.is_none());
        assert!(result.summary.groups.is_empty());
    }

    #[test]
    fn test_scan_without_plan_skips() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");

        let result = orchestrator(&root, &[]).run_with_progress(false);

        assert_eq!(result.summary.total_bumps(), 0);
        assert_eq!(result.summary.total_skips(), 1);
        let BumpResult::Skip { reason, .. } = &result.summary.files[0].results[0] else {
            panic!("Expected Skip result");
        };
        assert_eq!(*reason, SkipReason::NoPlannedUpdate);
        assert!(!root.path().join("renovate.log").exists());
    }

    #[test]
    fn test_scan_equal_value_skips_already_current() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");

        let result = orchestrator(&root, &["--bump", "nginx=1.25.3"]).run_with_progress(false);

        let BumpResult::Skip { reason, .. } = &result.summary.files[0].results[0] else {
            panic!("Expected Skip result");
        };
        assert_eq!(*reason, SkipReason::AlreadyCurrent);
    }

    #[test]
    fn test_scan_dry_run_leaves_tree_untouched() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");

        let result =
            orchestrator(&root, &["--bump", "nginx=1.26.0", "-n"]).run_with_progress(false);

        assert_eq!(result.summary.total_bumps(), 1);
        assert!(result.summary.dry_run);
        assert!(result.task_results[0].run.simulated);
        assert!(!root.path().join("renovate.log").exists());
    }

    #[test]
    fn test_scan_multiple_apps_deterministic_order() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");
        write_values(root.path(), "redis", "redis", "7.2.3");

        let result = orchestrator(
            &root,
            &["--bump", "nginx=1.25.4", "--bump", "redis=7.2.4"],
        )
        .run_with_progress(false);

        assert_eq!(result.summary.total_bumps(), 2);
        let log = fs::read_to_string(root.path().join("renovate.log")).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        // Sorted walk order: nginx before redis
        assert!(lines[0].contains("(nginx)"));
        assert!(lines[1].contains("(redis)"));
        assert_eq!(
            result.summary.groups["updates-patch-minor"],
            vec!["nginx", "redis"]
        );
    }

    #[test]
    fn test_scan_task_failure_isolates_candidate() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");
        write_values(root.path(), "redis", "redis", "7.2.3");

        // A rule set whose task fails for nginx only
        let rules_json = r#"{
            "matchRules": [
                {
                    "filePattern": "^ix-dev/.*/ix_values\\.yaml$",
                    "extractionPattern": "^    repository: (?P<depName>\\S+)\\n    tag: \"?(?P<currentValue>[^\"\\n]+)\"?$"
                }
            ],
            "packageRules": [
                {
                    "matchDatasources": ["docker"],
                    "postUpgradeTasks": {
                        "fileFilters": ["renovate.log"],
                        "commands": ["test {{depName}} != nginx", "echo {{depName}} >> renovate.log"]
                    }
                }
            ]
        }"#;
        let rules_path = root.path().join("rules.json");
        fs::write(&rules_path, rules_json).unwrap();

        let result = orchestrator(
            &root,
            &[
                "--config",
                rules_path.to_str().unwrap(),
                "--bump",
                "nginx=1.26.0",
                "--bump",
                "redis=7.2.4",
            ],
        )
        .run_with_progress(false);

        // nginx fails, redis continues
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.summary.total_bumps(), 1);
        let log = fs::read_to_string(root.path().join("renovate.log")).unwrap();
        assert_eq!(log, "redis\n");

        let nginx_file = &result.summary.files[0];
        let BumpResult::Skip { reason, .. } = &nginx_file.results[0] else {
            panic!("Expected Skip result for nginx");
        };
        assert!(matches!(reason, SkipReason::TaskFailed(_)));
    }

    #[test]
    fn test_scan_root_not_found() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");
        let args = CliArgs::parse_from(["tagbump", missing.to_str().unwrap(), "--quiet"]);
        let result = Orchestrator::new(args).unwrap().run_with_progress(false);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            ScanError::Io(IoError::DirectoryNotFound { .. })
        ));
        assert!(result.errors[0].to_string().contains("directory not found"));
    }

    #[test]
    fn test_scan_unreadable_file_is_per_file_error() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");
        write_values(root.path(), "redis", "redis", "7.2.3");
        // Not valid UTF-8, so reading it as a string fails
        let blocked = root
            .path()
            .join("ix-dev/stable/nginx/ix_values.yaml");
        fs::write(&blocked, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let result = orchestrator(
            &root,
            &["--bump", "nginx=1.26.0", "--bump", "redis=7.2.4"],
        )
        .run_with_progress(false);

        // nginx is unreadable, redis still bumps
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            ScanError::Io(IoError::ReadError { .. })
        ));
        assert_eq!(result.summary.total_bumps(), 1);
    }

    #[test]
    fn test_scan_once_mode_runs_pipeline_once_per_batch() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");
        write_values(root.path(), "redis", "redis", "7.2.3");

        // Both candidates share an identical once-mode task
        let rules_json = r#"{
            "matchRules": [
                {
                    "filePattern": "^ix-dev/.*/ix_values\\.yaml$",
                    "extractionPattern": "^    repository: (?P<depName>\\S+)\\n    tag: \"?(?P<currentValue>[^\"\\n]+)\"?$"
                }
            ],
            "packageRules": [
                {
                    "matchDatasources": ["docker"],
                    "postUpgradeTasks": {
                        "fileFilters": ["once.log"],
                        "executionMode": "once",
                        "commands": ["echo ran >> once.log"]
                    }
                }
            ]
        }"#;
        let rules_path = root.path().join("rules.json");
        fs::write(&rules_path, rules_json).unwrap();

        let result = orchestrator(
            &root,
            &[
                "--config",
                rules_path.to_str().unwrap(),
                "--bump",
                "nginx=1.26.0",
                "--bump",
                "redis=7.2.4",
            ],
        )
        .run_with_progress(false);

        assert!(result.errors.is_empty());
        assert_eq!(result.summary.total_bumps(), 2);
        // The shared pipeline ran for the first candidate only
        assert_eq!(result.task_results.len(), 1);
        let log = fs::read_to_string(root.path().join("once.log")).unwrap();
        assert_eq!(log, "ran\n");
    }

    #[test]
    fn test_scan_non_matching_files_ignored() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");
        fs::write(
            root.path().join("ix-dev").join("stable").join("nginx").join("values.yaml"),
            "    repository: other\n    tag: \"9.9.9\"\n",
        )
        .unwrap();

        let result = orchestrator(&root, &["--bump", "other=10.0.0"]).run_with_progress(false);
        assert_eq!(result.summary.files_scanned(), 1);
        assert_eq!(result.summary.total_bumps(), 0);
    }

    #[test]
    fn test_scan_plan_file() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");
        let plan_path = root.path().join("plan.json");
        fs::write(&plan_path, r#"{"nginx": "1.26.0"}"#).unwrap();

        let result =
            orchestrator(&root, &["--plan", plan_path.to_str().unwrap()]).run_with_progress(false);
        assert_eq!(result.summary.total_bumps(), 1);
    }

    #[test]
    fn test_files_changed_union() {
        let root = tempfile::tempdir().unwrap();
        write_values(root.path(), "nginx", "nginx", "1.25.3");

        let result = orchestrator(&root, &["--bump", "nginx=1.26.0"]).run_with_progress(false);
        let changed = result.files_changed();
        assert!(changed.contains(Path::new("renovate.log")));
        assert!(changed.contains(Path::new("ix-dev/stable/nginx/ix_values.yaml")));
    }
}
