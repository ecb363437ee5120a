//! Post-upgrade task runner
//!
//! Runs a candidate's command pipeline strictly in declared order inside the
//! working directory, then evaluates the spec's file filter globs against
//! the working tree to report which files the caller should stage. The
//! runner itself performs no version-control operations.
//!
//! Control flow follows the guard convention: a non-zero exit from a guard
//! command means "nothing to do for this candidate" and halts the pipeline
//! without error; a non-zero exit from any other command is a per-candidate
//! failure. The outcome of every command is an explicit tagged value so the
//! pipeline logic is testable without spawning real processes.

use crate::config::TaskSpec;
use crate::domain::UpdateCandidate;
use crate::error::TaskError;
use crate::task::template::{render, TemplateVars};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

/// Interpretation of one command's exit behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Command succeeded; pipeline continues
    Proceed,
    /// Guard command exited non-zero; pipeline halts, not an error
    Skip,
    /// Non-guard command exited non-zero; candidate fails
    Fail,
}

/// Result of executing one pipeline command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// The rendered command line
    pub command: String,
    /// Process exit code (-1 when terminated by signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// How the exit behavior was interpreted
    pub outcome: CommandOutcome,
}

/// Result of one candidate's pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Files matching the spec's filters, relative to the working directory;
    /// the caller is responsible for staging these
    pub files_changed: BTreeSet<PathBuf>,
    /// Per-command results, in execution order
    pub commands: Vec<CommandResult>,
    /// Whether a guard command halted the pipeline early
    pub skipped: bool,
    /// Whether this was a dry run (commands reported, not executed)
    pub simulated: bool,
}

/// Trait for spawning pipeline commands
pub trait CommandExecutor {
    /// Run a shell command line in the given working directory
    fn execute(&self, command: &str, working_dir: &Path) -> std::io::Result<Output>;
}

/// Default executor that runs commands through `sh -c`
#[derive(Debug, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    /// Creates a new shell executor
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str, working_dir: &Path) -> std::io::Result<Output> {
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(working_dir)
            .output()
    }
}

/// Runs post-upgrade task pipelines for update candidates
pub struct TaskRunner<E: CommandExecutor = ShellExecutor> {
    executor: E,
    dry_run: bool,
}

impl TaskRunner<ShellExecutor> {
    /// Creates a runner using the system shell
    pub fn new(dry_run: bool) -> Self {
        Self {
            executor: ShellExecutor::new(),
            dry_run,
        }
    }
}

impl<E: CommandExecutor> TaskRunner<E> {
    /// Creates a runner with a custom executor (for testing)
    pub fn with_executor(executor: E, dry_run: bool) -> Self {
        Self { executor, dry_run }
    }

    /// Runs one candidate's pipeline
    ///
    /// Commands execute strictly in declared order. A guard command exiting
    /// non-zero halts the pipeline and the result is still Ok; a non-guard
    /// command exiting non-zero fails this candidate only. In dry-run mode
    /// the rendered commands are reported but nothing is executed and the
    /// working tree is untouched.
    pub fn run(
        &self,
        candidate: &UpdateCandidate,
        spec: &TaskSpec,
        working_dir: &Path,
    ) -> Result<RunResult, TaskError> {
        let vars = TemplateVars::from_candidate(candidate);
        let mut commands = Vec::with_capacity(spec.commands.len());
        let mut skipped = false;

        for command_spec in &spec.commands {
            let rendered = render(&command_spec.run, &vars)?;

            if self.dry_run {
                commands.push(CommandResult {
                    command: rendered,
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                    outcome: CommandOutcome::Proceed,
                });
                continue;
            }

            let output = self
                .executor
                .execute(&rendered, working_dir)
                .map_err(|e| TaskError::spawn_failed(&rendered, e))?;

            let exit_code = output.status.code().unwrap_or(-1);
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

            if output.status.success() {
                commands.push(CommandResult {
                    command: rendered,
                    exit_code,
                    stdout,
                    stderr,
                    outcome: CommandOutcome::Proceed,
                });
            } else if command_spec.guard {
                commands.push(CommandResult {
                    command: rendered,
                    exit_code,
                    stdout,
                    stderr,
                    outcome: CommandOutcome::Skip,
                });
                skipped = true;
                break;
            } else {
                return Err(TaskError::command_failed(rendered, exit_code, stderr));
            }
        }

        let files_changed = if self.dry_run {
            BTreeSet::new()
        } else {
            evaluate_filters(&spec.file_filters, working_dir)?
        };

        Ok(RunResult {
            files_changed,
            commands,
            skipped,
            simulated: self.dry_run,
        })
    }
}

/// Evaluates file filter globs against the working tree
///
/// Returns matching file paths relative to the working directory, sorted.
pub fn evaluate_filters(
    filters: &[String],
    working_dir: &Path,
) -> Result<BTreeSet<PathBuf>, TaskError> {
    if filters.is_empty() {
        return Ok(BTreeSet::new());
    }

    let mut globs = Vec::with_capacity(filters.len());
    for pattern in filters {
        let glob =
            Glob::new(pattern).map_err(|e| TaskError::invalid_glob(pattern, e.to_string()))?;
        globs.push(glob);
    }

    let mut matched = BTreeSet::new();
    for entry in WalkDir::new(working_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry
            .path()
            .strip_prefix(working_dir)
            .unwrap_or(entry.path());
        let normalized = relative.to_string_lossy().replace('\\', "/");
        let candidate = CandidatePath::from(normalized.as_str());

        if globs.iter().any(|g| g.matched(&candidate).is_some()) {
            matched.insert(relative.to_path_buf());
        }
    }

    Ok(matched)
}
