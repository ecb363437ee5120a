//! Post-upgrade task pipeline
//!
//! This module provides:
//! - Template variable substitution for pipeline commands
//! - The task runner with the guard-skip control flow convention
//! - Glob evaluation of file filters against the working tree

mod runner;
mod template;

pub use runner::{
    CommandExecutor, CommandOutcome, CommandResult, RunResult, ShellExecutor, TaskRunner,
};
pub use template::{render, validate_command, TemplateVars, TEMPLATE_VARIABLES};
