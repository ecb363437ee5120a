//! Static rule configuration
//!
//! This module contains:
//! - Compiled match rules and package rules (loaded once, immutable)
//! - Post-upgrade task specifications
//! - Rule file loading with load-time validation
//! - The bump plan supplied by the host tool

mod loader;
mod plan;
mod rules;

pub use loader::load_rules;
pub use plan::BumpPlan;
pub use rules::{
    CommandSpec, ExecutionMode, MatchRule, PackageRule, RawMatchRule, RuleSet, TaskSpec,
    DEFAULT_LOG_FILE,
};
