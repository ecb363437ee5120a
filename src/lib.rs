//! tagbump - Rule-driven container tag bumper library
//!
//! This library provides the core functionality for bumping container image
//! tags recorded in repository value files:
//! - Regex-based reference extraction from matched value files
//! - Semver classification of planned tag changes
//! - Package rule dispatch (labels, grouping, post-upgrade tasks)
//! - Post-upgrade task pipelines with the guard-skip convention

pub mod classify;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod task;
