//! Core domain models for tagbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency references extracted from value files
//! - Update candidates and their classification
//! - Effect sets produced by package rule dispatch
//! - Per-reference bump decisions
//! - Summary and result structures

mod candidate;
mod effects;
mod outcome;
mod reference;
mod summary;

pub use candidate::{Manager, UpdateCandidate, UpdateType};
pub use effects::EffectSet;
pub use outcome::{BumpResult, SkipReason};
pub use reference::{DependencyReference, SourceLocation};
pub use summary::{FileScanResult, ScanSummary};
