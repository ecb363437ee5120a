//! Per-reference bump decision types

use super::{DependencyReference, EffectSet, UpdateCandidate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why an extracted reference was not bumped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No planned new value was supplied for this reference
    NoPlannedUpdate,
    /// Planned value equals the recorded value
    AlreadyCurrent,
    /// The post-upgrade pipeline failed for this candidate
    TaskFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoPlannedUpdate => write!(f, "no planned update"),
            SkipReason::AlreadyCurrent => write!(f, "already current"),
            SkipReason::TaskFailed(msg) => write!(f, "task failed: {}", msg),
        }
    }
}

/// Decision for a single extracted reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BumpResult {
    /// Reference will be bumped
    Bump {
        /// The classified update
        candidate: UpdateCandidate,
        /// Merged package rule effects
        effects: EffectSet,
    },
    /// Reference was left untouched
    Skip {
        /// The reference that was skipped
        reference: DependencyReference,
        /// The reason for skipping
        reason: SkipReason,
    },
}

impl BumpResult {
    /// Creates a Bump result
    pub fn bump(candidate: UpdateCandidate, effects: EffectSet) -> Self {
        BumpResult::Bump { candidate, effects }
    }

    /// Creates a Skip result
    pub fn skip(reference: DependencyReference, reason: SkipReason) -> Self {
        BumpResult::Skip { reference, reason }
    }

    /// Creates a Skip result for a reference without a planned update
    pub fn skip_no_planned_update(reference: DependencyReference) -> Self {
        Self::skip(reference, SkipReason::NoPlannedUpdate)
    }

    /// Creates a Skip result for a reference already at the planned value
    pub fn skip_already_current(reference: DependencyReference) -> Self {
        Self::skip(reference, SkipReason::AlreadyCurrent)
    }

    /// Creates a Skip result for a failed pipeline
    pub fn skip_task_failed(reference: DependencyReference, message: impl Into<String>) -> Self {
        Self::skip(reference, SkipReason::TaskFailed(message.into()))
    }

    /// Returns true if this is a bump result
    pub fn is_bump(&self) -> bool {
        matches!(self, BumpResult::Bump { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, BumpResult::Skip { .. })
    }

    /// Returns the underlying reference
    pub fn reference(&self) -> &DependencyReference {
        match self {
            BumpResult::Bump { candidate, .. } => &candidate.reference,
            BumpResult::Skip { reference, .. } => reference,
        }
    }

    /// Returns the image name
    pub fn dep_name(&self) -> &str {
        &self.reference().name
    }
}

impl fmt::Display for BumpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpResult::Bump { candidate, .. } => write!(f, "{}", candidate),
            BumpResult::Skip { reference, reason } => {
                write!(f, "{}: skipped ({})", reference.name, reason)
            }
        }
    }
}
