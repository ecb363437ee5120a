//! Effect sets produced by package rule dispatch
//!
//! Every package rule that matches a candidate contributes its effects.
//! Set-valued effects (labels) union across matching rules, so rule order
//! does not affect them; scalar effects (group name, task spec) take the
//! value of the last matching rule.

use crate::config::TaskSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Merged effects applied to a single update candidate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectSet {
    /// Labels to attach to the update proposal (union across rules)
    pub labels: BTreeSet<String>,
    /// Branch group this candidate belongs to (last matching rule wins)
    pub group_name: Option<String>,
    /// Post-upgrade task pipeline (last matching rule wins)
    pub tasks: Option<TaskSpec>,
}

impl EffectSet {
    /// Creates an empty EffectSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges another rule's effects into this set
    ///
    /// Labels union; `group_name` and `tasks` are overwritten when the other
    /// rule provides a value (last-match-wins for scalar fields).
    pub fn merge(&mut self, labels: &[String], group_name: Option<&str>, tasks: Option<&TaskSpec>) {
        for label in labels {
            self.labels.insert(label.clone());
        }
        if let Some(group) = group_name {
            self.group_name = Some(group.to_string());
        }
        if let Some(spec) = tasks {
            self.tasks = Some(spec.clone());
        }
    }

    /// Returns true if no rule contributed any effect
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.group_name.is_none() && self.tasks.is_none()
    }
}
