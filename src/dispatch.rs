//! Package rule dispatch
//!
//! Evaluates package rules against classified update candidates. All
//! matching rules contribute effects: labels are additive across rules,
//! while scalar effects (group name, task spec) take the last matching
//! rule's value. A candidate no rule matches is dispatched ungrouped with
//! no labels; that is a valid outcome, not an error.

use crate::config::PackageRule;
use crate::domain::{EffectSet, UpdateCandidate};

/// A candidate with its merged rule effects
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// The classified update
    pub candidate: UpdateCandidate,
    /// Merged effects from all matching rules
    pub effects: EffectSet,
}

/// Evaluates rules in declared order and merges effects per candidate
pub fn dispatch(candidates: Vec<UpdateCandidate>, rules: &[PackageRule]) -> Vec<Dispatch> {
    candidates
        .into_iter()
        .map(|candidate| {
            let effects = effects_for(&candidate, rules);
            Dispatch { candidate, effects }
        })
        .collect()
}

/// Merges the effects of every rule matching one candidate
pub fn effects_for(candidate: &UpdateCandidate, rules: &[PackageRule]) -> EffectSet {
    let mut effects = EffectSet::new();
    for rule in rules {
        if rule.matches(candidate) {
            effects.merge(
                &rule.labels,
                rule.group_name.as_deref(),
                rule.post_upgrade_tasks.as_ref(),
            );
        }
    }
    effects
}
