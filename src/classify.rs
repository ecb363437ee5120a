//! Version change classification
//!
//! Compares two tag values per semantic versioning. Tags that do not parse
//! as semver (digests, branch names, truncated versions) are compared as
//! opaque strings and classified as `major` when they differ: an unknown
//! change is treated as a breaking one rather than silently under-reported.

use crate::domain::UpdateType;
use semver::Version;

/// Classifies the change from `old_value` to `new_value`
///
/// Equal strings are `None`; call sites must not generate an update
/// candidate in that case. Segment comparison is numeric, not
/// lexicographic, so `9` → `10` is a valid single-segment difference.
pub fn classify(old_value: &str, new_value: &str) -> UpdateType {
    if old_value == new_value {
        return UpdateType::None;
    }

    match (parse_version(old_value), parse_version(new_value)) {
        (Some(old), Some(new)) => {
            if old.major != new.major {
                UpdateType::Major
            } else if old.minor != new.minor {
                UpdateType::Minor
            } else {
                // Patch segment, prerelease or build metadata differs; all
                // of these count as a patch-level change
                UpdateType::Patch
            }
        }
        // At least one side is an opaque tag; conservative default
        _ => UpdateType::Major,
    }
}

/// Parses a tag as a semantic version, tolerating a single leading `v`
fn parse_version(value: &str) -> Option<Version> {
    Version::parse(value)
        .ok()
        .or_else(|| value.strip_prefix('v').and_then(|v| Version::parse(v).ok()))
}
