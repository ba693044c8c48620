//! Field-by-field comparison of the current and requested versions of a record.
//!
//! Used by the update-request review dialog to highlight what the submitter
//! changed. Comparison runs over the rendered [`Field`]s of a
//! [`Reviewable`], so both sides are compared exactly as they are displayed.

use serde::{Deserialize, Serialize};

use crate::review::{Field, Reviewable};

/// The status of one field in a diff comparison.
///
/// - `Added`     -- empty on the current side, filled on the requested side.
/// - `Removed`   -- filled on the current side, empty on the requested side.
/// - `Changed`   -- filled on both sides with different values.
/// - `Unchanged` -- identical on both sides (including both empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub name: &'static str,
    pub label: &'static str,
    pub before: Option<String>,
    pub after: Option<String>,
    pub status: DiffStatus,
}

fn classify(before: &Option<String>, after: &Option<String>) -> DiffStatus {
    match (before, after) {
        (None, None) => DiffStatus::Unchanged,
        (None, Some(_)) => DiffStatus::Added,
        (Some(_), None) => DiffStatus::Removed,
        (Some(a), Some(b)) if a == b => DiffStatus::Unchanged,
        (Some(_), Some(_)) => DiffStatus::Changed,
    }
}

/// Compare two field lists by field name.
///
/// Fields present on only one side are still reported, using `None` for the
/// missing side.
pub fn diff_fields(before: &[Field], after: &[Field]) -> Vec<FieldChange> {
    let mut changes: Vec<FieldChange> = before
        .iter()
        .map(|old| {
            let new_value = after
                .iter()
                .find(|f| f.name == old.name)
                .and_then(|f| f.value.clone());
            FieldChange {
                name: old.name,
                label: old.label,
                status: classify(&old.value, &new_value),
                before: old.value.clone(),
                after: new_value,
            }
        })
        .collect();

    for new in after.iter().filter(|f| before.iter().all(|b| b.name != f.name)) {
        changes.push(FieldChange {
            name: new.name,
            label: new.label,
            before: None,
            status: classify(&None, &new.value),
            after: new.value.clone(),
        });
    }

    changes
}

/// Diff the current and requested versions of a reviewable record.
pub fn diff_records<T: Reviewable>(current: &T, requested: &T) -> Vec<FieldChange> {
    diff_fields(&current.fields(), &requested.fields())
}

/// Only the rows that differ, for compact rendering.
pub fn changed_only(changes: &[FieldChange]) -> Vec<&FieldChange> {
    changes
        .iter()
        .filter(|c| c.status != DiffStatus::Unchanged)
        .collect()
}
