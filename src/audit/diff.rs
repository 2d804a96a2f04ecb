//! Field-level diffs between two audit snapshots
//!
//! Classifies every field across a before/after pair as added, removed,
//! changed or unchanged, and formats values for display.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::snapshot::Snapshot;

/// Classification of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only in the new snapshot
    Added,
    /// Present only in the old snapshot
    Removed,
    /// Present in both with different values
    Changed,
    /// Present in both with structurally equal values
    Unchanged,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Added => "Added",
            ChangeKind::Removed => "Removed",
            ChangeKind::Changed => "Changed",
            ChangeKind::Unchanged => "Unchanged",
        }
    }

    /// Whether the entry belongs in the visible change list
    pub fn is_visible(&self) -> bool {
        !matches!(self, ChangeKind::Unchanged)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One field's before/after comparison
///
/// A side that has no value (the key is missing, or the whole snapshot is)
/// holds `Value::Null`; `change` tells the two cases apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub key: String,
    pub old_value: Value,
    pub new_value: Value,
    pub change: ChangeKind,
}

impl FieldDiff {
    fn added(key: &str, new_value: &Value) -> Self {
        Self {
            key: key.to_string(),
            old_value: Value::Null,
            new_value: new_value.clone(),
            change: ChangeKind::Added,
        }
    }

    fn removed(key: &str, old_value: &Value) -> Self {
        Self {
            key: key.to_string(),
            old_value: old_value.clone(),
            new_value: Value::Null,
            change: ChangeKind::Removed,
        }
    }
}

/// Compute the classified field list for a pair of snapshots
///
/// Every key of either snapshot appears exactly once, ordered by key.
pub fn compute_field_diffs(old: Option<&Snapshot>, new: Option<&Snapshot>) -> Vec<FieldDiff> {
    match (old, new) {
        (None, None) => Vec::new(),
        (None, Some(new)) => sorted_keys(new)
            .map(|key| FieldDiff::added(key, &new[key]))
            .collect(),
        (Some(old), None) => sorted_keys(old)
            .map(|key| FieldDiff::removed(key, &old[key]))
            .collect(),
        (Some(old), Some(new)) => {
            let keys: BTreeSet<&str> = old.keys().chain(new.keys()).map(String::as_str).collect();

            keys.into_iter()
                .filter_map(|key| match (old.get(key), new.get(key)) {
                    (None, Some(new_val)) => Some(FieldDiff::added(key, new_val)),
                    (Some(old_val), None) => Some(FieldDiff::removed(key, old_val)),
                    (Some(old_val), Some(new_val)) => Some(FieldDiff {
                        key: key.to_string(),
                        old_value: old_val.clone(),
                        new_value: new_val.clone(),
                        change: if values_equal(old_val, new_val) {
                            ChangeKind::Unchanged
                        } else {
                            ChangeKind::Changed
                        },
                    }),
                    (None, None) => None,
                })
                .collect()
        }
    }
}

fn sorted_keys(snapshot: &Snapshot) -> impl Iterator<Item = &str> {
    snapshot
        .keys()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
}

/// Structural equality over JSON values
///
/// Object key order is ignored and numbers compare by numeric value, so `1`
/// and `1.0` are equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => false,
    }
}

/// The entries a reader should see: everything except `Unchanged`
pub fn visible_changes(diffs: &[FieldDiff]) -> Vec<FieldDiff> {
    diffs
        .iter()
        .filter(|d| d.change.is_visible())
        .cloned()
        .collect()
}

/// Format a JSON value for display
///
/// Containers are pretty-printed across multiple lines; strings are shown
/// without quotes.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// One-line summary of the visible changes, e.g. `stake: 10 -> 25, status: (added) -> "won"`
///
/// Returns `None` when nothing changed.
pub fn summarize_changes(diffs: &[FieldDiff]) -> Option<String> {
    let changes: Vec<String> = diffs
        .iter()
        .filter_map(|d| match d.change {
            ChangeKind::Added => Some(format!("{}: (added) -> {}", d.key, format_compact(&d.new_value))),
            ChangeKind::Removed => Some(format!(
                "{}: {} -> (removed)",
                d.key,
                format_compact(&d.old_value)
            )),
            ChangeKind::Changed => Some(format!(
                "{}: {} -> {}",
                d.key,
                format_compact(&d.old_value),
                format_compact(&d.new_value)
            )),
            ChangeKind::Unchanged => None,
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Short single-line form used in summaries
fn format_compact(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Truncate long strings
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
