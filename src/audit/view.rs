//! What a record's detail view shows
//!
//! Inserts show the created row verbatim, deletes the removed row, and
//! updates the visible field changes (or an explicit "no changes" marker).

use super::diff::{visible_changes, FieldDiff};
use super::entry::{AuditRecord, Operation};
use super::snapshot::Snapshot;

/// Body of an audit record's detail view
#[derive(Debug, Clone, PartialEq)]
pub enum RecordView {
    /// Insert: the full new snapshot
    Created(Snapshot),
    /// Delete: the full old snapshot
    Deleted(Snapshot),
    /// Added, removed and changed fields; never contains `Unchanged`
    FieldChanges(Vec<FieldDiff>),
    /// Update where every field is unchanged
    NoFieldChanges,
    /// Insert or delete without the snapshot it should carry
    NoData,
}

impl RecordView {
    pub fn for_record(record: &AuditRecord) -> Self {
        let verbatim = match record.operation {
            Operation::Insert => record.new_snapshot().map(RecordView::Created),
            Operation::Delete => record.old_snapshot().map(RecordView::Deleted),
            Operation::Update => None,
        };
        if let Some(view) = verbatim {
            return view;
        }

        let changes = visible_changes(&record.field_diffs());
        if !changes.is_empty() {
            RecordView::FieldChanges(changes)
        } else if record.operation == Operation::Update {
            RecordView::NoFieldChanges
        } else {
            RecordView::NoData
        }
    }

    /// Number of visible field changes (0 for verbatim views)
    pub fn change_count(&self) -> usize {
        match self {
            RecordView::FieldChanges(changes) => changes.len(),
            _ => 0,
        }
    }
}
