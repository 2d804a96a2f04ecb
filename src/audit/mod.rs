//! Audit history for the back office
//!
//! Every insert, update and delete on a back-office table is written to the
//! `audit_log` table with before/after row snapshots. This module models
//! those records and turns snapshot pairs into classified field diffs.
//!
//! # Architecture
//!
//! - `AuditRecord`: one logged mutation as returned by the backend.
//! - `parse_snapshot`: tolerant conversion of raw `old_data`/`new_data`.
//! - `compute_field_diffs`: the diff engine, classifying each field as
//!   added, removed, changed or unchanged.
//! - `RecordView`: what a record's detail view displays.
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice::audit::{compute_field_diffs, visible_changes, RecordView};
//!
//! let diffs = record.field_diffs();
//! for diff in visible_changes(&diffs) {
//!     println!("{}: {}", diff.key, diff.change);
//! }
//!
//! match RecordView::for_record(&record) {
//!     RecordView::NoFieldChanges => println!("No field changes detected"),
//!     _ => {}
//! }
//! ```

mod diff;
mod entry;
mod snapshot;
mod view;

pub use diff::{
    compute_field_diffs, format_value, summarize_changes, values_equal, visible_changes,
    ChangeKind, FieldDiff,
};
pub use entry::{capitalize, AuditRecord, Operation};
pub use snapshot::{parse_snapshot, parse_snapshot_text, Snapshot};
pub use view::RecordView;
