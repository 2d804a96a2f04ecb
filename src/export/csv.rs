//! CSV Export functionality
//!
//! One row per audit record; snapshots are embedded as compact JSON.

use std::io::Write;

use crate::audit::{summarize_changes, AuditRecord};
use crate::error::BackofficeResult;

const HEADER: [&str; 9] = [
    "id",
    "changed_at",
    "operation",
    "table_name",
    "row_id",
    "username",
    "changes",
    "old_data",
    "new_data",
];

/// Export audit records to CSV
pub fn export_audit_csv<W: Write>(records: &[AuditRecord], writer: W) -> BackofficeResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for record in records {
        let changes = summarize_changes(&record.field_diffs()).unwrap_or_default();
        let old_data = record.old_data.as_ref().map(|v| v.to_string()).unwrap_or_default();
        let new_data = record.new_data.as_ref().map(|v| v.to_string()).unwrap_or_default();

        csv_writer.write_record([
            record.id.to_string(),
            record.changed_at.to_rfc3339(),
            record.operation.to_string(),
            record.table_name.clone(),
            record.row_id.map(|id| id.to_string()).unwrap_or_default(),
            record.username.clone(),
            changes,
            old_data,
            new_data,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
