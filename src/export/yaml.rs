//! YAML Export functionality
//!
//! Exports audit records to YAML for human-readable review.

use std::io::Write;

use crate::error::{BackofficeError, BackofficeResult};
use crate::export::json::AuditExport;

/// Write an audit export as YAML with a comment header
pub fn export_audit_yaml<W: Write>(export: &AuditExport, writer: &mut W) -> BackofficeResult<()> {
    writeln!(writer, "# Back office audit log export")
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    writeln!(writer, "# Records: {}", export.record_count)
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BackofficeError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export)?;

    Ok(())
}
