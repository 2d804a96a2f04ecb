//! JSON Export functionality
//!
//! Exports fetched audit records to JSON with export metadata.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditRecord;
use crate::error::{BackofficeError, BackofficeResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Client version that created the export
    pub app_version: String,

    /// Number of records in `records`
    pub record_count: usize,

    /// The exported records, in the order the backend returned them
    pub records: Vec<AuditRecord>,
}

impl AuditExport {
    pub fn new(records: Vec<AuditRecord>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            record_count: records.len(),
            records,
        }
    }
}

/// Write an audit export as JSON
pub fn export_audit_json<W: Write>(
    export: &AuditExport,
    writer: &mut W,
    pretty: bool,
) -> BackofficeResult<()> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    };
    written.map_err(|e| BackofficeError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| BackofficeError::Export(e.to_string()))?;
    Ok(())
}
