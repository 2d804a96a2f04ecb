//! Export module for audit records
//!
//! - CSV: one row per record (spreadsheet-compatible)
//! - JSON: machine-readable export with metadata
//! - YAML: human-readable export with metadata

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_audit_csv;
pub use self::json::{export_audit_json, AuditExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_audit_yaml;
