//! Audit log endpoints

use crate::audit::{AuditRecord, Operation};
use crate::error::{BackofficeError, BackofficeResult};

use super::client::ApiClient;

/// Largest page the backend will return
pub const MAX_LIMIT: u32 = 1000;

/// Filters and paging for `GET /api/audit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    pub table_name: Option<String>,
    pub operation: Option<Operation>,
    pub row_id: Option<i64>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            table_name: None,
            operation: None,
            row_id: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl AuditQuery {
    /// Reject queries the backend would refuse
    pub fn validate(&self) -> BackofficeResult<()> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(BackofficeError::Validation(format!(
                "Limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }
        if let Some(table) = &self.table_name {
            validate_table_name(table)?;
        }
        Ok(())
    }

    /// Whether any filter (not paging) is set
    pub fn has_filters(&self) -> bool {
        self.table_name.is_some() || self.operation.is_some() || self.row_id.is_some()
    }

    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(table) = &self.table_name {
            pairs.push(("table_name", table.clone()));
        }
        if let Some(operation) = self.operation {
            pairs.push(("operation", operation.as_str().to_string()));
        }
        if let Some(row_id) = self.row_id {
            pairs.push(("row_id", row_id.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

/// Table names go into URL paths, so only identifiers are accepted
pub fn validate_table_name(table: &str) -> BackofficeResult<()> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(BackofficeError::Validation(format!(
            "Invalid table name: '{}'",
            table
        )))
    }
}

impl ApiClient {
    /// List audit records, newest first
    pub fn list_audit_logs(&self, query: &AuditQuery) -> BackofficeResult<Vec<AuditRecord>> {
        query.validate()?;
        self.get_json("/api/audit", &query.to_query_pairs())
    }

    /// Fetch a single audit record
    pub fn get_audit_log(&self, id: i64) -> BackofficeResult<AuditRecord> {
        self.get_json(&format!("/api/audit/{}", id), &[])
            .map_err(|e| match e {
                BackofficeError::Api { status: 404, .. } => {
                    BackofficeError::audit_log_not_found(id.to_string())
                }
                other => other,
            })
    }

    /// All audit records for one row, newest first
    pub fn record_history(&self, table: &str, row_id: i64) -> BackofficeResult<Vec<AuditRecord>> {
        validate_table_name(table)?;
        self.get_json(&format!("/api/audit/table/{}/row/{}", table, row_id), &[])
    }
}
