//! Audit record data structures
//!
//! Defines the operation kinds and the record format returned by the
//! back-office audit endpoints.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::diff::{compute_field_diffs, FieldDiff};
use super::snapshot::{parse_snapshot, Snapshot};
use crate::error::BackofficeError;

/// Types of operations recorded by the database audit trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Row was inserted
    Insert,
    /// Row was updated
    Update,
    /// Row was deleted
    Delete,
}

impl Operation {
    /// Wire form used by the backend (`INSERT`, `UPDATE`, `DELETE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = BackofficeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Operation::Insert),
            "UPDATE" => Ok(Operation::Update),
            "DELETE" => Ok(Operation::Delete),
            _ => Err(BackofficeError::Validation(format!(
                "Invalid operation: '{}'. Valid operations: insert, update, delete",
                s
            ))),
        }
    }
}

/// A single audit log record
///
/// Records one mutation of one row, with the row state before and after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Audit log primary key
    pub id: i64,

    /// Table the change was made to (e.g. `sports`, `bets`)
    pub table_name: String,

    /// Type of operation performed
    pub operation: Operation,

    /// User that performed the change
    pub username: String,

    /// When the change happened (UTC)
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub changed_at: DateTime<Utc>,

    /// Primary key of the affected row, if known
    #[serde(default)]
    pub row_id: Option<i64>,

    /// Row state before the change (updates/deletes)
    #[serde(default)]
    pub old_data: Option<Value>,

    /// Row state after the change (inserts/updates)
    #[serde(default)]
    pub new_data: Option<Value>,
}

impl AuditRecord {
    /// The `old_data` snapshot, with malformed data downgraded to an empty mapping
    pub fn old_snapshot(&self) -> Option<Snapshot> {
        parse_snapshot(self.old_data.as_ref())
    }

    /// The `new_data` snapshot, with malformed data downgraded to an empty mapping
    pub fn new_snapshot(&self) -> Option<Snapshot> {
        parse_snapshot(self.new_data.as_ref())
    }

    /// Classified per-field differences between the two snapshots
    pub fn field_diffs(&self) -> Vec<FieldDiff> {
        compute_field_diffs(self.old_snapshot().as_ref(), self.new_snapshot().as_ref())
    }

    /// Check that the snapshots present match the operation kind
    ///
    /// Insert: only new; Delete: only old; Update: both.
    pub fn is_consistent(&self) -> bool {
        let has_old = self.old_snapshot().is_some();
        let has_new = self.new_snapshot().is_some();

        let consistent = match self.operation {
            Operation::Insert => !has_old && has_new,
            Operation::Delete => has_old && !has_new,
            Operation::Update => has_old && has_new,
        };

        if !consistent {
            warn!(
                audit_id = self.id,
                operation = %self.operation,
                has_old,
                has_new,
                "audit record snapshots do not match its operation"
            );
        }

        consistent
    }

    /// Capitalized table name for titles (`sports` → `Sports`)
    pub fn table_title(&self) -> String {
        capitalize(&self.table_name)
    }
}

/// Upper-case the first character
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Accept RFC 3339 timestamps as well as naive ISO timestamps (taken as UTC)
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp: '{}'", raw))
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(operation: Operation, old_data: Option<Value>, new_data: Option<Value>) -> AuditRecord {
        AuditRecord {
            id: 1,
            table_name: "sports".into(),
            operation,
            username: "admin".into(),
            changed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            row_id: Some(3),
            old_data,
            new_data,
        }
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Insert.to_string(), "INSERT");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_operation_parse_is_case_insensitive() {
        assert_eq!("insert".parse::<Operation>().unwrap(), Operation::Insert);
        assert_eq!("Update".parse::<Operation>().unwrap(), Operation::Update);
        assert_eq!(" DELETE ".parse::<Operation>().unwrap(), Operation::Delete);
        assert!("upsert".parse::<Operation>().unwrap_err().is_validation());
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let payload = json!({
            "id": 17,
            "table_name": "bets",
            "operation": "UPDATE",
            "username": "admin",
            "changed_at": "2024-05-02T09:15:30.123456",
            "row_id": 42,
            "old_data": {"stake": 10},
            "new_data": {"stake": 25}
        });

        let record: AuditRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.id, 17);
        assert_eq!(record.operation, Operation::Update);
        assert_eq!(record.row_id, Some(42));
        assert_eq!(
            record.changed_at,
            Utc.with_ymd_and_hms(2024, 5, 2, 9, 15, 30).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn test_deserialize_nulls() {
        let payload = json!({
            "id": 2,
            "table_name": "teams",
            "operation": "INSERT",
            "username": "admin",
            "changed_at": "2024-05-02T09:15:30+02:00",
            "row_id": null,
            "old_data": null,
            "new_data": {"name": "Arsenal"}
        });

        let record: AuditRecord = serde_json::from_value(payload).unwrap();
        assert!(record.row_id.is_none());
        assert!(record.old_data.is_none());
        assert_eq!(
            record.changed_at,
            Utc.with_ymd_and_hms(2024, 5, 2, 7, 15, 30).unwrap()
        );
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let payload = json!({
            "id": 2,
            "table_name": "teams",
            "operation": "INSERT",
            "username": "admin",
            "changed_at": "yesterday"
        });
        assert!(serde_json::from_value::<AuditRecord>(payload).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05T08:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05 08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("05/01/2024"), None);
    }

    #[test]
    fn test_consistency_rules() {
        let data = json!({"name": "Tennis"});
        assert!(record(Operation::Insert, None, Some(data.clone())).is_consistent());
        assert!(record(Operation::Delete, Some(data.clone()), None).is_consistent());
        assert!(record(Operation::Update, Some(data.clone()), Some(data.clone())).is_consistent());
        assert!(!record(Operation::Update, None, Some(data.clone())).is_consistent());
        assert!(!record(Operation::Insert, Some(data), None).is_consistent());
    }

    #[test]
    fn test_field_diffs_use_snapshot_policy() {
        let rec = record(
            Operation::Update,
            Some(json!("{\"name\": \"Tennis\"}")),
            Some(json!({"name": "Table Tennis"})),
        );
        let diffs = rec.field_diffs();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].old_value, json!("Tennis"));
    }

    #[test]
    fn test_table_title() {
        assert_eq!(record(Operation::Insert, None, None).table_title(), "Sports");
        assert_eq!(capitalize(""), "");
    }
}
