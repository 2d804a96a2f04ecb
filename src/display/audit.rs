//! Audit display formatting
//!
//! Formats audit records for terminal output: the list table, the detail
//! view of one record, a row's history, and plain field diffs.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::{
    capitalize, format_value, summarize_changes, AuditRecord, ChangeKind, FieldDiff, Operation,
    RecordView, Snapshot,
};

const SUMMARY_WIDTH: usize = 60;

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Operation")]
    operation: Operation,
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Row ID")]
    row_id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Changes")]
    changes: String,
}

/// Format a list of audit records as a table
pub fn format_audit_list(records: &[AuditRecord], filtered: bool, now: DateTime<Utc>) -> String {
    if records.is_empty() {
        let hint = if filtered {
            "Try adjusting your filters."
        } else {
            "No changes have been recorded yet."
        };
        return format!("No audit logs found.\n{}\n", hint);
    }

    let rows: Vec<AuditRow> = records
        .iter()
        .map(|record| AuditRow {
            time: format_relative_time(record.changed_at, now),
            operation: record.operation,
            table: record.table_name.clone(),
            row_id: format_row_id(record.row_id),
            user: record.username.clone(),
            id: record.id,
            changes: list_summary(record),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!("{}\n{} record(s)\n", table, records.len())
}

fn list_summary(record: &AuditRecord) -> String {
    let summary = match record.operation {
        Operation::Insert => "created".to_string(),
        Operation::Delete => "deleted".to_string(),
        Operation::Update => summarize_changes(&record.field_diffs())
            .unwrap_or_else(|| "no field changes".to_string()),
    };
    truncate(&summary, SUMMARY_WIDTH)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn format_row_id(row_id: Option<i64>) -> String {
    row_id.map_or_else(|| "—".to_string(), |id| id.to_string())
}

/// Format one audit record with its changes
pub fn format_audit_record(record: &AuditRecord, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "[{}] {} #{} (audit #{})\n",
        record.operation,
        record.table_title(),
        format_row_id(record.row_id),
        record.id
    ));
    output.push_str(&format!("  User: {}\n", record.username));
    output.push_str(&format!(
        "  Time: {} ({})\n",
        format_relative_time(record.changed_at, now),
        record.changed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push('\n');

    let view = RecordView::for_record(record);
    let change_count = view.change_count();
    match view {
        RecordView::Created(snapshot) => {
            output.push_str("Created Data\n");
            output.push_str(&format_snapshot(&snapshot));
        }
        RecordView::Deleted(snapshot) => {
            output.push_str("Deleted Data\n");
            output.push_str(&format_snapshot(&snapshot));
        }
        RecordView::FieldChanges(changes) => {
            output.push_str(&format!("Field Changes ({})\n", change_count));
            for diff in &changes {
                output.push_str(&format_field_change(diff));
            }
        }
        RecordView::NoFieldChanges => output.push_str("No field changes detected\n"),
        RecordView::NoData => output.push_str("No data recorded\n"),
    }

    output
}

/// Format every record of a row's history, newest first
pub fn format_history(
    table: &str,
    row_id: i64,
    records: &[AuditRecord],
    now: DateTime<Utc>,
) -> String {
    let title = format!("Audit History - {} #{}", capitalize(table), row_id);
    let mut output = format!("{}\n{}\n", title, "=".repeat(title.chars().count()));

    if records.is_empty() {
        output.push_str("No audit history\n");
        output.push_str("No changes have been recorded for this record yet.\n");
        return output;
    }

    let rendered: Vec<String> = records
        .iter()
        .map(|record| format_audit_record(record, now))
        .collect();
    output.push_str(&rendered.join("\n"));

    output
}

/// Format a raw diff list, optionally including unchanged fields
pub fn format_field_diffs(diffs: &[FieldDiff], include_unchanged: bool) -> String {
    let shown: Vec<&FieldDiff> = diffs
        .iter()
        .filter(|d| include_unchanged || d.change.is_visible())
        .collect();
    let changed = diffs.iter().filter(|d| d.change.is_visible()).count();

    if changed == 0 && !include_unchanged {
        return "No field changes detected\n".to_string();
    }

    let mut output = format!("Field Changes ({})\n", changed);
    for diff in shown {
        output.push_str(&format_field_change(diff));
    }
    if changed == 0 {
        output.push_str("No field changes detected\n");
    }
    output
}

fn format_field_change(diff: &FieldDiff) -> String {
    let mut output = format!("  {} [{}]\n", humanize_key(&diff.key), diff.change);

    match diff.change {
        ChangeKind::Added => output.push_str(&labelled_value("New", &diff.new_value)),
        ChangeKind::Removed => output.push_str(&labelled_value("Old", &diff.old_value)),
        ChangeKind::Changed => {
            output.push_str(&labelled_value("Old", &diff.old_value));
            output.push_str(&labelled_value("New", &diff.new_value));
        }
        ChangeKind::Unchanged => output.push_str(&labelled_value("Value", &diff.new_value)),
    }

    output
}

/// `    Old: value`, with multi-line values indented under the label
fn labelled_value(label: &str, value: &Value) -> String {
    let formatted = format_value(value);
    let mut lines = formatted.lines();
    let first = lines.next().unwrap_or_default();

    let mut output = format!("    {}: {}\n", label, first);
    let continuation = " ".repeat(label.len() + 6);
    for line in lines {
        output.push_str(&continuation);
        output.push_str(line);
        output.push('\n');
    }
    output
}

fn format_snapshot(snapshot: &Snapshot) -> String {
    let pretty = serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string());
    pretty.lines().map(|line| format!("  {}\n", line)).collect()
}

/// `row_id` → `Row Id`
pub fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut output = String::with_capacity(spaced.len());
    let mut at_word_start = true;

    for c in spaced.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                output.extend(c.to_uppercase());
            } else {
                output.push(c);
            }
            at_word_start = false;
        } else {
            output.push(c);
            at_word_start = true;
        }
    }

    output
}

/// "Just now", "5 minutes ago", "3 hours ago", "2 days ago", or a date
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        ts.format("%b %-d, %Y %H:%M").to_string()
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn record(operation: Operation, old_data: Option<Value>, new_data: Option<Value>) -> AuditRecord {
        AuditRecord {
            id: 12,
            table_name: "bets".into(),
            operation,
            username: "admin".into(),
            changed_at: now() - Duration::minutes(5),
            row_id: Some(7),
            old_data,
            new_data,
        }
    }

    #[test]
    fn test_relative_time() {
        let now = now();
        assert_eq!(format_relative_time(now, now), "Just now");
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(1), now), "1 day ago");
        assert_eq!(format_relative_time(now - Duration::days(10), now), "May 31, 2024 12:00");
        assert_eq!(format_relative_time(now + Duration::hours(2), now), "Just now");
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("row_id"), "Row Id");
        assert_eq!(humanize_key("stake"), "Stake");
        assert_eq!(humanize_key("placement_data"), "Placement Data");
        assert_eq!(humanize_key("odds2x_value"), "Odds2x Value");
    }

    #[test]
    fn test_update_record_shows_changes() {
        let rec = record(
            Operation::Update,
            Some(json!({"stake": 10, "status": "open", "odds": 1.8})),
            Some(json!({"stake": 25, "status": "open", "odds": 1.8, "settled": true})),
        );

        let output = format_audit_record(&rec, now());
        assert!(output.contains("[UPDATE] Bets #7 (audit #12)"));
        assert!(output.contains("User: admin"));
        assert!(output.contains("5 minutes ago"));
        assert!(output.contains("Field Changes (2)"));
        assert!(output.contains("Stake [Changed]"));
        assert!(output.contains("Settled [Added]"));
        assert!(!output.contains("Status"));

        let old_pos = output.find("Old: 10").unwrap();
        let new_pos = output.find("New: 25").unwrap();
        assert!(old_pos < new_pos);
    }

    #[test]
    fn test_update_without_changes() {
        let data = json!({"stake": 10});
        let rec = record(Operation::Update, Some(data.clone()), Some(data));
        assert!(format_audit_record(&rec, now()).contains("No field changes detected"));
    }

    #[test]
    fn test_insert_shows_created_data() {
        let rec = record(Operation::Insert, None, Some(json!({"stake": 10, "status": "open"})));
        let output = format_audit_record(&rec, now());

        assert!(output.contains("Created Data"));
        assert!(output.contains("\"stake\": 10"));
        assert!(!output.contains("Field Changes"));
    }

    #[test]
    fn test_delete_shows_deleted_data() {
        let rec = record(Operation::Delete, Some(json!({"stake": 10})), None);
        let output = format_audit_record(&rec, now());

        assert!(output.contains("Deleted Data"));
        assert!(output.contains("\"stake\": 10"));
    }

    #[test]
    fn test_nested_value_is_indented() {
        let rec = record(
            Operation::Update,
            Some(json!({"prefs": {"odds": "decimal"}})),
            Some(json!({"prefs": {"odds": "fractional"}})),
        );
        let output = format_audit_record(&rec, now());

        assert!(output.contains("    Old: {\n"));
        assert!(output.contains("           \"odds\": \"decimal\"\n"));
    }

    #[test]
    fn test_list_table() {
        let records = vec![
            record(
                Operation::Update,
                Some(json!({"stake": 10})),
                Some(json!({"stake": 20})),
            ),
            AuditRecord {
                id: 11,
                row_id: None,
                ..record(Operation::Insert, None, Some(json!({"stake": 10})))
            },
        ];

        let output = format_audit_list(&records, false, now());
        assert!(output.contains("Operation"));
        assert!(output.contains("UPDATE"));
        assert!(output.contains("stake: 10 -> 20"));
        assert!(output.contains("created"));
        assert!(output.contains("—"));
        assert!(output.contains("2 record(s)"));
    }

    #[test]
    fn test_list_column_order() {
        let rec = record(Operation::Update, Some(json!({"stake": 10})), Some(json!({"stake": 20})));
        let output = format_audit_list(&[rec], false, now());

        let header: Vec<&str> = output
            .lines()
            .next()
            .unwrap()
            .split('|')
            .map(str::trim)
            .collect();
        assert_eq!(
            header,
            vec!["Time", "Operation", "Table", "Row ID", "User", "ID", "Changes"]
        );
    }

    #[test]
    fn test_empty_list_messages() {
        assert!(format_audit_list(&[], true, now()).contains("Try adjusting your filters."));
        assert!(format_audit_list(&[], false, now()).contains("No changes have been recorded yet."));
    }

    #[test]
    fn test_history() {
        let rec = record(Operation::Delete, Some(json!({"stake": 10})), None);
        let output = format_history("bets", 7, &[rec], now());
        assert!(output.starts_with("Audit History - Bets #7\n"));
        assert!(output.contains("Deleted Data"));

        let empty = format_history("bets", 7, &[], now());
        assert!(empty.contains("No audit history"));
    }

    #[test]
    fn test_field_diffs_listing() {
        let diffs = vec![
            FieldDiff {
                key: "name".into(),
                old_value: json!("A"),
                new_value: json!("A"),
                change: ChangeKind::Unchanged,
            },
            FieldDiff {
                key: "note".into(),
                old_value: json!("x"),
                new_value: Value::Null,
                change: ChangeKind::Removed,
            },
        ];

        let visible = format_field_diffs(&diffs, false);
        assert!(visible.contains("Field Changes (1)"));
        assert!(visible.contains("Note [Removed]\n    Old: x"));
        assert!(!visible.contains("Name"));

        let all = format_field_diffs(&diffs, true);
        assert!(all.contains("Name [Unchanged]\n    Value: A"));
    }

    #[test]
    fn test_field_diffs_nothing_changed() {
        assert_eq!(format_field_diffs(&[], false), "No field changes detected\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
