//! Audit CLI commands
//!
//! Listing, inspection, per-row history and export of audit log entries,
//! plus an offline `diff` that runs the diff engine on two JSON files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Subcommand, ValueEnum};
use tracing::{debug, info};

use super::CliContext;
use crate::api::AuditQuery;
use crate::audit::{compute_field_diffs, parse_snapshot_text, AuditRecord, Operation, Snapshot};
use crate::display::{format_audit_list, format_audit_record, format_field_diffs, format_history};
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::{export_audit_csv, export_audit_json, export_audit_yaml, AuditExport};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV, one row per entry (spreadsheet-compatible)
    Csv,
    /// JSON document with export metadata
    Json,
    /// YAML document with export metadata (human-readable)
    Yaml,
}

/// Filters shared by `audit list` and `audit export`
#[derive(Args, Debug, Clone, Default)]
pub struct AuditFilters {
    /// Only entries for this table
    #[arg(short, long)]
    pub table: Option<String>,

    /// Only entries with this operation (insert, update, delete)
    #[arg(short, long)]
    pub operation: Option<Operation>,

    /// Only entries for this row ID
    #[arg(long)]
    pub row_id: Option<i64>,

    /// Maximum number of entries (1-1000, default from settings)
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Number of entries to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

impl AuditFilters {
    fn to_query(&self, default_limit: u32) -> AuditQuery {
        AuditQuery {
            table_name: self.table.clone(),
            operation: self.operation,
            row_id: self.row_id,
            limit: self.limit.unwrap_or(default_limit),
            offset: self.offset,
        }
    }
}

/// Audit subcommands
#[derive(Subcommand, Debug)]
pub enum AuditCommands {
    /// List audit log entries, newest first
    List {
        #[command(flatten)]
        filters: AuditFilters,
    },
    /// Show one audit log entry with its field changes
    Show {
        /// Audit log entry ID
        id: i64,
    },
    /// Show every change recorded for one row
    History {
        /// Table name (e.g. bets)
        table: String,
        /// Row ID within the table
        row_id: i64,
    },
    /// Compare two JSON snapshots without contacting the server
    Diff {
        /// File holding the old snapshot (omit for a creation)
        #[arg(long)]
        old: Option<PathBuf>,
        /// File holding the new snapshot (omit for a deletion)
        #[arg(long)]
        new: Option<PathBuf>,
        /// Also list unchanged fields
        #[arg(short, long)]
        all: bool,
    },
    /// Export audit log entries to a file or stdout
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: AuditFilters,
    },
}

impl AuditCommands {
    /// Whether the command talks to the backend
    pub fn needs_session(&self) -> bool {
        !matches!(self, AuditCommands::Diff { .. })
    }
}

/// Handle an audit command
pub fn handle_audit_command(ctx: &mut CliContext, cmd: AuditCommands) -> BackofficeResult<()> {
    if cmd.needs_session() {
        ctx.authenticate()?;
    }

    match cmd {
        AuditCommands::List { filters } => {
            let query = filters.to_query(ctx.settings.page_size);
            let records = ctx.request(|client| client.list_audit_logs(&query))?;
            print!(
                "{}",
                format_audit_list(&records, query.has_filters(), Utc::now())
            );
        }

        AuditCommands::Show { id } => {
            let record = ctx.request(|client| client.get_audit_log(id))?;
            if !record.is_consistent() {
                debug!(id, "rendering inconsistent entry as recorded");
            }
            print!("{}", format_audit_record(&record, Utc::now()));
        }

        AuditCommands::History { table, row_id } => {
            let records = ctx.request(|client| client.record_history(&table, row_id))?;
            print!("{}", format_history(&table, row_id, &records, Utc::now()));
        }

        AuditCommands::Export {
            format,
            output,
            filters,
        } => {
            let query = filters.to_query(ctx.settings.page_size);
            let records = ctx.request(|client| client.list_audit_logs(&query))?;
            handle_export(records, format, output.as_deref())?;
        }

        AuditCommands::Diff { old, new, all } => {
            handle_diff(old.as_deref(), new.as_deref(), all)?;
        }
    }

    Ok(())
}

fn handle_diff(old: Option<&Path>, new: Option<&Path>, all: bool) -> BackofficeResult<()> {
    let old = old.map(read_snapshot_file).transpose()?.flatten();
    let new = new.map(read_snapshot_file).transpose()?.flatten();

    if old.is_none() && new.is_none() {
        println!("No data to compare");
        return Ok(());
    }

    let diffs = compute_field_diffs(old.as_ref(), new.as_ref());
    print!("{}", format_field_diffs(&diffs, all));
    Ok(())
}

fn read_snapshot_file(path: &Path) -> BackofficeResult<Option<Snapshot>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        BackofficeError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read snapshot file");
    Ok(parse_snapshot_text(&text))
}

fn handle_export(
    records: Vec<AuditRecord>,
    format: ExportFormat,
    output: Option<&Path>,
) -> BackofficeResult<()> {
    let count = records.len();

    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BackofficeError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(records, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| BackofficeError::Export(e.to_string()))?;

            info!(path = %path.display(), count, "export written");
            println!("Exported {} audit log entries to {}", count, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(records, format, &mut writer)?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    records: Vec<AuditRecord>,
    format: ExportFormat,
    writer: &mut W,
) -> BackofficeResult<()> {
    match format {
        ExportFormat::Csv => export_audit_csv(&records, writer),
        ExportFormat::Json => export_audit_json(&AuditExport::new(records), writer, true),
        ExportFormat::Yaml => export_audit_yaml(&AuditExport::new(records), writer),
    }
}
