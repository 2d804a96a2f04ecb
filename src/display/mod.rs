//! Display formatting for terminal output
//!
//! Provides utilities for formatting audit data for terminal display,
//! including tables, relative times and field change blocks.

pub mod audit;

pub use audit::{
    format_audit_list, format_audit_record, format_field_diffs, format_history,
    format_relative_time, humanize_key,
};
