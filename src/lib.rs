//! backoffice - audit log client for a sports-betting back office
//!
//! This library provides the core of the `backoffice` command-line client:
//! a field-level diff engine over audit snapshots, a blocking client for the
//! back-office REST API, and the session that carries its bearer token.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `audit`: Audit record model, snapshot parsing and the diff engine
//! - `api`: REST client (authentication and audit endpoints)
//! - `session`: Persisted session and its state machine
//! - `display`: Terminal formatting for audit entries
//! - `export`: CSV, JSON and YAML export
//! - `config`: Configuration and path management
//! - `logging`: `tracing` subscriber setup
//! - `error`: Custom error types
//! - `cli`: Command handlers used by the binary
//!
//! # Example
//!
//! ```rust
//! use backoffice::audit::{compute_field_diffs, parse_snapshot_text, visible_changes};
//!
//! let old = parse_snapshot_text(r#"{"stake": 10, "odds": 2.5}"#);
//! let new = parse_snapshot_text(r#"{"stake": 20, "odds": 2.5}"#);
//! let diffs = compute_field_diffs(old.as_ref(), new.as_ref());
//!
//! assert_eq!(visible_changes(&diffs).len(), 1);
//! ```

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod session;

pub use error::{BackofficeError, BackofficeResult};
