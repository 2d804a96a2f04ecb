//! Back-office REST API client
//!
//! - `client`: transport, bearer token, error mapping
//! - `auth`: login and token verification (implements `AuthBackend`)
//! - `audit`: audit log listing, lookup and per-row history

pub mod audit;
pub mod auth;
pub mod client;

pub use audit::{validate_table_name, AuditQuery, MAX_LIMIT};
pub use auth::{LoginResponse, VerifyResponse};
pub use client::ApiClient;
