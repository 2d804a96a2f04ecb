//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the API client and session.

pub mod audit;
pub mod auth;
pub mod config;

pub use audit::{handle_audit_command, AuditCommands, ExportFormat};
pub use auth::{handle_login, handle_logout, handle_whoami};
pub use config::{handle_config_command, ConfigCommands};

use tracing::debug;

use crate::api::ApiClient;
use crate::config::{BackofficePaths, Settings};
use crate::error::BackofficeResult;
use crate::session::{SessionContext, SessionStore};

/// Everything a command needs to talk to the backend
#[derive(Debug)]
pub struct CliContext {
    pub client: ApiClient,
    pub session: SessionContext,
    pub settings: Settings,
}

impl CliContext {
    /// Build an anonymous context; nothing is sent until a command needs it
    pub fn new(paths: &BackofficePaths, settings: Settings, api_url: Option<&str>) -> Self {
        let base_url = settings.effective_api_url(api_url);
        debug!(%base_url, "using backend");

        let client = ApiClient::new(base_url, settings.request_timeout());
        let session = SessionContext::new(SessionStore::new(paths.session_file()));

        Self {
            client,
            session,
            settings,
        }
    }

    /// Restore and verify the stored session, failing when anonymous
    pub fn authenticate(&mut self) -> BackofficeResult<()> {
        self.session.restore(&self.client)?;
        let token = self.session.require_token()?.to_string();
        self.client.set_token(Some(token));
        Ok(())
    }

    /// Run a backend call, dropping the session if it answers 401
    pub fn request<T>(
        &mut self,
        call: impl FnOnce(&ApiClient) -> BackofficeResult<T>,
    ) -> BackofficeResult<T> {
        let result = call(&self.client);
        self.session.observe(result)
    }
}
