//! Authentication endpoints
//!
//! `POST /api/auth/login` issues a bearer token; `POST /api/auth/verify`
//! checks one.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::client::ApiClient;
use crate::error::{BackofficeError, BackofficeResult};
use crate::session::{AuthBackend, StoredSession};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body of a successful login
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub username: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of a successful token check
#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub username: String,
}

impl AuthBackend for ApiClient {
    fn login(&self, username: &str, password: &str) -> BackofficeResult<StoredSession> {
        let response: LoginResponse = self.post_json(
            "/api/auth/login",
            &LoginRequest { username, password },
        )?;

        if !response.token_type.eq_ignore_ascii_case("bearer") {
            warn!(token_type = %response.token_type, "unexpected token type from login");
        }

        Ok(StoredSession {
            token: response.access_token,
            username: response.username,
        })
    }

    fn verify(&self, token: &str) -> BackofficeResult<String> {
        let response: VerifyResponse = self.post_empty_as("/api/auth/verify", token)?;

        if response.valid {
            Ok(response.username)
        } else {
            Err(BackofficeError::Unauthorized("Token is not valid".into()))
        }
    }
}
