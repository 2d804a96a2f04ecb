//! Blocking HTTP client for the back-office REST API
//!
//! Wraps a `ureq` agent with the base URL and bearer token, and maps
//! FastAPI error responses onto `BackofficeError`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::{BackofficeError, BackofficeResult};

/// Client for one backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    agent: Agent,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` with a global per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        // Status codes are mapped by `decode`, not surfaced as transport errors
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
            token: None,
        }
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>, token: Option<&str>) -> RequestBuilder<B> {
        match token.or(self.token.as_deref()) {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// GET `path` with query parameters and decode the JSON body
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> BackofficeResult<T> {
        let url = self.url(path);
        debug!(method = "GET", %url, params = query.len(), "api request");

        let mut request = self.authorize(self.agent.get(&url), None);
        for (key, value) in query {
            request = request.query(*key, value);
        }

        decode(request.call()?)
    }

    /// POST a JSON body to `path` and decode the JSON response
    pub(crate) fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> BackofficeResult<T> {
        let url = self.url(path);
        debug!(method = "POST", %url, "api request");

        let request = self.authorize(self.agent.post(&url), None);
        decode(request.send_json(body)?)
    }

    /// POST without a body, authorized with `token` instead of the client's own
    pub(crate) fn post_empty_as<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> BackofficeResult<T> {
        let url = self.url(path);
        debug!(method = "POST", %url, "api request");

        let request = self.authorize(self.agent.post(&url), Some(token));
        decode(request.send_empty()?)
    }
}

/// Map a response onto the decoded body or a typed error
fn decode<T: DeserializeOwned>(mut response: Response<Body>) -> BackofficeResult<T> {
    let status = response.status();
    debug!(status = status.as_u16(), "api response");

    if status.is_success() {
        return response.body_mut().read_json::<T>().map_err(|e| {
            BackofficeError::Json(format!("Failed to decode response: {}", e))
        });
    }

    let body = response.body_mut().read_to_string().unwrap_or_default();
    let detail = error_detail(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string());

    Err(match status.as_u16() {
        401 => BackofficeError::Unauthorized(detail),
        code => BackofficeError::Api {
            status: code,
            detail,
        },
    })
}

/// Extract FastAPI's `detail` field from an error body
///
/// `detail` is a string for `HTTPException`s and a list of
/// `{loc, msg, type}` objects for request validation failures.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            Some(messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}
