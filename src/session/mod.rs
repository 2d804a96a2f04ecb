//! Session context
//!
//! The session is an explicit object handed to whatever talks to the
//! backend. It moves between three states:
//!
//! - `Anonymous`: no usable token.
//! - `Verifying`: a stored token is being checked against the backend.
//! - `Authenticated`: the token verified (or was just issued by a login).
//!
//! `restore` is the start-up transition, `logout` the explicit teardown, and
//! `invalidate` the forced teardown when any request answers 401.

mod store;

pub use store::{SessionStore, StoredSession};

use tracing::{debug, info, warn};

use crate::error::{BackofficeError, BackofficeResult};

/// The authentication endpoints a session needs
pub trait AuthBackend {
    /// Exchange credentials for a bearer token
    fn login(&self, username: &str, password: &str) -> BackofficeResult<StoredSession>;

    /// Check a bearer token, returning the username it belongs to
    fn verify(&self, token: &str) -> BackofficeResult<String>;
}

/// Where the session currently stands
#[derive(Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Verifying,
    Authenticated { username: String, token: String },
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Anonymous => f.write_str("Anonymous"),
            SessionState::Verifying => f.write_str("Verifying"),
            SessionState::Authenticated { username, .. } => f
                .debug_struct("Authenticated")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Session state plus the file it is persisted to
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    state: SessionState,
}

impl SessionContext {
    /// Create an anonymous context backed by `store`
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { username, .. } => Some(username),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Restore the stored session and verify it
    ///
    /// A token the backend rejects is cleared. A transport failure keeps the
    /// stored token for the next attempt, leaves the context anonymous and
    /// returns the error.
    pub fn restore(&mut self, backend: &impl AuthBackend) -> BackofficeResult<&SessionState> {
        let Some(stored) = self.store.load() else {
            debug!("no stored session");
            self.state = SessionState::Anonymous;
            return Ok(&self.state);
        };

        self.state = SessionState::Verifying;

        match backend.verify(&stored.token) {
            Ok(verified_username) => {
                if verified_username != stored.username {
                    warn!(
                        stored = %stored.username,
                        verified = %verified_username,
                        "stored username differs from token owner"
                    );
                }
                self.state = SessionState::Authenticated {
                    username: verified_username,
                    token: stored.token.clone(),
                };
                Ok(&self.state)
            }
            Err(e) if e.is_unauthorized() => {
                info!("stored session expired; clearing it");
                self.store.clear()?;
                self.state = SessionState::Anonymous;
                Ok(&self.state)
            }
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    /// Log in and persist the issued token
    pub fn login(
        &mut self,
        backend: &impl AuthBackend,
        username: &str,
        password: &str,
    ) -> BackofficeResult<String> {
        let issued = match backend.login(username, password) {
            Ok(issued) => issued,
            Err(e) => {
                warn!(username, "login failed");
                self.state = SessionState::Anonymous;
                return Err(e);
            }
        };

        self.store.save(&issued)?;
        info!(username = %issued.username, "logged in");

        let logged_in = issued.username.clone();
        self.state = SessionState::Authenticated {
            username: issued.username.clone(),
            token: issued.token.clone(),
        };
        Ok(logged_in)
    }

    /// Forget the session
    pub fn logout(&mut self) -> BackofficeResult<()> {
        self.store.clear()?;
        self.state = SessionState::Anonymous;
        Ok(())
    }

    /// Drop the session after the backend rejected its token
    pub fn invalidate(&mut self) -> BackofficeResult<()> {
        warn!("backend rejected the session token; logging out");
        self.logout()
    }

    /// Pass a request result through, invalidating the session on a 401
    pub fn observe<T>(&mut self, result: BackofficeResult<T>) -> BackofficeResult<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.invalidate()?;
            }
        }
        result
    }

    /// The token, or `NotAuthenticated`
    pub fn require_token(&self) -> BackofficeResult<&str> {
        self.token().ok_or(BackofficeError::NotAuthenticated)
    }
}
