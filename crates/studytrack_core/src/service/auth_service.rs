//! Local session service.
//!
//! # Responsibility
//! - Accept any non-blank email/password pair and remember the email.
//! - Restore, expose and clear the persisted session.
//! - Act as the identity provider for per-identity storage slots.
//!
//! # Invariants
//! - Passwords are never stored or logged.
//! - A corrupt session slot is treated as logged out.

use crate::config::AppConfig;
use crate::model::session::{AuthUser, IdentityProvider};
use crate::storage::{KeyValueStore, StorageError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Login failure surfaced to the caller for display.
#[derive(Debug)]
pub enum AuthError {
    /// Email or password was blank after trimming.
    MissingCredentials,
    /// The session could not be written.
    Storage(StorageError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Email and password are required."),
            Self::Storage(err) => write!(f, "failed to persist session: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingCredentials => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Session holder over a key-value store.
pub struct AuthService<S: KeyValueStore> {
    storage: S,
    session_key: String,
    user: Option<AuthUser>,
}

impl<S: KeyValueStore> AuthService<S> {
    /// Creates the service and restores any persisted session.
    pub fn new(storage: S, config: &AppConfig) -> Self {
        let session_key = config.auth_key();
        let user = restore_session(&storage, &session_key);
        Self {
            storage,
            session_key,
            user,
        }
    }

    /// Starts a session for `email`.
    ///
    /// # Errors
    /// - `MissingCredentials` when either value is blank.
    /// - `Storage` when the session slot cannot be written.
    pub fn login(&mut self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = AuthUser {
            email: email.to_string(),
        };
        let payload = serde_json::to_string(&user)
            .map_err(|err| AuthError::Storage(StorageError::Unavailable(err.to_string())))?;
        self.storage.set(&self.session_key, &payload)?;
        self.user = Some(user.clone());
        info!("event=login module=auth status=ok");
        Ok(user)
    }

    /// Ends the session. Storage failures are logged; memory state is always cleared.
    pub fn logout(&mut self) {
        self.user = None;
        if let Err(err) = self.storage.remove(&self.session_key) {
            warn!("event=logout module=auth status=error error_code=remove_failed error={err}");
            return;
        }
        info!("event=logout module=auth status=ok");
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl<S: KeyValueStore> IdentityProvider for AuthService<S> {
    fn current_identity(&self) -> Option<String> {
        self.user.as_ref().map(|user| user.email.clone())
    }
}

fn restore_session<S: KeyValueStore>(storage: &S, key: &str) -> Option<AuthUser> {
    let stored = match storage.get(key) {
        Ok(stored) => stored?,
        Err(err) => {
            warn!("event=session_restore module=auth status=error error_code=read_failed error={err}");
            return None;
        }
    };
    match serde_json::from_str::<AuthUser>(&stored) {
        Ok(user) => Some(user),
        Err(_) => {
            warn!("event=session_restore module=auth status=error error_code=malformed_session");
            None
        }
    }
}
