//! Session store - the authenticated identity and bearer credential.
//!
//! The store is the only state shared across workflows. Every access
//! (`load`, `set`, `clear`, reads) goes through one lock that also covers the
//! storage I/O, so the persisted content and the in-memory flag are never
//! observed in disagreement.

mod storage;

pub use storage::{BaseSessionStorage, FileSessionStorage, MemorySessionStorage};

use std::sync::{Arc, Mutex, MutexGuard};

use avis_client::User;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Session storage errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Authenticated identity plus bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Process-wide session state with an explicit load/set/clear lifecycle.
pub struct SessionStore {
    storage: Arc<dyn BaseSessionStorage>,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Create an empty store over `storage`. Call [`SessionStore::load`] to
    /// pick up a previously persisted session.
    pub fn new(storage: Arc<dyn BaseSessionStorage>) -> Self {
        Self {
            storage,
            current: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reconstruct the session from persisted storage.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let mut current = self.lock();
        let loaded = self.storage.read()?;
        debug!(authenticated = loaded.is_some(), "Session loaded from storage");
        *current = loaded.clone();
        Ok(loaded)
    }

    /// Persist token and user, then expose them.
    ///
    /// If the write fails part way, storage and memory are both rolled back
    /// to "no session" so a later `load` can never pair one account's token
    /// with another account's user.
    pub fn set(&self, session: Session) -> Result<(), SessionError> {
        let mut current = self.lock();
        if let Err(e) = self.storage.write(&session) {
            warn!(error = %e, "Session write failed, discarding session");
            *current = None;
            if let Err(clear_err) = self.storage.clear() {
                error!(error = %clear_err, "Failed to roll back partial session write");
            }
            return Err(e);
        }
        info!(email = %session.user.email, "Session established");
        *current = Some(session);
        Ok(())
    }

    /// Remove all persisted and in-memory session data. Idempotent.
    ///
    /// The in-memory session is dropped even when storage fails, so callers
    /// never keep acting as an identity they asked to forget.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut current = self.lock();
        *current = None;
        self.storage.clear()?;
        debug!("Session cleared");
        Ok(())
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }
}
