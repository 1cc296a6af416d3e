//! Persistence backends for the session.
//!
//! The persisted layout is two independently stored values: the bearer token
//! and the user object. A session is only reconstructed when both are present.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use avis_client::User;
use tracing::debug;

use super::{Session, SessionError};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Storage seam for the session store. Implementations are synchronous and
/// are always called with the store's lock held.
pub trait BaseSessionStorage: Send + Sync {
    /// Read both values. `None` unless token and user are both present.
    fn read(&self) -> Result<Option<Session>, SessionError>;

    /// Persist both values.
    fn write(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove both values. Removing absent values is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

// =============================================================================
// File storage
// =============================================================================

/// Stores `token` and `user.json` in a directory.
///
/// Each value is written to a temporary file and renamed into place, so a
/// reader never observes a partially written value.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    fn write_atomic(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{}.tmp", name));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, self.dir.join(name))
    }
}

fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn remove_optional(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

impl BaseSessionStorage for FileSessionStorage {
    fn read(&self) -> Result<Option<Session>, SessionError> {
        let token = read_optional(&self.token_path())?;
        let user = read_optional(&self.user_path())?;

        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                let user: User = serde_json::from_str(&user)?;
                Ok(Some(Session::new(token, user)))
            }
            (token, user) => {
                debug!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "Persisted session incomplete"
                );
                Ok(None)
            }
        }
    }

    fn write(&self, session: &Session) -> Result<(), SessionError> {
        let user = serde_json::to_vec(&session.user)?;
        // Drop the old token before touching the user, and write the new token
        // last: a failure at any step leaves no token on disk, which reads back
        // as "no session" rather than as a mixed pair.
        remove_optional(&self.token_path())?;
        self.write_atomic(USER_FILE, &user)?;
        self.write_atomic(TOKEN_FILE, session.token.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        // token first, so a failure on the user file still reads back as empty
        remove_optional(&self.token_path())?;
        remove_optional(&self.user_path())?;
        Ok(())
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Volatile storage for tests and ephemeral runs. Counts `clear` calls.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    token: Mutex<Option<String>>,
    user: Mutex<Option<User>>,
    clears: AtomicUsize,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a persisted session (as if saved by an earlier run).
    pub fn with_session(session: Session) -> Self {
        let storage = Self::new();
        *lock(&storage.token) = Some(session.token);
        *lock(&storage.user) = Some(session.user);
        storage
    }

    /// Number of times `clear` has been called.
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Whether anything is currently persisted.
    pub fn is_empty(&self) -> bool {
        lock(&self.token).is_none() && lock(&self.user).is_none()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl BaseSessionStorage for MemorySessionStorage {
    fn read(&self) -> Result<Option<Session>, SessionError> {
        let token = lock(&self.token).clone();
        let user = lock(&self.user).clone();
        Ok(token.zip(user).map(|(token, user)| Session::new(token, user)))
    }

    fn write(&self, session: &Session) -> Result<(), SessionError> {
        *lock(&self.user) = Some(session.user.clone());
        *lock(&self.token) = Some(session.token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *lock(&self.token) = None;
        *lock(&self.user) = None;
        Ok(())
    }
}
