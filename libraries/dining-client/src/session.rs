//! Persistent session storage.
//!
//! The session is a single JSON document with two keys, `token` and `user`.
//! Stores never cache: every `get` reads the backing storage, so a write by
//! one component is visible to every other reader immediately.

use crate::error::SessionError;
use dining_core::{Session, SessionUser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Key-value store holding the signed-in session.
pub trait SessionStore: Send + Sync {
    /// Current session, if one is stored
    fn get(&self) -> Option<Session>;

    /// Replace the stored session
    fn set(&self, session: Session) -> Result<(), SessionError>;

    /// Remove the token and profile together
    fn clear(&self) -> Result<(), SessionError>;

    /// Clear the session only while it still holds `token`.
    ///
    /// Returns `true` when this call removed the session. Concurrent
    /// rejections of the same token see `false` after the first one wins.
    fn clear_if(&self, token: &str) -> Result<bool, SessionError>;

    /// Stored bearer token
    fn token(&self) -> Option<String> {
        self.get().map(|s| s.token)
    }
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    token: String,
    user: SessionUser,
}

/// Session store backed by a JSON file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so readers never observe a half-written document and `clear`
/// removes both keys at once.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the session at `path`. Parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_slice::<SessionDocument>(&bytes) {
            Ok(doc) if !doc.token.is_empty() => Some(Session::new(doc.token, doc.user)),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                None
            }
        }
    }

    fn set(&self, session: Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let doc = SessionDocument {
            token: session.token,
            user: session.user,
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;

        let temp = self.temp_path();
        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear_if(&self, token: &str) -> Result<bool, SessionError> {
        if self.token().as_deref() != Some(token) {
            return Ok(false);
        }
        // Unlink is the arbiter: only one remover sees Ok
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, session: Session) -> Result<(), SessionError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn clear_if(&self, token: &str) -> Result<bool, SessionError> {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if session.as_ref().is_some_and(|s| s.token == token) {
            *session = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
