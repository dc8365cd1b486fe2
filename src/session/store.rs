//! Durable session storage
//!
//! Two keys, `token` and `username`. Presence of both means logged in.

use super::{Session, SessionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Durable home of the session
pub trait SessionStore: Send + Sync {
    /// Read the stored session, `None` when logged out
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Store both keys
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove both keys
    fn clear(&self) -> Result<(), SessionError>;
}

/// On-disk layout: each key optional so a damaged file can still be read
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredKeys {
    token: Option<String>,
    username: Option<String>,
}

/// TOML file session store
///
/// Writes go through a temporary file and a rename so a crash never leaves
/// one key without the other.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, error: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            error: error.to_string(),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let keys: StoredKeys = toml::from_str(&content).map_err(|e| SessionError::Parse {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        match (keys.token, keys.username) {
            (Some(token), Some(username)) => Ok(Some(Session { token, username })),
            (None, None) => Ok(None),
            _ => {
                tracing::warn!(path = ?self.path, "Session file holds only one key, treating as logged out");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let keys = StoredKeys {
            token: Some(session.token.clone()),
            username: Some(session.username.clone()),
        };
        let content = toml::to_string(&keys).map_err(|e| SessionError::Parse {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("toml.tmp");
        let mut file = fs::File::create(&tmp_path).map_err(|e| self.io_error(e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory session store that also counts clears
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
    clears: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            clears: AtomicUsize::new(0),
        }
    }

    /// Number of times `clear` ran
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.toml"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.toml"));

        store.save(&Session::new("tok", "alice")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.username, "alice");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_half_written_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "token = \"tok\"\n").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "token = [").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Parse { .. })));
    }

    #[test]
    fn test_memory_store_counts_clears() {
        let store = MemorySessionStore::with_session(Session::new("tok", "alice"));
        assert!(store.load().unwrap().is_some());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.clear_count(), 1);
    }
}
