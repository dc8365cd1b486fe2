//! Session handling
//!
//! The authenticated identity (token + username), its durable storage, and
//! the single-flight teardown that runs when the backend rejects it.
//!
//! - **Session**: token and username, always set and cleared together
//! - **SessionStore**: durable key-value home of the session
//! - **SessionManager**: in-memory copy, logout flag, teardown section

mod manager;
mod store;

pub use manager::{SessionEvents, SessionManager, EXPIRED_NOTICE};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

#[cfg(test)]
pub(crate) use manager::test_support;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An authenticated identity
///
/// Both fields are required, so a half-populated session cannot exist.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// Errors from session persistence
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O error at {path:?}: {error}")]
    Io {
        path: std::path::PathBuf,
        error: String,
    },

    #[error("Failed to parse session file {path:?}: {error}")]
    Parse {
        path: std::path::PathBuf,
        error: String,
    },
}
