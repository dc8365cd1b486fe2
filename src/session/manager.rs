//! Session Manager
//!
//! Owns the in-memory session, its store, and the logout flag. The flag is
//! only ever set inside the teardown section, so however many requests see a
//! 401 at once, the store is cleared, the user is told, and a reload is
//! requested exactly once. A 401 for a request sent with a token that is no
//! longer current belongs to an earlier session and is ignored.

use super::{Session, SessionError, SessionStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Notice shown when the backend rejects the session
pub const EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

/// Host hooks invoked during unauthorized teardown
pub trait SessionEvents: Send + Sync {
    /// Blocking, user-facing notice. Returns once the user has seen it.
    fn notify_expired(&self, message: &str);

    /// Ask the host to reinitialize all client state
    fn request_reload(&self);
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    events: Arc<dyn SessionEvents>,
    current: RwLock<Option<Session>>,
    logging_out: AtomicBool,
    /// The last teardown could not clear the store
    clear_pending: AtomicBool,
    teardown_lock: Arc<Mutex<()>>,
}

impl SessionManager {
    /// Create a manager, reading any stored session
    pub fn new(store: Arc<dyn SessionStore>, events: Arc<dyn SessionEvents>) -> Self {
        let current = load_or_log(store.as_ref());

        Self {
            store,
            events,
            current: RwLock::new(current),
            logging_out: AtomicBool::new(false),
            clear_pending: AtomicBool::new(false),
            teardown_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Use a caller-supplied lock for the teardown section
    pub fn with_teardown_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.teardown_lock = lock;
        self
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_logged_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// True once unauthorized teardown has begun
    pub fn is_logging_out(&self) -> bool {
        self.logging_out.load(Ordering::SeqCst)
    }

    /// Persist a session from login or account creation
    pub async fn establish(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        self.clear_pending.store(false, Ordering::SeqCst);
        tracing::info!(username = %session.username, "Session established");
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Explicit logout
    pub async fn clear(&self) -> Result<(), SessionError> {
        let mut current = self.current.write().await;
        self.store.clear()?;
        self.clear_pending.store(false, Ordering::SeqCst);
        *current = None;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Tear down after the backend answered 401
    ///
    /// `sent_token` is the token the rejected request carried. Returns `true`
    /// for the one caller that performed the teardown.
    pub async fn handle_unauthorized(&self, sent_token: Option<&str>) -> bool {
        let _guard = self.teardown_lock.lock().await;

        if self.logging_out.load(Ordering::SeqCst) {
            return false;
        }

        let mut current = self.current.write().await;
        if current.as_ref().map(|s| s.token.as_str()) != sent_token {
            tracing::debug!("Ignoring 401 for a superseded session");
            return false;
        }
        self.logging_out.store(true, Ordering::SeqCst);

        *current = None;
        drop(current);
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear stored session");
            self.clear_pending.store(true, Ordering::SeqCst);
        }

        tracing::warn!("Session rejected by server, tearing down");
        self.events.notify_expired(EXPIRED_NOTICE);
        self.events.request_reload();
        true
    }

    /// Reset process state after teardown: clear the logout flag and re-read the store
    ///
    /// If the teardown left the rejected session in the store, the clear is
    /// retried and the result is logged out either way.
    pub async fn reinitialize(&self) {
        let _guard = self.teardown_lock.lock().await;
        let stored = if self.clear_pending.load(Ordering::SeqCst) {
            match self.store.clear() {
                Ok(()) => self.clear_pending.store(false, Ordering::SeqCst),
                Err(e) => tracing::error!(error = %e, "Rejected session is still stored"),
            }
            None
        } else {
            load_or_log(self.store.as_ref())
        };
        *self.current.write().await = stored;
        self.logging_out.store(false, Ordering::SeqCst);
        tracing::debug!("Session state reinitialized");
    }
}

fn load_or_log(store: &dyn SessionStore) -> Option<Session> {
    match store.load() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored session, starting logged out");
            None
        }
    }
}
