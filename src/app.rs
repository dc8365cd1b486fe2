//! Application host
//!
//! Wires the session, the gateway, the chat client, the sync core and the
//! poller together, and owns the session lifecycle transitions: login,
//! explicit logout, and the full reinitialization that follows a rejected
//! session.

use crate::api::{AccountApi, ChatClient, Gateway, GatewayError};
use crate::config::Config;
use crate::session::{Session, SessionError, SessionEvents, SessionManager, SessionStore};
use crate::sync::{Poller, SyncCore};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to build HTTP client: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct App {
    config: Config,
    session: Arc<SessionManager>,
    client: Arc<ChatClient>,
    sync: Arc<SyncCore>,
    poller: Poller,
}

impl App {
    pub fn new(
        config: Config,
        store: Arc<dyn SessionStore>,
        events: Arc<dyn SessionEvents>,
    ) -> Result<Self, AppError> {
        let session = Arc::new(SessionManager::new(store, events));
        let gateway = Arc::new(Gateway::new(&config.api, session.clone())?);
        let client = Arc::new(ChatClient::new(gateway));
        let sync = Arc::new(SyncCore::new(client.clone(), session.clone()));
        let poller = Poller::new(sync.clone(), config.sync.poll_interval());

        tracing::debug!(base_url = %config.api.base_url, "Application assembled");

        Ok(Self {
            config,
            session,
            client,
            sync,
            poller,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn sync(&self) -> &Arc<SyncCore> {
        &self.sync
    }

    pub fn accounts(&self) -> &dyn AccountApi {
        self.client.as_ref()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Start polling if a session exists. Returns whether it did.
    pub async fn start(&self) -> bool {
        if self.session.is_logged_in().await {
            self.poller.start();
            true
        } else {
            false
        }
    }

    /// Persist a fresh session and begin polling
    pub async fn login_succeeded(&self, session: Session) -> Result<(), AppError> {
        self.session.establish(session).await?;
        self.poller.start();
        Ok(())
    }

    /// Explicit logout
    pub async fn logout(&self) -> Result<(), AppError> {
        self.poller.stop();
        self.sync.reset().await;
        self.session.clear().await?;
        Ok(())
    }

    /// Rebuild client state from storage, as a fresh start would
    ///
    /// Run this once the host sees a reload request after a rejected session.
    pub async fn reinitialize(&self) {
        self.poller.stop();
        self.sync.reset().await;
        self.session.reinitialize().await;

        if self.start().await {
            tracing::info!("Reinitialized with stored session");
        } else {
            tracing::info!("Reinitialized logged out");
        }
    }
}
