//! # Roomchat
//!
//! Client for a room-based chat backend: authenticated REST access,
//! session-expiry handling, and polling synchronization of rooms and
//! messages, with a terminal front end.
//!
//! ## Modules
//!
//! - [`api`]: Request gateway and typed room/message/account clients
//! - [`session`]: Session persistence and single-flight teardown on 401
//! - [`sync`]: Client state, guarded refreshes, and the poller
//! - [`ui`]: Follow mode, message list, room list, and login form
//! - [`app`]: Wiring and session lifecycle
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomchat::{App, Config, FileSessionStore, SessionEvents};
//! use std::sync::Arc;
//!
//! struct Quiet;
//!
//! impl SessionEvents for Quiet {
//!     fn notify_expired(&self, message: &str) {
//!         eprintln!("{}", message);
//!     }
//!
//!     fn request_reload(&self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = Arc::new(FileSessionStore::new(&config.session.path));
//!     let app = App::new(config, store, Arc::new(Quiet))?;
//!
//!     let session = app.accounts().login("alice", "secret").await?;
//!     app.login_succeeded(session).await?;
//!
//!     app.sync().refresh_rooms().await?;
//!     app.sync().send_message("hello").await?;
//!
//!     let state = app.sync().snapshot().await;
//!     println!("{} rooms", state.rooms.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod session;
pub mod sync;
pub mod ui;

pub use api::{
    AccountApi, ApiError, ApiResult, AuthError, ChatBackend, ChatClient, Gateway, GatewayError,
    Message, Room, RoomId,
};

pub use app::{App, AppError};

pub use config::{Config, ConfigError};

pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionError, SessionEvents, SessionManager,
    SessionStore, EXPIRED_NOTICE,
};

pub use sync::{ClientState, Poller, SyncCore, SyncError, SyncResult};
