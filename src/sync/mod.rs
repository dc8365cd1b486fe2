//! Synchronization
//!
//! Keeps local client state in step with the chat backend.
//!
//! ## Architecture
//!
//! - **ClientState**: selected room, room list, messages of the selected room
//! - **SyncCore**: intents (select, send, create) and guarded refreshes
//! - **Poller**: periodic refresh while a session exists
//!
//! ## Data Flow
//!
//! 1. An intent or poll tick starts a fetch through the backend client
//! 2. The fetch remembers which room it was for
//! 3. On arrival the result is applied only if that room is still selected
//! 4. Subscribers receive the new snapshot

mod engine;
mod poller;
mod state;

pub use engine::SyncCore;
pub use poller::Poller;
pub use state::ClientState;

use crate::api::ApiError;
use thiserror::Error;

/// Errors from sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("No room selected")]
    NoRoomSelected,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::api::{ApiError, ApiResult, ChatBackend, Message, Room};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    pub fn room(id: &str) -> Room {
        Room {
            id: id.to_string(),
            name: format!("room {}", id),
        }
    }

    pub fn message(id: &str, content: &str) -> Message {
        Message {
            id: id.to_string(),
            content: content.to_string(),
            author: "alice".to_string(),
            created_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    /// In-memory backend whose message fetches can be held open per room
    #[derive(Default)]
    pub struct FakeBackend {
        rooms: Mutex<Vec<Room>>,
        messages: Mutex<HashMap<String, Vec<Message>>>,
        gates: Mutex<HashMap<String, Arc<Notify>>>,
        sent: Mutex<Vec<(String, String)>>,
        fail_sends: AtomicBool,
        room_fetches: AtomicUsize,
        message_fetches: AtomicUsize,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_rooms(&self, rooms: Vec<Room>) {
            *self.rooms.lock().unwrap() = rooms;
        }

        pub fn set_messages(&self, room_id: &str, messages: Vec<Message>) {
            self.messages
                .lock()
                .unwrap()
                .insert(room_id.to_string(), messages);
        }

        /// Hold the next message fetch for `room_id` until the returned handle is notified
        pub fn gate(&self, room_id: &str) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(room_id.to_string(), gate.clone());
            gate
        }

        pub fn fail_sends(&self) {
            self.fail_sends.store(true, Ordering::SeqCst);
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn room_fetches(&self) -> usize {
            self.room_fetches.load(Ordering::SeqCst)
        }

        pub fn message_fetches(&self) -> usize {
            self.message_fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn list_rooms(&self) -> ApiResult<Vec<Room>> {
            self.room_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.rooms.lock().unwrap().clone())
        }

        async fn create_room(&self, name: &str) -> ApiResult<()> {
            let mut rooms = self.rooms.lock().unwrap();
            let id = format!("room-{}", rooms.len() + 1);
            rooms.push(Room {
                id,
                name: name.to_string(),
            });
            Ok(())
        }

        async fn list_messages(&self, room_id: &str) -> ApiResult<Vec<Message>> {
            self.message_fetches.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap().remove(room_id);
            if let Some(gate) = gate {
                gate.notified().await;
            }
            Ok(self
                .messages
                .lock()
                .unwrap()
                .get(room_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn send_message(&self, room_id: &str, content: &str) -> ApiResult<()> {
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "send failed".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((room_id.to_string(), content.to_string()));
            self.messages
                .lock()
                .unwrap()
                .entry(room_id.to_string())
                .or_default()
                .push(message(&format!("sent-{}", content), content));
            Ok(())
        }
    }
}
