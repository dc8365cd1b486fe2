//! Sync Core
//!
//! Applies fetched rooms and messages to [`ClientState`]. Every fetch records
//! what it was for before awaiting, and the result is checked again under the
//! write lock once it arrives: a message list for a room that is no longer
//! selected, or anything that lands after session teardown began, is dropped.

use super::state::ClientState;
use super::{SyncError, SyncResult};
use crate::api::ChatBackend;
use crate::session::SessionManager;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

pub struct SyncCore {
    backend: Arc<dyn ChatBackend>,
    session: Arc<SessionManager>,
    state: RwLock<ClientState>,
    updates: watch::Sender<ClientState>,
}

impl SyncCore {
    pub fn new(backend: Arc<dyn ChatBackend>, session: Arc<SessionManager>) -> Self {
        let (updates, _) = watch::channel(ClientState::default());
        Self {
            backend,
            session,
            state: RwLock::new(ClientState::default()),
            updates,
        }
    }

    /// Current state
    pub async fn snapshot(&self) -> ClientState {
        self.state.read().await.clone()
    }

    /// True while a session exists and no teardown has begun
    pub async fn session_active(&self) -> bool {
        !self.session.is_logging_out() && self.session.is_logged_in().await
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.updates.subscribe()
    }

    fn publish(&self, state: &ClientState) {
        self.updates.send_replace(state.clone());
    }

    /// Switch rooms and load the new room's messages
    ///
    /// Selecting the room that is already selected does nothing.
    pub async fn select_room(&self, room_id: &str) -> SyncResult<()> {
        {
            let mut state = self.state.write().await;
            if state.selected_room_id.as_deref() == Some(room_id) {
                return Ok(());
            }
            state.selected_room_id = Some(room_id.to_string());
            state.messages = None;
            self.publish(&state);
        }

        tracing::debug!(room_id, "Room selected");
        self.refresh_messages().await
    }

    /// Re-fetch the selected room's messages
    pub async fn refresh_messages(&self) -> SyncResult<()> {
        let requested = match self.state.read().await.selected_room_id.clone() {
            Some(id) => id,
            None => return Ok(()),
        };

        let messages = self.backend.list_messages(&requested).await?;

        let mut state = self.state.write().await;
        if self.session.is_logging_out() {
            tracing::debug!(room_id = %requested, "Discarding message list, session is being torn down");
            return Ok(());
        }
        if state.selected_room_id.as_deref() != Some(requested.as_str()) {
            tracing::debug!(
                requested = %requested,
                selected = ?state.selected_room_id,
                "Discarding stale message list"
            );
            return Ok(());
        }

        state.messages = Some(messages);
        self.publish(&state);
        Ok(())
    }

    /// Re-fetch the room list, selecting the first room if none is selected
    pub async fn refresh_rooms(&self) -> SyncResult<()> {
        let rooms = self.backend.list_rooms().await?;

        let auto_selected = {
            let mut state = self.state.write().await;
            if self.session.is_logging_out() {
                tracing::debug!("Discarding room list, session is being torn down");
                return Ok(());
            }

            let auto_selected = match &state.selected_room_id {
                None => rooms.first().map(|room| room.id.clone()),
                Some(selected) => {
                    if !rooms.iter().any(|room| &room.id == selected) {
                        tracing::debug!(room_id = %selected, "Selected room is missing from room list");
                    }
                    None
                }
            };

            if let Some(id) = &auto_selected {
                state.selected_room_id = Some(id.clone());
                state.messages = None;
            }
            state.rooms = rooms;
            self.publish(&state);
            auto_selected
        };

        if let Some(room_id) = auto_selected {
            tracing::debug!(room_id = %room_id, "Selected first room");
            self.refresh_messages().await?;
        }
        Ok(())
    }

    /// Create a room, then re-fetch the room list
    ///
    /// The name is sent as given; only an all-blank name is refused.
    pub async fn create_room(&self, name: &str) -> SyncResult<()> {
        if name.trim().is_empty() {
            return Err(SyncError::InvalidInput("room name must not be blank".to_string()));
        }

        let created = self.backend.create_room(name).await;
        let refreshed = self.refresh_rooms().await;
        created?;
        refreshed
    }

    /// Post to the selected room, then re-fetch its messages
    pub async fn send_message(&self, content: &str) -> SyncResult<()> {
        let room_id = self
            .state
            .read()
            .await
            .selected_room_id
            .clone()
            .ok_or(SyncError::NoRoomSelected)?;

        let sent = self.backend.send_message(&room_id, content).await;
        let refreshed = self.refresh_messages().await;
        sent?;
        refreshed
    }

    /// Forget everything, as after logout
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = ClientState::default();
        self.publish(&state);
    }
}
