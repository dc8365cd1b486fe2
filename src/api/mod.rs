//! Chat backend API
//!
//! Typed client for the chat REST backend.
//!
//! # Endpoints
//!
//! ## Accounts (no token, 401 means bad credentials)
//! - `POST /login` - Exchange credentials for a token
//! - `POST /accounts` - Register and receive a token
//!
//! ## Rooms
//! - `GET /rooms` - List rooms
//! - `POST /rooms` - Create a room
//!
//! ## Messages
//! - `GET /rooms/:room_id/messages` - Full message list of a room
//! - `POST /rooms/:room_id/messages` - Post a message
//!
//! Every room and message call carries `Authorization: Bearer <token>` and
//! goes through the [`Gateway`], which handles 401 for the whole process.

mod account;
pub mod dto;
pub mod error;
pub mod gateway;
mod messages;
mod rooms;

pub use dto::{Message, Room, RoomId};
pub use error::{ApiError, ApiResult, AuthError, GatewayError};
pub use gateway::{ApiRequest, Gateway};

use crate::session::Session;
use async_trait::async_trait;
use std::sync::Arc;

/// Room and message operations the sync core depends on
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn list_rooms(&self) -> ApiResult<Vec<Room>>;

    async fn create_room(&self, name: &str) -> ApiResult<()>;

    async fn list_messages(&self, room_id: &str) -> ApiResult<Vec<Message>>;

    async fn send_message(&self, room_id: &str, content: &str) -> ApiResult<()>;
}

/// Account operations the login form depends on
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError>;

    async fn create_account(&self, username: &str, password: &str) -> Result<Session, AuthError>;
}

/// Resource client over the gateway
pub struct ChatClient {
    gateway: Arc<Gateway>,
}

impl ChatClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        ChatClient::list_rooms(self).await
    }

    async fn create_room(&self, name: &str) -> ApiResult<()> {
        ChatClient::create_room(self, name).await
    }

    async fn list_messages(&self, room_id: &str) -> ApiResult<Vec<Message>> {
        ChatClient::list_messages(self, room_id).await
    }

    async fn send_message(&self, room_id: &str, content: &str) -> ApiResult<()> {
        ChatClient::send_message(self, room_id, content).await
    }
}

#[async_trait]
impl AccountApi for ChatClient {
    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        ChatClient::login(self, username, password).await
    }

    async fn create_account(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        ChatClient::create_account(self, username, password).await
    }
}
