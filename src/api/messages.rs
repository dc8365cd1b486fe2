//! Message calls

use super::dto::{Message, MessageListResponse};
use super::error::{ApiError, ApiResult};
use super::gateway::ApiRequest;
use super::ChatClient;

pub(crate) fn messages_path(room_id: &str) -> String {
    format!("/rooms/{}/messages", urlencoding::encode(room_id))
}

impl ChatClient {
    /// Full message list of a room, in server order
    pub async fn list_messages(&self, room_id: &str) -> ApiResult<Vec<Message>> {
        let response = self.gateway.send(ApiRequest::get(messages_path(room_id))).await?;
        let body: MessageListResponse = response.json().await.map_err(ApiError::from_body_error)?;
        Ok(body.messages)
    }

    /// Post a message. Nothing comes back; the next list fetch shows it.
    pub async fn send_message(&self, room_id: &str, content: &str) -> ApiResult<()> {
        let request =
            ApiRequest::post(messages_path(room_id)).json(serde_json::json!({ "content": content }));
        self.gateway.send(request).await?;
        tracing::debug!(room_id, "Message sent");
        Ok(())
    }
}
