//! Room calls

use super::dto::{Room, RoomListResponse};
use super::error::{ApiError, ApiResult};
use super::gateway::ApiRequest;
use super::ChatClient;

impl ChatClient {
    /// All rooms, in server order
    pub async fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        let response = self.gateway.send(ApiRequest::get("/rooms")).await?;
        let body: RoomListResponse = response.json().await.map_err(ApiError::from_body_error)?;
        Ok(body.rooms)
    }

    /// Create a room. The server returns nothing; refresh the list to see it.
    pub async fn create_room(&self, name: &str) -> ApiResult<()> {
        let request = ApiRequest::post("/rooms").json(serde_json::json!({ "name": name }));
        self.gateway.send(request).await?;
        tracing::debug!(name, "Room created");
        Ok(())
    }
}
