//! Account calls: login and account creation

use super::dto::SessionResponse;
use super::error::AuthError;
use super::gateway::ApiRequest;
use super::ChatClient;
use crate::session::Session;

impl ChatClient {
    /// Exchange credentials for a session
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.authenticate("/login", username, password).await
    }

    /// Register a new account, which also logs it in
    pub async fn create_account(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.authenticate("/accounts", username, password).await
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let request = ApiRequest::post(path).json(serde_json::json!({
            "username": username,
            "password": password,
        }));

        let response = self.gateway.send_public(request).await.map_err(|e| {
            tracing::info!(path, username, error = %e, "Authentication failed");
            AuthError::from(e)
        })?;

        let body: SessionResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                AuthError::Decode(e.to_string())
            } else {
                AuthError::Network(e)
            }
        })?;

        Ok(Session::new(body.token, body.username))
    }
}
