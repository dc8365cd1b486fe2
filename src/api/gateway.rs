//! Authenticated Request Gateway
//!
//! Every backend call goes through here. The gateway attaches the bearer
//! token of the current session and turns a 401 into a single session
//! teardown plus an `Unauthorized` error for the caller.

use super::error::GatewayError;
use crate::config::ApiConfig;
use crate::session::SessionManager;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::sync::Arc;

/// A backend call, relative to the configured base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub path: String,
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub struct Gateway {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl Gateway {
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Send with the session's bearer token, intercepting 401
    pub async fn send(&self, request: ApiRequest) -> Result<Response, GatewayError> {
        let token = self.session.token().await;
        let response = self.build(&request, token.as_deref()).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                "Backend answered 401"
            );
            self.session.handle_unauthorized(token.as_deref()).await;
            return Err(GatewayError::Unauthorized);
        }

        ensure_success(&request, response).await
    }

    /// Send without a token and without 401 interception
    ///
    /// For `/login` and `/accounts`, where 401 means bad credentials rather
    /// than an expired session.
    pub async fn send_public(&self, request: ApiRequest) -> Result<Response, GatewayError> {
        let response = self.build(&request, None).send().await?;
        ensure_success(&request, response).await
    }

    fn build(&self, request: &ApiRequest, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), &url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!(method = %request.method, url = %url, authenticated = token.is_some(), "Sending request");
        builder
    }
}

async fn ensure_success(request: &ApiRequest, response: Response) -> Result<Response, GatewayError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    tracing::debug!(
        method = %request.method,
        path = %request.path,
        status = status.as_u16(),
        "Backend returned error status"
    );
    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}
