//! Login / account creation form

use crate::api::AccountApi;
use crate::session::Session;

pub const LOGIN_FAILED: &str = "Login failed";
pub const ACCOUNT_CREATION_FAILED: &str = "Account creation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Login,
    CreateAccount,
}

#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    error: Option<String>,
    mode: LoginMode,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            error: None,
            mode: LoginMode::Login,
        }
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch between login and account creation; clears any error
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::Login => LoginMode::CreateAccount,
            LoginMode::CreateAccount => LoginMode::Login,
        };
        self.error = None;
    }

    pub fn set_mode(&mut self, mode: LoginMode) {
        if self.mode != mode {
            self.toggle_mode();
        }
    }

    /// Submit the credentials
    ///
    /// Returns the new session on success. On failure the inline error is
    /// set and nothing else changes; the caller establishes the session.
    pub async fn submit(&mut self, accounts: &dyn AccountApi) -> Option<Session> {
        self.error = None;
        let result = match self.mode {
            LoginMode::Login => accounts.login(&self.username, &self.password).await,
            LoginMode::CreateAccount => {
                accounts
                    .create_account(&self.username, &self.password)
                    .await
            }
        };

        match result {
            Ok(session) => {
                self.password.clear();
                Some(session)
            }
            Err(e) => {
                tracing::info!(username = %self.username, mode = ?self.mode, error = %e, "Authentication failed");
                self.error = Some(
                    match self.mode {
                        LoginMode::Login => LOGIN_FAILED,
                        LoginMode::CreateAccount => ACCOUNT_CREATION_FAILED,
                    }
                    .to_string(),
                );
                None
            }
        }
    }

    pub fn render(&self) -> Vec<String> {
        let title = match self.mode {
            LoginMode::Login => "Log in",
            LoginMode::CreateAccount => "Create account",
        };
        let mut lines = vec![
            title.to_string(),
            format!("  username: {}", self.username),
            format!("  password: {}", "*".repeat(self.password.chars().count())),
        ];
        if let Some(error) = &self.error {
            lines.push(format!("  ! {}", error));
        }
        lines
    }
}
