//! Login and registration calls

use crate::{
    error::{AppError, AppResult, Operation},
    models::{Credentials, LoginRequest, LoginResponse, RegisterRequest},
};

use super::{read_json, ApiClient};

impl ApiClient {
    /// Exchange a username and password for a bearer token.
    ///
    /// A success status without a token is reported as
    /// [`AppError::LoginRejected`], never as credentials. The session is not
    /// touched; callers store the result with `Session::establish`.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Credentials> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both username and password.".to_string(),
            ));
        }

        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { username, password });

        let response = self.send(Operation::Login, request).await?;
        let body: Option<LoginResponse> = read_json(Operation::Login, response).await?;

        body.unwrap_or_default()
            .into_credentials(username)
            .map_err(|reason| {
                tracing::info!(username, "Login rejected: {}", reason);
                AppError::LoginRejected(reason)
            })
    }

    /// Create an account; the payload is whatever the backend returns
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<serde_json::Value> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username, email and password are required".to_string(),
            ));
        }

        let request = self.http.post(self.url("/api/register")).json(&RegisterRequest {
            username,
            email,
            password,
        });

        let response = self.send(Operation::Register, request).await?;
        read_json(Operation::Register, response).await
    }
}
