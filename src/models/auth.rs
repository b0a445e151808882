//! Authentication payloads

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Raw login response; the backend may answer 200 with only a message
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Successful login: a bearer token and the name to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

impl LoginResponse {
    /// Split the response into credentials or the rejection reason.
    ///
    /// `fallback_username` is used when the backend does not echo the name.
    pub fn into_credentials(self, fallback_username: &str) -> Result<Credentials, String> {
        match self.token.filter(|token| !token.is_empty()) {
            Some(token) => Ok(Credentials {
                token,
                username: self
                    .username
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| fallback_username.to_string()),
            }),
            None => Err(self
                .message
                .filter(|msg| !msg.is_empty())
                .unwrap_or_else(|| "Invalid username or password".to_string())),
        }
    }
}
