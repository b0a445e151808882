//! HTTP client for the library backend REST API
//!
//! Every call goes through [`ApiClient`]. The stored credential is attached as
//! a bearer header whenever the session holds one; whether it is still valid
//! is left entirely to the server.

pub mod auth;
pub mod books;
pub mod images;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult, Operation},
    models::{Book, BookFields, ImageChange, ImageUpload},
    session::Session,
};

/// Book operations the dashboard depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookApi: Send + Sync {
    async fn list_books(&self) -> AppResult<Vec<Book>>;
    async fn create_book(&self, fields: BookFields, image: Option<ImageUpload>) -> AppResult<Book>;
    async fn update_book(&self, id: i64, fields: BookFields, image: ImageChange) -> AppResult<Book>;
    async fn delete_book(&self, id: i64) -> AppResult<serde_json::Value>;
}

/// REST client bound to one backend and one session
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    session: Session,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig, session: Session) -> AppResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base(), path)
    }

    /// Attach `Authorization: Bearer` when a credential is stored
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.credential() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and turn transport failures and non-2xx statuses into errors
    async fn send(&self, op: Operation, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await.map_err(|source| {
            tracing::warn!("Failed to {}: {}", op, source);
            AppError::Connectivity { op, source }
        })?;

        let status = response.status();
        tracing::debug!("{} -> {}", op, status);

        if status.is_success() {
            return Ok(response);
        }

        // Keep the body for diagnostics when it can be read
        let body = response.text().await.ok().filter(|text| !text.trim().is_empty());
        tracing::warn!("Failed to {} (status {})", op, status.as_u16());
        Err(AppError::HttpStatus { op, status, body })
    }
}

/// Read the whole body; an empty body decodes as JSON `null`
async fn read_json<T: DeserializeOwned>(op: Operation, response: Response) -> AppResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| AppError::Connectivity { op, source })?;

    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };

    serde_json::from_slice(bytes).map_err(|source| AppError::Decode { op, source })
}
