//! Error types for the personal library client

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Message shown when the backend cannot be reached at all
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to connect to server. Please check if the backend is running.";

/// Remote operation an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    ListBooks,
    CreateBook,
    UpdateBook,
    DeleteBook,
    FetchImage,
}

impl Operation {
    /// Short human label used in messages ("Failed to {label}")
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Login => "log in",
            Operation::Register => "register",
            Operation::ListBooks => "fetch books",
            Operation::CreateBook => "add book",
            Operation::UpdateBook => "update book",
            Operation::DeleteBook => "delete book",
            Operation::FetchImage => "fetch image",
        }
    }

    /// Error family name reported for a non-success response
    pub fn error_kind(&self) -> &'static str {
        match self {
            Operation::Login => "AuthError",
            Operation::Register => "RegistrationError",
            Operation::ListBooks => "FetchError",
            Operation::CreateBook => "CreateError",
            Operation::UpdateBook => "UpdateError",
            Operation::DeleteBook => "DeleteError",
            Operation::FetchImage => "ImageError",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(": {}", text),
        _ => String::new(),
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to {op}: unable to reach server: {source}")]
    Connectivity {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to {op} (status {}){}", .status.as_u16(), body_suffix(.body))]
    HttpStatus {
        op: Operation,
        status: StatusCode,
        body: Option<String>,
    },

    #[error("Failed to {op}: invalid response: {source}")]
    Decode {
        op: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Error family name, following the client operation that failed
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Connectivity { .. } => "NetworkError",
            AppError::HttpStatus { op, .. } => op.error_kind(),
            AppError::Decode { op, .. } => op.error_kind(),
            AppError::LoginRejected(_) => "AuthError",
            AppError::Validation(_) => "ValidationError",
            AppError::Session(_) => "SessionError",
            AppError::Io(_) => "IoError",
            AppError::Config(_) => "ConfigError",
            AppError::Internal(_) => "InternalError",
        }
    }

    /// Status code of the failed response, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(StatusCode::UNAUTHORIZED))
    }

    /// Single line shown to the user in the dashboard banner
    pub fn user_message(&self) -> String {
        match self {
            AppError::Connectivity { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            AppError::LoginRejected(msg) | AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
