//! Data models exchanged with the library backend

pub mod auth;
pub mod book;

// Re-export commonly used types
pub use auth::{Credentials, LoginRequest, LoginResponse, RegisterRequest};
pub use book::{Book, BookFields, ImageChange, ImageUpload};
