//! Personal library client
//!
//! Session handling, a REST client and a dashboard controller for a personal
//! book library backend: register, log in, and manage the books (title,
//! author, description, optional cover image) tied to your account.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod session;

pub use api::{ApiClient, BookApi};
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use error::{AppError, AppResult};
pub use session::Session;
