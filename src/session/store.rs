//! Persistent storage for the session keys

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// The two persisted keys: bearer token and cached display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        self.auth_token.is_none() && self.username.is_none()
    }
}

/// Storage backend that survives process restarts
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> AppResult<Option<StoredSession>>;
    async fn save(&self, session: &StoredSession) -> AppResult<()>;
    async fn clear(&self) -> AppResult<()>;
}

/// JSON file store; one file per user profile
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AppResult<Option<StoredSession>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredSession = serde_json::from_str(&content).map_err(|e| {
            AppError::Session(format!(
                "Corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(stored))
    }

    async fn save(&self, session: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, lost when the process exits
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Option<StoredSession>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Session("Session store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, session: &StoredSession) -> AppResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Session("Session store lock poisoned".to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Session("Session store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
