//! Client session: bearer credential and cached display name
//!
//! A [`Session`] is restored once from its [`SessionStore`] and then handed to
//! the API client and the dashboard. Every change is written through to the
//! store so a later process starts from the same state.

pub mod store;

use std::sync::{Arc, RwLock};

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

use crate::{error::AppResult, models::Credentials};

struct SessionInner {
    state: RwLock<StoredSession>,
    store: Arc<dyn SessionStore>,
}

/// Shared session handle
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("display_name", &self.display_name())
            .finish()
    }
}

impl Session {
    /// Restore the session persisted in `store`
    pub async fn restore(store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let state = store.load().await?.unwrap_or_default();
        tracing::debug!(
            authenticated = state.auth_token.is_some(),
            "Session restored"
        );
        Ok(Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(state),
                store,
            }),
        })
    }

    /// Empty session backed by memory only
    pub fn ephemeral() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(StoredSession::default()),
                store: Arc::new(MemorySessionStore::new()),
            }),
        }
    }

    fn snapshot(&self) -> StoredSession {
        match self.inner.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Persist first; memory only changes once the store accepted the write
    async fn update(&self, f: impl FnOnce(&mut StoredSession)) -> AppResult<()> {
        let mut next = self.snapshot();
        f(&mut next);

        if next.is_empty() {
            self.inner.store.clear().await?;
        } else {
            self.inner.store.save(&next).await?;
        }

        let mut guard = match self.inner.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
        Ok(())
    }

    /// Current bearer token, if any
    pub fn credential(&self) -> Option<String> {
        self.snapshot().auth_token
    }

    /// Cached display name, if any
    pub fn display_name(&self) -> Option<String> {
        self.snapshot().username
    }

    /// Presence of a token only; the server decides whether it is still valid
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().auth_token.is_some()
    }

    pub async fn set_credential(&self, token: impl Into<String>) -> AppResult<()> {
        let token = token.into();
        self.update(|state| state.auth_token = Some(token)).await
    }

    pub async fn set_display_name(&self, name: impl Into<String>) -> AppResult<()> {
        let name = name.into();
        self.update(|state| state.username = Some(name)).await
    }

    /// Store both keys after a successful login
    pub async fn establish(&self, credentials: &Credentials) -> AppResult<()> {
        let token = credentials.token.clone();
        let username = credentials.username.clone();
        self.update(|state| {
            state.auth_token = Some(token);
            state.username = Some(username);
        })
        .await?;
        tracing::info!(username = %credentials.username, "Session established");
        Ok(())
    }

    /// Drop the token and the cached name (logout)
    pub async fn clear_credential(&self) -> AppResult<()> {
        self.update(|state| *state = StoredSession::default()).await?;
        tracing::info!("Session cleared");
        Ok(())
    }
}
