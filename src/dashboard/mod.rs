//! Dashboard view controller
//!
//! Owns the rendered book list and the create/edit form. The list is only
//! ever replaced by a complete successful fetch: every mutation is followed by
//! a full re-fetch. Each fetch and each form takes a ticket from a
//! [`state::Generation`] counter, so a response that arrives after a newer
//! fetch, a newer form, or a logout is dropped instead of overwriting the
//! newer state.

pub mod draft;
pub mod state;

use std::sync::{Arc, Mutex};

use crate::{
    api::BookApi,
    error::{AppError, AppResult},
    models::Book,
    session::Session,
};

pub use draft::BookDraft;
pub use state::{DashboardView, FormMode, LoadState, Modal, Navigation, RefreshOutcome};

use state::DashboardState;

const DEFAULT_DISPLAY_NAME: &str = "User";

pub struct Dashboard<A: BookApi> {
    api: Arc<A>,
    session: Session,
    state: Arc<Mutex<DashboardState>>,
}

impl<A: BookApi> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
            state: self.state.clone(),
        }
    }
}

impl<A: BookApi> Dashboard<A> {
    pub fn new(api: Arc<A>, session: Session) -> Self {
        Self {
            api,
            session,
            state: Arc::new(Mutex::new(DashboardState::default())),
        }
    }

    /// Never held across an await
    fn with_state<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }

    /// Snapshot of the current render state
    pub fn view(&self) -> DashboardView {
        self.with_state(|state| state.view())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Enter the dashboard: redirect to login without a credential,
    /// otherwise load the book list.
    pub async fn mount(&self) -> Navigation {
        if !self.session.is_authenticated() {
            tracing::debug!("No credential stored, redirecting to login");
            return Navigation::Login;
        }

        let username = self
            .session
            .display_name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        self.with_state(|state| state.username = username);

        self.refresh().await;
        Navigation::Stay
    }

    /// Reload the complete book list
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.with_state(|state| {
            state.load = LoadState::Loading;
            state.list_generation.advance()
        });

        let result = self.api.list_books().await;

        self.with_state(|state| {
            if !state.list_generation.is_current(ticket) {
                tracing::warn!("Discarding superseded book list response");
                return RefreshOutcome::Superseded;
            }

            match result {
                Ok(books) => {
                    state.books = books;
                    state.load = LoadState::Ready;
                    state.banner = None;
                    state.loaded_once = true;
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch books: {}", e);
                    // Only a failed first load clears the list
                    if !state.loaded_once {
                        state.books.clear();
                    }
                    state.load = LoadState::Error(e.user_message());
                }
            }
            RefreshOutcome::Applied
        })
    }

    /// Open an empty form for a new book
    pub fn open_create(&self) {
        self.with_state(|state| {
            state.form_generation.advance();
            state.modal = Modal::Open {
                mode: FormMode::Creating,
                draft: BookDraft::default(),
            };
        });
    }

    /// Open the form pre-filled from a book of the current list
    pub fn open_edit(&self, id: i64) -> AppResult<()> {
        self.with_state(|state| {
            let book = state
                .books
                .iter()
                .find(|book| book.id == id)
                .ok_or_else(|| AppError::Validation(format!("Book {} is not in your library", id)))?;
            let draft = BookDraft::from_book(book);
            state.form_generation.advance();
            state.modal = Modal::Open {
                mode: FormMode::Editing(id),
                draft,
            };
            Ok(())
        })
    }

    /// Modify the open draft; returns false when no form is open
    pub fn edit_draft(&self, f: impl FnOnce(&mut BookDraft)) -> bool {
        self.with_state(|state| match &mut state.modal {
            Modal::Open { draft, .. } => {
                f(draft);
                true
            }
            Modal::Closed => false,
        })
    }

    /// Cancel the form and discard the draft
    pub fn close_modal(&self) {
        self.with_state(|state| {
            state.form_generation.advance();
            state.modal = Modal::Closed;
        });
    }

    /// Submit the open form.
    ///
    /// Validation failures never reach the network. On success the form is
    /// closed and the list re-fetched; on failure the form and its draft stay
    /// as they are and the banner shows the error.
    pub async fn submit(&self) -> AppResult<Book> {
        let prepared = self.with_state(|state| {
            let (mode, draft) = match &state.modal {
                Modal::Open { mode, draft } => (*mode, draft),
                Modal::Closed => {
                    return Err(AppError::Validation("No book form is open".to_string()))
                }
            };
            match draft.validate_for_submit() {
                Ok((fields, image)) => Ok((mode, fields, image, state.form_generation.current())),
                Err(e) => {
                    state.banner = Some(e.user_message());
                    Err(e)
                }
            }
        });
        let (mode, fields, image, ticket) = prepared?;

        let result = match mode {
            FormMode::Creating => self.api.create_book(fields, image.upload().cloned()).await,
            FormMode::Editing(id) => self.api.update_book(id, fields, image).await,
        };

        let book = self.with_state(|state| {
            let current = state.form_generation.is_current(ticket);
            match result {
                Ok(book) => {
                    if current {
                        state.form_generation.advance();
                        state.modal = Modal::Closed;
                        state.banner = None;
                    } else {
                        tracing::debug!(id = book.id, "Form changed while saving, leaving it open");
                    }
                    Ok(book)
                }
                Err(e) => {
                    tracing::warn!("Failed to save book: {}", e);
                    if current {
                        state.banner = Some(e.user_message());
                    }
                    Err(e)
                }
            }
        })?;

        self.refresh().await;
        Ok(book)
    }

    /// Ask for confirmation before deleting; nothing is sent yet
    pub fn request_delete(&self, id: i64) {
        self.with_state(|state| state.pending_delete = Some(id));
    }

    pub fn cancel_delete(&self) {
        self.with_state(|state| state.pending_delete = None);
    }

    /// Send the delete the user confirmed, then re-fetch on success.
    /// A failure leaves the list as it was.
    pub async fn confirm_delete(&self) -> AppResult<serde_json::Value> {
        let (id, ticket) = self.with_state(|state| {
            let id = state.pending_delete.take()?;
            Some((id, state.session_generation.current()))
        })
        .ok_or_else(|| AppError::Validation("No delete awaiting confirmation".to_string()))?;

        match self.api.delete_book(id).await {
            Ok(payload) => {
                self.refresh().await;
                Ok(payload)
            }
            Err(e) => {
                tracing::warn!(id, "Failed to delete book: {}", e);
                self.with_state(|state| {
                    if state.session_generation.is_current(ticket) {
                        state.banner = Some(e.user_message());
                    }
                });
                Err(e)
            }
        }
    }

    /// Clear the session and reset the view; late responses are discarded
    pub async fn logout(&self) -> AppResult<Navigation> {
        self.session.clear_credential().await?;
        self.with_state(|state| {
            state.list_generation.advance();
            state.form_generation.advance();
            state.session_generation.advance();
            state.books.clear();
            state.load = LoadState::Loading;
            state.banner = None;
            state.modal = Modal::Closed;
            state.pending_delete = None;
            state.username.clear();
            state.loaded_once = false;
        });
        Ok(Navigation::Login)
    }
}
