//! Render state of the dashboard

use crate::models::Book;

use super::draft::BookDraft;

/// Book list load status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error(String),
}

/// What the open form will do on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Open { mode: FormMode, draft: BookDraft },
}

impl Modal {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open { .. })
    }
}

/// Where the caller should go after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Login,
}

/// Whether a fetch result was applied to the render state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer fetch (or a logout) started before this one finished
    Superseded,
}

/// Monotonic request counter; only the latest ticket is current
#[derive(Debug, Default)]
pub(crate) struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

impl Generation {
    pub(crate) fn advance(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    pub(crate) fn current(&self) -> Ticket {
        Ticket(self.0)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

/// Snapshot handed to the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub load: LoadState,
    pub books: Vec<Book>,
    /// Inline error banner for validation and mutation failures
    pub banner: Option<String>,
    pub modal: Modal,
    pub pending_delete: Option<i64>,
    pub username: String,
}

impl DashboardView {
    /// The message to show, if any (fetch errors first)
    pub fn message(&self) -> Option<&str> {
        match &self.load {
            LoadState::Error(msg) => Some(msg),
            _ => self.banner.as_deref(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct DashboardState {
    pub load: LoadState,
    pub books: Vec<Book>,
    pub banner: Option<String>,
    pub modal: Modal,
    pub pending_delete: Option<i64>,
    pub username: String,
    pub loaded_once: bool,
    pub list_generation: Generation,
    pub form_generation: Generation,
    /// Advanced on logout only
    pub session_generation: Generation,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            books: Vec::new(),
            banner: None,
            modal: Modal::Closed,
            pending_delete: None,
            username: String::new(),
            loaded_once: false,
            list_generation: Generation::default(),
            form_generation: Generation::default(),
            session_generation: Generation::default(),
        }
    }
}

impl DashboardState {
    pub(crate) fn view(&self) -> DashboardView {
        DashboardView {
            load: self.load.clone(),
            books: self.books.clone(),
            banner: self.banner.clone(),
            modal: self.modal.clone(),
            pending_delete: self.pending_delete,
            username: self.username.clone(),
        }
    }
}
