//! Create/edit form draft

use validator::{Validate, ValidationError};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFields, ImageChange},
};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and author are required";

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Unsaved form state for a book being created or edited
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BookDraft {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    pub description: String,
    pub pages_total: Option<i32>,
    pub pages_read: Option<i32>,
    pub image: ImageChange,
}

impl BookDraft {
    /// Pre-fill the text fields from `book`; the image is never pre-filled
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone().unwrap_or_default(),
            pages_total: book.pages_total,
            pages_read: book.pages_read,
            image: ImageChange::Keep,
        }
    }

    /// Local presence checks; everything else is left to the server
    pub fn validate_for_submit(&self) -> AppResult<(BookFields, ImageChange)> {
        if self.validate().is_err() {
            return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        // Values go out as typed
        let fields = BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            pages_total: self.pages_total,
            pages_read: self.pages_read,
        };
        Ok((fields, self.image.clone()))
    }
}
