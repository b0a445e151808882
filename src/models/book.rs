//! Book model and write payloads

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AppResult;

/// Book as returned by the backend, owned by the authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Server-side file name, served under `/api/images/{image_path}`
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub pages_total: Option<i32>,
    #[serde(default)]
    pub pages_read: Option<i32>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Book {
    /// Reading progress in `[0, 1]`, when the page counts are known
    pub fn progress(&self) -> Option<f32> {
        match (self.pages_read, self.pages_total) {
            (Some(read), Some(total)) if total > 0 => {
                Some((read.clamp(0, total) as f32) / (total as f32))
            }
            _ => None,
        }
    }

    /// Text fields of this book, as an edit form would start from
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            pages_total: self.pages_total,
            pages_read: self.pages_read,
        }
    }
}

/// Text part of a create or update request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub pages_total: Option<i32>,
    pub pages_read: Option<i32>,
}

impl BookFields {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_pages(mut self, total: Option<i32>, read: Option<i32>) -> Self {
        self.pages_total = total;
        self.pages_read = read;
        self
    }
}

/// Binary cover image selected on the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// What an update does with the stored cover image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    /// Leave the current image untouched (no image part is sent)
    #[default]
    Keep,
    /// Upload a new image in place of the current one
    Replace(ImageUpload),
    /// Drop the current image (`removeImage=true` is sent)
    Remove,
}

impl ImageChange {
    pub fn upload(&self) -> Option<&ImageUpload> {
        match self {
            ImageChange::Replace(upload) => Some(upload),
            _ => None,
        }
    }
}
