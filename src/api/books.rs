//! Book list and mutation calls

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::{
    error::{AppError, AppResult, Operation},
    models::{Book, BookFields, ImageChange, ImageUpload},
};

use super::{read_json, ApiClient, BookApi};

/// Build the multipart body shared by create and update
pub(crate) fn book_form(fields: &BookFields, image: &ImageChange) -> AppResult<Form> {
    let mut form = Form::new()
        .text("title", fields.title.clone())
        .text("author", fields.author.clone())
        .text("description", fields.description.clone().unwrap_or_default());

    if let Some(total) = fields.pages_total {
        form = form.text("pagesTotal", total.to_string());
    }
    if let Some(read) = fields.pages_read {
        form = form.text("pagesRead", read.to_string());
    }

    match image {
        ImageChange::Keep => {}
        ImageChange::Replace(upload) => {
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str(&upload.content_type)
                .map_err(|e| {
                    AppError::Validation(format!(
                        "Invalid image content type {}: {}",
                        upload.content_type, e
                    ))
                })?;
            form = form.part("image", part);
        }
        ImageChange::Remove => {
            form = form.text("removeImage", "true");
        }
    }

    Ok(form)
}

impl ApiClient {
    /// Fetch every book owned by the session's user
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let request = self.authorized(self.http.get(self.url("/api/books")));
        let response = self.send(Operation::ListBooks, request).await?;
        let data: serde_json::Value = read_json(Operation::ListBooks, response).await?;

        if !data.is_array() {
            tracing::warn!("Book list response is not an array, treating it as empty");
            return Ok(Vec::new());
        }

        let books: Vec<Book> = serde_json::from_value(data).map_err(|source| AppError::Decode {
            op: Operation::ListBooks,
            source,
        })?;
        tracing::debug!("Fetched {} books", books.len());
        Ok(books)
    }

    /// Create a book, optionally with a cover image
    pub async fn create_book(
        &self,
        fields: &BookFields,
        image: Option<&ImageUpload>,
    ) -> AppResult<Book> {
        let image = match image {
            Some(upload) => ImageChange::Replace(upload.clone()),
            None => ImageChange::Keep,
        };
        let form = book_form(fields, &image)?;

        let request = self
            .authorized(self.http.post(self.url("/api/books")))
            .multipart(form);
        let response = self.send(Operation::CreateBook, request).await?;
        let book: Book = read_json(Operation::CreateBook, response).await?;
        tracing::info!(id = book.id, "Book created");
        Ok(book)
    }

    /// Replace the fields of an existing book
    pub async fn update_book(
        &self,
        id: i64,
        fields: &BookFields,
        image: &ImageChange,
    ) -> AppResult<Book> {
        let form = book_form(fields, image)?;

        let request = self
            .authorized(self.http.put(self.url(&format!("/api/books/{}", id))))
            .multipart(form);
        let response = self.send(Operation::UpdateBook, request).await?;
        let book: Book = read_json(Operation::UpdateBook, response).await?;
        tracing::info!(id = book.id, "Book updated");
        Ok(book)
    }

    /// Delete a book; the payload is whatever the backend returns
    pub async fn delete_book(&self, id: i64) -> AppResult<serde_json::Value> {
        let request = self.authorized(self.http.delete(self.url(&format!("/api/books/{}", id))));
        let response = self.send(Operation::DeleteBook, request).await?;
        let payload = read_json(Operation::DeleteBook, response).await?;
        tracing::info!(id, "Book deleted");
        Ok(payload)
    }
}

#[async_trait]
impl BookApi for ApiClient {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        ApiClient::list_books(self).await
    }

    async fn create_book(&self, fields: BookFields, image: Option<ImageUpload>) -> AppResult<Book> {
        ApiClient::create_book(self, &fields, image.as_ref()).await
    }

    async fn update_book(&self, id: i64, fields: BookFields, image: ImageChange) -> AppResult<Book> {
        ApiClient::update_book(self, id, &fields, &image).await
    }

    async fn delete_book(&self, id: i64) -> AppResult<serde_json::Value> {
        ApiClient::delete_book(self, id).await
    }
}
