//! Cover image links

use reqwest::Url;

use crate::error::{AppError, AppResult, Operation};

use super::ApiClient;

impl ApiClient {
    /// Public URL of a stored cover image (`{image_base}/api/images/{path}`)
    pub fn image_url(&self, image_path: &str) -> String {
        let base = self.config.image_base();
        match Url::parse(base) {
            Ok(mut url) if !url.cannot_be_a_base() => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments
                        .pop_if_empty()
                        .extend(["api", "images", image_path]);
                }
                url.to_string()
            }
            _ => format!("{}/api/images/{}", base, image_path),
        }
    }

    /// Download a cover image; the image endpoint needs no credential
    pub async fn fetch_image(&self, image_path: &str) -> AppResult<Vec<u8>> {
        let request = self.http.get(self.image_url(image_path));
        let response = self.send(Operation::FetchImage, request).await?;
        let bytes = response.bytes().await.map_err(|source| AppError::Connectivity {
            op: Operation::FetchImage,
            source,
        })?;
        Ok(bytes.to_vec())
    }
}
