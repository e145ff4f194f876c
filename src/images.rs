// Image lookup collaborator: Unsplash-backed source with a bounded timeout
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the image lookup client.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub base_url: String,
    pub access_key: String,
    /// Whole-request timeout; a slow lookup degrades to "no image" instead
    /// of stalling plan assembly.
    pub timeout: Duration,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com".to_string(),
            access_key: String::new(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Resolves a short title string to an image URL.
///
/// Returns `None` when nothing was found; transport and decoding errors are
/// indistinguishable from "no image found" and never reach the caller.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn find_image(&self, query: &str) -> Option<String>;
}

// Response body of GET /photos/random
#[derive(Debug, Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    small: String,
}

pub struct UnsplashImageSource {
    client: reqwest::Client,
    config: ImageConfig,
}

impl UnsplashImageSource {
    pub fn new(config: ImageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build image lookup HTTP client")?;
        Ok(Self { client, config })
    }

    async fn fetch(&self, query: &str) -> Result<String> {
        let url = format!("{}/photos/random", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("orientation", "landscape"),
                ("client_id", self.config.access_key.as_str()),
            ])
            .send()
            .await
            .context("Image lookup request failed")?
            .error_for_status()
            .context("Image lookup returned an error status")?;

        let photo: RandomPhoto = response
            .json()
            .await
            .context("Failed to decode image lookup response")?;
        Ok(photo.urls.small)
    }
}

#[async_trait]
impl ImageSource for UnsplashImageSource {
    async fn find_image(&self, query: &str) -> Option<String> {
        match self.fetch(query).await {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::debug!(query, error = %error, "image lookup failed, treating as no image");
                None
            }
        }
    }
}

/// Source that never finds an image. Lets the planner run without an image
/// backend configured.
pub struct NullImageSource;

#[async_trait]
impl ImageSource for NullImageSource {
    async fn find_image(&self, _query: &str) -> Option<String> {
        None
    }
}
