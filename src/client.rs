use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{config::Config, error::LookupError, models::Profile};

/// Anything that can resolve a handle into a profile.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, handle: &str) -> Result<Profile, LookupError>;
}

/// HTTP client for the public GitHub users endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: build_client(config)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a GitHub user by handle.
    ///
    /// The handle is inserted into the path as given. Every non-success status maps
    /// to [`LookupError::NotFound`].
    pub async fn fetch_user(&self, handle: &str) -> Result<Profile, LookupError> {
        let url = format!("{}/users/{handle}", self.api_base);
        debug!(%url, "requesting profile");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, handle, "profile request rejected");
            return Err(LookupError::NotFound {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let profile = serde_json::from_str::<Profile>(&body)?;
        Ok(profile)
    }

    /// Downloads an avatar and decodes it into `size`x`size` RGBA pixels.
    pub async fn avatar_pixels(&self, url: &str, size: u32) -> Option<(Vec<u8>, u32, u32)> {
        let sized_url = sized_avatar_url(url, size);
        let bytes = match self.http.get(&sized_url).send().await {
            Ok(response) if response.status().is_success() => response.bytes().await.ok()?,
            Ok(response) => {
                debug!(status = %response.status(), "avatar request rejected");
                return None;
            }
            Err(err) => {
                debug!(error = %err, "avatar download failed");
                return None;
            }
        };

        let decoded = image::load_from_memory(&bytes).ok()?;
        // GitHub sometimes ignores the size hint for cached avatars.
        let rgba = decoded.thumbnail_exact(size, size).to_rgba8();
        let (w, h) = rgba.dimensions();
        Some((rgba.into_raw(), w, h))
    }
}

#[async_trait]
impl ProfileSource for GitHubClient {
    async fn fetch_profile(&self, handle: &str) -> Result<Profile, LookupError> {
        self.fetch_user(handle).await
    }
}

/// Creates the shared HTTP client. GitHub rejects requests without a user agent.
fn build_client(config: &Config) -> Result<Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("devfinder/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

fn sized_avatar_url(url: &str, size: u32) -> String {
    if url.contains('?') {
        format!("{url}&s={size}")
    } else {
        format!("{url}?s={size}")
    }
}
