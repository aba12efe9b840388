// ABOUTME: Blocking HTTP transport used by the image cache on a miss
// ABOUTME: Exposes a fetcher trait so the network can be stubbed or decorated

use crate::constants::fetch;
use crate::error::{ImageCacheError, Result};
use reqwest::blocking::Client;
use std::io::Read;
use std::time::Duration;
use url::Url;

/// Response body handed back to the cache, streamed to disk as it is read
pub type ImageBody = Box<dyn Read + Send>;

/// Source of raw image bytes for a URL.
///
/// Implementations must return `FetchFailed` for transport errors and for
/// any non-success status, before producing a body.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<ImageBody>;
}

impl<F: ImageFetcher + ?Sized> ImageFetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<ImageBody> {
        (**self).fetch(url)
    }
}

impl<F: ImageFetcher + ?Sized> ImageFetcher for std::sync::Arc<F> {
    fn fetch(&self, url: &str) -> Result<ImageBody> {
        (**self).fetch(url)
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(fetch::REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(fetch::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(fetch::MAX_REDIRECTS))
            .build()
            .map_err(|e| {
                ImageCacheError::fetch("<client>", format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<ImageBody> {
        let parsed =
            Url::parse(url).map_err(|e| ImageCacheError::fetch(url, format!("Invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageCacheError::fetch(
                url,
                format!("Unsupported URL scheme '{}'", parsed.scheme()),
            ));
        }

        log::debug!("Fetching image: {}", url);
        let response = self
            .client
            .get(parsed)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageCacheError::fetch(
                url,
                format!("HTTP request failed with status {}", status),
            ));
        }

        Ok(Box::new(response))
    }
}
