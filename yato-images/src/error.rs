// ABOUTME: Error types for image cache lookups with distinguishable failure kinds
// ABOUTME: Separates network fetch, raster decode, and filesystem write failures

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageCacheError>;

/// Coarse classification of an [`ImageCacheError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FetchFailed,
    DecodeFailed,
    IoFailed,
}

#[derive(Debug, Error)]
pub enum ImageCacheError {
    #[error("Failed to fetch image from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Failed to decode image at {}: {source}", path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cache I/O failed for {}: {source}", path.display())]
    IoFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImageCacheError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        ImageCacheError::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImageCacheError::IoFailed {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        ImageCacheError::DecodeFailed {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ImageCacheError::FetchFailed { .. } => ErrorKind::FetchFailed,
            ImageCacheError::DecodeFailed { .. } => ErrorKind::DecodeFailed,
            ImageCacheError::IoFailed { .. } => ErrorKind::IoFailed,
        }
    }

    /// Only network failures can succeed on a plain retry; a bad file on disk
    /// or an unwritable cache directory fails identically every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ImageCacheError::FetchFailed { .. })
    }
}

impl From<reqwest::Error> for ImageCacheError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        if err.is_timeout() {
            ImageCacheError::fetch(url, "request timed out")
        } else {
            ImageCacheError::fetch(url, err)
        }
    }
}
