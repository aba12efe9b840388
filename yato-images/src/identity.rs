// ABOUTME: Media identity types used to address cached artwork on disk
// ABOUTME: Maps (category, numeric id, size variant) to a stable relative path

use crate::constants;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Anime,
    Manga,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Anime => "anime",
            MediaCategory::Manga => "manga",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anime" => Ok(MediaCategory::Anime),
            "manga" => Ok(MediaCategory::Manga),
            other => Err(format!(
                "Unknown media category '{}'. Valid values: anime, manga",
                other
            )),
        }
    }
}

/// Logical identity of one cached artifact.
///
/// The source URL is deliberately not part of the key: two URLs for the same
/// identity share one file, and whichever was fetched first wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaIdentity {
    pub category: MediaCategory,
    pub id: u64,
    pub size_variant: String,
}

impl MediaIdentity {
    pub fn new(category: MediaCategory, id: u64, size_variant: impl Into<String>) -> Self {
        Self {
            category,
            id,
            size_variant: size_variant.into(),
        }
    }

    /// Path of the artifact relative to the cache root:
    /// `<category>/<id>/<size_variant>.jpg`
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.category.as_str())
            .join(self.id.to_string())
            .join(format!(
                "{}.{}",
                self.size_variant,
                constants::cache::FILE_EXTENSION
            ))
    }
}

impl fmt::Display for MediaIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} ({})", self.category, self.id, self.size_variant)
    }
}

/// A renderable record handed over by the catalog client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub identity: MediaIdentity,
    pub url: String,
    pub title: Option<String>,
}

impl MediaItem {
    pub fn new(identity: MediaIdentity, url: impl Into<String>) -> Self {
        Self {
            identity,
            url: url.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Human-readable label used when the image cannot be shown
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("{} #{}", self.identity.category, self.identity.id),
        }
    }
}
