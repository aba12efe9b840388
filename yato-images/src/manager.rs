// ABOUTME: Image manager that ties the disk cache to the protocol encoder
// ABOUTME: Degrades to a text link when the artwork cannot be fetched or decoded

use crate::cache::ImageCache;
use crate::identity::MediaItem;
use crate::renderer::ImageRenderer;

pub struct ImageManager {
    cache: ImageCache,
    renderer: ImageRenderer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRenderResult {
    /// Image rendered successfully as escape sequence
    Rendered(String),
    /// Text stand-in describing the item
    Fallback(String),
    /// No render strategy; nothing was fetched
    Disabled,
}

impl ImageRenderResult {
    /// What to write to the terminal; empty when disabled
    pub fn into_output(self) -> String {
        match self {
            ImageRenderResult::Rendered(s) | ImageRenderResult::Fallback(s) => s,
            ImageRenderResult::Disabled => String::new(),
        }
    }
}

impl ImageManager {
    pub fn new(cache: ImageCache, renderer: ImageRenderer) -> Self {
        Self { cache, renderer }
    }

    /// Look the item up in the cache (fetching on miss) and encode it for a
    /// `width × height` pixel box.
    pub fn render_item(&self, item: &MediaItem, width: u32, height: u32) -> ImageRenderResult {
        if !self.renderer.is_enabled() {
            return ImageRenderResult::Disabled;
        }

        match self.cache.get_image(&item.identity, &item.url) {
            Ok(img) => ImageRenderResult::Rendered(self.renderer.render(&img, width, height)),
            Err(e) => {
                log::warn!("Image unavailable for {}: {}", item.identity, e);
                ImageRenderResult::Fallback(fallback_text(item))
            }
        }
    }
}

fn fallback_text(item: &MediaItem) -> String {
    format!("🖼️  [{}]({})", item.label(), item.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::RenderStrategy;
    use crate::error::{ImageCacheError, Result};
    use crate::fetcher::{ImageBody, ImageFetcher};
    use crate::identity::{MediaCategory, MediaIdentity};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingFailure(Arc<AtomicUsize>);

    impl ImageFetcher for CountingFailure {
        fn fetch(&self, url: &str) -> Result<ImageBody> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ImageCacheError::fetch(url, "HTTP request failed with status 503"))
        }
    }

    fn item() -> MediaItem {
        MediaItem::new(
            MediaIdentity::new(MediaCategory::Anime, 5114, "small"),
            "https://cdn.example/images/anime/5114.jpg",
        )
    }

    #[test]
    fn test_disabled_does_not_touch_cache() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ImageCache::new(temp_dir.path(), CountingFailure(calls.clone()));
        let manager = ImageManager::new(cache, ImageRenderer::new(RenderStrategy::None));

        assert_eq!(manager.render_item(&item(), 100, 100), ImageRenderResult::Disabled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_fetch_failure_falls_back_to_link() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ImageCache::new(temp_dir.path(), CountingFailure(calls.clone()));
        let manager = ImageManager::new(cache, ImageRenderer::new(RenderStrategy::KittyProtocol));

        let result = manager.render_item(&item(), 100, 100);
        assert_eq!(
            result,
            ImageRenderResult::Fallback(
                "🖼️  [anime #5114](https://cdn.example/images/anime/5114.jpg)".to_string()
            )
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let titled = item().with_title("Fullmetal Alchemist: Brotherhood");
        let output = manager.render_item(&titled, 100, 100).into_output();
        assert!(output.contains("[Fullmetal Alchemist: Brotherhood]"));
    }
}
