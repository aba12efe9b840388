// ABOUTME: Inline terminal image rendering backed by an identity-keyed disk cache
// ABOUTME: Detects the terminal protocol, caches cover art, and encodes escape sequences

pub mod cache;
pub mod constants;
pub mod detection;
pub mod error;
pub mod fetcher;
pub mod identity;
pub mod manager;
pub mod protocols;
pub mod renderer;
pub mod scaling;

pub use cache::ImageCache;
pub use detection::{RenderStrategy, TerminalSignals};
pub use error::{ErrorKind, ImageCacheError, Result};
pub use fetcher::{HttpFetcher, ImageBody, ImageFetcher};
pub use identity::{MediaCategory, MediaIdentity, MediaItem};
pub use manager::{ImageManager, ImageRenderResult};
pub use protocols::ImageProtocol;
pub use renderer::{ImageRenderer, render};

pub use image::DynamicImage;
