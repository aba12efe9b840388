// ABOUTME: Protocol encoder front door bound to the resolved render strategy
// ABOUTME: Turns a decoded image and a pixel box into a terminal-writable string

use crate::detection::RenderStrategy;
use crate::protocols::{self, ImageProtocol, SixelProtocol};
use image::DynamicImage;

/// Renders images with one fixed strategy.
///
/// Cheap to copy; build it once from [`RenderStrategy::resolve`] at startup and
/// hand it to whatever draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageRenderer {
    strategy: RenderStrategy,
    sixel_max_palette: Option<usize>,
}

impl ImageRenderer {
    pub fn new(strategy: RenderStrategy) -> Self {
        Self {
            strategy,
            sixel_max_palette: None,
        }
    }

    /// Renderer for the current terminal
    pub fn detect() -> Self {
        Self::new(RenderStrategy::resolve())
    }

    /// Cap the sixel palette; colours beyond the cap fold to the nearest entry
    pub fn with_sixel_max_palette(mut self, max_palette: Option<usize>) -> Self {
        self.sixel_max_palette = max_palette;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.strategy.is_enabled()
    }

    /// Encode `img` for a `width × height` pixel box. Empty when disabled.
    pub fn render(&self, img: &DynamicImage, width: u32, height: u32) -> String {
        match self.protocol() {
            Some(protocol) => {
                let output = protocol.render_image(img, width, height);
                log::debug!(
                    "Rendered {}x{} image with {} ({} bytes)",
                    width,
                    height,
                    protocol.name(),
                    output.len()
                );
                output
            }
            None => String::new(),
        }
    }

    fn protocol(&self) -> Option<Box<dyn ImageProtocol>> {
        match (self.strategy, self.sixel_max_palette) {
            (RenderStrategy::SixelProtocol, Some(max)) => {
                Some(Box::new(SixelProtocol::with_max_palette(max)))
            }
            (strategy, _) => protocols::protocol_for(strategy),
        }
    }
}

/// One-shot form of [`ImageRenderer::render`]
pub fn render(img: &DynamicImage, width: u32, height: u32, strategy: RenderStrategy) -> String {
    ImageRenderer::new(strategy).render(img, width, height)
}
