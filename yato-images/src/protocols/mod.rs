// ABOUTME: Image protocol implementations for terminal inline image display
// ABOUTME: Maps each render strategy to an encoder producing a terminal-writable string

use crate::detection::RenderStrategy;
use image::DynamicImage;

pub mod ascii;
pub mod iterm2;
pub mod kitty;
pub mod sixel;

pub use ascii::AsciiProtocol;
pub use iterm2::ITerm2Protocol;
pub use kitty::KittyProtocol;
pub use sixel::SixelProtocol;

pub trait ImageProtocol {
    /// Encode `img` for a `width × height` pixel box.
    ///
    /// Never fails: anything that cannot be encoded yields an empty string.
    fn render_image(&self, img: &DynamicImage, width: u32, height: u32) -> String;

    /// Short protocol name used in logs
    fn name(&self) -> &'static str;
}

/// Encoder for `strategy`, or `None` when nothing should be drawn
pub fn protocol_for(strategy: RenderStrategy) -> Option<Box<dyn ImageProtocol>> {
    match strategy {
        RenderStrategy::KittyProtocol => Some(Box::new(KittyProtocol)),
        RenderStrategy::ITerm2Protocol => Some(Box::new(ITerm2Protocol)),
        RenderStrategy::SixelProtocol => Some(Box::new(SixelProtocol::new())),
        RenderStrategy::AsciiFallback => Some(Box::new(AsciiProtocol)),
        RenderStrategy::None => None,
    }
}
