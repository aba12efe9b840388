// ABOUTME: iTerm2 terminal inline image protocol implementation
// ABOUTME: Sends the source image as one base64 JPEG inside an OSC 1337 sequence

use super::ImageProtocol;
use crate::constants::iterm2::{BEL, JPEG_QUALITY, OSC_FILE};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

pub struct ITerm2Protocol;

impl ImageProtocol for ITerm2Protocol {
    fn render_image(&self, img: &DynamicImage, width: u32, height: u32) -> String {
        // The terminal scales; we ship the original pixels
        let Some(jpeg) = encode_jpeg(img) else {
            return String::new();
        };

        let base64_data = STANDARD.encode(jpeg);

        // \x1b]1337;File=inline=1;width=<w>px;height=<h>px:<base64>\x07
        format!(
            "{}inline=1;width={}px;height={}px:{}{}",
            OSC_FILE, width, height, base64_data, BEL
        )
    }

    fn name(&self) -> &'static str {
        "iterm2"
    }
}

fn encode_jpeg(img: &DynamicImage) -> Option<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);

    match encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8) {
        Ok(()) => Some(buffer),
        Err(e) => {
            log::debug!("iTerm2: failed to encode JPEG: {}", e);
            None
        }
    }
}
