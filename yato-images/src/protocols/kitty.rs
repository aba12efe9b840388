// ABOUTME: Kitty terminal graphics protocol implementation
// ABOUTME: Resizes to PNG, base64-encodes, and frames the payload in 4096-char APC chunks

use super::ImageProtocol;
use crate::constants::kitty::{ACTION_TRANSMIT_DISPLAY, APC_START, CHUNK_SIZE, FORMAT_PNG, ST};
use crate::scaling::resize_exact;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};
use std::fmt::Write;
use std::io::Cursor;

pub struct KittyProtocol;

impl ImageProtocol for KittyProtocol {
    fn render_image(&self, img: &DynamicImage, width: u32, height: u32) -> String {
        let Some(resized) = resize_exact(img, width, height) else {
            return String::new();
        };

        let mut png = Cursor::new(Vec::new());
        if let Err(e) = resized.write_to(&mut png, ImageFormat::Png) {
            log::debug!("Kitty: failed to encode PNG: {}", e);
            return String::new();
        }

        let base64_data = STANDARD.encode(png.into_inner());
        frame_payload(&base64_data, width, height)
    }

    fn name(&self) -> &'static str {
        "kitty"
    }
}

/// Wrap an already base64-encoded PNG in APC graphics commands.
///
/// The first chunk carries the action, format, and size keys; every chunk
/// carries `m=1` except the last, which carries `m=0`. Only the payload is
/// split, so escape markers are never cut.
pub(crate) fn frame_payload(base64_data: &str, width: u32, height: u32) -> String {
    let chunks = split_payload(base64_data, CHUNK_SIZE);
    let mut output = String::with_capacity(base64_data.len() + chunks.len() * 32);

    for (i, chunk) in chunks.iter().enumerate() {
        let is_last = i == chunks.len() - 1;
        let m_value = if is_last { 0 } else { 1 };

        if i == 0 {
            // First chunk includes format and transmission action
            let _ = write!(
                output,
                "{}a={},f={},s={},v={},m={};{}{}",
                APC_START, ACTION_TRANSMIT_DISPLAY, FORMAT_PNG, width, height, m_value, chunk, ST
            );
        } else {
            // Continuation chunks
            let _ = write!(output, "{}m={};{}{}", APC_START, m_value, chunk, ST);
        }
    }

    output
}

/// Split on byte offsets; base64 is pure ASCII so every offset is a char boundary
fn split_payload(data: &str, chunk_size: usize) -> Vec<&str> {
    if data.is_empty() {
        return vec![""];
    }

    (0..data.len())
        .step_by(chunk_size)
        .map(|start| &data[start..(start + chunk_size).min(data.len())])
        .collect()
}
