// ABOUTME: Sixel graphics protocol implementation with naive per-image palette
// ABOUTME: Emits raster attributes, colour registers on first use, and six bit-planes per row

use super::ImageProtocol;
use crate::constants::sixel::{DCS_START, LINE_BREAK, PLANES, SIXEL_BASE, ST};
use crate::scaling::resize_exact;
use image::DynamicImage;
use std::collections::HashMap;
use std::fmt::Write;

/// Sixel encoder.
///
/// Every distinct RGB triple gets its own colour register unless a cap is
/// set with [`SixelProtocol::with_max_palette`], in which case colours seen
/// after the palette is full fold onto the nearest register.
#[derive(Debug, Clone, Default)]
pub struct SixelProtocol {
    max_palette: Option<usize>,
}

impl SixelProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_palette(max_palette: usize) -> Self {
        Self {
            max_palette: Some(max_palette.max(1)),
        }
    }
}

impl ImageProtocol for SixelProtocol {
    fn render_image(&self, img: &DynamicImage, width: u32, height: u32) -> String {
        let Some(resized) = resize_exact(img, width, height) else {
            return String::new();
        };

        let mut output = String::new();
        // Raster attributes: aspect 1:1 and the image extent
        let _ = writeln!(output, "{}\"1;1;{};{}", DCS_START, width, height);

        let mut palette = Palette::new(self.max_palette);
        let mut row = vec![0usize; width as usize];

        for y in 0..height {
            for (x, slot) in row.iter_mut().enumerate() {
                let pixel = resized.get_pixel(x as u32, y);
                let rgb = [pixel[0], pixel[1], pixel[2]];
                let (index, is_new) = palette.index_of(rgb);
                if is_new {
                    let _ = write!(output, "#{};2;{};{};{}", index, rgb[0], rgb[1], rgb[2]);
                }
                *slot = index;
            }

            for plane in 0..PLANES {
                output.extend(row.iter().map(|index| sixel_char(*index, plane)));
            }
            output.push(LINE_BREAK);
            output.push('\n');
        }

        output.push_str(ST);
        output
    }

    fn name(&self) -> &'static str {
        "sixel"
    }
}

fn sixel_char(index: usize, plane: usize) -> char {
    (SIXEL_BASE + ((index >> plane) & 1) as u8) as char
}

struct Palette {
    lookup: HashMap<[u8; 3], usize>,
    entries: Vec<[u8; 3]>,
    max_entries: Option<usize>,
}

impl Palette {
    fn new(max_entries: Option<usize>) -> Self {
        Self {
            lookup: HashMap::new(),
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Register index for `rgb` and whether it was just defined
    fn index_of(&mut self, rgb: [u8; 3]) -> (usize, bool) {
        if let Some(&index) = self.lookup.get(&rgb) {
            return (index, false);
        }

        let full = self
            .max_entries
            .is_some_and(|max| self.entries.len() >= max);
        if full {
            let index = self.nearest(rgb);
            self.lookup.insert(rgb, index);
            return (index, false);
        }

        let index = self.entries.len();
        self.entries.push(rgb);
        self.lookup.insert(rgb, index);
        (index, true)
    }

    fn nearest(&self, rgb: [u8; 3]) -> usize {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| {
                entry
                    .iter()
                    .zip(rgb.iter())
                    .map(|(a, b)| {
                        let d = *a as i32 - *b as i32;
                        (d * d) as u32
                    })
                    .sum::<u32>()
            })
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}
