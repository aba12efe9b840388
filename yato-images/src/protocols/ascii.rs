// ABOUTME: Plain-text fallback that draws a coarse luminance map with '#' and spaces
// ABOUTME: Samples the source image on a grid derived from the requested box

use super::ImageProtocol;
use crate::constants::ascii::{BRIGHT_THRESHOLD, COLUMN_DIVISOR, DARK_GLYPH, ROW_DIVISOR};
use image::{DynamicImage, GenericImageView};

pub struct AsciiProtocol;

impl ImageProtocol for AsciiProtocol {
    /// The grid step comes from the requested box, but the walk runs over the
    /// source image's own bounds, so output size follows the source and not
    /// `width × height`. Long-standing behaviour; kept as is.
    fn render_image(&self, img: &DynamicImage, width: u32, height: u32) -> String {
        let row_step = (height / ROW_DIVISOR).max(1) as usize;
        let column_step = (width / COLUMN_DIVISOR).max(1) as usize;

        let mut output = String::new();
        for y in (0..img.height()).step_by(row_step) {
            for x in (0..img.width()).step_by(column_step) {
                let pixel = img.get_pixel(x, y);
                output.push(if is_bright(pixel[0], pixel[1], pixel[2]) {
                    ' '
                } else {
                    DARK_GLYPH
                });
            }
            output.push('\n');
        }
        output
    }

    fn name(&self) -> &'static str {
        "ascii"
    }
}

/// Mean of the three channels on the 16-bit scale, compared to half range
fn is_bright(r: u8, g: u8, b: u8) -> bool {
    let sum = (r as u32 + g as u32 + b as u32) * 257;
    sum / 3 > BRIGHT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_brightness_threshold() {
        assert!(is_bright(255, 255, 255));
        assert!(!is_bright(0, 0, 0));
        // 128 * 257 = 32896 > 32768
        assert!(is_bright(128, 128, 128));
        // 127 * 257 = 32639
        assert!(!is_bright(127, 127, 127));
        assert!(is_bright(255, 255, 0));
    }

    #[test]
    fn test_grid_follows_source_bounds() {
        // Left half white, right half black
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }));

        // Steps clamp to 1, so every source pixel is sampled
        let output = AsciiProtocol.render_image(&img, 20, 10);
        assert_eq!(output, "  ##\n  ##\n");
    }

    #[test]
    fn test_step_from_requested_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([0, 0, 0])));

        // Column step 40/20 = 2, row step 50/10 = 5
        let output = AsciiProtocol.render_image(&img, 40, 50);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| line.len() == 50));
        assert!(lines.iter().all(|line| line.chars().all(|c| c == '#')));
    }

    #[test]
    fn test_zero_request_does_not_hang() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([255, 255, 255])));
        let output = AsciiProtocol.render_image(&img, 0, 0);
        assert_eq!(output, "   \n   \n   \n");
    }
}
