// ABOUTME: Nearest-neighbour resizing shared by the pixel-exact protocols
// ABOUTME: Produces an RGBA buffer of exactly the requested output size

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Resize `img` to exactly `width × height` with nearest-neighbour sampling.
///
/// Aspect ratio is not preserved; callers ask for the cell box they have.
/// Returns `None` when either dimension is zero.
pub fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> Option<RgbaImage> {
    if width == 0 || height == 0 {
        return None;
    }

    if img.width() == width && img.height() == height {
        return Some(img.to_rgba8());
    }

    log::debug!(
        "Scaling image from {}x{} to {}x{}",
        img.width(),
        img.height(),
        width,
        height
    );
    Some(imageops::resize(img, width, height, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_resize_to_exact_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(300, 400));
        let resized = resize_exact(&img, 40, 20).unwrap();
        assert_eq!(resized.dimensions(), (40, 20));
    }

    #[test]
    fn test_nearest_keeps_hard_edges() {
        // Left half red, right half blue
        let img = RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let resized = resize_exact(&DynamicImage::ImageRgba8(img), 8, 4).unwrap();

        let mut colors: Vec<[u8; 4]> = resized.pixels().map(|p| p.0).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors, vec![[0, 0, 255, 255], [255, 0, 0, 255]]);
    }

    #[test]
    fn test_zero_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        assert!(resize_exact(&img, 0, 10).is_none());
        assert!(resize_exact(&img, 10, 0).is_none());
    }
}
