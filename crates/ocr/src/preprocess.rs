//! Fixed preprocessing applied before recognition.
//!
//! Contrast is raised by 1.5x and the result converted to grayscale, the
//! same two steps as a CSS `contrast(1.5) grayscale(1)` filter. The image
//! keeps its native resolution. Transparent regions are flattened onto
//! white first so they do not read as black ink.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba};

use crate::error::OcrError;

pub const CONTRAST_FACTOR: f32 = 1.5;

/// Rec. 709 luma weights used by CSS `grayscale()`.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Scale a channel away from mid-gray by `factor`, clamped to `0..=255`.
pub fn apply_contrast(channel: u8, factor: f32) -> u8 {
    let v = (channel as f32 - 127.5) * factor + 127.5;
    v.round().clamp(0.0, 255.0) as u8
}

fn flatten_on_white(Rgba([r, g, b, a]): Rgba<u8>) -> [f32; 3] {
    let alpha = a as f32 / 255.0;
    let blend = |c: u8| c as f32 * alpha + 255.0 * (1.0 - alpha);
    [blend(r), blend(g), blend(b)]
}

/// Contrast 1.5x, then grayscale.
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = flatten_on_white(*rgba.get_pixel(x, y));
        let [r, g, b] = [r, g, b].map(|c| apply_contrast(c.round() as u8, CONTRAST_FACTOR) as f32);
        let luma = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Decode, preprocess, and re-encode as PNG for the recognizer.
pub fn prepare_for_recognition(bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
    let decoded = image::load_from_memory(bytes)?;
    let gray = preprocess(&decoded);
    let mut png = Vec::new();
    DynamicImage::ImageLuma8(gray).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn contrast_pushes_away_from_mid_gray() {
        assert_eq!(apply_contrast(0, CONTRAST_FACTOR), 0);
        assert_eq!(apply_contrast(255, CONTRAST_FACTOR), 255);
        assert_eq!(apply_contrast(100, CONTRAST_FACTOR), 86);
        assert_eq!(apply_contrast(200, CONTRAST_FACTOR), 236);
        assert_eq!(apply_contrast(128, 1.0), 128);
    }

    #[test]
    fn output_keeps_native_resolution() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(37, 11));
        let gray = preprocess(&img);
        assert_eq!(gray.dimensions(), (37, 11));
    }

    #[test]
    fn pure_colors_map_to_weighted_luma() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 0, 255, 255]));
        let gray = preprocess(&DynamicImage::ImageRgba8(img));
        assert_eq!(gray.get_pixel(0, 0).0[0], 54);
        assert_eq!(gray.get_pixel(1, 0).0[0], 182);
        assert_eq!(gray.get_pixel(2, 0).0[0], 18);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        assert_eq!(preprocess(&img).get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn prepared_bytes_are_png() {
        let mut src = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255])))
            .write_to(&mut Cursor::new(&mut src), ImageFormat::Png)
            .unwrap();
        let png = prepare_for_recognition(&src).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(prepare_for_recognition(b"not an image").is_err());
    }
}
