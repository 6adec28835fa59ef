//! Screenshot compression before upload.
//!
//! Screenshots are attached inline as `data:` URIs, so they are shrunk to
//! at most 800 px wide and re-encoded as JPEG before the bug is created.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};

use crate::error::OcrError;
use crate::source::to_data_uri;

pub const MAX_UPLOAD_WIDTH: u32 = 800;
pub const UPLOAD_JPEG_QUALITY: u8 = 70;

/// Compressed screenshot ready to be sent as `screenshot_url`.
#[derive(Debug, Clone)]
pub struct CompressedAttachment {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

impl CompressedAttachment {
    pub fn data_uri(&self) -> String {
        to_data_uri("image/jpeg", &self.jpeg)
    }
}

/// Target size: unchanged when already narrow enough, else scaled to
/// `MAX_UPLOAD_WIDTH` keeping the aspect ratio.
pub fn upload_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_UPLOAD_WIDTH {
        return (width, height);
    }
    let scaled = (height as u64 * MAX_UPLOAD_WIDTH as u64 / width as u64).max(1);
    (MAX_UPLOAD_WIDTH, scaled as u32)
}

/// Decode, downscale, flatten transparency onto white, and encode as JPEG.
pub fn compress_for_upload(bytes: &[u8]) -> Result<CompressedAttachment, OcrError> {
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();
    let (target_w, target_h) = upload_dimensions(width, height);

    let resized = if (target_w, target_h) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_w, target_h, FilterType::Triangle)
    };
    let rgb = flatten(&resized);

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut Cursor::new(&mut jpeg), UPLOAD_JPEG_QUALITY)
        .encode_image(&rgb)?;

    tracing::debug!(
        original_width = width,
        width = target_w,
        height = target_h,
        bytes = jpeg.len(),
        "Compressed screenshot for upload",
    );

    Ok(CompressedAttachment {
        width: target_w,
        height: target_h,
        jpeg,
    })
}

fn flatten(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
