use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::error::{QuizError, QuizResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::scene::layout::BoxSize;

/// Raster in premultiplied RGBA8, ready to be turned into a paint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Premultiply a straight-alpha image.
    pub fn from_rgba(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut bytes = img.into_raw();
        premultiply_rgba8_in_place(&mut bytes);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }

    /// Opaque image filled with one color.
    pub fn solid(size: BoxSize, rgb: [u8; 3]) -> Self {
        let img = RgbaImage::from_pixel(
            size.width,
            size.height,
            image::Rgba([rgb[0], rgb[1], rgb[2], 255]),
        );
        Self::from_rgba(img)
    }
}

/// Decode an encoded raster from memory.
pub fn decode_rgba(bytes: &[u8]) -> QuizResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode a raster file.
pub fn load_rgba(path: &Path) -> QuizResult<RgbaImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| QuizError::asset(format!("read image '{}': {e}", path.display())))?;
    decode_rgba(&bytes)
        .map_err(|e| QuizError::asset(format!("decode image '{}': {e}", path.display())))
}

/// Scale to cover `size` exactly, cropping the overflow around the center.
pub fn cover_resize(img: RgbaImage, size: BoxSize) -> RgbaImage {
    if img.dimensions() == (size.width, size.height) {
        return img;
    }
    image::DynamicImage::ImageRgba8(img)
        .resize_to_fill(size.width, size.height, FilterType::Lanczos3)
        .to_rgba8()
}

/// Stretch to exactly `size`.
pub fn exact_resize(img: &RgbaImage, size: BoxSize) -> RgbaImage {
    if img.dimensions() == (size.width, size.height) {
        return img.clone();
    }
    image::imageops::resize(img, size.width, size.height, FilterType::Lanczos3)
}

/// Target size after proportional upscaling to at least `min_width` x `min_height`.
///
/// Returns `None` when the image already meets both minimums.
pub fn upscaled_dimensions(
    width: u32,
    height: u32,
    min_width: u32,
    min_height: u32,
) -> Option<(u32, u32)> {
    if width >= min_width && height >= min_height {
        return None;
    }
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));
    let scale = (f64::from(min_width) / w).max(f64::from(min_height) / h);
    let new_w = ((w * scale).round() as u32).max(min_width);
    let new_h = ((h * scale).round() as u32).max(min_height);
    Some((new_w, new_h))
}

/// Upscale an undersized image proportionally (Lanczos3) so both sides meet the minimum.
pub fn ensure_min_size(img: RgbaImage, min_width: u32, min_height: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    match upscaled_dimensions(w, h, min_width, min_height) {
        None => img,
        Some((new_w, new_h)) => {
            tracing::debug!(from_w = w, from_h = h, new_w, new_h, "upscaling undersized image");
            image::imageops::resize(&img, new_w, new_h, FilterType::Lanczos3)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
