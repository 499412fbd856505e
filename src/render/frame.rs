use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{QuizError, QuizResult};
use crate::foundation::math::flatten_premul_over_bg_to_opaque_rgba8;

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by the CPU renderer are premultiplied; the flag makes that explicit at the
/// sink boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Opaque frame filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: rgba.repeat((width as usize) * (height as usize)),
            premultiplied: true,
        }
    }

    fn expected_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Opaque straight RGBA8 copy, flattened over `bg_rgb` when premultiplied.
    pub fn to_opaque_rgba8(&self, bg_rgb: [u8; 3]) -> QuizResult<Vec<u8>> {
        if self.data.len() != self.expected_len() {
            return Err(QuizError::render(format!(
                "frame data size mismatch: {} bytes for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        let mut out = vec![0u8; self.data.len()];
        if self.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut out, &self.data, bg_rgb)?;
        } else {
            out.copy_from_slice(&self.data);
            for px in out.chunks_exact_mut(4) {
                px[3] = 255;
            }
        }
        Ok(out)
    }

    /// Write the frame as an opaque PNG.
    pub fn save_png(&self, path: &Path, bg_rgb: [u8; 3]) -> QuizResult<()> {
        let rgba = self.to_opaque_rgba8(bg_rgb)?;
        image::save_buffer_with_format(
            path,
            &rgba,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write frame png '{}'", path.display()))?;
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> QuizResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
