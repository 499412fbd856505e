use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::decode::{ensure_min_size, load_rgba, upscaled_dimensions};
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::frame::ensure_parent_dir;

/// Extensions tried, in order, for each item.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Provides one raster per puzzle item, each at least the configured minimum size.
pub trait ImageSource {
    /// Paths of images for `items`, in the same order.
    fn images_for(&mut self, items: &[String]) -> QuizResult<Vec<PathBuf>>;
}

/// Lowercase, drop punctuation, collapse runs of whitespace, `-` and `_` into one `_`.
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    let mut slug = String::with_capacity(kept.len());
    let mut in_sep = false;
    for c in kept.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !in_sep {
                slug.push('_');
            }
            in_sep = true;
        } else {
            slug.push(c);
            in_sep = false;
        }
    }
    slug
}

/// Looks up `<dir>/<slug>.<ext>` for each item.
///
/// Undersized images are upscaled proportionally and written to `cache_dir` as PNG; the cached
/// copy is returned in their place.
#[derive(Clone, Debug)]
pub struct DirectoryImageSource {
    dir: PathBuf,
    cache_dir: PathBuf,
    min_width: u32,
    min_height: u32,
}

impl DirectoryImageSource {
    /// Source reading from `dir`, caching upscaled copies in `cache_dir`.
    pub fn new(
        dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        min_width: u32,
        min_height: u32,
    ) -> Self {
        Self {
            dir: dir.into(),
            cache_dir: cache_dir.into(),
            min_width,
            min_height,
        }
    }

    fn find(&self, slug: &str) -> Option<PathBuf> {
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{slug}.{ext}")))
            .find(|p| p.is_file())
    }

    fn ensure_large_enough(&self, path: &Path, slug: &str) -> QuizResult<PathBuf> {
        let img = load_rgba(path)?;
        let (w, h) = img.dimensions();
        if upscaled_dimensions(w, h, self.min_width, self.min_height).is_none() {
            return Ok(path.to_path_buf());
        }
        let big = ensure_min_size(img, self.min_width, self.min_height);
        tracing::warn!(
            item = slug,
            from = %format!("{w}x{h}"),
            to = %format!("{}x{}", big.width(), big.height()),
            "upscaling undersized image"
        );
        let cached = self.cache_dir.join(format!("{slug}.png"));
        ensure_parent_dir(&cached)?;
        big.save_with_format(&cached, image::ImageFormat::Png)
            .with_context(|| format!("write upscaled image '{}'", cached.display()))?;
        Ok(cached)
    }
}

impl ImageSource for DirectoryImageSource {
    fn images_for(&mut self, items: &[String]) -> QuizResult<Vec<PathBuf>> {
        items
            .iter()
            .map(|item| {
                let slug = slugify(item);
                let path = self.find(&slug).ok_or_else(|| {
                    QuizError::asset(format!(
                        "no image for '{item}' in '{}' (looked for {slug}.{{{}}})",
                        self.dir.display(),
                        IMAGE_EXTENSIONS.join(",")
                    ))
                })?;
                self.ensure_large_enough(&path, &slug)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/images.rs"]
mod tests;
