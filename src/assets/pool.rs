use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::foundation::error::QuizResult;

/// Raster extensions accepted in the background pool.
pub const BACKGROUND_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Audio extensions accepted in the music pool.
pub const MUSIC_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac"];

/// A directory of interchangeable ambient assets filtered by extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPool {
    root: PathBuf,
    extensions: &'static [&'static str],
}

impl AssetPool {
    /// Pool over `root`, accepting files whose lowercase extension is in `extensions`.
    pub fn new(root: impl Into<PathBuf>, extensions: &'static [&'static str]) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    /// Background image pool.
    pub fn backgrounds(root: impl Into<PathBuf>) -> Self {
        Self::new(root, BACKGROUND_EXTENSIONS)
    }

    /// Music pool.
    pub fn music(root: impl Into<PathBuf>) -> Self {
        Self::new(root, MUSIC_EXTENSIONS)
    }

    /// Pool directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All matching files below the root, recursively, in sorted order.
    ///
    /// A missing root is an empty pool.
    pub fn list(&self) -> QuizResult<Vec<PathBuf>> {
        let mut out = Vec::new();
        if self.root.is_dir() {
            collect_files(&self.root, self.extensions, &mut out)?;
        }
        out.sort();
        Ok(out)
    }

    /// Pick one entry uniformly at random, or `None` for an empty pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizResult<Option<PathBuf>> {
        let entries = self.list()?;
        Ok(entries.choose(rng).cloned())
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| extensions.contains(&e.as_str()))
}

fn collect_files(dir: &Path, extensions: &[&str], out: &mut Vec<PathBuf>) -> QuizResult<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("list asset dir '{}': {e}", dir.display()))?;
    for entry in entries {
        let path = entry
            .map_err(|e| anyhow::anyhow!("read entry in '{}': {e}", dir.display()))?
            .path();
        if path.is_dir() {
            collect_files(&path, extensions, out)?;
        } else if path.is_file() && has_extension(&path, extensions) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;
