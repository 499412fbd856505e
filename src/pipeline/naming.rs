use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::PathsConfig;

/// Compact UTC timestamp, `YYYYMMDD_HHMMSS`.
pub fn utc_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Keep ASCII alphanumerics, `-` and `_`; everything else is dropped.
///
/// An id with nothing left becomes `"job"`.
pub fn sanitize_id(id: &str) -> String {
    let safe: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if safe.is_empty() {
        "job".to_owned()
    } else {
        safe
    }
}

/// `<stamp>_<sanitized id>`.
pub fn base_name(now: DateTime<Utc>, puzzle_id: &str) -> String {
    format!("{}_{}", utc_stamp(now), sanitize_id(puzzle_id))
}

/// Where one render writes its files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// Shared file stem.
    pub base: String,
    /// Final video.
    pub video: PathBuf,
    /// Metadata sidecar.
    pub metadata: PathBuf,
    /// Private work directory, removed after the render.
    pub work_dir: PathBuf,
    /// Frame store inside the work directory.
    pub frames_dir: PathBuf,
}

impl OutputPaths {
    /// Paths for `base` under the configured directories.
    pub fn new(paths: &PathsConfig, base: &str) -> Self {
        let work_dir = paths.work_root().join(base);
        Self {
            base: base.to_owned(),
            video: paths.videos_dir().join(format!("{base}.mp4")),
            metadata: paths.meta_dir().join(format!("{base}.json")),
            frames_dir: work_dir.join("frames"),
            work_dir,
        }
    }

    /// Like [`OutputPaths::new`], appending `_2`, `_3`, ... while any of the paths is taken.
    pub fn unique(paths: &PathsConfig, base: &str) -> Self {
        let first = Self::new(paths, base);
        if !first.is_taken() {
            return first;
        }
        let mut n = 2u32;
        loop {
            let candidate = Self::new(paths, &format!("{base}_{n}"));
            if !candidate.is_taken() {
                return candidate;
            }
            n += 1;
        }
    }

    fn is_taken(&self) -> bool {
        [&self.video, &self.metadata, &self.work_dir]
            .iter()
            .any(|p| p.exists())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/naming.rs"]
mod tests;
