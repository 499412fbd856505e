//! JSON sidecar written next to every rendered video.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{QuizError, QuizResult};
use crate::job::RenderJob;
use crate::render::frame::ensure_parent_dir;

/// Everything the upload step needs to publish a video.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMetadata {
    /// Content identifier.
    pub puzzle_id: String,
    /// Top caption.
    pub hook: String,
    /// Rule caption.
    pub instruction: String,
    /// Item labels, in grid order.
    pub items: Vec<String>,
    /// Countdown length in seconds.
    pub timer_seconds: u32,
    /// Frame rate of the video.
    pub fps: u32,
    /// Upload title.
    pub title: String,
    /// Upload description.
    pub description: String,
    /// Upload tags.
    pub tags: Vec<String>,
}

impl RenderMetadata {
    /// Metadata for `job` rendered with a `timer_seconds` countdown at `fps`.
    pub fn from_job(job: &RenderJob, timer_seconds: u32, fps: u32) -> Self {
        Self {
            puzzle_id: job.puzzle_id().to_owned(),
            hook: job.hook().to_owned(),
            instruction: job.instruction().to_owned(),
            items: job.items().to_vec(),
            timer_seconds,
            fps,
            title: job.title().to_owned(),
            description: job.description().to_owned(),
            tags: job.tags().to_vec(),
        }
    }

    /// Write pretty-printed UTF-8 JSON to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> QuizResult<()> {
        ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| QuizError::serde(format!("encode metadata: {e}")))?;
        std::fs::write(path, json)
            .with_context(|| format!("write metadata '{}'", path.display()))?;
        Ok(())
    }

    /// Read a sidecar back.
    pub fn load(path: &Path) -> QuizResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read metadata '{}'", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| QuizError::serde(format!("parse metadata '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../tests/unit/metadata.rs"]
mod tests;
