//! Immutable render job and its builder.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{QuizError, QuizResult};

/// Number of items, and therefore images, a job carries.
pub const ITEM_COUNT: usize = 4;

/// Default job length in seconds.
pub const DEFAULT_DURATION_SECONDS: u32 = 20;

/// Default upload title.
pub const DEFAULT_TITLE: &str = "Can you answer it? #shorts";

/// One fully resolved render request.
///
/// Built through [`RenderJobBuilder`], which enforces the item/image count and resolves the
/// default description, so rendering components never see a partially filled job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderJob {
    puzzle_id: String,
    hook: String,
    instruction: String,
    items: [String; ITEM_COUNT],
    images: [PathBuf; ITEM_COUNT],
    duration_seconds: u32,
    title: String,
    description: String,
    tags: Vec<String>,
}

impl RenderJob {
    /// Start building a job for `puzzle_id`.
    pub fn builder(puzzle_id: impl Into<String>) -> RenderJobBuilder {
        RenderJobBuilder::new(puzzle_id)
    }

    /// Content identifier.
    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    /// Top caption.
    pub fn hook(&self) -> &str {
        &self.hook
    }

    /// Rule caption.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Item labels, in grid order.
    pub fn items(&self) -> &[String; ITEM_COUNT] {
        &self.items
    }

    /// Source image paths, in grid order.
    pub fn images(&self) -> &[PathBuf; ITEM_COUNT] {
        &self.images
    }

    /// Length of the video in whole seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Upload title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Upload description, never blank.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Upload tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Description used when a job does not provide one.
pub fn default_description(puzzle_id: &str) -> String {
    [
        "Comment your answers (4 words).",
        "",
        "\u{1F381} Monthly Surprise:",
        "Subscribers with the highest correct answers this month get a surprise gift!",
        "",
        "#quiz #brainteaser #shorts",
        "",
        &format!("(Puzzle: {puzzle_id})"),
    ]
    .join("\n")
}

/// Builder for [`RenderJob`].
#[derive(Clone, Debug)]
pub struct RenderJobBuilder {
    puzzle_id: String,
    hook: String,
    instruction: String,
    items: Vec<String>,
    images: Vec<PathBuf>,
    duration_seconds: u32,
    title: String,
    description: String,
    tags: Vec<String>,
}

impl RenderJobBuilder {
    fn new(puzzle_id: impl Into<String>) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            hook: String::new(),
            instruction: String::new(),
            items: Vec::new(),
            images: Vec::new(),
            duration_seconds: DEFAULT_DURATION_SECONDS,
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the top caption.
    pub fn hook(mut self, hook: impl Into<String>) -> Self {
        self.hook = hook.into();
        self
    }

    /// Set the rule caption.
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set the item labels.
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source images.
    pub fn images<I, P>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Set the video length in seconds.
    pub fn duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the upload title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the upload description; a blank value is replaced by [`default_description`].
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the upload tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and resolve defaults.
    pub fn build(self) -> QuizResult<RenderJob> {
        if self.puzzle_id.trim().is_empty() {
            return Err(QuizError::validation("puzzle id must be non-empty"));
        }
        if self.duration_seconds == 0 {
            return Err(QuizError::validation("duration_seconds must be > 0"));
        }
        let images_len = self.images.len();
        let images: [PathBuf; ITEM_COUNT] = self.images.try_into().map_err(|_| {
            QuizError::validation(format!(
                "job requires exactly {ITEM_COUNT} images, got {images_len}"
            ))
        })?;
        let items_len = self.items.len();
        let items: [String; ITEM_COUNT] = self.items.try_into().map_err(|_| {
            QuizError::validation(format!(
                "job requires exactly {ITEM_COUNT} items, got {items_len}"
            ))
        })?;

        let description = if self.description.trim().is_empty() {
            default_description(&self.puzzle_id)
        } else {
            self.description
        };

        Ok(RenderJob {
            puzzle_id: self.puzzle_id,
            hook: self.hook,
            instruction: self.instruction,
            items,
            images,
            duration_seconds: self.duration_seconds,
            title: self.title,
            description,
            tags: self.tags,
        })
    }
}

/// JSON description of a job, as read by the CLI.
///
/// Relative image paths resolve against the manifest's directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobManifest {
    /// Content identifier.
    pub puzzle_id: String,
    /// Top caption.
    pub hook: String,
    /// Rule caption.
    pub instruction: String,
    /// Item labels.
    pub items: Vec<String>,
    /// Source image paths.
    pub images: Vec<PathBuf>,
    /// Video length in seconds.
    #[serde(default = "default_duration")]
    pub duration_seconds: u32,
    /// Upload title.
    #[serde(default)]
    pub title: Option<String>,
    /// Upload description.
    #[serde(default)]
    pub description: String,
    /// Upload tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECONDS
}

impl JobManifest {
    /// Read a manifest from a JSON file.
    pub fn load(path: &Path) -> QuizResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job manifest '{}'", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| QuizError::serde(format!("parse job '{}': {e}", path.display())))
    }

    /// Convert into a validated job, resolving relative image paths against `base_dir`.
    pub fn into_job(self, base_dir: &Path) -> QuizResult<RenderJob> {
        let images = self.images.into_iter().map(|p| {
            if p.is_absolute() {
                p
            } else {
                base_dir.join(p)
            }
        });
        let mut builder = RenderJob::builder(self.puzzle_id)
            .hook(self.hook)
            .instruction(self.instruction)
            .items(self.items)
            .images(images)
            .duration_seconds(self.duration_seconds)
            .description(self.description)
            .tags(self.tags);
        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        builder.build()
    }
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
