use std::path::Path;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::foundation::error::{QuizError, QuizResult};
use crate::metadata::RenderMetadata;

/// Longest title the platform accepts, in characters.
pub const MAX_TITLE_CHARS: usize = 100;
/// Longest description the platform accepts, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
/// Marker every title must carry.
pub const SHORTS_TAG: &str = "#shorts";

/// What gets published alongside the video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSnippet {
    /// Title, always containing [`SHORTS_TAG`], at most [`MAX_TITLE_CHARS`].
    pub title: String,
    /// Description, at most [`MAX_DESCRIPTION_CHARS`].
    pub description: String,
    /// Tags.
    pub tags: Vec<String>,
}

impl UploadSnippet {
    /// Build from a metadata sidecar, enforcing platform limits.
    pub fn from_metadata(meta: &RenderMetadata) -> Self {
        let mut title = meta.title.trim().to_owned();
        if !title.to_lowercase().contains(SHORTS_TAG) {
            title = format!("{title} {SHORTS_TAG}");
        }
        Self {
            title: truncate_chars(&title, MAX_TITLE_CHARS),
            description: truncate_chars(meta.description.trim(), MAX_DESCRIPTION_CHARS),
            tags: meta.tags.clone(),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Publishes one video. Returns the remote identifier.
pub trait Uploader {
    /// Attempt a single upload.
    fn upload(&mut self, video: &Path, snippet: &UploadSnippet) -> QuizResult<String>;
}

/// Outcome of [`upload_with_retry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReport {
    /// Attempts made, at least 1.
    pub attempts: u32,
    /// Whether an attempt succeeded.
    pub success: bool,
    /// Remote identifier on success.
    pub remote_id: Option<String>,
    /// Wall time spent, including backoff.
    pub elapsed: Duration,
    /// Last error message on failure.
    pub error: Option<String>,
}

/// Attempt count and linear backoff (`base_delay * attempt`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts.
    pub attempts: u32,
    /// Delay unit between attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Wait before attempt `attempt + 1`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Shared flag that interrupts backoff waits.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and wake every waiter.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock().unwrap_or_else(|p| p.into_inner());
        *cancelled = true;
        cvar.notify_all();
    }

    /// Whether [`CancelToken::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Sleep up to `timeout`, returning early with `true` if cancelled.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(|p| p.into_inner());
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(|p| p.into_inner());
        *guard
    }
}

/// Upload `video` with the metadata at `meta_path`, retrying failed attempts.
///
/// Precondition failures (missing video or sidecar) are returned as errors. Attempt failures
/// are reported through [`UploadReport`]. Cancellation during a backoff wait returns
/// [`QuizError::Cancelled`].
pub fn upload_with_retry(
    uploader: &mut dyn Uploader,
    video: &Path,
    meta_path: &Path,
    policy: RetryPolicy,
    cancel: &CancelToken,
) -> QuizResult<UploadReport> {
    let started = Instant::now();
    if !video.is_file() {
        return Err(QuizError::validation(format!(
            "video not found: {}",
            video.display()
        )));
    }
    let meta = RenderMetadata::load(meta_path)?;
    let snippet = UploadSnippet::from_metadata(&meta);
    let attempts = policy.attempts.max(1);

    let mut last_error = None;
    for attempt in 1..=attempts {
        tracing::info!(attempt, attempts, video = %video.display(), "upload attempt");
        match uploader.upload(video, &snippet) {
            Ok(remote_id) => {
                tracing::info!(%remote_id, elapsed_secs = started.elapsed().as_secs_f64(), "upload completed");
                return Ok(UploadReport {
                    attempts: attempt,
                    success: true,
                    remote_id: Some(remote_id),
                    elapsed: started.elapsed(),
                    error: None,
                });
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "upload attempt failed");
                last_error = Some(e.to_string());
            }
        }
        if attempt < attempts {
            let delay = policy.delay_after(attempt);
            tracing::info!(delay_secs = delay.as_secs_f64(), "retrying upload");
            if cancel.wait(delay) {
                return Err(QuizError::cancelled("upload retry cancelled"));
            }
        }
    }

    tracing::error!(attempts, "upload failed");
    Ok(UploadReport {
        attempts,
        success: false,
        remote_id: None,
        elapsed: started.elapsed(),
        error: last_error,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/collab/upload.rs"]
mod tests;
