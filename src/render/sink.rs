use std::path::{Path, PathBuf};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: Fps,
    /// Number of frames that will be pushed.
    pub total_frames: u64,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> QuizResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuizResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> QuizResult<()>;
}

/// Minimum zero-padded width of frame numbers.
pub const MIN_FRAME_DIGITS: usize = 5;

/// Digits needed to number `total` frames from zero, never fewer than [`MIN_FRAME_DIGITS`].
pub fn frame_digits(total: u64) -> usize {
    let last = total.saturating_sub(1);
    let digits = last.checked_ilog10().map_or(1, |d| d as usize + 1);
    digits.max(MIN_FRAME_DIGITS)
}

/// Writes each frame to `<dir>/frame_NNNNN.png` as soon as it arrives.
///
/// Peak memory is one frame regardless of video length. Numbers are zero-padded to a fixed
/// width so lexical order equals timeline order.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    bg_rgb: [u8; 3],
    digits: usize,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    /// File name prefix of every frame.
    pub const PREFIX: &'static str = "frame_";

    /// Sink writing into `dir`; any transparency is flattened over `bg_rgb`.
    pub fn new(dir: impl Into<PathBuf>, bg_rgb: [u8; 3]) -> Self {
        Self {
            dir: dir.into(),
            bg_rgb,
            digits: MIN_FRAME_DIGITS,
            cfg: None,
            last_idx: None,
            written: 0,
        }
    }

    /// Directory frames are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!(
            "{}{:0width$}.png",
            Self::PREFIX,
            idx.0,
            width = self.digits
        ))
    }

    /// `printf`-style input pattern understood by ffmpeg's image2 demuxer.
    pub fn input_pattern(&self) -> PathBuf {
        self.dir
            .join(format!("{}%0{}d.png", Self::PREFIX, self.digits))
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> QuizResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(QuizError::render(
                "frame sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            QuizError::render(format!(
                "create frame directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.digits = frame_digits(cfg.total_frames);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuizResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| QuizError::render("frame sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(QuizError::render(
                "frame sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(QuizError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);

        let path = self.frame_path(idx);
        frame
            .save_png(&path, self.bg_rgb)
            .map_err(|e| QuizError::render(format!("persist frame {}: {e}", idx.0)))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> QuizResult<()> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| QuizError::render("frame sink not started"))?;
        if self.written != cfg.total_frames {
            return Err(QuizError::render(format!(
                "frame sink expected {} frames, got {}",
                cfg.total_frames, self.written
            )));
        }
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> QuizResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuizResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> QuizResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
