//! Render configuration.
//!
//! Values come from [`RenderConfig::default`], optionally a JSON file, and finally `QUIZREEL_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{QuizError, QuizResult};

/// Prefix shared by all environment overrides.
pub const ENV_PREFIX: &str = "QUIZREEL_";

/// Complete configuration for a render run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output video parameters.
    pub video: VideoConfig,
    /// Timeline phase lengths and entrance motion.
    pub timing: TimingConfig,
    /// Background music handling.
    pub audio: AudioConfig,
    /// Source image size requirements.
    pub images: ImageConfig,
    /// Filesystem locations.
    pub paths: PathsConfig,
    /// Closing scene copy.
    pub outro: OutroConfig,
    /// Logging setup used by the binary.
    pub logging: LoggingConfig,
    /// Seed for ambient asset selection; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Keep the per-job work directory when a render fails.
    pub keep_failed_workdir: bool,
}

/// Output video parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// x264 constant rate factor.
    pub crf: u8,
    /// x264 speed preset.
    pub preset: String,
}

/// Timeline phase lengths and entrance motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Countdown length in seconds, independent of the job duration.
    pub countdown_seconds: u32,
    /// Length of each entrance animation in seconds.
    pub entry_duration: f64,
    /// Delay between consecutive grid tiles in seconds.
    pub stagger_delay: f64,
    /// Length of the closing scene in seconds.
    pub outro_seconds: f64,
    /// Fade-in length of the closing scene in seconds.
    pub outro_fade_seconds: f64,
    /// Slide-in direction of the hook caption in degrees.
    pub hook_angle_deg: f64,
    /// Slide-in direction of the instruction caption in degrees.
    pub instruction_angle_deg: f64,
    /// Slide-in direction shared by the grid tiles in degrees.
    pub grid_angle_deg: f64,
    /// Slide distance in pixels.
    pub slide_distance: f64,
}

/// Background music handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Mix a random track from the music pool when one exists.
    pub enable_music: bool,
    /// Music attenuation factor.
    pub music_volume: f64,
}

/// Source image size requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Minimum width in pixels; smaller images are upscaled.
    pub min_width: u32,
    /// Minimum height in pixels; smaller images are upscaled.
    pub min_height: u32,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the read-only asset pools.
    pub assets_dir: PathBuf,
    /// Scratch space; per-job work directories live under `<cache>/tmp`.
    pub cache_dir: PathBuf,
    /// Root of rendered outputs.
    pub output_dir: PathBuf,
    /// Bold face used for captions, the countdown and the outro.
    pub font_primary: PathBuf,
    /// Regular face used for the instruction and icon labels.
    pub font_secondary: PathBuf,
}

/// Closing scene copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutroConfig {
    /// Centered title.
    pub title: String,
    /// Colored call to action, may contain a line break.
    pub call_to_action: String,
    /// Icon name (file stem under `assets/icons`) and label, left to right.
    pub actions: Vec<OutroAction>,
}

/// One icon + label pair in the closing scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutroAction {
    /// Icon file stem.
    pub icon: String,
    /// Label drawn below the icon.
    pub label: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "quizreel=debug,warn").
    pub level: String,
    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            video: VideoConfig::default(),
            timing: TimingConfig::default(),
            audio: AudioConfig::default(),
            images: ImageConfig::default(),
            paths: PathsConfig::default(),
            outro: OutroConfig::default(),
            logging: LoggingConfig::default(),
            seed: None,
            keep_failed_workdir: false,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            crf: 20,
            preset: "medium".to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 15,
            entry_duration: 0.5,
            stagger_delay: 0.2,
            outro_seconds: 3.0,
            outro_fade_seconds: 0.6,
            hook_angle_deg: 270.0,
            instruction_angle_deg: 0.0,
            grid_angle_deg: 180.0,
            slide_distance: 300.0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enable_music: true,
            music_volume: 0.15,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_width: 600,
            min_height: 600,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            cache_dir: PathBuf::from("cache"),
            output_dir: PathBuf::from("output"),
            font_primary: PathBuf::from("assets/fonts/Inter-Bold.ttf"),
            font_secondary: PathBuf::from("assets/fonts/Inter-Regular.ttf"),
        }
    }
}

impl Default for OutroConfig {
    fn default() -> Self {
        let action = |icon: &str, label: &str| OutroAction {
            icon: icon.to_string(),
            label: label.to_string(),
        };
        Self {
            title: "\u{1F381} Monthly Rewards".to_string(),
            call_to_action: "Top commenters with correct answers\nget rewarded every month!"
                .to_string(),
            actions: vec![
                action("like", "Like"),
                action("comment", "Comment"),
                action("subscribe", "Subscribe"),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PathsConfig {
    /// Directory holding background images.
    pub fn backgrounds_dir(&self) -> PathBuf {
        self.assets_dir.join("backgrounds")
    }

    /// Directory holding music tracks.
    pub fn music_dir(&self) -> PathBuf {
        self.assets_dir.join("music")
    }

    /// Optional logo overlay.
    pub fn logo_path(&self) -> PathBuf {
        self.assets_dir.join("logo.png")
    }

    /// Optional icon overlay for `name`.
    pub fn icon_path(&self, name: &str) -> PathBuf {
        self.assets_dir.join("icons").join(format!("{name}.png"))
    }

    /// Final videos.
    pub fn videos_dir(&self) -> PathBuf {
        self.output_dir.join("videos")
    }

    /// Metadata sidecars.
    pub fn meta_dir(&self) -> PathBuf {
        self.output_dir.join("meta")
    }

    /// Parent of per-job work directories.
    pub fn work_root(&self) -> PathBuf {
        self.cache_dir.join("tmp")
    }

    /// Upscaled copies of undersized item images.
    pub fn image_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("images")
    }

    /// Ledger of puzzle ids that were rendered.
    pub fn used_puzzles_path(&self) -> PathBuf {
        self.output_dir.join("used_puzzles.txt")
    }
}

impl RenderConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> QuizResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| QuizError::config(format!("parse config '{}': {e}", path.display())))
    }

    /// Apply `QUIZREEL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> QuizResult<Self> {
        self.with_overrides_from(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Apply overrides from an arbitrary key lookup (keys are given without the prefix).
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> QuizResult<Self> {
        if let Some(v) = lookup("WIDTH") {
            self.video.width = parse_env("WIDTH", &v)?;
        }
        if let Some(v) = lookup("HEIGHT") {
            self.video.height = parse_env("HEIGHT", &v)?;
        }
        if let Some(v) = lookup("FPS") {
            self.video.fps = parse_env("FPS", &v)?;
        }
        if let Some(v) = lookup("CRF") {
            self.video.crf = parse_env("CRF", &v)?;
        }
        if let Some(v) = lookup("PRESET") {
            self.video.preset = v;
        }
        if let Some(v) = lookup("TIMER_SECONDS") {
            self.timing.countdown_seconds = parse_env("TIMER_SECONDS", &v)?;
        }
        if let Some(v) = lookup("MUSIC_VOLUME") {
            self.audio.music_volume = parse_env("MUSIC_VOLUME", &v)?;
        }
        if let Some(v) = lookup("ENABLE_MUSIC") {
            self.audio.enable_music = parse_bool(&v);
        }
        if let Some(v) = lookup("ASSETS_DIR") {
            self.paths.assets_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CACHE_DIR") {
            self.paths.cache_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(self)
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.video.width,
            height: self.video.height,
        }
    }

    /// Output frame rate.
    pub fn fps(&self) -> QuizResult<Fps> {
        Fps::new(self.video.fps).map_err(|_| QuizError::config("video.fps must be > 0"))
    }

    /// Check internal consistency.
    pub fn validate(&self) -> QuizResult<()> {
        self.canvas()
            .validate()
            .map_err(|e| QuizError::config(e.to_string()))?;
        self.fps()?;
        if self.video.crf > 51 {
            return Err(QuizError::config("video.crf must be within 0..=51"));
        }
        if self.video.preset.trim().is_empty() {
            return Err(QuizError::config("video.preset must be non-empty"));
        }
        let t = &self.timing;
        for (name, v) in [
            ("timing.entry_duration", t.entry_duration),
            ("timing.outro_seconds", t.outro_seconds),
            ("timing.outro_fade_seconds", t.outro_fade_seconds),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(QuizError::config(format!("{name} must be finite and > 0")));
            }
        }
        if !t.stagger_delay.is_finite() || t.stagger_delay < 0.0 {
            return Err(QuizError::config(
                "timing.stagger_delay must be finite and >= 0",
            ));
        }
        if !t.slide_distance.is_finite() {
            return Err(QuizError::config("timing.slide_distance must be finite"));
        }
        if !self.audio.music_volume.is_finite() || self.audio.music_volume < 0.0 {
            return Err(QuizError::config(
                "audio.music_volume must be finite and >= 0",
            ));
        }
        if self.images.min_width == 0 || self.images.min_height == 0 {
            return Err(QuizError::config("images.min_width/min_height must be > 0"));
        }
        Ok(())
    }

    /// Both fonts must exist before any frame is produced.
    pub fn check_fonts(&self) -> QuizResult<()> {
        for (role, path) in [
            ("primary", &self.paths.font_primary),
            ("secondary", &self.paths.font_secondary),
        ] {
            if !path.is_file() {
                return Err(QuizError::config(format!(
                    "{role} font not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> QuizResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        QuizError::config(format!(
            "environment variable {ENV_PREFIX}{key} has invalid value '{value}'"
        ))
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
