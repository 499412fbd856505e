use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::RenderConfig;
use crate::encode::command::{CommandOutcome, CommandRunner, CommandSpec, SystemCommandRunner};
use crate::foundation::core::Fps;
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::frame::ensure_parent_dir;

/// Program name used for every stage.
pub const FFMPEG: &str = "ffmpeg";

/// AAC bitrate of the muxed audio track.
pub const AUDIO_BITRATE: &str = "192k";

/// Video encode parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeSettings {
    /// Target width.
    pub width: u32,
    /// Target height.
    pub height: u32,
    /// Frame rate of the image sequence.
    pub fps: Fps,
    /// x264 constant rate factor.
    pub crf: u8,
    /// x264 speed preset.
    pub preset: String,
}

impl EncodeSettings {
    /// Settings taken from the `video` section of `config`.
    pub fn from_config(config: &RenderConfig) -> QuizResult<Self> {
        Ok(Self {
            width: config.video.width,
            height: config.video.height,
            fps: config.fps()?,
            crf: config.video.crf,
            preset: config.video.preset.clone(),
        })
    }

    fn filter(&self) -> String {
        let (w, h) = (self.width, self.height);
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,format=yuv420p"
        )
    }
}

/// Encode a numbered image sequence to H.264/yuv420p with a fast-start container.
pub fn encode_command(settings: &EncodeSettings, input_pattern: &Path, out: &Path) -> CommandSpec {
    CommandSpec::new(FFMPEG)
        .args(["-y", "-loglevel", "error", "-stats"])
        .args(["-framerate", &settings.fps.get().to_string()])
        .arg("-i")
        .arg(input_pattern)
        .args(["-vf", &settings.filter()])
        .args(["-c:v", "libx264", "-preset", &settings.preset])
        .args(["-crf", &settings.crf.to_string()])
        .args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"])
        .arg(out)
}

/// Mix attenuated music with the video's own audio track, trimmed to the shorter input.
pub fn mix_command(video: &Path, music: &Path, volume: f64, out: &Path) -> CommandSpec {
    let graph = format!("[1:a]volume={volume}[bg];[0:a][bg]amix=inputs=2:duration=shortest[aout]");
    CommandSpec::new(FFMPEG)
        .args(["-y", "-loglevel", "error"])
        .arg("-i")
        .arg(video)
        .arg("-i")
        .arg(music)
        .args(["-filter_complex", &graph])
        .args(["-map", "0:v:0", "-map", "[aout]"])
        .args(audio_output_args())
        .arg(out)
}

/// Map the music as the only audio stream, copying video untouched.
pub fn music_only_command(video: &Path, music: &Path, out: &Path) -> CommandSpec {
    CommandSpec::new(FFMPEG)
        .args(["-y", "-loglevel", "error"])
        .arg("-i")
        .arg(video)
        .arg("-i")
        .arg(music)
        .args(["-map", "0:v:0", "-map", "1:a:0"])
        .args(audio_output_args())
        .arg(out)
}

fn audio_output_args() -> [&'static str; 9] {
    [
        "-c:v",
        "copy",
        "-c:a",
        "aac",
        "-b:a",
        AUDIO_BITRATE,
        "-shortest",
        "-movflags",
        "+faststart",
    ]
}

/// Path of the video-only intermediate next to `out` (`x.mp4` -> `x.nomusic.mp4`).
pub fn intermediate_path(out: &Path) -> PathBuf {
    out.with_extension("nomusic.mp4")
}

fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial video");
        }
    }
}

/// How the final audio track was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuxOutcome {
    /// Music mixed with the video's own audio.
    Mixed,
    /// Mixing failed; the music is the only audio stream.
    MusicOnly,
    /// No music; the encoded video was promoted as is.
    NoMusic,
}

/// Encode and mux stages over an injected [`CommandRunner`].
#[derive(Debug)]
pub struct FfmpegEncoder<R = SystemCommandRunner> {
    runner: R,
}

impl FfmpegEncoder<SystemCommandRunner> {
    /// Encoder running the system `ffmpeg`.
    pub fn system() -> Self {
        Self::new(SystemCommandRunner)
    }
}

impl<R: CommandRunner> FfmpegEncoder<R> {
    /// Encoder running processes through `runner`.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Borrow the runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Recover the runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    fn run(&mut self, spec: &CommandSpec) -> QuizResult<CommandOutcome> {
        self.runner.run(spec)
    }

    /// Encode the frame sequence at `input_pattern` into `out`.
    ///
    /// A non-zero exit is fatal and carries ffmpeg's diagnostics.
    pub fn encode_frames(
        &mut self,
        settings: &EncodeSettings,
        input_pattern: &Path,
        out: &Path,
    ) -> QuizResult<()> {
        ensure_parent_dir(out)?;
        let spec = encode_command(settings, input_pattern, out);
        tracing::info!(out = %out.display(), crf = settings.crf, preset = %settings.preset, "encoding video");
        self.run(&spec)?.into_result(FFMPEG)
    }

    /// Add `music` to `video`, writing `out`.
    ///
    /// Tries a mix with the video's audio first; if that fails (typically because the video has
    /// no audio track) the music is mapped as the sole audio stream.
    pub fn mux_music(
        &mut self,
        video: &Path,
        music: &Path,
        volume: f64,
        out: &Path,
    ) -> QuizResult<MuxOutcome> {
        let mixed = self.run(&mix_command(video, music, volume, out))?;
        if mixed.success() {
            tracing::info!(music = %music.display(), "music mixed with source audio");
            return Ok(MuxOutcome::Mixed);
        }
        tracing::warn!(
            status = %mixed.status_text(),
            stderr = %mixed.stderr.trim(),
            "music mix failed, falling back to music-only audio"
        );
        self.run(&music_only_command(video, music, out))?
            .into_result(FFMPEG)?;
        tracing::info!(music = %music.display(), "music muxed as the only audio stream");
        Ok(MuxOutcome::MusicOnly)
    }

    /// Produce the final file at `out` from the video-only `intermediate`.
    ///
    /// Without music the intermediate is renamed to `out`. With music it is muxed into `out`
    /// and removed afterwards; a failed mux also removes whatever was written to `out`.
    pub fn finalize(
        &mut self,
        intermediate: &Path,
        music: Option<&Path>,
        volume: f64,
        out: &Path,
    ) -> QuizResult<MuxOutcome> {
        ensure_parent_dir(out)?;
        let Some(music) = music else {
            std::fs::rename(intermediate, out).with_context(|| {
                format!(
                    "failed to move '{}' to '{}'",
                    intermediate.display(),
                    out.display()
                )
            })?;
            return Ok(MuxOutcome::NoMusic);
        };
        let outcome = self.mux_music(intermediate, music, volume, out);
        remove_partial(intermediate);
        if outcome.is_err() {
            remove_partial(out);
        }
        outcome
    }

    /// Encode `input_pattern` and finalize it into `out` in one go.
    pub fn encode_and_finalize(
        &mut self,
        settings: &EncodeSettings,
        input_pattern: &Path,
        music: Option<&Path>,
        volume: f64,
        out: &Path,
    ) -> QuizResult<MuxOutcome> {
        if out.extension().is_none() {
            return Err(QuizError::config(format!(
                "output path '{}' needs a file extension",
                out.display()
            )));
        }
        let intermediate = intermediate_path(out);
        if let Err(e) = self.encode_frames(settings, input_pattern, &intermediate) {
            remove_partial(&intermediate);
            return Err(e);
        }
        self.finalize(&intermediate, music, volume, out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
