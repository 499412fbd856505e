use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::assets::pool::AssetPool;
use crate::assets::prepared::PreparedAssets;
use crate::assets::text::TextLayoutEngine;
use crate::collab::images::ImageSource;
use crate::collab::puzzle::{Puzzle, PuzzleSource, UsedPuzzleLedger};
use crate::config::RenderConfig;
use crate::encode::command::{CommandRunner, SystemCommandRunner};
use crate::encode::ffmpeg::{EncodeSettings, FfmpegEncoder, MuxOutcome};
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::foundation::error::QuizResult;
use crate::job::{DEFAULT_DURATION_SECONDS, RenderJob};
use crate::metadata::RenderMetadata;
use crate::pipeline::naming::{OutputPaths, base_name};
use crate::render::cpu::{CpuFrameRenderer, FrameRenderer};
use crate::render::sink::PngSequenceSink;
use crate::render::stream::{FrameStream, ProgressObserver, TracingProgress};
use crate::scene::timeline::{Phases, Timeline};

/// Title used for puzzles rendered through [`RenderOrchestrator::run_next`].
pub const RUN_TITLE: &str = "Can you answer it? \u{1F914} #shorts";

/// Tags used for puzzles rendered through [`RenderOrchestrator::run_next`].
pub const RUN_TAGS: [&str; 3] = ["quiz", "brainteaser", "shorts"];

/// Files produced by one successful render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderArtifact {
    /// Final video.
    pub video: PathBuf,
    /// Metadata sidecar.
    pub metadata: PathBuf,
    /// Frames rendered.
    pub frames: u64,
    /// First frame drawn from the closing scene.
    pub first_outro_frame: Option<FrameIndex>,
    /// How the audio track was produced.
    pub mux: MuxOutcome,
    /// Background image used; `None` means the solid fallback.
    pub background: Option<PathBuf>,
    /// Music track used.
    pub music: Option<PathBuf>,
}

/// Builds the frame renderer once assets are prepared.
pub trait RendererFactory {
    /// Renderer for `assets` under `config`.
    fn create(
        &mut self,
        config: &RenderConfig,
        assets: &PreparedAssets,
    ) -> QuizResult<Box<dyn FrameRenderer>>;
}

impl<F> RendererFactory for F
where
    F: FnMut(&RenderConfig, &PreparedAssets) -> QuizResult<Box<dyn FrameRenderer>>,
{
    fn create(
        &mut self,
        config: &RenderConfig,
        assets: &PreparedAssets,
    ) -> QuizResult<Box<dyn FrameRenderer>> {
        self(config, assets)
    }
}

/// Loads the configured fonts and builds a [`CpuFrameRenderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuRendererFactory;

impl RendererFactory for CpuRendererFactory {
    fn create(
        &mut self,
        config: &RenderConfig,
        assets: &PreparedAssets,
    ) -> QuizResult<Box<dyn FrameRenderer>> {
        config.check_fonts()?;
        let text =
            TextLayoutEngine::from_files(&config.paths.font_primary, &config.paths.font_secondary)?;
        Ok(Box::new(CpuFrameRenderer::new(config.canvas(), assets, text)?))
    }
}

/// Per-job work directory, removed on success.
///
/// On failure the directory is removed as well unless `keep_on_failure` is set, in which case
/// it stays for inspection.
struct WorkDirGuard {
    path: Option<PathBuf>,
    keep_on_failure: bool,
}

impl WorkDirGuard {
    fn create(path: &Path, keep_on_failure: bool) -> QuizResult<Self> {
        use anyhow::Context as _;
        std::fs::create_dir_all(path)
            .with_context(|| format!("create work directory '{}'", path.display()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            keep_on_failure,
        })
    }

    fn finish(mut self) {
        if let Some(path) = self.path.take() {
            remove_work_dir(&path);
        }
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if self.keep_on_failure {
                tracing::warn!(path = %path.display(), "keeping work directory of failed render");
            } else {
                remove_work_dir(&path);
            }
        }
    }
}

fn remove_work_dir(path: &Path) {
    if let Err(e) = std::fs::remove_dir_all(path) {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove work directory");
    }
}

/// Drives one render from a [`RenderJob`] to a video plus sidecar.
///
/// Single-threaded and synchronous: frame loop, encode and mux run one after another.
pub struct RenderOrchestrator<R = SystemCommandRunner, F = CpuRendererFactory> {
    config: RenderConfig,
    encoder: FfmpegEncoder<R>,
    renderers: F,
    progress: Box<dyn ProgressObserver>,
    rng: StdRng,
}

impl RenderOrchestrator {
    /// Orchestrator using the system `ffmpeg`, the CPU renderer and tracing progress.
    ///
    /// Asset selection is seeded from `config.seed` when set.
    pub fn new(config: RenderConfig) -> QuizResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            encoder: FfmpegEncoder::system(),
            renderers: CpuRendererFactory,
            progress: Box::new(TracingProgress),
            rng,
        })
    }
}

impl<R: CommandRunner, F: RendererFactory> RenderOrchestrator<R, F> {
    /// Replace the process runner.
    pub fn with_runner<R2: CommandRunner>(self, runner: R2) -> RenderOrchestrator<R2, F> {
        RenderOrchestrator {
            config: self.config,
            encoder: FfmpegEncoder::new(runner),
            renderers: self.renderers,
            progress: self.progress,
            rng: self.rng,
        }
    }

    /// Replace the renderer factory.
    pub fn with_renderer_factory<F2: RendererFactory>(
        self,
        renderers: F2,
    ) -> RenderOrchestrator<R, F2> {
        RenderOrchestrator {
            config: self.config,
            encoder: self.encoder,
            renderers,
            progress: self.progress,
            rng: self.rng,
        }
    }

    /// Replace the progress observer.
    pub fn with_progress(mut self, progress: Box<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Reseed asset selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The process runner.
    pub fn runner(&self) -> &R {
        self.encoder.runner()
    }

    fn pick_assets(&mut self) -> QuizResult<(Option<PathBuf>, Option<PathBuf>)> {
        let background = AssetPool::backgrounds(self.config.paths.backgrounds_dir())
            .choose(&mut self.rng)?;
        if background.is_none() {
            tracing::info!("no background images, using solid fallback");
        }
        let music = if self.config.audio.enable_music {
            AssetPool::music(self.config.paths.music_dir()).choose(&mut self.rng)?
        } else {
            None
        };
        Ok((background, music))
    }

    /// Render `job` to `<output>/videos/<base>.mp4` and `<output>/meta/<base>.json`.
    ///
    /// Everything that can fail without producing frames (config, assets, fonts) is checked
    /// before the first frame. Encoder failures are returned with ffmpeg's diagnostics.
    #[tracing::instrument(skip_all, fields(puzzle_id = %job.puzzle_id()))]
    pub fn render(&mut self, job: &RenderJob) -> QuizResult<RenderArtifact> {
        let fps = self.config.fps()?;
        let settings = EncodeSettings::from_config(&self.config)?;
        let (background, music) = self.pick_assets()?;

        let assets = PreparedAssets::load(job, &self.config, background.as_deref())?;
        let timeline = Timeline::new(job, &self.config, assets.overlays())?;
        let mut renderer = self.renderers.create(&self.config, &assets)?;
        drop(assets);

        let base = base_name(Utc::now(), job.puzzle_id());
        let paths = OutputPaths::unique(&self.config.paths, &base);
        tracing::info!(
            base = %paths.base,
            background = ?background,
            music = ?music,
            "render started"
        );

        let workdir = WorkDirGuard::create(&paths.work_dir, self.config.keep_failed_workdir)?;
        let c = Rgb8::FALLBACK_BACKGROUND;
        let mut sink = PngSequenceSink::new(&paths.frames_dir, [c.r, c.g, c.b]);
        let stream = FrameStream::new(&timeline, fps, job.duration_seconds());
        let stats = stream.run(renderer.as_mut(), &mut sink, self.progress.as_mut())?;

        let mux = self.encoder.encode_and_finalize(
            &settings,
            &sink.input_pattern(),
            music.as_deref(),
            self.config.audio.music_volume,
            &paths.video,
        )?;

        RenderMetadata::from_job(job, self.config.timing.countdown_seconds, fps.get())
            .write(&paths.metadata)?;
        workdir.finish();

        tracing::info!(
            video = %paths.video.display(),
            metadata = %paths.metadata.display(),
            frames = stats.frames,
            ?mux,
            "render finished"
        );
        Ok(RenderArtifact {
            video: paths.video,
            metadata: paths.metadata,
            frames: stats.frames,
            first_outro_frame: stats.first_outro_frame,
            mux,
            background,
            music,
        })
    }

    /// Render the single frame at `t` seconds of `job` to a PNG at `out`.
    #[tracing::instrument(skip_all, fields(puzzle_id = %job.puzzle_id(), t = t))]
    pub fn render_still(&mut self, job: &RenderJob, t: f64, out: &Path) -> QuizResult<()> {
        let (background, _) = self.pick_assets()?;
        let assets = PreparedAssets::load(job, &self.config, background.as_deref())?;
        let timeline = Timeline::new(job, &self.config, assets.overlays())?;
        let mut renderer = self.renderers.create(&self.config, &assets)?;
        let frame = renderer.render(&timeline.scene_at(t))?;
        crate::render::frame::ensure_parent_dir(out)?;
        let c = Rgb8::FALLBACK_BACKGROUND;
        frame.save_png(out, [c.r, c.g, c.b])
    }

    /// Render the next unused puzzle.
    ///
    /// The puzzle is recorded in `ledger` after a successful render. A render rejected for its
    /// content ([`QuizError::is_content_rejection`](crate::QuizError::is_content_rejection)) is
    /// recorded too so it is not picked again; every other failure leaves the ledger untouched
    /// so the puzzle is retried. A timing configuration too long for a catalogue job fails
    /// before any puzzle is selected.
    #[tracing::instrument(skip_all)]
    pub fn run_next(
        &mut self,
        puzzles: &mut dyn PuzzleSource,
        images: &mut dyn ImageSource,
        ledger: &UsedPuzzleLedger,
    ) -> QuizResult<(Puzzle, RenderArtifact)> {
        // Catalogue jobs all run for the default length, so a timing that cannot fit it is a
        // setup error and must surface before any puzzle is picked.
        Phases::derive(&self.config.timing, DEFAULT_DURATION_SECONDS)?;
        let used = ledger.load()?;
        let puzzle = puzzles.next_puzzle(&used)?;
        tracing::info!(puzzle_id = %puzzle.id, "selected puzzle");

        let result = images
            .images_for(&puzzle.items)
            .and_then(|paths| {
                RenderJob::builder(puzzle.id.clone())
                    .hook(puzzle.prompt.clone())
                    .instruction(puzzle.rule.clone())
                    .items(puzzle.items.iter().cloned())
                    .images(paths)
                    .title(RUN_TITLE)
                    .tags(RUN_TAGS)
                    .build()
            })
            .and_then(|job| self.render(&job));

        match result {
            Ok(artifact) => {
                ledger.mark_used(&puzzle.id)?;
                Ok((puzzle, artifact))
            }
            Err(e) => {
                if e.is_content_rejection() {
                    tracing::warn!(puzzle_id = %puzzle.id, error = %e, "puzzle rejected, marking used");
                    ledger.mark_used(&puzzle.id)?;
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
