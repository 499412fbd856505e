use std::collections::VecDeque;

use super::*;
use crate::collab::images::DirectoryImageSource;
use crate::collab::puzzle::JsonPuzzleFile;
use crate::encode::command::{CommandOutcome, CommandSpec};
use crate::foundation::error::QuizError;
use crate::render::frame::FrameRGBA;
use crate::render::stream::SilentProgress;
use crate::scene::model::Scene;

/// Records every command and creates its output file when the scripted outcome succeeds.
#[derive(Default)]
struct TouchRunner {
    script: VecDeque<CommandOutcome>,
    calls: Vec<CommandSpec>,
}

impl TouchRunner {
    fn scripted(outcomes: impl IntoIterator<Item = CommandOutcome>) -> Self {
        Self {
            script: outcomes.into_iter().collect(),
            calls: Vec::new(),
        }
    }
}

impl CommandRunner for TouchRunner {
    fn run(&mut self, spec: &CommandSpec) -> QuizResult<CommandOutcome> {
        self.calls.push(spec.clone());
        let outcome = self.script.pop_front().unwrap_or_else(CommandOutcome::ok);
        if outcome.success()
            && let Some(out) = spec.args.last()
        {
            std::fs::write(out, b"mp4").unwrap();
        }
        Ok(outcome)
    }
}

struct Solid {
    width: u32,
    height: u32,
}

impl FrameRenderer for Solid {
    fn render(&mut self, _scene: &Scene) -> QuizResult<FrameRGBA> {
        Ok(FrameRGBA::solid(self.width, self.height, [20, 20, 20, 255]))
    }
}

fn solid_factory(config: &RenderConfig, _assets: &PreparedAssets) -> QuizResult<Box<dyn FrameRenderer>> {
    Ok(Box::new(Solid {
        width: config.video.width,
        height: config.video.height,
    }))
}

fn write_png(path: &Path, w: u32, h: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbaImage::from_pixel(w, h, image::Rgba([90, 160, 30, 255]))
        .save(path)
        .unwrap();
}

fn setup(name: &str) -> (PathBuf, RenderConfig) {
    let root = PathBuf::from("target").join("quizreel-unit").join(name);
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    let mut config = RenderConfig::default();
    config.video.width = 64;
    config.video.height = 96;
    config.video.fps = 10;
    config.paths.assets_dir = root.join("assets");
    config.paths.cache_dir = root.join("cache");
    config.paths.output_dir = root.join("output");
    (root, config)
}

fn job(root: &Path) -> RenderJob {
    let images: Vec<PathBuf> = (0..4).map(|i| root.join(format!("img{i}.png"))).collect();
    for p in &images {
        write_png(p, 40, 40);
    }
    RenderJob::builder("demo 1")
        .hook("Hook")
        .instruction("Rule")
        .items(["a", "b", "c", "d"])
        .images(images)
        .build()
        .unwrap()
}

fn orchestrator(
    config: RenderConfig,
    runner: TouchRunner,
) -> RenderOrchestrator<TouchRunner, fn(&RenderConfig, &PreparedAssets) -> QuizResult<Box<dyn FrameRenderer>>> {
    RenderOrchestrator::new(config)
        .unwrap()
        .with_runner(runner)
        .with_renderer_factory(
            solid_factory as fn(&RenderConfig, &PreparedAssets) -> QuizResult<Box<dyn FrameRenderer>>,
        )
        .with_progress(Box::new(SilentProgress))
        .with_seed(7)
}

fn work_root_is_empty(config: &RenderConfig) -> bool {
    match std::fs::read_dir(config.paths.work_root()) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

#[test]
fn render_without_music_promotes_encoded_video() {
    let (root, config) = setup("orch-no-music");
    let job = job(&root);
    let mut orch = orchestrator(config.clone(), TouchRunner::default());

    let artifact = orch.render(&job).unwrap();

    assert_eq!(artifact.frames, 200);
    assert_eq!(artifact.first_outro_frame, Some(FrameIndex(170)));
    assert_eq!(artifact.mux, MuxOutcome::NoMusic);
    assert_eq!(artifact.background, None);
    assert!(artifact.video.is_file());
    assert!(artifact.video.starts_with(config.paths.videos_dir()));
    let name = artifact.video.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with("_demo1.mp4"), "{name}");

    let meta = RenderMetadata::load(&artifact.metadata).unwrap();
    assert_eq!(meta.puzzle_id, "demo 1");
    assert_eq!(meta.fps, 10);
    assert_eq!(meta.timer_seconds, 15);

    let calls = &orch.runner().calls;
    assert_eq!(calls.len(), 1);
    assert!(calls[0].args_lossy().iter().any(|a| a.ends_with("frame_%05d.png")));
    assert!(work_root_is_empty(&config));
}

#[test]
fn failed_mix_falls_back_to_music_only() {
    let (root, config) = setup("orch-music");
    std::fs::create_dir_all(config.paths.music_dir()).unwrap();
    std::fs::write(config.paths.music_dir().join("track.mp3"), b"id3").unwrap();
    write_png(&config.paths.backgrounds_dir().join("bg.png"), 8, 8);
    let job = job(&root);
    let runner = TouchRunner::scripted([
        CommandOutcome::ok(),
        CommandOutcome::failed(1, "matches no streams"),
        CommandOutcome::ok(),
    ]);
    let mut orch = orchestrator(config.clone(), runner);

    let artifact = orch.render(&job).unwrap();

    assert_eq!(artifact.mux, MuxOutcome::MusicOnly);
    assert!(artifact.background.is_some());
    assert!(artifact.music.is_some());
    let calls = &orch.runner().calls;
    assert_eq!(calls.len(), 3);
    assert!(calls[2].has_arg("1:a:0"));
    assert!(!crate::encode::ffmpeg::intermediate_path(&artifact.video).exists());
}

#[test]
fn encoder_failure_surfaces_diagnostics_and_cleans_up() {
    let (root, config) = setup("orch-encode-fail");
    let job = job(&root);
    let runner = TouchRunner::scripted([CommandOutcome::failed(1, "Unknown encoder")]);
    let mut orch = orchestrator(config.clone(), runner);

    let err = orch.render(&job).unwrap_err();

    match err {
        QuizError::Process { stderr, .. } => assert_eq!(stderr, "Unknown encoder"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(work_root_is_empty(&config));
    assert!(!config.paths.meta_dir().exists());
}

#[test]
fn failed_workdir_is_kept_on_request() {
    let (root, mut config) = setup("orch-keep");
    config.keep_failed_workdir = true;
    let job = job(&root);
    let runner = TouchRunner::scripted([CommandOutcome::failed(1, "boom")]);
    let mut orch = orchestrator(config.clone(), runner);

    assert!(orch.render(&job).is_err());
    assert!(!work_root_is_empty(&config));
}

#[test]
fn missing_fonts_fail_before_any_process_runs() {
    let (root, mut config) = setup("orch-fonts");
    config.paths.font_primary = root.join("missing.ttf");
    let job = job(&root);
    let mut orch = RenderOrchestrator::new(config.clone())
        .unwrap()
        .with_runner(TouchRunner::default())
        .with_progress(Box::new(SilentProgress));

    let err = orch.render(&job).unwrap_err();

    assert!(matches!(err, QuizError::Config(_)));
    assert!(orch.runner().calls.is_empty());
    assert!(work_root_is_empty(&config));
}

#[test]
fn run_next_marks_the_puzzle_used() {
    let (root, config) = setup("orch-run-next");
    let images_dir = root.join("items");
    for name in ["sun", "star", "sky", "sea"] {
        write_png(&images_dir.join(format!("{name}.png")), 600, 600);
    }
    let puzzles_path = root.join("puzzles.json");
    std::fs::write(
        &puzzles_path,
        r#"[{"id":"s-1","prompt":"Name 4","rule":"Starting with S","letter":"S","items":["Sun","Star","Sky","Sea"]}]"#,
    )
    .unwrap();
    let mut puzzles = JsonPuzzleFile::load(&puzzles_path).unwrap();
    let mut images = DirectoryImageSource::new(&images_dir, config.paths.image_cache_dir(), 600, 600);
    let ledger = UsedPuzzleLedger::new(config.paths.used_puzzles_path());
    let mut orch = orchestrator(config.clone(), TouchRunner::default());

    let (puzzle, artifact) = orch.run_next(&mut puzzles, &mut images, &ledger).unwrap();

    assert_eq!(puzzle.id, "s-1");
    let meta = RenderMetadata::load(&artifact.metadata).unwrap();
    assert_eq!(meta.title, RUN_TITLE);
    assert_eq!(meta.tags, vec!["quiz", "brainteaser", "shorts"]);
    assert!(ledger.load().unwrap().contains("s-1"));
}

#[test]
fn run_next_leaves_ledger_alone_on_transient_failure() {
    let (root, config) = setup("orch-run-next-fail");
    let images_dir = root.join("items");
    for name in ["sun", "star", "sky", "sea"] {
        write_png(&images_dir.join(format!("{name}.png")), 600, 600);
    }
    let mut puzzles = JsonPuzzleFile::from_puzzles(vec![Puzzle {
        id: "s-2".to_owned(),
        prompt: "Name 4".to_owned(),
        rule: "S".to_owned(),
        letter: "s".to_owned(),
        items: vec!["Sun".into(), "Star".into(), "Sky".into(), "Sea".into()],
    }])
    .unwrap();
    let mut images = DirectoryImageSource::new(&images_dir, config.paths.image_cache_dir(), 600, 600);
    let ledger = UsedPuzzleLedger::new(config.paths.used_puzzles_path());
    let runner = TouchRunner::scripted([CommandOutcome::failed(1, "disk full")]);
    let mut orch = orchestrator(config, runner);

    assert!(orch.run_next(&mut puzzles, &mut images, &ledger).is_err());
    assert!(ledger.load().unwrap().is_empty());
}

#[test]
fn run_next_rejects_outro_longer_than_catalogue_jobs_without_burning_a_puzzle() {
    let (root, mut config) = setup("orch-run-next-outro");
    config.timing.outro_seconds = 25.0;
    let images_dir = root.join("items");
    for name in ["sun", "star", "sky", "sea"] {
        write_png(&images_dir.join(format!("{name}.png")), 600, 600);
    }
    let mut puzzles = JsonPuzzleFile::from_puzzles(vec![Puzzle {
        id: "s-9".to_owned(),
        prompt: "Name 4".to_owned(),
        rule: "S".to_owned(),
        letter: "s".to_owned(),
        items: vec!["Sun".into(), "Star".into(), "Sky".into(), "Sea".into()],
    }])
    .unwrap();
    let mut images = DirectoryImageSource::new(&images_dir, config.paths.image_cache_dir(), 600, 600);
    let ledger = UsedPuzzleLedger::new(config.paths.used_puzzles_path());
    let mut orch = orchestrator(config, TouchRunner::default());

    let err = orch.run_next(&mut puzzles, &mut images, &ledger).unwrap_err();

    assert!(matches!(err, QuizError::Config(_)), "{err}");
    assert!(!err.is_content_rejection());
    assert!(ledger.load().unwrap().is_empty());
    assert!(orch.runner().calls.is_empty());
}
