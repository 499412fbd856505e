use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use quizreel::collab::images::DirectoryImageSource;
use quizreel::collab::puzzle::{JsonPuzzleFile, UsedPuzzleLedger};
use quizreel::{JobManifest, RenderConfig, RenderOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "quizreel", version)]
struct Cli {
    /// Render configuration JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a job to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the next unused puzzle from a catalogue.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Job manifest JSON.
    #[arg(long)]
    job: PathBuf,

    /// Time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job manifest JSON.
    #[arg(long)]
    job: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Puzzle catalogue JSON.
    #[arg(long)]
    puzzles: PathBuf,

    /// Directory with one image per item, named after the item.
    #[arg(long)]
    images: PathBuf,

    /// Used-puzzle ledger. Defaults to `<output>/used_puzzles.txt`.
    #[arg(long)]
    used: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    quizreel::logging::init_logging(&config.logging);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(config, args),
        Command::Render(args) => cmd_render(config, args),
        Command::Run(args) => cmd_run(config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RenderConfig> {
    let config = match path {
        Some(p) => RenderConfig::load(p)?,
        None => RenderConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn load_job(path: &Path) -> anyhow::Result<quizreel::RenderJob> {
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let job = JobManifest::load(path)?
        .into_job(base)
        .with_context(|| format!("invalid job '{}'", path.display()))?;
    Ok(job)
}

fn cmd_frame(config: RenderConfig, args: FrameArgs) -> anyhow::Result<()> {
    let job = load_job(&args.job)?;
    let mut orch = RenderOrchestrator::new(config)?;
    orch.render_still(&job, args.time, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(config: RenderConfig, args: RenderArgs) -> anyhow::Result<()> {
    let job = load_job(&args.job)?;
    let mut orch = RenderOrchestrator::new(config)?;
    let artifact = orch.render(&job)?;
    println!("{}", artifact.video.display());
    println!("{}", artifact.metadata.display());
    Ok(())
}

fn cmd_run(config: RenderConfig, args: RunArgs) -> anyhow::Result<()> {
    let mut puzzles = JsonPuzzleFile::load(&args.puzzles)?;
    let mut images = DirectoryImageSource::new(
        &args.images,
        config.paths.image_cache_dir(),
        config.images.min_width,
        config.images.min_height,
    );
    let ledger = UsedPuzzleLedger::new(
        args.used
            .unwrap_or_else(|| config.paths.used_puzzles_path()),
    );
    let mut orch = RenderOrchestrator::new(config)?;
    let (puzzle, artifact) = orch.run_next(&mut puzzles, &mut images, &ledger)?;
    eprintln!("rendered puzzle {}", puzzle.id);
    println!("{}", artifact.video.display());
    println!("{}", artifact.metadata.display());
    Ok(())
}
