//! quizreel renders short vertical quiz videos.
//!
//! A [`RenderJob`] (hook, rule, four items with images) is turned into a fixed timeline of
//! animated scenes, rasterized frame by frame on the CPU, streamed to disk as a numbered PNG
//! sequence and encoded with the system `ffmpeg`, optionally with background music.
//!
//! - Build a job with [`RenderJob::builder`] or load a [`JobManifest`]
//! - Create a [`RenderOrchestrator`] from a [`RenderConfig`]
//! - Call [`RenderOrchestrator::render`] to get a [`RenderArtifact`]
#![forbid(unsafe_code)]

/// Easing and motion helpers.
pub mod animation;
pub(crate) mod assets;
/// Puzzle, image and upload collaborators.
pub mod collab;
/// Render configuration.
pub mod config;
/// External encoder plumbing.
pub mod encode;
pub(crate) mod foundation;
/// Render jobs.
pub mod job;
/// Tracing setup.
pub mod logging;
/// Metadata sidecar.
pub mod metadata;
/// End-to-end orchestration.
pub mod pipeline;
pub(crate) mod render;
pub(crate) mod scene;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, PixelPoint, Rgb8};
pub use crate::foundation::error::{QuizError, QuizResult};

pub use crate::assets::decode::{PreparedImage, ensure_min_size, upscaled_dimensions};
pub use crate::assets::pool::AssetPool;
pub use crate::assets::prepared::PreparedAssets;
pub use crate::assets::text::TextLayoutEngine;
pub use crate::config::{LoggingConfig, RenderConfig};
pub use crate::job::{JobManifest, RenderJob, RenderJobBuilder};
pub use crate::metadata::RenderMetadata;
pub use crate::pipeline::orchestrator::{
    CpuRendererFactory, RenderArtifact, RenderOrchestrator, RendererFactory,
};
pub use crate::render::cpu::{CpuFrameRenderer, FrameRenderer};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::render::stream::{
    FrameStream, ProgressEvent, ProgressObserver, ProgressStep, SilentProgress, StreamStats,
    TracingProgress,
};
pub use crate::scene::layout::{BoxSize, SceneLayout};
pub use crate::scene::model::{
    ActionBadge, DrawOp, FontFace, ImageElement, ImageRef, MainScene, OutroScene, Scene,
    TextAnchor, TextElement, TextStyle,
};
pub use crate::scene::timeline::{OverlayAvailability, Phases, Timeline};
