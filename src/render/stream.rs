use std::time::{Duration, Instant};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::cpu::FrameRenderer;
use crate::render::sink::{FrameSink, SinkConfig};
use crate::scene::timeline::Timeline;

/// Interval between liveness heartbeats.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Coarse progress at a 10% boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressStep {
    /// Whole percent done, a multiple of 10.
    pub percent: u8,
    /// Frames done.
    pub done: u64,
    /// Total frames.
    pub total: u64,
    /// Effective frames per second so far.
    pub fps: f64,
    /// Estimated seconds remaining.
    pub eta_secs: u64,
}

/// Observability signal emitted by the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressEvent {
    /// A new 10% boundary was crossed.
    Step(ProgressStep),
    /// Wall time passed without a step.
    Heartbeat {
        /// Frames done.
        done: u64,
        /// Total frames.
        total: u64,
    },
}

/// Receives progress signals. Never influences control flow.
pub trait ProgressObserver {
    /// The loop is about to render `total` frames.
    fn on_start(&mut self, _total: u64) {}
    /// A progress step or heartbeat.
    fn on_event(&mut self, event: &ProgressEvent);
    /// All frames were persisted.
    fn on_finish(&mut self, _total: u64, _elapsed: Duration) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_start(&mut self, total: u64) {
        tracing::info!(total_frames = total, "frame rendering started");
    }

    fn on_event(&mut self, event: &ProgressEvent) {
        match *event {
            ProgressEvent::Step(s) => tracing::info!(
                percent = s.percent,
                done = s.done,
                total = s.total,
                fps = s.fps,
                eta_secs = s.eta_secs,
                "frame render progress"
            ),
            ProgressEvent::Heartbeat { done, total } => {
                tracing::info!(done, total, "rendering...");
            }
        }
    }

    fn on_finish(&mut self, total: u64, elapsed: Duration) {
        tracing::info!(
            total_frames = total,
            elapsed_secs = elapsed.as_secs_f64(),
            "frame rendering completed"
        );
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn on_event(&mut self, _event: &ProgressEvent) {}
}

/// Turns frame completions into [`ProgressEvent`]s.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    started: Instant,
    last_beat: Instant,
    last_percent: u8,
    heartbeat: Duration,
}

impl ProgressTracker {
    /// Tracker for `total` frames starting at `now`.
    pub fn new(total: u64, now: Instant, heartbeat: Duration) -> Self {
        Self {
            total,
            started: now,
            last_beat: now,
            last_percent: 0,
            heartbeat,
        }
    }

    /// Record that `done` frames are complete at time `now`. Steps start at 10%.
    pub fn record(&mut self, done: u64, now: Instant) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        if self.total == 0 {
            return events;
        }
        let percent = (done.saturating_mul(100) / self.total).min(100) as u8;
        if percent.is_multiple_of(10) && percent != self.last_percent {
            let elapsed = now.duration_since(self.started).as_secs_f64().max(0.001);
            let fps = done as f64 / elapsed;
            let remaining = self.total.saturating_sub(done);
            let eta_secs = (remaining as f64 / fps.max(0.1)) as u64;
            events.push(ProgressEvent::Step(ProgressStep {
                percent,
                done,
                total: self.total,
                fps,
                eta_secs,
            }));
            self.last_percent = percent;
        }
        if now.duration_since(self.last_beat) >= self.heartbeat {
            events.push(ProgressEvent::Heartbeat {
                done,
                total: self.total,
            });
            self.last_beat = now;
        }
        events
    }
}

/// Summary of one frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamStats {
    /// Frames rendered and persisted.
    pub frames: u64,
    /// Index of the first frame drawn from the outro scene, if any.
    pub first_outro_frame: Option<FrameIndex>,
    /// Wall time of the loop.
    pub elapsed: Duration,
}

/// Sequential frame loop: sample the timeline, render, persist, drop.
pub struct FrameStream<'a> {
    timeline: &'a Timeline,
    fps: Fps,
    width: u32,
    height: u32,
    total_frames: u64,
}

impl<'a> FrameStream<'a> {
    /// Loop over `duration_seconds * fps` frames of `timeline`.
    pub fn new(timeline: &'a Timeline, fps: Fps, duration_seconds: u32) -> Self {
        let canvas = timeline.layout().canvas;
        Self {
            timeline,
            fps,
            width: canvas.width,
            height: canvas.height,
            total_frames: fps.total_frames(duration_seconds),
        }
    }

    /// Exact frame count.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Render every frame in order, handing each to `sink` immediately.
    pub fn run(
        &self,
        renderer: &mut dyn FrameRenderer,
        sink: &mut dyn FrameSink,
        observer: &mut dyn ProgressObserver,
    ) -> QuizResult<StreamStats> {
        let started = Instant::now();
        let total = self.total_frames;
        if total == 0 {
            return Err(QuizError::render("render has zero frames"));
        }

        sink.begin(SinkConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            total_frames: total,
        })?;
        observer.on_start(total);

        let mut tracker = ProgressTracker::new(total, started, HEARTBEAT_INTERVAL);
        let mut first_outro_frame = None;
        for i in 0..total {
            let idx = FrameIndex(i);
            let scene = self.timeline.scene_for_frame(idx, self.fps);
            if first_outro_frame.is_none() && scene.is_outro() {
                first_outro_frame = Some(idx);
            }
            let frame = renderer.render(&scene)?;
            sink.push_frame(idx, &frame)?;
            drop(frame);

            for event in tracker.record(i + 1, Instant::now()) {
                observer.on_event(&event);
            }
        }

        sink.end()?;
        let elapsed = started.elapsed();
        observer.on_finish(total, elapsed);
        Ok(StreamStats {
            frames: total,
            first_outro_frame,
            elapsed,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/stream.rs"]
mod tests;
