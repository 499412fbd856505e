use crate::animation::ease::Ease;
use crate::animation::motion::{Segment, StaggerGroup, countdown_text, fade_in, slide_from_angle};
use crate::config::{OutroConfig, RenderConfig, TimingConfig};
use crate::foundation::core::{FrameIndex, Fps, PixelPoint, Rgb8};
use crate::foundation::error::{QuizError, QuizResult};
use crate::job::{ITEM_COUNT, RenderJob};
use crate::scene::layout::SceneLayout;
use crate::scene::model::{
    ActionBadge, ImageElement, ImageRef, MainScene, OutroScene, Scene, TextAnchor, TextElement,
    TextStyle,
};

/// Phase start offsets of one job, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Phases {
    /// Hook entrance start.
    pub hook_start: f64,
    /// Instruction entrance start.
    pub instruction_start: f64,
    /// First grid tile entrance start.
    pub grid_start: f64,
    /// Countdown start.
    pub timer_start: f64,
    /// Outro start.
    pub outro_start: f64,
    /// Job length.
    pub duration: f64,
}

impl Phases {
    /// Derive offsets for a job of `duration_seconds`.
    ///
    /// Offsets must be non-negative and non-decreasing, and the job must outlast the outro.
    pub fn derive(timing: &TimingConfig, duration_seconds: u32) -> QuizResult<Self> {
        let duration = f64::from(duration_seconds);
        if duration <= timing.outro_seconds {
            return Err(QuizError::config(format!(
                "duration ({duration_seconds}s) must exceed the outro ({}s)",
                timing.outro_seconds
            )));
        }
        let entry = timing.entry_duration;
        let hook_start = 0.0;
        let instruction_start = hook_start + entry;
        let grid_start = instruction_start + entry;
        let timer_start = grid_start + entry + (ITEM_COUNT as f64 - 1.0) * timing.stagger_delay;
        let phases = Self {
            hook_start,
            instruction_start,
            grid_start,
            timer_start,
            outro_start: duration - timing.outro_seconds,
            duration,
        };

        let order = [
            phases.hook_start,
            phases.instruction_start,
            phases.grid_start,
            phases.timer_start,
            phases.outro_start,
        ];
        if order.iter().any(|v| !v.is_finite() || *v < 0.0)
            || order.windows(2).any(|w| w[1] < w[0])
        {
            return Err(QuizError::config(format!(
                "timeline phases must be non-negative and ordered, got {order:?}"
            )));
        }
        Ok(phases)
    }
}

/// Which optional outro overlays exist on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayAvailability {
    /// The logo can be drawn.
    pub logo: bool,
    /// Icon availability, parallel to the configured outro actions.
    pub icons: Vec<bool>,
}

impl OverlayAvailability {
    /// Every overlay available.
    pub fn all(actions: usize) -> Self {
        Self {
            logo: true,
            icons: vec![true; actions],
        }
    }

    fn icon(&self, index: usize) -> bool {
        self.icons.get(index).copied().unwrap_or(false)
    }
}

/// Pure mapping from elapsed time to the scene of one frame.
///
/// Holds no per-frame state, so any `t` may be evaluated in any order.
#[derive(Clone, Debug)]
pub struct Timeline {
    phases: Phases,
    layout: SceneLayout,
    timing: TimingConfig,
    hook: Segment,
    instruction: Segment,
    grid: StaggerGroup,
    hook_text: String,
    instruction_text: String,
    outro: OutroConfig,
    overlays: OverlayAvailability,
}

impl Timeline {
    /// Build the timeline of `job` under `config`.
    pub fn new(
        job: &RenderJob,
        config: &RenderConfig,
        overlays: OverlayAvailability,
    ) -> QuizResult<Self> {
        let timing = config.timing.clone();
        let phases = Phases::derive(&timing, job.duration_seconds())?;
        let entry = timing.entry_duration;
        Ok(Self {
            hook: Segment::new(phases.hook_start, entry, Ease::OutCubic),
            instruction: Segment::new(phases.instruction_start, entry, Ease::OutCubic),
            grid: StaggerGroup {
                base: Segment::new(phases.grid_start, entry, Ease::OutCubic),
                delay: timing.stagger_delay,
                len: ITEM_COUNT,
            },
            phases,
            layout: SceneLayout::for_canvas(config.canvas()),
            timing,
            hook_text: job.hook().to_string(),
            instruction_text: job.instruction().to_string(),
            outro: config.outro.clone(),
            overlays,
        })
    }

    /// Phase offsets.
    pub fn phases(&self) -> &Phases {
        &self.phases
    }

    /// Element placement.
    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Scene sampled for frame `f`.
    pub fn scene_for_frame(&self, f: FrameIndex, fps: Fps) -> Scene {
        self.scene_at(fps.time_of(f))
    }

    /// Scene at elapsed time `t` seconds.
    pub fn scene_at(&self, t: f64) -> Scene {
        if t >= self.phases.outro_start {
            Scene::Outro(self.outro_scene(t - self.phases.outro_start))
        } else {
            Scene::Main(self.main_scene(t))
        }
    }

    fn main_scene(&self, t: f64) -> MainScene {
        let hook = self.sliding_caption(
            &self.hook,
            t,
            &self.hook_text,
            TextStyle::Hook,
            self.layout.hook_center,
            self.timing.hook_angle_deg,
        );
        let instruction = self.sliding_caption(
            &self.instruction,
            t,
            &self.instruction_text,
            TextStyle::Instruction,
            self.layout.instruction_center,
            self.timing.instruction_angle_deg,
        );

        let tiles = self
            .layout
            .grid
            .iter()
            .enumerate()
            .filter_map(|(slot, &pos)| {
                let p = self.grid.progress_of(slot, t);
                (p > 0.0).then(|| ImageElement {
                    image: ImageRef::Tile(slot),
                    top_left: slide_from_angle(
                        pos,
                        p,
                        self.timing.grid_angle_deg,
                        self.timing.slide_distance,
                        self.grid.base.ease,
                    ),
                    size: self.layout.tile,
                    alpha: fade_in(p),
                })
            })
            .collect();

        let timer = (t >= self.phases.timer_start).then(|| TextElement {
            text: countdown_text(self.timing.countdown_seconds, t - self.phases.timer_start),
            style: TextStyle::Timer,
            anchor: TextAnchor::TopLeft,
            pos: self.layout.timer_top_left,
            color: Rgb8::ALERT_RED,
            alpha: u8::MAX,
        });

        MainScene {
            hook,
            instruction,
            tiles,
            timer,
        }
    }

    fn sliding_caption(
        &self,
        segment: &Segment,
        t: f64,
        text: &str,
        style: TextStyle,
        center: PixelPoint,
        angle: f64,
    ) -> Option<TextElement> {
        let p = segment.linear_progress(t);
        (p > 0.0).then(|| TextElement {
            text: text.to_string(),
            style,
            anchor: TextAnchor::Center,
            pos: slide_from_angle(center, p, angle, self.timing.slide_distance, segment.ease),
            color: Rgb8::WHITE,
            alpha: fade_in(p),
        })
    }

    /// Linear fade, truncated to whole alpha steps and capped at full opacity.
    fn outro_alpha(&self, local: f64) -> u8 {
        let a = (local / self.timing.outro_fade_seconds * 255.0).floor();
        a.clamp(0.0, 255.0) as u8
    }

    fn outro_scene(&self, local: f64) -> OutroScene {
        let alpha = self.outro_alpha(local);
        let layout = &self.layout;

        let logo = self.overlays.logo.then_some(ImageElement {
            image: ImageRef::Logo,
            top_left: layout.logo_top_left,
            size: layout.logo,
            alpha,
        });

        let centered = |text: &str, style: TextStyle, pos: PixelPoint, color: Rgb8| TextElement {
            text: text.to_string(),
            style,
            anchor: TextAnchor::Center,
            pos,
            color,
            alpha,
        };

        let count = self.outro.actions.len();
        let actions = self
            .outro
            .actions
            .iter()
            .enumerate()
            .filter(|(i, _)| self.overlays.icon(*i))
            .map(|(i, action)| {
                let center = layout.action_center(i, count);
                ActionBadge {
                    icon: ImageElement {
                        image: ImageRef::Icon(i),
                        top_left: layout.icon_top_left(center),
                        size: layout.icon,
                        alpha,
                    },
                    label: centered(
                        &action.label,
                        TextStyle::IconLabel,
                        layout.label_center(center),
                        Rgb8::WHITE,
                    ),
                }
            })
            .collect();

        OutroScene {
            alpha,
            logo,
            title: centered(
                &self.outro.title,
                TextStyle::OutroTitle,
                layout.outro_title_center,
                Rgb8::WHITE,
            ),
            call_to_action: centered(
                &self.outro.call_to_action,
                TextStyle::OutroText,
                layout.call_to_action_center,
                Rgb8::ALERT_RED,
            ),
            actions,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/timeline.rs"]
mod tests;
