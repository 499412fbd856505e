//! Stateless interpolation helpers driving every entrance animation.
//!
//! Progress inputs are clamped into `[0, 1]` before easing. Positions are computed in floating
//! point and rounded to the nearest pixel only at the end.

use crate::animation::ease::Ease;
use crate::foundation::core::{PixelPoint, Point};
use kurbo::Vec2;

/// Default slide distance for vertical cardinal slides.
pub const VERTICAL_SLIDE_DISTANCE: f64 = 200.0;
/// Default slide distance for horizontal cardinal slides and angle slides.
pub const HORIZONTAL_SLIDE_DISTANCE: f64 = 300.0;

/// Linear interpolation between `a` and `b`.
///
/// Written as a weighted sum so both endpoints are reproduced exactly.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Interpolate between two points, easing `t` first and rounding the result to a pixel.
pub fn lerp_point(start: Point, end: Point, t: f64, ease: Ease) -> PixelPoint {
    let e = ease.apply(t);
    PixelPoint::round_from(Point::new(lerp(start.x, end.x, e), lerp(start.y, end.y, e)))
}

/// Slide towards `final_pos` from `distance` pixels away along `angle_degrees`.
///
/// `0°` starts to the right, `90°` below, `180°` to the left and `270°` above the target.
pub fn slide_from_angle(
    final_pos: PixelPoint,
    progress: f64,
    angle_degrees: f64,
    distance: f64,
    ease: Ease,
) -> PixelPoint {
    let rad = angle_degrees.to_radians();
    let end = final_pos.to_point();
    let start = end + Vec2::new(rad.cos() * distance, rad.sin() * distance);
    lerp_point(start, end, progress, ease)
}

/// Slide in from above.
pub fn slide_from_top(final_pos: PixelPoint, progress: f64) -> PixelPoint {
    slide_from_angle(
        final_pos,
        progress,
        270.0,
        VERTICAL_SLIDE_DISTANCE,
        Ease::OutCubic,
    )
}

/// Slide in from below.
pub fn slide_from_bottom(final_pos: PixelPoint, progress: f64) -> PixelPoint {
    slide_from_angle(
        final_pos,
        progress,
        90.0,
        VERTICAL_SLIDE_DISTANCE,
        Ease::OutCubic,
    )
}

/// Slide in from the left.
pub fn slide_from_left(final_pos: PixelPoint, progress: f64) -> PixelPoint {
    slide_from_angle(
        final_pos,
        progress,
        180.0,
        HORIZONTAL_SLIDE_DISTANCE,
        Ease::OutCubic,
    )
}

/// Slide in from the right.
pub fn slide_from_right(final_pos: PixelPoint, progress: f64) -> PixelPoint {
    slide_from_angle(
        final_pos,
        progress,
        0.0,
        HORIZONTAL_SLIDE_DISTANCE,
        Ease::OutCubic,
    )
}

/// Alpha in `[0, 255]` for a fade-in at `progress`.
pub fn fade_in(progress: f64) -> u8 {
    let v = 255.0 * Ease::OutCubic.apply(progress);
    v.floor().clamp(0.0, 255.0) as u8
}

/// Scale factor for a "pop" entrance.
pub fn scale_in(progress: f64, start_scale: f64, end_scale: f64, ease: Ease) -> f64 {
    lerp(start_scale, end_scale, ease.apply(progress))
}

/// [`scale_in`] with the default `0.85 -> 1.0` overshooting pop.
pub fn pop_in(progress: f64) -> f64 {
    scale_in(progress, 0.85, 1.0, Ease::OutBack)
}

/// Remaining whole seconds of a countdown, never negative.
pub fn countdown_value(total_seconds: u32, elapsed: f64) -> u32 {
    if !elapsed.is_finite() || elapsed <= 0.0 {
        return total_seconds;
    }
    let whole = elapsed.floor();
    if whole >= f64::from(total_seconds) {
        0
    } else {
        total_seconds - whole as u32
    }
}

/// Countdown label, e.g. `"14s"`.
pub fn countdown_text(total_seconds: u32, elapsed: f64) -> String {
    format!("{}s", countdown_value(total_seconds, elapsed))
}

/// Local progress of element `index` in a staggered group.
///
/// The element starts at `index * delay` and runs linearly for `duration`.
pub fn stagger_progress(global_progress: f64, index: usize, delay: f64, duration: f64) -> f64 {
    let start = index as f64 * delay;
    let end = start + duration;
    if global_progress <= start {
        return 0.0;
    }
    if global_progress >= end {
        return 1.0;
    }
    (global_progress - start) / duration
}

/// A window of the timeline with an easing curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Curve applied to the clamped linear progress.
    pub ease: Ease,
}

impl Segment {
    /// Construct a segment.
    pub fn new(start: f64, duration: f64, ease: Ease) -> Self {
        Self {
            start,
            duration,
            ease,
        }
    }

    /// Clamped linear progress at time `t`.
    ///
    /// Zero-length segments jump from 0 to 1 at `start`.
    pub fn linear_progress(&self, t: f64) -> f64 {
        if t <= self.start {
            return 0.0;
        }
        if self.duration <= 0.0 || t >= self.start + self.duration {
            return 1.0;
        }
        ((t - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Eased progress at time `t`.
    pub fn progress(&self, t: f64) -> f64 {
        self.ease.apply(self.linear_progress(t))
    }

    /// `true` once `t` has entered the segment.
    pub fn has_started(&self, t: f64) -> bool {
        self.linear_progress(t) > 0.0
    }
}

/// `len` sibling elements sharing one base segment, each delayed by `index * delay`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaggerGroup {
    /// Segment of element 0.
    pub base: Segment,
    /// Extra delay per element index, in seconds.
    pub delay: f64,
    /// Number of elements.
    pub len: usize,
}

impl StaggerGroup {
    /// Linear local progress of element `index` at global time `t`.
    pub fn progress_of(&self, index: usize, t: f64) -> f64 {
        let local = (t - self.base.start).max(0.0);
        stagger_progress(local, index, self.delay, self.base.duration)
    }

    /// Time at which the last element finishes its entrance.
    pub fn end(&self) -> f64 {
        let last = self.len.saturating_sub(1) as f64;
        self.base.start + last * self.delay + self.base.duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
