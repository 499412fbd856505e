use crate::foundation::error::{QuizError, QuizResult};

pub use kurbo::{Affine, Point};

/// Absolute 0-based frame index in render timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Integer frames-per-second.
///
/// Rendering samples time at `frame_index / fps`, so only whole rates are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: u32) -> QuizResult<Self> {
        if fps == 0 {
            return Err(QuizError::config("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Time in seconds sampled for frame `f`.
    pub fn time_of(self, f: FrameIndex) -> f64 {
        f.0 as f64 / self.as_f64()
    }

    /// Exact frame count for a whole-second duration.
    pub fn total_frames(self, duration_seconds: u32) -> u64 {
        u64::from(duration_seconds) * u64::from(self.0)
    }
}

impl TryFrom<u32> for Fps {
    type Error = QuizError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(value: Fps) -> Self {
        value.0
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Reject empty or odd-sized canvases.
    pub fn validate(self) -> QuizResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QuizError::config("canvas width/height must be non-zero"));
        }
        // yuv420p subsamples chroma 2x2.
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(QuizError::config(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(QuizError::config("canvas width/height must fit in u16"));
        }
        Ok(())
    }

    /// Horizontal center in pixels.
    pub fn center_x(self) -> i32 {
        (self.width / 2) as i32
    }
}

/// Integer pixel coordinate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelPoint {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

impl PixelPoint {
    /// Construct a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert to a floating-point [`Point`].
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }

    /// Round a floating-point position to the nearest pixel.
    pub fn round_from(p: Point) -> Self {
        Self {
            x: p.x.round() as i32,
            y: p.y.round() as i32,
        }
    }
}

/// Straight (non-premultiplied) RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Accent red used by the countdown and the call to action.
    pub const ALERT_RED: Self = Self::new(220, 30, 30);
    /// Background used when no background image is available.
    pub const FALLBACK_BACKGROUND: Self = Self::new(10, 10, 14);

    /// Construct a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
