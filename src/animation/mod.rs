//! Pure animation math: easing curves, interpolation, entrance motion and countdowns.

/// Easing curves.
pub mod ease;
/// Interpolation, slides, fades and timing segments.
pub mod motion;
