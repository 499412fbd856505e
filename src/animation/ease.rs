/// Overshoot constant of the classic "back" easing curve.
const BACK_OVERSHOOT: f64 = 1.70158;

/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out, symmetric around `t = 0.5`.
    InOutCubic,
    /// Ease-out that overshoots past 1 before settling, used for "pop-in" scales.
    OutBack,
}

impl Ease {
    /// All easing variants, for exhaustive checks.
    pub const ALL: [Self; 4] = [Self::Linear, Self::OutCubic, Self::InOutCubic, Self::OutBack];

    /// Apply this easing function to normalized progress `t`, clamped into `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        // Endpoints are exact for every curve, including the overshooting one.
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + BACK_OVERSHOOT * (t - 1.0).powi(2)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
