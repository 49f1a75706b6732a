use crate::traits::Lerp;

/// Easing curves available to the animation driver
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingFunction {
    Linear,
    /// `f(t) = t·(2 − t)`: fast start, gentle landing
    #[default]
    EaseOutQuad,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutQuad => t * (2.0 - t),
        }
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Elapsed fraction of `[start, end]` at `now`, clamped to `[0, 1]`.
    /// A zero-length span is complete immediately.
    pub fn progress(start: f64, end: f64, now: f64) -> f64 {
        let length = end - start;
        if !(length > 0.0) {
            return 1.0;
        }
        ((now - start).max(0.0) / length).min(1.0)
    }

    /// Interpolation with easing function
    pub fn ease<T: Lerp>(start: &T, end: &T, t: f64, easing: EasingFunction) -> T {
        start.lerp(end, easing.apply(t))
    }
}
