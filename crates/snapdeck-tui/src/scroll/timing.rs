//! Time and unit helpers for page transitions

use std::time::Duration;

/// Fraction of `duration` covered by `elapsed`, clamped to [0, 1]
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Convert a percentage of the viewport into whole rows
#[inline]
pub fn percent_to_rows(percent: f64, viewport_rows: u16) -> i32 {
    (percent * f64::from(viewport_rows) / 100.0).round() as i32
}
