//! Page stack offset animation
//!
//! Slides the stack from its current offset to the target offset announced by
//! the deck, using the configured easing and duration.

use std::time::{Duration, Instant};

use super::config::{EasingType, TransitionConfig, TransitionConfigExt};
use super::easing::EasingTypeExt;
use super::timing::{lerp, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    /// Offset (percent) when the move started
    from: f64,
    /// Offset (percent) the move ends on
    to: f64,
}

/// Interpolates the page stack offset during a transition
///
/// Call `start()` when a transition begins, then `update()` every frame.
#[derive(Debug, Clone)]
pub struct OffsetAnimator {
    animation: Option<ActiveAnimation>,
    duration: Duration,
    easing: EasingType,
    animated: bool,
    current: f64,
}

impl Default for OffsetAnimator {
    fn default() -> Self {
        Self::new(&TransitionConfig::default())
    }
}

impl OffsetAnimator {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            animation: None,
            duration: config.animation_duration(),
            easing: config.easing,
            animated: config.is_animated(),
            current: 0.0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Offset shown on the last update
    #[inline]
    pub fn current_offset(&self) -> f64 {
        self.current
    }

    /// Offset the running animation ends on
    pub fn target_offset(&self) -> f64 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current)
    }

    /// Place the stack without animating
    pub fn set_offset(&mut self, offset: f64) {
        self.animation = None;
        self.current = offset;
    }

    /// Begin sliding from the current offset to `to`
    pub fn start(&mut self, to: f64, now: Instant) {
        if !self.animated || (self.current - to).abs() < f64::EPSILON {
            self.set_offset(to);
            return;
        }
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to,
        });
    }

    /// Advance to `now` and return the offset to draw
    pub fn update(&mut self, now: Instant) -> f64 {
        if let Some(ref anim) = self.animation {
            let t = progress(now.saturating_duration_since(anim.start), self.duration);
            if t >= 1.0 {
                self.current = anim.to;
                self.animation = None;
            } else {
                self.current = lerp(anim.from, anim.to, self.easing.apply(t));
            }
        }
        self.current
    }

    /// Stop wherever the stack currently is
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
