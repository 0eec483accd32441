use std::time::Duration;

pub use snapdeck_core::{EasingType, TransitionConfig, UiConfig};

/// Extension trait for TransitionConfig with animation helpers
pub trait TransitionConfigExt {
    /// Duration of the visual move
    fn animation_duration(&self) -> Duration;

    /// Whether the move is drawn in steps rather than as a jump
    fn is_animated(&self) -> bool;
}

impl TransitionConfigExt for TransitionConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_timer_ms)
    }

    #[inline]
    fn is_animated(&self) -> bool {
        self.animation_timer_ms > 0 && self.easing != EasingType::None
    }
}

/// Extension trait for UiConfig frame timing
pub trait UiConfigExt {
    /// Poll interval while idle
    fn tick_duration(&self) -> Duration;

    /// Poll interval while a transition animates
    fn animation_tick_duration(&self) -> Duration;
}

impl UiConfigExt for UiConfig {
    #[inline]
    fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis((1000 / self.animation_fps as u64).max(1))
        }
    }
}
