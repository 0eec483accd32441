//! Visual page transitions
//!
//! The controller in `snapdeck-core` only decides *where* the page stack goes
//! and *when* the move counts as done. This module animates the offset in
//! between so the terminal shows the stack sliding.
//!
//! ## Building blocks
//! - `easing` - Pure easing curves mapping [0, 1] to [0, 1]
//! - `timing` - Progress and interpolation helpers
//! - `config` - Helpers on top of the transition/UI configuration
//!
//! ## Controller
//! - `animation` - `OffsetAnimator`, driven once per frame
//!
//! # Usage
//!
//! ```ignore
//! let mut animator = OffsetAnimator::new(&config.transition);
//! // On DeckEvent::TransitionStarted { offset, .. }
//! animator.start(offset as f64, Instant::now());
//! // Every frame
//! let offset = animator.update(Instant::now());
//! ```

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::OffsetAnimator;
pub use config::{TransitionConfigExt, UiConfigExt};
pub use easing::{EasingType, EasingTypeExt};
