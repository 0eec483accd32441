//! Transition controller
//!
//! The state machine that owns the current page index and the transition
//! lock. Every page change, whether it comes from user input or from an
//! external target, goes through here, and at most one is in flight at a time.
//!
//! The controller does not keep time itself. Starting a transition returns a
//! [`Transition`] describing where to move and how long to wait; whoever
//! drives the controller calls [`TransitionController::commit`] with the
//! transition's ticket once that delay has elapsed.

use std::time::Duration;

use tracing::{debug, info};

use crate::input::Intent;
use crate::mount::MountManager;
use crate::position::PositionTable;

/// Default visual transition duration in milliseconds
pub const DEFAULT_ANIMATION_TIMER_MS: u64 = 1000;
/// Default settle time added before the index commit, in milliseconds
pub const DEFAULT_ANIMATION_TIMER_BUFFER_MS: u64 = 200;

/// Identifies one started transition; stale tickets never commit
pub type Ticket = u64;

/// Timing of a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Visual transition duration
    pub animation_timer: Duration,
    /// Extra time before the index is committed
    pub animation_timer_buffer: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            animation_timer: Duration::from_millis(DEFAULT_ANIMATION_TIMER_MS),
            animation_timer_buffer: Duration::from_millis(DEFAULT_ANIMATION_TIMER_BUFFER_MS),
        }
    }
}

impl TransitionTiming {
    pub fn from_millis(animation_timer_ms: u64, animation_timer_buffer_ms: u64) -> Self {
        Self {
            animation_timer: Duration::from_millis(animation_timer_ms),
            animation_timer_buffer: Duration::from_millis(animation_timer_buffer_ms),
        }
    }

    /// Delay between the start of a transition and its commit
    #[inline]
    pub fn commit_delay(&self) -> Duration {
        self.animation_timer + self.animation_timer_buffer
    }
}

/// A transition that has been started and awaits its commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub ticket: Ticket,
    /// Index when the transition started
    pub from: usize,
    /// Index that will be committed
    pub to: usize,
    /// Offset (percent) the page stack moves to
    pub offset: i64,
    /// Duration of the visual movement
    pub animation: Duration,
    /// Delay after which `commit` should be called
    pub commit_after: Duration,
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// Nothing in flight
    Idle,
    /// An external jump is waiting for freshly mounted pages to be rendered
    /// before it starts animating
    PendingJump { target: usize },
    /// A transition is animating toward its target
    Transitioning(Transition),
}

/// Result of an external jump request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Target was mounted; the transition started right away
    Started(Transition),
    /// Pages were mounted through the target; the transition starts on
    /// the next render cycle via [`TransitionController::resume_pending`]
    PendingMount { target: usize, mounted: usize },
    /// Dropped: lock held, out of range, or already there
    Ignored,
}

/// A completed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub previous: usize,
    pub index: usize,
    /// Mounted count after the commit
    pub mounted: usize,
    /// Whether the commit mounted more pages
    pub mounts_grew: bool,
}

#[derive(Debug, Clone)]
pub struct TransitionController {
    timing: TransitionTiming,
    positions: PositionTable,
    mounts: MountManager,
    index: usize,
    state: TransitionState,
    next_ticket: Ticket,
    alive: bool,
}

impl TransitionController {
    pub fn new(positions: PositionTable, timing: TransitionTiming) -> Self {
        let mounts = MountManager::new(&positions);
        Self {
            timing,
            positions,
            mounts,
            index: 0,
            state: TransitionState::Idle,
            next_ticket: 1,
            alive: true,
        }
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether the transition lock is held
    #[inline]
    pub fn is_locked(&self) -> bool {
        !matches!(self.state, TransitionState::Idle)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn mounts(&self) -> &MountManager {
        &self.mounts
    }

    pub fn mounted_count(&self) -> usize {
        self.mounts.mounted_count()
    }

    pub fn is_mounted(&self, index: usize) -> bool {
        self.mounts.is_mounted(index)
    }

    pub fn page_count(&self) -> usize {
        self.positions.page_count()
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    pub fn set_timing(&mut self, timing: TransitionTiming) {
        self.timing = timing;
    }

    /// Offset of the committed page
    pub fn current_offset(&self) -> i64 {
        self.positions.offset(self.index).unwrap_or(0)
    }

    /// Transition currently in flight, if any
    pub fn in_flight(&self) -> Option<Transition> {
        match self.state {
            TransitionState::Transitioning(transition) => Some(transition),
            _ => None,
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Option<Transition> {
        match intent {
            Intent::Advance => self.advance(),
            Intent::Retreat => self.retreat(),
        }
    }

    /// Move to the next page, if it is mounted and nothing is in flight
    pub fn advance(&mut self) -> Option<Transition> {
        self.step(self.index.checked_add(1), Intent::Advance)
    }

    /// Move to the previous page, if it is mounted and nothing is in flight
    pub fn retreat(&mut self) -> Option<Transition> {
        self.step(self.index.checked_sub(1), Intent::Retreat)
    }

    fn step(&mut self, target: Option<usize>, intent: Intent) -> Option<Transition> {
        if !self.accepting(intent) {
            return None;
        }
        match target {
            Some(target) if self.mounts.is_mounted(target) => Some(self.begin(target)),
            _ => {
                debug!("Dropped {:?} at page {}: no mounted page there", intent, self.index);
                None
            }
        }
    }

    /// Jump directly to `target`, mounting it first when needed
    pub fn jump_to(&mut self, target: usize) -> JumpOutcome {
        if !self.accepting(target) {
            return JumpOutcome::Ignored;
        }
        if target >= self.page_count() {
            debug!("Dropped jump to {}: only {} pages", target, self.page_count());
            return JumpOutcome::Ignored;
        }
        if target == self.index {
            return JumpOutcome::Ignored;
        }

        if self.mounts.is_mounted(target) {
            return JumpOutcome::Started(self.begin(target));
        }

        self.mounts.mount_through(target);
        self.state = TransitionState::PendingJump { target };
        debug!(
            "Jump to {} waits for mount (mounted={})",
            target,
            self.mounts.mounted_count()
        );
        JumpOutcome::PendingMount {
            target,
            mounted: self.mounts.mounted_count(),
        }
    }

    /// Start the animation of a pending jump. Call once the new mount count
    /// has been rendered.
    pub fn resume_pending(&mut self) -> Option<Transition> {
        match self.state {
            TransitionState::PendingJump { target } if self.alive => Some(self.begin(target)),
            _ => None,
        }
    }

    /// Commit the transition identified by `ticket`
    ///
    /// Returns `None` for stale tickets and after teardown.
    pub fn commit(&mut self, ticket: Ticket) -> Option<Commit> {
        if !self.alive {
            debug!("Skipped commit {} after teardown", ticket);
            return None;
        }
        let transition = match self.state {
            TransitionState::Transitioning(t) if t.ticket == ticket => t,
            _ => {
                debug!("Skipped stale commit {}", ticket);
                return None;
            }
        };

        let previous = self.index;
        self.index = transition.to;
        self.state = TransitionState::Idle;

        let mounts_grew = if self.index > previous {
            self.mounts.grow_after_advance(self.index)
        } else {
            false
        };

        info!("Page {} -> {}", previous, self.index);
        Some(Commit {
            previous,
            index: self.index,
            mounted: self.mounts.mounted_count(),
            mounts_grew,
        })
    }

    /// Replace the page layout. Any transition in flight is abandoned.
    pub fn replace_positions(&mut self, positions: PositionTable) {
        self.mounts.reset(&positions);
        self.positions = positions;
        self.index = self.index.min(self.page_count().saturating_sub(1));
        self.mounts.grow_after_advance(self.index);
        self.state = TransitionState::Idle;
        // Invalidate any outstanding ticket
        self.next_ticket += 1;
    }

    /// Stop the controller. Pending commits become no-ops and new requests
    /// are refused.
    pub fn teardown(&mut self) {
        self.alive = false;
        self.state = TransitionState::Idle;
    }

    fn accepting(&self, request: impl std::fmt::Debug) -> bool {
        if !self.alive {
            debug!("Dropped {:?}: controller torn down", request);
            return false;
        }
        if self.is_locked() {
            debug!("Dropped {:?}: transition in progress", request);
            return false;
        }
        true
    }

    fn begin(&mut self, target: usize) -> Transition {
        let transition = Transition {
            ticket: self.next_ticket,
            from: self.index,
            to: target,
            offset: self.positions.offset(target).unwrap_or(0),
            animation: self.timing.animation_timer,
            commit_after: self.timing.commit_delay(),
        };
        self.next_ticket += 1;
        self.state = TransitionState::Transitioning(transition);
        debug!(
            "Transition {} -> {} (offset {}%)",
            transition.from, transition.to, transition.offset
        );
        transition
    }
}
