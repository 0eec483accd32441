//! External sync bridge
//!
//! Two-way binding between the controller's committed index and a page number
//! owned by the caller. Inbound, a changed target becomes a jump request.
//! Outbound, every commit is reported exactly once.

use std::fmt;

use tracing::debug;

use crate::controller::{Commit, JumpOutcome, TransitionController};

/// Callback invoked with the new index after each commit
pub type PageListener = Box<dyn FnMut(usize) + Send>;

#[derive(Default)]
pub struct SyncBridge {
    /// Last target the caller asked for
    external_target: Option<usize>,
    listener: Option<PageListener>,
    notifications: u64,
}

impl fmt::Debug for SyncBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncBridge")
            .field("external_target", &self.external_target)
            .field("has_listener", &self.listener.is_some())
            .field("notifications", &self.notifications)
            .finish()
    }
}

impl SyncBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(mut self, listener: PageListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn set_listener(&mut self, listener: PageListener) {
        self.listener = Some(listener);
    }

    pub fn external_target(&self) -> Option<usize> {
        self.external_target
    }

    /// Number of change notifications sent so far
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    /// Take a new caller-supplied target
    ///
    /// Only a changed value is acted on, and only when it differs from the
    /// committed index. Echoing the last notified index back is therefore a
    /// no-op.
    pub fn set_target(
        &mut self,
        target: usize,
        controller: &mut TransitionController,
    ) -> JumpOutcome {
        if self.external_target == Some(target) {
            return JumpOutcome::Ignored;
        }
        self.external_target = Some(target);

        if target == controller.current_index() {
            debug!("External target {} already current", target);
            return JumpOutcome::Ignored;
        }
        controller.jump_to(target)
    }

    /// Report a commit to the caller
    pub fn notify(&mut self, commit: &Commit) {
        self.notifications += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener(commit.index);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::controller::TransitionTiming;
    use crate::position::PositionTable;

    fn controller() -> TransitionController {
        TransitionController::new(
            PositionTable::from_heights(vec![100; 4]),
            TransitionTiming::default(),
        )
    }

    fn recording_bridge() -> (SyncBridge, Arc<Mutex<Vec<usize>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let bridge = SyncBridge::new().with_listener(Box::new(move |index| {
            sink.lock().unwrap().push(index);
        }));
        (bridge, seen)
    }

    #[test]
    fn test_target_equal_to_current_is_ignored() {
        let mut c = controller();
        let mut bridge = SyncBridge::new();
        assert_eq!(bridge.set_target(0, &mut c), JumpOutcome::Ignored);
        assert!(!c.is_locked());
    }

    #[test]
    fn test_changed_target_starts_jump() {
        let mut c = controller();
        let (mut bridge, seen) = recording_bridge();

        let t = match bridge.set_target(1, &mut c) {
            JumpOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        let commit = c.commit(t.ticket).unwrap();
        bridge.notify(&commit);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(bridge.notifications(), 1);
    }

    #[test]
    fn test_echo_does_not_loop() {
        let mut c = controller();
        let (mut bridge, seen) = recording_bridge();

        let t = c.advance().unwrap();
        let commit = c.commit(t.ticket).unwrap();
        bridge.notify(&commit);

        // Caller writes the notified value back
        let echoed = seen.lock().unwrap()[0];
        assert_eq!(bridge.set_target(echoed, &mut c), JumpOutcome::Ignored);
        assert!(!c.is_locked());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unchanged_target_is_not_retried() {
        let mut c = controller();
        let mut bridge = SyncBridge::new();

        let t = c.advance().unwrap();
        // Dropped: transition in flight
        assert_eq!(bridge.set_target(3, &mut c), JumpOutcome::Ignored);
        c.commit(t.ticket);

        // Same value again: no change, nothing happens
        assert_eq!(bridge.set_target(3, &mut c), JumpOutcome::Ignored);
        assert_eq!(bridge.external_target(), Some(3));

        // A different value is evaluated against the settled state
        assert!(matches!(
            bridge.set_target(2, &mut c),
            JumpOutcome::Started(_)
        ));
    }
}
