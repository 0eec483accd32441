//! Deck facade
//!
//! One `Deck` is one independent scroll-snap instance: pages, controller,
//! input state and sync bridge. Nothing is shared between decks.

use crate::controller::{
    Commit, JumpOutcome, Transition, TransitionController, TransitionState, TransitionTiming,
};
use crate::input::{InputAdapter, InputEvent, KeyCodes};
use crate::page::Page;
use crate::position::PositionTable;
use crate::sync::{PageListener, SyncBridge};

/// Runtime settings for a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckConfig {
    pub timing: TransitionTiming,
    pub keys: KeyCodes,
}

#[derive(Debug)]
pub struct Deck {
    pages: Vec<Page>,
    controller: TransitionController,
    input: InputAdapter,
    bridge: SyncBridge,
}

impl Deck {
    pub fn new(pages: Vec<Page>, config: DeckConfig) -> Self {
        let positions = PositionTable::from_pages(&pages);
        Self {
            pages,
            controller: TransitionController::new(positions, config.timing),
            input: InputAdapter::new(config.keys),
            bridge: SyncBridge::new(),
        }
    }

    /// Register the caller's page-change callback
    pub fn set_listener(&mut self, listener: PageListener) {
        self.bridge.set_listener(listener);
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Pages that are currently mounted, in order
    pub fn mounted_pages(&self) -> &[Page] {
        &self.pages[..self.controller.mounted_count()]
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn positions(&self) -> &PositionTable {
        self.controller.positions()
    }

    pub fn current_index(&self) -> usize {
        self.controller.current_index()
    }

    pub fn mounted_count(&self) -> usize {
        self.controller.mounted_count()
    }

    pub fn state(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn is_locked(&self) -> bool {
        self.controller.is_locked()
    }

    pub fn external_target(&self) -> Option<usize> {
        self.bridge.external_target()
    }

    pub fn touch_reference(&self) -> Option<f64> {
        self.input.touch_reference()
    }

    /// Feed one raw input event; returns the transition it started, if any
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Transition> {
        let intent = self.input.translate(event)?;
        self.controller.handle_intent(intent)
    }

    /// Caller-side page number changed
    pub fn set_target(&mut self, target: usize) -> JumpOutcome {
        self.bridge.set_target(target, &mut self.controller)
    }

    /// Render cycle after a mount-count change: starts a pending jump
    pub fn resume_pending(&mut self) -> Option<Transition> {
        self.controller.resume_pending()
    }

    /// Commit a finished transition and notify the caller
    pub fn commit(&mut self, ticket: u64) -> Option<Commit> {
        let commit = self.controller.commit(ticket)?;
        self.input.reset_touch();
        self.bridge.notify(&commit);
        Some(commit)
    }

    /// Swap in a new page sequence
    pub fn replace_pages(&mut self, pages: Vec<Page>) {
        self.controller
            .replace_positions(PositionTable::from_pages(&pages));
        self.pages = pages;
        self.input.end_touch();
    }

    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.input.end_touch();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::input::{KEY_DOWN, KEY_UP};

    fn demo_pages(n: usize) -> Vec<Page> {
        (0..n).map(|i| Page::new(format!("Page {}", i + 1), "")).collect()
    }

    fn deck_with_log(n: usize) -> (Deck, Arc<Mutex<Vec<usize>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut deck = Deck::new(demo_pages(n), DeckConfig::default());
        deck.set_listener(Box::new(move |i| sink.lock().unwrap().push(i)));
        (deck, log)
    }

    #[test]
    fn test_advance_scenario() {
        let (mut deck, log) = deck_with_log(4);

        let t = deck.handle_input(InputEvent::Key { code: KEY_DOWN }).unwrap();
        assert!(deck.is_locked());
        assert_eq!(t.offset, -100);
        assert_eq!(t.commit_after, Duration::from_millis(1200));

        // Second advance inside the window is dropped
        assert!(deck.handle_input(InputEvent::Wheel { delta_y: 50.0 }).is_none());

        deck.commit(t.ticket).unwrap();
        assert_eq!(deck.current_index(), 1);
        assert_eq!(*log.lock().unwrap(), vec![1]);

        let t = deck.handle_input(InputEvent::Wheel { delta_y: 50.0 }).unwrap();
        deck.commit(t.ticket).unwrap();
        assert_eq!(deck.current_index(), 2);
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_external_jump_scenario() {
        let (mut deck, log) = deck_with_log(4);
        assert_eq!(deck.mounted_count(), 2);

        let outcome = deck.set_target(3);
        assert_eq!(outcome, JumpOutcome::PendingMount { target: 3, mounted: 4 });
        assert_eq!(deck.mounted_pages().len(), 4);

        let t = deck.resume_pending().unwrap();
        assert_eq!(t.offset, deck.positions().offset(3).unwrap());
        deck.commit(t.ticket).unwrap();

        assert_eq!(deck.current_index(), 3);
        assert_eq!(*log.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_commit_resets_touch_reference() {
        let (mut deck, _) = deck_with_log(3);
        assert!(deck.handle_input(InputEvent::TouchMove { client_y: 200.0 }).is_none());
        let t = deck
            .handle_input(InputEvent::TouchMove { client_y: 120.0 })
            .unwrap();
        assert_eq!(t.to, 1);
        deck.commit(t.ticket);
        assert_eq!(deck.touch_reference(), Some(0.0));
    }

    #[test]
    fn test_touch_after_commit_compares_against_zero() {
        let (mut deck, _) = deck_with_log(3);
        let t = deck.handle_input(InputEvent::Key { code: KEY_DOWN }).unwrap();
        deck.commit(t.ticket).unwrap();
        assert_eq!(deck.current_index(), 1);

        // Any positive y is below the zeroed reference: retreat right away
        let t = deck
            .handle_input(InputEvent::TouchMove { client_y: 50.0 })
            .unwrap();
        assert_eq!((t.from, t.to), (1, 0));
    }

    #[test]
    fn test_keyboard_retreat_at_first_page_is_noop() {
        let (mut deck, log) = deck_with_log(3);
        assert!(deck.handle_input(InputEvent::Key { code: KEY_UP }).is_none());
        assert_eq!(deck.current_index(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_instances_are_independent() {
        let (mut a, _) = deck_with_log(3);
        let (mut b, _) = deck_with_log(3);
        assert!(a.handle_input(InputEvent::Key { code: KEY_DOWN }).is_some());
        assert!(a.is_locked());
        assert!(!b.is_locked());
        assert!(b.handle_input(InputEvent::Key { code: KEY_DOWN }).is_some());
    }

    #[test]
    fn test_replace_pages() {
        let (mut deck, _) = deck_with_log(4);
        let t = deck.handle_input(InputEvent::Key { code: KEY_DOWN }).unwrap();
        deck.replace_pages(demo_pages(2));
        assert!(deck.commit(t.ticket).is_none());
        assert_eq!(deck.pages().len(), 2);
        assert_eq!(deck.mounted_count(), 2);
        assert_eq!(deck.current_index(), 0);
    }
}
