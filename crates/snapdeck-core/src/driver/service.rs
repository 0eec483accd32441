use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tracing::{debug, info, warn};

use crate::controller::{JumpOutcome, Ticket, Transition};
use crate::deck::Deck;
use crate::input::InputEvent;
use crate::page::Page;

use super::handle::DeckHandle;

/// Requests accepted by a running deck service
#[derive(Debug, Clone)]
pub enum DeckCommand {
    /// Raw wheel / touch / key input
    Input(InputEvent),
    /// Caller-owned page number changed
    SetTarget(usize),
    /// Replace the page sequence
    ReplacePages(Vec<Page>),
    /// Stop the service; a pending commit is cancelled
    Shutdown,
}

/// Notifications emitted to whoever renders the deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    /// The page stack started moving toward `offset` (percent)
    TransitionStarted {
        from: usize,
        to: usize,
        offset: i64,
        animation: Duration,
    },
    /// More pages are mounted
    Mounted { count: usize },
    /// A transition committed; `index` is the new current page
    PageChanged { index: usize },
    /// The page sequence was replaced and any transition abandoned
    Reset { index: usize, mounted: usize },
    /// The service has shut down
    Stopped,
}

/// Deferred index commit, cancelled by dropping it
struct PendingCommit {
    ticket: Ticket,
    sleep: Pin<Box<Sleep>>,
}

/// Drives one [`Deck`] on the tokio runtime
///
/// Commits are scheduled as timers owned by the service loop, so stopping the
/// service cancels them outright.
pub struct DeckService {
    deck: Deck,
    event_tx: Option<mpsc::UnboundedSender<DeckEvent>>,
}

impl DeckService {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            event_tx: None,
        }
    }

    /// Set the event sender; page changes are reported through it as well
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<DeckEvent>) -> Self {
        let listener_tx = tx.clone();
        self.deck.set_listener(Box::new(move |index| {
            if listener_tx.send(DeckEvent::PageChanged { index }).is_err() {
                warn!("Failed to send page change: receiver dropped");
            }
        }));
        self.event_tx = Some(tx);
        self
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Spawn the service loop and return a handle to it
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> (DeckHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx, shutdown));
        (DeckHandle::new(tx), task)
    }

    fn send_event(&self, event: DeckEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send deck event: receiver dropped");
            }
        }
    }

    /// Process commands until shutdown
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<DeckCommand>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            "Deck service started: {} pages, commit delay {:?}",
            self.deck.pages().len(),
            self.deck.controller().timing().commit_delay()
        );

        let mut pending: Option<PendingCommit> = None;
        let mut shutdown_open = true;

        loop {
            // Render cycle: mounts published by the previous iteration are
            // visible now, so a waiting jump can start animating.
            if let Some(transition) = self.deck.resume_pending() {
                pending = Some(self.begin(transition));
            }

            tokio::select! {
                result = shutdown.changed(), if shutdown_open => match result {
                    Ok(()) if *shutdown.borrow() => {
                        info!("Deck service received shutdown signal");
                        break;
                    }
                    Ok(()) => {}
                    Err(_) => shutdown_open = false,
                },

                command = commands.recv() => match command {
                    Some(DeckCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command, &mut pending),
                },

                Some(ticket) = wait_for_commit(&mut pending) => {
                    pending = None;
                    self.commit(ticket);
                }
            }
        }

        if let Some(cancelled) = pending.take() {
            debug!("Cancelled pending commit {}", cancelled.ticket);
        }
        self.deck.teardown();
        self.send_event(DeckEvent::Stopped);
        info!("Deck service stopped");
    }

    fn apply(&mut self, command: DeckCommand, pending: &mut Option<PendingCommit>) {
        match command {
            DeckCommand::Input(event) => {
                if let Some(transition) = self.deck.handle_input(event) {
                    *pending = Some(self.begin(transition));
                }
            }
            DeckCommand::SetTarget(page) => match self.deck.set_target(page) {
                JumpOutcome::Started(transition) => {
                    *pending = Some(self.begin(transition));
                }
                JumpOutcome::PendingMount { mounted, .. } => {
                    self.send_event(DeckEvent::Mounted { count: mounted });
                }
                JumpOutcome::Ignored => {}
            },
            DeckCommand::ReplacePages(pages) => {
                *pending = None;
                self.deck.replace_pages(pages);
                self.send_event(DeckEvent::Reset {
                    index: self.deck.current_index(),
                    mounted: self.deck.mounted_count(),
                });
            }
            DeckCommand::Shutdown => {}
        }
    }

    fn begin(&self, transition: Transition) -> PendingCommit {
        self.send_event(DeckEvent::TransitionStarted {
            from: transition.from,
            to: transition.to,
            offset: transition.offset,
            animation: transition.animation,
        });
        PendingCommit {
            ticket: transition.ticket,
            sleep: Box::pin(tokio::time::sleep(transition.commit_after)),
        }
    }

    fn commit(&mut self, ticket: Ticket) {
        if let Some(commit) = self.deck.commit(ticket) {
            if commit.mounts_grew {
                self.send_event(DeckEvent::Mounted {
                    count: commit.mounted,
                });
            }
        }
    }
}

async fn wait_for_commit(pending: &mut Option<PendingCommit>) -> Option<Ticket> {
    match pending {
        Some(commit) => {
            commit.sleep.as_mut().await;
            Some(commit.ticket)
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckConfig;
    use crate::input::{KEY_DOWN, KEY_UP};
    use tokio::time::{sleep, timeout, Instant};

    struct Harness {
        handle: DeckHandle,
        events: mpsc::UnboundedReceiver<DeckEvent>,
        shutdown: watch::Sender<bool>,
        task: JoinHandle<()>,
    }

    fn start(pages: usize) -> Harness {
        let pages = (0..pages)
            .map(|i| Page::new(format!("Page {}", i + 1), ""))
            .collect();
        let deck = Deck::new(pages, DeckConfig::default());
        let (event_tx, events) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (handle, task) = DeckService::new(deck)
            .with_event_sender(event_tx)
            .spawn(shutdown_rx);
        Harness {
            handle,
            events,
            shutdown,
            task,
        }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<DeckEvent>) -> DeckEvent {
        timeout(Duration::from_secs(60), rx.recv())
            .await
            .expect("timed out waiting for deck event")
            .expect("event channel closed")
    }

    async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<DeckEvent>) {
        let result = timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(result.is_err(), "unexpected event: {:?}", result);
    }

    fn down() -> InputEvent {
        InputEvent::Key { code: KEY_DOWN }
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_commits_after_timer_and_buffer() {
        let mut h = start(4);
        let started = Instant::now();

        h.handle.input(down()).unwrap();
        // Inside the animation window: dropped
        h.handle.input(down()).unwrap();

        assert_eq!(
            next_event(&mut h.events).await,
            DeckEvent::TransitionStarted {
                from: 0,
                to: 1,
                offset: -100,
                animation: Duration::from_millis(1000),
            }
        );

        sleep(Duration::from_millis(1100)).await;
        assert!(h.events.try_recv().is_err(), "committed before the buffer elapsed");

        assert_eq!(next_event(&mut h.events).await, DeckEvent::PageChanged { index: 1 });
        assert!(started.elapsed() >= Duration::from_millis(1200));
        assert_eq!(next_event(&mut h.events).await, DeckEvent::Mounted { count: 3 });
        assert_quiet(&mut h.events).await;

        // Settled at page 1: the next advance goes through
        h.handle.input(down()).unwrap();
        assert!(matches!(
            next_event(&mut h.events).await,
            DeckEvent::TransitionStarted { from: 1, to: 2, offset: -200, .. }
        ));
        assert_eq!(next_event(&mut h.events).await, DeckEvent::PageChanged { index: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_target_mounts_then_transitions() {
        let mut h = start(4);

        h.handle.set_target(3).unwrap();

        assert_eq!(next_event(&mut h.events).await, DeckEvent::Mounted { count: 4 });
        assert_eq!(
            next_event(&mut h.events).await,
            DeckEvent::TransitionStarted {
                from: 0,
                to: 3,
                offset: -300,
                animation: Duration::from_millis(1000),
            }
        );
        assert_eq!(next_event(&mut h.events).await, DeckEvent::PageChanged { index: 3 });
        assert_quiet(&mut h.events).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_echoed_page_number_is_ignored() {
        let mut h = start(3);

        h.handle.input(down()).unwrap();
        assert!(matches!(
            next_event(&mut h.events).await,
            DeckEvent::TransitionStarted { .. }
        ));
        assert_eq!(next_event(&mut h.events).await, DeckEvent::PageChanged { index: 1 });
        assert_eq!(next_event(&mut h.events).await, DeckEvent::Mounted { count: 3 });

        h.handle.set_target(1).unwrap();
        assert_quiet(&mut h.events).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_commit() {
        let mut h = start(3);

        h.handle.input(down()).unwrap();
        assert!(matches!(
            next_event(&mut h.events).await,
            DeckEvent::TransitionStarted { .. }
        ));
        h.handle.shutdown().unwrap();

        assert_eq!(next_event(&mut h.events).await, DeckEvent::Stopped);
        // Service dropped its senders without ever committing
        assert_eq!(h.events.recv().await, None);
        h.task.await.unwrap();
        assert!(h.handle.input(down()).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_shutdown_signal() {
        let mut h = start(3);
        h.handle.input(InputEvent::Key { code: KEY_UP }).unwrap();
        h.shutdown.send(true).unwrap();
        assert_eq!(next_event(&mut h.events).await, DeckEvent::Stopped);
        h.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_pages_abandons_transition() {
        let mut h = start(4);

        h.handle.input(down()).unwrap();
        assert!(matches!(
            next_event(&mut h.events).await,
            DeckEvent::TransitionStarted { .. }
        ));
        h.handle
            .replace_pages(vec![Page::new("only", "")])
            .unwrap();
        assert_eq!(
            next_event(&mut h.events).await,
            DeckEvent::Reset { index: 0, mounted: 1 }
        );
        assert_quiet(&mut h.events).await;
    }
}
