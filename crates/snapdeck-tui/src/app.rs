use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use snapdeck_core::{AppConfig, Deck, DeckEvent, DeckHandle, Page, PositionTable};
use tracing::{debug, info, warn};

use crate::input::Action;
use crate::keymap::Keymap;
use crate::scroll::OffsetAnimator;
use crate::theme::Theme;

/// Page movement shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub from: usize,
    pub to: usize,
}

/// Front-end state for one deck
///
/// `current_page` is the page number owned by the caller side: it is
/// updated from page-change notifications and fed back to the deck, the
/// same way a parent component re-renders with a new prop.
pub struct App {
    pub config: AppConfig,
    pub keymap: Keymap,
    pub theme: Theme,
    pub pages: Vec<Page>,
    pub positions: PositionTable,
    pub current_page: usize,
    pub mounted: usize,
    pub movement: Option<Movement>,
    pub animator: OffsetAnimator,
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// File the pages are reloaded from
    pub config_path: Option<PathBuf>,
    handle: Option<DeckHandle>,
}

impl App {
    /// Snapshot a deck before it is handed to its service
    pub fn new(config: AppConfig, deck: &Deck) -> Self {
        let mut animator = OffsetAnimator::new(&config.transition);
        animator.set_offset(deck.controller().current_offset() as f64);

        Self {
            keymap: Keymap::from_config(&config.keymap),
            theme: Theme::by_name(&config.ui.theme),
            pages: deck.pages().to_vec(),
            positions: deck.positions().clone(),
            current_page: deck.current_index(),
            mounted: deck.mounted_count(),
            movement: None,
            animator,
            status_message: None,
            should_quit: false,
            config_path: None,
            handle: None,
            config,
        }
    }

    /// Connect to the running deck service
    pub fn attach(&mut self, handle: DeckHandle) {
        self.handle = Some(handle);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn mounted_pages(&self) -> &[Page] {
        &self.pages[..self.mounted.min(self.pages.len())]
    }

    /// Apply a notification from the deck service
    pub fn handle_deck_event(&mut self, event: DeckEvent, now: Instant) -> Result<()> {
        match event {
            DeckEvent::TransitionStarted { from, to, offset, .. } => {
                self.movement = Some(Movement { from, to });
                self.animator.start(offset as f64, now);
            }
            DeckEvent::Mounted { count } => {
                self.mounted = count;
            }
            DeckEvent::PageChanged { index } => {
                self.movement = None;
                self.current_page = index;
                // Re-render with the new page number; the deck ignores it
                // because it already sits on that page
                self.send(|handle| handle.set_target(index))?;
            }
            DeckEvent::Reset { index, mounted } => {
                self.movement = None;
                self.current_page = index;
                self.mounted = mounted;
                let offset = self.positions.offset(index).unwrap_or(0);
                self.animator.set_offset(offset as f64);
            }
            DeckEvent::Stopped => {
                debug!("Deck service stopped");
                self.should_quit = true;
            }
        }
        Ok(())
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                if let Some(ref handle) = self.handle {
                    if handle.shutdown().is_err() {
                        debug!("Deck service already gone");
                    }
                }
            }
            Action::FirstPage => self.request_page(0)?,
            Action::LastPage => self.request_page(self.page_count().saturating_sub(1))?,
            Action::GoToPage(page) => self.request_page(page)?,
            Action::Reload => self.reload_pages()?,
            Action::Deck(event) => self.send(|handle| handle.input(event))?,
            Action::None => {}
        }
        Ok(())
    }

    /// Set the caller-side page number
    pub fn request_page(&mut self, page: usize) -> Result<()> {
        if page >= self.page_count() {
            self.status_message = Some(format!("No page {}", page + 1));
            return Ok(());
        }
        self.status_message = None;
        self.current_page = page;
        self.send(|handle| handle.set_target(page))
    }

    /// Re-read `[[pages]]` from the config file and hand them to the deck
    pub fn reload_pages(&mut self) -> Result<()> {
        let Some(ref path) = self.config_path else {
            self.status_message = Some("No config file to reload".to_string());
            return Ok(());
        };
        match AppConfig::load_from(path) {
            Ok(config) => {
                info!("Reloaded {} pages from {}", config.pages.len(), path.display());
                self.status_message = Some(format!("Reloaded {} pages", config.pages.len()));
                self.replace_pages(config.pages)
            }
            Err(e) => {
                warn!("Failed to reload {}: {}", path.display(), e);
                self.status_message = Some(format!("Reload failed: {}", e));
                Ok(())
            }
        }
    }

    /// Swap the deck's pages; the service answers with a reset
    pub fn replace_pages(&mut self, pages: Vec<Page>) -> Result<()> {
        self.positions = PositionTable::from_pages(&pages);
        self.pages = pages.clone();
        self.send(|handle| handle.replace_pages(pages))
    }

    /// Advance the stack animation; returns the offset (percent) to draw
    pub fn update_animation(&mut self, now: Instant) -> f64 {
        self.animator.update(now)
    }

    pub fn needs_animation_frame(&self) -> bool {
        self.animator.is_animating()
    }

    fn send<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&DeckHandle) -> snapdeck_core::Result<()>,
    {
        match self.handle {
            Some(ref handle) => Ok(f(handle)?),
            None => {
                warn!("Deck service not attached, dropping request");
                Ok(())
            }
        }
    }
}
