use tokio::sync::mpsc;

use crate::input::InputEvent;
use crate::page::Page;
use crate::{Error, Result};

use super::service::DeckCommand;

/// Cheap, cloneable sender side of a running [`DeckService`](super::DeckService)
#[derive(Debug, Clone)]
pub struct DeckHandle {
    tx: mpsc::UnboundedSender<DeckCommand>,
}

impl DeckHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<DeckCommand>) -> Self {
        Self { tx }
    }

    pub fn input(&self, event: InputEvent) -> Result<()> {
        self.send(DeckCommand::Input(event))
    }

    /// Update the caller-owned page number
    pub fn set_target(&self, page: usize) -> Result<()> {
        self.send(DeckCommand::SetTarget(page))
    }

    pub fn replace_pages(&self, pages: Vec<Page>) -> Result<()> {
        self.send(DeckCommand::ReplacePages(pages))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(DeckCommand::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, command: DeckCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::ChannelClosed)
    }
}
