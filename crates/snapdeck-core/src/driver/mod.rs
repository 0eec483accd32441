mod handle;
mod service;

pub use handle::DeckHandle;
pub use service::{DeckCommand, DeckEvent, DeckService};
