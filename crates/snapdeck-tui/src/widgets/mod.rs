mod deck;
mod status_bar;

pub use deck::{visible_slots, DeckWidget, PageSlot};
pub use status_bar::StatusBarWidget;
