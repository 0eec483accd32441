pub mod config;
pub mod controller;
pub mod deck;
pub mod dimension;
pub mod driver;
pub mod error;
pub mod input;
pub mod mount;
pub mod page;
pub mod position;
pub mod sync;

pub use config::{AppConfig, EasingType, TransitionConfig, UiConfig};
pub use controller::{
    Commit, JumpOutcome, Transition, TransitionController, TransitionState, TransitionTiming,
};
pub use deck::{Deck, DeckConfig};
pub use dimension::Dimension;
pub use driver::{DeckCommand, DeckEvent, DeckHandle, DeckService};
pub use error::{Error, Result};
pub use input::{InputAdapter, InputEvent, Intent, KeyCodes};
pub use page::Page;
pub use position::PositionTable;
