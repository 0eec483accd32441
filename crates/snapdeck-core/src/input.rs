//! Input event adapter
//!
//! Normalizes wheel, touch-move and key events into the two directional
//! intents the transition controller understands. The adapter never looks at
//! the transition lock; it only filters and classifies.

use tracing::trace;

/// Key code that moves to the previous page by default (arrow up)
pub const KEY_UP: u16 = 38;
/// Key code that moves to the next page by default (arrow down)
pub const KEY_DOWN: u16 = 40;
/// Wheel deltas at or below this magnitude are treated as noise
pub const MINIMAL_DELTA_Y: f64 = 1.0;

/// Directional transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Go to the next page
    Advance,
    /// Go to the previous page
    Retreat,
}

/// Raw input, as delivered by whatever hosts the deck
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Wheel movement; positive is "down"
    Wheel { delta_y: f64 },
    /// Vertical position of the first touch point during a move
    TouchMove { client_y: f64 },
    /// The touch gesture ended
    TouchEnd,
    /// Key press
    Key { code: u16 },
}

/// Key codes recognized by the keyboard channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCodes {
    pub up: u16,
    pub down: u16,
}

impl Default for KeyCodes {
    fn default() -> Self {
        Self {
            up: KEY_UP,
            down: KEY_DOWN,
        }
    }
}

/// Per-deck input state
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    keys: KeyCodes,
    /// First touch sample of the current gesture
    touch_reference: Option<f64>,
}

impl InputAdapter {
    pub fn new(keys: KeyCodes) -> Self {
        Self {
            keys,
            touch_reference: None,
        }
    }

    pub fn keys(&self) -> KeyCodes {
        self.keys
    }

    pub fn touch_reference(&self) -> Option<f64> {
        self.touch_reference
    }

    /// Translate one raw event into an intent, if it carries one
    pub fn translate(&mut self, event: InputEvent) -> Option<Intent> {
        let intent = match event {
            InputEvent::Wheel { delta_y } => wheel_intent(delta_y),
            InputEvent::TouchMove { client_y } => self.touch_intent(client_y),
            InputEvent::TouchEnd => {
                self.end_touch();
                None
            }
            InputEvent::Key { code } => self.key_intent(code),
        };
        trace!("Input {:?} -> {:?}", event, intent);
        intent
    }

    /// Reset the touch reference to zero after a completed transition.
    /// Later samples of the same gesture compare against 0.
    pub fn reset_touch(&mut self) {
        self.touch_reference = Some(0.0);
    }

    /// Forget the touch reference; the next touch-move starts a new gesture
    pub fn end_touch(&mut self) {
        self.touch_reference = None;
    }

    // Finger moving down (larger y) reveals the previous page. This is the
    // opposite of the wheel convention and is kept as observed.
    fn touch_intent(&mut self, client_y: f64) -> Option<Intent> {
        match self.touch_reference {
            None => {
                self.touch_reference = Some(client_y);
                None
            }
            Some(reference) if client_y > reference => Some(Intent::Retreat),
            Some(_) => Some(Intent::Advance),
        }
    }

    fn key_intent(&self, code: u16) -> Option<Intent> {
        if code == self.keys.up {
            Some(Intent::Retreat)
        } else if code == self.keys.down {
            Some(Intent::Advance)
        } else {
            None
        }
    }
}

fn wheel_intent(delta_y: f64) -> Option<Intent> {
    if delta_y.abs() <= MINIMAL_DELTA_Y {
        None
    } else if delta_y > 0.0 {
        Some(Intent::Advance)
    } else {
        Some(Intent::Retreat)
    }
}
