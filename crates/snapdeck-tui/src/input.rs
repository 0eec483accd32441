use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use snapdeck_core::InputEvent;

use crate::event::AppEvent;
use crate::keymap::{KeyBinding, Keymap};

/// What a terminal event asks the application to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Set the page number to the first page
    FirstPage,
    /// Set the page number to the last page
    LastPage,
    /// Set the page number (0-based)
    GoToPage(usize),
    /// Reload the pages from the config file
    Reload,
    /// Raw input for the deck's own input channels
    Deck(InputEvent),
    None,
}

/// Map a terminal event to an action
pub fn handle_event(event: &AppEvent, keymap: &Keymap, wheel_step: f64) -> Action {
    match event {
        AppEvent::Key(key) => handle_key_event(*key, keymap),
        AppEvent::Mouse(mouse) => handle_mouse_event(*mouse, wheel_step),
        AppEvent::Resize(_, _) | AppEvent::Tick => Action::None,
    }
}

fn handle_key_event(key: KeyEvent, keymap: &Keymap) -> Action {
    if let Some(action) = keymap.get(&KeyBinding::from(key)) {
        return action.clone();
    }

    match (key.code, key.modifiers) {
        // Digits set the page number directly: '1' is the first page
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::GoToPage(c as usize - '1' as usize)
        }
        (code, _) => match dom_key_code(code) {
            Some(code) => Action::Deck(InputEvent::Key { code }),
            None => Action::None,
        },
    }
}

fn handle_mouse_event(mouse: MouseEvent, wheel_step: f64) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Deck(InputEvent::Wheel { delta_y: wheel_step }),
        MouseEventKind::ScrollUp => Action::Deck(InputEvent::Wheel { delta_y: -wheel_step }),
        // A left-button drag stands in for a touch gesture
        MouseEventKind::Drag(MouseButton::Left) => Action::Deck(InputEvent::TouchMove {
            client_y: f64::from(mouse.row),
        }),
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Up(MouseButton::Left) => {
            Action::Deck(InputEvent::TouchEnd)
        }
        _ => Action::None,
    }
}

/// Browser-style key code for a terminal key, so configured codes like 38/40
/// keep their usual meaning
pub fn dom_key_code(code: KeyCode) -> Option<u16> {
    let code = match code {
        KeyCode::Backspace => 8,
        KeyCode::Tab => 9,
        KeyCode::Enter => 13,
        KeyCode::Esc => 27,
        KeyCode::Char(' ') => 32,
        KeyCode::PageUp => 33,
        KeyCode::PageDown => 34,
        KeyCode::End => 35,
        KeyCode::Home => 36,
        KeyCode::Left => 37,
        KeyCode::Up => 38,
        KeyCode::Right => 39,
        KeyCode::Down => 40,
        KeyCode::Insert => 45,
        KeyCode::Delete => 46,
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u16,
        KeyCode::F(n) if (1..=12).contains(&n) => 111 + u16::from(n),
        _ => return None,
    };
    Some(code)
}
