use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use snapdeck_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

impl From<KeyEvent> for KeyBinding {
    fn from(key: KeyEvent) -> Self {
        Self::new(key.code, key.modifiers)
    }
}

/// Application-level key bindings
///
/// Keys not bound here fall through to the deck's keyboard channel.
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        let mut add_binding = |key_str: &str, action: Action| {
            match parse_key_binding(key_str) {
                Some(binding) => {
                    if let Some(existing) = bindings.get(&binding) {
                        warn!(
                            "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                            key_str, existing, action
                        );
                    } else {
                        bindings.insert(binding, action);
                    }
                }
                None => warn!("Invalid key binding: '{}', ignoring", key_str),
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.first_page, Action::FirstPage);
        add_binding(&config.last_page, Action::LastPage);
        add_binding(&config.reload, Action::Reload);

        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.entry(KeyBinding::simple(KeyCode::Esc)).or_insert(Action::Quit);

        Self { bindings }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }
}

/// Parse Vim-style notation: "q", "G", "<C-c>", "<S-g>", "<Home>", "<Space>"
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(inner) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        if let Some(key) = inner.strip_prefix("C-") {
            return parse_single(key).map(KeyBinding::ctrl);
        }
        if let Some(key) = inner.strip_prefix("S-") {
            return parse_single(key).map(|code| match code {
                KeyCode::Char(c) => KeyBinding::shift(KeyCode::Char(c.to_ascii_uppercase())),
                KeyCode::Tab => KeyBinding::shift(KeyCode::BackTab),
                other => KeyBinding::shift(other),
            });
        }
        return parse_named(inner).map(KeyBinding::simple);
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        // Terminals report uppercase letters with SHIFT held
        (Some(c), None) if c.is_ascii_uppercase() => Some(KeyBinding::shift(KeyCode::Char(c))),
        (Some(c), None) => Some(KeyBinding::simple(KeyCode::Char(c))),
        _ => None,
    }
}

fn parse_single(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeyCode::Char(c)),
        _ => parse_named(key),
    }
}

fn parse_named(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "cr" | "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        assert_eq!(parse_key_binding("q"), Some(KeyBinding::simple(KeyCode::Char('q'))));
        assert_eq!(parse_key_binding("G"), Some(KeyBinding::shift(KeyCode::Char('G'))));
        assert_eq!(parse_key_binding("gg"), None);
        assert_eq!(parse_key_binding(""), None);
    }

    #[test]
    fn test_parse_bracketed_keys() {
        assert_eq!(parse_key_binding("<C-c>"), Some(KeyBinding::ctrl(KeyCode::Char('c'))));
        assert_eq!(parse_key_binding("<S-g>"), Some(KeyBinding::shift(KeyCode::Char('G'))));
        assert_eq!(parse_key_binding("<Home>"), Some(KeyBinding::simple(KeyCode::Home)));
        assert_eq!(parse_key_binding("<Space>"), Some(KeyBinding::simple(KeyCode::Char(' '))));
        assert_eq!(parse_key_binding("<S-Tab>"), Some(KeyBinding::shift(KeyCode::BackTab)));
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_default_keymap() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('g'))),
            Some(&Action::FirstPage)
        );
        assert_eq!(
            keymap.get(&KeyBinding::shift(KeyCode::Char('G'))),
            Some(&Action::LastPage)
        );
        assert_eq!(
            keymap.get(&KeyBinding::ctrl(KeyCode::Char('c'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('r'))),
            Some(&Action::Reload)
        );
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Down)), None);
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            quit: "x".to_string(),
            first_page: "x".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('x'))),
            Some(&Action::Quit)
        );
    }
}
