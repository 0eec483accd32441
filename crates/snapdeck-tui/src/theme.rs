use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

/// Colors used to draw the deck
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    /// Page backgrounds, cycled by page index
    pub panels: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}

impl Theme {
    /// Look up a built-in theme; unknown names fall back to gruvbox-dark
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox-dark" | "gruvbox" => Self::gruvbox_dark(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            other => {
                warn!("Unknown theme '{}', using gruvbox-dark", other);
                Self::gruvbox_dark()
            }
        }
    }

    pub fn gruvbox_dark() -> Self {
        Self {
            bg: Color::Rgb(0x28, 0x28, 0x28),
            fg: Color::Rgb(0xd4, 0xbe, 0x98),
            muted: Color::Rgb(0x92, 0x83, 0x74),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            border: Color::Rgb(0x7c, 0x6f, 0x64),
            status_bg: Color::Rgb(0x32, 0x30, 0x2f),
            status_fg: Color::Rgb(0xdd, 0xc7, 0xa1),
            panels: vec![
                Color::Rgb(0x32, 0x30, 0x2f),
                Color::Rgb(0x45, 0x40, 0x3d),
                Color::Rgb(0x3c, 0x38, 0x36),
                Color::Rgb(0x50, 0x49, 0x45),
            ],
        }
    }

    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(0x2e, 0x34, 0x40),     // nord0
            fg: Color::Rgb(0xec, 0xef, 0xf4),     // nord6
            muted: Color::Rgb(0xd8, 0xde, 0xe9),  // nord4
            accent: Color::Rgb(0x88, 0xc0, 0xd0), // nord8
            border: Color::Rgb(0x4c, 0x56, 0x6a), // nord3
            status_bg: Color::Rgb(0x3b, 0x42, 0x52),
            status_fg: Color::Rgb(0xe5, 0xe9, 0xf0),
            panels: vec![
                Color::Rgb(0x3b, 0x42, 0x52),
                Color::Rgb(0x43, 0x4c, 0x5e),
                Color::Rgb(0x4c, 0x56, 0x6a),
            ],
        }
    }

    pub fn dracula() -> Self {
        Self {
            bg: Color::Rgb(0x28, 0x2a, 0x36),
            fg: Color::Rgb(0xf8, 0xf8, 0xf2),
            muted: Color::Rgb(0x62, 0x72, 0xa4),
            accent: Color::Rgb(0xbd, 0x93, 0xf9),
            border: Color::Rgb(0x62, 0x72, 0xa4),
            status_bg: Color::Rgb(0x21, 0x22, 0x2c),
            status_fg: Color::Rgb(0xe9, 0xe9, 0xea),
            panels: vec![
                Color::Rgb(0x21, 0x22, 0x2c),
                Color::Rgb(0x44, 0x47, 0x5a),
            ],
        }
    }

    /// Background for page `index`
    pub fn panel(&self, index: usize) -> Color {
        if self.panels.is_empty() {
            return self.bg;
        }
        self.panels[index % self.panels.len()]
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_style(&self) -> Style {
        Style::default().fg(self.status_fg).bg(self.status_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_falls_back() {
        assert_eq!(Theme::by_name("NORD").bg, Theme::nord().bg);
        assert_eq!(Theme::by_name("no-such-theme").bg, Theme::gruvbox_dark().bg);
    }

    #[test]
    fn test_panel_cycles() {
        let theme = Theme::nord();
        assert_eq!(theme.panel(0), theme.panel(3));
        assert_ne!(theme.panel(0), theme.panel(1));

        let bare = Theme {
            panels: Vec::new(),
            ..Theme::nord()
        };
        assert_eq!(bare.panel(5), bare.bg);
    }
}
