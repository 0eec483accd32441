use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::controller::{
    TransitionTiming, DEFAULT_ANIMATION_TIMER_BUFFER_MS, DEFAULT_ANIMATION_TIMER_MS,
};
use crate::deck::DeckConfig;
use crate::dimension::Dimension;
use crate::input::{KeyCodes, KEY_DOWN, KEY_UP};
use crate::page::Page;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
    /// Pages presented by the deck, top to bottom
    #[serde(default = "default_pages")]
    pub pages: Vec<Page>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            transition: TransitionConfig::default(),
            container: ContainerConfig::default(),
            input: InputConfig::default(),
            ui: UiConfig::default(),
            keymap: KeymapConfig::default(),
            pages: default_pages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Easing curve for the visual page transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    /// Slow start and end, like CSS `ease-in-out`
    #[default]
    EaseInOut,
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Visual transition duration in milliseconds
    #[serde(default = "default_animation_timer")]
    pub animation_timer_ms: u64,
    /// Extra settle time before the page index is committed
    #[serde(default = "default_animation_timer_buffer")]
    pub animation_timer_buffer_ms: u64,
    /// Easing curve used while animating
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            animation_timer_ms: default_animation_timer(),
            animation_timer_buffer_ms: default_animation_timer_buffer(),
            easing: EasingType::default(),
        }
    }
}

impl TransitionConfig {
    pub fn timing(&self) -> TransitionTiming {
        TransitionTiming::from_millis(self.animation_timer_ms, self.animation_timer_buffer_ms)
    }
}

/// Size of the scroll region, e.g. "100vh", "80%", "24"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default = "default_container_height")]
    pub height: String,
    #[serde(default = "default_container_width")]
    pub width: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            height: default_container_height(),
            width: default_container_width(),
        }
    }
}

impl ContainerConfig {
    pub fn height(&self) -> crate::Result<Dimension> {
        self.height.parse()
    }

    pub fn width(&self) -> crate::Result<Dimension> {
        self.width.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Key code that goes to the previous page
    #[serde(default = "default_key_up")]
    pub key_up: u16,
    /// Key code that goes to the next page
    #[serde(default = "default_key_down")]
    pub key_down: u16,
    /// Wheel delta reported for one mouse wheel notch
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_up: default_key_up(),
            key_down: default_key_down(),
            wheel_step: default_wheel_step(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while a transition animates
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Theme name ("gruvbox-dark", "nord")
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Show the status line
    #[serde(default = "default_true")]
    pub show_status: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            theme: default_theme_name(),
            show_status: default_true(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "q", "<C-c>", "<S-g>", "<Home>", "<End>", "<Esc>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Request the first page
    #[serde(default = "default_key_first_page")]
    pub first_page: String,
    /// Request the last page
    #[serde(default = "default_key_last_page")]
    pub last_page: String,
    /// Re-read the pages from the config file
    #[serde(default = "default_key_reload")]
    pub reload: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            first_page: default_key_first_page(),
            last_page: default_key_last_page(),
            reload: default_key_reload(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_first_page() -> String { "g".to_string() }
fn default_key_last_page() -> String { "G".to_string() }
fn default_key_reload() -> String { "r".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapdeck")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_animation_timer() -> u64 {
    DEFAULT_ANIMATION_TIMER_MS
}

fn default_animation_timer_buffer() -> u64 {
    DEFAULT_ANIMATION_TIMER_BUFFER_MS
}

fn default_container_height() -> String {
    "100vh".to_string()
}

fn default_container_width() -> String {
    "100vw".to_string()
}

fn default_key_up() -> u16 {
    KEY_UP
}

fn default_key_down() -> u16 {
    KEY_DOWN
}

fn default_wheel_step() -> f64 {
    100.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_pages() -> Vec<Page> {
    vec![
        Page::new(
            "First",
            "Scroll, drag, or press the arrow keys to move between pages.",
        ),
        Page::new(
            "Second",
            "Pages are mounted lazily: the one after the current page is always ready.",
        ),
        Page::new(
            "Third",
            "Press a digit to jump straight to that page, even if it is not mounted yet.",
        ),
        Page::new("Fourth", "That's the end of the deck. Press g to go back to the top."),
    ]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/snapdeck/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("snapdeck")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("snapdeck.log")
    }

    /// Runtime settings for a deck built from this configuration
    pub fn deck_config(&self) -> DeckConfig {
        DeckConfig {
            timing: self.transition.timing(),
            keys: KeyCodes {
                up: self.input.key_up,
                down: self.input.key_down,
            },
        }
    }

    fn validate(&self) -> crate::Result<()> {
        self.container.height()?;
        self.container.width()?;
        if self.input.key_up == self.input.key_down {
            return Err(crate::Error::Config(format!(
                "input.key_up and input.key_down are both {}",
                self.input.key_up
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.transition.animation_timer_ms, 1000);
        assert_eq!(config.transition.animation_timer_buffer_ms, 200);
        assert_eq!(config.transition.easing, EasingType::EaseInOut);
        assert_eq!(config.container.height, "100vh");
        assert_eq!(config.container.width, "100vw");
        assert_eq!(config.input.key_up, 38);
        assert_eq!(config.input.key_down, 40);
        assert_eq!(config.pages.len(), 4);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [transition]
            animation_timer_ms = 400
            easing = "cubic"

            [[pages]]
            title = "Intro"
            height = 50

            [[pages]]
            title = "Outro"
            "#,
        )
        .unwrap();

        assert_eq!(config.transition.animation_timer_ms, 400);
        assert_eq!(config.transition.animation_timer_buffer_ms, 200);
        assert_eq!(config.transition.easing, EasingType::Cubic);
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.pages[0].height(), 50);
        assert_eq!(config.pages[1].height(), 100);
        assert_eq!(config.ui.theme, "gruvbox-dark");
    }

    #[test]
    fn test_deck_config() {
        let mut config = AppConfig::default();
        config.transition.animation_timer_ms = 300;
        config.transition.animation_timer_buffer_ms = 50;
        config.input.key_up = 33;
        config.input.key_down = 34;

        let deck = config.deck_config();
        assert_eq!(deck.timing.commit_delay(), Duration::from_millis(350));
        assert_eq!(deck.keys, KeyCodes { up: 33, down: 34 });
    }

    #[test]
    fn test_invalid_dimension_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [container]
            height = "tall"
            "#,
        );
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_same_up_and_down_key_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [input]
            key_up = 40
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.pages, config.pages);
    }
}
