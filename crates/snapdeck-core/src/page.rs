use serde::{Deserialize, Serialize};

/// Height of a page, in percent of the viewport, when none is given
pub const DEFAULT_PAGE_HEIGHT: u32 = 100;

/// A single full-viewport panel in a deck
///
/// The controller only ever looks at the height; title and body are carried
/// along for whatever renders the deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Heading shown by renderers
    #[serde(default)]
    pub title: String,
    /// Free-form page content
    #[serde(default)]
    pub body: String,
    /// Intrinsic height as a percentage of the viewport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            height: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Effective height in percent. A missing or zero height falls back to 100.
    pub fn height(&self) -> u32 {
        match self.height {
            Some(h) if h > 0 => h,
            _ => DEFAULT_PAGE_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_height() {
        assert_eq!(Page::new("a", "").height(), 100);
        assert_eq!(Page::new("a", "").with_height(40).height(), 40);
    }

    #[test]
    fn test_zero_height_falls_back() {
        assert_eq!(Page::new("a", "").with_height(0).height(), DEFAULT_PAGE_HEIGHT);
    }
}
