//! Position calculator
//!
//! Turns the ordered page heights into the vertical offset (in percent of the
//! viewport) the page stack must be translated by so that page `i` fills the
//! viewport.

use crate::page::Page;

/// Cumulative offsets for a page sequence
///
/// Holds one more entry than there are pages: `offset[0] == 0` and
/// `offset[i + 1] == offset[i] - height[i]`. The trailing entry is the total
/// stack height, negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    offsets: Vec<i64>,
}

impl Default for PositionTable {
    fn default() -> Self {
        Self { offsets: vec![0] }
    }
}

impl PositionTable {
    /// Build the table from raw heights
    pub fn from_heights<I>(heights: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut offsets = vec![0i64];
        let mut last = 0i64;
        for height in heights {
            last -= i64::from(height);
            offsets.push(last);
        }
        Self { offsets }
    }

    /// Build the table from pages, applying the default height where needed
    pub fn from_pages(pages: &[Page]) -> Self {
        Self::from_heights(pages.iter().map(Page::height))
    }

    /// Offset that brings page `index` into view
    #[inline]
    pub fn offset(&self, index: usize) -> Option<i64> {
        if index < self.page_count() {
            self.offsets.get(index).copied()
        } else {
            None
        }
    }

    /// All offsets, including the trailing end-of-stack entry
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Offsets of the pages themselves (without the trailing entry)
    pub fn page_offsets(&self) -> &[i64] {
        &self.offsets[..self.page_count()]
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.page_count() == 0
    }

    /// Height of page `index` in percent
    pub fn height_of(&self, index: usize) -> Option<i64> {
        let top = self.offset(index)?;
        let bottom = self.offsets.get(index + 1)?;
        Some(top - bottom)
    }

    /// Height of the whole stack in percent
    pub fn total_height(&self) -> i64 {
        -self.offsets.last().copied().unwrap_or(0)
    }
}
