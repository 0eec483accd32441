//! Lazy mount manager
//!
//! Tracks how many leading pages have been instantiated. Pages are mounted
//! once and retained; the count only grows until the page sequence itself is
//! replaced.

use std::ops::Range;

use tracing::debug;

use crate::position::PositionTable;

/// Pages whose offset magnitude is below this (in percent) are mounted at startup
pub const NEAR_VIEWPORT_THRESHOLD: i64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountManager {
    mounted: usize,
    page_count: usize,
}

impl MountManager {
    pub fn new(positions: &PositionTable) -> Self {
        Self {
            mounted: initial_mount_count(positions),
            page_count: positions.page_count(),
        }
    }

    /// Re-seed for a replaced page sequence
    pub fn reset(&mut self, positions: &PositionTable) {
        *self = Self::new(positions);
    }

    #[inline]
    pub fn mounted_count(&self) -> usize {
        self.mounted
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[inline]
    pub fn is_mounted(&self, index: usize) -> bool {
        index < self.mounted
    }

    pub fn mounted_range(&self) -> Range<usize> {
        0..self.mounted
    }

    /// Keep the page after `index` ready once `index` has been reached.
    ///
    /// Returns true if the mounted count changed.
    pub fn grow_after_advance(&mut self, index: usize) -> bool {
        let wanted = if index + 1 < self.page_count {
            index + 2
        } else {
            index + 1
        };
        self.grow_to(wanted)
    }

    /// Mount every page from the current boundary through `target`, inclusive.
    ///
    /// Returns true if the mounted count changed.
    pub fn mount_through(&mut self, target: usize) -> bool {
        self.grow_to(target + 1)
    }

    fn grow_to(&mut self, count: usize) -> bool {
        let count = count.min(self.page_count);
        if count > self.mounted {
            debug!("Mounting pages {}..{}", self.mounted, count);
            self.mounted = count;
            true
        } else {
            false
        }
    }
}

/// Page 0, every further leading page close to the viewport, and the page
/// after the first when there is one.
fn initial_mount_count(positions: &PositionTable) -> usize {
    let page_count = positions.page_count();
    if page_count == 0 {
        return 0;
    }

    let near = positions
        .page_offsets()
        .iter()
        .take_while(|offset| offset.abs() < NEAR_VIEWPORT_THRESHOLD)
        .count();

    near.max(2).min(page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(heights: &[u32]) -> PositionTable {
        PositionTable::from_heights(heights.iter().copied())
    }

    #[test]
    fn test_initial_mount_full_pages() {
        let mounts = MountManager::new(&table(&[100, 100, 100, 100]));
        assert_eq!(mounts.mounted_count(), 2);
        assert!(mounts.is_mounted(1));
        assert!(!mounts.is_mounted(2));
    }

    #[test]
    fn test_initial_mount_short_pages() {
        // offsets 0, -40, -80, -120, -160, -200
        let mounts = MountManager::new(&table(&[40, 40, 40, 40, 40, 40, 40]));
        assert_eq!(mounts.mounted_count(), 5);
    }

    #[test]
    fn test_initial_mount_clamped() {
        assert_eq!(MountManager::new(&table(&[10, 10])).mounted_count(), 2);
        assert_eq!(MountManager::new(&table(&[100])).mounted_count(), 1);
        assert_eq!(MountManager::new(&table(&[])).mounted_count(), 0);
    }

    #[test]
    fn test_grow_after_advance() {
        let mut mounts = MountManager::new(&table(&[100, 100, 100, 100]));
        assert!(mounts.grow_after_advance(1));
        assert_eq!(mounts.mounted_count(), 3);
        assert!(mounts.grow_after_advance(2));
        assert_eq!(mounts.mounted_count(), 4);
        // Last page: nothing left to mount
        assert!(!mounts.grow_after_advance(3));
        assert_eq!(mounts.mounted_count(), 4);
    }

    #[test]
    fn test_never_shrinks() {
        let mut mounts = MountManager::new(&table(&[100; 6]));
        mounts.mount_through(4);
        assert_eq!(mounts.mounted_count(), 5);
        assert!(!mounts.grow_after_advance(0));
        assert!(!mounts.mount_through(1));
        assert_eq!(mounts.mounted_count(), 5);
    }

    #[test]
    fn test_mount_through_clamps() {
        let mut mounts = MountManager::new(&table(&[100; 3]));
        mounts.mount_through(10);
        assert_eq!(mounts.mounted_count(), 3);
        assert_eq!(mounts.mounted_range(), 0..3);
    }

    #[test]
    fn test_reset() {
        let mut mounts = MountManager::new(&table(&[100; 6]));
        mounts.mount_through(5);
        mounts.reset(&table(&[100; 3]));
        assert_eq!(mounts.mounted_count(), 2);
        assert_eq!(mounts.page_count(), 3);
    }
}
