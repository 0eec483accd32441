//! Container dimensions as written in configuration
//!
//! Accepts CSS-like units: `100vh`, `50vw`, `80%`, or a plain number of
//! terminal cells.

use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Percent of the viewport height
    ViewportHeight(u16),
    /// Percent of the viewport width
    ViewportWidth(u16),
    /// Percent of the axis being sized
    Percent(u16),
    /// Absolute size in cells
    Cells(u16),
}

impl Dimension {
    /// Resolve against a viewport of `width` x `height`, for an axis of
    /// length `axis`. The result never exceeds `axis`.
    pub fn resolve(&self, axis: u16, width: u16, height: u16) -> u16 {
        let scaled = |pct: u16, base: u16| (u32::from(base) * u32::from(pct) / 100) as u16;
        let size = match *self {
            Dimension::ViewportHeight(pct) => scaled(pct.min(100), height),
            Dimension::ViewportWidth(pct) => scaled(pct.min(100), width),
            Dimension::Percent(pct) => scaled(pct.min(100), axis),
            Dimension::Cells(n) => n,
        };
        size.min(axis)
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, ctor): (&str, fn(u16) -> Dimension) =
            if let Some(n) = s.strip_suffix("vh") {
                (n, Dimension::ViewportHeight)
            } else if let Some(n) = s.strip_suffix("vw") {
                (n, Dimension::ViewportWidth)
            } else if let Some(n) = s.strip_suffix('%') {
                (n, Dimension::Percent)
            } else {
                (s, Dimension::Cells)
            };

        number
            .trim()
            .parse::<u16>()
            .map(ctor)
            .map_err(|_| Error::Config(format!("invalid container dimension: {:?}", s)))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::ViewportHeight(n) => write!(f, "{}vh", n),
            Dimension::ViewportWidth(n) => write!(f, "{}vw", n),
            Dimension::Percent(n) => write!(f, "{}%", n),
            Dimension::Cells(n) => write!(f, "{}", n),
        }
    }
}
