//! Effective render window from terminal size and a requested window.
//!
//! The terminal is sampled every frame because it can be resized at any time.
//! Sizes coming out of here are in pixels: one terminal row is two pixel rows.

use std::io;

use crate::types::{Viewport, PADDING_COLS, PADDING_ROWS};

/// Source of the current terminal size as `(rows, columns)`.
pub trait TerminalSize {
    fn size(&self) -> io::Result<(u16, u16)>;
}

/// Queries the controlling terminal through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermSize;

impl TerminalSize for CrosstermSize {
    fn size(&self) -> io::Result<(u16, u16)> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok((rows, cols))
    }
}

/// A terminal that never changes size. Used for headless runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSize {
    pub rows: u16,
    pub cols: u16,
}

impl FixedSize {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

impl TerminalSize for FixedSize {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.rows, self.cols))
    }
}

/// Clamps a requested window to the terminal and forces an even height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionsResolver {
    /// `None` means fullscreen.
    requested: Option<Viewport>,
    padding_rows: u16,
    padding_cols: u16,
}

impl Default for DimensionsResolver {
    fn default() -> Self {
        Self::fullscreen()
    }
}

impl DimensionsResolver {
    /// A window of `height x width` pixels. Either value being 0 selects fullscreen.
    pub fn new(height: usize, width: usize) -> Self {
        let requested = (height > 0 && width > 0).then(|| Viewport::new(width, height));
        Self {
            requested,
            padding_rows: PADDING_ROWS,
            padding_cols: PADDING_COLS,
        }
    }

    pub fn fullscreen() -> Self {
        Self::new(0, 0)
    }

    pub fn with_padding(mut self, rows: u16, cols: u16) -> Self {
        self.padding_rows = rows;
        self.padding_cols = cols;
        self
    }

    pub fn requested(&self) -> Option<Viewport> {
        self.requested
    }

    /// Effective window for a terminal of `rows x cols` character cells.
    pub fn resolve(&self, rows: u16, cols: u16) -> Viewport {
        let usable_h = rows.saturating_sub(self.padding_rows) as usize * 2;
        let usable_w = cols.saturating_sub(self.padding_cols) as usize;

        let (mut height, width) = match self.requested {
            Some(req) => (req.height.min(usable_h), req.width.min(usable_w)),
            None => (usable_h, usable_w),
        };

        // The last pixel row would have no partner in its character cell.
        if height % 2 != 0 {
            height -= 1;
        }

        Viewport::new(width, height)
    }

    /// Sample `source` and resolve against it.
    pub fn resolve_from<S: TerminalSize + ?Sized>(&self, source: &S) -> io::Result<Viewport> {
        let (rows, cols) = source.size()?;
        Ok(self.resolve(rows, cols))
    }
}
