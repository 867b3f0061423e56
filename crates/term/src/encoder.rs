//! Differential subpixel encoder.
//!
//! A frame is folded into character cells of two stacked pixels, diffed against
//! the previously printed frame, and only changed cells are emitted. Each cell is
//! an upper half block whose foreground is the top pixel and whose background is
//! the bottom pixel.
//!
//! A cell pair of `(0, 0)` in the delta means "unchanged". As a consequence a
//! cell whose real colours are both 0 is never repainted once something else has
//! been shown there; scenes that need palette colour 0 should set it as the
//! background colour of a non-zero layer instead.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use log::{debug, trace};

use crate::types::{Pixel, PixelBuffer, UPPER_HALF_BLOCK};

/// A frame folded into `(top, bottom)` pixel pairs, one per character cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubpixelFrame {
    width: usize,
    rows: usize,
    top: Vec<Pixel>,
    bottom: Vec<Pixel>,
}

impl SubpixelFrame {
    /// Pair even pixel rows (top) with odd pixel rows (bottom).
    ///
    /// A trailing unpaired row is dropped.
    pub fn from_frame(frame: &PixelBuffer) -> Self {
        let width = frame.width();
        let rows = frame.height() / 2;
        let mut top = Vec::with_capacity(width * rows);
        let mut bottom = Vec::with_capacity(width * rows);
        for r in 0..rows {
            top.extend_from_slice(frame.row(2 * r));
            bottom.extend_from_slice(frame.row(2 * r + 1));
        }
        Self {
            width,
            rows,
            top,
            bottom,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of character rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn same_shape(&self, other: &SubpixelFrame) -> bool {
        self.width == other.width && self.rows == other.rows
    }

    /// `(top, bottom)` at character column `x`, row `row`.
    pub fn pair(&self, x: usize, row: usize) -> (Pixel, Pixel) {
        let i = row * self.width + x;
        (self.top[i], self.bottom[i])
    }

    /// Cells of `self` that differ from `old`; unchanged cells become `(0, 0)`.
    ///
    /// With no `old` frame every cell counts as changed.
    pub fn delta(&self, old: Option<&SubpixelFrame>) -> SubpixelFrame {
        let mut delta = self.clone();
        let Some(old) = old else {
            return delta;
        };
        for i in 0..delta.top.len() {
            if old.top[i] == self.top[i] && old.bottom[i] == self.bottom[i] {
                delta.top[i] = 0;
                delta.bottom[i] = 0;
            }
        }
        delta
    }
}

/// Turns frames into the minimal ANSI byte stream, one frame at a time.
///
/// Holds the last printed frame, so frames must be fed in display order.
#[derive(Debug)]
pub struct SubpixelEncoder {
    old: Option<SubpixelFrame>,
    buf: Vec<u8>,
}

impl Default for SubpixelEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubpixelEncoder {
    pub fn new() -> Self {
        Self {
            old: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Forget the previous frame so the next one is drawn in full.
    pub fn invalidate(&mut self) {
        self.old = None;
    }

    /// Encode `frame` against the previous one and remember it.
    pub fn encode(&mut self, frame: &PixelBuffer) -> io::Result<&[u8]> {
        let new = SubpixelFrame::from_frame(frame);

        let old = match self.old.take() {
            Some(old) if old.same_shape(&new) => Some(old),
            Some(old) => {
                debug!(
                    "encoder: resolution changed {}x{} -> {}x{}, full redraw",
                    old.width(),
                    old.rows(),
                    new.width(),
                    new.rows()
                );
                None
            }
            None => None,
        };

        let delta = new.delta(old.as_ref());
        self.old = Some(new);

        self.buf.clear();
        encode_delta_into(&delta, &mut self.buf)?;
        trace!("encoder: {} bytes for frame", self.buf.len());
        Ok(&self.buf)
    }

    /// Encode `frame` and write it to `out` in a single write, then flush.
    pub fn print<W: Write + ?Sized>(&mut self, frame: &PixelBuffer, out: &mut W) -> io::Result<()> {
        let bytes = self.encode(frame)?;
        out.write_all(bytes)?;
        out.flush()
    }
}

/// Encode the non-`(0, 0)` cells of `delta` into `out`.
///
/// A cursor move is only written at the start of a run of printed cells, and
/// colour escapes only when the colour differs from the last one written.
pub fn encode_delta_into(delta: &SubpixelFrame, out: &mut Vec<u8>) -> io::Result<()> {
    let mut last_fg: Pixel = 0;
    let mut last_bg: Pixel = 0;

    for row in 0..delta.rows() {
        let mut prev_printed = false;
        let mut row_printed = false;

        for x in 0..delta.width() {
            let (fg, bg) = delta.pair(x, row);
            if fg == 0 && bg == 0 {
                prev_printed = false;
                continue;
            }

            if !prev_printed {
                out.queue(cursor::MoveTo(to_u16(x)?, to_u16(row)?))?;
            }
            if fg != last_fg {
                out.queue(SetForegroundColor(Color::AnsiValue(fg)))?;
                last_fg = fg;
            }
            if bg != last_bg {
                out.queue(SetBackgroundColor(Color::AnsiValue(bg)))?;
                last_bg = bg;
            }
            out.queue(Print(UPPER_HALF_BLOCK))?;

            prev_printed = true;
            row_printed = true;
        }

        if row_printed {
            out.push(b'\n');
        }
    }

    Ok(())
}

fn to_u16(v: usize) -> io::Result<u16> {
    u16::try_from(v).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cell coordinate {v} exceeds terminal addressing"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test_log::test]
    fn subpixels_pair_even_and_odd_rows() {
        let frame = PixelBuffer::from_rows(&[[1, 2], [3, 4], [5, 6], [7, 8], [9, 9]]).unwrap();
        let sub = SubpixelFrame::from_frame(&frame);
        assert_eq!((sub.width(), sub.rows()), (2, 2));
        assert_eq!(sub.pair(0, 0), (1, 3));
        assert_eq!(sub.pair(1, 1), (6, 8));
    }

    #[test_log::test]
    fn single_cell_uses_exact_escape_sequences() {
        let frame = PixelBuffer::from_rows(&[[196], [21]]).unwrap();
        let mut enc = SubpixelEncoder::new();
        let out = text(enc.encode(&frame).unwrap());
        assert_eq!(out, "\x1b[1;1H\x1b[38;5;196m\x1b[48;5;21m▀\n");
    }

    #[test_log::test]
    fn contiguous_run_moves_cursor_once_and_reuses_colours() {
        let frame = PixelBuffer::from_rows(&[[5, 5, 0, 5], [6, 6, 0, 6]]).unwrap();
        let mut enc = SubpixelEncoder::new();
        let out = text(enc.encode(&frame).unwrap());
        assert_eq!(
            out,
            "\x1b[1;1H\x1b[38;5;5m\x1b[48;5;6m▀▀\x1b[1;4H▀\n"
        );
    }

    #[test_log::test]
    fn each_row_starts_with_a_cursor_move() {
        let frame = PixelBuffer::filled(1, 4, 3);
        let mut enc = SubpixelEncoder::new();
        let out = text(enc.encode(&frame).unwrap());
        assert_eq!(out, "\x1b[1;1H\x1b[38;5;3m\x1b[48;5;3m▀\n\x1b[2;1H▀\n");
    }

    #[test_log::test]
    fn unchanged_frame_encodes_to_nothing() {
        let frame = PixelBuffer::from_rows(&[[1, 2], [3, 4]]).unwrap();
        let mut enc = SubpixelEncoder::new();
        assert!(!enc.encode(&frame).unwrap().is_empty());
        assert!(enc.encode(&frame).unwrap().is_empty());
    }

    #[test_log::test]
    fn only_changed_cells_are_redrawn() {
        let a = PixelBuffer::from_rows(&[[1, 1, 1], [2, 2, 2]]).unwrap();
        let b = PixelBuffer::from_rows(&[[1, 1, 1], [2, 9, 2]]).unwrap();
        let mut enc = SubpixelEncoder::new();
        enc.encode(&a).unwrap();
        let out = text(enc.encode(&b).unwrap());
        assert_eq!(out, "\x1b[1;2H\x1b[38;5;1m\x1b[48;5;9m▀\n");
    }

    #[test_log::test]
    fn resize_forces_full_redraw() {
        let mut enc = SubpixelEncoder::new();
        enc.encode(&PixelBuffer::filled(2, 2, 4)).unwrap();

        let bigger = PixelBuffer::filled(3, 2, 4);
        let out = text(enc.encode(&bigger).unwrap());
        assert_eq!(out.matches('▀').count(), 3);
        assert!(out.starts_with("\x1b[1;1H"));
    }

    #[test_log::test]
    fn invalidate_forces_full_redraw() {
        let frame = PixelBuffer::filled(2, 2, 4);
        let mut enc = SubpixelEncoder::new();
        enc.encode(&frame).unwrap();
        enc.invalidate();
        assert_eq!(text(enc.encode(&frame).unwrap()).matches('▀').count(), 2);
    }

    #[test_log::test]
    fn zero_pairs_are_never_printed() {
        let frame = PixelBuffer::from_rows(&[[0, 0], [0, 7]]).unwrap();
        let mut enc = SubpixelEncoder::new();
        let out = text(enc.encode(&frame).unwrap());
        // The foreground stays at the initial 0, so no fg escape is written.
        assert_eq!(out, "\x1b[1;2H\x1b[48;5;7m▀\n");
    }

    #[test_log::test]
    fn print_writes_once_and_flushes() {
        let frame = PixelBuffer::filled(1, 2, 9);
        let mut enc = SubpixelEncoder::new();
        let mut sink: Vec<u8> = Vec::new();
        enc.print(&frame, &mut sink).unwrap();
        assert_eq!(text(&sink), "\x1b[1;1H\x1b[38;5;9m\x1b[48;5;9m▀\n");
    }
}
