//! Row-major pixel buffers.

use thiserror::Error;

/// One ANSI 256-palette colour index.
pub type Pixel = u8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("tilemap must contain at least one tile on each axis")]
    EmptyTilemap,
    #[error("tile dimension must be a positive integer")]
    InvalidTileDimension,
}

/// 2D grid of pixels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// A transparent (all-zero) buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    /// Build a buffer from rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[Pixel]>>(rows: &[R]) -> Result<Self, BufferError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut pixels = Vec::with_capacity(width * height);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(BufferError::Ragged {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            pixels.extend_from_slice(r);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: Pixel) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = value;
        }
    }

    pub fn row(&self, y: usize) -> &[Pixel] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        let w = self.width;
        &mut self.pixels[y * w..(y + 1) * w]
    }

    /// Copy out the `width x height` window whose top-left corner is `(x, y)`.
    ///
    /// The window is clamped to the buffer, so the result may be smaller than
    /// requested.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> PixelBuffer {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);

        let mut out = PixelBuffer::new(width, height);
        for dy in 0..height {
            out.row_mut(dy)
                .copy_from_slice(&self.row(y + dy)[x..x + width]);
        }
        out
    }

    pub fn to_rows(&self) -> Vec<Vec<Pixel>> {
        (0..self.height).map(|y| self.row(y).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = PixelBuffer::from_rows(&[vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert_eq!(
            err,
            BufferError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn get_and_set_ignore_out_of_bounds() {
        let mut buf = PixelBuffer::new(3, 2);
        buf.set(2, 1, 9);
        buf.set(3, 0, 9);
        buf.set(0, 2, 9);
        assert_eq!(buf.get(2, 1), Some(9));
        assert_eq!(buf.get(3, 0), None);
        assert_eq!(buf.pixels().iter().filter(|&&p| p == 9).count(), 1);
    }

    #[test]
    fn crop_clamps_to_source() {
        let buf = PixelBuffer::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap();
        assert_eq!(buf.crop(1, 1, 2, 2).to_rows(), vec![vec![5, 6], vec![8, 9]]);
        assert_eq!(buf.crop(2, 0, 5, 5).to_rows(), vec![vec![3], vec![6], vec![9]]);
        assert!(buf.crop(3, 3, 1, 1).is_empty());
    }
}
