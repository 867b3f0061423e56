//! Shared data types for the nyx rendering pipeline.
//!
//! Everything here is plain data: pixel buffers, tilemaps, and the z-indexed
//! layer set that the compositor consumes. None of it touches the terminal,
//! which keeps the types usable from the ECS, the asset loader, and tests alike.
//!
//! # Pixels
//!
//! A pixel is one ANSI 256-palette index (`u8`). Inside a compositing layer the
//! value [`TRANSPARENT`] (0) means "see through to the layer below"; on the fully
//! resolved frame it is just another colour.
//!
//! # Subpixels
//!
//! Every printed terminal row carries two pixel rows, drawn with
//! [`UPPER_HALF_BLOCK`]: the top pixel as the foreground colour and the bottom
//! pixel as the background colour. Render heights are therefore always even.
//!
//! # Examples
//!
//! ```
//! use nyx_types::{LayerSet, Placement, PixelBuffer, Tilemap};
//!
//! let sprite = PixelBuffer::filled(2, 2, 7);
//! let map = Tilemap::new(&[vec![1, 2], vec![3, 4]], 2).unwrap();
//!
//! let mut layers = LayerSet::new();
//! layers.set_tilemap(&map);
//! layers.push(3, Placement::new(1, 1, &sprite));
//! assert_eq!(layers.z_indices().collect::<Vec<_>>(), vec![3]);
//! assert!(layers.tilemap().is_some());
//! ```

pub mod buffer;
pub mod scene;

pub use buffer::{BufferError, Pixel, PixelBuffer};
pub use scene::{LayerSet, Placement, TileId, Tilemap};

/// Pixel value meaning "unset" inside a compositing layer.
pub const TRANSPARENT: Pixel = 0;

/// Glyph used for every filled character cell (U+2580 UPPER HALF BLOCK).
pub const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Terminal rows kept free below the frame so output never scrolls the screen.
pub const PADDING_ROWS: u16 = 4;

/// Terminal columns kept free to the right of the frame so lines never wrap.
pub const PADDING_COLS: u16 = 2;

/// Side length of a tile when a tilemap does not say otherwise.
pub const DEFAULT_TILE_DIMENSION: usize = 16;

/// Highest tile ID an atlas can hold.
pub const MAX_TILE_ID: u16 = 255;

/// Fixed simulation rate of the engine loop.
pub const DEFAULT_UPDATES_PER_SEC: u32 = 60;

/// Distance past the right/bottom frame edge before an entity is culled.
pub const DEFAULT_CULL_MARGIN: i32 = 10;

/// Pixel dimensions of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of printed terminal rows this viewport occupies.
    pub fn text_rows(&self) -> usize {
        self.height / 2
    }
}
