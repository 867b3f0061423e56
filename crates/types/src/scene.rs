//! Scene description handed from the world to the compositor.

use std::collections::BTreeMap;

use crate::buffer::{BufferError, PixelBuffer};

/// Index into a tile atlas.
pub type TileId = u8;

/// Grid of tile IDs plus its pixel-space scroll position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    cols: usize,
    rows: usize,
    ids: Vec<TileId>,
    tile_dimension: usize,
    pos_x: i64,
    pos_y: i64,
}

impl Tilemap {
    pub fn new<R: AsRef<[TileId]>>(rows: &[R], tile_dimension: usize) -> Result<Self, BufferError> {
        if tile_dimension == 0 {
            return Err(BufferError::InvalidTileDimension);
        }
        let grid = PixelBuffer::from_rows(rows)?;
        if grid.is_empty() {
            return Err(BufferError::EmptyTilemap);
        }
        Ok(Self {
            cols: grid.width(),
            rows: grid.height(),
            ids: grid.pixels().to_vec(),
            tile_dimension,
            pos_x: 0,
            pos_y: 0,
        })
    }

    /// Width of the grid in tiles.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Height of the grid in tiles.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_dimension(&self) -> usize {
        self.tile_dimension
    }

    pub fn get(&self, col: usize, row: usize) -> Option<TileId> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.ids[row * self.cols + col])
    }

    pub fn set(&mut self, col: usize, row: usize, id: TileId) {
        if col < self.cols && row < self.rows {
            self.ids[row * self.cols + col] = id;
        }
    }

    pub fn ids(&self) -> &[TileId] {
        &self.ids
    }

    /// Scroll position in pixels, `(x, y)`.
    pub fn position(&self) -> (i64, i64) {
        (self.pos_x, self.pos_y)
    }

    pub fn scroll_to(&mut self, x: i64, y: i64) {
        self.pos_x = x;
        self.pos_y = y;
    }

    pub fn scroll_by(&mut self, dx: i64, dy: i64) {
        self.pos_x = self.pos_x.wrapping_add(dx);
        self.pos_y = self.pos_y.wrapping_add(dy);
    }
}

/// A texture placed with its top-left corner at `(x, y)` in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub x: i32,
    pub y: i32,
    pub texture: &'a PixelBuffer,
}

impl<'a> Placement<'a> {
    pub fn new(x: i32, y: i32, texture: &'a PixelBuffer) -> Self {
        Self { x, y, texture }
    }
}

/// Renderable items grouped by z-index.
///
/// Placements inside one z-index are drawn in insertion order. The tilemap, if
/// any, owns z-index 0.
#[derive(Debug, Clone, Default)]
pub struct LayerSet<'a> {
    layers: BTreeMap<i32, Vec<Placement<'a>>>,
    tilemap: Option<&'a Tilemap>,
}

impl<'a> LayerSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, z_index: i32, placement: Placement<'a>) {
        self.layers.entry(z_index).or_default().push(placement);
    }

    pub fn set_tilemap(&mut self, tilemap: &'a Tilemap) {
        self.tilemap = Some(tilemap);
    }

    pub fn tilemap(&self) -> Option<&'a Tilemap> {
        self.tilemap
    }

    /// True when there is neither a tilemap nor any placement layer.
    pub fn is_empty(&self) -> bool {
        self.tilemap.is_none() && self.layers.is_empty()
    }

    /// Z-indices that hold placements, ascending.
    pub fn z_indices(&self) -> impl Iterator<Item = i32> + '_ {
        self.layers.keys().copied()
    }

    pub fn layer(&self, z_index: i32) -> &[Placement<'a>] {
        self.layers.get(&z_index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn layers(&self) -> impl Iterator<Item = (i32, &[Placement<'a>])> + '_ {
        self.layers.iter().map(|(z, items)| (*z, items.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilemap_rejects_zero_dimension_and_empty_grid() {
        assert_eq!(
            Tilemap::new(&[vec![1u8]], 0).unwrap_err(),
            BufferError::InvalidTileDimension
        );
        let empty: [Vec<TileId>; 0] = [];
        assert_eq!(Tilemap::new(&empty, 4).unwrap_err(), BufferError::EmptyTilemap);
        assert_eq!(
            Tilemap::new(&[Vec::<TileId>::new()], 4).unwrap_err(),
            BufferError::EmptyTilemap
        );
    }

    #[test]
    fn tilemap_indexes_by_column_then_row() {
        let mut map = Tilemap::new(&[[1, 2, 3], [4, 5, 6]], 8).unwrap();
        assert_eq!((map.cols(), map.rows()), (3, 2));
        assert_eq!(map.get(2, 0), Some(3));
        assert_eq!(map.get(0, 1), Some(4));
        map.set(1, 1, 9);
        assert_eq!(map.get(1, 1), Some(9));
        assert_eq!(map.get(3, 0), None);
    }

    #[test]
    fn scrolling_accumulates() {
        let mut map = Tilemap::new(&[[0]], 4).unwrap();
        map.scroll_by(3, -2);
        map.scroll_by(1, 1);
        assert_eq!(map.position(), (4, -1));
        map.scroll_to(0, 0);
        assert_eq!(map.position(), (0, 0));
    }

    #[test]
    fn layer_set_groups_by_z_index_in_insertion_order() {
        let a = PixelBuffer::filled(1, 1, 1);
        let b = PixelBuffer::filled(1, 1, 2);
        let mut set = LayerSet::new();
        assert!(set.is_empty());

        set.push(5, Placement::new(0, 0, &a));
        set.push(-1, Placement::new(0, 0, &b));
        set.push(5, Placement::new(1, 0, &b));

        assert_eq!(set.z_indices().collect::<Vec<_>>(), vec![-1, 5]);
        let top = set.layer(5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].texture.get(0, 0), Some(1));
        assert_eq!(top[1].x, 1);
        assert!(set.layer(3).is_empty());
    }
}
