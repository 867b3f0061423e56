//! Tilemap expansion with wraparound scrolling.
//!
//! The visible area is produced in tile space first (roll, repeat, crop), then
//! expanded to pixels, then shifted by the sub-tile remainder of the scroll
//! position and cropped to the viewport.

use crate::atlas::TileAtlas;
use crate::error::RenderError;
use crate::types::{PixelBuffer, TileId, Tilemap, Viewport};

/// Renders a [`Tilemap`] through a [`TileAtlas`].
///
/// Keeps a scratch tile grid between calls so steady-state rendering does not
/// reallocate it.
#[derive(Debug, Default)]
pub struct TileCompositor {
    grid: Vec<(TileId, usize, usize)>,
}

impl TileCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `tilemap` at its own scroll position.
    pub fn render(
        &mut self,
        tilemap: &Tilemap,
        atlas: &TileAtlas,
        viewport: Viewport,
    ) -> Result<PixelBuffer, RenderError> {
        self.render_at(tilemap, atlas, tilemap.position(), viewport)
    }

    /// Render `tilemap` as if scrolled to `(pos_x, pos_y)` pixels.
    pub fn render_at(
        &mut self,
        tilemap: &Tilemap,
        atlas: &TileAtlas,
        (pos_x, pos_y): (i64, i64),
        viewport: Viewport,
    ) -> Result<PixelBuffer, RenderError> {
        let d = tilemap.tile_dimension();
        if d != atlas.tile_dimension() {
            return Err(RenderError::InvalidTilemap(format!(
                "tilemap uses {d}px tiles but the atlas holds {}px tiles",
                atlas.tile_dimension()
            )));
        }
        if viewport.is_empty() {
            return Ok(PixelBuffer::new(viewport.width, viewport.height));
        }

        let (roll_x, rem_x) = split_scroll(pos_x, d, tilemap.cols());
        let (roll_y, rem_y) = split_scroll(pos_y, d, tilemap.rows());

        // Tiles needed to cover the viewport once shifted by the remainder.
        let tiles_w = (viewport.width + rem_x).div_ceil(d);
        let tiles_h = (viewport.height + rem_y).div_ceil(d);

        self.fill_grid(tilemap, roll_x, roll_y, tiles_w, tiles_h);
        let expanded = self.expand(atlas, d, tiles_w, tiles_h)?;

        Ok(expanded.crop(rem_x, rem_y, viewport.width, viewport.height))
    }

    /// Roll the reference grid so the view origin is top-left, then repeat it
    /// until it covers `tiles_w x tiles_h`.
    fn fill_grid(
        &mut self,
        tilemap: &Tilemap,
        roll_x: usize,
        roll_y: usize,
        tiles_w: usize,
        tiles_h: usize,
    ) {
        let (cols, rows) = (tilemap.cols(), tilemap.rows());
        let ids = tilemap.ids();

        self.grid.clear();
        self.grid.reserve(tiles_w * tiles_h);
        for r in 0..tiles_h {
            let src_row = (r + roll_y) % rows;
            for c in 0..tiles_w {
                let src_col = (c + roll_x) % cols;
                self.grid.push((ids[src_row * cols + src_col], src_col, src_row));
            }
        }
    }

    fn expand(
        &self,
        atlas: &TileAtlas,
        d: usize,
        tiles_w: usize,
        tiles_h: usize,
    ) -> Result<PixelBuffer, RenderError> {
        let mut out = PixelBuffer::new(tiles_w * d, tiles_h * d);
        for (i, &(id, col, row)) in self.grid.iter().enumerate() {
            let texture = atlas
                .texture(id)
                .ok_or(RenderError::UnknownTileId { id, col, row })?;
            let (tx, ty) = ((i % tiles_w) * d, (i / tiles_w) * d);
            for dy in 0..d {
                out.row_mut(ty + dy)[tx..tx + d].copy_from_slice(texture.row(dy));
            }
        }
        Ok(out)
    }
}

/// Split a pixel scroll position into a tile roll and a pixel remainder.
fn split_scroll(pos: i64, d: usize, tiles: usize) -> (usize, usize) {
    let d = d as i64;
    let roll = pos.div_euclid(d).rem_euclid(tiles as i64) as usize;
    let rem = pos.rem_euclid(d) as usize;
    (roll, rem)
}
