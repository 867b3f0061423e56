//! Layer compositor: rasterizes each z-index into a subframe and merges them.
//!
//! Merging is transparency substitution, not blending: walking from the highest
//! z-index down, a cell keeps the first non-zero value it receives. Cells that
//! are still zero afterwards take the background colour.

use std::collections::BTreeMap;

use log::trace;

use crate::atlas::TileAtlas;
use crate::error::RenderError;
use crate::tiles::TileCompositor;
use crate::types::{LayerSet, Pixel, PixelBuffer, Placement, Viewport, TRANSPARENT};

/// Z-index owned by the tilemap.
pub const TILEMAP_Z_INDEX: i32 = 0;

#[derive(Debug, Default)]
pub struct LayerCompositor {
    tiles: TileCompositor,
}

impl LayerCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose `layers` into one frame of `viewport` size.
    pub fn render(
        &mut self,
        layers: &LayerSet<'_>,
        atlas: &TileAtlas,
        background: Pixel,
        viewport: Viewport,
    ) -> Result<PixelBuffer, RenderError> {
        if layers.is_empty() {
            return Err(RenderError::NoLayers);
        }

        let mut subframes: BTreeMap<i32, PixelBuffer> = BTreeMap::new();

        if let Some(tilemap) = layers.tilemap() {
            let placements = layers.layer(TILEMAP_Z_INDEX).len();
            if placements > 0 {
                return Err(RenderError::ReservedLayer { placements });
            }
            let subframe = self.tiles.render(tilemap, atlas, viewport)?;
            subframes.insert(TILEMAP_Z_INDEX, subframe);
        }

        for (z_index, placements) in layers.layers() {
            let mut subframe = PixelBuffer::new(viewport.width, viewport.height);
            for placement in placements {
                blit(&mut subframe, placement);
            }
            subframes.insert(z_index, subframe);
        }

        let mut merged = PixelBuffer::new(viewport.width, viewport.height);
        for (z_index, subframe) in subframes.iter().rev() {
            trace!("compositor: merging z-index {}", z_index);
            merge_under(&mut merged, subframe);
        }

        apply_background(&mut merged, background);
        Ok(merged)
    }
}

/// Copy `placement` into `dst`, clipped on all four edges.
///
/// Transparent texels are copied too, so overlapping placements in one layer
/// follow write order.
pub fn blit(dst: &mut PixelBuffer, placement: &Placement<'_>) {
    let tex = placement.texture;
    let (x, y) = (placement.x as i64, placement.y as i64);

    let src_x = (-x).max(0) as usize;
    let src_y = (-y).max(0) as usize;
    let dst_x = x.max(0) as usize;
    let dst_y = y.max(0) as usize;

    if src_x >= tex.width()
        || src_y >= tex.height()
        || dst_x >= dst.width()
        || dst_y >= dst.height()
    {
        return;
    }

    let w = (tex.width() - src_x).min(dst.width() - dst_x);
    let h = (tex.height() - src_y).min(dst.height() - dst_y);
    for dy in 0..h {
        dst.row_mut(dst_y + dy)[dst_x..dst_x + w]
            .copy_from_slice(&tex.row(src_y + dy)[src_x..src_x + w]);
    }
}

/// Fill the transparent cells of `merged` from `lower`.
pub fn merge_under(merged: &mut PixelBuffer, lower: &PixelBuffer) {
    for (m, &l) in merged.pixels_mut().iter_mut().zip(lower.pixels()) {
        if *m == TRANSPARENT {
            *m = l;
        }
    }
}

/// Replace every remaining transparent cell with `background`.
pub fn apply_background(frame: &mut PixelBuffer, background: Pixel) {
    if background == TRANSPARENT {
        return;
    }
    for p in frame.pixels_mut() {
        if *p == TRANSPARENT {
            *p = background;
        }
    }
}
