use thiserror::Error;

use crate::types::TileId;

/// Errors raised while composing a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no layers to render")]
    NoLayers,
    #[error("tile id {id} at tilemap column {col}, row {row} is not in the atlas")]
    UnknownTileId { id: TileId, col: usize, row: usize },
    #[error("invalid tilemap: {0}")]
    InvalidTilemap(String),
    #[error("z-index 0 is reserved for the tilemap but holds {placements} placement(s)")]
    ReservedLayer { placements: usize },
}

/// Errors raised while registering or looking up tiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    #[error("tile dimension must be a positive integer")]
    InvalidTileDimension,
    #[error("tile id {0} is out of bounds (must be between 0 and 255)")]
    TileIdOutOfBounds(u16),
    #[error("tile id {0} is already registered")]
    DuplicateTileId(TileId),
    #[error("tile name \"{name}\" for tile id {id} is already registered")]
    DuplicateName { name: String, id: TileId },
    #[error("texture for tile id {id} is {width}x{height}, expected {expected}x{expected}")]
    TextureShape {
        id: TileId,
        expected: usize,
        width: usize,
        height: usize,
    },
    #[error("no tile named \"{0}\"")]
    UnknownName(String),
}
