//! Asset import: textures, tilemaps, and tileset manifests.
//!
//! Textures and tilemaps are stored as nested integer arrays (`.nyx` files),
//! for example `[[0, 12, 12], [12, 0, 12]]`. Values must fit in a byte; anything
//! else is rejected with the offending file named in the error.
//!
//! A tileset manifest is JSON:
//!
//! ```json
//! {
//!   "tile_dimension": 2,
//!   "tiles": [
//!     { "id": 1, "name": "grass", "texture": [[34, 34], [28, 34]] },
//!     { "name": "water", "texture": "water.nyx" }
//!   ]
//! }
//! ```
//!
//! String textures are paths relative to the manifest. Without
//! `tile_dimension` the manifest describes 16x16 tiles.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nyx_term::{AtlasError, TileAtlas};
use nyx_types::{BufferError, Pixel, PixelBuffer, TileId, Tilemap, DEFAULT_TILE_DIMENSION};

pub use nyx_types as types;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid texture in {origin}: {source}")]
    Texture {
        origin: String,
        #[source]
        source: BufferError,
    },
    #[error("tile {tile} in {origin}: {source}")]
    Atlas {
        origin: String,
        tile: String,
        #[source]
        source: AtlasError,
    },
}

/// One entry of a tileset manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
    pub texture: TextureSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureSource {
    Inline(Vec<Vec<Pixel>>),
    File(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetManifest {
    #[serde(default = "default_tile_dimension")]
    pub tile_dimension: usize,
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
}

fn default_tile_dimension() -> usize {
    DEFAULT_TILE_DIMENSION
}

fn read(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_rows<T>(text: &str, origin: &str) -> Result<Vec<Vec<T>>, AssetError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(text).map_err(|source| AssetError::Parse {
        origin: origin.to_string(),
        source,
    })
}

fn texture_from_rows(rows: &[Vec<Pixel>], origin: &str) -> Result<PixelBuffer, AssetError> {
    PixelBuffer::from_rows(rows).map_err(|source| AssetError::Texture {
        origin: origin.to_string(),
        source,
    })
}

/// Parse a texture from `.nyx` text. `origin` names the source in errors.
pub fn parse_texture(text: &str, origin: &str) -> Result<PixelBuffer, AssetError> {
    let rows: Vec<Vec<Pixel>> = parse_rows(text, origin)?;
    texture_from_rows(&rows, origin)
}

pub fn load_texture(path: impl AsRef<Path>) -> Result<PixelBuffer, AssetError> {
    let path = path.as_ref();
    parse_texture(&read(path)?, &path.display().to_string())
}

/// Parse a tilemap (grid of tile IDs) from `.nyx` text.
pub fn parse_tilemap(
    text: &str,
    tile_dimension: usize,
    origin: &str,
) -> Result<Tilemap, AssetError> {
    let rows: Vec<Vec<TileId>> = parse_rows(text, origin)?;
    Tilemap::new(&rows, tile_dimension).map_err(|source| AssetError::Texture {
        origin: origin.to_string(),
        source,
    })
}

pub fn load_tilemap(path: impl AsRef<Path>, tile_dimension: usize) -> Result<Tilemap, AssetError> {
    let path = path.as_ref();
    parse_tilemap(&read(path)?, tile_dimension, &path.display().to_string())
}

/// Build an atlas from manifest text. File textures resolve against `base_dir`.
pub fn parse_tileset(text: &str, base_dir: &Path, origin: &str) -> Result<TileAtlas, AssetError> {
    let manifest: TilesetManifest =
        serde_json::from_str(text).map_err(|source| AssetError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    build_atlas(&manifest, base_dir, origin)
}

pub fn load_tileset(path: impl AsRef<Path>) -> Result<TileAtlas, AssetError> {
    let path = path.as_ref();
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_tileset(&read(path)?, base_dir, &path.display().to_string())
}

pub fn build_atlas(
    manifest: &TilesetManifest,
    base_dir: &Path,
    origin: &str,
) -> Result<TileAtlas, AssetError> {
    let atlas_err = |tile: String, source: AtlasError| AssetError::Atlas {
        origin: origin.to_string(),
        tile,
        source,
    };

    let mut atlas = TileAtlas::new(manifest.tile_dimension)
        .map_err(|source| atlas_err("<manifest>".to_string(), source))?;

    for (i, entry) in manifest.tiles.iter().enumerate() {
        let label = entry
            .name
            .clone()
            .or_else(|| entry.id.map(|id| id.to_string()))
            .unwrap_or_else(|| format!("#{i}"));

        let texture = match &entry.texture {
            TextureSource::Inline(rows) => texture_from_rows(rows, origin)?,
            TextureSource::File(file) => load_texture(base_dir.join(file))?,
        };

        atlas
            .create_tile(texture, entry.id, entry.name.as_deref(), entry.overwrite)
            .map_err(|source| atlas_err(label, source))?;
    }

    debug!("assets: loaded {} tiles from {}", atlas.len(), origin);
    Ok(atlas)
}
