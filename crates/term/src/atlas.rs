//! Tile atlas: tile ID (and optional friendly name) to texture.

use std::collections::HashMap;

use log::debug;

use crate::error::AtlasError;
use crate::types::{PixelBuffer, TileId, MAX_TILE_ID};

const SLOTS: usize = MAX_TILE_ID as usize + 1;

/// Registry of square tile textures, all `tile_dimension` pixels on a side.
#[derive(Debug, Clone)]
pub struct TileAtlas {
    tile_dimension: usize,
    textures: Vec<Option<PixelBuffer>>,
    names: HashMap<String, TileId>,
    next_id: u16,
}

impl TileAtlas {
    pub fn new(tile_dimension: usize) -> Result<Self, AtlasError> {
        if tile_dimension == 0 {
            return Err(AtlasError::InvalidTileDimension);
        }
        Ok(Self {
            tile_dimension,
            textures: vec![None; SLOTS],
            names: HashMap::new(),
            next_id: 0,
        })
    }

    pub fn tile_dimension(&self) -> usize {
        self.tile_dimension
    }

    /// Register `texture` and return the ID it was stored under.
    ///
    /// With `id = None` the next free ID is assigned. Without a name the tile is
    /// called `untitled-{id}`. An existing ID or name is only replaced when
    /// `overwrite` is set.
    pub fn create_tile(
        &mut self,
        texture: PixelBuffer,
        id: Option<u16>,
        name: Option<&str>,
        overwrite: bool,
    ) -> Result<TileId, AtlasError> {
        let id = self.validate_id(id, overwrite)?;
        let name = self.validate_name(id, name, overwrite)?;

        let d = self.tile_dimension;
        if texture.width() != d || texture.height() != d {
            return Err(AtlasError::TextureShape {
                id,
                expected: d,
                width: texture.width(),
                height: texture.height(),
            });
        }

        debug!("atlas: registered tile {} as \"{}\"", id, name);
        self.textures[id as usize] = Some(texture);
        // An overwritten tile answers only to its new name.
        self.names.retain(|_, v| *v != id);
        self.names.insert(name, id);
        if id as u16 >= self.next_id {
            self.next_id = id as u16 + 1;
        }
        Ok(id)
    }

    fn validate_id(&self, id: Option<u16>, overwrite: bool) -> Result<TileId, AtlasError> {
        match id {
            Some(id) if id > MAX_TILE_ID => Err(AtlasError::TileIdOutOfBounds(id)),
            Some(id) => {
                let id = id as TileId;
                if !overwrite && self.contains(id) {
                    return Err(AtlasError::DuplicateTileId(id));
                }
                Ok(id)
            }
            None => {
                let mut next = self.next_id;
                while next <= MAX_TILE_ID && self.contains(next as TileId) {
                    next += 1;
                }
                if next > MAX_TILE_ID {
                    return Err(AtlasError::TileIdOutOfBounds(next));
                }
                Ok(next as TileId)
            }
        }
    }

    fn validate_name(
        &self,
        id: TileId,
        name: Option<&str>,
        overwrite: bool,
    ) -> Result<String, AtlasError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => {
                if !overwrite && self.names.contains_key(name) {
                    return Err(AtlasError::DuplicateName {
                        name: name.to_string(),
                        id,
                    });
                }
                Ok(name.to_string())
            }
            None => Ok(format!("untitled-{id}")),
        }
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.textures[id as usize].is_some()
    }

    pub fn texture(&self, id: TileId) -> Option<&PixelBuffer> {
        self.textures[id as usize].as_ref()
    }

    pub fn id_of(&self, name: &str) -> Result<TileId, AtlasError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| AtlasError::UnknownName(name.to_string()))
    }

    pub fn texture_by_name(&self, name: &str) -> Result<&PixelBuffer, AtlasError> {
        let id = self.id_of(name)?;
        self.texture(id)
            .ok_or_else(|| AtlasError::UnknownName(name.to_string()))
    }

    /// Remove a tile and every name that refers to it.
    pub fn remove(&mut self, id: TileId) -> Option<PixelBuffer> {
        let texture = self.textures[id as usize].take()?;
        self.names.retain(|_, v| *v != id);
        Some(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered IDs, ascending.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.textures
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_some())
            .map(|(i, _)| i as TileId)
    }
}
