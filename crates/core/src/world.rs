//! Entity arena and component tables.
//!
//! Entities are integer handles. Each component kind lives in its own table
//! keyed by handle; tables are ordered so iteration (and therefore draw order
//! inside a z-index) follows entity creation order.

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::component::{Component, ComponentKind, Position, Velocity};
use crate::types::{Pixel, PixelBuffer, Tilemap};

pub type EntityId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("entity {0} is not alive")]
    DeadEntity(EntityId),
    #[error("component \"{kind}\" already exists for entity {entity}")]
    ComponentExists { entity: EntityId, kind: ComponentKind },
    #[error("entity {entity} has no \"{kind}\" component")]
    MissingComponent { entity: EntityId, kind: ComponentKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct World {
    next_id: EntityId,
    entities: BTreeMap<EntityId, Entity>,
    background_colors: BTreeMap<EntityId, Pixel>,
    z_indices: BTreeMap<EntityId, i32>,
    tilemaps: BTreeMap<EntityId, Tilemap>,
    textures: BTreeMap<EntityId, PixelBuffer>,
    positions: BTreeMap<EntityId, Position>,
    velocities: BTreeMap<EntityId, Velocity>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self, name: &str) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                name: name.trim().to_string(),
            },
        );
        id
    }

    /// Remove an entity and all of its components. Returns false if it was not alive.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        if self.entities.remove(&id).is_none() {
            return false;
        }
        for kind in ComponentKind::ALL {
            self.take(id, kind);
        }
        debug!("world: destroyed entity {}", id);
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn has(&self, id: EntityId, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::BackgroundColor => self.background_colors.contains_key(&id),
            ComponentKind::ZIndex => self.z_indices.contains_key(&id),
            ComponentKind::Tilemap => self.tilemaps.contains_key(&id),
            ComponentKind::Texture => self.textures.contains_key(&id),
            ComponentKind::Position => self.positions.contains_key(&id),
            ComponentKind::Velocity => self.velocities.contains_key(&id),
        }
    }

    /// Attach a component. Fails if the entity already has one of that kind.
    pub fn add_component(&mut self, id: EntityId, component: Component) -> Result<(), WorldError> {
        self.check_alive(id)?;
        let kind = component.kind();
        if self.has(id, kind) {
            return Err(WorldError::ComponentExists { entity: id, kind });
        }
        self.put(id, component);
        Ok(())
    }

    /// Replace an existing component.
    pub fn update_component(
        &mut self,
        id: EntityId,
        component: Component,
    ) -> Result<(), WorldError> {
        self.check_alive(id)?;
        let kind = component.kind();
        if !self.has(id, kind) {
            return Err(WorldError::MissingComponent { entity: id, kind });
        }
        self.put(id, component);
        Ok(())
    }

    pub fn remove_component(
        &mut self,
        id: EntityId,
        kind: ComponentKind,
    ) -> Result<Component, WorldError> {
        self.check_alive(id)?;
        self.take(id, kind)
            .ok_or(WorldError::MissingComponent { entity: id, kind })
    }

    /// A copy of the component of `kind` on `id`.
    pub fn component(&self, id: EntityId, kind: ComponentKind) -> Result<Component, WorldError> {
        let missing = WorldError::MissingComponent { entity: id, kind };
        let component = match kind {
            ComponentKind::BackgroundColor => {
                self.background_color(id).map(Component::BackgroundColor)
            }
            ComponentKind::ZIndex => self.z_index(id).map(Component::ZIndex),
            ComponentKind::Tilemap => self.tilemap(id).cloned().map(Component::Tilemap),
            ComponentKind::Texture => self.texture(id).cloned().map(Component::Texture),
            ComponentKind::Position => self.position(id).copied().map(Component::Position),
            ComponentKind::Velocity => self.velocity(id).copied().map(Component::Velocity),
        };
        component.ok_or(missing)
    }

    fn check_alive(&self, id: EntityId) -> Result<(), WorldError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(WorldError::DeadEntity(id))
        }
    }

    fn put(&mut self, id: EntityId, component: Component) {
        match component {
            Component::BackgroundColor(c) => {
                self.background_colors.insert(id, c);
            }
            Component::ZIndex(z) => {
                self.z_indices.insert(id, z);
            }
            Component::Tilemap(t) => {
                self.tilemaps.insert(id, t);
            }
            Component::Texture(t) => {
                self.textures.insert(id, t);
            }
            Component::Position(p) => {
                self.positions.insert(id, p);
            }
            Component::Velocity(v) => {
                self.velocities.insert(id, v);
            }
        }
    }

    fn take(&mut self, id: EntityId, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::BackgroundColor => self
                .background_colors
                .remove(&id)
                .map(Component::BackgroundColor),
            ComponentKind::ZIndex => self.z_indices.remove(&id).map(Component::ZIndex),
            ComponentKind::Tilemap => self.tilemaps.remove(&id).map(Component::Tilemap),
            ComponentKind::Texture => self.textures.remove(&id).map(Component::Texture),
            ComponentKind::Position => self.positions.remove(&id).map(Component::Position),
            ComponentKind::Velocity => self.velocities.remove(&id).map(Component::Velocity),
        }
    }

    pub fn background_color(&self, id: EntityId) -> Option<Pixel> {
        self.background_colors.get(&id).copied()
    }

    pub fn z_index(&self, id: EntityId) -> Option<i32> {
        self.z_indices.get(&id).copied()
    }

    pub fn tilemap(&self, id: EntityId) -> Option<&Tilemap> {
        self.tilemaps.get(&id)
    }

    pub fn tilemap_mut(&mut self, id: EntityId) -> Option<&mut Tilemap> {
        self.tilemaps.get_mut(&id)
    }

    pub fn texture(&self, id: EntityId) -> Option<&PixelBuffer> {
        self.textures.get(&id)
    }

    pub fn position(&self, id: EntityId) -> Option<&Position> {
        self.positions.get(&id)
    }

    pub fn velocity(&self, id: EntityId) -> Option<&Velocity> {
        self.velocities.get(&id)
    }

    pub(crate) fn background_colors(&self) -> &BTreeMap<EntityId, Pixel> {
        &self.background_colors
    }

    pub(crate) fn z_indices(&self) -> &BTreeMap<EntityId, i32> {
        &self.z_indices
    }

    pub(crate) fn tilemaps(&self) -> &BTreeMap<EntityId, Tilemap> {
        &self.tilemaps
    }

    pub(crate) fn positions(&self) -> &BTreeMap<EntityId, Position> {
        &self.positions
    }

    /// Positions and velocities of every entity that has both.
    pub(crate) fn motion_mut(&mut self) -> impl Iterator<Item = (&mut Position, &Velocity)> + '_ {
        let velocities = &self.velocities;
        self.positions
            .iter_mut()
            .filter_map(move |(id, p)| velocities.get(id).map(|v| (p, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_lifecycle() {
        let mut world = World::new();
        let a = world.create_entity("  hero ");
        let b = world.create_entity("");
        assert_ne!(a, b);
        assert!(world.is_alive(a));
        assert_eq!(world.entity(a).unwrap().name, "hero");
        assert_eq!(world.len(), 2);

        assert!(world.destroy_entity(a));
        assert!(!world.destroy_entity(a));
        assert!(!world.is_alive(a));
        assert_eq!(world.entities().map(|e| e.id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut world = World::new();
        let a = world.create_entity("a");
        world.destroy_entity(a);
        let b = world.create_entity("b");
        assert_ne!(a, b);
    }

    #[test]
    fn add_rejects_duplicates_and_dead_entities() {
        let mut world = World::new();
        let e = world.create_entity("e");
        world.add_component(e, Component::ZIndex(2)).unwrap();
        assert_eq!(
            world.add_component(e, Component::ZIndex(3)).unwrap_err(),
            WorldError::ComponentExists {
                entity: e,
                kind: ComponentKind::ZIndex
            }
        );
        assert_eq!(
            world.add_component(99, Component::ZIndex(1)).unwrap_err(),
            WorldError::DeadEntity(99)
        );
    }

    #[test]
    fn update_and_remove_require_existing_component() {
        let mut world = World::new();
        let e = world.create_entity("e");
        let err = world
            .update_component(e, Component::Position(Position::new(1.0, 1.0)))
            .unwrap_err();
        assert_eq!(
            err,
            WorldError::MissingComponent {
                entity: e,
                kind: ComponentKind::Position
            }
        );

        world
            .add_component(e, Component::Position(Position::new(0.0, 0.0)))
            .unwrap();
        world
            .update_component(e, Component::Position(Position::new(4.0, 5.0)))
            .unwrap();
        assert_eq!(world.position(e), Some(&Position::new(4.0, 5.0)));

        let removed = world.remove_component(e, ComponentKind::Position).unwrap();
        assert_eq!(removed, Component::Position(Position::new(4.0, 5.0)));
        assert!(world.remove_component(e, ComponentKind::Position).is_err());
    }

    #[test]
    fn destroying_entity_clears_its_components() {
        let mut world = World::new();
        let e = world.create_entity("e");
        world
            .add_component(e, Component::Texture(PixelBuffer::filled(1, 1, 3)))
            .unwrap();
        world.add_component(e, Component::BackgroundColor(4)).unwrap();
        world.destroy_entity(e);
        for kind in ComponentKind::ALL {
            assert!(!world.has(e, kind));
        }
    }

    #[test]
    fn component_returns_tagged_copy() {
        let mut world = World::new();
        let e = world.create_entity("e");
        world.add_component(e, Component::BackgroundColor(17)).unwrap();
        assert_eq!(
            world.component(e, ComponentKind::BackgroundColor).unwrap(),
            Component::BackgroundColor(17)
        );
        assert!(world.component(e, ComponentKind::Tilemap).is_err());
    }
}
