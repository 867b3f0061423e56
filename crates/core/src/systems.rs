//! Systems that run over the world between frames.

use log::{debug, warn};

use crate::types::{LayerSet, Pixel, Placement, Viewport};
use crate::world::{EntityId, World};

/// Something that updates the world once per simulation step.
pub trait System {
    fn update(&mut self, world: &mut World, dt: f64);
}

/// Integrates velocity into position.
#[derive(Debug, Default, Clone, Copy)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn update(&mut self, world: &mut World, dt: f64) {
        apply_velocity(world, dt);
    }
}

/// `position += velocity * dt` for every entity that has both.
pub fn apply_velocity(world: &mut World, dt: f64) {
    for (position, velocity) in world.motion_mut() {
        position.x += velocity.x * dt;
        position.y += velocity.y * dt;
    }
}

/// What the world wants drawn this frame.
#[derive(Debug, Default)]
pub struct Scene<'a> {
    pub layers: LayerSet<'a>,
    pub background: Pixel,
}

/// Gather every renderable entity into a layer set.
///
/// Entities with a z-index, a position, and a texture become placements. The
/// first tilemap entity supplies the z-index 0 tilemap and the first background
/// colour entity supplies the background.
pub fn collect_scene(world: &World) -> Scene<'_> {
    let mut scene = Scene::default();

    for (&id, &z_index) in world.z_indices() {
        let (Some(position), Some(texture)) = (world.position(id), world.texture(id)) else {
            continue;
        };
        let (x, y) = position.render_xy();
        scene.layers.push(z_index, Placement::new(x, y, texture));
    }

    let mut tilemaps = world.tilemaps().iter();
    if let Some((&id, tilemap)) = tilemaps.next() {
        scene.layers.set_tilemap(tilemap);
        if tilemaps.next().is_some() {
            warn!("scene: several tilemap entities, rendering entity {}", id);
        }
    }

    let mut backgrounds = world.background_colors().iter();
    if let Some((&id, &color)) = backgrounds.next() {
        scene.background = color;
        if backgrounds.next().is_some() {
            warn!("scene: several background colours, using entity {}", id);
        }
    }

    scene
}

/// Destroy entities whose render position is `margin` pixels or more past the
/// right or bottom edge of `viewport`. Returns the destroyed IDs.
pub fn cull_out_of_bounds(world: &mut World, viewport: Viewport, margin: i32) -> Vec<EntityId> {
    let max_x = viewport.width as i64 + margin as i64;
    let max_y = viewport.height as i64 + margin as i64;

    let doomed: Vec<EntityId> = world
        .positions()
        .iter()
        .filter(|(_, p)| {
            let (x, y) = p.render_xy();
            x as i64 >= max_x || y as i64 >= max_y
        })
        .map(|(&id, _)| id)
        .collect();

    for &id in &doomed {
        world.destroy_entity(id);
    }
    if !doomed.is_empty() {
        debug!("cull: removed {} entities", doomed.len());
    }
    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Position, Velocity};
    use crate::types::{PixelBuffer, Tilemap};

    fn sprite(world: &mut World, z: i32, x: f64, y: f64, color: u8) -> EntityId {
        let e = world.create_entity("sprite");
        world.add_component(e, Component::ZIndex(z)).unwrap();
        world
            .add_component(e, Component::Position(Position::new(x, y)))
            .unwrap();
        world
            .add_component(e, Component::Texture(PixelBuffer::filled(1, 1, color)))
            .unwrap();
        e
    }

    #[test]
    fn movement_integrates_velocity() {
        let mut world = World::new();
        let e = sprite(&mut world, 1, 0.0, 0.0, 1);
        world
            .add_component(e, Component::Velocity(Velocity::new(30.0, -12.0)))
            .unwrap();
        let still = sprite(&mut world, 1, 5.0, 5.0, 1);

        let mut movement = MovementSystem;
        movement.update(&mut world, 0.5);

        assert_eq!(world.position(e), Some(&Position::new(15.0, -6.0)));
        assert_eq!(world.position(still), Some(&Position::new(5.0, 5.0)));
    }

    #[test]
    fn scene_collects_placements_by_z_index() {
        let mut world = World::new();
        sprite(&mut world, 2, 1.4, 0.6, 5);
        sprite(&mut world, -1, 0.0, 0.0, 6);
        let partial = world.create_entity("no texture");
        world.add_component(partial, Component::ZIndex(2)).unwrap();

        let scene = collect_scene(&world);
        assert_eq!(scene.layers.z_indices().collect::<Vec<_>>(), vec![-1, 2]);
        let top = scene.layers.layer(2);
        assert_eq!(top.len(), 1);
        assert_eq!((top[0].x, top[0].y), (1, 1));
        assert_eq!(scene.background, 0);
        assert!(scene.layers.tilemap().is_none());
    }

    #[test]
    fn scene_picks_up_tilemap_and_background() {
        let mut world = World::new();
        let level = world.create_entity("level");
        world
            .add_component(level, Component::Tilemap(Tilemap::new(&[[1]], 4).unwrap()))
            .unwrap();
        world.add_component(level, Component::BackgroundColor(33)).unwrap();

        let scene = collect_scene(&world);
        assert!(scene.layers.tilemap().is_some());
        assert_eq!(scene.background, 33);
        assert!(!scene.layers.is_empty());
    }

    #[test]
    fn culling_removes_entities_past_margin() {
        let mut world = World::new();
        let inside = sprite(&mut world, 1, 19.0, 9.0, 1);
        let right = sprite(&mut world, 1, 30.0, 0.0, 1);
        let below = sprite(&mut world, 1, 0.0, 20.0, 1);
        let left = sprite(&mut world, 1, -100.0, 0.0, 1);

        let removed = cull_out_of_bounds(&mut world, Viewport::new(20, 10), 10);
        assert_eq!(removed, vec![right, below]);
        assert!(world.is_alive(inside));
        assert!(world.is_alive(left));
        assert!(!world.is_alive(right));
    }
}
