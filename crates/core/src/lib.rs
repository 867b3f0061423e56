//! World state for nyx scenes - an explicitly owned ECS.
//!
//! Entities are integer handles into a [`World`]; components live in one table
//! per [`ComponentKind`]. There is no global registry: each render session owns
//! its world, so independent sessions and tests never share state.
//!
//! # Module Structure
//!
//! - [`component`]: the closed set of component types
//! - [`world`]: entity arena and component tables
//! - [`systems`]: movement, scene collection for the compositor, culling
//!
//! # Example
//!
//! ```
//! use nyx_core::{collect_scene, Component, Position, World};
//! use nyx_types::PixelBuffer;
//!
//! let mut world = World::new();
//! let ship = world.create_entity("ship");
//! world.add_component(ship, Component::ZIndex(1)).unwrap();
//! world.add_component(ship, Component::Position(Position::new(3.0, 2.0))).unwrap();
//! world.add_component(ship, Component::Texture(PixelBuffer::filled(2, 2, 9))).unwrap();
//!
//! let scene = collect_scene(&world);
//! assert_eq!(scene.layers.layer(1).len(), 1);
//! ```

pub mod component;
pub mod systems;
pub mod world;

pub use nyx_types as types;

pub use component::{Component, ComponentKind, Position, Velocity};
pub use systems::{
    apply_velocity, collect_scene, cull_out_of_bounds, MovementSystem, Scene, System,
};
pub use world::{Entity, EntityId, World, WorldError};
