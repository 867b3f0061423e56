//! Component types.

use std::fmt;

use crate::types::{Pixel, PixelBuffer, Tilemap};

/// Sub-pixel position. The render position is the rounded float position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer frame coordinates used for drawing.
    pub fn render_xy(&self) -> (i32, i32) {
        (round_to_i32(self.x), round_to_i32(self.y))
    }
}

fn round_to_i32(v: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    v.round() as i32
}

/// Pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Every component an entity can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    BackgroundColor(Pixel),
    ZIndex(i32),
    Tilemap(Tilemap),
    Texture(PixelBuffer),
    Position(Position),
    Velocity(Velocity),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::BackgroundColor(_) => ComponentKind::BackgroundColor,
            Component::ZIndex(_) => ComponentKind::ZIndex,
            Component::Tilemap(_) => ComponentKind::Tilemap,
            Component::Texture(_) => ComponentKind::Texture,
            Component::Position(_) => ComponentKind::Position,
            Component::Velocity(_) => ComponentKind::Velocity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    BackgroundColor,
    ZIndex,
    Tilemap,
    Texture,
    Position,
    Velocity,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::BackgroundColor,
        ComponentKind::ZIndex,
        ComponentKind::Tilemap,
        ComponentKind::Texture,
        ComponentKind::Position,
        ComponentKind::Velocity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::BackgroundColor => "background-color",
            ComponentKind::ZIndex => "z-index",
            ComponentKind::Tilemap => "tilemap",
            ComponentKind::Texture => "texture",
            ComponentKind::Position => "position",
            ComponentKind::Velocity => "velocity",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_position_rounds() {
        assert_eq!(Position::new(1.4, 2.5).render_xy(), (1, 3));
        assert_eq!(Position::new(-0.6, 0.0).render_xy(), (-1, 0));
        assert_eq!(Position::new(f64::NAN, 1e20).render_xy(), (0, i32::MAX));
    }

    #[test]
    fn component_kind_matches_variant() {
        assert_eq!(Component::ZIndex(3).kind(), ComponentKind::ZIndex);
        assert_eq!(
            Component::Velocity(Velocity::default()).kind().to_string(),
            "velocity"
        );
    }
}
