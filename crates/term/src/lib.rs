//! Terminal rendering pipeline.
//!
//! Frames flow through four stages:
//!
//! - [`dimensions`]: effective pixel window for the current terminal size
//! - [`tiles`]: tilemap + atlas expanded into pixels, with wraparound scrolling
//! - [`compositor`]: z-indexed layers merged by transparency substitution
//! - [`encoder`]: merged frame diffed and encoded as half-block ANSI output
//!
//! Everything except [`renderer`] is pure and writes into memory buffers, so it
//! can be tested without a terminal.

pub mod atlas;
pub mod compositor;
pub mod dimensions;
pub mod encoder;
pub mod error;
pub mod renderer;
pub mod tiles;

pub use nyx_types as types;

pub use atlas::TileAtlas;
pub use compositor::{LayerCompositor, TILEMAP_Z_INDEX};
pub use dimensions::{CrosstermSize, DimensionsResolver, FixedSize, TerminalSize};
pub use encoder::{encode_delta_into, SubpixelEncoder, SubpixelFrame};
pub use error::{AtlasError, RenderError};
pub use renderer::TerminalSession;
pub use tiles::TileCompositor;
