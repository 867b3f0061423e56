//! nyx (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so applications can depend
//! on a single package: `nyx::{types, core, term, assets, engine}`.

pub use nyx_assets as assets;
pub use nyx_core as core;
pub use nyx_engine as engine;
pub use nyx_term as term;
pub use nyx_types as types;
