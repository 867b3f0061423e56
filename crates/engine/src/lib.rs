//! Render context tying the world, the atlas, and the terminal pipeline together.
//!
//! An [`Engine`] is an explicitly owned session: it holds the [`World`], the
//! [`TileAtlas`], and the encoder's memory of the last printed frame. Nothing is
//! global, so several engines (or tests) can run side by side.
//!
//! One frame is:
//!
//! 1. resolve the effective window from the terminal size
//! 2. collect the scene from the world
//! 3. composite layers into one pixel buffer
//! 4. diff-encode and write it in a single write

pub mod config;

use std::io::Write;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use log::{debug, info, warn};

use nyx_core::{collect_scene, cull_out_of_bounds, EntityId, MovementSystem, System, World};
use nyx_term::{
    DimensionsResolver, LayerCompositor, RenderError, SubpixelEncoder, TerminalSize, TileAtlas,
};

pub use nyx_core as core;
pub use nyx_term as term;
pub use nyx_types as types;

pub use config::EngineConfig;

use crate::types::{PixelBuffer, Viewport};

pub struct Engine {
    config: EngineConfig,
    world: World,
    atlas: TileAtlas,
    dimensions: DimensionsResolver,
    compositor: LayerCompositor,
    encoder: SubpixelEncoder,
    systems: Vec<Box<dyn System>>,
    viewport: Viewport,
    frames: u64,
}

impl Engine {
    /// A new engine with the movement system installed.
    pub fn new(config: EngineConfig, atlas: TileAtlas) -> Self {
        let dimensions = DimensionsResolver::new(config.window_h, config.window_w);
        Self {
            config,
            world: World::new(),
            atlas,
            dimensions,
            compositor: LayerCompositor::new(),
            encoder: SubpixelEncoder::new(),
            systems: vec![Box::new(MovementSystem)],
            viewport: Viewport::default(),
            frames: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn atlas(&self) -> &TileAtlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut TileAtlas {
        &mut self.atlas
    }

    /// Window of the most recently drawn frame; skipped frames leave it unchanged.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// Advance every system by one fixed timestep.
    pub fn tick(&mut self) {
        let dt = self.config.seconds_per_update();
        for system in &mut self.systems {
            system.update(&mut self.world, dt);
        }
    }

    /// Destroy entities that drifted past the last frame's edges.
    ///
    /// Does nothing until a frame has been drawn.
    pub fn cull(&mut self) -> Vec<EntityId> {
        if self.viewport.is_empty() {
            return Vec::new();
        }
        cull_out_of_bounds(&mut self.world, self.viewport, self.config.cull_margin)
    }

    /// Composite the current world into a frame of `viewport` size.
    pub fn compose(&mut self, viewport: Viewport) -> Result<PixelBuffer, RenderError> {
        let scene = collect_scene(&self.world);
        self.compositor
            .render(&scene.layers, &self.atlas, scene.background, viewport)
    }

    /// Run one full pipeline pass and write the result to `out`.
    pub fn render_frame<S, W>(&mut self, size: &S, out: &mut W) -> Result<()>
    where
        S: TerminalSize + ?Sized,
        W: Write + ?Sized,
    {
        let viewport = self.dimensions.resolve_from(size)?;
        if viewport.is_empty() {
            // Keep the last drawn window so culling still has real bounds.
            warn!("engine: terminal too small to render, skipping frame");
            self.encoder.invalidate();
            return Ok(());
        }
        if viewport != self.viewport {
            debug!(
                "engine: window {}x{} -> {}x{}",
                self.viewport.width, self.viewport.height, viewport.width, viewport.height
            );
            self.viewport = viewport;
        }

        let frame = self.compose(viewport)?;
        self.encoder.print(&frame, out)?;
        self.frames += 1;
        Ok(())
    }

    /// Forget the last printed frame; the next frame is drawn in full.
    pub fn invalidate(&mut self) {
        self.encoder.invalidate();
    }

    /// Fixed-interval loop: tick, let the caller adjust the world, render, sleep.
    ///
    /// Stops after `max_frames` frames, or when `step` returns false.
    pub fn run<S, W, F>(
        &mut self,
        size: &S,
        out: &mut W,
        max_frames: Option<u64>,
        mut step: F,
    ) -> Result<()>
    where
        S: TerminalSize + ?Sized,
        W: Write + ?Sized,
        F: FnMut(&mut Engine) -> bool,
    {
        let interval = self.config.update_interval();
        info!(
            "engine: running at {} updates/s",
            self.config.updates_per_sec
        );

        let mut count = 0u64;
        loop {
            if max_frames.is_some_and(|max| count >= max) {
                break;
            }
            let started = Instant::now();

            self.tick();
            if !step(self) {
                break;
            }
            self.render_frame(size, out)?;
            self.cull();
            count += 1;

            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        info!("engine: stopped after {} frames", count);
        Ok(())
    }
}
