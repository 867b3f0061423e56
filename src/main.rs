//! nyx demo runner (default binary).
//!
//! Scrolls a tilemap behind a few drifting sprites for `NYX_DEMO_FRAMES`
//! frames (default 600), or until `q` / `Esc` / `Ctrl-C` is pressed.
//!
//! `NYX_TILESET` may point at a tileset manifest; otherwise a built-in
//! checkerboard tileset is used. Logs go to stderr (`RUST_LOG=debug 2>nyx.log`).

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{info, warn};

use nyx::assets;
use nyx::core::{Component, Position, Velocity, World};
use nyx::engine::{Engine, EngineConfig};
use nyx::term::{CrosstermSize, TerminalSession, TileAtlas};
use nyx::types::{PixelBuffer, Tilemap};

const TILE: usize = 8;
const SPRITE_COLORS: [u8; 4] = [196, 226, 46, 201];

fn main() -> Result<()> {
    env_logger::init();

    let config = EngineConfig::from_env();
    let frames = std::env::var("NYX_DEMO_FRAMES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(600u64);

    let atlas = match std::env::var("NYX_TILESET") {
        Ok(path) => assets::load_tileset(path)?,
        Err(_) => builtin_atlas()?,
    };

    let mut engine = Engine::new(config.clone(), atlas);
    populate(&mut engine)?;

    let mut term = TerminalSession::new().with_clear_on_enter(config.clear_on_start);
    term.enter()?;

    let result = run(&mut engine, &mut term, frames);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(engine: &mut Engine, term: &mut TerminalSession, frames: u64) -> Result<()> {
    let mut quit = false;
    engine.run(&CrosstermSize, term, Some(frames), |engine| {
        scroll_level(engine.world_mut());
        respawn_sprites(engine);
        quit = quit || should_quit();
        !quit
    })?;
    info!("demo finished");
    Ok(())
}

fn builtin_atlas() -> Result<TileAtlas> {
    let mut atlas = TileAtlas::new(TILE)?;
    for (name, a, b) in [("dark", 17, 18), ("light", 24, 25), ("grass", 28, 34)] {
        let mut tex = PixelBuffer::new(TILE, TILE);
        for y in 0..TILE {
            for x in 0..TILE {
                let c = if (x / 2 + y / 2) % 2 == 0 { a } else { b };
                tex.set(x, y, c);
            }
        }
        atlas.create_tile(tex, None, Some(name), false)?;
    }
    Ok(atlas)
}

fn populate(engine: &mut Engine) -> Result<()> {
    let ids: Vec<u8> = engine.atlas().ids().collect();
    let first = ids.first().copied().unwrap_or(0);
    let pick = |i: usize| ids.get(i % ids.len().max(1)).copied().unwrap_or(first);

    let rows: Vec<Vec<u8>> = (0..6)
        .map(|r| (0..10).map(|c| pick(r * 3 + c / 2)).collect())
        .collect();
    let tilemap = Tilemap::new(&rows, engine.atlas().tile_dimension())?;

    let world = engine.world_mut();
    let level = world.create_entity("level");
    world.add_component(level, Component::Tilemap(tilemap))?;
    world.add_component(level, Component::BackgroundColor(16))?;

    for (i, &color) in SPRITE_COLORS.iter().enumerate() {
        spawn_sprite(world, i, color)?;
    }
    Ok(())
}

fn spawn_sprite(world: &mut World, i: usize, color: u8) -> Result<()> {
    let size = 4 + i;
    let mut tex = PixelBuffer::filled(size, size, color);
    // Transparent corners.
    for (x, y) in [(0, 0), (size - 1, 0), (0, size - 1), (size - 1, size - 1)] {
        tex.set(x, y, 0);
    }

    let e = world.create_entity(&format!("sprite-{i}"));
    world.add_component(e, Component::ZIndex(1 + i as i32))?;
    world.add_component(e, Component::Position(Position::new(-(size as f64), 4.0 * i as f64)))?;
    world.add_component(
        e,
        Component::Velocity(Velocity::new(12.0 + 6.0 * i as f64, 3.0 + i as f64)),
    )?;
    world.add_component(e, Component::Texture(tex))?;
    Ok(())
}

fn scroll_level(world: &mut World) {
    let ids: Vec<_> = world.entities().map(|e| e.id).collect();
    for id in ids {
        if let Some(map) = world.tilemap_mut(id) {
            map.scroll_by(1, 0);
        }
    }
}

fn respawn_sprites(engine: &mut Engine) {
    let world = engine.world_mut();
    for (i, &color) in SPRITE_COLORS.iter().enumerate() {
        let name = format!("sprite-{i}");
        if !world.entities().any(|e| e.name == name) {
            if let Err(err) = spawn_sprite(world, i, color) {
                warn!("demo: respawn of {} failed: {}", name, err);
            }
        }
    }
}

fn should_quit() -> bool {
    while let Ok(true) = event::poll(Duration::ZERO) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return true;
            }
        }
    }
    false
}
