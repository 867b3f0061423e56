use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::types::{DEFAULT_CULL_MARGIN, DEFAULT_UPDATES_PER_SEC};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Requested window height in pixels (0 = fullscreen).
    pub window_h: usize,
    /// Requested window width in pixels (0 = fullscreen).
    pub window_w: usize,
    pub updates_per_sec: u32,
    pub cull_margin: i32,
    pub clear_on_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_h: 0,
            window_w: 0,
            updates_per_sec: DEFAULT_UPDATES_PER_SEC,
            cull_margin: DEFAULT_CULL_MARGIN,
            clear_on_start: false,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let window_h = parse_var(&lookup, "NYX_WINDOW_H").unwrap_or(defaults.window_h);
        let window_w = parse_var(&lookup, "NYX_WINDOW_W").unwrap_or(defaults.window_w);

        let updates_per_sec = parse_var(&lookup, "NYX_UPDATES_PER_SEC")
            .filter(|&n: &u32| n > 0)
            .unwrap_or(defaults.updates_per_sec);

        let cull_margin = parse_var(&lookup, "NYX_CULL_MARGIN").unwrap_or(defaults.cull_margin);

        let clear_on_start = lookup("NYX_CLEAR_ON_START")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.clear_on_start);

        Self {
            window_h,
            window_w,
            updates_per_sec,
            cull_margin,
            clear_on_start,
        }
    }

    /// Simulation timestep in seconds.
    pub fn seconds_per_update(&self) -> f64 {
        1.0 / self.updates_per_sec.max(1) as f64
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(self.seconds_per_update())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}
