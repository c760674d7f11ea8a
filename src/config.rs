use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use voxelcraft_game::GameSettings;
use voxelcraft_physics::MAX_REACH;
use voxelcraft_world::area_chunk_count;

/// Largest accepted chunk load radius.
const MAX_LOAD_RADIUS: i32 = 8;

pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub game: GameSettings,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to simulate before exiting.
    pub frames: u64,
    /// Seconds per frame.
    pub frame_dt: f32,
    /// Name written into save files.
    pub world_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_dt: 1.0 / 60.0,
            world_name: "world".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<EngineConfig>(&contents) {
                Ok(cfg) => cfg.sanitized(),
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    EngineConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Engine config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                EngineConfig::default()
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).context("Failed to serialize engine config")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Replace values the engine cannot run with.
    fn sanitized(mut self) -> Self {
        let defaults = EngineConfig::default();
        if !(self.run.frame_dt.is_finite() && self.run.frame_dt > 0.0) {
            warn!(frame_dt = self.run.frame_dt, "Invalid frame_dt. Using default");
            self.run.frame_dt = defaults.run.frame_dt;
        }
        if self.game.chunk_capacity == 0 {
            warn!("chunk_capacity must be positive. Using default");
            self.game.chunk_capacity = defaults.game.chunk_capacity;
        }
        if !(self.game.reach.is_finite() && self.game.reach > 0.0) {
            warn!(reach = self.game.reach, "Invalid reach. Using default");
            self.game.reach = defaults.game.reach;
        } else if self.game.reach > MAX_REACH {
            warn!(reach = self.game.reach, "reach too large. Using {MAX_REACH}");
            self.game.reach = MAX_REACH;
        }
        self.game.load_radius = self.game.load_radius.clamp(0, MAX_LOAD_RADIUS);
        let needed = area_chunk_count(self.game.load_radius);
        if self.game.chunk_capacity < needed {
            warn!(
                chunk_capacity = self.game.chunk_capacity,
                load_radius = self.game.load_radius,
                "chunk_capacity cannot hold the load area. Using {needed}"
            );
            self.game.chunk_capacity = needed;
        }
        self.game.tuning = self.game.tuning.sanitized();
        self
    }
}
