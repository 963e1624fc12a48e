//! Level definitions: map layout, spawn points, wave list, ammo spawner.
//!
//! Levels are plain serde data. They can be loaded from JSON files or taken
//! from the built-in set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skirmish_core::constants::*;
use skirmish_core::enums::EnemyArchetype;
use skirmish_core::types::Position;
use skirmish_nav::{GridError, NavGrid};

use crate::wave_director::Wave;

/// Names accepted by [`builtin`].
pub const BUILTIN_LEVELS: &[&str] = &["training", "arena", "gauntlet"];

/// Errors while loading or validating a level.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bad level layout: {0}")]
    Grid(#[from] GridError),
    #[error("invalid level {level:?}: {reason}")]
    Invalid { level: String, reason: String },
    #[error("no built-in level named {0:?}")]
    UnknownBuiltin(String),
}

/// Keeps one ammo pickup in the level at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmoSpawnerConfig {
    /// Candidate positions; one is chosen at random per spawn.
    #[serde(default)]
    pub points: Vec<Position>,
    /// Used when `points` is empty.
    pub fallback: Position,
    /// Seconds between collection and the next spawn.
    #[serde(default = "default_ammo_interval")]
    pub interval_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    /// World position of the layout's bottom-left corner.
    #[serde(default)]
    pub origin: Position,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// Map rows, top first: `.` floor, `#` wall, `~` water.
    pub layout: Vec<String>,
    pub player_spawn: Position,
    #[serde(default)]
    pub spawn_points: Vec<Position>,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: f64,
    #[serde(default = "default_time_between_waves")]
    pub time_between_waves_secs: f64,
    pub waves: Vec<Wave>,
    #[serde(default)]
    pub ammo_spawner: Option<AmmoSpawnerConfig>,
}

fn default_cell_size() -> f64 {
    1.0
}

fn default_initial_delay() -> f64 {
    WAVE_INITIAL_DELAY_SECS
}

fn default_time_between_waves() -> f64 {
    WAVE_TIME_BETWEEN_SECS
}

fn default_ammo_interval() -> f64 {
    AMMO_SPAWN_INTERVAL_SECS
}

impl LevelConfig {
    /// Parse a level from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a level file.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Build the navigation grid described by the layout.
    pub fn build_grid(&self) -> Result<NavGrid, LevelError> {
        Ok(NavGrid::from_rows(self.origin, self.cell_size, &self.layout)?)
    }

    /// Check the level against its own grid. Missing spawn points and waves
    /// without archetypes are allowed; they degrade at runtime.
    pub fn validate(&self, grid: &NavGrid) -> Result<(), LevelError> {
        if !grid.is_walkable(&self.player_spawn) {
            return Err(self.invalid(format!(
                "player spawn ({}, {}) is not on open floor",
                self.player_spawn.x, self.player_spawn.y
            )));
        }
        for (i, point) in self.spawn_points.iter().enumerate() {
            if !grid.is_walkable(point) {
                return Err(self.invalid(format!(
                    "spawn point {i} ({}, {}) is not on open floor",
                    point.x, point.y
                )));
            }
        }
        for (i, wave) in self.waves.iter().enumerate() {
            let spawns = wave.count > 0 && !wave.archetypes.is_empty();
            if spawns && !(wave.spawn_rate > 0.0 && wave.spawn_rate.is_finite()) {
                return Err(self.invalid(format!(
                    "wave {i} ({}) has spawn rate {}",
                    wave.name, wave.spawn_rate
                )));
            }
        }
        if self.initial_delay_secs < 0.0 || self.time_between_waves_secs < 0.0 {
            return Err(self.invalid("negative wave delay".into()));
        }
        if let Some(ammo) = &self.ammo_spawner {
            if ammo.interval_secs < 0.0 {
                return Err(self.invalid("negative ammo spawn interval".into()));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> LevelError {
        LevelError::Invalid {
            level: self.name.clone(),
            reason,
        }
    }
}

/// Look up a built-in level by name.
pub fn builtin(name: &str) -> Result<LevelConfig, LevelError> {
    match name {
        "training" => Ok(build_training()),
        "arena" => Ok(build_arena()),
        "gauntlet" => Ok(build_gauntlet()),
        other => Err(LevelError::UnknownBuiltin(other.to_string())),
    }
}

/// Cell rectangle filled with one glyph: (col, row, width, height, glyph),
/// rows counted from the top.
type Block = (usize, usize, usize, usize, char);

/// Rectangular room with a wall border and filled blocks.
fn bordered_room(width: usize, height: usize, blocks: &[Block]) -> Vec<String> {
    let mut grid = vec![vec!['.'; width]; height];
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            if r == 0 || c == 0 || r == height - 1 || c == width - 1 {
                *cell = '#';
            }
        }
    }
    for &(col, row, w, h, glyph) in blocks {
        for line in grid.iter_mut().skip(row).take(h) {
            for cell in line.iter_mut().skip(col).take(w) {
                *cell = glyph;
            }
        }
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn wave(name: &str, archetypes: &[EnemyArchetype], count: u32, spawn_rate: f64) -> Wave {
    Wave {
        name: name.to_string(),
        archetypes: archetypes.to_vec(),
        count,
        spawn_rate,
    }
}

/// "Training": a small room, one wave of three grunts from two doors.
fn build_training() -> LevelConfig {
    LevelConfig {
        name: "Training".into(),
        origin: Position::new(-10.0, -7.0),
        cell_size: 1.0,
        layout: bordered_room(20, 14, &[]),
        player_spawn: Position::new(0.0, 0.0),
        spawn_points: vec![Position::new(-8.5, 5.5), Position::new(8.5, 5.5)],
        initial_delay_secs: WAVE_INITIAL_DELAY_SECS,
        time_between_waves_secs: WAVE_TIME_BETWEEN_SECS,
        waves: vec![wave("Drill", &[EnemyArchetype::Grunt], 3, 1.0)],
        ammo_spawner: None,
    }
}

/// "Arena": 32×24 hall with four pillars, three escalating waves.
fn build_arena() -> LevelConfig {
    use EnemyArchetype::*;

    LevelConfig {
        name: "Arena".into(),
        origin: Position::new(-16.0, -12.0),
        cell_size: 1.0,
        layout: bordered_room(
            32,
            24,
            &[
                (7, 6, 3, 3, '#'),
                (22, 6, 3, 3, '#'),
                (7, 15, 3, 3, '#'),
                (22, 15, 3, 3, '#'),
                (14, 11, 4, 2, '~'),
            ],
        ),
        player_spawn: Position::new(0.0, -4.0),
        spawn_points: vec![
            Position::new(-13.5, 9.5),
            Position::new(13.5, 9.5),
            Position::new(-13.5, -9.5),
            Position::new(13.5, -9.5),
        ],
        initial_delay_secs: WAVE_INITIAL_DELAY_SECS,
        time_between_waves_secs: WAVE_TIME_BETWEEN_SECS,
        waves: vec![
            wave("Scouts", &[Grunt], 3, 1.0),
            wave("Flankers", &[Grunt, Runner], 5, 1.5),
            wave("Overwatch", &[Grunt, Runner, Marksman], 7, 1.0),
        ],
        ammo_spawner: Some(AmmoSpawnerConfig {
            points: vec![Position::new(-6.0, 0.0), Position::new(6.0, 0.0)],
            fallback: Position::new(0.0, -6.0),
            interval_secs: AMMO_SPAWN_INTERVAL_SECS,
        }),
    }
}

/// "Gauntlet": a long corridor split by walls and a canal.
fn build_gauntlet() -> LevelConfig {
    use EnemyArchetype::*;

    LevelConfig {
        name: "Gauntlet".into(),
        origin: Position::new(-24.0, -8.0),
        cell_size: 1.0,
        layout: bordered_room(
            48,
            16,
            &[
                (12, 1, 2, 9, '#'),
                (24, 6, 2, 9, '#'),
                (36, 1, 2, 9, '#'),
                (17, 10, 4, 5, '~'),
                (29, 1, 4, 4, '~'),
            ],
        ),
        player_spawn: Position::new(-21.5, 0.5),
        spawn_points: vec![Position::new(21.5, 5.5), Position::new(21.5, -5.5)],
        initial_delay_secs: WAVE_INITIAL_DELAY_SECS,
        time_between_waves_secs: WAVE_TIME_BETWEEN_SECS,
        waves: vec![
            wave("Pickets", &[Grunt], 2, 0.5),
            wave("Rush", &[Runner], 6, 2.0),
            wave("Crossfire", &[Marksman, Grunt], 5, 0.75),
            wave("Last Stand", &[Grunt, Runner, Marksman], 10, 1.25),
        ],
        ammo_spawner: Some(AmmoSpawnerConfig {
            points: vec![
                Position::new(-18.5, -5.5),
                Position::new(-5.5, 5.5),
                Position::new(8.5, -5.5),
            ],
            fallback: Position::new(-21.5, 0.5),
            interval_secs: 8.0,
        }),
    }
}
