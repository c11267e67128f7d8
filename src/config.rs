use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snake::Position;

const APP_DIR_NAME: &str = "rail-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true when `position` lies inside the grid.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < i32::from(self.width)
            && position.y < i32::from(self.height)
    }
}

/// Which cells of the grid are traversable, and in which directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Every interior cell is open; the outer border is lethal.
    Open,
    /// Sparse lattice of corridors on every third row and column.
    Rail,
}

impl Topology {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Rail => "rail",
        }
    }
}

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 36;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 36;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 80;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 20;

/// Score after which every point shaves a millisecond off the tick interval.
pub const SPEEDUP_AFTER_SCORE: u32 = 5;

/// Ticks the power-up flag stays active after eating.
pub const POWER_UP_DURATION_TICKS: u32 = 15;

/// Score from which several food items are kept on the board.
pub const MULTI_FOOD_AFTER_SCORE: u32 = 3;

/// Food items kept on the board once the multi-food score is reached.
pub const MULTI_FOOD_TARGET: usize = 5;

/// Spawn attempts per refill before giving up on the target count.
pub const FOOD_SPAWN_ATTEMPTS: u32 = 10;

/// Score from which the path is drawn in the frenzy color.
pub const FRENZY_SCORE: u32 = 30;

/// Terminal columns used per logical cell.
pub const CELL_WIDTH: u16 = 2;

/// Minimum width or height of a playable grid.
pub const MIN_GRID_SIDE: u16 = 3;

/// Maximum width or height of a grid.
pub const MAX_GRID_SIDE: u16 = 1024;

/// Every tunable of one simulation session.
///
/// Missing fields in a config file fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub topology: Topology,
    pub base_tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    pub speedup_after_score: u32,
    pub power_up_duration_ticks: u32,
    pub multi_food_after_score: u32,
    pub multi_food_target: usize,
    pub food_spawn_attempts: u32,
    /// First cell scanned when looking for a safe start position.
    pub safe_spot_origin: Position,
    /// Fixed seed for food placement; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            topology: Topology::Rail,
            base_tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            min_tick_interval_ms: MIN_TICK_INTERVAL_MS,
            speedup_after_score: SPEEDUP_AFTER_SCORE,
            power_up_duration_ticks: POWER_UP_DURATION_TICKS,
            multi_food_after_score: MULTI_FOOD_AFTER_SCORE,
            multi_food_target: MULTI_FOOD_TARGET,
            food_spawn_attempts: FOOD_SPAWN_ATTEMPTS,
            safe_spot_origin: Position { x: 1, y: 1 },
            seed: None,
        }
    }
}

impl GameConfig {
    /// Creates a default config for the given grid and topology.
    #[must_use]
    pub fn new(grid: GridSize, topology: Topology) -> Self {
        Self {
            grid,
            topology,
            ..Self::default()
        }
    }

    /// Loads a config file, failing when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    /// Loads a config file, returning defaults when it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(path, &raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configs the engine cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < MIN_GRID_SIDE || self.grid.height < MIN_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} is smaller than {MIN_GRID_SIDE}x{MIN_GRID_SIDE}",
                self.grid.width, self.grid.height
            )));
        }
        if self.grid.width > MAX_GRID_SIDE || self.grid.height > MAX_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} is larger than {MAX_GRID_SIDE}x{MAX_GRID_SIDE}",
                self.grid.width, self.grid.height
            )));
        }
        if !self.grid.contains(self.safe_spot_origin) {
            return Err(ConfigError::Invalid(format!(
                "safe_spot_origin ({}, {}) lies outside the {}x{} grid",
                self.safe_spot_origin.x,
                self.safe_spot_origin.y,
                self.grid.width,
                self.grid.height
            )));
        }
        if self.min_tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_tick_interval_ms must be positive".to_owned(),
            ));
        }
        if self.min_tick_interval_ms > self.base_tick_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "min_tick_interval_ms ({}) exceeds base_tick_interval_ms ({})",
                self.min_tick_interval_ms, self.base_tick_interval_ms
            )));
        }
        if self.multi_food_target == 0 {
            return Err(ConfigError::Invalid(
                "multi_food_target must be at least 1".to_owned(),
            ));
        }
        if self.food_spawn_attempts == 0 {
            return Err(ConfigError::Invalid(
                "food_spawn_attempts must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Tick interval for `score`: constant up to the speed-up score, then one
    /// millisecond faster per point, never below the floor.
    #[must_use]
    pub fn tick_interval_ms(&self, score: u32) -> u64 {
        if score <= self.speedup_after_score {
            return self.base_tick_interval_ms;
        }

        let speedup = u64::from(score - self.speedup_after_score);
        self.base_tick_interval_ms
            .saturating_sub(speedup)
            .max(self.min_tick_interval_ms)
    }

    /// Number of food items the board should hold at `score`.
    #[must_use]
    pub fn target_food_count(&self, score: u32) -> usize {
        if score >= self.multi_food_after_score {
            self.multi_food_target
        } else {
            1
        }
    }
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    /// Path color in the normal state.
    pub snake_body: Color,
    /// Path color while powered up.
    pub snake_powered: Color,
    /// Path color once the frenzy score is reached.
    pub snake_frenzy: Color,
    pub snake_head: Color,
    pub food: Color,
    /// Background of cells the path can never enter.
    pub wall_bg: Color,
    /// Background of traversable cells.
    pub play_bg: Color,
    /// Dot marking a traversable cell.
    pub rail_fg: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const THEME_DEFAULT: Theme = Theme {
    snake_body: Color::Rgb(76, 175, 80),
    snake_powered: Color::Rgb(255, 165, 0),
    snake_frenzy: Color::Red,
    snake_head: Color::White,
    food: Color::LightRed,
    wall_bg: Color::Rgb(18, 18, 24),
    play_bg: Color::Black,
    rail_fg: Color::DarkGray,
    border_fg: Color::Gray,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Glyph for a traversable empty cell.
pub const GLYPH_RAIL: &str = " ·";

/// Glyph for a wall cell.
pub const GLYPH_WALL: &str = "  ";

pub const GLYPH_FOOD: &str = "◆ ";

pub const GLYPH_SNAKE_BODY: &str = "██";

pub const GLYPH_SNAKE_HEAD_UP: &str = "▀▀";

pub const GLYPH_SNAKE_HEAD_DOWN: &str = "▄▄";

pub const GLYPH_SNAKE_HEAD_LEFT: &str = "◀█";

pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "█▶";

/// Head glyph before the first move.
pub const GLYPH_SNAKE_HEAD_IDLE: &str = "██";
