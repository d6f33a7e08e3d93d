/// Game tuning loaded from an optional TOML file.
///
/// Every field defaults to the classic arcade values, so a config file
/// only needs the keys it wants to change:
///
/// ```toml
/// fps = 30
/// starting_lives = 3
/// spawn_colors = ["red", "blue"]
/// ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::entities::EnemyColor;
use crate::error::{GameError, GameResult};

/// Upper bound for `cell_width` / `cell_height`; keeps sprite masks small
/// enough to index with `i32`.
pub const MAX_CELL_SIZE: i32 = 1000;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Screen & pacing ──────────────────────────────────────────────────────
    /// Simulation width in pixels.
    pub screen_width: i32,
    /// Simulation height in pixels.
    pub screen_height: i32,
    /// Target ticks per second.
    pub fps: u32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_start_x: i32,
    pub player_start_y: i32,
    /// Pixels moved per tick while a direction key is held.
    pub player_velocity: i32,
    pub starting_health: i32,
    pub starting_lives: i32,

    // ── Enemies & lasers ─────────────────────────────────────────────────────
    /// Downward drift per tick.
    pub enemy_velocity: i32,
    /// Laser speed per tick; enemy lasers fall, player lasers rise.
    pub laser_velocity: i32,
    /// Health lost per laser hit or ship collision.
    pub hit_damage: i32,
    /// Ticks between two shots of the same ship.
    pub cooldown_ticks: u32,
    /// An enemy tries to fire with probability 1 / `enemy_fire_chance` per tick.
    pub enemy_fire_chance: u32,

    // ── Waves ────────────────────────────────────────────────────────────────
    pub starting_level: u32,
    pub starting_wave_size: u32,
    pub wave_increment: u32,
    pub spawn_x_min: i32,
    /// Spawn x is drawn from `[spawn_x_min, screen_width - spawn_x_right_margin)`.
    pub spawn_x_right_margin: i32,
    pub spawn_y_min: i32,
    pub spawn_y_max: i32,
    pub spawn_colors: Vec<EnemyColor>,

    // ── Loss & layout ────────────────────────────────────────────────────────
    pub loss_display_seconds: u32,
    pub health_bar_gap: i32,
    pub health_bar_height: i32,
    /// Extra room kept free under the player for its health bar.
    pub bottom_margin: i32,

    // ── Sprites ──────────────────────────────────────────────────────────────
    /// Pixels covered by one sprite glyph, horizontally.
    pub cell_width: i32,
    /// Pixels covered by one sprite glyph, vertically.
    pub cell_height: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: 800,
            screen_height: 800,
            fps: 60,

            player_start_x: 300,
            player_start_y: 630,
            player_velocity: 5,
            starting_health: 100,
            starting_lives: 5,

            enemy_velocity: 1,
            laser_velocity: 4,
            hit_damage: 10,
            cooldown_ticks: 30,
            enemy_fire_chance: 2 * 60,

            starting_level: 1,
            starting_wave_size: 5,
            wave_increment: 5,
            spawn_x_min: 50,
            spawn_x_right_margin: 100,
            spawn_y_min: -1500,
            spawn_y_max: -100,
            spawn_colors: vec![EnemyColor::Red, EnemyColor::Green, EnemyColor::Blue],

            loss_display_seconds: 3,
            health_bar_gap: 10,
            health_bar_height: 10,
            bottom_margin: 15,

            cell_width: 10,
            cell_height: 20,
        }
    }
}

impl GameConfig {
    /// Load `path`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse or validate is an error; the
    /// game never silently runs with half a config.
    pub fn load(path: &Path) -> GameResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}; using defaults", path.display());
                return Ok(GameConfig::default());
            }
            Err(err) => {
                return Err(GameError::Config {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                })
            }
        };

        let config = Self::from_toml(&contents).map_err(|err| match err {
            GameError::Config { message, .. } => GameError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> GameResult<Self> {
        fn parse_error(err: impl fmt::Display) -> GameError {
            GameError::Config {
                path: "<toml>".into(),
                message: err.to_string(),
            }
        }

        let table: toml::Table = contents.parse().map_err(parse_error)?;

        // Color tags are checked up front so a bad tag reports as itself
        // rather than as a generic deserialization failure.
        if let Some(toml::Value::Array(tags)) = table.get("spawn_colors") {
            for tag in tags.iter().filter_map(toml::Value::as_str) {
                tag.parse::<EnemyColor>()?;
            }
        }

        let config: GameConfig = toml::Value::Table(table).try_into().map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> GameResult<()> {
            Err(GameError::InvalidConfig {
                field,
                reason: reason.into(),
            })
        }

        if self.screen_width <= 0 || self.screen_height <= 0 {
            return invalid("screen_width/screen_height", "screen must have a positive size");
        }
        if self.fps == 0 {
            return invalid("fps", "must be at least 1");
        }
        if self.cooldown_ticks == 0 {
            return invalid("cooldown_ticks", "must be at least 1");
        }
        if self.enemy_fire_chance == 0 {
            return invalid("enemy_fire_chance", "must be at least 1");
        }
        if self.starting_health <= 0 {
            return invalid("starting_health", "must be positive");
        }
        if self.cell_width <= 0 || self.cell_height <= 0 {
            return invalid("cell_width/cell_height", "glyph cells must have a positive size");
        }
        if self.cell_width > MAX_CELL_SIZE || self.cell_height > MAX_CELL_SIZE {
            return invalid(
                "cell_width/cell_height",
                format!("glyph cells are limited to {0}x{0} pixels", MAX_CELL_SIZE),
            );
        }
        if self.fps.checked_mul(self.loss_display_seconds).is_none() {
            return invalid("loss_display_seconds", "fps * loss_display_seconds overflows");
        }
        if self.spawn_colors.is_empty() {
            return invalid("spawn_colors", "at least one enemy color is required");
        }
        if self.spawn_x_min >= self.spawn_x_max() {
            return invalid(
                "spawn_x_min",
                format!(
                    "spawn range [{}, {}) is empty",
                    self.spawn_x_min,
                    self.spawn_x_max()
                ),
            );
        }
        if self.spawn_y_min >= self.spawn_y_max {
            return invalid(
                "spawn_y_min",
                format!(
                    "spawn range [{}, {}) is empty",
                    self.spawn_y_min, self.spawn_y_max
                ),
            );
        }
        Ok(())
    }

    /// Exclusive upper bound for enemy spawn x.
    pub fn spawn_x_max(&self) -> i32 {
        self.screen_width.saturating_sub(self.spawn_x_right_margin)
    }

    /// Ticks the loss banner stays up before the match ends.
    pub fn loss_display_ticks(&self) -> u32 {
        self.fps.saturating_mul(self.loss_display_seconds)
    }
}
