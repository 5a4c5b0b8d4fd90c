//! Game configuration
//!
//! Every tunable constant lives here with the classic values as defaults.
//! Partial JSON documents override only the fields they name.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::input::KeyBindings;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// JSON could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but are out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Brick arrangement built at level setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelLayout {
    /// Full rectangular grid, every brick with the same health
    Grid { rows: u32, cols: u32, health: u8 },
    /// Health map, row-major from the top; 0 leaves a gap
    Pattern { rows: Vec<Vec<u8>> },
}

impl Default for LevelLayout {
    fn default() -> Self {
        LevelLayout::Grid {
            rows: 10,
            cols: 20,
            health: 1,
        }
    }
}

impl LevelLayout {
    /// Hollow fortress of armoured bricks
    pub fn fortress() -> Self {
        const X: u8 = 3;
        const O: u8 = 0;
        let rows = vec![
            vec![X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X],
            vec![X, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, X],
            vec![X, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, O, X],
            vec![X, O, O, X, X, X, X, X, X, X, X, X, X, X, X, X, X, O, O, X],
            vec![X, O, O, X, X, O, O, X, X, X, X, X, X, O, O, X, X, O, O, X],
            vec![X, O, O, X, X, O, O, X, X, X, X, X, X, O, O, X, X, O, O, X],
            vec![X, O, O, X, X, O, O, X, X, X, X, X, X, O, O, X, X, O, O, X],
            vec![X, O, O, X, X, O, O, X, X, X, X, X, X, X, X, X, X, O, O, X],
            vec![X, O, O, X, X, O, O, X, X, X, X, X, X, X, X, X, X, O, O, X],
            vec![X, O, O, X, X, O, O, O, O, O, O, O, O, O, O, O, O, O, O, X],
            vec![X, O, O, X, X, O, O, O, O, O, O, O, O, O, O, O, O, O, O, X],
            vec![X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X],
            vec![X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X, X],
        ];
        LevelLayout::Pattern { rows }
    }

    /// (row, col, health) of every non-empty cell
    pub(crate) fn cells(&self) -> Vec<(u32, u32, u8)> {
        match self {
            LevelLayout::Grid { rows, cols, health } => (0..*rows)
                .flat_map(|y| (0..*cols).map(move |x| (y, x, *health)))
                .collect(),
            LevelLayout::Pattern { rows } => rows
                .iter()
                .enumerate()
                .flat_map(|(y, row)| {
                    row.iter()
                        .enumerate()
                        .filter(|(_, hp)| **hp > 0)
                        .map(move |(x, hp)| (y as u32, x as u32, *hp))
                })
                .collect(),
        }
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field & timing ===
    pub field_width: f32,
    pub field_height: f32,
    /// Simulated seconds per tick
    pub fixed_dt: f32,
    /// Frame deltas above this are clamped before accumulation
    pub max_frame_dt: f32,

    // === Ball ===
    pub ball_speed: f32,
    pub ball_radius: f32,
    /// Initial (un-normalized) direction of the serve ball
    pub serve_direction: Vec2,

    // === Paddle ===
    pub paddle_speed: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_max_width: f32,
    pub paddle_growth: f32,
    pub paddle_bottom_offset: f32,

    // === Bricks ===
    pub brick_size: Vec2,
    pub layout: LevelLayout,

    // === Power-ups ===
    pub power_up_size: Vec2,
    pub power_up_speed: f32,
    pub pad_size_chance: f32,
    pub extra_ball_chance: f32,
    pub extra_ball_spread: f32,
    /// Drop power-ups that fall past the bottom edge
    pub expire_power_ups: bool,

    // === Controls ===
    pub bindings: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            fixed_dt: SIM_DT,
            max_frame_dt: MAX_FRAME_DT,

            ball_speed: BALL_SPEED,
            ball_radius: BALL_RADIUS,
            serve_direction: Vec2::new(0.5, -1.0),

            paddle_speed: PADDLE_SPEED,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_max_width: PADDLE_MAX_WIDTH,
            paddle_growth: PADDLE_GROWTH,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,

            brick_size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            layout: LevelLayout::default(),

            power_up_size: Vec2::new(POWER_UP_WIDTH, POWER_UP_HEIGHT),
            power_up_speed: POWER_UP_SPEED,
            pad_size_chance: PAD_SIZE_CHANCE,
            extra_ball_chance: EXTRA_BALL_CHANCE,
            extra_ball_spread: EXTRA_BALL_SPREAD,
            expire_power_ups: true,

            bindings: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("fixed_dt", self.fixed_dt),
            ("max_frame_dt", self.max_frame_dt),
            ("ball_speed", self.ball_speed),
            ("ball_radius", self.ball_radius),
            ("paddle_speed", self.paddle_speed),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("brick_size.x", self.brick_size.x),
            ("brick_size.y", self.brick_size.y),
            ("power_up_size.x", self.power_up_size.x),
            ("power_up_size.y", self.power_up_size.y),
            ("power_up_speed", self.power_up_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.paddle_growth < 0.0 {
            return Err(ConfigError::Invalid("paddle_growth must not be negative".into()));
        }
        if !(self.paddle_width <= self.paddle_max_width && self.paddle_max_width <= self.field_width) {
            return Err(ConfigError::Invalid(format!(
                "expected paddle_width ({}) <= paddle_max_width ({}) <= field_width ({})",
                self.paddle_width, self.paddle_max_width, self.field_width
            )));
        }
        // Paddle (and the ball served from it) must start inside the field
        if !(self.paddle_bottom_offset >= 0.0
            && self.paddle_bottom_offset + self.paddle_height / 2.0 <= self.field_height)
        {
            return Err(ConfigError::Invalid(format!(
                "paddle_bottom_offset ({}) puts the paddle outside the field",
                self.paddle_bottom_offset
            )));
        }
        if self.serve_direction.try_normalize().is_none() {
            return Err(ConfigError::Invalid("serve_direction must be non-zero".into()));
        }

        for (name, p) in [
            ("pad_size_chance", self.pad_size_chance),
            ("extra_ball_chance", self.extra_ball_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if self.pad_size_chance + self.extra_ball_chance > 1.0 {
            return Err(ConfigError::Invalid("power-up chances sum above 1".into()));
        }

        match &self.layout {
            LevelLayout::Grid { health: 0, .. } => {
                return Err(ConfigError::Invalid("grid layout health must be at least 1".into()));
            }
            LevelLayout::Pattern { rows } if rows.iter().all(|row| row.iter().all(|hp| *hp == 0)) => {
                return Err(ConfigError::Invalid("pattern layout has no bricks".into()));
            }
            _ => {}
        }

        Ok(())
    }
}
