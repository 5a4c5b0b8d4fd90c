//! Brickfall - A Breakout-style brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, fixed tick)
//! - `scheduler`: Fixed-timestep accumulator that drives the simulation
//! - `input`: Polled keyboard map and key bindings
//! - `render`: Read-only snapshot and draw list for the host canvas
//! - `config`: Data-driven game constants

pub mod config;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod sim;

pub use config::{ConfigError, GameConfig, LevelLayout};
pub use input::{Action, KeyBindings, Keyboard};
pub use scheduler::Scheduler;

/// Game configuration constants
pub mod consts {
    /// Play-field dimensions (pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Fixed simulation timestep (300 Hz)
    pub const SIM_DT: f32 = 1.0 / 300.0;
    /// Largest frame delta fed to the accumulator (avoids a spiral of death after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame
    pub const MAX_SUBSTEPS: u32 = 32;

    /// Time-scale bounds (higher = slower)
    pub const MIN_TIME_SCALE: u32 = 1;
    pub const MAX_TIME_SCALE: u32 = 12;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 6.0;
    pub const BALL_SPEED: f32 = 500.0;

    /// Paddle defaults
    pub const PADDLE_SPEED: f32 = 500.0;
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_MAX_WIDTH: f32 = 260.0;
    pub const PADDLE_GROWTH: f32 = 20.0;
    /// Distance from the field bottom to the paddle centre
    pub const PADDLE_BOTTOM_OFFSET: f32 = 10.0;

    /// Brick defaults
    pub const BRICK_WIDTH: f32 = 40.0;
    pub const BRICK_HEIGHT: f32 = 20.0;

    /// Power-up defaults
    pub const POWER_UP_WIDTH: f32 = 40.0;
    pub const POWER_UP_HEIGHT: f32 = 20.0;
    pub const POWER_UP_SPEED: f32 = 100.0;
    pub const PAD_SIZE_CHANCE: f32 = 0.1;
    pub const EXTRA_BALL_CHANCE: f32 = 0.5;
    /// Scale of the random x nudge given to a cloned ball
    pub const EXTRA_BALL_SPREAD: f32 = 0.2;
}
