//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the live sets)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionError, Overlap, circle_rect_overlap, normalize, rect_rect_overlap};
pub use state::{Ball, Brick, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind};
pub use tick::{TickInput, tick};
