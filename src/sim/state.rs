//! Game state and core simulation types
//!
//! Everything the tick mutates and the renderer reads lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::{MAX_TIME_SCALE, MIN_TIME_SCALE};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advancing
    Running,
    /// Frozen by the player
    Paused,
    /// Every ball was lost (terminal)
    Stopped,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickHit { brick_id: u32, health: u8 },
    BrickDestroyed { brick_id: u32, power_up: Option<PowerUpKind> },
    PowerUpSpawned { power_up_id: u32, kind: PowerUpKind },
    PowerUpCollected { power_up_id: u32, kind: PowerUpKind },
    PowerUpMissed { power_up_id: u32, kind: PowerUpKind },
    BallSpawned { ball_id: u32 },
    BallLost { ball_id: u32 },
    /// A contact had no usable direction and was skipped
    DegenerateContact { ball_id: u32 },
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction; speed is applied during integration
    pub vel: Vec2,
    pub radius: f32,
    /// Riding on the paddle instead of moving
    pub stuck: bool,
    /// Offset from the paddle centre while stuck
    pub stuck_offset: f32,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    /// Keep the whole paddle inside `[0, field_width]`
    pub fn clamp_to_field(&mut self, field_width: f32) {
        let half = self.size.x / 2.0;
        self.pos.x = self.pos.x.clamp(half, (field_width - half).max(half));
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Widen the paddle
    PadSize,
    /// Clone a ball
    ExtraBall,
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    /// Centre
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u8,
    /// Dropped when the brick is destroyed
    pub power_up: Option<PowerUpKind>,
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    /// Centre
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Divides per-tick motion (1 = normal speed)
    pub time_scale: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the level built and one ball on the paddle
    ///
    /// `config` is expected to have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let paddle = Paddle {
            pos: Vec2::new(
                config.field_width / 2.0,
                config.field_height - config.paddle_bottom_offset,
            ),
            size: Vec2::new(config.paddle_width, config.paddle_height),
        };

        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            time_scale: MIN_TIME_SCALE,
            time_ticks: 0,
            paddle,
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        state.build_level();
        state.spawn_ball_stuck();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulated seconds covered by one tick at the current time scale
    pub fn scaled_dt(&self) -> f32 {
        self.config.fixed_dt / self.time_scale as f32
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Lay out bricks from the configured layout, rolling each brick's power-up
    pub fn build_level(&mut self) {
        let size = self.config.brick_size;
        let cells = self.config.layout.cells();
        self.bricks.clear();
        self.bricks.reserve(cells.len());

        for (row, col, health) in cells {
            let power_up = self.roll_power_up();
            let brick = Brick {
                id: self.next_entity_id(),
                pos: Vec2::new(
                    col as f32 * size.x + size.x / 2.0,
                    row as f32 * size.y + size.y / 2.0,
                ),
                size,
                health,
                power_up,
            };
            self.bricks.push(brick);
        }

        let carrying = self.bricks.iter().filter(|b| b.power_up.is_some()).count();
        log::info!(
            "Level built: {} bricks, {} carrying power-ups (seed {})",
            self.bricks.len(),
            carrying,
            self.seed
        );
    }

    fn roll_power_up(&mut self) -> Option<PowerUpKind> {
        let roll: f32 = self.rng.random();
        if roll < self.config.pad_size_chance {
            Some(PowerUpKind::PadSize)
        } else if roll < self.config.pad_size_chance + self.config.extra_ball_chance {
            Some(PowerUpKind::ExtraBall)
        } else {
            None
        }
    }

    /// Spawn a ball resting on top of the paddle centre
    pub fn spawn_ball_stuck(&mut self) -> u32 {
        let id = self.next_entity_id();
        let radius = self.config.ball_radius;
        let ball = Ball {
            id,
            pos: Vec2::new(
                self.paddle.pos.x,
                self.paddle.pos.y - self.paddle.size.y / 2.0 - radius,
            ),
            vel: self
                .config
                .serve_direction
                .try_normalize()
                .unwrap_or(Vec2::NEG_Y),
            radius,
            stuck: true,
            stuck_offset: 0.0,
        };
        self.balls.push(ball);
        self.push_event(GameEvent::BallSpawned { ball_id: id });
        id
    }

    /// Spawn a power-up at a destroyed brick's centre
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp {
            id,
            pos,
            size: self.config.power_up_size,
            kind,
        });
        self.push_event(GameEvent::PowerUpSpawned { power_up_id: id, kind });
        id
    }

    /// Apply a collected power-up's effect
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::PadSize => {
                let width = (self.paddle.size.x + self.config.paddle_growth)
                    .min(self.config.paddle_max_width);
                self.paddle.size.x = width;
                self.paddle.clamp_to_field(self.config.field_width);
                log::debug!("Paddle widened to {}", width);
            }
            PowerUpKind::ExtraBall => self.clone_random_ball(),
        }
    }

    /// Duplicate a random live ball with a nudged horizontal direction
    fn clone_random_ball(&mut self) {
        if self.balls.is_empty() {
            log::warn!("Extra ball collected with no live ball to clone");
            return;
        }

        let index = self.rng.random_range(0..self.balls.len());
        let source = self.balls[index].clone();
        let magnitude = 0.2 + self.rng.random::<f32>() * 0.8;
        let sign = if self.rng.random_bool(0.5) { -1.0 } else { 1.0 };
        let nudge = magnitude * sign * self.config.extra_ball_spread;

        let id = self.next_entity_id();
        let vel = Vec2::new(source.vel.x + nudge, source.vel.y)
            .try_normalize()
            .unwrap_or(source.vel);
        self.balls.push(Ball { id, vel, ..source });
        self.push_event(GameEvent::BallSpawned { ball_id: id });
        log::debug!("Extra ball {} cloned ({} live)", id, self.balls.len());
    }

    /// Free every ball riding on the paddle
    pub fn release_balls(&mut self) {
        for ball in self.balls.iter_mut().filter(|b| b.stuck) {
            ball.stuck = false;
            log::debug!("Ball {} released", ball.id);
        }
    }

    /// Running <-> Paused; no effect once Stopped
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::Stopped => GamePhase::Stopped,
        };
        log::info!("Phase: {:?}", self.phase);
    }

    /// Step the time scale, clamped to the allowed range
    pub fn adjust_time_scale(&mut self, delta: i32) {
        let scale = (self.time_scale as i64 + delta as i64)
            .clamp(MIN_TIME_SCALE as i64, MAX_TIME_SCALE as i64);
        self.time_scale = scale as u32;
        log::debug!("Time scale: {}", self.time_scale);
    }
}
