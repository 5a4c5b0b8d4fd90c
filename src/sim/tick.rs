//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one fixed step.

use glam::Vec2;

use super::collision::{Overlap, circle_rect_overlap, rect_rect_overlap};
use super::state::{Ball, Brick, GameEvent, GamePhase, GameState, Paddle, PowerUpKind};
use crate::config::GameConfig;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move paddle left (held)
    pub move_left: bool,
    /// Move paddle right (held)
    pub move_right: bool,
    /// Release stuck balls (one-shot)
    pub release: bool,
    /// Idle/demo mode - AI steers the paddle
    pub autopilot: bool,
}

/// Velocity flips gathered from all contacts of one ball in one tick
#[derive(Debug, Default, Clone, Copy)]
struct Flips {
    x: bool,
    y: bool,
}

impl Flips {
    /// Flip the axis the contact pushed along most (ties flip y)
    fn record(&mut self, hit: &Overlap) {
        if hit.direction.x.abs() > hit.direction.y.abs() {
            self.x = true;
        } else {
            self.y = true;
        }
    }

    fn apply(self, vel: &mut Vec2) {
        if self.x {
            vel.x = -vel.x;
        }
        if self.y {
            vel.y = -vel.y;
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;
    let dt = state.scaled_dt();

    // Idle/demo mode - AI plays the game
    let mut input = input.clone();
    if input.autopilot {
        steer_autopilot(state, &mut input, dt);
    }

    // --- PADDLE ---
    let direction = input.move_right as i32 - input.move_left as i32;
    state.paddle.pos.x += direction as f32 * state.config.paddle_speed * dt;
    state.paddle.clamp_to_field(state.config.field_width);

    if input.release {
        state.release_balls();
    }

    // --- BALLS ---
    let mut drops: Vec<(PowerUpKind, Vec2)> = Vec::new();
    let mut events: Vec<GameEvent> = Vec::new();
    let mut survivors = Vec::with_capacity(state.balls.len());

    for mut ball in std::mem::take(&mut state.balls) {
        let alive = step_ball(
            &mut ball,
            &state.paddle,
            &mut state.bricks,
            &state.config,
            dt,
            &mut drops,
            &mut events,
        );
        if alive {
            survivors.push(ball);
        } else {
            log::debug!("Ball {} lost at {:?}", ball.id, ball.pos);
            events.push(GameEvent::BallLost { ball_id: ball.id });
        }
    }

    state.balls = survivors;
    state.bricks.retain(|b| b.health > 0);
    for event in events {
        state.push_event(event);
    }
    for (kind, pos) in drops {
        state.spawn_power_up(kind, pos);
    }

    // --- END OF ROUND ---
    if state.balls.is_empty() {
        state.phase = GamePhase::Stopped;
        state.push_event(GameEvent::GameOver);
        log::info!(
            "Game over after {} ticks ({} bricks left)",
            state.time_ticks,
            state.bricks.len()
        );
        return;
    }

    // --- POWER-UPS ---
    let fall = state.config.power_up_speed * dt;
    let field_height = state.config.field_height;
    for mut power_up in std::mem::take(&mut state.power_ups) {
        power_up.pos.y += fall;

        if rect_rect_overlap(
            state.paddle.pos,
            state.paddle.size,
            power_up.pos,
            power_up.size,
        ) {
            log::debug!("Power-up {} collected: {:?}", power_up.id, power_up.kind);
            state.apply_power_up(power_up.kind);
            state.push_event(GameEvent::PowerUpCollected {
                power_up_id: power_up.id,
                kind: power_up.kind,
            });
        } else if state.config.expire_power_ups
            && power_up.pos.y - power_up.size.y / 2.0 > field_height
        {
            state.push_event(GameEvent::PowerUpMissed {
                power_up_id: power_up.id,
                kind: power_up.kind,
            });
        } else {
            state.power_ups.push(power_up);
        }
    }
}

/// Move one ball and resolve its contacts; returns false once it has fallen out
fn step_ball(
    ball: &mut Ball,
    paddle: &Paddle,
    bricks: &mut [Brick],
    config: &GameConfig,
    dt: f32,
    drops: &mut Vec<(PowerUpKind, Vec2)>,
    events: &mut Vec<GameEvent>,
) -> bool {
    if ball.stuck {
        ball.pos.x = paddle.pos.x + ball.stuck_offset;
    } else {
        ball.pos += ball.vel * config.ball_speed * dt;
    }

    let mut flips = Flips::default();

    // --- BRICKS --- every overlapping brick takes damage, no early exit
    for brick in bricks.iter_mut().filter(|b| b.health > 0) {
        let hit = match circle_rect_overlap(ball.pos, ball.radius, brick.pos, brick.size) {
            Ok(Some(hit)) => hit,
            Ok(None) => continue,
            Err(err) => {
                log::warn!("Ball {} vs brick {}: {}, contact skipped", ball.id, brick.id, err);
                events.push(GameEvent::DegenerateContact { ball_id: ball.id });
                continue;
            }
        };

        brick.health -= 1;
        events.push(GameEvent::BrickHit {
            brick_id: brick.id,
            health: brick.health,
        });
        if brick.health == 0 {
            events.push(GameEvent::BrickDestroyed {
                brick_id: brick.id,
                power_up: brick.power_up,
            });
            if let Some(kind) = brick.power_up {
                drops.push((kind, brick.pos));
            }
        }

        flips.record(&hit);
    }

    // --- PADDLE ---
    match circle_rect_overlap(ball.pos, ball.radius, paddle.pos, paddle.size) {
        Ok(Some(hit)) => {
            ball.pos += hit.direction * hit.amount;

            // Aim by where on the paddle the ball landed
            let hit_fraction = (ball.pos.x - paddle.pos.x) / paddle.size.x;
            match Vec2::new(ball.vel.x + hit_fraction, ball.vel.y).try_normalize() {
                Some(vel) => ball.vel = vel,
                None => {
                    log::warn!("Ball {}: zero rebound direction off paddle, keeping velocity", ball.id);
                    events.push(GameEvent::DegenerateContact { ball_id: ball.id });
                }
            }

            flips.record(&hit);
        }
        Ok(None) => {}
        Err(err) => {
            log::warn!("Ball {} vs paddle: {}, contact skipped", ball.id, err);
            events.push(GameEvent::DegenerateContact { ball_id: ball.id });
        }
    }

    flips.apply(&mut ball.vel);

    // --- WALLS --- reflect away from whichever wall was reached
    let r = ball.radius;
    if ball.pos.x - r <= 0.0 {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
    } else if ball.pos.x + r >= config.field_width {
        ball.pos.x = config.field_width - r;
        ball.vel.x = -ball.vel.x.abs();
    }

    if ball.pos.y - r <= 0.0 {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
    } else if ball.pos.y + r >= config.field_height {
        ball.pos.y = config.field_height - r;
        ball.vel.y = -ball.vel.y.abs();
    }

    // Touching the floor loses the ball
    ball.pos.y + r < config.field_height
}

/// Track the most dangerous ball and launch stuck ones
fn steer_autopilot(state: &GameState, input: &mut TickInput, dt: f32) {
    if state.balls.iter().any(|b| b.stuck) {
        input.release = true;
    }

    // Lowest descending ball, else the lowest ball overall
    let target = state
        .balls
        .iter()
        .filter(|b| !b.stuck && b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| {
            state
                .balls
                .iter()
                .filter(|b| !b.stuck)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        });

    // Pickups are worth chasing only while nothing is falling toward the floor
    let falling = state
        .balls
        .iter()
        .any(|b| !b.stuck && b.vel.y > 0.0 && b.pos.y > state.config.field_height * 0.5);
    let pickup = if falling {
        None
    } else {
        state
            .power_ups
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|p| p.pos.x)
    };

    let Some(target_x) = pickup.or(target.map(|b| b.pos.x)) else {
        input.move_left = false;
        input.move_right = false;
        return;
    };

    // Aim slightly off-centre so rebounds don't settle into a vertical loop
    let offset = (state.time_ticks as f32 * 0.002).sin() * state.paddle.size.x * 0.2;
    let delta = target_x + offset - state.paddle.pos.x;
    let step = state.config.paddle_speed * dt;
    input.move_left = delta < -step;
    input.move_right = delta > step;
}
