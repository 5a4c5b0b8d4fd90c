//! Render contract
//!
//! The simulation never draws. Hosts take a [`Snapshot`] each frame and
//! either read it directly or replay [`draw_list`] on their canvas.

use glam::Vec2;

use crate::sim::{Ball, Brick, GamePhase, GameState, Paddle, PowerUp, PowerUpKind};

const BACKGROUND: &str = "#000";
const FOREGROUND: &str = "#fff";

/// Read-only view of everything visible
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub field: Vec2,
    pub phase: GamePhase,
    pub time_scale: u32,
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub bricks: &'a [Brick],
    pub power_ups: &'a [PowerUp],
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            field: Vec2::new(state.config.field_width, state.config.field_height),
            phase: state.phase,
            time_scale: state.time_scale,
            paddle: &state.paddle,
            balls: &state.balls,
            bricks: &state.bricks,
            power_ups: &state.power_ups,
        }
    }
}

/// Visual tier of a brick, by remaining health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickTier {
    Gone,
    Cracked,
    Worn,
    Solid,
}

impl BrickTier {
    pub fn from_health(health: u8) -> Self {
        match health {
            0 => BrickTier::Gone,
            1 => BrickTier::Cracked,
            2 => BrickTier::Worn,
            _ => BrickTier::Solid,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BrickTier::Gone => "#fff0",
            BrickTier::Cracked => "#fff4",
            BrickTier::Worn => "#fff8",
            BrickTier::Solid => "#fffd",
        }
    }
}

pub fn power_up_color(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::PadSize => "#60dee6",
        PowerUpKind::ExtraBall => "#72e653",
    }
}

/// One canvas operation, in field coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { size: Vec2, color: &'static str },
    /// Axis-aligned rectangle from its top-left corner
    Rect { min: Vec2, size: Vec2, color: &'static str },
    Circle { center: Vec2, radius: f32, color: &'static str },
}

/// Build the frame: bricks, then power-ups, balls and the paddle on top
pub fn draw_list(snapshot: &Snapshot) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(
        2 + snapshot.bricks.len() + snapshot.power_ups.len() + snapshot.balls.len(),
    );

    commands.push(DrawCommand::Clear {
        size: snapshot.field,
        color: BACKGROUND,
    });

    // One pixel gutter between neighbouring bricks
    for brick in snapshot.bricks {
        commands.push(DrawCommand::Rect {
            min: brick.pos - brick.size / 2.0 + Vec2::ONE,
            size: brick.size - Vec2::splat(2.0),
            color: BrickTier::from_health(brick.health).color(),
        });
    }

    for power_up in snapshot.power_ups {
        commands.push(DrawCommand::Rect {
            min: power_up.pos - power_up.size / 2.0,
            size: power_up.size,
            color: power_up_color(power_up.kind),
        });
    }

    for ball in snapshot.balls {
        commands.push(DrawCommand::Circle {
            center: ball.pos,
            radius: ball.radius,
            color: FOREGROUND,
        });
    }

    let paddle = snapshot.paddle;
    commands.push(DrawCommand::Rect {
        min: paddle.pos - paddle.size / 2.0,
        size: paddle.size,
        color: FOREGROUND,
    });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_brick_tiers() {
        assert_eq!(BrickTier::from_health(0), BrickTier::Gone);
        assert_eq!(BrickTier::from_health(1), BrickTier::Cracked);
        assert_eq!(BrickTier::from_health(2), BrickTier::Worn);
        assert_eq!(BrickTier::from_health(3), BrickTier::Solid);
        assert_eq!(BrickTier::from_health(200), BrickTier::Solid);
    }

    #[test]
    fn test_draw_list_order() {
        let mut state = GameState::new(GameConfig::default(), 5);
        state.spawn_power_up(PowerUpKind::ExtraBall, Vec2::new(100.0, 300.0));
        let snapshot = Snapshot::of(&state);
        let commands = draw_list(&snapshot);

        assert_eq!(commands.len(), 1 + state.bricks.len() + 1 + 1 + 1);
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        assert_eq!(
            commands[1],
            DrawCommand::Rect {
                min: Vec2::new(1.0, 1.0),
                size: Vec2::new(38.0, 18.0),
                color: "#fff4",
            }
        );
        assert_eq!(
            commands[commands.len() - 3],
            DrawCommand::Rect {
                min: Vec2::new(80.0, 290.0),
                size: Vec2::new(40.0, 20.0),
                color: "#72e653",
            }
        );
        assert!(matches!(commands[commands.len() - 2], DrawCommand::Circle { radius, .. } if radius == 6.0));
        assert_eq!(
            commands[commands.len() - 1],
            DrawCommand::Rect {
                min: Vec2::new(350.0, 580.0),
                size: Vec2::new(100.0, 20.0),
                color: "#fff",
            }
        );
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(GameConfig::default(), 5);
        state.toggle_pause();
        state.adjust_time_scale(3);
        let snapshot = Snapshot::of(&state);
        assert_eq!(snapshot.phase, GamePhase::Paused);
        assert_eq!(snapshot.time_scale, 4);
        assert_eq!(snapshot.balls.len(), 1);
        assert_eq!(snapshot.field, Vec2::new(800.0, 600.0));
    }
}
