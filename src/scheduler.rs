//! Fixed-timestep scheduler
//!
//! Accumulates wall-clock frame time and runs as many fixed simulation
//! ticks as it covers, so physics stays at one rate whatever the display
//! refresh rate is.

use crate::config::{ConfigError, GameConfig};
use crate::consts::MAX_SUBSTEPS;
use crate::input::{Action, Keyboard};
use crate::render::Snapshot;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Owns the game state and drives it from frame callbacks
///
/// Ticks queue [`GameEvent`]s; hosts call [`Scheduler::drain_events`] once
/// per frame so the queue doesn't grow without bound.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub state: GameState,
    accumulator: f32,
    input: TickInput,
    /// Simulation ticks run so far
    updates: u64,
    /// Frames fed so far
    renders: u64,
}

impl Scheduler {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(config, seed),
            accumulator: 0.0,
            input: TickInput::default(),
            updates: 0,
            renders: 0,
        })
    }

    /// Apply pressed actions and latch held movement from the keyboard
    pub fn poll_input(&mut self, keyboard: &mut Keyboard) {
        for action in keyboard.take_pressed() {
            self.handle_action(action);
        }
        self.input.move_left = keyboard.is_held(Action::MoveLeft);
        self.input.move_right = keyboard.is_held(Action::MoveRight);
    }

    /// React to one edge-triggered action
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::TogglePause => self.state.toggle_pause(),
            // Latched until a tick consumes it, so a release while paused lands on resume
            Action::ReleaseBall => self.input.release = true,
            Action::SlowDown => self.state.adjust_time_scale(1),
            Action::SpeedUp => self.state.adjust_time_scale(-1),
            Action::MoveLeft | Action::MoveRight => {}
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Feed one frame's elapsed seconds; returns how many ticks ran
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        self.renders += 1;

        // Time doesn't pile up while paused or after game over
        if self.state.phase != GamePhase::Running {
            return 0;
        }

        let fixed_dt = self.state.config.fixed_dt;
        self.accumulator += frame_dt.clamp(0.0, self.state.config.max_frame_dt);

        let mut substeps = 0;
        while self.accumulator >= fixed_dt && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= fixed_dt;
            substeps += 1;
            self.updates += 1;

            // Clear one-shot inputs after processing
            self.input.release = false;

            if self.state.phase == GamePhase::Stopped {
                self.accumulator = 0.0;
                break;
            }
        }

        substeps
    }

    /// Take events queued by the ticks run since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(&self.state)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}
