//! Brickfall entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use brickfall::render::{DrawCommand, draw_list};
    use brickfall::sim::GameEvent;
    use brickfall::{GameConfig, Keyboard, Scheduler};

    /// Game instance holding all state
    struct Game {
        scheduler: Scheduler,
        keyboard: Keyboard,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks for one display frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.scheduler.poll_input(&mut self.keyboard);
            self.scheduler.frame(dt);

            for event in self.scheduler.drain_events() {
                if event == GameEvent::GameOver {
                    log::info!(
                        "Game over - {} updates over {} frames",
                        self.scheduler.updates(),
                        self.scheduler.renders()
                    );
                }
            }
        }

        /// Replay the draw list on the 2D context
        fn render(&self) {
            let snapshot = self.scheduler.snapshot();
            for command in draw_list(&snapshot) {
                match command {
                    DrawCommand::Clear { size, color } => {
                        self.ctx.set_fill_style_str(color);
                        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
                    }
                    DrawCommand::Rect { min, size, color } => {
                        self.ctx.set_fill_style_str(color);
                        self.ctx
                            .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                    }
                    DrawCommand::Circle {
                        center,
                        radius,
                        color,
                    } => {
                        self.ctx.set_fill_style_str(color);
                        self.ctx.begin_path();
                        if let Err(err) = self.ctx.arc(
                            center.x as f64,
                            center.y as f64,
                            radius as f64,
                            0.0,
                            std::f64::consts::TAU,
                        ) {
                            log::warn!("Failed to draw circle: {:?}", err);
                        }
                        self.ctx.close_path();
                        self.ctx.fill();
                    }
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Brickfall starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")?
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let config = GameConfig::default();
        canvas.set_width(config.field_width as u32);
        canvas.set_height(config.field_height as u32);

        let seed = js_sys::Date::now() as u64;
        let keyboard = Keyboard::new(config.bindings.clone());
        let scheduler =
            Scheduler::new(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            scheduler,
            keyboard,
            ctx,
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone())?;
        request_animation_frame(game);

        log::info!("Brickfall running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.key_down(&event.code());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur - keyups never arrive, so drop held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keyboard.release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickfall (native) starting...");
    log::info!("Native mode runs a headless autopilot session - serve the wasm build to play");

    if let Err(err) = headless::run(std::env::args().nth(1)) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brickfall::sim::{GameEvent, GamePhase};
    use brickfall::{ConfigError, GameConfig, Scheduler};

    /// Simulated display rate
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after two simulated minutes
    const MAX_FRAMES: u32 = 60 * 120;

    #[derive(thiserror::Error, Debug)]
    pub enum RunError {
        #[error("could not read config {path}: {source}")]
        Read {
            path: String,
            source: std::io::Error,
        },
        #[error(transparent)]
        Config(#[from] ConfigError),
    }

    /// Play one autopilot session and log a summary
    pub fn run(config_path: Option<String>) -> Result<(), RunError> {
        let config = match config_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| RunError::Read { path: path.clone(), source })?;
                log::info!("Loaded config from {}", path);
                GameConfig::from_json(&json)?
            }
            None => GameConfig::default(),
        };

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut scheduler = Scheduler::new(config, seed)?;
        scheduler.set_autopilot(true);

        let mut bricks_destroyed = 0u32;
        let mut power_ups_collected = 0u32;
        let mut frames = 0;
        while frames < MAX_FRAMES && scheduler.phase() == GamePhase::Running {
            scheduler.frame(FRAME_DT);
            frames += 1;

            for event in scheduler.drain_events() {
                match event {
                    GameEvent::BrickDestroyed { .. } => bricks_destroyed += 1,
                    GameEvent::PowerUpCollected { kind, .. } => {
                        power_ups_collected += 1;
                        log::debug!("Collected {:?}", kind);
                    }
                    _ => {}
                }
            }

            if scheduler.state.bricks.is_empty() {
                log::info!("Field cleared!");
                break;
            }
        }

        log::info!(
            "Session over after {:.1}s: {:?}, {} bricks destroyed ({} left), {} power-ups, {} balls live, {} updates / {} frames",
            frames as f32 * FRAME_DT,
            scheduler.phase(),
            bricks_destroyed,
            scheduler.state.bricks.len(),
            power_ups_collected,
            scheduler.state.balls.len(),
            scheduler.updates(),
            scheduler.renders()
        );
        Ok(())
    }
}
