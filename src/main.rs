//! Pump Ball entry point
//!
//! In the browser: builds the game on `#canvas`, wires the `#timer` and
//! `#score` elements and runs the frame loop. Natively: plays a scripted
//! round headlessly and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::ops::ControlFlow;
    use std::rc::Rc;

    use pump_ball::arcade::PumpBall;
    use pump_ball::consts::ROUND_SECONDS;
    use pump_ball::engine::{EngineError, Game, Result, Tick};
    use pump_ball::platform::web;
    use pump_ball::{BestScore, EngineSettings};

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    /// Round length from the page's `#timer` element
    fn round_seconds() -> f64 {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("timer"))
            .and_then(|el| el.text_content())
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(ROUND_SECONDS)
    }

    fn end_round(pump_ball: &PumpBall, best: &mut BestScore) {
        let Some(outcome) = pump_ball.outcome() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };

        let _ = window.alert_with_message(&outcome.message());
        if let Some(score) = outcome.score() {
            if best.record(score, js_sys::Date::now()) {
                best.save();
                set_text("score", &best.display());
            }
        }
        let _ = window.location().reload();
    }

    pub fn run() -> Result<()> {
        let settings = EngineSettings::load();
        let mut best = BestScore::load();
        set_text("score", &best.display());

        let mut game = web::new_game(settings)?;
        let pump_ball = PumpBall::setup(&mut game, round_seconds())?;
        let game = Rc::new(RefCell::new(game));

        let hook = Box::new(move |_game: &Game, tick: Tick| {
            if !matches!(tick, Tick::Frame { .. }) {
                return ControlFlow::Continue(());
            }
            set_text("timer", &pump_ball.clock().to_string());
            if pump_ball.outcome().is_some() {
                end_round(&pump_ball, &mut best);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });

        if !web::start(game, hook) {
            return Err(EngineError::InvalidArgument("game already started".into()));
        }
        log::info!("Pump Ball running!");
        Ok(())
    }

    pub fn report(e: &EngineError) {
        log::error!("Pump Ball failed to start: {}", e);
        set_text("timer", "error");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Pump Ball starting...");
    if let Err(e) = wasm_game::run() {
        wasm_game::report(&e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pump Ball (native) starting...");
    log::info!("Native mode plays a scripted round - run with `trunk serve` for the web version");

    match headless_round() {
        Ok(Some(outcome)) => println!("{}", outcome.message()),
        Ok(None) => println!("Round did not finish"),
        Err(e) => {
            log::error!("Headless round failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Play one round with a simulated clock, tapping the pump every 0.4 s
#[cfg(not(target_arch = "wasm32"))]
fn headless_round() -> pump_ball::engine::Result<Option<pump_ball::arcade::Outcome>> {
    use pump_ball::arcade::PumpBall;
    use pump_ball::consts::{PUMP_KEY, ROUND_SECONDS};
    use pump_ball::engine::{Canvas, Game, Tick};
    use pump_ball::platform::headless::{HeadlessSurfaces, ManualLoader, ScriptedKeys};
    use pump_ball::{BestScore, EngineSettings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const TAP_EVERY_FRAMES: u64 = 24;

    let settings = EngineSettings::load();
    let mut surfaces = HeadlessSurfaces::default();
    surfaces.insert(&settings.canvas_id, 800.0, 800.0);
    let draws = surfaces.log();
    let mut draw_calls = 0;

    let loader = ManualLoader::new();
    let keys = ScriptedKeys::new();
    let poll_ms = settings.asset_poll_interval_ms as f64;
    let mut game = Game::new(
        Canvas::new(&surfaces, &settings.canvas_id)?,
        Box::new(loader.clone()),
        Box::new(keys.clone()),
        settings,
    )?;
    let pump_ball = PumpBall::setup(&mut game, ROUND_SECONDS)?;
    if !game.run() {
        return Ok(None);
    }

    let mut now = 0.0;
    let mut polls = 0;
    loop {
        match game.tick(now)? {
            Tick::Waiting { pending } => {
                polls += 1;
                // Pretend the textures arrive after a few polls
                if polls == 3 {
                    log::info!("Finishing {} image loads", pending);
                    loader.finish_all(256.0, 256.0);
                }
                now += poll_ms;
            }
            Tick::Frame { .. } => {
                draw_calls += draws.take().len();
                if let Some(outcome) = pump_ball.outcome() {
                    log::info!(
                        "Round over after {} frames, {} draw calls",
                        game.frame_count(),
                        draw_calls
                    );
                    let mut best = BestScore::load();
                    if let Some(score) = outcome.score() {
                        if best.record(score, now) {
                            best.save();
                        }
                    }
                    return Ok(Some(outcome));
                }

                let frame = game.frame_count();
                if frame % TAP_EVERY_FRAMES == 0 {
                    keys.press(PUMP_KEY);
                } else if frame % TAP_EVERY_FRAMES == TAP_EVERY_FRAMES / 2 {
                    keys.release(PUMP_KEY);
                }
                now += FRAME_MS;
            }
            Tick::Idle | Tick::Stopped => return Ok(None),
        }
    }
}
