//! Pump the ball
//!
//! Hold or tap space to work the pump. Each stroke inflates the ball for a
//! while; the ball slowly deflates on its own. Score as many pumps as
//! possible before the clock runs out, without bursting the ball.

pub mod ball;
pub mod pump;

pub use ball::{Ball, round_score};
pub use pump::{Pump, PumpTextures};

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::*;
use crate::engine::{Game, Result, shared};

/// How a round ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Pumped past the limit; no score
    Burst,
    /// The clock ran out
    TimeUp { score: f64 },
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Burst => "The ball was pumped too much!".to_string(),
            Outcome::TimeUp { score } => format!("Timer ran out, you scored {:.2}", score),
        }
    }

    /// Score worth saving, if any
    pub fn score(&self) -> Option<f64> {
        match self {
            Outcome::Burst => None,
            Outcome::TimeUp { score } => Some(*score),
        }
    }
}

/// The pump and ball, registered with a game
pub struct PumpBall {
    pub pump: Rc<RefCell<Pump>>,
    pub ball: Rc<RefCell<Ball>>,
}

impl PumpBall {
    /// Load textures and register the objects (pump first, so it draws
    /// behind the ball)
    pub fn setup(game: &mut Game, round_seconds: f64) -> Result<Self> {
        let textures = PumpTextures {
            up: game.load_image(PUMP_UP_TEXTURE)?,
            down: game.load_image(PUMP_DOWN_TEXTURE)?,
        };
        let ball = shared(Ball::new(game.load_image(BALL_TEXTURE)?, round_seconds));
        let pump = shared(Pump::new(textures, Rc::downgrade(&ball)));

        game.add_object(pump.clone());
        game.add_object(ball.clone());
        Ok(Self { pump, ball })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.ball.borrow().outcome().cloned()
    }

    pub fn pumps(&self) -> f64 {
        self.ball.borrow().pumps()
    }

    /// Whole seconds shown on the clock
    pub fn clock(&self) -> i64 {
        self.ball.borrow().time_left().round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Canvas, Tick, Vector};
    use crate::platform::headless::{
        DrawCommand, DrawLog, ManualLoader, RecordingSurface, ScriptedKeys,
    };
    use crate::settings::EngineSettings;

    fn setup() -> (Game, PumpBall, ScriptedKeys, DrawLog) {
        let surface = RecordingSurface::new(800.0, 800.0);
        let draws = surface.log();
        let loader = ManualLoader::new();
        let keys = ScriptedKeys::new();
        let mut game = Game::new(
            Canvas::from_surface(Box::new(surface)),
            Box::new(loader.clone()),
            Box::new(keys.clone()),
            EngineSettings::default(),
        )
        .unwrap();
        let pump_ball = PumpBall::setup(&mut game, ROUND_SECONDS).unwrap();
        game.run();
        assert!(matches!(game.tick(0.0).unwrap(), Tick::Waiting { pending: 3 }));
        loader.finish_all(100.0, 100.0);
        game.tick(0.0).unwrap();
        (game, pump_ball, keys, draws)
    }

    #[test]
    fn test_stroke_pumps_the_ball() {
        let (mut game, pb, keys, _) = setup();

        keys.press(" ");
        game.tick(100.0).unwrap();
        assert!(pb.pump.borrow().is_pumping());
        // 1.5 * 1.75 * 0.1 pumped, then 0.35 * 0.1 deflated
        assert!((pb.pumps() - (0.2625 - 0.035)).abs() < 1e-9);
        assert!((pb.pump.borrow().timer() - 1.4).abs() < 1e-9);

        // Early release cuts the stroke to half a second
        keys.release(" ");
        game.tick(200.0).unwrap();
        assert!(!pb.pump.borrow().is_pumping());
        assert!((pb.pump.borrow().timer() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_ball_deflates() {
        let (mut game, pb, keys, _) = setup();
        keys.press(" ");
        game.tick(100.0).unwrap();
        keys.release(" ");
        for i in 2..=7 {
            game.tick(i as f64 * 100.0).unwrap();
        }
        // The stroke is spent by now
        let after_stroke = pb.pumps();
        assert!(after_stroke > 0.0);

        for i in 8..=12 {
            game.tick(i as f64 * 100.0).unwrap();
        }
        assert!(pb.pumps() < after_stroke);
        assert!(pb.pumps() > 0.0);
    }

    #[test]
    fn test_overpumping_bursts() {
        let (mut game, pb, keys, _) = setup();
        let mut now = 0.0;
        while pb.outcome().is_none() && now < 30_000.0 {
            keys.press(" ");
            now += 100.0;
            game.tick(now).unwrap();
        }
        assert_eq!(pb.outcome(), Some(Outcome::Burst));
        assert_eq!(Outcome::Burst.score(), None);
    }

    #[test]
    fn test_clock_runs_out() {
        let (mut game, pb, _, _) = setup();
        for s in 1..=29 {
            game.tick(s as f64 * 1000.0).unwrap();
        }
        assert_eq!(pb.outcome(), None);
        assert_eq!(pb.clock(), 1);

        game.tick(30_000.0).unwrap();
        let outcome = pb.outcome().unwrap();
        assert_eq!(outcome, Outcome::TimeUp { score: 0.0 });
        assert_eq!(outcome.message(), "Timer ran out, you scored 0.00");
    }

    #[test]
    fn test_draws_pump_then_ball_anchored_at_bottom() {
        let (_, _, _, draws) = setup();
        let cmds = draws.take();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], DrawCommand::Clear { .. }));

        let DrawCommand::Image { path, transform, .. } = &cmds[1] else {
            panic!("expected pump image");
        };
        assert_eq!(path, PUMP_UP_TEXTURE);
        assert_eq!(transform.apply(Vector::ZERO), PUMP_POS);

        let DrawCommand::Image { path, transform, w, h } = &cmds[2] else {
            panic!("expected ball image");
        };
        assert_eq!(path, BALL_TEXTURE);
        assert!((w - 35.0).abs() < 1e-9 && (h - 35.0).abs() < 1e-9);
        let top_left = transform.apply(Vector::ZERO);
        assert!((top_left.x - 315.0).abs() < 1e-9);
        assert!((top_left.y - 675.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(3.14159), 3.14);
        assert_eq!(round_score(0.005), 0.01);
    }
}
