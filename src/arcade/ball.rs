//! The ball being pumped, and the round clock

use crate::consts::*;
use crate::engine::{Canvas, FrameContext, GameObject, Image, Result, Transform, Vector};

use super::Outcome;

pub struct Ball {
    pub transform: Transform,
    texture: Image,
    /// Accumulated pumps; this is the score
    pumps: f64,
    /// Seconds left in the round
    time_left: f64,
    outcome: Option<Outcome>,
}

impl Ball {
    pub fn new(texture: Image, round_seconds: f64) -> Self {
        Self {
            transform: Transform::new(BALL_POS, Vector::splat(BALL_SCALE)),
            texture,
            pumps: 0.0,
            time_left: round_seconds,
            outcome: None,
        }
    }

    pub fn pump(&mut self, amount: f64) {
        self.pumps += amount;
    }

    pub fn pumps(&self) -> f64 {
        self.pumps
    }

    pub fn time_left(&self) -> f64 {
        self.time_left
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Draw scale, growing with the pumps
    pub fn pumped_scale(&self) -> Vector {
        self.transform.scale * (1.0 + self.pumps * BALL_GROWTH_PER_PUMP)
    }
}

impl GameObject for Ball {
    fn update(&mut self, ctx: &FrameContext<'_>) -> Result<()> {
        if self.outcome.is_some() {
            return Ok(());
        }

        if self.pumps > 0.0 {
            self.pumps -= ctx.delta * BALL_DEFLATE_RATE;
        }

        if self.pumps > BALL_MAX_PUMPS {
            log::info!("Ball burst at {:.2} pumps", self.pumps);
            self.outcome = Some(Outcome::Burst);
            return Ok(());
        }

        self.time_left -= ctx.delta;
        // The clock shows whole seconds; the round ends when it shows 0
        if self.time_left < 0.5 {
            log::info!("Time up with {:.2} pumps", self.pumps);
            self.outcome = Some(Outcome::TimeUp {
                score: round_score(self.pumps),
            });
        }
        Ok(())
    }

    fn draw(&self, canvas: &mut Canvas) -> Result<()> {
        let scale = self.pumped_scale();
        let height = self.texture.size().map_or(0.0, |s| s.y * scale.y);
        // Anchored at the bottom-left so the ball grows upwards
        let top_left = self.transform.pos - Vector::new(0.0, height);
        canvas.draw_image_scaled(&self.texture, top_left, scale)
    }
}

/// Scores are kept to two decimals
pub fn round_score(pumps: f64) -> f64 {
    (pumps * 100.0).round() / 100.0
}
