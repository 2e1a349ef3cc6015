//! The hand pump, worked with the space bar

use std::cell::RefCell;
use std::rc::Weak;

use crate::consts::*;
use crate::engine::{Canvas, FrameContext, GameObject, Image, Result, Transform, Vector};

use super::ball::Ball;

pub struct PumpTextures {
    pub up: Image,
    pub down: Image,
}

pub struct Pump {
    pub transform: Transform,
    textures: PumpTextures,
    /// Not owned; the scene owns the ball
    ball: Weak<RefCell<Ball>>,
    /// Seconds of pumping left from the current stroke
    timer: f64,
    pumping: bool,
}

impl Pump {
    pub fn new(textures: PumpTextures, ball: Weak<RefCell<Ball>>) -> Self {
        Self {
            transform: Transform::new(PUMP_POS, Vector::splat(PUMP_SCALE)),
            textures,
            ball,
            timer: 0.0,
            pumping: false,
        }
    }

    pub fn is_pumping(&self) -> bool {
        self.pumping
    }

    pub fn timer(&self) -> f64 {
        self.timer
    }
}

impl GameObject for Pump {
    fn update(&mut self, ctx: &FrameContext<'_>) -> Result<()> {
        self.pumping = ctx.input.key_down(PUMP_KEY);

        if ctx.input.key_going_down(PUMP_KEY) {
            self.timer = PUMP_STROKE_SECONDS;
        }

        // Letting go early cuts the stroke short
        if ctx.input.key_going_up(PUMP_KEY) && self.timer > PUMP_RELEASE_SECONDS {
            self.timer = PUMP_RELEASE_SECONDS;
        }

        if self.timer > 0.0 {
            if let Some(ball) = self.ball.upgrade() {
                ball.borrow_mut()
                    .pump(self.timer * PUMP_STRENGTH * ctx.delta);
            }
        }

        self.timer -= ctx.delta;
        Ok(())
    }

    fn draw(&self, canvas: &mut Canvas) -> Result<()> {
        let texture = if self.pumping {
            &self.textures.down
        } else {
            &self.textures.up
        };
        canvas.draw_image_scaled(texture, self.transform.pos, self.transform.scale)
    }
}
