//! Pump Ball - a tiny Canvas 2D game engine and the arcade game built on it
//!
//! Core modules:
//! - `engine`: vectors, collision, input, canvas, assets, objects, frame loop
//! - `platform`: browser and headless host bindings
//! - `settings`: engine configuration
//! - `arcade`: the pump-the-ball game
//! - `score`: best score persistence

pub mod arcade;
pub mod engine;
pub mod platform;
pub mod score;
pub mod settings;

pub use engine::{EngineError, Game, GameObject, Vector};
pub use score::BestScore;
pub use settings::{EngineSettings, FramePacing};

/// Game configuration constants
pub mod consts {
    use crate::engine::Vector;

    /// Key that works the pump (DOM `KeyboardEvent.key` for space)
    pub const PUMP_KEY: &str = " ";

    /// Texture paths, relative to the page
    pub const PUMP_UP_TEXTURE: &str = "pump_up.png";
    pub const PUMP_DOWN_TEXTURE: &str = "pump_down.png";
    pub const BALL_TEXTURE: &str = "ball.png";

    /// Pump placement
    pub const PUMP_POS: Vector = Vector::new(100.0, 420.0);
    pub const PUMP_SCALE: f64 = 0.4;
    /// Pumping time granted by pressing the key (seconds)
    pub const PUMP_STROKE_SECONDS: f64 = 1.5;
    /// Pumping time left after an early release (seconds)
    pub const PUMP_RELEASE_SECONDS: f64 = 0.5;
    /// Pumps per second per second of stroke remaining
    pub const PUMP_STRENGTH: f64 = 1.75;

    /// Ball placement - `pos` is the bottom-left corner
    pub const BALL_POS: Vector = Vector::new(315.0, 710.0);
    pub const BALL_SCALE: f64 = 0.35;
    /// Pumps lost per second
    pub const BALL_DEFLATE_RATE: f64 = 0.35;
    /// Bursts above this
    pub const BALL_MAX_PUMPS: f64 = 25.0;
    /// Extra draw scale per pump
    pub const BALL_GROWTH_PER_PUMP: f64 = 0.1;

    /// Round length when the page does not say
    pub const ROUND_SECONDS: f64 = 30.0;
}
