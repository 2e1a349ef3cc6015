//! Engine core
//!
//! Host-independent: vectors, collision tests, keyboard state, the canvas
//! abstraction, image loading, game objects and the frame loop. Hosts plug
//! in through the [`Surface`], [`SurfaceProvider`], [`ImageLoader`] and
//! [`KeySource`] traits.

pub mod assets;
pub mod canvas;
pub mod collision;
pub mod error;
pub mod game;
pub mod input;
pub mod object;
pub mod vector;

pub use assets::{AssetGate, Assets, Image, ImageLoader};
pub use canvas::{Canvas, Color, Surface, SurfaceProvider, Transform2};
pub use collision::{circle_with_circle, point_in_circle, point_in_rect, rect_with_rect};
pub use error::{EngineError, Result};
pub use game::{Game, Phase, Tick};
pub use input::{Input, InputHandle, KeySource, KeyState};
pub use object::{FrameContext, GameObject, ObjectHandle, Scene, Transform, shared};
pub use vector::Vector;
