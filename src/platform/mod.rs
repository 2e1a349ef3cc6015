//! Platform abstraction layer
//!
//! Host bindings for the engine traits:
//! - `web`: browser canvas, image elements, document key events, frame driver
//! - `headless`: in-memory versions for tests and the native binary

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;
