//! 2D drawing on a host surface
//!
//! [`Surface`] is the host's drawing context; [`Canvas`] layers the engine's
//! drawing operations on top of it. The canvas size is read once from the
//! surface at construction and never changes afterwards.

use std::borrow::Cow;
use std::fmt;

use super::assets::Image;
use super::error::{EngineError, Result};
use super::vector::Vector;

/// A CSS color string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(Cow<'static, str>);

impl Color {
    pub const BLACK: Color = Color(Cow::Borrowed("black"));

    /// Any CSS color, e.g. `"red"` or `"#ff8800"`
    pub fn named(css: impl Into<Cow<'static, str>>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 2x3 affine transform in Canvas 2D `setTransform(a, b, c, d, e, f)` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform2 {
    /// Map a local point to surface coordinates
    pub fn apply(&self, p: Vector) -> Vector {
        Vector::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// Host drawing surface
pub trait Surface {
    /// Pixel width and height
    fn size(&self) -> (f64, f64);

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &Color) -> Result<()>;

    /// Draw `image` into the `w` x `h` box at the local origin under
    /// `transform`. The surface's own transform is unchanged afterwards.
    fn draw_image(&mut self, image: &Image, transform: Transform2, w: f64, h: f64) -> Result<()> {
        let _ = (image, transform, w, h);
        Err(EngineError::NotImplemented {
            type_name: std::any::type_name::<Self>(),
            capability: "draw_image",
        })
    }
}

/// Resolves surface identifiers (e.g. a canvas element id) to surfaces
pub trait SurfaceProvider {
    fn surface(&self, id: &str) -> Option<Box<dyn Surface>>;
}

/// The engine's drawing abstraction
pub struct Canvas {
    surface: Box<dyn Surface>,
    size: Vector,
}

impl Canvas {
    /// Look up surface `id` through the host provider
    pub fn new(provider: &dyn SurfaceProvider, id: &str) -> Result<Self> {
        let surface = provider
            .surface(id)
            .ok_or_else(|| EngineError::SurfaceNotFound { id: id.to_owned() })?;
        Ok(Self::from_surface(surface))
    }

    pub fn from_surface(surface: Box<dyn Surface>) -> Self {
        let (w, h) = surface.size();
        Self {
            surface,
            size: Vector::new(w, h),
        }
    }

    /// Size captured at construction
    pub fn size(&self) -> Vector {
        self.size
    }

    /// Erase the whole surface
    pub fn clear(&mut self) -> Result<()> {
        self.surface.clear_rect(0.0, 0.0, self.size.x, self.size.y)
    }

    pub fn draw_rect(&mut self, top_left: Vector, size: Vector, color: &Color) -> Result<()> {
        self.surface
            .fill_rect(top_left.x, top_left.y, size.x, size.y, color)
    }

    /// Draw an image at its natural size
    pub fn draw_image(&mut self, image: &Image, top_left: Vector) -> Result<()> {
        self.draw_image_scaled(image, top_left, Vector::ONE)
    }

    /// Draw an image scaled per axis. A negative component mirrors the image
    /// on that axis; the top-left corner stays at `top_left` either way.
    pub fn draw_image_scaled(&mut self, image: &Image, top_left: Vector, scale: Vector) -> Result<()> {
        let natural = image.size().ok_or_else(|| {
            EngineError::InvalidArgument(format!("image {} is not loaded yet", image.path()))
        })?;
        let scaled = natural.mult(scale.abs());
        let transform = flip_transform(top_left, scaled, scale);
        self.surface
            .draw_image(image, transform, scaled.x, scaled.y)
    }
}

/// Transform that mirrors on each axis with a negative scale, shifted by the
/// scaled extent so the box still spans `top_left .. top_left + scaled`
fn flip_transform(top_left: Vector, scaled: Vector, scale: Vector) -> Transform2 {
    let flip_x = scale.x < 0.0;
    let flip_y = scale.y < 0.0;
    Transform2 {
        a: if flip_x { -1.0 } else { 1.0 },
        b: 0.0,
        c: 0.0,
        d: if flip_y { -1.0 } else { 1.0 },
        e: top_left.x + if flip_x { scaled.x } else { 0.0 },
        f: top_left.y + if flip_y { scaled.y } else { 0.0 },
    }
}
