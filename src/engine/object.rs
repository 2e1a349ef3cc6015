//! Game objects and the scene that holds them
//!
//! A game object is anything with per-frame `update` and `draw` behavior.
//! Both are required trait methods, so an object that forgets one does not
//! compile.
//!
//! Objects are shared as `Rc<RefCell<T>>`: the scene owns one reference, and
//! gameplay code may keep its own (or a `Weak`) to couple objects together,
//! e.g. a pump that inflates a ball.

use std::cell::RefCell;
use std::rc::Rc;

use super::canvas::Canvas;
use super::error::Result;
use super::input::Input;
use super::vector::Vector;

/// Everything an object can look at while updating
pub struct FrameContext<'a> {
    /// Seconds since the previous frame
    pub delta: f64,
    /// Seconds since the loop started
    pub elapsed: f64,
    /// Keyboard state for this frame
    pub input: &'a Input,
    /// The scene being updated; objects may add or remove entries
    pub scene: &'a Scene,
}

/// Per-frame update and draw behavior
pub trait GameObject {
    fn update(&mut self, ctx: &FrameContext<'_>) -> Result<()>;

    fn draw(&self, canvas: &mut Canvas) -> Result<()>;

    /// Used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared reference to a registered object
pub type ObjectHandle = Rc<RefCell<dyn GameObject>>;

/// Wrap an object so it can be registered and still be referenced by
/// gameplay code
pub fn shared<T: GameObject>(object: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(object))
}

/// Position and scale common to drawable objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub pos: Vector,
    pub scale: Vector,
}

impl Transform {
    pub fn new(pos: Vector, scale: Vector) -> Self {
        Self { pos, scale }
    }
}

/// Ordered collection of registered objects
///
/// Cloning gives another handle to the same collection. Iteration during a
/// frame works on a snapshot, so objects may add or remove entries (even
/// themselves) from inside `update` without disturbing the current pass.
#[derive(Clone, Default)]
pub struct Scene {
    objects: Rc<RefCell<Vec<ObjectHandle>>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object. Draw order is registration order.
    pub fn add(&self, object: ObjectHandle) {
        // The object may be mid-update and re-registering itself
        if let Ok(o) = object.try_borrow() {
            log::debug!("Registered {}", o.name());
        }
        self.objects.borrow_mut().push(object);
    }

    /// Remove every entry that is the same object. No-op if absent.
    pub fn remove(&self, object: &ObjectHandle) -> usize {
        let mut objects = self.objects.borrow_mut();
        let before = objects.len();
        objects.retain(|o| !Rc::ptr_eq(o, object));
        let removed = before - objects.len();
        if removed > 0 {
            log::debug!("Removed {} scene entries", removed);
        }
        removed
    }

    pub fn contains(&self, object: &ObjectHandle) -> bool {
        self.objects.borrow().iter().any(|o| Rc::ptr_eq(o, object))
    }

    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }

    /// Current entries in order
    pub fn snapshot(&self) -> Vec<ObjectHandle> {
        self.objects.borrow().clone()
    }
}
