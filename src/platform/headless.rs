//! In-memory host bindings
//!
//! A surface that records draw calls, an image loader finished by hand, and
//! a key source fed from code. Used by tests and by the native binary.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::{
    Color, Image, ImageLoader, InputHandle, KeySource, Result, Surface, SurfaceProvider,
    Transform2,
};

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    Image {
        path: String,
        transform: Transform2,
        w: f64,
        h: f64,
    },
}

/// Shared list of recorded draw calls
#[derive(Debug, Clone, Default)]
pub struct DrawLog(Rc<RefCell<Vec<DrawCommand>>>);

impl DrawLog {
    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    fn push(&self, cmd: DrawCommand) {
        self.0.borrow_mut().push(cmd);
    }
}

/// Surface that records every call instead of drawing
pub struct RecordingSurface {
    width: f64,
    height: f64,
    log: DrawLog,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            log: DrawLog::default(),
        }
    }

    /// Handle to this surface's draw log
    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }

    /// Provider that knows a single surface id
    pub fn provider(id: &str, width: f64, height: f64) -> HeadlessSurfaces {
        let mut surfaces = HeadlessSurfaces::default();
        surfaces.insert(id, width, height);
        surfaces
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.log.push(DrawCommand::Clear { x, y, w, h });
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &Color) -> Result<()> {
        self.log.push(DrawCommand::Rect {
            x,
            y,
            w,
            h,
            color: color.as_str().to_owned(),
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &Image, transform: Transform2, w: f64, h: f64) -> Result<()> {
        self.log.push(DrawCommand::Image {
            path: image.path().to_owned(),
            transform,
            w,
            h,
        });
        Ok(())
    }
}

/// Named recording surfaces, all sharing one draw log
#[derive(Default)]
pub struct HeadlessSurfaces {
    sizes: HashMap<String, (f64, f64)>,
    log: DrawLog,
}

impl HeadlessSurfaces {
    pub fn insert(&mut self, id: &str, width: f64, height: f64) {
        self.sizes.insert(id.to_owned(), (width, height));
    }

    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }
}

impl SurfaceProvider for HeadlessSurfaces {
    fn surface(&self, id: &str) -> Option<Box<dyn Surface>> {
        let (width, height) = *self.sizes.get(id)?;
        Some(Box::new(RecordingSurface {
            width,
            height,
            log: self.log.clone(),
        }))
    }
}

/// Image loader whose loads finish only when told to
#[derive(Clone, Default)]
pub struct ManualLoader {
    waiting: Rc<RefCell<Vec<Image>>>,
}

impl ManualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the first waiting load of `path`
    pub fn finish(&self, path: &str, width: f64, height: f64) -> bool {
        let mut waiting = self.waiting.borrow_mut();
        let Some(idx) = waiting.iter().position(|i| i.path() == path) else {
            return false;
        };
        let image = waiting.remove(idx);
        drop(waiting);
        image.finish(width, height, None)
    }

    /// Finish every waiting load with the same size
    pub fn finish_all(&self, width: f64, height: f64) {
        let images: Vec<Image> = self.waiting.borrow_mut().drain(..).collect();
        for image in images {
            image.finish(width, height, None);
        }
    }
}

impl ImageLoader for ManualLoader {
    fn load(&mut self, image: Image) {
        self.waiting.borrow_mut().push(image);
    }
}

/// Key source driven from code
#[derive(Clone, Default)]
pub struct ScriptedKeys {
    input: Rc<RefCell<Option<InputHandle>>>,
    attaches: Rc<Cell<usize>>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.input.borrow().is_some()
    }

    pub fn attach_count(&self) -> usize {
        self.attaches.get()
    }

    /// Deliver a key-down. Dropped if the game has not attached yet.
    pub fn press(&self, key: &str) {
        if let Some(input) = self.input.borrow().as_ref() {
            input.borrow_mut().key_down_event(key, false);
        }
    }

    /// Deliver an auto-repeat key-down
    pub fn repeat(&self, key: &str) {
        if let Some(input) = self.input.borrow().as_ref() {
            input.borrow_mut().key_down_event(key, true);
        }
    }

    pub fn release(&self, key: &str) {
        if let Some(input) = self.input.borrow().as_ref() {
            input.borrow_mut().key_up_event(key);
        }
    }
}

impl KeySource for ScriptedKeys {
    fn attach(&mut self, input: InputHandle) -> Result<()> {
        *self.input.borrow_mut() = Some(input);
        self.attaches.set(self.attaches.get() + 1);
        Ok(())
    }
}
