//! Image loading and the asset gate
//!
//! Loads are started through [`Assets::load_image`] and finished by the host
//! loader calling [`Image::finish`]. The game loop does not start until every
//! started load has finished; [`Assets::ready`] is the future that resolves
//! at that point.
//!
//! A load that never finishes keeps the gate closed forever. There is no
//! timeout.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use super::error::{EngineError, Result};
use super::vector::Vector;

/// Count of unfinished loads plus whoever is waiting on them
#[derive(Default)]
struct GateState {
    pending: Cell<usize>,
    waiters: RefCell<Vec<Waker>>,
}

impl GateState {
    fn begin(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    fn complete(&self) {
        let pending = self.pending.get().saturating_sub(1);
        self.pending.set(pending);
        if pending == 0 {
            for waker in self.waiters.borrow_mut().drain(..) {
                waker.wake();
            }
        }
    }
}

struct ImageInner {
    path: String,
    size: Cell<Option<Vector>>,
    native: RefCell<Option<Box<dyn Any>>>,
    gate: Rc<GateState>,
}

/// Handle to an image that is loading or loaded
///
/// Cheap to clone; clones refer to the same image.
#[derive(Clone)]
pub struct Image {
    inner: Rc<ImageInner>,
}

impl Image {
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Natural pixel size, known once loaded
    pub fn size(&self) -> Option<Vector> {
        self.inner.size.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.size().is_some()
    }

    /// Mark the load complete. `native` is the host's decoded image, if any.
    ///
    /// Returns false (and changes nothing) if the image already finished.
    pub fn finish(&self, width: f64, height: f64, native: Option<Box<dyn Any>>) -> bool {
        if self.is_loaded() {
            return false;
        }
        self.inner.size.set(Some(Vector::new(width, height)));
        *self.inner.native.borrow_mut() = native;
        log::debug!("Loaded image {} ({}x{})", self.path(), width, height);
        self.inner.gate.complete();
        true
    }

    /// Run `f` on the host payload if it exists and has type `T`
    pub fn with_native<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let native = self.inner.native.borrow();
        native.as_ref()?.downcast_ref::<T>().map(f)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("path", &self.inner.path)
            .field("size", &self.inner.size.get())
            .finish()
    }
}

/// Host image decoder
///
/// Must eventually call [`Image::finish`] on success. On failure it simply
/// never does.
pub trait ImageLoader {
    fn load(&mut self, image: Image);
}

/// Registry of started image loads
pub struct Assets {
    gate: Rc<GateState>,
    loader: Box<dyn ImageLoader>,
    started: usize,
}

impl Assets {
    pub fn new(loader: Box<dyn ImageLoader>) -> Self {
        Self {
            gate: Rc::new(GateState::default()),
            loader,
            started: 0,
        }
    }

    /// Start loading an image. The handle is drawable once the load finishes.
    pub fn load_image(&mut self, path: &str) -> Result<Image> {
        if path.is_empty() {
            return Err(EngineError::InvalidArgument("image path is empty".into()));
        }

        self.gate.begin();
        self.started += 1;
        let image = Image {
            inner: Rc::new(ImageInner {
                path: path.to_owned(),
                size: Cell::new(None),
                native: RefCell::new(None),
                gate: self.gate.clone(),
            }),
        };
        log::debug!("Loading image {}", path);
        self.loader.load(image.clone());
        Ok(image)
    }

    /// Loads started but not yet finished
    pub fn pending(&self) -> usize {
        self.gate.pending.get()
    }

    /// Total loads ever started
    pub fn started(&self) -> usize {
        self.started
    }

    pub fn is_ready(&self) -> bool {
        self.pending() == 0
    }

    /// Future that resolves once no loads are pending
    pub fn ready(&self) -> AssetGate {
        AssetGate {
            gate: self.gate.clone(),
        }
    }
}

/// Resolves when every started image load has finished
pub struct AssetGate {
    gate: Rc<GateState>,
}

impl Future for AssetGate {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.gate.pending.get() == 0 {
            return Poll::Ready(());
        }
        self.gate.waiters.borrow_mut().push(cx.waker().clone());
        Poll::Pending
    }
}
