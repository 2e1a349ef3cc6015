//! Browser host bindings
//!
//! - `<canvas>` elements as drawing surfaces (Canvas 2D context)
//! - `HtmlImageElement` image loading
//! - document key events
//! - the frame driver (`requestAnimationFrame` or `setTimeout`)

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

use crate::engine::{
    Canvas, Color, EngineError, Game, Image, ImageLoader, InputHandle, KeySource, Result, Surface,
    SurfaceProvider, Tick, Transform2,
};
use crate::settings::{EngineSettings, FramePacing};

fn host_err(e: JsValue) -> EngineError {
    EngineError::Host(format!("{:?}", e))
}

/// A `<canvas>` element's 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.ctx.clear_rect(x, y, w, h);
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &Color) -> Result<()> {
        self.ctx.set_fill_style_str(color.as_str());
        self.ctx.fill_rect(x, y, w, h);
        Ok(())
    }

    fn draw_image(&mut self, image: &Image, t: Transform2, w: f64, h: f64) -> Result<()> {
        let ctx = &self.ctx;
        image
            .with_native(|el: &HtmlImageElement| -> Result<()> {
                ctx.save();
                let drawn = ctx
                    .set_transform(t.a, t.b, t.c, t.d, t.e, t.f)
                    .and_then(|()| {
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(el, 0.0, 0.0, w, h)
                    });
                ctx.restore();
                drawn.map_err(host_err)
            })
            .unwrap_or_else(|| {
                Err(EngineError::InvalidArgument(format!(
                    "image {} has no decoded element",
                    image.path()
                )))
            })
    }
}

/// Resolves surface ids to `<canvas>` elements in the current document
pub struct DocumentSurfaces;

impl SurfaceProvider for DocumentSurfaces {
    fn surface(&self, id: &str) -> Option<Box<dyn Surface>> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Box::new(CanvasSurface { canvas, ctx }))
    }
}

/// Loads images through `HtmlImageElement`
pub struct WebImageLoader;

impl ImageLoader for WebImageLoader {
    fn load(&mut self, image: Image) {
        let el = match HtmlImageElement::new() {
            Ok(el) => el,
            Err(e) => {
                log::error!("Failed to create image element for {}: {:?}", image.path(), e);
                return;
            }
        };
        let path = image.path().to_owned();

        let onload = {
            let el = el.clone();
            Closure::once(move || {
                let (w, h) = (el.natural_width() as f64, el.natural_height() as f64);
                image.finish(w, h, Some(Box::new(el)));
            })
        };
        el.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let onerror = {
            let path = path.clone();
            Closure::once(move || {
                log::warn!("Image {} failed to load, the game will not start", path);
            })
        };
        el.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        el.set_src(&path);
    }
}

/// Key events from the document
pub struct DocumentKeys;

impl KeySource for DocumentKeys {
    fn attach(&mut self, input: InputHandle) -> Result<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| EngineError::Host("no document".into()))?;

        {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                input
                    .borrow_mut()
                    .key_down_event(&event.key(), event.repeat());
            });
            document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .map_err(host_err)?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                input.borrow_mut().key_up_event(&event.key());
            });
            document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                .map_err(host_err)?;
            closure.forget();
        }

        log::debug!("Keyboard listeners attached");
        Ok(())
    }
}

/// Build a game on the document's canvas with browser image and key sources
pub fn new_game(settings: EngineSettings) -> Result<Game> {
    let canvas = Canvas::new(&DocumentSurfaces, &settings.canvas_id)?;
    Game::new(
        canvas,
        Box::new(WebImageLoader),
        Box::new(DocumentKeys),
        settings,
    )
}

/// Called after every tick; `Break` stops the loop
pub type FrameHook = Box<dyn FnMut(&Game, Tick) -> ControlFlow<()>>;

struct FrameDriver {
    game: Rc<RefCell<Game>>,
    hook: FrameHook,
    pacing: FramePacing,
}

/// Run the game: wait for its images, then tick it once per host frame.
/// Returns false, scheduling nothing, if the game was already started.
pub fn start(game: Rc<RefCell<Game>>, hook: FrameHook) -> bool {
    let (gate, pacing) = {
        let mut g = game.borrow_mut();
        if !g.run() {
            return false;
        }
        (g.assets().ready(), g.settings().pacing)
    };

    wasm_bindgen_futures::spawn_local(async move {
        gate.await;
        let driver = Rc::new(RefCell::new(FrameDriver { game, hook, pacing }));
        step(driver);
    });
    true
}

fn schedule(driver: Rc<RefCell<FrameDriver>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window, frame loop stopped");
        return;
    };
    let interval = driver.borrow().pacing.interval_ms();
    let closure = Closure::once(move || step(driver));

    let scheduled = match interval {
        None => window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map(|_| ()),
        Some(ms) => window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ms.round() as i32,
            )
            .map(|_| ()),
    };
    if let Err(e) = scheduled {
        log::error!("Failed to schedule frame: {:?}", e);
    }
    closure.forget();
}

fn step(driver: Rc<RefCell<FrameDriver>>) {
    let flow = {
        let mut d = driver.borrow_mut();
        let FrameDriver { game, hook, .. } = &mut *d;
        let tick = game.borrow_mut().tick(js_sys::Date::now());
        match tick {
            Ok(Tick::Stopped) => ControlFlow::Break(()),
            Ok(tick) => hook(&game.borrow(), tick),
            Err(e) => {
                log::error!("Game loop stopped: {}", e);
                ControlFlow::Break(())
            }
        }
    };

    if flow.is_continue() {
        schedule(driver);
    }
}
