//! Game orchestration: asset gate, frame loop, update/draw dispatch
//!
//! The game does not schedule itself. A driver (the browser's animation
//! frame callback, a timer, or a test) calls [`Game::tick`] with the current
//! time, and the game decides what that tick means:
//!
//! - before [`Game::run`]: nothing
//! - while image loads are pending: nothing, report how many are left
//! - the first tick after the gate opens: attach the key source, then run a
//!   frame with a zero delta
//! - afterwards: one frame per tick
//!
//! A frame is update (every object in registration order, then the input
//! edge retire step) followed by draw (clear, then every object in
//! registration order). An error from any object stops the loop for good.

use super::assets::{Assets, Image, ImageLoader};
use super::canvas::Canvas;
use super::error::Result;
use super::input::{Input, InputHandle, KeySource};
use super::object::{FrameContext, ObjectHandle, Scene};
use crate::settings::EngineSettings;

use std::cell::RefCell;
use std::rc::Rc;

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `run` not yet called
    Idle,
    /// `run` called, waiting for image loads
    Gated,
    /// Frame loop active
    Running,
    /// A frame failed; no further frames
    Stopped,
}

/// What a single call to [`Game::tick`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// `run` has not been called
    Idle,
    /// Still waiting on image loads
    Waiting { pending: usize },
    /// Ran one frame
    Frame { delta: f64 },
    /// The loop has stopped
    Stopped,
}

pub struct Game {
    canvas: Canvas,
    scene: Scene,
    assets: Assets,
    input: InputHandle,
    key_source: Option<Box<dyn KeySource>>,
    settings: EngineSettings,
    phase: Phase,
    start_time: f64,
    last_time: f64,
    frames: u64,
}

impl Game {
    pub fn new(
        canvas: Canvas,
        loader: Box<dyn ImageLoader>,
        key_source: Box<dyn KeySource>,
        settings: EngineSettings,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            canvas,
            scene: Scene::new(),
            assets: Assets::new(loader),
            input: Rc::new(RefCell::new(Input::new())),
            key_source: Some(key_source),
            settings,
            phase: Phase::Idle,
            start_time: 0.0,
            last_time: 0.0,
            frames: 0,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Shared handle to this game's keyboard state
    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Seconds between loop start and the latest frame
    pub fn elapsed(&self) -> f64 {
        match self.phase {
            Phase::Running | Phase::Stopped => (self.last_time - self.start_time) / 1000.0,
            Phase::Idle | Phase::Gated => 0.0,
        }
    }

    /// Register an object at the end of the update/draw order
    pub fn add_object(&self, object: ObjectHandle) {
        self.scene.add(object);
    }

    /// Unregister every entry that is this object
    pub fn remove_object(&self, object: &ObjectHandle) {
        self.scene.remove(object);
    }

    /// Start loading an image; the loop will not start until it finishes
    pub fn load_image(&mut self, path: &str) -> Result<Image> {
        self.assets.load_image(path)
    }

    /// Ask for the loop to start once every image has loaded
    ///
    /// Returns true only for the call that left `Idle`. Drivers must not
    /// schedule frames otherwise.
    pub fn run(&mut self) -> bool {
        if self.phase != Phase::Idle {
            log::warn!("Game::run called again while {:?}, ignoring", self.phase);
            return false;
        }
        log::info!(
            "Waiting for {} of {} images before starting",
            self.assets.pending(),
            self.assets.started()
        );
        self.phase = Phase::Gated;
        true
    }

    /// Advance the game given the current time in milliseconds
    pub fn tick(&mut self, now_ms: f64) -> Result<Tick> {
        match self.phase {
            Phase::Idle => Ok(Tick::Idle),
            Phase::Stopped => Ok(Tick::Stopped),
            Phase::Gated => {
                if !self.assets.is_ready() {
                    return Ok(Tick::Waiting {
                        pending: self.assets.pending(),
                    });
                }
                self.start(now_ms)?;
                self.frame(now_ms)
            }
            Phase::Running => self.frame(now_ms),
        }
    }

    fn start(&mut self, now_ms: f64) -> Result<()> {
        log::info!("All images loaded, starting loop");
        if let Some(mut source) = self.key_source.take() {
            if let Err(e) = source.attach(self.input.clone()) {
                self.phase = Phase::Stopped;
                return Err(e);
            }
        }
        self.start_time = now_ms;
        self.last_time = now_ms;
        self.phase = Phase::Running;
        Ok(())
    }

    fn frame(&mut self, now_ms: f64) -> Result<Tick> {
        let delta = self
            .settings
            .clamp_delta(((now_ms - self.last_time) / 1000.0).max(0.0));
        self.last_time = now_ms;

        let result = self.update(delta).and_then(|()| self.draw());
        if let Err(e) = result {
            log::error!("Frame {} failed, stopping loop: {}", self.frames, e);
            self.phase = Phase::Stopped;
            return Err(e);
        }

        self.frames += 1;
        Ok(Tick::Frame { delta })
    }

    /// Update every object in order, then retire this frame's input edges
    pub fn update(&mut self, delta: f64) -> Result<()> {
        // Key sources may feed events while objects update
        let input = self.input.borrow().clone();
        let ctx = FrameContext {
            delta,
            elapsed: (self.last_time - self.start_time) / 1000.0,
            input: &input,
            scene: &self.scene,
        };
        for object in self.scene.snapshot() {
            object.borrow_mut().update(&ctx)?;
        }
        self.input.borrow_mut().retire_seen(&input);
        Ok(())
    }

    /// Clear the canvas, then draw every object in order
    pub fn draw(&mut self) -> Result<()> {
        self.canvas.clear()?;
        for object in self.scene.snapshot() {
            object.borrow().draw(&mut self.canvas)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::canvas::Color;
    use crate::engine::object::{GameObject, shared};
    use crate::engine::{EngineError, Vector};
    use crate::platform::headless::{
        DrawCommand, DrawLog, ManualLoader, RecordingSurface, ScriptedKeys,
    };
    use std::rc::Weak;

    type EventLog = Rc<RefCell<Vec<String>>>;

    /// Records every call, and what it saw of the space key
    struct Recorder {
        id: &'static str,
        events: EventLog,
        fail_update: bool,
    }

    impl Recorder {
        fn new(id: &'static str, events: &EventLog) -> Self {
            Self {
                id,
                events: events.clone(),
                fail_update: false,
            }
        }
    }

    impl GameObject for Recorder {
        fn update(&mut self, ctx: &FrameContext<'_>) -> Result<()> {
            if self.fail_update {
                return Err(EngineError::InvalidArgument("broken recorder".into()));
            }
            let edge = if ctx.input.key_going_down(" ") { "+edge" } else { "" };
            self.events
                .borrow_mut()
                .push(format!("update {}{}", self.id, edge));
            Ok(())
        }

        fn draw(&self, canvas: &mut Canvas) -> Result<()> {
            self.events.borrow_mut().push(format!("draw {}", self.id));
            canvas.draw_rect(Vector::ZERO, Vector::ONE, &Color::BLACK)
        }
    }

    /// Removes itself from the scene on its first update
    struct Quitter {
        me: Weak<RefCell<Quitter>>,
        events: EventLog,
    }

    impl GameObject for Quitter {
        fn update(&mut self, ctx: &FrameContext<'_>) -> Result<()> {
            self.events.borrow_mut().push("update quitter".into());
            if let Some(me) = self.me.upgrade() {
                let me: ObjectHandle = me;
                ctx.scene.remove(&me);
            }
            Ok(())
        }

        fn draw(&self, _canvas: &mut Canvas) -> Result<()> {
            self.events.borrow_mut().push("draw quitter".into());
            Ok(())
        }
    }

    struct Harness {
        game: Game,
        loader: ManualLoader,
        keys: ScriptedKeys,
        draws: DrawLog,
    }

    fn harness() -> Harness {
        let surface = RecordingSurface::new(800.0, 600.0);
        let draws = surface.log();
        let loader = ManualLoader::new();
        let keys = ScriptedKeys::new();
        let game = Game::new(
            Canvas::from_surface(Box::new(surface)),
            Box::new(loader.clone()),
            Box::new(keys.clone()),
            EngineSettings::default(),
        )
        .unwrap();
        Harness {
            game,
            loader,
            keys,
            draws,
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = Game::new(
            Canvas::from_surface(Box::new(RecordingSurface::new(1.0, 1.0))),
            Box::new(ManualLoader::new()),
            Box::new(ScriptedKeys::new()),
            EngineSettings {
                asset_poll_interval_ms: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_tick_before_run_does_nothing() {
        let mut h = harness();
        assert_eq!(h.game.tick(0.0).unwrap(), Tick::Idle);
        assert_eq!(h.game.frame_count(), 0);
        assert!(!h.keys.is_attached());
    }

    #[test]
    fn test_gate_holds_loop_until_images_load() {
        let mut h = harness();
        let image = h.game.load_image("ball.png").unwrap();
        h.game.load_image("pump.png").unwrap();
        h.game.run();

        assert_eq!(h.game.tick(0.0).unwrap(), Tick::Waiting { pending: 2 });
        h.loader.finish("ball.png", 10.0, 10.0);
        assert_eq!(h.game.tick(100.0).unwrap(), Tick::Waiting { pending: 1 });
        assert_eq!(h.game.phase(), Phase::Gated);
        assert!(!h.keys.is_attached());
        assert!(h.draws.take().is_empty());

        h.loader.finish("pump.png", 10.0, 10.0);
        assert_eq!(h.game.tick(200.0).unwrap(), Tick::Frame { delta: 0.0 });
        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(image.size(), Some(Vector::new(10.0, 10.0)));

        // One loop: each further tick is exactly one frame, key source attached once
        assert_eq!(h.game.tick(250.0).unwrap(), Tick::Frame { delta: 0.05 });
        assert_eq!(h.game.tick(1250.0).unwrap(), Tick::Frame { delta: 1.0 });
        assert_eq!(h.game.frame_count(), 3);
        assert_eq!(h.keys.attach_count(), 1);
        assert_eq!(h.game.elapsed(), 1.05);
    }

    #[test]
    fn test_second_run_is_ignored() {
        let mut h = harness();
        assert!(h.game.run());
        assert!(!h.game.run());
        assert_eq!(h.game.phase(), Phase::Gated);
        h.game.tick(0.0).unwrap();
        assert!(!h.game.run());
        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(h.keys.attach_count(), 1);
    }

    #[test]
    fn test_frame_ordering() {
        let mut h = harness();
        let events = EventLog::default();
        h.game.add_object(shared(Recorder::new("a", &events)));
        h.game.add_object(shared(Recorder::new("b", &events)));
        h.game.run();
        h.game.tick(0.0).unwrap();

        h.keys.press(" ");
        h.game.tick(16.0).unwrap();
        h.game.tick(32.0).unwrap();

        let events = events.borrow();
        assert_eq!(
            events[..],
            [
                "update a", "update b", "draw a", "draw b",
                // Every update sees the edge before it is retired
                "update a+edge", "update b+edge", "draw a", "draw b",
                "update a", "update b", "draw a", "draw b",
            ]
        );
        assert!(h.game.input().borrow().key_down(" "));

        // Each frame clears before drawing
        let draws = h.draws.take();
        assert_eq!(draws.len(), 9);
        for frame in draws.chunks(3) {
            assert!(matches!(frame[0], DrawCommand::Clear { .. }));
        }
    }

    #[test]
    fn test_remove_object() {
        let mut h = harness();
        let events = EventLog::default();
        let a: ObjectHandle = shared(Recorder::new("a", &events));
        h.game.add_object(a.clone());
        h.game.add_object(shared(Recorder::new("b", &events)));
        h.game.run();

        h.game.remove_object(&a);
        h.game.tick(0.0).unwrap();
        assert_eq!(events.borrow()[..], ["update b", "draw b"]);

        // Removing all objects keeps the loop alive
        h.game.remove_object(&h.game.scene().snapshot()[0]);
        assert!(matches!(h.game.tick(16.0).unwrap(), Tick::Frame { .. }));
        assert!(h.game.scene().is_empty());
    }

    #[test]
    fn test_self_removal_during_update() {
        let mut h = harness();
        let events = EventLog::default();
        let quitter = Rc::new_cyclic(|me| {
            RefCell::new(Quitter {
                me: me.clone(),
                events: events.clone(),
            })
        });
        h.game.add_object(quitter);
        h.game.add_object(shared(Recorder::new("b", &events)));
        h.game.run();

        h.game.tick(0.0).unwrap();
        h.game.tick(16.0).unwrap();

        assert_eq!(
            events.borrow()[..],
            ["update quitter", "update b", "draw b", "update b", "draw b"]
        );
    }

    #[test]
    fn test_failing_object_stops_loop() {
        let mut h = harness();
        let events = EventLog::default();
        let broken = shared(Recorder::new("a", &events));
        h.game.add_object(broken.clone());
        h.game.add_object(shared(Recorder::new("b", &events)));
        h.game.run();
        h.game.tick(0.0).unwrap();

        broken.borrow_mut().fail_update = true;
        assert!(h.game.tick(16.0).is_err());
        assert_eq!(h.game.phase(), Phase::Stopped);
        assert_eq!(h.game.tick(32.0).unwrap(), Tick::Stopped);

        // Nothing ran after the failure
        assert_eq!(
            events.borrow()[..],
            ["update a", "update b", "draw a", "draw b"]
        );
        assert_eq!(h.game.frame_count(), 1);
    }

    #[test]
    fn test_delta_clamp() {
        let mut game = Game::new(
            Canvas::from_surface(Box::new(RecordingSurface::new(1.0, 1.0))),
            Box::new(ManualLoader::new()),
            Box::new(ScriptedKeys::new()),
            EngineSettings {
                max_delta_seconds: Some(0.1),
                ..Default::default()
            },
        )
        .unwrap();
        game.run();
        game.tick(0.0).unwrap();
        assert_eq!(game.tick(5000.0).unwrap(), Tick::Frame { delta: 0.1 });
    }

    /// Records the loop clock it sees each frame
    struct Stopwatch {
        seen: Rc<RefCell<Vec<(f64, f64)>>>,
    }

    impl GameObject for Stopwatch {
        fn update(&mut self, ctx: &FrameContext<'_>) -> Result<()> {
            self.seen.borrow_mut().push((ctx.delta, ctx.elapsed));
            Ok(())
        }

        fn draw(&self, _canvas: &mut Canvas) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_objects_see_elapsed_time() {
        let mut h = harness();
        let seen = Rc::new(RefCell::new(Vec::new()));
        h.game.add_object(shared(Stopwatch { seen: seen.clone() }));
        h.game.run();
        h.game.tick(1000.0).unwrap();
        h.game.tick(1250.0).unwrap();
        h.game.tick(2000.0).unwrap();
        assert_eq!(seen.borrow()[..], [(0.0, 0.0), (0.25, 0.25), (0.75, 1.0)]);
    }

    /// Presses space from inside its own update, once
    struct Presser {
        keys: ScriptedKeys,
        pressed: bool,
    }

    impl GameObject for Presser {
        fn update(&mut self, _ctx: &FrameContext<'_>) -> Result<()> {
            if !self.pressed {
                self.keys.press(" ");
                self.pressed = true;
            }
            Ok(())
        }

        fn draw(&self, _canvas: &mut Canvas) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_key_fed_during_update_lands_next_frame() {
        let mut h = harness();
        let events = EventLog::default();
        h.game.add_object(shared(Presser {
            keys: h.keys.clone(),
            pressed: false,
        }));
        h.game.add_object(shared(Recorder::new("a", &events)));
        h.game.run();
        h.game.tick(0.0).unwrap();
        h.game.tick(16.0).unwrap();
        h.game.tick(32.0).unwrap();

        let updates: Vec<_> = events
            .borrow()
            .iter()
            .filter(|e| e.starts_with("update"))
            .cloned()
            .collect();
        assert_eq!(updates, ["update a", "update a+edge", "update a"]);
        assert!(h.game.input().borrow().key_down(" "));
    }
}
