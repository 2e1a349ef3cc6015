//! Keyboard state tracking
//!
//! Each key moves through four states. Key events from the host set the
//! edge states (`GoingDown`, `GoingUp`); the once-per-frame retire step
//! turns them into the level states (`Down`, `Up`) after every object has
//! had a chance to see the edge. The game retires with
//! [`Input::retire_seen`] against the copy its objects read, so an edge fed
//! in mid-frame survives into the next one.
//!
//! ```text
//!   key-down event            retire_edges
//!  ──────────────▶ GoingDown ─────────────▶ Down
//!   key-up event              retire_edges
//!  ──────────────▶ GoingUp   ─────────────▶ Up
//! ```
//!
//! Keys that were never pressed have no entry and read as up.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// State of a single tracked key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Released this frame
    GoingUp,
    /// Released for at least one full frame
    Up,
    /// Pressed this frame
    GoingDown,
    /// Held for at least one full frame
    Down,
}

/// Per-game keyboard state, keyed by the host's key string (`" "` for space)
#[derive(Debug, Clone, Default)]
pub struct Input {
    keys: HashMap<String, KeyState>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host key-down signal. Auto-repeat signals are ignored.
    pub fn key_down_event(&mut self, key: &str, repeat: bool) {
        if repeat {
            return;
        }
        self.keys.insert(key.to_owned(), KeyState::GoingDown);
    }

    /// Host key-up signal
    pub fn key_up_event(&mut self, key: &str) {
        self.keys.insert(key.to_owned(), KeyState::GoingUp);
    }

    /// Turn this frame's edges into levels. Runs once per frame, after updates.
    pub fn retire_edges(&mut self) {
        for state in self.keys.values_mut() {
            *state = retired(*state);
        }
    }

    /// Retire only the edges `seen` also had. An edge that arrived after
    /// `seen` was taken stays up for the next frame.
    pub fn retire_seen(&mut self, seen: &Input) {
        for (key, state) in self.keys.iter_mut() {
            if seen.state(key) == Some(*state) {
                *state = retired(*state);
            }
        }
    }

    pub fn state(&self, key: &str) -> Option<KeyState> {
        self.keys.get(key).copied()
    }

    /// True only in the frame the key was pressed
    pub fn key_going_down(&self, key: &str) -> bool {
        self.state(key) == Some(KeyState::GoingDown)
    }

    /// True while the key is held, including the frame it was pressed
    pub fn key_down(&self, key: &str) -> bool {
        matches!(self.state(key), Some(KeyState::GoingDown | KeyState::Down))
    }

    /// True only in the frame the key was released
    pub fn key_going_up(&self, key: &str) -> bool {
        self.state(key) == Some(KeyState::GoingUp)
    }

    /// True while the key is released, including the frame it was released.
    /// Keys that were never pressed count as up.
    pub fn key_up(&self, key: &str) -> bool {
        matches!(self.state(key), None | Some(KeyState::GoingUp | KeyState::Up))
    }

    /// Number of keys that have ever been pressed
    pub fn tracked(&self) -> usize {
        self.keys.len()
    }
}

fn retired(state: KeyState) -> KeyState {
    match state {
        KeyState::GoingDown => KeyState::Down,
        KeyState::GoingUp => KeyState::Up,
        other => other,
    }
}

/// Shared handle to a game's input state
///
/// The game owns one; key sources hold clones so they can feed events in
/// between frames.
pub type InputHandle = Rc<RefCell<Input>>;

/// Host source of key events
///
/// Attached exactly once, when the game loop starts. Events may be fed at
/// any time, including from inside an object's update; those show up in
/// the next frame.
pub trait KeySource {
    fn attach(&mut self, input: InputHandle) -> super::Result<()>;
}
