//! Terminal input tracking.
//!
//! Input model: rather than acting on each key event, we record the frame of
//! the last press/repeat for every key and treat a key as held while that
//! record is fresh (within `HOLD_WINDOW` frames).
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (kitty protocol): proper
//!   `Press` / `Repeat` / `Release` events, so keys drop on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated presses). Keys expire after `HOLD_WINDOW` frames of silence.
//!
//! With release events enabled a key is held from press to release with no
//! expiry, since the first OS repeat can be many frames after the press.
//!
//! The mouse drives aim and the trigger: left button down/up sets the
//! trigger, motion moves the pointer.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use glam::Vec2;

use crate::host::{InputSource, Key};

/// A key counts as held if its last press/repeat arrived within this many
/// frames. At ~60 FPS this is ~67 ms, under the usual OS repeat interval.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

pub struct InputTracker {
    /// Each held key → the frame it was last seen.
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    /// Terminal reports key releases, so a press holds until its release.
    release_events: bool,
    trigger: bool,
    /// A left click seen since the last `begin_frame`, kept even if the
    /// release arrived in the same drain.
    click_pending: bool,
    pointer: Vec2,
    world: Vec2,
    cols: u16,
    rows: u16,
}

impl InputTracker {
    /// `rows` is the full terminal height; the bottom row is not arena.
    pub fn new(world: Vec2, cols: u16, rows: u16) -> Self {
        let mut tracker = Self {
            key_frame: HashMap::new(),
            frame: 0,
            release_events: false,
            trigger: false,
            click_pending: false,
            pointer: world / 2.0,
            world,
            cols: 0,
            rows: 0,
        };
        tracker.resize(cols, rows);
        tracker
    }

    /// Switch to release-driven holds (keyboard enhancement active).
    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.release_events = enabled;
        self
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.saturating_sub(1).max(1);
    }

    /// Start a new frame; key freshness is measured against this counter.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.click_pending = false;
    }

    /// World point at the centre of a terminal cell.
    pub fn cell_to_world(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.world.x / self.cols as f32,
            (row as f32 + 0.5) * self.world.y / self.rows as f32,
        )
    }

    pub fn handle(&mut self, event: &Event) -> Signal {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Signal::Continue
            }
            Event::Resize(cols, rows) => {
                self.resize(*cols, *rows);
                Signal::Continue
            }
            _ => Signal::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Signal {
        match key.kind {
            KeyEventKind::Press => {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Signal::Quit;
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Signal::Quit;
                    }
                    _ => {}
                }
                self.key_frame.insert(key.code, self.frame);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(key.code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key.code);
            }
        }
        Signal::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let at = self.cell_to_world(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.trigger = true;
                self.click_pending = true;
                self.pointer = at;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.trigger = false;
                self.pointer = at;
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = at;
            }
            _ => {}
        }
    }

    fn is_held(&self, code: &KeyCode) -> bool {
        if self.release_events {
            return self.key_frame.contains_key(code);
        }
        self.key_frame
            .get(code)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}

fn bindings(key: Key) -> [KeyCode; 3] {
    match key {
        Key::Up => [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
        Key::Down => [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
        Key::Left => [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
        Key::Right => [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
    }
}

impl InputSource for InputTracker {
    fn key_held(&self, key: Key) -> bool {
        bindings(key).iter().any(|code| self.is_held(code))
    }

    fn trigger_held(&self) -> bool {
        self.trigger || self.click_pending
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }
}
