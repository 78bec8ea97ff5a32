//! Capabilities the core consumes from its host.
//!
//! The simulation never polls devices or draws pixels itself; it is handed
//! an `InputSource` each frame and a `Canvas` to render into, and the
//! `Platform` decides when the loop stops.

use glam::Vec2;

use crate::entities::Color;
use crate::error::Result;
use crate::simulation::GameStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

/// Input state as of the current frame.
pub trait InputSource {
    fn key_held(&self, key: Key) -> bool;
    /// Primary fire button.
    fn trigger_held(&self) -> bool;
    /// Pointer position in world coordinates.
    fn pointer(&self) -> Vec2;
}

pub trait Canvas {
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32);
}

/// Window / terminal plumbing around the frame loop.
pub trait Platform {
    type Input: InputSource;
    type Canvas: Canvas;

    /// Pump pending host messages. `false` means shut down.
    fn process_messages(&mut self) -> Result<bool>;
    fn input(&self) -> &Self::Input;
    fn canvas(&mut self) -> &mut Self::Canvas;
    /// Show the finished frame; blocks until the next frame is due.
    fn present(&mut self, status: GameStatus) -> Result<()>;
}

/// Plain snapshot of input, for headless drivers and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub trigger: bool,
    pub pointer: Vec2,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_pointer(mut self, x: f32, y: f32) -> Self {
        self.pointer = Vec2::new(x, y);
        self
    }

    pub fn with_trigger(mut self, held: bool) -> Self {
        self.trigger = held;
        self
    }
}

impl InputSource for FrameInput {
    fn key_held(&self, key: Key) -> bool {
        match key {
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Left => self.left,
            Key::Right => self.right,
        }
    }

    fn trigger_held(&self) -> bool {
        self.trigger
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }
}
