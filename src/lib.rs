//! Arena Pursuit - a top-down arena where an enemy chases the player and the
//! player shoots back.
//!
//! - `entities`: entity model and roster (pure data)
//! - `compute`: per-variant behaviour and collision resolution
//! - `simulation`: roster owner and frame driver
//! - `render`: render pass against an abstract canvas
//! - `host`: capabilities the core consumes (input, canvas, message pump)
//! - `display` / `input`: crossterm implementations of those capabilities

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod host;
pub mod input;
pub mod render;
pub mod simulation;

pub use config::Config;
pub use error::{ArenaError, Result};
pub use simulation::{FrameReport, GameStatus, Simulation};
