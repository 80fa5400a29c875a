//! # Tankfront Core
//!
//! Deterministic simulation core for a top-down tank arena.
//!
//! The crate owns the world and its rules; rendering, audio and device input
//! live outside. A host feeds one [`InputState`](input::InputState) per frame
//! into [`Simulation::step`](simulation::Simulation::step) and reads the
//! returned [`TickReport`](output::TickReport) plus the read-only accessors.
//!
//! ## Architecture
//!
//! - **Entities**: tanks and projectiles stored in an id-ordered [`Arena`](arena::Arena)
//! - **Controllers**: the player controller and one AI controller per enemy
//!   turn input or distance into [`Command`](output::Command)s
//! - **Resolvers**: movement, weapons, physics and combat apply the commands
//! - **Providers**: terrain and weather supply movement modifiers; levels,
//!   missions and random events drive progression
//!
//! ## Usage
//!
//! ```
//! use tankfront_core::config::SimConfig;
//! use tankfront_core::input::{InputBuffer, MoveFlags};
//! use tankfront_core::level::LevelCatalog;
//! use tankfront_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(SimConfig::with_seed(1), LevelCatalog::default()).unwrap();
//! let mut input = InputBuffer::new();
//! input.press(MoveFlags::RIGHT);
//!
//! let start = sim.player().unwrap().position;
//! let report = sim.step(&input.take());
//! assert!(sim.player().unwrap().position.x > start.x);
//! assert!(report.game_over().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ai;
pub mod arena;
pub mod camera;
pub mod config;
pub mod entity;
pub mod environment;
pub mod error;
pub mod events;
pub mod input;
pub mod level;
pub mod math;
pub mod mission;
pub mod output;
pub mod resolver;
pub mod simulation;
pub mod time;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use simulation::Simulation;

#[cfg(test)]
mod tests;
