//! Levels: authored definitions and per-level objective tracking.
//!
//! # Example
//!
//! ```
//! use tankfront_core::level::{LevelCatalog, LevelManager};
//! use tankfront_core::time::SimTime;
//! use glam::Vec2;
//!
//! let catalog = LevelCatalog::default();
//! let mut levels = LevelManager::new(catalog.first(), SimTime::ZERO);
//! let update = levels.update(Vec2::new(300.0, 300.0), 5, SimTime::ZERO);
//! assert!(update.complete);
//! ```

pub mod config;
pub mod manager;

pub use config::{EnemySpawn, LevelCatalog, LevelConfig, Objective, ObjectiveKind};
pub use manager::{LevelManager, ObjectiveUpdate, CHECKPOINT_RADIUS};
