//! Simulation configuration.
//!
//! [`SimConfig`] carries the world geometry, the master seed, and the tuning
//! values of the orchestrator. Formula constants that are part of the game
//! rules (armor factor, AI ranges, modifier tables) live as `pub const`s in
//! the module that owns them.
//!
//! # Example
//!
//! ```
//! use tankfront_core::config::SimConfig;
//!
//! let config = SimConfig::with_seed(7);
//! assert_eq!(config.seed, 7);
//! assert!(config.validate().is_ok());
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Default world edge length in world units.
pub const DEFAULT_WORLD_SIZE: f32 = 3000.0;

/// Default frame interval (roughly 60 frames per second).
pub const DEFAULT_TICK_MS: u64 = 16;

/// Enemies spawn at least this far from the world edges.
pub const SPAWN_MARGIN: f32 = 100.0;

/// Configuration for a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master seed for every random stream in the simulation.
    pub seed: u64,
    /// World width and height.
    pub world_size: Vec2,
    /// Viewport width and height (used by the camera and weather particles).
    pub viewport_size: Vec2,
    /// Simulated milliseconds advanced by [`Simulation::step`](crate::simulation::Simulation::step).
    pub tick_ms: u64,
    /// Minimum time between two player shots.
    pub player_fire_interval_ms: u64,
    /// Distance travelled by a projectile per tick.
    pub projectile_speed: f32,
    /// Damage carried by every projectile.
    pub projectile_damage: f32,
    /// Distance from the tank center to the muzzle along the turret heading.
    pub muzzle_offset: f32,
    /// Center-to-center distance under which a projectile hits a tank.
    pub hit_radius: f32,
    /// Global cooldown between two player ability triggers.
    pub ability_cooldown_ms: u64,
    /// Score awarded for each destroyed enemy.
    pub score_per_kill: u32,
    /// Experience awarded to the player for each enemy it destroys.
    pub experience_per_kill: u32,
    /// Whether terrain obstacles absorb projectiles.
    pub obstacles_absorb_projectiles: bool,
    /// Whether the random event manager runs.
    pub random_events: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_size: Vec2::splat(DEFAULT_WORLD_SIZE),
            viewport_size: Vec2::new(800.0, 600.0),
            tick_ms: DEFAULT_TICK_MS,
            player_fire_interval_ms: 500,
            projectile_speed: 10.0,
            projectile_damage: 20.0,
            muzzle_offset: 30.0,
            hit_radius: 25.0,
            ability_cooldown_ms: 10_000,
            score_per_kill: 100,
            experience_per_kill: 50,
            obstacles_absorb_projectiles: true,
            random_events: true,
        }
    }
}

impl SimConfig {
    /// Returns the default configuration with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Checks that the geometry and timing values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] when the world leaves no room for
    /// the spawn band, a viewport size is not positive, the viewport is larger
    /// than the world, or the tick interval is zero.
    pub fn validate(&self) -> SimResult<()> {
        let min_world = 2.0 * SPAWN_MARGIN;
        if self.world_size.x <= min_world || self.world_size.y <= min_world {
            return Err(SimError::InvalidConfig(format!(
                "world size must exceed {min_world} on both axes, got {}x{}",
                self.world_size.x, self.world_size.y
            )));
        }
        if self.viewport_size.x <= 0.0 || self.viewport_size.y <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "viewport size must be positive, got {}x{}",
                self.viewport_size.x, self.viewport_size.y
            )));
        }
        if self.viewport_size.x > self.world_size.x || self.viewport_size.y > self.world_size.y {
            return Err(SimError::InvalidConfig(
                "viewport must fit inside the world".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(SimError::InvalidConfig("tick_ms must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_rejected() {
        let config = SimConfig {
            tick_ms: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_viewport_rejected() {
        let config = SimConfig {
            viewport_size: Vec2::new(4000.0, 600.0),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_world_rejected() {
        let config = SimConfig {
            world_size: Vec2::new(-1.0, 100.0),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn world_without_spawn_band_rejected() {
        let config = SimConfig {
            world_size: Vec2::splat(2.0 * SPAWN_MARGIN),
            viewport_size: Vec2::splat(100.0),
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let narrow = SimConfig {
            world_size: Vec2::new(3000.0, 150.0),
            viewport_size: Vec2::splat(100.0),
            ..SimConfig::default()
        };
        assert!(narrow.validate().is_err());

        let smallest = SimConfig {
            world_size: Vec2::splat(2.0 * SPAWN_MARGIN + 1.0),
            viewport_size: Vec2::splat(100.0),
            ..SimConfig::default()
        };
        assert!(smallest.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"seed": 99, "tick_ms": 20}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.hit_radius, 25.0);
    }
}
