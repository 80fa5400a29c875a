//! Terrain and weather modifier providers.
//!
//! Both providers are regenerated from a seeded stream whenever a level is
//! loaded. The orchestrator only consults them for movement multipliers and
//! projectile absorption; everything else they hold is for presentation.

pub mod terrain;
pub mod weather;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use terrain::{Obstacle, ObstacleKind, Terrain, TerrainKind, Tile};
pub use weather::{Particle, Weather, WeatherKind};

/// The terrain and weather of the active level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Ground features.
    pub terrain: Terrain,
    /// Sky conditions.
    pub weather: Weather,
}

impl Environment {
    /// Generates both providers for a level, each from its own stream.
    pub fn generate<T: Rng, W: Rng>(
        terrain: TerrainKind,
        weather: WeatherKind,
        world_size: Vec2,
        viewport_size: Vec2,
        terrain_rng: &mut T,
        weather_rng: &mut W,
    ) -> Self {
        Self {
            terrain: Terrain::generate(terrain, world_size, terrain_rng),
            weather: Weather::new(weather, viewport_size, weather_rng),
        }
    }

    /// Combined terrain and weather movement multiplier at `position`.
    #[must_use]
    pub fn movement_modifier(&self, position: Vec2) -> f32 {
        self.terrain.movement_modifier(position) * self.weather.movement_modifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generate(seed: u64, weather_seed: u64) -> Environment {
        Environment::generate(
            TerrainKind::Snow,
            WeatherKind::Snow,
            Vec2::splat(3000.0),
            Vec2::new(800.0, 600.0),
            &mut ChaCha8Rng::seed_from_u64(seed),
            &mut ChaCha8Rng::seed_from_u64(weather_seed),
        )
    }

    #[test]
    fn terrain_ignores_the_weather_stream() {
        assert_eq!(generate(1, 2).terrain, generate(1, 3).terrain);
        assert_eq!(generate(1, 2).weather, generate(4, 2).weather);
    }

    #[test]
    fn modifiers_multiply() {
        let mut env = generate(1, 1);
        env.terrain = Terrain::with_features(
            TerrainKind::Snow,
            vec![Tile { position: Vec2::ZERO, variant: 1 }],
            vec![],
        );
        assert!((env.movement_modifier(Vec2::ZERO) - 0.42).abs() < 1e-6);
        assert!((env.movement_modifier(Vec2::splat(1500.0)) - 0.7).abs() < 1e-6);
    }
}
