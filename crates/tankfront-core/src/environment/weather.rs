//! Weather state: modifier lookups and the particle field.
//!
//! Particles live in viewport coordinates and exist only so the presentation
//! layer can draw them; the simulation reads nothing but the two modifiers.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chance that a weather instance is at night.
pub const NIGHT_PROBABILITY: f64 = 0.3;
/// Visibility multiplier applied at night.
pub const NIGHT_VISIBILITY_FACTOR: f32 = 0.7;
/// Animation clock advance per update.
pub const ANIMATION_STEP: f32 = 0.016;
/// Per-update chance of lightning while raining.
pub const LIGHTNING_PROBABILITY: f64 = 0.001;
/// How long (animation clock) a lightning flash stays visible.
pub const LIGHTNING_FLASH: f32 = 0.1;

/// Weather type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    /// Clear skies.
    Clear,
    /// Rain with occasional lightning.
    Rain,
    /// Snowfall.
    Snow,
    /// Fog.
    Fog,
}

impl WeatherKind {
    /// Every weather kind.
    pub const ALL: [Self; 4] = [Self::Clear, Self::Rain, Self::Snow, Self::Fog];

    /// Daytime visibility multiplier.
    #[must_use]
    pub const fn base_visibility(self) -> f32 {
        match self {
            Self::Clear => 1.0,
            Self::Rain => 0.8,
            Self::Snow => 0.7,
            Self::Fog => 0.5,
        }
    }

    /// Movement multiplier.
    #[must_use]
    pub const fn movement_modifier(self) -> f32 {
        match self {
            Self::Clear => 1.0,
            Self::Rain => 0.9,
            Self::Snow => 0.7,
            Self::Fog => 0.95,
        }
    }

    /// Size of the particle field.
    #[must_use]
    pub const fn particle_count(self) -> usize {
        match self {
            Self::Clear => 50,
            Self::Rain => 200,
            Self::Snow => 150,
            Self::Fog => 100,
        }
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "clear"),
            Self::Rain => write!(f, "rain"),
            Self::Snow => write!(f, "snow"),
            Self::Fog => write!(f, "fog"),
        }
    }
}

/// One weather particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Viewport position.
    pub position: Vec2,
    /// Drift speed, 1 to 3.
    pub speed: f32,
    /// Draw size, 1 to 4.
    pub size: f32,
    /// Draw opacity.
    pub opacity: f32,
}

/// Weather of the active level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    kind: WeatherKind,
    night: bool,
    particles: Vec<Particle>,
    viewport: Vec2,
    time: f32,
    lightning_at: Option<f32>,
}

impl Weather {
    /// Creates weather of `kind`; night is rolled once here.
    pub fn new<R: Rng>(kind: WeatherKind, viewport: Vec2, rng: &mut R) -> Self {
        let night = rng.gen_bool(NIGHT_PROBABILITY);
        let mut weather = Self {
            kind,
            night,
            particles: Vec::new(),
            viewport,
            time: 0.0,
            lightning_at: None,
        };
        weather.spawn_particles(rng);
        weather
    }

    fn spawn_particles<R: Rng>(&mut self, rng: &mut R) {
        let viewport = self.viewport;
        self.particles = (0..self.kind.particle_count())
            .map(|_| Particle {
                position: Vec2::new(rng.gen_range(0.0..viewport.x), rng.gen_range(0.0..viewport.y)),
                speed: rng.gen_range(1.0..3.0),
                size: rng.gen_range(1.0..4.0),
                opacity: rng.gen_range(0.5..1.0),
            })
            .collect();
    }

    /// Visibility multiplier (a hook; not applied to AI detection).
    #[must_use]
    pub fn visibility_modifier(&self) -> f32 {
        let base = self.kind.base_visibility();
        if self.night {
            base * NIGHT_VISIBILITY_FACTOR
        } else {
            base
        }
    }

    /// Movement multiplier.
    #[must_use]
    pub const fn movement_modifier(&self) -> f32 {
        self.kind.movement_modifier()
    }

    /// Advances the particle animation by one tick.
    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        self.time += ANIMATION_STEP;
        let time = self.time;
        let viewport = self.viewport;

        for particle in &mut self.particles {
            match self.kind {
                WeatherKind::Rain => {
                    particle.position.y += particle.speed * 15.0;
                    particle.position.x += particle.speed * 2.0;
                }
                WeatherKind::Snow => {
                    particle.position.y += particle.speed * 2.0;
                    particle.position.x += (time + particle.position.y * 0.1).sin() * 2.0;
                }
                WeatherKind::Fog => {
                    particle.position.x += (time + particle.position.y * 0.1).sin() * 0.5;
                    particle.opacity = (time * 0.5 + particle.position.x * 0.01).sin() * 0.3 + 0.7;
                }
                WeatherKind::Clear => {}
            }

            if particle.position.y > viewport.y {
                particle.position.y = -10.0;
                particle.position.x = rng.gen_range(0.0..viewport.x);
            }
            if particle.position.x > viewport.x {
                particle.position.x = 0.0;
            }
        }

        if self.kind == WeatherKind::Rain && rng.gen_bool(LIGHTNING_PROBABILITY) {
            self.lightning_at = Some(self.time);
        }
    }

    /// Switches the weather kind and respawns the particle field. Night is kept.
    pub fn set_kind<R: Rng>(&mut self, kind: WeatherKind, rng: &mut R) {
        self.kind = kind;
        self.lightning_at = None;
        self.spawn_particles(rng);
    }

    /// Resizes the particle field's bounds.
    pub fn update_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Weather type.
    #[must_use]
    pub const fn kind(&self) -> WeatherKind {
        self.kind
    }

    /// Whether it is night.
    #[must_use]
    pub const fn is_night(&self) -> bool {
        self.night
    }

    /// Particle field, in viewport coordinates.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether a lightning flash is visible right now.
    #[must_use]
    pub fn lightning_active(&self) -> bool {
        self.lightning_at
            .is_some_and(|at| self.time - at < LIGHTNING_FLASH)
    }
}
