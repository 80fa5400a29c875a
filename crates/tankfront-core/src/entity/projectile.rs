//! Projectile entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::math::direction;

/// A shell in flight.
///
/// Velocity is fixed at creation from the firing angle and speed. Once
/// deactivated, a projectile never becomes active again; the arena purges
/// inactive projectiles at the end of each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// World position.
    pub position: Vec2,
    velocity: Vec2,
    damage: f32,
    owner: EntityId,
    active: bool,
}

impl Projectile {
    /// Creates an active projectile.
    ///
    /// # Arguments
    ///
    /// * `owner` - Tank that fired it; never hit by its own shell
    /// * `position` - Muzzle position
    /// * `angle` - Firing angle in radians
    /// * `speed` - Distance per tick
    /// * `damage` - Raw damage on impact
    #[must_use]
    pub fn new(owner: EntityId, position: Vec2, angle: f32, speed: f32, damage: f32) -> Self {
        Self {
            position,
            velocity: direction(angle) * speed,
            damage,
            owner,
            active: true,
        }
    }

    /// Moves the projectile by one tick of velocity.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Marks the projectile spent.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Whether the projectile is still in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Per-tick displacement.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// The tank that fired this projectile.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_ticks_at_speed_ten_reach_one_hundred() {
        let mut shell = Projectile::new(EntityId::new(1), Vec2::ZERO, 0.0, 10.0, 20.0);
        for _ in 0..10 {
            shell.advance();
        }
        assert!((shell.position.x - 100.0).abs() < 1e-4);
        assert!(shell.position.y.abs() < 1e-4);
    }

    #[test]
    fn velocity_follows_angle() {
        let shell = Projectile::new(
            EntityId::new(1),
            Vec2::ZERO,
            std::f32::consts::FRAC_PI_2,
            10.0,
            20.0,
        );
        assert!(shell.velocity().x.abs() < 1e-4);
        assert!((shell.velocity().y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn deactivation_is_permanent() {
        let mut shell = Projectile::new(EntityId::new(1), Vec2::ZERO, 0.0, 10.0, 20.0);
        shell.deactivate();
        shell.advance();
        assert!(!shell.is_active());
        assert_eq!(shell.owner(), EntityId::new(1));
        assert_eq!(shell.damage(), 20.0);
    }
}
