//! Physics resolver for projectile integration.
//!
//! Projectiles move a fixed velocity per tick; there is no timestep scaling.
//! A projectile leaving the world rectangle is deactivated and later purged.

use glam::Vec2;
use tracing::debug;

use crate::arena::Arena;

/// Advances projectiles and retires the ones that left the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsResolver {
    world_size: Vec2,
}

impl PhysicsResolver {
    /// Creates a physics resolver for a world of `world_size`.
    #[must_use]
    pub const fn new(world_size: Vec2) -> Self {
        Self { world_size }
    }

    /// Advances every active projectile by its velocity. Returns how many
    /// were retired for leaving `[0, width] × [0, height]`.
    pub fn integrate(&self, arena: &mut Arena) -> usize {
        let mut retired = 0;
        for id in arena.projectile_ids() {
            let Some(projectile) = arena.projectile_mut(id) else {
                continue;
            };
            if !projectile.is_active() {
                continue;
            }
            projectile.advance();
            if !self.contains(projectile.position) {
                projectile.deactivate();
                retired += 1;
                debug!(projectile = %id, "projectile left the world");
            }
        }
        retired
    }

    fn contains(&self, position: Vec2) -> bool {
        (0.0..=self.world_size.x).contains(&position.x)
            && (0.0..=self.world_size.y).contains(&position.y)
    }
}
