//! Combat resolver: projectile hits against tanks and terrain obstacles.
//!
//! # Hit order
//!
//! Every active projectile is tested against the player first, then each
//! living enemy in id order. The first hit deactivates the projectile, so a
//! projectile damages at most one tank. A projectile never hits the tank
//! that fired it. Projectiles still active after the tank pass may be
//! absorbed by a terrain obstacle.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::environment::Terrain;

/// A tank destroyed by a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    /// The destroyed tank
    pub victim: EntityId,
    /// Owner of the projectile that destroyed it
    pub killer: EntityId,
}

/// Resolver for projectile collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatResolver {
    hit_radius: f32,
}

impl CombatResolver {
    /// Creates a combat resolver with a center-to-center hit radius.
    #[must_use]
    pub const fn new(hit_radius: f32) -> Self {
        Self { hit_radius }
    }

    /// Settles every projectile hit for this tick.
    ///
    /// # Arguments
    ///
    /// * `arena` - The world; hit projectiles are deactivated, not removed
    /// * `terrain` - Obstacles that absorb projectiles, if enabled
    ///
    /// Returns the tanks destroyed this pass, in hit order. Destroyed tanks
    /// stay in the arena; removing them is the caller's decision.
    pub fn resolve(&self, arena: &mut Arena, mut terrain: Option<&mut Terrain>) -> Vec<Kill> {
        let targets: Vec<EntityId> = arena
            .player_id()
            .into_iter()
            .chain(arena.enemy_ids())
            .collect();
        let radius_sq = self.hit_radius * self.hit_radius;
        let mut kills = Vec::new();

        for projectile_id in arena.projectile_ids() {
            let Some(projectile) = arena.get(projectile_id).and_then(|e| e.as_projectile()) else {
                continue;
            };
            if !projectile.is_active() {
                continue;
            }
            let (position, owner, damage) = (projectile.position, projectile.owner(), projectile.damage());

            let hit = targets.iter().copied().find(|&target| {
                target != owner
                    && arena.tank(target).is_some_and(|tank| {
                        !tank.is_destroyed() && tank.position.distance_squared(position) < radius_sq
                    })
            });

            if let Some(target) = hit {
                if let Some(projectile) = arena.projectile_mut(projectile_id) {
                    projectile.deactivate();
                }
                let destroyed = arena
                    .tank_mut(target)
                    .is_some_and(|tank| tank.take_damage(damage));
                trace!(projectile = %projectile_id, target = %target, destroyed, "projectile hit");
                if destroyed {
                    debug!(victim = %target, killer = %owner, "tank destroyed");
                    kills.push(Kill {
                        victim: target,
                        killer: owner,
                    });
                }
                continue;
            }

            if let Some(terrain) = terrain.as_deref_mut() {
                if terrain.handle_projectile_collision(position) {
                    if let Some(projectile) = arena.projectile_mut(projectile_id) {
                        projectile.deactivate();
                    }
                    trace!(projectile = %projectile_id, "projectile absorbed by obstacle");
                }
            }
        }
        kills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Archetype, Projectile, Tank};
    use crate::environment::{Obstacle, ObstacleKind, TerrainKind};
    use glam::Vec2;

    fn shot(owner: EntityId, at: Vec2, damage: f32) -> Projectile {
        Projectile::new(owner, at, 0.0, 10.0, damage)
    }

    mod tank_hit_tests {
        use super::*;

        #[test]
        fn player_is_tested_before_enemies() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::new(100.0, 100.0)));
            let enemy = arena.spawn_tank(Tank::enemy(Archetype::Normal, Vec2::new(110.0, 100.0), &[]));
            let shooter = arena.spawn_tank(Tank::enemy(Archetype::Normal, Vec2::new(500.0, 500.0), &[]));
            arena.spawn_projectile(shot(shooter, Vec2::new(105.0, 100.0), 20.0));

            let kills = CombatResolver::new(25.0).resolve(&mut arena, None);
            assert!(kills.is_empty());
            assert!(arena.tank(player).unwrap().health() < 100.0);
            assert_eq!(arena.tank(enemy).unwrap().health(), 100.0);
            assert_eq!(arena.purge_inactive_projectiles(), 1);
        }

        #[test]
        fn owner_is_never_hit() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            arena.spawn_projectile(shot(player, Vec2::new(5.0, 0.0), 20.0));

            CombatResolver::new(25.0).resolve(&mut arena, None);
            assert_eq!(arena.tank(player).unwrap().health(), 100.0);
            assert_eq!(arena.projectiles().filter(|(_, p)| p.is_active()).count(), 1);
        }

        #[test]
        fn hit_radius_is_exclusive() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            let enemy = arena.spawn_tank(Tank::enemy(Archetype::Normal, Vec2::new(100.0, 0.0), &[]));
            arena.spawn_projectile(shot(player, Vec2::new(75.0, 0.0), 20.0));

            CombatResolver::new(25.0).resolve(&mut arena, None);
            assert_eq!(arena.tank(enemy).unwrap().health(), 100.0);
        }

        #[test]
        fn lethal_hit_reports_killer() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            let enemy = arena.spawn_tank(Tank::enemy(Archetype::Normal, Vec2::new(300.0, 0.0), &[]));
            arena.spawn_projectile(shot(player, Vec2::new(300.0, 10.0), 1000.0));
            arena.spawn_projectile(shot(player, Vec2::new(300.0, 5.0), 1000.0));

            let kills = CombatResolver::new(25.0).resolve(&mut arena, None);
            assert_eq!(kills, vec![Kill { victim: enemy, killer: player }]);
            // The second shot passes over the wreck.
            assert_eq!(arena.projectiles().filter(|(_, p)| p.is_active()).count(), 1);
        }
    }

    mod obstacle_tests {
        use super::*;

        #[test]
        fn obstacles_absorb_only_when_enabled() {
            let obstacle = Obstacle::new(ObstacleKind::Rock, Vec2::new(1000.0, 1000.0));
            let mut terrain = Terrain::with_features(TerrainKind::Forest, Vec::new(), vec![obstacle]);
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            arena.spawn_projectile(shot(player, Vec2::new(1010.0, 1000.0), 20.0));

            let resolver = CombatResolver::new(25.0);
            resolver.resolve(&mut arena, None);
            assert_eq!(arena.purge_inactive_projectiles(), 0);

            resolver.resolve(&mut arena, Some(&mut terrain));
            assert_eq!(arena.purge_inactive_projectiles(), 1);
            assert_eq!(terrain.obstacles()[0].health, 80.0);
        }
    }
}
