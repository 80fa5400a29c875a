//! Arena module for the battlefield roster.
//!
//! The Arena is the container for every tank and projectile in play. It
//! provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn/purge)
//! - Typed views over the player, the enemy roster and the projectile set
//! - Simulation tick tracking
//!
//! # Determinism
//!
//! Entity ids are assigned monotonically and stored in a `BTreeMap`, so
//! iteration is always in spawn order. The player is spawned before any
//! enemy, which makes "test the player first, then each enemy" the natural
//! roster order during collision resolution.
//!
//! # Example
//!
//! ```
//! use tankfront_core::arena::Arena;
//! use tankfront_core::entity::{Archetype, Tank};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn_player(Tank::player(Vec2::new(300.0, 300.0)));
//! let enemy = arena.spawn_tank(Tank::enemy(Archetype::Fast, Vec2::new(900.0, 900.0), &[]));
//!
//! assert_eq!(arena.player_id(), Some(player));
//! let enemies: Vec<_> = arena.enemy_ids();
//! assert_eq!(enemies, vec![enemy]);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityInner, Projectile, Tank};

/// Battlefield roster of tanks and projectiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// The player's tank, if spawned.
    player: Option<EntityId>,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an entity and returns its freshly assigned id.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Spawns the player tank and remembers its id.
    pub fn spawn_player(&mut self, tank: Tank) -> EntityId {
        let id = self.spawn(EntityInner::Tank(tank));
        self.player = Some(id);
        id
    }

    /// Spawns a tank.
    pub fn spawn_tank(&mut self, tank: Tank) -> EntityId {
        self.spawn(EntityInner::Tank(tank))
    }

    /// Spawns a projectile.
    pub fn spawn_projectile(&mut self, projectile: Projectile) -> EntityId {
        self.spawn(EntityInner::Projectile(projectile))
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        if self.player == Some(id) {
            self.player = None;
        }
        self.entities.remove(&id)
    }

    /// Returns an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns an entity mutably by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns the tank with the given id.
    #[must_use]
    pub fn tank(&self, id: EntityId) -> Option<&Tank> {
        self.entities.get(&id).and_then(Entity::as_tank)
    }

    /// Returns the tank with the given id mutably.
    #[must_use]
    pub fn tank_mut(&mut self, id: EntityId) -> Option<&mut Tank> {
        self.entities.get_mut(&id).and_then(Entity::as_tank_mut)
    }

    /// Returns the projectile with the given id mutably.
    #[must_use]
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        self.entities.get_mut(&id).and_then(Entity::as_projectile_mut)
    }

    /// The player's id, if a player tank is in the arena.
    #[must_use]
    pub const fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    /// The player's tank.
    #[must_use]
    pub fn player(&self) -> Option<&Tank> {
        self.player.and_then(|id| self.tank(id))
    }

    /// The player's tank, mutably.
    #[must_use]
    pub fn player_mut(&mut self) -> Option<&mut Tank> {
        let id = self.player?;
        self.tank_mut(id)
    }

    /// Enemy tanks in id order.
    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Tank)> + '_ {
        let player = self.player;
        self.entities
            .iter()
            .filter(move |(id, _)| Some(**id) != player)
            .filter_map(|(id, entity)| entity.as_tank().map(|tank| (*id, tank)))
    }

    /// Ids of enemy tanks in id order.
    #[must_use]
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies().map(|(id, _)| id).collect()
    }

    /// Projectiles in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &Projectile)> + '_ {
        self.entities
            .iter()
            .filter_map(|(id, entity)| entity.as_projectile().map(|p| (*id, p)))
    }

    /// Ids of projectiles in id order.
    #[must_use]
    pub fn projectile_ids(&self) -> Vec<EntityId> {
        self.projectiles().map(|(id, _)| id).collect()
    }

    /// Ids of every tank (player included) within `radius` of `center`,
    /// in id order. The boundary counts as inside.
    #[must_use]
    pub fn tanks_within(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        let radius_sq = radius * radius;
        self.entities
            .iter()
            .filter_map(|(id, entity)| entity.as_tank().map(|tank| (*id, tank)))
            .filter(|(_, tank)| tank.position.distance_squared(center) <= radius_sq)
            .map(|(id, _)| id)
            .collect()
    }

    /// Removes every inactive projectile. Returns how many were removed.
    pub fn purge_inactive_projectiles(&mut self) -> usize {
        let before = self.entities.len();
        self.entities
            .retain(|_, entity| entity.as_projectile().map_or(true, Projectile::is_active));
        before - self.entities.len()
    }

    /// Removes every projectile.
    pub fn clear_projectiles(&mut self) {
        self.entities.retain(|_, entity| !entity.is_projectile());
    }

    /// Removes every enemy tank.
    pub fn clear_enemies(&mut self) {
        let player = self.player;
        self.entities
            .retain(|id, entity| !entity.is_tank() || Some(*id) == player);
    }

    /// Number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Archetype;

    fn enemy_at(x: f32, y: f32) -> Tank {
        Tank::enemy(Archetype::Normal, Vec2::new(x, y), &[])
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn spawn_assigns_sequential_ids() {
            let mut arena = Arena::new();
            let a = arena.spawn_player(Tank::player(Vec2::ZERO));
            let b = arena.spawn_tank(enemy_at(10.0, 10.0));
            let c = arena.spawn_projectile(Projectile::new(a, Vec2::ZERO, 0.0, 10.0, 20.0));
            assert_eq!(a.as_u64(), 0);
            assert_eq!(b.as_u64(), 1);
            assert_eq!(c.as_u64(), 2);
            assert_eq!(arena.entity_count(), 3);
        }

        #[test]
        fn ids_are_not_reused_after_despawn() {
            let mut arena = Arena::new();
            let a = arena.spawn_tank(enemy_at(0.0, 0.0));
            arena.despawn(a);
            let b = arena.spawn_tank(enemy_at(0.0, 0.0));
            assert!(b > a);
        }

        #[test]
        fn despawning_player_clears_player_id() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            assert!(arena.despawn(player).is_some());
            assert!(arena.player().is_none());
            assert!(arena.despawn(player).is_none());
        }

        #[test]
        fn advance_tick_increments() {
            let mut arena = Arena::new();
            arena.advance_tick();
            arena.advance_tick();
            assert_eq!(arena.current_tick(), 2);
        }
    }

    mod roster_tests {
        use super::*;

        #[test]
        fn enemies_exclude_player_and_projectiles() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            let e1 = arena.spawn_tank(enemy_at(1.0, 0.0));
            arena.spawn_projectile(Projectile::new(player, Vec2::ZERO, 0.0, 10.0, 20.0));
            let e2 = arena.spawn_tank(enemy_at(2.0, 0.0));

            assert_eq!(arena.enemy_ids(), vec![e1, e2]);
            assert_eq!(arena.projectile_ids().len(), 1);
            assert!(arena.player().is_some_and(Tank::is_player));
        }

        #[test]
        fn tanks_within_is_inclusive_and_sorted() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            let near = arena.spawn_tank(enemy_at(100.0, 0.0));
            arena.spawn_tank(enemy_at(100.1, 0.0));

            assert_eq!(arena.tanks_within(Vec2::ZERO, 100.0), vec![player, near]);
        }

        #[test]
        fn purge_removes_only_inactive_projectiles() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            let spent = arena.spawn_projectile(Projectile::new(player, Vec2::ZERO, 0.0, 10.0, 20.0));
            let live = arena.spawn_projectile(Projectile::new(player, Vec2::ZERO, 0.0, 10.0, 20.0));
            if let Some(p) = arena.projectile_mut(spent) {
                p.deactivate();
            }

            assert_eq!(arena.purge_inactive_projectiles(), 1);
            assert_eq!(arena.projectile_ids(), vec![live]);
            assert!(arena.player().is_some());
        }

        #[test]
        fn clear_enemies_keeps_player_and_projectiles() {
            let mut arena = Arena::new();
            let player = arena.spawn_player(Tank::player(Vec2::ZERO));
            arena.spawn_tank(enemy_at(1.0, 0.0));
            arena.spawn_projectile(Projectile::new(player, Vec2::ZERO, 0.0, 10.0, 20.0));

            arena.clear_enemies();
            assert!(arena.enemy_ids().is_empty());
            assert_eq!(arena.player_id(), Some(player));
            assert_eq!(arena.projectile_ids().len(), 1);

            arena.clear_projectiles();
            assert_eq!(arena.entity_count(), 1);
        }
    }

    #[test]
    fn iteration_order_is_reproducible() {
        fn populate() -> Vec<EntityId> {
            let mut arena = Arena::new();
            arena.spawn_player(Tank::player(Vec2::ZERO));
            for i in 0..5u8 {
                arena.spawn_tank(enemy_at(f32::from(i) * 10.0, 0.0));
            }
            arena.enemy_ids()
        }
        assert_eq!(populate(), populate());
    }
}
