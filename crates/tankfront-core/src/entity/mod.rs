//! Entity module for the battlefield roster.
//!
//! This module provides the core entity types of the simulation:
//! - [`EntityId`]: Unique, monotonically assigned identifier
//! - [`EntityTag`]: Type classification used by resolvers and queries
//! - [`EntityInner`]: Type-safe storage for the concrete entity
//! - [`Entity`]: The complete entity container
//!
//! Tanks and projectiles are the only entity kinds. AI state is not part of
//! an entity; it lives in a sidecar [`AiController`](crate::ai::AiController)
//! keyed by the tank's id.
//!
//! # Example
//!
//! ```
//! use tankfront_core::entity::{Entity, EntityId, EntityInner, EntityTag, Tank};
//! use glam::Vec2;
//!
//! let player = Entity::new(EntityId::new(1), EntityInner::Tank(Tank::player(Vec2::ZERO)));
//!
//! assert_eq!(player.id().as_u64(), 1);
//! assert_eq!(player.tag(), EntityTag::Tank);
//! assert!(player.as_tank().is_some());
//! ```

pub mod projectile;
pub mod tank;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use projectile::Projectile;
pub use tank::{
    Ability, Archetype, ScaledStat, SpawnModifier, Tank, TankStats, Upgrade,
    ABILITY_ENERGY_COST,
};

/// Unique identifier for an entity.
///
/// Ids are assigned by the [`Arena`](crate::arena::Arena) in increasing
/// order and never reused, so ordering by id is spawn order. All roster
/// iteration goes through this ordering.
///
/// ```
/// use tankfront_core::entity::EntityId;
///
/// assert!(EntityId::new(1) < EntityId::new(2));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Player or enemy tank.
    Tank,
    /// In-flight shell.
    Projectile,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tank => write!(f, "Tank"),
            Self::Projectile => write!(f, "Projectile"),
        }
    }
}

/// Type-safe storage for the concrete entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// A tank.
    Tank(Tank),
    /// A projectile.
    Projectile(Projectile),
}

impl EntityInner {
    /// Returns the tag matching this variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Tank(_) => EntityTag::Tank,
            Self::Projectile(_) => EntityTag::Projectile,
        }
    }
}

/// A roster entry: id plus the concrete entity.
///
/// The tag is derived from the inner variant at construction, so the two
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier for this entity
    /// * `inner` - The concrete tank or projectile
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self {
            id,
            tag: inner.tag(),
            inner,
        }
    }

    /// Returns the entity's identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Returns the inner storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns `true` if this entity is a tank.
    #[must_use]
    pub const fn is_tank(&self) -> bool {
        matches!(self.tag, EntityTag::Tank)
    }

    /// Returns `true` if this entity is a projectile.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        matches!(self.tag, EntityTag::Projectile)
    }

    /// Returns the tank, if this is one.
    #[must_use]
    pub const fn as_tank(&self) -> Option<&Tank> {
        match &self.inner {
            EntityInner::Tank(tank) => Some(tank),
            EntityInner::Projectile(_) => None,
        }
    }

    /// Returns the tank mutably, if this is one.
    #[must_use]
    pub fn as_tank_mut(&mut self) -> Option<&mut Tank> {
        match &mut self.inner {
            EntityInner::Tank(tank) => Some(tank),
            EntityInner::Projectile(_) => None,
        }
    }

    /// Returns the projectile, if this is one.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&Projectile> {
        match &self.inner {
            EntityInner::Projectile(projectile) => Some(projectile),
            EntityInner::Tank(_) => None,
        }
    }

    /// Returns the projectile mutably, if this is one.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.inner {
            EntityInner::Projectile(projectile) => Some(projectile),
            EntityInner::Tank(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn entity_id_orders_by_value() {
        let mut ids = vec![EntityId::new(3), EntityId::new(1), EntityId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![EntityId::new(1), EntityId::new(2), EntityId::new(3)]);
        assert_eq!(format!("{:?}", EntityId::new(9)), "EntityId(9)");
        assert_eq!(EntityId::from(4).to_string(), "4");
    }

    #[test]
    fn tag_follows_inner() {
        let tank = Entity::new(EntityId::new(1), EntityInner::Tank(Tank::player(Vec2::ZERO)));
        assert!(tank.is_tank());
        assert!(tank.as_projectile().is_none());

        let shell = Entity::new(
            EntityId::new(2),
            EntityInner::Projectile(Projectile::new(EntityId::new(1), Vec2::ZERO, 0.0, 10.0, 20.0)),
        );
        assert_eq!(shell.tag(), EntityTag::Projectile);
        assert!(shell.is_projectile());
        assert!(shell.as_tank().is_none());
    }

    #[test]
    fn mutable_access() {
        let mut entity = Entity::new(EntityId::new(1), EntityInner::Tank(Tank::player(Vec2::ZERO)));
        if let Some(tank) = entity.as_tank_mut() {
            tank.position = Vec2::new(5.0, 6.0);
        }
        assert_eq!(entity.as_tank().map(|t| t.position), Some(Vec2::new(5.0, 6.0)));
    }
}
