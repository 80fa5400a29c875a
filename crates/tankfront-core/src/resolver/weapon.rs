//! Weapon resolver: turns fire commands into projectiles.

use tracing::debug;

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::Projectile;
use crate::math::direction;
use crate::output::{Command, CommandKind};

use super::Resolver;

/// Resolver for `Fire` commands.
///
/// Each command spawns one projectile at the firing tank's muzzle, offset
/// along the firing angle, travelling at a fixed speed with fixed damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponResolver {
    muzzle_offset: f32,
    speed: f32,
    damage: f32,
}

impl WeaponResolver {
    /// Creates a weapon resolver.
    ///
    /// # Arguments
    ///
    /// * `muzzle_offset` - Distance from the tank center to the spawn point
    /// * `speed` - Projectile distance per tick
    /// * `damage` - Projectile damage
    #[must_use]
    pub const fn new(muzzle_offset: f32, speed: f32, damage: f32) -> Self {
        Self {
            muzzle_offset,
            speed,
            damage,
        }
    }

    /// Creates a weapon resolver with the configured projectile values.
    #[must_use]
    pub const fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.muzzle_offset,
            config.projectile_speed,
            config.projectile_damage,
        )
    }
}

impl Resolver for WeaponResolver {
    fn handles(&self) -> &[CommandKind] {
        &[CommandKind::Weapon]
    }

    fn resolve(&self, commands: &[&Command], arena: &mut Arena) {
        for command in commands {
            let Command::Fire { source, angle } = command else {
                continue;
            };
            let Some(tank) = arena.tank(*source) else {
                continue;
            };
            let muzzle = tank.position + direction(*angle) * self.muzzle_offset;
            let projectile = Projectile::new(*source, muzzle, *angle, self.speed, self.damage);
            let id = arena.spawn_projectile(projectile);
            debug!(projectile = %id, owner = %source, "projectile fired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, Tank};
    use glam::Vec2;

    #[test]
    fn spawns_at_muzzle() {
        let mut arena = Arena::new();
        let id = arena.spawn_player(Tank::player(Vec2::new(100.0, 100.0)));
        let fire = Command::Fire {
            source: id,
            angle: std::f32::consts::FRAC_PI_2,
        };
        WeaponResolver::new(30.0, 10.0, 20.0).resolve(&[&fire], &mut arena);

        let (_, projectile) = arena.projectiles().next().unwrap();
        assert!((projectile.position - Vec2::new(100.0, 130.0)).length() < 1e-4);
        assert!((projectile.velocity() - Vec2::new(0.0, 10.0)).length() < 1e-4);
        assert_eq!(projectile.damage(), 20.0);
        assert_eq!(projectile.owner(), id);
    }

    #[test]
    fn dead_source_fires_nothing() {
        let mut arena = Arena::new();
        let fire = Command::Fire {
            source: EntityId::new(7),
            angle: 0.0,
        };
        WeaponResolver::from_config(&SimConfig::default()).resolve(&[&fire], &mut arena);
        assert!(arena.is_empty());
    }
}
