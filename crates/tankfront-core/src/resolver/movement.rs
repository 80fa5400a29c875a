//! Movement resolver for tank displacement, heading and turret commands.

use tracing::trace;

use crate::arena::Arena;
use crate::output::{Command, CommandKind};

use super::Resolver;

/// Resolver for `Move`, `SetHeading` and `AimTurret` commands.
///
/// Commands are applied in the order they were issued, so a later heading
/// for the same tank overrides an earlier one.
///
/// # Example
///
/// ```
/// use tankfront_core::resolver::{MovementResolver, Resolver};
/// use tankfront_core::output::CommandKind;
///
/// let resolver = MovementResolver::new();
/// assert!(resolver.handles().contains(&CommandKind::Movement));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementResolver;

impl MovementResolver {
    /// Creates a movement resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for MovementResolver {
    fn handles(&self) -> &[CommandKind] {
        &[CommandKind::Movement]
    }

    fn resolve(&self, commands: &[&Command], arena: &mut Arena) {
        for command in commands {
            let Some(tank) = arena.tank_mut(command.entity()) else {
                trace!(entity = %command.entity(), "movement command for missing tank");
                continue;
            };
            match command {
                Command::Move { direction, .. } => tank.move_by(*direction),
                Command::SetHeading { heading, .. } => tank.rotation = *heading,
                Command::AimTurret { angle, .. } => tank.rotate_turret(*angle),
                Command::Fire { .. } | Command::UseAbility { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Archetype, EntityId, Tank};
    use glam::Vec2;

    #[test]
    fn applies_in_order() {
        let mut arena = Arena::new();
        let id = arena.spawn_tank(Tank::enemy(Archetype::Heavy, Vec2::ZERO, &[]));
        let commands = [
            Command::Move { target: id, direction: Vec2::new(0.0, 0.5) },
            Command::SetHeading { target: id, heading: 1.0 },
            Command::SetHeading { target: id, heading: 2.0 },
            Command::AimTurret { target: id, angle: -1.0 },
        ];
        let refs: Vec<&Command> = commands.iter().collect();
        MovementResolver::new().resolve(&refs, &mut arena);

        let tank = arena.tank(id).unwrap();
        assert_eq!(tank.position, Vec2::new(0.0, 1.5));
        assert_eq!(tank.rotation, 2.0);
        assert_eq!(tank.turret_rotation, -1.0);
    }

    #[test]
    fn ignores_missing_entities() {
        let mut arena = Arena::new();
        let command = Command::Move { target: EntityId::new(42), direction: Vec2::X };
        MovementResolver::new().resolve(&[&command], &mut arena);
        assert!(arena.is_empty());
    }
}
