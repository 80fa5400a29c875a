//! Resolvers: the write phase of a tick.
//!
//! Controllers only propose [`Command`]s. Resolvers are where proposed
//! changes become state mutations on the [`Arena`].
//!
//! # Architecture
//!
//! Command resolvers declare which [`CommandKind`]s they handle via
//! [`Resolver::handles()`]. Each tick:
//! 1. Commands are collected from the player controller and the AI controllers
//! 2. Commands are routed to resolvers based on their kind
//! 3. Each resolver applies its commands in batch order
//!
//! Two resolvers are not command driven and run once per tick after the
//! command phase: [`PhysicsResolver`] advances projectiles and
//! [`CombatResolver`] settles hits.
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same arena and command order
//! - Commands naming a missing or wrong-typed entity are ignored
//!
//! # Available Resolvers
//!
//! - [`MovementResolver`]: moves, heading and turret commands
//! - [`WeaponResolver`]: fire commands (spawns projectiles)
//! - [`PhysicsResolver`]: projectile integration and bounds retirement
//! - [`CombatResolver`]: projectile hits against tanks and obstacles

mod combat;
mod movement;
mod physics;
mod weapon;

pub use combat::{CombatResolver, Kill};
pub use movement::MovementResolver;
pub use physics::PhysicsResolver;
pub use weapon::WeaponResolver;

use crate::arena::Arena;
use crate::output::{Command, CommandKind};

/// Applies routed commands to the arena.
///
/// # Example
///
/// ```
/// use tankfront_core::arena::Arena;
/// use tankfront_core::output::{Command, CommandKind};
/// use tankfront_core::resolver::Resolver;
///
/// struct CountingResolver;
///
/// impl Resolver for CountingResolver {
///     fn handles(&self) -> &[CommandKind] {
///         &[CommandKind::Weapon]
///     }
///
///     fn resolve(&self, commands: &[&Command], _arena: &mut Arena) {
///         assert!(commands.iter().all(|c| c.kind() == CommandKind::Weapon));
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the command kinds this resolver handles.
    fn handles(&self) -> &[CommandKind];

    /// Applies `commands` in order.
    ///
    /// # Arguments
    ///
    /// * `commands` - The commands routed to this resolver (filtered by `handles()`)
    /// * `arena` - The world to mutate
    fn resolve(&self, commands: &[&Command], arena: &mut Arena);
}

/// Routes `commands` to every resolver that handles their kind, in resolver
/// order. Commands of a kind no resolver handles are skipped.
pub fn route(resolvers: &[Box<dyn Resolver>], commands: &[Command], arena: &mut Arena) {
    for resolver in resolvers {
        let kinds = resolver.handles();
        let routed: Vec<&Command> = commands
            .iter()
            .filter(|command| kinds.contains(&command.kind()))
            .collect();
        if !routed.is_empty() {
            resolver.resolve(&routed, arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::entity::{Ability, Tank};
    use glam::Vec2;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn route_filters_by_kind() {
        let mut arena = Arena::new();
        let id = arena.spawn_player(Tank::player(Vec2::ZERO));
        let resolvers: Vec<Box<dyn Resolver>> = vec![
            Box::new(MovementResolver::new()),
            Box::new(WeaponResolver::from_config(&SimConfig::default())),
        ];

        let commands = vec![
            Command::Move { target: id, direction: Vec2::X },
            Command::Fire { source: id, angle: 0.0 },
            Command::UseAbility { target: id, ability: Ability::Shield },
        ];
        route(&resolvers, &commands, &mut arena);

        assert_eq!(arena.player().unwrap().position, Vec2::new(5.0, 0.0));
        assert_eq!(arena.projectile_ids().len(), 1);
        // Nobody handles abilities here.
        assert!(!arena.player().unwrap().is_invulnerable());
    }
}
