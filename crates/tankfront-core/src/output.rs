//! Output types of the simulation.
//!
//! Three kinds of records flow out of the decision layer:
//! - [`Command`]: a per-entity intent (move, aim, fire, ability) produced by
//!   the player controller or an AI controller and applied by a
//!   [`Resolver`](crate::resolver::Resolver)
//! - [`WorldCommand`]: a world-level intent emitted by the
//!   [`RandomEventManager`](crate::events::RandomEventManager) and drained by
//!   the orchestrator
//! - [`Notification`]: a state change reported to the presentation layer,
//!   batched per tick into a [`TickReport`]
//!
//! # Example
//!
//! ```
//! use tankfront_core::output::{Command, CommandKind};
//! use tankfront_core::entity::EntityId;
//!
//! let fire = Command::Fire { source: EntityId::new(3), angle: 0.5 };
//! assert_eq!(fire.kind(), CommandKind::Weapon);
//! assert_eq!(fire.entity(), EntityId::new(3));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{Ability, EntityId, Tank, Upgrade};
use crate::environment::WeatherKind;
use crate::events::EventKind;
use crate::time::SimTime;

// =============================================================================
// Commands
// =============================================================================

/// A per-entity intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Displace a tank by `direction * tank.speed`.
    Move {
        /// Tank to move
        target: EntityId,
        /// Direction, already scaled by any movement modifiers
        direction: Vec2,
    },
    /// Set a tank's body heading.
    SetHeading {
        /// Tank to turn
        target: EntityId,
        /// Heading in radians
        heading: f32,
    },
    /// Point a tank's turret.
    AimTurret {
        /// Tank to aim
        target: EntityId,
        /// Turret angle in radians
        angle: f32,
    },
    /// Fire one projectile from the source tank's muzzle.
    Fire {
        /// Firing tank
        source: EntityId,
        /// Firing angle in radians
        angle: f32,
    },
    /// Trigger an ability.
    UseAbility {
        /// Tank using the ability
        target: EntityId,
        /// Requested ability
        ability: Ability,
    },
}

/// Command category used for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Move, heading and turret commands.
    Movement,
    /// Fire commands.
    Weapon,
    /// Ability commands.
    Ability,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movement => write!(f, "Movement"),
            Self::Weapon => write!(f, "Weapon"),
            Self::Ability => write!(f, "Ability"),
        }
    }
}

impl Command {
    /// Returns the routing kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Move { .. } | Self::SetHeading { .. } | Self::AimTurret { .. } => {
                CommandKind::Movement
            }
            Self::Fire { .. } => CommandKind::Weapon,
            Self::UseAbility { .. } => CommandKind::Ability,
        }
    }

    /// Returns the entity this command acts on.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        match self {
            Self::Move { target, .. }
            | Self::SetHeading { target, .. }
            | Self::AimTurret { target, .. }
            | Self::UseAbility { target, .. } => *target,
            Self::Fire { source, .. } => *source,
        }
    }
}

/// A world-level intent drained by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldCommand {
    /// Place a supply crate.
    DropSupply {
        /// Crate position
        position: Vec2,
        /// When the crate disappears if not collected
        expires_at: SimTime,
    },
    /// Spawn one normal enemy tank.
    SpawnEnemy {
        /// Spawn position
        position: Vec2,
    },
    /// Switch the weather kind (the night flag is kept).
    ChangeWeather {
        /// New weather
        kind: WeatherKind,
    },
    /// Damage every tank.
    DamageAll {
        /// Raw damage
        amount: f32,
    },
    /// Damage every tank within `radius` of `center`.
    DamageArea {
        /// Strike point
        center: Vec2,
        /// Blast radius
        radius: f32,
        /// Raw damage
        amount: f32,
    },
}

// =============================================================================
// Notifications
// =============================================================================

/// Terminal state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// The player tank was destroyed.
    Defeated,
    /// The last level was completed.
    Victory,
    /// The active mission ran out of time.
    MissionFailed,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defeated => write!(f, "defeated"),
            Self::Victory => write!(f, "victory"),
            Self::MissionFailed => write!(f, "mission failed"),
        }
    }
}

/// Serializable view of the player tank for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// World position
    pub position: Vec2,
    /// Current health
    pub health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Current armor
    pub armor: f32,
    /// Maximum armor
    pub max_armor: f32,
    /// Current energy
    pub energy: f32,
    /// Maximum energy
    pub max_energy: f32,
    /// Player level
    pub level: u32,
    /// Experience toward the next level
    pub experience: u32,
    /// Unlocked abilities
    pub abilities: Vec<Ability>,
}

impl From<&Tank> for PlayerSnapshot {
    fn from(tank: &Tank) -> Self {
        let stats = tank.stats();
        Self {
            position: tank.position,
            health: tank.health(),
            max_health: stats.max_health,
            armor: tank.armor(),
            max_armor: stats.max_armor,
            energy: tank.energy(),
            max_energy: stats.max_energy,
            level: tank.level(),
            experience: tank.experience(),
            abilities: tank.abilities().collect(),
        }
    }
}

/// A state change reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// Player vitals, emitted every tick.
    PlayerStatus(PlayerSnapshot),
    /// Score increased.
    ScoreChanged {
        /// Points added this tick
        delta: u32,
        /// Score after the change
        total: u32,
    },
    /// An enemy tank was destroyed and removed.
    EnemyDestroyed {
        /// The removed tank
        id: EntityId,
        /// Enemies destroyed so far in this level
        destroyed: u32,
    },
    /// The player reached a checkpoint.
    CheckpointReached {
        /// Checkpoints reached so far
        reached: usize,
        /// Checkpoints in the level
        total: usize,
    },
    /// Every objective of the level is satisfied.
    LevelCompleted {
        /// Completed level
        level_id: u32,
        /// Level loaded next, `None` after the last level
        next_level: Option<u32>,
    },
    /// The player used an ability.
    AbilityUsed {
        /// The ability
        ability: Ability,
    },
    /// The player gained a level.
    PlayerLeveledUp {
        /// New level
        level: u32,
    },
    /// The active mission was completed and its rewards granted.
    MissionCompleted {
        /// Mission id
        mission_id: u32,
        /// Experience granted
        experience: u32,
        /// Upgrade applied
        upgrade: Upgrade,
    },
    /// A random event started.
    EventTriggered {
        /// Event kind
        kind: EventKind,
    },
    /// The weather kind changed.
    WeatherChanged {
        /// New weather
        kind: WeatherKind,
    },
    /// The player picked up a supply crate.
    SupplyCollected,
    /// The game reached a terminal state.
    GameOver {
        /// How it ended
        outcome: GameOutcome,
    },
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number after the step
    pub tick: u64,
    /// Simulated time after the step
    pub time: SimTime,
    /// Notifications in emission order
    pub notifications: Vec<Notification>,
}

impl TickReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new(tick: u64, time: SimTime) -> Self {
        Self {
            tick,
            time,
            notifications: Vec::new(),
        }
    }

    /// Appends a notification.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// The terminal outcome reported this tick, if any.
    #[must_use]
    pub fn game_over(&self) -> Option<GameOutcome> {
        self.notifications.iter().find_map(|n| match n {
            Notification::GameOver { outcome } => Some(*outcome),
            _ => None,
        })
    }

    /// Returns the level completion reported this tick, if any.
    #[must_use]
    pub fn level_completed(&self) -> Option<(u32, Option<u32>)> {
        self.notifications.iter().find_map(|n| match n {
            Notification::LevelCompleted {
                level_id,
                next_level,
            } => Some((*level_id, *next_level)),
            _ => None,
        })
    }

    /// Total score added this tick.
    #[must_use]
    pub fn score_delta(&self) -> u32 {
        self.notifications
            .iter()
            .map(|n| match n {
                Notification::ScoreChanged { delta, .. } => *delta,
                _ => 0,
            })
            .sum()
    }
}
