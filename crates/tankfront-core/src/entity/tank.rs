//! Tank entity: stats, vitals, leveling and abilities.
//!
//! A [`Tank`] is created from an [`Archetype`] stat row, optionally scaled
//! once by a list of named [`SpawnModifier`]s, and then mutated by the
//! orchestrator every tick. Health, armor and energy are private so that
//! every mutation path keeps them inside `[0, max]`.
//!
//! # Example
//!
//! ```
//! use tankfront_core::entity::{Ability, Tank};
//! use tankfront_core::time::SimTime;
//! use glam::Vec2;
//!
//! let mut player = Tank::player(Vec2::new(300.0, 300.0));
//! assert!(player.use_ability(Ability::Shield, SimTime::ZERO));
//! assert!(player.is_invulnerable());
//! assert!(!player.take_damage(50.0));
//! assert_eq!(player.health(), 100.0);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::time::SimTime;

/// Share of damage that full armor absorbs.
pub const ARMOR_REDUCTION_FACTOR: f32 = 0.5;
/// Share of the dealt damage that is also stripped from armor.
pub const ARMOR_DECAY_FACTOR: f32 = 0.2;
/// Energy spent by every successful ability use.
pub const ABILITY_ENERGY_COST: f32 = 30.0;
/// Duration of the shield ability.
pub const SHIELD_DURATION_MS: u64 = 3000;
/// Duration of the boost ability.
pub const BOOST_DURATION_MS: u64 = 5000;
/// Speed multiplier applied by the boost ability.
pub const BOOST_MULTIPLIER: f32 = 1.5;
/// Health restored by the repair ability.
pub const REPAIR_HEALTH: f32 = 30.0;
/// Armor restored by the repair ability.
pub const REPAIR_ARMOR: f32 = 20.0;
/// Energy regenerated per tick.
pub const ENERGY_REGEN_PER_TICK: f32 = 0.1;
/// Experience needed per level (`level * EXPERIENCE_PER_LEVEL`).
pub const EXPERIENCE_PER_LEVEL: u32 = 100;

// =============================================================================
// Stats and archetypes
// =============================================================================

/// The stat block of a tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankStats {
    /// Maximum health.
    pub max_health: f32,
    /// Maximum armor.
    pub max_armor: f32,
    /// Maximum energy.
    pub max_energy: f32,
    /// Movement per tick for a unit direction.
    pub speed: f32,
    /// Damage rating.
    pub damage: f32,
    /// Seconds between shots.
    pub reload_interval: f32,
}

/// Named tank stat profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Balanced tank.
    Normal,
    /// Light and quick.
    Fast,
    /// Slow and heavily armored.
    Heavy,
    /// Fragile long-range gun.
    Artillery,
}

impl Archetype {
    /// Returns the fixed base stats for this archetype.
    #[must_use]
    pub const fn base_stats(self) -> TankStats {
        match self {
            Self::Normal => TankStats {
                max_health: 100.0,
                max_armor: 100.0,
                max_energy: 100.0,
                speed: 5.0,
                damage: 20.0,
                reload_interval: 1.0,
            },
            Self::Fast => TankStats {
                max_health: 80.0,
                max_armor: 60.0,
                max_energy: 120.0,
                speed: 6.0,
                damage: 15.0,
                reload_interval: 0.8,
            },
            Self::Heavy => TankStats {
                max_health: 150.0,
                max_armor: 120.0,
                max_energy: 80.0,
                speed: 3.0,
                damage: 25.0,
                reload_interval: 1.5,
            },
            Self::Artillery => TankStats {
                max_health: 70.0,
                max_armor: 50.0,
                max_energy: 100.0,
                speed: 2.0,
                damage: 40.0,
                reload_interval: 2.0,
            },
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Fast => write!(f, "fast"),
            Self::Heavy => write!(f, "heavy"),
            Self::Artillery => write!(f, "artillery"),
        }
    }
}

/// Stat that a [`SpawnModifier`] scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaledStat {
    /// Base movement speed.
    Speed,
    /// Maximum (and current) armor.
    Armor,
}

/// Named multiplicative factor applied once when a tank spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnModifier {
    /// Human-readable modifier name.
    pub name: String,
    /// The stat being scaled.
    pub stat: ScaledStat,
    /// Multiplicative factor.
    pub factor: f32,
}

impl SpawnModifier {
    /// Creates a new modifier.
    #[must_use]
    pub fn new(name: impl Into<String>, stat: ScaledStat, factor: f32) -> Self {
        Self {
            name: name.into(),
            stat,
            factor,
        }
    }

    /// The "fast" encounter variant: ×1.5 speed, ×0.8 armor.
    #[must_use]
    pub fn fast_variant() -> Vec<Self> {
        vec![
            Self::new("fast_variant_speed", ScaledStat::Speed, 1.5),
            Self::new("fast_variant_armor", ScaledStat::Armor, 0.8),
        ]
    }

    /// The "heavy" encounter variant: ×0.7 speed, ×1.5 armor.
    #[must_use]
    pub fn heavy_variant() -> Vec<Self> {
        vec![
            Self::new("heavy_variant_speed", ScaledStat::Speed, 0.7),
            Self::new("heavy_variant_armor", ScaledStat::Armor, 1.5),
        ]
    }
}

// =============================================================================
// Abilities and upgrades
// =============================================================================

/// Player abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Temporary invulnerability.
    Shield,
    /// Temporary speed boost.
    Boost,
    /// Instant health and armor repair.
    Repair,
    /// Disables nearby enemies; realized by the orchestrator.
    Emp,
    /// Triple shots for a while; realized by the orchestrator.
    Multishot,
}

impl Ability {
    /// Ability unlocked when reaching `level`, if any.
    #[must_use]
    pub const fn unlocked_at(level: u32) -> Option<Self> {
        match level {
            3 => Some(Self::Repair),
            5 => Some(Self::Emp),
            7 => Some(Self::Multishot),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shield => write!(f, "shield"),
            Self::Boost => write!(f, "boost"),
            Self::Repair => write!(f, "repair"),
            Self::Emp => write!(f, "emp"),
            Self::Multishot => write!(f, "multishot"),
        }
    }
}

/// Permanent stat upgrade granted as a mission reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    /// +20 max armor, armor restored.
    ArmorBoost,
    /// +10% base speed.
    SpeedBoost,
}

// =============================================================================
// Tank
// =============================================================================

/// A tank on the battlefield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// World position.
    pub position: Vec2,
    /// Body heading in radians.
    pub rotation: f32,
    /// Turret heading in radians, independent of the body.
    pub turret_rotation: f32,
    archetype: Archetype,
    stats: TankStats,
    speed: f32,
    health: f32,
    armor: f32,
    energy: f32,
    is_player: bool,
    invulnerable: bool,
    ability_expires_at: Option<SimTime>,
    level: u32,
    experience: u32,
    abilities: BTreeSet<Ability>,
}

impl Tank {
    /// Creates a tank with the archetype's base stats and full vitals.
    ///
    /// Player tanks start with the `shield` and `boost` abilities.
    #[must_use]
    pub fn new(archetype: Archetype, position: Vec2, is_player: bool) -> Self {
        let stats = archetype.base_stats();
        let mut abilities = BTreeSet::new();
        if is_player {
            abilities.insert(Ability::Shield);
            abilities.insert(Ability::Boost);
        }
        Self {
            position,
            rotation: 0.0,
            turret_rotation: 0.0,
            archetype,
            stats,
            speed: stats.speed,
            health: stats.max_health,
            armor: stats.max_armor,
            energy: stats.max_energy,
            is_player,
            invulnerable: false,
            ability_expires_at: None,
            level: 1,
            experience: 0,
            abilities,
        }
    }

    /// Creates the player tank (normal archetype).
    #[must_use]
    pub fn player(position: Vec2) -> Self {
        Self::new(Archetype::Normal, position, true)
    }

    /// Creates an enemy tank and applies its spawn modifiers.
    #[must_use]
    pub fn enemy(archetype: Archetype, position: Vec2, modifiers: &[SpawnModifier]) -> Self {
        let mut tank = Self::new(archetype, position, false);
        tank.apply_spawn_modifiers(modifiers);
        tank
    }

    /// Scales stats by each modifier in order. Scaled maxima are refilled.
    pub fn apply_spawn_modifiers(&mut self, modifiers: &[SpawnModifier]) {
        for modifier in modifiers {
            match modifier.stat {
                ScaledStat::Speed => {
                    self.stats.speed *= modifier.factor;
                    self.speed = self.stats.speed;
                }
                ScaledStat::Armor => {
                    self.stats.max_armor *= modifier.factor;
                    self.armor = self.stats.max_armor;
                }
            }
        }
    }

    /// Displaces the tank by `direction * speed`.
    ///
    /// The caller normalizes the direction and folds in terrain/weather
    /// modifiers. World bounds are not enforced here.
    pub fn move_by(&mut self, direction: Vec2) {
        self.position += direction * self.speed;
    }

    /// Points the turret at `angle`.
    pub fn rotate_turret(&mut self, angle: f32) {
        self.turret_rotation = angle;
    }

    /// Applies `amount` of raw damage. Returns true if the tank is destroyed.
    ///
    /// Armor reduces the damage by up to half (in proportion to its fill
    /// ratio) and is itself worn down by a fifth of the damage dealt.
    /// Invulnerable tanks are untouched and never reported destroyed.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.invulnerable {
            return false;
        }
        let reduction = if self.stats.max_armor > 0.0 {
            self.armor / self.stats.max_armor
        } else {
            0.0
        };
        let actual = amount * (1.0 - reduction * ARMOR_REDUCTION_FACTOR);
        self.health = (self.health - actual).max(0.0);
        self.armor = (self.armor - actual * ARMOR_DECAY_FACTOR).max(0.0);
        self.health <= 0.0
    }

    /// Tries to use `ability` at time `now`. Returns false, leaving the tank
    /// untouched, if the ability is locked or energy is short.
    pub fn use_ability(&mut self, ability: Ability, now: SimTime) -> bool {
        if !self.abilities.contains(&ability) || self.energy < ABILITY_ENERGY_COST {
            return false;
        }
        self.energy -= ABILITY_ENERGY_COST;

        match ability {
            Ability::Shield => {
                self.invulnerable = true;
                self.ability_expires_at = Some(now + SHIELD_DURATION_MS);
            }
            Ability::Boost => {
                self.speed = self.stats.speed * BOOST_MULTIPLIER;
                self.ability_expires_at = Some(now + BOOST_DURATION_MS);
            }
            Ability::Repair => self.restore(REPAIR_HEALTH, REPAIR_ARMOR, 0.0),
            // Realized by the orchestrator.
            Ability::Emp | Ability::Multishot => {}
        }
        true
    }

    /// Adds experience (player only). Returns true if the tank leveled up.
    ///
    /// At most one level-up happens per call; leftover experience is dropped.
    /// A destroyed tank gains nothing.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        if !self.is_player || self.is_destroyed() {
            return false;
        }
        self.experience += amount;
        if self.experience >= self.level * EXPERIENCE_PER_LEVEL {
            self.level_up();
            true
        } else {
            false
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.experience = 0;

        self.stats.max_health += 10.0;
        self.stats.max_armor += 5.0;
        self.stats.max_energy += 10.0;
        self.stats.damage += 2.0;

        self.health = self.stats.max_health;
        self.armor = self.stats.max_armor;
        self.energy = self.stats.max_energy;

        if let Some(ability) = Ability::unlocked_at(self.level) {
            self.abilities.insert(ability);
        }
    }

    /// Per-tick housekeeping: expires timed abilities and regenerates energy.
    pub fn update(&mut self, now: SimTime) {
        if let Some(expires_at) = self.ability_expires_at {
            if now > expires_at {
                self.invulnerable = false;
                self.speed = self.stats.speed;
                self.ability_expires_at = None;
            }
        }
        if self.energy < self.stats.max_energy {
            self.energy = (self.energy + ENERGY_REGEN_PER_TICK).min(self.stats.max_energy);
        }
    }

    /// Adds to health, armor and energy, capped at their maxima. A destroyed
    /// tank stays destroyed.
    pub fn restore(&mut self, health: f32, armor: f32, energy: f32) {
        if self.is_destroyed() {
            return;
        }
        self.health = (self.health + health).clamp(0.0, self.stats.max_health);
        self.armor = (self.armor + armor).clamp(0.0, self.stats.max_armor);
        self.energy = (self.energy + energy).clamp(0.0, self.stats.max_energy);
    }

    /// Overwrites health, armor and energy, clamped to `[0, max]`.
    pub fn set_vitals(&mut self, health: f32, armor: f32, energy: f32) {
        self.health = health.clamp(0.0, self.stats.max_health);
        self.armor = armor.clamp(0.0, self.stats.max_armor);
        self.energy = energy.clamp(0.0, self.stats.max_energy);
    }

    /// Applies a permanent upgrade.
    pub fn apply_upgrade(&mut self, upgrade: Upgrade) {
        match upgrade {
            Upgrade::ArmorBoost => {
                self.stats.max_armor += 20.0;
                self.armor = self.stats.max_armor;
            }
            Upgrade::SpeedBoost => {
                let boosted = self.speed > self.stats.speed;
                self.stats.speed *= 1.1;
                if !boosted {
                    self.speed = self.stats.speed;
                }
            }
        }
    }

    /// Unlocks an ability.
    pub fn unlock(&mut self, ability: Ability) {
        self.abilities.insert(ability);
    }

    /// Archetype this tank spawned from.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Current stat block.
    #[must_use]
    pub const fn stats(&self) -> &TankStats {
        &self.stats
    }

    /// Current (possibly boosted) speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Current armor.
    #[must_use]
    pub const fn armor(&self) -> f32 {
        self.armor
    }

    /// Current energy.
    #[must_use]
    pub const fn energy(&self) -> f32 {
        self.energy
    }

    /// Whether this is the player tank.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.is_player
    }

    /// Whether a shield is active.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    /// Whether health has reached zero.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Player level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience toward the next level.
    #[must_use]
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    /// Returns true if `ability` is unlocked.
    #[must_use]
    pub fn has_ability(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    /// Unlocked abilities in a stable order.
    pub fn abilities(&self) -> impl Iterator<Item = Ability> + '_ {
        self.abilities.iter().copied()
    }
}
