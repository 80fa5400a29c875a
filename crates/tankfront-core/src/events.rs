//! Random world events.
//!
//! The [`RandomEventManager`] never touches the world. When an event fires
//! it returns the [`WorldCommand`]s that realize it, and the orchestrator
//! applies them.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::environment::WeatherKind;
use crate::output::WorldCommand;
use crate::time::SimTime;

/// Minimum time between two events.
pub const EVENT_COOLDOWN_MS: u64 = 30_000;
/// Per-tick chance of an event once the cooldown has passed.
pub const EVENT_CHANCE: f64 = 0.3;
/// Maximum reinforcement offset from the event point on each axis.
pub const REINFORCEMENT_SPREAD: f32 = 50.0;
/// Earthquake damage dealt to every tank.
pub const EARTHQUAKE_DAMAGE: f32 = 10.0;
/// Airstrike blast radius.
pub const AIRSTRIKE_RADIUS: f32 = 100.0;
/// Airstrike damage.
pub const AIRSTRIKE_DAMAGE: f32 = 50.0;

/// Random event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A supply crate lands.
    SupplyDrop,
    /// Enemy tanks arrive.
    EnemyReinforcement,
    /// The weather changes.
    WeatherChange,
    /// Every tank is shaken.
    Earthquake,
    /// An area is bombed.
    Airstrike,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [Self; 5] = [
        Self::SupplyDrop,
        Self::EnemyReinforcement,
        Self::WeatherChange,
        Self::Earthquake,
        Self::Airstrike,
    ];

    /// How long the event stays active.
    #[must_use]
    pub const fn duration_ms(self) -> u64 {
        match self {
            Self::SupplyDrop => 30_000,
            Self::EnemyReinforcement => 0,
            Self::WeatherChange => 60_000,
            Self::Earthquake => 15_000,
            Self::Airstrike => 10_000,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SupplyDrop => write!(f, "supply_drop"),
            Self::EnemyReinforcement => write!(f, "enemy_reinforcement"),
            Self::WeatherChange => write!(f, "weather_change"),
            Self::Earthquake => write!(f, "earthquake"),
            Self::Airstrike => write!(f, "airstrike"),
        }
    }
}

/// An active event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Event type.
    pub kind: EventKind,
    /// Event point, if the event is localized.
    pub position: Option<Vec2>,
    /// When it fired.
    pub start: SimTime,
    /// How long it stays active.
    pub duration_ms: u64,
}

impl GameEvent {
    /// Whether the event is over at `now`.
    #[must_use]
    pub const fn is_expired(&self, now: SimTime) -> bool {
        now.millis_since(self.start) >= self.duration_ms
    }
}

/// An event that fired this tick, with the commands that realize it.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredEvent {
    /// The event.
    pub event: GameEvent,
    /// Commands for the orchestrator.
    pub commands: Vec<WorldCommand>,
}

/// Cooldown-gated random event source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEventManager {
    active: Vec<GameEvent>,
    last_event_at: SimTime,
    world_size: Vec2,
}

impl RandomEventManager {
    /// Creates a manager whose cooldown starts at `now`.
    #[must_use]
    pub const fn new(world_size: Vec2, now: SimTime) -> Self {
        Self {
            active: Vec::new(),
            last_event_at: now,
            world_size,
        }
    }

    /// Rolls for a new event, then prunes expired ones.
    pub fn update<R: Rng>(&mut self, now: SimTime, rng: &mut R) -> Option<TriggeredEvent> {
        let mut triggered = None;
        if now.millis_since(self.last_event_at) > EVENT_COOLDOWN_MS && rng.gen_bool(EVENT_CHANCE) {
            let kind = EventKind::ALL
                .choose(rng)
                .copied()
                .unwrap_or(EventKind::SupplyDrop);
            let position = Vec2::new(
                rng.gen_range(0.0..self.world_size.x),
                rng.gen_range(0.0..self.world_size.y),
            );
            triggered = Some(self.trigger(kind, position, now, rng));
        }
        self.active.retain(|event| !event.is_expired(now));
        triggered
    }

    /// Fires an event of `kind` at `position` immediately.
    pub fn trigger<R: Rng>(
        &mut self,
        kind: EventKind,
        position: Vec2,
        now: SimTime,
        rng: &mut R,
    ) -> TriggeredEvent {
        let event = GameEvent {
            kind,
            position: Some(position),
            start: now,
            duration_ms: kind.duration_ms(),
        };
        info!(%kind, x = position.x, y = position.y, "random event triggered");
        self.active.push(event);
        self.last_event_at = now;

        let commands = match kind {
            EventKind::SupplyDrop => vec![WorldCommand::DropSupply {
                position,
                expires_at: now + kind.duration_ms(),
            }],
            EventKind::EnemyReinforcement => {
                let count = rng.gen_range(2..=3);
                (0..count)
                    .map(|_| {
                        let offset = Vec2::new(
                            rng.gen_range(-REINFORCEMENT_SPREAD..REINFORCEMENT_SPREAD),
                            rng.gen_range(-REINFORCEMENT_SPREAD..REINFORCEMENT_SPREAD),
                        );
                        WorldCommand::SpawnEnemy {
                            position: position + offset,
                        }
                    })
                    .collect()
            }
            EventKind::WeatherChange => vec![WorldCommand::ChangeWeather {
                kind: WeatherKind::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(WeatherKind::Clear),
            }],
            EventKind::Earthquake => vec![WorldCommand::DamageAll {
                amount: EARTHQUAKE_DAMAGE,
            }],
            EventKind::Airstrike => vec![WorldCommand::DamageArea {
                center: position,
                radius: AIRSTRIKE_RADIUS,
                amount: AIRSTRIKE_DAMAGE,
            }],
        };
        TriggeredEvent { event, commands }
    }

    /// Events still running.
    #[must_use]
    pub fn active_events(&self) -> &[GameEvent] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WORLD: Vec2 = Vec2::splat(3000.0);

    #[test]
    fn nothing_fires_during_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = RandomEventManager::new(WORLD, SimTime::ZERO);
        for tick in 0..=(EVENT_COOLDOWN_MS / 16) {
            assert!(events.update(SimTime::from_millis(tick * 16), &mut rng).is_none());
        }
    }

    #[test]
    fn fires_soon_after_cooldown_then_waits_again() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events = RandomEventManager::new(WORLD, SimTime::ZERO);

        let mut fired_at = Vec::new();
        for tick in 0..10_000u64 {
            let now = SimTime::from_millis(tick * 16);
            if events.update(now, &mut rng).is_some() {
                fired_at.push(now);
            }
        }
        assert!(fired_at.len() >= 2);
        assert!(fired_at[0] > SimTime::from_millis(EVENT_COOLDOWN_MS));
        for pair in fired_at.windows(2) {
            assert!(pair[1].millis_since(pair[0]) > EVENT_COOLDOWN_MS);
        }
    }

    #[test]
    fn reinforcements_spawn_near_the_point() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = RandomEventManager::new(WORLD, SimTime::ZERO);
        let point = Vec2::splat(1000.0);
        let fired = events.trigger(EventKind::EnemyReinforcement, point, SimTime::ZERO, &mut rng);

        assert!((2..=3).contains(&fired.commands.len()));
        for command in &fired.commands {
            let WorldCommand::SpawnEnemy { position } = command else {
                panic!("unexpected command {command:?}");
            };
            assert!((position.x - point.x).abs() <= REINFORCEMENT_SPREAD);
            assert!((position.y - point.y).abs() <= REINFORCEMENT_SPREAD);
        }
    }

    #[test]
    fn hazards_and_supplies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut events = RandomEventManager::new(WORLD, SimTime::ZERO);
        let point = Vec2::splat(700.0);

        let quake = events.trigger(EventKind::Earthquake, point, SimTime::ZERO, &mut rng);
        assert_eq!(quake.commands, vec![WorldCommand::DamageAll { amount: 10.0 }]);

        let strike = events.trigger(EventKind::Airstrike, point, SimTime::ZERO, &mut rng);
        assert_eq!(
            strike.commands,
            vec![WorldCommand::DamageArea { center: point, radius: 100.0, amount: 50.0 }]
        );

        let supply = events.trigger(EventKind::SupplyDrop, point, SimTime::from_secs(1), &mut rng);
        assert_eq!(
            supply.commands,
            vec![WorldCommand::DropSupply { position: point, expires_at: SimTime::from_secs(31) }]
        );
    }

    #[test]
    fn events_are_pruned_by_duration() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut events = RandomEventManager::new(WORLD, SimTime::ZERO);
        events.trigger(EventKind::Airstrike, Vec2::ZERO, SimTime::ZERO, &mut rng);
        events.trigger(EventKind::EnemyReinforcement, Vec2::ZERO, SimTime::ZERO, &mut rng);
        events.trigger(EventKind::SupplyDrop, Vec2::ZERO, SimTime::ZERO, &mut rng);
        assert_eq!(events.active_events().len(), 3);

        events.update(SimTime::from_millis(1), &mut rng);
        assert_eq!(events.active_events().len(), 2);

        events.update(SimTime::from_millis(10_000), &mut rng);
        let kinds: Vec<_> = events.active_events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::SupplyDrop]);
    }
}
