//! Level definitions and the level catalog.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{Archetype, SpawnModifier};
use crate::environment::{TerrainKind, WeatherKind};
use crate::error::{SimError, SimResult};

/// Kind of a level objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Destroy a number of enemies.
    DestroyEnemies,
    /// Reach checkpoints in order.
    ReachCheckpoint,
    /// Stay alive for a number of seconds.
    SurviveTime,
    /// Escort along the checkpoint sequence.
    Escort,
}

impl ObjectiveKind {
    /// Whether progress is driven by the checkpoint sequence.
    #[must_use]
    pub const fn uses_checkpoints(self) -> bool {
        matches!(self, Self::ReachCheckpoint | Self::Escort)
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestroyEnemies => write!(f, "destroy_enemies"),
            Self::ReachCheckpoint => write!(f, "reach_checkpoint"),
            Self::SurviveTime => write!(f, "survive_time"),
            Self::Escort => write!(f, "escort"),
        }
    }
}

/// A quantified completion condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// What is measured.
    pub kind: ObjectiveKind,
    /// Progress needed.
    pub required: u32,
    /// Progress so far.
    #[serde(default)]
    pub current: u32,
    /// Ordered checkpoints, for checkpoint-driven kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checkpoints: Vec<Vec2>,
    /// Optional time limit in seconds, shown to the player.
    ///
    /// Informational on level objectives: [`LevelManager`](super::LevelManager)
    /// never fails a level on it. Enforced time limits belong to missions
    /// ([`Mission::time_limit`](crate::mission::Mission::time_limit)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

impl Objective {
    fn new(kind: ObjectiveKind, required: u32) -> Self {
        Self {
            kind,
            required,
            current: 0,
            checkpoints: Vec::new(),
            time_limit: None,
        }
    }

    /// Destroy `count` enemies.
    #[must_use]
    pub fn destroy_enemies(count: u32) -> Self {
        Self::new(ObjectiveKind::DestroyEnemies, count)
    }

    /// Reach every checkpoint in order.
    #[must_use]
    pub fn reach_checkpoints(checkpoints: Vec<Vec2>) -> Self {
        let required = u32::try_from(checkpoints.len()).unwrap_or(u32::MAX);
        Self {
            checkpoints,
            ..Self::new(ObjectiveKind::ReachCheckpoint, required)
        }
    }

    /// Escort objective needing `required` checkpoints out of `checkpoints`.
    #[must_use]
    pub fn escort(required: u32, checkpoints: Vec<Vec2>) -> Self {
        Self {
            checkpoints,
            ..Self::new(ObjectiveKind::Escort, required)
        }
    }

    /// Survive for `secs` seconds.
    #[must_use]
    pub fn survive_time(secs: u32) -> Self {
        Self::new(ObjectiveKind::SurviveTime, secs)
    }

    /// Sets the displayed time limit in seconds.
    #[must_use]
    pub const fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit = Some(secs);
        self
    }

    /// `current >= required`.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current >= self.required
    }
}

/// One enemy of a level's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Base stat row.
    pub archetype: Archetype,
    /// Spawn-time multipliers applied on top of the archetype.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<SpawnModifier>,
}

impl EnemySpawn {
    /// Plain tank of an archetype.
    #[must_use]
    pub const fn new(archetype: Archetype) -> Self {
        Self {
            archetype,
            modifiers: Vec::new(),
        }
    }

    /// Normal tank.
    #[must_use]
    pub const fn normal() -> Self {
        Self::new(Archetype::Normal)
    }

    /// Normal tank with the fast variant modifiers.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            archetype: Archetype::Normal,
            modifiers: SpawnModifier::fast_variant(),
        }
    }

    /// Normal tank with the heavy variant modifiers.
    #[must_use]
    pub fn heavy() -> Self {
        Self {
            archetype: Archetype::Normal,
            modifiers: SpawnModifier::heavy_variant(),
        }
    }
}

/// Authored definition of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Catalog id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Briefing text.
    #[serde(default)]
    pub description: String,
    /// Weather at level start.
    pub weather: WeatherKind,
    /// Terrain type.
    pub terrain: TerrainKind,
    /// Objectives, all of which must be satisfied.
    pub objectives: Vec<Objective>,
    /// Enemy roster in spawn order.
    pub enemies: Vec<EnemySpawn>,
    /// Where the player starts.
    pub player_start: Vec2,
}

impl LevelConfig {
    /// Number of enemies spawned at level start.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// The checkpoint sequence: that of the first checkpoint-driven objective.
    #[must_use]
    pub fn checkpoints(&self) -> &[Vec2] {
        self.objectives
            .iter()
            .find(|o| o.kind.uses_checkpoints())
            .map(|o| o.checkpoints.as_slice())
            .unwrap_or_default()
    }
}

/// Ordered, non-empty list of levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelConfig>", into = "Vec<LevelConfig>")]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// Creates a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyCatalog`] if `levels` is empty.
    pub fn new(levels: Vec<LevelConfig>) -> SimResult<Self> {
        if levels.is_empty() {
            return Err(SimError::EmptyCatalog);
        }
        Ok(Self { levels })
    }

    /// The first level.
    #[must_use]
    pub fn first(&self) -> &LevelConfig {
        &self.levels[0]
    }

    /// Level `id`, or the first level if there is none with that id.
    #[must_use]
    pub fn find_or_first(&self, id: u32) -> &LevelConfig {
        self.levels.iter().find(|l| l.id == id).unwrap_or_else(|| self.first())
    }

    /// The level following `id` in catalog order.
    #[must_use]
    pub fn next_after(&self, id: u32) -> Option<&LevelConfig> {
        let index = self.levels.iter().position(|l| l.id == id)?;
        self.levels.get(index + 1)
    }

    /// Levels in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> + '_ {
        self.levels.iter()
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl TryFrom<Vec<LevelConfig>> for LevelCatalog {
    type Error = SimError;

    fn try_from(levels: Vec<LevelConfig>) -> SimResult<Self> {
        Self::new(levels)
    }
}

impl From<LevelCatalog> for Vec<LevelConfig> {
    fn from(catalog: LevelCatalog) -> Self {
        catalog.levels
    }
}

impl Default for LevelCatalog {
    /// The three built-in levels.
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    id: 1,
                    name: "Forest Encounter".to_string(),
                    description: "Destroy the enemy tanks in the forest. Watch for ambushes.".to_string(),
                    weather: WeatherKind::Clear,
                    terrain: TerrainKind::Forest,
                    objectives: vec![Objective::destroy_enemies(5)],
                    enemies: vec![
                        EnemySpawn::normal(),
                        EnemySpawn::normal(),
                        EnemySpawn::normal(),
                        EnemySpawn::fast(),
                        EnemySpawn::normal(),
                    ],
                    player_start: Vec2::new(300.0, 300.0),
                },
                LevelConfig {
                    id: 2,
                    name: "Blizzard Assault".to_string(),
                    description: "Break through the enemy line in a blizzard and reach the checkpoints."
                        .to_string(),
                    weather: WeatherKind::Snow,
                    terrain: TerrainKind::Snow,
                    objectives: vec![Objective::reach_checkpoints(vec![
                        Vec2::new(500.0, 500.0),
                        Vec2::new(1500.0, 1500.0),
                        Vec2::new(2500.0, 2500.0),
                    ])],
                    enemies: vec![EnemySpawn::heavy(), EnemySpawn::normal(), EnemySpawn::heavy()],
                    player_start: Vec2::new(150.0, 150.0),
                },
                LevelConfig {
                    id: 3,
                    name: "Desert Escort".to_string(),
                    description: "Escort the supply convoy through the desert blockade.".to_string(),
                    weather: WeatherKind::Clear,
                    terrain: TerrainKind::Desert,
                    objectives: vec![
                        Objective::escort(
                            1,
                            vec![
                                Vec2::new(300.0, 300.0),
                                Vec2::new(1000.0, 1000.0),
                                Vec2::new(2000.0, 2000.0),
                                Vec2::new(2700.0, 2700.0),
                            ],
                        ),
                        Objective::survive_time(180).with_time_limit(180),
                    ],
                    enemies: vec![
                        EnemySpawn::fast(),
                        EnemySpawn::fast(),
                        EnemySpawn::normal(),
                        EnemySpawn::heavy(),
                    ],
                    player_start: Vec2::new(200.0, 200.0),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_levels() {
        let catalog = LevelCatalog::default();
        assert_eq!(catalog.len(), 3);

        let first = catalog.first();
        assert_eq!(first.id, 1);
        assert_eq!(first.enemy_count(), 5);
        assert_eq!(first.objectives, vec![Objective::destroy_enemies(5)]);
        assert_eq!(first.player_start, Vec2::new(300.0, 300.0));

        let second = catalog.find_or_first(2);
        assert_eq!(second.checkpoints().len(), 3);
        assert_eq!(second.objectives[0].required, 3);

        let third = catalog.find_or_first(3);
        assert_eq!(third.checkpoints().len(), 4);
        assert_eq!(third.objectives[1].time_limit, Some(180));
    }

    #[test]
    fn lookup_falls_back_to_first() {
        let catalog = LevelCatalog::default();
        assert_eq!(catalog.find_or_first(42).id, 1);
    }

    #[test]
    fn next_after_walks_catalog_order() {
        let catalog = LevelCatalog::default();
        assert_eq!(catalog.next_after(1).map(|l| l.id), Some(2));
        assert_eq!(catalog.next_after(3).map(|l| l.id), None);
        assert_eq!(catalog.next_after(9).map(|l| l.id), None);
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(LevelCatalog::new(Vec::new()), Err(SimError::EmptyCatalog));
        let parsed: Result<LevelCatalog, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());
    }

    #[test]
    fn authored_json_loads() {
        let json = r#"[{
            "id": 7,
            "name": "Night Raid",
            "weather": "fog",
            "terrain": "city",
            "objectives": [{"kind": "destroy_enemies", "required": 2}],
            "enemies": [{"archetype": "artillery"}, {"archetype": "heavy"}],
            "player_start": [100.0, 100.0]
        }]"#;
        let catalog: LevelCatalog = serde_json::from_str(json).unwrap();
        let level = catalog.first();
        assert_eq!(level.id, 7);
        assert_eq!(level.weather, WeatherKind::Fog);
        assert_eq!(level.enemies[0].archetype, Archetype::Artillery);
        assert_eq!(level.objectives[0].current, 0);
    }

    #[test]
    fn variant_spawns_layer_on_normal() {
        let fast = EnemySpawn::fast();
        assert_eq!(fast.archetype, Archetype::Normal);
        assert_eq!(fast.modifiers.len(), 2);
    }
}
