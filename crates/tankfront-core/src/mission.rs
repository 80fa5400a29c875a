//! Optional missions layered on top of the level flow.
//!
//! At most one mission is active. Missions come from a fixed table; an
//! unknown id is a [`SimError::MissionNotFound`] since there is no sensible
//! default to fall back to. Rewards are handed back to the orchestrator,
//! which applies them to the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entity::{Archetype, Tank, Upgrade};
use crate::error::{SimError, SimResult};
use crate::level::{Objective, ObjectiveKind, CHECKPOINT_RADIUS};
use crate::math::step_toward;
use crate::time::SimTime;

/// Where the escort convoy starts.
pub const CONVOY_START: Vec2 = Vec2::new(100.0, 100.0);
/// Speed factor of the convoy (multiplied by its own tank speed).
pub const CONVOY_SPEED: f32 = 1.0;

/// What a mission grants on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRewards {
    /// Experience for the player.
    pub experience: u32,
    /// Permanent upgrade for the player.
    pub upgrade: Upgrade,
}

/// An active mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Table id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Briefing text.
    pub description: String,
    /// Objectives, all of which must be satisfied.
    pub objectives: Vec<Objective>,
    /// Seconds allowed before the mission fails.
    pub time_limit: Option<u32>,
    /// Completion rewards.
    pub rewards: MissionRewards,
    /// Escort route, empty for non-escort missions.
    pub checkpoints: Vec<Vec2>,
    /// When the mission started.
    pub started_at: SimTime,
    /// Whether the rewards were granted.
    pub completed: bool,
    /// Whether the time limit ran out first.
    pub failed: bool,
}

impl Mission {
    /// Builds mission `id` from the mission table.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissionNotFound`] for ids outside the table.
    pub fn from_table(id: u32, now: SimTime) -> SimResult<Self> {
        let mission = match id {
            1 => Self {
                id,
                name: "Forest Encounter".to_string(),
                description: "Destroy the enemy tanks hiding in the forest.".to_string(),
                objectives: vec![Objective::destroy_enemies(5)],
                time_limit: None,
                rewards: MissionRewards {
                    experience: 200,
                    upgrade: Upgrade::ArmorBoost,
                },
                checkpoints: Vec::new(),
                started_at: now,
                completed: false,
                failed: false,
            },
            2 => {
                let route = vec![
                    Vec2::new(500.0, 500.0),
                    Vec2::new(1500.0, 1500.0),
                    Vec2::new(2500.0, 2500.0),
                ];
                Self {
                    id,
                    name: "Convoy Escort".to_string(),
                    description: "Escort the transport safely through enemy territory.".to_string(),
                    objectives: vec![
                        Objective::escort(3, route.clone()),
                        Objective::survive_time(180),
                    ],
                    time_limit: Some(180),
                    rewards: MissionRewards {
                        experience: 300,
                        upgrade: Upgrade::SpeedBoost,
                    },
                    checkpoints: route,
                    started_at: now,
                    completed: false,
                    failed: false,
                }
            }
            _ => return Err(SimError::MissionNotFound(id)),
        };
        Ok(mission)
    }
}

/// Terminal mission transition reported by [`MissionManager::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionEvent {
    /// Every objective is satisfied; rewards are to be granted.
    Completed {
        /// Mission id
        mission_id: u32,
        /// Rewards to grant
        rewards: MissionRewards,
    },
    /// The time limit ran out.
    Failed {
        /// Mission id
        mission_id: u32,
    },
}

/// Owner of the active mission and its escort convoy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionManager {
    mission: Option<Mission>,
    convoy: Option<Tank>,
    next_checkpoint: usize,
    kills_at_start: u32,
}

impl MissionManager {
    /// Creates a manager with no active mission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts mission `id`, replacing any active one.
    ///
    /// # Arguments
    ///
    /// * `id` - Mission table id
    /// * `now` - Current simulated time
    /// * `kills_so_far` - Enemies destroyed before the mission started
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissionNotFound`] for unknown ids; the active
    /// mission is left untouched in that case.
    pub fn start(&mut self, id: u32, now: SimTime, kills_so_far: u32) -> SimResult<()> {
        let mission = Mission::from_table(id, now)?;
        info!(mission = id, name = %mission.name, "mission started");

        self.convoy = (!mission.checkpoints.is_empty())
            .then(|| Tank::new(Archetype::Heavy, CONVOY_START, false));
        self.next_checkpoint = 0;
        self.kills_at_start = kills_so_far;
        self.mission = Some(mission);
        Ok(())
    }

    /// Advances the mission by one tick.
    ///
    /// # Arguments
    ///
    /// * `kills_total` - Enemies destroyed since the game started
    /// * `now` - Current simulated time
    pub fn update(&mut self, kills_total: u32, now: SimTime) -> Option<MissionEvent> {
        let mission = self.mission.as_mut()?;
        if mission.completed || mission.failed {
            return None;
        }

        let mut checkpoint_reached = false;
        if let (Some(convoy), Some(&checkpoint)) =
            (self.convoy.as_mut(), mission.checkpoints.get(self.next_checkpoint))
        {
            if let Some(step) = step_toward(convoy.position, checkpoint, CONVOY_SPEED, 0.0) {
                convoy.move_by(step);
            }
            if convoy.position.distance(checkpoint) < CHECKPOINT_RADIUS {
                checkpoint_reached = true;
                self.next_checkpoint += 1;
            }
        }

        let elapsed_ms = now.millis_since(mission.started_at);
        let elapsed = u32::try_from(elapsed_ms / 1000).unwrap_or(u32::MAX);
        let kills = kills_total.saturating_sub(self.kills_at_start);
        for objective in &mut mission.objectives {
            match objective.kind {
                ObjectiveKind::DestroyEnemies => objective.current = kills,
                ObjectiveKind::SurviveTime => objective.current = elapsed.min(objective.required),
                ObjectiveKind::Escort | ObjectiveKind::ReachCheckpoint => {
                    if checkpoint_reached {
                        objective.current += 1;
                    }
                }
            }
        }

        if mission.objectives.iter().all(Objective::is_complete) {
            mission.completed = true;
            info!(mission = mission.id, "mission completed");
            return Some(MissionEvent::Completed {
                mission_id: mission.id,
                rewards: mission.rewards,
            });
        }

        if let Some(limit) = mission.time_limit {
            if elapsed_ms > u64::from(limit) * 1000 {
                mission.failed = true;
                warn!(mission = mission.id, "mission failed: time limit exceeded");
                return Some(MissionEvent::Failed {
                    mission_id: mission.id,
                });
            }
        }
        None
    }

    /// The active mission.
    #[must_use]
    pub const fn current(&self) -> Option<&Mission> {
        self.mission.as_ref()
    }

    /// The escort convoy, for escort missions.
    #[must_use]
    pub const fn convoy(&self) -> Option<&Tank> {
        self.convoy.as_ref()
    }

    /// The convoy's next checkpoint.
    #[must_use]
    pub fn next_checkpoint(&self) -> Option<Vec2> {
        self.mission
            .as_ref()
            .and_then(|m| m.checkpoints.get(self.next_checkpoint).copied())
    }
}
