//! Objective evaluation for the active level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::{LevelConfig, Objective, ObjectiveKind};
use crate::time::SimTime;

/// Distance under which a checkpoint counts as reached.
pub const CHECKPOINT_RADIUS: f32 = 50.0;

/// What changed during one objective evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectiveUpdate {
    /// Whether the next checkpoint was reached this tick.
    pub checkpoint_reached: bool,
    /// Whether every objective is satisfied.
    pub complete: bool,
}

/// Progress tracker for the active level.
///
/// Holds a private copy of the level's objectives, so progress never leaks
/// back into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelManager {
    level: LevelConfig,
    objectives: Vec<Objective>,
    checkpoints: Vec<Vec2>,
    next_checkpoint: usize,
    started_at: SimTime,
}

impl LevelManager {
    /// Activates `level` at time `now`.
    #[must_use]
    pub fn new(level: &LevelConfig, now: SimTime) -> Self {
        let mut objectives = level.objectives.clone();
        for objective in &mut objectives {
            objective.current = 0;
        }
        Self {
            checkpoints: level.checkpoints().to_vec(),
            level: level.clone(),
            objectives,
            next_checkpoint: 0,
            started_at: now,
        }
    }

    /// Evaluates every objective for this tick.
    ///
    /// # Arguments
    ///
    /// * `player` - The player's position
    /// * `enemies_destroyed` - Enemies destroyed since the level started
    /// * `now` - Current simulated time
    pub fn update(&mut self, player: Vec2, enemies_destroyed: u32, now: SimTime) -> ObjectiveUpdate {
        let checkpoint_reached = self
            .next_checkpoint()
            .is_some_and(|checkpoint| player.distance(checkpoint) < CHECKPOINT_RADIUS);
        if checkpoint_reached {
            self.next_checkpoint += 1;
        }

        let elapsed = u32::try_from(now.secs_since(self.started_at)).unwrap_or(u32::MAX);
        for objective in &mut self.objectives {
            match objective.kind {
                ObjectiveKind::DestroyEnemies => objective.current = enemies_destroyed,
                ObjectiveKind::ReachCheckpoint | ObjectiveKind::Escort => {
                    if checkpoint_reached {
                        objective.current += 1;
                    }
                }
                ObjectiveKind::SurviveTime => objective.current = elapsed.min(objective.required),
            }
        }

        ObjectiveUpdate {
            checkpoint_reached,
            complete: self.is_complete(),
        }
    }

    /// Whether every objective currently has `current >= required`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_complete)
    }

    /// The next unreached checkpoint.
    #[must_use]
    pub fn next_checkpoint(&self) -> Option<Vec2> {
        self.checkpoints.get(self.next_checkpoint).copied()
    }

    /// Checkpoints reached so far.
    #[must_use]
    pub const fn checkpoints_reached(&self) -> usize {
        self.next_checkpoint
    }

    /// The full checkpoint sequence.
    #[must_use]
    pub fn checkpoints(&self) -> &[Vec2] {
        &self.checkpoints
    }

    /// Objective progress.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// The active level definition.
    #[must_use]
    pub const fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// When the level was activated.
    #[must_use]
    pub const fn started_at(&self) -> SimTime {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelCatalog;

    fn manager(id: u32) -> LevelManager {
        LevelManager::new(LevelCatalog::default().find_or_first(id), SimTime::ZERO)
    }

    #[test]
    fn destroy_objective_tracks_counter() {
        let mut levels = manager(1);
        let far = Vec2::splat(1500.0);
        assert!(!levels.update(far, 4, SimTime::ZERO).complete);
        assert_eq!(levels.objectives()[0].current, 4);
        assert!(levels.update(far, 5, SimTime::ZERO).complete);
    }

    #[test]
    fn checkpoints_advance_in_order_and_never_regress() {
        let mut levels = manager(2);
        let first = Vec2::new(500.0, 500.0);

        // Standing on the second checkpoint does nothing before the first.
        assert!(!levels.update(Vec2::splat(1500.0), 0, SimTime::ZERO).checkpoint_reached);
        assert_eq!(levels.checkpoints_reached(), 0);

        let update = levels.update(first + Vec2::new(49.0, 0.0), 0, SimTime::ZERO);
        assert!(update.checkpoint_reached);
        assert_eq!(levels.checkpoints_reached(), 1);
        assert_eq!(levels.next_checkpoint(), Some(Vec2::splat(1500.0)));

        // Staying on a reached checkpoint does not count it again.
        levels.update(first, 0, SimTime::ZERO);
        assert_eq!(levels.objectives()[0].current, 1);

        levels.update(Vec2::splat(1500.0), 0, SimTime::ZERO);
        let done = levels.update(Vec2::splat(2500.0), 0, SimTime::ZERO);
        assert!(done.complete);
        assert_eq!(levels.next_checkpoint(), None);
        assert_eq!(levels.checkpoints_reached(), 3);
    }

    #[test]
    fn boundary_is_exclusive() {
        let mut levels = manager(2);
        levels.update(Vec2::new(550.0, 500.0), 0, SimTime::ZERO);
        assert_eq!(levels.checkpoints_reached(), 0);
    }

    #[test]
    fn escort_and_survive_must_hold_together() {
        let mut levels = manager(3);
        let first = Vec2::new(300.0, 300.0);

        let update = levels.update(first, 0, SimTime::from_secs(10));
        assert!(update.checkpoint_reached);
        assert!(!update.complete, "survive objective is still short");
        assert_eq!(levels.objectives()[1].current, 10);

        // Past the displayed 180 s limit the level still completes.
        assert_eq!(levels.objectives()[1].time_limit, Some(180));
        let update = levels.update(Vec2::splat(1500.0), 0, SimTime::from_secs(200));
        assert!(update.complete);
        assert_eq!(levels.objectives()[1].current, 180);
    }

    #[test]
    fn survive_time_is_measured_from_activation() {
        let level = LevelCatalog::default().find_or_first(3).clone();
        let mut levels = LevelManager::new(&level, SimTime::from_secs(100));
        levels.update(Vec2::ZERO, 0, SimTime::from_millis(102_999));
        assert_eq!(levels.objectives()[1].current, 2);
    }

    #[test]
    fn catalog_is_not_mutated() {
        let catalog = LevelCatalog::default();
        let mut levels = LevelManager::new(catalog.first(), SimTime::ZERO);
        levels.update(Vec2::ZERO, 3, SimTime::ZERO);
        assert_eq!(catalog.first().objectives[0].current, 0);
        assert_eq!(levels.level().id, 1);
    }
}
