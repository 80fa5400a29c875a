//! Test helper functions for setting up simulations and scenarios.
//!
//! This module provides factory functions and setup utilities that make
//! writing scenario tests more ergonomic and consistent.

use glam::Vec2;

use crate::config::SimConfig;
use crate::entity::{Ability, Archetype, EntityId, Projectile, Tank};
use crate::environment::{Terrain, TerrainKind, WeatherKind};
use crate::input::{InputState, MoveFlags};
use crate::level::{LevelCatalog, LevelConfig, Objective};
use crate::output::{Notification, TickReport};
use crate::simulation::Simulation;

/// Where the player starts in the sandbox level.
pub const SANDBOX_START: Vec2 = Vec2::new(1500.0, 1500.0);

// =============================================================================
// Configuration
// =============================================================================

/// Configuration with random events and obstacle absorption turned off, so
/// scenarios only see what they set up.
pub fn quiet_config(seed: u64) -> SimConfig {
    SimConfig {
        random_events: false,
        obstacles_absorb_projectiles: false,
        ..SimConfig::with_seed(seed)
    }
}

/// A one-level catalog: clear weather, no enemies, an objective that is never
/// met by accident.
pub fn sandbox_catalog() -> LevelCatalog {
    let level = LevelConfig {
        id: 1,
        name: "Sandbox".to_string(),
        description: String::new(),
        weather: WeatherKind::Clear,
        terrain: TerrainKind::City,
        objectives: vec![Objective::destroy_enemies(1000)],
        enemies: Vec::new(),
        player_start: SANDBOX_START,
    };
    LevelCatalog::new(vec![level]).unwrap()
}

/// A catalog holding only level `id` of the default catalog.
pub fn single_level_catalog(id: u32) -> LevelCatalog {
    LevelCatalog::new(vec![LevelCatalog::default().find_or_first(id).clone()]).unwrap()
}

// =============================================================================
// Scenario Setup
// =============================================================================

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Creates a quiet sandbox simulation with featureless terrain.
pub fn sandbox(config: SimConfig) -> Simulation {
    init_tracing();
    let mut sim = Simulation::new(config, sandbox_catalog()).unwrap();
    clear_terrain(&mut sim);
    sim
}

/// Removes every tile and obstacle so movement is unmodified.
pub fn clear_terrain(sim: &mut Simulation) {
    let kind = sim.terrain().kind();
    sim.environment_mut().terrain = Terrain::with_features(kind, Vec::new(), Vec::new());
}

/// Spawns an AI-controlled normal enemy at `position`.
pub fn spawn_enemy_at(sim: &mut Simulation, position: Vec2) -> EntityId {
    sim.add_enemy(Tank::enemy(Archetype::Normal, position, &[]))
}

/// Places a motionless player-owned projectile at `position`.
///
/// It is settled in the next combat phase, after every tank has moved.
pub fn drop_player_shot(sim: &mut Simulation, position: Vec2, damage: f32) {
    let player = sim.arena_mut().player_id().unwrap();
    sim.arena_mut()
        .spawn_projectile(Projectile::new(player, position, 0.0, 0.0, damage));
}

/// Destroys every enemy of the current level with player shots, one tick at
/// a time, until the level changes or the game ends.
///
/// # Returns
///
/// Every notification emitted along the way.
pub fn destroy_level_enemies(sim: &mut Simulation) -> Vec<Notification> {
    let level = sim.current_level().id;
    let mut notifications = Vec::new();
    for _ in 0..100 {
        let targets: Vec<Vec2> = sim.enemies().map(|(_, tank)| tank.position).collect();
        for position in targets {
            drop_player_shot(sim, position, 10_000.0);
        }
        let report = sim.step(&InputState::default());
        notifications.extend(report.notifications);
        if sim.current_level().id != level || sim.outcome().is_some() {
            return notifications;
        }
    }
    panic!("level {level} never completed");
}

// =============================================================================
// Input
// =============================================================================

/// No keys, no fire.
pub fn idle() -> InputState {
    InputState::default()
}

/// Holds the given movement keys.
pub fn moving(moves: MoveFlags) -> InputState {
    InputState {
        moves,
        ..InputState::default()
    }
}

/// Holds fire with the cursor at a viewport position.
pub fn firing_at(cursor: Vec2) -> InputState {
    InputState {
        fire_held: true,
        cursor,
        ..InputState::default()
    }
}

/// A fixed input script cycling through moves, fire and an ability.
#[allow(clippy::cast_precision_loss)]
pub fn scripted_input(tick: u64) -> InputState {
    let moves = match (tick / 40) % 4 {
        0 => MoveFlags::RIGHT,
        1 => MoveFlags::DOWN | MoveFlags::RIGHT,
        2 => MoveFlags::LEFT,
        _ => MoveFlags::UP,
    };
    InputState {
        moves,
        fire_held: tick % 3 == 0,
        ability: (tick % 700 == 5).then_some(Ability::Shield),
        cursor: Vec2::new((tick % 800) as f32, 300.0),
    }
}

// =============================================================================
// Running
// =============================================================================

/// Steps `ticks` times with the same input, collecting the reports.
pub fn run_ticks(sim: &mut Simulation, ticks: usize, input: &InputState) -> Vec<TickReport> {
    (0..ticks).map(|_| sim.step(input)).collect()
}

/// Whether any report carries a notification matching `predicate`.
pub fn any_notification(reports: &[TickReport], predicate: impl Fn(&Notification) -> bool) -> bool {
    reports
        .iter()
        .flat_map(|r| r.notifications.iter())
        .any(predicate)
}
