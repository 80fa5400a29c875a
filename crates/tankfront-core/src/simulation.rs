//! The simulation orchestrator and its per-tick pipeline.
//!
//! [`Simulation::step`] runs one tick to completion:
//!
//! 1. **PLAYER**: the player controller turns input into commands, which are
//!    routed to the command resolvers; ability requests are applied here
//! 2. **AI**: every enemy controller decides against the player's position;
//!    its commands go through the same resolvers
//! 3. **PHYSICS**: projectiles advance, out-of-bounds ones are retired
//! 4. **COMBAT**: hits are settled, destroyed enemies are removed and scored
//! 5. **WORLD**: tank timers, camera, weather, supply crates, random events
//! 6. **PROGRESS**: level objectives and the active mission are evaluated
//!
//! Everything that changed is reported in the returned [`TickReport`].
//!
//! # Determinism
//!
//! Given the same configuration, catalog and input sequence, two simulations
//! produce identical reports:
//! - Entities are iterated in id order (via `BTreeMap`)
//! - Every random consumer draws from its own seeded `ChaCha8Rng` stream
//! - Time only advances by the configured tick interval
//!
//! # Example
//!
//! ```
//! use tankfront_core::config::SimConfig;
//! use tankfront_core::input::InputState;
//! use tankfront_core::level::LevelCatalog;
//! use tankfront_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(SimConfig::with_seed(42), LevelCatalog::default()).unwrap();
//! for _ in 0..10 {
//!     sim.step(&InputState::default());
//! }
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.enemies().count(), 5);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai::AiController;
use crate::arena::Arena;
use crate::camera::Camera;
use crate::config::{SimConfig, SPAWN_MARGIN};
use crate::entity::{Ability, Archetype, EntityId, Projectile, Tank};
use crate::environment::{Environment, Terrain, Weather};
use crate::error::SimResult;
use crate::events::{GameEvent, RandomEventManager};
use crate::input::{InputState, PlayerContext, PlayerController};
use crate::level::{LevelCatalog, LevelConfig, LevelManager, Objective};
use crate::mission::{MissionEvent, MissionManager};
use crate::output::{Command, GameOutcome, Notification, PlayerSnapshot, TickReport, WorldCommand};
use crate::resolver::{self, CombatResolver, MovementResolver, PhysicsResolver, Resolver, WeaponResolver};
use crate::time::SimTime;

/// Radius of the EMP blast around the player.
pub const EMP_RADIUS: f32 = 300.0;
/// How long EMP-struck controllers stay silent.
pub const EMP_DURATION_MS: u64 = 3000;
/// Distance under which the player collects a supply crate.
pub const SUPPLY_PICKUP_RADIUS: f32 = 40.0;
/// Health restored by a supply crate.
pub const SUPPLY_HEALTH: f32 = 30.0;
/// Armor restored by a supply crate.
pub const SUPPLY_ARMOR: f32 = 20.0;
/// Energy restored by a supply crate.
pub const SUPPLY_ENERGY: f32 = 30.0;

// =============================================================================
// Random streams
// =============================================================================

const TERRAIN_STREAM: u64 = 1;
const WEATHER_STREAM: u64 = 2;
const SPAWN_STREAM: u64 = 3;
const EVENT_STREAM: u64 = 4;

fn stream(seed: u64, id: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(id);
    rng
}

/// One independent random stream per consumer.
#[derive(Debug, Clone)]
struct RngStreams {
    terrain: ChaCha8Rng,
    weather: ChaCha8Rng,
    spawn: ChaCha8Rng,
    events: ChaCha8Rng,
}

impl RngStreams {
    fn new(seed: u64) -> Self {
        Self {
            terrain: stream(seed, TERRAIN_STREAM),
            weather: stream(seed, WEATHER_STREAM),
            spawn: stream(seed, SPAWN_STREAM),
            events: stream(seed, EVENT_STREAM),
        }
    }
}

// =============================================================================
// Supply crates
// =============================================================================

/// A supply crate waiting to be collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyCrate {
    /// Where it landed.
    pub position: Vec2,
    /// When it disappears.
    pub expires_at: SimTime,
}

// =============================================================================
// Simulation
// =============================================================================

/// The orchestrator: owns the world and runs the tick pipeline.
pub struct Simulation {
    config: SimConfig,
    catalog: LevelCatalog,
    arena: Arena,
    environment: Environment,
    camera: Camera,
    player_controller: PlayerController,
    ai: BTreeMap<EntityId, AiController>,
    resolvers: Vec<Box<dyn Resolver>>,
    physics: PhysicsResolver,
    combat: CombatResolver,
    levels: LevelManager,
    missions: MissionManager,
    events: RandomEventManager,
    supplies: Vec<SupplyCrate>,
    rng: RngStreams,
    time: SimTime,
    score: u32,
    enemies_destroyed: u32,
    total_kills: u32,
    outcome: Option<GameOutcome>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("arena", &self.arena)
            .field("level", &self.levels.level().id)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("time", &self.time)
            .field("score", &self.score)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation on the first level of `catalog`.
    ///
    /// The player is spawned first, at the level's start position, so it
    /// always has the lowest entity id.
    ///
    /// # Arguments
    ///
    /// * `config` - World geometry, seed and tuning
    /// * `catalog` - Levels in play order
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`](crate::error::SimError::InvalidConfig)
    /// if `config` fails validation.
    pub fn new(config: SimConfig, catalog: LevelCatalog) -> SimResult<Self> {
        config.validate()?;

        let mut rng = RngStreams::new(config.seed);
        let level = catalog.first().clone();
        let environment = Environment::generate(
            level.terrain,
            level.weather,
            config.world_size,
            config.viewport_size,
            &mut rng.terrain,
            &mut rng.weather,
        );

        let mut arena = Arena::new();
        let player = arena.spawn_player(Tank::player(level.player_start));
        let camera = Camera::new(player, level.player_start, config.world_size, config.viewport_size);

        let resolvers: Vec<Box<dyn Resolver>> = vec![
            Box::new(MovementResolver::new()),
            Box::new(WeaponResolver::from_config(&config)),
        ];

        let mut sim = Self {
            physics: PhysicsResolver::new(config.world_size),
            combat: CombatResolver::new(config.hit_radius),
            levels: LevelManager::new(&level, SimTime::ZERO),
            events: RandomEventManager::new(config.world_size, SimTime::ZERO),
            missions: MissionManager::new(),
            player_controller: PlayerController::new(),
            ai: BTreeMap::new(),
            supplies: Vec::new(),
            time: SimTime::ZERO,
            score: 0,
            enemies_destroyed: 0,
            total_kills: 0,
            outcome: None,
            config,
            catalog,
            arena,
            environment,
            camera,
            resolvers,
            rng,
        };
        sim.spawn_roster(&level);
        info!(level = level.id, name = %level.name, seed = sim.config.seed, "simulation created");
        Ok(sim)
    }

    /// Runs one tick with this tick's input.
    ///
    /// Once the game has an outcome, this is a no-op returning an empty
    /// report.
    pub fn step(&mut self, input: &InputState) -> TickReport {
        if self.outcome.is_some() {
            return TickReport::new(self.arena.current_tick(), self.time);
        }
        let now = self.time;
        self.time = now + self.config.tick_ms;
        self.arena.advance_tick();
        let mut report = TickReport::new(self.arena.current_tick(), self.time);

        // PLAYER
        self.resolve_player(input, now, &mut report);

        // AI
        self.resolve_enemies(now);
        for id in self.tank_ids() {
            if let Some(tank) = self.arena.tank_mut(id) {
                tank.update(now);
            }
        }

        // PHYSICS
        self.physics.integrate(&mut self.arena);

        // COMBAT
        let terrain = self
            .config
            .obstacles_absorb_projectiles
            .then_some(&mut self.environment.terrain);
        let kills = self.combat.resolve(&mut self.arena, terrain);
        self.arena.purge_inactive_projectiles();
        if self.check_defeat(&mut report) {
            return report;
        }
        for kill in kills {
            self.record_kill(kill.victim, Some(kill.killer), &mut report);
        }

        // WORLD
        if let Some(target) = self.arena.tank(self.camera.target()) {
            self.camera.update(target.position);
        }
        self.environment.weather.update(&mut self.rng.weather);
        self.collect_supplies(now, &mut report);
        if self.config.random_events {
            if let Some(triggered) = self.events.update(now, &mut self.rng.events) {
                report.push(Notification::EventTriggered {
                    kind: triggered.event.kind,
                });
                for command in triggered.commands {
                    self.apply_world_command(command, &mut report);
                }
            }
        }

        if self.check_defeat(&mut report) {
            return report;
        }

        // PROGRESS
        self.update_mission(now, &mut report);
        if self.outcome.is_none() {
            self.update_level(now, &mut report);
        }

        if let Some(player) = self.arena.player() {
            report.push(Notification::PlayerStatus(PlayerSnapshot::from(player)));
        }
        report
    }

    /// Starts mission `id`, replacing the active mission.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissionNotFound`](crate::error::SimError::MissionNotFound)
    /// for ids outside the mission table.
    pub fn start_mission(&mut self, id: u32) -> SimResult<()> {
        self.missions.start(id, self.time, self.total_kills)
    }

    /// Resizes the viewport of the camera and the weather particle field.
    pub fn resize_viewport(&mut self, viewport: Vec2) {
        self.camera.update_viewport(viewport);
        self.environment.weather.update_viewport(viewport);
    }

    // =========================================================================
    // Pipeline phases
    // =========================================================================

    fn resolve_player(&mut self, input: &InputState, now: SimTime, report: &mut TickReport) {
        let Some(id) = self.arena.player_id() else {
            return;
        };
        let Some(tank) = self.arena.tank(id) else {
            return;
        };
        let ctx = PlayerContext {
            now,
            movement_modifier: self.environment.movement_modifier(tank.position),
            camera: &self.camera,
            fire_interval_ms: self.config.player_fire_interval_ms,
            ability_cooldown_ms: self.config.ability_cooldown_ms,
        };
        let commands = self.player_controller.update(id, tank, input, &ctx);

        resolver::route(&self.resolvers, &commands, &mut self.arena);
        for command in &commands {
            if let Command::UseAbility { target, ability } = command {
                self.apply_ability(*target, *ability, now, report);
            }
        }
    }

    fn resolve_enemies(&mut self, now: SimTime) {
        let Some(target) = self.arena.player().map(|p| p.position) else {
            return;
        };
        let mut commands = Vec::new();
        for (id, tank) in self.arena.enemies() {
            if let Some(controller) = self.ai.get_mut(&id) {
                commands.extend(controller.update(id, tank, target, now));
            }
        }
        resolver::route(&self.resolvers, &commands, &mut self.arena);
    }

    fn apply_ability(&mut self, id: EntityId, ability: Ability, now: SimTime, report: &mut TickReport) {
        let applied = self
            .arena
            .tank_mut(id)
            .is_some_and(|tank| tank.use_ability(ability, now));
        if !applied {
            debug!(%ability, "ability rejected");
            return;
        }
        self.player_controller.ability_applied(ability, now);

        if ability == Ability::Emp {
            if let Some(center) = self.arena.tank(id).map(|t| t.position) {
                let until = now + EMP_DURATION_MS;
                for (enemy, tank) in self.arena.enemies() {
                    if tank.position.distance(center) <= EMP_RADIUS {
                        if let Some(controller) = self.ai.get_mut(&enemy) {
                            controller.disable_until(until);
                        }
                    }
                }
            }
        }
        debug!(%ability, "ability used");
        report.push(Notification::AbilityUsed { ability });
    }

    /// Removes a destroyed enemy and scores it. The player is never removed.
    fn record_kill(&mut self, victim: EntityId, killer: Option<EntityId>, report: &mut TickReport) {
        let player = self.arena.player_id();
        if Some(victim) == player || self.arena.despawn(victim).is_none() {
            return;
        }
        self.ai.remove(&victim);
        self.enemies_destroyed += 1;
        self.total_kills += 1;
        self.score += self.config.score_per_kill;
        info!(enemy = %victim, destroyed = self.enemies_destroyed, score = self.score, "enemy destroyed");
        report.push(Notification::EnemyDestroyed {
            id: victim,
            destroyed: self.enemies_destroyed,
        });
        report.push(Notification::ScoreChanged {
            delta: self.config.score_per_kill,
            total: self.score,
        });

        if killer.is_some() && killer == player {
            self.grant_experience(self.config.experience_per_kill, report);
        }
    }

    fn grant_experience(&mut self, amount: u32, report: &mut TickReport) {
        let Some(player) = self.arena.player_mut() else {
            return;
        };
        if player.gain_experience(amount) {
            let level = player.level();
            info!(level, "player leveled up");
            report.push(Notification::PlayerLeveledUp { level });
        }
    }

    fn collect_supplies(&mut self, now: SimTime, report: &mut TickReport) {
        self.supplies.retain(|supply| now < supply.expires_at);
        let Some(player) = self.arena.player_mut() else {
            return;
        };
        let before = self.supplies.len();
        let position = player.position;
        self.supplies
            .retain(|supply| supply.position.distance(position) >= SUPPLY_PICKUP_RADIUS);
        for _ in self.supplies.len()..before {
            player.restore(SUPPLY_HEALTH, SUPPLY_ARMOR, SUPPLY_ENERGY);
            debug!("supply crate collected");
            report.push(Notification::SupplyCollected);
        }
    }

    fn apply_world_command(&mut self, command: WorldCommand, report: &mut TickReport) {
        match command {
            WorldCommand::DropSupply { position, expires_at } => {
                self.supplies.push(SupplyCrate { position, expires_at });
            }
            WorldCommand::SpawnEnemy { position } => {
                self.spawn_enemy(Tank::enemy(Archetype::Normal, position, &[]));
            }
            WorldCommand::ChangeWeather { kind } => {
                self.environment.weather.set_kind(kind, &mut self.rng.weather);
                info!(%kind, "weather changed");
                report.push(Notification::WeatherChanged { kind });
            }
            WorldCommand::DamageAll { amount } => {
                for id in self.tank_ids() {
                    self.damage_tank(id, amount, report);
                }
            }
            WorldCommand::DamageArea { center, radius, amount } => {
                for id in self.arena.tanks_within(center, radius) {
                    self.damage_tank(id, amount, report);
                }
            }
        }
    }

    fn damage_tank(&mut self, id: EntityId, amount: f32, report: &mut TickReport) {
        let destroyed = self
            .arena
            .tank_mut(id)
            .is_some_and(|tank| tank.take_damage(amount));
        if destroyed {
            self.record_kill(id, None, report);
        }
    }

    fn update_mission(&mut self, now: SimTime, report: &mut TickReport) {
        match self.missions.update(self.total_kills, now) {
            Some(MissionEvent::Completed { mission_id, rewards }) => {
                if let Some(player) = self.arena.player_mut() {
                    player.apply_upgrade(rewards.upgrade);
                }
                self.grant_experience(rewards.experience, report);
                report.push(Notification::MissionCompleted {
                    mission_id,
                    experience: rewards.experience,
                    upgrade: rewards.upgrade,
                });
            }
            Some(MissionEvent::Failed { .. }) => self.finish(GameOutcome::MissionFailed, report),
            None => {}
        }
    }

    fn update_level(&mut self, now: SimTime, report: &mut TickReport) {
        let Some(position) = self.arena.player().map(|p| p.position) else {
            return;
        };
        let update = self.levels.update(position, self.enemies_destroyed, now);
        if update.checkpoint_reached {
            report.push(Notification::CheckpointReached {
                reached: self.levels.checkpoints_reached(),
                total: self.levels.checkpoints().len(),
            });
        }
        if !update.complete {
            return;
        }

        let completed = self.levels.level().id;
        let next = self.catalog.next_after(completed).cloned();
        info!(level = completed, next = ?next.as_ref().map(|l| l.id), "level complete");
        report.push(Notification::LevelCompleted {
            level_id: completed,
            next_level: next.as_ref().map(|l| l.id),
        });
        match next {
            Some(level) => self.load_level(&level, now),
            None => self.finish(GameOutcome::Victory, report),
        }
    }

    /// Ends the game if the player is gone or at zero health.
    fn check_defeat(&mut self, report: &mut TickReport) -> bool {
        if self.arena.player().is_some_and(|p| !p.is_destroyed()) {
            return false;
        }
        warn!(tick = report.tick, "player destroyed");
        self.finish(GameOutcome::Defeated, report);
        true
    }

    fn finish(&mut self, outcome: GameOutcome, report: &mut TickReport) {
        info!(%outcome, score = self.score, "game over");
        self.outcome = Some(outcome);
        report.push(Notification::GameOver { outcome });
    }

    // =========================================================================
    // Level loading
    // =========================================================================

    /// Replaces the world with `level`. The player keeps its stats, level and
    /// abilities and is moved to the level's start.
    fn load_level(&mut self, level: &LevelConfig, now: SimTime) {
        self.environment = Environment::generate(
            level.terrain,
            level.weather,
            self.config.world_size,
            self.camera.viewport(),
            &mut self.rng.terrain,
            &mut self.rng.weather,
        );
        self.arena.clear_projectiles();
        self.arena.clear_enemies();
        self.ai.clear();
        self.supplies.clear();
        self.enemies_destroyed = 0;
        self.levels = LevelManager::new(level, now);

        if let Some(player) = self.arena.player_mut() {
            player.position = level.player_start;
        }
        self.camera.snap_to(level.player_start);
        self.spawn_roster(level);
        info!(level = level.id, name = %level.name, "level loaded");
    }

    fn spawn_roster(&mut self, level: &LevelConfig) {
        let world = self.config.world_size;
        for spawn in &level.enemies {
            let position = Vec2::new(
                self.rng.spawn.gen_range(SPAWN_MARGIN..world.x - SPAWN_MARGIN),
                self.rng.spawn.gen_range(SPAWN_MARGIN..world.y - SPAWN_MARGIN),
            );
            self.spawn_enemy(Tank::enemy(spawn.archetype, position, &spawn.modifiers));
        }
    }

    fn spawn_enemy(&mut self, tank: Tank) -> EntityId {
        let id = self.arena.spawn_tank(tank);
        self.ai.insert(id, AiController::new(self.config.world_size));
        debug!(enemy = %id, "enemy spawned");
        id
    }

    fn tank_ids(&self) -> Vec<EntityId> {
        self.arena.player_id().into_iter().chain(self.arena.enemy_ids()).collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Current simulated time.
    #[must_use]
    pub const fn time(&self) -> SimTime {
        self.time
    }

    /// The player tank.
    #[must_use]
    pub fn player(&self) -> Option<&Tank> {
        self.arena.player()
    }

    /// Enemy tanks in id order.
    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Tank)> + '_ {
        self.arena.enemies()
    }

    /// The AI controller of enemy `id`.
    #[must_use]
    pub fn ai(&self, id: EntityId) -> Option<&AiController> {
        self.ai.get(&id)
    }

    /// Live projectiles in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &Projectile)> + '_ {
        self.arena.projectiles()
    }

    /// Top-left corner of the viewport in world space.
    #[must_use]
    pub const fn camera_position(&self) -> Vec2 {
        self.camera.position()
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Objective progress of the active level.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        self.levels.objectives()
    }

    /// The next unreached checkpoint of the active level.
    #[must_use]
    pub fn next_checkpoint(&self) -> Option<Vec2> {
        self.levels.next_checkpoint()
    }

    /// Random events still running.
    #[must_use]
    pub fn active_events(&self) -> &[GameEvent] {
        self.events.active_events()
    }

    /// Supply crates waiting to be collected.
    #[must_use]
    pub fn supply_crates(&self) -> &[SupplyCrate] {
        &self.supplies
    }

    /// Terrain of the active level.
    #[must_use]
    pub const fn terrain(&self) -> &Terrain {
        &self.environment.terrain
    }

    /// Weather of the active level.
    #[must_use]
    pub const fn weather(&self) -> &Weather {
        &self.environment.weather
    }

    /// Weather visibility multiplier. Not applied to AI detection.
    #[must_use]
    pub fn visibility(&self) -> f32 {
        self.environment.weather.visibility_modifier()
    }

    /// Total score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Enemies destroyed in the active level.
    #[must_use]
    pub const fn enemies_destroyed(&self) -> u32 {
        self.enemies_destroyed
    }

    /// How the game ended, if it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// The active level definition.
    #[must_use]
    pub const fn current_level(&self) -> &LevelConfig {
        self.levels.level()
    }

    /// The mission manager.
    #[must_use]
    pub const fn missions(&self) -> &MissionManager {
        &self.missions
    }

    /// HUD view of the player.
    #[must_use]
    pub fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.arena.player().map(PlayerSnapshot::from)
    }

    /// Direct world access, for scenario setup.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Direct environment access, for scenario setup.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Spawns an AI-controlled enemy, for scenario setup.
    pub fn add_enemy(&mut self, tank: Tank) -> EntityId {
        self.spawn_enemy(tank)
    }
}
