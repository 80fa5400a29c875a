//! Enemy AI controller.
//!
//! Each enemy tank has one [`AiController`] sidecar, keyed by the tank's id.
//! The controller is a three-state machine whose mode is recomputed every
//! tick from the live distance to the target:
//!
//! | distance            | mode     | behavior                                  |
//! |---------------------|----------|-------------------------------------------|
//! | `> 300`             | patrol   | drive the rectangular waypoint circuit    |
//! | `(200, 300]`        | chase    | drive at the target, aim, never fire      |
//! | `<= 200`            | attack   | aim, fire once per second, kite if `< 140`|
//!
//! The controller never mutates the tank. It returns [`Command`]s that the
//! resolvers apply, and a fire request is a [`Command::Fire`] rather than a
//! projectile.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::entity::{EntityId, Tank};
use crate::math::{direction, heading, step_toward};
use crate::output::Command;
use crate::time::SimTime;

/// Distance under which an enemy notices its target.
pub const DETECTION_RANGE: f32 = 300.0;
/// Distance under which an enemy attacks.
pub const ATTACK_RANGE: f32 = 200.0;
/// Share of the attack range under which an attacker backs off.
pub const KITE_FACTOR: f32 = 0.7;
/// Minimum time between two enemy shots.
pub const FIRE_INTERVAL_MS: u64 = 1000;
/// Patrol speed factor.
pub const PATROL_SPEED: f32 = 2.0;
/// Chase speed factor.
pub const CHASE_SPEED: f32 = 3.0;
/// Kiting speed factor.
pub const KITE_SPEED: f32 = 2.0;
/// Inset of the patrol rectangle from the world edges.
pub const WAYPOINT_MARGIN: f32 = 100.0;
/// Distance under which a waypoint counts as reached.
pub const WAYPOINT_REACHED: f32 = 20.0;
/// Destinations closer than this are not moved toward.
pub const ARRIVE_RADIUS: f32 = 5.0;
/// How far ahead the kiting destination is placed.
const KITE_LOOKAHEAD: f32 = 50.0;

/// Behavior mode of an [`AiController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    /// Follow the waypoint circuit.
    #[default]
    Patrol,
    /// Close in on the target.
    Chase,
    /// Engage the target.
    Attack,
}

impl AiMode {
    /// The mode for a given distance to the target.
    #[must_use]
    pub fn for_distance(distance: f32) -> Self {
        if distance <= ATTACK_RANGE {
            Self::Attack
        } else if distance <= DETECTION_RANGE {
            Self::Chase
        } else {
            Self::Patrol
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patrol => write!(f, "patrol"),
            Self::Chase => write!(f, "chase"),
            Self::Attack => write!(f, "attack"),
        }
    }
}

/// Per-enemy decision state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    mode: AiMode,
    waypoints: [Vec2; 4],
    waypoint_index: usize,
    last_fired: Option<SimTime>,
    disabled_until: Option<SimTime>,
}

impl AiController {
    /// Creates a patrolling controller for a world of `world_size`.
    #[must_use]
    pub fn new(world_size: Vec2) -> Self {
        let m = WAYPOINT_MARGIN;
        Self {
            mode: AiMode::Patrol,
            waypoints: [
                Vec2::new(m, m),
                Vec2::new(world_size.x - m, m),
                Vec2::new(world_size.x - m, world_size.y - m),
                Vec2::new(m, world_size.y - m),
            ],
            waypoint_index: 0,
            last_fired: None,
            disabled_until: None,
        }
    }

    /// Decides this tick's commands for tank `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - The controlled tank's id
    /// * `tank` - The controlled tank
    /// * `target` - The target's position
    /// * `now` - Current simulated time
    pub fn update(&mut self, id: EntityId, tank: &Tank, target: Vec2, now: SimTime) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.is_disabled(now) {
            return commands;
        }

        let distance = tank.position.distance(target);
        let mode = AiMode::for_distance(distance);
        if mode != self.mode {
            debug!(tank = %id, from = %self.mode, to = %mode, distance, "ai mode change");
            self.mode = mode;
        }

        match mode {
            AiMode::Patrol => {
                let waypoint = self.waypoints[self.waypoint_index];
                let mut arrived_at = tank.position;
                if let Some(step) = step_toward(tank.position, waypoint, PATROL_SPEED, ARRIVE_RADIUS) {
                    push_move(&mut commands, id, tank.position, waypoint, step);
                    arrived_at += step * tank.speed();
                }
                if arrived_at.distance(waypoint) < WAYPOINT_REACHED {
                    self.waypoint_index = (self.waypoint_index + 1) % self.waypoints.len();
                }
            }
            AiMode::Chase => {
                if let Some(step) = step_toward(tank.position, target, CHASE_SPEED, ARRIVE_RADIUS) {
                    push_move(&mut commands, id, tank.position, target, step);
                }
                commands.push(Command::AimTurret {
                    target: id,
                    angle: heading(tank.position, target),
                });
            }
            AiMode::Attack => {
                let aim = heading(tank.position, target);
                commands.push(Command::AimTurret { target: id, angle: aim });

                let ready = self
                    .last_fired
                    .map_or(true, |last| now.millis_since(last) >= FIRE_INTERVAL_MS);
                if ready {
                    self.last_fired = Some(now);
                    commands.push(Command::Fire { source: id, angle: aim });
                }

                if distance < ATTACK_RANGE * KITE_FACTOR {
                    let escape = direction(heading(target, tank.position));
                    let destination = tank.position + escape * KITE_LOOKAHEAD;
                    if let Some(step) = step_toward(tank.position, destination, KITE_SPEED, ARRIVE_RADIUS) {
                        push_move(&mut commands, id, tank.position, destination, step);
                    }
                }
            }
        }
        commands
    }

    /// Silences the controller until `until` (EMP).
    pub fn disable_until(&mut self, until: SimTime) {
        self.disabled_until = Some(self.disabled_until.map_or(until, |current| current.max(until)));
    }

    /// Whether the controller is silenced at `now`.
    #[must_use]
    pub fn is_disabled(&self, now: SimTime) -> bool {
        self.disabled_until.is_some_and(|until| now < until)
    }

    /// Mode chosen on the last update.
    #[must_use]
    pub const fn mode(&self) -> AiMode {
        self.mode
    }

    /// The patrol circuit.
    #[must_use]
    pub const fn waypoints(&self) -> &[Vec2; 4] {
        &self.waypoints
    }

    /// Index of the waypoint being driven to.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }
}

fn push_move(commands: &mut Vec<Command>, id: EntityId, from: Vec2, to: Vec2, step: Vec2) {
    commands.push(Command::Move {
        target: id,
        direction: step,
    });
    commands.push(Command::SetHeading {
        target: id,
        heading: heading(from, to),
    });
}
