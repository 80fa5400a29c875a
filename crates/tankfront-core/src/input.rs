//! Player input: the shared input buffer and the player controller.
//!
//! Device adapters write into an [`InputBuffer`] between ticks
//! (last write wins). Once per tick the orchestrator takes an
//! [`InputState`] copy, consuming the ability edge, and the
//! [`PlayerController`] turns it into [`Command`]s.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::entity::{Ability, EntityId, Tank};
use crate::math::heading;
use crate::output::Command;
use crate::time::SimTime;

/// Angular spread of the side shots while multishot is active.
pub const MULTISHOT_SPREAD: f32 = 0.2;
/// How long multishot lasts.
pub const MULTISHOT_DURATION_MS: u64 = 5000;

bitflags! {
    /// Pressed movement keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MoveFlags: u8 {
        /// Toward negative y.
        const UP = 1 << 0;
        /// Toward positive y.
        const DOWN = 1 << 1;
        /// Toward negative x.
        const LEFT = 1 << 2;
        /// Toward positive x.
        const RIGHT = 1 << 3;
    }
}

impl MoveFlags {
    /// Unit vector of the pressed directions, or zero if they cancel out.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.contains(Self::UP) {
            direction.y -= 1.0;
        }
        if self.contains(Self::DOWN) {
            direction.y += 1.0;
        }
        if self.contains(Self::LEFT) {
            direction.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            direction.x += 1.0;
        }
        direction.normalize_or_zero()
    }
}

/// Input sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Pressed movement keys.
    pub moves: MoveFlags,
    /// Whether the fire button is held.
    pub fire_held: bool,
    /// Ability requested since the last tick.
    pub ability: Option<Ability>,
    /// Cursor position in viewport coordinates.
    pub cursor: Vec2,
}

/// Last-write-wins buffer filled by device adapters.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    state: InputState,
}

impl InputBuffer {
    /// Creates an idle buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks movement keys as pressed.
    pub fn press(&mut self, flags: MoveFlags) {
        self.state.moves.insert(flags);
    }

    /// Marks movement keys as released.
    pub fn release(&mut self, flags: MoveFlags) {
        self.state.moves.remove(flags);
    }

    /// Sets the fire button state.
    pub fn set_fire(&mut self, held: bool) {
        self.state.fire_held = held;
    }

    /// Records the cursor position in viewport coordinates.
    pub fn set_cursor(&mut self, cursor: Vec2) {
        self.state.cursor = cursor;
    }

    /// Records an ability trigger; a later trigger replaces an earlier one.
    pub fn trigger_ability(&mut self, ability: Ability) {
        self.state.ability = Some(ability);
    }

    /// Returns the state for this tick and clears the ability edge.
    pub fn take(&mut self) -> InputState {
        let state = self.state;
        self.state.ability = None;
        state
    }

    /// Current state without consuming anything.
    #[must_use]
    pub const fn peek(&self) -> &InputState {
        &self.state
    }
}

/// Per-tick values the controller needs from the world.
#[derive(Debug, Clone, Copy)]
pub struct PlayerContext<'a> {
    /// Current simulated time.
    pub now: SimTime,
    /// Combined terrain and weather modifier at the tank's position.
    pub movement_modifier: f32,
    /// Camera for the cursor transform.
    pub camera: &'a Camera,
    /// Minimum time between two shots.
    pub fire_interval_ms: u64,
    /// Global ability cooldown.
    pub ability_cooldown_ms: u64,
}

/// Turns player input into commands and owns the player's timers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    last_shot: Option<SimTime>,
    last_ability: Option<SimTime>,
    multishot_until: Option<SimTime>,
}

impl PlayerController {
    /// Creates a controller with every timer ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves this tick's player intent.
    ///
    /// Movement is emitted first, then the turret aim (computed from the
    /// position the tank will have after moving), then any shots, then the
    /// ability request.
    pub fn update(&mut self, id: EntityId, tank: &Tank, input: &InputState, ctx: &PlayerContext<'_>) -> Vec<Command> {
        let mut commands = Vec::new();

        let direction = input.moves.direction();
        let mut position = tank.position;
        if direction != Vec2::ZERO {
            let step = direction * ctx.movement_modifier;
            commands.push(Command::Move { target: id, direction: step });
            commands.push(Command::SetHeading {
                target: id,
                heading: direction.y.atan2(direction.x),
            });
            position += step * tank.speed();
        }

        let aim = heading(position, ctx.camera.screen_to_world(input.cursor));
        commands.push(Command::AimTurret { target: id, angle: aim });

        let ready = self
            .last_shot
            .map_or(true, |last| ctx.now.millis_since(last) >= ctx.fire_interval_ms);
        if input.fire_held && ready {
            self.last_shot = Some(ctx.now);
            let spread: &[f32] = if self.multishot_active(ctx.now) {
                &[-MULTISHOT_SPREAD, 0.0, MULTISHOT_SPREAD]
            } else {
                &[0.0]
            };
            commands.extend(spread.iter().map(|offset| Command::Fire {
                source: id,
                angle: aim + offset,
            }));
        }

        if let Some(ability) = input.ability {
            if self.ability_ready(ctx.now, ctx.ability_cooldown_ms) {
                commands.push(Command::UseAbility { target: id, ability });
            }
        }
        commands
    }

    /// Starts the ability cooldown after a successful use.
    pub fn ability_applied(&mut self, ability: Ability, now: SimTime) {
        self.last_ability = Some(now);
        if ability == Ability::Multishot {
            self.multishot_until = Some(now + MULTISHOT_DURATION_MS);
        }
    }

    /// Whether the global ability cooldown has passed.
    #[must_use]
    pub fn ability_ready(&self, now: SimTime, cooldown_ms: u64) -> bool {
        self.last_ability
            .map_or(true, |last| now.millis_since(last) >= cooldown_ms)
    }

    /// Whether player shots are tripled at `now`.
    #[must_use]
    pub fn multishot_active(&self, now: SimTime) -> bool {
        self.multishot_until.is_some_and(|until| now < until)
    }
}
