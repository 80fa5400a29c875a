//! Smoothed follow camera.
//!
//! The camera only serves coordinate transforms (aiming) and visibility
//! queries. It tracks its target by id and never owns the tank; the
//! orchestrator passes the target's position in on every update.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Fraction of the remaining distance covered per update.
pub const CAMERA_SMOOTHING: f32 = 0.1;

/// View window over the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    target: EntityId,
    position: Vec2,
    world_size: Vec2,
    viewport: Vec2,
}

impl Camera {
    /// Creates a camera centered (within bounds) on `target_position`.
    #[must_use]
    pub fn new(target: EntityId, target_position: Vec2, world_size: Vec2, viewport: Vec2) -> Self {
        let mut camera = Self {
            target,
            position: Vec2::ZERO,
            world_size,
            viewport,
        };
        camera.position = camera.clamp(camera.desired(target_position));
        camera
    }

    fn desired(&self, target_position: Vec2) -> Vec2 {
        target_position - self.viewport / 2.0
    }

    fn clamp(&self, position: Vec2) -> Vec2 {
        let max = (self.world_size - self.viewport).max(Vec2::ZERO);
        position.clamp(Vec2::ZERO, max)
    }

    /// Moves a tenth of the way toward centering `target_position`, then
    /// clamps to `[0, world - viewport]` on each axis.
    pub fn update(&mut self, target_position: Vec2) {
        let desired = self.desired(target_position);
        self.position += (desired - self.position) * CAMERA_SMOOTHING;
        self.position = self.clamp(self.position);
    }

    /// Jumps straight to the clamped centered position (used on level load).
    pub fn snap_to(&mut self, target_position: Vec2) {
        self.position = self.clamp(self.desired(target_position));
    }

    /// Converts a viewport position to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    /// Returns true if `world` lies inside the view, grown by `margin`.
    #[must_use]
    pub fn is_visible(&self, world: Vec2, margin: f32) -> bool {
        let local = world - self.position;
        local.x >= -margin
            && local.y >= -margin
            && local.x <= self.viewport.x + margin
            && local.y <= self.viewport.y + margin
    }

    /// Handles a viewport resize; the position is re-clamped.
    pub fn update_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.position = self.clamp(self.position);
    }

    /// Top-left corner of the view in world space.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// The tracked entity.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        self.target
    }
}
