//! Small 2D helpers on top of [`glam::Vec2`].

use glam::Vec2;

/// Angle (radians) of the vector pointing from `from` to `to`.
#[must_use]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Unit vector pointing along `angle` (radians).
#[must_use]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Step toward `to` scaled by `speed`, or `None` when already within
/// `arrive_radius` of it.
///
/// The returned vector is the normalized direction times `speed`; callers
/// hand it to [`Tank::move_by`](crate::entity::Tank::move_by), which applies
/// the tank's own speed on top.
#[must_use]
pub fn step_toward(from: Vec2, to: Vec2, speed: f32, arrive_radius: f32) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    if distance > arrive_radius {
        Some(delta / distance * speed)
    } else {
        None
    }
}
