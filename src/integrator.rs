//! Velocity and position integration.
//!
//! Each tick the net force is scaled by `capped_dt * FORCE_TO_VELOCITY` and
//! added to the velocity, the velocity is clamped to the speed cap, and the
//! position advances by `velocity * capped_dt`. Facing is then re-derived
//! from the new velocity.

use crate::agent::Agent;
use crate::config::{FORCE_TO_VELOCITY, MAX_TICK_DELTA};
use glam::{Mat3, Quat, Vec3};

/// Clamp a host frame time to the largest step the simulation integrates.
#[inline]
pub fn cap_delta(dt: f32) -> f32 {
    dt.min(MAX_TICK_DELTA)
}

/// Scale `velocity` down so its length never exceeds `max_speed`.
///
/// `clamp_length_max` alone can land a few ulps above the cap after
/// rounding, so the result is nudged down until the length is within it.
pub fn clamp_speed(velocity: Vec3, max_speed: f32) -> Vec3 {
    let mut clamped = velocity.clamp_length_max(max_speed);
    let mut shrink = 1.0 - f32::EPSILON;
    while clamped.length() > max_speed {
        clamped *= shrink;
        shrink *= shrink;
    }
    clamped
}

/// Velocity after applying `force` for `capped_dt` seconds, clamped to `max_speed`.
///
/// The result is always finite with magnitude `<= max_speed` when the
/// previous velocity was finite.
pub fn step_velocity(velocity: Vec3, force: Vec3, capped_dt: f32, max_speed: f32) -> Vec3 {
    if !force.is_finite() {
        return clamp_speed(velocity, max_speed);
    }
    let next = velocity + force * (capped_dt * FORCE_TO_VELOCITY);
    if next.is_finite() {
        clamp_speed(next, max_speed)
    } else {
        // Overflowed: keep the direction the force was pushing.
        clamp_speed(force.normalize_or_zero() * max_speed, max_speed)
    }
}

/// Advance one agent by one tick.
pub fn integrate<T>(agent: &mut Agent<T>, force: Vec3, capped_dt: f32, max_speed: f32) {
    agent.velocity = step_velocity(agent.velocity, force, capped_dt, max_speed);
    agent.position += agent.velocity * capped_dt;
    agent.facing = facing(agent.velocity);
}

/// Orientation that looks along `velocity`.
///
/// Built as a look-at basis from the agent toward `position - velocity` with
/// world +Y as up, so the local -Z axis points along the direction of travel
/// and the local +Z axis points backward. A zero velocity, or one parallel to
/// the up axis, yields a valid rotation rather than NaN.
pub fn facing(velocity: Vec3) -> Quat {
    let up = Vec3::Y;

    let mut z = -velocity;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        // Looking straight up or down: nudge off the up axis.
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
