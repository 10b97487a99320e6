//! Snapping a cart onto the chord of its rail cell.
//!
//! Used by the continuous strategy when a cart spawns and whenever it gets
//! on or off the track. Straight and ascending shapes only correct the axis
//! across the track; curves project the position onto the diagonal chord.
//! Ascending shapes also lift the cart to the slope height at its corrected
//! position and tilt it 45 degrees.

use glam::{DVec3, IVec3};
use log::debug;

use crate::interpolation::MinecartStep;
use crate::math::{bottom_center, center, horizontal, horizontal_distance, yaw_toward};
use crate::minecart::MotionState;
use crate::track::{exits, is_descending, RailBlock};

/// Height of a cart above its rail.
pub const RAIL_CLEARANCE: f64 = 0.1;

/// Pitch of a cart on an ascending rail.
pub const SLOPE_PITCH: f32 = 45.0;

/// Moves `state` onto the chord of `rail` at `cell`.
///
/// Returns the step to queue for the renderer when the cart moved. With
/// `snap_to_start` the step has zero weight and is drawn instantly.
///
/// # Example
///
/// ```rust
/// use railcart::adjust::adjust_to_rails;
/// use railcart::minecart::MotionState;
/// use railcart::track::{RailBlock, RailShape};
/// use glam::{DVec3, IVec3};
///
/// let mut state = MotionState::at(DVec3::new(0.5, 0.0, 0.8));
/// let step = adjust_to_rails(
///     &mut state,
///     IVec3::ZERO,
///     Some(RailBlock::plain(RailShape::EastWest)),
///     true,
/// );
///
/// assert!((state.position.z - 0.5).abs() < 1e-9);
/// assert!((state.position.y - 0.1).abs() < 1e-9);
/// assert_eq!(step.map(|s| s.weight), Some(0.0));
/// ```
pub fn adjust_to_rails(
    state: &mut MotionState,
    cell: IVec3,
    rail: Option<RailBlock>,
    snap_to_start: bool,
) -> Option<MinecartStep> {
    let rail = rail?;
    let shape = rail.shape;
    let pair = exits(shape);
    let (a, b) = pair.halves();

    let v = state.velocity;
    let (mut forward, mut back) = (horizontal(a), horizontal(b));
    if (v.length() > crate::math::EPSILON && v.dot(forward) < v.dot(back))
        || is_descending(back, shape)
    {
        std::mem::swap(&mut forward, &mut back);
    }

    let flip = if state.flipped { 180.0 } else { 0.0 };
    let mut yaw = yaw_toward(forward) + flip;

    let start = state.position;
    let base = bottom_center(cell);
    let mut corrected = if shape.is_curve() {
        let chord = b - a;
        let len_sqr = chord.length_squared();
        if len_sqr <= 0.0 {
            return None;
        }
        let projected = chord * (chord.dot(start - base - a) / len_sqr);
        yaw = yaw_toward(projected) + flip;
        base + a + projected
    } else {
        let along_x = (a - b).x != 0.0;
        let along_z = (a - b).z != 0.0;
        let mid = center(cell);
        DVec3::new(
            if along_z { mid.x } else { start.x },
            cell.y as f64,
            if along_x { mid.z } else { start.z },
        )
    };

    let mut pitch = 0.0;
    if shape.is_slope() {
        let low = if pair.first.y < pair.second.y { a } else { b };
        let rise = horizontal_distance(base + horizontal(low) - corrected).min(1.0);
        corrected.y += rise + RAIL_CLEARANCE;
        pitch = if state.flipped { SLOPE_PITCH } else { -SLOPE_PITCH };
    } else {
        corrected.y += RAIL_CLEARANCE;
    }

    state.position = corrected;
    set_rotation(state, yaw, pitch);

    let moved = start.distance(corrected);
    if moved > 0.0 {
        let weight = if snap_to_start { 0.0 } else { moved as f32 };
        Some(state.step(weight))
    } else {
        None
    }
}

/// Applies a new yaw and pitch, resolving near-180 degree turns.
///
/// A yaw change between 175 and 185 degrees is treated as the cart
/// reversing: `flipped` toggles and the model keeps its facing. Pitch is
/// clamped to the slope angle. Returns whether the flag toggled.
pub fn set_rotation(state: &mut MotionState, yaw: f32, pitch: f32) -> bool {
    let (mut yaw, mut pitch) = (yaw, pitch);
    let turn = (yaw - state.yaw).abs();
    let toggled = (175.0..=185.0).contains(&turn);
    if toggled {
        state.flipped = !state.flipped;
        yaw -= 180.0;
        pitch = -pitch;
        debug!("flip toggled to {} at yaw {:.1}", state.flipped, yaw);
    }

    state.pitch = pitch.clamp(-SLOPE_PITCH, SLOPE_PITCH) % 360.0;
    state.yaw = yaw % 360.0;
    toggled
}

// ============================================================================
// Tests
// ============================================================================
