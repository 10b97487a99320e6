//! Legacy single-projection movement.
//!
//! Every tick the cart is projected once onto the chord of the rail cell it
//! stands in, moved by its velocity and then dropped back onto the track
//! height at its new position. A cart moving faster than one cell per tick
//! skips over whatever rails lie in between.
//!
//! Potential energy is traded for speed from the height change along the
//! track, which is what lets a cart coast down a hill and up the next one.

use glam::{DVec3, IVec3};
use log::trace;

use crate::config::{Config, MovementMode};
use crate::interaction;
use crate::interpolation::{LegacyLerp, RenderPose};
use crate::math::{horizontal_distance, horizontal_distance_sqr, wrap_degrees};
use crate::minecart::{come_off_track, move_cart, CartBody};
use crate::speed::{self, HALT_THRESHOLD, PLAYER_NUDGE, PLAYER_NUDGE_MAX_SPEED_SQR};
use crate::track::{exits, RailBlock, RailKind, RailShape, EAST, NORTH, SOUTH, WEST};
use crate::traits::{Level, MotionStrategy, RailLookup};

/// Sub-steps the renderer spends on each synced pose.
pub const LEGACY_SYNC_STEPS: u32 = 3;

/// Horizontal speed cap applied before the chord projection.
const TRACK_SPEED_CAP: f64 = 2.0;

/// Fraction of a height drop converted into horizontal speed.
const ENERGY_EXCHANGE: f64 = 0.05;

/// Speed given to a stopped cart on an active powered rail next to a conductor.
const KICK_SPEED: f64 = 0.02;

/// Track height above the cell floor.
const RAIL_HEIGHT: f64 = 0.0625;

/// Projection onto the track chord with fixed-count render lerp.
#[derive(Clone, Debug, Default)]
pub struct LegacyMotion {
    lerp: LegacyLerp,
}

impl LegacyMotion {
    /// Strategy with an idle lerp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render lerp state.
    pub fn lerp(&self) -> &LegacyLerp {
        &self.lerp
    }
}

impl MotionStrategy for LegacyMotion {
    fn mode(&self) -> MovementMode {
        MovementMode::Legacy
    }

    fn tick<L: Level + ?Sized>(&mut self, body: &mut CartBody, config: &Config, level: &mut L) {
        body.apply_gravity();

        let cell = body.current_block_pos_or_rail_below(&*level, MovementMode::Legacy);
        let rail = level.rail_at(cell);
        body.motion.on_rails = rail.is_some();

        let max_speed = self.max_speed(body, config);
        match rail {
            Some(rail) => {
                let friction = self.slowdown_factor(body, config);
                move_along_track(body, config, level, cell, rail, max_speed, friction);
                if let RailKind::Activator { powered } = rail.kind {
                    level.on_activator_rail(body.id, cell, powered);
                }
            }
            None => come_off_track(body, MovementMode::Legacy, config, level, max_speed),
        }

        update_rotation(body);
        interaction::push_and_pickup_legacy(body, level);

        self.lerp.lerp_to(body.motion.pose(), LEGACY_SYNC_STEPS);
        self.lerp.lerp_motion(body.motion.velocity);
        trace!(
            "cart {:?} at {:?} v={:?}",
            body.id,
            body.motion.position,
            body.motion.velocity
        );
    }

    fn render_tick(&mut self, _body: &CartBody) {
        self.lerp.tick();
    }

    fn render_pose(&self, partial: f32) -> Option<RenderPose> {
        self.lerp.pose(partial)
    }
}

/// Yaw from the tick's movement, with the legacy reversal rule.
fn update_rotation(body: &mut CartBody) {
    let state = &mut body.motion;
    state.pitch = 0.0;

    let dx = body.old_position.x - state.position.x;
    let dz = body.old_position.z - state.position.z;
    if dx * dx + dz * dz > 0.001 {
        state.yaw = dz.atan2(dx).to_degrees() as f32;
        if state.flipped {
            state.yaw += 180.0;
        }
    }

    let turn = wrap_degrees(state.yaw - body.old_yaw);
    if !(-170.0..170.0).contains(&turn) {
        state.yaw += 180.0;
        state.flipped = !state.flipped;
    }

    state.pitch %= 360.0;
    state.yaw %= 360.0;
}

fn move_along_track<L: Level + ?Sized>(
    body: &mut CartBody,
    config: &Config,
    level: &mut L,
    cell: IVec3,
    rail: RailBlock,
    max_speed: f64,
    friction: f64,
) {
    body.fall_distance = 0.0;
    let start = body.motion.position;
    let before = legacy_track_point(&*level, start);

    let boosting = rail.is_active_booster();
    let mut halting = rail.is_unpowered_booster();
    let shape = rail.shape;

    let intent = body.player_intent();
    let mut y = cell.y as f64;
    let mut pull = speed::SLOPE_ACCELERATION;
    if body.in_water {
        pull *= 0.2;
    }
    let v = &mut body.motion.velocity;
    match shape {
        RailShape::AscendingEast => v.x -= pull,
        RailShape::AscendingWest => v.x += pull,
        RailShape::AscendingNorth => v.z += pull,
        RailShape::AscendingSouth => v.z -= pull,
        _ => {}
    }
    if shape.is_slope() {
        y += 1.0;
    }

    // Align the velocity with the chord, pointing the way the cart was going
    let pair = exits(shape);
    let (first, second) = (pair.first, pair.second);
    let mut dx = (second.x - first.x) as f64;
    let mut dz = (second.z - first.z) as f64;
    let chord = (dx * dx + dz * dz).sqrt();
    if v.x * dx + v.z * dz < 0.0 {
        dx = -dx;
        dz = -dz;
    }
    let h = horizontal_distance(*v).min(TRACK_SPEED_CAP);
    *v = DVec3::new(h * dx / chord, v.y, h * dz / chord);

    if let Some(intent) = intent {
        if intent.length_squared() > 0.0 && horizontal_distance_sqr(*v) < PLAYER_NUDGE_MAX_SPEED_SQR {
            v.x += intent.x * PLAYER_NUDGE;
            v.z += intent.z * PLAYER_NUDGE;
            halting = false;
        }
    }

    if halting {
        if horizontal_distance(*v) < HALT_THRESHOLD {
            *v = DVec3::ZERO;
        } else {
            *v *= DVec3::new(0.5, 0.0, 0.5);
        }
    }

    // Project onto the chord
    let x0 = cell.x as f64 + 0.5 + first.x as f64 * 0.5;
    let z0 = cell.z as f64 + 0.5 + first.z as f64 * 0.5;
    let x1 = cell.x as f64 + 0.5 + second.x as f64 * 0.5;
    let z1 = cell.z as f64 + 0.5 + second.z as f64 * 0.5;
    let (cx, cz) = (x1 - x0, z1 - z0);
    let t = chord_param(start.x, start.z, cell, x0, z0, cx, cz);
    body.motion.position = DVec3::new(x0 + cx * t, y, z0 + cz * t);

    let scale = if body.is_vehicle() { 0.75 } else { 1.0 };
    let v = body.motion.velocity;
    let delta = DVec3::new(
        (scale * v.x).clamp(-max_speed, max_speed),
        0.0,
        (scale * v.z).clamp(-max_speed, max_speed),
    );
    move_cart(body, MovementMode::Legacy, level, delta);

    // Step onto the next level when leaving through a raised exit
    let p = body.motion.position;
    let (fx, fz) = (p.x.floor() as i32 - cell.x, p.z.floor() as i32 - cell.z);
    if first.y != 0 && fx == first.x && fz == first.z {
        body.motion.position.y += first.y as f64;
    } else if second.y != 0 && fx == second.x && fz == second.z {
        body.motion.position.y += second.y as f64;
    }

    body.motion.velocity = speed::natural_slowdown(body.motion.velocity, friction, body.in_water);

    if let (Some(before), Some(after)) = (before, legacy_track_point(&*level, body.motion.position)) {
        let gain = (before.y - after.y) * ENERGY_EXCHANGE;
        let v = &mut body.motion.velocity;
        let speed = horizontal_distance(*v);
        if speed > 0.0 {
            let factor = (speed + gain) / speed;
            v.x *= factor;
            v.z *= factor;
        }
        body.motion.position.y = after.y;
    }

    let p = body.motion.position;
    let (nx, nz) = (p.x.floor() as i32, p.z.floor() as i32);
    if nx != cell.x || nz != cell.z {
        let v = &mut body.motion.velocity;
        let speed = horizontal_distance(*v);
        *v = DVec3::new(speed * (nx - cell.x) as f64, v.y, speed * (nz - cell.z) as f64);
    }

    if boosting {
        let boost = config.rules.powered_rail_boost;
        let v = &mut body.motion.velocity;
        let speed = horizontal_distance(*v);
        if speed > speed::BOOST_THRESHOLD {
            v.x += v.x / speed * boost;
            v.z += v.z / speed * boost;
        } else {
            kick_from_conductor(&*level, cell, shape, v);
        }
    }
}

fn kick_from_conductor<W: RailLookup + ?Sized>(level: &W, cell: IVec3, shape: RailShape, v: &mut DVec3) {
    match shape {
        RailShape::EastWest => {
            if level.is_redstone_conductor(cell + WEST) {
                v.x = KICK_SPEED;
            } else if level.is_redstone_conductor(cell + EAST) {
                v.x = -KICK_SPEED;
            }
        }
        RailShape::NorthSouth => {
            if level.is_redstone_conductor(cell + NORTH) {
                v.z = KICK_SPEED;
            } else if level.is_redstone_conductor(cell + SOUTH) {
                v.z = -KICK_SPEED;
            }
        }
        _ => {}
    }
}

fn chord_param(x: f64, z: f64, cell: IVec3, x0: f64, z0: f64, cx: f64, cz: f64) -> f64 {
    if cx == 0.0 {
        z - cell.z as f64
    } else if cz == 0.0 {
        x - cell.x as f64
    } else {
        ((x - x0) * cx + (z - z0) * cz) * 2.0
    }
}

/// Point on the track nearest `p`, at rail height.
///
/// Looks in the cell containing `p`, or the one below when that holds a
/// rail. Returns `None` when neither does.
pub fn legacy_track_point<W: RailLookup + ?Sized>(level: &W, p: DVec3) -> Option<DVec3> {
    let mut cell = p.floor().as_ivec3();
    if level.is_rail(cell - IVec3::Y) {
        cell.y -= 1;
    }
    let rail = level.rail_at(cell)?;
    let pair = exits(rail.shape);
    let (first, second) = (pair.first.as_dvec3(), pair.second.as_dvec3());
    let base = DVec3::new(cell.x as f64 + 0.5, cell.y as f64 + RAIL_HEIGHT, cell.z as f64 + 0.5);
    let a = base + first * 0.5;
    let b = base + second * 0.5;

    let (dx, dy, dz) = (b.x - a.x, (b.y - a.y) * 2.0, b.z - a.z);
    let t = chord_param(p.x, p.z, cell, a.x, a.z, dx, dz);
    let mut point = DVec3::new(a.x + dx * t, a.y + dy * t, a.z + dz * t);
    if dy < 0.0 {
        point.y += 1.0;
    } else if dy > 0.0 {
        point.y += 0.5;
    }
    Some(point)
}

// ============================================================================
// Tests
// ============================================================================
