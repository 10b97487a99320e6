//! Continuous track following.
//!
//! A tick is split into passes. Each pass looks up the rail under the cart,
//! runs the speed pipeline, then steps toward the exit of the current cell.
//! Whatever travel is left after reaching an exit carries into the next
//! pass, which sees the next cell's rail. Every pass that moved the cart
//! records a [`MinecartStep`](crate::interpolation::MinecartStep) so the
//! renderer can retrace the path through curves and slopes.
//!
//! # Pass Layout
//!
//! | Phase | On rail | Off rail |
//! |-------|---------|----------|
//! | Speed | stage pipeline | clamp, ground drag |
//! | Move | [`step_along_track`] | collider move |
//! | Budget | distance left past the exit | zero |
//! | Render | weighted step | weighted step |

use glam::{DVec3, IVec3};
use log::{trace, warn};

use crate::adjust::{adjust_to_rails, set_rotation};
use crate::config::{Config, MovementMode};
use crate::interpolation::{RenderPose, StepInterpolationQueue};
use crate::iteration::{StageContext, TrackIteration};
use crate::math::{
    bottom_center, cell_containing, horizontal, horizontal_distance, horizontal_distance_sqr,
    rot_lerp, yaw_toward, EPSILON,
};
use crate::minecart::{come_off_track, move_cart, CartBody};
use crate::track::{exits, is_descending, redstone_direction, RailKind, RailShape};
use crate::traits::{Level, MotionStrategy, RailLookup};

/// Speed below which a cart settles in the dip between two facing slopes.
const V_SHAPE_REST_SPEED_SQR: f64 = 0.005;

/// Multi-pass motion with weighted render steps.
#[derive(Clone, Debug, Default)]
pub struct ContinuousMotion {
    queue: StepInterpolationQueue,
}

impl ContinuousMotion {
    /// Strategy with an empty step queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render steps recorded so far.
    pub fn queue(&self) -> &StepInterpolationQueue {
        &self.queue
    }

    /// Mutable access to the render steps.
    pub fn queue_mut(&mut self) -> &mut StepInterpolationQueue {
        &mut self.queue
    }

    fn snap<W: RailLookup + ?Sized>(&mut self, body: &mut CartBody, level: &W) {
        let cell = body.current_block_pos_or_rail_below(level, MovementMode::Continuous);
        let rail = level.rail_at(cell);
        body.motion.on_rails = rail.is_some();
        if let Some(step) = adjust_to_rails(&mut body.motion, cell, rail, true) {
            self.queue.push_step(step);
        }
    }

    fn move_along_track<L: Level + ?Sized>(
        &mut self,
        body: &mut CartBody,
        config: &Config,
        level: &mut L,
    ) {
        let mut iteration = TrackIteration::new();
        while iteration.should_iterate() && body.alive {
            let incoming = body.motion.velocity;
            let pass_start = body.motion.position;
            let budget = iteration.movement_left;

            let cell = body.current_block_pos_or_rail_below(&*level, MovementMode::Continuous);
            let rail = level.rail_at(cell);
            if rail.is_some() != body.motion.on_rails {
                body.motion.on_rails = rail.is_some();
                if let Some(step) = adjust_to_rails(&mut body.motion, cell, rail, false) {
                    self.queue.push_step(step);
                }
            }

            match rail {
                Some(rail) => {
                    body.fall_distance = 0.0;
                    body.set_old_pos_and_rot();
                    if let RailKind::Activator { powered } = rail.kind {
                        level.on_activator_rail(body.id, cell, powered);
                    }

                    let ctx = StageContext::new(rail)
                        .with_water(body.in_water)
                        .with_player_intent(body.player_intent())
                        .with_friction(self.slowdown_factor(body, config))
                        .with_max_speed(self.max_speed(body, config))
                        .with_boost(config.rules.powered_rail_boost)
                        .with_redstone_direction(redstone_direction(&*level, cell, &rail));

                    let horizontal_in = horizontal(incoming);
                    let adjusted = iteration.run_pipeline(horizontal_in, &ctx);
                    iteration.record_speed(horizontal_in, adjusted);
                    body.motion.velocity = adjusted;
                    iteration.movement_left =
                        step_along_track(body, level, cell, rail.shape, iteration.movement_left);
                }
                None => {
                    let max_speed = self.max_speed(body, config);
                    come_off_track(body, MovementMode::Continuous, config, level, max_speed);
                    iteration.movement_left = 0.0;
                }
            }

            self.record_pass(body, config, incoming);

            let stalled = body.motion.position.distance(pass_start) < EPSILON
                && iteration.movement_left >= budget;
            if !iteration.first_iteration && stalled {
                warn!(
                    "cart {:?} made no progress at {:?}, dropping {:.5} travel",
                    body.id, body.motion.position, iteration.movement_left
                );
                break;
            }
            iteration.first_iteration = false;
        }
        trace!(
            "cart {:?} at {:?} v={:?}",
            body.id,
            body.motion.position,
            body.motion.velocity
        );
    }

    fn record_pass(&mut self, body: &mut CartBody, config: &Config, incoming: DVec3) {
        let delta = body.motion.position - body.old_position;
        let moved = delta.length();
        if moved > EPSILON {
            if horizontal_distance_sqr(delta) <= EPSILON {
                if !body.motion.on_rails {
                    body.motion.pitch = if body.on_ground {
                        0.0
                    } else {
                        rot_lerp(0.2, body.motion.pitch, 0.0)
                    };
                }
            } else {
                let mut yaw = yaw_toward(delta);
                let mut pitch = if body.on_ground && !body.motion.on_rails {
                    0.0
                } else {
                    90.0 - horizontal_distance(delta).atan2(delta.y).to_degrees() as f32
                };
                if body.motion.flipped {
                    yaw += 180.0;
                    pitch = -pitch;
                }
                set_rotation(&mut body.motion, yaw, pitch);
            }
            let weight = moved.min(self.max_speed(body, config)) as f32;
            self.queue.push_step(body.motion.step(weight));
        } else if horizontal_distance_sqr(incoming) > 0.0 {
            self.queue.push_step(body.motion.step(1.0));
        }
    }
}

impl MotionStrategy for ContinuousMotion {
    fn mode(&self) -> MovementMode {
        MovementMode::Continuous
    }

    fn on_spawn<W: RailLookup + ?Sized>(&mut self, body: &mut CartBody, level: &W) {
        self.snap(body, level);
    }

    fn tick<L: Level + ?Sized>(&mut self, body: &mut CartBody, config: &Config, level: &mut L) {
        self.queue.seed_origin(body.motion.pose());
        if body.first_tick {
            self.snap(body, &*level);
        }
        body.apply_gravity();
        self.move_along_track(body, config, level);
    }

    fn render_tick(&mut self, body: &CartBody) {
        self.queue.tick(body.motion.pose());
    }

    fn render_pose(&self, partial: f32) -> Option<RenderPose> {
        self.queue.query(partial)
    }
}

// ============================================================================
// Track stepping
// ============================================================================

/// Moves the cart up to `speed` blocks toward the exit of `cell`.
///
/// The exit is the one the horizontal velocity points at. The velocity is
/// re-aimed at that exit, keeping its horizontal speed, and the cart moves
/// through the collider. Returns the travel left after reaching the exit,
/// or zero when the cart stopped inside the cell.
pub fn step_along_track<L: Level + ?Sized>(
    body: &mut CartBody,
    level: &mut L,
    cell: IVec3,
    shape: RailShape,
    speed: f64,
) -> f64 {
    if speed < EPSILON {
        return 0.0;
    }

    let start = body.motion.position;
    let flat_velocity = horizontal(body.motion.velocity);
    let flat_speed = flat_velocity.length();
    if flat_speed < EPSILON {
        body.motion.velocity = DVec3::ZERO;
        return 0.0;
    }

    let pair = exits(shape);
    let (first, second) = pair.halves();
    let slope = pair.first.y != pair.second.y;

    let mut exit = horizontal(first);
    let other = horizontal(second);
    if flat_velocity.dot(exit) < flat_velocity.dot(other) {
        exit = other;
    }

    let mut target = bottom_center(cell) + exit + DVec3::new(0.0, 0.1, 0.0) + exit.normalize_or_zero() * EPSILON;
    if slope && !is_descending(flat_velocity, shape) {
        target.y += 1.0;
    }

    let dir = (target - start).normalize_or_zero();
    let dir_flat = horizontal_distance(dir);
    if dir_flat < EPSILON {
        body.motion.velocity = DVec3::ZERO;
        return 0.0;
    }
    let aimed = dir * (flat_speed / dir_flat);

    let reach = if slope { std::f64::consts::SQRT_2 } else { 1.0 };
    let mut next = start + aimed.normalize_or_zero() * (speed * reach);
    let left = if start.distance_squared(target) <= start.distance_squared(next) {
        let left = horizontal_distance(target - next);
        next = target;
        left
    } else {
        0.0
    };

    move_cart(body, MovementMode::Continuous, level, next - start);

    if slope {
        if let Some(next_rail) = level.rail_at(cell_containing(next)) {
            if rest_at_v_shape(body, shape, next_rail.shape) {
                return 0.0;
            }
        }
        let pos = body.motion.position;
        let run = horizontal_distance(target - pos);
        let line_y = target.y + if is_descending(aimed, shape) { run } else { -run };
        if pos.y < line_y {
            body.motion.position.y = line_y;
        }
    }

    if body.motion.position.distance(start) < EPSILON && next.distance(start) > EPSILON {
        body.motion.velocity = DVec3::ZERO;
        return 0.0;
    }
    body.motion.velocity = aimed;
    left
}

/// Stops a slow cart that is about to climb out of a dip.
fn rest_at_v_shape(body: &mut CartBody, current: RailShape, next: RailShape) -> bool {
    let v = body.motion.velocity;
    if v.length_squared() < V_SHAPE_REST_SPEED_SQR
        && next.is_slope()
        && is_descending(v, current)
        && !is_descending(v, next)
    {
        body.motion.velocity = DVec3::ZERO;
        return true;
    }
    false
}

// ============================================================================
// Tests
// ============================================================================
