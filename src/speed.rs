//! Speed model: the pure velocity transforms applied while on track.
//!
//! Each function takes a velocity and returns a new one; none of them touch
//! the cart. The continuous strategy chains them through the stage pipeline
//! in [`iteration`](crate::iteration); the legacy strategy calls a subset
//! inline.
//!
//! | Function | Effect |
//! |----------|--------|
//! | [`slope_speed`] | Pull toward the low end of an ascending rail |
//! | [`player_input_nudge`] | Tiny push from a riding player at low speed |
//! | [`halt_on_unpowered_rail`] | Brake on an unpowered powered rail |
//! | [`natural_slowdown_and_clamp`] | Friction, then the max speed cap |
//! | [`boost_on_powered_rail`] | Acceleration on an active powered rail |
//!
//! # Example
//!
//! ```rust
//! use railcart::speed::natural_slowdown_and_clamp;
//! use glam::DVec3;
//!
//! let v = natural_slowdown_and_clamp(DVec3::new(3.0, 0.0, 4.0), 0.997, 0.4);
//! assert!(v.length() <= 0.4 + 1e-9);
//! ```

use glam::DVec3;

use crate::config::{Config, FrictionMode, MovementMode};
use crate::math::{horizontal, horizontal_distance, horizontal_distance_sqr};
use crate::track::{RailBlock, RailShape};

/// Base slope acceleration per tick.
pub const SLOPE_ACCELERATION: f64 = 0.0078125;

/// Extra slope acceleration proportional to horizontal speed.
pub const SLOPE_SPEED_FACTOR: f64 = 0.02;

/// Magnitude of a player input nudge.
pub const PLAYER_NUDGE: f64 = 0.001;

/// Player input is ignored above this squared horizontal speed.
pub const PLAYER_NUDGE_MAX_SPEED_SQR: f64 = 0.01;

/// Below this speed an unpowered powered rail stops the cart outright.
pub const HALT_THRESHOLD: f64 = 0.03;

/// Above this speed an active powered rail lengthens the velocity.
pub const BOOST_THRESHOLD: f64 = 0.01;

/// Launch speed added when a stationary cart is kicked off a powered rail.
pub const LAUNCH_SPEED: f64 = 0.2;

/// Water drag applied on top of friction.
pub const WATER_DRAG: f64 = 0.95;

/// Acceleration toward the low exit of a slope.
///
/// Returns `v` unchanged on flat shapes.
pub fn slope_speed(v: DVec3, shape: RailShape, in_water: bool) -> DVec3 {
    let mut pull = SLOPE_ACCELERATION.max(horizontal_distance(v) * SLOPE_SPEED_FACTOR);
    if in_water {
        pull *= 0.2;
    }
    match shape {
        RailShape::AscendingEast => v - DVec3::new(pull, 0.0, 0.0),
        RailShape::AscendingWest => v + DVec3::new(pull, 0.0, 0.0),
        RailShape::AscendingNorth => v + DVec3::new(0.0, 0.0, pull),
        RailShape::AscendingSouth => v - DVec3::new(0.0, 0.0, pull),
        _ => v,
    }
}

/// Nudge from a riding player's movement intent.
///
/// Only applies when the cart is nearly stopped.
pub fn player_input_nudge(v: DVec3, intent: DVec3) -> DVec3 {
    if intent.length_squared() <= 0.0 || horizontal_distance_sqr(v) >= PLAYER_NUDGE_MAX_SPEED_SQR {
        return v;
    }
    let dir = horizontal(intent.normalize_or_zero()).normalize_or_zero();
    v + dir * PLAYER_NUDGE
}

/// Brake on an unpowered powered rail; pass-through on anything else.
pub fn halt_on_unpowered_rail(v: DVec3, rail: &RailBlock) -> DVec3 {
    if !rail.is_unpowered_booster() {
        return v;
    }
    if v.length() < HALT_THRESHOLD {
        DVec3::ZERO
    } else {
        v * 0.5
    }
}

/// Friction factor applied to horizontal velocity each tick.
pub fn friction_factor(mode: MovementMode, config: &Config, occupied: bool) -> f64 {
    if config.vehicle.friction == FrictionMode::Disabled {
        return 1.0;
    }
    if occupied || !config.vehicle.slow_when_empty {
        return 0.997;
    }
    match mode {
        MovementMode::Continuous => 0.975,
        MovementMode::Legacy => 0.96,
    }
}

/// Friction plus water drag, as applied to a velocity.
///
/// The vertical component is dropped.
pub fn natural_slowdown(v: DVec3, factor: f64, in_water: bool) -> DVec3 {
    let slowed = DVec3::new(v.x * factor, 0.0, v.z * factor);
    if in_water && factor != 1.0 {
        slowed * WATER_DRAG
    } else {
        slowed
    }
}

/// Friction and the speed cap in one step.
///
/// The result is horizontal and never longer than `max_speed`.
pub fn natural_slowdown_and_clamp(v: DVec3, factor: f64, max_speed: f64) -> DVec3 {
    clamp_length(natural_slowdown(v, factor, false), max_speed)
}

/// Rescales `v` to at most `max` long.
pub fn clamp_length(v: DVec3, max: f64) -> DVec3 {
    let len = v.length();
    if len <= 0.0 || !len.is_finite() {
        return if len.is_finite() { v } else { DVec3::ZERO };
    }
    v.normalize_or_zero() * len.min(max.max(0.0))
}

/// Acceleration on an active powered rail.
///
/// A moving cart gains `boost`; a nearly stopped one is launched along
/// `redstone_dir` (when non-zero).
pub fn boost_on_powered_rail(v: DVec3, rail: &RailBlock, boost: f64, redstone_dir: DVec3) -> DVec3 {
    if !rail.is_active_booster() {
        return v;
    }
    let len = v.length();
    if len > BOOST_THRESHOLD {
        v.normalize_or_zero() * (len + boost)
    } else if redstone_dir.length_squared() <= 0.0 {
        v
    } else {
        redstone_dir * (len + LAUNCH_SPEED)
    }
}

/// Top speed in blocks per tick.
pub fn max_speed(mode: MovementMode, config: &Config, in_water: bool) -> f64 {
    if let Some(speed) = config.vehicle.max_speed_override {
        return if in_water { speed / 2.0 } else { speed };
    }
    match mode {
        MovementMode::Continuous => {
            let rule = config.rules.rule_speed_per_tick();
            if in_water {
                rule * 0.5
            } else {
                rule
            }
        }
        MovementMode::Legacy => {
            if in_water {
                config.rules.legacy_water_max_speed
            } else {
                config.rules.legacy_max_speed
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
