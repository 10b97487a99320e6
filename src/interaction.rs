//! Pushing and picking up nearby entities.
//!
//! After a move, a cart looks at what it touches:
//! - an empty rideable cart mounts the first mob it can
//! - players, golems and other carts are shoved apart
//! - two carts exchange momentum, with a burning furnace cart dominating
//!
//! The continuous strategy runs [`push_and_pickup`] inside every collider
//! move; the legacy one runs [`push_and_pickup_legacy`] once per tick.

use glam::DVec3;
use log::debug;

use crate::config::MovementMode;
use crate::math::{horizontal_distance_sqr, Aabb};
use crate::minecart::{CartBody, Passenger};
use crate::traits::{EntityKind, Level, NearbyEntity};

/// Impulse scale of a push.
const PUSH_STRENGTH: f64 = 0.05;

/// Mobs are only pushed when further apart than this along the major axis.
const MIN_ENTITY_SEPARATION: f64 = 0.01;

/// Carts are only pushed when their squared distance is at least this.
const MIN_CART_SEPARATION_SQR: f64 = 1.0e-4;

/// Legacy carts only push carts roughly in line with their facing.
const LEGACY_ALIGNMENT: f64 = 0.8;

/// Velocity kept by a cart that is rammed.
const RAMMED_KEEP: DVec3 = DVec3::new(0.2, 1.0, 0.2);

/// Velocity kept by a furnace cart ramming another cart.
const FURNACE_KEEP: DVec3 = DVec3::new(0.95, 1.0, 0.95);

/// Legacy carts need this squared speed before picking anything up.
const LEGACY_PICKUP_SPEED_SQR: f64 = 0.01;

/// Pickup and push round after a continuous move.
///
/// Returns `true` when the cart mounted someone and was not blocked by
/// anyone it pushed; the caller then re-issues the move.
pub fn push_and_pickup<L: Level + ?Sized>(body: &mut CartBody, level: &mut L) -> bool {
    let bbox = body.bounding_box();
    let picked = pickup_entities(body, level, &bbox.inflate(0.2, 0.0, 0.2));
    if !body.horizontal_collision && !body.vertical_collision {
        return false;
    }
    let pushed = push_entities(body, MovementMode::Continuous, level, &bbox.inflate(1.0e-7, 1.0e-7, 1.0e-7));
    picked && !pushed
}

/// Mounts the first eligible mob in `bbox`.
///
/// Only empty rideable carts pick anything up; players, golems, carts and
/// entities already riding something are skipped.
pub fn pickup_entities<L: Level + ?Sized>(body: &mut CartBody, level: &mut L, bbox: &Aabb) -> bool {
    if !body.kind.is_rideable() || body.is_vehicle() {
        return false;
    }
    for entity in level.entities_in(bbox, body.id) {
        if !pushable_by(body, &entity) || entity.kind.is_push_only() || entity.is_passenger() {
            continue;
        }
        if level.start_riding(entity.id, body.id) {
            debug!("cart {:?} picked up {:?}", body.id, entity.id);
            body.passenger = Some(Passenger::new(entity.id));
            return true;
        }
    }
    false
}

/// Pushes entities in `bbox` away from the cart. Returns whether any were.
pub fn push_entities<L: Level + ?Sized>(
    body: &mut CartBody,
    mode: MovementMode,
    level: &mut L,
    bbox: &Aabb,
) -> bool {
    let mut pushed = false;
    for entity in level.entities_in(bbox, body.id) {
        let push = if body.kind.is_rideable() {
            pushable_by(body, &entity)
                && (entity.kind.is_push_only() || body.is_vehicle() || entity.is_passenger())
        } else {
            !body.carries(entity.id) && entity.pushable && entity.kind.is_minecart()
        };
        if push {
            push_away(body, mode, level, &entity);
            pushed = true;
        }
    }
    pushed
}

/// Once-per-tick pickup and push of the legacy strategy.
pub fn push_and_pickup_legacy<L: Level + ?Sized>(body: &mut CartBody, level: &mut L) {
    let bbox = body.bounding_box().inflate(0.2, 0.0, 0.2);
    let fast = horizontal_distance_sqr(body.motion.velocity) >= LEGACY_PICKUP_SPEED_SQR;

    if body.kind.is_rideable() && fast {
        for entity in level.entities_in(&bbox, body.id) {
            if !pushable_by(body, &entity) {
                continue;
            }
            if !entity.kind.is_push_only() && !body.is_vehicle() && !entity.is_passenger() {
                if level.start_riding(entity.id, body.id) {
                    debug!("cart {:?} picked up {:?}", body.id, entity.id);
                    body.passenger = Some(Passenger::new(entity.id));
                }
            } else {
                push_away(body, MovementMode::Legacy, level, &entity);
            }
        }
    } else {
        for entity in level.entities_in(&bbox, body.id) {
            if !body.carries(entity.id) && entity.pushable && entity.kind.is_minecart() {
                push_away(body, MovementMode::Legacy, level, &entity);
            }
        }
    }
}

fn pushable_by(body: &CartBody, entity: &NearbyEntity) -> bool {
    entity.pushable && !body.carries(entity.id) && entity.vehicle != Some(body.id)
}

fn push_away<L: Level + ?Sized>(
    body: &mut CartBody,
    mode: MovementMode,
    level: &mut L,
    entity: &NearbyEntity,
) {
    if entity.no_physics {
        return;
    }
    match entity.kind {
        EntityKind::Minecart { furnace_lit, .. } => push_minecart(body, mode, level, entity, furnace_lit),
        _ => push_mob(body, level, entity),
    }
}

fn push_mob<L: Level + ?Sized>(body: &mut CartBody, level: &mut L, entity: &NearbyEntity) {
    let mut dx = body.motion.position.x - entity.position.x;
    let mut dz = body.motion.position.z - entity.position.z;
    let major = dx.abs().max(dz.abs());
    if major < MIN_ENTITY_SEPARATION {
        return;
    }

    let root = major.sqrt();
    let falloff = (1.0 / root).min(1.0) * PUSH_STRENGTH;
    dx = dx / root * falloff;
    dz = dz / root * falloff;

    if !entity.has_passengers {
        level.push_entity(entity.id, DVec3::new(-dx, 0.0, -dz));
    }
    if !body.is_vehicle() {
        body.motion.velocity += DVec3::new(dx, 0.0, dz);
    }
}

fn push_minecart<L: Level + ?Sized>(
    body: &mut CartBody,
    mode: MovementMode,
    level: &mut L,
    other: &NearbyEntity,
    other_lit: bool,
) {
    let towards = body.motion.position - other.position;
    let dist_sqr = horizontal_distance_sqr(towards);
    if dist_sqr < MIN_CART_SEPARATION_SQR {
        return;
    }
    let dist = dist_sqr.sqrt();
    let falloff = (1.0 / dist).min(1.0) * PUSH_STRENGTH;
    let d = DVec3::new(towards.x / dist * falloff, 0.0, towards.z / dist * falloff);

    if mode == MovementMode::Legacy {
        let yaw = other.yaw.to_radians();
        let facing = DVec3::new(yaw.cos() as f64, 0.0, yaw.sin() as f64);
        let line = DVec3::new(towards.x, 0.0, towards.z).normalize_or_zero();
        if line.dot(facing).abs() < LEGACY_ALIGNMENT {
            return;
        }
    }

    let ours = body.motion.velocity;
    let theirs = other.velocity;
    let lit = body.kind.is_active_furnace();

    let (ours_after, theirs_after) = if lit && !other_lit {
        (
            ours * FURNACE_KEEP,
            theirs * RAMMED_KEEP + DVec3::new(ours.x - d.x, 0.0, ours.z - d.z),
        )
    } else if other_lit && !lit {
        (
            ours * RAMMED_KEEP + DVec3::new(theirs.x + d.x, 0.0, theirs.z + d.z),
            theirs * FURNACE_KEEP,
        )
    } else {
        let mean = DVec3::new((ours.x + theirs.x) / 2.0, 0.0, (ours.z + theirs.z) / 2.0);
        (ours * RAMMED_KEEP + mean + d, theirs * RAMMED_KEEP + mean - d)
    };

    debug!("cart {:?} pushed cart {:?}", body.id, other.id);
    body.motion.velocity = ours_after;
    level.set_entity_velocity(other.id, theirs_after);
}

// ============================================================================
// Tests
// ============================================================================
