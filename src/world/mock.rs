//! In-memory world for testing without a game engine.
//!
//! [`MockLevel`] stores rails, solid blocks, water and entities in plain
//! collections and implements every world trait the carts need.
//!
//! | Trait | Behaviour |
//! |-------|-----------|
//! | [`RailLookup`] | Rails from a map; every solid block conducts redstone |
//! | [`Collider`] | Per-axis clipping against solid cells and other carts |
//! | [`EntityAccess`] | Entity list with mounting, impulses and an activator log |
//!
//! # Example
//!
//! ```rust
//! use railcart::{CartKind, Config, Minecart};
//! use railcart::track::{RailBlock, RailShape};
//! use railcart::traits::EntityId;
//! use railcart::world::MockLevel;
//! use glam::{DVec3, IVec3};
//!
//! let mut level = MockLevel::new();
//! for x in 0..8 {
//!     level.set_rail(IVec3::new(x, 0, 0), RailBlock::plain(RailShape::EastWest));
//! }
//!
//! let start = DVec3::new(0.5, 0.0, 0.5);
//! let mut cart = Minecart::spawn(EntityId(1), CartKind::Rideable, start, Config::default(), &level);
//! cart.body_mut().motion.velocity = DVec3::new(0.3, 0.0, 0.0);
//! cart.tick(&mut level);
//!
//! assert!(cart.body().motion.position.x > 0.7);
//! ```

use std::collections::{HashMap, HashSet};

use glam::{DVec3, IVec3};
use log::trace;

use crate::math::{cell_containing, Aabb};
use crate::minecart::{CartBody, CartKind, CART_HEIGHT, CART_WIDTH};
use crate::track::RailBlock;
use crate::traits::{
    Collider, EntityAccess, EntityId, EntityKind, Movement, NearbyEntity, RailLookup,
};

// ============================================================================
// Entities
// ============================================================================

/// An entity tracked by [`MockLevel`], with its collision size.
#[derive(Clone, Debug, PartialEq)]
pub struct MockEntity {
    /// The state handed out to carts.
    pub entity: NearbyEntity,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl MockEntity {
    /// Wraps `entity` with the usual size for its kind.
    pub fn new(entity: NearbyEntity) -> Self {
        let (width, height) = match entity.kind {
            EntityKind::Minecart { .. } => (CART_WIDTH, CART_HEIGHT),
            EntityKind::Player => (0.6, 1.8),
            EntityKind::IronGolem => (1.4, 2.7),
            EntityKind::Creature => (0.6, 0.9),
        };
        Self {
            entity,
            width,
            height,
        }
    }

    /// Current collision box.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::standing_at(self.entity.position, self.width, self.height)
    }
}

// ============================================================================
// Level
// ============================================================================

/// In-memory level.
///
/// Solid blocks are full cubes and double as redstone conductors. Carts
/// registered through [`sync_cart`](Self::sync_cart) block each other in
/// [`Collider::resolve_movement`]; other entities never block movement.
#[derive(Debug, Default, Clone)]
pub struct MockLevel {
    rails: HashMap<IVec3, RailBlock>,
    solids: HashSet<IVec3>,
    water: HashSet<IVec3>,
    entities: Vec<MockEntity>,
    activations: Vec<(EntityId, IVec3, bool)>,
}

impl MockLevel {
    /// Empty level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places (or replaces) a rail.
    pub fn set_rail(&mut self, cell: IVec3, rail: RailBlock) {
        self.rails.insert(cell, rail);
    }

    /// Removes a rail, returning it.
    pub fn remove_rail(&mut self, cell: IVec3) -> Option<RailBlock> {
        self.rails.remove(&cell)
    }

    /// Places a solid, conducting block.
    pub fn set_solid(&mut self, cell: IVec3) {
        self.solids.insert(cell);
    }

    /// Fills a cell with water.
    pub fn set_water(&mut self, cell: IVec3) {
        self.water.insert(cell);
    }

    /// Adds an entity, replacing any with the same id.
    pub fn add_entity(&mut self, entity: NearbyEntity) -> EntityId {
        let id = entity.id;
        self.entities.retain(|e| e.entity.id != id);
        self.entities.push(MockEntity::new(entity));
        id
    }

    /// Entity state by id.
    pub fn entity(&self, id: EntityId) -> Option<&NearbyEntity> {
        self.entities.iter().find(|e| e.entity.id == id).map(|e| &e.entity)
    }

    /// Mutable entity state by id.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut NearbyEntity> {
        self.entities
            .iter_mut()
            .find(|e| e.entity.id == id)
            .map(|e| &mut e.entity)
    }

    /// Activator rail callbacks received so far.
    pub fn activations(&self) -> &[(EntityId, IVec3, bool)] {
        &self.activations
    }

    /// Publishes a cart's state so other carts can see and collide with it.
    pub fn sync_cart(&mut self, body: &CartBody) {
        let kind = EntityKind::Minecart {
            rideable: body.kind.is_rideable(),
            furnace_lit: body.kind.is_active_furnace(),
        };
        if let Some(entity) = self.entity_mut(body.id) {
            entity.kind = kind;
            entity.position = body.motion.position;
            entity.velocity = body.motion.velocity;
            entity.yaw = body.motion.yaw;
            entity.has_passengers = body.is_vehicle();
            return;
        }

        let mut entity = NearbyEntity::new(body.id, kind, body.motion.position);
        entity.velocity = body.motion.velocity;
        entity.yaw = body.motion.yaw;
        entity.has_passengers = body.is_vehicle();
        self.entities.push(MockEntity::new(entity));
    }

    /// Copies impulses other carts applied back into `body`.
    pub fn pull_cart(&self, body: &mut CartBody) {
        if let Some(entity) = self.entity(body.id) {
            body.motion.velocity = entity.velocity;
        }
    }

    fn obstacles(&self, mover: EntityId, region: &Aabb) -> Vec<Aabb> {
        let lo = cell_containing(region.min);
        let hi = cell_containing(region.max);
        let mut boxes = Vec::new();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let cell = IVec3::new(x, y, z);
                    if self.solids.contains(&cell) {
                        boxes.push(Aabb::of_cell(cell));
                    }
                }
            }
        }
        boxes.extend(
            self.entities
                .iter()
                .filter(|e| e.entity.id != mover && e.entity.kind.is_minecart())
                .map(MockEntity::bounding_box)
                .filter(|b| b.intersects(&region.inflate(1e-7, 1e-7, 1e-7))),
        );
        boxes
    }
}

/// Gap below which two faces count as touching.
const CONTACT_EPSILON: f64 = 1.0e-7;

/// Clips `delta` along `axis` so that `moving` stays out of `obstacle`.
fn clip_axis(moving: &Aabb, obstacle: &Aabb, axis: usize, delta: f64) -> f64 {
    let overlaps = (0..3).filter(|&a| a != axis).all(|a| {
        moving.min[a] < obstacle.max[a] - CONTACT_EPSILON
            && moving.max[a] > obstacle.min[a] + CONTACT_EPSILON
    });
    if !overlaps {
        return delta;
    }
    if delta > 0.0 && obstacle.min[axis] >= moving.max[axis] - CONTACT_EPSILON {
        delta.min((obstacle.min[axis] - moving.max[axis]).max(0.0))
    } else if delta < 0.0 && obstacle.max[axis] <= moving.min[axis] + CONTACT_EPSILON {
        delta.max((obstacle.max[axis] - moving.min[axis]).min(0.0))
    } else {
        delta
    }
}

impl RailLookup for MockLevel {
    fn rail_at(&self, cell: IVec3) -> Option<RailBlock> {
        self.rails.get(&cell).copied()
    }

    fn is_redstone_conductor(&self, cell: IVec3) -> bool {
        self.solids.contains(&cell)
    }

    fn is_water(&self, cell: IVec3) -> bool {
        self.water.contains(&cell)
    }
}

impl Collider for MockLevel {
    fn resolve_movement(&self, mover: EntityId, bbox: &Aabb, delta: DVec3) -> Movement {
        let obstacles = self.obstacles(mover, &bbox.expand_towards(delta));
        let mut moving = *bbox;
        let mut applied = DVec3::ZERO;

        // Y first, then X, then Z
        for axis in [1, 0, 2] {
            let mut d = delta[axis];
            if d != 0.0 {
                for obstacle in &obstacles {
                    d = clip_axis(&moving, obstacle, axis, d);
                }
            }
            applied[axis] = d;
            let mut shift = DVec3::ZERO;
            shift[axis] = d;
            moving = moving.offset(shift);
        }

        let movement = Movement {
            applied,
            horizontal_collision: applied.x != delta.x || applied.z != delta.z,
            vertical_collision: applied.y != delta.y,
            on_ground: applied.y != delta.y && delta.y < 0.0,
        };
        if movement.horizontal_collision || movement.vertical_collision {
            trace!("{:?} clipped {:?} to {:?}", mover, delta, applied);
        }
        movement
    }
}

impl EntityAccess for MockLevel {
    fn entities_in(&self, bbox: &Aabb, exclude: EntityId) -> Vec<NearbyEntity> {
        self.entities
            .iter()
            .filter(|e| e.entity.id != exclude && e.bounding_box().intersects(bbox))
            .map(|e| e.entity.clone())
            .collect()
    }

    fn start_riding(&mut self, rider: EntityId, vehicle: EntityId) -> bool {
        match self.entity_mut(rider) {
            Some(entity) if entity.vehicle.is_none() => entity.vehicle = Some(vehicle),
            _ => return false,
        }
        if let Some(cart) = self.entity_mut(vehicle) {
            cart.has_passengers = true;
        }
        true
    }

    fn push_entity(&mut self, id: EntityId, impulse: DVec3) {
        if let Some(entity) = self.entity_mut(id) {
            entity.velocity += impulse;
        }
    }

    fn set_entity_velocity(&mut self, id: EntityId, velocity: DVec3) {
        if let Some(entity) = self.entity_mut(id) {
            entity.velocity = velocity;
        }
    }

    fn on_activator_rail(&mut self, cart: EntityId, cell: IVec3, powered: bool) {
        self.activations.push((cart, cell, powered));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::RailShape;

    fn cart_box(x: f64) -> Aabb {
        Aabb::standing_at(DVec3::new(x, 0.1, 0.5), CART_WIDTH, CART_HEIGHT)
    }

    #[test]
    fn rails_and_conductors() {
        let mut level = MockLevel::new();
        level.set_rail(IVec3::ZERO, RailBlock::plain(RailShape::EastWest));
        level.set_solid(IVec3::X);
        assert!(level.is_rail(IVec3::ZERO));
        assert!(level.is_redstone_conductor(IVec3::X));
        assert!(!level.is_redstone_conductor(IVec3::ZERO));

        assert!(level.remove_rail(IVec3::ZERO).is_some());
        assert!(!level.is_rail(IVec3::ZERO));
    }

    #[test]
    fn open_space_is_free() {
        let level = MockLevel::new();
        let delta = DVec3::new(0.3, -0.2, 0.1);
        assert_eq!(level.resolve_movement(EntityId(1), &cart_box(0.5), delta), Movement::free(delta));
    }

    #[test]
    fn floor_stops_fall() {
        let mut level = MockLevel::new();
        level.set_solid(IVec3::new(0, -1, 0));
        let bbox = Aabb::standing_at(DVec3::new(0.5, 0.2, 0.5), CART_WIDTH, CART_HEIGHT);
        let m = level.resolve_movement(EntityId(1), &bbox, DVec3::new(0.0, -0.5, 0.0));
        assert!((m.applied.y + 0.2).abs() < 1e-9);
        assert!(m.vertical_collision);
        assert!(m.on_ground);
        assert!(!m.horizontal_collision);
    }

    #[test]
    fn wall_clips_one_axis() {
        let mut level = MockLevel::new();
        level.set_solid(IVec3::new(1, 0, 0));
        let m = level.resolve_movement(EntityId(1), &cart_box(0.5), DVec3::new(0.3, 0.0, 0.2));
        assert!((m.applied.x - 0.01).abs() < 1e-9);
        assert_eq!(m.applied.z, 0.2);
        assert!(m.horizontal_collision);
        assert!(!m.on_ground);
    }

    #[test]
    fn carts_block_each_other_but_not_themselves() {
        let mut level = MockLevel::new();
        let other = CartBody::new(EntityId(2), CartKind::Rideable, DVec3::new(2.0, 0.1, 0.5));
        level.sync_cart(&other);

        let m = level.resolve_movement(EntityId(1), &cart_box(0.5), DVec3::new(1.0, 0.0, 0.0));
        assert!((m.applied.x - 0.52).abs() < 1e-9);

        let m = level.resolve_movement(EntityId(2), &cart_box(0.5), DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.applied.x, 1.0);
    }

    #[test]
    fn mounting_is_exclusive() {
        let mut level = MockLevel::new();
        let mob = level.add_entity(NearbyEntity::new(EntityId(5), EntityKind::Creature, DVec3::ZERO));
        let cart = level.add_entity(NearbyEntity::new(
            EntityId(1),
            EntityKind::Minecart { rideable: true, furnace_lit: false },
            DVec3::ZERO,
        ));

        assert!(level.start_riding(mob, cart));
        assert!(!level.start_riding(mob, cart));
        assert!(level.entity(cart).is_some_and(|e| e.has_passengers));
    }

    #[test]
    fn impulses_and_overrides() {
        let mut level = MockLevel::new();
        let id = level.add_entity(NearbyEntity::new(EntityId(5), EntityKind::Player, DVec3::ZERO));
        level.push_entity(id, DVec3::X);
        level.push_entity(id, DVec3::X);
        assert_eq!(level.entity(id).map(|e| e.velocity), Some(DVec3::new(2.0, 0.0, 0.0)));

        level.set_entity_velocity(id, DVec3::Z);
        assert_eq!(level.entity(id).map(|e| e.velocity), Some(DVec3::Z));
    }

    #[test]
    fn entities_in_excludes_self() {
        let mut level = MockLevel::new();
        level.add_entity(NearbyEntity::new(EntityId(1), EntityKind::Creature, DVec3::new(0.5, 0.0, 0.5)));
        level.add_entity(NearbyEntity::new(EntityId(2), EntityKind::Creature, DVec3::new(0.5, 0.0, 0.5)));
        level.add_entity(NearbyEntity::new(EntityId(3), EntityKind::Creature, DVec3::new(9.5, 0.0, 0.5)));

        let found = level.entities_in(&cart_box(0.5), EntityId(1));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, EntityId(2));
    }

    #[test]
    fn sync_and_pull_cart() {
        let mut level = MockLevel::new();
        let mut body = CartBody::new(EntityId(1), CartKind::Furnace { lit: true }, DVec3::ZERO);
        level.sync_cart(&body);
        assert_eq!(
            level.entity(EntityId(1)).map(|e| e.kind),
            Some(EntityKind::Minecart { rideable: false, furnace_lit: true })
        );

        level.set_entity_velocity(EntityId(1), DVec3::new(0.1, 0.0, 0.0));
        level.pull_cart(&mut body);
        assert_eq!(body.motion.velocity, DVec3::new(0.1, 0.0, 0.0));
    }
}
