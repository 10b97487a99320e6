//! Entity access traits used for mounting and pushing.
//!
//! Carts interact with whatever else is nearby: they pick up mobs as
//! passengers and shove players, golems and other carts out of the way.
//! The surrounding entity system is reached through [`EntityAccess`]; the
//! cart only ever sees [`NearbyEntity`] snapshots and issues impulses back.

use glam::{DVec3, IVec3};

use crate::math::Aabb;
use crate::traits::{Collider, RailLookup};

/// Opaque entity handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

/// What sort of entity a neighbour is, as far as cart collisions care.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    /// A player. Never picked up, always pushed.
    Player,
    /// An iron golem. Never picked up, always pushed.
    IronGolem,
    /// Another cart.
    Minecart {
        /// Whether it accepts passengers.
        rideable: bool,
        /// Whether it is a furnace cart that is currently burning fuel.
        furnace_lit: bool,
    },
    /// Any other mob.
    Creature,
}

impl EntityKind {
    /// Players, golems and carts are pushed rather than picked up.
    #[inline]
    pub const fn is_push_only(&self) -> bool {
        matches!(
            self,
            EntityKind::Player | EntityKind::IronGolem | EntityKind::Minecart { .. }
        )
    }

    /// Whether this is a cart of any variant.
    #[inline]
    pub const fn is_minecart(&self) -> bool {
        matches!(self, EntityKind::Minecart { .. })
    }
}

/// Snapshot of an entity near a cart.
#[derive(Clone, Debug, PartialEq)]
pub struct NearbyEntity {
    /// Handle for follow-up calls.
    pub id: EntityId,
    /// Entity category.
    pub kind: EntityKind,
    /// Feet position.
    pub position: DVec3,
    /// Current velocity.
    pub velocity: DVec3,
    /// Facing, degrees.
    pub yaw: f32,
    /// Vehicle this entity rides, if any.
    pub vehicle: Option<EntityId>,
    /// Whether something rides this entity.
    pub has_passengers: bool,
    /// Whether the entity can be pushed at all.
    pub pushable: bool,
    /// Entities without physics neither push nor get pushed.
    pub no_physics: bool,
}

impl NearbyEntity {
    /// A pushable entity at rest.
    pub fn new(id: EntityId, kind: EntityKind, position: DVec3) -> Self {
        Self {
            id,
            kind,
            position,
            velocity: DVec3::ZERO,
            yaw: 0.0,
            vehicle: None,
            has_passengers: false,
            pushable: true,
            no_physics: false,
        }
    }

    /// Whether it is riding something.
    #[inline]
    pub fn is_passenger(&self) -> bool {
        self.vehicle.is_some()
    }
}

/// Access to the entities around a cart.
pub trait EntityAccess {
    /// Entities whose boxes intersect `bbox`, excluding `exclude`.
    fn entities_in(&self, bbox: &Aabb, exclude: EntityId) -> Vec<NearbyEntity>;

    /// Asks `rider` to mount `vehicle`. Returns whether it did.
    fn start_riding(&mut self, rider: EntityId, vehicle: EntityId) -> bool;

    /// Adds an impulse to an entity's velocity.
    fn push_entity(&mut self, id: EntityId, impulse: DVec3);

    /// Overwrites an entity's velocity.
    fn set_entity_velocity(&mut self, id: EntityId, velocity: DVec3);

    /// Called when a cart passes over an activator rail.
    fn on_activator_rail(&mut self, _cart: EntityId, _cell: IVec3, _powered: bool) {}
}

/// Everything a cart needs from its world.
pub trait Level: RailLookup + Collider + EntityAccess {}

impl<T: RailLookup + Collider + EntityAccess + ?Sized> Level for T {}
