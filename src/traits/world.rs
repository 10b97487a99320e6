//! World query traits: rail lookup and collision resolution.
//!
//! The motion code never owns the world. Everything it needs from the
//! surrounding simulation goes through these traits so the algorithms can be
//! exercised against [`MockLevel`](crate::world::MockLevel) in tests.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`RailLookup`] | Rail shape / power state and redstone conductors |
//! | [`Collider`] | Free-body movement against solid blocks |
//!
//! # Example Implementation
//!
//! ```rust
//! use railcart::math::Aabb;
//! use railcart::track::{RailBlock, RailShape};
//! use railcart::traits::{Collider, EntityId, Movement, RailLookup};
//! use glam::{DVec3, IVec3};
//!
//! /// An endless east-west line of track at y = 0 with nothing to collide with.
//! struct Line;
//!
//! impl RailLookup for Line {
//!     fn rail_at(&self, cell: IVec3) -> Option<RailBlock> {
//!         (cell.y == 0 && cell.z == 0).then(|| RailBlock::plain(RailShape::EastWest))
//!     }
//!
//!     fn is_redstone_conductor(&self, _cell: IVec3) -> bool {
//!         false
//!     }
//! }
//!
//! impl Collider for Line {
//!     fn resolve_movement(&self, _mover: EntityId, _bbox: &Aabb, delta: DVec3) -> Movement {
//!         Movement::free(delta)
//!     }
//! }
//!
//! assert!(Line.is_rail(IVec3::new(5, 0, 0)));
//! ```

use glam::{DVec3, IVec3};

use crate::math::Aabb;
use crate::track::RailBlock;
use crate::traits::EntityId;

/// Read access to rail blocks and the few block properties carts care about.
pub trait RailLookup {
    /// Rail occupying a cell, if any.
    fn rail_at(&self, cell: IVec3) -> Option<RailBlock>;

    /// Whether a cell holds any kind of rail.
    fn is_rail(&self, cell: IVec3) -> bool {
        self.rail_at(cell).is_some()
    }

    /// Whether a cell is a full redstone-conducting block.
    ///
    /// Used to pick the launch direction of a stationary cart on an active
    /// powered rail.
    fn is_redstone_conductor(&self, cell: IVec3) -> bool;

    /// Whether a cell is filled with water.
    fn is_water(&self, _cell: IVec3) -> bool {
        false
    }
}

/// Outcome of a collision-resolved move.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Movement {
    /// The part of the requested delta that could be applied.
    pub applied: DVec3,
    /// Blocked along X or Z.
    pub horizontal_collision: bool,
    /// Blocked along Y.
    pub vertical_collision: bool,
    /// Blocked while moving down.
    pub on_ground: bool,
}

impl Movement {
    /// An unobstructed move.
    pub fn free(delta: DVec3) -> Self {
        Self {
            applied: delta,
            ..Self::default()
        }
    }
}

/// Resolves a box moving through the world.
///
/// This is the "apply movement and resolve world collision" collaborator;
/// gravity is applied by the cart itself before the move.
pub trait Collider {
    /// Clips `delta` so that `bbox` does not enter solid blocks.
    ///
    /// `mover` is the entity owning `bbox`; it never collides with itself.
    fn resolve_movement(&self, mover: EntityId, bbox: &Aabb, delta: DVec3) -> Movement;
}
