//! Track geometry: rail shapes, their exit vectors and rail block kinds.
//!
//! Every rail cell carries a [`RailShape`]. A shape maps to an [`ExitPair`]:
//! two integer offsets from the cell toward the ends of its travel chord.
//! The vertical component marks the low end of an ascending rail.
//!
//! | Shape family | Shapes | Exit `y` |
//! |--------------|--------|----------|
//! | Straight | `NorthSouth`, `EastWest` | both 0 |
//! | Ascending | `AscendingEast/West/North/South` | low end -1 |
//! | Curved | `SouthEast`, `SouthWest`, `NorthWest`, `NorthEast` | both 0 |
//!
//! # Example
//!
//! ```rust
//! use railcart::track::{exits, RailShape};
//! use glam::IVec3;
//!
//! let pair = exits(RailShape::AscendingNorth);
//! assert_eq!(pair.first, IVec3::new(0, 0, -1));  // high end, north
//! assert_eq!(pair.second, IVec3::new(0, -1, 1)); // low end, south
//! assert!(RailShape::AscendingNorth.is_slope());
//! ```

use glam::{DVec3, IVec3};

use crate::traits::RailLookup;

/// Unit offset toward negative Z.
pub const NORTH: IVec3 = IVec3::new(0, 0, -1);
/// Unit offset toward positive Z.
pub const SOUTH: IVec3 = IVec3::new(0, 0, 1);
/// Unit offset toward negative X.
pub const WEST: IVec3 = IVec3::new(-1, 0, 0);
/// Unit offset toward positive X.
pub const EAST: IVec3 = IVec3::new(1, 0, 0);
const DOWN: IVec3 = IVec3::new(0, -1, 0);

/// Orientation of a rail cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RailShape {
    /// Straight, along Z.
    NorthSouth,
    /// Straight, along X.
    EastWest,
    /// Rises toward +X.
    AscendingEast,
    /// Rises toward -X.
    AscendingWest,
    /// Rises toward -Z.
    AscendingNorth,
    /// Rises toward +Z.
    AscendingSouth,
    /// Curve joining the south and east edges.
    SouthEast,
    /// Curve joining the south and west edges.
    SouthWest,
    /// Curve joining the north and west edges.
    NorthWest,
    /// Curve joining the north and east edges.
    NorthEast,
}

impl RailShape {
    /// Every shape, in declaration order.
    pub const ALL: [RailShape; 10] = [
        RailShape::NorthSouth,
        RailShape::EastWest,
        RailShape::AscendingEast,
        RailShape::AscendingWest,
        RailShape::AscendingNorth,
        RailShape::AscendingSouth,
        RailShape::SouthEast,
        RailShape::SouthWest,
        RailShape::NorthWest,
        RailShape::NorthEast,
    ];

    /// Whether this shape climbs one block across the cell.
    #[inline]
    pub const fn is_slope(self) -> bool {
        matches!(
            self,
            RailShape::AscendingEast
                | RailShape::AscendingWest
                | RailShape::AscendingNorth
                | RailShape::AscendingSouth
        )
    }

    /// Whether this shape turns 90 degrees inside the cell.
    #[inline]
    pub const fn is_curve(self) -> bool {
        matches!(
            self,
            RailShape::SouthEast | RailShape::SouthWest | RailShape::NorthWest | RailShape::NorthEast
        )
    }

    /// Returns the shape as a lowercase string.
    pub const fn as_str(self) -> &'static str {
        match self {
            RailShape::NorthSouth => "north_south",
            RailShape::EastWest => "east_west",
            RailShape::AscendingEast => "ascending_east",
            RailShape::AscendingWest => "ascending_west",
            RailShape::AscendingNorth => "ascending_north",
            RailShape::AscendingSouth => "ascending_south",
            RailShape::SouthEast => "south_east",
            RailShape::SouthWest => "south_west",
            RailShape::NorthWest => "north_west",
            RailShape::NorthEast => "north_east",
        }
    }
}

/// The two chord ends of a rail shape, as offsets from the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitPair {
    /// First exit.
    pub first: IVec3,
    /// Second exit.
    pub second: IVec3,
}

impl ExitPair {
    const fn new(first: IVec3, second: IVec3) -> Self {
        Self { first, second }
    }

    /// Both exits scaled to half-cell offsets from the cell's bottom center.
    #[inline]
    pub fn halves(&self) -> (DVec3, DVec3) {
        (self.first.as_dvec3() * 0.5, self.second.as_dvec3() * 0.5)
    }
}

/// Exit offsets of a rail shape.
pub const fn exits(shape: RailShape) -> ExitPair {
    match shape {
        RailShape::NorthSouth => ExitPair::new(NORTH, SOUTH),
        RailShape::EastWest => ExitPair::new(WEST, EAST),
        RailShape::AscendingEast => ExitPair::new(add(WEST, DOWN), EAST),
        RailShape::AscendingWest => ExitPair::new(WEST, add(EAST, DOWN)),
        RailShape::AscendingNorth => ExitPair::new(NORTH, add(SOUTH, DOWN)),
        RailShape::AscendingSouth => ExitPair::new(add(NORTH, DOWN), SOUTH),
        RailShape::SouthEast => ExitPair::new(SOUTH, EAST),
        RailShape::SouthWest => ExitPair::new(SOUTH, WEST),
        RailShape::NorthWest => ExitPair::new(NORTH, WEST),
        RailShape::NorthEast => ExitPair::new(NORTH, EAST),
    }
}

const fn add(a: IVec3, b: IVec3) -> IVec3 {
    IVec3::new(a.x + b.x, a.y + b.y, a.z + b.z)
}

/// Whether moving along `v` on this shape goes downhill.
///
/// Always `false` for flat shapes.
pub fn is_descending(v: DVec3, shape: RailShape) -> bool {
    match shape {
        RailShape::AscendingEast => v.x < 0.0,
        RailShape::AscendingWest => v.x > 0.0,
        RailShape::AscendingNorth => v.z > 0.0,
        RailShape::AscendingSouth => v.z < 0.0,
        _ => false,
    }
}

// ============================================================================
// Rail blocks
// ============================================================================

/// Kind of rail block occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RailKind {
    /// Ordinary rail.
    #[default]
    Plain,
    /// Powered rail: boosts when powered, brakes when not.
    Powered {
        /// Current redstone power state.
        powered: bool,
    },
    /// Activator rail: fires the cart's activation hook.
    Activator {
        /// Current redstone power state.
        powered: bool,
    },
    /// Detector rail; behaves like a plain rail for motion.
    Detector,
}

/// A rail block: shape plus kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RailBlock {
    /// Track orientation.
    pub shape: RailShape,
    /// Block kind.
    pub kind: RailKind,
}

impl RailBlock {
    /// Plain rail of the given shape.
    pub const fn plain(shape: RailShape) -> Self {
        Self {
            shape,
            kind: RailKind::Plain,
        }
    }

    /// Powered rail of the given shape.
    pub const fn powered(shape: RailShape, powered: bool) -> Self {
        Self {
            shape,
            kind: RailKind::Powered { powered },
        }
    }

    /// Activator rail of the given shape.
    pub const fn activator(shape: RailShape, powered: bool) -> Self {
        Self {
            shape,
            kind: RailKind::Activator { powered },
        }
    }

    /// Whether this is a powered rail that currently has power.
    #[inline]
    pub const fn is_active_booster(&self) -> bool {
        matches!(self.kind, RailKind::Powered { powered: true })
    }

    /// Whether this is a powered rail without power (a brake).
    #[inline]
    pub const fn is_unpowered_booster(&self) -> bool {
        matches!(self.kind, RailKind::Powered { powered: false })
    }
}

/// Launch direction of an active powered rail.
///
/// A cart resting on an active straight powered rail is kicked away from an
/// adjacent redstone conductor (west / north side checked first). Returns
/// zero for every other case.
pub fn redstone_direction<W: RailLookup + ?Sized>(world: &W, cell: IVec3, rail: &RailBlock) -> DVec3 {
    if !rail.is_active_booster() {
        return DVec3::ZERO;
    }
    match rail.shape {
        RailShape::EastWest => {
            if world.is_redstone_conductor(cell + WEST) {
                DVec3::X
            } else if world.is_redstone_conductor(cell + EAST) {
                DVec3::NEG_X
            } else {
                DVec3::ZERO
            }
        }
        RailShape::NorthSouth => {
            if world.is_redstone_conductor(cell + NORTH) {
                DVec3::Z
            } else if world.is_redstone_conductor(cell + SOUTH) {
                DVec3::NEG_Z
            } else {
                DVec3::ZERO
            }
        }
        _ => DVec3::ZERO,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MockLevel;

    #[test]
    fn exits_are_unit_horizontal_offsets() {
        for shape in RailShape::ALL {
            let pair = exits(shape);
            for exit in [pair.first, pair.second] {
                assert_eq!(exit.x.abs() + exit.z.abs(), 1, "{:?}", shape);
                assert!(exit.y == 0 || exit.y == -1);
            }
            assert_ne!(pair.first, pair.second);
        }
    }

    #[test]
    fn only_slopes_have_vertical_exits() {
        for shape in RailShape::ALL {
            let pair = exits(shape);
            assert_eq!(pair.first.y != pair.second.y, shape.is_slope(), "{:?}", shape);
        }
    }

    #[test]
    fn curves_are_not_collinear() {
        for shape in RailShape::ALL {
            let (a, b) = exits(shape).halves();
            let collinear = a.x == b.x || a.z == b.z;
            assert_eq!(!collinear, shape.is_curve(), "{:?}", shape);
        }
    }

    #[test]
    fn descending_matches_low_exit() {
        for shape in RailShape::ALL.into_iter().filter(|s| s.is_slope()) {
            let pair = exits(shape);
            let low = if pair.first.y < pair.second.y { pair.first } else { pair.second };
            let toward_low = low.as_dvec3();
            assert!(is_descending(toward_low, shape), "{:?}", shape);
            assert!(!is_descending(-toward_low, shape), "{:?}", shape);
        }
    }

    #[test]
    fn flat_shapes_never_descend() {
        assert!(!is_descending(DVec3::X, RailShape::EastWest));
        assert!(!is_descending(DVec3::NEG_Z, RailShape::NorthEast));
    }

    #[test]
    fn booster_predicates() {
        assert!(RailBlock::powered(RailShape::EastWest, true).is_active_booster());
        assert!(RailBlock::powered(RailShape::EastWest, false).is_unpowered_booster());
        assert!(!RailBlock::plain(RailShape::EastWest).is_active_booster());
        assert!(!RailBlock::activator(RailShape::EastWest, false).is_unpowered_booster());
    }

    #[test]
    fn redstone_direction_points_away_from_conductor() {
        let cell = IVec3::new(0, 64, 0);
        let rail = RailBlock::powered(RailShape::EastWest, true);

        let mut level = MockLevel::new();
        assert_eq!(redstone_direction(&level, cell, &rail), DVec3::ZERO);

        level.set_solid(cell + IVec3::new(-1, 0, 0));
        assert_eq!(redstone_direction(&level, cell, &rail), DVec3::X);

        let mut level = MockLevel::new();
        level.set_solid(cell + IVec3::new(1, 0, 0));
        assert_eq!(redstone_direction(&level, cell, &rail), DVec3::NEG_X);
    }

    #[test]
    fn redstone_direction_requires_power_and_straight_track() {
        let cell = IVec3::ZERO;
        let mut level = MockLevel::new();
        level.set_solid(IVec3::new(0, 0, -1));

        let ns = RailBlock::powered(RailShape::NorthSouth, true);
        assert_eq!(redstone_direction(&level, cell, &ns), DVec3::Z);

        let unpowered = RailBlock::powered(RailShape::NorthSouth, false);
        assert_eq!(redstone_direction(&level, cell, &unpowered), DVec3::ZERO);

        let slope = RailBlock::powered(RailShape::AscendingNorth, true);
        assert_eq!(redstone_direction(&level, cell, &slope), DVec3::ZERO);
    }
}
