//! Small vector and angle helpers shared by the motion code.
//!
//! Positions and velocities are [`DVec3`]; block cells are [`IVec3`] whose
//! unit cube spans `cell .. cell + 1`. Angles are degrees stored as `f32`,
//! matching the precision the renderer consumes.

use glam::{DVec3, IVec3};

/// Distances below this are treated as "no movement".
pub const EPSILON: f64 = 1.0e-5;

/// Drops the vertical component.
#[inline]
pub fn horizontal(v: DVec3) -> DVec3 {
    DVec3::new(v.x, 0.0, v.z)
}

/// Length of the horizontal component.
#[inline]
pub fn horizontal_distance(v: DVec3) -> f64 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Squared length of the horizontal component.
#[inline]
pub fn horizontal_distance_sqr(v: DVec3) -> f64 {
    v.x * v.x + v.z * v.z
}

/// Center of the floor face of a cell.
#[inline]
pub fn bottom_center(cell: IVec3) -> DVec3 {
    DVec3::new(cell.x as f64 + 0.5, cell.y as f64, cell.z as f64 + 0.5)
}

/// Geometric center of a cell.
#[inline]
pub fn center(cell: IVec3) -> DVec3 {
    cell.as_dvec3() + DVec3::splat(0.5)
}

/// Cell containing a point.
#[inline]
pub fn cell_containing(p: DVec3) -> IVec3 {
    p.floor().as_ivec3()
}

/// Wraps an angle into `[-180, 180)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a >= 180.0 {
        a -= 360.0;
    }
    if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Interpolates between two angles along the shortest arc.
#[inline]
pub fn rot_lerp(delta: f32, start: f32, end: f32) -> f32 {
    start + delta * wrap_degrees(end - start)
}

/// Linear interpolation between two vectors.
#[inline]
pub fn lerp(delta: f64, start: DVec3, end: DVec3) -> DVec3 {
    start + (end - start) * delta
}

/// Yaw (degrees) of a cart facing along a horizontal direction.
#[inline]
pub fn yaw_toward(dir: DVec3) -> f32 {
    180.0 - (dir.z.atan2(dir.x).to_degrees()) as f32
}

/// Zeroes any non-finite component.
///
/// Returns the cleaned vector and whether anything had to be replaced.
pub fn sanitize(v: DVec3) -> (DVec3, bool) {
    let fix = |c: f64| if c.is_finite() { c } else { 0.0 };
    let clean = DVec3::new(fix(v.x), fix(v.y), fix(v.z));
    (clean, !v.is_finite())
}

// ============================================================================
// Bounding boxes
// ============================================================================

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Creates a box from two corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of the given footprint standing on `pos` (bottom-center anchored).
    pub fn standing_at(pos: DVec3, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self {
            min: DVec3::new(pos.x - half, pos.y, pos.z - half),
            max: DVec3::new(pos.x + half, pos.y + height, pos.z + half),
        }
    }

    /// Unit cube of a cell.
    pub fn of_cell(cell: IVec3) -> Self {
        let min = cell.as_dvec3();
        Self {
            min,
            max: min + DVec3::ONE,
        }
    }

    /// Grows the box by the given amount on each side of each axis.
    pub fn inflate(&self, x: f64, y: f64, z: f64) -> Self {
        let d = DVec3::new(x, y, z);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Translates the box.
    pub fn offset(&self, delta: DVec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Strict overlap test (touching faces do not intersect).
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Whether the point lies inside or on the box.
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Box covering both this box and its translation by `delta`.
    pub fn expand_towards(&self, delta: DVec3) -> Self {
        let moved = self.offset(delta);
        Self {
            min: self.min.min(moved.min),
            max: self.max.max(moved.max),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
