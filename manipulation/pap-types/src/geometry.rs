//! Bounding volumes used for region and collision queries.

use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box.
///
/// # Example
///
/// ```
/// use pap_types::Aabb;
/// use nalgebra::Point3;
///
/// let region = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 2.0));
/// let robot = Aabb::new(Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 2.0, 1.5));
/// assert!(region.contains_aabb(&robot));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates a new AABB from two corners.
    ///
    /// The corners are automatically ordered.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates an AABB centered at a point with the given half-extents.
    #[must_use]
    pub fn from_center_extents(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Checks if a point is inside the AABB (boundary inclusive).
    #[must_use]
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Checks if `other` lies entirely inside this box.
    #[must_use]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Checks if the two boxes overlap with positive volume.
    ///
    /// Boxes that only touch along a face do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns the half-extents of the AABB.
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        (self.max - self.min) * 0.5
    }

    /// Returns a copy moved so that its center is at `center`.
    #[must_use]
    pub fn recentered(&self, center: Point3<f64>) -> Self {
        Self::from_center_extents(center, self.half_extents())
    }
}
