use core::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A two dimensional point.
///
/// This is the basic type used for defining triangulation sites in the plane.
/// All coordinates are `f64` - the triangulation operates in plain double
/// precision arithmetic throughout.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Point2 {
    /// The point's x coordinate
    pub x: f64,
    /// The point's y coordinate
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Returns the squared distance of this point and another point.
    #[inline]
    pub fn distance_2(&self, other: Self) -> f64 {
        self.sub(other).length2()
    }

    pub(crate) fn add(&self, other: Self) -> Self {
        Point2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub(crate) fn sub(&self, other: Self) -> Self {
        Point2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub(crate) fn mul(&self, factor: f64) -> Self {
        Point2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub(crate) fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub(crate) fn length2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

// Triangulations reject non finite coordinates on insertion, hence stored
// points never contain NaN and coordinate equality is an equivalence relation.
impl Eq for Point2 {}

impl Hash for Point2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        coordinate_bits(self.x).hash(state);
        coordinate_bits(self.y).hash(state);
    }
}

impl From<Point2> for [f64; 2] {
    #[inline]
    fn from(point: Point2) -> Self {
        [point.x, point.y]
    }
}

impl From<[f64; 2]> for Point2 {
    #[inline]
    fn from(source: [f64; 2]) -> Self {
        Self::new(source[0], source[1])
    }
}

/// A three dimensional point.
///
/// The spatial analogue of [Point2], used for defining triangulation sites
/// in space.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Point3 {
    /// The point's x coordinate
    pub x: f64,
    /// The point's y coordinate
    pub y: f64,
    /// The point's z coordinate
    pub z: f64,
}

impl Point3 {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// Returns the squared distance of this point and another point.
    #[inline]
    pub fn distance_2(&self, other: Self) -> f64 {
        self.sub(other).length2()
    }

    pub(crate) fn add(&self, other: Self) -> Self {
        Point3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub(crate) fn sub(&self, other: Self) -> Self {
        Point3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub(crate) fn mul(&self, factor: f64) -> Self {
        Point3 {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub(crate) fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub(crate) fn cross(&self, other: Self) -> Self {
        Point3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub(crate) fn length2(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl Eq for Point3 {}

impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        coordinate_bits(self.x).hash(state);
        coordinate_bits(self.y).hash(state);
        coordinate_bits(self.z).hash(state);
    }
}

impl From<Point3> for [f64; 3] {
    #[inline]
    fn from(point: Point3) -> Self {
        [point.x, point.y, point.z]
    }
}

impl From<[f64; 3]> for Point3 {
    #[inline]
    fn from(source: [f64; 3]) -> Self {
        Self::new(source[0], source[1], source[2])
    }
}

// -0.0 and 0.0 compare equal and must hash identically.
fn coordinate_bits(coordinate: f64) -> u64 {
    if coordinate == 0.0 {
        0u64
    } else {
        coordinate.to_bits()
    }
}
