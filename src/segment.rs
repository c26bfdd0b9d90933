use core::hash::{Hash, Hasher};

use crate::{Point2, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unordered pair of two dimensional points.
///
/// Segments compare equal regardless of their endpoint order: `{p, q}` equals
/// `{q, p}`. Hashing follows the same rule, allowing segments to be used for
/// order independent deduplication.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Segment2 {
    /// The segment's first endpoint
    pub from: Point2,
    /// The segment's second endpoint
    pub to: Point2,
}

impl Segment2 {
    /// Creates a new segment between two endpoints.
    #[inline]
    pub const fn new(from: Point2, to: Point2) -> Self {
        Segment2 { from, to }
    }

    /// Returns the squared length of this segment.
    pub fn length2(&self) -> f64 {
        self.from.distance_2(self.to)
    }

    /// Returns `true` if the given point is one of the segment's endpoints.
    pub fn is_endpoint(&self, point: Point2) -> bool {
        self.from == point || self.to == point
    }
}

impl PartialEq for Segment2 {
    fn eq(&self, other: &Self) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

impl Eq for Segment2 {}

impl Hash for Segment2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Combine endpoint hashes commutatively to keep hashing order
        // independent.
        combined_endpoint_hash(&self.from, &self.to).hash(state);
    }
}

/// An unordered pair of three dimensional points.
///
/// The spatial analogue of [Segment2] with the same order independent
/// equality and hashing semantics.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Segment3 {
    /// The segment's first endpoint
    pub from: Point3,
    /// The segment's second endpoint
    pub to: Point3,
}

impl Segment3 {
    /// Creates a new segment between two endpoints.
    #[inline]
    pub const fn new(from: Point3, to: Point3) -> Self {
        Segment3 { from, to }
    }

    /// Returns the squared length of this segment.
    pub fn length2(&self) -> f64 {
        self.from.distance_2(self.to)
    }

    /// Returns `true` if the given point is one of the segment's endpoints.
    pub fn is_endpoint(&self, point: Point3) -> bool {
        self.from == point || self.to == point
    }
}

impl PartialEq for Segment3 {
    fn eq(&self, other: &Self) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

impl Eq for Segment3 {}

impl Hash for Segment3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        combined_endpoint_hash(&self.from, &self.to).hash(state);
    }
}

fn combined_endpoint_hash<P: Hash>(from: &P, to: &P) -> u64 {
    single_hash(from).wrapping_add(single_hash(to))
}

fn single_hash<P: Hash>(point: &P) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    let mut hasher = DefaultHasher::new();
    point.hash(&mut hasher);
    hasher.finish()
}
