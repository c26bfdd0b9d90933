use std::{error::Error, fmt::Display};

use crate::{Point2, Point3};

/// The error type used for inserting points into a triangulation.
///
/// Errors during insertion can only originate from an invalid or degenerate
/// point position. The triangulation is left untouched whenever an insertion
/// fails - callers may perturb the offending point and retry.
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Debug, Hash)]
pub enum InsertionError {
    /// A coordinate value was NaN or infinite.
    NonFiniteCoordinate,

    /// The point lies outside the triangulation's bounding super simplex.
    ///
    /// Can only occur when growing a triangulation with
    /// [insert](crate::DelaunayTriangulation2::insert) beyond the bounds
    /// derived from the initially supplied point set.
    OutsideBounds,

    /// The point lies exactly on an edge or face of the simplex that would
    /// contain it, or coincides with an already inserted vertex.
    ///
    /// This boundary case is not resolved automatically. The caller is
    /// expected to reject the point or perturb it slightly before retrying.
    DegenerateInput,
}

impl Display for InsertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Debug>::fmt(self, f)
    }
}

impl Error for InsertionError {}

/// Checks if a coordinate value is suitable for insertion into a triangulation.
///
/// Returns an error if and only if the coordinate is NaN or infinite. Any
/// finite `f64` is a valid coordinate.
pub fn validate_coordinate(value: f64) -> Result<(), InsertionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InsertionError::NonFiniteCoordinate)
    }
}

/// Checks if a two dimensional point is suitable for insertion into a
/// triangulation. See [validate_coordinate].
pub fn validate_point2(point: Point2) -> Result<(), InsertionError> {
    validate_coordinate(point.x)?;
    validate_coordinate(point.y)?;
    Ok(())
}

/// Checks if a three dimensional point is suitable for insertion into a
/// triangulation. See [validate_coordinate].
pub fn validate_point3(point: Point3) -> Result<(), InsertionError> {
    validate_coordinate(point.x)?;
    validate_coordinate(point.y)?;
    validate_coordinate(point.z)?;
    Ok(())
}

/// Describes on which side of an oriented edge or plane a point lies.
///
/// Wraps the sign of an orientation determinant: the signed doubled area of a
/// triangle in 2D, the signed six fold volume of a tetrahedron in 3D.
#[derive(Debug, Clone, Copy)]
pub struct SideInfo {
    signed_side: f64,
}

impl SideInfo {
    #[inline]
    pub(crate) fn from_determinant(s: f64) -> SideInfo {
        SideInfo { signed_side: s }
    }

    /// Returns `true` if the queried point lies strictly on the positive side.
    ///
    /// In 2D, the positive side is the left side of a directed edge. In 3D, it
    /// is the halfspace the oriented face normal points into.
    pub fn is_on_positive_side(&self) -> bool {
        self.signed_side > 0.0
    }

    /// Returns `true` if the queried point lies strictly on the negative side.
    pub fn is_on_negative_side(&self) -> bool {
        self.signed_side < 0.0
    }

    /// Returns `true` if the queried point lies exactly on the edge or plane.
    #[inline]
    pub fn is_on_boundary(&self) -> bool {
        self.signed_side == 0.0
    }

    /// Returns the raw determinant value backing this query.
    pub(crate) fn determinant(&self) -> f64 {
        self.signed_side
    }
}

impl PartialEq for SideInfo {
    fn eq(&self, other: &SideInfo) -> bool {
        if self.is_on_boundary() || other.is_on_boundary() {
            self.is_on_boundary() && other.is_on_boundary()
        } else {
            self.is_on_positive_side() == other.is_on_positive_side()
        }
    }
}
