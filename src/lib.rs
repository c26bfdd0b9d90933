//! Incremental Delaunay triangulations in two and three dimensions, with
//! their Voronoi duals.
//!
//! Points are inserted one at a time into a bounding super simplex. Each
//! insertion splits the containing leaf simplex around the new point and
//! restores the Delaunay property with bistellar flips (edge flips in the
//! plane, 2-3 and 3-2 face flips in space). Every split and flip is recorded
//! in a history graph whose leaves form the active triangulation and whose
//! interior nodes double as the point location structure.
//!
//! All geometry uses plain `f64` predicates. Inputs that a sign test cannot
//! separate, such as a point exactly on an existing edge or face, are
//! rejected with [InsertionError::DegenerateInput] instead of being perturbed
//! silently.
//!
//! # Example
//! ```
//! use bistellar::{DelaunayTriangulation2, Point2, VoronoiGraph2};
//!
//! // The center goes first: inserted after the corners it would lie
//! // exactly on an existing edge and be rejected as degenerate.
//! let triangulation = DelaunayTriangulation2::new(&[
//!     Point2::new(0.5, 0.5),
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ])?;
//! assert_eq!(triangulation.leaf_nodes().len(), 4);
//!
//! let voronoi = VoronoiGraph2::new(&triangulation);
//! let center_cell = voronoi.node(&Point2::new(0.5, 0.5)).unwrap();
//! assert!(!center_cell.segments().is_empty());
//! # Ok::<(), bistellar::InsertionError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod delaunay_core;
mod point;
mod segment;
mod triangulation2;
mod triangulation3;
mod voronoi;

#[cfg(test)]
mod test_utilities;

pub use crate::delaunay_core::{
    validate_coordinate, validate_point2, validate_point3, FixedNodeHandle, InsertionError,
    Node2, Node3, NodeGraph2, NodeGraph3, SimplexLocation, Tetrahedron, Triangle,
};
pub use crate::point::{Point2, Point3};
pub use crate::segment::{Segment2, Segment3};
pub use crate::triangulation2::DelaunayTriangulation2;
pub use crate::triangulation3::DelaunayTriangulation3;
pub use crate::voronoi::{VoronoiGraph2, VoronoiGraph3, VoronoiNode2, VoronoiNode3};
