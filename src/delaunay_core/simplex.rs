use super::{math2, math3};
use crate::{Point2, Point3, Segment2, Segment3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classifies a point's position relative to a simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimplexLocation {
    /// The point lies strictly inside the simplex.
    Interior,
    /// The point lies exactly on an edge, face or vertex of the simplex.
    Boundary,
    /// The point lies strictly outside the simplex.
    Exterior,
}

/// A triangle, the two dimensional simplex.
///
/// Vertices are normalized to counterclockwise order at construction so that
/// orientation dependent predicates can rely on a fixed sign convention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Triangle {
    vertices: [Point2; 3],
}

impl Triangle {
    /// Creates a new triangle, reordering the vertices to counterclockwise
    /// orientation if necessary.
    ///
    /// Degenerate (collinear) vertices are stored as given. Derived
    /// quantities of such a triangle are unreliable.
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        if math2::side_query(a, b, c).is_on_negative_side() {
            Triangle {
                vertices: [a, c, b],
            }
        } else {
            Triangle {
                vertices: [a, b, c],
            }
        }
    }

    /// Returns the triangle's vertices in counterclockwise order.
    #[inline]
    pub fn vertices(&self) -> [Point2; 3] {
        self.vertices
    }

    /// Returns the vertex stored at the given slot.
    #[inline]
    pub fn vertex(&self, slot: usize) -> Point2 {
        self.vertices[slot]
    }

    /// Returns the center of the circle through all three vertices.
    pub fn circumcenter(&self) -> Point2 {
        math2::circumcenter(self.vertices).0
    }

    /// Returns the squared radius of the circle through all three vertices.
    pub fn circumradius2(&self) -> f64 {
        math2::circumcenter(self.vertices).1
    }

    /// Returns the triangle's area.
    pub fn area(&self) -> f64 {
        math2::triangle_area(self.vertices)
    }

    /// Classifies a point's position relative to this triangle.
    pub fn locate(&self, point: Point2) -> SimplexLocation {
        let mut on_boundary = false;
        for slot in 0..3 {
            let [from, to] = self.edge_opposite(slot);
            let query = math2::side_query(from, to, point);
            if query.is_on_negative_side() {
                return SimplexLocation::Exterior;
            }
            on_boundary |= query.is_on_boundary();
        }
        if on_boundary {
            SimplexLocation::Boundary
        } else {
            SimplexLocation::Interior
        }
    }

    /// Returns `true` if the point lies inside the triangle or on its
    /// boundary.
    pub fn contains_inclusive(&self, point: Point2) -> bool {
        self.locate(point) != SimplexLocation::Exterior
    }

    /// Returns `true` if the segment is one of the triangle's edges.
    pub fn contains_segment(&self, segment: &Segment2) -> bool {
        self.vertex_slot(segment.from).is_some() && self.vertex_slot(segment.to).is_some()
    }

    /// Returns `true` if the point is one of the triangle's vertices.
    pub fn has_vertex(&self, point: Point2) -> bool {
        self.vertex_slot(point).is_some()
    }

    /// The smallest of the three edge orientation determinants. Positive for
    /// interior points, used to pick the least violated simplex when rounding
    /// leaves a point contained in no child during point location.
    pub(crate) fn containment_score(&self, point: Point2) -> f64 {
        let mut score = f64::INFINITY;
        for slot in 0..3 {
            let [from, to] = self.edge_opposite(slot);
            score = score.min(math2::side_query(from, to, point).determinant());
        }
        score
    }

    /// Returns the slot of the given vertex, if it is one.
    pub(crate) fn vertex_slot(&self, point: Point2) -> Option<usize> {
        self.vertices.iter().position(|&vertex| vertex == point)
    }

    /// Returns the edge opposite the given vertex slot, directed so that the
    /// triangle's interior lies on its positive side.
    pub fn edge_opposite(&self, slot: usize) -> [Point2; 2] {
        [
            self.vertices[(slot + 1) % 3],
            self.vertices[(slot + 2) % 3],
        ]
    }

    /// Returns the slot of the vertex facing the given edge, or `None` if the
    /// edge is not part of this triangle.
    pub(crate) fn slot_opposite(&self, edge: &[Point2; 2]) -> Option<usize> {
        let mut result = None;
        for (slot, vertex) in self.vertices.iter().enumerate() {
            if edge.contains(vertex) {
                continue;
            }
            if result.is_some() {
                // More than one vertex off the edge: the edge does not belong
                // to this triangle.
                return None;
            }
            result = Some(slot);
        }
        result
    }
}

/// A tetrahedron, the three dimensional simplex.
///
/// Vertices are normalized to positive orientation at construction, the
/// spatial analogue of [Triangle]'s counterclockwise convention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Tetrahedron {
    vertices: [Point3; 4],
}

impl Tetrahedron {
    /// Creates a new tetrahedron, reordering the vertices to positive
    /// orientation if necessary.
    ///
    /// Degenerate (coplanar) vertices are stored as given. Derived quantities
    /// of such a tetrahedron are unreliable.
    pub fn new(a: Point3, b: Point3, c: Point3, d: Point3) -> Self {
        if math3::orientation_query(a, b, c, d).is_on_negative_side() {
            Tetrahedron {
                vertices: [a, b, d, c],
            }
        } else {
            Tetrahedron {
                vertices: [a, b, c, d],
            }
        }
    }

    /// Returns the tetrahedron's vertices in positive orientation.
    #[inline]
    pub fn vertices(&self) -> [Point3; 4] {
        self.vertices
    }

    /// Returns the vertex stored at the given slot.
    #[inline]
    pub fn vertex(&self, slot: usize) -> Point3 {
        self.vertices[slot]
    }

    /// Returns the center of the sphere through all four vertices.
    pub fn circumcenter(&self) -> Point3 {
        math3::circumcenter(self.vertices).0
    }

    /// Returns the squared radius of the sphere through all four vertices.
    pub fn circumradius2(&self) -> f64 {
        math3::circumcenter(self.vertices).1
    }

    /// Returns the tetrahedron's volume.
    pub fn volume(&self) -> f64 {
        math3::tetrahedron_volume(self.vertices)
    }

    /// Classifies a point's position relative to this tetrahedron.
    pub fn locate(&self, point: Point3) -> SimplexLocation {
        let mut on_boundary = false;
        for slot in 0..4 {
            let [a, b, c] = self.face_opposite(slot);
            let query = math3::orientation_query(a, b, c, point);
            if query.is_on_negative_side() {
                return SimplexLocation::Exterior;
            }
            on_boundary |= query.is_on_boundary();
        }
        if on_boundary {
            SimplexLocation::Boundary
        } else {
            SimplexLocation::Interior
        }
    }

    /// Returns `true` if the point lies inside the tetrahedron or on its
    /// boundary.
    pub fn contains_inclusive(&self, point: Point3) -> bool {
        self.locate(point) != SimplexLocation::Exterior
    }

    /// Returns `true` if the segment is one of the tetrahedron's edges.
    pub fn contains_segment(&self, segment: &Segment3) -> bool {
        self.vertex_slot(segment.from).is_some() && self.vertex_slot(segment.to).is_some()
    }

    /// Returns `true` if the three points form one of the tetrahedron's
    /// faces, regardless of their order.
    pub fn contains_face(&self, face: &[Point3; 3]) -> bool {
        self.slot_opposite(face).is_some()
    }

    /// Returns `true` if the point is one of the tetrahedron's vertices.
    pub fn has_vertex(&self, point: Point3) -> bool {
        self.vertex_slot(point).is_some()
    }

    /// See [Triangle::containment_score].
    pub(crate) fn containment_score(&self, point: Point3) -> f64 {
        let mut score = f64::INFINITY;
        for slot in 0..4 {
            let [a, b, c] = self.face_opposite(slot);
            score = score.min(math3::orientation_query(a, b, c, point).determinant());
        }
        score
    }

    /// Returns the slot of the given vertex, if it is one.
    pub(crate) fn vertex_slot(&self, point: Point3) -> Option<usize> {
        self.vertices.iter().position(|&vertex| vertex == point)
    }

    /// Returns the face opposite the given vertex slot, oriented so that the
    /// tetrahedron's interior lies on its positive side.
    pub fn face_opposite(&self, slot: usize) -> [Point3; 3] {
        let [v0, v1, v2, v3] = self.vertices;
        match slot {
            0 => [v1, v3, v2],
            1 => [v0, v2, v3],
            2 => [v0, v3, v1],
            3 => [v0, v1, v2],
            _ => panic!("Invalid vertex slot: {}", slot),
        }
    }

    /// Returns the slot of the vertex facing the given face, or `None` if the
    /// face is not part of this tetrahedron.
    pub(crate) fn slot_opposite(&self, face: &[Point3; 3]) -> Option<usize> {
        let mut result = None;
        for (slot, vertex) in self.vertices.iter().enumerate() {
            if face.contains(vertex) {
                continue;
            }
            if result.is_some() {
                return None;
            }
            result = Some(slot);
        }
        result
    }
}
