use smallvec::SmallVec;

use crate::delaunay_core::{
    math3, validate_point3, FixedNodeHandle, InsertionError, Node3, NodeGraph3, SimplexLocation,
    Tetrahedron,
};
use crate::Point3;

const INVARIANT_VIOLATION: &str =
    "Adjacency bookkeeping drifted from the topology. This is a bug in bistellar.";

/// A three dimensional Delaunay triangulation, built incrementally by point
/// insertion and bistellar flip repair.
///
/// The spatial analogue of [DelaunayTriangulation2](crate::DelaunayTriangulation2):
/// insertion splits the containing leaf tetrahedron into four and restores
/// the empty circumsphere property with 2-3 and 3-2 face flips. Degenerate
/// flip configurations (segment through the new point and the offending apex
/// coplanar with a face edge, or a missing third flank) are skipped; later
/// insertions revisit them through the usual flip cascade.
#[derive(Debug, Clone)]
pub struct DelaunayTriangulation3 {
    graph: NodeGraph3,
    root: FixedNodeHandle,
    bounding_vertices: [Point3; 4],
    sites: Vec<Point3>,
}

impl DelaunayTriangulation3 {
    /// Creates a triangulation of the given points, inserting them in the
    /// order supplied.
    ///
    /// See [DelaunayTriangulation2::new](crate::DelaunayTriangulation2::new);
    /// the bounding simplex here is a tetrahedron around the points'
    /// bounding box.
    pub fn new(points: &[Point3]) -> Result<Self, InsertionError> {
        for &point in points {
            validate_point3(point)?;
        }

        let bounding_vertices = bounding_tetrahedron(points);
        let [v0, v1, v2, v3] = bounding_vertices;
        let (graph, root) = NodeGraph3::with_root(Tetrahedron::new(v0, v1, v2, v3));

        let mut result = DelaunayTriangulation3 {
            graph,
            root,
            bounding_vertices,
            sites: Vec::with_capacity(points.len()),
        };
        for &point in points {
            result.insert(point)?;
        }
        Ok(result)
    }

    /// Inserts a single point, splitting its containing leaf and settling all
    /// resulting flips before returning.
    ///
    /// Fails without modifying the triangulation if the point is not finite,
    /// lies outside the bounding tetrahedron or lies exactly on a face of an
    /// existing leaf (including coinciding with an existing vertex).
    pub fn insert(&mut self, point: Point3) -> Result<(), InsertionError> {
        validate_point3(point)?;
        let leaf = self.locate(point)?;
        let children = self.graph.split(leaf, point);

        let mut worklist: SmallVec<[(FixedNodeHandle, usize); 8]> = SmallVec::new();
        for &child in &children {
            worklist.push((child, self.apex_slot(child, point)));
        }
        self.legalize(point, worklist);

        self.sites.push(point);
        Ok(())
    }

    /// Walks the split and flip history from the root down to the leaf
    /// containing the point.
    fn locate(&self, point: Point3) -> Result<FixedNodeHandle, InsertionError> {
        if self.graph.node(self.root).tetrahedron().locate(point) == SimplexLocation::Exterior {
            return Err(InsertionError::OutsideBounds);
        }

        let mut current = self.root;
        loop {
            let node = self.graph.node(current);
            if node.is_leaf() {
                break;
            }
            // Children cover the node's simplex; fall back to the least
            // violated child if rounding contradicts that near a face.
            current = node
                .children()
                .iter()
                .copied()
                .find(|&child| {
                    self.graph
                        .node(child)
                        .tetrahedron()
                        .contains_inclusive(point)
                })
                .unwrap_or_else(|| self.closest_child(node, point));
        }

        match self.graph.node(current).tetrahedron().locate(point) {
            SimplexLocation::Interior => Ok(current),
            _ => Err(InsertionError::DegenerateInput),
        }
    }

    fn closest_child(&self, node: &Node3, point: Point3) -> FixedNodeHandle {
        let mut best = node.children()[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in node.children() {
            let score = self
                .graph
                .node(child)
                .tetrahedron()
                .containment_score(point);
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// Restores the Delaunay property around a freshly inserted point.
    ///
    /// Each worklist entry pairs a node containing the point with the slot of
    /// the point in it. If the apex across the opposite face violates the
    /// empty circumsphere property, the segment from the point to that apex
    /// decides the repair: through the face's interior, a 2-3 flip; past
    /// exactly one face edge, a 3-2 flip around that edge. Coplanar and
    /// unflippable configurations are skipped.
    fn legalize(&mut self, point: Point3, mut worklist: SmallVec<[(FixedNodeHandle, usize); 8]>) {
        while let Some((handle, apex_slot)) = worklist.pop() {
            let node = self.graph.node(handle);
            if !node.is_leaf() {
                // Already replaced by an earlier flip of this insertion.
                continue;
            }
            let Some(pair_handle) = node.neighbors()[apex_slot] else {
                // Hull boundary, nothing to test against.
                continue;
            };

            let tetrahedron = *node.tetrahedron();
            let face = tetrahedron.face_opposite(apex_slot);
            let pair = self.graph.node(pair_handle);
            let pair_slot = pair
                .tetrahedron()
                .slot_opposite(&face)
                .expect(INVARIANT_VIOLATION);
            let apex = pair.tetrahedron().vertex(pair_slot);

            let [v0, v1, v2, v3] = tetrahedron.vertices();
            if !math3::contained_in_circumsphere(v0, v1, v2, v3, apex) {
                continue;
            }

            let [a, b, c] = face;
            let queries = [
                ([a, b], math3::orientation_query(point, apex, a, b)),
                ([b, c], math3::orientation_query(point, apex, b, c)),
                ([c, a], math3::orientation_query(point, apex, c, a)),
            ];
            if queries.iter().any(|(_, query)| query.is_on_boundary()) {
                // The point, the apex and a face edge are coplanar. Neither
                // flip applies; a later insertion resolves the violation.
                continue;
            }

            let num_positive = queries
                .iter()
                .filter(|(_, query)| query.is_on_positive_side())
                .count();
            let replacements: SmallVec<[FixedNodeHandle; 3]> = match num_positive {
                // The segment passes through the face's interior.
                0 | 3 => self.graph.flip_2_3(handle, apex_slot).into_iter().collect(),
                // The segment exits past the edge with the minority sign.
                _ => {
                    let minority = num_positive == 1;
                    let (edge, _) = queries
                        .into_iter()
                        .find(|(_, query)| query.is_on_positive_side() == minority)
                        .expect(INVARIANT_VIOLATION);
                    match self.graph.flip_3_2(handle, apex_slot, edge) {
                        Some(handles) => handles.into_iter().collect(),
                        // The third flank is missing, the edge cannot be
                        // removed yet.
                        None => continue,
                    }
                }
            };

            for new_handle in replacements {
                worklist.push((new_handle, self.apex_slot(new_handle, point)));
            }
        }
    }

    fn apex_slot(&self, handle: FixedNodeHandle, point: Point3) -> usize {
        self.graph
            .node(handle)
            .tetrahedron()
            .vertex_slot(point)
            .expect(INVARIANT_VIOLATION)
    }

    /// Returns the node addressed by the given handle.
    pub fn node(&self, handle: FixedNodeHandle) -> &Node3 {
        self.graph.node(handle)
    }

    /// Returns the total number of nodes ever created, including retired
    /// ones.
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// Returns all inserted sites in insertion order.
    pub fn sites(&self) -> &[Point3] {
        &self.sites
    }

    /// Returns the vertices of the bounding tetrahedron.
    pub fn bounding_vertices(&self) -> [Point3; 4] {
        self.bounding_vertices
    }

    /// Returns `true` if the node's tetrahedron uses no bounding vertex, i.e.
    /// all of its vertices are inserted sites.
    pub fn is_interior(&self, handle: FixedNodeHandle) -> bool {
        let tetrahedron = self.graph.node(handle).tetrahedron();
        self.bounding_vertices
            .iter()
            .all(|&vertex| !tetrahedron.has_vertex(vertex))
    }

    /// Returns the handles of all active tetrahedra between inserted sites.
    ///
    /// This is the triangulation of the input points: leaves touching the
    /// bounding tetrahedron are filtered out.
    pub fn leaf_nodes(&self) -> Vec<FixedNodeHandle> {
        self.graph
            .handles()
            .filter(|&handle| self.graph.node(handle).is_leaf() && self.is_interior(handle))
            .collect()
    }

    /// Returns the handles of all active tetrahedra, including the hull
    /// scaffolding connected to the bounding tetrahedron.
    pub fn all_leaf_nodes(&self) -> Vec<FixedNodeHandle> {
        self.graph
            .handles()
            .filter(|&handle| self.graph.node(handle).is_leaf())
            .collect()
    }
}

/// Builds a tetrahedron that strictly contains every input point, with margin
/// enough that the points' triangulation is not disturbed by it.
fn bounding_tetrahedron(points: &[Point3]) -> [Point3; 4] {
    let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for point in points {
        min = Point3::new(min.x.min(point.x), min.y.min(point.y), min.z.min(point.z));
        max = Point3::new(max.x.max(point.x), max.y.max(point.y), max.z.max(point.z));
    }
    let (center, extent) = if points.is_empty() {
        (Point3::new(0.0, 0.0, 0.0), 0.0)
    } else {
        let center = min.add(max).mul(0.5);
        let half = max.sub(min).mul(0.5);
        (center, half.x.max(half.y).max(half.z))
    };

    // Unequal margins keep the faces through the bounding vertices off the
    // axis and diagonal planes, where axis aligned input would land exactly
    // on a leaf boundary.
    let length = 8.0 * (extent + 1.0);
    [
        Point3::new(
            center.x - 1.07 * length,
            center.y - 1.21 * length,
            center.z - 1.13 * length,
        ),
        Point3::new(
            center.x + 3.11 * length,
            center.y - 1.09 * length,
            center.z - 1.23 * length,
        ),
        Point3::new(
            center.x - 1.19 * length,
            center.y + 3.01 * length,
            center.z - 1.17 * length,
        ),
        Point3::new(
            center.x - 1.27 * length,
            center.y - 1.11 * length,
            center.z + 3.07 * length,
        ),
    ]
}
