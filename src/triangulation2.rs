use smallvec::SmallVec;

use crate::delaunay_core::{
    math2, validate_point2, FixedNodeHandle, InsertionError, Node2, NodeGraph2, SimplexLocation,
    Triangle,
};
use crate::Point2;

const INVARIANT_VIOLATION: &str =
    "Adjacency bookkeeping drifted from the topology. This is a bug in bistellar.";

/// A two dimensional Delaunay triangulation, built incrementally by point
/// insertion and edge flip repair.
///
/// The triangulation starts from a bounding super triangle derived from the
/// initial point set. Every insertion locates the containing leaf triangle,
/// splits it around the new point and restores the empty circumcircle
/// property by flipping edges until no violation remains. The full split and
/// flip history is retained: retired nodes stay addressable through their
/// [FixedNodeHandle] and double as the point location structure.
///
/// # Example
/// ```
/// use bistellar::{DelaunayTriangulation2, Point2};
///
/// let triangulation = DelaunayTriangulation2::new(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ])?;
///
/// // The unit square is covered by two triangles sharing a diagonal.
/// assert_eq!(triangulation.leaf_nodes().len(), 2);
/// # Ok::<(), bistellar::InsertionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DelaunayTriangulation2 {
    graph: NodeGraph2,
    root: FixedNodeHandle,
    bounding_vertices: [Point2; 3],
    sites: Vec<Point2>,
}

impl DelaunayTriangulation2 {
    /// Creates a triangulation of the given points, inserting them in the
    /// order supplied.
    ///
    /// The bounding super triangle is sized from the points' bounding box, so
    /// later calls to [insert](Self::insert) only accept points within that
    /// margin. Insertion order affects intermediate work but not the final
    /// triangulation, up to ties in degenerate configurations.
    ///
    /// Returns an error without building anything if any coordinate is not
    /// finite, if two points coincide or if a point falls exactly on an edge
    /// of the triangulation built so far.
    pub fn new(points: &[Point2]) -> Result<Self, InsertionError> {
        for &point in points {
            validate_point2(point)?;
        }

        let bounding_vertices = bounding_triangle(points);
        let [v0, v1, v2] = bounding_vertices;
        let (graph, root) = NodeGraph2::with_root(Triangle::new(v0, v1, v2));

        let mut result = DelaunayTriangulation2 {
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
    /// lies outside the bounding super triangle or lies exactly on an edge of
    /// an existing leaf (including coinciding with an existing vertex).
    /// Callers may perturb a rejected point and retry.
    pub fn insert(&mut self, point: Point2) -> Result<(), InsertionError> {
        validate_point2(point)?;
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
    fn locate(&self, point: Point2) -> Result<FixedNodeHandle, InsertionError> {
        if self.graph.node(self.root).triangle().locate(point) == SimplexLocation::Exterior {
            return Err(InsertionError::OutsideBounds);
        }

        let mut current = self.root;
        loop {
            let node = self.graph.node(current);
            if node.is_leaf() {
                break;
            }
            // A node's children cover its simplex, so the point is contained
            // in at least one of them. Rounding near an internal edge can
            // contradict that; descend into the least violated child then.
            current = node
                .children()
                .iter()
                .copied()
                .find(|&child| self.graph.node(child).triangle().contains_inclusive(point))
                .unwrap_or_else(|| self.closest_child(node, point));
        }

        match self.graph.node(current).triangle().locate(point) {
            SimplexLocation::Interior => Ok(current),
            _ => Err(InsertionError::DegenerateInput),
        }
    }

    fn closest_child(&self, node: &Node2, point: Point2) -> FixedNodeHandle {
        let mut best = node.children()[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in node.children() {
            let score = self.graph.node(child).triangle().containment_score(point);
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
    /// the point in it; the edge opposite that slot is the only one that can
    /// be illegal. A flip retires two nodes and enqueues both replacements,
    /// so propagation stays local to the insertion and terminates.
    fn legalize(&mut self, point: Point2, mut worklist: SmallVec<[(FixedNodeHandle, usize); 8]>) {
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

            let triangle = *node.triangle();
            let edge = triangle.edge_opposite(apex_slot);
            let pair = self.graph.node(pair_handle);
            let pair_slot = pair
                .triangle()
                .slot_opposite(&edge)
                .expect(INVARIANT_VIOLATION);
            let apex = pair.triangle().vertex(pair_slot);

            let [v0, v1, v2] = triangle.vertices();
            if math2::contained_in_circumference(v0, v1, v2, apex) {
                for new_handle in self.graph.flip(handle, apex_slot) {
                    worklist.push((new_handle, self.apex_slot(new_handle, point)));
                }
            }
        }
    }

    fn apex_slot(&self, handle: FixedNodeHandle, point: Point2) -> usize {
        self.graph
            .node(handle)
            .triangle()
            .vertex_slot(point)
            .expect(INVARIANT_VIOLATION)
    }

    /// Returns the node addressed by the given handle.
    pub fn node(&self, handle: FixedNodeHandle) -> &Node2 {
        self.graph.node(handle)
    }

    /// Returns the total number of nodes ever created, including retired
    /// ones.
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// Returns all inserted sites in insertion order.
    pub fn sites(&self) -> &[Point2] {
        &self.sites
    }

    /// Returns the vertices of the bounding super triangle.
    pub fn bounding_vertices(&self) -> [Point2; 3] {
        self.bounding_vertices
    }

    /// Returns `true` if the node's triangle uses no bounding vertex, i.e.
    /// all of its vertices are inserted sites.
    pub fn is_interior(&self, handle: FixedNodeHandle) -> bool {
        let triangle = self.graph.node(handle).triangle();
        self.bounding_vertices
            .iter()
            .all(|&vertex| !triangle.has_vertex(vertex))
    }

    /// Returns the handles of all active triangles between inserted sites.
    ///
    /// This is the triangulation of the input points: leaves touching the
    /// bounding super triangle are filtered out.
    pub fn leaf_nodes(&self) -> Vec<FixedNodeHandle> {
        self.graph
            .handles()
            .filter(|&handle| self.graph.node(handle).is_leaf() && self.is_interior(handle))
            .collect()
    }

    /// Returns the handles of all active triangles, including the hull
    /// scaffolding connected to the bounding super triangle.
    pub fn all_leaf_nodes(&self) -> Vec<FixedNodeHandle> {
        self.graph
            .handles()
            .filter(|&handle| self.graph.node(handle).is_leaf())
            .collect()
    }
}

/// Builds a triangle that strictly contains every input point, with margin
/// enough that the points' triangulation is not disturbed by it.
fn bounding_triangle(points: &[Point2]) -> [Point2; 3] {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for point in points {
        min = Point2::new(min.x.min(point.x), min.y.min(point.y));
        max = Point2::new(max.x.max(point.x), max.y.max(point.y));
    }
    let (center, extent) = if points.is_empty() {
        (Point2::new(0.0, 0.0), 0.0)
    } else {
        let center = min.add(max).mul(0.5);
        let half = max.sub(min).mul(0.5);
        (center, half.x.max(half.y))
    };

    // Unequal margins keep the edges through the bounding vertices off the
    // axis and diagonal directions, where axis aligned input would land
    // exactly on a leaf boundary.
    let length = 8.0 * (extent + 1.0);
    [
        Point2::new(center.x - 1.07 * length, center.y - 1.21 * length),
        Point2::new(center.x + 3.01 * length, center.y - 1.13 * length),
        Point2::new(center.x - 1.19 * length, center.y + 3.11 * length),
    ]
}
