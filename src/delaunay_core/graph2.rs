//! The planar simplex graph: an arena of triangle nodes plus the local
//! topology operations (interior split and edge flip) that grow it.
//!
//! Nodes are addressed by [FixedNodeHandle] and never removed. A node retires
//! by acquiring children; the leaves of the resulting history forest form the
//! active triangulation at any point in time. Neighbor slots are indexed by
//! face identity: slot `i` holds the neighbor across the edge opposite
//! vertex `i`, making face-to-neighbor lookup a direct index.

use smallvec::SmallVec;

use super::handles::FixedNodeHandle;
use super::simplex::Triangle;
use crate::Point2;

const INVARIANT_VIOLATION: &str =
    "Neighbor does not share the expected face. This is a bug in bistellar.";

/// One node of the planar simplex graph: a triangle, its per-face neighbors
/// and its split or flip children.
#[derive(Debug, Clone)]
pub struct Node2 {
    triangle: Triangle,
    neighbors: [Option<FixedNodeHandle>; 3],
    children: SmallVec<[FixedNodeHandle; 3]>,
}

impl Node2 {
    fn new(triangle: Triangle) -> Self {
        Node2 {
            triangle,
            neighbors: [None; 3],
            children: SmallVec::new(),
        }
    }

    /// Returns the node's triangle.
    #[inline]
    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Returns the node's neighbors, indexed by the vertex slot opposite the
    /// shared edge. `None` marks a hull boundary edge.
    #[inline]
    pub fn neighbors(&self) -> &[Option<FixedNodeHandle>; 3] {
        &self.neighbors
    }

    /// Returns the nodes this node was replaced with, empty for leaves.
    #[inline]
    pub fn children(&self) -> &[FixedNodeHandle] {
        &self.children
    }

    /// Returns `true` if this node is part of the active triangulation.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The arena holding all planar simplex graph nodes ever created.
#[derive(Debug, Clone)]
pub struct NodeGraph2 {
    nodes: Vec<Node2>,
}

impl NodeGraph2 {
    /// Creates a graph consisting of a single root triangle.
    pub(crate) fn with_root(triangle: Triangle) -> (Self, FixedNodeHandle) {
        let graph = NodeGraph2 {
            nodes: vec![Node2::new(triangle)],
        };
        (graph, FixedNodeHandle::new(0))
    }

    /// Returns the node addressed by the given handle.
    pub fn node(&self, handle: FixedNodeHandle) -> &Node2 {
        &self.nodes[handle.index()]
    }

    /// Returns the total number of nodes ever created, including retired ones.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all node handles, including retired nodes.
    pub fn handles(&self) -> impl Iterator<Item = FixedNodeHandle> {
        (0..self.nodes.len()).map(FixedNodeHandle::new)
    }

    fn push(&mut self, triangle: Triangle) -> FixedNodeHandle {
        let handle = FixedNodeHandle::new(self.nodes.len());
        self.nodes.push(Node2::new(triangle));
        handle
    }

    fn set_neighbor(
        &mut self,
        handle: FixedNodeHandle,
        vertex: Point2,
        neighbor: Option<FixedNodeHandle>,
    ) {
        let slot = self.nodes[handle.index()]
            .triangle
            .vertex_slot(vertex)
            .expect(INVARIANT_VIOLATION);
        self.nodes[handle.index()].neighbors[slot] = neighbor;
    }

    /// Redirects the neighbor slot of `handle` that faces `edge` to
    /// `neighbor`. Panics if `handle` does not contain the edge - callers
    /// only rewire nodes whose adjacency across that edge was previously
    /// established.
    fn rewire_across(&mut self, handle: FixedNodeHandle, edge: &[Point2; 2], neighbor: FixedNodeHandle) {
        let slot = self.nodes[handle.index()]
            .triangle
            .slot_opposite(edge)
            .expect(INVARIANT_VIOLATION);
        self.nodes[handle.index()].neighbors[slot] = Some(neighbor);
    }

    /// Splits a leaf triangle into three children around an interior point.
    ///
    /// Each child combines the point with one of the parent's edges. Children
    /// are wired to their siblings across the edges through the point and to
    /// the parent's former neighbors across the outer edges; those neighbors
    /// are rewired from the parent to the respective child.
    pub(crate) fn split(
        &mut self,
        parent: FixedNodeHandle,
        point: Point2,
    ) -> SmallVec<[FixedNodeHandle; 3]> {
        let parent_node = &self.nodes[parent.index()];
        debug_assert!(parent_node.is_leaf());
        let [a, b, c] = parent_node.triangle.vertices();
        let externals = [
            parent_node.neighbors[2], // across (a, b), opposite c
            parent_node.neighbors[0], // across (b, c), opposite a
            parent_node.neighbors[1], // across (c, a), opposite b
        ];

        let child_ab = self.push(Triangle::new(a, b, point));
        let child_bc = self.push(Triangle::new(b, c, point));
        let child_ca = self.push(Triangle::new(c, a, point));

        // Sibling adjacency across the edges through the new point.
        self.set_neighbor(child_ab, a, Some(child_bc)); // across (b, point)
        self.set_neighbor(child_ab, b, Some(child_ca)); // across (a, point)
        self.set_neighbor(child_bc, b, Some(child_ca)); // across (c, point)
        self.set_neighbor(child_bc, c, Some(child_ab)); // across (b, point)
        self.set_neighbor(child_ca, c, Some(child_ab)); // across (a, point)
        self.set_neighbor(child_ca, a, Some(child_bc)); // across (c, point)

        // Outer edges keep the parent's former neighbors.
        let children = [child_ab, child_bc, child_ca];
        let edges = [[a, b], [b, c], [c, a]];
        for ((child, edge), external) in children.iter().zip(edges).zip(externals) {
            self.set_neighbor(*child, point, external);
            if let Some(external) = external {
                self.rewire_across(external, &edge, *child);
            }
        }

        self.nodes[parent.index()].children = children.into_iter().collect();
        children.into_iter().collect()
    }

    /// Performs a 2-2 bistellar flip (edge flip) across the edge opposite
    /// `apex_slot` of `node`.
    ///
    /// The two triangles sharing that edge, with opposite apexes `x` and `y`,
    /// are replaced by two new triangles sharing the edge `(x, y)`. Both
    /// retired nodes record the two replacements as children; every external
    /// neighbor is rewired to the replacement sharing its edge.
    pub(crate) fn flip(
        &mut self,
        node_handle: FixedNodeHandle,
        apex_slot: usize,
    ) -> [FixedNodeHandle; 2] {
        let node = &self.nodes[node_handle.index()];
        debug_assert!(node.is_leaf());
        let node_triangle = node.triangle;
        let node_neighbors = node.neighbors;
        let x = node_triangle.vertex(apex_slot);
        let edge = node_triangle.edge_opposite(apex_slot);
        let [u, v] = edge;
        let pair_handle = node_neighbors[apex_slot].expect(INVARIANT_VIOLATION);

        let pair = &self.nodes[pair_handle.index()];
        debug_assert!(pair.is_leaf());
        let pair_triangle = pair.triangle;
        let pair_neighbors = pair.neighbors;
        let pair_slot = pair_triangle.slot_opposite(&edge).expect(INVARIANT_VIOLATION);
        let y = pair_triangle.vertex(pair_slot);

        // The outside world across the four boundary edges of the flipped
        // quadrilateral, resolved through the nodes being replaced.
        let slot_of = |triangle: &Triangle, vertex: Point2| {
            triangle.vertex_slot(vertex).expect(INVARIANT_VIOLATION)
        };
        let ext_xu = node_neighbors[slot_of(&node_triangle, v)];
        let ext_xv = node_neighbors[slot_of(&node_triangle, u)];
        let ext_yu = pair_neighbors[slot_of(&pair_triangle, v)];
        let ext_yv = pair_neighbors[slot_of(&pair_triangle, u)];

        let new_u = self.push(Triangle::new(x, y, u));
        let new_v = self.push(Triangle::new(x, y, v));

        self.set_neighbor(new_u, u, Some(new_v)); // across (x, y)
        self.set_neighbor(new_u, y, ext_xu); // across (x, u)
        self.set_neighbor(new_u, x, ext_yu); // across (y, u)
        self.set_neighbor(new_v, v, Some(new_u)); // across (x, y)
        self.set_neighbor(new_v, y, ext_xv); // across (x, v)
        self.set_neighbor(new_v, x, ext_yv); // across (y, v)

        for (external, edge, replacement) in [
            (ext_xu, [x, u], new_u),
            (ext_yu, [y, u], new_u),
            (ext_xv, [x, v], new_v),
            (ext_yv, [y, v], new_v),
        ] {
            if let Some(external) = external {
                self.rewire_across(external, &edge, replacement);
            }
        }

        let children: SmallVec<[FixedNodeHandle; 3]> = [new_u, new_v].into_iter().collect();
        self.nodes[node_handle.index()].children = children.clone();
        self.nodes[pair_handle.index()].children = children;

        [new_u, new_v]
    }
}
