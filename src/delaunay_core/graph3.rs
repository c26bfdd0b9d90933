//! The spatial simplex graph: an arena of tetrahedron nodes plus the local
//! topology operations (interior split, 2-3 and 3-2 face flips) that grow it.
//!
//! Structurally identical to [graph2](super::graph2) one dimension up: slot
//! `i` of a node's neighbor array holds the neighbor across the face opposite
//! vertex `i`, nodes retire by acquiring children and the leaves form the
//! active triangulation.

use smallvec::SmallVec;

use super::handles::FixedNodeHandle;
use super::simplex::Tetrahedron;
use crate::Point3;

const INVARIANT_VIOLATION: &str =
    "Neighbor does not share the expected face. This is a bug in bistellar.";

/// One node of the spatial simplex graph: a tetrahedron, its per-face
/// neighbors and its split or flip children.
#[derive(Debug, Clone)]
pub struct Node3 {
    tetrahedron: Tetrahedron,
    neighbors: [Option<FixedNodeHandle>; 4],
    children: SmallVec<[FixedNodeHandle; 4]>,
}

impl Node3 {
    fn new(tetrahedron: Tetrahedron) -> Self {
        Node3 {
            tetrahedron,
            neighbors: [None; 4],
            children: SmallVec::new(),
        }
    }

    /// Returns the node's tetrahedron.
    #[inline]
    pub fn tetrahedron(&self) -> &Tetrahedron {
        &self.tetrahedron
    }

    /// Returns the node's neighbors, indexed by the vertex slot opposite the
    /// shared face. `None` marks a hull boundary face.
    #[inline]
    pub fn neighbors(&self) -> &[Option<FixedNodeHandle>; 4] {
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

/// The arena holding all spatial simplex graph nodes ever created.
#[derive(Debug, Clone)]
pub struct NodeGraph3 {
    nodes: Vec<Node3>,
}

impl NodeGraph3 {
    /// Creates a graph consisting of a single root tetrahedron.
    pub(crate) fn with_root(tetrahedron: Tetrahedron) -> (Self, FixedNodeHandle) {
        let graph = NodeGraph3 {
            nodes: vec![Node3::new(tetrahedron)],
        };
        (graph, FixedNodeHandle::new(0))
    }

    /// Returns the node addressed by the given handle.
    pub fn node(&self, handle: FixedNodeHandle) -> &Node3 {
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

    fn push(&mut self, tetrahedron: Tetrahedron) -> FixedNodeHandle {
        let handle = FixedNodeHandle::new(self.nodes.len());
        self.nodes.push(Node3::new(tetrahedron));
        handle
    }

    fn set_neighbor(
        &mut self,
        handle: FixedNodeHandle,
        vertex: Point3,
        neighbor: Option<FixedNodeHandle>,
    ) {
        let slot = self.nodes[handle.index()]
            .tetrahedron
            .vertex_slot(vertex)
            .expect(INVARIANT_VIOLATION);
        self.nodes[handle.index()].neighbors[slot] = neighbor;
    }

    fn rewire_across(
        &mut self,
        handle: FixedNodeHandle,
        face: &[Point3; 3],
        neighbor: FixedNodeHandle,
    ) {
        let slot = self.nodes[handle.index()]
            .tetrahedron
            .slot_opposite(face)
            .expect(INVARIANT_VIOLATION);
        self.nodes[handle.index()].neighbors[slot] = Some(neighbor);
    }

    /// Splits a leaf tetrahedron into four children around an interior point.
    ///
    /// Child `i` combines the point with the parent's face opposite vertex
    /// `i`. Children are wired to their siblings across the faces through the
    /// point and to the parent's former neighbors across the outer faces;
    /// those neighbors are rewired from the parent to the respective child.
    pub(crate) fn split(
        &mut self,
        parent: FixedNodeHandle,
        point: Point3,
    ) -> SmallVec<[FixedNodeHandle; 4]> {
        let parent_node = &self.nodes[parent.index()];
        debug_assert!(parent_node.is_leaf());
        let tetrahedron = parent_node.tetrahedron;
        let vertices = tetrahedron.vertices();
        let externals = parent_node.neighbors;

        let mut children: SmallVec<[FixedNodeHandle; 4]> = SmallVec::new();
        for slot in 0..4 {
            let [a, b, c] = tetrahedron.face_opposite(slot);
            children.push(self.push(Tetrahedron::new(a, b, c, point)));
        }

        for slot in 0..4 {
            let child = children[slot];
            // Siblings share the faces through the new point: the face of
            // child `i` missing vertex `j` is also a face of child `j`.
            for other in 0..4 {
                if other != slot {
                    self.set_neighbor(child, vertices[other], Some(children[other]));
                }
            }
            // The outer face keeps the parent's former neighbor.
            self.set_neighbor(child, point, externals[slot]);
            if let Some(external) = externals[slot] {
                self.rewire_across(external, &tetrahedron.face_opposite(slot), child);
            }
        }

        self.nodes[parent.index()].children = children.clone();
        children
    }

    /// Performs a 2-3 bistellar flip across the face opposite `apex_slot` of
    /// `node`.
    ///
    /// The two tetrahedra flanking that face, with opposite apexes `x` and
    /// `y`, are replaced by three tetrahedra sharing the edge `(x, y)`, one
    /// per edge of the vanished face. Callers must have verified that the
    /// segment `x`-`y` passes through the shared face's interior.
    pub(crate) fn flip_2_3(
        &mut self,
        node_handle: FixedNodeHandle,
        apex_slot: usize,
    ) -> [FixedNodeHandle; 3] {
        let node = &self.nodes[node_handle.index()];
        debug_assert!(node.is_leaf());
        let node_tetrahedron = node.tetrahedron;
        let node_neighbors = node.neighbors;
        let x = node_tetrahedron.vertex(apex_slot);
        let face = node_tetrahedron.face_opposite(apex_slot);
        let pair_handle = node_neighbors[apex_slot].expect(INVARIANT_VIOLATION);

        let pair = &self.nodes[pair_handle.index()];
        debug_assert!(pair.is_leaf());
        let pair_tetrahedron = pair.tetrahedron;
        let pair_neighbors = pair.neighbors;
        let pair_slot = pair_tetrahedron
            .slot_opposite(&face)
            .expect(INVARIANT_VIOLATION);
        let y = pair_tetrahedron.vertex(pair_slot);

        let slot_of = |tetrahedron: &Tetrahedron, vertex: Point3| {
            tetrahedron.vertex_slot(vertex).expect(INVARIANT_VIOLATION)
        };

        // One new tetrahedron per edge of the vanished face; the edge's
        // remaining face vertex determines both external neighbors.
        let [a, b, c] = face;
        let edges = [[a, b], [b, c], [c, a]];
        let remaining = [c, a, b];

        let mut new_handles = [FixedNodeHandle::new(0); 3];
        for (index, [e0, e1]) in edges.into_iter().enumerate() {
            let z = remaining[index];
            let new_handle = self.push(Tetrahedron::new(x, y, e0, e1));
            new_handles[index] = new_handle;

            let ext_node_side = node_neighbors[slot_of(&node_tetrahedron, z)];
            let ext_pair_side = pair_neighbors[slot_of(&pair_tetrahedron, z)];
            // Face (x, e0, e1) is opposite y, face (y, e0, e1) opposite x.
            self.set_neighbor(new_handle, y, ext_node_side);
            self.set_neighbor(new_handle, x, ext_pair_side);
            if let Some(external) = ext_node_side {
                self.rewire_across(external, &[x, e0, e1], new_handle);
            }
            if let Some(external) = ext_pair_side {
                self.rewire_across(external, &[y, e0, e1], new_handle);
            }
        }

        // The three replacements form a cycle around the edge (x, y).
        let [on_ab, on_bc, on_ca] = new_handles;
        self.set_neighbor(on_ab, a, Some(on_bc)); // across (x, y, b)
        self.set_neighbor(on_ab, b, Some(on_ca)); // across (x, y, a)
        self.set_neighbor(on_bc, b, Some(on_ca)); // across (x, y, c)
        self.set_neighbor(on_bc, c, Some(on_ab)); // across (x, y, b)
        self.set_neighbor(on_ca, c, Some(on_ab)); // across (x, y, a)
        self.set_neighbor(on_ca, a, Some(on_bc)); // across (x, y, c)

        let children: SmallVec<[FixedNodeHandle; 4]> = new_handles.into_iter().collect();
        self.nodes[node_handle.index()].children = children.clone();
        self.nodes[pair_handle.index()].children = children;

        new_handles
    }

    /// Performs a 3-2 bistellar flip involving `node`, its neighbor across
    /// the face opposite `apex_slot` and the third tetrahedron on `edge`.
    ///
    /// `edge` must be an edge of the shared face. The flip requires that the
    /// tetrahedron spanning `edge` together with both apexes exists and is
    /// adjacent to both flanks; if it is not, the configuration is
    /// unflippable and `None` is returned without touching the graph.
    pub(crate) fn flip_3_2(
        &mut self,
        node_handle: FixedNodeHandle,
        apex_slot: usize,
        edge: [Point3; 2],
    ) -> Option<[FixedNodeHandle; 2]> {
        let node = &self.nodes[node_handle.index()];
        debug_assert!(node.is_leaf());
        let node_tetrahedron = node.tetrahedron;
        let node_neighbors = node.neighbors;
        let x = node_tetrahedron.vertex(apex_slot);
        let face = node_tetrahedron.face_opposite(apex_slot);
        let pair_handle = node_neighbors[apex_slot].expect(INVARIANT_VIOLATION);

        let pair = &self.nodes[pair_handle.index()];
        debug_assert!(pair.is_leaf());
        let pair_tetrahedron = pair.tetrahedron;
        let pair_neighbors = pair.neighbors;
        let pair_slot = pair_tetrahedron
            .slot_opposite(&face)
            .expect(INVARIANT_VIOLATION);
        let y = pair_tetrahedron.vertex(pair_slot);

        let [e0, e1] = edge;
        let z = *face
            .iter()
            .find(|vertex| **vertex != e0 && **vertex != e1)
            .expect(INVARIANT_VIOLATION);

        let slot_of = |tetrahedron: &Tetrahedron, vertex: Point3| {
            tetrahedron.vertex_slot(vertex).expect(INVARIANT_VIOLATION)
        };

        // The third tetrahedron {x, y, e0, e1} must flank both replaced
        // nodes; otherwise the configuration cannot be flipped.
        let third_handle = node_neighbors[slot_of(&node_tetrahedron, z)]?;
        if pair_neighbors[slot_of(&pair_tetrahedron, z)] != Some(third_handle) {
            return None;
        }
        let third = &self.nodes[third_handle.index()];
        debug_assert!(third.is_leaf());
        let third_tetrahedron = third.tetrahedron;
        let third_neighbors = third.neighbors;

        let new_e0 = self.push(Tetrahedron::new(x, y, z, e0));
        let new_e1 = self.push(Tetrahedron::new(x, y, z, e1));

        for (new_handle, kept, dropped) in [(new_e0, e0, e1), (new_e1, e1, e0)] {
            // Face (x, y, z) is shared between the two replacements.
            self.set_neighbor(new_handle, kept, Some(if kept == e0 { new_e1 } else { new_e0 }));

            let ext_node_side = node_neighbors[slot_of(&node_tetrahedron, dropped)];
            let ext_pair_side = pair_neighbors[slot_of(&pair_tetrahedron, dropped)];
            let ext_third_side = third_neighbors[slot_of(&third_tetrahedron, dropped)];
            // Face (x, z, kept) is opposite y, (y, z, kept) opposite x and
            // (x, y, kept) opposite z.
            self.set_neighbor(new_handle, y, ext_node_side);
            self.set_neighbor(new_handle, x, ext_pair_side);
            self.set_neighbor(new_handle, z, ext_third_side);
            if let Some(external) = ext_node_side {
                self.rewire_across(external, &[x, z, kept], new_handle);
            }
            if let Some(external) = ext_pair_side {
                self.rewire_across(external, &[y, z, kept], new_handle);
            }
            if let Some(external) = ext_third_side {
                self.rewire_across(external, &[x, y, kept], new_handle);
            }
        }

        let children: SmallVec<[FixedNodeHandle; 4]> = [new_e0, new_e1].into_iter().collect();
        self.nodes[node_handle.index()].children = children.clone();
        self.nodes[pair_handle.index()].children = children.clone();
        self.nodes[third_handle.index()].children = children;

        Some([new_e0, new_e1])
    }
}

#[cfg(test)]
mod test {
    use super::NodeGraph3;
    use crate::delaunay_core::simplex::Tetrahedron;
    use crate::Point3;

    fn assert_leaf_adjacency_symmetric(graph: &NodeGraph3) {
        for handle in graph.handles() {
            let node = graph.node(handle);
            if !node.is_leaf() {
                continue;
            }
            for (slot, neighbor) in node.neighbors().iter().enumerate() {
                let Some(neighbor) = neighbor else { continue };
                let face = node.tetrahedron().face_opposite(slot);
                let other = graph.node(*neighbor);
                assert!(other.is_leaf(), "leaf neighbor points at retired node");
                let other_slot = other
                    .tetrahedron()
                    .slot_opposite(&face)
                    .expect("neighbor does not share the face");
                assert_eq!(other.neighbors()[other_slot], Some(handle));
            }
        }
    }

    fn vertex_set(tetrahedron: &Tetrahedron) -> Vec<Point3> {
        let mut vertices = tetrahedron.vertices().to_vec();
        vertices.sort_by(|l, r| l.partial_cmp(r).unwrap());
        vertices
    }

    #[test]
    fn test_split_topology() {
        let root_tetrahedron = Tetrahedron::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
        );
        let (mut graph, root) = NodeGraph3::with_root(root_tetrahedron);
        let point = Point3::new(0.5, 0.5, 0.5);
        let children = graph.split(root, point);

        assert_eq!(children.len(), 4);
        assert!(!graph.node(root).is_leaf());
        for &child in &children {
            let node = graph.node(child);
            assert!(node.is_leaf());
            assert!(node.tetrahedron().has_vertex(point));
            // Three sibling neighbors, one hull boundary face.
            assert_eq!(node.neighbors().iter().flatten().count(), 3);
        }
        assert_leaf_adjacency_symmetric(&graph);
    }

    #[test]
    fn test_flip_2_3_and_back() {
        let x = Point3::new(0.3, 0.3, 1.0);
        let y = Point3::new(0.3, 0.3, -1.0);
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let upper = Tetrahedron::new(a, b, c, x);
        let lower = Tetrahedron::new(a, b, c, y);
        let (mut graph, upper_handle) = NodeGraph3::with_root(upper);
        let lower_handle = graph.push(lower);
        graph.rewire_across(upper_handle, &[a, b, c], lower_handle);
        graph.rewire_across(lower_handle, &[a, b, c], upper_handle);

        let apex_slot = graph
            .node(upper_handle)
            .tetrahedron()
            .vertex_slot(x)
            .unwrap();
        let flipped = graph.flip_2_3(upper_handle, apex_slot);

        assert_eq!(graph.node(upper_handle).children(), &flipped[..]);
        assert_eq!(graph.node(lower_handle).children(), &flipped[..]);
        for handle in flipped {
            let node = graph.node(handle);
            assert!(node.is_leaf());
            assert!(node.tetrahedron().has_vertex(x));
            assert!(node.tetrahedron().has_vertex(y));
            // Two siblings around the edge (x, y), two hull boundary faces.
            assert_eq!(node.neighbors().iter().flatten().count(), 2);
        }
        assert_leaf_adjacency_symmetric(&graph);

        // Undo the flip with the inverse 3-2 flip: pick the replacement on
        // edge (a, b), its apex a and the shared-face edge (x, y).
        let on_ab = flipped
            .into_iter()
            .find(|handle| {
                let tetrahedron = graph.node(*handle).tetrahedron();
                tetrahedron.has_vertex(a) && tetrahedron.has_vertex(b)
            })
            .unwrap();
        let node = graph.node(on_ab);
        assert_eq!(
            vertex_set(node.tetrahedron()),
            vertex_set(&Tetrahedron::new(x, y, a, b))
        );
        let apex_slot = node.tetrahedron().vertex_slot(a).unwrap();
        let restored = graph
            .flip_3_2(on_ab, apex_slot, [x, y])
            .expect("inverse flip must be possible");

        let expected = [vertex_set(&upper), vertex_set(&lower)];
        for handle in restored {
            let node = graph.node(handle);
            assert!(node.is_leaf());
            assert!(expected.contains(&vertex_set(node.tetrahedron())));
            assert_eq!(node.neighbors().iter().flatten().count(), 1);
        }
        assert_leaf_adjacency_symmetric(&graph);
    }

    #[test]
    fn test_flip_3_2_requires_third_flank() {
        let x = Point3::new(0.3, 0.3, 1.0);
        let y = Point3::new(0.3, 0.3, -1.0);
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let upper = Tetrahedron::new(a, b, c, x);
        let lower = Tetrahedron::new(a, b, c, y);
        let (mut graph, upper_handle) = NodeGraph3::with_root(upper);
        let lower_handle = graph.push(lower);
        graph.rewire_across(upper_handle, &[a, b, c], lower_handle);
        graph.rewire_across(lower_handle, &[a, b, c], upper_handle);

        // No tetrahedron {x, y, a, b} exists, so the flip must refuse.
        let apex_slot = graph
            .node(upper_handle)
            .tetrahedron()
            .vertex_slot(x)
            .unwrap();
        assert_eq!(graph.flip_3_2(upper_handle, apex_slot, [a, b]), None);
        assert!(graph.node(upper_handle).is_leaf());
        assert!(graph.node(lower_handle).is_leaf());
    }
}
