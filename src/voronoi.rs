//! Voronoi duals of Delaunay triangulations.
//!
//! A cell's boundary pieces are collected by walking adjacent pairs of
//! interior leaves and connecting their circumcenters. Whether a connecting
//! segment belongs to a site's cell is decided by an orthogonality test
//! between the segment and the edges incident to the site, with a fixed
//! tolerance. Segments are recorded per directed leaf pair, so a piece shared
//! by two leaves appears once per side; deduplicate by segment equality if a
//! set is needed.

use hashbrown::HashMap;

use crate::{
    DelaunayTriangulation2, DelaunayTriangulation3, Point2, Point3, Segment2, Segment3,
};

/// Dot products this close to zero count as orthogonal when matching dual
/// segments to cell sites.
const ORTHOGONALITY_TOLERANCE: f64 = 1.0e-5;

/// The Voronoi cell of a single site: the site itself and the dual segments
/// bounding its cell.
#[derive(Debug, Clone)]
pub struct VoronoiNode2 {
    site: Point2,
    segments: Vec<Segment2>,
}

impl VoronoiNode2 {
    /// Returns the site this cell belongs to.
    #[inline]
    pub fn site(&self) -> Point2 {
        self.site
    }

    /// Returns the segments bounding this cell, in discovery order and
    /// possibly containing duplicates for segments seen from both sides.
    #[inline]
    pub fn segments(&self) -> &[Segment2] {
        &self.segments
    }
}

/// The Voronoi dual of a [DelaunayTriangulation2], one cell per inserted
/// site. Cells of sites touched only by hull boundary faces stay empty.
#[derive(Debug, Clone)]
pub struct VoronoiGraph2 {
    nodes: HashMap<Point2, VoronoiNode2>,
}

impl VoronoiGraph2 {
    /// Builds the dual of the given triangulation.
    ///
    /// For every pair of adjacent interior leaves, the segment between their
    /// circumcenters is assigned to each vertex of the first leaf that has an
    /// incident edge orthogonal to it.
    pub fn new(triangulation: &DelaunayTriangulation2) -> Self {
        let mut nodes: HashMap<Point2, VoronoiNode2> = triangulation
            .sites()
            .iter()
            .map(|&site| {
                (
                    site,
                    VoronoiNode2 {
                        site,
                        segments: Vec::new(),
                    },
                )
            })
            .collect();

        for handle in triangulation.leaf_nodes() {
            let node = triangulation.node(handle);
            let triangle = *node.triangle();
            let center = triangle.circumcenter();

            for neighbor in node.neighbors().iter().flatten() {
                if !triangulation.is_interior(*neighbor) {
                    continue;
                }
                let neighbor_center = triangulation.node(*neighbor).triangle().circumcenter();
                let direction = neighbor_center.sub(center);

                for slot in 0..3 {
                    let site = triangle.vertex(slot);
                    let num_orthogonal = triangle
                        .edge_opposite(slot)
                        .iter()
                        .filter(|other| {
                            other.sub(site).dot(direction).abs() < ORTHOGONALITY_TOLERANCE
                        })
                        .count();
                    if num_orthogonal >= 1 {
                        if let Some(cell) = nodes.get_mut(&site) {
                            cell.segments.push(Segment2::new(center, neighbor_center));
                        }
                    }
                }
            }
        }

        VoronoiGraph2 { nodes }
    }

    /// Returns the cell of the given site, if it has one.
    pub fn node(&self, site: &Point2) -> Option<&VoronoiNode2> {
        self.nodes.get(site)
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the dual has no cells.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &VoronoiNode2> {
        self.nodes.values()
    }
}

/// The Voronoi cell of a single site in three dimensions.
#[derive(Debug, Clone)]
pub struct VoronoiNode3 {
    site: Point3,
    segments: Vec<Segment3>,
}

impl VoronoiNode3 {
    /// Returns the site this cell belongs to.
    #[inline]
    pub fn site(&self) -> Point3 {
        self.site
    }

    /// Returns the segments bounding this cell, in discovery order and
    /// possibly containing duplicates for segments seen from both sides.
    #[inline]
    pub fn segments(&self) -> &[Segment3] {
        &self.segments
    }
}

/// The Voronoi dual of a [DelaunayTriangulation3], one cell per inserted
/// site.
///
/// Cell boundaries are reported as the wireframe of dual segments between
/// adjacent circumcenters rather than as assembled polygonal facets.
#[derive(Debug, Clone)]
pub struct VoronoiGraph3 {
    nodes: HashMap<Point3, VoronoiNode3>,
}

impl VoronoiGraph3 {
    /// Builds the dual of the given triangulation.
    ///
    /// Like [VoronoiGraph2::new] one dimension up: a vertex of a tetrahedron
    /// claims the segment when at least two of its three incident edges are
    /// orthogonal to it.
    pub fn new(triangulation: &DelaunayTriangulation3) -> Self {
        let mut nodes: HashMap<Point3, VoronoiNode3> = triangulation
            .sites()
            .iter()
            .map(|&site| {
                (
                    site,
                    VoronoiNode3 {
                        site,
                        segments: Vec::new(),
                    },
                )
            })
            .collect();

        for handle in triangulation.leaf_nodes() {
            let node = triangulation.node(handle);
            let tetrahedron = *node.tetrahedron();
            let center = tetrahedron.circumcenter();

            for neighbor in node.neighbors().iter().flatten() {
                if !triangulation.is_interior(*neighbor) {
                    continue;
                }
                let neighbor_center = triangulation
                    .node(*neighbor)
                    .tetrahedron()
                    .circumcenter();
                let direction = neighbor_center.sub(center);

                for slot in 0..4 {
                    let site = tetrahedron.vertex(slot);
                    let num_orthogonal = tetrahedron
                        .face_opposite(slot)
                        .iter()
                        .filter(|other| {
                            other.sub(site).dot(direction).abs() < ORTHOGONALITY_TOLERANCE
                        })
                        .count();
                    if num_orthogonal >= 2 {
                        if let Some(cell) = nodes.get_mut(&site) {
                            cell.segments.push(Segment3::new(center, neighbor_center));
                        }
                    }
                }
            }
        }

        VoronoiGraph3 { nodes }
    }

    /// Returns the cell of the given site, if it has one.
    pub fn node(&self, site: &Point3) -> Option<&VoronoiNode3> {
        self.nodes.get(site)
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the dual has no cells.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &VoronoiNode3> {
        self.nodes.values()
    }
}

#[cfg(test)]
mod test {
    use super::{VoronoiGraph2, VoronoiGraph3};
    use crate::{
        DelaunayTriangulation2, DelaunayTriangulation3, Point2, Point3, Segment2,
    };
    use hashbrown::HashSet;

    fn square_points() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_square() {
        let triangulation = DelaunayTriangulation2::new(&square_points()).unwrap();
        let voronoi = VoronoiGraph2::new(&triangulation);

        // All four corners are cocircular, so both triangles share the
        // circumcenter and every dual segment degenerates to that point.
        assert_eq!(voronoi.len(), 4);
        let mut sites_with_two = 0;
        for site in square_points() {
            let cell = voronoi.node(&site).unwrap();
            assert_eq!(cell.site(), site);
            for segment in cell.segments() {
                assert_eq!(segment.from, Point2::new(0.5, 0.5));
                assert_eq!(segment.to, Point2::new(0.5, 0.5));
            }
            match cell.segments().len() {
                1 => {}
                2 => sites_with_two += 1,
                other => panic!("unexpected segment count {other}"),
            }
        }
        // The two sites on the shared diagonal see the segment from both
        // sides.
        assert_eq!(sites_with_two, 2);
    }

    #[test]
    fn test_square_with_center() {
        // Center first: inserted after the corners it would lie exactly on
        // the corner triangulation's diagonal and be rejected.
        let mut points = square_points();
        let center = Point2::new(0.5, 0.5);
        points.insert(0, center);
        let triangulation = DelaunayTriangulation2::new(&points).unwrap();
        let voronoi = VoronoiGraph2::new(&triangulation);

        assert_eq!(voronoi.len(), 5);

        // The center's cell is the square spanned by the four circumcenters.
        let circumcenters = [
            Point2::new(0.5, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(0.5, 1.0),
            Point2::new(0.0, 0.5),
        ];
        let expected: HashSet<Segment2> = (0..4)
            .map(|index| Segment2::new(circumcenters[index], circumcenters[(index + 1) % 4]))
            .collect();

        let cell = voronoi.node(&center).unwrap();
        let unique: HashSet<Segment2> = cell.segments().iter().copied().collect();
        assert_eq!(unique, expected);
        // Each boundary piece is discovered once per flanking triangle.
        assert_eq!(cell.segments().len(), 8);

        // Corner cells are unbounded; only the one piece separating the
        // corner from the center shows up.
        for site in square_points() {
            let unique: HashSet<Segment2> = voronoi
                .node(&site)
                .unwrap()
                .segments()
                .iter()
                .copied()
                .collect();
            assert_eq!(unique.len(), 1);
        }
    }

    #[test]
    fn test_segments_connect_circumcenters() {
        let mut points = square_points();
        points.push(Point2::new(0.3, 0.4));
        points.push(Point2::new(0.7, 0.6));
        let triangulation = DelaunayTriangulation2::new(&points).unwrap();
        let voronoi = VoronoiGraph2::new(&triangulation);

        let circumcenters: Vec<Point2> = triangulation
            .leaf_nodes()
            .into_iter()
            .map(|handle| triangulation.node(handle).triangle().circumcenter())
            .collect();
        let is_circumcenter = |point: Point2| {
            circumcenters
                .iter()
                .any(|center| center.distance_2(point) < 1.0e-18)
        };

        assert_eq!(voronoi.len(), points.len());
        for cell in voronoi.iter() {
            for segment in cell.segments() {
                assert!(is_circumcenter(segment.from));
                assert!(is_circumcenter(segment.to));
            }
        }
    }

    #[test]
    fn test_dual_segment_counts_match_incident_faces() {
        // For a point set in general position, a site's distinct dual
        // segments correspond one to one to the site's edges that are
        // flanked by two interior leaves.
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.9, 0.7),
            Point2::new(1.3, 1.4),
        ];
        let triangulation = DelaunayTriangulation2::new(&points).unwrap();
        let voronoi = VoronoiGraph2::new(&triangulation);

        let leaves = triangulation.leaf_nodes();
        for &site in triangulation.sites() {
            let mut shared_edges: HashSet<Segment2> = HashSet::new();
            for &handle in &leaves {
                let node = triangulation.node(handle);
                let triangle = node.triangle();
                let Some(slot) = (0..3).find(|&slot| triangle.vertex(slot) == site) else {
                    continue;
                };
                for other_slot in 0..3 {
                    if other_slot == slot {
                        continue;
                    }
                    // The edge (site, other) faces the third vertex slot.
                    let across = node.neighbors()[3 - slot - other_slot];
                    if across.is_some_and(|handle| triangulation.is_interior(handle)) {
                        shared_edges.insert(Segment2::new(site, triangle.vertex(other_slot)));
                    }
                }
            }

            let unique: HashSet<Segment2> = voronoi
                .node(&site)
                .unwrap()
                .segments()
                .iter()
                .copied()
                .collect();
            assert_eq!(unique.len(), shared_edges.len(), "site {site:?}");
        }
    }

    #[test]
    fn test_hull_only_cells_are_empty() {
        // A single triangle has no interior leaf pairs, so every cell exists
        // but stays empty.
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        let triangulation = DelaunayTriangulation2::new(&points).unwrap();
        let voronoi = VoronoiGraph2::new(&triangulation);

        assert_eq!(voronoi.len(), 3);
        for site in points {
            assert!(voronoi.node(&site).unwrap().segments().is_empty());
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let mut points = square_points();
        points.insert(0, Point2::new(0.5, 0.5));
        let triangulation = DelaunayTriangulation2::new(&points).unwrap();

        let first = VoronoiGraph2::new(&triangulation);
        let second = VoronoiGraph2::new(&triangulation);
        assert_eq!(first.len(), second.len());
        for cell in first.iter() {
            let other = second.node(&cell.site()).unwrap();
            assert_eq!(cell.segments(), other.segments());
        }
    }

    #[test]
    fn test_cube_with_center() {
        let mut points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        // Center first, for the same reason as in the planar case: inserted
        // last it lies exactly on a face of the corner triangulation.
        let center = Point3::new(0.5, 0.5, 0.5);
        points.insert(0, center);
        let triangulation = DelaunayTriangulation3::new(&points).unwrap();
        let voronoi = VoronoiGraph3::new(&triangulation);

        let circumcenters: Vec<Point3> = triangulation
            .leaf_nodes()
            .into_iter()
            .map(|handle| triangulation.node(handle).tetrahedron().circumcenter())
            .collect();
        let is_circumcenter = |point: Point3| {
            circumcenters
                .iter()
                .any(|candidate| candidate.distance_2(point) < 1.0e-18)
        };

        let cell = voronoi.node(&center).expect("center must have a cell");
        assert!(!cell.segments().is_empty());
        for cell in voronoi.iter() {
            assert!(points.contains(&cell.site()));
            for segment in cell.segments() {
                assert!(is_circumcenter(segment.from));
                assert!(is_circumcenter(segment.to));
            }
        }
    }
}
