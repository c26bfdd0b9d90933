//! Planar predicates and constructions.
//!
//! All predicates operate in plain `f64` arithmetic without an exact
//! fallback. Near degenerate configurations (almost collinear or almost
//! cocircular points) are a known approximation risk and may misclassify.

use super::math::SideInfo;
use crate::Point2;

/// Determines on which side of the directed edge `from -> to` a point lies.
///
/// The positive side is the left side; a counterclockwise triangle sees all
/// of its vertices on the positive side of each directed edge.
pub fn side_query(from: Point2, to: Point2, query_point: Point2) -> SideInfo {
    let q = query_point;
    let determinant = (to.x - from.x) * (q.y - from.y) - (to.y - from.y) * (q.x - from.x);
    SideInfo::from_determinant(determinant)
}

/// Returns `true` if `p` lies strictly inside the circumcircle of the
/// counterclockwise ordered triangle `v1`, `v2`, `v3`.
///
/// Points exactly on the circumcircle (up to floating point rounding) are
/// reported as not contained, which keeps cocircular configurations from
/// flipping back and forth.
pub fn contained_in_circumference(v1: Point2, v2: Point2, v3: Point2, p: Point2) -> bool {
    let d1 = v1.sub(p);
    let d2 = v2.sub(p);
    let d3 = v3.sub(p);

    let l1 = d1.length2();
    let l2 = d2.length2();
    let l3 = d3.length2();

    // The lifted determinant is positive exactly if p lies inside the
    // circumcircle, provided v1, v2, v3 are ordered counterclockwise.
    let determinant = d1.x * (d2.y * l3 - d3.y * l2) - d1.y * (d2.x * l3 - d3.x * l2)
        + l1 * (d2.x * d3.y - d3.x * d2.y);
    determinant > 0.0
}

/// Computes the circumcenter and the squared circumradius of a triangle.
///
/// Solves the linear system of points equidistant from all three vertices.
/// The result is unreliable for (near) collinear vertices.
pub fn circumcenter(positions: [Point2; 3]) -> (Point2, f64) {
    let [v0, v1, v2] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);

    let d = 2.0 * (b.x * c.y - c.x * b.y);
    let len_b = b.dot(b);
    let len_c = c.dot(c);
    let d_inv = 1.0 / d;

    let x = (len_b * c.y - len_c * b.y) * d_inv;
    let y = (-len_b * c.x + len_c * b.x) * d_inv;
    let relative = Point2::new(x, y);
    (relative.add(v0), relative.length2())
}

/// Returns the area of a triangle.
pub fn triangle_area(positions: [Point2; 3]) -> f64 {
    let [v0, v1, v2] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);
    (b.x * c.y - b.y * c.x).abs() * 0.5
}

#[cfg(test)]
mod test {
    use super::{circumcenter, contained_in_circumference, side_query, triangle_area};
    use crate::Point2;
    use approx::assert_relative_eq;

    #[test]
    fn test_side_query() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);

        assert!(side_query(p1, p2, Point2::new(1.0, 0.0)).is_on_negative_side());
        assert!(side_query(p1, p2, Point2::new(0.0, 1.0)).is_on_positive_side());
        assert!(side_query(p1, p2, Point2::new(0.5, 0.5)).is_on_boundary());
    }

    #[test]
    fn test_circumcenter() {
        let (center, radius_2) = circumcenter([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert_relative_eq!(center.x, 0.5);
        assert_relative_eq!(center.y, 0.5);
        assert_relative_eq!(radius_2, 0.5);

        // The center must be equidistant from all vertices.
        let vertices = [
            Point2::new(-3.0, 2.0),
            Point2::new(4.0, 1.5),
            Point2::new(0.5, -5.0),
        ];
        let (center, radius_2) = circumcenter(vertices);
        for vertex in vertices {
            assert_relative_eq!(center.distance_2(vertex), radius_2, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn test_triangle_area() {
        let area = triangle_area([
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ]);
        assert_relative_eq!(area, 2.0);

        let degenerate = triangle_area([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ]);
        assert_relative_eq!(degenerate, 0.0);
    }

    #[test]
    fn test_contained_in_circumference() {
        let (a1, a2, a3) = (3f64, 2f64, 1f64);
        let offset = Point2::new(0.5, 0.7);
        let v1 = Point2::new(a1.sin(), a1.cos()).mul(2.0).add(offset);
        let v2 = Point2::new(a2.sin(), a2.cos()).mul(2.0).add(offset);
        let v3 = Point2::new(a3.sin(), a3.cos()).mul(2.0).add(offset);
        assert!(side_query(v1, v2, v3).is_on_positive_side());
        assert!(contained_in_circumference(v1, v2, v3, offset));
        let shrunk = (v1.sub(offset)).mul(0.9).add(offset);
        assert!(contained_in_circumference(v1, v2, v3, shrunk));
        let expanded = (v1.sub(offset)).mul(1.1).add(offset);
        assert!(!contained_in_circumference(v1, v2, v3, expanded));
        assert!(!contained_in_circumference(
            v1,
            v2,
            v3,
            Point2::new(2.0 + offset.x, 2.0 + offset.y)
        ));
    }

    #[test]
    fn test_vertices_not_contained() {
        let v1 = Point2::new(0.0, 0.0);
        let v2 = Point2::new(1.0, 0.0);
        let v3 = Point2::new(0.0, 1.0);
        for vertex in [v1, v2, v3] {
            assert!(!contained_in_circumference(v1, v2, v3, vertex));
        }
    }
}
