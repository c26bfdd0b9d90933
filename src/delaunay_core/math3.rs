//! Spatial predicates and constructions.
//!
//! Like the planar variants in [math2](super::math2), everything operates in
//! plain `f64` arithmetic with no exact fallback.

use super::math::SideInfo;
use crate::Point3;

/// Determines on which side of the oriented plane through `a`, `b` and `c` a
/// point lies.
///
/// The positive side is the halfspace the normal `(b - a) x (c - a)` points
/// into. A positively oriented tetrahedron sees its fourth vertex on the
/// positive side of its first three.
pub fn orientation_query(a: Point3, b: Point3, c: Point3, query_point: Point3) -> SideInfo {
    let u = b.sub(a);
    let v = c.sub(a);
    let w = query_point.sub(a);
    SideInfo::from_determinant(u.cross(v).dot(w))
}

/// Returns `true` if `p` lies strictly inside the circumsphere of the
/// positively oriented tetrahedron `v0`, `v1`, `v2`, `v3`.
///
/// Points exactly on the circumsphere (up to floating point rounding) are
/// reported as not contained.
pub fn contained_in_circumsphere(
    v0: Point3,
    v1: Point3,
    v2: Point3,
    v3: Point3,
    p: Point3,
) -> bool {
    let d0 = v0.sub(p);
    let d1 = v1.sub(p);
    let d2 = v2.sub(p);
    let d3 = v3.sub(p);

    let l0 = d0.length2();
    let l1 = d1.length2();
    let l2 = d2.length2();
    let l3 = d3.length2();

    // Lifted 4x4 determinant with rows (vi - p, |vi - p|^2), expanded along
    // the last column. For a positively oriented tetrahedron the determinant
    // is negative exactly if p lies inside the circumsphere.
    let m0 = d1.cross(d2).dot(d3);
    let m1 = d0.cross(d2).dot(d3);
    let m2 = d0.cross(d1).dot(d3);
    let m3 = d0.cross(d1).dot(d2);

    let determinant = -l0 * m0 + l1 * m1 - l2 * m2 + l3 * m3;
    determinant < 0.0
}

/// Computes the circumcenter and the squared circumradius of a tetrahedron.
///
/// Solves the 3x3 linear system of points equidistant from all four vertices
/// via Cramer's rule. The result is unreliable for (near) coplanar vertices.
pub fn circumcenter(positions: [Point3; 4]) -> (Point3, f64) {
    let [v0, v1, v2, v3] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);
    let d = v3.sub(v0);

    let rhs = Point3::new(b.length2() * 0.5, c.length2() * 0.5, d.length2() * 0.5);

    let det = b.cross(c).dot(d);
    let det_inv = 1.0 / det;

    // Columns of the inverse via cross products of the system rows.
    let col_x = c.cross(d);
    let col_y = d.cross(b);
    let col_z = b.cross(c);

    let relative = col_x
        .mul(rhs.x)
        .add(col_y.mul(rhs.y))
        .add(col_z.mul(rhs.z))
        .mul(det_inv);
    (relative.add(v0), relative.length2())
}

/// Returns the volume of a tetrahedron.
pub fn tetrahedron_volume(positions: [Point3; 4]) -> f64 {
    let [v0, v1, v2, v3] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);
    let d = v3.sub(v0);
    b.cross(c).dot(d).abs() / 6.0
}

#[cfg(test)]
mod test {
    use super::{circumcenter, contained_in_circumsphere, orientation_query, tetrahedron_volume};
    use crate::Point3;
    use approx::assert_relative_eq;

    fn unit_tetrahedron() -> [Point3; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_orientation_query() {
        let [v0, v1, v2, v3] = unit_tetrahedron();
        assert!(orientation_query(v0, v1, v2, v3).is_on_positive_side());
        assert!(orientation_query(v0, v2, v1, v3).is_on_negative_side());
        assert!(orientation_query(v0, v1, v2, Point3::new(0.3, 0.2, 0.0)).is_on_boundary());
    }

    #[test]
    fn test_contained_in_circumsphere() {
        let [v0, v1, v2, v3] = unit_tetrahedron();
        let (center, _) = circumcenter(unit_tetrahedron());

        assert!(contained_in_circumsphere(v0, v1, v2, v3, center));
        assert!(contained_in_circumsphere(
            v0,
            v1,
            v2,
            v3,
            Point3::new(0.25, 0.25, 0.25)
        ));
        assert!(!contained_in_circumsphere(
            v0,
            v1,
            v2,
            v3,
            Point3::new(10.0, 10.0, 10.0)
        ));
        assert!(!contained_in_circumsphere(
            v0,
            v1,
            v2,
            v3,
            Point3::new(-1.0, 0.0, 0.0)
        ));
        // Vertices lie on the sphere, not inside.
        for vertex in unit_tetrahedron() {
            assert!(!contained_in_circumsphere(v0, v1, v2, v3, vertex));
        }
    }

    #[test]
    fn test_circumcenter() {
        let (center, radius_2) = circumcenter(unit_tetrahedron());
        assert_relative_eq!(center.x, 0.5);
        assert_relative_eq!(center.y, 0.5);
        assert_relative_eq!(center.z, 0.5);
        assert_relative_eq!(radius_2, 0.75);

        let vertices = [
            Point3::new(-2.0, 1.0, 0.5),
            Point3::new(3.0, -1.0, 2.0),
            Point3::new(0.0, 4.0, -1.0),
            Point3::new(1.0, 1.0, 5.0),
        ];
        let (center, radius_2) = circumcenter(vertices);
        for vertex in vertices {
            assert_relative_eq!(center.distance_2(vertex), radius_2, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn test_tetrahedron_volume() {
        assert_relative_eq!(tetrahedron_volume(unit_tetrahedron()), 1.0 / 6.0);

        let coplanar = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert_relative_eq!(tetrahedron_volume(coplanar), 0.0);
    }
}
