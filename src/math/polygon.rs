use super::{Point3, Vector3, TOLERANCE};

/// Accumulates the (unnormalized) Newell vector of a closed polygon.
///
/// The result points along the polygon normal implied by its winding and
/// its length is twice the projected polygon area. Works for non-planar and
/// non-convex loops.
#[must_use]
pub fn newell_vector(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Computes the unit normal of a polygon using Newell's method.
///
/// Returns `None` for degenerate loops (fewer than three points or zero area).
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Option<Vector3> {
    if points.len() < 3 {
        return None;
    }
    let normal = newell_vector(points);
    let len = normal.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(normal / len)
}

/// Computes the area of a polygon, projected along its own Newell normal.
///
/// Equal to the sum of the signed fan triangles for planar loops.
#[must_use]
pub fn polygon_area(points: &[Point3]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    0.5 * newell_vector(points).norm()
}
