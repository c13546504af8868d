//! Small meshes shared by the unit tests.

use crate::math::Point3;
use crate::mesh::Mesh;

pub(crate) fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

/// A single counter-clockwise unit quad in the XY plane, normal `+Z`.
pub(crate) fn unit_quad() -> Mesh {
    Mesh::new(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
}

/// An `nx` by `ny` grid of unit quads in the XY plane, normals `+Z`.
///
/// Face `i + j * nx` covers `[i, i+1] x [j, j+1]`.
pub(crate) fn grid(nx: usize, ny: usize) -> Mesh {
    let mut positions = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            #[allow(clippy::cast_precision_loss)]
            positions.push(p(i as f64, j as f64, 0.0));
        }
    }
    let stride = nx + 1;
    let mut faces = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v0 = i + j * stride;
            faces.push(vec![v0, v0 + 1, v0 + 1 + stride, v0 + stride]);
        }
    }
    Mesh::new(positions, faces)
}

/// Axis-aligned unit cube with outward-facing quads.
///
/// Faces: 0 = -Z, 1 = +Z, 2 = -Y, 3 = +X, 4 = +Y, 5 = -X.
pub(crate) fn cube() -> Mesh {
    Mesh::new(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
        ],
        vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ],
    )
}

/// Two unit quads sharing the edge `1-2`, the second folded up by `angle`
/// radians around that edge.
pub(crate) fn hinge(angle: f64) -> Mesh {
    let (s, c) = angle.sin_cos();
    Mesh::new(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(1.0 + c, 0.0, s),
            p(1.0 + c, 1.0, s),
        ],
        vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]],
    )
}
