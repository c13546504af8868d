mod transform;

pub use transform::RigidTransform;

use std::collections::HashSet;

use crate::math::{newell_normal, polygon_area, Point3, Vector3};

/// A self-contained polygon mesh: indexed vertex positions, face loops and
/// the rigid transform placing the mesh in its parent space.
///
/// This is the value exchanged with callers; editing happens on a
/// [`MeshStore`](crate::topology::MeshStore) with stable handles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions in local space.
    pub positions: Vec<Point3>,
    /// Face loops, each an ordered list of indices into `positions`.
    pub faces: Vec<Vec<usize>>,
    /// Placement of the mesh.
    pub transform: RigidTransform,
}

impl Mesh {
    /// Creates a mesh with an identity transform.
    #[must_use]
    pub fn new(positions: Vec<Point3>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            positions,
            faces,
            transform: RigidTransform::identity(),
        }
    }

    /// Sets the rigid transform.
    #[must_use]
    pub fn with_transform(mut self, transform: RigidTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of distinct undirected edges referenced by the face loops.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let mut edges = HashSet::new();
        for face in &self.faces {
            let n = face.len();
            for i in 0..n {
                let (a, b) = (face[i], face[(i + 1) % n]);
                if a != b {
                    edges.insert((a.min(b), a.max(b)));
                }
            }
        }
        edges.len()
    }

    /// Positions of a face loop, or `None` if the face or one of its
    /// indices is out of range.
    #[must_use]
    pub fn face_points(&self, face: usize) -> Option<Vec<Point3>> {
        self.faces
            .get(face)?
            .iter()
            .map(|&v| self.positions.get(v).copied())
            .collect()
    }

    /// Unit normal of a face, `None` when degenerate or out of range.
    #[must_use]
    pub fn face_normal(&self, face: usize) -> Option<Vector3> {
        newell_normal(&self.face_points(face)?)
    }

    /// Area of a face, `0.0` when out of range.
    #[must_use]
    pub fn face_area(&self, face: usize) -> f64 {
        self.face_points(face)
            .map_or(0.0, |points| polygon_area(&points))
    }

    /// Vertex positions mapped through the mesh transform into parent space.
    #[must_use]
    pub fn world_positions(&self) -> Vec<Point3> {
        self.positions
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }

    /// Sum of all face areas.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }
}
