use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::error::{Result, TopologyError};
use crate::math::{newell_normal, polygon_area, Vector3, TOLERANCE};
use crate::mesh::Mesh;

/// Per-face normals and areas plus the face adjacency graph of a mesh.
///
/// Two faces are neighbors when their loops share an edge. Degenerate faces
/// (fewer than three distinct vertices or zero area) are kept with area `0`
/// and a zero normal, and are reported by [`MeshAdjacency::is_degenerate`].
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    normals: Vec<Vector3>,
    areas: Vec<f64>,
    neighbors: Vec<Vec<usize>>,
    degenerate: Vec<bool>,
}

impl MeshAdjacency {
    /// Builds the adjacency of `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if a face references a
    /// missing vertex or an edge is shared by more than two faces.
    pub fn build(mesh: &Mesh) -> Result<Self> {
        let face_count = mesh.face_count();
        let mut normals = Vec::with_capacity(face_count);
        let mut areas = Vec::with_capacity(face_count);
        let mut degenerate = Vec::with_capacity(face_count);
        let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

        for (index, face) in mesh.faces.iter().enumerate() {
            let points = mesh.face_points(index).ok_or_else(|| {
                TopologyError::InvalidTopology(format!("face {index} references a missing vertex"))
            })?;

            let distinct: BTreeSet<usize> = face.iter().copied().collect();
            let area = polygon_area(&points);
            let normal = if distinct.len() < 3 || area < TOLERANCE {
                None
            } else {
                newell_normal(&points)
            };

            if let Some(normal) = normal {
                normals.push(normal);
                areas.push(area);
                degenerate.push(false);
            } else {
                warn!(face = index, "degenerate face excluded from grouping");
                normals.push(Vector3::zeros());
                areas.push(0.0);
                degenerate.push(true);
            }

            let n = face.len();
            for i in 0..n {
                let (a, b) = (face[i], face[(i + 1) % n]);
                if a == b {
                    continue;
                }
                let faces = edge_faces.entry((a.min(b), a.max(b))).or_default();
                if !faces.contains(&index) {
                    faces.push(index);
                }
            }
        }

        let mut neighbor_sets = vec![BTreeSet::new(); face_count];
        for (&(a, b), faces) in &edge_faces {
            match faces.as_slice() {
                [_] => {}
                [f, g] => {
                    neighbor_sets[*f].insert(*g);
                    neighbor_sets[*g].insert(*f);
                }
                _ => {
                    return Err(TopologyError::InvalidTopology(format!(
                        "edge ({a}, {b}) is shared by {} faces",
                        faces.len()
                    ))
                    .into());
                }
            }
        }

        debug!(
            faces = face_count,
            edges = edge_faces.len(),
            "built mesh adjacency"
        );

        Ok(Self {
            normals,
            areas,
            neighbors: neighbor_sets
                .into_iter()
                .map(|set| set.into_iter().collect())
                .collect(),
            degenerate,
        })
    }

    /// Number of faces covered.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.normals.len()
    }

    /// Unit normal of `face`; zero for degenerate or out-of-range faces.
    #[must_use]
    pub fn normal(&self, face: usize) -> Vector3 {
        self.normals.get(face).copied().unwrap_or_else(Vector3::zeros)
    }

    /// Area of `face`; zero for degenerate or out-of-range faces.
    #[must_use]
    pub fn area(&self, face: usize) -> f64 {
        self.areas.get(face).copied().unwrap_or(0.0)
    }

    /// Faces sharing an edge with `face`, in ascending order. Empty for an
    /// out-of-range face.
    #[must_use]
    pub fn neighbors(&self, face: usize) -> &[usize] {
        self.neighbors.get(face).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `face` was too degenerate to get a normal. Faces out
    /// of range read as degenerate.
    #[must_use]
    pub fn is_degenerate(&self, face: usize) -> bool {
        self.degenerate.get(face).copied().unwrap_or(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RandexError;
    use crate::test_meshes::{cube, grid, p, unit_quad};
    use approx::assert_relative_eq;

    #[test]
    fn single_quad_has_no_neighbors() {
        let adj = MeshAdjacency::build(&unit_quad()).unwrap();
        assert_eq!(adj.face_count(), 1);
        assert!(adj.neighbors(0).is_empty());
        assert_relative_eq!(adj.area(0), 1.0);
        assert_relative_eq!(adj.normal(0), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn grid_center_has_four_neighbors() {
        let adj = MeshAdjacency::build(&grid(3, 3)).unwrap();
        assert_eq!(adj.neighbors(4), &[1, 3, 5, 7]);
        assert_eq!(adj.neighbors(0), &[1, 3]);
        // diagonal faces share only a vertex
        assert!(!adj.neighbors(0).contains(&4));
    }

    #[test]
    fn cube_faces_each_touch_four() {
        let adj = MeshAdjacency::build(&cube()).unwrap();
        for face in 0..6 {
            assert_eq!(adj.neighbors(face).len(), 4, "face {face}");
        }
        // top and bottom are opposite
        assert!(!adj.neighbors(0).contains(&1));
        assert_relative_eq!(adj.normal(0).dot(&adj.normal(1)), -1.0);
    }

    #[test]
    fn zero_area_face_is_degenerate_not_fatal() {
        let mesh = Mesh::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(2.0, 0.0, 0.0),
            ],
            vec![vec![0, 1, 2], vec![0, 1, 3]],
        );
        let adj = MeshAdjacency::build(&mesh).unwrap();
        assert!(!adj.is_degenerate(0));
        assert!(adj.is_degenerate(1));
        assert_eq!(adj.area(1), 0.0);
        assert_eq!(adj.normal(1), Vector3::zeros());
    }

    #[test]
    fn repeated_vertex_loop_is_degenerate() {
        let mesh = Mesh::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            vec![vec![0, 1, 1, 0]],
        );
        let adj = MeshAdjacency::build(&mesh).unwrap();
        assert!(adj.is_degenerate(0));
    }

    #[test]
    fn non_manifold_edge_is_rejected() {
        let mesh = Mesh::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(0.0, -1.0, 0.0),
                p(0.0, 0.0, 1.0),
            ],
            vec![vec![0, 1, 2], vec![1, 0, 3], vec![0, 1, 4]],
        );
        let err = MeshAdjacency::build(&mesh).unwrap_err();
        assert!(matches!(
            err,
            RandexError::Topology(TopologyError::InvalidTopology(_))
        ));
    }

    #[test]
    fn missing_vertex_is_rejected() {
        let mesh = Mesh::new(vec![p(0.0, 0.0, 0.0)], vec![vec![0, 1, 2]]);
        assert!(MeshAdjacency::build(&mesh).is_err());
    }

    #[test]
    fn out_of_range_face_reads_as_degenerate() {
        let adj = MeshAdjacency::build(&unit_quad()).unwrap();
        assert!(adj.is_degenerate(7));
        assert_eq!(adj.normal(7), Vector3::zeros());
        assert_eq!(adj.area(7), 0.0);
        assert!(adj.neighbors(7).is_empty());
    }
}
