pub mod edge;
pub mod face;
pub mod vertex;

pub use edge::EdgeKey;
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use crate::error::TopologyError;
use crate::math::Point3;
use crate::mesh::{Mesh, RigidTransform};
use slotmap::{SecondaryMap, SlotMap};

/// Central arena that owns the editable mesh.
///
/// Vertices and faces are referenced via typed IDs (generational indices), so
/// a handle captured before an edit either still names the same entity or is
/// detectably stale. Edge incidence is derived from face loops and kept
/// current on every face insertion, removal and loop rewrite.
#[derive(Debug, Default)]
pub struct MeshStore {
    vertices: SlotMap<VertexId, VertexData>,
    faces: SlotMap<FaceId, FaceData>,
    edges: HashMap<EdgeKey, Vec<FaceId>>,
    vertex_uses: SecondaryMap<VertexId, usize>,
}

/// Handles assigned to the vertices and faces of an imported [`Mesh`],
/// indexed by their position in the source mesh.
#[derive(Debug, Clone, Default)]
pub struct ImportMap {
    /// `vertices[i]` is the handle of source vertex `i`.
    pub vertices: Vec<VertexId>,
    /// `faces[i]` is the handle of source face `i`.
    pub faces: Vec<FaceId>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports an indexed mesh, returning the store and the handle of every
    /// source vertex and face.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if a face references a
    /// vertex index that does not exist.
    pub fn from_mesh(mesh: &Mesh) -> Result<(Self, ImportMap), TopologyError> {
        let mut store = Self::new();
        let vertices: Vec<VertexId> = mesh
            .positions
            .iter()
            .map(|&p| store.add_vertex(VertexData::new(p)))
            .collect();

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for (index, face) in mesh.faces.iter().enumerate() {
            let mut face_loop = Vec::with_capacity(face.len());
            for &v in face {
                let id = vertices.get(v).copied().ok_or_else(|| {
                    TopologyError::InvalidTopology(format!(
                        "face {index} references missing vertex {v}"
                    ))
                })?;
                face_loop.push(id);
            }
            faces.push(store.add_face(FaceData::new(face_loop)));
        }

        Ok((store, ImportMap { vertices, faces }))
    }

    /// Exports the store to an indexed mesh with the given transform.
    ///
    /// Vertices and faces are emitted in slot order; vertices no face uses
    /// are kept so that untouched input vertices survive a round trip.
    #[must_use]
    pub fn to_mesh(&self, transform: RigidTransform) -> Mesh {
        let mut index_of: SecondaryMap<VertexId, usize> = SecondaryMap::new();
        let mut positions = Vec::with_capacity(self.vertices.len());
        for (id, vertex) in &self.vertices {
            index_of.insert(id, positions.len());
            positions.push(vertex.point);
        }
        let faces = self
            .faces
            .values()
            .map(|face| {
                face.vertices
                    .iter()
                    .filter_map(|&v| index_of.get(v).copied())
                    .collect::<Vec<usize>>()
            })
            .collect();
        Mesh {
            positions,
            faces,
            transform,
        }
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        let id = self.vertices.insert(data);
        self.vertex_uses.insert(id, 0);
        id
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Removes a vertex that no face references any more.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or still used by a face.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<VertexData, TopologyError> {
        if self.vertex_uses.get(id).copied().unwrap_or(0) > 0 {
            return Err(TopologyError::InvalidTopology(
                "cannot remove a vertex that is still referenced".into(),
            ));
        }
        self.vertex_uses.remove(id);
        self.vertices
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns `true` if the vertex exists and no face loop references it.
    #[must_use]
    pub fn is_orphan(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id) && self.vertex_uses.get(id).copied().unwrap_or(0) == 0
    }

    /// Number of vertices in the store.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Face operations ---

    /// Inserts a face, registers its edges, and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        let vertices = data.vertices.clone();
        let id = self.faces.insert(data);
        self.link(id, &vertices);
        id
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Returns `true` if the face handle is still live.
    #[must_use]
    pub fn contains_face(&self, id: FaceId) -> bool {
        self.faces.contains_key(id)
    }

    /// Removes a face and unregisters its edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found in the store.
    pub fn remove_face(&mut self, id: FaceId) -> Result<FaceData, TopologyError> {
        let data = self
            .faces
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))?;
        self.unlink(id, &data.vertices);
        Ok(data)
    }

    /// Replaces the vertex loop of a face, keeping its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found in the store.
    pub fn set_face_vertices(
        &mut self,
        id: FaceId,
        vertices: Vec<VertexId>,
    ) -> Result<(), TopologyError> {
        let face = self
            .faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))?;
        let old = std::mem::replace(&mut face.vertices, vertices.clone());
        self.unlink(id, &old);
        self.link(id, &vertices);
        Ok(())
    }

    /// Collects the positions of a face loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices is missing.
    pub fn face_points(&self, id: FaceId) -> Result<Vec<Point3>, TopologyError> {
        self.face(id)?
            .vertices
            .iter()
            .map(|&v| self.vertex(v).map(|data| data.point))
            .collect()
    }

    /// Number of faces in the store.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Edge queries ---

    /// Faces incident to an edge. Empty if the edge does not exist.
    ///
    /// A face whose loop runs along the edge twice is listed twice.
    #[must_use]
    pub fn edge_faces(&self, key: EdgeKey) -> &[FaceId] {
        self.edges.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if some face loop runs along the edge.
    #[must_use]
    pub fn has_edge(&self, key: EdgeKey) -> bool {
        self.edges.contains_key(&key)
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn link(&mut self, face: FaceId, vertices: &[VertexId]) {
        let n = vertices.len();
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            if let Some(uses) = self.vertex_uses.get_mut(a) {
                *uses += 1;
            }
            if a != b {
                self.edges.entry(EdgeKey::new(a, b)).or_default().push(face);
            }
        }
    }

    fn unlink(&mut self, face: FaceId, vertices: &[VertexId]) {
        let n = vertices.len();
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            if let Some(uses) = self.vertex_uses.get_mut(a) {
                *uses = uses.saturating_sub(1);
            }
            if a == b {
                continue;
            }
            let key = EdgeKey::new(a, b);
            if let Some(faces) = self.edges.get_mut(&key) {
                if let Some(pos) = faces.iter().position(|&f| f == face) {
                    faces.swap_remove(pos);
                }
                if faces.is_empty() {
                    self.edges.remove(&key);
                }
            }
        }
    }
}
