use super::edge::EdgeKey;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh store.
    pub struct FaceId;
}

/// Data associated with a polygonal face.
///
/// A face is a closed loop of vertices; its winding defines the normal.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The ordered vertex loop.
    pub vertices: Vec<VertexId>,
}

impl FaceData {
    /// Creates a face from a vertex loop.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self { vertices }
    }

    /// Iterates the directed boundary edges `(v_i, v_{i+1})` of the loop.
    pub fn directed_edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Iterates the undirected boundary edges of the loop.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.directed_edges().map(|(a, b)| EdgeKey::new(a, b))
    }
}
