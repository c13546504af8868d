use crate::error::{GeometryError, Result};
use crate::math::{newell_normal, Point3, Vector3, TOLERANCE};
use crate::topology::{FaceData, FaceId, MeshStore, VertexData, VertexId};

/// Smallest miter cosine used when insetting a corner; caps the miter length
/// at sharp corners to four times the offset.
const MIN_MITER_COS: f64 = 0.25;

/// Extrudes a face of the mesh in place.
///
/// The face keeps its handle and becomes the cap: its boundary is copied,
/// optionally inset by an offset within the face plane, and moved by the
/// translation. Each boundary edge `v_i -> v_{i+1}` gains one wall quad
/// `[v_i, v_{i+1}, c_{i+1}, c_i]` joining the original boundary to the cap,
/// so the walls share winding with the neighbors of the original face.
pub struct ExtrudeFace {
    face: FaceId,
    translation: Vector3,
    offset: Option<f64>,
}

/// Entities created by an [`ExtrudeFace`] run.
#[derive(Debug, Clone)]
pub struct ExtrudeReport {
    /// The extruded cap (the original face handle).
    pub cap: FaceId,
    /// Wall faces, one per boundary edge, in loop order.
    pub walls: Vec<FaceId>,
    /// Vertices of the cap loop, one per original boundary vertex.
    pub cap_vertices: Vec<VertexId>,
}

impl ExtrudeFace {
    /// Creates a new `ExtrudeFace` operation.
    #[must_use]
    pub fn new(face: FaceId, translation: Vector3) -> Self {
        Self {
            face,
            translation,
            offset: None,
        }
    }

    /// Insets the cap boundary by `offset` before translating it.
    #[must_use]
    pub fn with_offset(mut self, offset: Option<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Executes the extrusion, editing the store in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing, or if an inset is requested
    /// for a face whose normal cannot be computed.
    pub fn execute(&self, store: &mut MeshStore) -> Result<ExtrudeReport> {
        let base = store.face(self.face)?.vertices.clone();
        let base_points = store.face_points(self.face)?;

        let cap_points = match self.offset {
            Some(offset) if offset.abs() > TOLERANCE => {
                let normal = newell_normal(&base_points).ok_or_else(|| {
                    GeometryError::Degenerate("cannot inset a face without a normal".into())
                })?;
                inset_loop(&base_points, &normal, offset)
            }
            _ => base_points,
        };

        let cap_vertices: Vec<VertexId> = cap_points
            .iter()
            .map(|p| store.add_vertex(VertexData::new(p + self.translation)))
            .collect();
        store.set_face_vertices(self.face, cap_vertices.clone())?;

        let n = base.len();
        let mut walls = Vec::with_capacity(n);
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = vec![base[i], base[j], cap_vertices[j], cap_vertices[i]];
            walls.push(store.add_face(FaceData::new(quad)));
        }

        Ok(ExtrudeReport {
            cap: self.face,
            walls,
            cap_vertices,
        })
    }
}

/// Moves every vertex of a loop inward by `offset`, measured perpendicular to
/// its adjacent edges within the plane of `normal`.
///
/// Interior is to the left of each edge when looking down `normal`, which
/// holds for loops wound counter-clockwise about their own Newell normal.
fn inset_loop(points: &[Point3], normal: &Vector3, offset: f64) -> Vec<Point3> {
    let n = points.len();
    let inward = |from: &Point3, to: &Point3| -> Option<Vector3> {
        normal.cross(&(to - from)).try_normalize(TOLERANCE)
    };

    (0..n)
        .map(|i| {
            let prev = &points[(i + n - 1) % n];
            let curr = &points[i];
            let next = &points[(i + 1) % n];
            let in_prev = inward(prev, curr);
            let in_next = inward(curr, next);

            let shift = match (in_prev, in_next) {
                (Some(a), Some(b)) => match (a + b).try_normalize(TOLERANCE) {
                    Some(miter) => miter * (offset / miter.dot(&b).max(MIN_MITER_COS)),
                    None => b * offset,
                },
                (Some(d), None) | (None, Some(d)) => d * offset,
                (None, None) => Vector3::zeros(),
            };
            curr + shift
        })
        .collect()
}
