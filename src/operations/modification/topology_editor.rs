use std::collections::HashMap;

use tracing::debug;

use super::{ExtrudeFace, FuseFaces, TopologyEdit};
use crate::error::{Result, TopologyError};
use crate::mesh::{Mesh, RigidTransform};
use crate::operations::grouping::FaceGroup;
use crate::operations::sampling::GroupSample;
use crate::topology::{EdgeKey, FaceId, ImportMap, MeshStore, VertexId};

/// Owns the working copy of a mesh and applies group extrusions to it, one
/// group at a time.
///
/// Groups refer to faces by their input index. Those indices are resolved
/// through the handles captured at import, which stay valid for faces no
/// earlier group touched.
#[derive(Debug)]
pub struct TopologyEditor {
    store: MeshStore,
    import: ImportMap,
    vertex_index: HashMap<VertexId, usize>,
    face_index: HashMap<FaceId, usize>,
}

impl TopologyEditor {
    /// Imports `mesh` into a fresh working copy.
    ///
    /// # Errors
    ///
    /// Returns an error if a face references a missing vertex.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        let (store, import) = MeshStore::from_mesh(mesh)?;
        let vertex_index = import
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();
        let face_index = import
            .faces
            .iter()
            .enumerate()
            .map(|(i, &f)| (f, i))
            .collect();
        Ok(Self {
            store,
            import,
            vertex_index,
            face_index,
        })
    }

    /// Fuses and extrudes one group, returning the edits performed.
    ///
    /// A single-face group is extruded directly. A larger group first has its
    /// interior edges deleted; whatever faces survive the fusion (one, unless
    /// the group wraps around a face outside it) are then extruded with the
    /// same sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the group names a face that is not in the input
    /// mesh or that an earlier group already consumed.
    pub fn apply(
        &mut self,
        group_index: usize,
        group: &FaceGroup,
        sample: &GroupSample,
    ) -> Result<Vec<TopologyEdit>> {
        let handles = group
            .faces()
            .iter()
            .map(|&f| {
                self.import.faces.get(f).copied().ok_or_else(|| {
                    TopologyError::EntityNotFound(format!("input face {f}"))
                })
            })
            .collect::<std::result::Result<Vec<FaceId>, _>>()?;

        let mut edits = Vec::new();
        let (targets, members) = if handles.len() > 1 {
            let report = FuseFaces::new(handles).execute(&mut self.store)?;
            for &key in &report.deleted {
                edits.push(TopologyEdit::DeleteEdge {
                    group: group_index,
                    edge: self.edge_indices(key)?,
                });
            }
            for &key in &report.skipped {
                edits.push(TopologyEdit::SkipStaleEdge {
                    group: group_index,
                    edge: self.edge_indices(key)?,
                });
            }
            (report.surviving, report.members)
        } else {
            (handles.clone(), vec![handles])
        };

        for (target, members) in targets.into_iter().zip(members) {
            let report = ExtrudeFace::new(target, sample.translation)
                .with_offset(sample.offset)
                .execute(&mut self.store)?;
            edits.push(TopologyEdit::Extrude {
                group: group_index,
                faces: members
                    .iter()
                    .filter_map(|f| self.face_index.get(f).copied())
                    .collect(),
                translation: sample.translation,
                offset: sample.offset,
                walls: report.walls.len(),
            });
        }

        debug!(
            group = group_index,
            faces = group.len(),
            amount = sample.amount,
            edits = edits.len(),
            "extruded group"
        );
        Ok(edits)
    }

    /// The working copy.
    #[must_use]
    pub fn store(&self) -> &MeshStore {
        &self.store
    }

    /// Exports the working copy with the given transform.
    #[must_use]
    pub fn finish(self, transform: RigidTransform) -> Mesh {
        self.store.to_mesh(transform)
    }

    fn edge_indices(&self, key: EdgeKey) -> Result<(usize, usize)> {
        let (a, b) = key.vertices();
        let index = |v: VertexId| {
            self.vertex_index
                .get(&v)
                .copied()
                .ok_or_else(|| TopologyError::EntityNotFound("input vertex".into()))
        };
        let (a, b) = (index(a)?, index(b)?);
        Ok((a.min(b), a.max(b)))
    }
}
