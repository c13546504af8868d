use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, info_span};

use crate::error::{OperationError, Result};
use crate::mesh::Mesh;
use crate::operations::grouping::{FaceGroup, RegionGrower};
use crate::operations::modification::{TopologyEdit, TopologyEditor};
use crate::operations::query::MeshAdjacency;
use crate::operations::sampling::{ExtrusionParams, GroupExtruder, GroupSample};

/// The faces random extrusion may group and move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every face of the mesh.
    #[default]
    All,
    /// Only the listed face indices. An empty set selects nothing.
    Faces(BTreeSet<usize>),
}

impl Selection {
    /// Selects the given face indices.
    pub fn faces(faces: impl IntoIterator<Item = usize>) -> Self {
        Self::Faces(faces.into_iter().collect())
    }

    /// Resolves the selection against a mesh with `face_count` faces.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if a selected index is out of
    /// range.
    pub fn resolve(&self, face_count: usize) -> Result<BTreeSet<usize>> {
        match self {
            Self::All => Ok((0..face_count).collect()),
            Self::Faces(faces) => {
                if let Some(&bad) = faces.range(face_count..).next() {
                    return Err(OperationError::InvalidInput(format!(
                        "selected face {bad} is out of range for a mesh with {face_count} faces"
                    ))
                    .into());
                }
                Ok(faces.clone())
            }
        }
    }
}

/// Whether a run changed the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrudeStatus {
    /// At least one group was extruded.
    Extruded,
    /// Nothing was eligible; the input mesh is returned unchanged.
    EmptySelection,
}

/// Result of a [`RandomExtrude`] run.
#[derive(Debug, Clone)]
pub struct RandomExtrudeOutput {
    /// The extruded mesh, carrying the input's rigid transform.
    pub mesh: Mesh,
    /// Face groups in processing order, by input face index.
    pub groups: Vec<FaceGroup>,
    /// Sampled parameters, parallel to `groups`.
    pub samples: Vec<GroupSample>,
    /// Topology edits in the order they were applied.
    pub edits: Vec<TopologyEdit>,
    /// Seed of the RNG stream, when the run created its own RNG.
    pub seed: Option<u64>,
    /// Whether anything was extruded.
    pub status: ExtrudeStatus,
}

/// Partitions the selected faces into random, connected, similarly-oriented
/// groups and extrudes each group by a random amount.
///
/// Runs are reproducible: the same mesh, selection, parameters and seed give
/// the same groups, samples and output mesh.
pub struct RandomExtrude {
    params: ExtrusionParams,
    seed: Option<u64>,
}

impl RandomExtrude {
    /// Creates a new `RandomExtrude` operation.
    #[must_use]
    pub fn new(params: ExtrusionParams) -> Self {
        Self { params, seed: None }
    }

    /// Fixes the RNG seed. Without one, a fresh seed is drawn per run and
    /// reported in [`RandomExtrudeOutput::seed`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Executes the operation on one mesh.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters, an out-of-range selection, or
    /// a mesh whose adjacency cannot be built. The input is never modified.
    pub fn execute(&self, mesh: &Mesh, selection: &Selection) -> Result<RandomExtrudeOutput> {
        let seed = self.resolve_seed();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut output = self.execute_with_rng(mesh, selection, &mut rng)?;
        output.seed = Some(seed);
        Ok(output)
    }

    /// Executes the operation on several meshes in turn, drawing from a single
    /// RNG stream.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error.
    pub fn execute_batch(&self, targets: &[(Mesh, Selection)]) -> Result<Vec<RandomExtrudeOutput>> {
        let seed = self.resolve_seed();
        let mut rng = StdRng::seed_from_u64(seed);
        targets
            .iter()
            .map(|(mesh, selection)| {
                let mut output = self.execute_with_rng(mesh, selection, &mut rng)?;
                output.seed = Some(seed);
                Ok(output)
            })
            .collect()
    }

    /// Executes the operation with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// See [`RandomExtrude::execute`].
    pub fn execute_with_rng<R: Rng + ?Sized>(
        &self,
        mesh: &Mesh,
        selection: &Selection,
        rng: &mut R,
    ) -> Result<RandomExtrudeOutput> {
        let _span = info_span!("random_extrude", faces = mesh.face_count()).entered();
        self.params.validate()?;

        let eligible = selection.resolve(mesh.face_count())?;
        if eligible.is_empty() {
            info!("no faces selected; mesh left unchanged");
            return Ok(unchanged(mesh));
        }

        let adjacency = MeshAdjacency::build(mesh)?;
        debug!(stage = "built", eligible = eligible.len());

        let groups = RegionGrower::new(&adjacency, self.params.max_faces_per_group)
            .with_policy(self.params.similarity)
            .with_traverse_rings(self.params.traverse_rings)
            .grow(&eligible, rng);
        if groups.is_empty() {
            info!("every selected face is degenerate; mesh left unchanged");
            return Ok(unchanged(mesh));
        }
        debug!(stage = "grouped", groups = groups.len());

        let extruder = GroupExtruder::new(&self.params);
        let samples = groups
            .iter()
            .map(|group| extruder.sample(group, &adjacency.normal(group.seed()), rng))
            .collect::<Result<Vec<_>>>()?;

        let mut editor = TopologyEditor::from_mesh(mesh)?;
        let mut edits = Vec::new();
        for (index, (group, sample)) in groups.iter().zip(&samples).enumerate() {
            edits.extend(editor.apply(index, group, sample)?);
        }
        let mesh = editor.finish(mesh.transform);
        debug!(
            stage = "finalized",
            faces = mesh.face_count(),
            vertices = mesh.vertex_count(),
            area = mesh.surface_area()
        );

        Ok(RandomExtrudeOutput {
            mesh,
            groups,
            samples,
            edits,
            seed: None,
            status: ExtrudeStatus::Extruded,
        })
    }

    fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

fn unchanged(mesh: &Mesh) -> RandomExtrudeOutput {
    RandomExtrudeOutput {
        mesh: mesh.clone(),
        groups: Vec::new(),
        samples: Vec::new(),
        edits: Vec::new(),
        seed: None,
        status: ExtrudeStatus::EmptySelection,
    }
}
