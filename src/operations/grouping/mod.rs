mod region_grow;

pub use region_grow::RegionGrower;

use crate::math::Vector3;

/// Tolerance on `1 - dot` for [`SimilarityPolicy::Parallel`].
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Default upper bound on the number of faces fused into one group.
pub const DEFAULT_MAX_FACES_PER_GROUP: usize = 20;

/// Decides whether a candidate face may join a group, by comparing its normal
/// with the normal of the group's seed face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimilarityPolicy {
    /// Normals lie in the same hemisphere: `dot > 0`.
    #[default]
    Positive,
    /// Normals are co-directional within [`PARALLEL_EPSILON`].
    Parallel,
}

impl SimilarityPolicy {
    /// Returns `true` if a face with normal `candidate` may join a group whose
    /// seed has normal `seed`.
    #[must_use]
    pub fn admits(self, seed: &Vector3, candidate: &Vector3) -> bool {
        let dot = seed.dot(candidate);
        match self {
            Self::Positive => dot > 0.0,
            Self::Parallel => (dot - 1.0).abs() <= PARALLEL_EPSILON,
        }
    }
}

/// A connected set of faces extruded as one unit.
///
/// The first face is the seed; its normal is the group's representative
/// normal.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGroup {
    faces: Vec<usize>,
    total_area: f64,
}

impl FaceGroup {
    /// Creates a group from its seed face.
    #[must_use]
    pub fn new(seed: usize, seed_area: f64) -> Self {
        Self {
            faces: vec![seed],
            total_area: seed_area,
        }
    }

    /// Adds a face to the group.
    pub fn push(&mut self, face: usize, area: f64) {
        self.faces.push(face);
        self.total_area += area;
    }

    /// The seed face.
    #[must_use]
    pub fn seed(&self) -> usize {
        self.faces[0]
    }

    /// Member faces, seed first, in the order they were admitted.
    #[must_use]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Number of member faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always `false`: a group holds at least its seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Sum of the member face areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// Returns `true` if `face` belongs to the group.
    #[must_use]
    pub fn contains(&self, face: usize) -> bool {
        self.faces.contains(&face)
    }
}
