mod group_extruder;

pub use group_extruder::GroupExtruder;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::Vector3;
use crate::operations::grouping::{SimilarityPolicy, DEFAULT_MAX_FACES_PER_GROUP};

/// Extrusion amount range used when no thickness range is configured.
pub const DEFAULT_THICKNESS_RANGE: (f64, f64) = (0.0, 0.1);

/// Range of the random factor applied to a group's maximum inset offset.
pub const OFFSET_FACTOR_RANGE: (f64, f64) = (0.1, 0.9);

/// Parameters controlling grouping and extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionParams {
    /// Inclusive range of extrusion amounts, bounds in either order. `None`
    /// samples from [`DEFAULT_THICKNESS_RANGE`].
    pub thickness_range: Option<(f64, f64)>,
    /// Inset each extruded cap by a random offset.
    pub use_offset: bool,
    /// Upper bound on faces per group; values below 1 act as 1.
    pub max_faces_per_group: usize,
    /// Normal-similarity test used while growing groups.
    pub similarity: SimilarityPolicy,
    /// Optional `(min, max)` number of adjacency rings a group may grow.
    pub traverse_rings: Option<(usize, usize)>,
}

impl Default for ExtrusionParams {
    fn default() -> Self {
        Self {
            thickness_range: None,
            use_offset: false,
            max_faces_per_group: DEFAULT_MAX_FACES_PER_GROUP,
            similarity: SimilarityPolicy::Positive,
            traverse_rings: None,
        }
    }
}

impl ExtrusionParams {
    /// Sets the extrusion amount range. The bounds may be given in either
    /// order.
    #[must_use]
    pub fn with_thickness_range(mut self, min: f64, max: f64) -> Self {
        self.thickness_range = Some((min, max));
        self
    }

    /// Enables or disables the inset offset.
    #[must_use]
    pub fn with_offset(mut self, use_offset: bool) -> Self {
        self.use_offset = use_offset;
        self
    }

    /// Sets the maximum number of faces per group.
    #[must_use]
    pub fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces_per_group = max_faces;
        self
    }

    /// Sets the normal-similarity policy.
    #[must_use]
    pub fn with_similarity(mut self, similarity: SimilarityPolicy) -> Self {
        self.similarity = similarity;
        self
    }

    /// Limits group growth to a random number of rings in `[min, max]`.
    #[must_use]
    pub fn with_traverse_rings(mut self, min: usize, max: usize) -> Self {
        self.traverse_rings = Some((min, max));
        self
    }

    /// The thickness range with its bounds ordered low to high.
    #[must_use]
    pub fn thickness_bounds(&self) -> Option<(f64, f64)> {
        self.thickness_range.map(|(a, b)| (a.min(b), a.max(b)))
    }

    /// Checks that the thickness range can be sampled.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite bound and
    /// [`OperationError::InvalidInput`] if the span between the bounds
    /// overflows.
    pub fn validate(&self) -> Result<()> {
        if let Some((a, b)) = self.thickness_range {
            if !a.is_finite() || !b.is_finite() {
                return Err(GeometryError::NonFinite("thickness range").into());
            }
            let (lo, hi) = (a.min(b), a.max(b));
            if !(hi - lo).is_finite() {
                return Err(OperationError::InvalidInput(format!(
                    "thickness range [{lo}, {hi}] is too wide to sample"
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Extrusion parameters sampled for one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSample {
    /// Signed extrusion distance along the representative normal.
    pub amount: f64,
    /// `amount` times the seed face's unit normal.
    pub translation: Vector3,
    /// Inset distance of the cap, when offsets are enabled.
    pub offset: Option<f64>,
    /// Upper bound the offset was scaled from.
    pub offset_max: Option<f64>,
}
