use std::f64::consts::PI;

use rand::distr::{Distribution, Uniform};
use rand::Rng;

use super::{ExtrusionParams, GroupSample, DEFAULT_THICKNESS_RANGE, OFFSET_FACTOR_RANGE};
use crate::error::{OperationError, Result};
use crate::math::Vector3;
use crate::operations::grouping::FaceGroup;

/// Samples the extrusion amount and optional inset offset of a group.
pub struct GroupExtruder<'a> {
    params: &'a ExtrusionParams,
}

impl<'a> GroupExtruder<'a> {
    /// Creates a sampler for the given parameters.
    #[must_use]
    pub fn new(params: &'a ExtrusionParams) -> Self {
        Self { params }
    }

    /// Draws the parameters for `group`.
    ///
    /// The amount comes from the configured thickness range, bounds in either
    /// order (or [`DEFAULT_THICKNESS_RANGE`]), and is applied along
    /// `seed_normal`. With
    /// offsets enabled the inset is a random fraction of
    /// `sqrt(total_area / face_count) / PI`, a stand-in for the radius of one
    /// member face, which keeps the inset inside the face.
    ///
    /// # Errors
    ///
    /// Returns an error if the thickness range is non-finite or too wide to
    /// sample.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        group: &FaceGroup,
        seed_normal: &Vector3,
        rng: &mut R,
    ) -> Result<GroupSample> {
        self.params.validate()?;

        let amount = match self.params.thickness_bounds() {
            Some((lo, hi)) => Uniform::new_inclusive(lo, hi)
                .map_err(|e| OperationError::InvalidInput(format!("thickness range: {e}")))?
                .sample(rng),
            None => rng.random_range(DEFAULT_THICKNESS_RANGE.0..DEFAULT_THICKNESS_RANGE.1),
        };

        let (offset, offset_max) = if self.params.use_offset {
            #[allow(clippy::cast_precision_loss)]
            let offset_max = (group.total_area() / group.len() as f64).sqrt() / PI;
            let factor = rng.random_range(OFFSET_FACTOR_RANGE.0..OFFSET_FACTOR_RANGE.1);
            (Some(factor * offset_max), Some(offset_max))
        } else {
            (None, None)
        };

        Ok(GroupSample {
            amount,
            translation: seed_normal * amount,
            offset,
            offset_max,
        })
    }
}
