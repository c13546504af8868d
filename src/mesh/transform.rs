use crate::math::{Point3, UnitQuaternion, Vector3};

/// Placement of a mesh in its parent space: scale, then rotate, then translate.
///
/// Random extrusion only edits local geometry, so the transform of the input
/// mesh is carried to the output untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Translation applied last.
    pub translation: Vector3,
    /// Orientation.
    pub rotation: UnitQuaternion,
    /// Per-axis scale applied first.
    pub scale: Vector3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Creates a transform from its three components.
    #[must_use]
    pub fn new(translation: Vector3, rotation: UnitQuaternion, scale: Vector3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Returns `true` if applying this transform leaves every point in place.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Maps a local-space point into parent space.
    #[must_use]
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let scaled = Point3::new(
            point.x * self.scale.x,
            point.y * self.scale.y,
            point.z * self.scale.z,
        );
        self.rotation * scaled + self.translation
    }
}
