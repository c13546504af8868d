mod extrude_face;
mod fuse;
mod topology_editor;

pub use extrude_face::{ExtrudeFace, ExtrudeReport};
pub use fuse::{FuseFaces, FuseReport};
pub use topology_editor::TopologyEditor;

use crate::math::Vector3;

/// One entry of the edit log produced while extruding groups.
///
/// Vertex and face numbers refer to the input mesh; fusing edges always join
/// two input vertices because a group's faces are untouched until the group is
/// processed.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyEdit {
    /// An interior edge of a group was deleted, merging its two faces.
    DeleteEdge {
        /// Index of the group in processing order.
        group: usize,
        /// Input vertex indices of the edge, smaller first.
        edge: (usize, usize),
    },
    /// A fusing edge was already gone or no longer separated two group faces.
    SkipStaleEdge {
        /// Index of the group in processing order.
        group: usize,
        /// Input vertex indices of the edge, smaller first.
        edge: (usize, usize),
    },
    /// A (possibly fused) face was extruded.
    Extrude {
        /// Index of the group in processing order.
        group: usize,
        /// Input faces that make up the extruded polygon.
        faces: Vec<usize>,
        /// Translation applied to the cap.
        translation: Vector3,
        /// Inset applied to the cap boundary, if any.
        offset: Option<f64>,
        /// Number of wall faces created.
        walls: usize,
    },
}
