pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod topology;

#[cfg(test)]
mod test_meshes;

pub use error::{RandexError, Result};
pub use mesh::{Mesh, RigidTransform};
pub use operations::grouping::SimilarityPolicy;
pub use operations::sampling::ExtrusionParams;
pub use operations::{ExtrudeStatus, RandomExtrude, RandomExtrudeOutput, Selection};
