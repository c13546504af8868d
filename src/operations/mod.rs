pub mod grouping;
pub mod modification;
pub mod query;
pub mod sampling;

mod random_extrude;

pub use random_extrude::{ExtrudeStatus, RandomExtrude, RandomExtrudeOutput, Selection};
