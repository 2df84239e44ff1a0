pub mod algebra;
pub mod traits;

mod augmented_lct;
mod error;

pub use augmented_lct::{AugmentedLinkCutTree, MonoidLinkCutTree};
pub use error::LinkCutError;

pub use traits::{DynamicForest, PathOps, SubtreeOps, VertexOps};
