//! Training and inference pipelines built on the dataset and ml modules.

pub mod artifact;
pub mod inference;
pub mod trainer;

pub use artifact::*;
pub use inference::*;
pub use trainer::*;
