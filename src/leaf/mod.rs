//! Leaf models: the bottom of every composition.

pub mod autodiff;
pub mod external;

pub use autodiff::{AdModel, NoConstraints, ScalarFunction, VectorFunction};
pub use external::{ExternalModel, NlpBackend};
