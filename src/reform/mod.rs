//! Reformulations: models built from another model.
//!
//! Each wrapper owns its base (or borrows it through `&mut M`), derives its
//! own [`crate::NlpMeta`] and implements [`crate::Model`] in terms of the
//! base's operators, so wrappers stack to any depth.

pub mod auglag;
pub mod feasibility;
pub mod proximal;
pub mod slack;

pub use auglag::AugLagModel;
pub use feasibility::{FeasibilityConfig, FeasibilityModel, Loss, EUCLID_ZERO_TOL};
pub use proximal::ProxModel;
pub use slack::SlackModel;
