//! # nlpmodels
//!
//! Problem representations for nonlinear optimization of the form
//!
//! ```text
//! minimize f(x) + g(x)   subject to   c(x) ∈ S
//! ```
//!
//! with `f` smooth, `g` proximable, `c` differentiable and `S` closed and
//! projectable. Solvers are written once against the [`Model`] trait; models
//! come from a leaf ([`AdModel`] over automatic differentiation, or
//! [`ExternalModel`] over an [`NlpBackend`]) and may be wrapped by any stack
//! of reformulations:
//!
//! - [`SlackModel`]: `c(x) − s = 0` with `s ∈ S` moved into `g`.
//! - [`ProxModel`]: the proximal-point subproblem `(1/2a)‖x − x0‖² + g(x)`.
//! - [`AugLagModel`]: augmented-Lagrangian surrogate for penalties `mu` and
//!   multipliers `y`.
//! - [`FeasibilityModel`]: a scalar infeasibility measure under a choice of
//!   [`Loss`], with optional proximal regularization.
//!
//! ```
//! use nlpmodels::ad::Scalar;
//! use nlpmodels::{AdModel, Model, ProxModel, ScalarFunction};
//!
//! struct SumSquares;
//!
//! impl ScalarFunction for SumSquares {
//!     fn eval<T: Scalar>(&self, x: &[T]) -> T {
//!         x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi)
//!     }
//! }
//!
//! let leaf = AdModel::new(SumSquares, vec![1.0, 2.0]).unwrap();
//! assert_eq!(leaf.nvar(), 2);
//!
//! let mut sub = ProxModel::new(leaf, vec![0.0, 0.0], 0.5).unwrap();
//! assert_eq!(sub.obj(&[1.0, 1.0]).unwrap(), 2.0);
//! assert_eq!(sub.grad_vec(&[1.0, 1.0]).unwrap(), vec![2.0, 2.0]);
//! ```
//!
//! All evaluation is single-threaded and synchronous. Operators take
//! `&mut self` because models keep private scratch buffers.

pub mod ad;
pub mod check;
pub mod counters;
pub mod error;
pub mod leaf;
pub mod linalg;
pub mod meta;
pub mod model;
pub mod reform;
pub mod stats;

pub use counters::Counters;
pub use error::{ModelError, Result};
pub use leaf::{AdModel, ExternalModel, NlpBackend, NoConstraints, ScalarFunction, VectorFunction};
pub use meta::NlpMeta;
pub use model::Model;
pub use reform::{
    AugLagModel, FeasibilityConfig, FeasibilityModel, Loss, ProxModel, SlackModel,
    EUCLID_ZERO_TOL,
};
pub use stats::{SolverStats, SpecificValue, Status};
