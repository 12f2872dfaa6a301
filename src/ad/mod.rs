//! Compact automatic differentiation used by [`crate::AdModel`].
//!
//! Problem functions are written once against [`Scalar`] and evaluated with
//! `f64` for values, [`Dual`] for Jacobian-vector products and [`Reverse`]
//! for gradients and vector-Jacobian products.

mod api;
mod dual;
mod float;
mod num_impls;
mod ops;
mod reverse;
mod scalar;
mod tape;

pub use api::{grad, jvp, vjp};
pub use dual::Dual;
pub use float::Float;
pub use reverse::Reverse;
pub use scalar::Scalar;
pub use tape::{Tape, TapeGuard, TapeThreadLocal, CONSTANT};

/// Forward-mode dual number over `f64`.
pub type Dual64 = Dual<f64>;
/// Reverse-mode variable over `f64`.
pub type Reverse64 = Reverse<f64>;
