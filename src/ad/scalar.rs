//! The [`Scalar`] trait for writing problem functions once and evaluating them
//! with plain `f64`, `Dual<f64>` or `Reverse<f64>`.
//!
//! `Scalar` extends `num_traits::Float`, so the whole elementary set
//! (`atan2`, `hypot`, `log10`, `max`, `epsilon`, ...) is available in generic code.

use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Sub};

use num_traits::{FloatConst, FromPrimitive};

use super::dual::Dual;
use super::reverse::Reverse;

/// Numeric type an objective or constraint function is generic over.
///
/// ```
/// use nlpmodels::ad::Scalar;
///
/// fn rosenbrock<T: Scalar>(x: &[T]) -> T {
///     let t1 = T::one() - x[0];
///     let t2 = x[1] - x[0] * x[0];
///     t1 * t1 + t2 * t2 * 100.0
/// }
///
/// fn bearing<T: Scalar>(x: &[T]) -> T {
///     x[1].atan2(x[0]).max(T::zero()) + x[0].hypot(x[1])
/// }
///
/// assert_eq!(rosenbrock(&[1.0, 1.0]), 0.0);
/// assert_eq!(bearing(&[3.0, 4.0]), 4.0_f64.atan2(3.0) + 5.0);
/// ```
pub trait Scalar:
    num_traits::Float
    + FloatConst
    + FromPrimitive
    + Copy
    + Default
    + Debug
    + Display
    + Send
    + 'static
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Lift a plain value (zero derivative).
    fn from_f(val: f64) -> Self;

    /// Primal value.
    fn value(&self) -> f64;
}

impl Scalar for f64 {
    #[inline]
    fn from_f(val: f64) -> Self {
        val
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }
}

impl Scalar for Dual<f64> {
    #[inline]
    fn from_f(val: f64) -> Self {
        Dual::constant(val)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.re
    }
}

impl Scalar for Reverse<f64> {
    #[inline]
    fn from_f(val: f64) -> Self {
        Reverse::constant(val)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.value
    }
}
