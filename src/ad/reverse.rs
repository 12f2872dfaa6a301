use std::fmt::{self, Display};

use super::float::Float;
use super::tape::{self, TapeThreadLocal, CONSTANT};

/// Reverse-mode AD variable: a value and its index on the thread-local tape.
///
/// `Copy` because the tape lives in a thread-local, not in the value.
#[derive(Clone, Copy, Debug)]
pub struct Reverse<F: Float> {
    pub(crate) value: F,
    pub(crate) index: u32,
}

impl<F: Float> Reverse<F> {
    /// A constant, not tracked on the tape.
    #[inline]
    pub fn constant(value: F) -> Self {
        Reverse {
            value,
            index: CONSTANT,
        }
    }

    #[inline]
    pub(crate) fn from_tape(value: F, index: u32) -> Self {
        Reverse { value, index }
    }

    /// Primal value.
    #[inline]
    pub fn value(&self) -> F {
        self.value
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.index == CONSTANT
    }
}

impl<F: Float + TapeThreadLocal> Reverse<F> {
    /// Record `value = f(self)` with `deriv = f'(self)`. Constants stay off the tape.
    #[inline]
    pub(crate) fn chain(self, value: F, deriv: F) -> Self {
        if self.is_constant() {
            return Reverse::constant(value);
        }
        let index = tape::with_active_tape(|t| t.push_unary(self.index, deriv));
        Reverse { value, index }
    }

    /// Record a binary result with partials `dl` and `dr`.
    #[inline]
    pub(crate) fn combine(self, rhs: Self, value: F, dl: F, dr: F) -> Self {
        if self.is_constant() && rhs.is_constant() {
            return Reverse::constant(value);
        }
        let index = tape::with_active_tape(|t| t.push_binary(self.index, dl, rhs.index, dr));
        Reverse { value, index }
    }

    #[inline]
    pub fn recip(self) -> Self {
        let inv = F::one() / self.value;
        self.chain(inv, -inv * inv)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        let s = self.value.sqrt();
        self.chain(s, F::one() / (s + s))
    }

    #[inline]
    pub fn cbrt(self) -> Self {
        let c = self.value.cbrt();
        self.chain(c, F::one() / ((c + c + c) * c))
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Reverse::constant(F::one());
        }
        let deriv = F::from(n).unwrap_or_else(F::zero) * self.value.powi(n - 1);
        self.chain(self.value.powi(n), deriv)
    }

    /// `self^n` with both operands differentiable.
    #[inline]
    pub fn powf(self, n: Self) -> Self {
        let val = self.value.powf(n.value);
        let dx = n.value * self.value.powf(n.value - F::one());
        if n.is_constant() {
            return self.chain(val, dx);
        }
        self.combine(n, val, dx, val * self.value.ln())
    }

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.value.exp();
        self.chain(e, e)
    }

    #[inline]
    pub fn exp2(self) -> Self {
        let e = self.value.exp2();
        self.chain(e, e * F::LN_2())
    }

    #[inline]
    pub fn exp_m1(self) -> Self {
        self.chain(self.value.exp_m1(), self.value.exp())
    }

    #[inline]
    pub fn ln(self) -> Self {
        self.chain(self.value.ln(), F::one() / self.value)
    }

    #[inline]
    pub fn log2(self) -> Self {
        self.chain(self.value.log2(), F::one() / (self.value * F::LN_2()))
    }

    #[inline]
    pub fn log10(self) -> Self {
        self.chain(self.value.log10(), F::one() / (self.value * F::LN_10()))
    }

    #[inline]
    pub fn ln_1p(self) -> Self {
        self.chain(self.value.ln_1p(), F::one() / (F::one() + self.value))
    }

    #[inline]
    pub fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    #[inline]
    pub fn sin(self) -> Self {
        self.chain(self.value.sin(), self.value.cos())
    }

    #[inline]
    pub fn cos(self) -> Self {
        self.chain(self.value.cos(), -self.value.sin())
    }

    #[inline]
    pub fn tan(self) -> Self {
        let c = self.value.cos();
        self.chain(self.value.tan(), F::one() / (c * c))
    }

    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.value.sin_cos();
        (self.chain(s, c), self.chain(c, -s))
    }

    #[inline]
    pub fn asin(self) -> Self {
        let d = (F::one() - self.value * self.value).sqrt();
        self.chain(self.value.asin(), F::one() / d)
    }

    #[inline]
    pub fn acos(self) -> Self {
        let d = (F::one() - self.value * self.value).sqrt();
        self.chain(self.value.acos(), -F::one() / d)
    }

    #[inline]
    pub fn atan(self) -> Self {
        let x = self.value;
        self.chain(x.atan(), F::one() / (F::one() + x * x))
    }

    /// Four-quadrant arctangent of `self / other`.
    #[inline]
    pub fn atan2(self, other: Self) -> Self {
        let (y, x) = (self.value, other.value);
        let denom = y * y + x * x;
        self.combine(other, y.atan2(x), x / denom, -y / denom)
    }

    #[inline]
    pub fn sinh(self) -> Self {
        self.chain(self.value.sinh(), self.value.cosh())
    }

    #[inline]
    pub fn cosh(self) -> Self {
        self.chain(self.value.cosh(), self.value.sinh())
    }

    #[inline]
    pub fn tanh(self) -> Self {
        let t = self.value.tanh();
        self.chain(t, F::one() - t * t)
    }

    #[inline]
    pub fn asinh(self) -> Self {
        let d = (self.value * self.value + F::one()).sqrt();
        self.chain(self.value.asinh(), F::one() / d)
    }

    #[inline]
    pub fn acosh(self) -> Self {
        let d = (self.value * self.value - F::one()).sqrt();
        self.chain(self.value.acosh(), F::one() / d)
    }

    #[inline]
    pub fn atanh(self) -> Self {
        let x = self.value;
        self.chain(x.atanh(), F::one() / (F::one() - x * x))
    }

    #[inline]
    pub fn abs(self) -> Self {
        self.chain(self.value.abs(), self.value.signum())
    }

    // Piecewise constant, so the results leave the tape.

    #[inline]
    pub fn signum(self) -> Self {
        Reverse::constant(self.value.signum())
    }

    #[inline]
    pub fn floor(self) -> Self {
        Reverse::constant(self.value.floor())
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Reverse::constant(self.value.ceil())
    }

    #[inline]
    pub fn round(self) -> Self {
        Reverse::constant(self.value.round())
    }

    #[inline]
    pub fn trunc(self) -> Self {
        Reverse::constant(self.value.trunc())
    }

    #[inline]
    pub fn fract(self) -> Self {
        self.chain(self.value.fract(), F::one())
    }

    #[inline]
    pub fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }

    /// `sqrt(self² + other²)` without intermediate overflow.
    #[inline]
    pub fn hypot(self, other: Self) -> Self {
        let h = self.value.hypot(other.value);
        if h == F::zero() {
            return Reverse::constant(h);
        }
        self.combine(other, h, self.value / h, other.value / h)
    }

    /// Larger operand; ties take `self`. The result is the chosen operand
    /// itself, so no statement is recorded.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.value >= other.value || other.value.is_nan() {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.value <= other.value || other.value.is_nan() {
            self
        } else {
            other
        }
    }
}

impl<F: Float> Display for Reverse<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<F: Float> Default for Reverse<F> {
    fn default() -> Self {
        Reverse::constant(F::zero())
    }
}

impl<F: Float> PartialEq for Reverse<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F: Float> PartialOrd for Reverse<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}
