use std::fmt::{self, Display};

use super::float::Float;

/// Forward-mode dual number: a value paired with its tangent.
///
/// `Dual { re, eps }` represents `re + eps·ε` where `ε² = 0`. Seeding the inputs
/// with a direction `v` makes every output carry `J·v` in its `eps` slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dual<F: Float> {
    /// Primal value.
    pub re: F,
    /// Tangent value.
    pub eps: F,
}

impl<F: Float> Display for Dual<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.re, self.eps)
    }
}

// Comparisons look at the primal value only, so branches in user code
// follow the same path as the plain-float evaluation.
impl<F: Float> PartialEq for Dual<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re
    }
}

impl<F: Float> PartialOrd for Dual<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.re.partial_cmp(&other.re)
    }
}

impl<F: Float> Dual<F> {
    #[inline]
    pub fn new(re: F, eps: F) -> Self {
        Dual { re, eps }
    }

    /// A constant (zero tangent).
    #[inline]
    pub fn constant(re: F) -> Self {
        Dual { re, eps: F::zero() }
    }

    /// A variable seeded with unit tangent.
    #[inline]
    pub fn variable(re: F) -> Self {
        Dual { re, eps: F::one() }
    }

    /// Chain rule: given `f(re)` and `f'(re)`, produce the dual result.
    #[inline]
    fn chain(self, f_val: F, f_deriv: F) -> Self {
        Dual {
            re: f_val,
            eps: self.eps * f_deriv,
        }
    }

    // ── Powers ──

    #[inline]
    pub fn recip(self) -> Self {
        let inv = F::one() / self.re;
        self.chain(inv, -inv * inv)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, F::one() / (s + s))
    }

    #[inline]
    pub fn cbrt(self) -> Self {
        let c = self.re.cbrt();
        self.chain(c, F::one() / ((c + c + c) * c))
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Dual::constant(F::one());
        }
        let deriv = F::from(n).unwrap_or_else(F::zero) * self.re.powi(n - 1);
        self.chain(self.re.powi(n), deriv)
    }

    /// `self^n` with both operands differentiable.
    #[inline]
    pub fn powf(self, n: Self) -> Self {
        let val = self.re.powf(n.re);
        let dx = n.re * self.re.powf(n.re - F::one());
        // Skip the exponent term when it carries no tangent so that x^c stays
        // finite at x <= 0.
        let dn = if n.eps == F::zero() {
            F::zero()
        } else {
            val * self.re.ln() * n.eps
        };
        Dual::new(val, self.eps * dx + dn)
    }

    // ── Exp/Log ──

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    #[inline]
    pub fn exp2(self) -> Self {
        let e = self.re.exp2();
        self.chain(e, e * F::LN_2())
    }

    #[inline]
    pub fn exp_m1(self) -> Self {
        self.chain(self.re.exp_m1(), self.re.exp())
    }

    #[inline]
    pub fn ln(self) -> Self {
        self.chain(self.re.ln(), F::one() / self.re)
    }

    #[inline]
    pub fn log2(self) -> Self {
        self.chain(self.re.log2(), F::one() / (self.re * F::LN_2()))
    }

    #[inline]
    pub fn log10(self) -> Self {
        self.chain(self.re.log10(), F::one() / (self.re * F::LN_10()))
    }

    #[inline]
    pub fn ln_1p(self) -> Self {
        self.chain(self.re.ln_1p(), F::one() / (F::one() + self.re))
    }

    #[inline]
    pub fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    // ── Trig ──

    #[inline]
    pub fn sin(self) -> Self {
        self.chain(self.re.sin(), self.re.cos())
    }

    #[inline]
    pub fn cos(self) -> Self {
        self.chain(self.re.cos(), -self.re.sin())
    }

    #[inline]
    pub fn tan(self) -> Self {
        let c = self.re.cos();
        self.chain(self.re.tan(), F::one() / (c * c))
    }

    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.re.sin_cos();
        (self.chain(s, c), self.chain(c, -s))
    }

    #[inline]
    pub fn asin(self) -> Self {
        let d = (F::one() - self.re * self.re).sqrt();
        self.chain(self.re.asin(), F::one() / d)
    }

    #[inline]
    pub fn acos(self) -> Self {
        let d = (F::one() - self.re * self.re).sqrt();
        self.chain(self.re.acos(), -F::one() / d)
    }

    #[inline]
    pub fn atan(self) -> Self {
        self.chain(self.re.atan(), F::one() / (F::one() + self.re * self.re))
    }

    /// Four-quadrant arctangent of `self / other`.
    #[inline]
    pub fn atan2(self, other: Self) -> Self {
        let denom = self.re * self.re + other.re * other.re;
        Dual::new(
            self.re.atan2(other.re),
            (other.re * self.eps - self.re * other.eps) / denom,
        )
    }

    // ── Hyperbolic ──

    #[inline]
    pub fn sinh(self) -> Self {
        self.chain(self.re.sinh(), self.re.cosh())
    }

    #[inline]
    pub fn cosh(self) -> Self {
        self.chain(self.re.cosh(), self.re.sinh())
    }

    #[inline]
    pub fn tanh(self) -> Self {
        let t = self.re.tanh();
        self.chain(t, F::one() - t * t)
    }

    #[inline]
    pub fn asinh(self) -> Self {
        let d = (self.re * self.re + F::one()).sqrt();
        self.chain(self.re.asinh(), F::one() / d)
    }

    #[inline]
    pub fn acosh(self) -> Self {
        let d = (self.re * self.re - F::one()).sqrt();
        self.chain(self.re.acosh(), F::one() / d)
    }

    #[inline]
    pub fn atanh(self) -> Self {
        self.chain(self.re.atanh(), F::one() / (F::one() - self.re * self.re))
    }

    // ── Misc ──

    #[inline]
    pub fn abs(self) -> Self {
        self.chain(self.re.abs(), self.re.signum())
    }

    /// Piecewise constant: zero tangent. The same holds for the rounding functions.
    #[inline]
    pub fn signum(self) -> Self {
        Dual::constant(self.re.signum())
    }

    #[inline]
    pub fn floor(self) -> Self {
        Dual::constant(self.re.floor())
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Dual::constant(self.re.ceil())
    }

    #[inline]
    pub fn round(self) -> Self {
        Dual::constant(self.re.round())
    }

    #[inline]
    pub fn trunc(self) -> Self {
        Dual::constant(self.re.trunc())
    }

    #[inline]
    pub fn fract(self) -> Self {
        self.chain(self.re.fract(), F::one())
    }

    /// `self * a + b` with a single rounding in the primal.
    #[inline]
    pub fn mul_add(self, a: Self, b: Self) -> Self {
        Dual::new(
            self.re.mul_add(a.re, b.re),
            self.eps * a.re + self.re * a.eps + b.eps,
        )
    }

    /// `sqrt(self² + other²)` without intermediate overflow.
    #[inline]
    pub fn hypot(self, other: Self) -> Self {
        let h = self.re.hypot(other.re);
        if h == F::zero() {
            return Dual::constant(h);
        }
        Dual::new(h, (self.re / h) * self.eps + (other.re / h) * other.eps)
    }

    /// Larger operand; ties take `self`, derivative included.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.re >= other.re || other.re.is_nan() {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.re <= other.re || other.re.is_nan() {
            self
        } else {
            other
        }
    }
}
