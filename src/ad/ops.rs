use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use super::dual::Dual;
use super::float::Float;
use super::reverse::Reverse;
use super::tape::TapeThreadLocal;

// ──────────────────────────────────────────────
//  Dual<F> operators
// ──────────────────────────────────────────────

impl<F: Float> Add for Dual<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl<F: Float> Sub for Dual<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl<F: Float> Mul for Dual<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Dual::new(self.re * rhs.re, self.re * rhs.eps + self.eps * rhs.re)
    }
}

impl<F: Float> Div for Dual<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.re;
        Dual::new(
            self.re * inv,
            (self.eps * rhs.re - self.re * rhs.eps) * inv * inv,
        )
    }
}

impl<F: Float> Neg for Dual<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Dual::new(-self.re, -self.eps)
    }
}

// x % y = x - trunc(x / y)·y, with trunc locally constant.
impl<F: Float> Rem for Dual<F> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        let q = (self.re / rhs.re).trunc();
        Dual::new(self.re % rhs.re, self.eps - q * rhs.eps)
    }
}

// ──────────────────────────────────────────────
//  Reverse<F> operators
// ──────────────────────────────────────────────

impl<F: TapeThreadLocal> Add for Reverse<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.combine(rhs, self.value + rhs.value, F::one(), F::one())
    }
}

impl<F: TapeThreadLocal> Sub for Reverse<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.combine(rhs, self.value - rhs.value, F::one(), -F::one())
    }
}

impl<F: TapeThreadLocal> Mul for Reverse<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.combine(rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl<F: TapeThreadLocal> Div for Reverse<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.value;
        let value = self.value * inv;
        self.combine(rhs, value, inv, -value * inv)
    }
}

impl<F: TapeThreadLocal> Neg for Reverse<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.chain(-self.value, -F::one())
    }
}

impl<F: TapeThreadLocal> Rem for Reverse<F> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        let q = (self.value / rhs.value).trunc();
        self.combine(rhs, self.value % rhs.value, F::one(), -q)
    }
}

macro_rules! impl_assign_ops {
    ($ty:ident, $bound:ident) => {
        impl<F: $bound> AddAssign for $ty<F> {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl<F: $bound> SubAssign for $ty<F> {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl<F: $bound> MulAssign for $ty<F> {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl<F: $bound> DivAssign for $ty<F> {
            #[inline]
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl<F: $bound> RemAssign for $ty<F> {
            #[inline]
            fn rem_assign(&mut self, rhs: Self) {
                *self = *self % rhs;
            }
        }
    };
}

impl_assign_ops!(Dual, Float);
impl_assign_ops!(Reverse, TapeThreadLocal);

// Mixed ops with primitive floats, on either side. A primitive operand is
// lifted to a constant, so Reverse results stay off the tape when the other
// side is a constant too.
macro_rules! impl_mixed_ops {
    ($ty:ident, $f:ty) => {
        impl Add<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn add(self, rhs: $f) -> $ty<$f> {
                self + $ty::constant(rhs)
            }
        }

        impl Add<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn add(self, rhs: $ty<$f>) -> $ty<$f> {
                $ty::constant(self) + rhs
            }
        }

        impl Sub<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn sub(self, rhs: $f) -> $ty<$f> {
                self - $ty::constant(rhs)
            }
        }

        impl Sub<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn sub(self, rhs: $ty<$f>) -> $ty<$f> {
                $ty::constant(self) - rhs
            }
        }

        impl Mul<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn mul(self, rhs: $f) -> $ty<$f> {
                self * $ty::constant(rhs)
            }
        }

        impl Mul<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn mul(self, rhs: $ty<$f>) -> $ty<$f> {
                $ty::constant(self) * rhs
            }
        }

        impl Div<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn div(self, rhs: $f) -> $ty<$f> {
                self / $ty::constant(rhs)
            }
        }

        impl Div<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn div(self, rhs: $ty<$f>) -> $ty<$f> {
                $ty::constant(self) / rhs
            }
        }
    };
}

impl_mixed_ops!(Dual, f64);
impl_mixed_ops!(Reverse, f64);
