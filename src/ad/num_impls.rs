//! `num_traits` implementations for [`Dual`] and [`Reverse`], so both satisfy
//! `num_traits::Float` and generic numeric code accepts them unchanged.
//!
//! Every method forwards to the inherent implementation of the same name;
//! constants are lifted with `constant` and carry no derivative.

use std::num::FpCategory;

use num_traits::{
    Float as NumFloat, FloatConst, FromPrimitive, Num, NumCast, One, ToPrimitive, Zero,
};

use super::dual::Dual;
use super::float::Float;
use super::reverse::Reverse;
use super::tape::TapeThreadLocal;

macro_rules! constants {
    ($ty:ident: $($name:ident),* $(,)?) => {
        $(
            #[inline]
            fn $name() -> Self {
                $ty::constant(F::$name())
            }
        )*
    };
}

macro_rules! forward_unary {
    ($ty:ident: $($name:ident),* $(,)?) => {
        $(
            #[inline]
            fn $name(self) -> Self {
                $ty::$name(self)
            }
        )*
    };
}

macro_rules! forward_binary {
    ($ty:ident: $($name:ident),* $(,)?) => {
        $(
            #[inline]
            fn $name(self, other: Self) -> Self {
                $ty::$name(self, other)
            }
        )*
    };
}

macro_rules! predicates {
    ($val:ident: $($name:ident),* $(,)?) => {
        $(
            #[inline]
            fn $name(self) -> bool {
                self.$val.$name()
            }
        )*
    };
}

macro_rules! impl_num_traits {
    ($ty:ident, $bound:ident, $val:ident) => {
        impl<F: $bound> Zero for $ty<F> {
            #[inline]
            fn zero() -> Self {
                $ty::constant(F::zero())
            }

            #[inline]
            fn is_zero(&self) -> bool {
                self.$val.is_zero()
            }
        }

        impl<F: $bound> One for $ty<F> {
            #[inline]
            fn one() -> Self {
                $ty::constant(F::one())
            }
        }

        impl<F: $bound> Num for $ty<F> {
            type FromStrRadixErr = F::FromStrRadixErr;

            fn from_str_radix(src: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
                F::from_str_radix(src, radix).map($ty::constant)
            }
        }

        impl<F: $bound> FromPrimitive for $ty<F> {
            #[inline]
            fn from_i64(n: i64) -> Option<Self> {
                F::from_i64(n).map($ty::constant)
            }

            #[inline]
            fn from_u64(n: u64) -> Option<Self> {
                F::from_u64(n).map($ty::constant)
            }

            #[inline]
            fn from_f64(n: f64) -> Option<Self> {
                F::from_f64(n).map($ty::constant)
            }
        }

        impl<F: $bound> ToPrimitive for $ty<F> {
            #[inline]
            fn to_i64(&self) -> Option<i64> {
                self.$val.to_i64()
            }

            #[inline]
            fn to_u64(&self) -> Option<u64> {
                self.$val.to_u64()
            }

            #[inline]
            fn to_f64(&self) -> Option<f64> {
                self.$val.to_f64()
            }
        }

        impl<F: $bound> NumCast for $ty<F> {
            #[inline]
            fn from<T: ToPrimitive>(n: T) -> Option<Self> {
                <F as NumCast>::from(n).map($ty::constant)
            }
        }

        impl<F: $bound> FloatConst for $ty<F> {
            constants!($ty: E, FRAC_1_PI, FRAC_1_SQRT_2, FRAC_2_PI, FRAC_2_SQRT_PI,
                FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, FRAC_PI_8, LN_10, LN_2,
                LOG10_E, LOG2_E, PI, SQRT_2, TAU, LOG10_2, LOG2_10);
        }

        impl<F: $bound> NumFloat for $ty<F> {
            constants!($ty: nan, infinity, neg_infinity, neg_zero, min_value,
                min_positive_value, max_value, epsilon);

            predicates!($val: is_nan, is_infinite, is_finite, is_normal, is_sign_positive,
                is_sign_negative);

            #[inline]
            fn classify(self) -> FpCategory {
                self.$val.classify()
            }

            forward_unary!($ty: floor, ceil, round, trunc, fract, abs, signum, recip, sqrt,
                cbrt, exp, exp2, exp_m1, ln, log2, log10, ln_1p, sin, cos, tan, asin, acos,
                atan, sinh, cosh, tanh, asinh, acosh, atanh);

            forward_binary!($ty: powf, log, atan2, hypot, max, min);

            #[inline]
            fn powi(self, n: i32) -> Self {
                $ty::powi(self, n)
            }

            #[inline]
            fn mul_add(self, a: Self, b: Self) -> Self {
                $ty::mul_add(self, a, b)
            }

            #[inline]
            fn sin_cos(self) -> (Self, Self) {
                $ty::sin_cos(self)
            }

            #[inline]
            fn abs_sub(self, other: Self) -> Self {
                if self.$val > other.$val {
                    self - other
                } else {
                    <Self as Zero>::zero()
                }
            }

            #[inline]
            fn integer_decode(self) -> (u64, i16, i8) {
                self.$val.integer_decode()
            }
        }
    };
}

impl_num_traits!(Dual, Float, re);
impl_num_traits!(Reverse, TapeThreadLocal, value);
