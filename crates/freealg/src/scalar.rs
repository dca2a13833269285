//! Scalar fields the algebras are generic over.
//!
//! The engine only needs field arithmetic, an ordering (for norms and
//! tolerances), zero/one and a way to embed the small integers that appear
//! as Hall structure constants and series divisors. Floating point and exact
//! rational scalars share one implementation of every algorithm.
//!
//! # Example
//!
//! ```
//! use freealg::Scalar;
//! use num_rational::BigRational;
//!
//! let one = <BigRational as Scalar>::from_integer(1);
//! let three = <BigRational as Scalar>::from_integer(3);
//! let third = one.clone() / three.clone();
//! assert_eq!(third.clone() * three, one);
//! assert!((third.approx_f64() - 1.0 / 3.0).abs() < 1e-16);
//! ```

use core::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{NumAssign, Signed, ToPrimitive};

/// A field usable as coefficient type of a graded vector.
pub trait Scalar: Signed + NumAssign + Clone + PartialOrd + fmt::Debug + 'static {
    /// Embeds an integer into the field.
    fn from_integer(n: i64) -> Self;

    /// Nearest `f64`, used for tolerances and cross-precision comparison.
    fn approx_f64(&self) -> f64;
}

macro_rules! float_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn from_integer(n: i64) -> Self {
                n as $t
            }

            #[inline]
            fn approx_f64(&self) -> f64 {
                f64::from(*self)
            }
        }
    )*};
}

float_scalar!(f32, f64);

impl Scalar for BigRational {
    #[inline]
    fn from_integer(n: i64) -> Self {
        BigRational::from_integer(BigInt::from(n))
    }

    fn approx_f64(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

/// `k` as a scalar, for degree and factorial divisors.
#[inline]
pub(crate) fn degree_scalar<S: Scalar>(k: usize) -> S {
    S::from_integer(k as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};

    #[test]
    fn test_float_embedding() {
        assert_eq!(<f64 as Scalar>::from_integer(-3), -3.0);
        assert_eq!(<f32 as Scalar>::from_integer(7), 7.0f32);
        assert_eq!(0.25f32.approx_f64(), 0.25);
    }

    #[test]
    fn test_rational_is_exact() {
        let mut acc = BigRational::zero();
        for k in 1..=6 {
            acc += BigRational::one() / degree_scalar::<BigRational>(k);
        }
        // H_6 = 49/20
        assert_eq!(
            acc,
            BigRational::new(BigInt::from(49), BigInt::from(20))
        );
    }

    #[test]
    fn test_abs_via_signed() {
        assert_eq!(Signed::abs(&-2.5f64), 2.5);
        let r = <BigRational as Scalar>::from_integer(-4);
        assert_eq!(r.abs(), <BigRational as Scalar>::from_integer(4));
    }
}
