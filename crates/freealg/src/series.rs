//! Truncated power series on the free tensor algebra: `exp`, `log` and the
//! multiplicative inverse.
//!
//! All three are evaluated in Horner form, one tensor product per degree.
//! Results carry a fully dense segment since every degree is populated in
//! general.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use freealg::{FreeTensor, Shape, TensorBasis, Word};
//!
//! let basis = Rc::new(TensorBasis::new(Shape::new(2, 3).unwrap()));
//! let x = FreeTensor::from_letter(&basis, 1, 1.0);
//! let e = x.exp();
//! // exp(a) = 1 + a + a^2/2 + a^3/6
//! assert_eq!(e.get(&Word::from_letters(&[1, 1, 1])), 1.0 / 6.0);
//! assert!((&e.log() - &x).norm_linf() < 1e-15);
//! ```

use crate::algebra::{FreeTensor, ProductBasis};
use crate::basis::{Basis, Word};
use crate::error::{AlgebraError, Result};
use crate::scalar::{degree_scalar, Scalar};

impl<S: Scalar> FreeTensor<S> {
    /// `1 + x`, dense to the full depth.
    fn dense_unit_plus(&self, x: &Self, f: impl Fn(S) -> S) -> Self {
        let depth = self.basis.max_degree();
        let mut out = Self::with_depth(&self.basis, depth);
        out.set(Word::EMPTY, S::one());
        self.basis.multiply_into(&mut out, self, x, f);
        out
    }

    /// Tensor exponential `1 + x/1 (1 + x/2 (1 + ... (1 + x/N)))`.
    ///
    /// `exp(0) == 1` exactly; a unit coefficient in `self` is treated as an
    /// ordinary term of the series.
    #[must_use]
    pub fn exp(&self) -> Self {
        let depth = self.basis.max_degree();
        let mut result = Self::with_depth(&self.basis, depth);
        result.set(Word::EMPTY, S::one());
        for k in (1..=depth).rev() {
            let divisor: S = degree_scalar(k);
            result = result.dense_unit_plus(self, |s| s / divisor.clone());
        }
        result
    }

    /// Tensor logarithm `sum_{k=1..N} (-1)^{k+1} x^k / k` with `x` the
    /// non-unit part of `self`.
    ///
    /// An absent unit coefficient is read as 1, so `log(x) == log(1 + x)`
    /// for `x` without unit term and `log(1) == 0`.
    ///
    /// # Panics
    ///
    /// Panics if the unit coefficient is neither 0 nor 1; see
    /// [`FreeTensor::try_log`].
    #[must_use]
    pub fn log(&self) -> Self {
        match self.try_log() {
            Ok(log) => log,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible [`FreeTensor::log`].
    ///
    /// # Errors
    ///
    /// [`AlgebraError::NonUnitLogarithm`] if the unit coefficient is
    /// neither 0 nor 1.
    pub fn try_log(&self) -> Result<Self> {
        let x0 = self.unit_coefficient();
        if !x0.is_zero() && !x0.is_one() {
            return Err(AlgebraError::NonUnitLogarithm);
        }
        let depth = self.basis.max_degree();
        let mut x = self.clone();
        x.erase(&Word::EMPTY);
        let mut result = Self::with_depth(&self.basis, depth);
        for k in (1..=depth).rev() {
            let divisor: S = degree_scalar(k);
            if k % 2 == 1 {
                result.add_scal_div(Word::EMPTY, divisor);
            } else {
                result.sub_scal_div(Word::EMPTY, divisor);
            }
            let mut next = Self::with_depth(&self.basis, depth);
            self.basis.multiply_into(&mut next, &result, &x, |s| s);
            result = next;
        }
        Ok(result)
    }

    /// Multiplicative inverse
    /// `x^{-1} = sum_{k=0..N} (-(x - x0) / x0)^k / x0`, with `x0` the unit
    /// coefficient.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::NonInvertibleUnit`] if the unit coefficient is zero.
    pub fn inverse(&self) -> Result<Self> {
        let x0 = self.unit_coefficient();
        if x0.is_zero() {
            return Err(AlgebraError::NonInvertibleUnit);
        }
        let depth = self.basis.max_degree();
        let mut y = self.clone();
        y.erase(&Word::EMPTY);
        y /= -x0.clone();
        let mut result = Self::with_depth(&self.basis, depth);
        result.set(Word::EMPTY, S::one());
        for _ in 0..depth {
            result = result.dense_unit_plus(&y, |s| s);
        }
        result /= x0;
        Ok(result)
    }
}
