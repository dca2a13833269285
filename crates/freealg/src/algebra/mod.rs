//! Multiplication engine.
//!
//! A basis that knows how to multiply its keys implements [`ProductBasis`];
//! every algebra operation on [`GradedVector`] is then derived from the one
//! fused kernel [`ProductBasis::multiply_into`]:
//!
//! | Operation          | Meaning                  |
//! |--------------------|--------------------------|
//! | `&a * &b`          | product                  |
//! | `a *= &b`          | `a = a * b`              |
//! | `a.commutator(&b)` | `a * b - b * a`          |
//! | `a.add_mul(&b, &c)`| `a += b * c`             |
//! | `a.sub_mul(&b, &c)`| `a -= b * c`             |
//! | `a.mul_scal_prod(&b, &s)` | `a = a * b * s`   |
//! | `a.mul_scal_div(&b, &s)`  | `a = a * b / s`   |
//!
//! Products are truncated at the basis depth: terms of larger degree are
//! dropped silently.

mod lie;
mod tensor;

use core::ops::{Mul, MulAssign};
use std::rc::Rc;

use crate::basis::{Basis, LieBasis, TensorBasis};
use crate::scalar::Scalar;
use crate::vector::GradedVector;

/// Element of the truncated free tensor algebra.
pub type FreeTensor<S> = GradedVector<TensorBasis, S>;

/// Element of the truncated free Lie algebra.
pub type Lie<S> = GradedVector<LieBasis, S>;

/// A basis with a bilinear product of its keys.
pub trait ProductBasis: Basis + Sized {
    /// `out += f(lhs * rhs)`, with `f` applied to each elementary product
    /// `lhs[a] * rhs[b]` before accumulation.
    ///
    /// `out` may already hold entries; its dense segment may grow.
    fn multiply_into<S, F>(
        &self,
        out: &mut GradedVector<Self, S>,
        lhs: &GradedVector<Self, S>,
        rhs: &GradedVector<Self, S>,
        f: F,
    ) where
        S: Scalar,
        F: Fn(S) -> S;
}

impl<B: ProductBasis, S: Scalar> GradedVector<B, S> {
    /// `self * rhs - rhs * self`.
    pub fn commutator(&self, rhs: &Self) -> Self {
        let mut out = self * rhs;
        out.sub_mul(rhs, self);
        out
    }

    /// `self += lhs * rhs`.
    pub fn add_mul(&mut self, lhs: &Self, rhs: &Self) -> &mut Self {
        let basis = Rc::clone(&self.basis);
        basis.multiply_into(self, lhs, rhs, |x| x);
        self
    }

    /// `self -= lhs * rhs`.
    pub fn sub_mul(&mut self, lhs: &Self, rhs: &Self) -> &mut Self {
        let basis = Rc::clone(&self.basis);
        basis.multiply_into(self, lhs, rhs, |x| -x);
        self
    }

    /// `self = self * rhs * s`.
    pub fn mul_scal_prod(&mut self, rhs: &Self, s: &S) -> &mut Self {
        let mut out = Self::new(&self.basis);
        self.basis
            .multiply_into(&mut out, self, rhs, |x| x * s.clone());
        *self = out;
        self
    }

    /// `self = self * rhs / s`.
    pub fn mul_scal_div(&mut self, rhs: &Self, s: &S) -> &mut Self {
        let mut out = Self::new(&self.basis);
        self.basis
            .multiply_into(&mut out, self, rhs, |x| x / s.clone());
        *self = out;
        self
    }
}

impl<B: ProductBasis, S: Scalar> Mul<&GradedVector<B, S>> for &GradedVector<B, S> {
    type Output = GradedVector<B, S>;

    fn mul(self, rhs: &GradedVector<B, S>) -> GradedVector<B, S> {
        let mut out = GradedVector::new(&self.basis);
        self.basis.multiply_into(&mut out, self, rhs, |x| x);
        out
    }
}

impl<B: ProductBasis, S: Scalar> Mul<&GradedVector<B, S>> for GradedVector<B, S> {
    type Output = GradedVector<B, S>;

    fn mul(self, rhs: &GradedVector<B, S>) -> GradedVector<B, S> {
        &self * rhs
    }
}

impl<B: ProductBasis, S: Scalar> Mul for GradedVector<B, S> {
    type Output = GradedVector<B, S>;

    fn mul(self, rhs: GradedVector<B, S>) -> GradedVector<B, S> {
        &self * &rhs
    }
}

impl<B: ProductBasis, S: Scalar> MulAssign<&GradedVector<B, S>> for GradedVector<B, S> {
    fn mul_assign(&mut self, rhs: &GradedVector<B, S>) {
        *self = &*self * rhs;
    }
}

impl<B: ProductBasis, S: Scalar> MulAssign for GradedVector<B, S> {
    fn mul_assign(&mut self, rhs: GradedVector<B, S>) {
        *self = &*self * &rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::Word;
    use crate::shape::Shape;

    fn basis() -> Rc<TensorBasis> {
        Rc::new(TensorBasis::new(Shape::new(2, 3).unwrap()))
    }

    fn t(b: &Rc<TensorBasis>, terms: &[(&[u8], f64)]) -> FreeTensor<f64> {
        FreeTensor::from_terms(b, terms.iter().map(|(l, c)| (Word::from_letters(l), *c)))
    }

    #[test]
    fn test_commutator_of_letters() {
        let b = basis();
        let x = t(&b, &[(&[1], 1.0)]);
        let y = t(&b, &[(&[2], 1.0)]);
        assert_eq!(x.commutator(&y), t(&b, &[(&[1, 2], 1.0), (&[2, 1], -1.0)]));
        assert!(x.commutator(&x).is_empty());
    }

    #[test]
    fn test_add_and_sub_mul() {
        let b = basis();
        let x = t(&b, &[(&[], 1.0), (&[1], 2.0)]);
        let y = t(&b, &[(&[2], 3.0)]);
        let mut acc = t(&b, &[(&[2], 1.0)]);
        acc.add_mul(&x, &y);
        assert_eq!(acc, t(&b, &[(&[2], 4.0), (&[1, 2], 6.0)]));
        acc.sub_mul(&x, &y);
        assert_eq!(acc, t(&b, &[(&[2], 1.0)]));
    }

    #[test]
    fn test_mul_scal_prod_and_div() {
        let b = basis();
        let y = t(&b, &[(&[2], 1.0)]);
        let mut x = t(&b, &[(&[1], 2.0)]);
        x.mul_scal_prod(&y, &3.0);
        assert_eq!(x, t(&b, &[(&[1, 2], 6.0)]));
        x.mul_scal_div(&y, &4.0);
        assert_eq!(x, t(&b, &[(&[1, 2, 2], 1.5)]));
        // beyond the depth everything is truncated
        x.mul_scal_prod(&y, &1.0);
        assert!(x.is_empty());
    }

    #[test]
    fn test_mul_assign_with_self() {
        let b = basis();
        let mut x = t(&b, &[(&[], 1.0), (&[1], 1.0)]);
        let copy = x.clone();
        x *= &copy;
        assert_eq!(x, t(&b, &[(&[], 1.0), (&[1], 2.0), (&[1, 1], 1.0)]));
        x *= x.clone();
        assert_eq!(x.get(&Word::from_letters(&[1, 1, 1])), 4.0);
    }
}
