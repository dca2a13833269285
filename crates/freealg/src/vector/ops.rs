//! Linear structure: addition, subtraction, negation and scalar
//! multiplication on owned values and references.
//!
//! Binary operations keep the larger of the two dense segments, so adding a
//! sparse vector to a dense one never allocates a new buffer when the left
//! operand is owned.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::GradedVector;
use crate::basis::Basis;
use crate::scalar::Scalar;

impl<B: Basis, S: Scalar> AddAssign<&GradedVector<B, S>> for GradedVector<B, S> {
    fn add_assign(&mut self, rhs: &GradedVector<B, S>) {
        debug_assert_eq!(self.basis.dimension(), rhs.basis.dimension());
        self.accumulate(rhs, |x, y| *x += y.clone());
    }
}

impl<B: Basis, S: Scalar> SubAssign<&GradedVector<B, S>> for GradedVector<B, S> {
    fn sub_assign(&mut self, rhs: &GradedVector<B, S>) {
        debug_assert_eq!(self.basis.dimension(), rhs.basis.dimension());
        self.accumulate(rhs, |x, y| *x -= y.clone());
    }
}

impl<B: Basis, S: Scalar> AddAssign for GradedVector<B, S> {
    fn add_assign(&mut self, rhs: GradedVector<B, S>) {
        *self += &rhs;
    }
}

impl<B: Basis, S: Scalar> SubAssign for GradedVector<B, S> {
    fn sub_assign(&mut self, rhs: GradedVector<B, S>) {
        *self -= &rhs;
    }
}

impl<B: Basis, S: Scalar> MulAssign<S> for GradedVector<B, S> {
    fn mul_assign(&mut self, rhs: S) {
        if rhs.is_zero() {
            self.clear();
            return;
        }
        self.map_in_place(|x| *x *= rhs.clone());
    }
}

impl<B: Basis, S: Scalar> DivAssign<S> for GradedVector<B, S> {
    fn div_assign(&mut self, rhs: S) {
        self.map_in_place(|x| *x /= rhs.clone());
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $assign:tt) => {
        impl<B: Basis, S: Scalar> $trait<&GradedVector<B, S>> for &GradedVector<B, S> {
            type Output = GradedVector<B, S>;

            fn $method(self, rhs: &GradedVector<B, S>) -> GradedVector<B, S> {
                let mut out = self.clone();
                out $assign rhs;
                out
            }
        }

        impl<B: Basis, S: Scalar> $trait<&GradedVector<B, S>> for GradedVector<B, S> {
            type Output = GradedVector<B, S>;

            fn $method(mut self, rhs: &GradedVector<B, S>) -> GradedVector<B, S> {
                self $assign rhs;
                self
            }
        }

        impl<B: Basis, S: Scalar> $trait for GradedVector<B, S> {
            type Output = GradedVector<B, S>;

            fn $method(mut self, rhs: GradedVector<B, S>) -> GradedVector<B, S> {
                self $assign &rhs;
                self
            }
        }
    };
}

binary_op!(Add, add, +=);
binary_op!(Sub, sub, -=);

macro_rules! scalar_op {
    ($trait:ident, $method:ident, $assign:tt) => {
        impl<B: Basis, S: Scalar> $trait<S> for &GradedVector<B, S> {
            type Output = GradedVector<B, S>;

            fn $method(self, rhs: S) -> GradedVector<B, S> {
                let mut out = self.clone();
                out $assign rhs;
                out
            }
        }

        impl<B: Basis, S: Scalar> $trait<S> for GradedVector<B, S> {
            type Output = GradedVector<B, S>;

            fn $method(mut self, rhs: S) -> GradedVector<B, S> {
                self $assign rhs;
                self
            }
        }
    };
}

scalar_op!(Mul, mul, *=);
scalar_op!(Div, div, /=);

impl<B: Basis, S: Scalar> Neg for GradedVector<B, S> {
    type Output = GradedVector<B, S>;

    fn neg(mut self) -> GradedVector<B, S> {
        self.map_in_place(|x| *x = -x.clone());
        self
    }
}

impl<B: Basis, S: Scalar> Neg for &GradedVector<B, S> {
    type Output = GradedVector<B, S>;

    fn neg(self) -> GradedVector<B, S> {
        -self.clone()
    }
}
