//! Concatenation product of the free tensor algebra.
//!
//! The product is computed one degree block at a time. For a pair of
//! degrees `(da, db)` with `da + db <= N`, word `i` of degree `da` times word
//! `j` of degree `db` is word `i * W^db + j` of degree `da + db`, so when all
//! three blocks are dense the kernel is a plain index-offset outer product:
//!
//! ```text
//! out[so + i * W^db + j] += a[sa + i] * b[sb + j]
//! ```
//!
//! Blocks that live (even partly) in a sparse segment fall back to
//! iterating entries of the two degrees and concatenating keys.

use std::rc::Rc;

use super::{FreeTensor, ProductBasis};
use crate::basis::{Basis, TensorBasis, Word};
use crate::scalar::Scalar;
use crate::shape::Letter;
use crate::vector::GradedVector;

impl ProductBasis for TensorBasis {
    fn multiply_into<S, F>(
        &self,
        out: &mut GradedVector<Self, S>,
        lhs: &GradedVector<Self, S>,
        rhs: &GradedVector<Self, S>,
        f: F,
    ) where
        S: Scalar,
        F: Fn(S) -> S,
    {
        let depth = self.max_degree();
        if let (Some(a), Some(b)) = (lhs.dense_depth(), rhs.dense_depth()) {
            out.maybe_resize((a + b).min(depth));
        }
        let lhs_degree = lhs.degree().min(depth);
        let rhs_degree = rhs.degree();
        for da in 0..=lhs_degree {
            for db in 0..=rhs_degree.min(depth - da) {
                self.multiply_block(out, lhs, rhs, da, db, &f);
            }
        }
    }
}

impl TensorBasis {
    fn multiply_block<S, F>(
        &self,
        out: &mut GradedVector<Self, S>,
        lhs: &GradedVector<Self, S>,
        rhs: &GradedVector<Self, S>,
        da: usize,
        db: usize,
        f: &F,
    ) where
        S: Scalar,
        F: Fn(S) -> S,
    {
        let (sa, ea) = (self.start_of_degree(da), self.start_of_degree(da + 1));
        let (sb, eb) = (self.start_of_degree(db), self.start_of_degree(db + 1));
        let so = self.start_of_degree(da + db);
        let eo = self.start_of_degree(da + db + 1);

        if ea <= lhs.dense.len() && eb <= rhs.dense.len() && eo <= out.dense.len() {
            let stride = self.power(db);
            let b = &rhs.dense[sb..eb];
            for (i, x) in lhs.dense[sa..ea].iter().enumerate() {
                if x.is_zero() {
                    continue;
                }
                let row = &mut out.dense[so + i * stride..so + (i + 1) * stride];
                for (z, y) in row.iter_mut().zip(b) {
                    if !y.is_zero() {
                        *z += f(x.clone() * y.clone());
                    }
                }
            }
            return;
        }

        for (ka, x) in lhs.iter_degree(da) {
            for (kb, y) in rhs.iter_degree(db) {
                let product = f(x.clone() * y.clone());
                out.update(ka * kb, |z| *z += product);
            }
        }
    }
}

impl<S: Scalar> FreeTensor<S> {
    /// The unit tensor: 1 on the empty word.
    pub fn unit(basis: &Rc<TensorBasis>) -> Self {
        Self::from_scalar(basis, S::one())
    }

    /// Coefficient of the empty word.
    pub fn unit_coefficient(&self) -> S {
        self.get(&Word::EMPTY)
    }

    /// Single-letter tensor `value * (letter)`.
    ///
    /// # Panics
    ///
    /// Panics if the letter is outside the alphabet or the depth is zero.
    pub fn from_letter(basis: &Rc<TensorBasis>, letter: Letter, value: S) -> Self {
        Self::from_term(basis, Word::letter(letter), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn basis(width: usize, depth: usize) -> Rc<TensorBasis> {
        Rc::new(TensorBasis::new(Shape::new(width, depth).unwrap()))
    }

    fn w(letters: &[u8]) -> Word {
        Word::from_letters(letters)
    }

    #[test]
    fn test_word_product() {
        let b = basis(2, 3);
        let lhs = FreeTensor::from_terms(&b, [(w(&[1, 1]), 1.0)]);
        let rhs = FreeTensor::from_terms(&b, [(w(&[2]), 1.0)]);
        let expected = FreeTensor::from_terms(&b, [(w(&[1, 1, 2]), 1.0)]);
        assert_eq!(&lhs * &rhs, expected);
    }

    #[test]
    fn test_unit_is_identity() {
        let b = basis(3, 3);
        let x = FreeTensor::from_terms(&b, [(w(&[1]), 2.0), (w(&[3, 2]), -1.0), (w(&[]), 0.5)]);
        let one = FreeTensor::unit(&b);
        assert_eq!(&one * &x, x);
        assert_eq!(&x * &one, x);
        assert_eq!(x.unit_coefficient(), 0.5);
    }

    #[test]
    fn test_product_truncates() {
        let b = basis(2, 2);
        let x = FreeTensor::from_terms(&b, [(w(&[1, 2]), 1.0)]);
        let y = FreeTensor::from_terms(&b, [(w(&[2]), 1.0)]);
        assert!((&x * &y).is_empty());
    }

    #[test]
    fn test_dense_and_sparse_paths_agree() {
        let b = basis(2, 4);
        let terms = [
            (w(&[]), 1.0),
            (w(&[1]), 2.0),
            (w(&[2]), -1.0),
            (w(&[1, 2]), 0.5),
            (w(&[2, 2, 1]), 3.0),
        ];
        let sparse = FreeTensor::from_terms(&b, terms);
        let mut dense = FreeTensor::with_depth(&b, 4);
        dense.insert_terms(terms);
        let mut mixed = FreeTensor::with_depth(&b, 1);
        mixed.insert_terms(terms);

        let reference = &sparse * &sparse;
        assert_eq!(&dense * &dense, reference);
        assert_eq!(&mixed * &dense, reference);
        assert_eq!(&sparse * &mixed, reference);
        assert_eq!((&dense * &dense).dense_bound(), b.dimension());
    }

    #[test]
    fn test_mul_assign_with_self() {
        let b = basis(2, 3);
        let mut x = FreeTensor::from_terms(&b, [(w(&[]), 1.0), (w(&[1]), 1.0)]);
        let expected = &x * &x;
        let copy = x.clone();
        x *= &copy;
        assert_eq!(x, expected);
        // (1 + a)^2 = 1 + 2a + aa
        assert_eq!(
            x,
            FreeTensor::from_terms(&b, [(w(&[]), 1.0), (w(&[1]), 2.0), (w(&[1, 1]), 1.0)])
        );
    }

    #[test]
    fn test_algebra_helpers() {
        let b = basis(2, 3);
        let x = FreeTensor::from_letter(&b, 1, 1.0);
        let y = FreeTensor::from_letter(&b, 2, 1.0);
        let c = x.commutator(&y);
        assert_eq!(
            c,
            FreeTensor::from_terms(&b, [(w(&[1, 2]), 1.0), (w(&[2, 1]), -1.0)])
        );

        let mut acc = FreeTensor::new(&b);
        acc.add_mul(&x, &y).add_mul(&x, &y).sub_mul(&y, &x);
        assert_eq!(
            acc,
            FreeTensor::from_terms(&b, [(w(&[1, 2]), 2.0), (w(&[2, 1]), -1.0)])
        );

        let mut z = x.clone();
        z.mul_scal_prod(&y, &3.0);
        assert_eq!(z, FreeTensor::from_terms(&b, [(w(&[1, 2]), 3.0)]));
        z.mul_scal_div(&x, &2.0);
        assert_eq!(z, FreeTensor::from_terms(&b, [(w(&[1, 2, 1]), 1.5)]));
    }
}
