//! Bracket product of the free Lie algebra, driven by the Hall structure
//! constants cached in [`LieBasis`].

use std::rc::Rc;

use super::{Lie, ProductBasis};
use crate::basis::{Basis, LieBasis};
use crate::scalar::Scalar;
use crate::shape::Letter;
use crate::vector::GradedVector;

impl ProductBasis for LieBasis {
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
        for da in 1..=lhs_degree {
            for db in 1..=rhs_degree.min(depth - da) {
                for (ka, x) in lhs.iter_degree(da) {
                    for (kb, y) in rhs.iter_degree(db) {
                        let terms = self.bracket_keys(ka, kb);
                        if terms.is_empty() {
                            continue;
                        }
                        let xy = x.clone() * y.clone();
                        for &(key, c) in terms.iter() {
                            let value = f(xy.clone() * S::from_integer(c));
                            out.update(key, |z| *z += value);
                        }
                    }
                }
            }
        }
    }
}

impl<S: Scalar> Lie<S> {
    /// Single-letter Lie element `value * letter`.
    ///
    /// # Panics
    ///
    /// Panics if the letter is outside the alphabet or the depth is zero.
    pub fn from_letter(basis: &Rc<LieBasis>, letter: Letter, value: S) -> Self {
        Self::from_term(basis, basis.key_of_letter(letter), value)
    }
}
