//! Campbell-Baker-Hausdorff combination of Lie elements.
//!
//! `Cbh::full(&[x1, ..., xn])` is `log(exp(x1) ... exp(xn))`, computed
//! without leaving the Lie algebra. The two-element case uses Dynkin's form
//! of the series: on the free algebra over two letters `a, b`,
//!
//! ```text
//! log(exp(a) exp(b)) = sum_w  c_w / |w|  [w1, [w2, [..., wn]]]
//! ```
//!
//! where `c_w` are the word coefficients of the tensor logarithm. The
//! coefficients `c_w / |w|` are universal, so they are computed once per
//! depth, on first use, and then evaluated with `a -> x`, `b -> y`.
//! Right-normed brackets sharing a suffix are evaluated once.
//!
//! Longer sequences fold the pairwise combination from the left. Each fold
//! step adds `log(exp(z) exp(x)) - z` to the running sum `z` with a
//! compensated (two-sum) accumulation, so rounding does not build up over
//! many steps. Over a single letter every bracket vanishes and the
//! combination is the plain sum.
//!
//! # Example
//!
//! ```
//! use freealg::{Cbh, Shape};
//!
//! let cbh = Cbh::<f64>::new(Shape::new(2, 3).unwrap());
//! let maps = cbh.maps();
//! let x = maps.lie_increment(&[1.0, 0.0]);
//! let y = maps.lie_increment(&[0.0, 1.0]);
//!
//! let z = cbh.full(&[&x, &y]);
//! let reference = cbh.full_via_tensor(&[&x, &y]);
//! assert!((&z - &reference).norm_linf() < 1e-15);
//! ```

use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use num_rational::BigRational;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::algebra::{FreeTensor, Lie};
use crate::basis::{TensorBasis, Word};
use crate::maps::Maps;
use crate::scalar::{degree_scalar, Scalar};
use crate::shape::Shape;

/// CBH evaluator for one shape and scalar type.
#[derive(Debug)]
pub struct Cbh<S> {
    maps: Maps,
    /// Dynkin coefficients `c_w / |w|` of `log(exp(a) exp(b))`, words over
    /// `{1, 2}` in key order.
    series: OnceCell<Vec<(Word, S)>>,
}

impl<S: Scalar> Cbh<S> {
    /// Builds the maps for `shape`.
    pub fn new(shape: Shape) -> Self {
        Self::with_maps(Maps::new(shape))
    }

    /// Uses existing maps, so Lie elements built on their basis can be
    /// combined.
    pub fn with_maps(maps: Maps) -> Self {
        Self {
            maps,
            series: OnceCell::new(),
        }
    }

    /// The Lie/tensor maps.
    #[inline]
    pub fn maps(&self) -> &Maps {
        &self.maps
    }

    /// Number of terms of the two-letter series.
    pub fn series_len(&self) -> usize {
        self.series().len()
    }

    fn series(&self) -> &[(Word, S)] {
        self.series.get_or_init(|| {
            let shape = self.maps.shape();
            if shape.width() == 1 {
                return Vec::new();
            }
            debug!(depth = shape.depth(), "building two-letter series");
            dynkin_series(shape.depth())
        })
    }

    /// `log(exp(x) exp(y))`.
    pub fn pair(&self, x: &Lie<S>, y: &Lie<S>) -> Lie<S> {
        let mut out = x.clone();
        out += &self.increment(x, y);
        out
    }

    /// `log(exp(x) exp(y)) - x`.
    fn increment(&self, x: &Lie<S>, y: &Lie<S>) -> Lie<S> {
        if self.maps.shape().width() == 1 {
            return y.clone();
        }
        let lead = Word::letter(1);
        let mut memo: HashMap<Word, Lie<S>> = HashMap::new();
        let mut out = Lie::new(self.maps.lie_basis());
        for (word, c) in self.series() {
            if *word == lead {
                continue;
            }
            let bracket = self.right_normed(word, x, y, &mut memo);
            out.add_scal_prod_vec(&bracket, c);
        }
        out
    }

    /// `[w1, [w2, [..., wn]]]` with letter 1 read as `x`, letter 2 as `y`.
    fn right_normed(
        &self,
        word: &Word,
        x: &Lie<S>,
        y: &Lie<S>,
        memo: &mut HashMap<Word, Lie<S>>,
    ) -> Lie<S> {
        let head = match word.first_letter() {
            Some(1) => x,
            Some(_) => y,
            None => return Lie::new(self.maps.lie_basis()),
        };
        let rest = word.right_parent();
        if rest.is_empty() {
            return head.clone();
        }
        if let Some(hit) = memo.get(word) {
            return hit.clone();
        }
        let inner = self.right_normed(&rest, x, y, memo);
        let bracket = head * &inner;
        memo.insert(*word, bracket.clone());
        bracket
    }

    /// `log(exp(x1) ... exp(xn))`; zero for an empty slice.
    pub fn full(&self, elements: &[&Lie<S>]) -> Lie<S> {
        debug!(
            elements = elements.len(),
            depth = self.maps.shape().depth(),
            "combining Lie elements"
        );
        let Some((first, rest)) = elements.split_first() else {
            return Lie::new(self.maps.lie_basis());
        };
        let mut sum = (*first).clone();
        let mut carry = Lie::new(self.maps.lie_basis());
        for x in rest {
            let step = self.increment(&sum, x);
            // two-sum: `err` is exactly the rounding error of `a + d`
            for (key, d) in step.iter() {
                let a = sum.get(&key);
                let s = a.clone() + d.clone();
                let b = s.clone() - a.clone();
                let err = (a - (s.clone() - b.clone())) + (d.clone() - b);
                sum.set(key, s);
                carry.add_scal_prod(key, err);
            }
        }
        sum += &carry;
        debug!(terms = sum.len(), "combined Lie elements");
        sum
    }

    /// `t2l(log(exp(l2t(x1)) ... exp(l2t(xn))))`, the same combination
    /// computed through the tensor algebra.
    pub fn full_via_tensor(&self, elements: &[&Lie<S>]) -> Lie<S> {
        self.maps.log_signature(elements.iter().copied())
    }
}

/// Dynkin coefficients of `log(exp(a) exp(b))` on two letters up to `depth`.
///
/// The series is computed exactly and then embedded into `S`, falling back
/// to evaluating it in `S` when a coefficient does not fit `i64 / i64`.
fn dynkin_series<S: Scalar>(depth: usize) -> Vec<(Word, S)> {
    if depth == 0 {
        return Vec::new();
    }
    let Ok(shape) = Shape::new(2, depth) else {
        return Vec::new();
    };
    let basis = Rc::new(TensorBasis::new(shape));
    let exact = two_letter_series::<BigRational>(&basis);
    let embedded: Option<Vec<(Word, S)>> = exact
        .iter()
        .map(|(w, c)| Some((*w, embed_rational(c)?)))
        .collect();
    embedded.unwrap_or_else(|| two_letter_series(&basis))
}

fn two_letter_series<S: Scalar>(basis: &Rc<TensorBasis>) -> Vec<(Word, S)> {
    let a = FreeTensor::<S>::from_letter(basis, 1, S::one());
    let b = FreeTensor::<S>::from_letter(basis, 2, S::one());
    let z = (&a.exp() * &b.exp()).log();
    z.iter()
        .filter(|(w, _)| !w.is_empty())
        .map(|(w, c)| (w, c.clone() / degree_scalar::<S>(w.degree())))
        .collect()
}

fn embed_rational<S: Scalar>(r: &BigRational) -> Option<S> {
    let numer = r.numer().to_i64()?;
    let denom = r.denom().to_i64()?;
    Some(S::from_integer(numer) / S::from_integer(denom))
}
