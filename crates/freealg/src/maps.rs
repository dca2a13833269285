//! Maps between the free Lie algebra and the free tensor algebra of one
//! shape, and the signature computations built on them.
//!
//! - `l2t` embeds a Lie element: each Hall key expands into the commutator
//!   polynomial of its tree, `[l, r] -> l r - r l`.
//! - `t2l` is the Dynkin map: word `a1...an` goes to the right-normed bracket
//!   `[a1, [a2, [..., an]]]` divided by `n`. It is a left inverse of `l2t` on
//!   Lie elements.
//!
//! Both expansion tables hold integer coefficients and are cached per key
//! for the life of the [`Maps`].
//!
//! # Example
//!
//! ```
//! use freealg::{HallKey, Lie, Maps, Shape, Word};
//!
//! let maps = Maps::new(Shape::new(2, 3).unwrap());
//! let hall = maps.lie_basis().hall();
//! let bracket = hall.pair(HallKey::new(1), HallKey::new(2)).unwrap();
//! let t = maps.expand::<f64>(bracket);
//! assert_eq!(t.get(&Word::from_letters(&[1, 2])), 1.0);
//! assert_eq!(t.get(&Word::from_letters(&[2, 1])), -1.0);
//!
//! let x = Lie::from_term(maps.lie_basis(), bracket, 3.0);
//! assert_eq!(maps.t2l(&maps.l2t(&x)), x);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::trace;

use crate::algebra::{FreeTensor, Lie};
use crate::basis::{Basis, HallKey, LieBasis, LieTerms, TensorBasis, Word};
use crate::error::{AlgebraError, Result};
use crate::scalar::{degree_scalar, Scalar};
use crate::shape::Shape;

/// Integer combination of words, sorted by word, without zero terms.
pub type TensorTerms = Rc<[(Word, i64)]>;

/// Lie/tensor maps for one shape.
#[derive(Debug)]
pub struct Maps {
    tensor: Rc<TensorBasis>,
    lie: Rc<LieBasis>,
    expansions: RefCell<HashMap<HallKey, TensorTerms>>,
    bracketings: RefCell<HashMap<Word, LieTerms>>,
}

impl Maps {
    /// Builds both bases for `shape`.
    pub fn new(shape: Shape) -> Self {
        Self {
            tensor: Rc::new(TensorBasis::new(shape)),
            lie: Rc::new(LieBasis::new(shape)),
            expansions: RefCell::new(HashMap::new()),
            bracketings: RefCell::new(HashMap::new()),
        }
    }

    /// Reuses existing bases, so vectors built on them can be mapped.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::ShapeMismatch`] if the bases disagree on the shape.
    pub fn from_bases(tensor: &Rc<TensorBasis>, lie: &Rc<LieBasis>) -> Result<Self> {
        if tensor.shape() != lie.shape() {
            return Err(AlgebraError::ShapeMismatch {
                left: tensor.shape(),
                right: lie.shape(),
            });
        }
        Ok(Self {
            tensor: Rc::clone(tensor),
            lie: Rc::clone(lie),
            expansions: RefCell::new(HashMap::new()),
            bracketings: RefCell::new(HashMap::new()),
        })
    }

    /// Shape of both bases.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.tensor.shape()
    }

    /// The word basis.
    #[inline]
    pub fn tensor_basis(&self) -> &Rc<TensorBasis> {
        &self.tensor
    }

    /// The Hall basis.
    #[inline]
    pub fn lie_basis(&self) -> &Rc<LieBasis> {
        &self.lie
    }

    /// Commutator polynomial of a Hall key as an integer word combination.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not a key of the Lie basis.
    pub fn expansion(&self, key: HallKey) -> TensorTerms {
        assert!(
            self.lie.contains(key),
            "Hall key {key} is not a key of the Lie basis"
        );
        let cached = self.expansions.borrow().get(&key).cloned();
        if let Some(terms) = cached {
            return terms;
        }
        trace!(key = %key, "expansion cache miss");
        let hall = self.lie.hall();
        let terms: TensorTerms = match hall.letter_of_key(key) {
            Some(letter) => Rc::from([(Word::letter(letter), 1)]),
            None => {
                let left = self.expansion(hall.lparent(key));
                let right = self.expansion(hall.rparent(key));
                let mut acc = BTreeMap::new();
                for &(a, x) in left.iter() {
                    for &(b, y) in right.iter() {
                        *acc.entry(a * b).or_insert(0) += x * y;
                        *acc.entry(b * a).or_insert(0) -= x * y;
                    }
                }
                acc.into_iter().filter(|&(_, c)| c != 0).collect()
            }
        };
        self.expansions
            .borrow_mut()
            .insert(key, Rc::clone(&terms));
        terms
    }

    /// [`Maps::expansion`] as a tensor.
    pub fn expand<S: Scalar>(&self, key: HallKey) -> FreeTensor<S> {
        FreeTensor::from_terms(
            &self.tensor,
            self.expansion(key)
                .iter()
                .map(|&(w, c)| (w, S::from_integer(c))),
        )
    }

    /// Lie to tensor: linear extension of [`Maps::expansion`].
    pub fn l2t<S: Scalar>(&self, lie: &Lie<S>) -> FreeTensor<S> {
        let mut out = FreeTensor::new(&self.tensor);
        if let Some(depth) = lie.dense_depth() {
            out.maybe_resize(depth);
        }
        for (key, x) in lie.iter() {
            for &(w, c) in self.expansion(key).iter() {
                out.add_scal_prod(w, x.clone() * S::from_integer(c));
            }
        }
        out
    }

    /// Right-normed bracket `[a1, [a2, [..., an]]]` of a word's letters as an
    /// integer Hall combination; empty for the empty word.
    ///
    /// # Panics
    ///
    /// Panics if `word` is not a key of the tensor basis.
    pub fn rbracketing(&self, word: &Word) -> LieTerms {
        assert!(
            self.tensor.contains(word),
            "{word} is not a key of the tensor basis"
        );
        let Some(first) = word.first_letter() else {
            return Rc::from([]);
        };
        let cached = self.bracketings.borrow().get(word).cloned();
        if let Some(terms) = cached {
            return terms;
        }
        trace!(word = %word, "bracketing cache miss");
        let letter = self.lie.key_of_letter(first);
        let rest = word.right_parent();
        let terms: LieTerms = if rest.is_empty() {
            Rc::from([(letter, 1)])
        } else {
            let mut acc = BTreeMap::new();
            for &(k, x) in self.rbracketing(&rest).iter() {
                for &(m, y) in self.lie.bracket_keys(letter, k).iter() {
                    *acc.entry(m).or_insert(0) += x * y;
                }
            }
            acc.into_iter().filter(|&(_, c)| c != 0).collect()
        };
        self.bracketings
            .borrow_mut()
            .insert(*word, Rc::clone(&terms));
        terms
    }

    /// Tensor to Lie (Dynkin map): `sum_w c_w rbracketing(w) / |w|`.
    ///
    /// The unit coefficient is dropped.
    pub fn t2l<S: Scalar>(&self, tensor: &FreeTensor<S>) -> Lie<S> {
        let mut out = Lie::new(&self.lie);
        if let Some(depth) = tensor.dense_depth() {
            out.maybe_resize(depth);
        }
        for (word, x) in tensor.iter() {
            for &(k, c) in self.rbracketing(&word).iter() {
                out.add_scal_prod(k, x.clone() * S::from_integer(c));
            }
        }
        for (key, value) in out.iter_mut() {
            *value /= degree_scalar::<S>(self.lie.degree(&key));
        }
        out
    }

    /// Degree-1 Lie element with coefficient `increments[i]` on letter
    /// `i + 1`.
    ///
    /// # Panics
    ///
    /// Panics if there are more increments than letters.
    pub fn lie_increment<S: Scalar>(&self, increments: &[S]) -> Lie<S> {
        let width = self.shape().width();
        assert!(
            increments.len() <= width,
            "{} increments for an alphabet of width {width}",
            increments.len()
        );
        let mut out = Lie::with_depth(&self.lie, 1);
        for (letter, x) in (1..).zip(increments) {
            out.set(self.lie.key_of_letter(letter), x.clone());
        }
        out
    }

    /// `exp(l2t(x))`.
    pub fn exp_lie<S: Scalar>(&self, x: &Lie<S>) -> FreeTensor<S> {
        self.l2t(x).exp()
    }

    /// Signature of a sequence of Lie increments: `prod_i exp(l2t(x_i))`,
    /// starting from the unit.
    pub fn signature<'a, S, I>(&self, increments: I) -> FreeTensor<S>
    where
        S: Scalar,
        I: IntoIterator<Item = &'a Lie<S>>,
    {
        let depth = self.shape().depth();
        let mut signature = FreeTensor::with_depth(&self.tensor, depth);
        signature.set(Word::EMPTY, S::one());
        for x in increments {
            signature *= &self.exp_lie(x);
        }
        signature
    }

    /// `t2l(log(signature(increments)))`.
    pub fn log_signature<'a, S, I>(&self, increments: I) -> Lie<S>
    where
        S: Scalar,
        I: IntoIterator<Item = &'a Lie<S>>,
    {
        self.t2l(&self.signature(increments).log())
    }
}
