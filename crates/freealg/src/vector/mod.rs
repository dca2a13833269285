//! Hybrid dense/sparse graded vector store.
//!
//! A [`GradedVector`] maps basis keys to non-zero scalars. Coefficients of
//! low-degree keys live in a dense `Vec` indexed by
//! [`Basis::index_of_key`]; the rest live in an ordered map. The dense length
//! is always a degree boundary `start_of_degree(d)`, and a key is stored in
//! exactly one of the two segments:
//!
//! ```text
//!   index:  0 ........ dense.len() ........ dimension
//!           [  dense: Vec<S>  ][ sparse: BTreeMap<Key, S> ]
//! ```
//!
//! Because the basis index is order preserving, iterating the dense segment
//! and then the sparse one visits keys in order. Zero is never observable as
//! a stored entry: dense zeros mean "absent", writes of zero remove sparse
//! entries, and zeros left by `iter_mut` are skipped until [`GradedVector::prune`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use freealg::{GradedVector, Shape, TensorBasis, Word};
//!
//! let basis = Rc::new(TensorBasis::new(Shape::new(2, 3).unwrap()));
//! let mut v = GradedVector::<_, f64>::with_depth(&basis, 1);
//! v.set(Word::letter(1), 2.0);
//! v.set(Word::from_letters(&[1, 2, 2]), 3.0);
//! assert_eq!(v.dense_len(), 1);
//! assert_eq!(v.sparse_len(), 1);
//!
//! let sparse = GradedVector::from_terms(
//!     &basis,
//!     [(Word::from_letters(&[1, 2, 2]), 3.0), (Word::letter(1), 2.0)],
//! );
//! assert_eq!(v, sparse);
//! ```

mod iter;
mod ops;

pub use iter::{Iter, IterMut};

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::basis::Basis;
use crate::error::{AlgebraError, Result};
use crate::scalar::Scalar;

/// Coefficient vector over a graded basis.
pub struct GradedVector<B: Basis, S> {
    pub(crate) basis: Rc<B>,
    pub(crate) dense: Vec<S>,
    pub(crate) sparse: BTreeMap<B::Key, S>,
}

// ============================================================================
// Construction and segments
// ============================================================================

impl<B: Basis, S: Scalar> GradedVector<B, S> {
    /// The zero vector, fully sparse.
    pub fn new(basis: &Rc<B>) -> Self {
        Self {
            basis: Rc::clone(basis),
            dense: Vec::new(),
            sparse: BTreeMap::new(),
        }
    }

    /// The zero vector with a dense segment of at least `dimension` entries,
    /// rounded up to the next degree boundary.
    pub fn with_dimension(basis: &Rc<B>, dimension: usize) -> Self {
        let mut v = Self::new(basis);
        v.grow_dense(dimension);
        v
    }

    /// The zero vector with every key of degree `<= depth` dense.
    pub fn with_depth(basis: &Rc<B>, depth: usize) -> Self {
        let bound = basis.start_of_degree(depth.saturating_add(1));
        Self::with_dimension(basis, bound)
    }

    /// The basis vector of `key`.
    pub fn from_key(basis: &Rc<B>, key: B::Key) -> Self {
        Self::from_term(basis, key, S::one())
    }

    /// `value * key`.
    pub fn from_term(basis: &Rc<B>, key: B::Key, value: S) -> Self {
        let mut v = Self::new(basis);
        v.set(key, value);
        v
    }

    /// Sum of `value * key` over `terms`; repeated keys accumulate.
    pub fn from_terms<I>(basis: &Rc<B>, terms: I) -> Self
    where
        I: IntoIterator<Item = (B::Key, S)>,
    {
        let mut v = Self::new(basis);
        v.insert_terms(terms);
        v
    }

    /// `value` times the unit key.
    ///
    /// # Panics
    ///
    /// Panics if the basis has no unit.
    pub fn from_scalar(basis: &Rc<B>, value: S) -> Self {
        let Some(unit) = basis.unit_key() else {
            panic!("the basis has no unit key");
        };
        Self::from_term(basis, unit, value)
    }

    /// Shared handle to the basis.
    #[inline]
    pub fn basis(&self) -> &Rc<B> {
        &self.basis
    }

    /// Length of the dense segment (a degree boundary).
    #[inline]
    pub fn dense_bound(&self) -> usize {
        self.dense.len()
    }

    /// Non-zero entries of the dense segment.
    pub fn dense_len(&self) -> usize {
        self.dense.iter().filter(|s| !s.is_zero()).count()
    }

    /// Entries of the sparse segment.
    pub fn sparse_len(&self) -> usize {
        self.sparse.values().filter(|s| !s.is_zero()).count()
    }

    /// Degree of the last dense key, `None` while fully sparse.
    pub fn dense_depth(&self) -> Option<usize> {
        if self.dense.is_empty() {
            return None;
        }
        Some(self.basis.degree_of_index(self.dense.len() - 1))
    }

    /// Makes every key of degree `<= depth` dense. Never shrinks.
    pub fn maybe_resize(&mut self, depth: usize) {
        let bound = self.basis.start_of_degree(depth.saturating_add(1));
        self.grow_dense(bound);
    }

    /// Smallest degree boundary `>= bound`, capped at the dimension.
    fn degree_boundary(&self, bound: usize) -> usize {
        let max = self.basis.max_degree();
        (0..=max + 1)
            .map(|d| self.basis.start_of_degree(d))
            .find(|&start| start >= bound)
            .unwrap_or_else(|| self.basis.dimension())
    }

    /// Grows the dense segment to cover indices `< bound` (rounded to a
    /// degree boundary), migrating sparse entries.
    pub(crate) fn grow_dense(&mut self, bound: usize) {
        let bound = self.degree_boundary(bound);
        if bound <= self.dense.len() {
            return;
        }
        self.dense.resize(bound, S::zero());
        let tail = if bound < self.basis.dimension() {
            let first_sparse = self.basis.key_of_index(bound);
            self.sparse.split_off(&first_sparse)
        } else {
            BTreeMap::new()
        };
        let migrated = core::mem::replace(&mut self.sparse, tail);
        self.prune();
        for (key, value) in migrated {
            let index = self.basis.index_of_key(&key);
            self.dense[index] = value;
        }
    }
}

// ============================================================================
// Element access
// ============================================================================

impl<B: Basis, S: Scalar> GradedVector<B, S> {
    /// Coefficient of `key`, zero if absent.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to the basis.
    pub fn get(&self, key: &B::Key) -> S {
        let index = self.basis.index_of_key(key);
        if index < self.dense.len() {
            self.dense[index].clone()
        } else {
            self.sparse.get(key).cloned().unwrap_or_else(S::zero)
        }
    }

    /// Sets the coefficient of `key`; zero erases.
    pub fn set(&mut self, key: B::Key, value: S) {
        self.update(key, |s| *s = value);
    }

    /// Removes `key`.
    pub fn erase(&mut self, key: &B::Key) {
        let index = self.basis.index_of_key(key);
        if index < self.dense.len() {
            self.dense[index] = S::zero();
        } else {
            self.sparse.remove(key);
        }
    }

    /// Removes every entry, keeping the dense bound.
    pub fn clear(&mut self) {
        self.dense.iter_mut().for_each(|s| *s = S::zero());
        self.sparse.clear();
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.dense_len() + self.sparse_len()
    }

    /// Whether every coefficient is zero.
    pub fn is_empty(&self) -> bool {
        self.dense.iter().all(|s| s.is_zero()) && self.sparse.values().all(|s| s.is_zero())
    }

    /// Drops sparse entries holding zero, as left behind by
    /// [`GradedVector::iter_mut`].
    pub fn prune(&mut self) {
        self.sparse.retain(|_, s| !s.is_zero());
    }

    /// Applies `f` to the coefficient of `key` in place.
    pub(crate) fn update(&mut self, key: B::Key, f: impl FnOnce(&mut S)) {
        use std::collections::btree_map::Entry;

        let index = self.basis.index_of_key(&key);
        if index < self.dense.len() {
            f(&mut self.dense[index]);
            return;
        }
        match self.sparse.entry(key) {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                if entry.get().is_zero() {
                    entry.remove();
                }
            }
            Entry::Vacant(entry) => {
                let mut value = S::zero();
                f(&mut value);
                if !value.is_zero() {
                    entry.insert(value);
                }
            }
        }
    }

    /// Adds each term; repeated keys accumulate.
    pub fn insert_terms<I>(&mut self, terms: I)
    where
        I: IntoIterator<Item = (B::Key, S)>,
    {
        for (key, value) in terms {
            self.update(key, |s| *s += value);
        }
    }

    /// Iterator over the non-zero entries in key order.
    pub fn iter(&self) -> Iter<'_, B, S> {
        Iter::new(&self.basis, &self.dense, 0, self.sparse.range(..))
    }

    /// Mutable iterator over the non-zero entries in key order. A value set
    /// to zero is treated as absent afterwards.
    pub fn iter_mut(&mut self) -> IterMut<'_, B, S> {
        IterMut::new(&self.basis, &mut self.dense, self.sparse.iter_mut())
    }

    /// Iterator over the non-zero entries of degree `degree`, in key order.
    pub fn iter_degree(&self, degree: usize) -> Iter<'_, B, S> {
        let start = self.basis.start_of_degree(degree);
        let end = self.basis.start_of_degree(degree.saturating_add(1));
        let dense_end = end.min(self.dense.len());
        let dense_start = start.min(dense_end);
        let sparse_start = start.max(self.dense.len());
        let sparse = if sparse_start >= end {
            None
        } else {
            let lower = self.basis.key_of_index(sparse_start);
            if end < self.basis.dimension() {
                let upper = self.basis.key_of_index(end);
                Some(self.sparse.range(lower..upper))
            } else {
                Some(self.sparse.range(lower..))
            }
        };
        Iter::with_sparse(
            &self.basis,
            &self.dense[dense_start..dense_end],
            dense_start,
            sparse,
        )
    }

    /// Keys of the non-zero entries.
    pub fn keys(&self) -> impl Iterator<Item = B::Key> + '_ {
        self.iter().map(|(k, _)| k)
    }
}

// ============================================================================
// Fused accumulation
// ============================================================================

impl<B: Basis, S: Scalar> GradedVector<B, S> {
    /// `self[key] += s`.
    pub fn add_scal_prod(&mut self, key: B::Key, s: S) {
        self.update(key, |x| *x += s);
    }

    /// `self[key] -= s`.
    pub fn sub_scal_prod(&mut self, key: B::Key, s: S) {
        self.update(key, |x| *x -= s);
    }

    /// `self[key] += 1 / s`.
    pub fn add_scal_div(&mut self, key: B::Key, s: S) {
        self.update(key, |x| *x += S::one() / s);
    }

    /// `self[key] -= 1 / s`.
    pub fn sub_scal_div(&mut self, key: B::Key, s: S) {
        self.update(key, |x| *x -= S::one() / s);
    }

    /// `self += rhs * s` without a temporary vector.
    pub fn add_scal_prod_vec(&mut self, rhs: &Self, s: &S) {
        self.accumulate(rhs, |x, y| *x += y.clone() * s.clone());
    }

    /// `self -= rhs * s` without a temporary vector.
    pub fn sub_scal_prod_vec(&mut self, rhs: &Self, s: &S) {
        self.accumulate(rhs, |x, y| *x -= y.clone() * s.clone());
    }

    /// `self += rhs / s` without a temporary vector.
    pub fn add_scal_div_vec(&mut self, rhs: &Self, s: &S) {
        self.accumulate(rhs, |x, y| *x += y.clone() / s.clone());
    }

    /// `self -= rhs / s` without a temporary vector.
    pub fn sub_scal_div_vec(&mut self, rhs: &Self, s: &S) {
        self.accumulate(rhs, |x, y| *x -= y.clone() / s.clone());
    }

    /// Applies `op(self[k], rhs[k])` for every non-zero entry of `rhs`,
    /// growing the dense segment to cover rhs's.
    pub(crate) fn accumulate(&mut self, rhs: &Self, op: impl Fn(&mut S, &S)) {
        self.grow_dense(rhs.dense.len());
        for (x, y) in self.dense.iter_mut().zip(&rhs.dense) {
            if !y.is_zero() {
                op(x, y);
            }
        }
        for (key, y) in &rhs.sparse {
            self.update(key.clone(), |x| op(x, y));
        }
    }

    /// Applies `f` to every stored coefficient, pruning sparse zeros.
    pub(crate) fn map_in_place(&mut self, f: impl Fn(&mut S)) {
        self.dense.iter_mut().filter(|s| !s.is_zero()).for_each(&f);
        self.sparse.values_mut().for_each(&f);
        self.sparse.retain(|_, s| !s.is_zero());
    }
}

// ============================================================================
// Degree structure and norms
// ============================================================================

impl<B: Basis, S: Scalar> GradedVector<B, S> {
    /// Largest degree of a non-zero entry; 0 for the zero vector.
    pub fn degree(&self) -> usize {
        if let Some((key, _)) = self.sparse.iter().rev().find(|(_, s)| !s.is_zero()) {
            return self.basis.degree(key);
        }
        self.dense
            .iter()
            .rposition(|s| !s.is_zero())
            .map_or(0, |i| self.basis.degree_of_index(i))
    }

    /// Keeps only the entries with degree in `min..=max`.
    pub fn truncate(&mut self, min: usize, max: usize) {
        let basis = Rc::clone(&self.basis);
        for (i, s) in self.dense.iter_mut().enumerate() {
            let d = basis.degree_of_index(i);
            if d < min || d > max {
                *s = S::zero();
            }
        }
        self.sparse.retain(|k, s| {
            let d = basis.degree(k);
            min <= d && d <= max && !s.is_zero()
        });
    }

    /// Sum of absolute values of the coefficients.
    pub fn norm_l1(&self) -> S {
        self.iter().fold(S::zero(), |acc, (_, s)| acc + s.abs())
    }

    /// Sum of absolute values of the degree-`degree` coefficients.
    pub fn norm_l1_degree(&self, degree: usize) -> S {
        self.iter_degree(degree)
            .fold(S::zero(), |acc, (_, s)| acc + s.abs())
    }

    /// Largest absolute value of a coefficient.
    pub fn norm_linf(&self) -> S {
        self.iter().fold(S::zero(), |acc, (_, s)| {
            let a = s.abs();
            if a > acc {
                a
            } else {
                acc
            }
        })
    }

    /// Verifies the store's internal invariants.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvariantViolation`] describing the first violation:
    /// a dense length off a degree boundary or a sparse key inside the dense
    /// range. Zeros written through [`GradedVector::iter_mut`] are not
    /// violations; they read as absent until [`GradedVector::prune`].
    pub fn check_invariants(&self) -> Result<()> {
        let bound = self.dense.len();
        if self.degree_boundary(bound) != bound {
            return Err(AlgebraError::InvariantViolation(format!(
                "dense length {bound} is not a degree boundary"
            )));
        }
        for key in self.sparse.keys() {
            let index = self.basis.index_of_key(key);
            if index < bound {
                return Err(AlgebraError::InvariantViolation(format!(
                    "sparse key {key:?} has dense index {index} < {bound}"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Trait impls
// ============================================================================

impl<B: Basis, S: Clone> Clone for GradedVector<B, S> {
    fn clone(&self) -> Self {
        Self {
            basis: Rc::clone(&self.basis),
            dense: self.dense.clone(),
            sparse: self.sparse.clone(),
        }
    }
}

impl<B: Basis, S: Scalar> PartialEq for GradedVector<B, S> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<B: Basis, S: Scalar> fmt::Debug for GradedVector<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<B, S> fmt::Display for GradedVector<B, S>
where
    B: Basis,
    B::Key: fmt::Display,
    S: Scalar + fmt::Display,
{
    /// `{ 1(1) -2.5(1,2) }`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (key, value) in self.iter() {
            write!(f, " {value}{key}")?;
        }
        write!(f, " }}")
    }
}
