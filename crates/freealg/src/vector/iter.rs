//! Key-ordered iterators over a [`super::GradedVector`].
//!
//! Both iterators walk the dense slice first and the sparse map second,
//! skipping zero coefficients so the segment split stays invisible.

use core::iter::Enumerate;
use core::slice;
use std::collections::btree_map;

use crate::basis::Basis;
use crate::scalar::Scalar;

/// Iterator over `(key, &coefficient)` in key order.
pub struct Iter<'a, B: Basis, S> {
    basis: &'a B,
    dense: Enumerate<slice::Iter<'a, S>>,
    offset: usize,
    sparse: Option<btree_map::Range<'a, B::Key, S>>,
}

impl<'a, B: Basis, S> Iter<'a, B, S> {
    pub(crate) fn new(
        basis: &'a B,
        dense: &'a [S],
        offset: usize,
        sparse: btree_map::Range<'a, B::Key, S>,
    ) -> Self {
        Self::with_sparse(basis, dense, offset, Some(sparse))
    }

    /// `dense[i]` is the coefficient of the key at index `offset + i`.
    pub(crate) fn with_sparse(
        basis: &'a B,
        dense: &'a [S],
        offset: usize,
        sparse: Option<btree_map::Range<'a, B::Key, S>>,
    ) -> Self {
        Self {
            basis,
            dense: dense.iter().enumerate(),
            offset,
            sparse,
        }
    }
}

impl<'a, B: Basis, S: Scalar> Iterator for Iter<'a, B, S> {
    type Item = (B::Key, &'a S);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, s) in self.dense.by_ref() {
            if !s.is_zero() {
                return Some((self.basis.key_of_index(self.offset + i), s));
            }
        }
        let sparse = self.sparse.as_mut()?;
        sparse
            .find(|(_, s)| !s.is_zero())
            .map(|(k, s)| (k.clone(), s))
    }
}

/// Iterator over `(key, &mut coefficient)` in key order.
pub struct IterMut<'a, B: Basis, S> {
    basis: &'a B,
    dense: Enumerate<slice::IterMut<'a, S>>,
    sparse: btree_map::IterMut<'a, B::Key, S>,
}

impl<'a, B: Basis, S> IterMut<'a, B, S> {
    pub(crate) fn new(
        basis: &'a B,
        dense: &'a mut [S],
        sparse: btree_map::IterMut<'a, B::Key, S>,
    ) -> Self {
        Self {
            basis,
            dense: dense.iter_mut().enumerate(),
            sparse,
        }
    }
}

impl<'a, B: Basis, S: Scalar> Iterator for IterMut<'a, B, S> {
    type Item = (B::Key, &'a mut S);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, s) in self.dense.by_ref() {
            if !s.is_zero() {
                return Some((self.basis.key_of_index(i), s));
            }
        }
        self.sparse
            .find(|(_, s)| !s.is_zero())
            .map(|(k, s)| (k.clone(), s))
    }
}
