//! Flat `(key, scalar)` record format for persisting vectors.
//!
//! A [`Records`] value lists the non-zero entries of a vector in key order.
//! It carries no shape: the reader supplies the basis. With the `serde`
//! feature it (de)serializes as a sequence of pairs.

use std::rc::Rc;

use crate::basis::Basis;
use crate::scalar::Scalar;
use crate::vector::GradedVector;

/// Non-zero entries of a vector in key order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Records<K, S> {
    /// `(key, coefficient)` pairs.
    pub entries: Vec<(K, S)>,
}

impl<K, S> Records<K, S> {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: Basis, S: Scalar> GradedVector<B, S> {
    /// Snapshot of the non-zero entries.
    pub fn to_records(&self) -> Records<B::Key, S> {
        Records {
            entries: self.iter().map(|(k, s)| (k, s.clone())).collect(),
        }
    }

    /// Rebuilds a vector from records; repeated keys accumulate.
    ///
    /// # Panics
    ///
    /// Panics if a record's key does not belong to `basis`.
    pub fn from_records(basis: &Rc<B>, records: Records<B::Key, S>) -> Self {
        Self::from_terms(basis, records.entries)
    }
}
