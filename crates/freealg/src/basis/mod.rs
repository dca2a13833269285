//! Key algebras: ordered, graded, enumerable basis keys.
//!
//! - [`Word`] / [`TensorBasis`]: words over the alphabet, basis of the free
//!   tensor algebra.
//! - [`HallKey`] / [`HallSet`] / [`LieBasis`]: Hall trees, basis of the free
//!   Lie algebra.
//!
//! Both bases implement [`Basis`], the contract the graded vector store and
//! the multiplication engine rely on.

mod hall;
mod lie;
mod tensor;
mod word;

pub use hall::{HallKey, HallSet};
pub use lie::{LieBasis, LieTerms};
pub use tensor::TensorBasis;
pub use word::Word;

use core::fmt;
use core::hash::Hash;

/// Ordered, graded and enumerable set of basis keys.
///
/// Implementations must satisfy, for every key `k` of degree `d`:
///
/// ```text
/// start_of_degree(d) <= index_of_key(k) < start_of_degree(d + 1)
/// key_of_index(index_of_key(k)) == k
/// a < b  <=>  index_of_key(a) < index_of_key(b)
/// ```
///
/// The last property is what lets the vector store keep a dense prefix and a
/// sparse tail while iterating in key order.
pub trait Basis {
    /// Basis key.
    type Key: Clone + Ord + Hash + fmt::Debug;

    /// Truncation depth: no key has a larger degree.
    fn max_degree(&self) -> usize;

    /// Degree of a key.
    fn degree(&self, key: &Self::Key) -> usize;

    /// First key of the enumeration, `None` for an empty basis.
    fn first_key(&self) -> Option<Self::Key>;

    /// Successor of `key`, `None` past the last key.
    fn next_key(&self, key: &Self::Key) -> Option<Self::Key>;

    /// Position of `key` in the enumeration.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to the basis.
    fn index_of_key(&self, key: &Self::Key) -> usize;

    /// Key at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.dimension()`.
    fn key_of_index(&self, index: usize) -> Self::Key;

    /// First index of degree `degree`; saturates at the dimension for
    /// degrees past the depth.
    fn start_of_degree(&self, degree: usize) -> usize;

    /// Number of keys.
    fn dimension(&self) -> usize {
        self.start_of_degree(self.max_degree() + 1)
    }

    /// Multiplicative unit, if the algebra has one.
    fn unit_key(&self) -> Option<Self::Key> {
        None
    }

    /// Degree of the key stored at `index`.
    fn degree_of_index(&self, index: usize) -> usize {
        let max = self.max_degree();
        (0..=max)
            .find(|&d| index < self.start_of_degree(d + 1))
            .unwrap_or(max)
    }

    /// Iterator over every key in order.
    fn keys(&self) -> Keys<'_, Self>
    where
        Self: Sized,
    {
        Keys {
            basis: self,
            next: self.first_key(),
        }
    }
}

/// Iterator over the keys of a basis, built on `first_key` / `next_key`.
pub struct Keys<'a, B: Basis> {
    basis: &'a B,
    next: Option<B::Key>,
}

impl<B: Basis> Iterator for Keys<'_, B> {
    type Item = B::Key;

    fn next(&mut self) -> Option<B::Key> {
        let current = self.next.take()?;
        self.next = self.basis.next_key(&current);
        Some(current)
    }
}
