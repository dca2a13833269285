//! Word basis of the truncated free tensor algebra.
//!
//! Words of length `d` occupy the contiguous index range
//! `start_of_degree(d)..start_of_degree(d + 1)` and are ranked within it as
//! base-`W` numerals with digits `letter - 1`:
//!
//! | degree | first index | count   |
//! |--------|-------------|---------|
//! | 0      | 0           | 1       |
//! | 1      | 1           | `W`     |
//! | 2      | `1 + W`     | `W^2`   |
//! | `d`    | `(W^d - 1) / (W - 1)` | `W^d` |

use super::{Basis, Word};
use crate::error::{AlgebraError, Result};
use crate::shape::{Letter, Shape};

/// Enumeration of every word of length `0..=depth` over `1..=width`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorBasis {
    shape: Shape,
    powers: Vec<usize>,
    starts: Vec<usize>,
}

impl TensorBasis {
    /// Creates the word basis for `shape`.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            powers: shape.powers(),
            starts: shape.tensor_starts(),
        }
    }

    /// Shape of the basis.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Alphabet width.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape.width()
    }

    /// Number of words of length `degree`, `W^degree`.
    ///
    /// # Panics
    ///
    /// Panics if `degree` exceeds the depth.
    #[inline]
    pub fn power(&self, degree: usize) -> usize {
        self.powers[degree]
    }

    /// Concatenation truncated at the depth: `None` if the product is too
    /// long to be a key of this basis.
    pub fn concat(&self, lhs: &Word, rhs: &Word) -> Option<Word> {
        if lhs.degree() + rhs.degree() > self.shape.depth() {
            return None;
        }
        lhs.concat(rhs)
    }

    /// Whether `key` belongs to the basis.
    pub fn contains(&self, key: &Word) -> bool {
        self.validate(key).is_ok()
    }

    /// Fallible [`Basis::index_of_key`].
    ///
    /// # Errors
    ///
    /// [`AlgebraError::DegreeOutOfRange`] or [`AlgebraError::LetterOutOfRange`]
    /// if the word is not a key of this basis.
    pub fn try_index_of_key(&self, key: &Word) -> Result<usize> {
        self.validate(key)?;
        let width = self.width();
        let rank = key
            .letters()
            .iter()
            .fold(0usize, |r, &a| r * width + usize::from(a) - 1);
        Ok(self.starts[key.degree()] + rank)
    }

    /// Fallible [`Basis::key_of_index`].
    ///
    /// # Errors
    ///
    /// [`AlgebraError::IndexOutOfRange`] if `index` is past the dimension.
    pub fn try_key_of_index(&self, index: usize) -> Result<Word> {
        let dimension = self.dimension();
        if index >= dimension {
            return Err(AlgebraError::IndexOutOfRange { index, dimension });
        }
        let degree = self.degree_of_index(index);
        let mut rank = index - self.starts[degree];
        let mut letters = [0 as Letter; crate::shape::MAX_DEPTH];
        let width = self.width();
        for slot in letters[..degree].iter_mut().rev() {
            *slot = (rank % width + 1) as Letter;
            rank /= width;
        }
        Word::try_from_letters(&letters[..degree])
    }

    fn validate(&self, key: &Word) -> Result<()> {
        if key.degree() > self.shape.depth() {
            return Err(AlgebraError::DegreeOutOfRange {
                degree: key.degree(),
                max: self.shape.depth(),
            });
        }
        let width = self.width();
        match key.letters().iter().find(|&&a| usize::from(a) > width) {
            Some(&letter) => Err(AlgebraError::LetterOutOfRange {
                letter: usize::from(letter),
                width,
            }),
            None => Ok(()),
        }
    }
}

impl Basis for TensorBasis {
    type Key = Word;

    #[inline]
    fn max_degree(&self) -> usize {
        self.shape.depth()
    }

    #[inline]
    fn degree(&self, key: &Word) -> usize {
        key.degree()
    }

    fn first_key(&self) -> Option<Word> {
        Some(Word::EMPTY)
    }

    fn next_key(&self, key: &Word) -> Option<Word> {
        let width = self.width() as Letter;
        let letters = key.letters();
        // Rightmost letter that can be incremented without carry.
        match letters.iter().rposition(|&a| a < width) {
            Some(pos) => {
                let mut next = Word::EMPTY;
                for &a in &letters[..pos] {
                    next.push(a);
                }
                next.push(letters[pos] + 1);
                for _ in pos + 1..letters.len() {
                    next.push(1);
                }
                Some(next)
            }
            None => {
                let degree = key.degree() + 1;
                if degree > self.shape.depth() {
                    return None;
                }
                Word::try_from_letters(&vec![1; degree]).ok()
            }
        }
    }

    fn index_of_key(&self, key: &Word) -> usize {
        match self.try_index_of_key(key) {
            Ok(index) => index,
            Err(err) => panic!("{key} is not a key of the tensor basis: {err}"),
        }
    }

    fn key_of_index(&self, index: usize) -> Word {
        match self.try_key_of_index(index) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }

    #[inline]
    fn start_of_degree(&self, degree: usize) -> usize {
        let last = self.starts.len() - 1;
        self.starts[degree.min(last)]
    }

    fn unit_key(&self) -> Option<Word> {
        Some(Word::EMPTY)
    }

    fn degree_of_index(&self, index: usize) -> usize {
        // `starts` is sorted; the degree is the last start not past `index`.
        let pos = self.starts.partition_point(|&s| s <= index);
        pos.saturating_sub(1).min(self.shape.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis(width: usize, depth: usize) -> TensorBasis {
        TensorBasis::new(Shape::new(width, depth).unwrap())
    }

    #[test]
    fn test_start_of_degree() {
        let b = basis(2, 3);
        assert_eq!(b.start_of_degree(0), 0);
        assert_eq!(b.start_of_degree(1), 1);
        assert_eq!(b.start_of_degree(2), 3);
        assert_eq!(b.start_of_degree(3), 7);
        assert_eq!(b.start_of_degree(4), 15);
        assert_eq!(b.start_of_degree(9), 15);
        assert_eq!(b.dimension(), 15);
    }

    #[test]
    fn test_index_of_key() {
        let b = basis(2, 3);
        assert_eq!(b.index_of_key(&Word::EMPTY), 0);
        assert_eq!(b.index_of_key(&Word::letter(1)), 1);
        assert_eq!(b.index_of_key(&Word::letter(2)), 2);
        assert_eq!(b.index_of_key(&Word::from_letters(&[1, 1])), 3);
        assert_eq!(b.index_of_key(&Word::from_letters(&[2, 1])), 5);
        assert_eq!(b.index_of_key(&Word::from_letters(&[2, 2, 2])), 14);
    }

    #[test]
    fn test_enumeration_matches_index() {
        let b = basis(3, 4);
        let keys: Vec<Word> = b.keys().collect();
        assert_eq!(keys.len(), b.dimension());
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(b.index_of_key(k), i);
            assert_eq!(b.key_of_index(i), *k);
        }
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_next_key_rolls_over_degree() {
        let b = basis(2, 2);
        assert_eq!(b.next_key(&Word::EMPTY), Some(Word::letter(1)));
        assert_eq!(
            b.next_key(&Word::letter(2)),
            Some(Word::from_letters(&[1, 1]))
        );
        assert_eq!(b.next_key(&Word::from_letters(&[2, 2])), None);
    }

    #[test]
    fn test_width_one() {
        let b = basis(1, 3);
        let keys: Vec<Word> = b.keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[3], Word::from_letters(&[1, 1, 1]));
    }

    #[test]
    fn test_depth_zero() {
        let b = basis(4, 0);
        assert_eq!(b.keys().count(), 1);
        assert_eq!(b.next_key(&Word::EMPTY), None);
    }

    #[test]
    fn test_degree_of_index() {
        let b = basis(2, 3);
        let degrees: Vec<usize> = (0..b.dimension()).map(|i| b.degree_of_index(i)).collect();
        assert_eq!(degrees, vec![0, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn test_concat_truncates() {
        let b = basis(2, 3);
        let ab = Word::from_letters(&[1, 2]);
        assert_eq!(b.concat(&ab, &Word::letter(1)), Some(Word::from_letters(&[1, 2, 1])));
        assert_eq!(b.concat(&ab, &ab), None);
    }

    #[test]
    fn test_rejects_foreign_keys() {
        let b = basis(2, 2);
        assert!(matches!(
            b.try_index_of_key(&Word::letter(3)),
            Err(AlgebraError::LetterOutOfRange { letter: 3, width: 2 })
        ));
        assert!(b.try_index_of_key(&Word::from_letters(&[1, 1, 1])).is_err());
        assert!(b.try_key_of_index(7).is_err());
        assert!(!b.contains(&Word::letter(3)));
    }

    #[test]
    #[should_panic(expected = "not a key of the tensor basis")]
    fn test_index_of_foreign_key_panics() {
        basis(2, 2).index_of_key(&Word::letter(5));
    }
}
