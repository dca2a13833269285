//! Words over the alphabet: basis keys of the free tensor algebra.
//!
//! A [`Word`] is a fixed-capacity `Copy` container of letters. Words are
//! ordered by length first and lexicographically within a length, which is
//! the order of the global enumeration used by [`super::TensorBasis`].
//!
//! # Example
//!
//! ```
//! use freealg::Word;
//!
//! let w = Word::from_letters(&[1, 2, 1]);
//! assert_eq!(w.degree(), 3);
//! assert_eq!(w.first_letter(), Some(1));
//! assert_eq!(w.right_parent(), Word::from_letters(&[2, 1]));
//!
//! let (prefix, suffix) = w.split_at(2);
//! assert_eq!(prefix * suffix, w);
//! assert!(Word::from_letters(&[2, 2]) < Word::from_letters(&[1, 1, 1]));
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::ops::Mul;

use crate::error::{AlgebraError, Result};
use crate::shape::{Letter, MAX_DEPTH};

/// A word of at most [`MAX_DEPTH`] letters.
///
/// Unused slots are always zero so the derived equality and hash only see
/// the live letters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word {
    len: u8,
    letters: [Letter; MAX_DEPTH],
}

impl Word {
    /// The empty word, unit of the tensor algebra.
    pub const EMPTY: Self = Self {
        len: 0,
        letters: [0; MAX_DEPTH],
    };

    /// The empty word.
    #[inline]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// A one-letter word.
    ///
    /// # Panics
    ///
    /// Panics if `letter` is zero.
    #[inline]
    pub fn letter(letter: Letter) -> Self {
        assert!(letter != 0, "letters start at 1");
        let mut word = Self::EMPTY;
        word.letters[0] = letter;
        word.len = 1;
        word
    }

    /// Builds a word from its letters.
    ///
    /// # Panics
    ///
    /// Panics if a letter is zero or there are more than [`MAX_DEPTH`]
    /// letters. Use [`Word::try_from_letters`] to validate instead.
    pub fn from_letters(letters: &[Letter]) -> Self {
        match Self::try_from_letters(letters) {
            Ok(word) => word,
            Err(err) => panic!("invalid word {letters:?}: {err}"),
        }
    }

    /// Fallible [`Word::from_letters`].
    ///
    /// # Errors
    ///
    /// [`AlgebraError::DegreeOutOfRange`] for too many letters,
    /// [`AlgebraError::LetterOutOfRange`] for a zero letter.
    pub fn try_from_letters(letters: &[Letter]) -> Result<Self> {
        if letters.len() > MAX_DEPTH {
            return Err(AlgebraError::DegreeOutOfRange {
                degree: letters.len(),
                max: MAX_DEPTH,
            });
        }
        if letters.contains(&0) {
            return Err(AlgebraError::LetterOutOfRange {
                letter: 0,
                width: Letter::MAX as usize,
            });
        }
        let mut word = Self::EMPTY;
        word.letters[..letters.len()].copy_from_slice(letters);
        word.len = letters.len() as u8;
        Ok(word)
    }

    /// Length of the word.
    #[inline]
    pub const fn degree(&self) -> usize {
        self.len as usize
    }

    /// Whether this is the empty word.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The live letters.
    #[inline]
    pub fn letters(&self) -> &[Letter] {
        &self.letters[..self.degree()]
    }

    /// First letter, `None` for the empty word.
    #[inline]
    pub fn first_letter(&self) -> Option<Letter> {
        self.letters().first().copied()
    }

    /// Last letter, `None` for the empty word.
    #[inline]
    pub fn last_letter(&self) -> Option<Letter> {
        self.letters().last().copied()
    }

    /// The word with its first letter removed (empty for the empty word).
    pub fn right_parent(&self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        self.split_at(1).1
    }

    /// Splits into the length-`n` prefix and the remaining suffix.
    ///
    /// `n` past the end yields `(self, EMPTY)`.
    pub fn split_at(&self, n: usize) -> (Self, Self) {
        let n = n.min(self.degree());
        let mut prefix = Self::EMPTY;
        let mut suffix = Self::EMPTY;
        prefix.letters[..n].copy_from_slice(&self.letters[..n]);
        prefix.len = n as u8;
        let rest = self.degree() - n;
        suffix.letters[..rest].copy_from_slice(&self.letters[n..self.degree()]);
        suffix.len = rest as u8;
        (prefix, suffix)
    }

    /// Concatenation, `None` when the result exceeds [`MAX_DEPTH`].
    pub fn concat(&self, other: &Self) -> Option<Self> {
        let len = self.degree() + other.degree();
        if len > MAX_DEPTH {
            return None;
        }
        let mut word = *self;
        word.letters[self.degree()..len].copy_from_slice(other.letters());
        word.len = len as u8;
        Some(word)
    }

    /// Appends a letter in place.
    ///
    /// # Panics
    ///
    /// Panics if the word is full or `letter` is zero.
    pub fn push(&mut self, letter: Letter) {
        assert!(letter != 0, "letters start at 1");
        assert!(self.degree() < MAX_DEPTH, "word capacity exceeded");
        self.letters[self.degree()] = letter;
        self.len += 1;
    }
}

impl Default for Word {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.letters().cmp(other.letters()))
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Mul for Word {
    type Output = Word;

    /// Concatenation.
    ///
    /// # Panics
    ///
    /// Panics when the result exceeds [`MAX_DEPTH`] letters.
    fn mul(self, rhs: Word) -> Word {
        match self.concat(&rhs) {
            Some(word) => word,
            None => panic!("word capacity exceeded: {self} * {rhs}"),
        }
    }
}

impl From<Letter> for Word {
    fn from(letter: Letter) -> Self {
        Self::letter(letter)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word{self}")
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, l) in self.letters().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{l}")?;
        }
        write!(f, ")")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Word {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.letters())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Word {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let letters = <Vec<Letter> as serde::Deserialize>::deserialize(deserializer)?;
        Word::try_from_letters(&letters).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter() {
        assert_eq!(Word::from_letters(&[1]), Word::letter(1));
        assert_eq!(Word::from(3), Word::letter(3));
    }

    #[test]
    fn test_empty_less_than_letter() {
        assert!(Word::EMPTY < Word::letter(2));
    }

    #[test]
    fn test_same_degree_lexicographic() {
        let k1 = Word::from_letters(&[1, 1]);
        let k2 = Word::from_letters(&[1, 2]);
        let k3 = Word::from_letters(&[2, 1]);
        let k4 = Word::from_letters(&[2, 2]);
        assert!(k1 < k2);
        assert!(k2 < k3);
        assert!(k3 < k4);
    }

    #[test]
    fn test_shorter_first() {
        assert!(Word::letter(1) < Word::from_letters(&[2, 2]));
        assert!(Word::from_letters(&[2, 2]) < Word::from_letters(&[1, 1, 1]));
    }

    #[test]
    fn test_first_letter_and_right_parent() {
        let k = Word::from_letters(&[1, 2, 1]);
        let first = Word::letter(k.first_letter().unwrap());
        assert_eq!(first * k.right_parent(), k);
        assert_eq!(Word::EMPTY.right_parent(), Word::EMPTY);
        assert_eq!(Word::EMPTY.first_letter(), None);
    }

    #[test]
    fn test_split_short_word() {
        let (left, right) = Word::letter(1).split_at(2);
        assert_eq!(left, Word::letter(1));
        assert_eq!(right, Word::EMPTY);
    }

    #[test]
    fn test_split_long_word() {
        for letters in [[1, 2, 1, 2, 1], [1, 2, 3, 2, 1]] {
            let k = Word::from_letters(&letters);
            let (left, right) = k.split_at(2);
            assert_eq!(left, Word::from_letters(&letters[..2]));
            assert_eq!(right, Word::from_letters(&letters[2..]));
            assert_eq!(left * right, k);
        }
    }

    #[test]
    fn test_split_every_position() {
        let k = Word::from_letters(&[3, 1, 4, 1, 5]);
        for n in 0..=k.degree() {
            let (p, s) = k.split_at(n);
            assert_eq!(p.degree(), n);
            assert_eq!(s.degree(), k.degree() - n);
            assert_eq!(p * s, k);
        }
    }

    #[test]
    fn test_concat_identity_and_capacity() {
        let k = Word::from_letters(&[2, 1]);
        assert_eq!(Word::EMPTY * k, k);
        assert_eq!(k * Word::EMPTY, k);
        let full = Word::from_letters(&[1; MAX_DEPTH]);
        assert_eq!(full.concat(&Word::letter(1)), None);
    }

    #[test]
    fn test_invalid_letters() {
        assert!(Word::try_from_letters(&[1, 0]).is_err());
        assert!(Word::try_from_letters(&[1; MAX_DEPTH + 1]).is_err());
    }

    #[test]
    fn test_push_and_reverse() {
        let mut k = Word::EMPTY;
        k.push(1);
        k.push(2);
        k.push(3);
        assert_eq!(k, Word::from_letters(&[1, 2, 3]));
        assert_eq!(k.last_letter(), Some(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Word::from_letters(&[1, 2]).to_string(), "(1,2)");
        assert_eq!(Word::EMPTY.to_string(), "()");
        assert_eq!(format!("{:?}", Word::letter(4)), "Word(4)");
    }
}
