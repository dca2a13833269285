//! Hall set: the arena of Hall trees indexing the free Lie algebra basis.
//!
//! Keys are positions in the arena. Position 0 is a sentinel meaning "no
//! parent"; positions `1..=W` are the letters; every later position is a
//! pair `(l, r)` of earlier keys satisfying the Hall condition
//!
//! ```text
//! l < r   and   (r is a letter  or  lparent(r) <= l)
//! ```
//!
//! Keys are generated degree by degree by [`HallSet::growup`], which only
//! appends, so a key's number never changes once issued. Within a degree
//! pairs are produced by increasing left-parent degree, then increasing left
//! parent, then increasing right parent.
//!
//! # Example
//!
//! ```
//! use freealg::{HallKey, HallSet};
//!
//! let mut hall = HallSet::new(2);
//! hall.growup(3);
//! // degree 1: 1, 2 / degree 2: [1,2] / degree 3: [1,[1,2]], [2,[1,2]]
//! assert_eq!(hall.len(), 5);
//! let k = hall.pair(HallKey::new(1), HallKey::new(3)).unwrap();
//! assert_eq!(hall.bracket_string(k), "[1,[1,2]]");
//! assert_eq!(hall.degree(k), 3);
//! ```

use core::fmt;
use core::ops::Range;
use std::collections::HashMap;

use tracing::debug;

use crate::error::{AlgebraError, Result};
use crate::shape::{Letter, MAX_DEPTH, MAX_WIDTH};

/// Handle to a Hall tree: its position in a [`HallSet`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HallKey(u32);

impl HallKey {
    /// The "no parent" sentinel.
    pub const NONE: Self = Self(0);

    /// Key at position `index`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for HallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only arena of Hall trees over a fixed alphabet.
#[derive(Clone, Debug)]
pub struct HallSet {
    width: usize,
    degree: usize,
    parents: Vec<(HallKey, HallKey)>,
    degrees: Vec<usize>,
    /// `ranges[d]` holds the keys of degree `d`; `ranges[0]` is empty.
    ranges: Vec<Range<usize>>,
    reverse: HashMap<(HallKey, HallKey), HallKey>,
}

impl HallSet {
    /// Creates the Hall set of `width` letters, grown to degree 1.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or larger than the letter type allows.
    pub fn new(width: usize) -> Self {
        match Self::try_new(width) {
            Ok(set) => set,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible [`HallSet::new`].
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidWidth`] for a width outside `1..=MAX_WIDTH`.
    pub fn try_new(width: usize) -> Result<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(AlgebraError::InvalidWidth {
                width,
                max: MAX_WIDTH,
            });
        }
        let mut parents = Vec::with_capacity(width + 1);
        let mut degrees = Vec::with_capacity(width + 1);
        parents.push((HallKey::NONE, HallKey::NONE));
        degrees.push(0);
        for letter in 1..=width {
            parents.push((HallKey::NONE, HallKey(letter as u32)));
            degrees.push(1);
        }
        Ok(Self {
            width,
            degree: 1,
            parents,
            degrees,
            ranges: vec![0..0, 1..width + 1],
            reverse: HashMap::new(),
        })
    }

    /// Extends the set with every Hall tree of degree `<= degree`.
    ///
    /// Idempotent; existing keys keep their numbers.
    ///
    /// # Panics
    ///
    /// Panics if `degree` exceeds [`MAX_DEPTH`].
    pub fn growup(&mut self, degree: usize) {
        assert!(
            degree <= MAX_DEPTH,
            "Hall set degree {degree} exceeds {MAX_DEPTH}"
        );
        for d in self.degree + 1..=degree {
            let start = self.parents.len();
            for e in 1..=d / 2 {
                let left = self.ranges[e].clone();
                let right = self.ranges[d - e].clone();
                for i in left {
                    for j in right.start.max(i + 1)..right.end {
                        if self.parents[j].0.index() <= i {
                            let key = HallKey(self.parents.len() as u32);
                            let pair = (HallKey(i as u32), HallKey(j as u32));
                            self.parents.push(pair);
                            self.degrees.push(d);
                            self.reverse.insert(pair, key);
                        }
                    }
                }
            }
            let end = self.parents.len();
            self.ranges.push(start..end);
            self.degree = d;
            debug!(
                width = self.width,
                degree = d,
                keys = end - start,
                "grew Hall set"
            );
        }
    }

    /// Alphabet width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Highest degree generated so far.
    #[inline]
    pub fn current_degree(&self) -> usize {
        self.degree
    }

    /// Number of Hall trees, sentinel excluded.
    #[inline]
    pub fn len(&self) -> usize {
        self.parents.len() - 1
    }

    /// Always false: every Hall set holds its letters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Degree of `key` (0 for the sentinel).
    ///
    /// # Panics
    ///
    /// Panics if `key` has not been generated.
    #[inline]
    pub fn degree(&self, key: HallKey) -> usize {
        self.degrees[key.index()]
    }

    /// Left parent; the sentinel for letters.
    #[inline]
    pub fn lparent(&self, key: HallKey) -> HallKey {
        self.parents[key.index()].0
    }

    /// Right parent; the letter itself for letters.
    #[inline]
    pub fn rparent(&self, key: HallKey) -> HallKey {
        self.parents[key.index()].1
    }

    /// Whether `key` is one of the letters `1..=W`.
    #[inline]
    pub fn is_letter(&self, key: HallKey) -> bool {
        (1..=self.width).contains(&key.index())
    }

    /// Whether `key` has been generated (sentinel excluded).
    #[inline]
    pub fn contains(&self, key: HallKey) -> bool {
        !key.is_none() && key.index() < self.parents.len()
    }

    /// Key of a letter.
    ///
    /// # Panics
    ///
    /// Panics if `letter` is outside `1..=W`.
    pub fn key_of_letter(&self, letter: Letter) -> HallKey {
        let l = usize::from(letter);
        assert!(
            (1..=self.width).contains(&l),
            "letter {letter} is outside the alphabet 1..={}",
            self.width
        );
        HallKey(u32::from(letter))
    }

    /// Letter of a letter key, `None` for composite keys.
    pub fn letter_of_key(&self, key: HallKey) -> Option<Letter> {
        self.is_letter(key).then(|| key.index() as Letter)
    }

    /// Keys `1..=W`.
    pub fn letters(&self) -> impl Iterator<Item = HallKey> {
        (1..=self.width as u32).map(HallKey)
    }

    /// Index range of the keys of degree `degree` (empty past the current
    /// degree).
    pub fn degree_range(&self, degree: usize) -> Range<usize> {
        self.ranges.get(degree).cloned().unwrap_or_else(|| {
            let end = self.parents.len();
            end..end
        })
    }

    /// Keys of degree `degree`.
    pub fn keys_of_degree(&self, degree: usize) -> impl Iterator<Item = HallKey> {
        let range = self.degree_range(degree);
        (range.start as u32..range.end as u32).map(HallKey)
    }

    /// Whether `(left, right)` satisfies the Hall condition.
    pub fn is_hall_pair(&self, left: HallKey, right: HallKey) -> bool {
        self.contains(left)
            && self.contains(right)
            && left < right
            && (self.is_letter(right) || self.lparent(right) <= left)
    }

    /// The key with parents `(left, right)`, if it has been generated.
    #[inline]
    pub fn find_pair(&self, left: HallKey, right: HallKey) -> Option<HallKey> {
        self.reverse.get(&(left, right)).copied()
    }

    /// The key with parents `(left, right)`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::MalformedHallPair`] if the pair is not a Hall pair or
    /// its degree has not been grown yet.
    pub fn pair(&self, left: HallKey, right: HallKey) -> Result<HallKey> {
        self.find_pair(left, right)
            .ok_or(AlgebraError::MalformedHallPair { left, right })
    }

    /// Bracket notation: `1` for a letter, `[l,r]` for a pair.
    pub fn bracket_string(&self, key: HallKey) -> String {
        let mut out = String::new();
        self.write_bracket(key, &mut out);
        out
    }

    fn write_bracket(&self, key: HallKey, out: &mut String) {
        if self.is_letter(key) || key.is_none() {
            out.push_str(&key.to_string());
            return;
        }
        let (l, r) = self.parents[key.index()];
        out.push('[');
        self.write_bracket(l, out);
        out.push(',');
        self.write_bracket(r, out);
        out.push(']');
    }
}
