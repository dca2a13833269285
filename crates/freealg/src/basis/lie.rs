//! Hall basis of the truncated free Lie algebra.
//!
//! The basis owns a [`HallSet`] grown to the truncation depth and a
//! permanent cache of bracket structure constants. Constants are integers,
//! so one table serves every scalar type.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::trace;

use super::{Basis, HallKey, HallSet};
use crate::error::{AlgebraError, Result};
use crate::shape::{Letter, Shape};

/// Integer combination of Hall keys, sorted by key, without zero terms.
pub type LieTerms = Rc<[(HallKey, i64)]>;

/// Hall basis of the free Lie algebra of a given shape.
#[derive(Debug)]
pub struct LieBasis {
    shape: Shape,
    hall: HallSet,
    cache: RefCell<HashMap<(HallKey, HallKey), LieTerms>>,
}

impl LieBasis {
    /// Creates the Hall basis for `shape`.
    pub fn new(shape: Shape) -> Self {
        let mut hall = HallSet::new(shape.width());
        hall.growup(shape.depth());
        Self {
            shape,
            hall,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Shape of the basis.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The underlying Hall set.
    #[inline]
    pub fn hall(&self) -> &HallSet {
        &self.hall
    }

    /// Key of a letter.
    ///
    /// # Panics
    ///
    /// Panics if the letter is outside the alphabet or the depth is zero.
    pub fn key_of_letter(&self, letter: Letter) -> HallKey {
        assert!(self.shape.depth() >= 1, "a depth-0 Lie algebra has no letters");
        self.hall.key_of_letter(letter)
    }

    /// Bracket notation of a key, `[1,[1,2]]`.
    pub fn bracket_string(&self, key: HallKey) -> String {
        self.hall.bracket_string(key)
    }

    /// Whether `key` belongs to the basis.
    pub fn contains(&self, key: HallKey) -> bool {
        self.hall.contains(key) && self.hall.degree(key) <= self.shape.depth()
    }

    /// Fallible [`Basis::index_of_key`].
    ///
    /// # Errors
    ///
    /// [`AlgebraError::IndexOutOfRange`] if `key` is not in the basis.
    pub fn try_index_of_key(&self, key: HallKey) -> Result<usize> {
        if self.contains(key) {
            Ok(key.index() - 1)
        } else {
            Err(AlgebraError::IndexOutOfRange {
                index: key.index(),
                dimension: self.dimension(),
            })
        }
    }

    /// Number of cached bracket pairs.
    pub fn cached_brackets(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Structure constants of `[k1, k2]`, truncated at the depth.
    ///
    /// - empty if the degrees sum past the depth or `k1 == k2`;
    /// - `-[k2, k1]` if `k1 > k2`;
    /// - the key with parents `(k1, k2)` if that is a Hall pair;
    /// - otherwise, with `k2 = [k3, k4]`, `[[k1,k3],k4] - [[k1,k4],k3]`.
    ///
    /// Results are cached for the life of the basis.
    pub fn bracket_keys(&self, k1: HallKey, k2: HallKey) -> LieTerms {
        if k1 == k2 || self.hall.degree(k1) + self.hall.degree(k2) > self.shape.depth() {
            return Rc::from([]);
        }
        let cached = self.cache.borrow().get(&(k1, k2)).cloned();
        if let Some(terms) = cached {
            return terms;
        }
        trace!(left = %k1, right = %k2, "bracket cache miss");
        let terms = self.compute_bracket(k1, k2);
        self.cache.borrow_mut().insert((k1, k2), Rc::clone(&terms));
        terms
    }

    fn compute_bracket(&self, k1: HallKey, k2: HallKey) -> LieTerms {
        if k1 > k2 {
            return self
                .bracket_keys(k2, k1)
                .iter()
                .map(|&(k, c)| (k, -c))
                .collect();
        }
        if let Some(k) = self.hall.find_pair(k1, k2) {
            return Rc::from([(k, 1)]);
        }
        if self.hall.is_letter(k2) {
            // k1 < k2 forces k1 to be a letter too, and every letter pair
            // within the depth is generated.
            return Rc::from([]);
        }
        let (k3, k4) = (self.hall.lparent(k2), self.hall.rparent(k2));
        let mut acc = BTreeMap::new();
        self.accumulate_bracket(&mut acc, k1, k3, k4, 1);
        self.accumulate_bracket(&mut acc, k1, k4, k3, -1);
        acc.into_iter().filter(|&(_, c)| c != 0).collect()
    }

    /// `acc += sign * [[a, b], c]`.
    fn accumulate_bracket(
        &self,
        acc: &mut BTreeMap<HallKey, i64>,
        a: HallKey,
        b: HallKey,
        c: HallKey,
        sign: i64,
    ) {
        for &(k, x) in self.bracket_keys(a, b).iter() {
            for &(m, y) in self.bracket_keys(k, c).iter() {
                *acc.entry(m).or_insert(0) += sign * x * y;
            }
        }
    }
}

impl Basis for LieBasis {
    type Key = HallKey;

    #[inline]
    fn max_degree(&self) -> usize {
        self.shape.depth()
    }

    #[inline]
    fn degree(&self, key: &HallKey) -> usize {
        self.hall.degree(*key)
    }

    fn first_key(&self) -> Option<HallKey> {
        (self.dimension() > 0).then(|| HallKey::new(1))
    }

    fn next_key(&self, key: &HallKey) -> Option<HallKey> {
        let next = key.index() + 1;
        (next <= self.dimension()).then(|| HallKey::new(next as u32))
    }

    fn index_of_key(&self, key: &HallKey) -> usize {
        match self.try_index_of_key(*key) {
            Ok(index) => index,
            Err(_) => panic!("Hall key {key} is not a key of the Lie basis"),
        }
    }

    fn key_of_index(&self, index: usize) -> HallKey {
        let dimension = self.dimension();
        assert!(
            index < dimension,
            "index {index} is outside the basis dimension {dimension}"
        );
        HallKey::new(index as u32 + 1)
    }

    fn start_of_degree(&self, degree: usize) -> usize {
        if degree == 0 {
            return 0;
        }
        let degree = degree.min(self.shape.depth() + 1);
        self.hall.degree_range(degree).start - 1
    }

    fn degree_of_index(&self, index: usize) -> usize {
        self.hall.degree(HallKey::new(index as u32 + 1))
    }
}
