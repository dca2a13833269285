//! Algebra shape: alphabet width and truncation depth.
//!
//! Every basis, vector and map is built for one fixed shape. The shape is a
//! plain `Copy` value so index arithmetic stays a pure function of
//! `(width, depth)` and can be exercised directly in tests.
//!
//! # Example
//!
//! ```
//! use freealg::Shape;
//!
//! let shape = Shape::new(2, 3).unwrap();
//! assert_eq!(shape.width(), 2);
//! assert_eq!(shape.depth(), 3);
//! // 1 + 2 + 4 + 8 words of length 0..=3
//! assert_eq!(shape.tensor_dimension(), 15);
//! ```

use core::fmt;

use crate::error::{AlgebraError, Result};

/// A letter of the alphabet, `1..=width`.
pub type Letter = u8;

/// Largest supported alphabet width.
pub const MAX_WIDTH: usize = Letter::MAX as usize;

/// Largest supported truncation depth (capacity of a [`crate::Word`]).
pub const MAX_DEPTH: usize = 32;

/// Alphabet width and truncation depth of an algebra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    width: usize,
    depth: usize,
}

impl Shape {
    /// Creates a shape, validating width, depth and that the tensor
    /// dimension fits the index type.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::InvalidWidth`], [`AlgebraError::DegreeOutOfRange`]
    /// or [`AlgebraError::DimensionOverflow`].
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(AlgebraError::InvalidWidth {
                width,
                max: MAX_WIDTH,
            });
        }
        if depth > MAX_DEPTH {
            return Err(AlgebraError::DegreeOutOfRange {
                degree: depth,
                max: MAX_DEPTH,
            });
        }
        let shape = Self { width, depth };
        if shape.checked_tensor_starts().is_none() {
            return Err(AlgebraError::DimensionOverflow { width, depth });
        }
        Ok(shape)
    }

    /// Alphabet width `W`.
    #[inline]
    pub const fn width(self) -> usize {
        self.width
    }

    /// Truncation depth `N`.
    #[inline]
    pub const fn depth(self) -> usize {
        self.depth
    }

    /// Same width, different depth.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Shape::new`].
    pub fn with_depth(self, depth: usize) -> Result<Self> {
        Self::new(self.width, depth)
    }

    /// Number of words of length `0..=depth`: `(W^{N+1} - 1) / (W - 1)`.
    pub fn tensor_dimension(self) -> usize {
        self.tensor_starts()[self.depth + 1]
    }

    /// `W^d` for `d = 0..=depth`.
    pub(crate) fn powers(self) -> Vec<usize> {
        let mut powers = Vec::with_capacity(self.depth + 1);
        let mut p = 1usize;
        for _ in 0..=self.depth {
            powers.push(p);
            p = p.saturating_mul(self.width);
        }
        powers
    }

    /// First word index of each degree, `d = 0..=depth + 1`.
    pub(crate) fn tensor_starts(self) -> Vec<usize> {
        // Validated in `new`.
        self.checked_tensor_starts().unwrap_or_default()
    }

    fn checked_tensor_starts(self) -> Option<Vec<usize>> {
        let mut starts = Vec::with_capacity(self.depth + 2);
        let mut start = 0usize;
        let mut block = 1usize;
        starts.push(0);
        for d in 0..=self.depth {
            start = start.checked_add(block)?;
            starts.push(start);
            if d < self.depth {
                block = block.checked_mul(self.width)?;
            }
        }
        Some(starts)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "width {} depth {}", self.width, self.depth)
    }
}
