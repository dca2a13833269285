//! Error type for fallible construction and numeric preconditions.
//!
//! Contract violations inside hot paths (reading a key that does not belong
//! to the algebra, indexing past the basis dimension) panic instead; every
//! panicking constructor has a `try_` twin that reports one of these
//! variants.

use crate::basis::HallKey;
use crate::shape::Shape;

/// Errors reported by the algebra engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraError {
    /// Alphabet width outside `1..=max`.
    #[error("alphabet width {width} is outside 1..={max}")]
    InvalidWidth {
        /// The rejected width.
        width: usize,
        /// Largest supported width.
        max: usize,
    },

    /// A degree larger than the algebra (or word capacity) allows.
    #[error("degree {degree} exceeds the maximum degree {max}")]
    DegreeOutOfRange {
        /// The rejected degree.
        degree: usize,
        /// The maximum permitted degree.
        max: usize,
    },

    /// A letter outside the alphabet `1..=width`.
    #[error("letter {letter} is outside the alphabet 1..={width}")]
    LetterOutOfRange {
        /// The rejected letter.
        letter: usize,
        /// Alphabet width.
        width: usize,
    },

    /// The basis dimension does not fit in `usize`.
    #[error("basis of width {width} and depth {depth} overflows the index type")]
    DimensionOverflow {
        /// Alphabet width.
        width: usize,
        /// Truncation depth.
        depth: usize,
    },

    /// The pair is not a (generated) Hall pair.
    #[error("({left}, {right}) is not a Hall pair")]
    MalformedHallPair {
        /// Candidate left parent.
        left: HallKey,
        /// Candidate right parent.
        right: HallKey,
    },

    /// A basis index at or past the basis dimension.
    #[error("index {index} is outside the basis dimension {dimension}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Basis dimension.
        dimension: usize,
    },

    /// The degree-0 coefficient is zero, so the element has no inverse.
    #[error("unit coefficient is zero; the element is not invertible")]
    NonInvertibleUnit,

    /// The logarithm needs a unit coefficient of 1 (or none at all).
    #[error("unit coefficient must be 1 or absent to take the logarithm")]
    NonUnitLogarithm,

    /// Two collaborators were built for different shapes.
    #[error("shape mismatch: {left} vs {right}")]
    ShapeMismatch {
        /// Shape of the first operand.
        left: Shape,
        /// Shape of the second operand.
        right: Shape,
    },

    /// The hybrid vector store is internally inconsistent.
    #[error("vector store invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, AlgebraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AlgebraError::LetterOutOfRange {
            letter: 7,
            width: 5,
        };
        assert_eq!(err.to_string(), "letter 7 is outside the alphabet 1..=5");

        let err = AlgebraError::MalformedHallPair {
            left: HallKey::new(3),
            right: HallKey::new(1),
        };
        assert_eq!(err.to_string(), "(3, 1) is not a Hall pair");
    }
}
