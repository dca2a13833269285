//! freealg - truncated free tensor and free Lie algebras
//!
//! Elements of the free tensor algebra and the free Lie algebra over a
//! finite alphabet `1..=W`, truncated at a fixed degree `N`, stored in a
//! hybrid dense/sparse graded vector and multiplied one degree block at a
//! time. The series layer adds `exp`, `log`, `inverse`, the Lie/tensor maps
//! and the Campbell-Baker-Hausdorff combination used to compute signatures
//! and log-signatures of sequences of increments.
//!
//! # Layers
//!
//! | Layer          | Types                                              |
//! |----------------|----------------------------------------------------|
//! | Shape/scalars  | [`Shape`], [`Scalar`] (`f32`, `f64`, `BigRational`) |
//! | Key algebras   | [`Word`], [`TensorBasis`], [`HallKey`], [`HallSet`], [`LieBasis`] |
//! | Vector store   | [`GradedVector`]                                   |
//! | Products       | [`ProductBasis`], [`FreeTensor`], [`Lie`]          |
//! | Series         | `exp` / `log` / `inverse`, [`Maps`], [`Cbh`]       |
//!
//! # Sizes
//!
//! ```text
//! tensor dimension  = 1 + W + W^2 + ... + W^N
//! Lie dimension     = sum_{d=1..N} (1/d) sum_{k | d} mu(k) W^(d/k)   (Witt)
//! ```
//!
//! For `W = 5, N = 5`: 3906 words and 829 Hall keys.
//!
//! # Example: log-signature two ways
//!
//! ```
//! use freealg::prelude::*;
//!
//! let shape = Shape::new(2, 4).unwrap();
//! let cbh = Cbh::<f64>::new(shape);
//! let maps = cbh.maps();
//!
//! let steps = [
//!     maps.lie_increment(&[0.5, -0.25]),
//!     maps.lie_increment(&[0.125, 1.0]),
//!     maps.lie_increment(&[-1.0, 0.5]),
//! ];
//! let refs: Vec<&Lie<f64>> = steps.iter().collect();
//!
//! let via_lie = cbh.full(&refs);
//! let via_tensor = maps.log_signature(steps.iter());
//! assert!((&via_lie - &via_tensor).norm_linf() < 1e-14);
//! assert_eq!(maps.lie_basis().dimension(), 8);
//! ```
//!
//! # Design Principles
//!
//! - **Generic scalars**: one implementation of every algorithm for any
//!   [`Scalar`]; exact rationals make identities testable bit for bit
//! - **Shape at runtime**: width and depth are values, bases are shared
//!   through `Rc`
//! - **Silent truncation**: products beyond the depth are dropped, never
//!   reported
//! - **Single-threaded**: caches use `RefCell`, so algebra types are
//!   `!Send`

mod algebra;
pub mod basis;
mod cbh;
mod error;
mod maps;
mod records;
mod scalar;
mod series;
mod shape;
pub mod vector;

pub use algebra::{FreeTensor, Lie, ProductBasis};
pub use basis::{Basis, HallKey, HallSet, Keys, LieBasis, LieTerms, TensorBasis, Word};
pub use cbh::Cbh;
pub use error::{AlgebraError, Result};
pub use maps::{Maps, TensorTerms};
pub use records::Records;
pub use scalar::Scalar;
pub use shape::{Letter, Shape, MAX_DEPTH, MAX_WIDTH};
pub use vector::GradedVector;

/// Common imports.
pub mod prelude {
    pub use crate::{
        Basis, Cbh, FreeTensor, GradedVector, HallKey, Lie, LieBasis, Maps, ProductBasis, Scalar,
        Shape, TensorBasis, Word,
    };
}
