//! Moment operators between the angular flux and its harmonic moments
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod index;
mod matrix;
mod model;
mod services;

#[doc(inline)]
pub use services::QuadServices;

#[doc(inline)]
pub use index::{compute_n2lk, shell, LkIndex};

#[doc(inline)]
pub use matrix::DenseMatrix;

#[doc(inline)]
pub use model::InterpolationModel;

// helpers shared with the quadrature harmonics
#[doc(inline)]
pub use sntools_quadrature::harmonics::{factorial, kronecker_delta};

#[doc(inline)]
pub use error::{Error, Result};
