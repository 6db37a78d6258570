//! Discrete ordinates quadrature sets and real spherical harmonics
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod chebyshev;
mod config;
mod error;
mod family;
mod gauss;
mod general;
mod level_symmetric;
mod ordinate;
mod ordinate_set;
mod parser;
mod quadrature;

pub mod harmonics;

// inline the important types for a nice public API
#[doc(inline)]
pub use quadrature::{AngleTable, Quadrature};

#[doc(inline)]
pub use config::{create_quadrature, QuadratureConfig};

#[doc(inline)]
pub use family::{Geometry, QuadratureClass, QuadratureFamily};

#[doc(inline)]
pub use general::OrdinateTable;

#[doc(inline)]
pub use gauss::gauss_legendre;

#[doc(inline)]
pub use ordinate::{sn_compare, Ordinate};

#[doc(inline)]
pub use ordinate_set::{OrdinateSet, LEVEL_TOLERANCE};

#[doc(inline)]
pub use error::{Error, Result};
