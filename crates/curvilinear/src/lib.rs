//! Angular redistribution coefficients for curvilinear discrete ordinates
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod operator;

#[doc(inline)]
pub use operator::AngleOperator;

#[doc(inline)]
pub use error::{Error, Result};
