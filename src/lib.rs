//! `sntools` is a modular toolkit for discrete ordinates quadrature and the
//! angular moment operators built on top of it
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use sntools_utils as utils;

#[cfg(feature = "quadrature")]
#[cfg_attr(docsrs, doc(cfg(feature = "quadrature")))]
#[doc(inline)]
pub use sntools_quadrature as quadrature;

#[cfg(feature = "moments")]
#[cfg_attr(docsrs, doc(cfg(feature = "moments")))]
#[doc(inline)]
pub use sntools_moments as moments;

#[cfg(feature = "curvilinear")]
#[cfg_attr(docsrs, doc(cfg(feature = "curvilinear")))]
#[doc(inline)]
pub use sntools_curvilinear as curvilinear;
