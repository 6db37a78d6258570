//! Interpolation models relating the angular flux and its moments

// crate modules
use crate::error::{Error, Result};

/// How the moment operators are formed from a quadrature set
///
/// Every model evaluates `M` from the harmonics. They differ in the moments
/// retained and in how `D` follows:
///
/// | Model                      | Moments                        | D                       |
/// | -------------------------- | ------------------------------ | ----------------------- |
/// | [Sn](Self::Sn)             | fixed level symmetric map      | inverse of M            |
/// | [Galerkin](Self::Galerkin) | independent harmonics, any set | inverse of M            |
/// | [Svd](Self::Svd)           | complete shells up to an order | weighted pseudo-inverse |
///
/// SN and Galerkin use exactly as many moments as angles. SVD may use fewer.
///
/// ```rust
/// # use sntools_moments::InterpolationModel;
/// let model: InterpolationModel = "galerkin".parse().unwrap();
/// assert_eq!(model, InterpolationModel::Galerkin);
/// assert_eq!(model.to_string(), "GALERKIN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationModel {
    #[default]
    Sn,
    Galerkin,
    Svd,
}

impl InterpolationModel {
    /// Square models use one moment per angle
    pub fn is_square(&self) -> bool {
        !matches!(self, Self::Svd)
    }
}

impl TryFrom<&str> for InterpolationModel {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "SN" => Ok(Self::Sn),
            "GALERKIN" | "GQ" => Ok(Self::Galerkin),
            "SVD" => Ok(Self::Svd),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

impl std::str::FromStr for InterpolationModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for InterpolationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Sn => "SN",
            Self::Galerkin => "GALERKIN",
            Self::Svd => "SVD",
        };
        write!(f, "{s}")
    }
}
