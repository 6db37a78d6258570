//! Selector types for quadrature families, classes and geometries

// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Family of angular discretisation
///
/// Parsing is case-insensitive and accepts the usual selector strings.
///
/// | Family                          | Selector            | Dimension |
/// | ------------------------------- | ------------------- | --------- |
/// | [GaussLegendre](Self::GaussLegendre) | "gauss legendre"   | 1         |
/// | [LevelSymmetric](Self::LevelSymmetric) | "level symmetric" | 2 or 3    |
/// | [SquareCL](Self::SquareCL)      | "square CL"         | 2         |
/// | [DoubleGauss](Self::DoubleGauss) | "double gauss"     | 1         |
/// | [General](Self::General)        | "general"           | any       |
///
/// ```rust
/// # use sntools_quadrature::QuadratureFamily;
/// let family: QuadratureFamily = "Level Symmetric".parse().unwrap();
/// assert_eq!(family, QuadratureFamily::LevelSymmetric);
/// assert_eq!(family.to_string(), "level symmetric");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadratureFamily {
    #[serde(rename = "gauss legendre")]
    GaussLegendre,
    #[serde(rename = "level symmetric")]
    LevelSymmetric,
    #[serde(rename = "square CL")]
    SquareCL,
    #[serde(rename = "double gauss")]
    DoubleGauss,
    #[serde(rename = "general")]
    General,
}

impl QuadratureFamily {
    /// Dimensionality used when none is requested
    pub fn default_dimension(&self) -> usize {
        match self {
            Self::GaussLegendre | Self::DoubleGauss => 1,
            Self::LevelSymmetric | Self::SquareCL => 2,
            Self::General => 3,
        }
    }
}

impl TryFrom<&str> for QuadratureFamily {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let normalised = s.split_whitespace().collect::<Vec<&str>>().join(" ");
        match normalised.to_lowercase().as_str() {
            "gauss legendre" | "gauss-legendre" | "gaussleg" => Ok(Self::GaussLegendre),
            "level symmetric" | "level-symmetric" | "levelsym" => Ok(Self::LevelSymmetric),
            "square cl" | "square chebyshev legendre" => Ok(Self::SquareCL),
            "double gauss" | "double-gauss" => Ok(Self::DoubleGauss),
            "general" => Ok(Self::General),
            _ => Err(Error::UnknownFamily(s.to_string())),
        }
    }
}

impl std::str::FromStr for QuadratureFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for QuadratureFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::GaussLegendre => "gauss legendre",
            Self::LevelSymmetric => "level symmetric",
            Self::SquareCL => "square CL",
            Self::DoubleGauss => "double gauss",
            Self::General => "general",
        };
        write!(f, "{s}")
    }
}

/// Layout of the ordinates over the levels of a set
///
/// Triangular sets lose ordinates on each level moving towards the pole,
/// square sets keep the same number on every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadratureClass {
    Interval,
    Triangle,
    Square,
}

impl TryFrom<&str> for QuadratureClass {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "interval" => Ok(Self::Interval),
            "triangle" | "triangular" => Ok(Self::Triangle),
            "square" => Ok(Self::Square),
            _ => Err(Error::UnknownClass(s.to_string())),
        }
    }
}

impl std::str::FromStr for QuadratureClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for QuadratureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Interval => "interval",
            Self::Triangle => "triangle",
            Self::Square => "square",
        };
        write!(f, "{s}")
    }
}

/// Mesh geometry the ordinates are swept through
///
/// ```rust
/// # use sntools_quadrature::Geometry;
/// assert_eq!(Geometry::try_from("RZ").unwrap(), Geometry::Axisymmetric);
/// assert!(Geometry::Spherical.is_curvilinear());
/// assert!(!Geometry::Cartesian.is_curvilinear());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    #[default]
    Cartesian,
    Axisymmetric,
    Spherical,
}

impl Geometry {
    /// True for geometries with angular redistribution terms
    pub fn is_curvilinear(&self) -> bool {
        !matches!(self, Self::Cartesian)
    }
}

impl TryFrom<&str> for Geometry {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cartesian" | "xyz" | "slab" => Ok(Self::Cartesian),
            "axisymmetric" | "rz" | "cylindrical" => Ok(Self::Axisymmetric),
            "spherical" | "sphere" => Ok(Self::Spherical),
            _ => Err(Error::UnknownGeometry(s.to_string())),
        }
    }
}

impl std::str::FromStr for Geometry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Cartesian => "cartesian",
            Self::Axisymmetric => "axisymmetric",
            Self::Spherical => "spherical",
        };
        write!(f, "{s}")
    }
}
