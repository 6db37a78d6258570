//! Quadrature configuration and the single factory

// crate modules
use crate::error::{Error, Result};
use crate::family::{QuadratureClass, QuadratureFamily};
use crate::general::OrdinateTable;
use crate::parser::parse_block;
use crate::quadrature::Quadrature;

// external crates
use log::debug;
use serde::{Deserialize, Serialize};

// standard library
use std::path::Path;

/// Everything needed to build a [Quadrature]
///
/// A configuration can be built directly, deserialised from JSON, or parsed
/// from a keyword block.
///
/// ```rust
/// # use sntools_quadrature::{QuadratureConfig, QuadratureFamily};
/// let config: QuadratureConfig = "
///     level symmetric
///       order 4
///       dimension 3
///     end".parse().unwrap();
///
/// assert_eq!(config.family, QuadratureFamily::LevelSymmetric);
/// assert_eq!(config.order, 4);
/// assert_eq!(config.dimension, Some(3));
///
/// let quadrature = config.build().unwrap();
/// assert_eq!(quadrature.num_angles(), 24);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadratureConfig {
    /// Family selector
    pub family: QuadratureFamily,
    /// SN order
    pub order: usize,
    /// Requested dimension, the family default if not given
    #[serde(default)]
    pub dimension: Option<usize>,
    /// Sum of the weights, 2, 2pi or 4pi by dimension if not given
    #[serde(default)]
    pub norm: Option<f64>,
    /// Number of levels for general sets
    #[serde(default)]
    pub levels: Option<usize>,
    /// Class of a general octant, a complete general set if not given
    #[serde(default)]
    pub class: Option<QuadratureClass>,
    /// Name of a general set
    #[serde(default)]
    pub name: Option<String>,
    /// Directions and weights of a general set
    #[serde(default)]
    pub ordinates: Option<OrdinateTable>,
}

impl QuadratureConfig {
    /// Minimal configuration for a family and order
    pub fn new(family: QuadratureFamily, order: usize) -> Self {
        Self {
            family,
            order,
            dimension: None,
            norm: None,
            levels: None,
            class: None,
            name: None,
            ordinates: None,
        }
    }

    /// Deserialise a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build the configured quadrature, see [create_quadrature]
    pub fn build(&self) -> Result<Quadrature> {
        create_quadrature(self)
    }
}

impl std::str::FromStr for QuadratureConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_block(s)
    }
}

impl std::fmt::Display for QuadratureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.family)?;
        writeln!(f, "  order {}", self.order)?;
        if let Some(dimension) = self.dimension {
            writeln!(f, "  dimension {dimension}")?;
        }
        if let Some(norm) = self.norm {
            writeln!(f, "  norm {norm}")?;
        }
        if let Some(levels) = self.levels {
            writeln!(f, "  levels {levels}")?;
        }
        write!(f, "end")
    }
}

/// Build a [Quadrature] for any family from its configuration
///
/// This is the one place family selectors are turned into sets, and every
/// configuration error surfaces here before anything is returned.
///
/// ```rust
/// # use sntools_quadrature::{create_quadrature, QuadratureConfig, QuadratureFamily};
/// let config = QuadratureConfig::new(QuadratureFamily::GaussLegendre, 8);
/// let quadrature = create_quadrature(&config).unwrap();
/// assert_eq!(quadrature.name(), "1D Gauss Legendre");
/// assert_eq!(quadrature.num_angles(), 8);
///
/// // a 3D Gauss-Legendre set is a configuration error
/// let config = QuadratureConfig { dimension: Some(3), ..config };
/// assert!(create_quadrature(&config).is_err());
/// ```
pub fn create_quadrature(config: &QuadratureConfig) -> Result<Quadrature> {
    let family = config.family;
    let dimension = config.dimension.unwrap_or(family.default_dimension());
    debug!(
        "creating {family} S{} quadrature in {dimension}D",
        config.order
    );

    let fixed_dimension = |expected: usize| -> Result<()> {
        if dimension == expected {
            Ok(())
        } else {
            Err(Error::UnsupportedDimension {
                family: family.to_string(),
                dimension,
            })
        }
    };

    match family {
        QuadratureFamily::GaussLegendre => {
            fixed_dimension(1)?;
            Quadrature::gauss_legendre(config.order, config.norm)
        }
        QuadratureFamily::DoubleGauss => {
            fixed_dimension(1)?;
            Quadrature::double_gauss(config.order, config.norm)
        }
        QuadratureFamily::SquareCL => {
            fixed_dimension(2)?;
            Quadrature::square_chebyshev_legendre(config.order, config.norm)
        }
        QuadratureFamily::LevelSymmetric => {
            Quadrature::level_symmetric(config.order, dimension, config.norm)
        }
        QuadratureFamily::General => {
            let table = config
                .ordinates
                .clone()
                .ok_or_else(|| Error::MissingOrdinates {
                    family: family.to_string(),
                })?;
            let levels = config.levels.unwrap_or(config.order);

            match config.class {
                Some(class) => {
                    fixed_dimension(3)?;
                    Quadrature::general_octant(table, levels, class, config.norm)
                }
                None => {
                    let name = config.name.as_deref().unwrap_or("General Quadrature");
                    Quadrature::general(name, dimension, config.order, levels, config.norm, table)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_requires_ordinates() {
        let config = QuadratureConfig::new(QuadratureFamily::General, 2);
        assert!(matches!(
            create_quadrature(&config),
            Err(Error::MissingOrdinates { .. })
        ));
    }

    #[test]
    fn display_round_trips_through_parser() {
        let config = QuadratureConfig {
            dimension: Some(2),
            norm: Some(1.0),
            ..QuadratureConfig::new(QuadratureFamily::SquareCL, 6)
        };
        let text = config.to_string();
        assert_eq!(text.parse::<QuadratureConfig>().unwrap(), config);
    }
}
