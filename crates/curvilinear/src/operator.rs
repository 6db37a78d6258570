//! Level structure and angular redistribution coefficients

// crate modules
use crate::error::{Error, Result};

// sntools modules
use sntools_quadrature::{Geometry, Ordinate, OrdinateSet, Quadrature, LEVEL_TOLERANCE};
use sntools_utils::{f, SliceExt};

// external crates
use itertools::Itertools;
use log::{debug, trace, warn};

// standard library
use std::f64::consts::PI;
use std::io::Write;

/// Largest accepted `alpha` at the end of a level
const CLOSURE_TOLERANCE: f64 = 1e-10;

/// Angular derivative bookkeeping for a quadrature on a mesh
///
/// The ordinates are those of an [OrdinateSet], grouped into levels of equal
/// `z` cosine. In curvilinear geometries every level opens with its
/// zero-weight starting direction, and every later ordinate of the level is
/// dependent on the one before it through
///
/// ```text
///     alpha(a) = alpha(a-1) + f w(a) x(a)         alpha(start) = 0
///     tau(a)   = (x(a) - x(a-1/2)) / (x(a+1/2) - x(a-1/2))
/// ```
///
/// where `w` are the weights normalised to sum to one, `f = 1` for
/// axisymmetric and `f = 2` for spherical geometry, and `x(a+1/2)` are the
/// cell edges of the level in `x`.
///
/// Cartesian geometry has no dependencies, so `alpha = 0` and `tau = 1`.
///
/// ```rust
/// # use sntools_curvilinear::AngleOperator;
/// # use sntools_quadrature::{Geometry, Quadrature};
/// let quadrature = Quadrature::gauss_legendre(2, None).unwrap();
/// let operator = AngleOperator::new(&quadrature, Geometry::Spherical, 1).unwrap();
///
/// assert_eq!(operator.number_of_levels(), 1);
/// assert_eq!(operator.alpha()[0], 0.0);
/// assert!((operator.alpha()[1] + 1.0 / 3.0_f64.sqrt()).abs() < 1e-15);
/// assert!(operator.is_dependent(2).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AngleOperator {
    ordinates: OrdinateSet,
    weights: Vec<f64>,
    number_of_levels: usize,
    levels: Vec<usize>,
    is_dependent: Vec<bool>,
    alpha: Vec<f64>,
    tau: Vec<f64>,
}

impl AngleOperator {
    /// Build the level structure and coefficients
    ///
    /// Fails for combinations the [OrdinateSet] cannot build, and for any
    /// level that carries no weight.
    pub fn new(quadrature: &Quadrature, geometry: Geometry, mesh_dimension: usize) -> Result<Self> {
        let ordinates = OrdinateSet::new(quadrature, geometry, mesh_dimension)?;
        let n = ordinates.len();

        let total: f64 = ordinates.iter().map(|o| o.wt()).sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(Error::NoWeight);
        }
        let weights = ordinates
            .iter()
            .map(|o| o.wt() / total)
            .collect::<Vec<f64>>();

        let levels = assign_levels(&ordinates)?;
        let number_of_levels = levels.iter().max().map_or(0, |l| l + 1);

        // curvilinear sets are sorted, holding each level contiguously
        let level_indices = (0..n)
            .chunk_by(|&a| levels[a])
            .into_iter()
            .map(|(level, group)| (level, group.collect::<Vec<usize>>()))
            .collect::<Vec<(usize, Vec<usize>)>>();

        let mut operator = Self {
            ordinates,
            weights,
            number_of_levels,
            levels,
            is_dependent: vec![false; n],
            alpha: vec![0.0; n],
            tau: vec![1.0; n],
        };

        let factor = match geometry {
            Geometry::Cartesian => None,
            Geometry::Axisymmetric => Some(1.0),
            Geometry::Spherical => Some(2.0),
        };

        if let Some(factor) = factor {
            for (level, indices) in level_indices {
                operator.close_level(level, &indices, geometry, factor)?;
            }
        }

        debug!(
            "{geometry} angle operator: {} ordinates over {} levels, {} dependent",
            n,
            operator.number_of_levels,
            operator.is_dependent.iter().filter(|d| **d).count()
        );

        Ok(operator)
    }

    /// Recursion over the ordinates of one level, starting direction first
    fn close_level(&mut self, level: usize, indices: &[usize], geometry: Geometry, factor: f64) -> Result<()> {
        let level_weight: f64 = indices.iter().map(|a| self.weights[*a]).sum();
        if level_weight <= 0.0 {
            return Err(Error::EmptyLevel { level });
        }

        let Some((&first, dependents)) = indices.split_first() else {
            return Err(Error::EmptyLevel { level });
        };

        let z = self.ordinates[first].z();
        let radius = (1.0 - z * z).max(0.0).sqrt();

        // lower edge of the first dependent interval
        let mut omega = PI;
        let mut lower = match geometry {
            Geometry::Spherical => -1.0,
            _ => -radius,
        };

        let mut previous = first;
        for &a in dependents {
            let w = self.weights[a];
            let x = self.ordinates[a].x();

            self.alpha[a] = self.alpha[previous] + factor * w * x;

            let upper = match geometry {
                Geometry::Spherical => lower + 2.0 * w / level_weight,
                _ => {
                    omega -= PI * w / level_weight;
                    radius * omega.cos()
                }
            };

            let width = upper - lower;
            if width <= 0.0 {
                return Err(Error::DegenerateInterval { index: a });
            }
            self.tau[a] = (x - lower) / width;
            self.is_dependent[a] = true;

            lower = upper;
            previous = a;
        }

        trace!(
            "level {level}: {} ordinates, weight {level_weight:.6}, closing alpha {:.3e}",
            indices.len(),
            self.alpha[previous]
        );

        Ok(())
    }

    fn check_index(&self, m: usize) -> Result<()> {
        if m < self.ordinates.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: m,
                length: self.ordinates.len(),
            })
        }
    }

    fn dependent(&self, m: usize) -> Result<()> {
        self.check_index(m)?;
        if self.is_dependent[m] {
            Ok(())
        } else {
            Err(Error::NotDependent { index: m })
        }
    }

    /// Ordinates in sweep order, starting directions included
    pub fn ordinates(&self) -> &OrdinateSet {
        &self.ordinates
    }

    pub fn geometry(&self) -> Geometry {
        self.ordinates.geometry()
    }

    pub fn mesh_dimension(&self) -> usize {
        self.ordinates.mesh_dimension()
    }

    pub fn number_of_ordinates(&self) -> usize {
        self.ordinates.len()
    }

    pub fn number_of_levels(&self) -> usize {
        self.number_of_levels
    }

    /// Level index of every ordinate
    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    /// Weights normalised to sum to one
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Whether ordinate `m` follows another in its level
    pub fn is_dependent(&self, m: usize) -> Result<bool> {
        self.check_index(m)?;
        Ok(self.is_dependent[m])
    }

    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn tau(&self) -> &[f64] {
        &self.tau
    }

    /// `alpha / (w tau)` for a dependent ordinate
    pub fn psi_coefficient(&self, m: usize) -> Result<f64> {
        self.dependent(m)?;
        Ok(self.alpha[m] / (self.weights[m] * self.tau[m]))
    }

    /// `(alpha (1 - tau) / tau + alpha(m-1)) / w` for a dependent ordinate
    pub fn source_coefficient(&self, m: usize) -> Result<f64> {
        self.dependent(m)?;
        let tau = self.tau[m];
        Ok((self.alpha[m] * (1.0 - tau) / tau + self.alpha[m - 1]) / self.weights[m])
    }

    /// `1 / tau` for a dependent ordinate
    pub fn bookkeeping_coefficient(&self, m: usize) -> Result<f64> {
        self.dependent(m)?;
        Ok(1.0 / self.tau[m])
    }

    /// Direction of ordinate `m` in the mesh, `[x, z]` in 2D and `[x]` in 1D
    pub fn projected_ordinate(&self, m: usize) -> Result<Vec<f64>> {
        self.check_index(m)?;
        let ordinate: &Ordinate = &self.ordinates[m];
        Ok(match self.mesh_dimension() {
            1 => vec![ordinate.x()],
            2 => vec![ordinate.x(), ordinate.z()],
            _ => ordinate.cosines().to_vec(),
        })
    }

    /// Value of `alpha` closing each level
    fn closing_alpha(&self) -> Vec<(usize, f64)> {
        (0..self.ordinates.len())
            .chunk_by(|&a| self.levels[a])
            .into_iter()
            .filter_map(|(level, group)| group.last().map(|a| (level, self.alpha[a])))
            .collect()
    }

    /// Advisory check of a quadrature against a geometry and mesh dimension
    ///
    /// Returns false and writes a diagnostic for each problem found: a set
    /// that cannot be built, a level whose `alpha` does not return to zero,
    /// or an axisymmetric 2D set whose levels disagree with the quadrature.
    ///
    /// ```rust
    /// # use sntools_curvilinear::AngleOperator;
    /// # use sntools_quadrature::{Geometry, Quadrature};
    /// let quadrature = Quadrature::level_symmetric(4, 2, None).unwrap();
    /// let mut diagnostics = Vec::new();
    /// assert!(AngleOperator::is_compatible(&quadrature, Geometry::Axisymmetric, 2, &mut diagnostics));
    /// assert!(!AngleOperator::is_compatible(&quadrature, Geometry::Spherical, 2, &mut diagnostics));
    /// assert!(!diagnostics.is_empty());
    /// ```
    pub fn is_compatible(
        quadrature: &Quadrature,
        geometry: Geometry,
        dimension: usize,
        diagnostics: &mut dyn Write,
    ) -> bool {
        let mut report = |message: String| {
            warn!("{message}");
            // diagnostics are advisory, a failed write changes nothing
            let _ = writeln!(diagnostics, "{message}");
        };

        let operator = match Self::new(quadrature, geometry, dimension) {
            Ok(operator) => operator,
            Err(e) => {
                report(f!(
                    "{} cannot be used for {geometry} geometry in {dimension}D: {e}",
                    quadrature.name()
                ));
                return false;
            }
        };

        let mut compatible = true;

        if geometry.is_curvilinear() {
            for (level, alpha) in operator.closing_alpha() {
                if alpha.abs() > CLOSURE_TOLERANCE {
                    report(f!(
                        "{}: alpha does not close on level {level}, found {alpha:.6e}",
                        quadrature.name()
                    ));
                    compatible = false;
                }
            }
        }

        if geometry == Geometry::Axisymmetric
            && dimension == 2
            && quadrature.dimensionality() == 2
            && operator.number_of_levels() != quadrature.levels()
        {
            report(f!(
                "{}: found {} levels but the quadrature defines {}",
                quadrature.name(),
                operator.number_of_levels(),
                quadrature.levels()
            ));
            compatible = false;
        }

        compatible
    }
}

/// Level index of every ordinate from its `z` cosine
fn assign_levels(ordinates: &[Ordinate]) -> Result<Vec<usize>> {
    let z = ordinates.iter().map(|o| o.z()).collect::<Vec<f64>>();
    let values = z.unique_within(LEVEL_TOLERANCE)?;

    Ok(z.iter()
        .map(|z| {
            values
                .iter()
                .rposition(|value| *value <= z + LEVEL_TOLERANCE)
                .unwrap_or(0)
        })
        .collect())
}
