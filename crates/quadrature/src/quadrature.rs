//! The quadrature sum type and its shared angle table

// crate modules
use crate::chebyshev::square_chebyshev_legendre;
use crate::error::{Error, Result};
use crate::family::{QuadratureClass, QuadratureFamily};
use crate::gauss::{double_gauss_table, gauss_legendre_table};
use crate::general::{general_octant_table, general_table, OrdinateTable};
use crate::harmonics::default_norm;
use crate::level_symmetric::{level_symmetric_2d, level_symmetric_3d};
use crate::ordinate::Ordinate;

// sntools modules
use sntools_utils::{f, SoftEquiv, ValueExt};

// external crates
use log::debug;

/// Relative tolerance on the total weight
const WEIGHT_TOLERANCE: f64 = 1e-10;

/// Tolerance on the first and second angular moments, relative to the norm
const MOMENT_TOLERANCE: f64 = 1e-8;

/// Direction cosines and weights shared by every quadrature family
///
/// Arrays are parallel and of length `num_angles`. Components a set does not
/// carry are empty, so 1D sets only have `mu`.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleTable {
    pub(crate) sn_order: usize,
    pub(crate) norm: f64,
    pub(crate) mu: Vec<f64>,
    pub(crate) eta: Vec<f64>,
    pub(crate) xi: Vec<f64>,
    pub(crate) wt: Vec<f64>,
}

impl AngleTable {
    pub(crate) fn new(
        sn_order: usize,
        norm: f64,
        mu: Vec<f64>,
        eta: Vec<f64>,
        xi: Vec<f64>,
        wt: Vec<f64>,
    ) -> Self {
        Self {
            sn_order,
            norm,
            mu,
            eta,
            xi,
            wt,
        }
    }

    pub(crate) fn new_1d(sn_order: usize, norm: f64, mu: Vec<f64>, wt: Vec<f64>) -> Self {
        Self::new(sn_order, norm, mu, vec![], vec![], wt)
    }

    /// Cosine `c` of direction `m`, zero when the component is not carried
    fn component(values: &[f64], m: usize) -> f64 {
        values.get(m).copied().unwrap_or(0.0)
    }

    fn omega(&self, m: usize) -> [f64; 3] {
        [
            Self::component(&self.mu, m),
            Self::component(&self.eta, m),
            Self::component(&self.xi, m),
        ]
    }
}

/// A discrete ordinates quadrature set
///
/// Every family is a variant of one closed type. Construction goes through
/// the family constructors below or the [create_quadrature](crate::create_quadrature)
/// factory, and always checks the closure of the set before returning it.
///
/// | Variant                  | Name                            | Angles       |
/// | ------------------------ | ------------------------------- | ------------ |
/// | `GaussLegendre`          | 1D Gauss Legendre               | `N`          |
/// | `DoubleGauss`            | 1D Double Gauss                 | `N`          |
/// | `LevelSymmetric2D`       | 2D Level Symmetric              | `N(N+2)/2`   |
/// | `LevelSymmetric3D`       | 3D Level Symmetric              | `N(N+2)`     |
/// | `SquareChebyshevLegendre`| 2D Square Chebyshev Legendre    | `N^2`        |
/// | `General`                | user supplied                   | any          |
/// | `GeneralOctant`          | General Octant Quadrature       | `8n`         |
///
/// The default normalisation is 2 in 1D, 2pi in 2D and 4pi in 3D.
///
/// ```rust
/// # use sntools_quadrature::Quadrature;
/// let quadrature = Quadrature::level_symmetric(4, 3, None).unwrap();
/// assert_eq!(quadrature.num_angles(), 24);
/// assert_eq!(quadrature.name(), "3D Level Symmetric");
/// assert!((quadrature.i_domega() - 4.0 * std::f64::consts::PI).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Quadrature {
    GaussLegendre(AngleTable),
    DoubleGauss(AngleTable),
    LevelSymmetric2D(AngleTable),
    LevelSymmetric3D(AngleTable),
    SquareChebyshevLegendre(AngleTable),
    General {
        name: String,
        dimension: usize,
        levels: usize,
        table: AngleTable,
    },
    GeneralOctant {
        levels: usize,
        class: QuadratureClass,
        open_interval: bool,
        table: AngleTable,
    },
}

impl Quadrature {
    /// 1D Gauss-Legendre set of any positive order
    pub fn gauss_legendre(sn_order: usize, norm: Option<f64>) -> Result<Self> {
        let norm = norm.unwrap_or(default_norm(1));
        Self::GaussLegendre(gauss_legendre_table(sn_order, norm)?).checked()
    }

    /// 1D double-Gauss set, the order must be even
    pub fn double_gauss(sn_order: usize, norm: Option<f64>) -> Result<Self> {
        let norm = norm.unwrap_or(default_norm(1));
        Self::DoubleGauss(double_gauss_table(sn_order, norm)?).checked()
    }

    /// Level symmetric set in 2D or 3D, even orders from S2 to S16
    pub fn level_symmetric(sn_order: usize, dimension: usize, norm: Option<f64>) -> Result<Self> {
        let norm = norm.unwrap_or(default_norm(dimension));
        match dimension {
            2 => Self::LevelSymmetric2D(level_symmetric_2d(sn_order, norm)?).checked(),
            3 => Self::LevelSymmetric3D(level_symmetric_3d(sn_order, norm)?).checked(),
            _ => Err(Error::UnsupportedDimension {
                family: QuadratureFamily::LevelSymmetric.to_string(),
                dimension,
            }),
        }
    }

    /// 2D square Chebyshev-Legendre set with `sn_order` levels
    pub fn square_chebyshev_legendre(sn_order: usize, norm: Option<f64>) -> Result<Self> {
        let norm = norm.unwrap_or(default_norm(2));
        Self::SquareChebyshevLegendre(square_chebyshev_legendre(sn_order, norm)?).checked()
    }

    /// Arbitrary user set
    ///
    /// Every direction must be a unit vector (a cosine within `[-1, 1]` in 1D)
    /// and the weights must sum to the norm.
    ///
    /// ```rust
    /// # use sntools_quadrature::{OrdinateTable, Quadrature};
    /// let table = OrdinateTable {
    ///     mu: vec![-0.5, 0.5],
    ///     wt: vec![1.0, 1.0],
    ///     ..Default::default()
    /// };
    /// let quadrature = Quadrature::general("two stream", 1, 2, 1, None, table).unwrap();
    /// assert_eq!(quadrature.name(), "two stream");
    /// assert_eq!(quadrature.dimensionality(), 1);
    /// ```
    pub fn general(
        name: &str,
        dimension: usize,
        sn_order: usize,
        levels: usize,
        norm: Option<f64>,
        table: OrdinateTable,
    ) -> Result<Self> {
        let norm = norm.unwrap_or(default_norm(dimension));
        Self::General {
            name: name.to_string(),
            dimension,
            levels,
            table: general_table(sn_order, norm, dimension, table)?,
        }
        .checked()
    }

    /// Full 3D set from a single user octant
    ///
    /// The number of octant directions must match the `class` for the given
    /// number of levels, `L(L+2) = 8n` for triangles and `2L^2 = 8n` for
    /// squares. Interval classes are rejected.
    pub fn general_octant(
        octant: OrdinateTable,
        levels: usize,
        class: QuadratureClass,
        norm: Option<f64>,
    ) -> Result<Self> {
        let norm = norm.unwrap_or(default_norm(3));
        let (table, open_interval) = general_octant_table(octant, levels, class, norm)?;
        Self::GeneralOctant {
            levels,
            class,
            open_interval,
            table,
        }
        .checked()
    }

    /// Validate closure and report the new set
    fn checked(self) -> Result<Self> {
        self.check_closure()?;
        debug!(
            "built {} S{} with {} angles, norm {}",
            self.name(),
            self.sn_order(),
            self.num_angles(),
            self.norm().sci(5, 2)
        );
        Ok(self)
    }

    fn table(&self) -> &AngleTable {
        match self {
            Self::GaussLegendre(table)
            | Self::DoubleGauss(table)
            | Self::LevelSymmetric2D(table)
            | Self::LevelSymmetric3D(table)
            | Self::SquareChebyshevLegendre(table) => table,
            Self::General { table, .. } | Self::GeneralOctant { table, .. } => table,
        }
    }

    /// Official name of the set
    pub fn name(&self) -> &str {
        match self {
            Self::GaussLegendre(_) => "1D Gauss Legendre",
            Self::DoubleGauss(_) => "1D Double Gauss",
            Self::LevelSymmetric2D(_) => "2D Level Symmetric",
            Self::LevelSymmetric3D(_) => "3D Level Symmetric",
            Self::SquareChebyshevLegendre(_) => "2D Square Chebyshev Legendre",
            Self::General { name, .. } => name.as_str(),
            Self::GeneralOctant { .. } => "General Octant Quadrature",
        }
    }

    /// Selector family the set belongs to
    pub fn family(&self) -> QuadratureFamily {
        match self {
            Self::GaussLegendre(_) => QuadratureFamily::GaussLegendre,
            Self::DoubleGauss(_) => QuadratureFamily::DoubleGauss,
            Self::LevelSymmetric2D(_) | Self::LevelSymmetric3D(_) => QuadratureFamily::LevelSymmetric,
            Self::SquareChebyshevLegendre(_) => QuadratureFamily::SquareCL,
            Self::General { .. } | Self::GeneralOctant { .. } => QuadratureFamily::General,
        }
    }

    pub fn dimensionality(&self) -> usize {
        match self {
            Self::GaussLegendre(_) | Self::DoubleGauss(_) => 1,
            Self::LevelSymmetric2D(_) | Self::SquareChebyshevLegendre(_) => 2,
            Self::LevelSymmetric3D(_) | Self::GeneralOctant { .. } => 3,
            Self::General { dimension, .. } => *dimension,
        }
    }

    /// Layout of the directions over the levels
    pub fn class(&self) -> QuadratureClass {
        match self {
            Self::GaussLegendre(_) | Self::DoubleGauss(_) => QuadratureClass::Interval,
            Self::LevelSymmetric2D(_) | Self::LevelSymmetric3D(_) => QuadratureClass::Triangle,
            Self::SquareChebyshevLegendre(_) => QuadratureClass::Square,
            Self::General { dimension: 1, .. } => QuadratureClass::Interval,
            Self::General { .. } => QuadratureClass::Triangle,
            Self::GeneralOctant { class, .. } => *class,
        }
    }

    /// Number of distinct levels, 1 for interval sets
    pub fn levels(&self) -> usize {
        match self {
            Self::GaussLegendre(_) | Self::DoubleGauss(_) => 1,
            Self::General { levels, .. } | Self::GeneralOctant { levels, .. } => *levels,
            _ => self.sn_order(),
        }
    }

    /// True when the set contains the `xi = -1` pole direction
    pub fn is_open_interval(&self) -> bool {
        matches!(
            self,
            Self::GeneralOctant {
                open_interval: true,
                ..
            }
        )
    }

    pub fn sn_order(&self) -> usize {
        self.table().sn_order
    }

    pub fn norm(&self) -> f64 {
        self.table().norm
    }

    pub fn num_angles(&self) -> usize {
        self.table().wt.len()
    }

    pub fn mu(&self) -> &[f64] {
        &self.table().mu
    }

    /// Second cosines, empty for 1D sets
    pub fn eta(&self) -> &[f64] {
        &self.table().eta
    }

    /// Third cosines, empty for 1D sets and positive for 2D sets
    pub fn xi(&self) -> &[f64] {
        &self.table().xi
    }

    pub fn wt(&self) -> &[f64] {
        &self.table().wt
    }

    fn check_index(&self, m: usize) -> Result<()> {
        if m < self.num_angles() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: m,
                length: self.num_angles(),
            })
        }
    }

    pub fn get_mu(&self, m: usize) -> Result<f64> {
        self.check_index(m)?;
        Ok(self.mu()[m])
    }

    pub fn get_eta(&self, m: usize) -> Result<f64> {
        self.check_index(m)?;
        Ok(AngleTable::component(self.eta(), m))
    }

    pub fn get_xi(&self, m: usize) -> Result<f64> {
        self.check_index(m)?;
        Ok(AngleTable::component(self.xi(), m))
    }

    pub fn get_wt(&self, m: usize) -> Result<f64> {
        self.check_index(m)?;
        Ok(self.wt()[m])
    }

    /// Direction `[mu, eta, xi]` of angle `m`, zero for missing components
    pub fn omega(&self, m: usize) -> Result<[f64; 3]> {
        self.check_index(m)?;
        Ok(self.table().omega(m))
    }

    /// Angle `m` as an [Ordinate]
    ///
    /// The `z` cosine of the ordinate is always the level-defining one, so
    /// the components are arranged by dimension.
    ///
    /// | Dimension | x    | y    | z    |
    /// | --------- | ---- | ---- | ---- |
    /// | 1         | mu   | 0    | 0    |
    /// | 2         | mu   | xi   | eta  |
    /// | 3         | mu   | eta  | xi   |
    pub fn ordinate(&self, m: usize) -> Result<Ordinate> {
        let [mu, eta, xi] = self.omega(m)?;
        let wt = self.wt()[m];
        Ok(match self.dimensionality() {
            1 => Ordinate::from_parts(mu, 0.0, 0.0, wt),
            2 => Ordinate::from_parts(mu, xi, eta, wt),
            _ => Ordinate::from_parts(mu, eta, xi, wt),
        })
    }

    /// Every angle as an [Ordinate], in quadrature order
    pub fn ordinates(&self) -> Vec<Ordinate> {
        (0..self.num_angles())
            .filter_map(|m| self.ordinate(m).ok())
            .collect()
    }

    /// Integral of one over the unit sphere, `sum(wt)`
    pub fn i_domega(&self) -> f64 {
        self.wt().iter().sum()
    }

    /// First angular moment, `sum(wt * omega)`
    pub fn i_omega_domega(&self) -> [f64; 3] {
        let table = self.table();
        let mut moment = [0.0; 3];
        for (m, w) in table.wt.iter().enumerate() {
            for (total, c) in moment.iter_mut().zip(table.omega(m)) {
                *total += w * c;
            }
        }
        moment
    }

    /// Second angular moment, `sum(wt * omega omega)`
    pub fn i_omega_omega_domega(&self) -> [[f64; 3]; 3] {
        let table = self.table();
        let mut moment = [[0.0; 3]; 3];
        for (m, w) in table.wt.iter().enumerate() {
            let omega = table.omega(m);
            for i in 0..3 {
                for j in 0..3 {
                    moment[i][j] += w * omega[i] * omega[j];
                }
            }
        }
        moment
    }

    /// Whether the family integrates quadratic functions of direction
    fn integrates_quadratics(&self) -> bool {
        match self {
            Self::GaussLegendre(table) => table.sn_order >= 2,
            Self::DoubleGauss(table) => table.sn_order >= 4,
            Self::LevelSymmetric2D(_) | Self::LevelSymmetric3D(_) | Self::SquareChebyshevLegendre(_) => true,
            Self::General { .. } | Self::GeneralOctant { .. } => false,
        }
    }

    /// Check the set against the angular integrals it should reproduce
    ///
    /// The weights must sum to the norm, and for generated sets the first
    /// moment must vanish in-plane with the second moment `norm/3` on the
    /// diagonal of every carried component.
    pub fn check_closure(&self) -> Result<()> {
        let norm = self.norm();
        let sum = self.i_domega();
        if !sum.soft_equiv(&norm, WEIGHT_TOLERANCE) {
            return Err(Error::ClosureFailure {
                check: "iDomega",
                expected: norm,
                found: sum,
            });
        }

        if matches!(self, Self::General { .. }) {
            return Ok(());
        }

        // xi is the out-of-plane half space in 2D
        let carried = self.dimensionality();

        let first = self.i_omega_domega();
        if let Some(found) = first.iter().take(carried).find(|c| c.abs() > MOMENT_TOLERANCE * norm) {
            return Err(Error::ClosureFailure {
                check: "iOmegaDomega",
                expected: 0.0,
                found: *found,
            });
        }

        if self.integrates_quadratics() {
            let second = self.i_omega_omega_domega();
            let dims = if self.dimensionality() == 1 { 1 } else { 3 };
            for i in 0..dims {
                for j in 0..dims {
                    let expected = if i == j { norm / 3.0 } else { 0.0 };
                    if (second[i][j] - expected).abs() > MOMENT_TOLERANCE * norm {
                        return Err(Error::ClosureFailure {
                            check: "iOmegaOmegaDomega",
                            expected,
                            found: second[i][j],
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Quadrature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{} S{}: {} angles, {} levels, norm {}",
            self.name(),
            self.sn_order(),
            self.num_angles(),
            self.levels(),
            self.norm().sci(5, 2)
        )?;
        writeln!(
            f,
            "{:>6} {:>13} {:>13} {:>13} {:>13}",
            "m", "mu", "eta", "xi", "wt"
        )?;
        for m in 0..self.num_angles() {
            let [mu, eta, xi] = self.table().omega(m);
            let s = f!(
                "{:>6} {:>13} {:>13} {:>13} {:>13}",
                m,
                mu.sci(5, 2),
                eta.sci(5, 2),
                xi.sci(5, 2),
                self.wt()[m].sci(5, 2)
            );
            writeln!(f, "{}", s.trim_end())?;
        }
        write!(f, "{:>6} {:>55}", "sum", self.i_domega().sci(5, 2))
    }
}
