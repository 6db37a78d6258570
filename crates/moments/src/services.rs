//! Moment operators of a quadrature set

// crate modules
use crate::error::{Error, Result};
use crate::index::{compute_n2lk, validate_n2lk, LkIndex};
use crate::matrix::DenseMatrix;
use crate::model::InterpolationModel;

// sntools modules
use sntools_quadrature::harmonics::{azimuthal_angle, tesseral};
use sntools_quadrature::{Ordinate, Quadrature};
use sntools_utils::SoftEquiv;

// external crates
use itertools::Itertools;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

// standard library
use std::io::Write;

/// Absolute tolerance on `D M = I`
const INVERSE_TOLERANCE: f64 = 1e-8;

/// Relative tolerance on the first row of `D` against the weights
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Smallest accepted ratio of singular values for SVD interpolation
const RANK_TOLERANCE: f64 = 1e-10;

/// The moment-to-discrete and discrete-to-moment operators of a quadrature
///
/// `M` is `num_angles x num_moments` and maps moments onto the angular flux,
/// with entries
///
/// ```text
///     M[m,n] = (2l+1)/norm * c(l,k) P(l,|k|)(mu_m) T(k)(phi_m)
/// ```
///
/// for the moment `n = (l,k)`, whatever the [InterpolationModel]. `D` is
/// `num_moments x num_angles` and maps the angular flux back onto moments.
/// SN and Galerkin are square and take `D = M^-1`, while SVD takes a
/// weighted pseudo-inverse. The models differ in the moments retained, see
/// [compute_n2lk].
///
/// ```rust
/// # use sntools_moments::{InterpolationModel, QuadServices};
/// # use sntools_quadrature::Quadrature;
/// let quadrature = Quadrature::gauss_legendre(2, None).unwrap();
/// let services = QuadServices::new(&quadrature, InterpolationModel::Sn, None).unwrap();
///
/// // a uniform flux of 7 has scalar flux 14 and no current
/// let phi = services.apply_d(&[7.0, 7.0]).unwrap();
/// assert!((phi[0] - 14.0).abs() < 1e-12 && phi[1].abs() < 1e-12);
///
/// let psi = services.apply_m(&[7.0, 0.0]).unwrap();
/// assert!((psi[0] - 3.5).abs() < 1e-12 && (psi[1] - 3.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuadServices {
    model: InterpolationModel,
    dimension: usize,
    norm: f64,
    ordinates: Vec<Ordinate>,
    n2lk: Vec<LkIndex>,
    m: DenseMatrix,
    d: DenseMatrix,
}

impl QuadServices {
    /// Operators using the standard moments of a model
    ///
    /// The `expansion_order` is only accepted for SVD interpolation, see
    /// [compute_n2lk] for the moments chosen.
    pub fn new(
        quadrature: &Quadrature,
        model: InterpolationModel,
        expansion_order: Option<usize>,
    ) -> Result<Self> {
        let n2lk = compute_n2lk(quadrature, model, expansion_order)?;
        Self::build(quadrature, model, n2lk)
    }

    /// Operators for an explicit list of moments
    ///
    /// Every moment must satisfy `|k| <= l`, be resolved by the quadrature
    /// dimension and appear once. SN and Galerkin need one moment per angle,
    /// SVD no more moments than angles.
    ///
    /// ```rust
    /// # use sntools_moments::{InterpolationModel, LkIndex, QuadServices};
    /// # use sntools_quadrature::Quadrature;
    /// let quadrature = Quadrature::gauss_legendre(8, None).unwrap();
    /// let n2lk = vec![LkIndex::new(0, 0), LkIndex::new(1, 0)];
    /// let services = QuadServices::with_moments(&quadrature, InterpolationModel::Svd, n2lk).unwrap();
    /// assert_eq!(services.num_moments(), 2);
    /// assert!(services.d_equals_m_inverse());
    /// ```
    pub fn with_moments(
        quadrature: &Quadrature,
        model: InterpolationModel,
        n2lk: Vec<LkIndex>,
    ) -> Result<Self> {
        validate_n2lk(
            &n2lk,
            quadrature.dimensionality(),
            model,
            quadrature.num_angles(),
        )?;
        Self::build(quadrature, model, n2lk)
    }

    fn build(quadrature: &Quadrature, model: InterpolationModel, n2lk: Vec<LkIndex>) -> Result<Self> {
        let ordinates = quadrature.ordinates();
        let norm = quadrature.norm();
        let num_angles = ordinates.len();
        let num_moments = n2lk.len();

        let m = DenseMatrix::try_from_fn(num_angles, num_moments, |m, n| {
            moment_to_discrete(n2lk[n], &ordinates[m], norm)
        })?;

        let d = match model {
            InterpolationModel::Sn | InterpolationModel::Galerkin => invert(&m, model)?,
            InterpolationModel::Svd => weighted_pseudo_inverse(&m, quadrature.wt())?,
        };

        let services = Self {
            model,
            dimension: quadrature.dimensionality(),
            norm,
            ordinates,
            n2lk,
            m,
            d,
        };

        if !services.d_0_equals_wt() {
            warn!(
                "{model} operators for {}: first row of D does not reproduce the weights",
                quadrature.name()
            );
        }
        debug!(
            "{model} operators for {} S{}: {} angles, {} moments",
            quadrature.name(),
            quadrature.sn_order(),
            num_angles,
            num_moments
        );

        Ok(services)
    }

    pub fn model(&self) -> InterpolationModel {
        self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn num_angles(&self) -> usize {
        self.ordinates.len()
    }

    pub fn num_moments(&self) -> usize {
        self.n2lk.len()
    }

    /// Moment-to-discrete operator, `num_angles x num_moments`
    pub fn m(&self) -> &DenseMatrix {
        &self.m
    }

    /// Discrete-to-moment operator, `num_moments x num_angles`
    pub fn d(&self) -> &DenseMatrix {
        &self.d
    }

    /// Full moment index map
    pub fn n2lk(&self) -> &[LkIndex] {
        &self.n2lk
    }

    /// Degree and order of moment `n`
    pub fn lk_pair(&self, n: usize) -> Result<LkIndex> {
        self.n2lk.get(n).copied().ok_or(Error::IndexOutOfRange {
            index: n,
            length: self.n2lk.len(),
        })
    }

    /// Angular flux from moments, `psi = M phi`
    pub fn apply_m(&self, phi: &[f64]) -> Result<Vec<f64>> {
        check_length("moments", phi, self.num_moments())?;
        self.m.mul_vec(phi)
    }

    /// Moments from the angular flux, `phi = D psi`
    pub fn apply_d(&self, psi: &[f64]) -> Result<Vec<f64>> {
        check_length("angular flux", psi, self.num_angles())?;
        self.d.mul_vec(psi)
    }

    /// Entry of `M` for moment `n` at an arbitrary ordinate
    ///
    /// Uses exactly the expression of the harmonic `M`, so for any ordinate
    /// of the set it reproduces that entry.
    pub fn augment_m(&self, n: usize, ordinate: &Ordinate) -> Result<f64> {
        moment_to_discrete(self.lk_pair(n)?, ordinate, self.norm)
    }

    /// Whether `D M` is the identity on the retained moments
    pub fn d_equals_m_inverse(&self) -> bool {
        self.d
            .mul(&self.m)
            .map(|product| product.is_identity(INVERSE_TOLERANCE))
            .unwrap_or(false)
    }

    /// Whether the first moment is `(0,0)` and the first row of `D` is `wt`
    pub fn d_0_equals_wt(&self) -> bool {
        let weights = self.ordinates.iter().map(|o| o.wt()).collect::<Vec<f64>>();
        self.n2lk.first() == Some(&LkIndex::new(0, 0))
            && self.d.rows() > 0
            && self.d.row(0).soft_equiv(weights.as_slice(), WEIGHT_TOLERANCE)
    }

    /// Azimuth of ordinate `m` about the polar `mu` axis, in `[0, 2pi)`
    pub fn compute_azimuthal_angle(&self, m: usize) -> Result<f64> {
        let ordinate = self.ordinates.get(m).ok_or(Error::IndexOutOfRange {
            index: m,
            length: self.ordinates.len(),
        })?;
        Ok(azimuthal_angle(ordinate.y(), ordinate.z()))
    }

    /// Write both operators under their names
    pub fn print_matrix(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{self}")?;
        self.m.print("M", out)?;
        self.d.print("D", out)
    }
}

impl std::fmt::Display for QuadServices {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} interpolation in {}D, {} angles, {} moments: {}",
            self.model,
            self.dimension,
            self.num_angles(),
            self.num_moments(),
            self.n2lk.iter().join(" ")
        )
    }
}

/// `(2l+1)/norm c(l,k) P(l,|k|)(mu) T(k)(phi)` for one moment and ordinate
fn moment_to_discrete(lk: LkIndex, ordinate: &Ordinate, norm: f64) -> Result<f64> {
    Ok((2 * lk.l + 1) as f64 / norm * tesseral(lk.l, lk.k, ordinate)?)
}

fn check_length(name: &'static str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(Error::ShapeMismatch {
            name,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

/// Exact inverse of a square operator
fn invert(matrix: &DenseMatrix, model: InterpolationModel) -> Result<DenseMatrix> {
    let singular = || Error::SingularOperator {
        model: model.to_string(),
    };

    let inverse = DMatrix::from(matrix).try_inverse().ok_or_else(singular)?;
    if inverse.iter().any(|value| !value.is_finite()) {
        return Err(singular());
    }
    Ok(DenseMatrix::from(inverse))
}

/// Weighted least squares inverse `D = pinv(W^1/2 M) W^1/2`
///
/// `D M` is the identity whenever `M` has full column rank, which is checked
/// through the ratio of the extreme singular values.
fn weighted_pseudo_inverse(matrix: &DenseMatrix, weights: &[f64]) -> Result<DenseMatrix> {
    if matrix.rows() == 0 || matrix.cols() == 0 {
        return Err(Error::NoMoments);
    }

    if let Some((index, weight)) = weights.iter().enumerate().find(|(_, w)| **w < 0.0) {
        return Err(Error::NegativeWeight {
            index,
            weight: *weight,
        });
    }

    let root = DMatrix::from_diagonal(&DVector::from_iterator(
        weights.len(),
        weights.iter().map(|w| w.sqrt()),
    ));

    let svd = (&root * DMatrix::from(matrix)).svd(true, true);
    let largest = svd.singular_values.max();
    let smallest = svd.singular_values.min();
    let ratio = if largest > 0.0 { smallest / largest } else { 0.0 };
    if ratio < RANK_TOLERANCE {
        return Err(Error::RankDeficient { ratio });
    }

    let pinv = svd
        .pseudo_inverse(RANK_TOLERANCE * largest)
        .map_err(|_| Error::RankDeficient { ratio })?;

    Ok(DenseMatrix::from(pinv * root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_operator_reported() {
        let matrix = DenseMatrix::from_row_major(2, 2, vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        assert!(matches!(
            invert(&matrix, InterpolationModel::Sn),
            Err(Error::SingularOperator { .. })
        ));
    }

    #[test]
    fn rank_deficiency_reported() {
        let matrix = DenseMatrix::from_row_major(3, 2, vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            weighted_pseudo_inverse(&matrix, &[1.0, 1.0, 1.0]),
            Err(Error::RankDeficient { .. })
        ));
    }

    #[test]
    fn empty_operator_rejected() {
        let matrix = DenseMatrix::zeros(3, 0);
        assert!(matches!(
            weighted_pseudo_inverse(&matrix, &[1.0, 1.0, 1.0]),
            Err(Error::NoMoments)
        ));
    }

    #[test]
    fn negative_weights_rejected() {
        let matrix = DenseMatrix::identity(2);
        assert!(matches!(
            weighted_pseudo_inverse(&matrix, &[1.0, -1.0]),
            Err(Error::NegativeWeight { index: 1, .. })
        ));
    }

    #[test]
    fn weighted_pseudo_inverse_of_full_rank() {
        let matrix = DenseMatrix::from_row_major(3, 2, vec![1.0, -1.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        let d = weighted_pseudo_inverse(&matrix, &[0.5, 2.0, 0.5]).unwrap();
        assert_eq!((d.rows(), d.cols()), (2, 3));
        assert!(d.mul(&matrix).unwrap().is_identity(1e-12));
    }
}
