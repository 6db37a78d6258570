//! Moment indices and the `n2lk` map for each model and dimension

// crate modules
use crate::error::{Error, Result};
use crate::model::InterpolationModel;

// sntools modules
use sntools_quadrature::harmonics::tesseral;
use sntools_quadrature::{Quadrature, QuadratureClass};

// external crates
use itertools::Itertools;
use log::trace;
use nalgebra::DVector;

/// Smallest relative residual of a moment kept as independent
const INDEPENDENCE_TOLERANCE: f64 = 1e-8;

/// Degree `l` and order `k` of a real spherical harmonic moment
///
/// Negative orders select the `sin(|k| phi)` harmonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LkIndex {
    pub l: usize,
    pub k: i32,
}

impl LkIndex {
    pub fn new(l: usize, k: i32) -> Self {
        Self { l, k }
    }

    /// Whether `|k| <= l`
    pub fn is_valid(&self) -> bool {
        self.k.unsigned_abs() as usize <= self.l
    }

    /// Whether the moment can be resolved by a quadrature of a dimension
    ///
    /// A 1D set only resolves `k = 0`, and a 2D set only the harmonics even
    /// in the out-of-plane cosine, `k >= 0`.
    pub fn is_resolved_in(&self, dimension: usize) -> bool {
        match dimension {
            1 => self.k == 0,
            2 => self.k >= 0,
            _ => true,
        }
    }
}

impl From<(usize, i32)> for LkIndex {
    fn from((l, k): (usize, i32)) -> Self {
        Self::new(l, k)
    }
}

impl std::fmt::Display for LkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.l, self.k)
    }
}

/// Every moment of degree `l`, order ascending from `-l` to `l`
///
/// ```rust
/// # use sntools_moments::{shell, LkIndex};
/// let orders: Vec<i32> = shell(2).map(|lk| lk.k).collect();
/// assert_eq!(orders, vec![-2, -1, 0, 1, 2]);
/// assert!(shell(2).all(|lk| lk.l == 2));
/// ```
pub fn shell(l: usize) -> impl Iterator<Item = LkIndex> {
    let degree = l as i32;
    (-degree..=degree).map(move |k| LkIndex::new(l, k))
}

/// Moments for a quadrature, model and optional expansion order
///
/// Every model uses one moment per angle except SVD. For an SN order `N`
/// the SN map takes the moments in this order:
///
/// | Dimension | Moments                                                      |
/// | --------- | ------------------------------------------------------------ |
/// | 1         | `(n, 0)` for every angle `n`                                 |
/// | 2         | shells `l < N` with `k >= 0`, then `l = N` with odd `k > 0`  |
/// | 3         | shells `l < N`, then `l = N` with `k < 0`, `l = N` with odd `k > 0`, `l = N+1` with even `-N <= k < 0` |
///
/// This needs a level symmetric layout, so square sets are rejected.
///
/// The Galerkin map walks the moments resolved by the dimension in degree
/// order, `k` ascending within each degree, and keeps every moment whose
/// harmonic is linearly independent of those already kept over the
/// directions of the set. It stops once there is one moment per angle, so
/// `M` is square and invertible for any layout, square sets included. On
/// level symmetric sets the independent moments are exactly the SN ones.
///
/// For SVD the map is every complete shell `l <= L` resolved by the
/// dimension, with `L` the expansion order or `N-1` by default.
///
/// ```rust
/// # use sntools_moments::{compute_n2lk, InterpolationModel, LkIndex};
/// # use sntools_quadrature::Quadrature;
/// let quadrature = Quadrature::level_symmetric(2, 2, None).unwrap();
/// let n2lk = compute_n2lk(&quadrature, InterpolationModel::Sn, None).unwrap();
/// let expected: Vec<LkIndex> = vec![(0, 0).into(), (1, 0).into(), (1, 1).into(), (2, 1).into()];
/// assert_eq!(n2lk, expected);
/// ```
pub fn compute_n2lk(
    quadrature: &Quadrature,
    model: InterpolationModel,
    expansion_order: Option<usize>,
) -> Result<Vec<LkIndex>> {
    let dimension = quadrature.dimensionality();
    let sn_order = quadrature.sn_order();
    let num_angles = quadrature.num_angles();

    if expansion_order.is_some() && model != InterpolationModel::Svd {
        return Err(Error::ExpansionOrderNotAllowed {
            model: model.to_string(),
        });
    }

    let n2lk = match model {
        InterpolationModel::Svd => {
            let order = expansion_order.unwrap_or(sn_order.saturating_sub(1));
            let n2lk = (0..=order)
                .flat_map(shell)
                .filter(|lk| lk.is_resolved_in(dimension))
                .collect::<Vec<LkIndex>>();
            if n2lk.len() > num_angles {
                return Err(Error::TooManyMoments {
                    moments: n2lk.len(),
                    angles: num_angles,
                });
            }
            n2lk
        }
        InterpolationModel::Sn => {
            if quadrature.class() == QuadratureClass::Square {
                return Err(Error::UnsupportedModel {
                    model: model.to_string(),
                    class: quadrature.class().to_string(),
                    dimension,
                });
            }
            square_moments(dimension, sn_order)
                .take(num_angles)
                .collect::<Vec<LkIndex>>()
        }
        InterpolationModel::Galerkin => independent_moments(quadrature)?,
    };

    if model.is_square() && n2lk.len() < num_angles {
        return Err(Error::MomentCount {
            model: model.to_string(),
            expected: num_angles,
            found: n2lk.len(),
        });
    }

    trace!("{model} n2lk: {}", n2lk.iter().join(" "));
    Ok(n2lk)
}

/// First moments in degree order with independent harmonics over the set
///
/// Gram-Schmidt on the harmonic values at each direction, stopping at one
/// moment per angle or after degree `2(N+1)`.
fn independent_moments(quadrature: &Quadrature) -> Result<Vec<LkIndex>> {
    let dimension = quadrature.dimensionality();
    let num_angles = quadrature.num_angles();
    let ordinates = quadrature.ordinates();
    let max_degree = 2 * (quadrature.sn_order() + 1);

    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(num_angles);
    let mut n2lk = Vec::with_capacity(num_angles);

    let candidates = (0..=max_degree)
        .flat_map(shell)
        .filter(|lk| lk.is_resolved_in(dimension));

    for lk in candidates {
        if n2lk.len() == num_angles {
            break;
        }

        let values = ordinates
            .iter()
            .map(|o| tesseral(lk.l, lk.k, o))
            .collect::<sntools_quadrature::Result<Vec<f64>>>()?;
        let mut v = DVector::from_vec(values);
        let scale = v.norm();
        if scale == 0.0 {
            continue;
        }

        for b in &basis {
            let projection = b.dot(&v);
            v.axpy(-projection, b, 1.0);
        }

        let residual = v.norm();
        if residual > INDEPENDENCE_TOLERANCE * scale {
            basis.push(v / residual);
            n2lk.push(lk);
        }
    }

    Ok(n2lk)
}

/// Candidate moments for the square models, in map order
fn square_moments(dimension: usize, sn_order: usize) -> Box<dyn Iterator<Item = LkIndex>> {
    let n = sn_order;
    let odd_positive = |lk: &LkIndex| lk.k > 0 && lk.k % 2 == 1;

    match dimension {
        1 => Box::new((0..).map(|l| LkIndex::new(l, 0))),
        2 => Box::new(
            (0..n)
                .flat_map(shell)
                .filter(|lk| lk.k >= 0)
                .chain(shell(n).filter(odd_positive)),
        ),
        _ => {
            let lowest = -(n as i32);
            Box::new(
                (0..n)
                    .flat_map(shell)
                    .chain(shell(n).filter(|lk| lk.k < 0))
                    .chain(shell(n).filter(odd_positive))
                    .chain(shell(n + 1).filter(move |lk| lk.k < 0 && lk.k >= lowest && lk.k % 2 == 0)),
            )
        }
    }
}

/// Check an explicit moment map against a quadrature and model
pub(crate) fn validate_n2lk(n2lk: &[LkIndex], dimension: usize, model: InterpolationModel, num_angles: usize) -> Result<()> {
    if n2lk.is_empty() {
        return Err(Error::NoMoments);
    }

    if let Some(lk) = n2lk.iter().find(|lk| !lk.is_valid()) {
        return Err(Error::InvalidMoment {
            l: lk.l,
            k: lk.k,
            reason: "order exceeds degree",
        });
    }

    if let Some(lk) = n2lk.iter().find(|lk| !lk.is_resolved_in(dimension)) {
        return Err(Error::InvalidMoment {
            l: lk.l,
            k: lk.k,
            reason: "not resolved by the quadrature dimension",
        });
    }

    if let Some(lk) = n2lk.iter().duplicates().next() {
        return Err(Error::DuplicateMoment { l: lk.l, k: lk.k });
    }

    if model.is_square() && n2lk.len() != num_angles {
        return Err(Error::MomentCount {
            model: model.to_string(),
            expected: num_angles,
            found: n2lk.len(),
        });
    }

    if n2lk.len() > num_angles {
        return Err(Error::TooManyMoments {
            moments: n2lk.len(),
            angles: num_angles,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(dimension: usize, n: usize) -> usize {
        square_moments(dimension, n).take(10_000).count()
    }

    #[test]
    fn square_counts_match_level_symmetric() {
        for n in [2, 4, 6, 8, 16] {
            assert_eq!(count(3, n), n * (n + 2));
            assert_eq!(count(2, n), n * (n + 2) / 2);
        }
    }

    #[test]
    fn three_dimensional_s2_map() {
        let n2lk: Vec<LkIndex> = square_moments(3, 2).collect();
        let expected: Vec<LkIndex> = [(0, 0), (1, -1), (1, 0), (1, 1), (2, -2), (2, -1), (2, 1), (3, -2)]
            .into_iter()
            .map(LkIndex::from)
            .collect();
        assert_eq!(n2lk, expected);
    }

    #[test]
    fn explicit_map_checks() {
        let lk = |l, k| LkIndex::new(l, k);
        assert!(validate_n2lk(&[lk(0, 0), lk(1, 0)], 1, InterpolationModel::Sn, 2).is_ok());
        assert!(matches!(
            validate_n2lk(&[lk(0, 0), lk(1, 2)], 3, InterpolationModel::Sn, 2),
            Err(Error::InvalidMoment { .. })
        ));
        assert!(matches!(
            validate_n2lk(&[lk(0, 0), lk(1, -1)], 2, InterpolationModel::Sn, 2),
            Err(Error::InvalidMoment { .. })
        ));
        assert!(matches!(
            validate_n2lk(&[lk(0, 0), lk(0, 0)], 1, InterpolationModel::Galerkin, 2),
            Err(Error::DuplicateMoment { l: 0, k: 0 })
        ));
        assert!(matches!(
            validate_n2lk(&[lk(0, 0)], 1, InterpolationModel::Sn, 2),
            Err(Error::MomentCount { .. })
        ));
        assert!(validate_n2lk(&[lk(0, 0)], 1, InterpolationModel::Svd, 2).is_ok());
        assert!(matches!(
            validate_n2lk(&[], 1, InterpolationModel::Svd, 2),
            Err(Error::NoMoments)
        ));
    }
}
