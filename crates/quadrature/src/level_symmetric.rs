//! Level symmetric sets in 2D and 3D
//!
//! The octant cosines follow the usual level symmetric recursion
//!
//! ```text
//!     mu(i)^2 = mu(1)^2 + (i-1) * 2(1 - 3 mu(1)^2)/(N-2)      i = 1..N/2
//! ```
//!
//! with the octant holding every `(mu(i), mu(j), mu(k))` where
//! `i + j + k = N/2 + 2`. Points that are permutations of one another share a
//! weight. Rather than tabulating weights, they are solved for so that the
//! octant integrates every even monomial `mu^2a eta^2b xi^2c` of degree up to
//! `N-2` exactly.

// crate modules
use crate::error::{Error, Result};
use crate::quadrature::AngleTable;

// external crates
use itertools::{iproduct, Itertools};
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

/// First cosine of each supported order
const FIRST_COSINE: [(usize, f64); 7] = [
    (4, 0.350021174582),
    (6, 0.266635401517),
    (8, 0.218217890450),
    (10, 0.189321326478),
    (12, 0.167212652823),
    (14, 0.151985861461),
    (16, 0.138956875067),
];

/// Accepted residual on the octant moment equations
const RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Octant directions and weights, weights summing to one
#[derive(Debug)]
pub(crate) struct Octant {
    pub(crate) directions: Vec<[f64; 3]>,
    pub(crate) weights: Vec<f64>,
}

fn unsupported(order: usize, reason: &'static str) -> Error {
    Error::UnsupportedOrder {
        family: "level symmetric".to_string(),
        order,
        reason,
    }
}

/// Cosines `mu(1)..mu(N/2)` for an even order
fn cosines(sn_order: usize) -> Result<Vec<f64>> {
    if sn_order < 2 || sn_order % 2 != 0 {
        return Err(unsupported(sn_order, "order must be even"));
    }

    if sn_order == 2 {
        return Ok(vec![1.0 / 3.0_f64.sqrt()]);
    }

    let mu1 = FIRST_COSINE
        .iter()
        .find(|(order, _)| *order == sn_order)
        .map(|(_, mu1)| *mu1)
        .ok_or_else(|| unsupported(sn_order, "only S2 to S16 are tabulated"))?;

    let delta = 2.0 * (1.0 - 3.0 * mu1 * mu1) / (sn_order - 2) as f64;
    Ok((0..sn_order / 2)
        .map(|i| (mu1 * mu1 + i as f64 * delta).sqrt())
        .collect())
}

/// `(2n-1)!!` with the empty product for `n = 0`
fn double_factorial_odd(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, i| acc * (2 * i - 1) as f64)
}

/// Build the first octant of a level symmetric set
pub(crate) fn octant(sn_order: usize) -> Result<Octant> {
    let mu = cosines(sn_order)?;
    let half = sn_order / 2;

    // octant points and their permutation class
    let mut directions = Vec::new();
    let mut keys = Vec::new();
    for i in 1..=half {
        for j in 1..=(half + 1 - i) {
            let k = half + 2 - i - j;
            directions.push([mu[i - 1], mu[j - 1], mu[k - 1]]);
            keys.push([i, j, k].into_iter().sorted().rev().collect::<Vec<usize>>());
        }
    }

    let classes = keys.iter().unique().cloned().collect::<Vec<Vec<usize>>>();
    let class_of = keys
        .iter()
        .map(|key| classes.iter().position(|c| c == key).unwrap_or(0))
        .collect::<Vec<usize>>();

    // one equation for every partition a >= b >= c of each degree
    let mut rows = Vec::new();
    let mut rhs = Vec::new();
    for n in 0..half {
        for (a, b) in iproduct!((0..=n).rev(), (0..=n).rev()) {
            if b > a || a + b > n || n - a - b > b {
                continue;
            }
            let c = n - a - b;
            let mut row = vec![0.0; classes.len()];
            for (d, class) in directions.iter().zip(&class_of) {
                row[*class] += d[0].powi(2 * a as i32) * d[1].powi(2 * b as i32) * d[2].powi(2 * c as i32);
            }
            rows.extend(row);
            rhs.push(
                double_factorial_odd(a) * double_factorial_odd(b) * double_factorial_odd(c)
                    / double_factorial_odd(n + 1),
            );
        }
    }

    let a = DMatrix::from_row_slice(rhs.len(), classes.len(), &rows);
    let b = DVector::from_vec(rhs);
    trace!(
        "S{sn_order} weight system: {} equations, {} classes",
        a.nrows(),
        a.ncols()
    );

    let solution = a
        .clone()
        .svd(true, true)
        .solve(&b, 1e-14)
        .map_err(|reason| Error::WeightSolve {
            order: sn_order,
            reason: reason.to_string(),
        })?;

    let residual = (&a * &solution - &b).amax();
    if residual > RESIDUAL_TOLERANCE {
        return Err(Error::WeightSolve {
            order: sn_order,
            reason: format!("moment equations inconsistent, residual {residual:.3e}"),
        });
    }

    let mut weights = class_of.iter().map(|c| solution[*c]).collect::<Vec<f64>>();
    if let Some(w) = weights.iter().find(|w| **w <= 0.0 || !w.is_finite()) {
        return Err(Error::WeightSolve {
            order: sn_order,
            reason: format!("non-positive weight {w}"),
        });
    }

    let total: f64 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= total);

    debug!(
        "S{sn_order} level symmetric octant: {} directions, {} weight classes",
        directions.len(),
        classes.len()
    );

    Ok(Octant {
        directions,
        weights,
    })
}

/// Full 3D set, `N(N+2)` directions over all eight octants
pub(crate) fn level_symmetric_3d(sn_order: usize, norm: f64) -> Result<AngleTable> {
    let octant = octant(sn_order)?;
    Ok(reflect(&octant, &[-1.0, 1.0], norm / 8.0, sn_order, norm))
}

/// 2D set, the `N(N+2)/2` directions of the `xi > 0` hemisphere
pub(crate) fn level_symmetric_2d(sn_order: usize, norm: f64) -> Result<AngleTable> {
    let octant = octant(sn_order)?;
    Ok(reflect(&octant, &[1.0], norm / 4.0, sn_order, norm))
}

/// Reflect an octant through every mu and eta sign, and the given xi signs
fn reflect(octant: &Octant, xi_signs: &[f64], scale: f64, sn_order: usize, norm: f64) -> AngleTable {
    let mut table = AngleTable::new(sn_order, norm, vec![], vec![], vec![], vec![]);

    for (sxi, seta, smu) in iproduct!(xi_signs, [-1.0, 1.0], [-1.0, 1.0]) {
        for (d, w) in octant.directions.iter().zip(&octant.weights) {
            table.mu.push(smu * d[0]);
            table.eta.push(seta * d[1]);
            table.xi.push(sxi * d[2]);
            table.wt.push(w * scale);
        }
    }

    table
}
