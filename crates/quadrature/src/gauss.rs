//! Gauss-Legendre and double-Gauss sets on the interval

// crate modules
use crate::error::{Error, Result};
use crate::quadrature::AngleTable;

// external crates
use log::trace;

// standard library
use std::f64::consts::PI;

const NEWTON_TOLERANCE: f64 = 1e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Gauss-Legendre abscissae and weights on `[-1, 1]`
///
/// Abscissae are returned in ascending order with weights summing to 2. The
/// roots are found by Newton iteration on the Legendre recurrence, starting
/// from the usual cosine estimate and exploiting the symmetry of the roots.
///
/// ```rust
/// # use sntools_quadrature::gauss_legendre;
/// let (x, w) = gauss_legendre(2).unwrap();
/// assert!((x[1] - 1.0 / 3.0_f64.sqrt()).abs() < 1e-15);
/// assert_eq!(x[0], -x[1]);
/// assert!((w[0] - 1.0).abs() < 1e-15);
/// ```
pub fn gauss_legendre(order: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    if order == 0 {
        return Err(Error::UnsupportedOrder {
            family: "gauss legendre".to_string(),
            order,
            reason: "order must be positive",
        });
    }

    let n = order as f64;
    let mut x = vec![0.0; order];
    let mut w = vec![0.0; order];

    for i in 0..order.div_ceil(2) {
        let mut z = (PI * (i as f64 + 0.75) / (n + 0.5)).cos();
        let mut converged = false;
        let mut dp = 0.0;

        for iteration in 0..NEWTON_MAX_ITERATIONS {
            let (p, p_prev) = legendre_pair(order, z);
            dp = n * (z * p - p_prev) / (z * z - 1.0);
            let dz = p / dp;
            z -= dz;
            if dz.abs() <= NEWTON_TOLERANCE {
                trace!("S{order} root {i} converged after {iteration} iterations");
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(Error::NewtonIteration { order });
        }

        // refresh the derivative at the converged root
        let (p, p_prev) = legendre_pair(order, z);
        if p.is_finite() {
            dp = n * (z * p - p_prev) / (z * z - 1.0);
        }

        let weight = 2.0 / ((1.0 - z * z) * dp * dp);
        x[i] = -z;
        x[order - 1 - i] = z;
        w[i] = weight;
        w[order - 1 - i] = weight;
    }

    // exact zero for the central root of odd orders
    if order % 2 == 1 {
        x[order / 2] = 0.0;
    }

    Ok((x, w))
}

/// `P(n)(z)` and `P(n-1)(z)` together
fn legendre_pair(n: usize, z: f64) -> (f64, f64) {
    let mut p = 1.0;
    let mut p_prev = 0.0;
    for j in 1..=n {
        let p_next = ((2 * j - 1) as f64 * z * p - (j - 1) as f64 * p_prev) / j as f64;
        p_prev = p;
        p = p_next;
    }
    (p, p_prev)
}

/// 1D Gauss-Legendre set of any positive order
pub(crate) fn gauss_legendre_table(sn_order: usize, norm: f64) -> Result<AngleTable> {
    let (mu, wt) = gauss_legendre(sn_order)?;
    let scale = norm / 2.0;
    Ok(AngleTable::new_1d(
        sn_order,
        norm,
        mu,
        wt.into_iter().map(|w| w * scale).collect(),
    ))
}

/// 1D double-Gauss set, a Gauss-Legendre rule on each half interval
///
/// Each half of `[-1, 1]` carries `sn_order/2` points so the order must be
/// even. Directions are ascending.
pub(crate) fn double_gauss_table(sn_order: usize, norm: f64) -> Result<AngleTable> {
    if sn_order < 2 || sn_order % 2 != 0 {
        return Err(Error::UnsupportedOrder {
            family: "double gauss".to_string(),
            order: sn_order,
            reason: "order must be even and at least 2",
        });
    }

    let (x, w) = gauss_legendre(sn_order / 2)?;
    let scale = norm / 2.0;

    // map [-1, 1] onto [0, 1] with half the weight
    let positive = x
        .iter()
        .zip(&w)
        .map(|(x, w)| (0.5 * (1.0 + x), 0.5 * w * scale))
        .collect::<Vec<(f64, f64)>>();

    let (mu, wt): (Vec<f64>, Vec<f64>) = positive
        .iter()
        .rev()
        .map(|(x, w)| (-x, *w))
        .chain(positive.iter().copied())
        .unzip();

    Ok(AngleTable::new_1d(sn_order, norm, mu, wt))
}
