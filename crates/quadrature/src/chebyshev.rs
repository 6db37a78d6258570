//! Square Chebyshev-Legendre product sets in 2D

// crate modules
use crate::error::{Error, Result};
use crate::gauss::gauss_legendre;
use crate::quadrature::AngleTable;

// standard library
use std::f64::consts::PI;

/// 2D square Chebyshev-Legendre set of `N^2` directions
///
/// The `N` levels sit at the Gauss-Legendre nodes in `eta`. Every level holds
/// `N` equally weighted directions at the Chebyshev azimuths
/// `w(j) = (j - 1/2) pi / N` of the `xi > 0` half plane, with
///
/// ```text
///     mu = sin(theta) cos(w)      xi = sin(theta) sin(w)
/// ```
///
/// Directions are level-major with `mu` descending along each level.
pub(crate) fn square_chebyshev_legendre(sn_order: usize, norm: f64) -> Result<AngleTable> {
    if sn_order < 2 {
        return Err(Error::UnsupportedOrder {
            family: "square CL".to_string(),
            order: sn_order,
            reason: "at least two levels are needed",
        });
    }

    let (eta, level_weights) = gauss_legendre(sn_order)?;
    let n = sn_order as f64;
    let scale = norm / (2.0 * PI) * PI / n;

    let mut table = AngleTable::new(sn_order, norm, vec![], vec![], vec![], vec![]);
    for (eta, w) in eta.iter().zip(&level_weights) {
        let sin_theta = (1.0 - eta * eta).max(0.0).sqrt();
        for j in 0..sn_order {
            let omega = (j as f64 + 0.5) * PI / n;
            table.mu.push(sin_theta * omega.cos());
            table.eta.push(*eta);
            table.xi.push(sin_theta * omega.sin());
            table.wt.push(w * scale);
        }
    }

    Ok(table)
}
