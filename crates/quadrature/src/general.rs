//! User supplied sets, either complete or as a single octant

// crate modules
use crate::error::{Error, Result};
use crate::family::QuadratureClass;
use crate::ordinate::Ordinate;
use crate::quadrature::AngleTable;

// sntools modules
use sntools_utils::{SliceExt, SoftEquiv};

// external crates
use itertools::iproduct;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Raw direction cosines and weights as supplied by a user
///
/// Components a set does not carry may be left empty. A 1D table only needs
/// `mu`. A 2D table needs `mu` and `eta`, with `xi` completed as the
/// positive out-of-plane cosine if it is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdinateTable {
    pub mu: Vec<f64>,
    #[serde(default)]
    pub eta: Vec<f64>,
    #[serde(default)]
    pub xi: Vec<f64>,
    pub wt: Vec<f64>,
}

impl OrdinateTable {
    fn check_length(name: &'static str, values: &[f64], expected: usize) -> Result<()> {
        if values.len() != expected {
            return Err(Error::LengthMismatch {
                name,
                expected,
                found: values.len(),
            });
        }
        Ok(())
    }

    fn check_weights(&self) -> Result<()> {
        match self
            .wt
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            Some((index, weight)) => Err(Error::InvalidWeight {
                index,
                weight: *weight,
            }),
            None => Ok(()),
        }
    }
}

/// Rejects any row that is not a valid direction with its weight
///
/// An empty `eta` marks a 1D table, where only `mu` is checked.
fn check_directions(mu: &[f64], eta: &[f64], xi: &[f64], wt: &[f64]) -> Result<()> {
    for (m, (mu, wt)) in mu.iter().zip(wt).enumerate() {
        if eta.is_empty() {
            Ordinate::new_1d(*mu, *wt)?;
        } else {
            Ordinate::new(*mu, eta[m], xi[m], *wt)?;
        }
    }
    Ok(())
}

/// Complete user set of the requested dimension
pub(crate) fn general_table(
    sn_order: usize,
    norm: f64,
    dimension: usize,
    table: OrdinateTable,
) -> Result<AngleTable> {
    let n = table.mu.len();
    if n == 0 {
        return Err(Error::LengthMismatch {
            name: "mu",
            expected: 1,
            found: 0,
        });
    }
    OrdinateTable::check_length("wt", &table.wt, n)?;
    table.check_weights()?;

    let OrdinateTable { mu, eta, xi, wt } = table;
    let (eta, xi) = match dimension {
        1 => (vec![], vec![]),
        2 => {
            OrdinateTable::check_length("eta", &eta, n)?;
            let xi = if xi.is_empty() {
                mu.iter()
                    .zip(&eta)
                    .map(|(m, e)| (1.0 - m * m - e * e).max(0.0).sqrt())
                    .collect()
            } else {
                OrdinateTable::check_length("xi", &xi, n)?;
                xi
            };
            (eta, xi)
        }
        3 => {
            OrdinateTable::check_length("eta", &eta, n)?;
            OrdinateTable::check_length("xi", &xi, n)?;
            (eta, xi)
        }
        _ => {
            return Err(Error::UnsupportedDimension {
                family: "general".to_string(),
                dimension,
            })
        }
    };
    check_directions(&mu, &eta, &xi, &wt)?;

    let sum: f64 = wt.iter().sum();
    if !sum.soft_equiv(&norm, 1e-10) {
        return Err(Error::ClosureFailure {
            check: "iDomega",
            expected: norm,
            found: sum,
        });
    }

    Ok(AngleTable::new(sn_order, norm, mu, eta, xi, wt))
}

/// Octant counts allowed by each class for a number of levels
fn check_class(class: QuadratureClass, levels: usize, ordinates: usize) -> Result<()> {
    let consistent = match class {
        QuadratureClass::Interval => return Err(Error::IntervalClass),
        QuadratureClass::Triangle => levels * (levels + 2) == 8 * ordinates,
        QuadratureClass::Square => 2 * levels * levels == 8 * ordinates,
    };

    if consistent {
        Ok(())
    } else {
        Err(Error::ClassCountMismatch {
            class: class.to_string(),
            levels,
            ordinates,
        })
    }
}

/// Full sphere reflected from a single user octant
///
/// Every direction is reflected through the coordinate planes. Directions
/// lying on a plane are not duplicated, instead they keep the weight of each
/// octant that shares them. Weights are then scaled to sum to `norm`.
///
/// Returns the table alongside whether the set reaches the `xi = -1` pole.
pub(crate) fn general_octant_table(
    octant: OrdinateTable,
    levels: usize,
    class: QuadratureClass,
    norm: f64,
) -> Result<(AngleTable, bool)> {
    let n = octant.mu.len();
    check_class(class, levels, n)?;
    for (name, values) in [("eta", &octant.eta), ("xi", &octant.xi), ("wt", &octant.wt)] {
        OrdinateTable::check_length(name, values, n)?;
    }
    octant.check_weights()?;
    check_directions(&octant.mu, &octant.eta, &octant.xi, &octant.wt)?;

    let open_interval = octant.xi.try_min()?.soft_equiv(&-1.0, 1e-12);

    let mut table = AngleTable::new(levels, norm, vec![], vec![], vec![], vec![]);
    for (sxi, seta, smu) in iproduct!([-1.0, 1.0], [-1.0, 1.0], [-1.0, 1.0]) {
        for m in 0..n {
            let (mu, eta, xi) = (smu * octant.mu[m], seta * octant.eta[m], sxi * octant.xi[m]);

            // reflections of an in-plane direction accumulate on one entry
            let existing = (0..table.mu.len()).find(|i| {
                table.mu[*i] == mu && table.eta[*i] == eta && table.xi[*i] == xi
            });
            match existing {
                Some(i) => table.wt[i] += octant.wt[m],
                None => {
                    table.mu.push(mu);
                    table.eta.push(eta);
                    table.xi.push(xi);
                    table.wt.push(octant.wt[m]);
                }
            }
        }
    }

    let total: f64 = table.wt.iter().sum();
    if total <= 0.0 {
        return Err(Error::InvalidWeight {
            index: 0,
            weight: total,
        });
    }
    table.wt.iter_mut().for_each(|w| *w *= norm / total);

    if table.mu.len() != 8 * n {
        warn!(
            "{} of {} octant directions lie on a coordinate plane",
            8 * n - table.mu.len(),
            n
        );
    }
    debug!(
        "general octant quadrature: {class} class, {levels} levels, {} directions",
        table.mu.len()
    );

    Ok((table, open_interval))
}
