//! Geometry-aware ordered sets of ordinates

// crate modules
use crate::error::{Error, Result};
use crate::family::Geometry;
use crate::harmonics::spherical_harmonic;
use crate::ordinate::{sn_compare, Ordinate};
use crate::quadrature::Quadrature;

// external crates
use log::debug;

// standard library
use std::ops::Deref;

/// Directions closer than this share a level or a collapsed cosine
pub const LEVEL_TOLERANCE: f64 = 1e-12;

/// The ordinates of a quadrature as they are swept on a mesh
///
/// Built from a [Quadrature] for a particular geometry and mesh dimension.
/// Curvilinear geometries get a zero-weight starting direction at the front
/// of every level, which is the most negative `x` a level can hold.
///
/// | Quadrature | Mesh | Construction                                           |
/// | ---------- | ---- | ------------------------------------------------------ |
/// | 1D         | 1    | cartesian in quadrature order, spherical sorted        |
/// | 2D         | 2    | cartesian in quadrature order, axisymmetric sorted with level starts |
/// | 2D         | 1    | distinct `mu` with summed weights, axisymmetric `z > 0` levels |
/// | 3D         | 3    | cartesian only, in quadrature order                    |
/// | 3D         | 1, 2 | the `xi > 0` half with doubled weights, then as 2D     |
///
/// The set dereferences to a slice of [Ordinate].
///
/// ```rust
/// # use sntools_quadrature::{Geometry, OrdinateSet, Quadrature};
/// let quadrature = Quadrature::gauss_legendre(2, None).unwrap();
/// let set = OrdinateSet::new(&quadrature, Geometry::Spherical, 1).unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert!(set[0].is_starting_direction());
/// assert_eq!(set[0].x(), -1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinateSet {
    ordinates: Vec<Ordinate>,
    geometry: Geometry,
    dimension: usize,
    mesh_dimension: usize,
    norm: f64,
}

impl OrdinateSet {
    /// Arrange the ordinates of a quadrature for a geometry and mesh dimension
    pub fn new(quadrature: &Quadrature, geometry: Geometry, mesh_dimension: usize) -> Result<Self> {
        let dimension = quadrature.dimensionality();
        let incompatible = || Error::IncompatibleGeometry {
            geometry: geometry.to_string(),
            dimension,
            mesh_dimension,
        };

        if mesh_dimension == 0 || mesh_dimension > dimension {
            return Err(incompatible());
        }

        let ordinates = match (dimension, mesh_dimension) {
            (1, _) => match geometry {
                Geometry::Cartesian => quadrature.ordinates(),
                Geometry::Spherical => with_level_starts(sorted(quadrature.ordinates())),
                Geometry::Axisymmetric => return Err(incompatible()),
            },
            (3, 3) => match geometry {
                Geometry::Cartesian => quadrature.ordinates(),
                _ => return Err(incompatible()),
            },
            (3, _) => planar(&upper_half(quadrature), geometry, mesh_dimension).ok_or_else(incompatible)?,
            (_, _) => planar(&quadrature.ordinates(), geometry, mesh_dimension).ok_or_else(incompatible)?,
        };

        debug!(
            "{} ordinates of {} for {geometry} geometry on a {mesh_dimension}D mesh",
            ordinates.len(),
            quadrature.name()
        );

        Ok(Self {
            ordinates,
            geometry,
            dimension,
            mesh_dimension,
            norm: quadrature.norm(),
        })
    }

    /// Ordinates in sweep order
    pub fn ordinates(&self) -> &[Ordinate] {
        &self.ordinates
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Dimension of the quadrature the set was built from
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn mesh_dimension(&self) -> usize {
        self.mesh_dimension
    }

    /// Weight sum of the quadrature, unchanged by the construction
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Number of ordinates that carry a weight
    pub fn num_weighted(&self) -> usize {
        self.ordinates
            .iter()
            .filter(|o| !o.is_starting_direction())
            .count()
    }

    /// Real spherical harmonic `Y(l,k)` at an ordinate
    ///
    /// See [spherical_harmonic] for the convention.
    pub fn y(l: usize, k: i32, ordinate: &Ordinate, sumwt: f64) -> Result<f64> {
        spherical_harmonic(l, k, ordinate, sumwt)
    }
}

impl Deref for OrdinateSet {
    type Target = [Ordinate];

    fn deref(&self) -> &Self::Target {
        &self.ordinates
    }
}

/// Ordinates sorted by level, then `x` within each level
fn sorted(mut ordinates: Vec<Ordinate>) -> Vec<Ordinate> {
    ordinates.sort_by(sn_compare);
    ordinates
}

/// Zero-weight starting direction in front of every level of a sorted set
fn with_level_starts(ordinates: Vec<Ordinate>) -> Vec<Ordinate> {
    let mut result = Vec::with_capacity(ordinates.len() + 1);
    let mut level: Option<f64> = None;

    for ordinate in ordinates {
        let z = ordinate.z();
        if level.map_or(true, |current| (z - current).abs() > LEVEL_TOLERANCE) {
            let x = -(1.0 - z * z).max(0.0).sqrt();
            result.push(Ordinate::from_parts(x, 0.0, z, 0.0));
            level = Some(z);
        }
        result.push(ordinate);
    }

    result
}

/// 3D ordinates with `xi > 0` in the 2D frame, weights doubled
fn upper_half(quadrature: &Quadrature) -> Vec<Ordinate> {
    quadrature
        .ordinates()
        .iter()
        .filter(|o| o.z() > 0.0)
        .map(|o| Ordinate::from_parts(o.x(), o.z(), o.y(), 2.0 * o.wt()))
        .collect()
}

/// 2D-frame ordinates arranged for a 1D or 2D mesh
///
/// Returns `None` for combinations the geometry cannot sweep.
fn planar(ordinates: &[Ordinate], geometry: Geometry, mesh_dimension: usize) -> Option<Vec<Ordinate>> {
    match (geometry, mesh_dimension) {
        (Geometry::Cartesian, 2) => Some(ordinates.to_vec()),
        (Geometry::Axisymmetric, 2) => Some(with_level_starts(sorted(ordinates.to_vec()))),
        (Geometry::Cartesian, 1) => Some(collapse(ordinates)),
        (Geometry::Spherical, 1) => Some(with_level_starts(collapse(ordinates))),
        (Geometry::Axisymmetric, 1) => {
            let upper = ordinates
                .iter()
                .filter(|o| o.z() > 0.0)
                .map(|o| Ordinate::from_parts(o.x(), o.y(), o.z(), 2.0 * o.wt()))
                .collect();
            Some(with_level_starts(sorted(upper)))
        }
        _ => None,
    }
}

/// One reduced 1D ordinate per distinct `x`, summing the weights
fn collapse(ordinates: &[Ordinate]) -> Vec<Ordinate> {
    let mut mu: Vec<(f64, f64)> = ordinates.iter().map(|o| (o.x(), o.wt())).collect();
    mu.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut distinct: Vec<(f64, f64)> = Vec::new();
    for (x, w) in mu {
        match distinct.last_mut() {
            Some(last) if (x - last.0).abs() <= LEVEL_TOLERANCE => last.1 += w,
            _ => distinct.push((x, w)),
        }
    }

    distinct
        .into_iter()
        .map(|(x, w)| Ordinate::from_parts(x, 0.0, 0.0, w))
        .collect()
}
