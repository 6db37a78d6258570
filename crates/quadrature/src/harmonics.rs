//! Real spherical harmonics and supporting special functions
//!
//! Directions use `x` as the polar cosine and measure the azimuth in the
//! `z`-`y` plane, `phi = atan2(y, z)` in `[0, 2pi)`. On the pole the azimuth
//! is taken to be zero.
//!
//! The tesseral harmonic of degree `l` and order `k` is
//!
//! ```text
//!     Y(l,k) = sqrt((2l+1)/sumwt) * c(l,k) * P(l,|k|)(x) * T(k)(phi)
//!
//!     c(l,k) = sqrt((2 - delta(k,0)) * (l-|k|)! / (l+|k|)!)
//!     T(k)   = cos(k phi)    k >= 0
//!              sin(|k| phi)  k <  0
//! ```
//!
//! where `P` is the associated Legendre function without the Condon-Shortley
//! phase. With `sumwt = 4pi` the harmonics are orthonormal over the sphere.

// crate modules
use crate::error::{Error, Result};
use crate::ordinate::Ordinate;

// standard library
use std::f64::consts::{PI, TAU};

/// Factorial as a float, with `n! = 1` for any `n <= 0`
///
/// ```rust
/// # use sntools_quadrature::harmonics::factorial;
/// assert_eq!(factorial(5), 120.0);
/// assert_eq!(factorial(0), 1.0);
/// assert_eq!(factorial(-3), 1.0);
/// ```
pub fn factorial(n: i32) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * f64::from(i))
}

/// One for equal arguments, zero otherwise
pub fn kronecker_delta<T: PartialEq>(a: T, b: T) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

/// Legendre polynomial `P(l)(x)` by upward recurrence
///
/// ```rust
/// # use sntools_quadrature::harmonics::legendre;
/// assert_eq!(legendre(0, 0.3), 1.0);
/// assert_eq!(legendre(1, 0.3), 0.3);
/// assert!((legendre(2, 0.5) + 0.125).abs() < 1e-15);
/// ```
pub fn legendre(l: usize, x: f64) -> f64 {
    associated_legendre(l, 0, x)
}

/// Associated Legendre function `P(l,m)(x)`, no Condon-Shortley phase
///
/// Zero whenever `m > l`.
pub fn associated_legendre(l: usize, m: usize, x: f64) -> f64 {
    if m > l {
        return 0.0;
    }

    // P(m,m) = (2m-1)!! (1-x^2)^(m/2)
    let s = (1.0 - x * x).max(0.0).sqrt();
    let mut pmm = 1.0;
    for i in 1..=m {
        pmm *= (2 * i - 1) as f64 * s;
    }
    if l == m {
        return pmm;
    }

    let mut pm1 = x * (2 * m + 1) as f64 * pmm;
    if l == m + 1 {
        return pm1;
    }

    let mut pm2 = pmm;
    for n in (m + 2)..=l {
        let pn = (x * (2 * n - 1) as f64 * pm1 - (n + m - 1) as f64 * pm2) / (n - m) as f64;
        pm2 = pm1;
        pm1 = pn;
    }
    pm1
}

/// Normalisation `c(l,k) = sqrt((2-delta(k,0)) (l-|k|)!/(l+|k|)!)`
///
/// The factorial ratio is accumulated as a product of reciprocals so large
/// degrees never form `inf/inf`. A result that is not finite and positive is
/// reported rather than returned.
///
/// ```rust
/// # use sntools_quadrature::harmonics::lk_coefficient;
/// assert_eq!(lk_coefficient(4, 0).unwrap(), 1.0);
/// assert!((lk_coefficient(1, 1).unwrap() - 1.0).abs() < 1e-15);
/// assert!((lk_coefficient(2, -2).unwrap() - (1.0_f64 / 12.0).sqrt()).abs() < 1e-15);
/// assert!(lk_coefficient(1, 2).is_err());
/// ```
pub fn lk_coefficient(l: usize, k: i32) -> Result<f64> {
    let m = k.unsigned_abs() as usize;
    if m > l {
        return Err(Error::DegenerateCoefficient { l, k });
    }

    let ratio = ((l - m + 1)..=(l + m)).fold(1.0, |acc, j| acc / j as f64);
    let c = ((2.0 - kronecker_delta(k, 0)) * ratio).sqrt();

    if c.is_finite() && c > 0.0 {
        Ok(c)
    } else {
        Err(Error::DegenerateCoefficient { l, k })
    }
}

/// Azimuth of a direction from its `y` and `z` cosines, in `[0, 2pi)`
///
/// ```rust
/// # use sntools_quadrature::harmonics::azimuthal_angle;
/// # use std::f64::consts::PI;
/// assert_eq!(azimuthal_angle(0.0, 0.0), 0.0);
/// assert!((azimuthal_angle(1.0, 0.0) - PI / 2.0).abs() < 1e-15);
/// assert!((azimuthal_angle(-1.0, 0.0) - 1.5 * PI).abs() < 1e-15);
/// ```
pub fn azimuthal_angle(y: f64, z: f64) -> f64 {
    if y.abs() < f64::EPSILON && z.abs() < f64::EPSILON {
        return 0.0;
    }
    let phi = y.atan2(z);
    if phi < 0.0 {
        phi + TAU
    } else {
        phi
    }
}

/// Azimuthal factor, `cos(k phi)` for `k >= 0` and `sin(|k| phi)` otherwise
pub fn azimuthal_factor(k: i32, phi: f64) -> f64 {
    let m = f64::from(k.unsigned_abs());
    if k >= 0 {
        (m * phi).cos()
    } else {
        (m * phi).sin()
    }
}

/// `c(l,k) P(l,|k|)(x) T(k)(phi)` at an ordinate
///
/// This is the shape shared by [spherical_harmonic] and by every entry of the
/// moment operators, without any degree or set normalisation.
pub fn tesseral(l: usize, k: i32, ordinate: &Ordinate) -> Result<f64> {
    let c = lk_coefficient(l, k)?;
    let phi = azimuthal_angle(ordinate.y(), ordinate.z());
    let p = associated_legendre(l, k.unsigned_abs() as usize, ordinate.x());
    Ok(c * p * azimuthal_factor(k, phi))
}

/// Real spherical harmonic `Y(l,k)` at an ordinate, normalised to `sumwt`
///
/// ```rust
/// # use sntools_quadrature::{harmonics::spherical_harmonic, Ordinate};
/// # use std::f64::consts::PI;
/// let pole = Ordinate::new(1.0, 0.0, 0.0, 1.0).unwrap();
/// let y00 = spherical_harmonic(0, 0, &pole, 4.0 * PI).unwrap();
/// assert!((y00 - 1.0 / (4.0 * PI).sqrt()).abs() < 1e-15);
/// ```
pub fn spherical_harmonic(l: usize, k: i32, ordinate: &Ordinate, sumwt: f64) -> Result<f64> {
    Ok(((2 * l + 1) as f64 / sumwt).sqrt() * tesseral(l, k, ordinate)?)
}

/// Reference real spherical harmonic from polar cosine and azimuth
///
/// Independent of [spherical_harmonic], this uses the fully normalised
/// associated Legendre recurrence and never forms a factorial. The two must
/// agree for any direction.
///
/// ```rust
/// # use sntools_quadrature::harmonics::{galerkin_ylk, spherical_harmonic};
/// # use sntools_quadrature::Ordinate;
/// # use std::f64::consts::PI;
/// let ordinate = Ordinate::new(0.6, 0.0, 0.8, 1.0).unwrap();
/// let direct = spherical_harmonic(3, -2, &ordinate, 4.0 * PI).unwrap();
/// let reference = galerkin_ylk(3, -2, 0.6, 0.0, 4.0 * PI);
/// assert!((direct - reference).abs() < 1e-14);
/// ```
pub fn galerkin_ylk(l: usize, k: i32, polar_cos: f64, azimuth: f64, sumwt: f64) -> f64 {
    let m = k.unsigned_abs() as usize;
    if m > l {
        return 0.0;
    }

    let s = (1.0 - polar_cos * polar_cos).max(0.0).sqrt();

    // normalised sectoral term
    let mut pmm = ((2 * m + 1) as f64).sqrt();
    for i in 1..=m {
        pmm *= ((2 * i - 1) as f64 / (2 * i) as f64).sqrt() * s;
    }

    let plm = if l == m {
        pmm
    } else {
        let mut p_prev = pmm;
        let mut p_curr = ((2 * m + 3) as f64).sqrt() * polar_cos * pmm;
        for n in (m + 2)..=l {
            let (nf, mf) = (n as f64, m as f64);
            let a = ((4.0 * nf * nf - 1.0) / (nf * nf - mf * mf)).sqrt();
            let b = (((nf - 1.0).powi(2) - mf * mf) / (4.0 * (nf - 1.0).powi(2) - 1.0)).sqrt();
            let p_next = a * (polar_cos * p_curr - b * p_prev);
            p_prev = p_curr;
            p_curr = p_next;
        }
        p_curr
    };

    ((2.0 - kronecker_delta(m, 0)) / sumwt).sqrt() * plm * azimuthal_factor(k, azimuth)
}

/// Default normalisation of a set in each dimension
pub(crate) fn default_norm(dimension: usize) -> f64 {
    match dimension {
        1 => 2.0,
        2 => 2.0 * PI,
        _ => 4.0 * PI,
    }
}
