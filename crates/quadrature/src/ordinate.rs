//! A single discrete direction and its weight

// crate modules
use crate::error::{Error, Result};

// standard library
use std::cmp::Ordering;

/// Tolerance on the unit norm of a checked direction
const UNIT_TOLERANCE: f64 = 1e-8;

/// One discrete direction plus its quadrature weight
///
/// The direction cosines are `x`, `y`, `z`, also available through the
/// conventional names `mu()`, `eta()` and `xi()`. The `z` cosine is always
/// the level-defining component used by [sn_compare].
///
/// Ordinates are immutable once built. Checked constructors are provided for
/// full 3D directions and for reduced 1D directions.
///
/// ```rust
/// # use sntools_quadrature::Ordinate;
/// let c = 1.0 / 3.0_f64.sqrt();
/// let ordinate = Ordinate::new(c, c, c, 0.5).unwrap();
/// assert_eq!(ordinate.xi(), c);
///
/// // not a unit direction
/// assert!(Ordinate::new(1.0, 1.0, 0.0, 0.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ordinate {
    x: f64,
    y: f64,
    z: f64,
    weight: f64,
}

impl Ordinate {
    /// Full direction, must be a unit vector with a non-negative weight
    pub fn new(x: f64, y: f64, z: f64, weight: f64) -> Result<Self> {
        let norm = x * x + y * y + z * z;
        if !((norm - 1.0).abs() <= UNIT_TOLERANCE) {
            return Err(Error::NotUnitVector { x, y, z });
        }
        Self::checked_weight(weight)?;
        Ok(Self { x, y, z, weight })
    }

    /// Reduced 1D direction, the cosine may not be zero
    ///
    /// ```rust
    /// # use sntools_quadrature::Ordinate;
    /// let ordinate = Ordinate::new_1d(-0.5, 1.0).unwrap();
    /// assert_eq!((ordinate.eta(), ordinate.xi()), (0.0, 0.0));
    /// assert!(Ordinate::new_1d(0.0, 1.0).is_err());
    /// ```
    pub fn new_1d(x: f64, weight: f64) -> Result<Self> {
        if x == 0.0 || !x.is_finite() || x.abs() > 1.0 {
            return Err(Error::ZeroCosine);
        }
        Self::checked_weight(weight)?;
        Ok(Self {
            x,
            y: 0.0,
            z: 0.0,
            weight,
        })
    }

    /// Unchecked construction for directions derived from a validated set
    pub(crate) fn from_parts(x: f64, y: f64, z: f64, weight: f64) -> Self {
        Self { x, y, z, weight }
    }

    fn checked_weight(weight: f64) -> Result<()> {
        if weight.is_finite() && weight >= 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidWeight { index: 0, weight })
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn mu(&self) -> f64 {
        self.x
    }

    pub fn eta(&self) -> f64 {
        self.y
    }

    pub fn xi(&self) -> f64 {
        self.z
    }

    pub fn wt(&self) -> f64 {
        self.weight
    }

    /// Direction cosines as `[x, y, z]`
    pub fn cosines(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Zero weight directions only exist to start a level
    pub fn is_starting_direction(&self) -> bool {
        self.weight == 0.0
    }
}

/// Canonical ordering of ordinates, `z` ascending then `x` ascending
///
/// This is a strict weak ordering, so sorting with it groups every level of
/// a set together with its directions in sweep order.
///
/// ```rust
/// # use sntools_quadrature::{sn_compare, Ordinate};
/// # use std::cmp::Ordering;
/// let a = Ordinate::new(-0.6, 0.0, -0.8, 1.0).unwrap();
/// let b = Ordinate::new(0.6, 0.0, -0.8, 1.0).unwrap();
/// let c = Ordinate::new(-0.6, 0.0, 0.8, 1.0).unwrap();
/// assert_eq!(sn_compare(&a, &b), Ordering::Less);
/// assert_eq!(sn_compare(&b, &c), Ordering::Less);
/// assert_eq!(sn_compare(&a, &a), Ordering::Equal);
/// ```
pub fn sn_compare(a: &Ordinate, b: &Ordinate) -> Ordering {
    a.z.total_cmp(&b.z).then_with(|| a.x.total_cmp(&b.x))
}
