/// Relative floating point comparison
///
/// A value is softly equivalent to a reference when the difference is within
/// `precision` relative to the reference. A reference below `1e-14` in
/// magnitude is treated as zero, and the value is then compared in absolute
/// terms against `precision`.
///
/// ```rust
/// # use sntools_utils::SoftEquiv;
/// assert!(1.0000000001_f64.soft_equiv(&1.0, 1e-9));
/// assert!(!1.01_f64.soft_equiv(&1.0, 1e-9));
///
/// // zero is compared in absolute terms
/// assert!(1e-14_f64.soft_equiv(&0.0, 1e-12));
/// assert!(0.0_f64.soft_equiv(&1e-15, 1e-12));
///
/// // slices must match in length as well as value
/// assert!([1.0_f64, 2.0].soft_equiv(&[1.0, 2.0][..], 1e-12));
/// assert!(![1.0_f64, 2.0].soft_equiv(&[1.0][..], 1e-12));
/// ```
pub trait SoftEquiv<Rhs: ?Sized = Self> {
    /// Check `self` against `reference` to within relative `precision`
    fn soft_equiv(&self, reference: &Rhs, precision: f64) -> bool;
}

/// References smaller than this are treated as zero
const ZERO_THRESHOLD: f64 = 1e-14;

impl SoftEquiv for f64 {
    fn soft_equiv(&self, reference: &f64, precision: f64) -> bool {
        if (self - reference).abs() <= precision * reference.abs() {
            true
        } else {
            reference.abs() < ZERO_THRESHOLD && self.abs() < precision
        }
    }
}

impl SoftEquiv for [f64] {
    fn soft_equiv(&self, reference: &[f64], precision: f64) -> bool {
        self.len() == reference.len()
            && self
                .iter()
                .zip(reference)
                .all(|(value, reference)| value.soft_equiv(reference, precision))
    }
}
