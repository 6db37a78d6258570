use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use sntools_utils::SliceExt;
    /// # use sntools_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1_f64, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([1.1_f64, f64::MIN, 2.2].try_min(), Ok(f64::MIN));
    ///
    /// // Error cases
    /// assert_eq!([1.1_f64, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// The float primitives do not implement `Ord` due to `NaN` being
    /// incomparable, so this uses `total_cmp` to always produce an ordering in
    /// accordance with the IEEE 754 totalOrder predicate.
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// Only provides the maximum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use sntools_utils::SliceExt;
    /// # use sntools_utils::Error;
    /// assert_eq!([1.1_f64, 0.5, 2.2].try_max(), Ok(2.2));
    /// assert_eq!([1.1_f64, f64::INFINITY].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// ```
    fn try_max(&self) -> Result<T>;

    /// Sorted unique values, merging anything within an absolute tolerance
    ///
    /// Values are sorted ascending and a new value is only started once it
    /// differs from the current one by more than `tol`. The first value seen
    /// in each cluster is the one kept.
    ///
    /// ```rust
    /// # use sntools_utils::SliceExt;
    /// let xi = [0.5_f64, -0.5, 0.5 + 1e-14, 0.25];
    /// assert_eq!(xi.unique_within(1e-12), Ok(vec![-0.5, 0.25, 0.5]));
    /// ```
    fn unique_within(&self, tol: T) -> Result<Vec<T>>;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .max_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn unique_within(&self, tol: f64) -> Result<Vec<f64>> {
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::UnreasonableTolerance { tolerance: tol });
        }

        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        let mut sorted = self.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut unique: Vec<f64> = Vec::with_capacity(sorted.len());
        for value in sorted {
            match unique.last() {
                Some(last) if (value - last).abs() <= tol => continue,
                _ => unique.push(value),
            }
        }

        Ok(unique)
    }
}
