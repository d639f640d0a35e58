use minikalman::matrix::MatrixDataType;
use num_traits::float::FloatCore;

/// The scalar type used throughout the estimators, e.g. `f32` or `f64`.
///
/// Combines the arithmetic required by the Kalman filter buffers with the
/// floating-point queries (finiteness, epsilon, comparisons) required for
/// validating inputs at the estimator boundary.
pub trait Scalar: MatrixDataType + FloatCore {
    /// Returns `0.5`.
    #[inline(always)]
    fn half() -> Self {
        Self::one() / (Self::one() + Self::one())
    }

    /// Returns `2.0`.
    #[inline(always)]
    fn two() -> Self {
        Self::one() + Self::one()
    }
}

impl<T> Scalar for T where T: MatrixDataType + FloatCore {}

/// Determines whether all values of a container are finite numbers.
pub trait AllFinite {
    /// Returns `true` if no element is NaN or infinite.
    fn all_finite(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_f32() {
        assert_eq!(f32::half(), 0.5);
        assert_eq!(f32::two(), 2.0);
    }

    #[test]
    fn test_constants_f64() {
        assert_eq!(f64::half(), 0.5);
        assert_eq!(f64::two(), 2.0);
    }
}
