//! Measurement acceptance tests evaluated before a correction step.

use crate::num_traits::Scalar;
use crate::types::Innovation;

/// Decides whether a position measurement is fused into the estimate.
pub trait MeasurementGate<T> {
    /// Returns `true` if the measurement described by the innovation should be applied.
    fn accept(&mut self, innovation: &Innovation<T>) -> bool;
}

/// Accepts every measurement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AcceptAll;

impl<T> MeasurementGate<T> for AcceptAll {
    #[inline(always)]
    fn accept(&mut self, _innovation: &Innovation<T>) -> bool {
        true
    }
}

/// Accepts measurements whose normalized innovation squared does not exceed a threshold.
///
/// The statistic follows a χ² distribution with three degrees of freedom; e.g. a
/// threshold of `7.815` rejects about 5% of consistent measurements, `11.345` about 1%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnovationGate<T> {
    threshold: T,
}

impl<T> InnovationGate<T> {
    /// Initializes a new [`InnovationGate`] with the given χ² threshold.
    pub const fn new(threshold: T) -> Self {
        Self { threshold }
    }

    /// Gets the χ² threshold.
    pub fn threshold(&self) -> T
    where
        T: Copy,
    {
        self.threshold
    }
}

impl<T> MeasurementGate<T> for InnovationGate<T>
where
    T: Scalar,
{
    fn accept(&mut self, innovation: &Innovation<T>) -> bool {
        innovation.normalized_squared <= self.threshold
    }
}

impl<T, F> MeasurementGate<T> for F
where
    F: FnMut(&Innovation<T>) -> bool,
{
    #[inline]
    fn accept(&mut self, innovation: &Innovation<T>) -> bool {
        self(innovation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Matrix3, Position};

    fn innovation(normalized_squared: f64) -> Innovation<f64> {
        Innovation {
            residual: Position::new(0.0, 0.0, 0.0),
            covariance: Matrix3::identity(),
            normalized_squared,
        }
    }

    #[test]
    fn test_accept_all() {
        let mut gate = AcceptAll;
        assert!(gate.accept(&innovation(0.0)));
        assert!(gate.accept(&innovation(1e9)));
    }

    #[test]
    fn test_innovation_gate() {
        let mut gate = InnovationGate::new(7.815);
        assert!(gate.accept(&innovation(1.0)));
        assert!(gate.accept(&innovation(7.815)));
        assert!(!gate.accept(&innovation(7.9)));
        assert!(!gate.accept(&innovation(f64::NAN)));
    }

    #[test]
    fn test_closure_gate() {
        let mut calls = 0;
        let mut gate = |innovation: &Innovation<f64>| {
            calls += 1;
            innovation.residual.x.abs() < 1.0
        };
        assert!(gate.accept(&innovation(0.0)));
        assert_eq!(calls, 1);
    }
}
