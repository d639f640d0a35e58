use crate::types::{Matrix3, Position};
use core::fmt::{Debug, Formatter};

/// The innovation of a position measurement against the predicted state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Innovation<T> {
    /// The measurement residual `z − H·x`, in meters.
    pub residual: Position<T>,
    /// The innovation covariance `S = H·P·Hᵀ + R`, in m².
    pub covariance: Matrix3<T>,
    /// The normalized innovation squared `yᵀ·S⁻¹·y`.
    ///
    /// For a consistent filter this follows a χ² distribution with three degrees of freedom.
    pub normalized_squared: T,
}

impl<T> Copy for Innovation<T> where T: Copy {}

impl<T> Clone for Innovation<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            residual: self.residual.clone(),
            covariance: self.covariance.clone(),
            normalized_squared: self.normalized_squared.clone(),
        }
    }
}

impl<T> Debug for Innovation<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Innovation")
            .field("residual", &self.residual)
            .field("covariance", &self.covariance)
            .field("normalized_squared", &self.normalized_squared)
            .finish()
    }
}
