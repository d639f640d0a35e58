use crate::impl_standard_traits;
use uniform_array_derive::UniformArray;

/// The position measurement noise (sigma-squared) for each axis, in m².
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct MeasurementNoise<T> {
    /// The position variance along the x-axis, in m².
    pub x: T,
    /// The position variance along the y-axis, in m².
    pub y: T,
    /// The position variance along the z-axis, in m².
    pub z: T,
}

impl<T> MeasurementNoise<T> {
    /// Initializes a new [`MeasurementNoise`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Builds an isotropic measurement noise from a position standard deviation, in meters.
    pub fn from_std_dev(sigma: T) -> Self
    where
        T: Copy + core::ops::Mul<T, Output = T>,
    {
        let variance = sigma * sigma;
        Self::new(variance, variance, variance)
    }
}

impl_standard_traits!(MeasurementNoise, T, x, y, z);
