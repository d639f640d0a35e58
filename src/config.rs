//! Configuration of the fusion driver.

use crate::error::ConfigError;
use crate::num_traits::Scalar;
use crate::types::{MeasurementNoise, ProcessNoise};
use alloc::string::String;

/// Configuration values consumed once when the fusion driver is constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FusionConfig<T> {
    /// The maximum expected acceleration, in m/s²; scales the process noise.
    pub max_acceleration: T,
    /// The nominal pose sample rate, in Hz.
    pub sample_rate: T,
    /// The initial estimate covariance is this value times identity.
    pub initial_covariance_scale: T,
    /// The standard deviation of the position measurements, in meters.
    pub measurement_std_dev: T,
    /// The smallest time step, in seconds, used for differentiating orientations.
    pub rate_floor: T,
    /// Whether a transform is emitted for every processed sample.
    pub publish_transform: bool,
    /// The child frame of the emitted transform.
    pub child_frame_id: String,
    /// The frame id attached to the relabeled pose packet.
    pub mocap_frame_id: String,
}

impl<T> FusionConfig<T> {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError>
    where
        T: Scalar,
    {
        if !self.sample_rate.is_finite() || self.sample_rate <= T::zero() {
            return Err(ConfigError::InvalidSampleRate);
        }
        if !Self::is_non_negative(self.max_acceleration) {
            return Err(ConfigError::InvalidMaxAcceleration);
        }
        if !Self::is_non_negative(self.measurement_std_dev) {
            return Err(ConfigError::InvalidMeasurementStdDev);
        }
        if !Self::is_non_negative(self.initial_covariance_scale) {
            return Err(ConfigError::InvalidCovarianceScale);
        }
        if !Self::is_non_negative(self.rate_floor) {
            return Err(ConfigError::InvalidRateFloor);
        }
        if self.publish_transform && self.child_frame_id.is_empty() {
            return Err(ConfigError::MissingChildFrameId);
        }
        Ok(())
    }

    /// Returns the nominal sample interval `1 / sample_rate`, in seconds.
    pub fn nominal_delta_t(&self) -> T
    where
        T: Scalar,
    {
        T::one() / self.sample_rate
    }

    /// Derives the process noise from the maximum acceleration and the nominal sample interval.
    pub fn process_noise(&self) -> ProcessNoise<T>
    where
        T: Scalar,
    {
        ProcessNoise::from_max_acceleration(self.max_acceleration, self.nominal_delta_t())
    }

    /// Derives the measurement noise variances from the standard deviation.
    pub fn measurement_noise(&self) -> MeasurementNoise<T>
    where
        T: Scalar,
    {
        MeasurementNoise::from_std_dev(self.measurement_std_dev)
    }

    fn is_non_negative(value: T) -> bool
    where
        T: Scalar,
    {
        value.is_finite() && value >= T::zero()
    }
}

macro_rules! impl_default_config {
    ($type:ty) => {
        impl Default for FusionConfig<$type> {
            fn default() -> Self {
                Self {
                    max_acceleration: 5.0,
                    sample_rate: 20.0,
                    initial_covariance_scale: 1.0,
                    measurement_std_dev: 1e-2,
                    rate_floor: 1e-6,
                    publish_transform: true,
                    child_frame_id: String::from("base_link"),
                    mocap_frame_id: String::from("fcu"),
                }
            }
        }
    };
}

impl_default_config!(f32);
impl_default_config!(f64);
