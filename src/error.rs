use thiserror::Error;

/// Errors raised while validating the fusion configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("The sample rate must be finite and positive")]
    InvalidSampleRate,
    #[error("The maximum acceleration must be finite and non-negative")]
    InvalidMaxAcceleration,
    #[error("The measurement standard deviation must be finite and non-negative")]
    InvalidMeasurementStdDev,
    #[error("The initial covariance scale must be finite and non-negative")]
    InvalidCovarianceScale,
    #[error("The angular rate time floor must be finite and non-negative")]
    InvalidRateFloor,
    #[error("A child frame id is required for publishing transforms")]
    MissingChildFrameId,
}

/// Errors raised by the position and velocity estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimatorError {
    #[error("The time step must not be negative")]
    NegativeTimeStep,
    #[error("The time step must be a finite number")]
    NonFiniteTimeStep,
    #[error("The measurement contains non-finite values")]
    NonFiniteMeasurement,
    #[error("The initial state contains non-finite values")]
    NonFiniteState,
    #[error("Noise variances must be finite and non-negative")]
    InvalidNoise,
    #[error("The initial covariance scale must be finite and non-negative")]
    InvalidCovarianceScale,
    #[error("The innovation covariance is singular")]
    SingularInnovationCovariance,
    #[error("The state estimate diverged to non-finite values")]
    DivergedState,
}

/// Errors raised by the fusion driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),
    #[error("The sample timestamp precedes the previously processed sample")]
    NonMonotonicTimestamp,
    #[error("The sample timestamp is not a finite number")]
    NonFiniteTimestamp,
    #[error("The sample orientation does not describe a rotation")]
    InvalidOrientation,
}
