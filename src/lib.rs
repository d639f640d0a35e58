//! Position, velocity and angular rate estimation from timestamped pose observations.
//!
//! The [`PositionVelocityEstimator`] is a linear Kalman filter over a constant-velocity
//! motion model; the [`AngularRateDifferentiator`] derives angular rates from consecutive
//! orientations. The [`FusionDriver`] runs both for every incoming [`PoseSample`] and
//! packages the results as [`Odometry`].

// Enable no_std mode.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod config;
mod differentiator;
pub mod driver;
mod error;
pub mod estimator;
mod gate;
mod macros;
mod num_traits;
mod orientation;
mod types;

pub use crate::config::FusionConfig;
pub use crate::differentiator::AngularRateDifferentiator;
pub use crate::driver::{
    FusionDriver, FusionOutput, Header, Odometry, OdometrySink, PoseSample, PoseStamped,
    TransformStamped,
};
pub use crate::error::{ConfigError, EstimatorError, FusionError};
pub use crate::estimator::PositionVelocityEstimator;
pub use crate::gate::{AcceptAll, InnovationGate, MeasurementGate};
pub use crate::orientation::Orientation;
pub use crate::types::*;

pub use crate::num_traits::*;
