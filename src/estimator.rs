//! A constant-velocity position and velocity estimator.

mod filter;
mod types;

pub use filter::PositionVelocityEstimator;
