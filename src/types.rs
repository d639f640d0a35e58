mod angular_velocity;
mod innovation;
mod matrix3;
mod measurement_noise;
mod position;
mod process_noise;
mod quaternion;
mod state;
mod velocity;

pub use crate::types::angular_velocity::AngularVelocity;
pub use crate::types::innovation::Innovation;
pub use crate::types::matrix3::Matrix3;
pub use crate::types::measurement_noise::MeasurementNoise;
pub use crate::types::position::Position;
pub use crate::types::process_noise::ProcessNoise;
pub use crate::types::quaternion::Quaternion;
pub use crate::types::state::{Covariance, State};
pub use crate::types::velocity::Velocity;
