use crate::types::{AngularVelocity, Matrix3, Position, Quaternion, Velocity};
use alloc::string::String;

/// The timestamp and reference frame of a sample or output packet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header<T> {
    /// The sample time, in seconds.
    pub timestamp: T,
    /// The reference frame the pose is expressed in.
    pub frame_id: String,
}

impl<T> Header<T> {
    /// Initializes a new [`Header`] instance.
    pub fn new<F>(timestamp: T, frame_id: F) -> Self
    where
        F: Into<String>,
    {
        Self {
            timestamp,
            frame_id: frame_id.into(),
        }
    }
}

/// A timestamped pose observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoseSample<T, Q = Quaternion<T>> {
    pub header: Header<T>,
    /// The observed position, in meters.
    pub position: Position<T>,
    /// The observed orientation.
    pub orientation: Q,
}

impl<T, Q> PoseSample<T, Q> {
    /// Initializes a new [`PoseSample`] instance.
    pub fn new(header: Header<T>, position: Position<T>, orientation: Q) -> Self {
        Self {
            header,
            position,
            orientation,
        }
    }
}

/// The fused motion estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Odometry<T, Q = Quaternion<T>> {
    pub header: Header<T>,
    /// The frame of the body the twist is expressed in.
    pub child_frame_id: String,
    /// The fused position, in meters.
    pub position: Position<T>,
    /// The orientation of the sample, passed through unfiltered.
    pub orientation: Q,
    /// The fused linear velocity, in meters per second.
    pub velocity: Velocity<T>,
    /// The differentiated angular velocity, in radians per second.
    pub angular_velocity: AngularVelocity<T>,
    /// The position block of the estimate covariance.
    pub position_covariance: Matrix3<T>,
    /// The velocity block of the estimate covariance.
    pub velocity_covariance: Matrix3<T>,
}

/// A pose-only packet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoseStamped<T, Q = Quaternion<T>> {
    pub header: Header<T>,
    pub position: Position<T>,
    pub orientation: Q,
}

/// A rigid transform from the header frame to the child frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformStamped<T, Q = Quaternion<T>> {
    pub header: Header<T>,
    pub child_frame_id: String,
    pub translation: Position<T>,
    pub rotation: Q,
}

/// All packets produced for one processed sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FusionOutput<T, Q = Quaternion<T>> {
    /// The fused estimate in the absolute frame.
    pub odometry: Odometry<T, Q>,
    /// The fused estimate relative to the first observed position.
    pub local_odometry: Odometry<T, Q>,
    /// The observed pose, relabeled with the mocap frame id.
    pub mocap_pose: PoseStamped<T, Q>,
    /// The fused pose as a transform, if transforms are enabled.
    pub transform: Option<TransformStamped<T, Q>>,
    /// Whether the position measurement was fused into the estimate.
    pub measurement_accepted: bool,
}
