//! Per-sample orchestration of the estimator and the angular rate differentiator.

mod messages;
mod sink;

pub use messages::{FusionOutput, Header, Odometry, PoseSample, PoseStamped, TransformStamped};
pub use sink::OdometrySink;

use crate::config::FusionConfig;
use crate::differentiator::AngularRateDifferentiator;
use crate::error::{EstimatorError, FusionError};
use crate::estimator::PositionVelocityEstimator;
use crate::gate::{AcceptAll, MeasurementGate};
use crate::num_traits::{AllFinite, Scalar};
use crate::orientation::Orientation;
use crate::types::{AngularVelocity, Matrix3, Position, State};
use core::fmt::Debug;

/// The estimator and its timing state, created from the first sample.
struct Tracking<T> {
    estimator: PositionVelocityEstimator<T>,
    /// The first observed position.
    origin: Position<T>,
    last_process_time: T,
    last_measurement_time: T,
}

/// Fuses a stream of timestamped pose samples into odometry.
///
/// Every sample drives one prediction, an optional correction (subject to the
/// measurement gate) and one angular rate differentiation step. The first
/// sample initializes the estimator at rest at the observed position.
pub struct FusionDriver<T, G = AcceptAll> {
    config: FusionConfig<T>,
    gate: G,
    differentiator: AngularRateDifferentiator<T>,
    /// `None` until the first sample arrives.
    tracking: Option<Tracking<T>>,
}

impl<T> FusionDriver<T, AcceptAll> {
    /// Initializes a new [`FusionDriver`] that fuses every measurement.
    pub fn new(config: FusionConfig<T>) -> Result<Self, FusionError>
    where
        T: Scalar + Debug,
    {
        Self::with_gate(config, AcceptAll)
    }
}

impl<T, G> FusionDriver<T, G> {
    /// Initializes a new [`FusionDriver`] with a custom measurement gate.
    ///
    /// ## Arguments
    /// * `config` - The fusion configuration; validated here.
    /// * `gate` - Decides for every sample whether its position is fused.
    pub fn with_gate(config: FusionConfig<T>, gate: G) -> Result<Self, FusionError>
    where
        T: Scalar + Debug,
    {
        config.validate()?;

        tracing::info!(
            max_acceleration = ?config.max_acceleration,
            sample_rate = ?config.sample_rate,
            initial_covariance_scale = ?config.initial_covariance_scale,
            measurement_std_dev = ?config.measurement_std_dev,
            rate_floor = ?config.rate_floor,
            publish_transform = config.publish_transform,
            child_frame_id = %config.child_frame_id,
            mocap_frame_id = %config.mocap_frame_id,
            "Configured pose fusion"
        );

        Ok(Self {
            differentiator: AngularRateDifferentiator::new(config.rate_floor),
            config,
            gate,
            tracking: None,
        })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &FusionConfig<T> {
        &self.config
    }

    /// Gets the measurement gate.
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Gets the measurement gate mutably.
    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Indicates whether the first sample was processed.
    pub fn is_initialized(&self) -> bool {
        self.tracking.is_some()
    }

    /// Gets the estimator, if initialized.
    pub fn estimator(&self) -> Option<&PositionVelocityEstimator<T>> {
        self.tracking.as_ref().map(|tracking| &tracking.estimator)
    }

    /// Gets the first observed position, if initialized.
    pub fn origin(&self) -> Option<Position<T>>
    where
        T: Copy,
    {
        self.tracking.as_ref().map(|tracking| tracking.origin)
    }

    /// Gets the timestamp of the last predicted sample, if initialized.
    pub fn last_process_time(&self) -> Option<T>
    where
        T: Copy,
    {
        self.tracking
            .as_ref()
            .map(|tracking| tracking.last_process_time)
    }

    /// Gets the timestamp of the last fused measurement, if initialized.
    pub fn last_measurement_time(&self) -> Option<T>
    where
        T: Copy,
    {
        self.tracking
            .as_ref()
            .map(|tracking| tracking.last_measurement_time)
    }

    /// Gets the last computed angular velocity.
    pub fn angular_velocity(&self) -> AngularVelocity<T>
    where
        T: Copy,
    {
        self.differentiator.angular_velocity()
    }

    /// Discards the estimate; the next sample initializes the estimator again.
    pub fn reset(&mut self)
    where
        T: Scalar,
    {
        self.tracking = None;
        self.differentiator.reset();
    }
}

impl<T, G> FusionDriver<T, G> {
    /// Processes a pose sample and returns the resulting packets.
    ///
    /// ## Errors
    /// Samples with a non-finite timestamp, position or orientation, and samples
    /// older than the previous one, are rejected without modifying the driver.
    /// Estimator failures (e.g. a singular innovation covariance) are reported as well.
    pub fn process<Q>(&mut self, sample: &PoseSample<T, Q>) -> Result<FusionOutput<T, Q>, FusionError>
    where
        T: Scalar + Default + Debug,
        G: MeasurementGate<T>,
        Q: Orientation<T> + Clone,
    {
        let timestamp = sample.header.timestamp;
        if !timestamp.is_finite() {
            tracing::warn!("Rejected sample with non-finite timestamp");
            return Err(FusionError::NonFiniteTimestamp);
        }
        if !sample.position.all_finite() {
            tracing::warn!(?timestamp, "Rejected sample with non-finite position");
            return Err(EstimatorError::NonFiniteMeasurement.into());
        }

        let rotation = sample.orientation.rotation_matrix();
        if !rotation.all_finite() {
            tracing::warn!(?timestamp, "Rejected sample with invalid orientation");
            return Err(FusionError::InvalidOrientation);
        }

        let mut tracking = match self.tracking.take() {
            Some(tracking) => tracking,
            None => self.bootstrap(sample.position, timestamp)?,
        };

        let result = self.cycle(&mut tracking, sample, rotation);
        self.tracking = Some(tracking);
        result
    }

    /// Processes a pose sample and hands the resulting packets to the sink.
    pub fn process_into<Q, S>(
        &mut self,
        sample: &PoseSample<T, Q>,
        sink: &mut S,
    ) -> Result<(), FusionError>
    where
        T: Scalar + Default + Debug,
        G: MeasurementGate<T>,
        Q: Orientation<T> + Clone,
        S: OdometrySink<T, Q> + ?Sized,
    {
        let output = self.process(sample)?;

        sink.odometry(&output.odometry);
        if let Some(transform) = &output.transform {
            sink.transform(transform);
        }
        sink.local_odometry(&output.local_odometry);
        sink.mocap_pose(&output.mocap_pose);
        Ok(())
    }

    /// Creates the estimator at rest at the first observed position.
    fn bootstrap(&self, position: Position<T>, timestamp: T) -> Result<Tracking<T>, FusionError>
    where
        T: Scalar + Default + Debug,
    {
        let estimator = PositionVelocityEstimator::new(
            State::at_rest(position),
            self.config.initial_covariance_scale,
            self.config.process_noise(),
            self.config.measurement_noise(),
        )?;

        tracing::info!(
            x = ?position.x,
            y = ?position.y,
            z = ?position.z,
            ?timestamp,
            "Initialized estimator from first sample"
        );

        Ok(Tracking {
            estimator,
            origin: position,
            last_process_time: timestamp,
            last_measurement_time: timestamp,
        })
    }

    /// Runs predict, gate, correct, differentiate and packaging for one sample.
    fn cycle<Q>(
        &mut self,
        tracking: &mut Tracking<T>,
        sample: &PoseSample<T, Q>,
        rotation: Matrix3<T>,
    ) -> Result<FusionOutput<T, Q>, FusionError>
    where
        T: Scalar + Debug,
        G: MeasurementGate<T>,
        Q: Clone,
    {
        let timestamp = sample.header.timestamp;
        let process_delta_t = timestamp - tracking.last_process_time;
        if process_delta_t < T::zero() {
            tracing::warn!(
                ?timestamp,
                last_process_time = ?tracking.last_process_time,
                "Rejected sample with timestamp going backwards"
            );
            return Err(FusionError::NonMonotonicTimestamp);
        }

        tracking.estimator.predict(process_delta_t)?;
        tracking.last_process_time = timestamp;

        let innovation = tracking.estimator.innovation(&sample.position)?;
        let measurement_accepted = self.gate.accept(&innovation);
        if measurement_accepted {
            let measurement_delta_t = timestamp - tracking.last_measurement_time;
            tracking
                .estimator
                .correct(&sample.position, measurement_delta_t)?;
            tracking.last_measurement_time = timestamp;
        } else {
            tracing::debug!(
                ?timestamp,
                normalized_squared = ?innovation.normalized_squared,
                "Measurement rejected by gate, skipping correction"
            );
        }

        let angular_velocity = self.differentiator.step(&rotation, process_delta_t);

        let state = tracking.estimator.state();
        let covariance = tracking.estimator.covariance();

        tracing::trace!(
            ?timestamp,
            position = ?state.position,
            velocity = ?state.velocity,
            ?angular_velocity,
            "Fused pose sample"
        );

        let odometry = Odometry {
            header: sample.header.clone(),
            child_frame_id: sample.header.frame_id.clone(),
            position: state.position,
            orientation: sample.orientation.clone(),
            velocity: state.velocity,
            angular_velocity,
            position_covariance: covariance.position_block(),
            velocity_covariance: covariance.velocity_block(),
        };

        let transform = self.config.publish_transform.then(|| TransformStamped {
            header: sample.header.clone(),
            child_frame_id: self.config.child_frame_id.clone(),
            translation: state.position,
            rotation: sample.orientation.clone(),
        });

        let local_odometry = Odometry {
            position: state.position.relative_to(tracking.origin),
            ..odometry.clone()
        };

        let mocap_pose = PoseStamped {
            header: Header::new(timestamp, self.config.mocap_frame_id.clone()),
            position: sample.position,
            orientation: sample.orientation.clone(),
        };

        Ok(FusionOutput {
            odometry,
            local_odometry,
            mocap_pose,
            transform,
            measurement_accepted,
        })
    }
}
