use crate::error::EstimatorError;
use crate::estimator::types::{OwnedKalmanFilter, OwnedPositionObservation, OBSERVATIONS, STATES};
use crate::num_traits::{AllFinite, Scalar};
use crate::types::{
    Covariance, Innovation, Matrix3, MeasurementNoise, Position, ProcessNoise, State, Velocity,
};
use minikalman::buffers::types::*;
use minikalman::prelude::*;
use minikalman::regular::{RegularKalmanBuilder, RegularObservationBuilder};

/// A linear Kalman filter estimating position and velocity from position measurements
/// under a constant-velocity motion model.
///
/// The state vector is `(x, y, z, vx, vy, vz)`. Predictions propagate the
/// covariance as `P' = F·P·Fᵀ + Q`; corrections update the covariance in Joseph
/// form so that it stays symmetric and positive semi-definite.
pub struct PositionVelocityEstimator<T> {
    filter: OwnedKalmanFilter<T>,
    measurement: OwnedPositionObservation<T>,
    /// The diagonal of the process noise covariance.
    process_noise: ProcessNoise<T>,
    /// The diagonal of the measurement noise covariance.
    measurement_noise: MeasurementNoise<T>,
}

impl<T> PositionVelocityEstimator<T> {
    /// Initializes a new instance of the [`PositionVelocityEstimator`] struct.
    ///
    /// ## Arguments
    /// * `initial_state` - The initial position and velocity, typically the first
    ///   observed position at rest.
    /// * `initial_covariance_scale` - The initial estimate covariance is this value times identity.
    /// * `process_noise` - The process noise variances added on every prediction.
    /// * `measurement_noise` - The position measurement noise values (sigma-squared) for each axis.
    pub fn new(
        initial_state: State<T>,
        initial_covariance_scale: T,
        process_noise: ProcessNoise<T>,
        measurement_noise: MeasurementNoise<T>,
    ) -> Result<Self, EstimatorError>
    where
        T: Scalar + Default,
    {
        if !initial_state.all_finite() {
            return Err(EstimatorError::NonFiniteState);
        }
        if !initial_covariance_scale.is_finite() || initial_covariance_scale < T::zero() {
            return Err(EstimatorError::InvalidCovarianceScale);
        }
        if !process_noise.is_valid()
            || !measurement_noise.all_finite()
            || (0..OBSERVATIONS).any(|i| measurement_noise[i] < T::zero())
        {
            return Err(EstimatorError::InvalidNoise);
        }

        let filter = Self::build_filter(&initial_state, initial_covariance_scale, &process_noise);
        let measurement = Self::build_measurement(&measurement_noise);

        Ok(Self {
            filter,
            measurement,
            process_noise,
            measurement_noise,
        })
    }
}

impl<T> PositionVelocityEstimator<T> {
    /// Obtains the current state estimate.
    pub fn state(&self) -> State<T>
    where
        T: Copy,
    {
        State::new(self.position(), self.velocity())
    }

    /// Obtains the current position estimate, in meters.
    pub fn position(&self) -> Position<T>
    where
        T: Copy,
    {
        let state = self.filter.state_vector();
        Position::new(state.get_row(0), state.get_row(1), state.get_row(2))
    }

    /// Obtains the current velocity estimate, in meters per second.
    pub fn velocity(&self) -> Velocity<T>
    where
        T: Copy,
    {
        let state = self.filter.state_vector();
        Velocity::new(state.get_row(3), state.get_row(4), state.get_row(5))
    }

    /// Obtains a snapshot of the full 6×6 estimate covariance.
    pub fn covariance(&self) -> Covariance<T>
    where
        T: Scalar,
    {
        let covariance = self.filter.estimate_covariance();
        let mut values = [[T::zero(); STATES]; STATES];
        for (row, values) in values.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = covariance.get_at(row, col);
            }
        }
        Covariance::from_rows(values)
    }

    /// Obtains the current position covariance block, in m².
    pub fn position_covariance(&self) -> Matrix3<T>
    where
        T: Scalar,
    {
        self.covariance().position_block()
    }

    /// Obtains the current velocity covariance block, in m²/s².
    pub fn velocity_covariance(&self) -> Matrix3<T>
    where
        T: Scalar,
    {
        self.covariance().velocity_block()
    }

    /// Gets the process noise variances.
    pub fn process_noise(&self) -> &ProcessNoise<T> {
        &self.process_noise
    }

    /// Gets the measurement noise variances.
    pub fn measurement_noise(&self) -> &MeasurementNoise<T> {
        &self.measurement_noise
    }
}

impl<T> PositionVelocityEstimator<T> {
    /// Performs a prediction step under the constant-velocity model.
    ///
    /// The position advances by `velocity · delta_t`, the velocity stays unchanged,
    /// and the covariance becomes `F·P·Fᵀ + Q`.
    ///
    /// ## Arguments
    /// * `delta_t` - The elapsed time since the last prediction, in seconds. May be zero;
    ///   negative or non-finite values are rejected and leave the filter unchanged.
    pub fn predict(&mut self, delta_t: T) -> Result<(), EstimatorError>
    where
        T: Scalar,
    {
        Self::validate_time_step(delta_t)?;

        self.filter.state_transition_mut().apply(|mat| {
            mat.set_at(0, 3, delta_t);
            mat.set_at(1, 4, delta_t);
            mat.set_at(2, 5, delta_t);
        });

        self.filter.predict();
        self.symmetrize_covariance();
        self.ensure_finite()
    }

    /// Computes the innovation of a position measurement against the current estimate
    /// without modifying the filter.
    ///
    /// ## Arguments
    /// * `measurement` - The observed position, in meters.
    pub fn innovation(&self, measurement: &Position<T>) -> Result<Innovation<T>, EstimatorError>
    where
        T: Scalar,
    {
        if !measurement.all_finite() {
            return Err(EstimatorError::NonFiniteMeasurement);
        }

        let covariance = self.innovation_covariance();
        let inverse = covariance
            .try_inverse_spd()
            .ok_or(EstimatorError::SingularInnovationCovariance)?;

        let residual = *measurement - self.position();
        let normalized_squared = inverse.quadratic_form([residual.x, residual.y, residual.z]);

        Ok(Innovation {
            residual,
            covariance,
            normalized_squared,
        })
    }

    /// Performs a correction step using a position measurement.
    ///
    /// The state is updated through the Kalman gain `K = P·Hᵀ·S⁻¹`; the covariance is
    /// updated in Joseph form, `(I − K·H)·P·(I − K·H)ᵀ + K·R·Kᵀ`.
    ///
    /// ## Arguments
    /// * `measurement` - The observed position, in meters.
    /// * `delta_t` - The elapsed time since the last correction, in seconds.
    ///
    /// ## Errors
    /// Fails without modifying the filter if the measurement or time step is invalid,
    /// or if the innovation covariance `S` is not invertible.
    pub fn correct(&mut self, measurement: &Position<T>, delta_t: T) -> Result<(), EstimatorError>
    where
        T: Scalar,
    {
        Self::validate_time_step(delta_t)?;
        if !measurement.all_finite() {
            return Err(EstimatorError::NonFiniteMeasurement);
        }

        let prior = self.covariance();
        let inverse = self
            .innovation_covariance()
            .try_inverse_spd()
            .ok_or(EstimatorError::SingularInnovationCovariance)?;
        let gain = Self::kalman_gain(&prior, &inverse);

        // Apply the measurement.
        self.measurement.measurement_vector_mut().apply(|vec| {
            vec.set_row(0, measurement.x);
            vec.set_row(1, measurement.y);
            vec.set_row(2, measurement.z);
        });

        // Perform the update step; the state update is taken from the filter,
        // the covariance is replaced by the Joseph form.
        self.filter.correct(&mut self.measurement);

        let posterior = self.joseph_update(prior.rows(), &gain);
        self.filter.estimate_covariance_mut().apply(|mat| {
            for (row, values) in posterior.iter().enumerate() {
                for (col, value) in values.iter().enumerate() {
                    mat.set_at(row, col, *value);
                }
            }
        });
        self.symmetrize_covariance();
        self.ensure_finite()
    }

    /// Computes `S = H·P·Hᵀ + R`, i.e. the position block of `P` plus the measurement noise.
    fn innovation_covariance(&self) -> Matrix3<T>
    where
        T: Scalar,
    {
        let noise = &self.measurement_noise;
        self.position_covariance() + Matrix3::from_diagonal(noise.x, noise.y, noise.z)
    }

    /// Computes `K = P·Hᵀ·S⁻¹`. Since `H` selects the position states,
    /// `P·Hᵀ` consists of the first three columns of `P`.
    fn kalman_gain(
        prior: &Covariance<T>,
        innovation_inverse: &Matrix3<T>,
    ) -> [[T; OBSERVATIONS]; STATES]
    where
        T: Scalar,
    {
        let mut gain = [[T::zero(); OBSERVATIONS]; STATES];
        for (row, gains) in gain.iter_mut().enumerate() {
            for (col, value) in gains.iter_mut().enumerate() {
                *value = (0..OBSERVATIONS).fold(T::zero(), |sum, k| {
                    sum + prior.get(row, k) * innovation_inverse[(k, col)]
                });
            }
        }
        gain
    }

    /// Computes `(I − K·H)·P·(I − K·H)ᵀ + K·R·Kᵀ`.
    fn joseph_update(
        &self,
        prior: &[[T; STATES]; STATES],
        gain: &[[T; OBSERVATIONS]; STATES],
    ) -> [[T; STATES]; STATES]
    where
        T: Scalar,
    {
        // A = I − K·H; H selects the first three states.
        let mut a = [[T::zero(); STATES]; STATES];
        for (row, values) in a.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                let identity = if row == col { T::one() } else { T::zero() };
                let kh = if col < OBSERVATIONS {
                    gain[row][col]
                } else {
                    T::zero()
                };
                *value = identity - kh;
            }
        }

        // A·P
        let mut ap = [[T::zero(); STATES]; STATES];
        for (row, values) in ap.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = (0..STATES).fold(T::zero(), |sum, k| sum + a[row][k] * prior[k][col]);
            }
        }

        // A·P·Aᵀ + K·R·Kᵀ
        let noise = &self.measurement_noise;
        let mut posterior = [[T::zero(); STATES]; STATES];
        for (row, values) in posterior.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                let apat = (0..STATES).fold(T::zero(), |sum, k| sum + ap[row][k] * a[col][k]);
                let krkt = (0..OBSERVATIONS).fold(T::zero(), |sum, k| {
                    sum + gain[row][k] * noise[k] * gain[col][k]
                });
                *value = apat + krkt;
            }
        }
        posterior
    }

    /// Averages the off-diagonal elements of the covariance with their transposed counterparts.
    fn symmetrize_covariance(&mut self)
    where
        T: Scalar,
    {
        self.filter.estimate_covariance_mut().apply(|mat| {
            for row in 0..STATES {
                for col in (row + 1)..STATES {
                    let mean = (mat.get_at(row, col) + mat.get_at(col, row)) * T::half();
                    mat.set_at(row, col, mean);
                    mat.set_at(col, row, mean);
                }
            }
        });
    }

    fn validate_time_step(delta_t: T) -> Result<(), EstimatorError>
    where
        T: Scalar,
    {
        if !delta_t.is_finite() {
            return Err(EstimatorError::NonFiniteTimeStep);
        }
        if delta_t < T::zero() {
            return Err(EstimatorError::NegativeTimeStep);
        }
        Ok(())
    }

    fn ensure_finite(&self) -> Result<(), EstimatorError>
    where
        T: Scalar,
    {
        if self.state().all_finite() && self.covariance().all_finite() {
            Ok(())
        } else {
            tracing::error!("State estimate diverged to non-finite values");
            Err(EstimatorError::DivergedState)
        }
    }
}

impl<T> PositionVelocityEstimator<T> {
    /// Builds the Kalman filter used for prediction.
    fn build_filter(
        initial_state: &State<T>,
        initial_covariance_scale: T,
        process_noise_diagonal: &ProcessNoise<T>,
    ) -> OwnedKalmanFilter<T>
    where
        T: Scalar + Default,
    {
        let zero = T::default();

        // State vector.
        let mut state_vec =
            StateVectorBuffer::<STATES, T, _>::new(MatrixData::new_array::<STATES, 1, STATES, T>(
                [zero; STATES],
            ));
        state_vec.apply(|vec| {
            for (row, value) in initial_state.to_array().iter().enumerate() {
                vec.set_row(row, *value);
            }
        });

        // State transition matrix.
        let mut state_transition =
            StateTransitionMatrixMutBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));

        // The main layout is an identity matrix; the position-velocity coupling
        // in the top-right 3x3 block is set to Δt on every prediction.
        state_transition.make_identity();

        // Estimate covariance matrix.
        let mut estimate_covariance =
            EstimateCovarianceMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));
        estimate_covariance.make_scalar(initial_covariance_scale);

        // Process noise matrix.
        let mut process_noise = DirectProcessNoiseCovarianceMatrixMutBuffer::<STATES, T, _>::new(
            MatrixData::new_array::<STATES, STATES, { STATES * STATES }, T>(
                [zero; { STATES * STATES }],
            ),
        );
        process_noise.apply(|mat| {
            for i in 0..STATES {
                mat.set_at(i, i, process_noise_diagonal[i]);
            }
        });

        // Predicted state vector.
        let predicted_state =
            PredictedStateEstimateVectorBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                1,
                STATES,
                T,
            >([zero; STATES]));

        // Temporary estimate covariance matrix.
        let temp_state_matrix =
            TemporaryStateMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));

        RegularKalmanBuilder::new::<STATES, T>(
            state_transition,
            state_vec,
            estimate_covariance,
            process_noise,
            predicted_state,
            temp_state_matrix,
        )
    }

    /// Builds the Kalman filter observation of the position states.
    fn build_measurement(measurement_noise: &MeasurementNoise<T>) -> OwnedPositionObservation<T>
    where
        T: Scalar + Default,
    {
        let zero = T::default();

        // Measurement vector
        let measurement =
            MeasurementVectorBuffer::<OBSERVATIONS, T, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                1,
                OBSERVATIONS,
                T,
            >([zero; OBSERVATIONS]));

        // Observation matrix; positions are observed directly, velocities not at all.
        let mut observation_matrix =
            ObservationMatrixMutBuffer::<OBSERVATIONS, STATES, T, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                STATES,
                { OBSERVATIONS * STATES },
                T,
            >(
                [zero; { OBSERVATIONS * STATES }],
            ));
        observation_matrix.apply(|mat| {
            mat.set_at(0, 0, T::one());
            mat.set_at(1, 1, T::one());
            mat.set_at(2, 2, T::one());
        });

        // Measurement noise covariance
        let mut noise_covariance =
            MeasurementNoiseCovarianceMatrixBuffer::<OBSERVATIONS, T, _>::new(
                MatrixData::new_array::<
                    OBSERVATIONS,
                    OBSERVATIONS,
                    { OBSERVATIONS * OBSERVATIONS },
                    T,
                >([zero; { OBSERVATIONS * OBSERVATIONS }]),
            );
        noise_covariance.apply(|mat| {
            mat.set_at(0, 0, measurement_noise.x);
            mat.set_at(1, 1, measurement_noise.y);
            mat.set_at(2, 2, measurement_noise.z);
        });

        // Innovation vector
        let innovation_vector =
            InnovationVectorBuffer::<OBSERVATIONS, T, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                1,
                OBSERVATIONS,
                T,
            >([zero; OBSERVATIONS]));

        // Innovation covariance matrix
        let innovation_covariance =
            InnovationCovarianceMatrixBuffer::<OBSERVATIONS, T, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                OBSERVATIONS,
                { OBSERVATIONS * OBSERVATIONS },
                T,
            >(
                [zero; { OBSERVATIONS * OBSERVATIONS }],
            ));

        // Kalman Gain matrix
        let kalman_gain =
            KalmanGainMatrixBuffer::<STATES, OBSERVATIONS, T, _>::new(MatrixData::new_array::<
                STATES,
                OBSERVATIONS,
                { STATES * OBSERVATIONS },
                T,
            >(
                [zero; { STATES * OBSERVATIONS }],
            ));

        // Temporary residual covariance inverted matrix
        let temp_sinv = TemporaryResidualCovarianceInvertedMatrixBuffer::<OBSERVATIONS, T, _>::new(
            MatrixData::new_array::<OBSERVATIONS, OBSERVATIONS, { OBSERVATIONS * OBSERVATIONS }, T>(
                [zero; { OBSERVATIONS * OBSERVATIONS }],
            ),
        );

        // Temporary H×P matrix
        let temp_hp =
            TemporaryHPMatrixBuffer::<OBSERVATIONS, STATES, T, _>::new(MatrixData::new_array::<
                OBSERVATIONS,
                STATES,
                { OBSERVATIONS * STATES },
                T,
            >(
                [zero; { OBSERVATIONS * STATES }],
            ));

        // Temporary P×Hᵀ matrix
        let temp_pht =
            TemporaryPHTMatrixBuffer::<STATES, OBSERVATIONS, T, _>::new(MatrixData::new_array::<
                STATES,
                OBSERVATIONS,
                { STATES * OBSERVATIONS },
                T,
            >(
                [zero; { STATES * OBSERVATIONS }],
            ));

        // Temporary K×(H×P) matrix
        let temp_khp = TemporaryKHPMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
            STATES,
            STATES,
            { STATES * STATES },
            T,
        >(
            [zero; { STATES * STATES }]
        ));

        RegularObservationBuilder::new::<STATES, OBSERVATIONS, T>(
            observation_matrix,
            measurement,
            noise_covariance,
            innovation_vector,
            innovation_covariance,
            kalman_gain,
            temp_sinv,
            temp_hp,
            temp_pht,
            temp_khp,
        )
    }
}

#[cfg(test)]
#[cfg(feature = "std")]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DELTA_T: f64 = 0.05;

    fn estimator_at(position: Position<f64>) -> PositionVelocityEstimator<f64> {
        PositionVelocityEstimator::new(
            State::at_rest(position),
            1.0,
            ProcessNoise::from_max_acceleration(5.0, DELTA_T),
            MeasurementNoise::from_std_dev(1e-2),
        )
        .expect("valid estimator parameters")
    }

    /// Determines whether a symmetric matrix is positive semi-definite by testing
    /// that all leading principal minors of `P + εI` are positive.
    fn is_positive_semi_definite(covariance: &Covariance<f64>) -> bool {
        let mut m = *covariance.rows();
        for (i, row) in m.iter_mut().enumerate() {
            row[i] += 1e-12;
        }

        // Gaussian elimination without pivoting; all pivots must be positive.
        for k in 0..STATES {
            if m[k][k] <= 0.0 {
                return false;
            }
            for i in (k + 1)..STATES {
                let factor = m[i][k] / m[k][k];
                for j in k..STATES {
                    m[i][j] -= factor * m[k][j];
                }
            }
        }
        true
    }

    #[test]
    fn test_initialization() {
        let estimator = estimator_at(Position::new(1.0, -2.0, 3.5));

        assert_eq!(
            estimator.state().to_array(),
            [1.0, -2.0, 3.5, 0.0, 0.0, 0.0]
        );

        let covariance = estimator.covariance();
        for row in 0..STATES {
            for col in 0..STATES {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(covariance.get(row, col), expected);
            }
        }
    }

    #[test]
    fn test_initialization_with_scale() {
        let estimator = PositionVelocityEstimator::new(
            State::at_rest(Position::new(0.0, 0.0, 0.0)),
            2.5,
            ProcessNoise::default(),
            MeasurementNoise::new(0.1, 0.1, 0.1),
        )
        .unwrap();
        assert_eq!(estimator.covariance().trace(), 15.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let state = State::at_rest(Position::new(0.0, 0.0, 0.0));
        let noise = ProcessNoise::default();
        let meas = MeasurementNoise::new(0.1, 0.1, 0.1);

        assert_eq!(
            PositionVelocityEstimator::new(
                State::at_rest(Position::new(f64::NAN, 0.0, 0.0)),
                1.0,
                noise,
                meas
            )
            .err(),
            Some(EstimatorError::NonFiniteState)
        );
        assert_eq!(
            PositionVelocityEstimator::new(state, -1.0, noise, meas).err(),
            Some(EstimatorError::InvalidCovarianceScale)
        );
        assert_eq!(
            PositionVelocityEstimator::new(state, 1.0, noise, MeasurementNoise::new(0.1, -0.1, 0.1))
                .err(),
            Some(EstimatorError::InvalidNoise)
        );
        assert_eq!(
            PositionVelocityEstimator::new(
                state,
                1.0,
                ProcessNoise::new(0.0, 0.0, 0.0, 0.0, 0.0, -1.0),
                meas
            )
            .err(),
            Some(EstimatorError::InvalidNoise)
        );
    }

    #[test]
    fn test_predict_constant_velocity() {
        let mut estimator = PositionVelocityEstimator::new(
            State::new(Position::new(1.0, 2.0, 3.0), Velocity::new(0.5, -1.0, 2.0)),
            1.0,
            ProcessNoise::default(),
            MeasurementNoise::new(0.1, 0.1, 0.1),
        )
        .unwrap();

        estimator.predict(0.1).unwrap();

        let state = estimator.state();
        assert_relative_eq!(state.position.x, 1.05);
        assert_relative_eq!(state.position.y, 1.9);
        assert_relative_eq!(state.position.z, 3.2);
        assert_eq!(state.velocity, Velocity::new(0.5, -1.0, 2.0));
    }

    #[test]
    fn test_predict_covariance_propagation() {
        let dt = 0.1;
        let q = ProcessNoise::new(0.01, 0.02, 0.03, 0.04, 0.05, 0.06);
        let mut estimator = PositionVelocityEstimator::new(
            State::at_rest(Position::new(0.0, 0.0, 0.0)),
            1.0,
            q,
            MeasurementNoise::new(0.1, 0.1, 0.1),
        )
        .unwrap();

        estimator.predict(dt).unwrap();

        // With P = I: F·P·Fᵀ has 1 + dt² on the position diagonal,
        // dt in the position-velocity coupling and 1 on the velocity diagonal.
        let covariance = estimator.covariance();
        for i in 0..3 {
            assert_relative_eq!(covariance.get(i, i), 1.0 + dt * dt + q[i], epsilon = 1e-12);
            assert_relative_eq!(covariance.get(i + 3, i + 3), 1.0 + q[i + 3], epsilon = 1e-12);
            assert_relative_eq!(covariance.get(i, i + 3), dt, epsilon = 1e-12);
            assert_relative_eq!(covariance.get(i + 3, i), dt, epsilon = 1e-12);
        }
        assert_eq!(covariance.get(0, 1), 0.0);
    }

    #[test]
    fn test_predict_zero_time_step_adds_process_noise() {
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));
        let before = estimator.covariance();
        estimator.predict(0.0).unwrap();
        let after = estimator.covariance();

        for i in 0..STATES {
            assert_relative_eq!(
                after.get(i, i),
                before.get(i, i) + estimator.process_noise()[i],
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_predict_rejects_negative_time_step() {
        let mut estimator = estimator_at(Position::new(1.0, 1.0, 1.0));
        let before = estimator.covariance();

        assert_eq!(
            estimator.predict(-0.01),
            Err(EstimatorError::NegativeTimeStep)
        );
        assert_eq!(
            estimator.predict(f64::NAN),
            Err(EstimatorError::NonFiniteTimeStep)
        );
        assert_eq!(estimator.covariance().rows(), before.rows());
    }

    #[test]
    fn test_prediction_only_uncertainty_grows() {
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));

        let mut previous = estimator.covariance();
        for _ in 0..50 {
            estimator.predict(DELTA_T).unwrap();
            let current = estimator.covariance();

            assert!(current.position_block().trace() > previous.position_block().trace());
            assert!(current.velocity_block().trace() > previous.velocity_block().trace());
            for i in 0..STATES {
                assert!(current.get(i, i) > previous.get(i, i));
            }
            previous = current;
        }
    }

    #[test]
    fn test_correction_reduces_uncertainty() {
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));
        let measurements = [
            Position::new(0.01, -0.02, 0.0),
            Position::new(5.0, 3.0, -2.0),
            Position::new(0.0, 0.0, 0.0),
            Position::new(-100.0, 0.5, 12.0),
        ];

        for measurement in measurements.iter() {
            estimator.predict(DELTA_T).unwrap();
            let before = estimator.position_covariance().trace();
            estimator.correct(measurement, DELTA_T).unwrap();
            let after = estimator.position_covariance().trace();
            assert!(after <= before, "{after} > {before}");
        }
    }

    #[test]
    fn test_correction_moves_towards_measurement() {
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));
        estimator.predict(DELTA_T).unwrap();
        estimator
            .correct(&Position::new(1.0, 0.0, 0.0), DELTA_T)
            .unwrap();

        // With a large prior and a small measurement noise the estimate snaps to the measurement.
        let position = estimator.position();
        assert!(position.x > 0.99 && position.x <= 1.0);
        assert_relative_eq!(position.y, 0.0);
        assert!(estimator.velocity().x > 0.0);
    }

    #[test]
    fn test_covariance_stays_symmetric_and_positive_semi_definite() {
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));

        for step in 0..500 {
            let t = step as f64 * DELTA_T;
            let dt = if step % 7 == 0 { 1e-7 } else { DELTA_T };
            estimator.predict(dt).unwrap();

            let measurement = Position::new(t.sin(), 0.5 * t, (3.0 * t).cos());
            estimator.correct(&measurement, dt).unwrap();

            let covariance = estimator.covariance();
            assert!(covariance.is_symmetric(1e-12));
            assert!(is_positive_semi_definite(&covariance), "step {step}");
        }
    }

    #[test]
    fn test_singular_innovation_covariance() {
        let mut estimator = PositionVelocityEstimator::new(
            State::at_rest(Position::new(0.0, 0.0, 0.0)),
            0.0,
            ProcessNoise::default(),
            MeasurementNoise::new(0.0, 0.0, 0.0),
        )
        .unwrap();

        let before = estimator.state();
        assert_eq!(
            estimator.correct(&Position::new(1.0, 1.0, 1.0), 0.1),
            Err(EstimatorError::SingularInnovationCovariance)
        );
        assert_eq!(
            estimator.innovation(&Position::new(1.0, 1.0, 1.0)).err(),
            Some(EstimatorError::SingularInnovationCovariance)
        );
        assert_eq!(estimator.state(), before);
    }

    #[test]
    fn test_correct_rejects_non_finite_measurement() {
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));
        assert_eq!(
            estimator.correct(&Position::new(f64::INFINITY, 0.0, 0.0), 0.1),
            Err(EstimatorError::NonFiniteMeasurement)
        );
        assert_eq!(
            estimator.correct(&Position::new(0.0, 0.0, 0.0), -0.1),
            Err(EstimatorError::NegativeTimeStep)
        );
    }

    #[test]
    fn test_innovation_statistic() {
        let estimator = PositionVelocityEstimator::new(
            State::at_rest(Position::new(0.0, 0.0, 0.0)),
            1.0,
            ProcessNoise::default(),
            MeasurementNoise::new(1.0, 1.0, 1.0),
        )
        .unwrap();

        let innovation = estimator.innovation(&Position::new(2.0, 0.0, -2.0)).unwrap();
        assert_eq!(innovation.residual, Position::new(2.0, 0.0, -2.0));
        assert_eq!(innovation.covariance, Matrix3::from_diagonal(2.0, 2.0, 2.0));
        assert_relative_eq!(innovation.normalized_squared, 4.0);
    }

    #[test]
    fn test_stationary_measurements_converge_to_zero_velocity() {
        let position = Position::new(2.0, -1.0, 0.5);
        let mut estimator = estimator_at(position);

        for _ in 0..400 {
            estimator.predict(DELTA_T).unwrap();
            estimator.correct(&position, DELTA_T).unwrap();
        }

        let state = estimator.state();
        assert_relative_eq!(state.position.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(state.velocity.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(state.velocity.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(state.velocity.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ramp_converges_to_velocity() {
        let velocity = 1.5;
        let mut estimator = estimator_at(Position::new(0.0, 0.0, 0.0));

        for step in 1..=400 {
            let t = step as f64 * DELTA_T;
            estimator.predict(DELTA_T).unwrap();
            estimator
                .correct(&Position::new(velocity * t, 0.0, 0.0), DELTA_T)
                .unwrap();
        }

        let state = estimator.velocity();
        assert_relative_eq!(state.x, velocity, epsilon = 1e-3);
        assert_relative_eq!(state.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(state.z, 0.0, epsilon = 1e-6);
    }
}
