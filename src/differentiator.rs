//! Single-step angular rate estimation from consecutive orientations.

use crate::num_traits::Scalar;
use crate::orientation::Orientation;
use crate::types::{AngularVelocity, Matrix3};

/// Derives the angular velocity from the finite difference of two consecutive
/// rotation matrices.
///
/// With `Ṙ = (R − R_prev) / Δt`, the product `Ṙ·Rᵀ` approximates the
/// skew-symmetric matrix `[ω]×`, from which the angular velocity is read off.
/// The estimate is first-order and not smoothed.
pub struct AngularRateDifferentiator<T> {
    /// The rotation of the previous sample.
    previous: Matrix3<T>,
    /// The last computed angular velocity, held on degenerate time steps.
    angular_velocity: AngularVelocity<T>,
    /// Time steps at or below this value (in seconds) are not differentiated.
    floor: T,
}

impl<T> AngularRateDifferentiator<T> {
    /// Initializes a new instance of the [`AngularRateDifferentiator`] struct.
    ///
    /// ## Arguments
    /// * `floor` - The smallest time step, in seconds, that is differentiated. Set to e.g. `1e-6`.
    pub fn new(floor: T) -> Self
    where
        T: Scalar,
    {
        Self {
            previous: Matrix3::identity(),
            angular_velocity: AngularVelocity::new(T::zero(), T::zero(), T::zero()),
            floor,
        }
    }

    /// Gets the last computed angular velocity.
    pub fn angular_velocity(&self) -> AngularVelocity<T>
    where
        T: Copy,
    {
        self.angular_velocity
    }

    /// Gets the rotation matrix of the previous sample.
    pub fn previous_rotation(&self) -> &Matrix3<T> {
        &self.previous
    }

    /// Restores the identity rotation and a zero angular velocity.
    pub fn reset(&mut self)
    where
        T: Scalar,
    {
        self.previous = Matrix3::identity();
        self.angular_velocity = AngularVelocity::new(T::zero(), T::zero(), T::zero());
    }

    /// Differentiates the orientation against the previous sample.
    ///
    /// If `delta_t` does not exceed the floor (or is not finite), the previously
    /// computed angular velocity is returned instead. The orientation is stored
    /// for the next step in either case.
    ///
    /// ## Arguments
    /// * `orientation` - The current orientation.
    /// * `delta_t` - The elapsed time since the previous orientation, in seconds.
    pub fn step<O>(&mut self, orientation: &O, delta_t: T) -> AngularVelocity<T>
    where
        O: Orientation<T> + ?Sized,
        T: Scalar,
    {
        let rotation = orientation.rotation_matrix();

        if delta_t.is_finite() && delta_t > self.floor {
            let rotation_rate = (rotation - self.previous) / delta_t;
            let omega_hat = rotation_rate * rotation.transpose();
            self.angular_velocity = AngularVelocity::new(
                omega_hat[(2, 1)],
                omega_hat[(0, 2)],
                omega_hat[(1, 0)],
            );
        } else {
            tracing::debug!("Time step below differentiation floor, holding angular velocity");
        }

        self.previous = rotation;
        self.angular_velocity
    }
}

#[cfg(test)]
#[cfg(feature = "std")]
mod tests {
    use super::*;
    use crate::types::Quaternion;
    use approx::assert_relative_eq;

    fn rotation_about_z(angle: f64) -> Quaternion<f64> {
        Quaternion::new((angle / 2.0).cos(), 0.0, 0.0, (angle / 2.0).sin())
    }

    fn rotation_about_x(angle: f64) -> Quaternion<f64> {
        Quaternion::new((angle / 2.0).cos(), (angle / 2.0).sin(), 0.0, 0.0)
    }

    #[test]
    fn test_identity_yields_zero_rate() {
        let mut differentiator = AngularRateDifferentiator::new(1e-6);
        for _ in 0..10 {
            let rate = differentiator.step(&Quaternion::<f64>::identity(), 0.05);
            assert_eq!(rate, AngularVelocity::new(0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_constant_yaw_rate() {
        let omega = 0.5;
        let dt = 1e-3;
        let mut differentiator = AngularRateDifferentiator::new(1e-6);
        differentiator.step(&rotation_about_z(0.0), dt);

        let rate = differentiator.step(&rotation_about_z(omega * dt), dt);
        assert_relative_eq!(rate.omega_x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rate.omega_y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rate.omega_z, omega, epsilon = 1e-3);
    }

    #[test]
    fn test_constant_roll_rate() {
        let omega = -1.2;
        let dt = 1e-3;
        let mut differentiator = AngularRateDifferentiator::new(1e-6);

        let mut rate = AngularVelocity::default();
        for step in 0..5 {
            rate = differentiator.step(&rotation_about_x(omega * dt * step as f64), dt);
        }
        assert_relative_eq!(rate.omega_x, omega, epsilon = 1e-3);
        assert_relative_eq!(rate.omega_y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rate.omega_z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_time_step_returns_zero_on_first_call() {
        let mut differentiator = AngularRateDifferentiator::new(1e-6);
        let rate = differentiator.step(&rotation_about_z(0.3), 0.0);
        assert_eq!(rate, AngularVelocity::new(0.0, 0.0, 0.0));

        let rate = differentiator.step(&rotation_about_z(0.6), 0.0);
        assert_eq!(rate, AngularVelocity::new(0.0, 0.0, 0.0));
        assert!(rate.omega_z.is_finite());
    }

    #[test]
    fn test_degenerate_time_step_holds_previous_rate() {
        let dt = 1e-2;
        let mut differentiator = AngularRateDifferentiator::new(1e-6);
        differentiator.step(&rotation_about_z(0.0), dt);
        let computed = differentiator.step(&rotation_about_z(0.01), dt);

        let held = differentiator.step(&rotation_about_z(0.5), 1e-6);
        assert_eq!(held, computed);
        let held = differentiator.step(&rotation_about_z(0.5), f64::NAN);
        assert_eq!(held, computed);

        // The rotation was still recorded, so an unchanged orientation yields zero.
        let rate = differentiator.step(&rotation_about_z(0.5), dt);
        assert_relative_eq!(rate.omega_z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_matrix_orientation() {
        let mut differentiator = AngularRateDifferentiator::new(1e-6);
        let rotation = rotation_about_z(0.2).to_rotation_matrix();
        differentiator.step(&rotation, 0.0);
        assert_eq!(differentiator.previous_rotation(), &rotation);

        differentiator.reset();
        assert_eq!(differentiator.previous_rotation(), &Matrix3::identity());
    }
}
