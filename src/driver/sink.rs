use crate::driver::messages::{Odometry, PoseStamped, TransformStamped};

/// Consumes the packets produced by the fusion driver.
///
/// Every method is a single blocking emit; the driver does not wait for
/// an acknowledgment.
pub trait OdometrySink<T, Q> {
    /// Receives the fused estimate in the absolute frame.
    fn odometry(&mut self, odometry: &Odometry<T, Q>);

    /// Receives the fused estimate relative to the first observed position.
    fn local_odometry(&mut self, odometry: &Odometry<T, Q>);

    /// Receives the relabeled observed pose.
    fn mocap_pose(&mut self, pose: &PoseStamped<T, Q>);

    /// Receives the fused pose as a transform. Only called if transforms are enabled.
    fn transform(&mut self, _transform: &TransformStamped<T, Q>) {}
}

impl<T, Q, S> OdometrySink<T, Q> for &mut S
where
    S: OdometrySink<T, Q> + ?Sized,
{
    fn odometry(&mut self, odometry: &Odometry<T, Q>) {
        (**self).odometry(odometry)
    }

    fn local_odometry(&mut self, odometry: &Odometry<T, Q>) {
        (**self).local_odometry(odometry)
    }

    fn mocap_pose(&mut self, pose: &PoseStamped<T, Q>) {
        (**self).mocap_pose(pose)
    }

    fn transform(&mut self, transform: &TransformStamped<T, Q>) {
        (**self).transform(transform)
    }
}
