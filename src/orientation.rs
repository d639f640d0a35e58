use crate::num_traits::Scalar;
use crate::types::{Matrix3, Quaternion};

/// An orientation representation that can be expressed as a rotation matrix.
///
/// The angular rate differentiator and the fusion driver only rely on this
/// conversion; the matrix algebra itself is provided by [`Matrix3`].
pub trait Orientation<T> {
    /// Returns the rotation matrix of this orientation.
    fn rotation_matrix(&self) -> Matrix3<T>;
}

impl<T> Orientation<T> for Quaternion<T>
where
    T: Scalar,
{
    #[inline]
    fn rotation_matrix(&self) -> Matrix3<T> {
        self.to_rotation_matrix()
    }
}

impl<T> Orientation<T> for Matrix3<T>
where
    T: Copy,
{
    #[inline]
    fn rotation_matrix(&self) -> Matrix3<T> {
        *self
    }
}

impl<T, O> Orientation<T> for &O
where
    O: Orientation<T> + ?Sized,
{
    #[inline]
    fn rotation_matrix(&self) -> Matrix3<T> {
        (**self).rotation_matrix()
    }
}
