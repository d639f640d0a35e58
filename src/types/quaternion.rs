use crate::num_traits::{AllFinite, Scalar};
use crate::types::Matrix3;
use core::fmt::{Debug, Formatter};
use uniform_array_derive::UniformArray;

/// An orientation quaternion in `(w, x, y, z)` order.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quaternion<T> {
    /// The scalar part.
    pub w: T,
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Quaternion<T> {
    /// Initializes a new [`Quaternion`] instance.
    #[inline(always)]
    pub const fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }

    /// Returns the identity rotation.
    pub fn identity() -> Self
    where
        T: Scalar,
    {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    /// Calculates the squared norm.
    #[inline]
    pub fn norm_sq(&self) -> T
    where
        T: Scalar,
    {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns a unit-length version of the quaternion, or `None` if the norm is zero.
    pub fn normalized(&self) -> Option<Self>
    where
        T: Scalar,
    {
        let norm_sq = self.norm_sq();
        if !(norm_sq > T::zero()) || !norm_sq.is_finite() {
            return None;
        }
        let norm = norm_sq.square_root();
        Some(Self::new(
            self.w / norm,
            self.x / norm,
            self.y / norm,
            self.z / norm,
        ))
    }

    /// Converts the quaternion into a rotation matrix.
    ///
    /// The conversion scales by the squared norm, so quaternions that are not
    /// exactly of unit length still produce an orthonormal matrix. A zero quaternion
    /// yields a non-finite matrix.
    pub fn to_rotation_matrix(&self) -> Matrix3<T>
    where
        T: Scalar,
    {
        let s = T::two() / self.norm_sq();
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        let one = T::one();

        Matrix3::from_rows([
            [
                one - s * (y * y + z * z),
                s * (x * y - w * z),
                s * (x * z + w * y),
            ],
            [
                s * (x * y + w * z),
                one - s * (x * x + z * z),
                s * (y * z - w * x),
            ],
            [
                s * (x * z - w * y),
                s * (y * z + w * x),
                one - s * (x * x + y * y),
            ],
        ])
    }
}

impl<T> AllFinite for Quaternion<T>
where
    T: Scalar,
{
    fn all_finite(&self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<T> Copy for Quaternion<T> where T: Copy {}

impl<T> Clone for Quaternion<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            w: self.w.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl<T> PartialEq for Quaternion<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w && self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl<T> Debug for Quaternion<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Quaternion")
            .field(&self.w)
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}
