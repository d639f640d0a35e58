use crate::num_traits::{AllFinite, Scalar};
use core::fmt::{Debug, Formatter};
use uniform_array_derive::UniformArray;

/// The diagonal of the process noise covariance of the constant-velocity model.
///
/// The first three terms describe the position variance added per prediction (in m²),
/// the last three the velocity variance (in m²/s²).
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct ProcessNoise<T> {
    pub position_x: T,
    pub position_y: T,
    pub position_z: T,
    pub velocity_x: T,
    pub velocity_y: T,
    pub velocity_z: T,
}

impl<T> ProcessNoise<T> {
    /// Initializes a new [`ProcessNoise`] instance.
    #[inline(always)]
    pub const fn new(
        position_x: T,
        position_y: T,
        position_z: T,
        velocity_x: T,
        velocity_y: T,
        velocity_z: T,
    ) -> Self {
        Self {
            position_x,
            position_y,
            position_z,
            velocity_x,
            velocity_y,
            velocity_z,
        }
    }

    /// Derives the process noise from a bound on the unmodeled acceleration.
    ///
    /// An acceleration `a` acting over the nominal sample interval `Δt` displaces
    /// the body by `½·a·Δt²` and changes its velocity by `a·Δt`; the squares of
    /// these terms are used as the per-axis variances.
    ///
    /// ## Arguments
    /// * `max_acceleration` - The maximum expected acceleration, in m/s².
    /// * `delta_t` - The nominal sample interval, in seconds.
    pub fn from_max_acceleration(max_acceleration: T, delta_t: T) -> Self
    where
        T: Scalar,
    {
        let position = T::half() * max_acceleration * delta_t * delta_t;
        let velocity = max_acceleration * delta_t;
        let position = position * position;
        let velocity = velocity * velocity;
        Self::new(position, position, position, velocity, velocity, velocity)
    }

    /// Determines whether all variances are finite and non-negative.
    pub fn is_valid(&self) -> bool
    where
        T: Scalar,
    {
        self.all_finite() && (0..6).all(|i| self[i] >= T::zero())
    }
}

impl<T> AllFinite for ProcessNoise<T>
where
    T: Scalar,
{
    fn all_finite(&self) -> bool {
        (0..6).all(|i| self[i].is_finite())
    }
}

impl<T> Copy for ProcessNoise<T> where T: Copy {}

impl<T> Clone for ProcessNoise<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            position_x: self.position_x.clone(),
            position_y: self.position_y.clone(),
            position_z: self.position_z.clone(),
            velocity_x: self.velocity_x.clone(),
            velocity_y: self.velocity_y.clone(),
            velocity_z: self.velocity_z.clone(),
        }
    }
}

impl<T> Default for ProcessNoise<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        )
    }
}

impl<T> PartialEq for ProcessNoise<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.position_x == other.position_x
            && self.position_y == other.position_y
            && self.position_z == other.position_z
            && self.velocity_x == other.velocity_x
            && self.velocity_y == other.velocity_y
            && self.velocity_z == other.velocity_z
    }
}

impl<T> Debug for ProcessNoise<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ProcessNoise")
            .field(&self.position_x)
            .field(&self.position_y)
            .field(&self.position_z)
            .field(&self.velocity_x)
            .field(&self.velocity_y)
            .field(&self.velocity_z)
            .finish()
    }
}
