use crate::impl_standard_traits;
use uniform_array_derive::UniformArray;

/// A position in three-dimensional space, in meters.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Position<T> {
    /// The position along the x-axis, in meters.
    pub x: T,
    /// The position along the y-axis, in meters.
    pub y: T,
    /// The position along the z-axis, in meters.
    pub z: T,
}

impl<T> Position<T> {
    /// Initializes a new [`Position`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Constructs a new [`Position`] instance from a position in a given coordinate frame.
    #[cfg(feature = "coordinate-frame")]
    #[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
    pub fn north_east_down<C>(coordinate: C) -> Self
    where
        C: Into<coordinate_frame::NorthEastDown<T>>,
        T: Clone,
    {
        let coordinate = coordinate.into();
        Self {
            x: coordinate.x(),
            y: coordinate.y(),
            z: coordinate.z(),
        }
    }

    /// Returns the position relative to the specified origin.
    #[inline]
    pub fn relative_to(self, origin: Position<T>) -> Self
    where
        T: core::ops::Sub<T, Output = T>,
    {
        self - origin
    }
}

#[cfg(feature = "coordinate-frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
impl<T, C> From<C> for Position<T>
where
    C: coordinate_frame::CoordinateFrame<Type = T>,
    T: Copy + coordinate_frame::SaturatingNeg<Output = T>,
{
    fn from(value: C) -> Self {
        Self::north_east_down(value.to_ned())
    }
}

impl_standard_traits!(Position, T, x, y, z);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_relative_to() {
        let origin = Position::new(1.0, -2.0, 0.5);
        let position = Position::new(3.0, 1.0, 0.5);
        assert_eq!(position.relative_to(origin), Position::new(2.0, 3.0, 0.0));
    }

    #[test]
    #[cfg(feature = "coordinate-frame")]
    fn test_from_north_east_down() {
        let ned = coordinate_frame::NorthEastDown::new(1.0_f32, 2.0, 3.0);
        let position = Position::from(ned);
        assert_eq!(position, Position::new(1.0, 2.0, 3.0));
    }
}
