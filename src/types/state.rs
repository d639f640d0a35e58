use crate::num_traits::{AllFinite, Scalar};
use crate::types::{Matrix3, Position, Velocity};
use core::fmt::{Debug, Formatter};

/// A snapshot of the position and velocity state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State<T> {
    /// The position, in meters.
    pub position: Position<T>,
    /// The linear velocity, in meters per second.
    pub velocity: Velocity<T>,
}

impl<T> State<T> {
    /// Initializes a new [`State`] instance.
    #[inline(always)]
    pub const fn new(position: Position<T>, velocity: Velocity<T>) -> Self {
        Self { position, velocity }
    }

    /// Initializes a state at rest at the given position.
    pub fn at_rest(position: Position<T>) -> Self
    where
        T: Scalar,
    {
        Self::new(position, Velocity::new(T::zero(), T::zero(), T::zero()))
    }

    /// Returns the state as a six-element vector `(x, y, z, vx, vy, vz)`.
    pub fn to_array(&self) -> [T; 6]
    where
        T: Copy,
    {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }

    /// Builds a state from a six-element vector `(x, y, z, vx, vy, vz)`.
    pub fn from_array(values: [T; 6]) -> Self {
        let [x, y, z, vx, vy, vz] = values;
        Self::new(Position::new(x, y, z), Velocity::new(vx, vy, vz))
    }
}

impl<T> AllFinite for State<T>
where
    T: Scalar,
{
    fn all_finite(&self) -> bool {
        self.position.all_finite() && self.velocity.all_finite()
    }
}

impl<T> Copy for State<T> where T: Copy {}

impl<T> Clone for State<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            position: self.position.clone(),
            velocity: self.velocity.clone(),
        }
    }
}

impl<T> PartialEq for State<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.velocity == other.velocity
    }
}

impl<T> Debug for State<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("State")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .finish()
    }
}

/// A snapshot of the 6×6 estimate covariance in `(x, y, z, vx, vy, vz)` order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Covariance<T> {
    values: [[T; 6]; 6],
}

impl<T> Covariance<T> {
    /// Initializes a new [`Covariance`] from its rows.
    #[inline(always)]
    pub const fn from_rows(values: [[T; 6]; 6]) -> Self {
        Self { values }
    }

    /// Returns the rows of the covariance matrix.
    #[inline(always)]
    pub const fn rows(&self) -> &[[T; 6]; 6] {
        &self.values
    }

    /// Returns the element at the specified row and column.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> T
    where
        T: Copy,
    {
        self.values[row][col]
    }
}

impl<T> Covariance<T>
where
    T: Scalar,
{
    /// Returns the 3×3 position covariance block.
    pub fn position_block(&self) -> Matrix3<T> {
        self.block(0)
    }

    /// Returns the 3×3 velocity covariance block.
    pub fn velocity_block(&self) -> Matrix3<T> {
        self.block(3)
    }

    fn block(&self, offset: usize) -> Matrix3<T> {
        let mut block = Matrix3::zeros();
        for row in 0..3 {
            for col in 0..3 {
                block[(row, col)] = self.values[offset + row][offset + col];
            }
        }
        block
    }

    /// Returns the sum of the diagonal elements.
    pub fn trace(&self) -> T {
        (0..6).fold(T::zero(), |sum, i| sum + self.values[i][i])
    }

    /// Determines whether the matrix is symmetric within the given absolute tolerance.
    pub fn is_symmetric(&self, tolerance: T) -> bool {
        (0..6).all(|row| {
            (row + 1..6).all(|col| (self.values[row][col] - self.values[col][row]).abs() <= tolerance)
        })
    }
}

impl<T> AllFinite for Covariance<T>
where
    T: Scalar,
{
    fn all_finite(&self) -> bool {
        self.values.iter().flatten().all(|value| value.is_finite())
    }
}

impl<T> Copy for Covariance<T> where T: Copy {}

impl<T> Clone for Covariance<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T> Debug for Covariance<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}
