use crate::num_traits::{AllFinite, Scalar};
use core::fmt::{Debug, Formatter};
use core::ops::{Add, Div, Index, IndexMut, Mul, Sub};

/// A row-major 3×3 matrix.
///
/// Used for rotation matrices, the position and velocity blocks of the
/// estimate covariance, and the innovation covariance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Matrix3<T> {
    rows: [[T; 3]; 3],
}

impl<T> Matrix3<T> {
    /// Initializes a new [`Matrix3`] from its rows.
    #[inline(always)]
    pub const fn from_rows(rows: [[T; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Returns the rows of the matrix.
    #[inline(always)]
    pub const fn rows(&self) -> &[[T; 3]; 3] {
        &self.rows
    }

    /// Returns the element at the specified row and column.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> T
    where
        T: Copy,
    {
        self.rows[row][col]
    }
}

impl<T> Matrix3<T>
where
    T: Scalar,
{
    /// Returns a matrix of zeros.
    pub fn zeros() -> Self {
        Self::from_rows([[T::zero(); 3]; 3])
    }

    /// Returns the identity matrix.
    pub fn identity() -> Self {
        Self::from_diagonal(T::one(), T::one(), T::one())
    }

    /// Returns a diagonal matrix.
    pub fn from_diagonal(a: T, b: T, c: T) -> Self {
        let zero = T::zero();
        Self::from_rows([[a, zero, zero], [zero, b, zero], [zero, zero, c]])
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros();
        for row in 0..3 {
            for col in 0..3 {
                result.rows[col][row] = self.rows[row][col];
            }
        }
        result
    }

    /// Returns the sum of the diagonal elements.
    pub fn trace(&self) -> T {
        self.rows[0][0] + self.rows[1][1] + self.rows[2][2]
    }

    /// Calculates the determinant.
    pub fn determinant(&self) -> T {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Multiplies the matrix with a column vector.
    pub fn mul_vector(&self, vector: [T; 3]) -> [T; 3] {
        let mut result = [T::zero(); 3];
        for (row, value) in result.iter_mut().enumerate() {
            *value = self.rows[row][0] * vector[0]
                + self.rows[row][1] * vector[1]
                + self.rows[row][2] * vector[2];
        }
        result
    }

    /// Calculates the quadratic form `vᵀ·M·v`.
    pub fn quadratic_form(&self, vector: [T; 3]) -> T {
        let mv = self.mul_vector(vector);
        vector[0] * mv[0] + vector[1] * mv[1] + vector[2] * mv[2]
    }

    /// Determines whether the matrix is symmetric within the given absolute tolerance.
    pub fn is_symmetric(&self, tolerance: T) -> bool {
        (0..3).all(|row| {
            (row + 1..3).all(|col| (self.rows[row][col] - self.rows[col][row]).abs() <= tolerance)
        })
    }

    /// Inverts a symmetric positive definite matrix.
    ///
    /// Positive definiteness is verified through the pivots of an `L·D·Lᵀ`
    /// decomposition; a pivot that is not positive relative to the largest diagonal
    /// element marks the matrix as singular and `None` is returned.
    pub fn try_inverse_spd(&self) -> Option<Self> {
        let m = &self.rows;
        if !self.all_finite() {
            return None;
        }

        let scale = m[0][0].max(m[1][1]).max(m[2][2]);
        if scale <= T::zero() {
            return None;
        }
        let threshold = T::epsilon() * scale;

        let d0 = m[0][0];
        if d0 <= threshold {
            return None;
        }
        let l10 = m[1][0] / d0;
        let l20 = m[2][0] / d0;

        let d1 = m[1][1] - l10 * l10 * d0;
        if d1 <= threshold {
            return None;
        }
        let l21 = (m[2][1] - l20 * l10 * d0) / d1;

        let d2 = m[2][2] - l20 * l20 * d0 - l21 * l21 * d1;
        if d2 <= threshold {
            return None;
        }

        // Adjugate over the determinant; the determinant equals the pivot product.
        let det = d0 * d1 * d2;
        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c01 = m[0][2] * m[2][1] - m[0][1] * m[2][2];
        let c02 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let c11 = m[0][0] * m[2][2] - m[0][2] * m[2][0];
        let c12 = m[0][2] * m[1][0] - m[0][0] * m[1][2];
        let c22 = m[0][0] * m[1][1] - m[0][1] * m[1][0];

        let inverse = Self::from_rows([[c00, c01, c02], [c01, c11, c12], [c02, c12, c22]]) / det;
        if inverse.all_finite() {
            Some(inverse)
        } else {
            None
        }
    }
}

impl<T> AllFinite for Matrix3<T>
where
    T: Scalar,
{
    fn all_finite(&self) -> bool {
        self.rows.iter().flatten().all(|value| value.is_finite())
    }
}

impl<T> Mul<Matrix3<T>> for Matrix3<T>
where
    T: Scalar,
{
    type Output = Matrix3<T>;

    fn mul(self, rhs: Matrix3<T>) -> Self::Output {
        let mut result = Self::zeros();
        for row in 0..3 {
            for col in 0..3 {
                result.rows[row][col] = self.rows[row][0] * rhs.rows[0][col]
                    + self.rows[row][1] * rhs.rows[1][col]
                    + self.rows[row][2] * rhs.rows[2][col];
            }
        }
        result
    }
}

impl<T> Mul<T> for Matrix3<T>
where
    T: Scalar,
{
    type Output = Matrix3<T>;

    fn mul(mut self, rhs: T) -> Self::Output {
        self.rows.iter_mut().flatten().for_each(|value| *value = *value * rhs);
        self
    }
}

impl<T> Div<T> for Matrix3<T>
where
    T: Scalar,
{
    type Output = Matrix3<T>;

    fn div(mut self, rhs: T) -> Self::Output {
        self.rows.iter_mut().flatten().for_each(|value| *value = *value / rhs);
        self
    }
}

impl<T> Add<Matrix3<T>> for Matrix3<T>
where
    T: Scalar,
{
    type Output = Matrix3<T>;

    fn add(mut self, rhs: Matrix3<T>) -> Self::Output {
        for row in 0..3 {
            for col in 0..3 {
                self.rows[row][col] = self.rows[row][col] + rhs.rows[row][col];
            }
        }
        self
    }
}

impl<T> Sub<Matrix3<T>> for Matrix3<T>
where
    T: Scalar,
{
    type Output = Matrix3<T>;

    fn sub(mut self, rhs: Matrix3<T>) -> Self::Output {
        for row in 0..3 {
            for col in 0..3 {
                self.rows[row][col] = self.rows[row][col] - rhs.rows[row][col];
            }
        }
        self
    }
}

impl<T> Index<(usize, usize)> for Matrix3<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.rows[row][col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix3<T> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.rows[row][col]
    }
}

impl<T> Copy for Matrix3<T> where T: Copy {}

impl<T> Clone for Matrix3<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<T> PartialEq for Matrix3<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<T> Debug for Matrix3<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}
