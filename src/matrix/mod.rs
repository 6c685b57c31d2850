mod norm;
mod ops;
mod square;
mod util;

use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Fixed-size matrix with `R` rows and `C` columns.
///
/// Storage is row-major: `data[row][col]`, so element `(r, c)` is the
/// `r * C + c`-th element of [`as_slice`](Matrix::as_slice).
/// Stack-allocated, no-std compatible, `Copy` when `T` is.
///
/// A zero-sized dimension is rejected at compile time by every constructor.
///
/// # Examples
///
/// ```
/// use fixmat::Matrix;
///
/// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b: Matrix<f64, 3, 3> = Matrix::eye();
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const R: usize, const C: usize> {
    pub(crate) data: [[T; C]; R],
}

/// Column vector (`N`×1 matrix), the right-hand side of `solve`.
pub type ColumnVector<T, const N: usize> = Matrix<T, N, 1>;

/// 1×1 matrix.
pub type Matrix1<T> = Matrix<T, 1, 1>;
/// 2×2 matrix.
pub type Matrix2<T> = Matrix<T, 2, 2>;
/// 3×3 matrix.
pub type Matrix3<T> = Matrix<T, 3, 3>;
/// 4×4 matrix.
pub type Matrix4<T> = Matrix<T, 4, 4>;
/// 5×5 matrix.
pub type Matrix5<T> = Matrix<T, 5, 5>;
/// 6×6 matrix.
pub type Matrix6<T> = Matrix<T, 6, 6>;

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    const NON_EMPTY: () = assert!(R > 0 && C > 0, "matrix dimensions must be non-zero");

    /// Create a matrix from a row-major 2D array.
    ///
    /// The input is `[[row0], [row1], ...]` (R arrays of C elements each).
    #[inline]
    pub const fn new(rows: [[T; C]; R]) -> Self {
        let () = Self::NON_EMPTY;
        Self { data: rows }
    }

    /// Number of rows.
    #[inline]
    pub const fn nrows(&self) -> usize {
        R
    }

    /// Number of columns.
    #[inline]
    pub const fn ncols(&self) -> usize {
        C
    }

    /// All elements as a flat row-major slice of length `R * C`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_flattened()
    }

    /// All elements as a flat row-major mutable slice of length `R * C`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_flattened_mut()
    }
}

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Create a matrix filled with zeros.
    pub fn zeros() -> Self {
        Self::new([[T::zero(); C]; R])
    }

    /// Create a matrix with every element set to `value`.
    pub fn from_element(value: T) -> Self {
        Self::new([[value; C]; R])
    }

    /// Set every element to `value`.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let mut m: Matrix<i32, 2, 3> = Matrix::zeros();
    /// m.fill(7);
    /// assert_eq!(m.sum(), 42);
    /// ```
    pub fn fill(&mut self, value: T) {
        for x in self.as_mut_slice() {
            *x = value;
        }
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Create an identity matrix (square matrices only).
    pub fn eye() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = T::one();
        }
        m
    }
}

impl<T, const R: usize, const C: usize> MatrixRef<T> for Matrix<T, R, C> {
    #[inline]
    fn nrows(&self) -> usize {
        R
    }

    #[inline]
    fn ncols(&self) -> usize {
        C
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row][col]
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        &self.data[row][col_start..]
    }
}

impl<T, const R: usize, const C: usize> MatrixMut<T> for Matrix<T, R, C> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row][col]
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        &mut self.data[row][col_start..]
    }
}

// Index by (row, col) tuple. Out-of-range indices are a programming error
// and panic in every build profile.
impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < R && col < C, "index ({row}, {col}) out of bounds for {R}x{C} matrix");
        &self.data[row][col]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < R && col < C, "index ({row}, {col}) out of bounds for {R}x{C} matrix");
        &mut self.data[row][col]
    }
}
