use core::fmt::{self, Write as _};

use crate::matrix::ColumnVector;
use crate::traits::{FloatScalar, Scalar};
use crate::Matrix;

// ── Constructors ────────────────────────────────────────────────────

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m: Matrix<f64, 3, 3> = Matrix::from_fn(|i, j| {
    ///     if i == j { 1.0 } else { 0.0 }
    /// });
    /// assert_eq!(m, Matrix::eye());
    /// ```
    pub fn from_fn(f: impl Fn(usize, usize) -> T) -> Self
    where
        T: Copy + Default,
    {
        let mut data = [[T::default(); C]; R];
        for (i, row) in data.iter_mut().enumerate() {
            for (j, x) in row.iter_mut().enumerate() {
                *x = f(i, j);
            }
        }
        Self::new(data)
    }

    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m = Matrix::new([[1.0_f64, 4.0], [9.0, 16.0]]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Matrix<U, R, C>
    where
        T: Copy,
    {
        let mut data = [[U::default(); C]; R];
        for i in 0..R {
            for j in 0..C {
                data[i][j] = f(self.data[i][j]);
            }
        }
        Matrix::new(data)
    }

    /// Transpose: a new C×R matrix with `out[(j, i)] = self[(i, j)]`.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m = Matrix::new([[1, 2, 3], [4, 5, 6]]);
    /// let t = m.transpose();
    /// assert_eq!(t.nrows(), 3);
    /// assert_eq!(t[(2, 1)], 6);
    /// ```
    pub fn transpose(&self) -> Matrix<T, C, R>
    where
        T: Copy,
    {
        let init = self.data[0][0];
        let mut data = [[init; R]; C];
        for i in 0..R {
            for j in 0..C {
                data[j][i] = self.data[i][j];
            }
        }
        Matrix::new(data)
    }
}

// ── Aggregation ─────────────────────────────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Sum of all elements.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// assert_eq!(m.sum(), 10.0);
    /// ```
    pub fn sum(&self) -> T {
        self.as_slice().iter().fold(T::zero(), |s, &x| s + x)
    }
}

impl<T: Scalar + PartialOrd, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Largest element (linear scan; NaN elements are never selected
    /// unless they come first).
    pub fn max(&self) -> T {
        self.as_slice()
            .iter()
            .fold(self.data[0][0], |m, &x| if x > m { x } else { m })
    }

    /// Smallest element (linear scan).
    pub fn min(&self) -> T {
        self.as_slice()
            .iter()
            .fold(self.data[0][0], |m, &x| if x < m { x } else { m })
    }
}

impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Element-wise absolute value.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m = Matrix::new([[1.0_f64, -2.0], [-3.0, 4.0]]);
    /// let a = m.abs();
    /// assert_eq!(a[(0, 1)], 2.0);
    /// assert_eq!(a[(1, 0)], 3.0);
    /// ```
    pub fn abs(&self) -> Self {
        let mut out = *self;
        for x in out.as_mut_slice() {
            *x = x.abs();
        }
        out
    }

    /// Largest absolute difference to `other`, element by element.
    ///
    /// Convenient for comparing decomposition products against the input.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .fold(T::zero(), |m, (&a, &b)| m.max((a - b).abs()))
    }
}

// ── Row / Column access ─────────────────────────────────────────────

impl<T: Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Swap two rows in place.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let mut m = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// m.swap_rows(0, 1);
    /// assert_eq!(m[(0, 0)], 3.0);
    /// assert_eq!(m[(1, 0)], 1.0);
    /// ```
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }

    /// Row `i` as an array.
    pub fn row(&self, i: usize) -> [T; C] {
        self.data[i]
    }

    /// Column `j` as a column vector.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// let c = m.col(1);
    /// assert_eq!(c[(0, 0)], 2.0);
    /// assert_eq!(c[(1, 0)], 4.0);
    /// ```
    pub fn col(&self, j: usize) -> ColumnVector<T, R> {
        let mut data = [[self.data[0][j]; 1]; R];
        for (i, out) in data.iter_mut().enumerate() {
            out[0] = self.data[i][j];
        }
        Matrix::new(data)
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display, const R: usize, const C: usize> fmt::Display for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Find max width per column for alignment
        let mut widths = [0usize; C];
        for row in &self.data {
            for (w, x) in widths.iter_mut().zip(row) {
                *w = (*w).max(WriteCounting::count(|wc| write!(wc, "{}", x)));
            }
        }

        for (i, row) in self.data.iter().enumerate() {
            write!(f, "│")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", x, width = widths[j])?;
            }
            write!(f, "│")?;
            if i + 1 < R {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Helper to count characters written, without allocating.
struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.len();
        Ok(())
    }
}
