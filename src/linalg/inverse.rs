use crate::linalg::{LinalgError, Tolerances};
use crate::traits::{FloatScalar, MatrixMut};
use crate::Matrix;

/// Gauss-Jordan elimination in place, without pivoting.
///
/// On entry `a` holds the square matrix to invert; `inv` is overwritten with
/// the identity and, on success, holds `a⁻¹`. `a` is reduced towards the
/// identity along the way, so pass a copy if the original is still needed.
///
/// Rows are used in their natural order: a diagonal entry whose magnitude
/// drops below `pivot_tol` is reported as [`LinalgError::Singular`] even
/// when a row exchange would have rescued it (e.g. `[[0, 1], [1, 0]]`).
/// Use [`LuDecomposition`](crate::linalg::LuDecomposition) for a pivoted
/// alternative.
pub fn gauss_jordan_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    inv: &mut impl MatrixMut<T>,
    pivot_tol: T,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Gauss-Jordan elimination requires a square matrix");
    assert!(
        inv.nrows() == n && inv.ncols() == n,
        "inverse storage must match the matrix size"
    );

    for i in 0..n {
        for j in 0..n {
            *inv.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }

    for i in 0..n {
        let pivot = *a.get(i, i);
        if pivot.abs() < pivot_tol {
            log::debug!("gauss-jordan: pivot {:?} in row {} is below tolerance", pivot, i);
            return Err(LinalgError::Singular);
        }

        // Normalize row i; columns left of i are already zero on the a side.
        for x in a.row_as_mut_slice(i, i) {
            *x = *x / pivot;
        }
        for x in inv.row_as_mut_slice(i, 0) {
            *x = *x / pivot;
        }

        // Eliminate column i from every other row.
        for r in 0..n {
            if r == i {
                continue;
            }
            let factor = *a.get(r, i);
            if factor == T::zero() {
                continue;
            }
            for j in i..n {
                let v = *a.get(i, j);
                *a.get_mut(r, j) = *a.get(r, j) - factor * v;
            }
            for j in 0..n {
                let v = *inv.get(i, j);
                *inv.get_mut(r, j) = *inv.get(r, j) - factor * v;
            }
        }
    }

    Ok(())
}

/// Inverse of square matrices.
impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// Matrix inverse by Gauss-Jordan elimination, with the default
    /// [`Tolerances`].
    ///
    /// No row exchanges are made, see [`gauss_jordan_in_place`].
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let a = Matrix::new([[2.0_f64, 1.0], [1.0, 1.0]]);
    /// let a_inv = a.inverse().unwrap();
    /// assert!((a_inv[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!((a_inv[(0, 1)] + 1.0).abs() < 1e-12);
    /// assert!((a_inv[(1, 1)] - 2.0).abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        self.inverse_with(&Tolerances::DEFAULT)
    }

    /// Matrix inverse with an explicit pivot tolerance.
    pub fn inverse_with(&self, tol: &Tolerances) -> Result<Self, LinalgError> {
        let mut work = *self;
        let mut inv = Self::zeros();
        gauss_jordan_in_place(&mut work, &mut inv, tol.pivot_as())?;
        Ok(inv)
    }
}
