use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, Scalar};
use crate::Matrix;

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Squared Frobenius norm (sum of all elements squared). No sqrt, works
    /// with integers.
    pub fn frobenius_norm_squared(&self) -> T {
        self.as_slice().iter().fold(T::zero(), |s, &x| s + x * x)
    }
}

impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Frobenius norm, `sqrt(Σ a_ij²)`.
    pub fn frobenius_norm(&self) -> T {
        self.frobenius_norm_squared().sqrt()
    }

    /// One norm (maximum absolute column sum).
    pub fn norm_one(&self) -> T {
        let mut max = T::zero();
        for j in 0..C {
            let mut col_sum = T::zero();
            for row in &self.data {
                col_sum = col_sum + row[j].abs();
            }
            if col_sum > max {
                max = col_sum;
            }
        }
        max
    }

    /// Infinity norm (maximum absolute row sum).
    pub fn norm_inf(&self) -> T {
        let mut max = T::zero();
        for row in &self.data {
            let row_sum = row.iter().fold(T::zero(), |s, &x| s + x.abs());
            if row_sum > max {
                max = row_sum;
            }
        }
        max
    }

    /// Entry-wise p-norm, `(Σ |a_ij|^p)^(1/p)`.
    ///
    /// Returns NaN for `p ≤ 0` rather than panicking. `p = 2` agrees with
    /// [`frobenius_norm`](Self::frobenius_norm).
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let m = Matrix::new([[1.0_f64, -2.0], [2.0, 0.0]]);
    /// assert!((m.norm_p(1.0) - 5.0).abs() < 1e-12);
    /// assert!((m.norm_p(2.0) - 3.0).abs() < 1e-12);
    /// assert!(m.norm_p(0.0).is_nan());
    /// ```
    pub fn norm_p(&self, p: T) -> T {
        if p <= T::zero() {
            return T::nan();
        }
        let sum = self
            .as_slice()
            .iter()
            .fold(T::zero(), |s, &x| s + x.abs().powf(p));
        sum.powf(T::one() / p)
    }
}

// ── Condition numbers ───────────────────────────────────────────────
//
// `‖A‖ · ‖A⁻¹‖` with the Gauss-Jordan inverse; its error is passed through.

impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// Condition number in the Frobenius norm.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// use fixmat::linalg::LinalgError;
    ///
    /// let d = Matrix::new([[2.0_f64, 0.0], [0.0, 0.5]]);
    /// assert!((d.cond_inf().unwrap() - 4.0).abs() < 1e-12);
    ///
    /// let s = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
    /// assert_eq!(s.cond_frobenius().unwrap_err(), LinalgError::Singular);
    /// ```
    pub fn cond_frobenius(&self) -> Result<T, LinalgError> {
        Ok(self.frobenius_norm() * self.inverse()?.frobenius_norm())
    }

    /// Condition number in the one norm.
    pub fn cond_one(&self) -> Result<T, LinalgError> {
        Ok(self.norm_one() * self.inverse()?.norm_one())
    }

    /// Condition number in the infinity norm.
    pub fn cond_inf(&self) -> Result<T, LinalgError> {
        Ok(self.norm_inf() * self.inverse()?.norm_inf())
    }

    /// Condition number in the entry-wise p-norm. NaN for `p ≤ 0`.
    pub fn cond_p(&self, p: T) -> Result<T, LinalgError> {
        Ok(self.norm_p(p) * self.inverse()?.norm_p(p))
    }
}
