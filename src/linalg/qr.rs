use crate::linalg::{LinalgError, Tolerances};
use crate::matrix::ColumnVector;
use crate::traits::{FloatScalar, MatrixMut};
use crate::Matrix;

/// Householder reduction in place.
///
/// On return the upper triangle of `w` (rows `0..ncols`) holds R before sign
/// normalization. Column `k` of `v` holds the Householder vector of step `k`
/// (zero above row `k`) and `beta[k] = 2 / ‖v_k‖²`, so that
/// `H_k = I − β_k·v_k·v_kᵗ`. Entries of `w` below the diagonal are left as
/// rounding residue.
///
/// Requires `nrows ≥ ncols`. Fails with [`LinalgError::RankDeficient`] when a
/// sub-column norm drops below `pivot_tol`, or when the reflector itself has
/// zero length.
pub fn householder_in_place<T: FloatScalar>(
    w: &mut impl MatrixMut<T>,
    v: &mut impl MatrixMut<T>,
    beta: &mut [T],
    pivot_tol: T,
) -> Result<(), LinalgError> {
    let (m, n) = (w.nrows(), w.ncols());
    assert!(m >= n, "Householder QR requires at least as many rows as columns");
    assert!(v.nrows() == m && v.ncols() == n, "reflector storage must be {m}x{n}");
    assert_eq!(beta.len(), n, "beta length must match the column count");

    for k in 0..n {
        let mut norm_sq = T::zero();
        for i in k..m {
            let x = *w.get(i, k);
            norm_sq = norm_sq + x * x;
        }
        let norm = norm_sq.sqrt();
        if norm < pivot_tol {
            log::debug!("qr: column {} has norm {:?} below tolerance", k, norm);
            return Err(LinalgError::RankDeficient);
        }

        let wkk = *w.get(k, k);
        let sign = if wkk >= T::zero() { T::one() } else { -T::one() };

        for i in 0..k {
            *v.get_mut(i, k) = T::zero();
        }
        *v.get_mut(k, k) = wkk + sign * norm;
        for i in (k + 1)..m {
            *v.get_mut(i, k) = *w.get(i, k);
        }

        let mut v_sq = T::zero();
        for i in k..m {
            let x = *v.get(i, k);
            v_sq = v_sq + x * x;
        }
        if v_sq == T::zero() {
            log::debug!("qr: reflector for column {} has zero length", k);
            return Err(LinalgError::RankDeficient);
        }
        let b = (T::one() + T::one()) / v_sq;
        beta[k] = b;

        for j in k..n {
            let mut dot = T::zero();
            for i in k..m {
                dot = dot + *v.get(i, k) * *w.get(i, j);
            }
            let f = b * dot;
            for i in k..m {
                *w.get_mut(i, j) = *w.get(i, j) - f * *v.get(i, k);
            }
        }
    }

    Ok(())
}

/// QR decomposition `A = Q·R` of a fixed-size matrix with `R ≥ C`.
///
/// Q is the thin R×C factor with orthonormal columns, R is C×C upper
/// triangular with a non-negative diagonal. The sign normalization makes
/// the factorization unique for full-rank input.
///
/// # Example
///
/// ```
/// use fixmat::Matrix;
///
/// // Least-squares fit: y = c0 + c1*x to points (0,1), (1,2), (2,4)
/// let a = Matrix::new([[1.0_f64, 0.0], [1.0, 1.0], [1.0, 2.0]]);
/// let b = Matrix::new([[1.0], [2.0], [4.0]]);
/// let x = a.qr().unwrap().solve(&b);
/// assert!((x[(0, 0)] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[(1, 0)] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QrDecomposition<T, const R: usize, const C: usize> {
    q: Matrix<T, R, C>,
    r: Matrix<T, C, C>,
    // det(Q) for square input: one factor -1 per reflection and per sign flip.
    q_det_negative: bool,
}

impl<T: FloatScalar, const R: usize, const C: usize> QrDecomposition<T, R, C> {
    /// Decompose with the default [`Tolerances`].
    pub fn new(a: &Matrix<T, R, C>) -> Result<Self, LinalgError> {
        Self::new_with(a, &Tolerances::DEFAULT)
    }

    /// Decompose with an explicit zero-column tolerance.
    pub fn new_with(a: &Matrix<T, R, C>, tol: &Tolerances) -> Result<Self, LinalgError> {
        const { assert!(R >= C, "QR decomposition requires R >= C") };

        let mut w = *a;
        let mut v = Matrix::<T, R, C>::zeros();
        let mut beta = [T::zero(); C];
        householder_in_place(&mut w, &mut v, &mut beta, tol.pivot_as())?;

        // Thin Q: reflections applied in reverse to the first C identity columns.
        let mut q = Matrix::<T, R, C>::zeros();
        for i in 0..C {
            q.data[i][i] = T::one();
        }
        for k in (0..C).rev() {
            for j in k..C {
                let mut dot = T::zero();
                for i in k..R {
                    dot = dot + v.data[i][k] * q.data[i][j];
                }
                let f = beta[k] * dot;
                for i in k..R {
                    q.data[i][j] = q.data[i][j] - f * v.data[i][k];
                }
            }
        }

        let mut r = Matrix::<T, C, C>::zeros();
        for i in 0..C {
            r.data[i][i..].copy_from_slice(&w.data[i][i..]);
        }

        let mut flips = 0usize;
        for i in 0..C {
            if r.data[i][i] < T::zero() {
                for x in &mut r.data[i][i..] {
                    *x = -*x;
                }
                for row in q.data.iter_mut() {
                    row[i] = -row[i];
                }
                flips += 1;
            }
        }

        Ok(Self {
            q,
            r,
            q_det_negative: (C + flips) % 2 == 1,
        })
    }

    /// Thin orthonormal factor (R×C), `Qᵗ·Q = I`.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let a = Matrix::new([[12.0_f64, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]]);
    /// let q = a.qr().unwrap().q();
    /// let qtq = q.transpose() * q;
    /// assert!((qtq[(0, 0)] - 1.0).abs() < 1e-10);
    /// assert!(qtq[(0, 1)].abs() < 1e-10);
    /// ```
    pub fn q(&self) -> Matrix<T, R, C> {
        self.q
    }

    /// Upper-triangular factor (C×C) with non-negative diagonal.
    pub fn r(&self) -> Matrix<T, C, C> {
        self.r
    }

    /// Least-squares solution of `min ‖Ax − b‖`, as `R⁻¹·Qᵗ·b`.
    ///
    /// Exact for square input. R's diagonal is bounded below by the
    /// zero-column tolerance, so the back substitution cannot divide by zero.
    pub fn solve(&self, b: &ColumnVector<T, R>) -> ColumnVector<T, C> {
        let mut x = ColumnVector::<T, C>::zeros();
        for j in 0..C {
            let mut dot = T::zero();
            for i in 0..R {
                dot = dot + self.q.data[i][j] * b.data[i][0];
            }
            x.data[j][0] = dot;
        }

        for i in (0..C).rev() {
            let mut sum = x.data[i][0];
            for j in (i + 1)..C {
                sum = sum - self.r.data[i][j] * x.data[j][0];
            }
            x.data[i][0] = sum / self.r.data[i][i];
        }
        x
    }
}

impl<T: FloatScalar, const N: usize> QrDecomposition<T, N, N> {
    /// Determinant of the decomposed matrix, `det(Q)·Π R(i,i)`.
    pub fn det(&self) -> T {
        let mut d = if self.q_det_negative { -T::one() } else { T::one() };
        for i in 0..N {
            d = d * self.r.data[i][i];
        }
        d
    }
}

/// QR convenience methods.
impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// QR decomposition by Householder reflections. Needs `R ≥ C`.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let qr = Matrix::new([[1.0_f64, 1.0], [0.0, 1.0]]).qr().unwrap();
    /// assert_eq!(qr.q(), Matrix::eye());
    /// assert_eq!(qr.r(), Matrix::new([[1.0, 1.0], [0.0, 1.0]]));
    /// ```
    pub fn qr(&self) -> Result<QrDecomposition<T, R, C>, LinalgError> {
        QrDecomposition::new(self)
    }

    /// QR decomposition with explicit tolerances.
    pub fn qr_with(&self, tol: &Tolerances) -> Result<QrDecomposition<T, R, C>, LinalgError> {
        QrDecomposition::new_with(self, tol)
    }

    /// Least-squares solve via QR.
    pub fn solve_qr(&self, b: &ColumnVector<T, R>) -> Result<ColumnVector<T, C>, LinalgError> {
        Ok(self.qr()?.solve(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn check_qr<const R: usize, const C: usize>(a: &Matrix<f64, R, C>) {
        let qr = a.qr().unwrap();
        let (q, r) = (qr.q(), qr.r());

        let prod: Matrix<f64, R, C> = q * r;
        for i in 0..R {
            for j in 0..C {
                assert_near(prod[(i, j)], a[(i, j)], TOL, &format!("QR[({},{})]", i, j));
            }
        }

        let qtq: Matrix<f64, C, C> = q.transpose() * q;
        for i in 0..C {
            for j in 0..C {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(qtq[(i, j)], expected, TOL, &format!("QtQ[({},{})]", i, j));
            }
        }

        for i in 0..C {
            assert!(r[(i, i)] >= 0.0, "R({},{}) = {} is negative", i, i, r[(i, i)]);
            for j in 0..i {
                assert_eq!(r[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn square_3x3() {
        check_qr(&Matrix::new([
            [12.0_f64, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0],
        ]));
    }

    #[test]
    fn textbook_values() {
        let a = Matrix::new([
            [12.0_f64, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0],
        ]);
        let r = a.qr().unwrap().r();
        assert_near(r[(0, 0)], 14.0, TOL, "r00");
        assert_near(r[(0, 1)], 21.0, TOL, "r01");
        assert_near(r[(0, 2)], -14.0, TOL, "r02");
        assert_near(r[(1, 1)], 175.0, TOL, "r11");
        assert_near(r[(1, 2)], -70.0, TOL, "r12");
        assert_near(r[(2, 2)], 35.0, TOL, "r22");
    }

    #[test]
    fn tall_4x3() {
        check_qr(&Matrix::new([
            [1.0_f64, -1.0, 4.0],
            [1.0, 4.0, -2.0],
            [1.0, 4.0, 2.0],
            [1.0, -1.0, 0.0],
        ]));
    }

    #[test]
    fn single_column() {
        let a = Matrix::new([[3.0_f64], [0.0], [-4.0]]);
        check_qr(&a);
        assert_near(a.qr().unwrap().r()[(0, 0)], 5.0, TOL, "norm");
    }

    #[test]
    fn upper_triangular_input() {
        let qr = Matrix::new([[1.0_f64, 1.0], [0.0, 1.0]]).qr().unwrap();
        assert_eq!(qr.q(), Matrix::eye());
        assert_eq!(qr.r(), Matrix::new([[1.0, 1.0], [0.0, 1.0]]));
    }

    #[test]
    fn one_by_one() {
        let qr = Matrix::new([[5.0_f64]]).qr().unwrap();
        assert_eq!(qr.q(), Matrix::new([[1.0]]));
        assert_eq!(qr.r(), Matrix::new([[5.0]]));

        let neg = Matrix::new([[-5.0_f64]]).qr().unwrap();
        assert_eq!(neg.q()[(0, 0)] * neg.r()[(0, 0)], -5.0);
        assert!(neg.r()[(0, 0)] > 0.0);
    }

    #[test]
    fn identity() {
        let id: Matrix<f64, 3, 3> = Matrix::eye();
        let qr = id.qr().unwrap();
        assert!(qr.q().max_abs_diff(&id) < TOL);
        assert!(qr.r().max_abs_diff(&id) < TOL);
    }

    #[test]
    fn zero_matrix_is_rank_deficient() {
        let z: Matrix<f64, 3, 2> = Matrix::zeros();
        assert_eq!(z.qr().unwrap_err(), LinalgError::RankDeficient);
    }

    #[test]
    fn dependent_column_is_rank_deficient() {
        let a = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0], [3.0, 6.0]]);
        assert_eq!(a.qr().unwrap_err(), LinalgError::RankDeficient);
    }

    #[test]
    fn tolerance_controls_rejection() {
        let a = Matrix::new([[1e-13_f64, 0.0], [0.0, 1.0]]);
        assert!(a.qr().is_err());
        let tol = Tolerances { pivot: 1e-15, ..Tolerances::DEFAULT };
        let qr = a.qr_with(&tol).unwrap();
        assert!((qr.q() * qr.r()).max_abs_diff(&a) < 1e-12);
    }

    #[test]
    fn solve_matches_lu() {
        let a = Matrix::new([[2.0_f64, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]);
        let b = Matrix::new([[8.0], [-11.0], [-3.0]]);
        let x_qr = a.solve_qr(&b).unwrap();
        let x_lu = a.solve(&b).unwrap();
        assert!(x_qr.max_abs_diff(&x_lu) < TOL);
    }

    #[test]
    fn least_squares_residual_is_orthogonal() {
        let a = Matrix::new([[1.0_f64, 0.0], [1.0, 1.0], [1.0, 2.0]]);
        let b = Matrix::new([[1.0], [2.0], [4.0]]);
        let x = a.qr().unwrap().solve(&b);
        let residual = b - a * x;
        let atr = a.transpose() * residual;
        assert_near(atr[(0, 0)], 0.0, TOL, "Aᵗr[0]");
        assert_near(atr[(1, 0)], 0.0, TOL, "Aᵗr[1]");
    }

    #[test]
    fn det_matches_lu_with_sign() {
        let a = Matrix::new([[6.0_f64, 1.0, 1.0], [4.0, -2.0, 5.0], [2.0, 8.0, 7.0]]);
        assert_near(a.qr().unwrap().det(), a.det(), 1e-9, "det");

        let swap = Matrix::new([[0.0_f64, 1.0], [1.0, 0.0]]);
        assert_near(swap.qr().unwrap().det(), -1.0, TOL, "det(swap)");
        assert_near(Matrix::new([[-5.0_f64]]).qr().unwrap().det(), -5.0, TOL, "det([-5])");
    }

    #[test]
    fn free_function_generic() {
        let mut w = Matrix::new([[3.0_f64, 1.0], [4.0, 2.0]]);
        let mut v: Matrix<f64, 2, 2> = Matrix::zeros();
        let mut beta = [0.0; 2];
        householder_in_place(&mut w, &mut v, &mut beta, 1e-12).unwrap();
        // first reflector maps (3, 4) to (-5, 0)
        assert_near(w[(0, 0)], -5.0, TOL, "w00");
        assert_near(v[(0, 0)], 8.0, TOL, "v00");
        assert_near(beta[0], 2.0 / 80.0, TOL, "beta0");
    }
}
