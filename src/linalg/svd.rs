use num_traits::NumCast;

use crate::linalg::{LinalgError, Tolerances};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::Matrix;

// ── Column kernels ──────────────────────────────────────────────────

/// Dot product of columns `p` and `q`.
pub fn column_dot<T: FloatScalar>(m: &impl MatrixRef<T>, p: usize, q: usize) -> T {
    let mut sum = T::zero();
    for i in 0..m.nrows() {
        let row = m.row_as_slice(i, 0);
        sum = sum + row[p] * row[q];
    }
    sum
}

/// Plane rotation of columns `p` and `q`:
/// `(w_p, w_q) ← (c·w_p − s·w_q, s·w_p + c·w_q)`.
pub fn rotate_columns<T: FloatScalar>(m: &mut impl MatrixMut<T>, p: usize, q: usize, c: T, s: T) {
    for i in 0..m.nrows() {
        let row = m.row_as_mut_slice(i, 0);
        let (wp, wq) = (row[p], row[q]);
        row[p] = c * wp - s * wq;
        row[q] = s * wp + c * wq;
    }
}

// ── One-sided Jacobi ────────────────────────────────────────────────

/// One-sided Jacobi SVD of an M×N matrix, `M ≥ N`.
///
/// Returns `(U, σ, V)` with `σ` in column order.
fn one_sided_jacobi<T: FloatScalar, const M: usize, const N: usize>(
    a: &Matrix<T, M, N>,
    tol: &Tolerances,
) -> Result<(Matrix<T, M, M>, [T; N], Matrix<T, N, N>), LinalgError> {
    debug_assert!(M >= N);

    // Rounding alone leaves |γ| near ε·sqrt(αβ), so the threshold never
    // drops below 16·M·ε of the element type.
    let dim: T = <T as NumCast>::from(16 * M).unwrap_or_else(T::one);
    let ortho_tol = tol.orthogonality_as::<T>().max(T::epsilon() * dim);

    let mut w = *a;
    let mut v = Matrix::<T, N, N>::eye();

    let mut converged = false;
    for sweep in 0..tol.max_sweeps {
        let mut rotations = 0usize;
        for p in 0..N {
            for q in (p + 1)..N {
                let alpha = column_dot(&w, p, p);
                let beta = column_dot(&w, q, q);
                let gamma = column_dot(&w, p, q);
                if gamma.abs() <= ortho_tol * (alpha * beta).sqrt() {
                    continue;
                }

                let two = T::one() + T::one();
                let zeta = (beta - alpha) / (two * gamma);
                let sign = if zeta >= T::zero() { T::one() } else { -T::one() };
                let t = sign / (zeta.abs() + (T::one() + zeta * zeta).sqrt());
                let c = T::one() / (T::one() + t * t).sqrt();
                let s = c * t;

                rotate_columns(&mut w, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
                rotations += 1;
            }
        }
        log::trace!("svd: sweep {} applied {} rotations", sweep, rotations);
        if rotations == 0 {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "svd: no convergence after {} sweeps on a {}x{} matrix",
            tol.max_sweeps,
            M,
            N
        );
        return Err(LinalgError::ConvergenceFailure);
    }

    let pivot_tol = tol.pivot_as::<T>();
    let mut sigma = [T::zero(); N];
    let mut u = Matrix::<T, M, M>::zeros();
    let mut filled = [false; M];

    for j in 0..N {
        let norm = column_dot(&w, j, j).sqrt();
        sigma[j] = norm;
        if norm < pivot_tol {
            continue;
        }
        for i in 0..M {
            u.data[i][j] = w.data[i][j] / norm;
        }
        filled[j] = true;
    }

    complete_orthonormal(&mut u, &mut filled);

    Ok((u, sigma, v))
}

/// Fill every column of `u` not marked in `filled` with a unit vector
/// orthogonal to all filled columns.
///
/// Candidates are the standard basis vectors, orthogonalized twice by
/// modified Gram-Schmidt; the one with the largest residual wins.
fn complete_orthonormal<T: FloatScalar, const M: usize>(
    u: &mut Matrix<T, M, M>,
    filled: &mut [bool; M],
) {
    for j in 0..M {
        if filled[j] {
            continue;
        }

        let mut best = [T::zero(); M];
        let mut best_norm = -T::one();
        for e in 0..M {
            let mut r = [T::zero(); M];
            r[e] = T::one();
            for _ in 0..2 {
                for k in 0..M {
                    if !filled[k] {
                        continue;
                    }
                    let mut d = T::zero();
                    for i in 0..M {
                        d = d + u.data[i][k] * r[i];
                    }
                    for i in 0..M {
                        r[i] = r[i] - d * u.data[i][k];
                    }
                }
            }
            let norm = r.iter().fold(T::zero(), |s, &x| s + x * x).sqrt();
            if norm > best_norm {
                best_norm = norm;
                best = r;
            }
        }

        for i in 0..M {
            u.data[i][j] = best[i] / best_norm;
        }
        filled[j] = true;
    }
}

// ── SvdDecomposition ────────────────────────────────────────────────

/// Singular value decomposition `A = U·Σ·Vᵗ` by one-sided Jacobi rotations.
///
/// U is R×R and V is C×C, both orthogonal. Σ is R×C with the
/// `min(R, C)` singular values on its diagonal, **in column order, not
/// sorted**. Wide matrices are handled by decomposing `Aᵗ` and swapping
/// the roles of U and V.
///
/// # Example
///
/// ```
/// use fixmat::Matrix;
///
/// let a = Matrix::new([[3.0_f64, 0.0], [0.0, -4.0]]);
/// let svd = a.svd().unwrap();
/// // unsorted: column order is kept
/// assert!((svd.singular_value(0) - 3.0).abs() < 1e-12);
/// assert!((svd.singular_value(1) - 4.0).abs() < 1e-12);
///
/// let back = svd.u() * svd.sigma() * svd.v().transpose();
/// assert!(back.max_abs_diff(&a) < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SvdDecomposition<T, const R: usize, const C: usize> {
    u: Matrix<T, R, R>,
    sigma: Matrix<T, R, C>,
    v: Matrix<T, C, C>,
}

impl<T: FloatScalar, const R: usize, const C: usize> SvdDecomposition<T, R, C> {
    /// Decompose with the default [`Tolerances`].
    pub fn new(a: &Matrix<T, R, C>) -> Result<Self, LinalgError> {
        Self::new_with(a, &Tolerances::DEFAULT)
    }

    /// Decompose with explicit tolerances.
    ///
    /// `tol.orthogonality` is the pair-skip threshold, `tol.max_sweeps` the
    /// sweep budget (exhausting it is [`LinalgError::ConvergenceFailure`]),
    /// and `tol.pivot` the norm below which a column of `U` is completed
    /// instead of normalized.
    pub fn new_with(a: &Matrix<T, R, C>, tol: &Tolerances) -> Result<Self, LinalgError> {
        let mut sigma = Matrix::<T, R, C>::zeros();
        if R >= C {
            let (u, s, v) = one_sided_jacobi::<T, R, C>(a, tol)?;
            for (j, &x) in s.iter().enumerate() {
                sigma.data[j][j] = x;
            }
            Ok(Self { u, sigma, v })
        } else {
            // Aᵗ = U'·Σ'·V'ᵗ gives A = V'·Σ'ᵗ·U'ᵗ
            let (u_t, s, v_t) = one_sided_jacobi::<T, C, R>(&a.transpose(), tol)?;
            for (j, &x) in s.iter().enumerate() {
                sigma.data[j][j] = x;
            }
            Ok(Self { u: v_t, sigma, v: u_t })
        }
    }

    /// Left singular vectors (R×R, orthogonal).
    pub fn u(&self) -> Matrix<T, R, R> {
        self.u
    }

    /// Σ (R×C), singular values on the diagonal.
    pub fn sigma(&self) -> Matrix<T, R, C> {
        self.sigma
    }

    /// Right singular vectors (C×C, orthogonal).
    pub fn v(&self) -> Matrix<T, C, C> {
        self.v
    }

    /// The `i`-th singular value, `Σ(i, i)`.
    ///
    /// Panics if `i ≥ min(R, C)`.
    pub fn singular_value(&self, i: usize) -> T {
        assert!(
            i < R.min(C),
            "singular value {i} out of range for a {R}x{C} matrix"
        );
        self.sigma.data[i][i]
    }

    /// The `min(R, C)` singular values, in column order.
    pub fn singular_values(&self) -> impl Iterator<Item = T> + '_ {
        (0..R.min(C)).map(move |i| self.sigma.data[i][i])
    }

    /// Number of singular values greater than `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.singular_values().filter(|&s| s > tol).count()
    }

    /// `σ_max / σ_min`; infinite when the smallest singular value is zero.
    pub fn condition_number(&self) -> T {
        let mut s_max = T::zero();
        let mut s_min = T::infinity();
        for s in self.singular_values() {
            s_max = s_max.max(s);
            s_min = s_min.min(s);
        }
        if s_min == T::zero() {
            T::infinity()
        } else {
            s_max / s_min
        }
    }
}

/// SVD convenience methods.
impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Singular value decomposition (one-sided Jacobi).
    ///
    /// ```
    /// use fixmat::Matrix;
    ///
    /// let a = Matrix::new([[1.0_f64, 2.0, 0.0], [0.0, 1.0, 3.0]]);
    /// let svd = a.svd().unwrap();
    /// let back = svd.u() * svd.sigma() * svd.v().transpose();
    /// assert!(back.max_abs_diff(&a) < 1e-10);
    /// ```
    pub fn svd(&self) -> Result<SvdDecomposition<T, R, C>, LinalgError> {
        SvdDecomposition::new(self)
    }

    /// Singular value decomposition with explicit tolerances.
    pub fn svd_with(&self, tol: &Tolerances) -> Result<SvdDecomposition<T, R, C>, LinalgError> {
        SvdDecomposition::new_with(self, tol)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-8;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!(
            (a - b).abs() < tol,
            "{}: {} vs {} (diff {})",
            msg,
            a,
            b,
            (a - b).abs()
        );
    }

    fn assert_orthogonal<const N: usize>(m: &Matrix<f64, N, N>, name: &str) {
        let mtm = m.transpose() * *m;
        for i in 0..N {
            for j in 0..N {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(mtm[(i, j)], expected, TOL, &format!("{}ᵗ{}[({},{})]", name, name, i, j));
            }
        }
    }

    fn check_svd<const R: usize, const C: usize>(a: &Matrix<f64, R, C>) -> SvdDecomposition<f64, R, C> {
        let svd = a.svd().unwrap();
        let back = svd.u() * svd.sigma() * svd.v().transpose();
        for i in 0..R {
            for j in 0..C {
                assert_near(back[(i, j)], a[(i, j)], TOL, &format!("UΣVᵗ[({},{})]", i, j));
            }
        }
        assert_orthogonal(&svd.u(), "U");
        assert_orthogonal(&svd.v(), "V");
        for i in 0..R {
            for j in 0..C {
                if i != j {
                    assert_eq!(svd.sigma()[(i, j)], 0.0);
                }
            }
        }
        for s in svd.singular_values() {
            assert!(s >= 0.0);
        }
        svd
    }

    fn sorted<const N: usize>(mut s: [f64; N]) -> [f64; N] {
        s.sort_by(|a, b| b.partial_cmp(a).unwrap());
        s
    }

    #[test]
    fn identity() {
        let id: Matrix<f64, 3, 3> = Matrix::eye();
        let svd = check_svd(&id);
        assert_eq!(svd.u(), id);
        assert_eq!(svd.sigma(), id);
        assert_eq!(svd.v(), id);
    }

    #[test]
    fn diagonal_keeps_column_order() {
        let a = Matrix::new([[3.0_f64, 0.0, 0.0], [0.0, -4.0, 0.0], [0.0, 0.0, 1.0]]);
        let svd = check_svd(&a);
        assert_eq!(svd.singular_value(0), 3.0);
        assert_eq!(svd.singular_value(1), 4.0);
        assert_eq!(svd.singular_value(2), 1.0);
        assert_eq!(svd.u()[(1, 1)], -1.0);
    }

    #[test]
    fn known_2x2() {
        // AᵗA = [[25, 20], [20, 25]], eigenvalues 45 and 5
        let a = Matrix::new([[3.0_f64, 0.0], [4.0, 5.0]]);
        let svd = check_svd(&a);
        let s = sorted([svd.singular_value(0), svd.singular_value(1)]);
        assert_near(s[0], 45.0_f64.sqrt(), TOL, "σ_max");
        assert_near(s[1], 5.0_f64.sqrt(), TOL, "σ_min");
        assert_near(svd.condition_number(), 3.0, TOL, "cond");
    }

    #[test]
    fn reconstruction_3x3() {
        check_svd(&Matrix::new([
            [2.0_f64, -1.0, 0.0],
            [-1.0, 2.0, -1.0],
            [0.5, -1.0, 3.0],
        ]));
    }

    #[test]
    fn tall_5x3() {
        let svd = check_svd(&Matrix::new([
            [1.0_f64, 2.0, 3.0],
            [4.0, 5.0, 6.0],
            [7.0, 8.0, 10.0],
            [1.0, 0.0, 1.0],
            [2.0, -1.0, 0.5],
        ]));
        assert_eq!(svd.rank(1e-10), 3);
    }

    #[test]
    fn wide_2x4() {
        let a = Matrix::new([[3.0_f64, 2.0, 2.0, -1.0], [2.0, 3.0, -2.0, 0.5]]);
        let svd = check_svd(&a);
        // σ² are the eigenvalues of AAᵗ, whose trace is ‖A‖_F²
        let sum_sq: f64 = svd.singular_values().map(|s| s * s).sum();
        assert_near(sum_sq, a.frobenius_norm_squared(), 1e-9, "Σσ²");
    }

    #[test]
    fn single_row_and_column() {
        let row = Matrix::new([[3.0_f64, 4.0]]);
        let svd = check_svd(&row);
        assert_near(svd.singular_value(0), 5.0, TOL, "row σ");

        let col = Matrix::new([[0.0_f64], [3.0], [4.0]]);
        let svd = check_svd(&col);
        assert_near(svd.singular_value(0), 5.0, TOL, "col σ");
    }

    #[test]
    fn one_by_one_negative() {
        let a = Matrix::new([[-5.0_f64]]);
        let svd = check_svd(&a);
        assert_eq!(svd.singular_value(0), 5.0);
        assert_eq!(svd.u()[(0, 0)], -1.0);
        assert_eq!(svd.v()[(0, 0)], 1.0);
    }

    #[test]
    fn rank_deficient() {
        let a = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
        let svd = check_svd(&a);
        assert_eq!(svd.rank(1e-10), 1);
        let s = sorted([svd.singular_value(0), svd.singular_value(1)]);
        assert_near(s[0], 5.0, TOL, "σ_max");
        assert!(s[1] < 1e-10);
    }

    #[test]
    fn zero_matrix() {
        let z: Matrix<f64, 3, 2> = Matrix::zeros();
        let svd = check_svd(&z);
        assert_eq!(svd.rank(0.0), 0);
        assert!(svd.condition_number().is_infinite());
        assert_eq!(svd.u(), Matrix::eye());
    }

    #[test]
    fn sweep_budget_exhausted() {
        let a = Matrix::new([[2.0_f64, 1.0], [1.0, 3.0]]);
        let tol = Tolerances { max_sweeps: 1, ..Tolerances::DEFAULT };
        assert_eq!(a.svd_with(&tol).unwrap_err(), LinalgError::ConvergenceFailure);
        let none = Tolerances { max_sweeps: 0, ..Tolerances::DEFAULT };
        assert_eq!(a.svd_with(&none).unwrap_err(), LinalgError::ConvergenceFailure);
        assert!(a.svd().is_ok());
    }

    #[test]
    fn f32_support() {
        let a = Matrix::new([[4.0_f32, 7.0], [2.0, 6.0]]);
        let svd = a.svd().unwrap();
        let back = svd.u() * svd.sigma() * svd.v().transpose();
        assert!(back.max_abs_diff(&a) < 1e-4);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn singular_value_out_of_range() {
        let svd = Matrix::new([[1.0_f64, 2.0, 3.0]]).svd().unwrap();
        svd.singular_value(1);
    }

    #[test]
    fn column_kernels() {
        let mut m = Matrix::new([[1.0_f64, 0.0], [0.0, 1.0]]);
        assert_eq!(column_dot(&m, 0, 1), 0.0);
        let (c, s) = (0.6, 0.8);
        rotate_columns(&mut m, 0, 1, c, s);
        assert_eq!(m, Matrix::new([[0.6, 0.8], [-0.8, 0.6]]));
        assert_near(column_dot(&m, 0, 0), 1.0, 1e-15, "unit column");
    }
}
