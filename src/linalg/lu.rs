use crate::linalg::{LinalgError, Tolerances};
use crate::matrix::ColumnVector;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::Matrix;

/// Doolittle LU factorization with partial pivoting.
///
/// `a` is only read. `l` (R×R) and `u` (R×C) are overwritten: on success
/// `A(perm[i], j) == Σ_k L(i,k)·U(k,j)` for every `i, j`. With
/// `K = min(R, C)`, `L` is unit lower triangular and its columns `K..R`
/// are identity columns; `U` is upper triangular and its rows `K..R` are
/// zero.
///
/// The pivot for step `i` is the largest `|A(perm[j], i)|` over `j ≥ i`,
/// read from the input rather than the partially reduced matrix. Rows are
/// exchanged logically through `perm`; `a` is never moved.
///
/// Fails with [`LinalgError::Singular`] when the best pivot is below
/// `pivot_tol`, or when `|U(i,i)|` is below `pivot_tol` and rows below it
/// still need to be divided by it. The outcome does not track singularity
/// exactly:
///
/// - a singular matrix whose last diagonal entry of `U` vanishes is
///   factored successfully (`[[1, 2], [2, 4]]` gives `U(1,1) = 0`);
/// - a nonsingular matrix can be rejected when an earlier `U(i,i)` cancels
///   to zero, since the pivot was chosen from the input column
///   (`[[1, 1, 0], [1, 1, 1], [0, 1, 1]]` has determinant -1 but fails at
///   step 1).
///
/// Returns `true` if the number of row exchanges was even.
pub fn lu_factor<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    l: &mut impl MatrixMut<T>,
    u: &mut impl MatrixMut<T>,
    perm: &mut [usize],
    pivot_tol: T,
) -> Result<bool, LinalgError> {
    let (m, n) = (a.nrows(), a.ncols());
    assert!(l.nrows() == m && l.ncols() == m, "L must be {m}x{m}");
    assert!(u.nrows() == m && u.ncols() == n, "U must be {m}x{n}");
    assert_eq!(perm.len(), m, "permutation length must match the row count");

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    for i in 0..m {
        for j in 0..m {
            *l.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
        for x in u.row_as_mut_slice(i, 0) {
            *x = T::zero();
        }
    }

    let k_max = m.min(n);
    let mut even = true;

    for i in 0..k_max {
        let mut best_row = i;
        let mut best = a.get(perm[i], i).abs();
        for j in (i + 1)..m {
            let v = a.get(perm[j], i).abs();
            if v > best {
                best = v;
                best_row = j;
            }
        }
        if best < pivot_tol {
            log::debug!("lu: no pivot in column {} (best |a| = {:?})", i, best);
            return Err(LinalgError::Singular);
        }

        if best_row != i {
            perm.swap(i, best_row);
            // Multipliers already computed belong to the rows, not positions.
            for k in 0..i {
                let tmp = *l.get(i, k);
                *l.get_mut(i, k) = *l.get(best_row, k);
                *l.get_mut(best_row, k) = tmp;
            }
            even = !even;
        }

        // Row i of U.
        for j in i..n {
            let mut sum = *a.get(perm[i], j);
            for k in 0..i {
                sum = sum - *l.get(i, k) * *u.get(k, j);
            }
            *u.get_mut(i, j) = sum;
        }

        // Column i of L below the diagonal.
        let diag = *u.get(i, i);
        if i + 1 < m && diag.abs() < pivot_tol {
            log::debug!("lu: U({}, {}) = {:?} is below tolerance", i, i, diag);
            return Err(LinalgError::Singular);
        }
        for j in (i + 1)..m {
            let mut sum = *a.get(perm[j], i);
            for k in 0..i {
                sum = sum - *l.get(j, k) * *u.get(k, i);
            }
            *l.get_mut(j, i) = sum / diag;
        }
    }

    Ok(even)
}

/// LU decomposition `P·A = L·U` of a fixed-size matrix, square or not.
///
/// `L` is stored as R×R and `U` as R×C; see [`lu_factor`] for the layout
/// when `R ≠ C`.
///
/// # Example
///
/// ```
/// use fixmat::Matrix;
///
/// let a = Matrix::new([[2.0_f64, 1.0], [5.0, 3.0]]);
/// let lu = a.lu().unwrap();
/// let pa = lu.permutation_matrix() * a;
/// assert!(pa.max_abs_diff(&(lu.l() * lu.u())) < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
///
/// let x = lu.solve(&Matrix::new([[4.0], [11.0]])).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LuDecomposition<T, const R: usize, const C: usize> {
    l: Matrix<T, R, R>,
    u: Matrix<T, R, C>,
    perm: [usize; R],
    even: bool,
    pivot_tol: T,
}

impl<T: FloatScalar, const R: usize, const C: usize> LuDecomposition<T, R, C> {
    /// Decompose with the default [`Tolerances`].
    pub fn new(a: &Matrix<T, R, C>) -> Result<Self, LinalgError> {
        Self::new_with(a, &Tolerances::DEFAULT)
    }

    /// Decompose with an explicit pivot tolerance.
    pub fn new_with(a: &Matrix<T, R, C>, tol: &Tolerances) -> Result<Self, LinalgError> {
        let pivot_tol = tol.pivot_as();
        let mut l = Matrix::zeros();
        let mut u = Matrix::zeros();
        let mut perm = [0usize; R];
        let even = lu_factor(a, &mut l, &mut u, &mut perm, pivot_tol)?;
        Ok(Self { l, u, perm, even, pivot_tol })
    }

    /// Unit lower-triangular factor (R×R).
    pub fn l(&self) -> Matrix<T, R, R> {
        self.l
    }

    /// Upper-triangular factor (R×C).
    pub fn u(&self) -> Matrix<T, R, C> {
        self.u
    }

    /// Row permutation: row `i` of `P·A` is row `permutation()[i]` of `A`.
    pub fn permutation(&self) -> [usize; R] {
        self.perm
    }

    /// The permutation as a matrix, `P(i, perm[i]) = 1`.
    pub fn permutation_matrix(&self) -> Matrix<T, R, R> {
        let mut p = Matrix::zeros();
        for (i, &src) in self.perm.iter().enumerate() {
            p.data[i][src] = T::one();
        }
        p
    }

    /// `true` if `P` is an even permutation.
    pub fn is_even(&self) -> bool {
        self.even
    }
}

impl<T: FloatScalar, const N: usize> LuDecomposition<T, N, N> {
    /// Determinant, `±Π U(i,i)`.
    pub fn det(&self) -> T {
        let mut d = if self.even { T::one() } else { -T::one() };
        for i in 0..N {
            d = d * self.u.data[i][i];
        }
        d
    }

    /// Solve `Ax = b`.
    ///
    /// Fails with [`LinalgError::Singular`] if a diagonal entry of `U` is
    /// below the pivot tolerance the decomposition was built with.
    pub fn solve(&self, b: &ColumnVector<T, N>) -> Result<ColumnVector<T, N>, LinalgError> {
        let mut x = ColumnVector::zeros();

        // Ly = Pb
        for i in 0..N {
            let mut sum = b.data[self.perm[i]][0];
            for j in 0..i {
                sum = sum - self.l.data[i][j] * x.data[j][0];
            }
            x.data[i][0] = sum;
        }

        // Ux = y
        for i in (0..N).rev() {
            let diag = self.u.data[i][i];
            if diag.abs() < self.pivot_tol {
                return Err(LinalgError::Singular);
            }
            let mut sum = x.data[i][0];
            for j in (i + 1)..N {
                sum = sum - self.u.data[i][j] * x.data[j][0];
            }
            x.data[i][0] = sum / diag;
        }

        Ok(x)
    }

    /// Inverse, one column of the identity at a time.
    pub fn inverse(&self) -> Result<Matrix<T, N, N>, LinalgError> {
        let mut inv = Matrix::zeros();
        let mut e = ColumnVector::zeros();
        for col in 0..N {
            if col > 0 {
                e.data[col - 1][0] = T::zero();
            }
            e.data[col][0] = T::one();
            let x = self.solve(&e)?;
            for row in 0..N {
                inv.data[row][col] = x.data[row][0];
            }
        }
        Ok(inv)
    }
}

/// LU convenience methods.
impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// LU decomposition with partial pivoting.
    ///
    /// Pivots come from the input column, not the reduced one, so the
    /// outcome does not always match singularity; see [`lu_factor`].
    pub fn lu(&self) -> Result<LuDecomposition<T, R, C>, LinalgError> {
        LuDecomposition::new(self)
    }

    /// LU decomposition with explicit tolerances.
    pub fn lu_with(&self, tol: &Tolerances) -> Result<LuDecomposition<T, R, C>, LinalgError> {
        LuDecomposition::new_with(self, tol)
    }
}

impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// Determinant via LU, falling back to QR when LU rejects a pivot.
    ///
    /// LU picks pivots from the input column, so a nonsingular matrix whose
    /// `U(i,i)` cancels mid-elimination is rejected; Householder QR has no
    /// such gap. Only a matrix that QR also finds rank deficient gets 0.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let a = Matrix::new([[3.0_f64, 8.0], [4.0, 6.0]]);
    /// assert!((a.det() + 14.0).abs() < 1e-12);
    ///
    /// // U(1,1) cancels to 0, LU fails, det is still -1
    /// let b = Matrix::new([[1.0_f64, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]);
    /// assert!(b.lu().is_err());
    /// assert!((b.det() + 1.0).abs() < 1e-12);
    /// ```
    pub fn det(&self) -> T {
        if let Ok(lu) = self.lu() {
            return lu.det();
        }
        match self.qr() {
            Ok(qr) => qr.det(),
            Err(_) => T::zero(),
        }
    }

    /// Solve `Ax = b` via LU.
    ///
    /// Inherits the pivot rule of [`lu_factor`]: a nonsingular `A` whose
    /// `U(i,i)` cancels to zero mid-elimination is reported as
    /// [`LinalgError::Singular`]. [`Matrix::solve_qr`] solves such systems.
    ///
    /// ```
    /// use fixmat::Matrix;
    /// let a = Matrix::new([
    ///     [2.0_f64, 1.0, -1.0],
    ///     [-3.0, -1.0, 2.0],
    ///     [-2.0, 1.0, 2.0],
    /// ]);
    /// let x = a.solve(&Matrix::new([[8.0], [-11.0], [-3.0]])).unwrap();
    /// assert!((x[(0, 0)] - 2.0).abs() < 1e-12);
    /// assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
    /// assert!((x[(2, 0)] + 1.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &ColumnVector<T, N>) -> Result<ColumnVector<T, N>, LinalgError> {
        self.lu()?.solve(b)
    }
}
