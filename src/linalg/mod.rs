pub(crate) mod inverse;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod svd;

pub use inverse::gauss_jordan_in_place;
pub use lu::{lu_factor, LuDecomposition};
pub use qr::{householder_in_place, QrDecomposition};
pub use svd::{column_dot, rotate_columns, SvdDecomposition};

use crate::traits::FloatScalar;

/// Default absolute pivot threshold for the inverse and LU, also used as the
/// zero-column threshold in QR and the zero-norm guard in SVD.
///
/// Not scaled by the matrix norm: matrices whose entries are all far below
/// 1e-12 are reported singular even when well conditioned.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Default relative orthogonality threshold of the Jacobi SVD: a column pair
/// is left alone when `|γ| ≤ tol·sqrt(α·β)`.
pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-9;

/// Default number of Jacobi sweeps before the SVD gives up.
pub const MAX_SWEEPS: usize = 100;

/// Numerical thresholds used by the decompositions.
///
/// Every decomposition has a plain form using [`Tolerances::DEFAULT`] and a
/// `*_with` form taking an explicit value.
///
/// ```
/// use fixmat::{Matrix, Tolerances};
///
/// let a = Matrix::new([[1e-14_f64, 0.0], [0.0, 1e-14]]);
/// assert!(a.inverse().is_err());
///
/// let loose = Tolerances { pivot: 1e-20, ..Tolerances::DEFAULT };
/// let inv = a.inverse_with(&loose).unwrap();
/// assert!((inv[(0, 0)] - 1e14).abs() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Absolute pivot / column-norm threshold.
    pub pivot: f64,
    /// Relative column-pair orthogonality threshold (SVD).
    pub orthogonality: f64,
    /// Sweep budget (SVD).
    pub max_sweeps: usize,
}

impl Tolerances {
    pub const DEFAULT: Self = Self {
        pivot: PIVOT_TOLERANCE,
        orthogonality: ORTHOGONALITY_TOLERANCE,
        max_sweeps: MAX_SWEEPS,
    };

    #[inline]
    pub(crate) fn pivot_as<T: FloatScalar>(&self) -> T {
        T::from_tolerance(self.pivot)
    }

    #[inline]
    pub(crate) fn orthogonality_as<T: FloatScalar>(&self) -> T {
        T::from_tolerance(self.orthogonality)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors from linear algebra operations.
///
/// Returned by decomposition constructors and convenience methods
/// (`inverse`, `lu`, `qr`, `svd`, `solve`, condition numbers).
/// Inputs are never modified, whatever the outcome.
///
/// ```
/// use fixmat::Matrix;
/// use fixmat::linalg::LinalgError;
///
/// let zero_pivot = Matrix::new([[0.0_f64, 1.0], [1.0, 0.0]]);
/// assert_eq!(zero_pivot.inverse().unwrap_err(), LinalgError::Singular);
///
/// let zero: Matrix<f64, 3, 2> = Matrix::zeros();
/// assert_eq!(zero.qr().unwrap_err(), LinalgError::RankDeficient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// A pivot fell below the pivot tolerance (inverse, LU).
    Singular,
    /// A column to be reflected has (near-)zero norm (QR).
    RankDeficient,
    /// Iterative algorithm did not converge within the sweep budget (SVD).
    ConvergenceFailure,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::RankDeficient => write!(f, "matrix is rank deficient"),
            LinalgError::ConvergenceFailure => write!(f, "iterative algorithm did not converge"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
