use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by everything that needs `sqrt`, `abs` or a tolerance:
/// norms, the inverse, and the LU / QR / SVD decompositions.
pub trait FloatScalar: Scalar + Float {
    /// Convert an `f64` tolerance into `Self`.
    ///
    /// Tolerances are configured as `f64`. For `f32` they are rounded to
    /// the nearest value, so magnitudes past `f32::MAX` become infinite and
    /// reject every pivot. Epsilon is used only for element types whose
    /// `NumCast` conversion from `f64` can fail.
    #[inline]
    fn from_tolerance(x: f64) -> Self {
        <Self as num_traits::NumCast>::from(x).unwrap_or_else(Self::epsilon)
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Row-major: `row_as_slice(r)` is the contiguous storage of row `r`.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Row `row` as a contiguous slice, starting at column `col_start`.
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, so the elimination and
/// rotation kernels can work in place on any storage.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Row `row` as a contiguous mutable slice, starting at column `col_start`.
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T];
}
