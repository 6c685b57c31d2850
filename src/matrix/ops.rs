use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;
use crate::Matrix;

// ── Element-wise addition / subtraction ─────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> AddAssign for Matrix<T, R, C> {
    fn add_assign(&mut self, rhs: Self) {
        for (x, &y) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
            *x = *x + y;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign for Matrix<T, R, C> {
    fn sub_assign(&mut self, rhs: Self) {
        for (x, &y) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
            *x = *x - y;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Add for Matrix<T, R, C> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> Sub for Matrix<T, R, C> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> AddAssign<&Matrix<T, R, C>> for Matrix<T, R, C> {
    fn add_assign(&mut self, rhs: &Matrix<T, R, C>) {
        self.add_assign(*rhs);
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign<&Matrix<T, R, C>> for Matrix<T, R, C> {
    fn sub_assign(&mut self, rhs: &Matrix<T, R, C>) {
        self.sub_assign(*rhs);
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Neg for Matrix<T, R, C> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for x in self.as_mut_slice() {
            *x = T::zero() - *x;
        }
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for &Matrix<T, R, C> {
    type Output = Matrix<T, R, C>;

    fn neg(self) -> Matrix<T, R, C> {
        (*self).neg()
    }
}

// ── Matrix multiplication: (R×K) * (K×C) → (R×C) ───────────────────
//
// Accumulates in `T`; integer products overflow exactly as `T` does.

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<Matrix<T, K, C>>
    for Matrix<T, R, K>
{
    type Output = Matrix<T, R, C>;

    fn mul(self, rhs: Matrix<T, K, C>) -> Matrix<T, R, C> {
        let mut out = Matrix::<T, R, C>::zeros();
        for i in 0..R {
            for j in 0..C {
                let mut sum = T::zero();
                for k in 0..K {
                    sum = sum + self.data[i][k] * rhs.data[k][j];
                }
                out.data[i][j] = sum;
            }
        }
        out
    }
}

// ── Scalar multiplication: matrix * scalar ──────────────────────────

impl<T: Scalar, const R: usize, const C: usize> MulAssign<T> for Matrix<T, R, C> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.as_mut_slice() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Mul<T> for Matrix<T, R, C> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

// ── Reference variants ──────────────────────────────────────────────
// Matrix is Copy, so &Matrix ops just deref and delegate.

macro_rules! forward_ref_binop {
    ($Op:ident, $method:ident) => {
        impl<T: Scalar, const R: usize, const C: usize> $Op<Matrix<T, R, C>>
            for &Matrix<T, R, C>
        {
            type Output = Matrix<T, R, C>;
            fn $method(self, rhs: Matrix<T, R, C>) -> Matrix<T, R, C> {
                (*self).$method(rhs)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $Op<&Matrix<T, R, C>>
            for Matrix<T, R, C>
        {
            type Output = Matrix<T, R, C>;
            fn $method(self, rhs: &Matrix<T, R, C>) -> Matrix<T, R, C> {
                self.$method(*rhs)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $Op<&Matrix<T, R, C>>
            for &Matrix<T, R, C>
        {
            type Output = Matrix<T, R, C>;
            fn $method(self, rhs: &Matrix<T, R, C>) -> Matrix<T, R, C> {
                (*self).$method(*rhs)
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<Matrix<T, K, C>>
    for &Matrix<T, R, K>
{
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: Matrix<T, K, C>) -> Matrix<T, R, C> {
        (*self).mul(rhs)
    }
}

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<&Matrix<T, K, C>>
    for Matrix<T, R, K>
{
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: &Matrix<T, K, C>) -> Matrix<T, R, C> {
        self.mul(*rhs)
    }
}

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<&Matrix<T, K, C>>
    for &Matrix<T, R, K>
{
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: &Matrix<T, K, C>) -> Matrix<T, R, C> {
        (*self).mul(*rhs)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Mul<T> for &Matrix<T, R, C> {
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: T) -> Matrix<T, R, C> {
        (*self).mul(rhs)
    }
}

// ── scalar * matrix (concrete impls to avoid orphan rules) ──────────

macro_rules! impl_scalar_mul {
    ($($t:ty),*) => {
        $(
            impl<const R: usize, const C: usize> Mul<Matrix<$t, R, C>> for $t {
                type Output = Matrix<$t, R, C>;

                fn mul(self, rhs: Matrix<$t, R, C>) -> Matrix<$t, R, C> {
                    rhs * self
                }
            }

            impl<const R: usize, const C: usize> Mul<&Matrix<$t, R, C>> for $t {
                type Output = Matrix<$t, R, C>;

                fn mul(self, rhs: &Matrix<$t, R, C>) -> Matrix<$t, R, C> {
                    *rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul!(f32, f64, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);
        assert_eq!(a + b, Matrix::new([[6.0, 8.0], [10.0, 12.0]]));
        assert_eq!(b - a, Matrix::new([[4.0, 4.0], [4.0, 4.0]]));
        assert_eq!(&a + &b, a + b);
        assert_eq!(&b - a, b - a);
    }

    #[test]
    fn compound_assign() {
        let mut a = Matrix::new([[1, 2], [3, 4]]);
        a += Matrix::new([[1, 1], [1, 1]]);
        assert_eq!(a, Matrix::new([[2, 3], [4, 5]]));
        a -= &Matrix::new([[2, 3], [4, 5]]);
        assert_eq!(a, Matrix::zeros());
        let mut b = Matrix::new([[1.0, -2.0]]);
        b *= 3.0;
        assert_eq!(b, Matrix::new([[3.0, -6.0]]));
    }

    #[test]
    fn neg() {
        let a = Matrix::new([[1.0, -2.0], [0.0, 4.0]]);
        assert_eq!(-a, Matrix::new([[-1.0, 2.0], [0.0, -4.0]]));
        assert_eq!(-&a, -a);
    }

    #[test]
    fn matmul_square() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);
        assert_eq!(a * b, Matrix::new([[19.0, 22.0], [43.0, 50.0]]));
    }

    #[test]
    fn matmul_rectangular() {
        // (2×3) * (3×2) → 2×2
        let a = Matrix::new([[1, 2, 3], [4, 5, 6]]);
        let b = Matrix::new([[7, 8], [9, 10], [11, 12]]);
        let c: Matrix<i32, 2, 2> = a * b;
        assert_eq!(c, Matrix::new([[58, 64], [139, 154]]));

        // (3×2) * (2×3) → 3×3 through references
        let d: Matrix<i32, 3, 3> = &b * &a;
        assert_eq!(d[(0, 0)], 7 + 32);
        assert_eq!(d[(2, 2)], 33 + 72);
    }

    #[test]
    fn matmul_identity() {
        let a = Matrix::new([[2.0, -1.0, 0.5], [0.0, 3.0, 1.0]]);
        let id3: Matrix<f64, 3, 3> = Matrix::eye();
        let id2: Matrix<f64, 2, 2> = Matrix::eye();
        assert_eq!(a * id3, a);
        assert_eq!(id2 * a, a);
    }

    #[test]
    fn scalar_mul_both_sides() {
        let a = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(&a * 2.0, 2.0 * &a);
        assert_eq!((2_i32 * Matrix::new([[1_i32, 2]]))[(0, 1)], 4);
    }
}
