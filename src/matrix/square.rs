use crate::matrix::ColumnVector;
use crate::traits::Scalar;
use crate::Matrix;

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Sum of diagonal elements.
    pub fn trace(&self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self.data[i][i];
        }
        sum
    }

    /// Extract the diagonal as a column vector.
    pub fn diag(&self) -> ColumnVector<T, N> {
        let mut v = ColumnVector::zeros();
        for i in 0..N {
            v.data[i][0] = self.data[i][i];
        }
        v
    }

    /// Create a diagonal matrix from a column vector.
    pub fn from_diag(v: &ColumnVector<T, N>) -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = v.data[i][0];
        }
        m
    }

    /// Check if the matrix is symmetric (A == A^T).
    pub fn is_symmetric(&self) -> bool {
        for i in 0..N {
            for j in (i + 1)..N {
                if self.data[i][j] != self.data[j][i] {
                    return false;
                }
            }
        }
        true
    }
}
