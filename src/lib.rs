//! # fixmat
//!
//! Fixed-size dense linear algebra, no-std compatible. Every matrix is a
//! stack-allocated `Matrix<T, R, C>` whose shape is part of its type, and no
//! operation allocates.
//!
//! ## Quick start
//!
//! ```
//! use fixmat::Matrix;
//!
//! let a = Matrix::new([[2.0_f64, 1.0], [1.0, 1.0]]);
//!
//! // Gauss-Jordan inverse
//! let a_inv = a.inverse().unwrap();
//! assert!((a * a_inv).max_abs_diff(&Matrix::eye()) < 1e-12);
//!
//! // P·A = L·U
//! let lu = a.lu().unwrap();
//! assert!((lu.permutation_matrix() * a).max_abs_diff(&(lu.l() * lu.u())) < 1e-12);
//!
//! // A = Q·R with a non-negative diagonal on R
//! let qr = a.qr().unwrap();
//! assert!((qr.q() * qr.r()).max_abs_diff(&a) < 1e-12);
//!
//! // A = U·Σ·Vᵗ
//! let svd = a.svd().unwrap();
//! assert!((svd.u() * svd.sigma() * svd.v().transpose()).max_abs_diff(&a) < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T, R, C>` with row-major `[[T; C]; R]` storage:
//!   construction, `(row, col)` indexing, arithmetic, transpose, scans and
//!   norms (Frobenius, one, infinity, entry-wise p, condition numbers).
//!
//! - [`linalg`]: Gauss-Jordan inverse, LU with partial pivoting, Householder
//!   QR and one-sided Jacobi SVD. Wrapper structs hold the factors; the
//!   elimination and rotation kernels are also exposed as free functions
//!   over [`MatrixMut`]. Failures are reported as [`LinalgError`]; the
//!   thresholds behind them live in [`Tolerances`].
//!
//! - [`traits`]: element traits [`Scalar`] and [`FloatScalar`], and the
//!   [`MatrixRef`] / [`MatrixMut`] access traits.
//!
//! ## Shape checks
//!
//! Zero-sized matrices, non-square inverses and QR of wide matrices are
//! rejected when the program is compiled:
//!
//! ```compile_fail
//! use fixmat::Matrix;
//! let wide = Matrix::new([[1.0_f64, 2.0, 3.0]]);
//! let _ = wide.qr();
//! ```
//!
//! ```compile_fail
//! use fixmat::Matrix;
//! let m = Matrix::new([[1.0_f64, 2.0]]);
//! let _ = m.inverse();
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: rejected
//! pivots at `debug`, Jacobi sweeps at `trace`, an exhausted sweep budget at
//! `warn`. Nothing is printed unless the application installs a logger.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm, `std::error::Error` |
//! | `libm`  | no      | Pure-Rust software float fallback for `no_std` |

#![cfg_attr(not(feature = "std"), no_std)]

pub mod linalg;
pub mod matrix;
pub mod traits;

pub use linalg::{LinalgError, LuDecomposition, QrDecomposition, SvdDecomposition, Tolerances};
pub use matrix::{ColumnVector, Matrix, Matrix1, Matrix2, Matrix3, Matrix4, Matrix5, Matrix6};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
