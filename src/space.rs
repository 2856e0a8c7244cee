//! This module defines the core abstractions for vectors and linear operators.
//!
//! The Lanczos process never inspects the elements of the space it iterates
//! over. Its fundamental operations are the operator-vector product and a
//! handful of elementary vector operations: norm, inner product, in-place
//! scaling, in-place accumulation of a scaled vector, and deep copy. This
//! observation allows for a powerful abstraction: the algorithm can be written
//! once against these traits and used with dense vectors, structured tensors,
//! or any state type a physical simulation produces, without the solver ever
//! knowing the dimension of the space.
//!
//! This "matrix-free" approach offers significant advantages:
//! 1.  **Generality**: the same solver runs on a dense test matrix and on an
//!     operator that exists only as a routine applying it to a state.
//! 2.  **Testability**: the algorithm is validated on small dense matrices
//!     with analytically known spectra, then deployed unchanged on large
//!     implicit operators.
//! 3.  **Encapsulation**: storage layout and the cost model of the product are
//!     hidden behind a minimal interface.
//!
//! The two central pieces are the [`KrylovVector`] and [`LinearOperator`]
//! traits. Reference implementations are provided for [`faer`] dense column
//! vectors and dense matrices.

use faer::{prelude::*, traits::ComplexField};

/// Convenience alias for the scalar type of a vector.
pub type ScalarOf<V> = <V as KrylovVector>::Scalar;

/// Convenience alias for the real type underlying a vector's scalar.
pub type RealOf<V> = <<V as KrylovVector>::Scalar as ComplexField>::Real;

/// An element of an inner-product vector space, as consumed by the solver.
///
/// The solver treats vectors as opaque: it moves them, clones them, and
/// combines them exclusively through the operations below. `Clone` is the
/// deep-copy operation; a cloned vector must be independent of the original.
///
/// # Contract
///
/// * `norm` is the norm induced by `inner`: `norm(v)² == inner(v, v)` up to
///   rounding, and is always non-negative.
/// * `inner` is conjugate-linear in `self` and linear in `rhs`, i.e.
///   `a.inner(b)` conjugates `a`. For real scalars this is the ordinary dot
///   product.
pub trait KrylovVector: Clone {
    /// The scalar field of the space. Real and complex scalars are both
    /// supported; the solver only ever extracts real quantities from it.
    type Scalar: ComplexField;

    /// Returns the norm of `self`. Non-negative by contract.
    fn norm(&self) -> RealOf<Self>;

    /// Returns the inner product `⟨self, rhs⟩`, conjugating `self`.
    fn inner(&self, rhs: &Self) -> Self::Scalar;

    /// Scales `self` in place by `factor`.
    fn scale(&mut self, factor: &Self::Scalar);

    /// Accumulates `coeff * rhs` into `self` in place.
    fn axpy(&mut self, coeff: &Self::Scalar, rhs: &Self);
}

/// Represents a linear operator that can be applied to a vector.
///
/// This is the only capability the eigensolver requires of the operator: a
/// single application routine. The solver additionally assumes the operator
/// is Hermitian with respect to the vector space's inner product; this is a
/// semantic obligation on the implementor that cannot be checked here, and a
/// non-Hermitian operator silently invalidates every convergence estimate.
pub trait LinearOperator<V: KrylovVector> {
    /// Applies the operator to `rhs`, returning an owned result.
    fn apply(&self, rhs: &V) -> V;
}

/// Implementation of [`KrylovVector`] for `faer`'s owned dense matrix,
/// interpreted as an n×1 column vector. This is the primary concrete
/// implementation that the generic algorithm is tested against.
impl<T: ComplexField> KrylovVector for Mat<T> {
    type Scalar = T;

    #[inline]
    fn norm(&self) -> T::Real {
        self.norm_l2()
    }

    #[inline]
    fn inner(&self, rhs: &Self) -> T {
        // `adjoint` conjugates `self`, giving the sesquilinear convention
        // fixed by the trait contract. The product of a 1×n adjoint with an
        // n×1 column is a 1×1 matrix holding the inner product.
        let product = self.adjoint() * rhs;
        T::copy_impl(&product[(0, 0)])
    }

    #[inline]
    fn scale(&mut self, factor: &T) {
        let mut this = self.as_mut();
        this *= Scale(T::copy_impl(factor));
    }

    #[inline]
    fn axpy(&mut self, coeff: &T, rhs: &Self) {
        let scaled = rhs * Scale(T::copy_impl(coeff));
        *self += &scaled;
    }
}

/// Implementation of [`LinearOperator`] for `faer`'s immutable dense matrix
/// view. This is the core dense implementation; the owned and mutable variants
/// delegate to it.
impl<T: ComplexField> LinearOperator<Mat<T>> for MatRef<'_, T> {
    #[inline]
    fn apply(&self, rhs: &Mat<T>) -> Mat<T> {
        // Ensure dimensional compatibility for the matrix product.
        // This check is crucial for correctness in numerical code.
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "Dimension mismatch: operator columns ({}) do not match vector rows ({}).",
            self.ncols(),
            rhs.nrows(),
        );

        // Defer to faer's optimized matrix multiplication routine.
        self * rhs
    }
}

/// Implementation of [`LinearOperator`] for `faer`'s mutable dense matrix
/// view. Delegates to the `MatRef` implementation via a reborrow.
impl<T: ComplexField> LinearOperator<Mat<T>> for MatMut<'_, T> {
    #[inline]
    fn apply(&self, rhs: &Mat<T>) -> Mat<T> {
        self.rb().apply(rhs)
    }
}

/// Implementation of [`LinearOperator`] for `faer`'s owned dense matrix.
/// Delegates to the `MatRef` implementation via a reference.
impl<T: ComplexField> LinearOperator<Mat<T>> for Mat<T> {
    #[inline]
    fn apply(&self, rhs: &Mat<T>) -> Mat<T> {
        self.as_ref().apply(rhs)
    }
}

// Unit tests verifying the dense reference implementations of both traits.
#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn test_linear_operator_for_mat() {
        let matrix: Mat<f64> = mat![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0],];
        let vector: Mat<f64> = mat![[1.0], [2.0], [3.0]];

        let expected_result = &matrix * &vector;

        let operator: &dyn LinearOperator<Mat<f64>> = &matrix;
        let result = operator.apply(&vector);

        assert_eq!(result, expected_result);
    }

    #[test]
    fn test_linear_operator_for_mat_ref_and_mut() {
        let mut matrix: Mat<f64> = mat![[1.0, 2.0], [3.0, 4.0]];
        let vector: Mat<f64> = mat![[1.0], [1.0]];

        let expected = &matrix * &vector;

        let result_ref = matrix.as_ref().apply(&vector);
        assert_eq!(result_ref, expected);

        let result_mut = matrix.as_mut().apply(&vector);
        assert_eq!(result_mut, expected);
    }

    #[test]
    #[should_panic(
        expected = "Dimension mismatch: operator columns (2) do not match vector rows (3)."
    )]
    fn test_dimension_mismatch_panic() {
        let matrix: Mat<f64> = mat![[1.0, 0.0], [0.0, 1.0]];
        let vector: Mat<f64> = mat![[1.0], [2.0], [3.0]]; // Incorrect dimension

        matrix.apply(&vector);
    }

    #[test]
    fn test_vector_ops_norm_inner() {
        let a: Mat<f64> = mat![[3.0], [4.0]];
        let b: Mat<f64> = mat![[1.0], [2.0]];

        assert!((a.norm() - 5.0).abs() < 1e-15);
        assert!((KrylovVector::inner(&a, &b) - 11.0).abs() < 1e-15);
    }

    #[test]
    fn test_vector_ops_scale_axpy() {
        let mut a: Mat<f64> = mat![[1.0], [2.0]];
        let b: Mat<f64> = mat![[10.0], [-10.0]];

        a.scale(&2.0);
        assert_eq!(a, mat![[2.0], [4.0]]);

        a.axpy(&0.5, &b);
        assert_eq!(a, mat![[7.0], [-1.0]]);
    }
}
