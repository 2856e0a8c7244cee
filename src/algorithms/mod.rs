//! Shared state and parameters for the two-pass Lanczos eigensolver.
//!
//! This module holds the pieces both passes of the algorithm depend on: the
//! configuration surface ([`LanczosConfig`]), the tridiagonal projection of
//! the operator ([`Tridiagonal`]), the bounded FIFO cache of recent Krylov
//! basis vectors ([`VectorCache`]), and the numerical breakdown floor.
//!
//! The main algorithm lives in [`lanczos`]; user-facing entry points are in
//! [`crate::solvers`].

use faer::{
    prelude::*,
    traits::{math_utils, ComplexField, RealField},
};
use std::collections::VecDeque;

use crate::error::{LanczosError, LanczosErrorKind};

pub mod lanczos;

/// Configuration for one solver invocation.
///
/// Resolved once at call entry; there is no ambient or global parameter state.
/// Tolerances are plain `f64` and are converted into the scalar's real type at
/// the point of use, so the same configuration value drives an `f32`, `f64`,
/// or complex solve.
///
/// The iteration stops as soon as the Krylov subspace is exhausted, or once at
/// least `n_min` steps were taken and *either* the Ritz-residual error
/// estimate fell below `p_tol` or the per-step energy improvement fell below
/// `e_tol`; `n_max` is a hard ceiling.
#[derive(Clone, Debug)]
pub struct LanczosConfig {
    /// Minimum number of steps before the convergence criteria apply.
    pub n_min: usize,
    /// Hard ceiling on the number of steps.
    pub n_max: usize,
    /// Stop once the successive lowest-eigenvalue improvement falls below
    /// this.
    pub e_tol: f64,
    /// Stop once the squared relative Ritz-residual estimate,
    /// `(RitzRes / gap)²`, falls below this.
    pub p_tol: f64,
    /// Lower cutoff applied to the estimated spectral gap, preventing the
    /// `p_tol` criterion from dividing by a vanishing gap.
    pub min_gap: f64,
    /// Number of most-recent Krylov basis vectors kept resident. Must be at
    /// least 2; any earlier vector is recomputed by replaying the recurrence
    /// during reconstruction.
    pub n_cache: usize,
}

impl Default for LanczosConfig {
    fn default() -> Self {
        Self {
            n_min: 2,
            n_max: 20,
            e_tol: 5e-15,
            p_tol: 1e-14,
            min_gap: 1e-12,
            n_cache: 6,
        }
    }
}

impl LanczosConfig {
    /// Checks the configuration for values the iteration cannot run with.
    ///
    /// Called before any vector is touched, so a misconfigured solve fails
    /// without a single operator application.
    pub fn validate(&self) -> Result<(), LanczosError> {
        if self.n_cache < 2 {
            return Err(LanczosErrorKind::CacheTooSmall {
                n_cache: self.n_cache,
            }
            .into());
        }
        if self.n_max == 0 {
            return Err(
                LanczosErrorKind::InputError("N_max must be at least 1.".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// The real symmetric tridiagonal projection of the operator onto the Krylov
/// basis, stored as its diagonal (`alphas`) and off-diagonal (`betas`)
/// coefficient sequences.
///
/// The off-diagonal entries are residual norms and therefore non-negative by
/// construction. On Krylov-subspace exhaustion the final off-diagonal entry
/// is never written.
#[derive(Clone, Debug)]
pub struct Tridiagonal<R> {
    alphas: Vec<R>,
    betas: Vec<R>,
}

impl<R: RealField> Tridiagonal<R> {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            alphas: Vec::with_capacity(n),
            betas: Vec::with_capacity(n),
        }
    }

    /// Number of completed Lanczos steps recorded so far.
    pub fn steps(&self) -> usize {
        self.alphas.len()
    }

    /// The k-th diagonal (Rayleigh-quotient) coefficient.
    pub fn alpha(&self, k: usize) -> R {
        R::copy_impl(&self.alphas[k])
    }

    /// The k-th off-diagonal (recurrence) coefficient.
    pub fn beta(&self, k: usize) -> R {
        R::copy_impl(&self.betas[k])
    }

    pub(crate) fn push_alpha(&mut self, alpha: R) {
        self.alphas.push(alpha);
    }

    pub(crate) fn push_beta(&mut self, beta: R) {
        self.betas.push(beta);
    }

    /// Materializes the leading `size`×`size` submatrix as a dense matrix,
    /// ready for the self-adjoint eigensolver.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `size` diagonal or `size - 1` off-diagonal
    /// coefficients have been recorded.
    pub fn leading_dense(&self, size: usize) -> Mat<R> {
        assert!(
            self.alphas.len() >= size && self.betas.len() + 1 >= size,
            "leading submatrix of size {size} requested but only {} diagonal and {} off-diagonal coefficients are recorded",
            self.alphas.len(),
            self.betas.len(),
        );
        let mut t = Mat::<R>::zeros(size, size);
        for (i, alpha) in self.alphas.iter().take(size).enumerate() {
            t[(i, i)] = R::copy_impl(alpha);
        }
        for (i, beta) in self.betas.iter().take(size.saturating_sub(1)).enumerate() {
            t[(i, i + 1)] = R::copy_impl(beta);
            t[(i + 1, i)] = R::copy_impl(beta);
        }
        t
    }
}

/// A bounded first-in-first-out cache of the most recent Krylov basis
/// vectors.
///
/// The three-term recurrence needs the two newest vectors; everything older
/// is kept only opportunistically, up to the configured capacity, to spare
/// the reconstruction pass from replaying the full recurrence. Eviction is
/// silent: an evicted vector exists nowhere else and must be regenerated if
/// it is needed again.
pub struct VectorCache<V> {
    entries: VecDeque<V>,
    capacity: usize,
}

impl<V> VectorCache<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a vector, evicting the oldest entry if the cache is full.
    pub(crate) fn push(&mut self, vector: V) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(vector);
    }

    /// Number of vectors currently resident.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no vector has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k`-th most recent vector; `from_newest(0)` is the newest.
    ///
    /// # Panics
    ///
    /// Panics if `k >= len()`.
    pub fn from_newest(&self, k: usize) -> &V {
        &self.entries[self.entries.len() - 1 - k]
    }

    /// The most recently pushed vector.
    ///
    /// # Panics
    ///
    /// Panics if the cache is empty.
    pub fn newest(&self) -> &V {
        self.from_newest(0)
    }
}

/// Floor below which a residual norm is treated as an exact zero, signalling
/// that the Krylov subspace is exhausted.
///
/// The reachable invariant subspace of a Hermitian operator can be smaller
/// than `n_max` dimensions, in which case the residual norm collapses to
/// rounding noise; a small fixed multiple of the machine epsilon separates
/// that collapse from a legitimately tiny recurrence coefficient.
pub(crate) fn breakdown_tolerance<R: RealField>() -> R {
    math_utils::mul(&math_utils::from_f64::<R>(16.0), &math_utils::eps::<R>())
}

/// Converts a real coefficient into the vector scalar type, negated.
/// The recurrence only ever *subtracts* real multiples of basis vectors,
/// and the vector interface only exposes in-place addition.
#[inline]
pub(crate) fn neg_as_scalar<T: ComplexField>(value: &T::Real) -> T {
    math_utils::neg(&T::from_real_impl(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_table() {
        let config = LanczosConfig::default();
        assert_eq!(config.n_min, 2);
        assert_eq!(config.n_max, 20);
        assert_eq!(config.e_tol, 5e-15);
        assert_eq!(config.p_tol, 1e-14);
        assert_eq!(config.min_gap, 1e-12);
        assert_eq!(config.n_cache, 6);
    }

    #[test]
    fn test_validate_rejects_tiny_cache() {
        for n_cache in [0, 1] {
            let config = LanczosConfig {
                n_cache,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
        assert!(
            LanczosConfig {
                n_cache: 2,
                ..Default::default()
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn test_cache_evicts_oldest_first() {
        let mut cache = VectorCache::new(2);
        cache.push(1);
        cache.push(2);
        cache.push(3);

        assert_eq!(cache.len(), 2);
        assert_eq!(*cache.newest(), 3);
        assert_eq!(*cache.from_newest(1), 2);
    }

    #[test]
    fn test_leading_dense_assembles_symmetric_tridiagonal() {
        let mut t = Tridiagonal::<f64>::with_capacity(3);
        t.push_alpha(1.0);
        t.push_beta(0.5);
        t.push_alpha(2.0);
        t.push_beta(0.25);
        t.push_alpha(3.0);

        let dense = t.leading_dense(3);
        assert_eq!(dense[(0, 0)], 1.0);
        assert_eq!(dense[(1, 1)], 2.0);
        assert_eq!(dense[(2, 2)], 3.0);
        assert_eq!(dense[(0, 1)], 0.5);
        assert_eq!(dense[(1, 0)], 0.5);
        assert_eq!(dense[(1, 2)], 0.25);
        assert_eq!(dense[(2, 1)], 0.25);
        assert_eq!(dense[(0, 2)], 0.0);

        // A smaller leading submatrix leaves later coefficients out.
        let leading = t.leading_dense(2);
        assert_eq!(leading.nrows(), 2);
        assert_eq!(leading[(1, 1)], 2.0);
    }
}
