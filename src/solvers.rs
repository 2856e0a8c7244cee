//! This module provides the high-level, user-friendly API for finding the
//! lowest eigenpair of a Hermitian linear operator.

use crate::{
    algorithms::{
        lanczos::{lanczos_pass_one, lanczos_pass_two},
        LanczosConfig,
    },
    error::LanczosError,
    orthogonalize::{gram_schmidt, DEFAULT_RCOND},
    space::{KrylovVector, LinearOperator, RealOf},
};
use faer::traits::math_utils;

/// The result of a [`lowest_eigenpair`] solve.
pub struct LowestEigenpair<V: KrylovVector> {
    /// Estimate of the lowest eigenvalue of the (projected) operator.
    pub eigenvalue: RealOf<V>,
    /// The corresponding normalized eigenvector estimate.
    pub eigenvector: V,
    /// Number of Lanczos steps actually performed.
    pub steps: usize,
    /// The full ascending Ritz spectrum of the final step. The leading entry
    /// equals `eigenvalue`; the rest approximate higher eigenvalues with
    /// rapidly decreasing accuracy and are surfaced for diagnostics.
    pub ritz_values: Vec<RealOf<V>>,
}

/// Computes the lowest eigenvalue and eigenvector of a Hermitian linear
/// operator using the two-pass, bounded-memory Lanczos iteration.
///
/// The caller's `start` vector is never mutated; the iteration works on
/// clones and derived vectors. `orthogonal_to` is consumed: it is
/// orthonormalized once up front (rank-deficient members dropped, see
/// [`gram_schmidt`]), and the iteration then keeps every vector it produces
/// orthogonal to the surviving subspace. This is the standard way to target
/// an excited state once lower eigenvectors are known. An empty subspace
/// means no constraint.
///
/// The number of iterations is decided dynamically: the iteration stops as
/// soon as the Ritz-residual/gap estimate or the per-step eigenvalue
/// improvement falls below its configured tolerance (after at least
/// `config.n_min` steps), when the Krylov subspace is exhausted, or at the
/// `config.n_max` ceiling. See [`LanczosConfig`] for the controls and their
/// defaults.
///
/// If the iteration terminates after a single step there is no Krylov
/// refinement to apply; the returned eigenvector is then an unchanged copy of
/// `start` and `steps` is 1.
///
/// # Errors
/// Returns a [`LanczosError`] if the configured cache capacity is below 2 or
/// `n_max` is 0 (both checked before any operator application), if `start`
/// has zero norm, or if the dense eigensolver fails on the tridiagonal
/// projection.
pub fn lowest_eigenpair<V, O>(
    operator: &O,
    start: &V,
    config: &LanczosConfig,
    orthogonal_to: Vec<V>,
) -> Result<LowestEigenpair<V>, LanczosError>
where
    V: KrylovVector,
    O: LinearOperator<V>,
{
    config.validate()?;

    let (orthogonal_to, _overlaps) = gram_schmidt(
        orthogonal_to,
        math_utils::from_f64::<RealOf<V>>(DEFAULT_RCOND),
    );

    let pass_one = lanczos_pass_one(operator, start, config, &orthogonal_to)?;

    if pass_one.steps == 1 {
        // The operator was applied once and the estimate is already at the
        // bottom of the reachable spectrum; no better vector than the start
        // vector is available.
        return Ok(LowestEigenpair {
            eigenvalue: pass_one.eigenvalue,
            eigenvector: start.clone(),
            steps: 1,
            ritz_values: pass_one.ritz_values,
        });
    }

    let eigenvector = lanczos_pass_two(
        operator,
        &orthogonal_to,
        pass_one.start_normalized,
        &pass_one.tridiagonal,
        pass_one.cache,
        &pass_one.ritz_coefficients,
    );

    if log::log_enabled!(log::Level::Debug) && !orthogonal_to.is_empty() {
        for (i, basis) in orthogonal_to.iter().enumerate() {
            let residual = math_utils::abs(&basis.inner(&eigenvector));
            log::debug!("Lanczos orthogonality against subspace vector {i}: {residual:?}");
        }
    }

    Ok(LowestEigenpair {
        eigenvalue: pass_one.eigenvalue,
        eigenvector,
        steps: pass_one.steps,
        ritz_values: pass_one.ritz_values,
    })
}
