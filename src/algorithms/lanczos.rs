//! The two passes of the bounded-memory Lanczos iteration.
//!
//! **NOTE**: We recommend using the high-level method
//! [`crate::solvers::lowest_eigenpair`] instead. This module is intended for
//! use cases where fine-grained control over the Lanczos process is required.
//!
//! [`lanczos_pass_one`] drives the three-term recurrence: it tridiagonalizes
//! the (projected) operator over the Krylov subspace of the start vector,
//! keeping only the most recent basis vectors in a bounded FIFO cache, and
//! stops as soon as the Ritz-residual and energy-improvement estimators
//! certify convergence of the lowest eigenvalue.
//!
//! [`lanczos_pass_two`] assembles the eigenvector from the lowest Ritz
//! eigenvector's coefficients: cached basis vectors are combined directly,
//! and evicted ones are regenerated by replaying the recurrence from the
//! start vector with the coefficients already recorded in the tridiagonal
//! projection. The replay costs at most one extra operator application per
//! evicted vector, which is the price paid for O(cache) instead of O(steps)
//! resident vectors.

use super::{breakdown_tolerance, neg_as_scalar, LanczosConfig, Tridiagonal, VectorCache};
use crate::error::{LanczosError, LanczosErrorKind};
use crate::space::{KrylovVector, LinearOperator, RealOf, ScalarOf};
use faer::{traits::math_utils, Side};

/// Warn when the reconstructed eigenvector's norm strays this far from one
/// before the final normalization.
const RECONSTRUCTION_NORM_TOL: f64 = 1e-3;

/// Everything the forward pass learned about the operator.
///
/// The reconstruction pass consumes the cache and the normalized start
/// vector; the spectral fields are terminal results surfaced to the caller.
pub struct PassOneOutput<V: KrylovVector> {
    /// Number of completed Lanczos steps, `1..=n_max`.
    pub steps: usize,
    /// The tridiagonal projection of the (subspace-projected) operator.
    pub tridiagonal: Tridiagonal<RealOf<V>>,
    /// The surviving tail of the Krylov basis, newest last.
    pub cache: VectorCache<V>,
    /// The normalized start vector, i.e. the zeroth Krylov basis vector. Kept
    /// outside the cache because the replay in the reconstruction pass must
    /// restart from it even after the cache has evicted it.
    pub start_normalized: V,
    /// The lowest Ritz value of the final step.
    pub eigenvalue: RealOf<V>,
    /// The full ascending Ritz spectrum of the final step.
    pub ritz_values: Vec<RealOf<V>>,
    /// Coefficients of the lowest Ritz eigenvector in the Krylov basis;
    /// `[1.0]` in the degenerate single-step case.
    pub ritz_coefficients: Vec<RealOf<V>>,
}

/// Subtracts from `w` its component along the (unit-norm) `basis` vector.
fn project_out<V: KrylovVector>(w: &mut V, basis: &V) {
    let overlap = basis.inner(w);
    w.axpy(&math_utils::neg(&overlap), basis);
}

/// Performs the forward (tridiagonalization) pass.
///
/// At each step the current basis vector is pushed into the bounded cache,
/// the operator is applied under two-sided projection against
/// `orthogonal_to`, and the three-term recurrence coefficients are appended
/// to the tridiagonal projection. The leading submatrix is diagonalized every
/// step to drive the convergence test.
///
/// Iteration stops on Krylov-subspace exhaustion (residual norm below the
/// breakdown floor: successful early convergence, not an error), once both
/// `config.n_min` steps were taken and either error estimator is below its
/// tolerance, or at the `config.n_max` ceiling.
///
/// # Arguments
/// * `operator`: the Hermitian linear operator.
/// * `start`: the starting vector; never mutated, the iteration works on a
///   clone. Should be the best guess available for the lowest eigenvector.
/// * `config`: iteration controls; see [`LanczosConfig`].
/// * `orthogonal_to`: an *orthonormal* sequence (see
///   [`crate::orthogonalize::gram_schmidt`]) the iteration stays orthogonal
///   to.
///
/// # Errors
/// * [`LanczosError`] for a cache capacity below 2 or `n_max == 0` (both
///   rejected before any operator application), a zero-norm start vector, or
///   a failure inside the dense eigensolver.
pub fn lanczos_pass_one<V, O>(
    operator: &O,
    start: &V,
    config: &LanczosConfig,
    orthogonal_to: &[V],
) -> Result<PassOneOutput<V>, LanczosError>
where
    V: KrylovVector,
    O: LinearOperator<V>,
{
    config.validate()?;

    let floor = breakdown_tolerance::<RealOf<V>>();
    let mut cache = VectorCache::new(config.n_cache);
    let mut tridiagonal = Tridiagonal::with_capacity(config.n_max);

    let e_tol = math_utils::from_f64::<RealOf<V>>(config.e_tol);
    let p_tol = math_utils::from_f64::<RealOf<V>>(config.p_tol);
    let min_gap = math_utils::from_f64::<RealOf<V>>(config.min_gap);

    let mut w = start.clone();
    let mut beta = w.norm();
    if beta <= floor {
        return Err(LanczosErrorKind::InputError(
            "The starting vector must not have zero norm.".to_string(),
        )
        .into());
    }

    let mut start_normalized: Option<V> = None;
    let mut exhausted = false;
    let mut steps = 0usize;
    let mut eigenvalue = math_utils::zero::<RealOf<V>>();
    let mut ritz_values: Vec<RealOf<V>> = Vec::new();
    let mut ritz_coefficients: Vec<RealOf<V>> = vec![math_utils::one::<RealOf<V>>()];

    // The estimators start out larger than any meaningful tolerance, so no
    // convergence exit can trigger before the first diagonalization.
    let mut p_err = math_utils::from_f64::<RealOf<V>>(2.0);
    let mut delta_e = math_utils::from_f64::<RealOf<V>>(2.0);
    let mut gap = math_utils::copy(&min_gap);

    for k in 0..config.n_max {
        // Normalize the previous step's residual into the k-th basis vector
        // and retire it to the cache (evicting the oldest entry when full).
        w.scale(&math_utils::from_real::<ScalarOf<V>>(&math_utils::recip(
            &beta,
        )));
        cache.push(w);
        if k == 0 {
            start_normalized = Some(cache.newest().clone());
        }

        // Apply the effective operator P·A·P, with P the projector onto the
        // complement of `orthogonal_to`. The second projection iterates in
        // reverse order; projecting on both sides keeps the effective
        // operator numerically Hermitian, which the recurrence relies on.
        let mut applied = cache.newest().clone();
        for basis in orthogonal_to {
            project_out(&mut applied, basis);
        }
        let mut applied = operator.apply(&applied);
        for basis in orthogonal_to.iter().rev() {
            project_out(&mut applied, basis);
        }
        w = applied;

        // Rayleigh-quotient coefficient. The imaginary part is rounding noise
        // for a Hermitian operator, so only the real part is kept.
        let alpha = math_utils::real(&w.inner(cache.newest()));
        tridiagonal.push_alpha(math_utils::copy(&alpha));

        // Three-term recurrence: remove the components along the two most
        // recent basis vectors. Everything older is orthogonal in exact
        // arithmetic.
        if k > 0 {
            w.axpy(&neg_as_scalar::<ScalarOf<V>>(&beta), cache.from_newest(1));
        }
        w.axpy(&neg_as_scalar::<ScalarOf<V>>(&alpha), cache.newest());

        beta = w.norm();
        let above_floor = beta > floor;
        if above_floor {
            // The off-diagonal entry is skipped on exhaustion: the Krylov
            // subspace is complete and the recurrence has nowhere to go.
            tridiagonal.push_beta(math_utils::copy(&beta));
        }

        steps = k + 1;

        if k == 0 {
            // A 1×1 projection needs no eigensolver.
            eigenvalue = math_utils::copy(&alpha);
            ritz_values = vec![math_utils::copy(&alpha)];
        } else {
            // Diagonalize the leading (k+1)×(k+1) submatrix of T from
            // scratch; it is small (bounded by n_max), so this is cheap
            // relative to one operator application. Eigenvalues come back in
            // ascending order.
            let t_k = tridiagonal.leading_dense(k + 1);
            let evd = t_k
                .as_ref()
                .self_adjoint_eigen(Side::Upper)
                .map_err(LanczosErrorKind::EvdError)?;
            let lowest = math_utils::copy(&evd.S()[0]);

            // Ritz residual bound on the lowest pair: |bottom component of
            // the lowest eigenvector| × β. Together with the spectral gap it
            // bounds the eigenvector error by (RitzRes / gap)².
            let ritz_res = math_utils::abs(&math_utils::mul(&evd.U()[(k, 0)], &beta));
            gap = math_utils::max(&math_utils::sub(&evd.S()[1], &evd.S()[0]), &min_gap);
            let ratio = math_utils::div(&ritz_res, &gap);
            p_err = math_utils::mul(&ratio, &ratio);
            delta_e = math_utils::sub(&eigenvalue, &lowest);

            eigenvalue = lowest;
            ritz_values = (0..=k).map(|i| math_utils::copy(&evd.S()[i])).collect();
            ritz_coefficients = (0..=k)
                .map(|i| math_utils::copy(&evd.U()[(i, 0)]))
                .collect();
        }

        if !above_floor {
            exhausted = true;
            break;
        }
        if k + 1 >= config.n_min && (p_err < p_tol || delta_e < e_tol) {
            break;
        }
    }

    if exhausted {
        log::debug!("Lanczos: Krylov subspace exhausted after {steps} steps");
    }
    if steps > 1 {
        log::debug!(
            "Lanczos N={steps}, gap={gap:?} | DeltaE0={delta_e:?} E_tol={:e} | P_err={p_err:?} P_tol={:e}",
            config.e_tol,
            config.p_tol,
        );
    } else {
        log::debug!("Lanczos N=1, alpha={eigenvalue:?}, beta={beta:?}");
    }

    let Some(start_normalized) = start_normalized else {
        // Unreachable: the loop body runs at least once since n_max >= 1 is
        // validated above, and the first iteration always sets the vector.
        return Err(LanczosErrorKind::InputError(
            "no Lanczos steps were taken".to_string(),
        )
        .into());
    };

    Ok(PassOneOutput {
        steps,
        tridiagonal,
        cache,
        start_normalized,
        eigenvalue,
        ritz_values,
        ritz_coefficients,
    })
}

/// Performs the reconstruction (replay) pass.
///
/// The approximate eigenvector is `Σ_k coefficients[k] · v_k` over all
/// `coefficients.len()` Krylov basis vectors. The cached tail contributes
/// directly; the cache is then dropped to free memory, and every evicted
/// basis vector is regenerated in order by replaying the recurrence from the
/// normalized start vector, reading α and β back out of `tridiagonal` instead
/// of recomputing them. Each regenerated vector's contribution is accumulated
/// as soon as it is produced, so the replay keeps only a constant number of
/// vectors resident regardless of the step count.
///
/// The result is normalized before it is returned. A pre-normalization norm
/// far from one means the Krylov basis lost orthogonality along the way
/// (plain Lanczos does not re-orthogonalize); this surfaces as a `log::warn`
/// and the normalized best-effort vector is still returned.
pub fn lanczos_pass_two<V, O>(
    operator: &O,
    orthogonal_to: &[V],
    start_normalized: V,
    tridiagonal: &Tridiagonal<RealOf<V>>,
    cache: VectorCache<V>,
    coefficients: &[RealOf<V>],
) -> V
where
    V: KrylovVector,
    O: LinearOperator<V>,
{
    let steps = coefficients.len();
    debug_assert!(tridiagonal.steps() >= steps);

    // The start vector is still known; seed the combination with it, then
    // fold in the cached tail. The k-th newest cache entry is the
    // (steps - k)-th basis vector, pairing with that coefficient.
    let mut result = start_normalized.clone();
    result.scale(&math_utils::from_real::<ScalarOf<V>>(&coefficients[0]));

    let cached = cache.len();
    for k in 1..(cached + 1).min(steps) {
        result.axpy(
            &math_utils::from_real::<ScalarOf<V>>(&coefficients[steps - k]),
            cache.from_newest(k - 1),
        );
    }
    // The cached vectors have served their purpose; release them before the
    // replay starts allocating fresh ones.
    drop(cache);

    // Regenerate the evicted prefix of the basis, repeating the projection
    // and application steps of the forward pass but normalizing with the β
    // already recorded in the tridiagonal projection.
    let replay_steps = steps.saturating_sub(cached + 1);
    let mut previous: Option<V> = None;
    let mut current = start_normalized;
    for k in 0..replay_steps {
        let mut applied = current.clone();
        for basis in orthogonal_to {
            project_out(&mut applied, basis);
        }
        let mut applied = operator.apply(&applied);
        for basis in orthogonal_to.iter().rev() {
            project_out(&mut applied, basis);
        }
        if let Some(ref prev) = previous {
            // `previous` is populated exactly when k > 0.
            applied.axpy(
                &neg_as_scalar::<ScalarOf<V>>(&tridiagonal.beta(k - 1)),
                prev,
            );
        }
        applied.axpy(
            &neg_as_scalar::<ScalarOf<V>>(&tridiagonal.alpha(k)),
            &current,
        );
        applied.scale(&math_utils::from_real::<ScalarOf<V>>(&math_utils::recip(
            &tridiagonal.beta(k),
        )));

        previous = Some(current);
        current = applied;
        result.axpy(
            &math_utils::from_real::<ScalarOf<V>>(&coefficients[k + 1]),
            &current,
        );
    }

    let norm = result.norm();
    let deviation = math_utils::abs(&math_utils::sub(
        &math_utils::one::<RealOf<V>>(),
        &norm,
    ));
    if deviation > math_utils::from_f64::<RealOf<V>>(RECONSTRUCTION_NORM_TOL) {
        log::warn!("poorly conditioned Lanczos iteration: |psi0| = {norm:?}");
    }
    result.scale(&math_utils::from_real::<ScalarOf<V>>(&math_utils::recip(
        &norm,
    )));
    result
}
