//! Sequential Gram-Schmidt orthonormalization.
//!
//! This is the leaf component the eigensolver uses to prepare a
//! caller-supplied orthogonal subspace, and it is useful on its own whenever
//! an arbitrary set of vectors must be turned into an orthonormal one.
//!
//! The procedure is the *modified* (sequential) variant: each vector is
//! normalized once and immediately projected out of every later vector, so a
//! vector is never touched again after its turn. This one-pass ordering is
//! what guarantees the survivors are mutually orthogonal to working precision
//! even though later vectors are processed against an evolving partial list.

use crate::space::{KrylovVector, RealOf, ScalarOf};
use faer::{prelude::*, traits::math_utils};

/// Default relative-norm cutoff below which a vector is considered linearly
/// dependent on its predecessors and dropped.
pub const DEFAULT_RCOND: f64 = 1e-14;

/// Orthonormalizes `vectors` in order, dropping near-linearly-dependent ones.
///
/// The operation consumes the vectors, mutates them in place
/// (normalization and projection), and returns the surviving subset in the
/// original relative order, each of exactly unit norm and mutually orthogonal
/// to working precision.
///
/// The second return value is the overlap record: a square matrix of the
/// *input* size (not the survivor count) where entry `(j, j)` holds vector
/// j's norm before normalization, and entry `(j, i)` for `i > j` holds the
/// projection coefficient `⟨v_j, v_i⟩` recorded immediately before that
/// component was subtracted from vector i. It is an audit artifact; nothing
/// in this crate consumes it.
///
/// # Edge cases
///
/// * An empty input returns an empty list and a 0×0 record.
/// * A vector whose norm (after the preceding projections) is `<= rcond` is
///   dropped silently: it is neither normalized nor projected out of later
///   vectors. All vectors being dropped is not an error; callers treat an
///   empty result as "no constraint".
pub fn gram_schmidt<V: KrylovVector>(
    vectors: Vec<V>,
    rcond: RealOf<V>,
) -> (Vec<V>, Mat<ScalarOf<V>>) {
    let k = vectors.len();
    let mut overlaps = Mat::<ScalarOf<V>>::zeros(k, k);

    // Slots keep the original indexing alive while dropped vectors vanish;
    // survivors are compacted at the end, preserving relative order.
    let mut slots: Vec<Option<V>> = vectors.into_iter().map(Some).collect();

    for j in 0..k {
        let Some(mut current) = slots[j].take() else {
            continue;
        };
        let norm = current.norm();
        overlaps[(j, j)] = math_utils::from_real::<ScalarOf<V>>(&norm);
        if norm > rcond {
            current.scale(&math_utils::from_real::<ScalarOf<V>>(
                &math_utils::recip(&norm),
            ));
            for i in (j + 1)..k {
                if let Some(later) = slots[i].as_mut() {
                    let coefficient = current.inner(later);
                    later.axpy(&math_utils::neg(&coefficient), &current);
                    overlaps[(j, i)] = coefficient;
                }
            }
            slots[j] = Some(current);
        } else {
            log::debug!("gram_schmidt: dropping rank-deficient vector {j} (norm {norm:?})");
        }
    }

    (slots.into_iter().flatten().collect(), overlaps)
}
