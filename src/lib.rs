//! Two-pass Lanczos eigensolver for the lowest eigenpair of a Hermitian
//! linear operator.
//!
//! This crate finds the lowest eigenvalue and eigenvector of a large
//! Hermitian operator given only a routine applying it to a vector
//! (matrix-free). It targets settings where the vector space is extremely
//! high-dimensional and a single vector is expensive to hold, so the solver
//! is built around three ideas:
//!
//! - **Bounded memory**: only the most recent Krylov basis vectors are kept
//!   in a FIFO cache (capacity `n_cache`, default 6, minimum 2, since the
//!   three-term recurrence needs the two newest). Once the iteration count is
//!   known, basis vectors that were evicted are regenerated by *replaying*
//!   the recurrence from the start vector in a second pass, trading at most
//!   one extra operator application per evicted vector for O(`n_cache`)
//!   instead of O(steps) resident vectors.
//! - **Dynamic iteration count**: the leading tridiagonal projection is
//!   diagonalized each step, and the iteration stops as soon as a
//!   Ritz-residual/spectral-gap error estimate or the per-step eigenvalue
//!   improvement falls below its tolerance.
//! - **Subspace projection**: the iteration can be constrained orthogonal to
//!   a caller-supplied subspace (e.g. already-known lower eigenvectors, to
//!   target an excited state). The subspace is orthonormalized once up front
//!   with [`gram_schmidt`], and every operator application is projected on
//!   *both* sides so the effective operator `P·A·P` stays Hermitian.
//!
//! Vectors and operators are abstract: the solver consumes them exclusively
//! through the [`KrylovVector`] and [`LinearOperator`] traits in [`space`],
//! with reference implementations for [`faer`] dense matrices. The small
//! dense eigenproblems on the tridiagonal projection are solved with
//! [`faer`]'s self-adjoint eigendecomposition.
//!
//! # Example
//!
//! ```rust
//! use faer::Mat;
//! use lanczos_ground::{lowest_eigenpair, LanczosConfig};
//!
//! // A dense symmetric operator with a known spectrum.
//! let a = Mat::from_fn(4, 4, |i, j| {
//!     if i == j { 2.0 }
//!     else if (i as isize - j as isize).abs() == 1 { -1.0 }
//!     else { 0.0 }
//! });
//!
//! // Any start vector with a component along the lowest eigenvector works;
//! // the better the guess, the fewer the iterations.
//! let start = Mat::from_fn(4, 1, |i, _| (i + 1) as f64);
//!
//! let result = lowest_eigenpair(&a, &start, &LanczosConfig::default(), Vec::new())?;
//!
//! // The lowest eigenvalue of this operator is 2 - 2cos(pi/5).
//! let expected = 2.0 - 2.0 * (std::f64::consts::PI / 5.0).cos();
//! assert!((result.eigenvalue - expected).abs() < 1e-10);
//! # Ok::<(), lanczos_ground::LanczosError>(())
//! ```
//!
//! # Numerical caveat
//!
//! Like every plain Lanczos process, the iteration does not re-orthogonalize
//! Krylov vectors against each other (only against the supplied subspace), so
//! long runs can lose orthogonality in the basis. The solver detects the
//! symptom (a reconstructed eigenvector whose norm drifts away from one)
//! and reports it through a `log::warn!` while still returning the
//! best-effort normalized result. The dynamic stopping criteria keep
//! iteration counts short in practice, which is the regime where plain
//! Lanczos is reliable.

// Declare the modules that form the crate's API structure.
pub mod algorithms;
pub mod error;
pub mod orthogonalize;
pub mod solvers;
pub mod space;

// Re-export the main API for convenient access.
// These are the primary items that users should use.
pub use algorithms::LanczosConfig;
pub use error::LanczosError;
pub use orthogonalize::{gram_schmidt, DEFAULT_RCOND};
pub use solvers::{lowest_eigenpair, LowestEigenpair};
pub use space::{KrylovVector, LinearOperator, RealOf, ScalarOf};
