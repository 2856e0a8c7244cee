//! This module defines the custom error types for the library.
//!
//! All failure conditions of the eigensolver are centralized into a single
//! public type, [`LanczosError`], wrapping a private kind enum.
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types with
//! minimal boilerplate. Note that [`faer::linalg::evd::EvdError`] does not
//! implement the standard [`std::error::Error`] trait, so we wrap it manually
//! to provide a compatible error type.
//!
//! Every failure mode of this solver is terminal: there is no transient or
//! retryable class. Numerical conditions that look like failures but are not
//! (Krylov-subspace exhaustion, rank-deficient orthogonalization input, an
//! ill-conditioned reconstruction) are handled inside the algorithms and never
//! reach this type.
use thiserror::Error;

/// Represents all possible errors that can occur while solving for the lowest
/// eigenpair.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct LanczosError(#[from] LanczosErrorKind);

/// Private enum containing the distinct kinds of errors.
/// This separation allows for a clean `Display` implementation via
/// [`thiserror`] while handling non-standard error types manually.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum LanczosErrorKind {
    /// The configured vector-cache capacity cannot sustain the three-term
    /// recurrence, which reads the two most recent basis vectors.
    #[error(
        "Vector cache capacity is {n_cache}: need to cache at least two vectors to run the three-term recurrence."
    )]
    CacheTooSmall { n_cache: usize },

    /// Indicates that an invalid input parameter was provided to a function.
    #[error("Invalid input parameter: {0}")]
    InputError(String),

    /// Wraps an error originating from [`faer`]'s eigendecomposition module.
    #[error("A numerical error occurred during the eigendecomposition of the tridiagonal projection: {0:?}")]
    EvdError(faer::linalg::evd::EvdError),
}

// Manually implement PartialEq for the public error type.
// We compare the inner `LanczosErrorKind`.
impl PartialEq for LanczosError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
