//! Error types for parameter generation.
//!
//! This module defines [`PapError`]. Search failures (an infeasible pick, a
//! missing motion plan) are *not* errors: they are outcome values recorded in
//! the attempt log. `PapError` covers contract violations and capability
//! faults only.

/// Errors that can occur while constructing or running a generator.
///
/// # Example
///
/// ```
/// use pap_types::PapError;
///
/// let error = PapError::DimensionMismatch { expected: 9, actual: 4 };
/// assert!(error.to_string().contains("expected 9"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PapError {
    /// An invalid configuration parameter was provided.
    ///
    /// Raised at construction time, before any sampling happens.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A parameter domain has inconsistent bounds.
    #[error("invalid parameter domain: {0}")]
    InvalidDomain(String),

    /// A numeric vector does not have the expected length.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch {
        /// The expected number of values.
        expected: usize,
        /// The number of values provided.
        actual: usize,
    },

    /// An attempt sequence number does not exist in the attempt log.
    #[error("unknown attempt #{0}")]
    UnknownAttempt(usize),

    /// The sampler could not produce a candidate.
    #[error("sampler failure: {0}")]
    Sampler(String),

    /// A trajectory was built from no waypoints.
    #[error("trajectory has no waypoints")]
    EmptyTrajectory,
}

impl PapError {
    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use pap_types::PapError;
    ///
    /// let error = PapError::invalid_config("n_iter_limit must be positive");
    /// assert!(error.to_string().contains("n_iter_limit"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates an invalid domain error with the given message.
    #[must_use]
    pub fn invalid_domain(message: impl Into<String>) -> Self {
        Self::InvalidDomain(message.into())
    }

    /// Creates a sampler failure with the given message.
    #[must_use]
    pub fn sampler(message: impl Into<String>) -> Self {
        Self::Sampler(message.into())
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }

    /// Returns `true` if this error came from a sampler.
    #[must_use]
    pub const fn is_sampler(&self) -> bool {
        matches!(self, Self::Sampler(_))
    }
}

/// Result alias for generation operations.
pub type PapResult<T> = Result<T, PapError>;
