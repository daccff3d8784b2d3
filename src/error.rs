//! Error types shared by every module of this crate.
//!
//! All fallible operations return [`Result<T>`],
//! an alias of `std::result::Result<T, UBoostError>`.

use std::io;
use thiserror::Error;


/// The error type of this crate.
#[derive(Error, Debug)]
pub enum UBoostError {
    /// A parameter is out of its valid range,
    /// or is incompatible with the given sample.
    #[error("Invalid configuration: `{parameter}` {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        parameter: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The weak learner failed to produce a hypothesis.
    #[error("Fit error at round {round}: {reason}")]
    Fit {
        /// Boosting round (1-indexed) that failed.
        /// `0` means the failure happened outside the boosting loop.
        round: usize,
        /// Reason reported by the weak learner.
        reason: String,
    },

    /// The sample passed to a prediction method does not have
    /// the columns the model was trained on.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape or column layout.
        expected: String,
        /// Actual shape or column layout.
        actual: String,
    },

    /// An internal invariant is broken.
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    /// The sample itself is malformed (e.g., non-binary labels).
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// File I/O errors.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Errors while converting a `polars::DataFrame`.
    #[error("DataFrame error: {source}")]
    Polars {
        /// The underlying polars error.
        #[from]
        source: polars::prelude::PolarsError,
    },
}


/// Result type of this crate.
pub type Result<T> = std::result::Result<T, UBoostError>;


impl UBoostError {
    /// Shorthand for [`UBoostError::InvalidConfiguration`].
    pub fn invalid_config<P, R>(parameter: P, reason: R) -> Self
        where P: ToString,
              R: ToString,
    {
        Self::InvalidConfiguration {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }


    /// Shorthand for [`UBoostError::Fit`].
    pub fn fit<R: ToString>(round: usize, reason: R) -> Self {
        Self::Fit { round, reason: reason.to_string() }
    }


    /// Shorthand for [`UBoostError::ShapeMismatch`].
    pub fn shape_mismatch<E, A>(expected: E, actual: A) -> Self
        where E: ToString,
              A: ToString,
    {
        Self::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }


    /// Attach a round index to a [`UBoostError::Fit`] raised
    /// by a weak learner, which does not know the round it runs in.
    /// Other variants are returned unchanged.
    pub(crate) fn at_round(self, round: usize) -> Self {
        match self {
            Self::Fit { reason, .. } => Self::Fit { round, reason },
            other => other,
        }
    }
}
