//! This directory provides some features for research.
//! Measure the followings of boosting algorithm per iteration
//! - Running time
//! - Score cut
//! - Training metric
//! - Test metric

/// Defines a struct for logging.
pub mod logger;

pub use logger::{CurrentHypothesis, Logger};
