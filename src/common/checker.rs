//! This file defines some functions that checks some pre-conditions
//! E.g., Shape of data

use crate::Sample;
use crate::error::{Result, UBoostError};


/// Check whether the training sample is valid or not.
#[inline(always)]
pub(crate) fn check_sample(sample: &Sample) -> Result<()> {
    let (n_sample, n_feature) = sample.shape();


    // `data` and `target` must have the length greater than `0`.
    if n_sample == 0 {
        return Err(UBoostError::InvalidSample("the sample is empty".into()));
    }


    // `data` must have a feature.
    if n_feature == 0 {
        return Err(UBoostError::InvalidSample("the sample has no feature".into()));
    }

    sample.is_valid_binary_instance()
}


/// Check that `value` lies in the open interval `(0, 1)`.
#[inline(always)]
pub(crate) fn check_open_unit(parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        return Ok(());
    }
    Err(UBoostError::invalid_config(
        parameter, format!("must be in (0, 1), got {value}")
    ))
}


/// Check that `value` is a positive finite number.
#[inline(always)]
pub(crate) fn check_positive(parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        return Ok(());
    }
    Err(UBoostError::invalid_config(
        parameter, format!("must be positive, got {value}")
    ))
}


/// Check that a count is at least `1`.
#[inline(always)]
pub(crate) fn check_count(parameter: &str, value: usize) -> Result<()> {
    if value > 0 {
        return Ok(());
    }
    Err(UBoostError::invalid_config(parameter, "must be at least 1"))
}


/// Check that the weights form a distribution over the sample.
#[inline(always)]
pub(crate) fn check_distribution(dist: &[f64], n_sample: usize) -> Result<()> {
    if dist.len() != n_sample {
        return Err(UBoostError::shape_mismatch(
            format!("{n_sample} weights"),
            format!("{} weights", dist.len()),
        ));
    }
    if dist.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Err(UBoostError::ConsistencyViolation(
            "weights must be finite and non-negative".into()
        ));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_open_unit() {
        assert!(check_open_unit("target_efficiency", 0.5).is_ok());
        assert!(check_open_unit("target_efficiency", 0.0).is_err());
        assert!(check_open_unit("target_efficiency", 1.0).is_err());
        assert!(check_open_unit("target_efficiency", f64::NAN).is_err());
    }

    #[test]
    fn test_check_distribution() {
        assert!(check_distribution(&[0.5, 0.5], 2).is_ok());
        assert!(check_distribution(&[0.5, 0.5], 3).is_err());
        assert!(check_distribution(&[1.5, -0.5], 2).is_err());
    }
}
