//! This file provides some numerical helpers
//! shared by the boosting algorithms.
use rayon::prelude::*;

use crate::error::{Result, UBoostError};


/// Normalize `items` so that `\| items \|_1 = 1`.
#[inline(always)]
pub(crate) fn normalize(items: &mut [f64]) -> Result<()> {
    let z = items.iter()
        .map(|it| it.abs())
        .sum::<f64>();

    if z == 0.0 || !z.is_finite() {
        return Err(UBoostError::ConsistencyViolation(
            format!("cannot normalize weights whose total mass is {z}")
        ));
    }

    items.par_iter_mut()
        .for_each(|item| { *item /= z; });
    Ok(())
}


/// The logistic function.
#[inline(always)]
pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}


/// `n` evenly spaced values over `[start, end]`.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::with_capacity(0),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64)
                .collect()
        },
    }
}


/// Weighted sum of `values` over the rows `rows`.
#[inline(always)]
pub(crate) fn weighted_sum(weights: &[f64], values: &[f64], rows: &[usize]) -> f64 {
    rows.iter()
        .map(|&i| weights[i] * values[i])
        .sum::<f64>()
}
