//! Calibration of the score cut.
use crate::error::{Result, UBoostError};


/// Returns the cut on `scores` that keeps
/// a fraction `efficiency` of the rows `rows`.
///
/// `sign` is `+1` when rows pass by scoring above the cut (signal)
/// and `-1` when they pass by scoring below it (background).
/// The signed scores `sign * score` are sorted in ascending order
/// and the cut is the element at index `floor((1 - efficiency) * n)`,
/// clamped to `n - 1`, mapped back by `sign`.
///
/// # Example
/// ```
/// use uboost::booster::uboost::cut_for_efficiency;
/// let scores = vec![0.1, 0.4, 0.2, 0.9, 0.3];
/// let rows = vec![0, 1, 2, 3, 4];
/// let cut = cut_for_efficiency(&scores, &rows, 1.0, 0.4).unwrap();
/// assert_eq!(cut, 0.4);
/// ```
pub fn cut_for_efficiency(
    scores: &[f64],
    rows: &[usize],
    sign: f64,
    efficiency: f64,
) -> Result<f64>
{
    if rows.is_empty() {
        return Err(UBoostError::invalid_config(
            "uniform_label", "no row of the uniform class"
        ));
    }
    if !(0.0..=1.0).contains(&efficiency) {
        return Err(UBoostError::invalid_config(
            "target_efficiency",
            format!("must be in [0, 1], got {efficiency}"),
        ));
    }

    let mut signed = rows.iter()
        .map(|&i| sign * scores[i])
        .collect::<Vec<_>>();
    signed.sort_by(|a, b| a.total_cmp(b));

    let n = signed.len();
    let index = (((1.0 - efficiency) * n as f64).floor() as usize)
        .min(n - 1);
    Ok(sign * signed[index])
}
