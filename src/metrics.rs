//! Evaluation metrics for binary classifiers.
use crate::{
    Sample,
    booster::uboost::cut_for_efficiency,
    common::checker,
    sample::SIGNAL,
};
use crate::error::{Result, UBoostError};


fn check_lengths(labels: usize, values: usize) -> Result<()> {
    if labels == values {
        return Ok(());
    }
    Err(UBoostError::shape_mismatch(
        format!("{labels} predictions"),
        format!("{values} predictions"),
    ))
}


/// Area under the ROC curve of `scores` against `labels`.
///
/// Computed from the ranks of the scores;
/// tied scores get the average of their ranks.
/// Returns an error unless both labels `0` and `1` appear.
///
/// ```
/// use uboost::metrics::roc_auc_score;
/// let labels = vec![0.0, 0.0, 1.0, 1.0];
/// let scores = vec![0.1, 0.4, 0.35, 0.8];
/// let auc = roc_auc_score(&labels, &scores).unwrap();
/// assert!((auc - 0.75).abs() < 1e-12);
/// ```
pub fn roc_auc_score(labels: &[f64], scores: &[f64]) -> Result<f64> {
    check_lengths(labels.len(), scores.len())?;

    let n_pos = labels.iter().filter(|&&y| y == SIGNAL).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(UBoostError::InvalidSample(
            "ROC AUC needs examples of both classes".into()
        ));
    }

    let mut order = (0..scores.len()).collect::<Vec<_>>();
    order.sort_by(|&i, &j| scores[i].total_cmp(&scores[j]));

    // Sum of the (1-based, tie-averaged) ranks of the positives.
    let mut rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let rank = (start + end + 1) as f64 / 2.0;
        let n_pos_tied = order[start..end].iter()
            .filter(|&&i| labels[i] == SIGNAL)
            .count();
        rank_sum += rank * n_pos_tied as f64;
        start = end;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}


/// Fraction of `predictions` equal to `labels`.
pub fn accuracy_score(labels: &[f64], predictions: &[i64]) -> Result<f64> {
    check_lengths(labels.len(), predictions.len())?;
    if labels.is_empty() {
        return Err(UBoostError::InvalidSample("no prediction".into()));
    }

    let n_correct = labels.iter()
        .zip(predictions)
        .filter(|&(&y, &p)| y == p as f64)
        .count();
    Ok(n_correct as f64 / labels.len() as f64)
}


/// Non-uniformity of the signal efficiency along `uniform_variable`.
///
/// For each global efficiency in `efficiencies`,
/// the signal examples are split into `n_bins` bins
/// of (nearly) equal size along `uniform_variable`,
/// the cut on the signal probability that keeps that efficiency
/// is calibrated, and the mean squared deviation of the bin efficiencies
/// from the global one is computed.
/// The result is the average over `efficiencies`.
/// A perfectly uniform classifier scores `0`.
pub fn uniformity_mse(
    sample: &Sample,
    uniform_variable: &str,
    proba: &[[f64; 2]],
    n_bins: usize,
    efficiencies: &[f64],
) -> Result<f64>
{
    let n_sample = sample.shape().0;
    check_lengths(n_sample, proba.len())?;

    let column = sample.column_index(uniform_variable)
        .ok_or_else(|| {
            UBoostError::invalid_config(
                "uniform_variable",
                format!("column `{uniform_variable}` does not exist"),
            )
        })?;
    let values = sample.features()[column].values();

    let mut signal = sample.indices_of(SIGNAL);
    if signal.is_empty() {
        return Err(UBoostError::InvalidSample("no signal example".into()));
    }
    if n_bins == 0 || n_bins > signal.len() {
        return Err(UBoostError::invalid_config(
            "n_bins",
            format!("must be in [1, {}], got {n_bins}", signal.len()),
        ));
    }
    if efficiencies.is_empty() {
        return Err(UBoostError::invalid_config(
            "efficiencies", "must not be empty"
        ));
    }
    for &eff in efficiencies {
        checker::check_open_unit("efficiencies", eff)?;
    }

    signal.sort_by(|&i, &j| values[i].total_cmp(&values[j]).then(i.cmp(&j)));
    let n_signal = signal.len();
    let bins = (0..n_bins).map(|b| {
            let start = b * n_signal / n_bins;
            let end = (b + 1) * n_signal / n_bins;
            &signal[start..end]
        })
        .collect::<Vec<_>>();

    let p1 = proba.iter().map(|[_, p]| *p).collect::<Vec<_>>();

    let mut total = 0.0;
    for &eff in efficiencies {
        let cut = cut_for_efficiency(&p1, &signal, 1.0, eff)?;
        let passed = |rows: &[usize]| {
            rows.iter().filter(|&&i| p1[i] > cut).count() as f64
                / rows.len() as f64
        };
        let global = passed(&signal);

        let mse = bins.iter()
            .map(|rows| (passed(rows) - global).powi(2))
            .sum::<f64>()
            / n_bins as f64;
        total += mse;
    }
    Ok(total / efficiencies.len() as f64)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auc_perfect_and_reversed() {
        let labels = vec![0.0, 1.0, 0.0, 1.0];
        let scores = vec![0.1, 0.9, 0.2, 0.8];
        let result = roc_auc_score(&labels, &scores).unwrap();
        assert_eq!(1.0, result, "expected 1, got {result}.");

        let reversed = scores.iter().map(|s| -s).collect::<Vec<_>>();
        let result = roc_auc_score(&labels, &reversed).unwrap();
        assert_eq!(0.0, result, "expected 0, got {result}.");
    }

    #[test]
    fn test_auc_ties() {
        let labels = vec![0.0, 1.0, 0.0, 1.0];
        let scores = vec![0.5; 4];
        let result = roc_auc_score(&labels, &scores).unwrap();
        let expect = 0.5;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }

    #[test]
    fn test_auc_single_class() {
        let result = roc_auc_score(&[1.0, 1.0], &[0.2, 0.3]);
        assert!(matches!(result, Err(UBoostError::InvalidSample(_))));
        let result = roc_auc_score(&[1.0, 0.0], &[0.2]);
        assert!(matches!(result, Err(UBoostError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_accuracy() {
        let labels = vec![0.0, 1.0, 1.0, 0.0];
        let predictions = vec![0, 1, 0, 0];
        let result = accuracy_score(&labels, &predictions).unwrap();
        let expect = 0.75;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }

    #[test]
    fn test_uniformity_mse() {
        let n = 100;
        let u = (0..n).map(|i| i as f64).collect::<Vec<_>>();
        let target = vec![1.0; n];
        let sample = Sample::from_columns(vec![("u", u)], target).unwrap();

        // The probability does not depend on `u` within each pair of rows.
        let flat = (0..n).map(|i| {
                let p = if i % 2 == 0 { 0.2 } else { 0.8 };
                [1.0 - p, p]
            })
            .collect::<Vec<_>>();
        let result = uniformity_mse(&sample, "u", &flat, 5, &[0.5]).unwrap();
        assert!(result < 1e-12, "expected 0, got {result}.");

        // The probability increases with `u`.
        let steep = (0..n).map(|i| {
                let p = i as f64 / n as f64;
                [1.0 - p, p]
            })
            .collect::<Vec<_>>();
        let result = uniformity_mse(&sample, "u", &steep, 5, &[0.5]).unwrap();
        assert!(result > 0.1, "expected a large deviation, got {result}.");

        assert!(uniformity_mse(&sample, "v", &flat, 5, &[0.5]).is_err());
        assert!(uniformity_mse(&sample, "u", &flat, 0, &[0.5]).is_err());
        assert!(uniformity_mse(&sample, "u", &flat, 5, &[1.5]).is_err());
    }
}
