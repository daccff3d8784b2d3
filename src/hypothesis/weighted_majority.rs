use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::borrow::Cow;

use crate::{
    common::utils,
    Classifier,
    FeatureImportance,
    StagedClassifier,
    Sample,
};
use crate::error::{Result, UBoostError};


/// Clipping range of the weighted error in SAMME.
const ERROR_EPS: f64 = 1e-6;
/// Clipping range of the signal probability in SAMME.R.
const PROBA_EPS: f64 = 1e-7;


/// The rule that turns a weak hypothesis into a score contribution.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Discrete SAMME.
    /// The coefficient is `lr * 0.5 * ln((1 - e) / e)`
    /// for the weighted error `e`,
    /// and a hypothesis contributes `+coef` or `-coef`.
    #[default]
    Samme,
    /// Real SAMME.R.
    /// The coefficient is `lr * 0.5`
    /// and a hypothesis contributes `coef * ln(p / (1 - p))`
    /// for the signal probability `p`.
    SammeR,
}


impl Algorithm {
    /// Returns the coefficient of a hypothesis
    /// whose weighted error is `error`.
    pub(crate) fn coefficient(&self, error: f64, learning_rate: f64) -> f64 {
        match self {
            Self::Samme => {
                let e = error.clamp(ERROR_EPS, 1.0 - ERROR_EPS);
                learning_rate * 0.5 * ((1.0 - e) / e).ln()
            },
            Self::SammeR => learning_rate * 0.5,
        }
    }


    /// Returns the score contribution of `h` on the `row`-th example.
    #[inline(always)]
    pub(crate) fn contribution<H>(
        &self,
        coefficient: f64,
        h: &H,
        sample: &Sample,
        row: usize,
    ) -> f64
        where H: Classifier,
    {
        match self {
            Self::Samme => {
                if h.predict(sample, row) == 1 {
                    coefficient
                } else {
                    -coefficient
                }
            },
            Self::SammeR => {
                let [_, p] = h.predict_proba(sample, row);
                let p = p.clamp(PROBA_EPS, 1.0 - PROBA_EPS);
                coefficient * (p / (1.0 - p)).ln()
            },
        }
    }


    /// Returns the score contributions of `h` on every example.
    pub(crate) fn contributions<H>(
        &self,
        coefficient: f64,
        h: &H,
        sample: &Sample,
    ) -> Vec<f64>
        where H: Classifier + Sync,
    {
        let n_sample = sample.shape().0;
        (0..n_sample).into_par_iter()
            .map(|row| self.contribution(coefficient, h, sample, row))
            .collect()
    }
}


/// A struct that the boosting algorithms in this library return.
/// The score of an example is the sum of
/// the contributions of the hypotheses, in order.
/// You can read/write this struct by `Serde` trait.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WeightedMajority<H> {
    pub(crate) algorithm: Algorithm,
    /// Coefficients on each hypothesis in `self.hypotheses`.
    pub(crate) coefficients: Vec<f64>,
    /// Set of hypotheses.
    pub(crate) hypotheses: Vec<H>,
    /// Columns the hypotheses were trained on.
    pub(crate) feature_names: Vec<String>,
}


impl<H> WeightedMajority<H> {
    /// Construct an empty combined hypothesis
    /// over the columns `feature_names`.
    pub(crate) fn new(algorithm: Algorithm, feature_names: Vec<String>) -> Self {
        Self {
            algorithm,
            coefficients: Vec::new(),
            hypotheses: Vec::new(),
            feature_names,
        }
    }


    /// Append a pair `(coefficient, H)` to the current combined hypothesis.
    #[inline]
    pub(crate) fn push(&mut self, coefficient: f64, hypothesis: H) {
        self.coefficients.push(coefficient);
        self.hypotheses.push(hypothesis);
    }


    /// Returns the rule combining the hypotheses.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }


    /// Returns the coefficients, one per round.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients[..]
    }


    /// Returns the hypotheses, one per round.
    pub fn hypotheses(&self) -> &[H] {
        &self.hypotheses[..]
    }


    /// Returns the columns the hypotheses read.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names[..]
    }


    /// Returns the number of rounds.
    pub fn n_estimators(&self) -> usize {
        self.hypotheses.len()
    }
}


impl<H> WeightedMajority<H>
    where H: Classifier + Sync,
{
    /// Returns the score of every example of `sample`.
    pub fn predict_score(&self, sample: &Sample) -> Result<Vec<f64>> {
        sample.check_columns(&self.feature_names)?;
        Ok(self.score_unchecked(sample))
    }


    /// Returns the scores after each round.
    /// The last item equals [`WeightedMajority::predict_score`] bit for bit.
    pub fn staged_predict_score<'a>(&'a self, sample: &'a Sample)
        -> Result<StagedScores<'a, H>>
    {
        sample.check_columns(&self.feature_names)?;
        Ok(self.stages(Cow::Borrowed(sample)))
    }


    pub(crate) fn score_unchecked(&self, sample: &Sample) -> Vec<f64> {
        let mut scores = vec![0.0; sample.shape().0];
        for t in 0..self.hypotheses.len() {
            self.accumulate(t, sample, &mut scores);
        }
        scores
    }


    pub(crate) fn stages<'a>(&'a self, sample: Cow<'a, Sample>)
        -> StagedScores<'a, H>
    {
        let scores = vec![0.0; sample.shape().0];
        StagedScores { majority: self, sample, scores, stage: 0, }
    }


    /// Add the contributions of the `t`-th hypothesis to `scores`.
    #[inline(always)]
    fn accumulate(&self, t: usize, sample: &Sample, scores: &mut [f64]) {
        let coef = self.coefficients[t];
        let h = &self.hypotheses[t];
        scores.par_iter_mut()
            .enumerate()
            .for_each(|(row, score)| {
                *score += self.algorithm.contribution(coef, h, sample, row);
            });
    }
}


impl<H> StagedClassifier for WeightedMajority<H>
    where H: Classifier + Sync,
{
    fn predict_proba(&self, sample: &Sample) -> Result<Vec<[f64; 2]>> {
        let proba = self.predict_score(sample)?
            .into_iter()
            .map(score_to_proba)
            .collect();
        Ok(proba)
    }


    fn staged_predict_proba<'a>(&'a self, sample: &'a Sample)
        -> Result<Box<dyn Iterator<Item = Vec<[f64; 2]>> + 'a>>
    {
        let stages = self.staged_predict_score(sample)?
            .map(|scores| {
                scores.into_iter().map(score_to_proba).collect::<Vec<_>>()
            });
        Ok(Box::new(stages))
    }
}


impl<H> FeatureImportance for WeightedMajority<H>
    where H: FeatureImportance,
{
    /// Coefficient-weighted mean of the importances of each round.
    fn feature_importances(&self) -> Vec<f64> {
        let n_feature = self.feature_names.len();
        let total = self.coefficients.iter().sum::<f64>();

        let mut importances = vec![0.0; n_feature];
        if self.hypotheses.is_empty() {
            return importances;
        }

        let uniform = 1.0 / self.hypotheses.len() as f64;
        for (coef, h) in self.coefficients.iter().zip(&self.hypotheses) {
            let weight = if total > 0.0 { coef / total } else { uniform };
            h.feature_importances()
                .into_iter()
                .zip(importances.iter_mut())
                .for_each(|(imp, acc)| { *acc += weight * imp; });
        }
        importances
    }
}


/// Maps a score to `[P(0), P(1)]` through the logistic function.
#[inline(always)]
pub(crate) fn score_to_proba(score: f64) -> [f64; 2] {
    let p = utils::sigmoid(score);
    [1.0 - p, p]
}


/// Iterator over the cumulative scores of a [`WeightedMajority`],
/// one item per round.
/// Created by [`WeightedMajority::staged_predict_score`].
pub struct StagedScores<'a, H> {
    majority: &'a WeightedMajority<H>,
    sample: Cow<'a, Sample>,
    scores: Vec<f64>,
    stage: usize,
}


impl<'a, H> Iterator for StagedScores<'a, H>
    where H: Classifier + Sync,
{
    type Item = Vec<f64>;


    fn next(&mut self) -> Option<Self::Item> {
        if self.stage >= self.majority.n_estimators() {
            return None;
        }
        self.majority.accumulate(self.stage, &self.sample, &mut self.scores);
        self.stage += 1;
        Some(self.scores.clone())
    }


    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.majority.n_estimators() - self.stage;
        (rest, Some(rest))
    }
}


impl<'a, H> ExactSizeIterator for StagedScores<'a, H>
    where H: Classifier + Sync,
{}


impl<H> WeightedMajority<H> {
    pub(crate) fn check_consistency(&self) -> Result<()> {
        if self.coefficients.len() != self.hypotheses.len() {
            return Err(UBoostError::ConsistencyViolation(format!(
                "{} coefficients for {} hypotheses",
                self.coefficients.len(),
                self.hypotheses.len(),
            )));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Predicts `P(1) = x` for the column `x`.
    struct Identity;

    impl Classifier for Identity {
        fn predict_proba(&self, sample: &Sample, row: usize) -> [f64; 2] {
            let p = sample["x"][row];
            [1.0 - p, p]
        }
    }

    fn sample() -> Sample {
        Sample::from_columns(
            vec![("x", vec![0.2, 0.9, 0.5])], vec![0.0, 1.0, 1.0]
        ).unwrap()
    }

    #[test]
    fn test_samme_coefficient() {
        let result = Algorithm::Samme.coefficient(0.25, 1.0);
        let expect = 0.5 * 3f64.ln();
        assert!((expect - result).abs() < 1e-12, "expected {expect}, got {result}.");

        // Clipped at both ends.
        assert!(Algorithm::Samme.coefficient(0.0, 1.0).is_finite());
        assert!(Algorithm::Samme.coefficient(1.0, 1.0).is_finite());
        assert_eq!(Algorithm::SammeR.coefficient(0.3, 0.2), 0.1);
    }

    #[test]
    fn test_staged_scores_match_final() {
        let mut wm = WeightedMajority::new(Algorithm::Samme, vec!["x".into()]);
        wm.push(0.7, Identity);
        wm.push(0.3, Identity);
        wm.push(-0.1, Identity);

        let sample = sample();
        let stages = wm.staged_predict_score(&sample).unwrap();
        assert_eq!(stages.len(), 3);

        let stages = stages.collect::<Vec<_>>();
        let result = wm.predict_score(&sample).unwrap();
        assert_eq!(stages[2], result);
        assert_eq!(stages[0], vec![-0.7, 0.7, -0.7]);

        // Fresh iterator on every call.
        let again = wm.staged_predict_score(&sample).unwrap().count();
        assert_eq!(again, 3);
    }

    #[test]
    fn test_samme_r_contribution() {
        let mut wm = WeightedMajority::new(Algorithm::SammeR, vec!["x".into()]);
        wm.push(0.5, Identity);
        let scores = wm.predict_score(&sample()).unwrap();
        let expect = 0.5 * (0.9f64 / 0.1).ln();
        assert!((scores[1] - expect).abs() < 1e-12);
        assert!(scores[2].abs() < 1e-12);
    }

    #[test]
    fn test_column_check() {
        let mut wm = WeightedMajority::new(Algorithm::Samme, vec!["y".into()]);
        wm.push(1.0, Identity);
        let result = wm.predict_score(&sample());
        assert!(matches!(result, Err(UBoostError::ShapeMismatch { .. })));
    }
}
