//! Provides [`UBoostBDT`], a booster that trains one ensemble
//! at a fixed target efficiency.
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::borrow::Cow;
use std::mem;
use std::ops::ControlFlow;

use crate::{
    Booster,
    Classifier,
    FeatureImportance,
    StagedClassifier,
    WeakLearner,
    Sample,

    common::utils,
    hypothesis::{StagedScores, WeightedMajority},
    hypothesis::weighted_majority::score_to_proba,
    neighbors::NeighborTable,
    research::CurrentHypothesis,
};
use crate::error::{Result, UBoostError};

use super::{
    cut::cut_for_efficiency,
    efficiency::{EfficiencyEstimator, KnnEfficiency},
    params::{UBoostParams, UniformLabel},
};


/// Clipping range of the non-uniformity error `e'`.
const UNIFORMITY_EPS: f64 = 1e-6;


/// uBoost with a single target efficiency.
///
/// Each round, `UBoostBDT`
/// 1. trains a weak hypothesis on the current weights,
/// 2. updates the weights by the SAMME (or SAMME.R) rule,
/// 3. calibrates the cut that keeps a fraction `target_efficiency`
///    of the uniform class,
/// 4. and boosts the uniform-class examples
///    whose neighbourhood passes the cut less often than the target.
///
/// # Example
/// ```no_run
/// use uboost::prelude::*;
///
/// let sample = SampleGenerator::new(1000).generate().unwrap();
/// let params = UBoostParams::new(["column0"])
///     .target_efficiency(0.5)
///     .n_neighbors(20)
///     .n_estimators(20);
///
/// let tree = DecisionTreeBuilder::new()
///     .max_depth(6)
///     .min_samples_leaf(10)
///     .build();
///
/// let mut booster = UBoostBDT::init(&sample, params).unwrap();
/// let model = booster.run(&tree).unwrap();
/// assert_eq!(model.score_cuts().len(), 20);
///
/// let proba = model.predict_proba(&sample).unwrap();
/// ```
pub struct UBoostBDT<'a, H> {
    // Training sample, with every column.
    sample: &'a Sample,

    // Columns the weak learner sees.
    train: Cow<'a, Sample>,

    params: UBoostParams,

    // Column names of `sample`.
    input_names: Vec<String>,

    // `+1` for signal, `-1` for background.
    sigma: f64,

    // Rows of the uniform class.
    uniform_rows: Vec<usize>,

    estimator: Option<Box<dyn EfficiencyEstimator + Send + Sync + 'a>>,

    // Distribution on `sample`.
    dist: Vec<f64>,

    // Running scores on `sample`.
    scores: Vec<f64>,

    // Labels mapped to `{-1, +1}`.
    y_signed: Vec<f64>,

    majority: WeightedMajority<H>,
    score_cuts: Vec<f64>,
}


impl<'a, H> UBoostBDT<'a, H> {
    /// Initialize `UBoostBDT` on `sample`.
    /// Returns an error if `params` does not fit `sample`.
    pub fn init(sample: &'a Sample, params: UBoostParams) -> Result<Self> {
        params.validate_against(sample)?;

        let train = match params.train_features.as_ref() {
            Some(features) => Cow::Owned(sample.select_columns(features)?),
            None => Cow::Borrowed(sample),
        };

        let input_names = sample.feature_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let train_names = train.feature_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let n_sample = sample.shape().0;
        let sigma = params.uniform_label.sign();
        let uniform_rows = sample.indices_of(params.uniform_label.label());
        let y_signed = sample.target()
            .iter()
            .map(|&y| 2.0 * y - 1.0)
            .collect::<Vec<_>>();
        let majority = WeightedMajority::new(params.algorithm, train_names);

        Ok(Self {
            sample,
            train,
            params,
            input_names,
            sigma,
            uniform_rows,
            estimator: None,
            dist: vec![1.0 / n_sample as f64; n_sample],
            scores: vec![0.0; n_sample],
            y_signed,
            majority,
            score_cuts: Vec::new(),
        })
    }


    /// Replace the estimator of local efficiencies.
    /// By default, [`KnnEfficiency`] over the `n_neighbors`
    /// nearest same-class examples in the uniform variables is used.
    pub fn efficiency_estimator<E>(mut self, estimator: E) -> Self
        where E: EfficiencyEstimator + Send + Sync + 'a
    {
        self.estimator = Some(Box::new(estimator));
        self
    }


    /// Returns the parameters.
    pub fn params(&self) -> &UBoostParams {
        &self.params
    }


    /// Returns the cuts calibrated so far.
    pub fn score_cuts(&self) -> &[f64] {
        &self.score_cuts[..]
    }


    /// Returns the current distribution on the training examples.
    pub fn distribution(&self) -> &[f64] {
        &self.dist[..]
    }


    /// Weighted misclassification rate of `h` on the training sample.
    fn weighted_error(&self, h: &H) -> f64
        where H: Classifier,
    {
        let target = self.train.target();
        (0..self.dist.len())
            .filter(|&i| h.predict(&self.train, i) as f64 != target[i])
            .map(|i| self.dist[i])
            .sum::<f64>()
    }


    /// Multiply the weights of the uniform-class examples
    /// by `exp(beta * deviation)`.
    fn reweight_uniform(&mut self, deviations: &[f64]) -> Result<()> {
        let mass = self.uniform_rows.iter()
            .map(|&i| self.dist[i])
            .sum::<f64>();
        if mass <= 0.0 || !mass.is_finite() {
            return Err(UBoostError::ConsistencyViolation(format!(
                "the uniform class has total weight {mass}"
            )));
        }

        let e = utils::weighted_sum(
            &self.dist,
            &deviations.iter().map(|d| d.abs()).collect::<Vec<_>>(),
            &self.uniform_rows,
        ) / mass;
        let e = e.clamp(UNIFORMITY_EPS, 1.0 - UNIFORMITY_EPS);
        let beta = ((1.0 - e) / e).ln();

        for &i in self.uniform_rows.iter() {
            self.dist[i] *= (beta * deviations[i]).exp();
        }
        Ok(())
    }
}


impl<H> Booster<H> for UBoostBDT<'_, H>
    where H: Classifier + Sync,
{
    type Output = UBoostModel<H>;


    fn name(&self) -> &str {
        "uBoost"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let label = match self.params.uniform_label {
            UniformLabel::Signal => "Signal",
            UniformLabel::Background => "Background",
        };
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Uniform variables", self.params.uniform_variables.join(", ")),
            ("Uniform label", label.to_string()),
            ("Target efficiency", format!("{}", self.params.target_efficiency)),
            ("# of neighbors", format!("{}", self.params.n_neighbors)),
            ("Algorithm", format!("{:?}", self.params.algorithm)),
            ("Max iteration", format!("{}", self.params.n_estimators)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) -> Result<()> {
        let n_sample = self.sample.shape().0;
        self.dist = vec![1.0 / n_sample as f64; n_sample];
        self.scores = vec![0.0; n_sample];
        self.score_cuts = Vec::with_capacity(self.params.n_estimators);

        let names = self.majority.feature_names().to_vec();
        self.majority = WeightedMajority::new(self.params.algorithm, names);

        if self.estimator.is_none() {
            let table = NeighborTable::same_class(
                self.sample,
                &self.params.uniform_variables[..],
                self.params.uniform_label.label(),
                self.params.n_neighbors,
            )?;
            self.estimator = Some(Box::new(KnnEfficiency::new(table)));
        }
        Ok(())
    }


    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner<Hypothesis = H>,
    {
        let n_estimators = self.params.n_estimators;
        if iteration > n_estimators {
            return Ok(ControlFlow::Break(n_estimators));
        }


        // Get a new hypothesis
        let h = weak_learner.produce(&self.train, &self.dist)
            .map_err(|e| e.at_round(iteration))?;


        let algorithm = self.params.algorithm;
        let error = self.weighted_error(&h);
        let coef = algorithm.coefficient(error, self.params.learning_rate);
        let contributions = algorithm.contributions(coef, &h, &self.train);


        // AdaBoost update and running scores.
        self.dist.par_iter_mut()
            .zip(self.scores.par_iter_mut())
            .zip(self.y_signed.par_iter().zip(contributions.par_iter()))
            .for_each(|((d, s), (y, c))| {
                *d *= (-y * c).exp();
                *s += c;
            });


        let eff = self.params.target_efficiency;
        let sigma = self.sigma;
        let cut = cut_for_efficiency(
            &self.scores, &self.uniform_rows, sigma, eff
        )?;
        let passed = self.scores.par_iter()
            .map(|s| sigma * s > sigma * cut)
            .collect::<Vec<bool>>();


        let estimator = self.estimator.as_ref()
            .ok_or_else(|| {
                UBoostError::ConsistencyViolation(
                    "the efficiency estimator is not built".into()
                )
            })?;
        let deviations = estimator.deviations(&passed, eff)?;
        if deviations.len() != passed.len() {
            return Err(UBoostError::ConsistencyViolation(format!(
                "{} deviations for {} examples",
                deviations.len(),
                passed.len(),
            )));
        }
        self.reweight_uniform(&deviations)?;
        utils::normalize(&mut self.dist)?;


        self.majority.push(coef, h);
        self.score_cuts.push(cut);


        if iteration >= n_estimators {
            return Ok(ControlFlow::Break(iteration));
        }
        Ok(ControlFlow::Continue(()))
    }


    fn postprocess(&mut self) -> Result<Self::Output> {
        self.majority.check_consistency()?;

        let n_round = self.majority.n_estimators();
        if self.score_cuts.len() != n_round
            || n_round != self.params.n_estimators
        {
            return Err(UBoostError::ConsistencyViolation(format!(
                "{} cuts and {} hypotheses after {} rounds",
                self.score_cuts.len(),
                n_round,
                self.params.n_estimators,
            )));
        }

        let names = self.majority.feature_names().to_vec();
        let majority = mem::replace(
            &mut self.majority,
            WeightedMajority::new(self.params.algorithm, names),
        );
        let score_cuts = mem::take(&mut self.score_cuts);
        UBoostModel::from_components(
            majority, score_cuts, &self.params, self.input_names.clone(),
        )
    }
}


impl<H> CurrentHypothesis for UBoostBDT<'_, H>
    where H: Classifier + Clone,
{
    type Output = UBoostModel<H>;


    fn current_hypothesis(&self) -> Result<Self::Output> {
        UBoostModel::from_components(
            self.majority.clone(),
            self.score_cuts.clone(),
            &self.params,
            self.input_names.clone(),
        )
    }


    fn current_score_cut(&self) -> Option<f64> {
        self.score_cuts.last().copied()
    }
}


/// The model [`UBoostBDT`] returns.
/// The score of an example is the weighted sum of the hypotheses
/// and the probability of the signal class is
/// `sigmoid(score - score_cut)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UBoostModel<H> {
    majority: WeightedMajority<H>,
    score_cut: f64,
    score_cuts: Vec<f64>,
    target_efficiency: f64,
    uniform_label: UniformLabel,
    uniform_variables: Vec<String>,
    input_names: Vec<String>,
    train_features: Option<Vec<String>>,
}


impl<H> UBoostModel<H> {
    fn from_components(
        majority: WeightedMajority<H>,
        score_cuts: Vec<f64>,
        params: &UBoostParams,
        input_names: Vec<String>,
    ) -> Result<Self>
    {
        let score_cut = score_cuts.last()
            .copied()
            .ok_or_else(|| {
                UBoostError::ConsistencyViolation(
                    "a model needs at least one round".into()
                )
            })?;
        Ok(Self {
            majority,
            score_cut,
            score_cuts,
            target_efficiency: params.target_efficiency,
            uniform_label: params.uniform_label,
            uniform_variables: params.uniform_variables.clone(),
            input_names,
            train_features: params.train_features.clone(),
        })
    }


    /// Returns the cut of the last round.
    pub fn score_cut(&self) -> f64 {
        self.score_cut
    }


    /// Returns the cut of every round.
    pub fn score_cuts(&self) -> &[f64] {
        &self.score_cuts[..]
    }


    /// Returns the target efficiency.
    pub fn target_efficiency(&self) -> f64 {
        self.target_efficiency
    }


    /// Returns the class whose efficiency is kept uniform.
    pub fn uniform_label(&self) -> UniformLabel {
        self.uniform_label
    }


    /// Returns the uniform variables.
    pub fn uniform_variables(&self) -> &[String] {
        &self.uniform_variables[..]
    }


    /// Returns the columns the model expects.
    pub fn feature_names(&self) -> &[String] {
        &self.input_names[..]
    }


    /// Returns the number of rounds.
    pub fn n_estimators(&self) -> usize {
        self.majority.n_estimators()
    }


    /// Returns the weighted majority vote of the hypotheses.
    pub fn majority(&self) -> &WeightedMajority<H> {
        &self.majority
    }


    /// Check the columns of `sample` and
    /// restrict it to the columns the hypotheses read.
    fn view<'b>(&self, sample: &'b Sample) -> Result<Cow<'b, Sample>> {
        sample.check_columns(&self.input_names)?;
        match self.train_features.as_ref() {
            Some(features) => Ok(Cow::Owned(sample.select_columns(features)?)),
            None => Ok(Cow::Borrowed(sample)),
        }
    }
}


impl<H> UBoostModel<H>
    where H: Classifier + Sync,
{
    /// Returns the score of every example of `sample`.
    pub fn predict_score(&self, sample: &Sample) -> Result<Vec<f64>> {
        let view = self.view(sample)?;
        Ok(self.majority.score_unchecked(&view))
    }


    /// Returns the scores after each round.
    /// The last item equals [`UBoostModel::predict_score`] bit for bit.
    pub fn staged_predict_score<'a>(&'a self, sample: &'a Sample)
        -> Result<StagedScores<'a, H>>
    {
        let view = self.view(sample)?;
        Ok(self.majority.stages(view))
    }
}


impl<H> StagedClassifier for UBoostModel<H>
    where H: Classifier + Sync,
{
    fn predict_proba(&self, sample: &Sample) -> Result<Vec<[f64; 2]>> {
        let cut = self.score_cut;
        let proba = self.predict_score(sample)?
            .into_iter()
            .map(|score| score_to_proba(score - cut))
            .collect();
        Ok(proba)
    }


    /// Every stage is shifted by the cut of the last round.
    fn staged_predict_proba<'a>(&'a self, sample: &'a Sample)
        -> Result<Box<dyn Iterator<Item = Vec<[f64; 2]>> + 'a>>
    {
        let cut = self.score_cut;
        let stages = self.staged_predict_score(sample)?
            .map(move |scores| {
                scores.into_iter()
                    .map(|score| score_to_proba(score - cut))
                    .collect::<Vec<_>>()
            });
        Ok(Box::new(stages))
    }
}


impl<H> FeatureImportance for UBoostModel<H>
    where H: FeatureImportance,
{
    /// One entry per input column.
    /// Columns the weak learner never saw get `0`.
    fn feature_importances(&self) -> Vec<f64> {
        let mut importances = vec![0.0; self.input_names.len()];
        let trained = self.majority.feature_importances();
        for (name, imp) in self.majority.feature_names().iter().zip(trained) {
            if let Some(k) = self.input_names.iter().position(|n| n == name) {
                importances[k] = imp;
            }
        }
        importances
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecisionTreeBuilder, DecisionTreeClassifier, SampleGenerator};

    fn sample() -> Sample {
        SampleGenerator::new(400).n_features(4)
            .seed(11)
            .generate()
            .unwrap()
    }

    #[test]
    fn test_rounds_and_cuts() {
        let sample = sample();
        let params = UBoostParams::new(["column0"])
            .n_neighbors(10)
            .n_estimators(8);
        let tree = DecisionTreeBuilder::new().max_depth(3).build();

        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let result = model.score_cuts().len();
        let expect = 8;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
        assert_eq!(model.score_cut(), *model.score_cuts().last().unwrap());
        assert_eq!(model.n_estimators(), 8);

        let dist_sum = booster.distribution().iter().sum::<f64>();
        assert!((dist_sum - 1.0).abs() < 1e-9, "weights sum to {dist_sum}");
    }

    #[test]
    fn test_background_uniformity() {
        let sample = sample();
        let params = UBoostParams::new(["column1"])
            .uniform_label(UniformLabel::Background)
            .target_efficiency(0.7)
            .n_neighbors(10)
            .n_estimators(5);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();

        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        // 70% of the background passes below the cut.
        // Discrete scores tie at the cut, so the count lies in a window.
        let scores = model.predict_score(&sample).unwrap();
        let cut = model.score_cut();
        let background = sample.indices_of(0.0);
        let below = |eps: f64| {
            background.iter().filter(|&&i| scores[i] < cut + eps).count()
        };
        let lower = below(-1e-7);
        let upper = below(1e-7);
        let expect = (background.len() as f64 * 0.7).round() as usize;
        assert!(
            lower <= expect && expect <= upper,
            "expected {expect} in [{lower}, {upper}]."
        );
    }


    #[test]
    fn test_small_background_class() {
        let sample = SampleGenerator::new(600).n_features(3)
            .seed(5)
            .generate()
            .unwrap();
        let mut rows = sample.indices_of(1.0);
        rows.extend(sample.indices_of(0.0).into_iter().take(20));
        let sample = sample.select_rows(&rows).unwrap();

        let params = UBoostParams::new(["column0"])
            .n_neighbors(30)
            .n_estimators(3);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();

        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();
        let result = model.score_cuts().len();
        let expect = 3;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }


    #[test]
    fn test_low_efficiency_rows_gain_weight() {
        // 20 signal rows on a line, 10 background rows.
        let u = (0..30).map(|i| i as f64).collect::<Vec<_>>();
        let target = (0..30)
            .map(|i| if i < 20 { 1.0 } else { 0.0 })
            .collect::<Vec<_>>();
        let sample = Sample::from_columns(vec![("u", u)], target).unwrap();

        let params = UBoostParams::new(["u"]).n_neighbors(3);
        let mut booster = UBoostBDT::<DecisionTreeClassifier>::init(
            &sample, params
        ).unwrap();
        booster.preprocess().unwrap();

        // The signal rows with `u < 10` fail the cut.
        let passed = (0..30).map(|i| i >= 10).collect::<Vec<_>>();
        let deviations = booster.estimator.as_ref()
            .unwrap()
            .deviations(&passed, 0.5)
            .unwrap();
        assert!(deviations[0] > 0.0 && deviations[19] < 0.0);
        assert_eq!(deviations[25], 0.0);

        let before = booster.distribution().to_vec();
        booster.reweight_uniform(&deviations).unwrap();
        let after = booster.distribution();

        let ratio = |i: usize| after[i] / before[i];
        assert!(
            ratio(0) > 1.0 && ratio(19) < 1.0,
            "failing row scaled by {}, passing row by {}.",
            ratio(0),
            ratio(19),
        );
        for i in 20..30 {
            assert_eq!(before[i], after[i]);
        }
    }

    #[test]
    fn test_train_features() {
        let sample = sample();
        let params = UBoostParams::new(["column0"])
            .train_features(["column1", "column2", "column3"])
            .n_neighbors(10)
            .n_estimators(4);
        let tree = DecisionTreeBuilder::new().max_depth(3).build();

        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let importances = model.feature_importances();
        assert_eq!(importances.len(), 4);
        assert_eq!(importances[0], 0.0);
        assert_eq!(model.majority().feature_names().len(), 3);
    }

    #[test]
    fn test_custom_estimator() {
        struct Flat;
        impl EfficiencyEstimator for Flat {
            fn deviations(&self, passed: &[bool], _: f64) -> Result<Vec<f64>> {
                Ok(vec![0.0; passed.len()])
            }
        }

        let sample = sample();
        let params = UBoostParams::new(["column0"]).n_estimators(3);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();
        let mut booster = UBoostBDT::init(&sample, params)
            .unwrap()
            .efficiency_estimator(Flat);
        let model = booster.run(&tree).unwrap();
        assert_eq!(model.score_cuts().len(), 3);
    }

    #[test]
    fn test_current_hypothesis() {
        let sample = sample();
        let params = UBoostParams::new(["column0"])
            .n_neighbors(5)
            .n_estimators(3);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();
        let mut booster = UBoostBDT::init(&sample, params).unwrap();

        booster.preprocess().unwrap();
        assert!(booster.current_hypothesis().is_err());
        assert!(booster.current_score_cut().is_none());

        let flow = booster.boost(&tree, 1).unwrap();
        assert!(flow.is_continue());
        let model = booster.current_hypothesis().unwrap();
        assert_eq!(model.n_estimators(), 1);
        assert_eq!(booster.current_score_cut(), Some(model.score_cut()));
    }
}
