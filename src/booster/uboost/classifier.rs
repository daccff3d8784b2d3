//! Provides [`UBoostClassifier`], a set of [`UBoostBDT`]s
//! trained at different target efficiencies.
use serde::{Serialize, Deserialize};

use std::mem;
use std::ops::ControlFlow;

use crate::{
    Booster,
    Classifier,
    FeatureImportance,
    StagedClassifier,
    WeakLearner,
    Sample,

    common::{checker, utils},
    hypothesis::StagedScores,
    research::CurrentHypothesis,
};
use crate::error::{Result, UBoostError};

use super::{UBoostBDT, UBoostModel, UBoostParams};


const DEFAULT_EFFICIENCY_STEPS: usize = 20;


/// How [`UBoostClassifierModel`] combines its ensembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    /// The signal probability is the fraction of ensembles
    /// whose score passes their own cut.
    #[default]
    Vote,
    /// The signal probability is the mean of
    /// the probabilities of the ensembles.
    MeanProbability,
}


/// uBoost over a grid of target efficiencies.
///
/// One [`UBoostBDT`] is trained per efficiency,
/// each with its own neighbour table.
/// A round of this booster trains one whole ensemble.
///
/// # Example
/// ```no_run
/// use uboost::prelude::*;
///
/// let sample = SampleGenerator::new(1000).generate().unwrap();
/// let params = UBoostParams::new(["column0"])
///     .n_neighbors(20)
///     .n_estimators(20);
/// let tree = DecisionTreeBuilder::new().max_depth(4).build();
///
/// let mut booster = UBoostClassifier::init(&sample, params)
///     .unwrap()
///     .efficiency_steps(5)
///     .aggregation(Aggregation::Vote);
/// let model = booster.run(&tree).unwrap();
/// assert_eq!(model.ensembles().len(), 5);
/// ```
pub struct UBoostClassifier<'a, H> {
    sample: &'a Sample,
    params: UBoostParams,
    efficiencies: Vec<f64>,
    aggregation: Aggregation,
    ensembles: Vec<UBoostModel<H>>,
}


impl<'a, H> UBoostClassifier<'a, H> {
    /// Initialize `UBoostClassifier` on `sample`.
    /// The target efficiency of `params` is ignored;
    /// every ensemble uses one of [`UBoostClassifier::efficiencies`].
    pub fn init(sample: &'a Sample, params: UBoostParams) -> Result<Self> {
        params.clone()
            .target_efficiency(0.5)
            .validate_against(sample)?;

        let efficiencies = evenly_spaced(DEFAULT_EFFICIENCY_STEPS);
        Ok(Self {
            sample,
            params,
            efficiencies,
            aggregation: Aggregation::Vote,
            ensembles: Vec::new(),
        })
    }


    /// Use `n` evenly spaced efficiencies in `(0, 1)`,
    /// i.e., `linspace(0, 1, n + 2)` without both ends.
    /// Default is `20`.
    pub fn efficiency_steps(mut self, n: usize) -> Self {
        self.efficiencies = evenly_spaced(n);
        self
    }


    /// Set the efficiencies explicitly.
    pub fn efficiencies(mut self, efficiencies: Vec<f64>) -> Self {
        self.efficiencies = efficiencies;
        self
    }


    /// Set the rule combining the ensembles.
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }


    /// Returns the efficiencies the ensembles are trained at.
    pub fn target_efficiencies(&self) -> &[f64] {
        &self.efficiencies[..]
    }
}


fn evenly_spaced(n: usize) -> Vec<f64> {
    let grid = utils::linspace(0.0, 1.0, n + 2);
    grid[1..=n].to_vec()
}


impl<H> Booster<H> for UBoostClassifier<'_, H>
    where H: Classifier + Sync,
{
    type Output = UBoostClassifierModel<H>;


    fn name(&self) -> &str {
        "uBoost Classifier"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Uniform variables", self.params.uniform_variables.join(", ")),
            ("# of efficiencies", format!("{}", self.efficiencies.len())),
            ("Aggregation", format!("{:?}", self.aggregation)),
            ("# of estimators", format!("{}", self.params.n_estimators)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) -> Result<()> {
        if self.efficiencies.is_empty() {
            return Err(UBoostError::invalid_config(
                "efficiencies", "must not be empty"
            ));
        }
        for &eff in self.efficiencies.iter() {
            checker::check_open_unit("efficiencies", eff)?;
        }
        self.ensembles = Vec::with_capacity(self.efficiencies.len());
        Ok(())
    }


    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner<Hypothesis = H>,
    {
        let n_ensemble = self.efficiencies.len();
        if iteration > n_ensemble {
            return Ok(ControlFlow::Break(n_ensemble));
        }

        let eff = self.efficiencies[iteration - 1];
        let params = self.params.clone().target_efficiency(eff);
        let mut bdt = UBoostBDT::init(self.sample, params)?;
        let model = bdt.run(weak_learner)?;
        self.ensembles.push(model);

        if iteration >= n_ensemble {
            return Ok(ControlFlow::Break(iteration));
        }
        Ok(ControlFlow::Continue(()))
    }


    fn postprocess(&mut self) -> Result<Self::Output> {
        if self.ensembles.len() != self.efficiencies.len() {
            return Err(UBoostError::ConsistencyViolation(format!(
                "{} ensembles for {} efficiencies",
                self.ensembles.len(),
                self.efficiencies.len(),
            )));
        }
        Ok(UBoostClassifierModel {
            efficiencies: self.efficiencies.clone(),
            aggregation: self.aggregation,
            ensembles: mem::take(&mut self.ensembles),
        })
    }
}


impl<H> CurrentHypothesis for UBoostClassifier<'_, H>
    where H: Classifier + Clone,
{
    type Output = UBoostClassifierModel<H>;


    fn current_hypothesis(&self) -> Result<Self::Output> {
        if self.ensembles.is_empty() {
            return Err(UBoostError::ConsistencyViolation(
                "no ensemble is trained yet".into()
            ));
        }
        let n = self.ensembles.len();
        Ok(UBoostClassifierModel {
            efficiencies: self.efficiencies[..n].to_vec(),
            aggregation: self.aggregation,
            ensembles: self.ensembles.clone(),
        })
    }


    fn current_score_cut(&self) -> Option<f64> {
        self.ensembles.last().map(|model| model.score_cut())
    }
}


/// The model [`UBoostClassifier`] returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UBoostClassifierModel<H> {
    efficiencies: Vec<f64>,
    aggregation: Aggregation,
    ensembles: Vec<UBoostModel<H>>,
}


impl<H> UBoostClassifierModel<H> {
    /// Returns the target efficiency of each ensemble.
    pub fn efficiencies(&self) -> &[f64] {
        &self.efficiencies[..]
    }


    /// Returns the ensembles.
    pub fn ensembles(&self) -> &[UBoostModel<H>] {
        &self.ensembles[..]
    }


    /// Returns the rule combining the ensembles.
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }


    /// Combine one score vector per ensemble.
    fn aggregate(&self, scores: &[Vec<f64>]) -> Vec<[f64; 2]> {
        let n_ensemble = self.ensembles.len() as f64;
        let n_sample = scores.first().map(|s| s.len()).unwrap_or(0);

        (0..n_sample).map(|row| {
                let p = self.ensembles.iter()
                    .zip(scores)
                    .map(|(model, s)| {
                        let margin = s[row] - model.score_cut();
                        match self.aggregation {
                            Aggregation::Vote => {
                                if margin > 0.0 { 1.0 } else { 0.0 }
                            },
                            Aggregation::MeanProbability => {
                                utils::sigmoid(margin)
                            },
                        }
                    })
                    .sum::<f64>()
                    / n_ensemble;
                [1.0 - p, p]
            })
            .collect()
    }
}


impl<H> StagedClassifier for UBoostClassifierModel<H>
    where H: Classifier + Sync,
{
    fn predict_proba(&self, sample: &Sample) -> Result<Vec<[f64; 2]>> {
        let scores = self.ensembles.iter()
            .map(|model| model.predict_score(sample))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.aggregate(&scores))
    }


    /// Stage `t` combines the `t`-th stage of every ensemble.
    /// An ensemble with fewer rounds keeps its last stage.
    fn staged_predict_proba<'a>(&'a self, sample: &'a Sample)
        -> Result<Box<dyn Iterator<Item = Vec<[f64; 2]>> + 'a>>
    {
        let stages = self.ensembles.iter()
            .map(|model| model.staged_predict_score(sample))
            .collect::<Result<Vec<_>>>()?;
        let last = vec![None; stages.len()];
        Ok(Box::new(StagedAggregate { model: self, stages, last }))
    }
}


impl<H> FeatureImportance for UBoostClassifierModel<H>
    where H: FeatureImportance,
{
    /// Mean of the importances of the ensembles.
    fn feature_importances(&self) -> Vec<f64> {
        let mut importances = Vec::new();
        for model in self.ensembles.iter() {
            let imp = model.feature_importances();
            if importances.is_empty() {
                importances = vec![0.0; imp.len()];
            }
            importances.iter_mut()
                .zip(imp)
                .for_each(|(acc, v)| { *acc += v; });
        }

        let n_ensemble = self.ensembles.len().max(1) as f64;
        importances.iter_mut()
            .for_each(|v| { *v /= n_ensemble; });
        importances
    }
}


/// Iterator over the staged probabilities of a [`UBoostClassifierModel`].
struct StagedAggregate<'a, H> {
    model: &'a UBoostClassifierModel<H>,
    stages: Vec<StagedScores<'a, H>>,
    last: Vec<Option<Vec<f64>>>,
}


impl<H> Iterator for StagedAggregate<'_, H>
    where H: Classifier + Sync,
{
    type Item = Vec<[f64; 2]>;


    fn next(&mut self) -> Option<Self::Item> {
        let mut advanced = false;
        for (stage, last) in self.stages.iter_mut().zip(self.last.iter_mut()) {
            if let Some(scores) = stage.next() {
                *last = Some(scores);
                advanced = true;
            }
        }
        if !advanced {
            return None;
        }

        let scores = self.last.iter()
            .cloned()
            .collect::<Option<Vec<_>>>()?;
        Some(self.model.aggregate(&scores))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecisionTreeBuilder, SampleGenerator};

    #[test]
    fn test_default_efficiencies() {
        let sample = SampleGenerator::new(60).n_features(2)
            .generate()
            .unwrap();
        let params = UBoostParams::new(["column0"]).n_neighbors(5);
        let booster = UBoostClassifier::<crate::DecisionTreeClassifier>
            ::init(&sample, params)
            .unwrap()
            .efficiency_steps(3);

        let result = booster.target_efficiencies();
        let expect = [0.25, 0.5, 0.75];
        assert_eq!(expect.len(), result.len());
        for (e, r) in expect.iter().zip(result) {
            assert!((e - r).abs() < 1e-12, "expected {e}, got {r}.");
        }
    }

    #[test]
    fn test_invalid_efficiencies() {
        let sample = SampleGenerator::new(60).n_features(2)
            .generate()
            .unwrap();
        let params = UBoostParams::new(["column0"])
            .n_neighbors(5)
            .n_estimators(2);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();

        let mut booster = UBoostClassifier::init(&sample, params.clone())
            .unwrap()
            .efficiencies(vec![0.5, 1.0]);
        assert!(booster.run(&tree).is_err());

        let mut booster = UBoostClassifier::init(&sample, params)
            .unwrap()
            .efficiency_steps(0);
        assert!(booster.run(&tree).is_err());
    }

    #[test]
    fn test_vote_is_a_fraction() {
        let sample = SampleGenerator::new(200).n_features(3)
            .generate()
            .unwrap();
        let params = UBoostParams::new(["column0"])
            .n_neighbors(10)
            .n_estimators(3);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();

        let mut booster = UBoostClassifier::init(&sample, params)
            .unwrap()
            .efficiency_steps(4);
        let model = booster.run(&tree).unwrap();
        assert_eq!(model.ensembles().len(), 4);

        let proba = model.predict_proba(&sample).unwrap();
        for [p0, p1] in proba {
            let votes = p1 * 4.0;
            assert!((votes - votes.round()).abs() < 1e-12);
            assert!((p0 + p1 - 1.0).abs() < 1e-12);
        }
    }
}
