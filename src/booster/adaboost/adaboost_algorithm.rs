//! Provides [`AdaBoost`](AdaBoost) by Freund & Schapire, 1995,
//! with the multi-class SAMME and SAMME.R updates.
use rayon::prelude::*;


use crate::{
    Booster,
    WeakLearner,
    Classifier,
    WeightedMajority,
    Algorithm,
    Sample,

    common::{checker, utils},
    research::CurrentHypothesis,
};
use crate::error::{Result, UBoostError};

use std::mem;
use std::ops::ControlFlow;


/// Defines `AdaBoost`.
/// This struct is based on the book:
/// [Boosting: Foundations and Algorithms](https://direct.mit.edu/books/oa-monograph/5342/BoostingFoundations-and-Algorithms)
/// by Robert E. Schapire and Yoav Freund.
///
/// `AdaBoost` is the baseline uBoost is compared with:
/// the same coefficients, without the uniformity reweighting.
///
/// # Example
/// The following code shows a small example
/// for running [`AdaBoost`](AdaBoost).
/// See also:
/// - [`DecisionTree`]
/// - [`DecisionTreeClassifier`]
/// - [`WeightedMajority<H>`]
/// - [`Sample`]
///
/// [`DecisionTree`]: crate::weak_learner::DecisionTree
/// [`DecisionTreeClassifier`]: crate::weak_learner::DecisionTreeClassifier
/// [`WeightedMajority<H>`]: crate::hypothesis::WeightedMajority
///
///
/// ```no_run
/// use uboost::prelude::*;
///
/// let sample = SampleGenerator::new(1000).generate().unwrap();
///
/// let mut booster = AdaBoost::init(&sample)
///     .n_estimators(50)
///     .algorithm(Algorithm::Samme);
///
/// let weak_learner = DecisionTreeBuilder::new()
///     .max_depth(3)
///     .build();
///
/// // Run `AdaBoost` and obtain the resulting hypothesis `f`.
/// let f = booster.run(&weak_learner).unwrap();
///
/// // Get the predictions on the training set.
/// let predictions = f.predict(&sample).unwrap();
///
/// let n_sample = sample.shape().0 as f64;
/// let training_loss = sample.target()
///     .iter()
///     .zip(predictions)
///     .map(|(&y, fx)| if y as i64 == fx { 0.0 } else { 1.0 })
///     .sum::<f64>()
///     / n_sample;
///
/// println!("Training Loss is: {training_loss}");
/// ```
pub struct AdaBoost<'a, H> {
    // Training sample
    sample: &'a Sample,

    // Distribution on sample.
    dist: Vec<f64>,

    // Labels mapped to `{-1, +1}`.
    y_signed: Vec<f64>,

    n_estimators: usize,
    learning_rate: f64,
    algorithm: Algorithm,

    majority: WeightedMajority<H>,

    // Terminated iteration.
    // AdaBoost terminates in eary step
    // if a hypothesis classifies every example correctly.
    terminated: usize,
}


impl<'a, H> AdaBoost<'a, H> {
    /// Initialize the `AdaBoost`.
    /// Default: `50` rounds, learning rate `1`, [`Algorithm::Samme`].
    pub fn init(sample: &'a Sample) -> Self {
        let n_sample = sample.shape().0;
        let uni = 1.0 / n_sample.max(1) as f64;

        let y_signed = sample.target()
            .iter()
            .map(|&y| 2.0 * y - 1.0)
            .collect();
        let names = sample.feature_names()
            .into_iter()
            .map(String::from)
            .collect();

        AdaBoost {
            sample,
            dist: vec![uni; n_sample],
            y_signed,

            n_estimators: 50,
            learning_rate: 1.0,
            algorithm: Algorithm::Samme,

            majority: WeightedMajority::new(Algorithm::Samme, names),
            terminated: usize::MAX,
        }
    }


    /// Set the number of rounds.
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }


    /// Set the shrinkage of the coefficients.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }


    /// Set the boosting rule.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }


    /// Returns the round `AdaBoost` stopped at.
    pub fn terminated(&self) -> usize {
        self.terminated
    }
}


impl<H> Booster<H> for AdaBoost<'_, H>
    where H: Classifier + Sync,
{
    type Output = WeightedMajority<H>;


    fn name(&self) -> &str {
        "AdaBoost"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Algorithm", format!("{:?}", self.algorithm)),
            ("Learning rate", format!("{}", self.learning_rate)),
            ("Max iteration", format!("{}", self.n_estimators)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) -> Result<()> {
        checker::check_sample(self.sample)?;
        checker::check_count("n_estimators", self.n_estimators)?;
        checker::check_positive("learning_rate", self.learning_rate)?;

        // Initialize parameters
        let n_sample = self.sample.shape().0;
        let uni = 1.0 / n_sample as f64;
        self.dist = vec![uni; n_sample];

        let names = self.majority.feature_names().to_vec();
        self.majority = WeightedMajority::new(self.algorithm, names);
        self.terminated = self.n_estimators;
        Ok(())
    }


    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner<Hypothesis = H>,
    {
        if self.n_estimators < iteration {
            return Ok(ControlFlow::Break(self.n_estimators));
        }


        // Get a new hypothesis
        let h = weak_learner.produce(self.sample, &self.dist)
            .map_err(|e| e.at_round(iteration))?;


        let target = self.sample.target();
        let error = (0..self.dist.len())
            .filter(|&i| h.predict(self.sample, i) as f64 != target[i])
            .map(|i| self.dist[i])
            .sum::<f64>();

        let coef = self.algorithm.coefficient(error, self.learning_rate);


        // If `h` predicted all the examples in `sample` correctly,
        // use it as the combined classifier.
        if error == 0.0 && self.algorithm == Algorithm::Samme {
            self.terminated = iteration;
            self.majority.push(coef, h);
            return Ok(ControlFlow::Break(iteration));
        }


        let contributions = self.algorithm.contributions(coef, &h, self.sample);
        self.dist.par_iter_mut()
            .zip(self.y_signed.par_iter().zip(contributions.par_iter()))
            .for_each(|(d, (y, c))| { *d *= (-y * c).exp(); });
        utils::normalize(&mut self.dist)?;

        self.majority.push(coef, h);

        if iteration >= self.n_estimators {
            return Ok(ControlFlow::Break(iteration));
        }
        Ok(ControlFlow::Continue(()))
    }


    fn postprocess(&mut self) -> Result<Self::Output> {
        self.majority.check_consistency()?;
        if self.majority.n_estimators() == 0 {
            return Err(UBoostError::ConsistencyViolation(
                "AdaBoost finished without a hypothesis".into()
            ));
        }

        let names = self.majority.feature_names().to_vec();
        let majority = mem::replace(
            &mut self.majority,
            WeightedMajority::new(self.algorithm, names),
        );
        Ok(majority)
    }
}


impl<H> CurrentHypothesis for AdaBoost<'_, H>
    where H: Classifier + Clone,
{
    type Output = WeightedMajority<H>;


    fn current_hypothesis(&self) -> Result<Self::Output> {
        Ok(self.majority.clone())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecisionTreeBuilder, SampleGenerator, StagedClassifier};

    #[test]
    fn test_rounds() {
        let sample = SampleGenerator::new(300).n_features(3)
            .generate()
            .unwrap();
        let tree = DecisionTreeBuilder::new().max_depth(2).build();
        let mut booster = AdaBoost::init(&sample).n_estimators(7);
        let f = booster.run(&tree).unwrap();

        let result = f.n_estimators();
        let expect = 7;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
        assert_eq!(booster.terminated(), 7);
    }

    #[test]
    fn test_separable_sample_stops_early() {
        let sample = Sample::from_columns(
            vec![("x", vec![-2.0, -1.0, 1.0, 2.0])],
            vec![0.0, 0.0, 1.0, 1.0],
        ).unwrap();
        let tree = DecisionTreeBuilder::new().max_depth(1).build();
        let mut booster = AdaBoost::init(&sample).n_estimators(10);
        let f = booster.run(&tree).unwrap();

        assert_eq!(f.n_estimators(), 1);
        assert_eq!(booster.terminated(), 1);
        let result = f.predict(&sample).unwrap();
        let expect = vec![0, 0, 1, 1];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
    }

    #[test]
    fn test_invalid_parameters() {
        let sample = SampleGenerator::new(50).n_features(2)
            .generate()
            .unwrap();
        let tree = DecisionTreeBuilder::new().build();
        let mut booster = AdaBoost::init(&sample).n_estimators(0);
        assert!(booster.run(&tree).is_err());
        let mut booster = AdaBoost::init(&sample).learning_rate(0.0);
        assert!(booster.run(&tree).is_err());
    }
}
