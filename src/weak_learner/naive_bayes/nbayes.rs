use rayon::prelude::*;

use crate::{Sample, WeakLearner};
use crate::error::{Result, UBoostError};
use crate::common::checker;
use crate::sample::{BACKGROUND, SIGNAL};

use super::probability::Gaussian;
use super::nbayes_classifier::*;


/// Portion of the largest variance added to every variance.
const DEFAULT_VAR_SMOOTHING: f64 = 1e-9;


/// A factory that produces a `NBayesClassifier<Gaussian>`
/// for a given distribution over training examples.
/// The struct name comes from scikit-learn.
///
/// # Example
/// ```
/// use uboost::prelude::*;
///
/// let sample = SampleGenerator::new(200).generate().unwrap();
/// let n_sample = sample.shape().0;
/// let dist = vec![1.0 / n_sample as f64; n_sample];
///
/// let f = GaussianNB::init().produce(&sample, &dist).unwrap();
/// let [p0, p1] = f.predict_proba(&sample, 0);
/// assert!((p0 + p1 - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GaussianNB {
    var_smoothing: f64,
}


impl Default for GaussianNB {
    fn default() -> Self {
        Self::init()
    }
}


impl GaussianNB {
    /// Initializes the GaussianNB instance.
    pub fn init() -> Self {
        Self { var_smoothing: DEFAULT_VAR_SMOOTHING }
    }


    /// Set the portion of the largest variance
    /// added to every variance for stability.
    /// Default is `1e-9`.
    pub fn var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.var_smoothing = var_smoothing;
        self
    }
}


impl WeakLearner for GaussianNB {
    type Hypothesis = NBayesClassifier<Gaussian>;


    fn name(&self) -> &str {
        "Gaussian Naive Bayes"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let info = Vec::from([
            ("Variance smoothing", format!("{}", self.var_smoothing)),
        ]);
        Some(info)
    }


    fn produce(&self, sample: &Sample, dist: &[f64])
        -> Result<Self::Hypothesis>
    {
        let n_sample = sample.shape().0;
        checker::check_distribution(dist, n_sample)?;

        let target = sample.target();
        let mut prior_p: f64 = 0.0;
        let mut prior_n: f64 = 0.0;
        target.iter()
            .zip(dist)
            .for_each(|(&y, &d)| {
                if y == SIGNAL {
                    prior_p += d;
                } else {
                    prior_n += d;
                }
            });

        if prior_p <= 0.0 || prior_n <= 0.0 {
            return Err(UBoostError::fit(
                0, "both classes must have positive mass"
            ));
        }
        let total = prior_p + prior_n;


        // Compute the variance for each feature over all instances.
        // The largest one scales the smoothing term.
        let epsilon = sample.features()
            .par_iter()
            .map(|feat| {
                let values = feat.values();
                let mean = weighted_mean(values, target, dist, None, total);
                weighted_var(values, target, dist, None, total, mean)
            })
            .reduce(|| 0.0, f64::max)
            * self.var_smoothing;
        let epsilon = if epsilon > 0.0 { epsilon } else { self.var_smoothing };


        let cond_density_p = class_density(
            sample, dist, SIGNAL, prior_p, epsilon
        );
        let cond_density_n = class_density(
            sample, dist, BACKGROUND, prior_n, epsilon
        );


        Ok(NBayesClassifier {
            prior_p: prior_p / total,
            prior_n: prior_n / total,

            cond_density_p,
            cond_density_n,
        })
    }
}


/// Per-feature Gaussian of the examples labeled `label`.
fn class_density(
    sample: &Sample,
    dist: &[f64],
    label: f64,
    prior: f64,
    epsilon: f64,
) -> Gaussian
{
    let target = sample.target();
    let (means, vars) = sample.features()
        .par_iter()
        .map(|feat| {
            let values = feat.values();
            let mean = weighted_mean(values, target, dist, Some(label), prior);
            let var = weighted_var(values, target, dist, Some(label), prior, mean);
            (mean, var + epsilon)
        })
        .unzip();
    Gaussian::new(means, vars)
}


/// Compute the weighted mean of `values`
/// over the examples labeled `label` (all examples if `None`).
fn weighted_mean(
    values: &[f64],
    target: &[f64],
    dist: &[f64],
    label: Option<f64>,
    mass: f64,
) -> f64
{
    values.iter()
        .zip(target)
        .zip(dist)
        .filter(|((_, &y), _)| label.map_or(true, |l| l == y))
        .map(|((&x, _), &d)| x * d)
        .sum::<f64>()
        / mass
}


/// Compute the weighted variance of `values`
/// over the examples labeled `label` (all examples if `None`).
fn weighted_var(
    values: &[f64],
    target: &[f64],
    dist: &[f64],
    label: Option<f64>,
    mass: f64,
    mean: f64,
) -> f64
{
    values.iter()
        .zip(target)
        .zip(dist)
        .filter(|((_, &y), _)| label.map_or(true, |l| l == y))
        .map(|((&x, _), &d)| (x - mean).powi(2) * d)
        .sum::<f64>()
        / mass
}
