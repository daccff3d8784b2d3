use serde::{
    Serialize,
    Deserialize,
};

use core::f64::consts::PI;
use crate::Sample;


/// Class-conditional densities used by [`NBayesClassifier`].
///
/// [`NBayesClassifier`]: super::NBayesClassifier
pub trait Probability {
    /// Log-density of the `row`-th example.
    fn log_probability(&self, sample: &Sample, row: usize) -> f64;


    /// Density of the `row`-th example.
    fn probability(&self, sample: &Sample, row: usize) -> f64 {
        self.log_probability(sample, row).exp()
    }
}


/// Gaussian density with a diagonal covariance.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Gaussian {
    pub(super) means: Vec<f64>,
    pub(super) vars: Vec<f64>,
}

impl Gaussian {
    pub(super) fn new(means: Vec<f64>, vars: Vec<f64>) -> Self {
        debug_assert_eq!(means.len(), vars.len());
        Self { means, vars }
    }
}


impl Probability for Gaussian {
    #[inline(always)]
    fn log_probability(&self, sample: &Sample, row: usize) -> f64 {
        self.means.iter()
            .zip(&self.vars[..])
            .zip(sample.features())
            .map(|((&mean, &var), feat)| {
                let x = feat[row];
                (2.0 * PI * var).ln() + (x - mean).powi(2) / var
            })
            .sum::<f64>()
            * -0.5
    }
}
