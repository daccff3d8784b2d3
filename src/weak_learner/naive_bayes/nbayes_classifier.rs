use serde::{
    Serialize,
    Deserialize,
};

use crate::{Classifier, Sample};

use super::probability::Probability;


/// Naive Bayes classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NBayesClassifier<P> {
    pub(super) prior_p: f64,
    pub(super) prior_n: f64, // equals to `1.0 - prior_p`


    pub(super) cond_density_p: P,
    pub(super) cond_density_n: P,
}


impl<P> NBayesClassifier<P>
    where P: Probability
{
    /// Computes the joint log-probabilities `(ln P(x, 1), ln P(x, 0))`
    /// for the given instance.
    pub fn log_probabilities(&self, sample: &Sample, row: usize)
        -> (f64, f64)
    {
        let ln_p = self.prior_p.ln()
            + self.cond_density_p.log_probability(sample, row);
        let ln_n = self.prior_n.ln()
            + self.cond_density_n.log_probability(sample, row);

        (ln_p, ln_n)
    }
}


impl<P: Probability> Classifier for NBayesClassifier<P>
{
    fn predict_proba(&self, sample: &Sample, row: usize) -> [f64; 2] {
        let (ln_p, ln_n) = self.log_probabilities(sample, row);

        // Normalize in log-space.
        let max = ln_p.max(ln_n);
        let p = (ln_p - max).exp();
        let n = (ln_n - max).exp();
        let z = p + n;

        [n / z, p / z]
    }
}
