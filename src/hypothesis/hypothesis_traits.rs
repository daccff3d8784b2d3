use crate::Sample;
use crate::error::Result;


/// A trait that defines the behavor of a weak classifier.
/// You only need to implement `predict_proba` method.
/// Labels are `0` (background) and `1` (signal).
pub trait Classifier {
    /// Computes the class probabilities `[P(0), P(1)]`
    /// of the `row`-th example of `sample`.
    fn predict_proba(&self, sample: &Sample, row: usize) -> [f64; 2];


    /// Predicts the label of the `row`-th example.
    fn predict(&self, sample: &Sample, row: usize) -> i64 {
        let [_, p1] = self.predict_proba(sample, row);
        if p1 > 0.5 { 1 } else { 0 }
    }


    /// Computes the class probabilities of every example.
    fn predict_proba_all(&self, sample: &Sample) -> Vec<[f64; 2]> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict_proba(sample, row))
            .collect::<Vec<_>>()
    }


    /// Predicts the labels of every example.
    fn predict_all(&self, sample: &Sample) -> Vec<i64>
    {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict(sample, row))
            .collect::<Vec<_>>()
    }
}


/// Hypotheses that rate their input columns.
pub trait FeatureImportance {
    /// Returns one non-negative value per column the hypothesis reads,
    /// summing to `1` unless every entry is zero.
    fn feature_importances(&self) -> Vec<f64>;
}


/// A trained model that predicts a whole sample at once
/// and can replay its predictions stage by stage.
pub trait StagedClassifier {
    /// Computes the class probabilities `[P(0), P(1)]` of every example.
    fn predict_proba(&self, sample: &Sample) -> Result<Vec<[f64; 2]>>;


    /// Returns the class probabilities after each stage.
    /// Every call returns a fresh iterator;
    /// its last item equals [`StagedClassifier::predict_proba`].
    fn staged_predict_proba<'a>(&'a self, sample: &'a Sample)
        -> Result<Box<dyn Iterator<Item = Vec<[f64; 2]>> + 'a>>;


    /// Predicts the labels of every example.
    /// An example is labeled `1` iff `P(1) > 0.5`.
    fn predict(&self, sample: &Sample) -> Result<Vec<i64>> {
        let labels = self.predict_proba(sample)?
            .into_iter()
            .map(|[_, p1]| if p1 > 0.5 { 1 } else { 0 })
            .collect();
        Ok(labels)
    }
}
