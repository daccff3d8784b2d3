//! Provides `WeakLearner` trait.
use crate::Sample;
use crate::error::Result;


/// An interface for weak learners.
/// A weak learner receives a sample and a distribution over it,
/// and returns a hypothesis fitted to the weighted sample.
///
/// # Required Methods
/// - [`WeakLearner::name`]
/// - [`WeakLearner::produce`]
/// - [`WeakLearner::info`] ... optional.
pub trait WeakLearner {
    /// The hypothesis type this weak learner returns.
    type Hypothesis;


    /// Returns the name of the weak learner.
    fn name(&self) -> &str;


    /// Returns the information of the weak learner as `String`.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// Returns a hypothesis fitted to `sample` weighted by `dist`.
    /// Examples with zero weight are ignored.
    /// A failure is reported as [`UBoostError::Fit`];
    /// the booster attaches the round index.
    ///
    /// [`UBoostError::Fit`]: crate::UBoostError::Fit
    fn produce(&self, sample: &Sample, dist: &[f64])
        -> Result<Self::Hypothesis>;
}
