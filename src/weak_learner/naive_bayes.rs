/// Defines Naive Bayes classifier.
mod nbayes;
/// Defines Naive Bayes Classifiers returned by `GaussianNB`.
mod nbayes_classifier;

/// Defines probability density functions.
mod probability;

pub use nbayes::GaussianNB;
pub use nbayes_classifier::NBayesClassifier;
pub use probability::{Gaussian, Probability};
