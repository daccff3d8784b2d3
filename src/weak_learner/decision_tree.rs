//! Defines the decision tree weak learner
//! and the classifier it produces.

/// Defines the decision tree weak learner.
pub mod decision_tree_algorithm;
/// Defines the classifier produced by `DecisionTree`.
pub mod decision_tree_classifier;
/// Defines a builder of `DecisionTree`.
pub mod builder;

mod bin;
mod node;
mod criterion;


pub use decision_tree_algorithm::DecisionTree;
pub use decision_tree_classifier::DecisionTreeClassifier;
pub use builder::DecisionTreeBuilder;
pub use criterion::Criterion;
