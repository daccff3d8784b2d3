//! The files in `weak_learner/` directory defines
//! `WeakLearner` trait and weak learners.

/// Provides WeakLearner trait.
pub mod core;

pub(crate) mod common;

/// Defines Decision Tree.
pub mod decision_tree;

/// Defines Naive Bayes.
pub mod naive_bayes;


pub use self::core::WeakLearner;

pub use self::decision_tree::{
    Criterion,
    DecisionTree,
    DecisionTreeBuilder,
    DecisionTreeClassifier,
};

pub use self::naive_bayes::{
    GaussianNB,
    NBayesClassifier,
};

pub(crate) use common::type_and_struct;
