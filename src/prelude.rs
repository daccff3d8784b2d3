//! Exports the boosting algorithms, weak learners, and traits.
//!
pub use crate::booster::{
    // Booster trait
    Booster,


    // Baseline
    AdaBoost,


    // uBoost
    UBoostBDT,
    UBoostModel,
    UBoostClassifier,
    UBoostClassifierModel,
    UBoostParams,
    UniformLabel,
    Aggregation,
    EfficiencyEstimator,
    KnnEfficiency,
};


pub use crate::weak_learner::{
    // Weak Learner trait
    WeakLearner,


    // Decision tree
    DecisionTree,
    DecisionTreeBuilder,
    DecisionTreeClassifier,
    Criterion,


    // Naive Bayes
    GaussianNB,
    NBayesClassifier,
};


pub use crate::hypothesis::{
    Algorithm,
    Classifier,
    FeatureImportance,
    StagedClassifier,
    WeightedMajority,
};


pub use crate::sample::{
    Sample,
    SampleGenerator,
    SampleReader,
};


pub use crate::metrics::{
    accuracy_score,
    roc_auc_score,
    uniformity_mse,
};


pub use crate::error::UBoostError;
