#![warn(missing_docs)]

//!
//! A crate that provides uBoost,
//! a boosting algorithm whose selection efficiency is
//! approximately uniform along a chosen set of features
//! (the *uniform variables*).
//!
//! Standard boosting classifiers learn to exploit every feature,
//! so the fraction of signal examples they select varies
//! strongly along the uniform variables.
//! uBoost adds a second reweighting per round that boosts
//! the examples whose neighbourhood is selected less often
//! than the target efficiency.
//!
//! This crate includes
//!
//! - [`UBoostBDT`]: uBoost at a single target efficiency,
//! - [`UBoostClassifier`]: several `UBoostBDT`s over a grid of efficiencies,
//! - [`AdaBoost`]: the SAMME/SAMME.R baseline,
//! - [`DecisionTree`] and [`GaussianNB`] weak learners,
//! - [`NeighborhoodIndex`], a k-nearest-neighbour index
//!   on the uniform variables,
//! - [`metrics`] and a synthetic [`SampleGenerator`].
//!
//! # Example
//! ```no_run
//! use uboost::prelude::*;
//!
//! let train = SampleGenerator::new(3000).seed(1).generate().unwrap();
//! let test = SampleGenerator::new(3000).seed(2).generate().unwrap();
//!
//! let params = UBoostParams::new(["column0"])
//!     .target_efficiency(0.5)
//!     .n_neighbors(50)
//!     .n_estimators(50)
//!     .algorithm(Algorithm::Samme);
//! let tree = DecisionTreeBuilder::new()
//!     .max_depth(4)
//!     .build();
//!
//! let mut booster = UBoostBDT::init(&train, params).unwrap();
//! let model = booster.run(&tree).unwrap();
//!
//! let proba = model.predict_proba(&test).unwrap();
//! let p1 = proba.iter().map(|p| p[1]).collect::<Vec<_>>();
//! let auc = roc_auc_score(test.target(), &p1).unwrap();
//! println!("ROC AUC: {auc}");
//! ```

pub mod error;
pub mod sample;
pub mod neighbors;
pub mod hypothesis;
pub mod weak_learner;
pub mod booster;
pub mod metrics;
pub mod research;
pub mod prelude;

mod common;


/// A struct that returns [`Sample`].
/// Using this struct, one can read a CSV format file to [`Sample`].
/// # Example
/// The following code is a simple example to read a CSV file.
/// ```no_run
/// use uboost::SampleReader;
/// let filename = "/path/to/csv/file.csv";
/// let sample = SampleReader::new()
///     .file(filename)
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
/// ```
pub use sample::{
    SampleReader,
    Sample,
    Feature,
    SampleGenerator,
};

pub use error::{Result, UBoostError};

pub use neighbors::{NeighborhoodIndex, NeighborTable};

pub use hypothesis::{
    Algorithm,
    Classifier,
    FeatureImportance,
    StagedClassifier,
    StagedScores,
    WeightedMajority,
};

pub use weak_learner::{
    WeakLearner,
    Criterion,
    DecisionTree,
    DecisionTreeBuilder,
    DecisionTreeClassifier,
    GaussianNB,
    NBayesClassifier,
};

pub use booster::{
    Booster,
    AdaBoost,
    Aggregation,
    EfficiencyEstimator,
    KnnEfficiency,
    UBoostBDT,
    UBoostClassifier,
    UBoostClassifierModel,
    UBoostModel,
    UBoostParams,
    UniformLabel,
};
