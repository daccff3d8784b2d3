//! Provides some boosting algorithms.

mod core;

// ------------------------------------------------
// Classification
pub mod adaboost;
pub mod uboost;


/// Booster trait
pub use self::core::Booster;

pub use self::adaboost::AdaBoost;
pub use self::uboost::{
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
