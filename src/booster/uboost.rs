//! Defines uBoost, a boosting algorithm whose selection efficiency
//! is approximately uniform along a chosen set of features.
//!
//! This implementation is based on the paper:
//! [uBoost: A boosting method for producing uniform selection
//! efficiencies from multivariate
//! classifiers](https://arxiv.org/abs/1305.7248)
//! by J. Stevens and M. Williams.
//!
//! - [`UBoostBDT`] trains one ensemble at a fixed target efficiency.
//! - [`UBoostClassifier`] trains several of them at different efficiencies
//!   and aggregates their decisions.

mod params;
mod cut;
mod efficiency;
mod bdt;
mod classifier;


pub use params::{UBoostParams, UniformLabel};
pub use cut::cut_for_efficiency;
pub use efficiency::{EfficiencyEstimator, KnnEfficiency};
pub use bdt::{UBoostBDT, UBoostModel};
pub use classifier::{Aggregation, UBoostClassifier, UBoostClassifierModel};
