use serde::{Serialize, Deserialize};

use crate::Algorithm;
use crate::common::checker;
use crate::error::{Result, UBoostError};
use crate::sample::{Sample, BACKGROUND, SIGNAL};


/// The class whose efficiency is kept uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UniformLabel {
    /// Signal examples, labeled `1`.
    #[default]
    Signal,
    /// Background examples, labeled `0`.
    Background,
}


impl UniformLabel {
    /// Returns the label value in the target column.
    pub fn label(&self) -> f64 {
        match self {
            Self::Signal => SIGNAL,
            Self::Background => BACKGROUND,
        }
    }


    /// `+1` for signal, `-1` for background.
    /// Background examples "pass" a cut when their score is below it.
    pub(crate) fn sign(&self) -> f64 {
        match self {
            Self::Signal => 1.0,
            Self::Background => -1.0,
        }
    }
}


/// Parameters of [`UBoostBDT`](super::UBoostBDT).
///
/// # Example
/// ```
/// use uboost::prelude::*;
///
/// let params = UBoostParams::new(["column0"])
///     .target_efficiency(0.7)
///     .n_neighbors(20)
///     .n_estimators(20)
///     .algorithm(Algorithm::SammeR);
/// assert_eq!(params.get_n_estimators(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UBoostParams {
    pub(crate) uniform_variables: Vec<String>,
    pub(crate) uniform_label: UniformLabel,
    pub(crate) target_efficiency: f64,
    pub(crate) n_neighbors: usize,
    pub(crate) n_estimators: usize,
    pub(crate) learning_rate: f64,
    pub(crate) algorithm: Algorithm,
    pub(crate) train_features: Option<Vec<String>>,
}


impl Default for UBoostParams {
    /// Default parameters.
    /// The set of uniform variables is empty and must be set.
    fn default() -> Self {
        Self {
            uniform_variables: Vec::new(),
            uniform_label: UniformLabel::Signal,
            target_efficiency: 0.5,
            n_neighbors: 50,
            n_estimators: 50,
            learning_rate: 1.0,
            algorithm: Algorithm::Samme,
            train_features: None,
        }
    }
}


impl UBoostParams {
    /// Construct the default parameters
    /// with the uniform variables `uniform_variables`.
    pub fn new<I, S>(uniform_variables: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        Self::default().uniform_variables(uniform_variables)
    }


    /// Set the columns along which the efficiency must be uniform.
    pub fn uniform_variables<I, S>(mut self, uniform_variables: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        self.uniform_variables = uniform_variables.into_iter()
            .map(|s| s.to_string())
            .collect();
        self
    }


    /// Set the class whose efficiency is kept uniform.
    /// Default is [`UniformLabel::Signal`].
    pub fn uniform_label(mut self, uniform_label: UniformLabel) -> Self {
        self.uniform_label = uniform_label;
        self
    }


    /// Set the global efficiency targeted by the cut.
    /// Must be in `(0, 1)`. Default is `0.5`.
    pub fn target_efficiency(mut self, target_efficiency: f64) -> Self {
        self.target_efficiency = target_efficiency;
        self
    }


    /// Set the number of neighbours used to estimate local efficiencies.
    /// Neighbours are drawn from the uniform class,
    /// the example itself included unless `n_neighbors`
    /// duplicates of it precede it. Default is `50`.
    pub fn n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }


    /// Set the number of boosting rounds. Default is `50`.
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }


    /// Set the shrinkage of the hypothesis coefficients. Default is `1`.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }


    /// Set the boosting rule. Default is [`Algorithm::Samme`].
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }


    /// Restrict the columns the weak learner sees.
    /// By default, the weak learner sees every column.
    pub fn train_features<I, S>(mut self, train_features: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        let features = train_features.into_iter()
            .map(|s| s.to_string())
            .collect();
        self.train_features = Some(features);
        self
    }


    /// Returns the uniform variables.
    pub fn get_uniform_variables(&self) -> &[String] {
        &self.uniform_variables[..]
    }


    /// Returns the class whose efficiency is kept uniform.
    pub fn get_uniform_label(&self) -> UniformLabel {
        self.uniform_label
    }


    /// Returns the target efficiency.
    pub fn get_target_efficiency(&self) -> f64 {
        self.target_efficiency
    }


    /// Returns the number of neighbours.
    pub fn get_n_neighbors(&self) -> usize {
        self.n_neighbors
    }


    /// Returns the number of boosting rounds.
    pub fn get_n_estimators(&self) -> usize {
        self.n_estimators
    }


    /// Returns the learning rate.
    pub fn get_learning_rate(&self) -> f64 {
        self.learning_rate
    }


    /// Returns the boosting rule.
    pub fn get_algorithm(&self) -> Algorithm {
        self.algorithm
    }


    /// Returns the columns the weak learner sees, if restricted.
    pub fn get_train_features(&self) -> Option<&[String]> {
        self.train_features.as_deref()
    }


    /// Check the parameters that do not depend on a sample.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.uniform_variables.is_empty() {
            return Err(UBoostError::invalid_config(
                "uniform_variables", "must not be empty"
            ));
        }
        checker::check_open_unit("target_efficiency", self.target_efficiency)?;
        checker::check_count("n_neighbors", self.n_neighbors)?;
        checker::check_count("n_estimators", self.n_estimators)?;
        checker::check_positive("learning_rate", self.learning_rate)?;

        if let Some(features) = self.train_features.as_ref() {
            if features.is_empty() {
                return Err(UBoostError::invalid_config(
                    "train_features", "must not be empty"
                ));
            }
        }
        Ok(())
    }


    /// Check the parameters against the training sample.
    pub(crate) fn validate_against(&self, sample: &Sample) -> Result<()> {
        self.validate()?;
        checker::check_sample(sample)?;

        let names = self.uniform_variables.iter()
            .map(|name| ("uniform_variables", name))
            .chain(
                self.train_features.iter()
                    .flatten()
                    .map(|name| ("train_features", name))
            );
        for (parameter, name) in names {
            if sample.column_index(name).is_none() {
                return Err(UBoostError::invalid_config(
                    parameter,
                    format!("column `{name}` does not exist"),
                ));
            }
        }

        // Only the uniform class needs a neighbour table.
        let label = self.uniform_label.label();
        let n_label = sample.target()
            .iter()
            .filter(|&&y| y == label)
            .count();
        if n_label < self.n_neighbors {
            return Err(UBoostError::invalid_config(
                "n_neighbors",
                format!(
                    "must not exceed the size of the uniform class, \
                     got {} but class {label} has {n_label} rows",
                    self.n_neighbors,
                ),
            ));
        }
        Ok(())
    }
}
