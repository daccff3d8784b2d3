use crate::weak_learner::common::type_and_struct::*;
use super::criterion::*;
use super::decision_tree_algorithm::DecisionTree;


/// The number of bins set as default.
pub const DEFAULT_NBIN: usize = 255;
/// The maxmial depth set as default.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// The minimal number of examples in a leaf set as default.
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 1;


/// A struct that builds `DecisionTree`.
/// `DecisionTreeBuilder` keeps parameters for constructing `DecisionTree`.
///
/// # Example
///
/// ```
/// use uboost::prelude::*;
///
/// let weak_learner = DecisionTreeBuilder::new()
///     .max_depth(6)
///     .min_samples_leaf(10)
///     .criterion(Criterion::Entropy)
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct DecisionTreeBuilder {
    n_bins: usize,
    max_depth: Depth,
    min_samples_leaf: usize,
    criterion: Criterion,
}


impl Default for DecisionTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}


impl DecisionTreeBuilder {
    /// Construct a new instance of [`DecisionTreeBuilder`].
    /// By default, [`DecisionTreeBuilder`] sets the parameters as follows;
    /// ```text
    /// n_bins: DEFAULT_NBIN == 255,
    /// max_depth: DEFAULT_MAX_DEPTH == 3,
    /// min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF == 1,
    /// criterion: Criterion::Entropy,
    /// ```
    pub fn new() -> Self {
        Self {
            n_bins: DEFAULT_NBIN,
            max_depth: Depth::from(DEFAULT_MAX_DEPTH),
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            criterion: Criterion::Entropy,
        }
    }


    /// Specify the maximal depth of the tree.
    /// A tree of depth `0` is a single leaf.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Depth::from(depth);
        self
    }


    /// Specify the minimal number of examples in a leaf.
    /// Values below `1` are treated as `1`.
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf.max(1);
        self
    }


    /// Set the node splitting rule.
    /// Default value is `Criterion::Entropy`.
    /// See [`Criterion`] for other rules.
    #[inline]
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }


    /// Set the number of bins per feature.
    /// By default, each feature is binned in `255` bins.
    pub fn n_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins.max(1);
        self
    }


    /// Build a `DecisionTree`.
    /// This method consumes `self`.
    pub fn build(self) -> DecisionTree {
        DecisionTree::from_components(
            self.n_bins,
            self.criterion,
            self.max_depth,
            self.min_samples_leaf,
        )
    }
}
