//! Defines the decision tree classifier.
use crate::{Classifier, FeatureImportance, Sample};


use super::node::*;
use serde::{Serialize, Deserialize};


/// Decision tree classifier.
/// This struct is a wrapper of `Node`
/// that also keeps the importance of each column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    root: Node,
    importances: Vec<f64>,
}


impl DecisionTreeClassifier {
    #[inline]
    pub(super) fn from_components(root: Node, importances: Vec<f64>) -> Self {
        Self { root, importances }
    }


    /// Returns the number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }


    /// Returns the depth of the tree.
    /// A tree with a single leaf has depth `0`.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}


impl Classifier for DecisionTreeClassifier {
    fn predict_proba(&self, sample: &Sample, row: usize) -> [f64; 2] {
        self.root.predict_proba(sample, row)
    }
}


impl FeatureImportance for DecisionTreeClassifier {
    fn feature_importances(&self) -> Vec<f64> {
        self.importances.clone()
    }
}
