//! Defines the inner representation
//! of the Decision Tree class.
use crate::{Classifier, Sample};


use crate::weak_learner::common::{
    type_and_struct::*,
    split_rule::*,
};


use serde::{Serialize, Deserialize};


/// Enumeration of `BranchNode` and `LeafNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A node that have two childrens.
    Branch(BranchNode),


    /// A node that have no child.
    Leaf(LeafNode),
}


/// Represents the branch nodes of decision tree.
/// Each `BranchNode` must have two childrens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    pub(super) rule: Splitter,
    pub(super) left: Box<Node>,
    pub(super) right: Box<Node>,
}


impl BranchNode {
    /// Returns the `BranchNode` from the given components.
    #[inline]
    pub(super) fn from_raw(
        rule: Splitter,
        left: Box<Node>,
        right: Box<Node>
    ) -> Self
    {
        Self { rule, left, right, }
    }
}


/// Represents the leaf nodes of decision tree.
/// A leaf predicts the weighted class frequencies
/// of the training examples that reached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub(super) proba: Proba,
}


impl LeafNode {
    /// Returns a `LeafNode` that predicts the probabilities
    /// given to this function.
    #[inline]
    pub(crate) fn from_raw(proba: Proba) -> Self {
        Self { proba }
    }
}


impl Node {
    #[inline]
    pub(super) fn leaf(mass: Mass) -> Self {
        Node::Leaf(LeafNode::from_raw(Proba::from_mass(mass)))
    }


    #[inline]
    pub(super) fn branch(rule: Splitter, left: Node, right: Node) -> Self {
        Node::Branch(BranchNode::from_raw(rule, Box::new(left), Box::new(right)))
    }


    /// Number of leaves under this node.
    pub(super) fn n_leaves(&self) -> usize {
        match self {
            Node::Branch(b) => b.left.n_leaves() + b.right.n_leaves(),
            Node::Leaf(_) => 1,
        }
    }


    /// Depth of the subtree rooted at this node.
    pub(super) fn depth(&self) -> usize {
        match self {
            Node::Branch(b) => 1 + b.left.depth().max(b.right.depth()),
            Node::Leaf(_) => 0,
        }
    }
}


impl Classifier for LeafNode {
    #[inline]
    fn predict_proba(&self, _sample: &Sample, _row: usize) -> [f64; 2] {
        self.proba.0
    }
}


impl Classifier for BranchNode {
    #[inline]
    fn predict_proba(&self, sample: &Sample, row: usize) -> [f64; 2] {
        match self.rule.split(sample, row) {
            LR::Left => self.left.predict_proba(sample, row),
            LR::Right => self.right.predict_proba(sample, row)
        }
    }
}


impl Classifier for Node {
    #[inline]
    fn predict_proba(&self, sample: &Sample, row: usize) -> [f64; 2] {
        match self {
            Node::Branch(ref node) => node.predict_proba(sample, row),
            Node::Leaf(ref node) => node.predict_proba(sample, row)
        }
    }
}
