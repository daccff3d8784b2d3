//! This file defines split rules for decision tree.
use serde::{Serialize, Deserialize};

use crate::weak_learner::type_and_struct::*;
use crate::Sample;


/// The output of the function `split` of `Splitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LR {
    Left,
    Right,
}


/// Sends an example to the left child iff
/// its value on `feature` is less than `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Splitter {
    pub(crate) feature: String,
    /// Column position of `feature` in the training sample.
    pub(crate) index: usize,
    pub(crate) threshold: Threshold,
}


impl Splitter {
    #[inline]
    pub(crate) fn new(name: &str, index: usize, threshold: Threshold) -> Self {
        let feature = name.to_string();
        Self {
            feature,
            index,
            threshold
        }
    }


    /// Defines the splitting.
    #[inline]
    pub fn split(&self, data: &Sample, row: usize) -> LR {
        let value = data.features()[self.index][row];

        if value < self.threshold.0 {
            LR::Left
        } else {
            LR::Right
        }
    }
}
