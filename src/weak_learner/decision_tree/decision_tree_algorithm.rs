use rayon::prelude::*;


use crate::{Sample, WeakLearner};
use crate::error::{Result, UBoostError};
use crate::common::checker;
use super::bin::*;


use crate::weak_learner::common::{
    type_and_struct::*,
    split_rule::*,
};
use super::{
    node::*,
    criterion::*,
    decision_tree_classifier::DecisionTreeClassifier,
};


use std::fmt;


/// The Decision Tree algorithm.
/// Given a set of training examples for classification
/// and a distribution over the set,
/// [`DecisionTree`] outputs a decision tree classifier
/// named [`DecisionTreeClassifier`]
/// under the specified parameters.
///
/// The code is based on the book:
/// [Classification and Regression
/// Trees](https://www.amazon.com/Classification-Regression-Wadsworth-Statistics-Probability/dp/0412048418)
/// by Leo Breiman, Jerome H. Friedman, Richard A. Olshen, and Charles J. Stone.
///
/// Each feature is cut into bins of the same width
/// over the examples of positive weight.
/// A leaf predicts the weighted class frequencies of its examples.
///
/// [`DecisionTree`] is constructed
/// by [`DecisionTreeBuilder`](crate::weak_learner::DecisionTreeBuilder).
///
/// # Example
/// ```
/// use uboost::prelude::*;
///
/// let sample = SampleGenerator::new(200).generate().unwrap();
///
/// // In this example, the output tree is at most depth 2.
/// let tree = DecisionTreeBuilder::new()
///     .max_depth(2)
///     .criterion(Criterion::Entropy)
///     .build();
///
/// let n_sample = sample.shape().0;
/// let dist = vec![1f64 / n_sample as f64; n_sample];
/// let f = tree.produce(&sample, &dist).unwrap();
///
/// let predictions = f.predict_all(&sample);
///
/// let loss = sample.target()
///     .iter()
///     .zip(predictions)
///     .map(|(ty, py)| if *ty == py as f64 { 0f64 } else { 1f64 })
///     .sum::<f64>()
///     / n_sample as f64;
/// assert!(loss < 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct DecisionTree {
    n_bins: usize,
    criterion: Criterion,
    max_depth: Depth,
    min_samples_leaf: usize,
}


/// Read-only state shared by the recursion of `grow`.
struct Grower<'a> {
    sample: &'a Sample,
    dist: &'a [f64],
    bins: Vec<Bins>,
    /// `bin_ids[j][i]` is the bin of the `i`-th example on feature `j`.
    bin_ids: Vec<Vec<usize>>,
    total_mass: f64,
}


impl DecisionTree {
    /// Initialize [`DecisionTree`].
    /// This method is called only via `DecisionTreeBuilder::build`.
    #[inline]
    pub(super) fn from_components(
        n_bins: usize,
        criterion: Criterion,
        max_depth: Depth,
        min_samples_leaf: usize,
    ) -> Self
    {
        Self { n_bins, criterion, max_depth, min_samples_leaf, }
    }


    /// Grow a tree of depth at most `depth` on the examples `indices`.
    /// The impurity decrease of each split is added to `importances`.
    fn grow(
        &self,
        grower: &Grower<'_>,
        indices: Vec<usize>,
        depth: Depth,
        importances: &mut [f64],
    ) -> Node
    {
        let target = grower.sample.target();
        let mut mass = Mass::default();
        for &i in indices.iter() {
            mass.push(target[i], grower.dist[i]);
        }

        let impurity = self.criterion.impurity(&mass);


        // Pure nodes, small nodes, and nodes at the maximal depth
        // become leaves.
        if impurity <= 0.0
            || depth == 0
            || indices.len() < 2 * self.min_samples_leaf
        {
            return Node::leaf(mass);
        }


        // Find the best pair of feature and threshold
        // based on the `criterion`.
        let candidates = grower.sample.features()
            .par_iter()
            .enumerate()
            .map(|(j, feature)| {
                let pack = grower.bins[j].pack(
                    &indices[..],
                    &grower.bin_ids[j][..],
                    feature.values(),
                    target,
                    grower.dist,
                );
                self.criterion.best_split(&pack, self.min_samples_leaf)
                    .map(|split| (j, split))
            })
            .collect::<Vec<_>>();

        // Smallest score first, then smallest column.
        let best = candidates.into_iter()
            .flatten()
            .fold(None, |best: Option<(usize, Split)>, (j, split)| {
                match best {
                    Some((_, b)) if b.score <= split.score => best,
                    _ => Some((j, split)),
                }
            });

        let Some((j, split)) = best else {
            return Node::leaf(mass);
        };


        // If the split has no gain, construct a leaf node.
        if split.score >= impurity {
            return Node::leaf(mass);
        }


        // Construct the splitting rule
        // from the best feature and threshold.
        let name = grower.sample.features()[j].name();
        let rule = Splitter::new(name, j, split.threshold);


        // Split the train data for left/right childrens
        let mut lindices = Vec::new();
        let mut rindices = Vec::new();
        for i in indices {
            match rule.split(grower.sample, i) {
                LR::Left  => { lindices.push(i); },
                LR::Right => { rindices.push(i); },
            }
        }


        // If the split has no meaning, construct a leaf node.
        if lindices.is_empty() || rindices.is_empty() {
            return Node::leaf(mass);
        }


        let node_mass = mass.total();
        importances[j] += node_mass * (impurity - split.score)
            / grower.total_mass;


        let depth = depth - 1;
        let ltree = self.grow(grower, lindices, depth, importances);
        let rtree = self.grow(grower, rindices, depth, importances);

        Node::branch(rule, ltree, rtree)
    }
}


impl WeakLearner for DecisionTree {
    type Hypothesis = DecisionTreeClassifier;


    fn name(&self) -> &str {
        "Decision Tree"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let info = Vec::from([
            ("# of bins (max)", format!("{}", self.n_bins)),
            ("Max depth", format!("{}", self.max_depth)),
            ("Min samples in leaf", format!("{}", self.min_samples_leaf)),
            ("Split criterion", format!("{}", self.criterion)),
        ]);
        Some(info)
    }


    /// This method computes as follows;
    /// 1. cut each feature into bins over the examples of positive weight,
    /// 2. grow the tree recursively from the root,
    /// 3. normalize the impurity decreases into feature importances.
    fn produce(&self, sample: &Sample, dist: &[f64])
        -> Result<Self::Hypothesis>
    {
        let n_sample = sample.shape().0;
        checker::check_distribution(dist, n_sample)?;

        let indices = (0..n_sample).filter(|&i| dist[i] > 0f64)
            .collect::<Vec<usize>>();
        let total_mass = indices.iter().map(|&i| dist[i]).sum::<f64>();
        if indices.is_empty() || total_mass <= 0.0 {
            return Err(UBoostError::fit(
                0, "the distribution has no positive mass"
            ));
        }


        let bins = sample.features()
            .par_iter()
            .map(|feature| {
                let values = indices.iter().map(|&i| feature[i]);
                Bins::cut(values, self.n_bins)
            })
            .collect::<Vec<_>>();
        let bin_ids = sample.features()
            .par_iter()
            .zip(&bins)
            .map(|(feature, bin)| {
                feature.iter()
                    .map(|&x| bin.index(x))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let grower = Grower { sample, dist, bins, bin_ids, total_mass };


        let mut importances = vec![0.0; sample.shape().1];
        let root = self.grow(&grower, indices, self.max_depth, &mut importances);

        let z = importances.iter().sum::<f64>();
        if z > 0.0 {
            importances.iter_mut().for_each(|imp| { *imp /= z; });
        }

        Ok(DecisionTreeClassifier::from_components(root, importances))
    }
}


impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\
            ----------\n\
            # Decision Tree Weak Learner\n\n\
            - Max depth: {}\n\
            - Min samples in leaf: {}\n\
            - Splitting criterion: {}\n\
            - Bins per feature: {}\n\
            ----------\
            ",
            self.max_depth,
            self.min_samples_leaf,
            self.criterion,
            self.n_bins,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Classifier, FeatureImportance, SampleGenerator};
    use crate::weak_learner::DecisionTreeBuilder;

    fn stairs() -> Sample {
        // `y = 1` iff `x >= 5`; the column `noise` is useless.
        let x = (0..10).map(|i| i as f64).collect::<Vec<_>>();
        let noise = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let y = x.iter().map(|&v| if v >= 5.0 { 1.0 } else { 0.0 }).collect();
        Sample::from_columns(vec![("noise", noise), ("x", x)], y).unwrap()
    }

    #[test]
    fn test_fits_a_threshold() {
        let sample = stairs();
        let dist = vec![0.1; 10];
        let tree = DecisionTreeBuilder::new().max_depth(1).build();
        let f = tree.produce(&sample, &dist).unwrap();

        let result = f.predict_all(&sample);
        let expect = vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");

        let result = f.feature_importances();
        let expect = vec![0.0, 1.0];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
        assert_eq!(f.depth(), 1);
    }

    #[test]
    fn test_zero_weights_are_ignored() {
        let sample = stairs();
        // Only rows 0 and 9 matter.
        let mut dist = vec![0.0; 10];
        dist[0] = 0.5;
        dist[9] = 0.5;
        let tree = DecisionTreeBuilder::new().max_depth(3).build();
        let f = tree.produce(&sample, &dist).unwrap();
        assert_eq!(f.n_leaves(), 2);
        assert_eq!(f.predict(&sample, 0), 0);
        assert_eq!(f.predict(&sample, 9), 1);
    }

    #[test]
    fn test_no_mass() {
        let sample = stairs();
        let tree = DecisionTreeBuilder::new().build();
        let result = tree.produce(&sample, &[0.0; 10]);
        assert!(matches!(result, Err(UBoostError::Fit { .. })));
    }

    #[test]
    fn test_min_samples_leaf() {
        let sample = SampleGenerator::new(200).generate().unwrap();
        let dist = vec![1.0 / 200.0; 200];
        let tree = DecisionTreeBuilder::new()
            .max_depth(8)
            .min_samples_leaf(40)
            .build();
        let f = tree.produce(&sample, &dist).unwrap();
        assert!(f.n_leaves() <= 5, "{} leaves", f.n_leaves());
    }

    #[test]
    fn test_leaf_probabilities() {
        let sample = stairs();
        let dist = vec![0.1; 10];
        let f = DecisionTreeBuilder::new()
            .max_depth(0)
            .build()
            .produce(&sample, &dist)
            .unwrap();
        let [p0, p1] = f.predict_proba(&sample, 3);
        assert!((p0 - 0.5).abs() < 1e-12 && (p1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_importances_sum_to_one() {
        let sample = SampleGenerator::new(300).n_features(4).generate().unwrap();
        let dist = vec![1.0 / 300.0; 300];
        let f = DecisionTreeBuilder::new().max_depth(4).build()
            .produce(&sample, &dist)
            .unwrap();
        let imp = f.feature_importances();
        assert_eq!(imp.len(), 4);
        let z = imp.iter().sum::<f64>();
        assert!((z - 1.0).abs() < 1e-9, "sum of importances is {z}");
    }
}
