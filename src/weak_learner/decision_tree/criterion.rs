//! Splitting criteria of the decision tree.

use serde::{Serialize, Deserialize};

use std::fmt;

use super::bin::BinStat;
use crate::weak_learner::type_and_struct::*;


/// Splitting criteria for growing decision tree.
/// * `Criterion::Entropy` minimizes entropic impurity for given distribution.
/// * `Criterion::Gini` minimizes Gini impurity for given distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Criterion {
    /// Binary entropy function.
    #[default]
    Entropy,
    /// Gini index.
    Gini,
}


impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entropy => "Entropy",
            Self::Gini => "Gini index",
        };

        write!(f, "{name}")
    }
}


/// The best split of a node on one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Split {
    pub(super) threshold: Threshold,
    /// Weighted impurity of the children.
    pub(super) score: f64,
}


impl Criterion {
    /// Returns the impurity of a node with class masses `mass`.
    #[inline(always)]
    pub(super) fn impurity(&self, mass: &Mass) -> f64 {
        match self {
            Criterion::Entropy => entropic_impurity(mass),
            Criterion::Gini => gini_impurity(mass),
        }
    }


    /// Scan the bins from left to right and return the split
    /// minimizing the weighted impurity of the children.
    /// Each child must have at least `min_samples_leaf` examples.
    pub(super) fn best_split(&self, pack: &[BinStat], min_samples_leaf: usize)
        -> Option<Split>
    {
        let (total, n_total) = pack.iter()
            .fold((Mass::default(), 0), |(m, n), stat| {
                (m + stat.mass, n + stat.count)
            });
        let weight_sum = total.total();
        if weight_sum <= 0.0 { return None; }


        let mut left = Mass::default();
        let mut n_left = 0;
        let mut left_max = f64::MIN;
        let mut best: Option<Split> = None;

        let mut iter = pack.iter()
            .filter(|stat| stat.count > 0)
            .peekable();
        while let Some(stat) = iter.next() {
            left = left + stat.mass;
            n_left += stat.count;
            left_max = left_max.max(stat.max);

            let Some(next) = iter.peek() else { break; };

            let n_right = n_total - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let right = total - left;
            let lp = left.total() / weight_sum;
            let rp = (1.0 - lp).max(0.0);
            let score = lp * self.impurity(&left)
                + rp * self.impurity(&right);

            if best.map_or(true, |b| score < b.score) {
                let threshold = midpoint(left_max, next.min);
                best = Some(Split { threshold, score });
            }
        }
        best
    }
}


/// A threshold `t` with `left_max < t <= right_min`.
#[inline(always)]
fn midpoint(left_max: f64, right_min: f64) -> Threshold {
    let mid = left_max + (right_min - left_max) / 2.0;
    if mid <= left_max {
        Threshold::from(right_min)
    } else {
        Threshold::from(mid)
    }
}


/// Returns the entropic-impurity of the given mass.
#[inline(always)]
fn entropic_impurity(mass: &Mass) -> f64 {
    let total = mass.total();
    if total <= 0.0 { return 0.0; }

    mass.0.iter()
        .map(|&p| {
            let r = p / total;
            if r <= 0.0 { 0.0 } else { -r * r.ln() }
        })
        .sum::<f64>()
}


/// Returns the gini-impurity of the given mass.
#[inline(always)]
fn gini_impurity(mass: &Mass) -> f64 {
    let total = mass.total();
    if total <= 0.0 { return 0.0; }

    let correct = mass.0.iter()
        .map(|&w| (w / total).powi(2))
        .sum::<f64>();

    (1.0 - correct).max(0.0)
}
