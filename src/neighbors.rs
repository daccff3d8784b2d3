//! k-nearest-neighbour lookups over a subset of columns.
//!
//! [`NeighborhoodIndex`] is a KD-tree with brute-force leaves.
//! Distances are squared Euclidean distances and
//! ties are broken by the row index,
//! so the answer of a query is unique.
//!
//! [`NeighborTable`] precomputes, for every row of a sample,
//! the `k` nearest rows that share its label.
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Result, UBoostError};
use crate::sample::Sample;


/// Maximum number of rows stored in a leaf.
const LEAF_SIZE: usize = 16;


#[derive(Debug, Clone)]
enum KdNode {
    Leaf {
        rows: Vec<usize>,
    },
    Split {
        axis: usize,
        value: f64,
        row: usize,
        left: Box<KdNode>,
        right: Box<KdNode>,
    },
}


/// Max-heap entry ordered by `(distance, row)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    dist: f64,
    row: usize,
}


impl Eq for Candidate {}


impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}


impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.total_cmp(&other.dist)
            .then(self.row.cmp(&other.row))
    }
}


/// A KD-tree over some columns of a [`Sample`].
/// Only the rows of the candidate pool are returned by queries,
/// but every row of the sample can be used as a query point.
#[derive(Debug, Clone)]
pub struct NeighborhoodIndex {
    dim: usize,
    /// Coordinates of every row of the sample, row-major.
    points: Vec<f64>,
    pool_size: usize,
    root: Option<KdNode>,
}


impl NeighborhoodIndex {
    /// Index all rows of `sample` on the columns `uniform_columns`.
    pub fn build<S>(sample: &Sample, uniform_columns: &[S]) -> Result<Self>
        where S: AsRef<str>
    {
        let pool = (0..sample.shape().0).collect::<Vec<_>>();
        Self::build_with_pool(sample, uniform_columns, pool)
    }


    /// Index the rows `pool` of `sample` on the columns `uniform_columns`.
    pub fn build_with_pool<S>(
        sample: &Sample,
        uniform_columns: &[S],
        mut pool: Vec<usize>,
    ) -> Result<Self>
        where S: AsRef<str>
    {
        let columns = resolve_columns(sample, uniform_columns)?;
        let (n_sample, _) = sample.shape();

        if let Some(&row) = pool.iter().find(|&&r| r >= n_sample) {
            return Err(UBoostError::invalid_config(
                "pool",
                format!("row {row} is out of range (n_sample = {n_sample})"),
            ));
        }
        pool.sort_unstable();
        pool.dedup();

        let dim = columns.len();
        let mut points = Vec::with_capacity(n_sample * dim);
        for i in 0..n_sample {
            points.extend(columns.iter().map(|&j| sample.features()[j][i]));
        }

        let pool_size = pool.len();
        let mut index = Self { dim, points, pool_size, root: None, };
        if !pool.is_empty() {
            index.root = Some(index.build_node(&mut pool[..], 0));
        }
        Ok(index)
    }


    /// Number of candidate rows.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }


    fn point(&self, row: usize) -> &[f64] {
        &self.points[row * self.dim..(row + 1) * self.dim]
    }


    fn build_node(&self, rows: &mut [usize], depth: usize) -> KdNode {
        if rows.len() <= LEAF_SIZE {
            return KdNode::Leaf { rows: rows.to_vec() };
        }

        let axis = depth % self.dim;
        rows.sort_unstable_by(|&a, &b| {
            self.point(a)[axis].total_cmp(&self.point(b)[axis])
                .then(a.cmp(&b))
        });

        let mid = rows.len() / 2;
        let row = rows[mid];
        let value = self.point(row)[axis];

        let (left, rest) = rows.split_at_mut(mid);
        let right = &mut rest[1..];

        let left = Box::new(self.build_node(left, depth + 1));
        let right = Box::new(self.build_node(right, depth + 1));

        KdNode::Split { axis, value, row, left, right }
    }


    /// Returns the `k` nearest candidates of the `row`-th example,
    /// ordered by distance and then by row index.
    /// If `row` is a candidate, it is the first element.
    pub fn query(&self, row: usize, k: usize) -> Result<Vec<usize>> {
        let n_sample = self.points.len() / self.dim;
        if row >= n_sample {
            return Err(UBoostError::shape_mismatch(
                format!("row index below {n_sample}"),
                format!("row index {row}"),
            ));
        }
        self.nearest(self.point(row), k)
    }


    /// Returns the `k` nearest candidates of an arbitrary point.
    pub fn query_point(&self, point: &[f64], k: usize) -> Result<Vec<usize>> {
        if point.len() != self.dim {
            return Err(UBoostError::shape_mismatch(
                format!("a point of dimension {}", self.dim),
                format!("dimension {}", point.len()),
            ));
        }
        self.nearest(point, k)
    }


    fn nearest(&self, point: &[f64], k: usize) -> Result<Vec<usize>> {
        check_k(k, self.pool_size)?;

        let mut heap = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root.as_ref() {
            self.search(root, point, k, &mut heap);
        }

        let rows = heap.into_sorted_vec()
            .into_iter()
            .map(|c| c.row)
            .collect();
        Ok(rows)
    }


    fn offer(&self, point: &[f64], row: usize, k: usize, heap: &mut BinaryHeap<Candidate>) {
        let dist = squared_distance(point, self.point(row));
        let candidate = Candidate { dist, row };
        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().is_some_and(|worst| candidate < *worst) {
            heap.pop();
            heap.push(candidate);
        }
    }


    fn search(
        &self,
        node: &KdNode,
        point: &[f64],
        k: usize,
        heap: &mut BinaryHeap<Candidate>,
    )
    {
        match node {
            KdNode::Leaf { rows } => {
                for &row in rows {
                    self.offer(point, row, k, heap);
                }
            },
            KdNode::Split { axis, value, row, left, right } => {
                self.offer(point, *row, k, heap);

                let diff = point[*axis] - value;
                let (near, far) = if diff <= 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };
                self.search(near, point, k, heap);

                // A point on the far side may tie with the worst one.
                let plane = diff * diff;
                let search_far = heap.len() < k
                    || heap.peek().is_some_and(|worst| plane <= worst.dist);
                if search_far {
                    self.search(far, point, k, heap);
                }
            },
        }
    }
}


/// For each row of one class, the `k` nearest rows of the same class.
/// Neighbours are ordered by distance and ties by row id,
/// so a row without duplicates is its own first neighbour.
/// Rows of the other classes have no neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborTable {
    k: usize,
    neighbors: Vec<Vec<usize>>,
}


impl NeighborTable {
    /// Build the table of the rows labeled `label`
    /// on the columns `uniform_columns`.
    /// Returns an error if the class has less than `k` rows.
    pub fn same_class<S>(
        sample: &Sample,
        uniform_columns: &[S],
        label: f64,
        k: usize,
    ) -> Result<Self>
        where S: AsRef<str>
    {
        let (n_sample, _) = sample.shape();
        if sample.target().len() != n_sample {
            return Err(UBoostError::InvalidSample(
                "the target is not specified".into()
            ));
        }

        let pool = sample.indices_of(label);
        let index = NeighborhoodIndex::build_with_pool(
            sample, uniform_columns, pool.clone()
        )?;
        check_k(k, index.pool_size())?;

        let found = pool.par_iter()
            .map(|&row| index.query(row, k))
            .collect::<Result<Vec<_>>>()?;

        let mut neighbors = vec![Vec::new(); n_sample];
        for (row, nn) in pool.into_iter().zip(found) {
            neighbors[row] = nn;
        }

        Ok(Self { k, neighbors })
    }


    /// Number of neighbours per row.
    pub fn k(&self) -> usize {
        self.k
    }


    /// Number of rows.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }


    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }


    /// Returns the neighbours of the `row`-th example.
    /// The slice is empty if the row is outside the class.
    pub fn neighbors(&self, row: usize) -> &[usize] {
        &self.neighbors[row][..]
    }


    /// Returns an iterator over the rows of the table.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.neighbors.iter().map(|nn| &nn[..])
    }
}


fn resolve_columns<S>(sample: &Sample, uniform_columns: &[S]) -> Result<Vec<usize>>
    where S: AsRef<str>
{
    if uniform_columns.is_empty() {
        return Err(UBoostError::invalid_config(
            "uniform_variables", "must not be empty"
        ));
    }
    uniform_columns.iter()
        .map(|name| {
            let name = name.as_ref();
            sample.column_index(name)
                .ok_or_else(|| {
                    UBoostError::invalid_config(
                        "uniform_variables",
                        format!("column `{name}` does not exist"),
                    )
                })
        })
        .collect()
}


fn check_k(k: usize, pool_size: usize) -> Result<()> {
    if k == 0 || k > pool_size {
        return Err(UBoostError::invalid_config(
            "n_neighbors",
            format!("must be in [1, {pool_size}], got {k}"),
        ));
    }
    Ok(())
}


#[inline(always)]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
}
