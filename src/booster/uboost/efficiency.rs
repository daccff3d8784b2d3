//! Local efficiency estimators.
use rayon::prelude::*;

use crate::error::{Result, UBoostError};
use crate::neighbors::NeighborTable;


/// Measures how far the local selection efficiency of each example
/// is from the global target.
///
/// Given the pass/fail status of every example under the current cut,
/// an estimator returns `target_efficiency - local_efficiency`
/// for every example.
/// A positive value means the neighbourhood of the example
/// passes the cut less often than the target.
pub trait EfficiencyEstimator {
    /// Returns the deviation of each example.
    fn deviations(&self, passed: &[bool], target_efficiency: f64)
        -> Result<Vec<f64>>;
}


/// Estimates the local efficiency of an example
/// by the fraction of its `k` nearest same-class neighbours
/// that pass the cut.
/// Examples outside the table have no deviation.
#[derive(Debug, Clone)]
pub struct KnnEfficiency {
    table: NeighborTable,
}


impl KnnEfficiency {
    /// Construct an estimator over a neighbour table.
    pub fn new(table: NeighborTable) -> Self {
        Self { table }
    }


    /// Returns the underlying neighbour table.
    pub fn table(&self) -> &NeighborTable {
        &self.table
    }


    /// Returns the fraction of the neighbours of each example
    /// that pass the cut, or `None` for an example outside the table.
    pub fn local_efficiencies(&self, passed: &[bool])
        -> Result<Vec<Option<f64>>>
    {
        if passed.len() != self.table.len() {
            return Err(UBoostError::shape_mismatch(
                format!("{} rows", self.table.len()),
                format!("{} rows", passed.len()),
            ));
        }

        let local = (0..self.table.len()).into_par_iter()
            .map(|row| {
                let nn = self.table.neighbors(row);
                if nn.is_empty() {
                    return None;
                }
                let n_passed = nn.iter().filter(|&&j| passed[j]).count();
                Some(n_passed as f64 / nn.len() as f64)
            })
            .collect();
        Ok(local)
    }
}


impl EfficiencyEstimator for KnnEfficiency {
    fn deviations(&self, passed: &[bool], target_efficiency: f64)
        -> Result<Vec<f64>>
    {
        let deviations = self.local_efficiencies(passed)?
            .into_iter()
            .map(|local| local.map_or(0.0, |l| target_efficiency - l))
            .collect();
        Ok(deviations)
    }
}
