use std::path::Path;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::collections::{HashMap, HashSet};
use std::ops::Index;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::error::{Result, UBoostError};
use super::feature_struct::*;


/// Label of background examples.
pub const BACKGROUND: f64 = 0.0;
/// Label of signal examples.
pub const SIGNAL: f64 = 1.0;


/// Struct `Sample` holds a batch sample in a dense column format.
/// The target takes `0.0` (background) or `1.0` (signal)
/// for binary classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<f64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Construct a `Sample` from named columns and a target vector.
    /// All columns and the target must have the same length.
    pub fn from_columns<S>(columns: Vec<(S, Vec<f64>)>, target: Vec<f64>)
        -> Result<Self>
        where S: ToString,
    {
        let features = columns.into_iter()
            .map(|(name, values)| Feature::from_values(name, values))
            .collect::<Vec<_>>();
        Self::from_features(features, target)
    }


    pub(crate) fn from_features(features: Vec<Feature>, target: Vec<f64>)
        -> Result<Self>
    {
        let n_sample = target.len();
        let n_feature = features.len();

        if let Some(feat) = features.iter().find(|f| f.len() != n_sample) {
            return Err(UBoostError::shape_mismatch(
                format!("{n_sample} rows (length of the target)"),
                format!("{} rows in column `{}`", feat.len(), feat.name()),
            ));
        }

        let name_to_index = name_to_index(&features)?;

        Ok(Self { name_to_index, features, target, n_sample, n_feature, })
    }


    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// This method takes the ownership for the given pair
    /// `data` and `target`.
    /// Every column is cast to `f64`; missing values are rejected.
    pub fn from_dataframe(data: DataFrame, target: Series) -> Result<Self> {
        let target = series_to_vec(&target)?;

        let features = data.get_columns()
            .par_iter()
            .map(|series| {
                let values = series_to_vec(series)?;
                Ok(Feature::from_values(series.name(), values))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_features(features, target)
    }


    /// Read a CSV format file to `Sample` type.
    /// The target is not set; use [`Sample::set_target`].
    pub fn from_csv<P>(file: P, has_header: bool) -> Result<Self>
        where P: AsRef<Path>,
    {
        // Open the given `file`.
        let file = File::open(file)?;
        let mut lines = BufReader::new(file).lines();

        let mut features = Vec::new();
        if has_header {
            if let Some(line) = lines.next() {
                features = line?.split(',')
                    .map(|name| Feature::new(name.trim()))
                    .collect::<Vec<_>>();
            }
        }

        // For each line of the file
        for (k, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }

            let xs = line.split(',')
                .map(|x| x.trim().parse::<f64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| {
                    UBoostError::InvalidSample(
                        format!("line {}: {e}", k + 1 + has_header as usize)
                    )
                })?;

            // If the header does not exist,
            // construct a dummy header.
            if features.is_empty() {
                features = (1..=xs.len())
                    .map(|i| Feature::new(format!("Feat. [{i}]")))
                    .collect();
            }

            if xs.len() != features.len() {
                return Err(UBoostError::shape_mismatch(
                    format!("{} values per line", features.len()),
                    format!("{} values", xs.len()),
                ));
            }

            features.iter_mut()
                .zip(xs)
                .for_each(|(feat, x)| { feat.append(x); });
        }

        let n_sample = features.first()
            .map(|feat| feat.len())
            .unwrap_or(0);
        let n_feature = features.len();
        let name_to_index = name_to_index(&features)?;

        let sample = Self {
            name_to_index,
            features,
            target: Vec::with_capacity(0),
            n_sample,
            n_feature,
        };
        Ok(sample)
    }


    /// Set the feature of name `target` to `self.target`.
    /// The old value assigned to `self.target` will be dropped.
    pub fn set_target<S: AsRef<str>>(mut self, target: S) -> Result<Self> {
        let target = target.as_ref();
        let pos = self.column_index(target)
            .ok_or_else(|| {
                UBoostError::InvalidSample(
                    format!("the target column `{target}` does not exist")
                )
            })?;


        self.target = self.features.remove(pos).into_target();
        self.n_feature -= 1;
        self.name_to_index = name_to_index(&self.features)?;

        Ok(self)
    }


    /// Returns the target values.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }


    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Returns the feature names in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter()
            .map(|feat| feat.name())
            .collect()
    }


    /// Returns the column index of the feature named `name`.
    pub fn column_index<S: AsRef<str>>(&self, name: S) -> Option<usize> {
        self.name_to_index.get(name.as_ref()).copied()
    }


    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Set the feature (column) names.
    /// Returns the old names.
    pub fn replace_names<S, T>(&mut self, names: T) -> Result<Vec<String>>
        where S: ToString,
              T: AsRef<[S]>,
    {
        let names = names.as_ref();

        let n_names = names.len();
        if self.n_feature != n_names {
            return Err(UBoostError::shape_mismatch(
                format!("{} names", self.n_feature),
                format!("{n_names} names"),
            ));
        }

        let old_names = names.iter()
            .zip(&mut self.features[..])
            .map(|(name, feature)| feature.replace_name(name.to_string()))
            .collect();

        self.name_to_index = name_to_index(&self.features)?;
        Ok(old_names)
    }


    /// Returns the feature vector of the `idx`-th example.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.features.iter()
            .map(|feat| feat[idx])
            .collect::<Vec<f64>>()
    }


    /// Returns the `idx`-th instance `(x, y)`.
    pub fn at(&self, idx: usize) -> (Vec<f64>, f64) {
        (self.row(idx), self.target[idx])
    }


    /// Returns a new sample that consists of the given rows
    /// (in the given order).
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        if let Some(&row) = rows.iter().find(|&&r| r >= self.n_sample) {
            return Err(UBoostError::shape_mismatch(
                format!("row indices below {}", self.n_sample),
                format!("row index {row}"),
            ));
        }

        let features = self.features.iter()
            .map(|feat| {
                let values = rows.iter().map(|&r| feat[r]).collect();
                Feature::from_values(feat.name(), values)
            })
            .collect::<Vec<_>>();

        let target = if self.target.is_empty() {
            Vec::with_capacity(0)
        } else {
            rows.iter().map(|&r| self.target[r]).collect()
        };

        let n_sample = rows.len();
        let n_feature = self.n_feature;
        let name_to_index = self.name_to_index.clone();
        Ok(Self { name_to_index, features, target, n_sample, n_feature, })
    }


    /// Returns a new sample that has the named columns only
    /// (in the given order). The target is kept.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let features = names.iter()
            .map(|name| {
                let name = name.as_ref();
                self.column_index(name)
                    .map(|k| self.features[k].clone())
                    .ok_or_else(|| {
                        UBoostError::shape_mismatch(
                            format!("a column named `{name}`"),
                            format!("columns {:?}", self.feature_names()),
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let name_to_index = name_to_index(&features)?;
        let n_feature = features.len();
        Ok(Self {
            name_to_index,
            features,
            target: self.target.clone(),
            n_sample: self.n_sample,
            n_feature,
        })
    }


    /// Returns the indices of the examples labeled `label`.
    pub fn indices_of(&self, label: f64) -> Vec<usize> {
        self.target.iter()
            .enumerate()
            .filter_map(|(i, &y)| (y == label).then_some(i))
            .collect()
    }


    /// Check whether `self` is
    /// a training set for binary classification or not.
    /// The target must be specified and take exactly two values,
    /// `0.0` (background) and `1.0` (signal).
    pub fn is_valid_binary_instance(&self) -> Result<()> {
        // Check whether the target column is specified.
        if self.target.len() != self.n_sample {
            return Err(UBoostError::InvalidSample(
                "The target class is not specified. \
                 Use `Sample::set_target(\"Column Name\")`.".into()
            ));
        }


        let non_binary = self.target.iter()
            .filter(|&&y| y != BACKGROUND && y != SIGNAL)
            .take(5)
            .map(|y| y.to_string())
            .collect::<Vec<_>>();
        if !non_binary.is_empty() {
            let line = non_binary.join(", ");
            return Err(UBoostError::InvalidSample(format!(
                "Target values must be 0 or 1. Ex. [{line}, ...]."
            )));
        }


        // Check whether the target values takes exactly 2 kinds.
        let n_label = self.target.iter()
            .map(|&y| y as i64)
            .collect::<HashSet<_>>()
            .len();
        if n_label < 2 {
            return Err(UBoostError::InvalidSample(format!(
                "The target values take less than 2 kinds. \
                 Expected 2 kinds, got {n_label} kinds."
            )));
        }

        Ok(())
    }


    /// Check that `self` has exactly the columns `names`, in order.
    pub(crate) fn check_columns(&self, names: &[String]) -> Result<()> {
        let same = self.n_feature == names.len()
            && self.features.iter()
                .zip(names)
                .all(|(feat, name)| feat.name() == name);
        if same { return Ok(()); }

        Err(UBoostError::shape_mismatch(
            format!("{} columns {names:?}", names.len()),
            format!("{} columns {:?}", self.n_feature, self.feature_names()),
        ))
    }
}


fn name_to_index(features: &[Feature]) -> Result<HashMap<String, usize>> {
    let mut map = HashMap::with_capacity(features.len());
    for (i, feat) in features.iter().enumerate() {
        if map.insert(feat.name().to_string(), i).is_some() {
            return Err(UBoostError::InvalidSample(
                format!("duplicated column name `{}`", feat.name())
            ));
        }
    }
    Ok(map)
}


fn series_to_vec(series: &Series) -> Result<Vec<f64>> {
    let series = series.cast(&DataType::Float64)?;
    series.f64()?
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            UBoostError::InvalidSample(
                format!("column `{}` has missing values", series.name())
            )
        })
}


impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = Feature;


    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = self.name_to_index[name];
        &self.features[k]
    }
}
