use serde::{Serialize, Deserialize};
use std::ops::Index;
use std::slice::Iter;


/// A named, dense column of a [`Sample`](crate::Sample).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name
    pub(crate) name: String,
    /// Feature values, one per example.
    pub(crate) values: Vec<f64>,
}


impl Feature {
    /// Construct an empty feature named `name`.
    pub fn new<T: ToString>(name: T) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
        }
    }


    /// Construct a feature from its values.
    pub fn from_values<T: ToString>(name: T, values: Vec<f64>) -> Self {
        Self { name: name.to_string(), values, }
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    pub(super) fn replace_name<S>(&mut self, name: S) -> String
        where S: ToString,
    {
        std::mem::replace(&mut self.name, name.to_string())
    }


    pub(super) fn into_target(self) -> Vec<f64> {
        self.values
    }


    /// Append an example to this feature.
    pub fn append(&mut self, x: f64) {
        self.values.push(x);
    }


    /// Returns the values of this feature.
    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }


    /// Returns an iterator over the values of this feature.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }


    /// Returns the number of items in this feature.
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// Returns `true` if the feature has no examples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }


    /// Returns the pair `(min, max)` of the values.
    /// An empty feature returns `(f64::MAX, f64::MIN)`.
    pub(crate) fn min_max(&self) -> (f64, f64) {
        self.values.iter()
            .fold((f64::MAX, f64::MIN), |(min, max), &x| {
                (min.min(x), max.max(x))
            })
    }
}


impl Index<usize> for Feature {
    type Output = f64;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max() {
        let feature = Feature::from_values("x", vec![3.0, -1.0, 8.5, 2.0]);
        let result = feature.min_max();
        let expect = (-1.0, 8.5);
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
    }

    #[test]
    fn test_replace_name() {
        let mut feature = Feature::new("old");
        let old = feature.replace_name("new");
        assert_eq!(old, "old");
        assert_eq!(feature.name(), "new");
    }
}
