//! Synthetic two-class samples.
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::{Result, UBoostError};
use super::feature_struct::Feature;
use super::sample_struct::{Sample, BACKGROUND, SIGNAL};


const DEFAULT_SEED: u64 = 42;


/// Generates two isotropic Gaussian blobs with unit variance.
/// Background examples are centered at `-distance / 2`
/// and signal examples at `+distance / 2` in every coordinate.
/// Classes are balanced and the rows are shuffled.
/// Columns are named `column0`, `column1`, ....
///
/// # Example
/// ```
/// use uboost::SampleGenerator;
/// let sample = SampleGenerator::new(1000)
///     .n_features(10)
///     .distance(0.6)
///     .seed(7)
///     .generate()
///     .unwrap();
/// assert_eq!(sample.shape(), (1000, 10));
/// ```
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    n_sample: usize,
    n_feature: usize,
    distance: f64,
    seed: u64,
}


impl SampleGenerator {
    /// Construct a generator of `n_sample` examples.
    /// Default: 10 features, distance `0.6`, seed `42`.
    pub fn new(n_sample: usize) -> Self {
        Self {
            n_sample,
            n_feature: 10,
            distance: 0.6,
            seed: DEFAULT_SEED,
        }
    }


    /// Set the number of features.
    pub fn n_features(mut self, n_feature: usize) -> Self {
        self.n_feature = n_feature;
        self
    }


    /// Set the distance between the two centers in each coordinate.
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }


    /// Set the seed. The same seed yields the same sample.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Draw the sample.
    pub fn generate(&self) -> Result<Sample> {
        if self.n_sample < 2 {
            return Err(UBoostError::invalid_config(
                "n_sample",
                format!("must be at least 2, got {}", self.n_sample),
            ));
        }
        if self.n_feature == 0 {
            return Err(UBoostError::invalid_config(
                "n_features", "must be positive"
            ));
        }
        if !self.distance.is_finite() {
            return Err(UBoostError::invalid_config(
                "distance",
                format!("must be finite, got {}", self.distance),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| UBoostError::invalid_config("distance", e))?;

        let n_signal = self.n_sample / 2;
        let mut target = (0..self.n_sample)
            .map(|i| if i < n_signal { SIGNAL } else { BACKGROUND })
            .collect::<Vec<f64>>();
        target.shuffle(&mut rng);

        let half = self.distance / 2.0;
        let mut columns = vec![Vec::with_capacity(self.n_sample); self.n_feature];
        for &y in target.iter() {
            let center = if y == SIGNAL { half } else { -half };
            for column in columns.iter_mut() {
                column.push(center + normal.sample(&mut rng));
            }
        }

        let features = columns.into_iter()
            .enumerate()
            .map(|(j, values)| Feature::from_values(format!("column{j}"), values))
            .collect::<Vec<_>>();

        Sample::from_features(features, target)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_balance() {
        let sample = SampleGenerator::new(101).n_features(3)
            .generate()
            .unwrap();
        assert_eq!(sample.shape(), (101, 3));
        assert_eq!(sample.feature_names(), vec!["column0", "column1", "column2"]);

        let result = sample.target().iter().filter(|&&y| y == SIGNAL).count();
        let expect = 50;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
        assert!(sample.is_valid_binary_instance().is_ok());
    }

    #[test]
    fn test_deterministic() {
        let a = SampleGenerator::new(50).seed(3).generate().unwrap();
        let b = SampleGenerator::new(50).seed(3).generate().unwrap();
        let c = SampleGenerator::new(50).seed(4).generate().unwrap();
        assert_eq!(a.target(), b.target());
        assert_eq!(a["column4"].values(), b["column4"].values());
        assert_ne!(a["column4"].values(), c["column4"].values());
    }

    #[test]
    fn test_centers() {
        let sample = SampleGenerator::new(4000).n_features(2)
            .distance(4.0)
            .generate()
            .unwrap();

        let mean = |label: f64| {
            let rows = sample.indices_of(label);
            rows.iter().map(|&i| sample["column1"][i]).sum::<f64>()
                / rows.len() as f64
        };
        let signal = mean(SIGNAL);
        let background = mean(BACKGROUND);
        assert!((signal - 2.0).abs() < 0.15, "signal mean {signal}");
        assert!((background + 2.0).abs() < 0.15, "background mean {background}");
    }

    #[test]
    fn test_invalid() {
        assert!(SampleGenerator::new(1).generate().is_err());
        assert!(SampleGenerator::new(10).n_features(0).generate().is_err());
    }
}
