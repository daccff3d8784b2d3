use crate::weak_learner::type_and_struct::Mass;


/// Binning: A feature processing.
/// The range `[min, max]` of a feature is cut into
/// `n_bins` intervals of the same width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bins {
    min: f64,
    width: f64,
    n_bins: usize,
}


/// Statistics of the examples that fall into a bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BinStat {
    pub(crate) count: usize,
    pub(crate) mass: Mass,
    pub(crate) min: f64,
    pub(crate) max: f64,
}


impl Default for BinStat {
    fn default() -> Self {
        Self {
            count: 0,
            mass: Mass::default(),
            min: f64::MAX,
            max: f64::MIN,
        }
    }
}


impl Bins {
    /// Cut the values `values` into `n_bins` bins.
    /// This method naively cut the range with same width.
    pub(crate) fn cut<I>(values: I, n_bins: usize) -> Self
        where I: Iterator<Item = f64>,
    {
        let (min, max) = values.fold((f64::MAX, f64::MIN), |(min, max), x| {
            (min.min(x), max.max(x))
        });

        let n_bins = n_bins.max(1);

        // All values are the same (or there is no value).
        if min >= max {
            let min = if min == f64::MAX { 0.0 } else { min };
            return Self { min, width: 0.0, n_bins: 1 };
        }

        let width = (max - min) / n_bins as f64;
        Self { min, width, n_bins }
    }


    /// Returns the number of bins.
    pub(crate) fn len(&self) -> usize {
        self.n_bins
    }


    /// Returns the bin that `x` falls into.
    /// Values out of the range go to the first or the last bin.
    #[inline(always)]
    pub(crate) fn index(&self, x: f64) -> usize {
        if self.width == 0.0 || x <= self.min {
            return 0;
        }
        let k = ((x - self.min) / self.width).floor() as usize;
        k.min(self.n_bins - 1)
    }


    /// Collect the statistics of the examples `idx` per bin.
    /// `bin_ids[i]` is the bin of the `i`-th example.
    pub(crate) fn pack(
        &self,
        idx: &[usize],
        bin_ids: &[usize],
        values: &[f64],
        target: &[f64],
        dist: &[f64],
    ) -> Vec<BinStat>
    {
        let mut pack = vec![BinStat::default(); self.n_bins];
        for &i in idx {
            let stat = &mut pack[bin_ids[i]];
            stat.count += 1;
            stat.mass.push(target[i], dist[i]);
            stat.min = stat.min.min(values[i]);
            stat.max = stat.max.max(values[i]);
        }
        pack
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index() {
        let bins = Bins::cut([0.0, 10.0, 5.0].into_iter(), 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.index(0.0), 0);
        assert_eq!(bins.index(0.99), 0);
        assert_eq!(bins.index(1.0), 1);
        assert_eq!(bins.index(10.0), 9);
        assert_eq!(bins.index(-3.0), 0);
        assert_eq!(bins.index(30.0), 9);
    }

    #[test]
    fn test_constant_feature() {
        let bins = Bins::cut([2.0, 2.0].into_iter(), 255);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins.index(2.0), 0);
        assert_eq!(bins.index(7.0), 0);
    }

    #[test]
    fn test_pack() {
        let values = vec![0.0, 1.0, 9.0, 10.0];
        let target = vec![0.0, 1.0, 1.0, 0.0];
        let dist = vec![0.1, 0.2, 0.3, 0.4];
        let bins = Bins::cut(values.iter().copied(), 2);
        let ids = values.iter().map(|&x| bins.index(x)).collect::<Vec<_>>();

        let pack = bins.pack(&[0, 1, 2, 3], &ids, &values, &target, &dist);
        assert_eq!(pack[0].count, 2);
        assert_eq!(pack[0].mass, Mass([0.1, 0.2]));
        assert_eq!((pack[0].min, pack[0].max), (0.0, 1.0));
        assert_eq!(pack[1].count, 2);
        assert_eq!(pack[1].mass, Mass([0.4, 0.3]));
        assert_eq!((pack[1].min, pack[1].max), (9.0, 10.0));
    }
}
