use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops;
use std::cmp;


/// Class probabilities `[P(0), P(1)]` stored in a leaf.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[repr(transparent)]
pub(crate) struct Proba(pub(crate) [f64; 2]);


impl Proba {
    /// Normalize the class masses `mass` into probabilities.
    /// Zero mass yields `[0.5, 0.5]`.
    #[inline]
    pub(crate) fn from_mass(mass: Mass) -> Self {
        let total = mass.total();
        if total <= 0.0 {
            return Self([0.5, 0.5]);
        }
        Self([mass.0[0] / total, mass.0[1] / total])
    }
}


/// Struct `Depth` defines the maximal depth of a tree.
/// This is just a wrapper for `usize`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[repr(transparent)]
pub(crate) struct Depth(usize);


impl From<usize> for Depth {
    fn from(depth: usize) -> Self {
        Self(depth)
    }
}


impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


impl ops::Sub<usize> for Depth {
    type Output = Self;
    /// Define the subtraction of the `Depth` struct.
    /// The subtraction saturates at `0`.
    #[inline]
    fn sub(self, other: usize) -> Self::Output {
        Self(self.0.saturating_sub(other))
    }
}

impl cmp::PartialEq<usize> for Depth {
    #[inline]
    fn eq(&self, rhs: &usize) -> bool {
        self.0.eq(rhs)
    }
}


impl cmp::PartialOrd<usize> for Depth {
    #[inline]
    fn partial_cmp(&self, other: &usize) -> Option<cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}


/// Probability mass per class, `[background, signal]`.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[repr(transparent)]
pub(crate) struct Mass(pub(crate) [f64; 2]);


impl Mass {
    #[inline]
    pub(crate) fn total(&self) -> f64 {
        self.0[0] + self.0[1]
    }


    /// Add the weight `w` of an example labeled `y`.
    #[inline]
    pub(crate) fn push(&mut self, y: f64, w: f64) {
        let k = if y > 0.5 { 1 } else { 0 };
        self.0[k] += w;
    }
}


impl ops::Add<Self> for Mass {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1]])
    }
}


impl ops::Sub<Self> for Mass {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        let bg = (self.0[0] - rhs.0[0]).max(0.0);
        let sg = (self.0[1] - rhs.0[1]).max(0.0);
        Self([bg, sg])
    }
}


#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[repr(transparent)]
pub(crate) struct Threshold(pub(crate) f64);


impl From<f64> for Threshold {
    #[inline]
    fn from(threshold: f64) -> Self {
        Self(threshold)
    }
}


impl cmp::PartialEq<f64> for Threshold {
    #[inline]
    fn eq(&self, other: &f64) -> bool {
        self.0.eq(other)
    }
}
