//! Struct `Sample` represents a batch sample.  

// Provides feature struct.
pub(crate) mod feature_struct;
// Provides sample struct.
pub(crate) mod sample_struct;

// Provides a struct that reads a file.
pub(crate) mod sample_reader;

// Provides the synthetic two-blob sample.
pub(crate) mod generator;


pub use sample_reader::SampleReader;
pub use sample_struct::Sample;
pub use feature_struct::Feature;
pub use generator::SampleGenerator;
pub use sample_struct::{BACKGROUND, SIGNAL};
