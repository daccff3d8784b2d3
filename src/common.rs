//! Defines some common functions used in this library.

/// Defines some numerical helpers such as normalization.
pub(crate) mod utils;

/// Defines some checker functions.
pub(crate) mod checker;
