//! Lazy cartesian product over catalog categories.

/// Combination values and the streaming enumerator.
pub mod product;
