//! Per-category variant listings read from the layers directory.

/// Directory scanning into an ordered [`scan::LayerCatalog`].
pub mod scan;
