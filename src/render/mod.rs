//! Per-combination compositing.

/// Source-over compositing of an ordered layer stack onto a fresh canvas.
pub mod composite;
