//! Output naming, JPEG encoding, and artifact sinks.

/// JPEG encoding of finished rasters.
pub mod jpeg;
/// Content-addressed output identifiers.
pub mod naming;
/// Destinations for encoded artifacts.
pub mod sink;
