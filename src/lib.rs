//! layermix renders every combination of a stack of layered "trait" images.
//!
//! Given ordered categories (background, body, eyes, ...) each holding interchangeable
//! variant images, layermix produces one flattened JPEG per element of the cartesian
//! product, named by a digest of the chosen file paths.
//!
//! # Pipeline overview
//!
//! 1. **Catalog**: `RunConfig -> LayerCatalog` (one ordered variant list per category)
//! 2. **Enumerate**: `LayerCatalog -> CombinationEnumerator` (lazy product, last category fastest)
//! 3. **Compose**: `Combination -> Raster` (decode each layer, source-over bottom to top)
//! 4. **Encode**: `Raster -> OutputArtifact` (JPEG bytes under a content-addressed name)
//! 5. **Coordinate**: [`generate_all`] streams combinations through a bounded worker pool
//!    into an [`ArtifactSink`] and returns a [`RunReport`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No globals**: configuration is an explicit value passed into the pipeline.
//! - **Deterministic naming**: output names depend only on the ordered layer paths.
//! - **Premultiplied RGBA8** on the canvas; alpha is flattened only at JPEG encoding.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod combine;
mod config;
mod encode;
mod foundation;
mod pipeline;
mod render;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;

pub use assets::decode::{LayerFormat, LayerImage, decode_layer, decode_layer_bytes};
pub use catalog::scan::{LayerCatalog, LayerCategory};
pub use combine::product::{Combination, CombinationEnumerator, LayerChoice, combination_count};
pub use config::settings::{
    DEFAULT_JPEG_QUALITY, DEFAULT_LAYERS_DIR, DEFAULT_OUTPUT_DIR, MAX_CANVAS_DIMENSION,
    RenderSettings, RunConfig, SizePolicy,
};
pub use encode::jpeg::{FLATTEN_BACKGROUND_RGB, encode_jpeg};
pub use encode::naming::{
    OUTPUT_EXTENSION, OutputArtifact, identifier_for_key, naming_key, output_file_name,
    output_identifier,
};
pub use encode::sink::{ArtifactSink, DirSink, InMemorySink};
pub use foundation::core::{CanvasSize, Raster};
pub use foundation::error::{LayermixError, LayermixResult};
pub use pipeline::coordinator::{
    RunOptions, RunReport, TaskFailure, TaskOutcome, TaskSuccess, generate_all,
    render_combination, run_task,
};
pub use render::composite::{PremulRgba8, compose, over, over_at_origin, over_in_place};
