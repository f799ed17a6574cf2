use std::path::{Path, PathBuf};

use crate::foundation::core::CanvasSize;
use crate::foundation::error::{LayermixError, LayermixResult};

/// Default output directory when `outputDir` is omitted.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Default base directory holding one subdirectory per category.
pub const DEFAULT_LAYERS_DIR: &str = "./layers";
/// Default JPEG quality (matches the common codec default).
pub const DEFAULT_JPEG_QUALITY: u8 = 75;
/// Largest canvas side the JPEG output can encode.
pub const MAX_CANVAS_DIMENSION: u32 = u16::MAX as u32;

/// How to treat a layer whose dimensions differ from the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    /// Fail the combination with a decode error.
    #[default]
    Reject,
    /// Draw the layer at the origin and composite only the overlapping region.
    Clip,
}

/// Validated run configuration.
///
/// Mirrors the keys of `config.toml`:
///
/// ```toml
/// outputDir = "output"
/// imageWidth = 512
/// imageHeight = 512
/// layers = ["background", "body", "eyes"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunConfig {
    /// Directory receiving one JPEG per combination.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Canvas width in pixels.
    pub image_width: u32,
    /// Canvas height in pixels.
    pub image_height: u32,
    /// Category names, bottom layer first.
    pub layers: Vec<String>,
    /// Base directory containing one subdirectory per category.
    #[serde(default = "default_layers_dir")]
    pub layers_dir: PathBuf,
    /// Worker pool size; `None` uses the available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Stop dispatching new combinations after the first failure.
    #[serde(default)]
    pub fail_fast: bool,
    /// Handling of layers that do not match the canvas size.
    #[serde(default)]
    pub size_policy: SizePolicy,
    /// JPEG quality in `1..=100`.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_layers_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LAYERS_DIR)
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl RunConfig {
    /// Build a config with defaults for every optional key.
    pub fn new(image_width: u32, image_height: u32, layers: Vec<String>) -> Self {
        Self {
            output_dir: default_output_dir(),
            image_width,
            image_height,
            layers,
            layers_dir: default_layers_dir(),
            workers: None,
            fail_fast: false,
            size_policy: SizePolicy::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(s: &str) -> LayermixResult<Self> {
        let cfg: Self = toml::from_str(s)
            .map_err(|e| LayermixError::config(format!("parse config TOML: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a config file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LayermixResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            LayermixError::config(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&s)
    }

    /// Check every setting; the error message names the offending key.
    pub fn validate(&self) -> LayermixResult<()> {
        CanvasSize::new(self.image_width, self.image_height).map_err(|_| {
            LayermixError::config(format!(
                "imageWidth and imageHeight must be >= 1, got {}x{}",
                self.image_width, self.image_height
            ))
        })?;
        for (key, value) in [("imageWidth", self.image_width), ("imageHeight", self.image_height)] {
            if value > MAX_CANVAS_DIMENSION {
                return Err(LayermixError::config(format!(
                    "{key} must be <= {MAX_CANVAS_DIMENSION}, got {value}"
                )));
            }
        }

        if self.layers.is_empty() {
            return Err(LayermixError::config("layers must list at least one category"));
        }
        let mut seen = std::collections::HashSet::with_capacity(self.layers.len());
        for name in &self.layers {
            validate_category_name(name)?;
            if !seen.insert(name.as_str()) {
                return Err(LayermixError::config(format!(
                    "layers lists category '{name}' more than once"
                )));
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(LayermixError::config("outputDir must be non-empty"));
        }
        if self.workers == Some(0) {
            return Err(LayermixError::config("workers must be >= 1 when set"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(LayermixError::config(format!(
                "jpegQuality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Fixed canvas size for the run.
    pub fn canvas(&self) -> LayermixResult<CanvasSize> {
        CanvasSize::new(self.image_width, self.image_height)
    }

    /// Settings consumed by every composition worker.
    pub fn render_settings(&self) -> LayermixResult<RenderSettings> {
        Ok(RenderSettings {
            canvas: self.canvas()?,
            size_policy: self.size_policy,
            jpeg_quality: self.jpeg_quality,
        })
    }
}

fn validate_category_name(name: &str) -> LayermixResult<()> {
    if name.trim().is_empty() {
        return Err(LayermixError::config("layers entries must be non-empty"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(LayermixError::config(format!(
            "layers entry '{name}' must be a plain directory name"
        )));
    }
    Ok(())
}

/// Read-only per-run settings shared by all workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Canvas every combination is composited onto.
    pub canvas: CanvasSize,
    /// Handling of mismatched layer sizes.
    pub size_policy: SizePolicy,
    /// JPEG quality in `1..=100`.
    pub jpeg_quality: u8,
}

impl RenderSettings {
    /// Settings with the default size policy and JPEG quality.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            size_policy: SizePolicy::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
