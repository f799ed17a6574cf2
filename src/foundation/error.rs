use std::path::PathBuf;

/// Convenience result type used across layermix.
pub type LayermixResult<T> = Result<T, LayermixError>;

/// Top-level error taxonomy used by the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum LayermixError {
    /// Invalid or missing run settings.
    #[error("config error: {0}")]
    Config(String),

    /// A category directory could not be read or holds no variants.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A layer file has an unsupported extension, corrupt data, or the wrong size.
    #[error("decode error in category '{category}' at '{}': {reason}", .path.display())]
    Decode {
        /// Category the layer belongs to.
        category: String,
        /// Offending layer file.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },

    /// The finished raster could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// The encoded artifact could not be persisted.
    #[error("write error at '{}': {reason}", .path.display())]
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayermixError {
    /// Build a [`LayermixError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LayermixError::Catalog`] value.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`LayermixError::Decode`] value.
    pub fn decode(
        category: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Decode {
            category: category.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`LayermixError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`LayermixError::Write`] value.
    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
