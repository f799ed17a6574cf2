//! Run settings loaded from `config.toml`.

/// TOML-backed run configuration and the derived render settings.
pub mod settings;
