use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::settings::RunConfig;
use crate::foundation::error::{LayermixError, LayermixResult};

/// One slot in the layer stack and its interchangeable variants.
///
/// The category's position inside its [`LayerCatalog`] is its stacking order (bottom first).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerCategory {
    name: Arc<str>,
    variants: Vec<Arc<Path>>,
}

impl LayerCategory {
    /// Build a category from explicit variant paths; at least one variant is required.
    pub fn new(name: impl Into<String>, variants: Vec<PathBuf>) -> LayermixResult<Self> {
        let name: String = name.into();
        if variants.is_empty() {
            return Err(LayermixError::catalog(format!(
                "category '{name}' has no variants"
            )));
        }
        Ok(Self {
            name: Arc::from(name),
            variants: variants.into_iter().map(Arc::from).collect(),
        })
    }

    /// Category name as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, cloned into every combination.
    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Variant file paths in stable (file name) order.
    pub fn variants(&self) -> &[Arc<Path>] {
        &self.variants
    }

    /// Number of variants (always >= 1).
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Ordered list of categories, bottom layer first.
///
/// Every category holds at least one variant and the list itself is never empty, so the
/// cartesian product over a catalog is always well defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerCatalog {
    categories: Vec<LayerCategory>,
}

impl LayerCatalog {
    /// Wrap already-built categories.
    pub fn from_categories(categories: Vec<LayerCategory>) -> LayermixResult<Self> {
        if categories.is_empty() {
            return Err(LayermixError::catalog("at least one category is required"));
        }
        Ok(Self { categories })
    }

    /// Scan `<layers_dir>/<name>` for every configured category.
    pub fn from_config(cfg: &RunConfig) -> LayermixResult<Self> {
        Self::scan(&cfg.layers_dir, &cfg.layers)
    }

    /// List the non-directory entries of `<base>/<name>` for each name, preserving name order.
    ///
    /// Entries inside a category are sorted by file name so repeated scans of an unchanged
    /// directory produce the same catalog.
    #[tracing::instrument(skip(base, names), fields(base = %base.display()))]
    pub fn scan(base: &Path, names: &[String]) -> LayermixResult<Self> {
        let mut categories = Vec::with_capacity(names.len());
        for name in names {
            let dir = base.join(name);
            let variants = list_variants(name, &dir)?;
            tracing::debug!(category = %name, variants = variants.len(), "scanned category");
            categories.push(LayerCategory::new(name.clone(), variants)?);
        }
        Self::from_categories(categories)
    }

    /// Categories in stacking order.
    pub fn categories(&self) -> &[LayerCategory] {
        &self.categories
    }

    /// Number of categories (the length of every combination).
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always `false` for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn list_variants(name: &str, dir: &Path) -> LayermixResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        LayermixError::catalog(format!(
            "read category '{name}' at '{}': {e}",
            dir.display()
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            LayermixError::catalog(format!(
                "list category '{name}' at '{}': {e}",
                dir.display()
            ))
        })?;
        let path = entry.path();
        let meta = std::fs::metadata(&path).map_err(|e| {
            LayermixError::catalog(format!("stat '{}' in category '{name}': {e}", path.display()))
        })?;
        if meta.is_dir() {
            continue;
        }
        files.push((entry.file_name(), path));
    }

    if files.is_empty() {
        return Err(LayermixError::catalog(format!(
            "category '{name}' at '{}' contains no files",
            dir.display()
        )));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/scan.rs"]
mod tests;
