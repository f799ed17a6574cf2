use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::scan::{LayerCatalog, LayerCategory};
use crate::foundation::error::{LayermixError, LayermixResult};

/// One chosen variant: the file path plus the category it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerChoice {
    category: Arc<str>,
    path: Arc<Path>,
}

impl LayerChoice {
    /// Category name.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Variant file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One element of the cartesian product: exactly one variant per category, bottom first.
///
/// Combinations share the catalog's path allocations; cloning one is a handful of
/// reference-count bumps.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Combination {
    ordinal: u64,
    layers: Box<[LayerChoice]>,
}

impl Combination {
    /// Position of this combination in enumeration order (0-based).
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Chosen layers in compositing order.
    pub fn layers(&self) -> &[LayerChoice] {
        &self.layers
    }

    /// Chosen file paths in compositing order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.layers.iter().map(LayerChoice::path)
    }

    /// Number of layers (equals the catalog's category count).
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; a catalog has at least one category.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Exact number of combinations: the product of every category's variant count.
pub fn combination_count(categories: &[LayerCategory]) -> LayermixResult<u64> {
    if categories.is_empty() {
        return Err(LayermixError::catalog(
            "cannot enumerate combinations of an empty category list",
        ));
    }
    categories.iter().try_fold(1u64, |acc, cat| {
        if cat.is_empty() {
            return Err(LayermixError::catalog(format!(
                "category '{}' has no variants",
                cat.name()
            )));
        }
        acc.checked_mul(cat.len() as u64).ok_or_else(|| {
            LayermixError::catalog("combination count overflows a 64-bit counter")
        })
    })
}

/// Streaming cartesian product over a category list.
///
/// Order is fixed: the last category varies fastest (an odometer over variant indices).
/// Only the current cursor is held in memory; each [`Combination`] is built on demand.
#[derive(Clone, Debug)]
pub struct CombinationEnumerator<'a> {
    categories: &'a [LayerCategory],
    cursor: Vec<usize>,
    next_ordinal: u64,
    total: u64,
}

impl<'a> CombinationEnumerator<'a> {
    /// Start a fresh enumeration. An empty list or an empty category is an error.
    pub fn new(categories: &'a [LayerCategory]) -> LayermixResult<Self> {
        let total = combination_count(categories)?;
        Ok(Self {
            categories,
            cursor: vec![0; categories.len()],
            next_ordinal: 0,
            total,
        })
    }

    /// Total number of combinations this enumerator yields from the start.
    pub fn total(&self) -> u64 {
        self.total
    }

    fn remaining(&self) -> u64 {
        self.total - self.next_ordinal
    }

    fn advance(&mut self) {
        for (slot, cat) in self.cursor.iter_mut().zip(self.categories).rev() {
            *slot += 1;
            if *slot < cat.len() {
                return;
            }
            *slot = 0;
        }
    }
}

impl Iterator for CombinationEnumerator<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.next_ordinal >= self.total {
            return None;
        }
        let combo = build(self.categories, &self.cursor, self.next_ordinal);
        self.next_ordinal += 1;
        self.advance();
        Some(combo)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for CombinationEnumerator<'_> {}

fn build(categories: &[LayerCategory], cursor: &[usize], ordinal: u64) -> Combination {
    let layers = categories
        .iter()
        .zip(cursor)
        .map(|(cat, &i)| LayerChoice {
            category: Arc::clone(cat.name_arc()),
            path: Arc::clone(&cat.variants()[i]),
        })
        .collect();
    Combination { ordinal, layers }
}

impl LayerCatalog {
    /// Exact number of combinations in this catalog.
    pub fn combination_count(&self) -> LayermixResult<u64> {
        combination_count(self.categories())
    }

    /// Enumerate every combination from the beginning.
    pub fn combinations(&self) -> LayermixResult<CombinationEnumerator<'_>> {
        CombinationEnumerator::new(self.categories())
    }

    /// The combination at `ordinal` in enumeration order, or `None` past the end.
    pub fn combination_at(&self, ordinal: u64) -> Option<Combination> {
        let total = self.combination_count().ok()?;
        if ordinal >= total {
            return None;
        }
        let categories = self.categories();
        let mut cursor = vec![0usize; categories.len()];
        let mut rem = ordinal;
        for (slot, cat) in cursor.iter_mut().zip(categories).rev() {
            let radix = cat.len() as u64;
            *slot = (rem % radix) as usize;
            rem /= radix;
        }
        Some(build(categories, &cursor, ordinal))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/combine/product.rs"]
mod tests;
