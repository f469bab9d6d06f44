use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    content::catalog::{CatalogConfig, TemplateKind},
    content::category::Category,
    foundation::error::{ReelError, ReelResult},
};

/// Uniform draw from the pool for `(category, kind)`.
///
/// Consumes entropy from `rng`; nothing else is observable. An empty pool is reported as a
/// configuration error (catalogs are validated at startup, so this only fires for catalogs
/// that skipped [`CatalogConfig::validate`]).
pub fn select<R: Rng + ?Sized>(
    catalog: &CatalogConfig,
    category: Category,
    kind: TemplateKind,
    rng: &mut R,
) -> ReelResult<String> {
    let pool = catalog.pool(category, kind)?;
    pool.choose(rng).cloned().ok_or_else(|| {
        ReelError::configuration(format!(
            "category '{category}' has an empty {} pool",
            kind.as_str()
        ))
    })
}

/// Borrowing selector that pairs a catalog with an injected random source.
pub struct TemplateSelector<'a, R: Rng> {
    catalog: &'a CatalogConfig,
    rng: R,
}

impl<'a, R: Rng> TemplateSelector<'a, R> {
    pub fn new(catalog: &'a CatalogConfig, rng: R) -> Self {
        Self { catalog, rng }
    }

    pub fn select(&mut self, category: Category, kind: TemplateKind) -> ReelResult<String> {
        select(self.catalog, category, kind, &mut self.rng)
    }

    /// Give back the random source, e.g. to continue a seeded sequence elsewhere.
    pub fn into_rng(self) -> R {
        self.rng
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/selector.rs"]
mod tests;
