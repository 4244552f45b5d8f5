//! Item-catalog content for the combat core.
//!
//! Converts RON catalog files into [`combat_core::CatalogOracle`]
//! implementations, and ships a built-in default catalog for hosts that
//! don't load their own.

mod catalog;

pub use catalog::{CatalogFile, StaticCatalog, default_catalog, load_catalog};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
