use serde::Deserialize;
use std::path::Path;
use tracing::info;
use varner_catalog::{Catalog, CatalogEntry, CatalogError};

/// On-disk catalog: a list of `[[products]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<CatalogEntry>,
}

/// Read and validate a TOML or JSON catalog file (format from its extension).
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogFileError> {
    let source = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .build()?;
    let file: CatalogFile = source.try_deserialize()?;

    info!("Read {} catalog rows from {}", file.products.len(), path.display());
    Ok(Catalog::load(file.products)?)
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogFileError {
    #[error("Failed to read catalog file: {0}")]
    Read(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] CatalogError),
}
