pub mod app_config;
pub mod catalog_file;
pub mod export;
pub mod csv_export;
pub mod summary_export;

pub use app_config::{Config, ConfigError};
pub use catalog_file::{load_catalog, CatalogFileError};
pub use export::{ExportError, ExportKind};
