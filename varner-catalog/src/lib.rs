pub mod product;
pub mod catalog;
pub mod pricing;
pub mod seasonal;

pub use product::{CatalogEntry, Product};
pub use catalog::{Catalog, CatalogError};
pub use pricing::PricingError;
