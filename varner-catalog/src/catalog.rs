use std::collections::HashSet;
use tracing::{debug, info};

use crate::product::{CatalogEntry, Product};

/// The fixed product/price list for one selling season.
///
/// Order is significant: it is the row order of the order form and of every
/// export.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Validate and load a catalog. The first bad row fails the whole load.
    pub fn load<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut seen = HashSet::new();
        let mut products = Vec::new();

        for entry in entries {
            let product = Product::try_from(entry)?;
            let qualified = product.qualified_name();
            if !seen.insert(qualified.clone()) {
                return Err(CatalogError::Duplicate(qualified));
            }
            debug!(product = %qualified, price = %product.unit_price(), "catalog row accepted");
            products.push(product);
        }

        info!("Loaded catalog with {} products", products.len());
        Ok(Self { products })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Position of a product by its qualified name.
    pub fn position(&self, qualified_name: &str) -> Option<usize> {
        self.products
            .iter()
            .position(|p| p.qualified_name() == qualified_name)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// Catalog integrity errors. All of them are fatal to startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate product in catalog: {0}")]
    Duplicate(String),

    #[error("Negative unit price for {product}: {price}")]
    NegativePrice { product: String, price: String },

    #[error("Unit price for {product} is finer than one cent: {price}")]
    SubCentPrice { product: String, price: String },

    #[error("Unit price for {product} exceeds the catalog ceiling: {price}")]
    PriceTooLarge { product: String, price: String },

    #[error("Catalog row has an empty product name")]
    EmptyName,
}
