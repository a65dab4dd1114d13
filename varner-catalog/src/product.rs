use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use varner_shared::Money;

use crate::catalog::CatalogError;

/// Highest unit price the catalog accepts.
///
/// Keeps `price * u32::MAX` summed over any realistic catalog well inside the
/// range of the decimal type.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000_000;

/// One row of an externally supplied catalog, before validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Product group the row is listed under (`PANSY MIXES`, `VIOLA`, ...)
    #[serde(default)]
    pub group: Option<String>,

    /// Mix, color or item name within the group
    pub name: String,

    /// Unit price as a decimal string, e.g. `"10.30"`
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            group: None,
            name: name.into(),
            unit_price,
        }
    }

    pub fn grouped(group: impl Into<String>, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            group: Some(group.into()),
            name: name.into(),
            unit_price,
        }
    }
}

/// A validated, immutable catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    group: Option<String>,
    name: String,
    unit_price: Money,
}

impl Product {
    pub fn new(group: Option<String>, name: String, unit_price: Decimal) -> Result<Self, CatalogError> {
        let group = group
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let label = qualify(group.as_deref(), &name);
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(CatalogError::NegativePrice {
                product: label,
                price: unit_price.to_string(),
            });
        }
        let unit_price = Money::from_decimal(unit_price).map_err(|_| CatalogError::SubCentPrice {
            product: label.clone(),
            price: unit_price.to_string(),
        })?;
        if unit_price > Money::from_cents(MAX_UNIT_PRICE_CENTS) {
            return Err(CatalogError::PriceTooLarge {
                product: label,
                price: unit_price.amount().to_string(),
            });
        }

        Ok(Self { group, name, unit_price })
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Catalog identity: `GROUP / NAME`, or just `NAME` for ungrouped rows.
    pub fn qualified_name(&self) -> String {
        qualify(self.group.as_deref(), &self.name)
    }
}

impl TryFrom<CatalogEntry> for Product {
    type Error = CatalogError;

    fn try_from(entry: CatalogEntry) -> Result<Self, Self::Error> {
        Product::new(entry.group, entry.name, entry.unit_price)
    }
}

fn qualify(group: Option<&str>, name: &str) -> String {
    match group {
        Some(group) => format!("{} / {}", group, name),
        None => name.to_string(),
    }
}
