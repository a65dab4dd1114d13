use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::Path;
use varner_order::{OrderContext, PaymentTerms, TaxStatus};
use varner_shared::{Money, TaxRate};

pub const DEFAULT_TITLE: &str = "Varner's Greenhouse & Nursery - 2025 Fall Wholesale Order Form";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub order: OrderDefaults,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Settings a fresh (or reset) order form starts from.
#[derive(Debug, Deserialize, Clone)]
pub struct OrderDefaults {
    #[serde(with = "rust_decimal::serde::str", default = "default_tax_rate_percent")]
    pub tax_rate_percent: Decimal,
    #[serde(default = "default_minimum_delivery_fee")]
    pub minimum_delivery_fee: Money,
    #[serde(default)]
    pub tax_status: TaxStatus,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// TOML or JSON catalog; the built-in seasonal catalog when unset
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_export_directory")]
    pub directory: String,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_tax_rate_percent() -> Decimal {
    Decimal::new(600, 2)
}

fn default_minimum_delivery_fee() -> Money {
    Money::from_cents(4000)
}

fn default_export_directory() -> String {
    ".".to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            tax_rate_percent: default_tax_rate_percent(),
            minimum_delivery_fee: default_minimum_delivery_fee(),
            tax_status: TaxStatus::default(),
            payment_terms: PaymentTerms::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            title: default_title(),
        }
    }
}

impl OrderDefaults {
    /// Validated order context for new and reset forms.
    pub fn to_context(&self) -> Result<OrderContext, ConfigError> {
        let rate = TaxRate::from_percent(self.tax_rate_percent)
            .map_err(|e| ConfigError::Invalid(format!("order.tax_rate_percent: {}", e)))?;

        let context = OrderContext::default()
            .with_tax_rate(rate)
            .and_then(|ctx| ctx.with_minimum_delivery_fee(self.minimum_delivery_fee))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?
            .with_tax_status(self.tax_status)
            .with_payment_terms(self.payment_terms);
        Ok(context)
    }
}

impl Config {
    /// Load from `./config`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let layer = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            // Shipped defaults
            .add_source(config::File::with_name(&layer("default")))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&layer(&run_mode)).required(false))
            // Machine-local overrides, not checked in
            .add_source(config::File::with_name(&layer("local")).required(false))
            // Eg.. `VARNER__ORDER__TAX_RATE_PERCENT=6.5`
            .add_source(config::Environment::with_prefix("VARNER").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Build from inline TOML, no files or environment involved.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use varner_order::Fulfillment;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.order.tax_rate_percent, Decimal::new(6, 0));
        assert_eq!(config.export.directory, ".");
        assert!(config.catalog.path.is_none());

        let ctx = config.order.to_context().unwrap();
        assert_eq!(ctx.tax_rate(), TaxRate::michigan());
        assert_eq!(ctx.minimum_delivery_fee(), Money::from_cents(4000));
        assert_eq!(ctx.fulfillment(), Fulfillment::Pickup);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml_str(
            r#"
            [order]
            tax_rate_percent = "6.25"
            minimum_delivery_fee = "55.00"
            tax_status = "EXEMPT"
            payment_terms = "NET_30"

            [catalog]
            path = "catalogs/spring.toml"

            [export]
            directory = "orders"
            "#,
        )
        .unwrap();

        let ctx = config.order.to_context().unwrap();
        assert_eq!(ctx.tax_rate().percent_display(), "6.25");
        assert_eq!(ctx.minimum_delivery_fee(), Money::from_cents(5500));
        assert_eq!(ctx.tax_status(), TaxStatus::Exempt);
        assert_eq!(ctx.payment_terms(), PaymentTerms::Net30);
        assert_eq!(config.catalog.path.as_deref(), Some("catalogs/spring.toml"));
        assert_eq!(config.export.directory, "orders");
        assert_eq!(config.export.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let config = Config::from_toml_str("[order]\ntax_rate_percent = \"150\"\n").unwrap();
        assert!(matches!(config.order.to_context(), Err(ConfigError::Invalid(_))));
    }
}
