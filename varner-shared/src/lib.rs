pub mod money;
pub mod pii;

pub use money::{format_currency, format_plain, Money, MoneyError, TaxRate};
pub use pii::Masked;
