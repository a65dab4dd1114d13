use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use varner_catalog::{pricing, Product};
use varner_shared::Money;

use crate::notify::LineChange;
use crate::OrderResult;

/// Position of a line on the form, assigned when the engine attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub usize);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw quantity as typed into a row, or a number from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityInput {
    Text(String),
    Number(i64),
}

impl From<&str> for QuantityInput {
    fn from(raw: &str) -> Self {
        QuantityInput::Text(raw.to_string())
    }
}

impl From<String> for QuantityInput {
    fn from(raw: String) -> Self {
        QuantityInput::Text(raw)
    }
}

impl From<u32> for QuantityInput {
    fn from(n: u32) -> Self {
        QuantityInput::Number(i64::from(n))
    }
}

impl From<i32> for QuantityInput {
    fn from(n: i32) -> Self {
        QuantityInput::Number(i64::from(n))
    }
}

impl From<i64> for QuantityInput {
    fn from(n: i64) -> Self {
        QuantityInput::Number(n)
    }
}

impl fmt::Display for QuantityInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityInput::Text(raw) => f.write_str(raw),
            QuantityInput::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Whitespace only
    Blank,
    NotANumber,
    Negative,
    TooLarge,
}

/// Row-level validation flag. Raised on bad input, cleared by the next good one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityRejection {
    pub raw: String,
    pub reason: RejectReason,
}

impl fmt::Display for QuantityRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let why = match self.reason {
            RejectReason::Blank => "blank",
            RejectReason::NotANumber => "not a whole number",
            RejectReason::Negative => "negative",
            RejectReason::TooLarge => "too large",
        };
        write!(f, "{:?} is {}", self.raw, why)
    }
}

/// Parse a quantity. An empty field is zero; anything other than plain ASCII
/// digits that fit in `u32` is rejected.
pub fn parse_quantity(input: &QuantityInput) -> Result<u32, QuantityRejection> {
    let reject = |reason| QuantityRejection {
        raw: input.to_string(),
        reason,
    };

    match input {
        QuantityInput::Number(n) if *n < 0 => Err(reject(RejectReason::Negative)),
        QuantityInput::Number(n) => u32::try_from(*n).map_err(|_| reject(RejectReason::TooLarge)),
        QuantityInput::Text(raw) if raw.is_empty() => Ok(0),
        QuantityInput::Text(raw) if raw.trim().is_empty() => Err(reject(RejectReason::Blank)),
        QuantityInput::Text(raw) => {
            let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
            if !all_digits(raw) {
                let reason = match raw.strip_prefix('-') {
                    Some(rest) if all_digits(rest) => RejectReason::Negative,
                    _ => RejectReason::NotANumber,
                };
                return Err(reject(reason));
            }
            raw.parse::<u32>().map_err(|_| reject(RejectReason::TooLarge))
        }
    }
}

/// One catalog product on the form with its editable quantity.
#[derive(Debug, Clone)]
pub struct LineItemModel {
    id: LineId,
    product: Product,
    quantity: u32,
    line_total: Money,
    rejection: Option<QuantityRejection>,
}

impl LineItemModel {
    pub fn new(id: LineId, product: Product) -> Self {
        Self {
            id,
            product,
            quantity: 0,
            line_total: Money::ZERO,
            rejection: None,
        }
    }

    /// Apply a quantity edit and return its change notification.
    ///
    /// Bad input never fails: the line drops to zero and the row flag is
    /// raised. An `Err` means the line total could not be represented, which
    /// the catalog price ceiling rules out for validated products.
    pub fn set_quantity(&mut self, input: impl Into<QuantityInput>) -> OrderResult<LineChange> {
        let input = input.into();
        let (quantity, rejection) = match parse_quantity(&input) {
            Ok(quantity) => (quantity, None),
            Err(rejection) => {
                warn!(
                    line = self.id.0,
                    product = %self.product.qualified_name(),
                    input = %rejection.raw,
                    reason = ?rejection.reason,
                    "Rejected quantity input, line set to zero"
                );
                (0, Some(rejection))
            }
        };

        let line_total = pricing::line_total(self.product.unit_price(), quantity)?;
        let previous_quantity = self.quantity;

        self.quantity = quantity;
        self.line_total = line_total;
        self.rejection = rejection.clone();

        Ok(LineChange {
            line: self.id,
            previous_quantity,
            quantity,
            line_total,
            rejection,
        })
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }

    pub fn validation_flag(&self) -> Option<&QuantityRejection> {
        self.rejection.as_ref()
    }

    pub fn is_flagged(&self) -> bool {
        self.rejection.is_some()
    }

    pub(crate) fn renumber(&mut self, id: LineId) {
        self.id = id;
    }

    /// Back to an untouched row. Silent: the caller recomputes once afterwards.
    pub(crate) fn clear(&mut self) {
        self.quantity = 0;
        self.line_total = Money::ZERO;
        self.rejection = None;
    }
}
