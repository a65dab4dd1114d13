use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by every currency amount.
pub const CURRENCY_SCALE: u32 = 2;

/// A fixed-point currency amount (dollars, two decimal places).
///
/// `Money` carries the numeric value only. Turning it into text for a label,
/// a CSV cell or a printed summary is the job of [`format_currency`] and
/// [`format_plain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Build an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_SCALE))
    }

    /// Accept a decimal that is already at currency precision.
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.normalize().scale() > CURRENCY_SCALE {
            return Err(MoneyError::SubCentPrecision(amount.to_string()));
        }
        Ok(Money(amount))
    }

    /// Round an arbitrary decimal to cents, halves away from zero.
    pub fn round_half_up(amount: Decimal) -> Self {
        Money(amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiply by a unit count. Exact: no rounding is involved.
    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    /// Multiply by a rate and round the product back to cents.
    pub fn checked_apply_rate(self, rate: TaxRate) -> Option<Money> {
        self.0.checked_mul(rate.fraction()).map(Money::round_half_up)
    }

    /// Sum a sequence of amounts, `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Strict parse: optional leading `-`, digits, optional `.` followed by one
    /// or two digits. No currency sign, grouping, exponent or surrounding space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsigned = s.strip_prefix('-').unwrap_or(s);
        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (unsigned, None),
        };

        let digits_only = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits_only(whole) {
            return Err(MoneyError::InvalidFormat(s.to_string()));
        }
        if let Some(frac) = frac {
            if !digits_only(frac) {
                return Err(MoneyError::InvalidFormat(s.to_string()));
            }
            if frac.len() > CURRENCY_SCALE as usize {
                return Err(MoneyError::SubCentPrecision(s.to_string()));
            }
        }

        let amount = Decimal::from_str(s).map_err(|_| MoneyError::InvalidFormat(s.to_string()))?;
        Ok(Money(amount))
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

/// A sales-tax rate held as a fraction (`0.06` is 6%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl TaxRate {
    /// Michigan sales tax.
    pub fn michigan() -> Self {
        TaxRate(Decimal::new(6, 2))
    }

    pub fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Build a rate from a percentage in `0..=100`.
    pub fn from_percent(percent: Decimal) -> Result<Self, MoneyError> {
        if (percent.is_sign_negative() && !percent.is_zero()) || percent > Decimal::ONE_HUNDRED {
            return Err(MoneyError::OutOfRange(percent.to_string()));
        }
        percent
            .checked_div(Decimal::ONE_HUNDRED)
            .map(TaxRate)
            .ok_or(MoneyError::Overflow)
    }

    /// Parse percentage text such as `6`, `6.00` or `6.25`.
    pub fn parse_percent(text: &str) -> Result<Self, MoneyError> {
        let valid = !text.is_empty()
            && text.bytes().all(|b| b.is_ascii_digit() || b == b'.')
            && text.bytes().filter(|b| *b == b'.').count() <= 1
            && text.bytes().any(|b| b.is_ascii_digit());
        if !valid {
            return Err(MoneyError::InvalidFormat(text.to_string()));
        }
        let percent = Decimal::from_str(text).map_err(|_| MoneyError::InvalidFormat(text.to_string()))?;
        Self::from_percent(percent)
    }

    /// False only for rates that bypassed the constructors, e.g. via serde.
    pub fn is_in_range(&self) -> bool {
        !(self.0.is_sign_negative() && !self.0.is_zero()) && self.0 <= Decimal::ONE
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    pub fn percent(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// Percentage with two decimals, e.g. `6.00`.
    pub fn percent_display(&self) -> String {
        two_places(self.percent()).to_string()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::michigan()
    }
}

/// `1234.5` -> `1234.50`. Used for CSV cells.
pub fn format_plain(money: Money) -> String {
    two_places(money.amount()).to_string()
}

/// `1234.5` -> `$1,234.50`, negatives as `-$3.00`.
pub fn format_currency(money: Money) -> String {
    let plain = format_plain(money);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{frac}")
}

fn two_places(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Invalid amount: {0:?}")]
    InvalidFormat(String),

    #[error("Amount has more than two decimal places: {0}")]
    SubCentPrecision(String),

    #[error("Rate out of range (0-100%): {0}")]
    OutOfRange(String),

    #[error("Arithmetic overflow")]
    Overflow,
}
