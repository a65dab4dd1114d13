use varner_shared::{Money, TaxRate};

/// Extended price of a line: unit price times quantity, exact.
pub fn line_total(unit_price: Money, quantity: u32) -> Result<Money, PricingError> {
    unit_price
        .checked_times(quantity)
        .ok_or(PricingError::Overflow("line total"))
}

/// Sales tax on a taxable base, rounded to cents half-up.
pub fn sales_tax(taxable_base: Money, rate: TaxRate) -> Result<Money, PricingError> {
    taxable_base
        .checked_apply_rate(rate)
        .ok_or(PricingError::Overflow("sales tax"))
}

/// Sum of line totals.
pub fn subtotal<I>(line_totals: I) -> Result<Money, PricingError>
where
    I: IntoIterator<Item = Money>,
{
    Money::checked_sum(line_totals).ok_or(PricingError::Overflow("subtotal"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Money::from_cents(1030), 12).unwrap(), Money::from_cents(12360));
        assert_eq!(line_total(Money::from_cents(1030), 0).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_sales_tax_rounding() {
        // 7.19 * 6% = 0.4314
        assert_eq!(sales_tax(Money::from_cents(719), TaxRate::michigan()).unwrap(), Money::from_cents(43));
        // 0.25 * 6% = 0.015, half rounds up
        assert_eq!(sales_tax(Money::from_cents(25), TaxRate::michigan()).unwrap(), Money::from_cents(2));
        assert_eq!(sales_tax(Money::from_cents(5300), TaxRate::zero()).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_subtotal() {
        let lines = [Money::from_cents(3600), Money::from_cents(1700), Money::ZERO];
        assert_eq!(subtotal(lines).unwrap(), Money::from_cents(5300));
    }

    #[test]
    fn test_overflow_reported() {
        let max = Money::from_decimal(rust_decimal::Decimal::MAX).unwrap();
        assert_eq!(line_total(max, 2), Err(PricingError::Overflow("line total")));
        assert_eq!(
            subtotal([max, Money::from_cents(100)]),
            Err(PricingError::Overflow("subtotal"))
        );
    }
}
