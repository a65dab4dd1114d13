use serde::{Deserialize, Serialize};
use varner_catalog::pricing;
use varner_shared::{Money, TaxRate};

use crate::context::OrderContext;
use crate::{OrderError, OrderResult};

/// Aggregate of an order, always rebuilt from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    /// Equal to the subtotal: the delivery fee is never taxed.
    pub taxable_base: Money,
    /// Rate applied, zero for exempt orders.
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub delivery_fee: Money,
    pub grand_total: Money,
}

impl OrderTotals {
    /// Pure aggregation over line totals and the context.
    pub fn compute<I>(line_totals: I, context: &OrderContext) -> OrderResult<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = pricing::subtotal(line_totals)?;
        let taxable_base = subtotal;
        let tax_rate = context.effective_tax_rate();
        let tax = pricing::sales_tax(taxable_base, tax_rate)?;
        let delivery_fee = context.effective_delivery_fee();
        let grand_total = pricing::subtotal([subtotal, tax, delivery_fee])?;

        let totals = Self {
            subtotal,
            taxable_base,
            tax_rate,
            tax,
            delivery_fee,
            grand_total,
        };
        totals.check()?;
        Ok(totals)
    }

    /// Totals of an order with nothing on it yet.
    pub fn empty(context: &OrderContext) -> Self {
        let delivery_fee = context.effective_delivery_fee();
        Self {
            subtotal: Money::ZERO,
            taxable_base: Money::ZERO,
            tax_rate: context.effective_tax_rate(),
            tax: Money::ZERO,
            delivery_fee,
            grand_total: delivery_fee,
        }
    }

    fn check(&self) -> OrderResult<()> {
        let parts = [
            ("subtotal", self.subtotal),
            ("tax", self.tax),
            ("delivery fee", self.delivery_fee),
            ("grand total", self.grand_total),
        ];
        for (name, amount) in parts {
            if amount.is_negative() {
                return Err(OrderError::InvariantViolation(format!("negative {}: {}", name, amount)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextChange, Fulfillment, TaxStatus};

    fn lines() -> Vec<Money> {
        // Mums 3 x 12.00, Pansies 2 x 8.50
        vec![Money::from_cents(3600), Money::from_cents(1700)]
    }

    #[test]
    fn test_overflow_is_an_error() {
        let max = Money::from_decimal(rust_decimal::Decimal::MAX).unwrap();
        let err = OrderTotals::compute([max, Money::from_cents(100)], &OrderContext::default()).unwrap_err();
        assert_eq!(err, OrderError::Pricing(varner_catalog::PricingError::Overflow("subtotal")));
    }

    #[test]
    fn test_pickup_scenario() {
        let totals = OrderTotals::compute(lines(), &OrderContext::default()).unwrap();
        assert_eq!(totals.subtotal, Money::from_cents(5300));
        assert_eq!(totals.taxable_base, Money::from_cents(5300));
        assert_eq!(totals.tax, Money::from_cents(318));
        assert_eq!(totals.delivery_fee, Money::ZERO);
        assert_eq!(totals.grand_total, Money::from_cents(5618));
    }

    #[test]
    fn test_delivery_scenario() {
        let mut ctx = OrderContext::default();
        ctx.apply(ContextChange::Fulfillment(Fulfillment::Delivery)).unwrap();
        ctx.apply(ContextChange::DeliveryFee(Money::from_cents(1500))).unwrap();

        let totals = OrderTotals::compute(lines(), &ctx).unwrap();
        assert_eq!(totals.tax, Money::from_cents(318));
        assert_eq!(totals.grand_total, Money::from_cents(7118));
    }

    #[test]
    fn test_all_zero() {
        let zeros = vec![Money::ZERO, Money::ZERO];
        let totals = OrderTotals::compute(zeros.clone(), &OrderContext::default()).unwrap();
        assert_eq!(totals.subtotal, Money::ZERO);
        assert_eq!(totals.tax, Money::ZERO);
        assert_eq!(totals.grand_total, Money::ZERO);

        let mut ctx = OrderContext::default();
        ctx.apply(ContextChange::Fulfillment(Fulfillment::Delivery)).unwrap();
        let totals = OrderTotals::compute(zeros, &ctx).unwrap();
        assert_eq!(totals.grand_total, Money::from_cents(4000));
        assert_eq!(totals, OrderTotals::empty(&ctx));
    }

    #[test]
    fn test_exempt_has_no_tax() {
        let ctx = OrderContext::default().with_tax_status(TaxStatus::Exempt);
        let totals = OrderTotals::compute(lines(), &ctx).unwrap();
        assert_eq!(totals.tax, Money::ZERO);
        assert_eq!(totals.grand_total, Money::from_cents(5300));
    }

    #[test]
    fn test_negative_line_is_a_defect() {
        let result = OrderTotals::compute(vec![Money::from_cents(-100)], &OrderContext::default());
        assert!(matches!(result, Err(OrderError::InvariantViolation(_))));
    }
}
