use serde::{Deserialize, Serialize};
use std::fmt;
use varner_catalog::product::MAX_UNIT_PRICE_CENTS;
use varner_shared::{Money, TaxRate};

use crate::{OrderError, OrderResult};

/// Pickup and delivery are exclusive; there is no partial state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fulfillment {
    #[default]
    Pickup,
    Delivery,
}

impl fmt::Display for Fulfillment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fulfillment::Pickup => "PICK UP",
            Fulfillment::Delivery => "DELIVERY",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxStatus {
    #[default]
    PaysSalesTax,
    Exempt,
}

impl fmt::Display for TaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaxStatus::PaysSalesTax => "PAYS SALES TAX",
            TaxStatus::Exempt => "SALES TAX EXEMPT",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerms {
    #[default]
    #[serde(rename = "CASH_ON_DELIVERY")]
    CashOnDelivery,
    #[serde(rename = "NET_30")]
    Net30,
}

impl fmt::Display for PaymentTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentTerms::CashOnDelivery => "C.O.D.",
            PaymentTerms::Net30 => "NET 30",
        })
    }
}

/// Order-wide settings that feed the totals. Only built through validated
/// edits, so it is serialized for exports but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderContext {
    tax_rate: TaxRate,
    tax_status: TaxStatus,
    fulfillment: Fulfillment,
    /// Fee entered for delivery. Kept while on pickup, charged only on delivery.
    delivery_fee: Money,
    /// Delivery "starts at" this amount; switching to delivery raises the fee to it.
    minimum_delivery_fee: Money,
    payment_terms: PaymentTerms,
}

/// A single user-driven edit of the order context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextChange {
    Fulfillment(Fulfillment),
    DeliveryFee(Money),
    TaxRate(TaxRate),
    TaxStatus(TaxStatus),
    PaymentTerms(PaymentTerms),
}

impl Default for OrderContext {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::michigan(),
            tax_status: TaxStatus::PaysSalesTax,
            fulfillment: Fulfillment::Pickup,
            delivery_fee: Money::ZERO,
            minimum_delivery_fee: Money::from_cents(4000),
            payment_terms: PaymentTerms::CashOnDelivery,
        }
    }
}

impl OrderContext {
    pub fn with_tax_rate(mut self, rate: TaxRate) -> OrderResult<Self> {
        self.apply(ContextChange::TaxRate(rate))?;
        Ok(self)
    }

    pub fn with_tax_status(mut self, status: TaxStatus) -> Self {
        self.tax_status = status;
        self
    }

    pub fn with_payment_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = terms;
        self
    }

    pub fn with_minimum_delivery_fee(mut self, fee: Money) -> OrderResult<Self> {
        ensure_fee("minimum delivery fee", fee)?;
        self.minimum_delivery_fee = fee;
        Ok(self)
    }

    /// Apply one edit. Rejected edits leave the context untouched.
    pub fn apply(&mut self, change: ContextChange) -> OrderResult<()> {
        match change {
            ContextChange::Fulfillment(Fulfillment::Delivery) => {
                if self.delivery_fee < self.minimum_delivery_fee {
                    self.delivery_fee = self.minimum_delivery_fee;
                }
                self.fulfillment = Fulfillment::Delivery;
            }
            ContextChange::Fulfillment(Fulfillment::Pickup) => {
                self.fulfillment = Fulfillment::Pickup;
            }
            ContextChange::DeliveryFee(fee) => {
                ensure_fee("delivery fee", fee)?;
                self.delivery_fee = fee;
            }
            ContextChange::TaxRate(rate) => {
                if !rate.is_in_range() {
                    return Err(OrderError::InvalidContext(format!(
                        "tax rate {}% is outside 0-100%",
                        rate.percent_display()
                    )));
                }
                self.tax_rate = rate;
            }
            ContextChange::TaxStatus(status) => self.tax_status = status,
            ContextChange::PaymentTerms(terms) => self.payment_terms = terms,
        }
        Ok(())
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn tax_status(&self) -> TaxStatus {
        self.tax_status
    }

    pub fn fulfillment(&self) -> Fulfillment {
        self.fulfillment
    }

    pub fn is_delivery(&self) -> bool {
        self.fulfillment == Fulfillment::Delivery
    }

    pub fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    pub fn minimum_delivery_fee(&self) -> Money {
        self.minimum_delivery_fee
    }

    pub fn payment_terms(&self) -> PaymentTerms {
        self.payment_terms
    }

    /// Rate actually charged: zero for exempt customers.
    pub fn effective_tax_rate(&self) -> TaxRate {
        match self.tax_status {
            TaxStatus::PaysSalesTax => self.tax_rate,
            TaxStatus::Exempt => TaxRate::zero(),
        }
    }

    /// Skips `apply` validation so tests can reach states no edit produces.
    #[cfg(test)]
    pub(crate) fn force_delivery_fee(&mut self, fee: Money) {
        self.delivery_fee = fee;
    }

    /// Fee actually charged: zero on pickup.
    pub fn effective_delivery_fee(&self) -> Money {
        match self.fulfillment {
            Fulfillment::Delivery => self.delivery_fee,
            Fulfillment::Pickup => Money::ZERO,
        }
    }
}

/// Fees share the catalog's price ceiling.
fn ensure_fee(what: &str, amount: Money) -> OrderResult<()> {
    if amount.is_negative() {
        return Err(OrderError::InvalidContext(format!("{} cannot be negative: {}", what, amount)));
    }
    if amount > Money::from_cents(MAX_UNIT_PRICE_CENTS) {
        return Err(OrderError::InvalidContext(format!(
            "{} {} is above the {} limit",
            what,
            amount,
            Money::from_cents(MAX_UNIT_PRICE_CENTS)
        )));
    }
    Ok(())
}
