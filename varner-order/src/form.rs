use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use varner_catalog::Catalog;
use varner_shared::Masked;

use crate::context::OrderContext;
use crate::engine::OrderTotalsEngine;
use crate::snapshot::OrderSnapshot;
use crate::totals::OrderTotals;
use crate::OrderResult;

pub const DEFAULT_COMBO_NOTE: &str = "If you want specific color combos, please request on a separate \
document and include it with this order; otherwise we'll provide the best-looking mixed combos.";

/// Who the order is for. Phone numbers never reach log output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerInfo {
    pub business_name: String,
    pub contact_name: String,
    pub cell_phone: Masked<String>,
    pub business_phone: Masked<String>,
}

/// One order-entry session: header fields plus the live totals engine.
#[derive(Debug)]
pub struct OrderForm {
    id: Uuid,
    created_at: DateTime<Utc>,
    customer: CustomerInfo,
    notes: String,
    defaults: OrderContext,
    engine: OrderTotalsEngine,
}

impl OrderForm {
    /// Open a blank form over `catalog`. `defaults` is also what reset restores.
    pub fn open(catalog: &Catalog, defaults: OrderContext) -> OrderResult<Self> {
        let engine = OrderTotalsEngine::from_catalog(catalog, defaults.clone())?;
        let form = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            customer: CustomerInfo::default(),
            notes: DEFAULT_COMBO_NOTE.to_string(),
            defaults,
            engine,
        };
        info!(order_id = %form.id, lines = form.engine.lines().len(), "Opened order form");
        Ok(form)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn customer_mut(&mut self) -> &mut CustomerInfo {
        &mut self.customer
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn engine(&self) -> &OrderTotalsEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut OrderTotalsEngine {
        &mut self.engine
    }

    /// Clear the form back to a blank order with default settings.
    pub fn reset(&mut self) -> OrderResult<OrderTotals> {
        self.customer = CustomerInfo::default();
        self.notes.clear();
        let totals = self.engine.reset(self.defaults.clone())?;
        info!(order_id = %self.id, "Order form reset");
        Ok(totals)
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            order_id: self.id,
            created_at: self.created_at,
            customer: self.customer.clone(),
            notes: self.notes.clone(),
            context: self.engine.context().clone(),
            lines: self.engine.export_lines(),
            totals: self.engine.totals(),
            revision: self.engine.revision(),
        }
    }
}
