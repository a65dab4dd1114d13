use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use varner_shared::Money;

use crate::context::OrderContext;
use crate::form::CustomerInfo;
use crate::line_item::{LineId, LineItemModel};
use crate::totals::OrderTotals;

/// One form row as an exporter sees it. Nothing left to compute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotLine {
    pub line: LineId,
    /// Empty for ungrouped products
    pub group: String,
    pub item: String,
    pub qualified_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub flagged: bool,
}

impl SnapshotLine {
    pub fn from_line(line: &LineItemModel) -> Self {
        let product = line.product();
        Self {
            line: line.id(),
            group: product.group().unwrap_or_default().to_string(),
            item: product.name().to_string(),
            qualified_name: product.qualified_name(),
            quantity: line.quantity(),
            unit_price: product.unit_price(),
            line_total: line.line_total(),
            flagged: line.is_flagged(),
        }
    }
}

/// Everything an exporter needs, as of the most recent recompute.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSnapshot {
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerInfo,
    pub notes: String,
    pub context: OrderContext,
    pub lines: Vec<SnapshotLine>,
    pub totals: OrderTotals,
    pub revision: u64,
}

impl OrderSnapshot {
    /// Lines with a quantity, in form order.
    pub fn ordered_lines(&self) -> impl Iterator<Item = &SnapshotLine> {
        self.lines.iter().filter(|line| line.quantity > 0)
    }

    pub fn has_items(&self) -> bool {
        self.ordered_lines().next().is_some()
    }
}
