use tracing::{debug, error, trace};
use varner_catalog::Catalog;
use varner_shared::{Money, TaxRate};

use crate::context::{ContextChange, Fulfillment, OrderContext, PaymentTerms, TaxStatus};
use crate::line_item::{LineId, LineItemModel, QuantityInput};
use crate::notify::{LineChange, LineObserver, ListenerId, TotalsPublisher};
use crate::snapshot::SnapshotLine;
use crate::totals::OrderTotals;
use crate::{OrderError, OrderResult};

/// Keeps the order totals in step with every line item and the order context.
///
/// The engine owns the line items once attached, so every quantity edit goes
/// through [`OrderTotalsEngine::set_quantity`] and its notification is
/// delivered before the call returns. Each triggering event produces exactly
/// one recompute and one publication; nothing is queued or deferred.
#[derive(Debug)]
pub struct OrderTotalsEngine {
    items: Vec<LineItemModel>,
    context: OrderContext,
    totals: OrderTotals,
    publisher: TotalsPublisher,
    attached: bool,
    revision: u64,
}

impl OrderTotalsEngine {
    pub fn new() -> Self {
        let context = OrderContext::default();
        Self {
            items: Vec::new(),
            totals: OrderTotals::empty(&context),
            context,
            publisher: TotalsPublisher::new(),
            attached: false,
            revision: 0,
        }
    }

    /// One line per catalog product, attached and computed.
    pub fn from_catalog(catalog: &Catalog, context: OrderContext) -> OrderResult<Self> {
        let items = catalog
            .iter()
            .enumerate()
            .map(|(i, product)| LineItemModel::new(LineId(i), product.clone()))
            .collect();

        let mut engine = Self::new();
        engine.attach(items, context)?;
        Ok(engine)
    }

    /// Take ownership of the form's line items and start observing them.
    ///
    /// Line ids are renumbered to their position in `items`. Allowed once.
    pub fn attach(&mut self, items: Vec<LineItemModel>, context: OrderContext) -> OrderResult<OrderTotals> {
        if self.attached {
            return Err(OrderError::AlreadyAttached);
        }

        self.items = items;
        for (i, item) in self.items.iter_mut().enumerate() {
            item.renumber(LineId(i));
        }
        self.context = context;
        self.attached = true;

        debug!("Totals engine attached to {} line items", self.items.len());
        self.recompute()
    }

    /// Rebuild the totals from every line and the context, then publish.
    ///
    /// Idempotent: with no intervening edit the result is identical. A
    /// failure is an invariant violation; the last good totals are kept and
    /// nothing is published. Edits that trigger a failed recompute are rolled
    /// back by their callers.
    pub fn recompute(&mut self) -> OrderResult<OrderTotals> {
        if !self.attached {
            return Err(OrderError::NotAttached);
        }

        let totals = match OrderTotals::compute(self.items.iter().map(|i| i.line_total()), &self.context) {
            Ok(totals) => totals,
            Err(e) => {
                error!("Order totals recompute failed: {}", e);
                return Err(e);
            }
        };

        self.totals = totals;
        self.revision += 1;
        debug!(
            revision = self.revision,
            subtotal = %totals.subtotal,
            tax = %totals.tax,
            delivery = %totals.delivery_fee,
            grand_total = %totals.grand_total,
            "Order totals published"
        );
        self.publisher.publish(&totals);
        Ok(totals)
    }

    /// Edit one line's quantity. Rejected input still recomputes, using zero.
    pub fn set_quantity(&mut self, line: LineId, input: impl Into<QuantityInput>) -> OrderResult<LineChange> {
        let item = self
            .items
            .get_mut(line.0)
            .ok_or(OrderError::UnknownLine(line.0))?;
        let previous = item.clone();
        let change = item.set_quantity(input)?;

        // the line and the published totals move together or not at all
        if let Err(e) = self.line_changed(&change) {
            self.items[line.0] = previous;
            return Err(e);
        }
        Ok(change)
    }

    /// Apply a context edit and recompute. Rejected edits change nothing.
    pub fn update_context(&mut self, change: ContextChange) -> OrderResult<OrderTotals> {
        if !self.attached {
            return Err(OrderError::NotAttached);
        }
        let previous = self.context.clone();
        self.context.apply(change)?;
        match self.recompute() {
            Ok(totals) => Ok(totals),
            Err(e) => {
                self.context = previous;
                Err(e)
            }
        }
    }

    pub fn set_delivery(&mut self, delivery: bool) -> OrderResult<OrderTotals> {
        let fulfillment = if delivery {
            Fulfillment::Delivery
        } else {
            Fulfillment::Pickup
        };
        self.update_context(ContextChange::Fulfillment(fulfillment))
    }

    pub fn set_delivery_fee(&mut self, fee: Money) -> OrderResult<OrderTotals> {
        self.update_context(ContextChange::DeliveryFee(fee))
    }

    pub fn set_tax_rate(&mut self, rate: TaxRate) -> OrderResult<OrderTotals> {
        self.update_context(ContextChange::TaxRate(rate))
    }

    pub fn set_tax_status(&mut self, status: TaxStatus) -> OrderResult<OrderTotals> {
        self.update_context(ContextChange::TaxStatus(status))
    }

    pub fn set_payment_terms(&mut self, terms: PaymentTerms) -> OrderResult<OrderTotals> {
        self.update_context(ContextChange::PaymentTerms(terms))
    }

    /// Zero every line, clear row flags, restore `context`; one recompute.
    pub fn reset(&mut self, context: OrderContext) -> OrderResult<OrderTotals> {
        if !self.attached {
            return Err(OrderError::NotAttached);
        }
        let previous_items = self.items.clone();
        let previous_context = std::mem::replace(&mut self.context, context);
        for item in self.items.iter_mut() {
            item.clear();
        }
        match self.recompute() {
            Ok(totals) => Ok(totals),
            Err(e) => {
                self.items = previous_items;
                self.context = previous_context;
                Err(e)
            }
        }
    }

    /// Register a listener for every future publication.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&OrderTotals) + 'static,
    {
        self.publisher.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.publisher.unsubscribe(id)
    }

    /// Totals as of the most recent successful recompute.
    pub fn totals(&self) -> OrderTotals {
        self.totals
    }

    pub fn context(&self) -> &OrderContext {
        &self.context
    }

    pub fn lines(&self) -> &[LineItemModel] {
        &self.items
    }

    pub fn line(&self, id: LineId) -> Option<&LineItemModel> {
        self.items.get(id.0)
    }

    pub fn line_id(&self, qualified_name: &str) -> Option<LineId> {
        self.items
            .iter()
            .find(|item| item.product().qualified_name() == qualified_name)
            .map(|item| item.id())
    }

    /// Number of publications so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Every line in form order, ready for an exporter.
    pub fn export_lines(&self) -> Vec<SnapshotLine> {
        self.items.iter().map(SnapshotLine::from_line).collect()
    }
}

impl Default for OrderTotalsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LineObserver for OrderTotalsEngine {
    fn line_changed(&mut self, change: &LineChange) -> OrderResult<()> {
        trace!(
            line = change.line.0,
            from = change.previous_quantity,
            to = change.quantity,
            "Line item changed"
        );
        self.recompute().map(|_| ())
    }
}
