//! Synchronous change notification between line items, the totals engine
//! and whoever displays or exports the totals.

use std::fmt;
use varner_shared::Money;

use crate::line_item::{LineId, QuantityRejection};
use crate::totals::OrderTotals;
use crate::OrderResult;

/// Emitted exactly once per quantity edit, even when the quantity is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub line: LineId,
    pub previous_quantity: u32,
    pub quantity: u32,
    pub line_total: Money,
    /// Set when the edit was rejected and the line coerced to zero.
    pub rejection: Option<QuantityRejection>,
}

/// Receives line-item change notifications.
pub trait LineObserver {
    fn line_changed(&mut self, change: &LineChange) -> OrderResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type TotalsListener = Box<dyn FnMut(&OrderTotals)>;

/// Fan-out of freshly recomputed totals, in subscription order.
#[derive(Default)]
pub struct TotalsPublisher {
    listeners: Vec<(ListenerId, TotalsListener)>,
    next_id: u64,
}

impl TotalsPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&OrderTotals) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, totals: &OrderTotals) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(totals);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for TotalsPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotalsPublisher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
