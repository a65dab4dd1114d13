pub mod line_item;
pub mod context;
pub mod totals;
pub mod notify;
pub mod engine;
pub mod snapshot;
pub mod form;

pub use line_item::{LineId, LineItemModel, QuantityInput, QuantityRejection, RejectReason};
pub use context::{ContextChange, Fulfillment, OrderContext, PaymentTerms, TaxStatus};
pub use totals::OrderTotals;
pub use notify::{LineChange, LineObserver, ListenerId, TotalsPublisher};
pub use engine::OrderTotalsEngine;
pub use snapshot::{OrderSnapshot, SnapshotLine};
pub use form::{CustomerInfo, OrderForm};

use varner_catalog::PricingError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid order setting: {0}")]
    InvalidContext(String),

    #[error("Engine is already attached to its line items")]
    AlreadyAttached,

    #[error("Engine has no attached line items")]
    NotAttached,

    #[error("No line {0} on this order")]
    UnknownLine(usize),

    #[error("Order totals invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

pub type OrderResult<T> = Result<T, OrderError>;
