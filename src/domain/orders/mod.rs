//! Orders module - Order lifecycle events and the read models the
//! aggregation engine folds over.

mod event;
mod records;

pub use event::{LoggedEvent, OrderCreatedData, OrderEvent, OrderEventType, StatusChangedData};
pub use records::{LineItem, OrderRecord, OrderStatus, ProductRecord};
