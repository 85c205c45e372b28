//! Order book state rebuilt from MBO events.
//!
//! Two price-level ledgers and one order index, driven by the per-event
//! processor in [`processor`].

pub mod order_index;
pub mod price_level;
pub mod processor;

pub use order_index::{OrderIndex, OrderRecord};
pub use price_level::{Ledger, PriceLevel, Reduction, TopLevels};
pub use processor::{BookConfig, BookStats, EventOutcome, MbpBook};
