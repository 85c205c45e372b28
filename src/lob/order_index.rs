//! Order id → last known (price, side).
//!
//! Only Add inserts and only Cancel removes. Trades adjust ledgers directly and
//! leave entries in place, so an id here may outlive the liquidity it added.

use ahash::AHashMap;

use crate::types::Side;

/// Last known resting attributes of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRecord {
    pub price: i64,
    pub side: Side,
}

/// Fast lookup table for active orders.
#[derive(Debug, Clone, Default)]
pub struct OrderIndex {
    orders: AHashMap<u64, OrderRecord>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or silently overwrite the record for `order_id`.
    #[inline]
    pub fn upsert(&mut self, order_id: u64, price: i64, side: Side) {
        self.orders.insert(order_id, OrderRecord { price, side });
    }

    /// Remove and return the record for `order_id`, if any.
    #[inline]
    pub fn lookup_and_remove(&mut self, order_id: u64) -> Option<OrderRecord> {
        self.orders.remove(&order_id)
    }

    #[inline]
    pub fn get(&self, order_id: u64) -> Option<&OrderRecord> {
        self.orders.get(&order_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }
}
