//! Core data types for MBO events and MBP levels.
//!
//! Prices are carried as scaled integers (decimal price × [`PRICE_SCALE`]) so
//! that ledger keys are exact and totally ordered.

use serde::{Deserialize, Serialize};

/// Scale factor applied to decimal prices before they are used as book keys.
pub const PRICE_SCALE: i64 = 10_000;

/// Number of price levels per side in every emitted snapshot.
pub const MBP_DEPTH: usize = 10;

/// MBO action type (what happened to the order).
///
/// Anything the book does not act on is kept as [`Action::Other`] with its raw
/// byte, so clear markers, modifies and garbage all pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Add new order to book
    Add,
    /// Cancel/remove order (size taken from the event)
    Cancel,
    /// Trade execution; `side` names the aggressor
    Trade,
    /// Fill confirmation leg of a prior trade
    Fill,
    /// Any other action code (0 when the field was missing)
    Other(u8),
}

impl Action {
    /// Parse action from a byte. Never fails.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'A' => Action::Add,
            b'C' => Action::Cancel,
            b'T' => Action::Trade,
            b'F' => Action::Fill,
            other => Action::Other(other),
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        match self {
            Action::Add => b'A',
            Action::Cancel => b'C',
            Action::Trade => b'T',
            Action::Fill => b'F',
            Action::Other(byte) => byte,
        }
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bid)
    Bid = b'B',
    /// Sell side (ask)
    Ask = b'A',
    /// Non-directional; also what a missing or unknown side code decodes to
    Neutral = b'N',
}

impl Side {
    /// Parse side from a byte. Unknown codes map to `Neutral`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'B' => Side::Bid,
            b'A' => Side::Ask,
            _ => Side::Neutral,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Check if this is a bid.
    #[inline(always)]
    pub fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Check if this is an ask.
    #[inline(always)]
    pub fn is_ask(self) -> bool {
        matches!(self, Side::Ask)
    }

    /// The side whose resting liquidity an aggressor on `self` consumes.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
            Side::Neutral => Side::Neutral,
        }
    }
}

/// One decoded Market-by-Order event.
///
/// Lives only for the duration of one record's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MboEvent {
    /// Event timestamp as an integer; the output row re-renders it, so
    /// padding, a leading `+` and leading zeros are not preserved and
    /// non-integer text (ISO-8601) becomes `0`
    pub ts_event: i64,

    /// Order action
    pub action: Action,

    /// Order side (aggressor side for trades)
    pub side: Side,

    /// Price in scaled form (divide by [`PRICE_SCALE`] for decimal)
    pub price: i64,

    /// Size in shares/contracts
    pub size: i64,

    /// Order identifier
    pub order_id: u64,
}

impl MboEvent {
    /// Create a new event with a zero timestamp.
    pub fn new(order_id: u64, action: Action, side: Side, price: i64, size: i64) -> Self {
        Self {
            ts_event: 0,
            action,
            side,
            price,
            size,
            order_id,
        }
    }

    /// Set the event timestamp.
    pub fn with_timestamp(mut self, ts_event: i64) -> Self {
        self.ts_event = ts_event;
        self
    }

    /// Get price as floating point.
    #[inline]
    pub fn price_as_f64(&self) -> f64 {
        self.price as f64 / PRICE_SCALE as f64
    }
}

/// One aggregated price level as yielded by a ledger's top-N view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub price: i64,
    pub total_size: i64,
    pub order_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_byte() {
        assert_eq!(Action::from_byte(b'A'), Action::Add);
        assert_eq!(Action::from_byte(b'C'), Action::Cancel);
        assert_eq!(Action::from_byte(b'T'), Action::Trade);
        assert_eq!(Action::from_byte(b'F'), Action::Fill);
        assert_eq!(Action::from_byte(b'R'), Action::Other(b'R'));
        assert_eq!(Action::from_byte(0), Action::Other(0));
    }

    #[test]
    fn test_action_to_byte() {
        assert_eq!(Action::Add.to_byte(), b'A');
        assert_eq!(Action::Cancel.to_byte(), b'C');
        assert_eq!(Action::Trade.to_byte(), b'T');
        assert_eq!(Action::Fill.to_byte(), b'F');
        assert_eq!(Action::Other(b'M').to_byte(), b'M');
    }

    #[test]
    fn test_side_from_byte() {
        assert_eq!(Side::from_byte(b'B'), Side::Bid);
        assert_eq!(Side::from_byte(b'A'), Side::Ask);
        assert_eq!(Side::from_byte(b'N'), Side::Neutral);
        assert_eq!(Side::from_byte(b'X'), Side::Neutral);
        assert_eq!(Side::from_byte(0), Side::Neutral);
    }

    #[test]
    fn test_side_checks() {
        assert!(Side::Bid.is_bid());
        assert!(!Side::Ask.is_bid());
        assert!(Side::Ask.is_ask());
        assert!(!Side::Neutral.is_bid());
        assert!(!Side::Neutral.is_ask());
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
        assert_eq!(Side::Neutral.opposite(), Side::Neutral);
    }

    #[test]
    fn test_event_price_conversion() {
        let event = MboEvent::new(1, Action::Add, Side::Bid, 1_000_000, 5);
        assert_eq!(event.price_as_f64(), 100.0);
    }

    #[test]
    fn test_event_with_timestamp() {
        let event = MboEvent::new(7, Action::Trade, Side::Ask, 1_010_000, 4)
            .with_timestamp(1_752_755_400_001_234_567);
        assert_eq!(event.ts_event, 1_752_755_400_001_234_567);
        assert_eq!(event.order_id, 7);
    }
}
