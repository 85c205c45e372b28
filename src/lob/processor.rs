//! Event processor: applies one MBO event to the book.
//!
//! Book state is an explicit [`MbpBook`] value (two ledgers plus the order
//! index). Each call to [`MbpBook::apply`] dispatches on the event's action
//! and reports whether a snapshot row should be emitted for it.
//!
//! | action | effect | emits |
//! |--------|--------|-------|
//! | Add | `ledger(side).add`, index upsert | yes |
//! | Cancel | index lookup+remove, then `ledger(rec.side).reduce(rec.price, size, 1)` | yes |
//! | Trade (A / B) | reduce the *opposite* ledger at `price` by `size`, 1 order | yes |
//! | Trade (N) | nothing | yes |
//! | Fill | nothing | no |
//! | other | nothing | yes |
//!
//! # Order counts are estimates
//!
//! Cancel and Trade both decrement `order_count` by exactly one, whatever the
//! number of resting orders the size actually came from. Trades also leave the
//! matched order's index entry in place. Exact counts would need per-order
//! resting quantities, which this book does not keep.

use serde::{Deserialize, Serialize};

use crate::lob::order_index::OrderIndex;
use crate::lob::price_level::{Ledger, Reduction};
use crate::types::{Action, MboEvent, Side};

/// Whether a processed event produces an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Render and write a snapshot for this event
    Emit,
    /// Swallow the event (fill legs)
    Suppress,
}

impl EventOutcome {
    #[inline]
    pub fn emits(self) -> bool {
        matches!(self, EventOutcome::Emit)
    }
}

/// Configuration for book behavior.
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Log referential misses (unknown cancel ids, trades on empty levels)
    /// at debug level
    pub log_misses: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self { log_misses: true }
    }
}

impl BookConfig {
    /// Enable/disable miss logging.
    pub fn with_miss_logging(mut self, log: bool) -> Self {
        self.log_misses = log;
        self
    }
}

/// Counters describing what the book has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStats {
    /// Total events applied (fills included)
    pub events_processed: u64,
    pub adds: u64,
    pub cancels: u64,
    pub trades: u64,
    /// Fill events swallowed without output
    pub fills_suppressed: u64,
    /// Events with an action code the book does not act on
    pub other_actions: u64,
    /// Adds with a neutral side (indexed, no ledger effect)
    pub neutral_adds: u64,
    /// Cancels for an order id not in the index
    pub unknown_cancels: u64,
    /// Cancels whose indexed price level was already gone
    pub cancel_level_misses: u64,
    /// Trades against a price with no resting level
    pub trade_level_misses: u64,
    /// Trades with a neutral aggressor side
    pub neutral_trades: u64,
    /// Levels removed after reaching zero size
    pub levels_removed: u64,
    /// Events whose ts_event was lower than the previous event's
    pub timestamp_regressions: u64,
    /// Last ts_event applied
    pub last_timestamp: Option<i64>,
    /// Entries in the order index
    pub active_orders: usize,
    pub bid_levels: usize,
    pub ask_levels: usize,
}

/// Price-aggregated order book rebuilt from MBO events.
#[derive(Debug, Clone)]
pub struct MbpBook {
    config: BookConfig,
    bids: Ledger,
    asks: Ledger,
    orders: OrderIndex,
    stats: BookStats,
}

impl Default for MbpBook {
    fn default() -> Self {
        Self::new()
    }
}

impl MbpBook {
    /// Create an empty book.
    ///
    /// # Example
    /// ```
    /// use mbp_reconstructor::{Action, MbpBook, MboEvent, Side};
    ///
    /// let mut book = MbpBook::new();
    /// book.apply(&MboEvent::new(1, Action::Add, Side::Bid, 1_000_000, 5));
    /// assert_eq!(book.bids().best().unwrap().total_size, 5);
    /// ```
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            bids: Ledger::bids(),
            asks: Ledger::asks(),
            orders: OrderIndex::new(),
            stats: BookStats::default(),
        }
    }

    /// Apply one event and report whether a snapshot should be emitted.
    #[inline]
    pub fn apply(&mut self, event: &MboEvent) -> EventOutcome {
        self.track_timestamp(event.ts_event);
        self.stats.events_processed += 1;

        let outcome = match event.action {
            Action::Add => {
                self.add_order(event);
                EventOutcome::Emit
            }
            Action::Cancel => {
                self.cancel_order(event);
                EventOutcome::Emit
            }
            Action::Trade => {
                self.process_trade(event);
                EventOutcome::Emit
            }
            Action::Fill => {
                self.stats.fills_suppressed += 1;
                EventOutcome::Suppress
            }
            Action::Other(_) => {
                self.stats.other_actions += 1;
                EventOutcome::Emit
            }
        };

        self.stats.active_orders = self.orders.len();
        self.stats.bid_levels = self.bids.len();
        self.stats.ask_levels = self.asks.len();

        outcome
    }

    fn add_order(&mut self, event: &MboEvent) {
        self.stats.adds += 1;

        match event.side {
            Side::Bid => self.bids.add(event.price, event.size),
            Side::Ask => self.asks.add(event.price, event.size),
            Side::Neutral => self.stats.neutral_adds += 1,
        }

        self.orders.upsert(event.order_id, event.price, event.side);
    }

    fn cancel_order(&mut self, event: &MboEvent) {
        self.stats.cancels += 1;

        let Some(record) = self.orders.lookup_and_remove(event.order_id) else {
            self.stats.unknown_cancels += 1;
            if self.config.log_misses {
                log::debug!(
                    "Cancel for unknown order {} at ts_event={}",
                    event.order_id,
                    event.ts_event
                );
            }
            return;
        };

        let reduction = match self.ledger_mut(record.side) {
            Some(ledger) => ledger.reduce(record.price, event.size, 1),
            None => return,
        };

        match reduction {
            Reduction::Removed => self.stats.levels_removed += 1,
            Reduction::Reduced => {}
            Reduction::Missing => {
                self.stats.cancel_level_misses += 1;
                if self.config.log_misses {
                    log::debug!(
                        "Cancel for order {} found no {:?} level at {}",
                        event.order_id,
                        record.side,
                        record.price
                    );
                }
            }
        }
    }

    /// The trade's side is the aggressor; resting liquidity comes off the
    /// other side.
    fn process_trade(&mut self, event: &MboEvent) {
        self.stats.trades += 1;

        let resting = event.side.opposite();
        if resting == Side::Neutral {
            self.stats.neutral_trades += 1;
            return;
        }

        let reduction = match self.ledger_mut(resting) {
            Some(ledger) => ledger.reduce(event.price, event.size, 1),
            None => return,
        };

        match reduction {
            Reduction::Removed => self.stats.levels_removed += 1,
            Reduction::Reduced => {}
            Reduction::Missing => {
                self.stats.trade_level_misses += 1;
                if self.config.log_misses {
                    log::debug!(
                        "Trade ({:?} aggressor) found no {:?} level at {} (ts_event={})",
                        event.side,
                        resting,
                        event.price,
                        event.ts_event
                    );
                }
            }
        }
    }

    #[inline]
    fn track_timestamp(&mut self, ts_event: i64) {
        if let Some(last) = self.stats.last_timestamp {
            if ts_event < last {
                self.stats.timestamp_regressions += 1;
                log::warn!(
                    "ts_event went backwards: {} after {} (event #{})",
                    ts_event,
                    last,
                    self.stats.events_processed + 1
                );
            }
        }
        self.stats.last_timestamp = Some(ts_event);
    }

    #[inline]
    fn ledger_mut(&mut self, side: Side) -> Option<&mut Ledger> {
        match side {
            Side::Bid => Some(&mut self.bids),
            Side::Ask => Some(&mut self.asks),
            Side::Neutral => None,
        }
    }

    /// Bid ledger (highest price first).
    #[inline]
    pub fn bids(&self) -> &Ledger {
        &self.bids
    }

    /// Ask ledger (lowest price first).
    #[inline]
    pub fn asks(&self) -> &Ledger {
        &self.asks
    }

    #[inline]
    pub fn orders(&self) -> &OrderIndex {
        &self.orders
    }

    pub fn stats(&self) -> &BookStats {
        &self.stats
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Reset the book to empty state.
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.orders.clear();
        self.stats = BookStats::default();
    }
}
