//! Aggregated price levels and the per-side ledger.
//!
//! # Invariant
//!
//! Every level stored in a [`Ledger`] has `total_size > 0`. A reduction that
//! brings a level to zero or below removes the level outright, counts and all.
//!
//! # Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `add` | O(log L) |
//! | `reduce` | O(log L) |
//! | `top_n` | O(n) |

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::{Rev, Take};

use crate::types::{LevelSnapshot, Side};

/// Aggregate resting interest at one price on one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceLevel {
    pub total_size: i64,
    pub order_count: i64,
}

/// Ordered price → level mapping for one side of the book.
///
/// Bids iterate from highest to lowest price, asks from lowest to highest.
#[derive(Debug, Clone)]
pub struct Ledger {
    side: Side,
    levels: BTreeMap<i64, PriceLevel>,
}

/// Outcome of [`Ledger::reduce`], used for bookkeeping by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// No level at that price; nothing changed
    Missing,
    /// Level still present with positive size
    Reduced,
    /// Level reached zero or below and was removed
    Removed,
}

impl Ledger {
    /// Create an empty bid ledger (descending).
    pub fn bids() -> Self {
        Self::new(Side::Bid)
    }

    /// Create an empty ask ledger (ascending).
    pub fn asks() -> Self {
        Self::new(Side::Ask)
    }

    fn new(side: Side) -> Self {
        debug_assert!(!matches!(side, Side::Neutral), "ledger needs a book side");
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Which side of the book this ledger holds.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Add one order of `size` at `price`, creating the level if absent.
    #[inline]
    pub fn add(&mut self, price: i64, size: i64) {
        let level = self.levels.entry(price).or_default();
        level.total_size = level.total_size.saturating_add(size);
        level.order_count = level.order_count.saturating_add(1);

        // An add of size <= 0 into a fresh level must not leave it behind.
        if level.total_size <= 0 {
            self.levels.remove(&price);
        }
    }

    /// Reduce the level at `price` by `size` and `count_delta` orders.
    ///
    /// Missing levels are left alone.
    #[inline]
    pub fn reduce(&mut self, price: i64, size: i64, count_delta: i64) -> Reduction {
        let Some(level) = self.levels.get_mut(&price) else {
            return Reduction::Missing;
        };

        level.total_size = level.total_size.saturating_sub(size);
        level.order_count = level.order_count.saturating_sub(count_delta);

        if level.total_size <= 0 {
            self.levels.remove(&price);
            Reduction::Removed
        } else {
            Reduction::Reduced
        }
    }

    /// Up to `n` levels in this side's natural order.
    ///
    /// The returned iterator is `Clone`, so a view can be walked more than once.
    #[inline]
    pub fn top_n(&self, n: usize) -> TopLevels<'_> {
        let inner = match self.side {
            Side::Bid => LevelsInner::Descending(self.levels.iter().rev().take(n)),
            _ => LevelsInner::Ascending(self.levels.iter().take(n)),
        };
        TopLevels { inner }
    }

    /// Best price on this side (highest bid / lowest ask).
    #[inline]
    pub fn best(&self) -> Option<LevelSnapshot> {
        self.top_n(1).next()
    }

    /// Level at an exact price.
    #[inline]
    pub fn level(&self, price: i64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Number of occupied price levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Lazy top-N view over a [`Ledger`].
#[derive(Debug, Clone)]
pub struct TopLevels<'a> {
    inner: LevelsInner<'a>,
}

#[derive(Debug, Clone)]
enum LevelsInner<'a> {
    Ascending(Take<btree_map::Iter<'a, i64, PriceLevel>>),
    Descending(Take<Rev<btree_map::Iter<'a, i64, PriceLevel>>>),
}

impl Iterator for TopLevels<'_> {
    type Item = LevelSnapshot;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (&price, level) = match &mut self.inner {
            LevelsInner::Ascending(iter) => iter.next()?,
            LevelsInner::Descending(iter) => iter.next()?,
        };
        Some(LevelSnapshot {
            price,
            total_size: level.total_size,
            order_count: level.order_count,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            LevelsInner::Ascending(iter) => iter.size_hint(),
            LevelsInner::Descending(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for TopLevels<'_> {}
