//! # MBP-Reconstructor
//!
//! Replays a Market-by-Order (MBO) event log and emits a Market-by-Price
//! top-10 (MBP-10) snapshot for every event, so downstream analytics and
//! backtests get the visible book without replaying order flow themselves.
//!
//! ## Features
//!
//! - **Exact price keys**: decimal prices are scaled by 10 000 into integers
//! - **Fixed-width output**: 10 ask and 10 bid slots per row, empty when absent
//! - **Trade-aware**: trades hit the side opposite the aggressor, fill legs are
//!   swallowed, neutral trades are ignored
//! - **Best effort**: malformed fields decode to zero, unknown ids are no-ops
//!
//! ## Quick Start
//!
//! ```rust
//! use mbp_reconstructor::{Action, MbpBook, MboEvent, Side, SnapshotFormatter};
//!
//! let mut book = MbpBook::new();
//! let mut formatter = SnapshotFormatter::new();
//!
//! let add = MboEvent::new(1, Action::Add, Side::Bid, 1_000_000, 5) // 100.0000
//!     .with_timestamp(1_752_739_503_360_677_248);
//!
//! if book.apply(&add).emits() {
//!     let row = formatter.render_line(add.ts_event, &book);
//!     assert!(row.starts_with("1752739503360677248,,,,1000000,5,1"));
//! }
//! ```
//!
//! ### Replay a file
//!
//! ```ignore
//! use mbp_reconstructor::replay::{replay_file, ReplayConfig};
//!
//! let report = replay_file("mbo.csv", "mbp.csv", ReplayConfig::default())?;
//! println!("{} rows written", report.rows_written);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | `MboEvent`, `Action`, `Side`, `PRICE_SCALE`, `MBP_DEPTH` |
//! | [`decoder`] | Positional CSV field decoding |
//! | [`lob`] | `Ledger`, `OrderIndex`, `MbpBook` event processor |
//! | [`snapshot`] | MBP-10 header and row rendering |
//! | [`source`] | `EventSource`, `CsvSource`, `VecSource` |
//! | [`sink`] | `RecordSink`, `CsvSink`, `MemorySink` |
//! | [`replay`] | `Replayer`, `ReplayConfig`, `replay_file` |
//! | [`statistics`] | `ReplayReport` |

pub mod decoder;
pub mod error;
pub mod lob;
pub mod replay;
pub mod sink;
pub mod snapshot;
pub mod source;
pub mod statistics;
pub mod types;

// Re-exports - Core types
pub use error::{MbpError, Result};
pub use types::{Action, LevelSnapshot, MboEvent, Side, MBP_DEPTH, PRICE_SCALE};

// Re-exports - Book
pub use lob::{BookConfig, BookStats, EventOutcome, Ledger, MbpBook, OrderIndex, PriceLevel};

// Re-exports - Rendering and I/O
pub use replay::{replay_file, ReplayConfig, Replayer};
pub use sink::{CsvSink, MemorySink, RecordSink};
pub use snapshot::{mbp_header, SnapshotFormatter, MBP_FIELDS};
pub use source::{CsvSource, EventSource, SourceMetadata, VecSource};
pub use statistics::ReplayReport;
