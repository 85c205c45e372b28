//! Replay driver: source → book → snapshot rows → sink.
//!
//! Strictly sequential. Each event is applied and, unless the book suppresses
//! it, rendered and written before the next event is read. The run ends when
//! the source is exhausted; the first read or write error aborts it.

use std::path::Path;
use std::time::Instant;

use csv::ByteRecord;

use crate::error::Result;
use crate::lob::{BookConfig, MbpBook};
use crate::sink::{CsvSink, RecordSink};
use crate::snapshot::{mbp_header, SnapshotFormatter, MBP_FIELDS};
use crate::source::{CsvSource, EventSource, DEFAULT_PREAMBLE_RECORDS};
use crate::statistics::ReplayReport;

/// Configuration for a replay run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Leading records discarded by file-backed sources
    pub preamble_records: usize,

    /// Whether to write the MBP header before the first row
    pub write_header: bool,

    /// Book behavior
    pub book: BookConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            preamble_records: DEFAULT_PREAMBLE_RECORDS,
            write_header: true,
            book: BookConfig::default(),
        }
    }
}

impl ReplayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many leading input records are discarded.
    pub fn with_preamble_records(mut self, count: usize) -> Self {
        self.preamble_records = count;
        self
    }

    /// Enable/disable the header row.
    pub fn with_header(mut self, write: bool) -> Self {
        self.write_header = write;
        self
    }

    /// Enable/disable debug logging of unknown cancels and empty-level trades.
    pub fn with_miss_logging(mut self, log: bool) -> Self {
        self.book.log_misses = log;
        self
    }
}

/// Drives one pass over an event source.
#[derive(Debug)]
pub struct Replayer {
    config: ReplayConfig,
    book: MbpBook,
    formatter: SnapshotFormatter,
    record: ByteRecord,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        let book = MbpBook::with_config(config.book.clone());
        Self {
            config,
            book,
            formatter: SnapshotFormatter::new(),
            record: ByteRecord::with_capacity(512, MBP_FIELDS),
        }
    }

    /// Replay every event from `source` into `sink`.
    ///
    /// # Example
    /// ```
    /// use mbp_reconstructor::replay::{ReplayConfig, Replayer};
    /// use mbp_reconstructor::sink::MemorySink;
    /// use mbp_reconstructor::source::VecSource;
    /// use mbp_reconstructor::{Action, MboEvent, Side};
    ///
    /// let events = vec![
    ///     MboEvent::new(1, Action::Add, Side::Bid, 1_000_000, 5).with_timestamp(10),
    ///     MboEvent::new(1, Action::Fill, Side::Bid, 1_000_000, 5).with_timestamp(11),
    /// ];
    ///
    /// let mut sink = MemorySink::new();
    /// let report = Replayer::new(ReplayConfig::default())
    ///     .run(VecSource::new(events), &mut sink)
    ///     .unwrap();
    ///
    /// assert_eq!(report.rows_written, 1);
    /// assert_eq!(sink.lines().len(), 2); // header + one row
    /// ```
    pub fn run<S, K>(&mut self, source: S, sink: &mut K) -> Result<ReplayReport>
    where
        S: EventSource,
        K: RecordSink + ?Sized,
    {
        let start = Instant::now();
        if let Some(path) = &source.metadata().file_path {
            log::info!("Replaying MBO events from {}", path.display());
        }

        if self.config.write_header {
            sink.write_record(&mbp_header())?;
        }

        let mut report = ReplayReport::default();

        for event in source.events()? {
            let event = event?;
            report.first_ts_event.get_or_insert(event.ts_event);
            report.last_ts_event = Some(event.ts_event);

            if !self.book.apply(&event).emits() {
                continue;
            }

            self.formatter
                .render(event.ts_event, &self.book, &mut self.record);
            sink.write_record(&self.record)?;
            report.rows_written += 1;
        }

        sink.flush()?;

        report.book = self.book.stats().clone();
        report.elapsed_secs = start.elapsed().as_secs_f64();

        log::info!(
            "Replay complete: {} events, {} rows, {} fills suppressed, {} unknown cancels, {} trade misses ({:.2}s)",
            report.book.events_processed,
            report.rows_written,
            report.book.fills_suppressed,
            report.book.unknown_cancels,
            report.book.trade_level_misses,
            report.elapsed_secs
        );
        if report.book.timestamp_regressions > 0 {
            log::warn!(
                "{} event(s) arrived with a ts_event lower than their predecessor",
                report.book.timestamp_regressions
            );
        }

        Ok(report)
    }

    /// Current book state.
    pub fn book(&self) -> &MbpBook {
        &self.book
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }
}

/// Replay an MBO CSV file into an MBP-10 CSV file.
pub fn replay_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: ReplayConfig,
) -> Result<ReplayReport> {
    let source = CsvSource::from_path(input)?.with_preamble_records(config.preamble_records);
    let mut sink = CsvSink::create(output)?;
    Replayer::new(config).run(source, &mut sink)
}
