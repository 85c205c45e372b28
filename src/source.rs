//! Event source abstraction.
//!
//! A source yields decoded [`MboEvent`]s in input order. [`CsvSource`] reads
//! the delimited MBO format from a file or any reader, discarding the leading
//! preamble records (schema header and initial clear marker) before decoding.
//! [`VecSource`] serves already-decoded events from memory.
//!
//! # Implementing Custom Sources
//!
//! ```ignore
//! use mbp_reconstructor::source::{EventSource, SourceMetadata};
//! use mbp_reconstructor::{MboEvent, Result};
//!
//! struct ReplayCapture {
//!     events: Vec<MboEvent>,
//!     metadata: SourceMetadata,
//! }
//!
//! impl EventSource for ReplayCapture {
//!     type EventIter = std::iter::Map<std::vec::IntoIter<MboEvent>, fn(MboEvent) -> Result<MboEvent>>;
//!
//!     fn events(self) -> Result<Self::EventIter> {
//!         Ok(self.events.into_iter().map(Ok as fn(MboEvent) -> Result<MboEvent>))
//!     }
//!
//!     fn metadata(&self) -> &SourceMetadata {
//!         &self.metadata
//!     }
//! }
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use csv::ByteRecord;

use crate::decoder::decode_record;
use crate::error::{MbpError, Result};
use crate::types::MboEvent;

/// Records discarded before decoding starts: schema header and the initial
/// book-clear marker.
pub const DEFAULT_PREAMBLE_RECORDS: usize = 2;

/// Read buffer for file-backed sources.
pub const IO_BUFFER_SIZE: usize = 1024 * 1024;

// ============================================================================
// Source Metadata
// ============================================================================

/// Metadata about an event source.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    /// Original file path (if loaded from file)
    pub file_path: Option<PathBuf>,

    /// Source kind (e.g., "csv", "memory")
    pub provider: Option<String>,

    /// File size in bytes (if applicable)
    pub file_size: Option<u64>,

    /// Number of events, when known up front
    pub estimated_events: Option<u64>,
}

impl SourceMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_estimated_events(mut self, count: u64) -> Self {
        self.estimated_events = Some(count);
        self
    }

    /// Metadata for a file on disk; the size is filled in when readable.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut metadata = Self::new().with_file_path(path);
        if let Ok(meta) = std::fs::metadata(path) {
            metadata.file_size = Some(meta.len());
        }
        metadata
    }
}

// ============================================================================
// Event Source Trait
// ============================================================================

/// Trait for MBO event sources.
///
/// `events()` consumes the source for a single pass. Items are `Err` only for
/// failures of the underlying reader; malformed fields never fail.
pub trait EventSource {
    /// The iterator type for events.
    type EventIter: Iterator<Item = Result<MboEvent>>;

    /// Consume the source and return an iterator over events.
    fn events(self) -> Result<Self::EventIter>;

    /// Get metadata about the source.
    fn metadata(&self) -> &SourceMetadata;
}

// ============================================================================
// CSV Source
// ============================================================================

/// Delimited-text MBO source.
///
/// Records are split on bare commas, one per line; quote characters are
/// ordinary field bytes, so a stray `"` never joins lines. Empty lines are
/// skipped by the reader: they neither count toward the preamble nor yield
/// an event.
///
/// # Example
///
/// ```
/// use mbp_reconstructor::source::{CsvSource, EventSource};
/// use mbp_reconstructor::Action;
///
/// let text = "ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,price,size,channel_id,order_id\n\
///             0,0,160,2,1108,R,N,,0,0,0\n\
///             0,1000,160,2,1108,A,B,100.0,5,0,1\n";
///
/// let events: Vec<_> = CsvSource::from_reader(text.as_bytes())
///     .events()
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].action, Action::Add);
/// assert_eq!(events[0].price, 1_000_000);
/// ```
pub struct CsvSource<R: io::Read> {
    reader: csv::Reader<R>,
    preamble_records: usize,
    metadata: SourceMetadata,
}

impl CsvSource<BufReader<File>> {
    /// Open a file-backed source.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MbpError::InputUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut source = Self::from_reader(BufReader::with_capacity(IO_BUFFER_SIZE, file));
        source.metadata = SourceMetadata::from_path(path).with_provider("csv");
        Ok(source)
    }
}

impl<R: io::Read> CsvSource<R> {
    /// Wrap any reader. The preamble defaults to [`DEFAULT_PREAMBLE_RECORDS`].
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .double_quote(false)
            .from_reader(reader);

        Self {
            reader,
            preamble_records: DEFAULT_PREAMBLE_RECORDS,
            metadata: SourceMetadata::new().with_provider("csv"),
        }
    }

    /// Set how many leading records are discarded unread.
    pub fn with_preamble_records(mut self, count: usize) -> Self {
        self.preamble_records = count;
        self
    }

    /// Set custom metadata.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl<R: io::Read> EventSource for CsvSource<R> {
    type EventIter = CsvEventIter<R>;

    fn events(mut self) -> Result<Self::EventIter> {
        let mut record = ByteRecord::new();
        let mut skipped = 0;
        let mut exhausted = false;

        while skipped < self.preamble_records {
            if !self.reader.read_byte_record(&mut record)? {
                exhausted = true;
                break;
            }
            skipped += 1;
        }
        log::debug!("Discarded {skipped} preamble record(s)");

        Ok(CsvEventIter {
            reader: self.reader,
            record,
            done: exhausted,
            events_read: 0,
        })
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

/// Iterator over decoded events of a [`CsvSource`].
///
/// Stops after the first read error.
pub struct CsvEventIter<R: io::Read> {
    reader: csv::Reader<R>,
    record: ByteRecord,
    done: bool,
    events_read: u64,
}

impl<R: io::Read> CsvEventIter<R> {
    /// Events decoded so far.
    pub fn events_read(&self) -> u64 {
        self.events_read
    }
}

impl<R: io::Read> Iterator for CsvEventIter<R> {
    type Item = Result<MboEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_byte_record(&mut self.record) {
            Ok(true) => {
                self.events_read += 1;
                Some(Ok(decode_record(&self.record)))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                log::error!("Failed to read MBO record: {e}");
                Some(Err(e.into()))
            }
        }
    }
}

// ============================================================================
// Vector Source (for testing)
// ============================================================================

/// A simple in-memory source for testing.
///
/// Events are served as-is; there is no preamble to skip.
pub struct VecSource {
    events: Vec<MboEvent>,
    metadata: SourceMetadata,
}

impl VecSource {
    pub fn new(events: Vec<MboEvent>) -> Self {
        Self {
            metadata: SourceMetadata::new()
                .with_provider("memory")
                .with_estimated_events(events.len() as u64),
            events,
        }
    }

    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl EventSource for VecSource {
    type EventIter = std::iter::Map<std::vec::IntoIter<MboEvent>, fn(MboEvent) -> Result<MboEvent>>;

    fn events(self) -> Result<Self::EventIter> {
        Ok(self
            .events
            .into_iter()
            .map(Ok as fn(MboEvent) -> Result<MboEvent>))
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

// ============================================================================
// Tests
// ============================================================================
