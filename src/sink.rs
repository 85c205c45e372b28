//! Output sinks for rendered snapshot records.
//!
//! A sink accepts one fully formatted record per call, header included, and
//! does no interpretation of its own.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use csv::ByteRecord;

use crate::error::{MbpError, Result};
use crate::snapshot::record_to_line;

/// Line-oriented record sink.
pub trait RecordSink {
    /// Append one record.
    fn write_record(&mut self, record: &ByteRecord) -> Result<()>;

    /// Push buffered records to the destination.
    fn flush(&mut self) -> Result<()>;
}

/// CSV writer sink, `\n`-terminated.
pub struct CsvSink<W: io::Write> {
    writer: csv::Writer<W>,
    records_written: u64,
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) the output file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MbpError::OutputUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: io::Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        Self {
            writer,
            records_written: 0,
        }
    }

    /// Records written so far, header included.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| MbpError::Io(e.error().to_string()))
    }
}

impl<W: io::Write> RecordSink for CsvSink<W> {
    #[inline]
    fn write_record(&mut self, record: &ByteRecord) -> Result<()> {
        self.writer.write_byte_record(record)?;
        self.records_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects records as comma-joined lines. Used in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl RecordSink for MemorySink {
    fn write_record(&mut self, record: &ByteRecord) -> Result<()> {
        self.lines.push(record_to_line(record));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
