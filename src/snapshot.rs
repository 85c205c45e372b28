//! Fixed-width MBP-10 snapshot rendering.
//!
//! Every row has `1 + MBP_DEPTH * 6` fields: `ts_event`, then for each level
//! the ask triple followed by the bid triple. Levels a side does not have are
//! rendered as three empty fields, so the column count never depends on book
//! depth. Prices are written in scaled integer form.

use csv::ByteRecord;

use crate::lob::MbpBook;
use crate::types::{LevelSnapshot, MBP_DEPTH};

/// Fields per output row.
pub const MBP_FIELDS: usize = 1 + MBP_DEPTH * 6;

/// Header record for the MBP-10 output.
pub fn mbp_header() -> ByteRecord {
    let mut header = ByteRecord::with_capacity(MBP_FIELDS * 10, MBP_FIELDS);
    header.push_field(b"ts_event");
    for level in 0..MBP_DEPTH {
        for side in ["ask", "bid"] {
            for field in ["px", "sz", "ct"] {
                header.push_field(format!("{side}_{field}_{level:02}").as_bytes());
            }
        }
    }
    header
}

/// Renders book state into output records.
///
/// Read-only with respect to the book. Integers are formatted on the stack,
/// so rendering into a reused record does not allocate per field.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotFormatter;

impl SnapshotFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Fill `record` with the snapshot row for `ts_event`.
    pub fn render(&mut self, ts_event: i64, book: &MbpBook, record: &mut ByteRecord) {
        record.clear();
        self.push_int(record, ts_event);

        let mut asks = padded(book.asks().top_n(MBP_DEPTH));
        let mut bids = padded(book.bids().top_n(MBP_DEPTH));

        for _ in 0..MBP_DEPTH {
            self.push_slot(record, asks.next().flatten());
            self.push_slot(record, bids.next().flatten());
        }

        debug_assert_eq!(record.len(), MBP_FIELDS);
    }

    /// Render the snapshot as one comma-joined line (no trailing newline).
    pub fn render_line(&mut self, ts_event: i64, book: &MbpBook) -> String {
        let mut record = ByteRecord::with_capacity(256, MBP_FIELDS);
        self.render(ts_event, book, &mut record);
        record_to_line(&record)
    }

    fn push_slot(&mut self, record: &mut ByteRecord, slot: Option<LevelSnapshot>) {
        match slot {
            Some(level) => {
                self.push_int(record, level.price);
                self.push_int(record, level.total_size);
                self.push_int(record, level.order_count);
            }
            None => {
                record.push_field(b"");
                record.push_field(b"");
                record.push_field(b"");
            }
        }
    }

    #[inline]
    fn push_int(&mut self, record: &mut ByteRecord, value: i64) {
        let mut buf = [0u8; INT_BUF_LEN];
        record.push_field(format_int(value, &mut buf));
    }
}

/// Sign plus the 19 digits of `i64::MIN`.
const INT_BUF_LEN: usize = 20;

/// Decimal text of `value`, written right-aligned into `buf`.
fn format_int(value: i64, buf: &mut [u8; INT_BUF_LEN]) -> &[u8] {
    let mut magnitude = value.unsigned_abs();
    let mut start = INT_BUF_LEN;
    loop {
        start -= 1;
        buf[start] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }
    if value < 0 {
        start -= 1;
        buf[start] = b'-';
    }
    &buf[start..]
}

/// Pads a top-N view with `None` so that exactly `MBP_DEPTH` slots are yielded.
fn padded<I>(levels: I) -> impl Iterator<Item = Option<LevelSnapshot>>
where
    I: Iterator<Item = LevelSnapshot>,
{
    levels.map(Some).chain(std::iter::repeat(None)).take(MBP_DEPTH)
}

/// Join a record's fields with commas.
pub fn record_to_line(record: &ByteRecord) -> String {
    let mut line = String::with_capacity(record.as_slice().len() + record.len());
    for (i, field) in record.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&String::from_utf8_lossy(field));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, MboEvent, Side};

    fn add(book: &mut MbpBook, id: u64, side: Side, price: i64, size: i64) {
        book.apply(&MboEvent::new(id, Action::Add, side, price, size));
    }

    #[test]
    fn test_format_int_matches_display() {
        for value in [0, 7, -1, 10, 1_000_000, -42_000, 1_752_739_503_360_677_248, i64::MAX, i64::MIN] {
            let mut buf = [0u8; INT_BUF_LEN];
            assert_eq!(format_int(value, &mut buf), value.to_string().as_bytes());
        }
    }

    #[test]
    fn test_header_layout() {
        let header = mbp_header();
        assert_eq!(header.len(), MBP_FIELDS);
        assert_eq!(&header[0], b"ts_event");
        assert_eq!(&header[1], b"ask_px_00");
        assert_eq!(&header[3], b"ask_ct_00");
        assert_eq!(&header[4], b"bid_px_00");
        assert_eq!(&header[6], b"bid_ct_00");
        assert_eq!(&header[7], b"ask_px_01");
        assert_eq!(&header[60], b"bid_ct_09");
    }

    #[test]
    fn test_empty_book_row() {
        let book = MbpBook::new();
        let line = SnapshotFormatter::new().render_line(123, &book);

        assert_eq!(line, format!("123{}", ",".repeat(60)));
        assert_eq!(line.split(',').count(), MBP_FIELDS);
    }

    #[test]
    fn test_ask_before_bid_per_level() {
        let mut book = MbpBook::new();
        add(&mut book, 1, Side::Bid, 1_000_000, 5);
        add(&mut book, 2, Side::Ask, 1_010_000, 7);

        let line = SnapshotFormatter::new().render_line(42, &book);
        let fields: Vec<&str> = line.split(',').collect();

        assert_eq!(&fields[..7], &["42", "1010000", "7", "1", "1000000", "5", "1"]);
        assert!(fields[7..].iter().all(|f| f.is_empty()));
    }

    #[test]
    fn test_sparse_sides_keep_width() {
        let mut book = MbpBook::new();
        for i in 0..3 {
            add(&mut book, i + 1, Side::Bid, 1_000_000 - i as i64 * 100, 1);
        }

        let mut record = ByteRecord::new();
        SnapshotFormatter::new().render(1, &book, &mut record);

        assert_eq!(record.len(), MBP_FIELDS);
        // Level 2 bid present, level 3 bid absent.
        assert_eq!(&record[1 + 2 * 6 + 3], b"999800");
        assert_eq!(&record[1 + 3 * 6 + 3], b"");
        // No asks at all.
        for level in 0..MBP_DEPTH {
            for k in 0..3 {
                assert_eq!(&record[1 + level * 6 + k], b"");
            }
        }
    }

    #[test]
    fn test_only_top_ten_rendered() {
        let mut book = MbpBook::new();
        for i in 0..12 {
            add(&mut book, i + 1, Side::Ask, 1_000_000 + i as i64 * 100, 2);
        }

        let mut record = ByteRecord::new();
        SnapshotFormatter::new().render(0, &book, &mut record);

        assert_eq!(record.len(), MBP_FIELDS);
        assert_eq!(&record[1], b"1000000");
        assert_eq!(&record[1 + 9 * 6], b"1000900");
    }

    #[test]
    fn test_render_reuses_record() {
        let mut book = MbpBook::new();
        let mut formatter = SnapshotFormatter::new();
        let mut record = ByteRecord::new();

        formatter.render(1, &book, &mut record);
        add(&mut book, 1, Side::Bid, 1_000_000, 5);
        formatter.render(2, &book, &mut record);

        assert_eq!(record.len(), MBP_FIELDS);
        assert_eq!(&record[0], b"2");
        assert_eq!(&record[4], b"1000000");
    }
}
