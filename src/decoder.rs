//! Positional field decoder for MBO CSV records.
//!
//! Turns one raw delimited record into an [`MboEvent`]. Decoding never fails:
//! missing trailing fields and malformed numbers decode to zero, and unknown
//! action/side codes fall through to [`Action::Other`] / [`Side::Neutral`].
//!
//! # Field layout
//!
//! | Index | Field | Used |
//! |-------|-------|------|
//! | 0 | ts_recv | no |
//! | 1 | ts_event | yes (integer, re-rendered on output) |
//! | 2 | rtype | no |
//! | 3 | publisher_id | no |
//! | 4 | instrument_id | no |
//! | 5 | action | yes |
//! | 6 | side | yes |
//! | 7 | price | yes (decimal, scaled by [`PRICE_SCALE`]) |
//! | 8 | size | yes |
//! | 9 | channel_id | no |
//! | 10 | order_id | yes |
//!
//! Anything after `order_id` (flags, ts_in_delta, sequence, symbol) is ignored.
//! Action and side share the code `A` (add / ask); they are told apart by
//! position only.

use std::str::FromStr;

use csv::ByteRecord;

use crate::types::{Action, MboEvent, Side, PRICE_SCALE};

const TS_EVENT: usize = 1;
const ACTION: usize = 5;
const SIDE: usize = 6;
const PRICE: usize = 7;
const SIZE: usize = 8;
const ORDER_ID: usize = 10;

/// Number of fractional digits carried by a scaled price.
const PRICE_DECIMALS: usize = 4;

/// Decode a CSV record produced by `csv::Reader`.
#[inline]
pub fn decode_record(record: &ByteRecord) -> MboEvent {
    decode_fields(record.iter())
}

/// Decode one raw comma-separated line (no quoting support).
#[inline]
pub fn decode_line(line: &str) -> MboEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    decode_fields(line.split(',').map(str::as_bytes))
}

/// Decode an event from its fields in positional order.
pub fn decode_fields<'a, I>(fields: I) -> MboEvent
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut event = MboEvent::new(0, Action::Other(0), Side::Neutral, 0, 0);

    for (index, field) in fields.into_iter().enumerate() {
        match index {
            TS_EVENT => event.ts_event = parse_int(field),
            ACTION => event.action = Action::from_byte(first_byte(field)),
            SIDE => event.side = Side::from_byte(first_byte(field)),
            PRICE => event.price = parse_price(field),
            SIZE => event.size = parse_int(field),
            ORDER_ID => {
                event.order_id = parse_int(field);
                break;
            }
            _ => {}
        }
    }

    event
}

#[inline]
fn first_byte(field: &[u8]) -> u8 {
    field.first().copied().unwrap_or(0)
}

/// Parse an integer field, degrading to zero on anything malformed.
#[inline]
pub fn parse_int<T: FromStr + Default>(field: &[u8]) -> T {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

/// Parse a decimal price into scaled integer form.
///
/// Plain decimals (`-?digits[.digits]`) are converted exactly; digits past the
/// fourth fractional place are truncated toward zero. Anything else (exponents,
/// `inf`) goes through `f64` and is truncated. Unparsable text yields 0.
pub fn parse_price(field: &[u8]) -> i64 {
    let field = field.trim_ascii();
    if field.is_empty() {
        return 0;
    }

    parse_scaled_decimal(field).unwrap_or_else(|| parse_price_f64(field))
}

fn parse_scaled_decimal(field: &[u8]) -> Option<i64> {
    let (negative, digits) = match field.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, field),
    };

    let (int_part, frac_part) = match digits.iter().position(|&b| b == b'.') {
        Some(dot) => (&digits[..dot], &digits[dot + 1..]),
        None => (digits, &[][..]),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.iter().chain(frac_part).all(u8::is_ascii_digit) {
        return None;
    }

    let mut value: i64 = 0;
    for &b in int_part {
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }
    value = value.checked_mul(PRICE_SCALE)?;

    let mut frac: i64 = 0;
    for i in 0..PRICE_DECIMALS {
        let digit = frac_part.get(i).map_or(0, |&b| i64::from(b - b'0'));
        frac = frac * 10 + digit;
    }
    value = value.checked_add(frac)?;

    Some(if negative { -value } else { value })
}

fn parse_price_f64(field: &[u8]) -> i64 {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| (v * PRICE_SCALE as f64) as i64)
        .unwrap_or(0)
}
