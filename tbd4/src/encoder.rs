//! Fixed-width line assembly.

use ratefeed_common::{CurrencyRateRecord, TimestampParts};

use crate::error::{EncodeError, EncodeResult};
use crate::layout::{Align, FieldSource, FieldSpec, RECORD_WIDTH, TBD4_LAYOUT};

/// Encode a record as one TBD4 line of exactly [`RECORD_WIDTH`] characters.
///
/// Values longer than their field are rejected with
/// [`EncodeError::FieldOverflow`]; nothing is ever truncated.
pub fn encode(record: &CurrencyRateRecord) -> EncodeResult<String> {
    assemble(record, &TBD4_LAYOUT, RECORD_WIDTH)
}

pub(crate) fn assemble(
    record: &CurrencyRateRecord,
    layout: &[FieldSpec],
    expected: usize,
) -> EncodeResult<String> {
    let parts = record
        .timestamp_parts()
        .ok_or_else(|| EncodeError::MalformedTimestamp {
            value: record.timestamp_value.clone(),
            len: record.timestamp_value.chars().count(),
        })?;

    let mut line = String::with_capacity(expected);
    for field in layout {
        push_field(&mut line, field, source_value(record, &parts, field.source))?;
    }

    let actual = line.chars().count();
    if actual != expected {
        return Err(EncodeError::LengthMismatch { expected, actual });
    }

    Ok(line)
}

fn source_value<'a>(
    record: &'a CurrencyRateRecord,
    parts: &TimestampParts<'a>,
    source: FieldSource,
) -> &'a str {
    match source {
        FieldSource::InstrumentCode => &record.instrument_code,
        FieldSource::FeedName => &record.feed_name,
        FieldSource::RateType => &record.rate_type,
        FieldSource::Date => parts.date,
        FieldSource::Time => parts.time,
        FieldSource::Value => parts.value,
        FieldSource::Currency => &record.currency,
        FieldSource::None => "",
    }
}

fn push_field(line: &mut String, field: &FieldSpec, value: &str) -> EncodeResult<()> {
    match field.align {
        Align::Blank => push_spaces(line, field.width),
        Align::Right => {
            let pad = padding(field, value)?;
            push_spaces(line, pad);
            line.push_str(value);
        }
        Align::Left | Align::Fixed => {
            let pad = padding(field, value)?;
            line.push_str(value);
            push_spaces(line, pad);
        }
    }
    Ok(())
}

/// Spaces left over once `value` is placed in `field`.
fn padding(field: &FieldSpec, value: &str) -> EncodeResult<usize> {
    let len = value.chars().count();
    if len > field.width {
        return Err(EncodeError::FieldOverflow {
            field: field.name,
            width: field.width,
            len,
        });
    }
    Ok(field.width - len)
}

fn push_spaces(line: &mut String, n: usize) {
    line.extend(std::iter::repeat(' ').take(n));
}
