//! Currency-rate record as stored in the `MonedaValor` table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Characters taken by the `YYYYMMDD` date prefix of a timestamp value.
pub const DATE_LEN: usize = 8;

/// Characters taken by the `HHMMSS` time part that follows the date.
pub const TIME_LEN: usize = 6;

/// Minimum length of a well-formed timestamp value (date plus time).
pub const TIMESTAMP_PREFIX_LEN: usize = DATE_LEN + TIME_LEN;

/// One row of the rate table.
///
/// Field names on the wire follow the table's column names, which is what
/// SAP-side consumers already map against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyRateRecord {
    /// Source key of the rate series, e.g. `USDCOPTRM`.
    #[serde(rename = "ssinstrumnt")]
    #[schema(example = "USDCOPTRM")]
    pub instrument_code: String,
    /// Market-data feed name, e.g. `MIF`.
    #[serde(rename = "mifeedname")]
    #[schema(example = "MIF")]
    pub feed_name: String,
    /// Rate type, e.g. `MID`.
    #[serde(rename = "ratetype")]
    #[schema(example = "MID")]
    pub rate_type: String,
    /// `YYYYMMDDHHMMSS` followed by the signed rate, no delimiter.
    /// Kept verbatim, never trimmed.
    #[serde(rename = "timestamp_valor")]
    #[schema(example = "20260223140000+4235.500000")]
    pub timestamp_value: String,
    /// Currency code, e.g. `COP`.
    #[schema(example = "COP")]
    pub currency: String,
}

/// The three pieces of a composite timestamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParts<'a> {
    /// `YYYYMMDD`.
    pub date: &'a str,
    /// `HHMMSS`.
    pub time: &'a str,
    /// Signed decimal rate as literal text, possibly empty.
    pub value: &'a str,
}

impl CurrencyRateRecord {
    /// Create a record, trimming every field except the timestamp value.
    pub fn new(
        instrument_code: impl Into<String>,
        feed_name: impl Into<String>,
        rate_type: impl Into<String>,
        timestamp_value: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            instrument_code: instrument_code.into(),
            feed_name: feed_name.into(),
            rate_type: rate_type.into(),
            timestamp_value: timestamp_value.into(),
            currency: currency.into(),
        }
        .trimmed()
    }

    /// Trim the padded text columns. The timestamp value is left untouched.
    pub fn trimmed(self) -> Self {
        Self {
            instrument_code: trim_owned(self.instrument_code),
            feed_name: trim_owned(self.feed_name),
            rate_type: trim_owned(self.rate_type),
            timestamp_value: self.timestamp_value,
            currency: trim_owned(self.currency),
        }
    }

    /// Split the timestamp value into date, time and value.
    ///
    /// Positions count characters, not bytes. Returns `None` when fewer than
    /// [`TIMESTAMP_PREFIX_LEN`] characters are present.
    pub fn timestamp_parts(&self) -> Option<TimestampParts<'_>> {
        let raw = self.timestamp_value.as_str();
        let date_end = byte_offset(raw, DATE_LEN)?;
        let time_end = byte_offset(raw, TIMESTAMP_PREFIX_LEN)?;

        Some(TimestampParts {
            date: &raw[..date_end],
            time: &raw[date_end..time_end],
            value: &raw[time_end..],
        })
    }

    /// Observation time encoded in the first 14 characters, if it parses.
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        let parts = self.timestamp_parts()?;
        let stamp = format!("{}{}", parts.date, parts.time);
        NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M%S").ok()
    }
}

fn trim_owned(s: String) -> String {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        s
    } else {
        trimmed.to_string()
    }
}

/// Byte offset of the `n`th character boundary, `None` if `s` is shorter.
fn byte_offset(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    s.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .nth(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn sample() -> CurrencyRateRecord {
        CurrencyRateRecord::new(
            "USDCOPTRM",
            "MIF",
            "MID",
            "20260223140000+4235.500000",
            "COP",
        )
    }

    #[test]
    fn test_new_trims_text_columns() {
        let record = CurrencyRateRecord::new(
            "USDCOPTRM   ",
            " MIF",
            "MID ",
            " 20260223140000+4235.500000",
            "COP  ",
        );
        assert_eq!(record.instrument_code, "USDCOPTRM");
        assert_eq!(record.feed_name, "MIF");
        assert_eq!(record.rate_type, "MID");
        assert_eq!(record.currency, "COP");
        assert_eq!(record.timestamp_value, " 20260223140000+4235.500000");
    }

    #[test]
    fn test_timestamp_parts() {
        let record = sample();
        let parts = record.timestamp_parts().unwrap();
        assert_eq!(parts.date, "20260223");
        assert_eq!(parts.time, "140000");
        assert_eq!(parts.value, "+4235.500000");
    }

    #[test]
    fn test_timestamp_parts_exact_prefix_has_empty_value() {
        let mut record = sample();
        record.timestamp_value = "20260223140000".to_string();
        let parts = record.timestamp_parts().unwrap();
        assert_eq!(parts.time, "140000");
        assert_eq!(parts.value, "");
    }

    #[test]
    fn test_timestamp_parts_too_short() {
        let mut record = sample();
        record.timestamp_value = "2026022314000".to_string();
        assert!(record.timestamp_parts().is_none());
    }

    #[test]
    fn test_timestamp_parts_counts_characters() {
        let mut record = sample();
        record.timestamp_value = "2026022314000é".to_string();
        let parts = record.timestamp_parts().unwrap();
        assert_eq!(parts.time, "14000é");
        assert_eq!(parts.value, "");
    }

    #[test]
    fn test_observed_at() {
        let at = sample().observed_at().unwrap();
        assert_eq!((at.year(), at.month(), at.day()), (2026, 2, 23));
        assert_eq!((at.hour(), at.minute(), at.second()), (14, 0, 0));

        let mut garbled = sample();
        garbled.timestamp_value = "2026XX23140000+1".to_string();
        assert!(garbled.observed_at().is_none());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ssinstrumnt"], "USDCOPTRM");
        assert_eq!(json["mifeedname"], "MIF");
        assert_eq!(json["ratetype"], "MID");
        assert_eq!(json["timestamp_valor"], "20260223140000+4235.500000");
        assert_eq!(json["currency"], "COP");
    }
}
