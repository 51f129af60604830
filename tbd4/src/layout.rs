//! TBD4/RINID field layout.

use std::ops::RangeInclusive;

/// Total characters in one TBD4 line.
pub const RECORD_WIDTH: usize = 237;

/// How a value is placed inside its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Value first, padded with trailing spaces.
    Left,
    /// Padded with leading spaces, value last.
    Right,
    /// Value always fills the field exactly.
    Fixed,
    /// Constant spaces, no source value.
    Blank,
}

/// Where a field's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    InstrumentCode,
    FeedName,
    RateType,
    Date,
    Time,
    Value,
    Currency,
    None,
}

/// One positional field of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// SAP field name.
    pub name: &'static str,
    /// Width in characters.
    pub width: usize,
    /// Placement rule.
    pub align: Align,
    /// Content source.
    pub source: FieldSource,
}

impl FieldSpec {
    const fn new(name: &'static str, width: usize, align: Align, source: FieldSource) -> Self {
        Self {
            name,
            width,
            align,
            source,
        }
    }

    const fn blank(name: &'static str, width: usize) -> Self {
        Self::new(name, width, Align::Blank, FieldSource::None)
    }
}

/// Fields in line order.
pub const TBD4_LAYOUT: [FieldSpec; 17] = [
    FieldSpec::new("RINID1", 20, Align::Left, FieldSource::InstrumentCode),
    FieldSpec::new("RINID2", 15, Align::Left, FieldSource::FeedName),
    FieldSpec::new("SPRPTY", 15, Align::Left, FieldSource::RateType),
    FieldSpec::blank("SSTATS", 2),
    FieldSpec::blank("ERROR", 80),
    FieldSpec::blank("RSUPID", 10),
    FieldSpec::blank("RCONID", 10),
    FieldSpec::blank("RCONCN", 5),
    FieldSpec::new("DATE", 8, Align::Fixed, FieldSource::Date),
    FieldSpec::new("TIME", 6, Align::Fixed, FieldSource::Time),
    FieldSpec::new("VALUE", 20, Align::Right, FieldSource::Value),
    FieldSpec::new("CURRENCY", 5, Align::Left, FieldSource::Currency),
    FieldSpec::blank("MKIND", 5),
    FieldSpec::blank("CFFACT", 7),
    FieldSpec::blank("CTFACT", 7),
    FieldSpec::blank("UNAME", 12),
    FieldSpec::blank("RZUSATZ", 10),
];

const fn layout_width(layout: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layout.len() {
        total += layout[i].width;
        i += 1;
    }
    total
}

const _: () = assert!(layout_width(&TBD4_LAYOUT) == RECORD_WIDTH);

/// 1-indexed character positions of a field, as SAP documents them.
pub fn field_range(name: &str) -> Option<RangeInclusive<usize>> {
    let mut start = 1;
    for field in &TBD4_LAYOUT {
        if field.name == name {
            return Some(start..=start + field.width - 1);
        }
        start += field.width;
    }
    None
}
