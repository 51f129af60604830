//! MonedaValor TBD4 Encoder
//!
//! Serializes a currency-rate record into the fixed-width TBD4/RINID line
//! that SAP's exchange-rate datafeed parser reads.
//!
//! Each line is exactly [`RECORD_WIDTH`] characters, no delimiters and no
//! trailing newline. Field positions are fixed by [`TBD4_LAYOUT`].
//!
//! # Example
//!
//! ```
//! use ratefeed_common::CurrencyRateRecord;
//! use ratefeed_tbd4::{encode, RECORD_WIDTH};
//!
//! let record = CurrencyRateRecord::new(
//!     "USDCOPTRM",
//!     "MIF",
//!     "MID",
//!     "20260223140000+4235.500000",
//!     "COP",
//! );
//! let line = encode(&record).unwrap();
//! assert_eq!(line.len(), RECORD_WIDTH);
//! assert!(line.starts_with("USDCOPTRM           MIF"));
//! ```

pub mod encoder;
pub mod error;
pub mod layout;

pub use encoder::encode;
pub use error::{EncodeError, EncodeResult};
pub use layout::{field_range, Align, FieldSource, FieldSpec, RECORD_WIDTH, TBD4_LAYOUT};
