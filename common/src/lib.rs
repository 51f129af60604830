//! MonedaValor Common Types
//!
//! Shared types for the rate feed: the currency-rate record as stored in the
//! `MonedaValor` table and the instrument key used to look records up.

pub mod error;
pub mod instrument;
pub mod record;

pub use error::*;
pub use instrument::*;
pub use record::*;
