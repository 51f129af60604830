//! Validated table identifiers.

use std::fmt;

use crate::error::{StoreError, StoreResult};

/// A table name safe to splice into SQL text.
///
/// Only ASCII letters, digits, underscores and a single schema dot are
/// accepted, e.g. `moneda_valor` or `dbo.monedavalor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Parse and validate a table name.
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let name = raw.trim();
        let parts: Vec<&str> = name.split('.').collect();

        let valid = !name.is_empty()
            && parts.len() <= 2
            && parts.iter().all(|part| {
                !part.is_empty()
                    && !part.starts_with(|c: char| c.is_ascii_digit())
                    && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            });

        if !valid {
            return Err(StoreError::InvalidTable(raw.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
