//! Decoded column values.
//!
//! The decoder cannot tell from a rows event alone whether an integer column is
//! unsigned, so integers frequently arrive as signed values of the storage width
//! even when the column is declared `UNSIGNED`. See `mysql_types::correct_unsigned`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One decoded column value.
///
/// Serialized externally tagged, e.g. `{"Int32": -1}` or `{"String": "bob"}`;
/// `Null` serializes as the bare string `"Null"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValue {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    /// Exact decimal, kept as text to avoid precision loss
    Decimal(String),
    /// Character data and the textual form of temporal values
    String(String),
    Bytes(Vec<u8>),
    /// JSON document as text
    Json(String),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }
}

/// Natural textual representation of the value, without any SQL quoting.
impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => f.write_str("NULL"),
            ColumnValue::Int8(v) => write!(f, "{v}"),
            ColumnValue::Int16(v) => write!(f, "{v}"),
            ColumnValue::Int32(v) => write!(f, "{v}"),
            ColumnValue::Int64(v) => write!(f, "{v}"),
            ColumnValue::UInt8(v) => write!(f, "{v}"),
            ColumnValue::UInt16(v) => write!(f, "{v}"),
            ColumnValue::UInt32(v) => write!(f, "{v}"),
            ColumnValue::UInt64(v) => write!(f, "{v}"),
            ColumnValue::Float(v) => write!(f, "{v}"),
            ColumnValue::Double(v) => write!(f, "{v}"),
            ColumnValue::Decimal(s) | ColumnValue::String(s) | ColumnValue::Json(s) => {
                f.write_str(s)
            }
            ColumnValue::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

/// Ordered column values aligned 1:1 with a table descriptor's columns.
pub type Row = Vec<ColumnValue>;
