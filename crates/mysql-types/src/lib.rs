//! MySQL type handling for binlog-sql.
//!
//! This crate turns decoded column values into MySQL literal text and maps
//! catalog column types onto `binlog_core::ColumnKind`.
//!
//! # Structure
//!
//! - `format`: Render a `ColumnValue` as a SQL literal for its column kind
//! - `unsigned`: Reinterpret signed decoded integers on unsigned columns
//! - `schema`: MySQL `DATA_TYPE` / `COLUMN_TYPE` → `ColumnKind` and unsigned flag
//!
//! # Example
//!
//! ```rust
//! use binlog_core::{ColumnDescriptor, ColumnKind, ColumnValue, TableDescriptor};
//! use mysql_types::{correct_unsigned, format_value};
//!
//! let table = TableDescriptor::new(
//!     "s",
//!     "t",
//!     vec![ColumnDescriptor::new("id", ColumnKind::Number)],
//! )
//! .with_unsigned_columns([0]);
//!
//! let mut row = vec![ColumnValue::Int8(-1)];
//! correct_unsigned(&table, &mut row);
//! assert_eq!(format_value(&table.columns[0], &row[0]), "255");
//! ```

pub mod format;
pub mod schema;
pub mod unsigned;

pub use format::{format_value, quote_identifier, quote_string};
pub use schema::{
    is_unsigned_column_type, mysql_column_to_column_kind, table_descriptor_from_catalog,
    CatalogColumn,
};
pub use unsigned::{correct_unsigned, to_unsigned};
