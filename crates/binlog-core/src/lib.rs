//! Core types for binlog-sql.
//!
//! This crate provides the foundational types shared by every binlog-sql crate:
//!
//! - [`EventHeader`] / [`EventType`] - Per-event metadata produced by the decoder
//! - [`TableDescriptor`] / [`ColumnDescriptor`] / [`ColumnKind`] - Table snapshot at event time
//! - [`ColumnValue`] / [`Row`] - Decoded column values
//! - [`RowChangeEvent`] / [`BinlogEvent`] - Decoded events handed to the translator
//!
//! # Architecture
//!
//! ```text
//! binlog-core (this crate)
//!    │
//!    ├─── mysql-types          (value formatting, unsigned correction)
//!    ├─── binlog-translate     (boundary filter, router, SQL synthesis)
//!    └─── binlog-jsonl-source  (reads decoded events from JSON Lines)
//! ```
//!
//! # Example
//!
//! ```rust
//! use binlog_core::{ColumnDescriptor, ColumnKind, ColumnValue, TableDescriptor};
//!
//! let table = TableDescriptor::new(
//!     "shop",
//!     "orders",
//!     vec![
//!         ColumnDescriptor::new("id", ColumnKind::Number),
//!         ColumnDescriptor::new("note", ColumnKind::String),
//!     ],
//! )
//! .with_unsigned_columns([0]);
//!
//! assert!(table.is_unsigned(0));
//! assert_eq!(ColumnValue::Int32(7).to_string(), "7");
//! ```

pub mod event;
pub mod types;
pub mod values;

pub use event::{
    ActionKind, BinlogEvent, EventHeader, EventType, LogPosition, ParseActionKindError,
    RowChangeEvent,
};
pub use types::{ColumnDescriptor, ColumnKind, TableDescriptor};
pub use values::{ColumnValue, Row};
