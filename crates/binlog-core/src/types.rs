//! Table and column descriptors.
//!
//! A [`TableDescriptor`] is the schema snapshot that accompanies every row-change
//! event. Tables may be altered between events, so descriptors are never cached
//! by the translator: each event carries the descriptor that was current when
//! the row was written.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declared column type, reduced to the distinctions SQL rendering needs.
///
/// The integer family, floating point and decimal columns render unquoted;
/// JSON renders through a `cast`; everything else renders as a quoted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// TINYINT, SMALLINT, INT, BIGINT, YEAR
    Number,
    /// 3-byte MEDIUMINT
    MediumInt,
    /// BIT(n)
    Bit,
    /// FLOAT, DOUBLE, REAL
    Float,
    /// DECIMAL, NUMERIC
    Decimal,
    /// JSON
    Json,
    /// CHAR, VARCHAR and the TEXT family
    String,
    /// DATETIME
    Datetime,
    /// TIMESTAMP
    Timestamp,
    /// DATE
    Date,
    /// TIME
    Time,
    /// ENUM
    Enum,
    /// SET
    Set,
    /// BINARY, VARBINARY and the BLOB family
    Binary,
    /// GEOMETRY and friends
    Point,
}

impl ColumnKind {
    /// Whether values of this kind are rendered as bare numeric literals.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnKind::Number
                | ColumnKind::MediumInt
                | ColumnKind::Bit
                | ColumnKind::Float
                | ColumnKind::Decimal
        )
    }
}

/// A single column of a [`TableDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Schema snapshot of one table at event time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Indices into `columns` of logically unsigned integer columns.
    #[serde(default)]
    pub unsigned_columns: BTreeSet<usize>,
}

impl TableDescriptor {
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
            unsigned_columns: BTreeSet::new(),
        }
    }

    /// Mark the given column indices as unsigned.
    pub fn with_unsigned_columns(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.unsigned_columns.extend(indices);
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_unsigned(&self, index: usize) -> bool {
        self.unsigned_columns.contains(&index)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
