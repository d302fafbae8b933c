//! MySQL catalog type mapping.
//!
//! This module maps MySQL INFORMATION_SCHEMA column metadata to the
//! [`ColumnKind`]s used when rendering SQL literals, and builds
//! [`TableDescriptor`]s from catalog rows.

use binlog_core::{ColumnDescriptor, ColumnKind, TableDescriptor};

/// Convert a MySQL `DATA_TYPE` to a [`ColumnKind`].
///
/// # Example
///
/// ```
/// use binlog_core::ColumnKind;
/// use mysql_types::mysql_column_to_column_kind;
///
/// assert_eq!(mysql_column_to_column_kind("INT"), ColumnKind::Number);
/// assert_eq!(mysql_column_to_column_kind("mediumint"), ColumnKind::MediumInt);
/// assert_eq!(mysql_column_to_column_kind("JSON"), ColumnKind::Json);
/// ```
pub fn mysql_column_to_column_kind(data_type: &str) -> ColumnKind {
    match data_type.to_uppercase().as_str() {
        // Numeric types
        "TINYINT" | "SMALLINT" | "INT" | "INTEGER" | "BIGINT" | "YEAR" | "BOOLEAN" | "BOOL" => {
            ColumnKind::Number
        }
        "MEDIUMINT" => ColumnKind::MediumInt,
        "BIT" => ColumnKind::Bit,
        "FLOAT" | "DOUBLE" | "REAL" => ColumnKind::Float,
        "DECIMAL" | "NUMERIC" => ColumnKind::Decimal,

        // JSON
        "JSON" => ColumnKind::Json,

        // Date/Time types
        "DATETIME" => ColumnKind::Datetime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,

        "ENUM" => ColumnKind::Enum,
        "SET" => ColumnKind::Set,

        // Binary types
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            ColumnKind::Binary
        }

        "GEOMETRY" | "POINT" | "LINESTRING" | "POLYGON" | "MULTIPOINT" | "MULTILINESTRING"
        | "MULTIPOLYGON" | "GEOMETRYCOLLECTION" => ColumnKind::Point,

        // CHAR, VARCHAR, the TEXT family and anything unknown
        _ => ColumnKind::String,
    }
}

/// Whether a full `COLUMN_TYPE` string (e.g. `int(10) unsigned`) declares an
/// unsigned column.
pub fn is_unsigned_column_type(column_type: &str) -> bool {
    column_type
        .to_lowercase()
        .split_whitespace()
        .any(|word| word == "unsigned")
}

/// One row of `INFORMATION_SCHEMA.COLUMNS`, in `ORDINAL_POSITION` order.
#[derive(Debug, Clone)]
pub struct CatalogColumn<'a> {
    pub name: &'a str,
    pub data_type: &'a str,
    pub column_type: &'a str,
}

/// Build a [`TableDescriptor`] from catalog columns, collecting the unsigned
/// column indices along the way.
pub fn table_descriptor_from_catalog(
    schema: &str,
    table: &str,
    columns: &[CatalogColumn<'_>],
) -> TableDescriptor {
    let descriptors = columns
        .iter()
        .map(|c| ColumnDescriptor::new(c.name, mysql_column_to_column_kind(c.data_type)))
        .collect();
    let unsigned = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| is_unsigned_column_type(c.column_type))
        .map(|(i, _)| i);

    TableDescriptor::new(schema, table, descriptors).with_unsigned_columns(unsigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_int_types() {
        for data_type in ["TINYINT", "SMALLINT", "INT", "INTEGER", "BIGINT", "YEAR"] {
            assert_eq!(mysql_column_to_column_kind(data_type), ColumnKind::Number);
        }
        assert_eq!(
            mysql_column_to_column_kind("MEDIUMINT"),
            ColumnKind::MediumInt
        );
        assert_eq!(mysql_column_to_column_kind("bit"), ColumnKind::Bit);
    }

    #[test]
    fn test_mysql_decimal_and_float_types() {
        assert_eq!(mysql_column_to_column_kind("DECIMAL"), ColumnKind::Decimal);
        assert_eq!(mysql_column_to_column_kind("NUMERIC"), ColumnKind::Decimal);
        assert_eq!(mysql_column_to_column_kind("FLOAT"), ColumnKind::Float);
        assert_eq!(mysql_column_to_column_kind("DOUBLE"), ColumnKind::Float);
    }

    #[test]
    fn test_mysql_string_types() {
        for data_type in ["VARCHAR", "CHAR", "TEXT", "LONGTEXT", "UNKNOWN_THING"] {
            assert_eq!(mysql_column_to_column_kind(data_type), ColumnKind::String);
        }
    }

    #[test]
    fn test_mysql_datetime_types() {
        assert_eq!(
            mysql_column_to_column_kind("TIMESTAMP"),
            ColumnKind::Timestamp
        );
        assert_eq!(mysql_column_to_column_kind("DATETIME"), ColumnKind::Datetime);
        assert_eq!(mysql_column_to_column_kind("DATE"), ColumnKind::Date);
        assert_eq!(mysql_column_to_column_kind("TIME"), ColumnKind::Time);
    }

    #[test]
    fn test_mysql_bytes_and_geometry_types() {
        assert_eq!(mysql_column_to_column_kind("BLOB"), ColumnKind::Binary);
        assert_eq!(mysql_column_to_column_kind("VARBINARY"), ColumnKind::Binary);
        for geom_type in ["GEOMETRY", "POINT", "POLYGON", "LINESTRING"] {
            assert_eq!(mysql_column_to_column_kind(geom_type), ColumnKind::Point);
        }
    }

    #[test]
    fn test_is_unsigned_column_type() {
        assert!(is_unsigned_column_type("int(10) unsigned"));
        assert!(is_unsigned_column_type("MEDIUMINT(8) UNSIGNED ZEROFILL"));
        assert!(!is_unsigned_column_type("int(11)"));
        assert!(!is_unsigned_column_type("varchar(20)"));
    }

    #[test]
    fn test_table_descriptor_from_catalog() {
        let columns = [
            CatalogColumn {
                name: "id",
                data_type: "int",
                column_type: "int(10) unsigned",
            },
            CatalogColumn {
                name: "name",
                data_type: "varchar",
                column_type: "varchar(64)",
            },
            CatalogColumn {
                name: "hits",
                data_type: "mediumint",
                column_type: "mediumint(8) unsigned",
            },
        ];
        let table = table_descriptor_from_catalog("s", "t", &columns);
        assert_eq!(table.schema, "s");
        assert_eq!(table.name, "t");
        assert_eq!(table.columns[2].kind, ColumnKind::MediumInt);
        assert_eq!(table.unsigned_columns.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
    }
}
