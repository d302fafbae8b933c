//! Unsigned integer correction.
//!
//! Rows events do not say whether an integer column is unsigned, so the decoder
//! hands back signed integers of the storage width. For columns the table
//! descriptor marks unsigned, the bit pattern is reinterpreted at the matching
//! unsigned width before the value is rendered.

use binlog_core::{ColumnKind, ColumnValue, Row, TableDescriptor};

/// 2^24, the value range of a 3-byte MEDIUMINT.
const MEDIUMINT_RANGE: i64 = 1 << 24;

/// Reinterpret one signed value as unsigned.
///
/// MEDIUMINT has no native 3-byte type, so it arrives widened to `Int32` with
/// sign extension; negative values are shifted back into `0..2^24`.
/// Values that are already unsigned (or not integers) are returned unchanged,
/// which makes the correction idempotent.
pub fn to_unsigned(kind: ColumnKind, value: &ColumnValue) -> ColumnValue {
    match *value {
        ColumnValue::Int8(v) => ColumnValue::UInt8(v as u8),
        ColumnValue::Int16(v) => ColumnValue::UInt16(v as u16),
        ColumnValue::Int32(v) if v < 0 && kind == ColumnKind::MediumInt => {
            ColumnValue::UInt32((v as i64 + MEDIUMINT_RANGE) as u32)
        }
        ColumnValue::Int32(v) => ColumnValue::UInt32(v as u32),
        ColumnValue::Int64(v) => ColumnValue::UInt64(v as u64),
        _ => value.clone(),
    }
}

/// Apply [`to_unsigned`] to every unsigned column of `row`, in place.
///
/// Indices outside the row are skipped; a short row is reported later as a
/// shape mismatch by the SQL builders.
pub fn correct_unsigned(table: &TableDescriptor, row: &mut Row) {
    for &index in &table.unsigned_columns {
        let (Some(column), Some(value)) = (table.columns.get(index), row.get_mut(index)) else {
            continue;
        };
        *value = to_unsigned(column.kind, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binlog_core::ColumnDescriptor;

    fn table(kind: ColumnKind) -> TableDescriptor {
        TableDescriptor::new(
            "s",
            "t",
            vec![
                ColumnDescriptor::new("n", kind),
                ColumnDescriptor::new("label", ColumnKind::String),
            ],
        )
        .with_unsigned_columns([0])
    }

    #[test]
    fn test_width_correct_reinterpretation() {
        let kind = ColumnKind::Number;
        assert_eq!(to_unsigned(kind, &ColumnValue::Int8(-1)), ColumnValue::UInt8(255));
        assert_eq!(
            to_unsigned(kind, &ColumnValue::Int16(-1)),
            ColumnValue::UInt16(65535)
        );
        assert_eq!(
            to_unsigned(kind, &ColumnValue::Int32(-1)),
            ColumnValue::UInt32(4294967295)
        );
        assert_eq!(
            to_unsigned(kind, &ColumnValue::Int64(-1)),
            ColumnValue::UInt64(u64::MAX)
        );
        assert_eq!(to_unsigned(kind, &ColumnValue::Int32(42)), ColumnValue::UInt32(42));
    }

    #[test]
    fn test_mediumint_negative_values() {
        let kind = ColumnKind::MediumInt;
        assert_eq!(
            to_unsigned(kind, &ColumnValue::Int32(-1)),
            ColumnValue::UInt32(16777215)
        );
        assert_eq!(
            to_unsigned(kind, &ColumnValue::Int32(-8388608)),
            ColumnValue::UInt32(8388608)
        );
        assert_eq!(
            to_unsigned(kind, &ColumnValue::Int32(100)),
            ColumnValue::UInt32(100)
        );
    }

    #[test]
    fn test_correct_unsigned_only_touches_marked_columns() {
        let table = table(ColumnKind::Number);
        let mut row = vec![ColumnValue::Int8(-1), ColumnValue::String("-1".into())];
        correct_unsigned(&table, &mut row);
        assert_eq!(
            row,
            vec![ColumnValue::UInt8(255), ColumnValue::String("-1".into())]
        );
    }

    #[test]
    fn test_correction_is_idempotent() {
        let table = table(ColumnKind::MediumInt);
        let mut row = vec![ColumnValue::Int32(-1), ColumnValue::Null];
        correct_unsigned(&table, &mut row);
        let once = row.clone();
        correct_unsigned(&table, &mut row);
        assert_eq!(row, once);
        assert_eq!(row[0], ColumnValue::UInt32(16777215));
    }

    #[test]
    fn test_short_row_is_left_alone() {
        let table = table(ColumnKind::Number).with_unsigned_columns([5]);
        let mut row = vec![ColumnValue::Int8(-2)];
        correct_unsigned(&table, &mut row);
        assert_eq!(row, vec![ColumnValue::UInt8(254)]);
    }

    #[test]
    fn test_null_and_non_integers_unchanged() {
        assert_eq!(
            to_unsigned(ColumnKind::Number, &ColumnValue::Null),
            ColumnValue::Null
        );
        assert_eq!(
            to_unsigned(ColumnKind::Decimal, &ColumnValue::Decimal("-1.5".into())),
            ColumnValue::Decimal("-1.5".into())
        );
    }
}
