//! SQL statement synthesis.
//!
//! Statements match on every column rather than on a primary key, since rows
//! events do not reliably carry key metadata. `update` and `delete` are capped
//! with `limit 1` so a statement never touches more than the replicated row.

use binlog_core::{ActionKind, ColumnValue, TableDescriptor};
use mysql_types::{format_value, quote_identifier};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error(
        "column count mismatch, skipped {action} for {table}: table has {columns} columns {column_names:?}, row has {values} values"
    )]
    ShapeMismatch {
        action: ActionKind,
        table: String,
        column_names: Vec<String>,
        columns: usize,
        values: usize,
    },
    #[error("expected {expected} row image(s) for {table}, found {found}, skipped")]
    RowImageCount {
        table: String,
        expected: usize,
        found: usize,
    },
}

/// Backtick-quoted `schema`.`table`.
pub fn qualified_name(table: &TableDescriptor) -> String {
    format!(
        "{}.{}",
        quote_identifier(&table.schema),
        quote_identifier(&table.name)
    )
}

fn check_shape(
    table: &TableDescriptor,
    row: &[ColumnValue],
    action: ActionKind,
) -> Result<(), SynthesisError> {
    if row.len() == table.column_count() {
        return Ok(());
    }
    Err(SynthesisError::ShapeMismatch {
        action,
        table: qualified_name(table),
        column_names: table.column_names().map(str::to_string).collect(),
        columns: table.column_count(),
        values: row.len(),
    })
}

/// `col = value` for each column.
fn assignments(table: &TableDescriptor, row: &[ColumnValue]) -> Vec<String> {
    table
        .columns
        .iter()
        .zip(row)
        .map(|(column, value)| format!("{} = {}", column.name, format_value(column, value)))
        .collect()
}

/// `col = value` for each column, `col IS NULL` where the value is NULL.
fn conditions(table: &TableDescriptor, row: &[ColumnValue]) -> Vec<String> {
    table
        .columns
        .iter()
        .zip(row)
        .map(|(column, value)| {
            if value.is_null() {
                format!("{} IS NULL", column.name)
            } else {
                format!("{} = {}", column.name, format_value(column, value))
            }
        })
        .collect()
}

/// ``insert into `s`.`t` (a, b) values(1, 'x');``
pub fn build_insert(table: &TableDescriptor, row: &[ColumnValue]) -> Result<String, SynthesisError> {
    check_shape(table, row, ActionKind::Insert)?;

    let columns: Vec<&str> = table.column_names().collect();
    let values: Vec<String> = table
        .columns
        .iter()
        .zip(row)
        .map(|(column, value)| format_value(column, value))
        .collect();

    Ok(format!(
        "insert into {} ({}) values({});",
        qualified_name(table),
        columns.join(", "),
        values.join(", ")
    ))
}

/// ``delete from `s`.`t` where a = 1 and b = 'x' limit 1;``
pub fn build_delete(table: &TableDescriptor, row: &[ColumnValue]) -> Result<String, SynthesisError> {
    check_shape(table, row, ActionKind::Delete)?;

    Ok(format!(
        "delete from {} where {} limit 1;",
        qualified_name(table),
        conditions(table, row).join(" and ")
    ))
}

/// ``update `s`.`t` set a = 1, b = 'y' where a = 1 and b = 'x' limit 1;``
///
/// `set` takes its values from `new_row`, `where` from `match_row`.
pub fn build_update(
    table: &TableDescriptor,
    match_row: &[ColumnValue],
    new_row: &[ColumnValue],
) -> Result<String, SynthesisError> {
    check_shape(table, new_row, ActionKind::Update)?;
    check_shape(table, match_row, ActionKind::Update)?;

    Ok(format!(
        "update {} set {} where {} limit 1;",
        qualified_name(table),
        assignments(table, new_row).join(", "),
        conditions(table, match_row).join(" and ")
    ))
}
