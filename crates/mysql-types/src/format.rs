//! SQL literal rendering for decoded column values.
//!
//! The declared column kind decides the literal form:
//!
//! | Kind                                        | Literal                 |
//! |---------------------------------------------|-------------------------|
//! | number, mediumint, bit, float, decimal      | `42`, `1.5`, `X'05'`    |
//! | json                                        | `cast('{..}' as json)`  |
//! | everything else                             | `'text'`                |
//!
//! String and JSON payloads are escaped so the generated statement stays valid
//! whatever the row contains.

use binlog_core::{ColumnDescriptor, ColumnKind, ColumnValue};
use std::fmt::Write;

/// Render `value` as a MySQL literal for `column`.
///
/// ```
/// use binlog_core::{ColumnDescriptor, ColumnKind, ColumnValue};
/// use mysql_types::format_value;
///
/// let name = ColumnDescriptor::new("name", ColumnKind::String);
/// assert_eq!(format_value(&name, &ColumnValue::String("bob".into())), "'bob'");
///
/// let id = ColumnDescriptor::new("id", ColumnKind::Number);
/// assert_eq!(format_value(&id, &ColumnValue::UInt8(255)), "255");
/// ```
pub fn format_value(column: &ColumnDescriptor, value: &ColumnValue) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }

    match column.kind {
        kind if kind.is_numeric() => match value {
            ColumnValue::Bytes(bytes) => hex_literal(bytes),
            other => other.to_string(),
        },
        ColumnKind::Json => format!("cast({} as json)", quote_string(&value.to_string())),
        _ => match value {
            ColumnValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => quote_string(text),
                Err(_) => hex_literal(bytes),
            },
            other => quote_string(&other.to_string()),
        },
    }
}

/// Wrap `s` in single quotes, escaping the characters MySQL treats specially
/// inside a string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Quote a schema or table name with backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out.push('\'');
    out
}
