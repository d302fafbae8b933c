//! Decoded-event records and their conversion to [`BinlogEvent`]s.
//!
//! One record per JSONL line, externally tagged by kind:
//!
//! ```json
//! {"Rotate":{"header":{"position":0,"timestamp":0,"event_type":"RotateEvent"},"next_log_name":"mysql-bin.000002"}}
//! {"Rows":{"header":{"position":500,"timestamp":1700000000,"event_type":"WriteRowsEventV2"},
//!          "table":{"schema":"s","name":"t","columns":[{"name":"id","kind":"number"}]},
//!          "rows":[[{"Int32":1}]]}}
//! ```
//!
//! A `Rows` record does not name its action; it is resolved from the header's
//! event type, the way a binlog parser resolves it from the event code.

use binlog_core::{
    ActionKind, BinlogEvent, EventHeader, EventType, LogPosition, Row, RowChangeEvent,
    TableDescriptor,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} not supported now")]
    UnsupportedRowEvent(EventType),
    #[error("update event on `{schema}`.`{table}` has {count} row images, expected before/after pairs")]
    UnpairedUpdateImages {
        schema: String,
        table: String,
        count: usize,
    },
    #[error("error parsing decoded event at line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One line of a decoded-event JSONL file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodedEvent {
    Rotate {
        header: EventHeader,
        next_log_name: String,
        #[serde(default)]
        position: u64,
    },
    PositionSynced {
        header: EventHeader,
        name: String,
        pos: u32,
    },
    Query {
        header: EventHeader,
        #[serde(default)]
        schema: String,
        query: String,
    },
    Rows {
        header: EventHeader,
        table: TableDescriptor,
        rows: Vec<Row>,
    },
    Xid {
        header: EventHeader,
        xid: u64,
    },
    Gtid {
        header: EventHeader,
        gtid: String,
    },
    TableChanged {
        header: EventHeader,
        schema: String,
        table: String,
    },
}

impl DecodedEvent {
    pub fn header(&self) -> &EventHeader {
        match self {
            DecodedEvent::Rotate { header, .. }
            | DecodedEvent::PositionSynced { header, .. }
            | DecodedEvent::Query { header, .. }
            | DecodedEvent::Rows { header, .. }
            | DecodedEvent::Xid { header, .. }
            | DecodedEvent::Gtid { header, .. }
            | DecodedEvent::TableChanged { header, .. } => header,
        }
    }

    /// `(schema, table)` for records that belong to a single table.
    pub fn table_ref(&self) -> Option<(&str, &str)> {
        match self {
            DecodedEvent::Rows { table, .. } => Some((table.schema.as_str(), table.name.as_str())),
            DecodedEvent::TableChanged { schema, table, .. } => {
                Some((schema.as_str(), table.as_str()))
            }
            _ => None,
        }
    }

    /// Log file name announced by rotate / position-sync records.
    pub fn log_name(&self) -> Option<&str> {
        match self {
            DecodedEvent::Rotate { next_log_name, .. } => Some(next_log_name.as_str()),
            DecodedEvent::PositionSynced { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

impl TryFrom<DecodedEvent> for BinlogEvent {
    type Error = SourceError;

    fn try_from(event: DecodedEvent) -> Result<Self, Self::Error> {
        Ok(match event {
            DecodedEvent::Rotate {
                header,
                next_log_name,
                position,
            } => BinlogEvent::Rotate {
                header,
                next_log_name,
                position,
            },
            DecodedEvent::PositionSynced { header, name, pos } => BinlogEvent::PositionSynced {
                header,
                position: LogPosition { name, pos },
            },
            DecodedEvent::Query {
                header,
                schema,
                query,
            } => BinlogEvent::Ddl {
                header,
                schema,
                query,
            },
            DecodedEvent::Rows {
                header,
                table,
                rows,
            } => {
                let action = ActionKind::from_event_type(header.event_type)
                    .ok_or(SourceError::UnsupportedRowEvent(header.event_type))?;
                if action == ActionKind::Update && rows.len() % 2 != 0 {
                    return Err(SourceError::UnpairedUpdateImages {
                        schema: table.schema,
                        table: table.name,
                        count: rows.len(),
                    });
                }
                BinlogEvent::Rows(RowChangeEvent {
                    header,
                    table,
                    action,
                    rows,
                })
            }
            DecodedEvent::Xid { header, xid } => BinlogEvent::Xid { header, xid },
            DecodedEvent::Gtid { header, gtid } => BinlogEvent::Gtid { header, gtid },
            DecodedEvent::TableChanged {
                header,
                schema,
                table,
            } => BinlogEvent::TableChanged {
                header,
                schema,
                table,
            },
        })
    }
}
