//! Decoded replication events.
//!
//! These are the structured events the external binlog decoder produces and the
//! translator consumes. Nothing here parses binlog bytes.

use crate::types::TableDescriptor;
use crate::values::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Binlog event type tag, as carried in the event header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Unknown,
    QueryEvent,
    StopEvent,
    RotateEvent,
    FormatDescriptionEvent,
    XidEvent,
    TableMapEvent,
    WriteRowsEventV1,
    UpdateRowsEventV1,
    DeleteRowsEventV1,
    HeartbeatLogEvent,
    RowsQueryLogEvent,
    WriteRowsEventV2,
    UpdateRowsEventV2,
    DeleteRowsEventV2,
    GtidLogEvent,
    AnonymousGtidLogEvent,
    PreviousGtidsLogEvent,
    MariadbGtidEvent,
    PartialUpdateRowsEvent,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-event metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Byte position within the current log file (the header's next-position field).
    pub position: u32,
    /// Seconds since the Unix epoch.
    pub timestamp: u32,
    pub event_type: EventType,
}

impl EventHeader {
    pub fn new(position: u32, timestamp: u32, event_type: EventType) -> Self {
        Self {
            position,
            timestamp,
            event_type,
        }
    }
}

/// The kind of change a rows event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Insert,
    Update,
    Delete,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Insert, ActionKind::Update, ActionKind::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Insert => "insert",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }

    /// Map a rows event type tag to its action. Returns `None` for anything that
    /// is not a write/update/delete rows event.
    pub fn from_event_type(event_type: EventType) -> Option<Self> {
        match event_type {
            EventType::WriteRowsEventV1 | EventType::WriteRowsEventV2 => Some(ActionKind::Insert),
            EventType::UpdateRowsEventV1 | EventType::UpdateRowsEventV2 => {
                Some(ActionKind::Update)
            }
            EventType::DeleteRowsEventV1 | EventType::DeleteRowsEventV2 => {
                Some(ActionKind::Delete)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action kind '{0}', expected one of insert, update, delete")]
pub struct ParseActionKindError(pub String);

/// Case-insensitive, so `INSERT` and `Insert` are accepted on the command line.
impl FromStr for ActionKind {
    type Err = ParseActionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insert" => Ok(ActionKind::Insert),
            "update" => Ok(ActionKind::Update),
            "delete" => Ok(ActionKind::Delete),
            _ => Err(ParseActionKindError(s.to_string())),
        }
    }
}

/// A log file name plus byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPosition {
    pub name: String,
    pub pos: u32,
}

impl fmt::Display for LogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.pos)
    }
}

/// One decoded rows event.
///
/// Insert and delete events carry one row per affected record. Update events
/// carry before/after images flattened as `before, after, before, after, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowChangeEvent {
    pub header: EventHeader,
    pub table: TableDescriptor,
    pub action: ActionKind,
    pub rows: Vec<Row>,
}

/// Every event kind the translator has an entry point for.
#[derive(Debug, Clone, PartialEq)]
pub enum BinlogEvent {
    Rotate {
        header: EventHeader,
        next_log_name: String,
        position: u64,
    },
    PositionSynced {
        header: EventHeader,
        position: LogPosition,
    },
    Ddl {
        header: EventHeader,
        schema: String,
        query: String,
    },
    Rows(RowChangeEvent),
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

impl BinlogEvent {
    pub fn header(&self) -> &EventHeader {
        match self {
            BinlogEvent::Rotate { header, .. }
            | BinlogEvent::PositionSynced { header, .. }
            | BinlogEvent::Ddl { header, .. }
            | BinlogEvent::Xid { header, .. }
            | BinlogEvent::Gtid { header, .. }
            | BinlogEvent::TableChanged { header, .. } => header,
            BinlogEvent::Rows(event) => &event.header,
        }
    }
}
