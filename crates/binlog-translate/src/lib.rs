//! Binlog event translation for binlog-sql
//!
//! Turns decoded replication events into SQL text, either replaying the change
//! (forward) or reversing it (flashback).
//!
//! ```text
//! EventSource ──► ActionRouter ──► TranslationState (boundary filter)
//!                      │
//!                      └──► sql::build_* ──► mysql_types::format_value
//! ```
//!
//! [`run_translation`] drives a whole run; [`ActionRouter`] can also be fed
//! events one at a time by a caller that owns its own loop.

pub mod config;
mod driver;
pub mod filter;
pub mod router;
pub mod source;
pub mod sql;

pub use config::{
    parse_action_kinds, parse_datetime_bound, ConfigError, TableFilter, TranslationConfig,
    TranslationMode,
};
pub use driver::{run_translation, RunSummary};
pub use filter::{Admission, Completion, CompletionReason, TranslationState};
pub use router::{route, ActionRouter, Route, RouteOutcome, RowOrder, StatementKind};
pub use source::{EventSource, VecEventSource};
pub use sql::{build_delete, build_insert, build_update, SynthesisError};
