//! JSON Lines event source.
//!
//! Reads decoded binlog events, one JSON record per line, and feeds them to the
//! translator through [`binlog_translate::EventSource`].

pub mod conversion;
mod source;

pub use conversion::{DecodedEvent, SourceError};
pub use source::{JsonlEventSource, SourceOpts};
