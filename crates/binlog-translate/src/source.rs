//! Event source abstraction.
//!
//! The translator never decodes binlog bytes itself. Whatever decodes them (a
//! replication client, a local-file parser, a JSON Lines dump) implements
//! [`EventSource`] and hands over one [`BinlogEvent`] at a time, in log order.

use anyhow::Result;
use async_trait::async_trait;
use binlog_core::BinlogEvent;
use std::collections::VecDeque;

/// A sequential stream of decoded events.
#[async_trait]
pub trait EventSource: Send {
    /// Short identifier used in log lines.
    fn source_type(&self) -> &'static str;

    /// Next event, or `None` once the stream is exhausted. An `Err` is fatal
    /// to the run.
    async fn next(&mut self) -> Option<Result<BinlogEvent>>;
}

/// An in-memory source, mainly for embedding and tests.
#[derive(Debug, Default)]
pub struct VecEventSource {
    events: VecDeque<Result<BinlogEvent>>,
}

impl VecEventSource {
    pub fn new(events: impl IntoIterator<Item = BinlogEvent>) -> Self {
        Self {
            events: events.into_iter().map(Ok).collect(),
        }
    }

    /// Append a failure that the driver will see after the queued events.
    pub fn push_error(&mut self, error: anyhow::Error) {
        self.events.push_back(Err(error));
    }
}

#[async_trait]
impl EventSource for VecEventSource {
    fn source_type(&self) -> &'static str {
        "memory"
    }

    async fn next(&mut self) -> Option<Result<BinlogEvent>> {
        self.events.pop_front()
    }
}
