//! JSONL decoded-event source.

use crate::conversion::{DecodedEvent, SourceError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use binlog_core::BinlogEvent;
use binlog_translate::{EventSource, TableFilter, TranslationConfig};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info};

/// Options for reading a decoded-event file.
#[derive(Clone, Debug)]
pub struct SourceOpts {
    pub path: PathBuf,
    /// Database/table inclusion filter, applied to row and table events.
    pub table_filter: TableFilter,
    /// Events of the starting log file below this position are skipped.
    pub start_position: u32,
    /// Name of the starting log file. When unknown, the first rotate or
    /// position-sync record after any other event marks the end of it.
    pub start_log_name: Option<String>,
}

impl SourceOpts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table_filter: TableFilter::default(),
            start_position: 4,
            start_log_name: None,
        }
    }

    /// Take the start bounds and table filter from the run policy.
    pub fn from_config(path: impl Into<PathBuf>, config: &TranslationConfig) -> Self {
        Self {
            path: path.into(),
            table_filter: config.table_filter.clone(),
            start_position: config.start_position,
            start_log_name: config.start_log_name.clone(),
        }
    }
}

/// Reads one [`DecodedEvent`] per line and yields them as [`BinlogEvent`]s.
///
/// Blank lines are skipped. Parse failures and unsupported row event types end
/// the stream with an error carrying the 1-based line number.
pub struct JsonlEventSource {
    lines: Lines<BufReader<File>>,
    line_number: usize,
    opts: SourceOpts,
    seen_events: bool,
    past_start_file: bool,
    skipped: u64,
}

impl JsonlEventSource {
    pub async fn open(opts: SourceOpts) -> Result<Self> {
        let file = File::open(&opts.path)
            .await
            .with_context(|| format!("Failed to open decoded event file: {}", opts.path.display()))?;
        info!("Reading decoded events from: {}", opts.path.display());

        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_number: 0,
            opts,
            seen_events: false,
            past_start_file: false,
            skipped: 0,
        })
    }

    /// Events dropped by the table filter or the start position so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Leaving the start file is one-way. A dump may open with a rotate that
    /// names the start file, and ends with one that names the next file.
    fn track_log_name(&mut self, name: &str) {
        let leaves_start_file = match &self.opts.start_log_name {
            Some(start) => start != name,
            None => self.seen_events,
        };
        if leaves_start_file && !self.past_start_file {
            debug!(
                "Left start log file at line {}, now in {}",
                self.line_number, name
            );
            self.past_start_file = true;
        }
    }

    fn should_skip(&self, event: &DecodedEvent) -> bool {
        if event.log_name().is_some() {
            return false;
        }
        if !self.past_start_file && event.header().position < self.opts.start_position {
            return true;
        }
        match event.table_ref() {
            Some((schema, table)) => !self.opts.table_filter.matches(schema, table),
            None => false,
        }
    }

    fn parse_line(&self, line: &str) -> Result<DecodedEvent, SourceError> {
        serde_json::from_str(line).map_err(|source| SourceError::InvalidLine {
            line: self.line_number,
            source,
        })
    }
}

#[async_trait]
impl EventSource for JsonlEventSource {
    fn source_type(&self) -> &'static str {
        "jsonl"
    }

    async fn next(&mut self) -> Option<Result<BinlogEvent>> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    return Some(Err(e).with_context(|| {
                        format!("Failed to read line {}", self.line_number + 1)
                    }))
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let decoded = match self.parse_line(&line) {
                Ok(decoded) => decoded,
                Err(e) => return Some(Err(e.into())),
            };

            match decoded.log_name() {
                Some(name) => self.track_log_name(name),
                None => self.seen_events = true,
            }

            if self.should_skip(&decoded) {
                self.skipped += 1;
                debug!(
                    "Skipping line {} at pos {}",
                    self.line_number,
                    decoded.header().position
                );
                continue;
            }

            let line_number = self.line_number;
            return Some(
                BinlogEvent::try_from(decoded)
                    .with_context(|| format!("Unsupported event at line {line_number}")),
            );
        }
    }
}
