//! Boundary filter: decides per event whether it falls inside the configured
//! window, and marks the run done once a stop bound is reached.
//!
//! The state is an explicit value owned by the router. `done` only ever goes
//! from `false` to `true`; after that every event is ignored and no further
//! completion is produced.

use crate::config::TranslationConfig;
use binlog_core::EventHeader;
use std::fmt;

/// Which bound ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    StopPosition,
    StopDatetime,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionReason::StopPosition => f.write_str("stop position"),
            CompletionReason::StopDatetime => f.write_str("stop datetime"),
        }
    }
}

/// Produced once per run, by the event that reached a stop bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub reason: CompletionReason,
    pub position: u32,
    pub timestamp: u32,
}

/// Result of running one header through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub ignore: bool,
    pub completion: Option<Completion>,
}

impl Admission {
    fn ignored() -> Self {
        Self {
            ignore: true,
            completion: None,
        }
    }
}

/// Mutable per-run filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationState {
    current_log_name: Option<String>,
    done: bool,
}

impl TranslationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_log_name(&self) -> Option<&str> {
        self.current_log_name.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Called by the rotate and position-sync entry points, before [`admit`](Self::admit).
    pub fn set_current_log_name(&mut self, name: impl Into<String>) {
        self.current_log_name = Some(name.into());
    }

    /// Decide whether the event with `header` is processed.
    ///
    /// The stop-position check runs before the timestamp checks. An event that
    /// trips a stop bound is still admitted unless the start-datetime check
    /// rejects it; it is the last event of the run.
    pub fn admit(&mut self, config: &TranslationConfig, header: &EventHeader) -> Admission {
        if self.done {
            return Admission::ignored();
        }

        let mut completion = None;

        if let Some(stop_position) = config.stop_position.filter(|p| *p != 0) {
            if header.position >= stop_position {
                completion = self.finish(CompletionReason::StopPosition, header);
            }
        }

        let timestamp = i64::from(header.timestamp);

        if let Some(start) = config.start_timestamp {
            if start > timestamp {
                return Admission {
                    ignore: true,
                    completion,
                };
            }
        }

        let in_stop_file = match (&self.current_log_name, &config.stop_log_name) {
            (None, _) => true,
            (Some(current), Some(stop)) => current == stop,
            (Some(_), None) => false,
        };
        if in_stop_file {
            if let Some(stop) = config.stop_timestamp {
                if timestamp >= stop {
                    if let Some(c) = self.finish(CompletionReason::StopDatetime, header) {
                        completion = Some(c);
                    }
                }
            }
        }

        Admission {
            ignore: false,
            completion,
        }
    }

    /// Flip `done`; returns the completion only on the first transition.
    fn finish(&mut self, reason: CompletionReason, header: &EventHeader) -> Option<Completion> {
        if self.done {
            return None;
        }
        self.done = true;
        Some(Completion {
            reason,
            position: header.position,
            timestamp: header.timestamp,
        })
    }
}
