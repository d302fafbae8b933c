//! Run driver: wires an [`EventSource`] to the [`ActionRouter`] and a sink.

use crate::config::TranslationConfig;
use crate::filter::Completion;
use crate::router::ActionRouter;
use crate::source::EventSource;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events pulled from the source.
    pub events: u64,
    /// Lines written to the sink, diagnostics included.
    pub lines: u64,
    /// Lines that were diagnostics instead of SQL.
    pub diagnostics: u64,
    /// Present when a stop bound ended the run.
    pub completion: Option<Completion>,
}

/// Translate every event from `source` into `sink` until a stop bound is
/// reached or the source is exhausted.
///
/// Lines are written in event order. A source error aborts the run.
pub async fn run_translation<S, W>(
    source: &mut S,
    config: TranslationConfig,
    sink: &mut W,
) -> Result<RunSummary>
where
    S: EventSource + ?Sized,
    W: Write + ?Sized,
{
    info!(
        "Starting {} translation from {} source",
        config.mode.as_str(),
        source.source_type()
    );

    let mut router = ActionRouter::new(config);
    let mut done_rx = router.completion_receiver();
    let mut summary = RunSummary::default();

    loop {
        let next = tokio::select! {
            biased;
            completion = &mut done_rx => {
                if let Ok(completion) = completion {
                    info!(
                        "Reached {} at pos {} timestamp {}, stopping",
                        completion.reason, completion.position, completion.timestamp
                    );
                }
                break;
            }
            next = source.next() => next,
        };

        let Some(event) = next else {
            debug!("Event source exhausted");
            break;
        };
        let event = event.context("Failed to read event from source")?;
        summary.events += 1;

        let outcome = router.dispatch(event);
        for line in &outcome.lines {
            sink.write_all(line.as_bytes())
                .context("Failed to write to output")?;
            summary.lines += 1;
            if summary.lines % 1000 == 0 {
                info!("Wrote {} lines", summary.lines);
            }
        }
        summary.diagnostics += outcome.diagnostics as u64;
        if outcome.completion.is_some() {
            summary.completion = outcome.completion;
        }
    }

    sink.flush().context("Failed to flush output")?;

    info!(
        "Translation finished: {} events, {} lines, {} diagnostics",
        summary.events, summary.lines, summary.diagnostics
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslationMode;
    use crate::filter::CompletionReason;
    use crate::source::VecEventSource;
    use binlog_core::{
        ActionKind, BinlogEvent, ColumnDescriptor, ColumnKind, ColumnValue, EventHeader,
        EventType, RowChangeEvent, TableDescriptor,
    };

    fn insert(position: u32, id: i32) -> BinlogEvent {
        BinlogEvent::Rows(RowChangeEvent {
            header: EventHeader::new(position, 100, EventType::WriteRowsEventV2),
            table: TableDescriptor::new(
                "s",
                "t",
                vec![ColumnDescriptor::new("id", ColumnKind::Number)],
            ),
            action: ActionKind::Insert,
            rows: vec![vec![ColumnValue::Int32(id)]],
        })
    }

    #[tokio::test]
    async fn test_runs_until_source_exhausted() {
        let mut source = VecEventSource::new([insert(10, 1), insert(20, 2)]);
        let mut out = Vec::new();
        let summary = run_translation(&mut source, TranslationConfig::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(summary.events, 2);
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.completion, None);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "insert into `s`.`t` (id) values(1); # pos 10 timestamp 100\n\
             insert into `s`.`t` (id) values(2); # pos 20 timestamp 100\n"
        );
    }

    #[tokio::test]
    async fn test_stops_after_completion_event() {
        let mut source =
            VecEventSource::new([insert(400, 1), insert(500, 2), insert(600, 3), insert(700, 4)]);
        let mut out = Vec::new();
        let config = TranslationConfig::new(TranslationMode::Flashback).with_stop_position(500);
        let summary = run_translation(&mut source, config, &mut out).await.unwrap();

        assert_eq!(summary.events, 2);
        assert_eq!(summary.lines, 2);
        assert_eq!(
            summary.completion.map(|c| (c.reason, c.position)),
            Some((CompletionReason::StopPosition, 500))
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().last().unwrap().ends_with("# pos 500 timestamp 100"));
        assert!(text.lines().all(|l| l.starts_with("delete from")));
    }

    #[tokio::test]
    async fn test_source_error_is_fatal() {
        let mut source = VecEventSource::new([insert(10, 1)]);
        source.push_error(anyhow::anyhow!("unsupported row event type"));
        let mut out = Vec::new();
        let err = run_translation(&mut source, TranslationConfig::default(), &mut out)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("unsupported row event type"));
        // the line before the failure was already written
        assert_eq!(out.iter().filter(|b| **b == b'\n').count(), 1);
    }
}
