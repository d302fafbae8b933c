//! Action router: one entry point per decoded event kind.
//!
//! Every entry point runs the boundary filter first and does nothing else for
//! ignored events. Row events are mapped to a statement through [`route`],
//! which is the whole difference between forward and flashback translation.

use crate::config::{TranslationConfig, TranslationMode};
use crate::filter::{Admission, Completion, TranslationState};
use crate::sql::{build_delete, build_insert, build_update, qualified_name, SynthesisError};
use binlog_core::{ActionKind, BinlogEvent, EventHeader, LogPosition, Row, RowChangeEvent};
use mysql_types::correct_unsigned;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Statement produced for a row event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
}

/// How update images map to the statement's `where` and `set` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// before image matches, after image supplies new values
    AsLogged,
    /// after image matches, before image supplies new values
    Swapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub statement: StatementKind,
    pub order: RowOrder,
}

/// The action/mode table.
///
/// | action | forward                 | flashback               |
/// |--------|-------------------------|-------------------------|
/// | insert | insert                  | delete                  |
/// | update | update (before → after) | update (after → before) |
/// | delete | delete                  | insert                  |
pub const fn route(action: ActionKind, mode: TranslationMode) -> Route {
    use RowOrder::*;
    use StatementKind::*;

    let (statement, order) = match (action, mode) {
        (ActionKind::Insert, TranslationMode::Forward) => (Insert, AsLogged),
        (ActionKind::Update, TranslationMode::Forward) => (Update, AsLogged),
        (ActionKind::Delete, TranslationMode::Forward) => (Delete, AsLogged),
        (ActionKind::Insert, TranslationMode::Flashback) => (Delete, AsLogged),
        (ActionKind::Update, TranslationMode::Flashback) => (Update, Swapped),
        (ActionKind::Delete, TranslationMode::Flashback) => (Insert, AsLogged),
    };
    Route { statement, order }
}

/// Number of row images one statement consumes for an action.
fn images_per_statement(action: ActionKind) -> usize {
    match action {
        ActionKind::Update => 2,
        ActionKind::Insert | ActionKind::Delete => 1,
    }
}

/// What one entry point produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOutcome {
    /// Output lines, each terminated by `\n`, in emission order.
    pub lines: Vec<String>,
    /// Set on the one event that ended the run.
    pub completion: Option<Completion>,
    /// Lines in `lines` that are diagnostics rather than statements.
    pub diagnostics: usize,
}

impl RouteOutcome {
    fn from_admission(admission: &Admission) -> Self {
        Self {
            completion: admission.completion,
            ..Self::default()
        }
    }
}

/// Routes decoded events to SQL, owning the per-run filter state.
pub struct ActionRouter {
    config: TranslationConfig,
    state: TranslationState,
    completion_tx: Option<oneshot::Sender<Completion>>,
}

impl ActionRouter {
    pub fn new(config: TranslationConfig) -> Self {
        Self {
            config,
            state: TranslationState::new(),
            completion_tx: None,
        }
    }

    /// Receiver that resolves once, when a stop bound ends the run.
    ///
    /// Calling this again replaces the previous sender.
    pub fn completion_receiver(&mut self) -> oneshot::Receiver<Completion> {
        let (tx, rx) = oneshot::channel();
        self.completion_tx = Some(tx);
        rx
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn state(&self) -> &TranslationState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    fn admit(&mut self, header: &EventHeader) -> Admission {
        let admission = self.state.admit(&self.config, header);
        if let Some(completion) = admission.completion {
            // the sender is consumed, so a second send cannot happen
            if let Some(tx) = self.completion_tx.take() {
                if tx.send(completion).is_err() {
                    debug!("completion receiver already dropped");
                }
            }
        }
        admission
    }

    pub fn on_rotate(&mut self, header: &EventHeader, next_log_name: &str) -> RouteOutcome {
        self.state.set_current_log_name(next_log_name);
        RouteOutcome::from_admission(&self.admit(header))
    }

    pub fn on_position_synced(
        &mut self,
        header: &EventHeader,
        position: &LogPosition,
    ) -> RouteOutcome {
        self.state.set_current_log_name(position.name.as_str());
        RouteOutcome::from_admission(&self.admit(header))
    }

    pub fn on_xid(&mut self, header: &EventHeader) -> RouteOutcome {
        RouteOutcome::from_admission(&self.admit(header))
    }

    pub fn on_gtid(&mut self, header: &EventHeader) -> RouteOutcome {
        RouteOutcome::from_admission(&self.admit(header))
    }

    pub fn on_table_changed(&mut self, header: &EventHeader) -> RouteOutcome {
        RouteOutcome::from_admission(&self.admit(header))
    }

    /// DDL is passed through verbatim when enabled.
    pub fn on_ddl(&mut self, header: &EventHeader, query: &str) -> RouteOutcome {
        let admission = self.admit(header);
        let mut outcome = RouteOutcome::from_admission(&admission);
        if !admission.ignore && self.config.ddl {
            outcome.lines.push(format!("{query}\n"));
        }
        outcome
    }

    /// Translate a rows event into one line per row (per before/after pair for
    /// updates), all carrying the event's position and timestamp.
    pub fn on_row(&mut self, mut event: RowChangeEvent) -> RouteOutcome {
        let admission = self.admit(&event.header);
        let mut outcome = RouteOutcome::from_admission(&admission);
        if admission.ignore {
            return outcome;
        }
        if !self.config.is_enabled(event.action) {
            debug!(
                "skipping {} on {} at pos {}: action not enabled",
                event.action,
                qualified_name(&event.table),
                event.header.position
            );
            return outcome;
        }

        for row in &mut event.rows {
            correct_unsigned(&event.table, row);
        }

        let route = route(event.action, self.config.mode);
        let trailer = format!(
            " # pos {} timestamp {}\n",
            event.header.position, event.header.timestamp
        );

        for images in event.rows.chunks(images_per_statement(event.action)) {
            match synthesize(route, &event, images) {
                Ok(sql) => outcome.lines.push(format!("{sql}{trailer}")),
                Err(e) => {
                    warn!("{e} (pos {})", event.header.position);
                    outcome.lines.push(format!("-- {e}{trailer}"));
                    outcome.diagnostics += 1;
                }
            }
        }
        outcome
    }

    /// Route any decoded event to its entry point.
    pub fn dispatch(&mut self, event: BinlogEvent) -> RouteOutcome {
        match event {
            BinlogEvent::Rotate {
                header,
                next_log_name,
                ..
            } => self.on_rotate(&header, &next_log_name),
            BinlogEvent::PositionSynced { header, position } => {
                self.on_position_synced(&header, &position)
            }
            BinlogEvent::Ddl { header, query, .. } => self.on_ddl(&header, &query),
            BinlogEvent::Rows(event) => self.on_row(event),
            BinlogEvent::Xid { header, .. } => self.on_xid(&header),
            BinlogEvent::Gtid { header, .. } => self.on_gtid(&header),
            BinlogEvent::TableChanged { header, .. } => self.on_table_changed(&header),
        }
    }
}

fn synthesize(
    route: Route,
    event: &RowChangeEvent,
    images: &[Row],
) -> Result<String, SynthesisError> {
    let table = &event.table;
    match (route.statement, images) {
        (StatementKind::Insert, [row]) => build_insert(table, row),
        (StatementKind::Delete, [row]) => build_delete(table, row),
        (StatementKind::Update, [before, after]) => match route.order {
            RowOrder::AsLogged => build_update(table, before, after),
            RowOrder::Swapped => build_update(table, after, before),
        },
        (_, images) => Err(SynthesisError::RowImageCount {
            table: qualified_name(table),
            expected: images_per_statement(event.action),
            found: images.len(),
        }),
    }
}
