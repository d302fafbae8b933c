//! Translation run configuration.

use binlog_core::ActionKind;
use chrono::{Local, NaiveDateTime, TimeZone};
use std::collections::BTreeSet;
use thiserror::Error;

/// Format accepted for `--start-datetime` / `--stop-datetime`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether to reproduce the logged change or reverse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationMode {
    Forward,
    Flashback,
}

impl TranslationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMode::Forward => "forward",
            TranslationMode::Flashback => "flashback",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid datetime '{value}', expected format 'YYYY-MM-DD HH:MM:SS': {source}")]
    InvalidDatetime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("datetime '{0}' does not exist in the local time zone")]
    NonexistentLocalTime(String),
    #[error(transparent)]
    InvalidActionKind(#[from] binlog_core::ParseActionKindError),
}

/// Database/table inclusion filter.
///
/// With a database, only that database's tables pass (optionally narrowed to
/// `tables`). Without one, `tables` matches by table name in any database.
/// An empty filter lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    pub database: Option<String>,
    pub tables: Vec<String>,
}

impl TableFilter {
    pub fn matches(&self, schema: &str, table: &str) -> bool {
        if let Some(database) = &self.database {
            if database != schema {
                return false;
            }
        }
        self.tables.is_empty() || self.tables.iter().any(|t| t == table)
    }
}

/// Immutable per-run policy.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub mode: TranslationMode,
    /// Log file the run starts in. Read by event sources, not the router.
    pub start_log_name: Option<String>,
    /// Events of the start log file below this position are skipped by the
    /// source.
    pub start_position: u32,
    pub stop_log_name: Option<String>,
    /// `None` means read to the end of the stream.
    pub stop_position: Option<u32>,
    /// Unix seconds; events before this are skipped.
    pub start_timestamp: Option<i64>,
    /// Unix seconds; the first event at or after this ends the run.
    pub stop_timestamp: Option<i64>,
    /// Applied by the source before events reach the router.
    pub table_filter: TableFilter,
    pub enabled_actions: BTreeSet<ActionKind>,
    pub ddl: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            mode: TranslationMode::Forward,
            start_log_name: None,
            start_position: 4,
            stop_log_name: None,
            stop_position: None,
            start_timestamp: None,
            stop_timestamp: None,
            table_filter: TableFilter::default(),
            enabled_actions: ActionKind::ALL.into_iter().collect(),
            ddl: false,
        }
    }
}

impl TranslationConfig {
    pub fn new(mode: TranslationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_stop_position(mut self, position: u32) -> Self {
        self.stop_position = Some(position);
        self
    }

    pub fn with_timestamps(mut self, start: Option<i64>, stop: Option<i64>) -> Self {
        self.start_timestamp = start;
        self.stop_timestamp = stop;
        self
    }

    pub fn with_start(mut self, log_name: Option<String>, position: u32) -> Self {
        self.start_log_name = log_name;
        self.start_position = position;
        self
    }

    pub fn with_stop_log_name(mut self, name: impl Into<String>) -> Self {
        self.stop_log_name = Some(name.into());
        self
    }

    pub fn with_enabled_actions(mut self, actions: impl IntoIterator<Item = ActionKind>) -> Self {
        self.enabled_actions = actions.into_iter().collect();
        self
    }

    pub fn with_ddl(mut self, ddl: bool) -> Self {
        self.ddl = ddl;
        self
    }

    pub fn is_enabled(&self, action: ActionKind) -> bool {
        self.enabled_actions.contains(&action)
    }
}

/// Parse a list of action names (case-insensitive) into an action set.
pub fn parse_action_kinds<S: AsRef<str>>(
    names: &[S],
) -> Result<BTreeSet<ActionKind>, ConfigError> {
    names
        .iter()
        .map(|n| n.as_ref().parse::<ActionKind>().map_err(ConfigError::from))
        .collect()
}

/// Parse a `YYYY-MM-DD HH:MM:SS` bound in the local time zone into Unix seconds.
pub fn parse_datetime_bound(value: &str) -> Result<i64, ConfigError> {
    parse_datetime_bound_in(value, &Local)
}

/// Like [`parse_datetime_bound`] but in an explicit time zone.
///
/// During a DST fold the earlier instant is used.
pub fn parse_datetime_bound_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<i64, ConfigError> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT).map_err(|source| {
        ConfigError::InvalidDatetime {
            value: value.to_string(),
            source,
        }
    })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| ConfigError::NonexistentLocalTime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_default_enables_all_actions() {
        let config = TranslationConfig::default();
        assert_eq!(config.mode, TranslationMode::Forward);
        assert!(ActionKind::ALL.iter().all(|a| config.is_enabled(*a)));
        assert!(!config.ddl);
        assert_eq!(config.start_position, 4);
        assert_eq!(config.stop_position, None);
    }

    #[test]
    fn test_parse_action_kinds() {
        let set = parse_action_kinds(&["Insert", "DELETE"]).unwrap();
        assert!(set.contains(&ActionKind::Insert));
        assert!(set.contains(&ActionKind::Delete));
        assert!(!set.contains(&ActionKind::Update));

        let err = parse_action_kinds(&["insert", "merge"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidActionKind(_)));
    }

    #[test]
    fn test_parse_datetime_bound_utc() {
        let ts = parse_datetime_bound_in("2023-11-14 22:13:20", &Utc).unwrap();
        assert_eq!(ts, 1_700_000_000);
    }

    #[test]
    fn test_parse_datetime_bound_rejects_bad_input() {
        for bad in ["2023-11-14", "2023/11/14 22:13:20", "yesterday", ""] {
            let err = parse_datetime_bound_in(bad, &Utc).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDatetime { .. }), "{bad}");
        }
    }

    #[test]
    fn test_parse_datetime_bound_local_succeeds() {
        assert!(parse_datetime_bound("2024-06-01 12:00:00").is_ok());
    }

    #[test]
    fn test_table_filter() {
        let all = TableFilter::default();
        assert!(all.matches("a", "b"));

        let db_only = TableFilter {
            database: Some("shop".into()),
            tables: vec![],
        };
        assert!(db_only.matches("shop", "orders"));
        assert!(!db_only.matches("crm", "orders"));

        let db_tables = TableFilter {
            database: Some("shop".into()),
            tables: vec!["orders".into()],
        };
        assert!(db_tables.matches("shop", "orders"));
        assert!(!db_tables.matches("shop", "users"));

        let tables_any_db = TableFilter {
            database: None,
            tables: vec!["orders".into()],
        };
        assert!(tables_any_db.matches("shop", "orders"));
        assert!(tables_any_db.matches("archive", "orders"));
        assert!(!tables_any_db.matches("shop", "orders_old"));
    }
}
