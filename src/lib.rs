//! binlog-sql
//!
//! Turns decoded MySQL binlog row events into SQL: either the statements that
//! replay the changes (`tosql`) or the statements that undo them (`flashback`).
//!
//! # CLI Usage
//!
//! ```bash
//! # Replay everything from a decoded event dump
//! binlog-sql tosql --start-file mysql-bin.000001.jsonl
//!
//! # Undo deletes on one table between two points in time
//! binlog-sql flashback --start-file mysql-bin.000001.jsonl \
//!   -d shop -t orders --only-type delete \
//!   --start-datetime '2024-01-01 10:00:00' --stop-datetime '2024-01-01 11:00:00' \
//!   -o undo.sql
//! ```

use anyhow::{Context, Result};
use binlog_jsonl_source::SourceOpts;
use binlog_translate::{
    parse_action_kinds, parse_datetime_bound, TableFilter, TranslationConfig, TranslationMode,
};
use clap::Args;
use std::path::{Path, PathBuf};

pub use binlog_jsonl_source as jsonl;
pub use binlog_translate as translate;

/// Options shared by the `tosql` and `flashback` subcommands.
#[derive(Args, Clone, Debug)]
pub struct BinlogOpts {
    /// Decoded event file (JSON Lines) to start reading from
    #[arg(long, value_name = "PATH")]
    pub start_file: PathBuf,

    /// Log file name the stop datetime applies to (default: start file name)
    #[arg(long)]
    pub stop_file: Option<String>,

    /// Events of the start file below this position are skipped
    #[arg(long, default_value = "4")]
    pub start_position: u32,

    /// Stop after the event at or past this position (0 reads to the end)
    #[arg(long, default_value = "0")]
    pub stop_position: u32,

    /// Skip events before this local time (format: 'YYYY-MM-DD HH:MM:SS')
    #[arg(long)]
    pub start_datetime: Option<String>,

    /// Stop at the first event at or after this local time (format: 'YYYY-MM-DD HH:MM:SS')
    #[arg(long)]
    pub stop_datetime: Option<String>,

    /// Only translate events of this database
    #[arg(short = 'd', long)]
    pub database: Option<String>,

    /// Only translate events of these tables (comma-separated)
    #[arg(short = 't', long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Action types to translate: insert, update, delete (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    pub only_type: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

impl BinlogOpts {
    pub fn table_filter(&self) -> TableFilter {
        TableFilter {
            database: self.database.clone(),
            tables: self.tables.clone(),
        }
    }

    /// Log name of the start file as announced by rotate events.
    ///
    /// `mysql-bin.000001.jsonl` is the dump of `mysql-bin.000001`.
    pub fn start_log_name(&self) -> Option<String> {
        log_name_of(&self.start_file)
    }

    /// Source options for the start file, taking bounds and filters from `config`.
    pub fn source_opts(&self, config: &TranslationConfig) -> SourceOpts {
        SourceOpts::from_config(self.start_file.clone(), config)
    }

    /// Build the run policy for `mode`. `ddl` is only honored in forward mode.
    pub fn build_config(&self, mode: TranslationMode, ddl: bool) -> Result<TranslationConfig> {
        let start_timestamp = self
            .start_datetime
            .as_deref()
            .map(parse_datetime_bound)
            .transpose()
            .context("Invalid --start-datetime")?;
        let stop_timestamp = self
            .stop_datetime
            .as_deref()
            .map(parse_datetime_bound)
            .transpose()
            .context("Invalid --stop-datetime")?;

        let mut config = TranslationConfig::new(mode)
            .with_start(self.start_log_name(), self.start_position)
            .with_timestamps(start_timestamp, stop_timestamp)
            .with_ddl(ddl && mode == TranslationMode::Forward);

        if !self.only_type.is_empty() {
            let actions = parse_action_kinds(self.only_type.as_slice())
                .context("Invalid --only-type")?;
            config = config.with_enabled_actions(actions);
        }
        if self.stop_position != 0 {
            config = config.with_stop_position(self.stop_position);
        }

        if let Some(stop) = self.stop_file.clone().or_else(|| self.start_log_name()) {
            config = config.with_stop_log_name(stop);
        }
        config.table_filter = self.table_filter();

        Ok(config)
    }
}

fn log_name_of(path: &Path) -> Option<String> {
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") | Some("json") => path.file_stem(),
        _ => path.file_name(),
    }?;
    Some(name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use binlog_core::ActionKind;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        opts: BinlogOpts,
    }

    fn parse(args: &[&str]) -> BinlogOpts {
        let mut argv = vec!["binlog-sql"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().opts
    }

    #[test]
    fn test_defaults() {
        let opts = parse(&["--start-file", "/data/mysql-bin.000001.jsonl"]);
        let config = opts.build_config(TranslationMode::Forward, false).unwrap();

        assert_eq!(config.start_position, 4);
        assert_eq!(config.start_log_name.as_deref(), Some("mysql-bin.000001"));
        assert_eq!(config.stop_position, None);
        assert_eq!(config.stop_log_name.as_deref(), Some("mysql-bin.000001"));
        assert_eq!(config.enabled_actions.len(), 3);
        assert!(!config.ddl);
        assert_eq!(config.table_filter, TableFilter::default());
    }

    #[test]
    fn test_filters_and_bounds() {
        let opts = parse(&[
            "--start-file",
            "events.jsonl",
            "--stop-file",
            "mysql-bin.000003",
            "--stop-position",
            "500",
            "-d",
            "shop",
            "-t",
            "orders,users",
            "--only-type",
            "INSERT,delete",
        ]);
        let config = opts.build_config(TranslationMode::Flashback, true).unwrap();

        assert_eq!(config.stop_position, Some(500));
        assert_eq!(config.stop_log_name.as_deref(), Some("mysql-bin.000003"));
        assert_eq!(config.table_filter.database.as_deref(), Some("shop"));
        assert_eq!(config.table_filter.tables, vec!["orders", "users"]);
        assert!(config.is_enabled(ActionKind::Insert));
        assert!(!config.is_enabled(ActionKind::Update));
        assert!(config.is_enabled(ActionKind::Delete));
        // DDL output is never produced in flashback mode
        assert!(!config.ddl);
    }

    #[test]
    fn test_ddl_enabled_for_tosql() {
        let opts = parse(&["--start-file", "events.jsonl"]);
        let config = opts.build_config(TranslationMode::Forward, true).unwrap();
        assert!(config.ddl);
    }

    #[test]
    fn test_invalid_datetime_is_rejected() {
        let opts = parse(&["--start-file", "events.jsonl", "--stop-datetime", "yesterday"]);
        let err = opts
            .build_config(TranslationMode::Forward, false)
            .unwrap_err();
        assert!(format!("{err:#}").contains("--stop-datetime"));
    }

    #[test]
    fn test_invalid_only_type_is_rejected() {
        let opts = parse(&["--start-file", "events.jsonl", "--only-type", "upsert"]);
        assert!(opts.build_config(TranslationMode::Forward, false).is_err());
    }

    #[test]
    fn test_log_name_of() {
        assert_eq!(
            log_name_of(Path::new("/tmp/mysql-bin.000007")).as_deref(),
            Some("mysql-bin.000007")
        );
        assert_eq!(
            log_name_of(Path::new("dump/mysql-bin.000007.json")).as_deref(),
            Some("mysql-bin.000007")
        );
    }

    #[test]
    fn test_source_opts() {
        let opts = parse(&["--start-file", "a.jsonl", "--start-position", "120", "-d", "db"]);
        let config = opts.build_config(TranslationMode::Forward, false).unwrap();
        let source = opts.source_opts(&config);
        assert_eq!(source.start_position, 120);
        assert_eq!(source.path, PathBuf::from("a.jsonl"));
        assert_eq!(source.table_filter.database.as_deref(), Some("db"));
        assert_eq!(source.start_log_name.as_deref(), Some("a"));
    }
}
