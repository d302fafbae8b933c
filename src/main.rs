//! Command-line interface for binlog-sql
//!
//! # Usage Examples
//!
//! ```bash
//! # Forward SQL, including DDL, for one database
//! binlog-sql tosql --start-file mysql-bin.000001.jsonl -d shop --ddl
//!
//! # Rollback SQL for everything up to position 98765
//! binlog-sql flashback --start-file mysql-bin.000001.jsonl \
//!   --stop-position 98765 -o rollback.sql
//! ```
//!
//! SQL goes to stdout (or `--out`); logs go to stderr and are controlled by
//! `RUST_LOG`.

use anyhow::Context;
use binlog_sql::jsonl::JsonlEventSource;
use binlog_sql::translate::{run_translation, TranslationMode};
use binlog_sql::BinlogOpts;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(Parser)]
#[command(name = "binlog-sql")]
#[command(about = "Translate decoded MySQL binlog events into forward or flashback SQL")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit SQL that replays the logged changes
    Tosql {
        #[command(flatten)]
        opts: BinlogOpts,

        /// Also emit DDL statements
        #[arg(long)]
        ddl: bool,
    },

    /// Emit SQL that undoes the logged changes
    Flashback {
        #[command(flatten)]
        opts: BinlogOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (opts, mode, ddl) = match cli.command {
        Commands::Tosql { opts, ddl } => (opts, TranslationMode::Forward, ddl),
        Commands::Flashback { opts } => (opts, TranslationMode::Flashback, false),
    };

    let config = opts.build_config(mode, ddl)?;
    let mut source = JsonlEventSource::open(opts.source_opts(&config)).await?;
    let mut sink = open_sink(&opts)?;

    let summary = run_translation(&mut source, config, &mut sink).await?;
    tracing::info!(
        "Done: {} events read, {} skipped by the source, {} lines written",
        summary.events,
        source.skipped(),
        summary.lines
    );
    Ok(())
}

fn open_sink(opts: &BinlogOpts) -> anyhow::Result<Box<dyn Write>> {
    Ok(match &opts.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}
